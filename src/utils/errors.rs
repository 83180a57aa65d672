use thiserror::Error;

pub type GameResult<T> = Result<T, GameError>;

#[derive(Error, Debug)]
pub enum GameError {
    #[error("Storage error: {message}")]
    Storage { message: String },

    #[error("Invalid game rules: {message}")]
    Rules { message: String },

    #[error("Display error: {message}")]
    Display { message: String },

    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Config error: {0}")]
    Config(#[from] config::ConfigError),
}

impl GameError {
    pub fn storage<S: Into<String>>(message: S) -> Self {
        Self::Storage {
            message: message.into(),
        }
    }

    pub fn rules<S: Into<String>>(message: S) -> Self {
        Self::Rules {
            message: message.into(),
        }
    }

    pub fn display<S: Into<String>>(message: S) -> Self {
        Self::Display {
            message: message.into(),
        }
    }

    pub fn configuration<S: Into<String>>(message: S) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }
}
