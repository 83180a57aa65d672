use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use crate::core::GameRules;
use crate::utils::{GameError, GameResult};

/// Prefix for environment overrides, e.g. `UPDOWN__GAME__SEED=7`.
pub const ENV_PREFIX: &str = "UPDOWN";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub game: GameConfig,
    pub ui: UiConfig,
    pub storage: StorageConfig,
    pub logging: LoggingConfig,
}

/// The difficulty curve is fixed by [`GameRules::default`]; only the prompt
/// seed is exposed here.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GameConfig {
    #[serde(default)]
    pub seed: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    pub theme: String,
    pub text_width: usize,
    pub show_statistics_on_exit: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    pub data_file: PathBuf,
    pub high_score_key: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            game: GameConfig::default(),
            ui: UiConfig {
                theme: "default".to_string(),
                text_width: 32,
                show_statistics_on_exit: true,
            },
            storage: StorageConfig {
                data_file: PathBuf::from("./data/updown.json"),
                high_score_key: GameRules::default().high_score_key,
            },
            logging: LoggingConfig {
                level: "info".to_string(),
            },
        }
    }
}

impl Config {
    pub fn from_file<P: AsRef<Path>>(path: P) -> GameResult<Self> {
        let path = path.as_ref();

        if !path.exists() {
            let default_config = Self::default();
            default_config.save_to_file(path)?;
            return Ok(default_config);
        }

        let content = std::fs::read_to_string(path)
            .map_err(|e| GameError::configuration(format!("Failed to read config file: {}", e)))?;

        let config: Config = toml::from_str(&content)
            .map_err(|e| GameError::configuration(format!("Failed to parse config file: {}", e)))?;

        Ok(config)
    }

    /// Defaults, then the optional file, then `UPDOWN__SECTION__KEY`
    /// environment variables. Missing keys in the file keep their defaults.
    pub fn load_layered<P: AsRef<Path>>(path: Option<P>) -> GameResult<Self> {
        let mut builder = ::config::Config::builder()
            .add_source(::config::Config::try_from(&Self::default())?);

        if let Some(path) = path {
            builder = builder.add_source(::config::File::from(path.as_ref()).required(false));
        }

        let layered = builder
            .add_source(
                ::config::Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        Ok(layered.try_deserialize()?)
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> GameResult<()> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| GameError::configuration(format!("Failed to create config directory: {}", e)))?;
        }

        let toml_content = toml::to_string_pretty(self)
            .map_err(|e| GameError::configuration(format!("Failed to serialize config: {}", e)))?;

        std::fs::write(path, toml_content)
            .map_err(|e| GameError::configuration(format!("Failed to write config file: {}", e)))?;

        Ok(())
    }

    pub fn rules(&self) -> GameRules {
        GameRules {
            high_score_key: self.storage.high_score_key,
            ..GameRules::default()
        }
    }

    pub fn get_data_file(&self) -> &Path {
        &self.storage.data_file
    }

    pub fn validate(&self) -> GameResult<()> {
        match self.logging.level.as_str() {
            "error" | "warn" | "info" | "debug" | "trace" => {}
            _ => return Err(GameError::configuration("Invalid logging level")),
        }

        if self.storage.data_file.as_os_str().is_empty() {
            return Err(GameError::configuration("Data file path cannot be empty"));
        }
        if self.ui.text_width < 20 {
            return Err(GameError::configuration("Text width must be at least 20"));
        }

        Ok(())
    }

    pub fn merge_with_cli(&mut self, cli_config: CliConfig) {
        if let Some(seed) = cli_config.seed {
            self.game.seed = Some(seed);
        }
        if let Some(data_file) = cli_config.data_file {
            self.storage.data_file = data_file;
        }
        if let Some(log_level) = cli_config.log_level {
            self.logging.level = log_level;
        }
        if cli_config.debug {
            self.logging.level = "debug".to_string();
        }
        if let Some(theme) = cli_config.theme {
            self.ui.theme = theme;
        }
    }
}

// Configuration that can be overridden by CLI arguments
#[derive(Debug, Default)]
pub struct CliConfig {
    pub seed: Option<u64>,
    pub data_file: Option<PathBuf>,
    pub log_level: Option<String>,
    pub debug: bool,
    pub theme: Option<String>,
}
