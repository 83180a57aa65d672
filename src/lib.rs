pub mod config;
pub mod core;
pub mod host;
pub mod ui;
pub mod utils;

pub use crate::core::{Button, Direction, GameEngine, GameRules, GameState, RoundPhase, ViewModel};
pub use crate::config::Config;
pub use host::{FileStore, HighScoreStore, MemoryStore, Scheduler, Screen, TimerQueue};
pub use ui::GameInterface;

pub type Result<T> = anyhow::Result<T>;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const APP_NAME: &str = env!("CARGO_PKG_NAME");
