pub mod engine;
pub mod events;
pub mod game_state;
pub mod view;

pub use engine::GameEngine;
pub use events::{EventLogger, GameEvent, GameEventHandler, GameEventType};
pub use game_state::{
    Button, Direction, GameRules, GameState, RoundPhase, SessionStatistics, StatusLine,
};
pub use view::{apply_view, FieldView, ViewModel};
