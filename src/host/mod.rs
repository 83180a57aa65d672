//! Capabilities the game core needs from whatever runs it: one-shot timers,
//! a durable integer store and a handful of text fields on a screen.

pub mod storage;
pub mod timer;

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::utils::GameResult;

pub use storage::{FileStore, MemoryStore};
pub use timer::TimerQueue;

/// Opaque reference to a scheduled one-shot callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TimerHandle(pub u64);

impl fmt::Display for TimerHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "timer#{}", self.0)
    }
}

/// Fire-once delayed callbacks. Delivery of the expiry back into the engine
/// is the host's job; the scheduler only hands out handles.
pub trait Scheduler {
    fn schedule_once(&mut self, delay_ms: u32) -> TimerHandle;

    /// Returns `false` when the handle already fired or was never issued.
    fn cancel(&mut self, handle: TimerHandle) -> bool;
}

/// Durable integer key-value storage. Unset keys read as zero.
pub trait HighScoreStore {
    fn persist_read(&self, key: u32) -> GameResult<u32>;
    fn persist_write(&mut self, key: u32, value: u32) -> GameResult<()>;
}

/// The five logical text fields of the game screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Field {
    Status,
    Up,
    Down,
    Score,
    HighScore,
}

impl Field {
    pub const ALL: [Field; 5] = [
        Field::Status,
        Field::Up,
        Field::Down,
        Field::Score,
        Field::HighScore,
    ];

    /// Top-to-bottom order the fields occupy on the watch face.
    pub const LAYOUT: [Field; 5] = [
        Field::Score,
        Field::Up,
        Field::HighScore,
        Field::Status,
        Field::Down,
    ];
}

pub trait Screen {
    fn show_text(&mut self, field: Field, text: &str);
    fn set_visible(&mut self, field: Field, visible: bool);
}
