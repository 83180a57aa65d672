use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use uuid::Uuid;

use crate::core::game_state::{Button, Direction};
use crate::host::TimerHandle;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameEvent {
    pub id: Uuid,
    pub event_type: GameEventType,
    pub timestamp: DateTime<Utc>,
    pub data: serde_json::Value,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEventType {
    RoundStarted,
    PromptShown,
    Hit,
    IntervalReset,
    WrongButton,
    TimedOut,
    RoundEnded,
    NewHighScore,
    StaleTimerIgnored,
}

impl GameEvent {
    pub fn new(event_type: GameEventType, data: serde_json::Value) -> Self {
        Self {
            id: Uuid::new_v4(),
            event_type,
            timestamp: Utc::now(),
            data,
        }
    }

    pub fn round_started(interval_ms: u32) -> Self {
        let data = serde_json::json!({
            "interval_ms": interval_ms
        });
        Self::new(GameEventType::RoundStarted, data)
    }

    pub fn prompt_shown(direction: Direction, shown_interval_ms: u32, next_interval_ms: u32) -> Self {
        let data = serde_json::json!({
            "direction": direction,
            "shown_interval_ms": shown_interval_ms,
            "next_interval_ms": next_interval_ms
        });
        Self::new(GameEventType::PromptShown, data)
    }

    pub fn hit(direction: Direction, score: u32) -> Self {
        let data = serde_json::json!({
            "direction": direction,
            "score": score
        });
        Self::new(GameEventType::Hit, data)
    }

    pub fn interval_reset(score: u32, interval_ms: u32) -> Self {
        let data = serde_json::json!({
            "score": score,
            "interval_ms": interval_ms
        });
        Self::new(GameEventType::IntervalReset, data)
    }

    pub fn wrong_button(button: Button, expected: Option<Direction>) -> Self {
        let data = serde_json::json!({
            "button": button,
            "expected": expected
        });
        Self::new(GameEventType::WrongButton, data)
    }

    pub fn timed_out(direction: Option<Direction>) -> Self {
        let data = serde_json::json!({
            "direction": direction
        });
        Self::new(GameEventType::TimedOut, data)
    }

    pub fn round_ended(score: u32, high_score: u32) -> Self {
        let data = serde_json::json!({
            "score": score,
            "high_score": high_score
        });
        Self::new(GameEventType::RoundEnded, data)
    }

    pub fn new_high_score(previous: u32, score: u32) -> Self {
        let data = serde_json::json!({
            "previous": previous,
            "score": score
        });
        Self::new(GameEventType::NewHighScore, data)
    }

    pub fn stale_timer_ignored(handle: TimerHandle) -> Self {
        let data = serde_json::json!({
            "handle": handle.0
        });
        Self::new(GameEventType::StaleTimerIgnored, data)
    }
}

pub trait GameEventHandler {
    fn handle_event(&mut self, event: &GameEvent);
}

/// Bounded in-memory event history; the oldest events drop off first.
pub struct EventLogger {
    events: VecDeque<GameEvent>,
    max_events: usize,
}

impl EventLogger {
    pub fn new(max_events: usize) -> Self {
        Self {
            events: VecDeque::new(),
            max_events,
        }
    }

    pub fn get_events(&self) -> impl Iterator<Item = &GameEvent> {
        self.events.iter()
    }

    pub fn get_events_by_type(&self, event_type: &GameEventType) -> Vec<&GameEvent> {
        self.events
            .iter()
            .filter(|event| &event.event_type == event_type)
            .collect()
    }

    pub fn get_recent_events(&self, count: usize) -> Vec<&GameEvent> {
        self.events.iter().rev().take(count).collect()
    }

    pub fn last(&self) -> Option<&GameEvent> {
        self.events.back()
    }

    pub fn get_event_count(&self) -> usize {
        self.events.len()
    }

    pub fn get_event_count_by_type(&self, event_type: &GameEventType) -> usize {
        self.events
            .iter()
            .filter(|event| &event.event_type == event_type)
            .count()
    }
}

impl Default for EventLogger {
    fn default() -> Self {
        Self::new(1000)
    }
}

impl GameEventHandler for EventLogger {
    fn handle_event(&mut self, event: &GameEvent) {
        self.events.push_back(event.clone());

        while self.events.len() > self.max_events {
            self.events.pop_front();
        }
    }
}
