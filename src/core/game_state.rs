use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::host::TimerHandle;
use crate::utils::{GameError, GameResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Down,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Up => write!(f, "Up"),
            Direction::Down => write!(f, "Down"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Button {
    Confirm,
    Up,
    Down,
}

impl Button {
    /// The prompt this button answers; `None` for confirm.
    pub fn direction(self) -> Option<Direction> {
        match self {
            Button::Confirm => None,
            Button::Up => Some(Direction::Up),
            Button::Down => Some(Direction::Down),
        }
    }
}

/// What the status line currently says.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StatusLine {
    PressToStart,
    TimeInterval(u32),
    GameOver,
}

impl fmt::Display for StatusLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatusLine::PressToStart => write!(f, "Press select to start"),
            StatusLine::TimeInterval(ms) => write!(f, "Time interval: {}", ms),
            StatusLine::GameOver => write!(f, "Game over"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoundPhase {
    /// No round and no timer outstanding.
    Idle,
    /// Round running, no unanswered prompt: the next tick reveals one.
    Armed,
    /// A prompt is on screen waiting for its button.
    AwaitingInput,
    /// A wrong press ended the round; finalization waits for the timer.
    FailurePending,
}

/// Fixed constants of the difficulty ramp.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameRules {
    pub initial_interval_ms: u32,
    pub tick_decrement_ms: u32,
    pub ramp_every: u32,
    pub min_interval_ms: u32,
    pub high_score_key: u32,
}

impl Default for GameRules {
    fn default() -> Self {
        Self {
            initial_interval_ms: 1000,
            tick_decrement_ms: 10,
            ramp_every: 50,
            min_interval_ms: 50,
            high_score_key: 1337,
        }
    }
}

impl GameRules {
    pub fn validate(&self) -> GameResult<()> {
        if self.initial_interval_ms == 0 {
            return Err(GameError::rules("Initial interval must be greater than 0"));
        }
        if self.min_interval_ms == 0 {
            return Err(GameError::rules("Minimum interval must be greater than 0"));
        }
        if self.min_interval_ms > self.initial_interval_ms {
            return Err(GameError::rules(
                "Minimum interval cannot exceed the initial interval",
            ));
        }
        if self.ramp_every == 0 {
            return Err(GameError::rules("Ramp step must be greater than 0"));
        }
        Ok(())
    }

    /// Deadline after one more successful tick.
    pub fn next_tick_interval(&self, current_ms: u32) -> u32 {
        current_ms
            .saturating_sub(self.tick_decrement_ms)
            .max(self.min_interval_ms)
    }

    /// Absolute deadline when `score` lands on a ramp boundary.
    pub fn ramp_interval(&self, score: u32) -> Option<u32> {
        if score == 0 || score % self.ramp_every != 0 {
            return None;
        }
        Some(
            self.initial_interval_ms
                .saturating_sub(score)
                .max(self.min_interval_ms),
        )
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    pub score: u32,
    pub time_interval_ms: u32,
    pub direction: Option<Direction>,
    pub is_running: bool,
    pub awaiting_input: bool,
    pub pending_timer: Option<TimerHandle>,
    pub status: StatusLine,
    /// Indicator currently on screen; can outlive `direction` after a miss.
    pub revealed: Option<Direction>,
    pub score_shown: bool,
    pub high_score_shown: Option<u32>,
}

impl GameState {
    pub fn new(rules: &GameRules) -> Self {
        Self {
            score: 0,
            time_interval_ms: rules.initial_interval_ms,
            direction: None,
            is_running: false,
            awaiting_input: false,
            pending_timer: None,
            status: StatusLine::PressToStart,
            revealed: None,
            score_shown: false,
            high_score_shown: None,
        }
    }

    pub fn phase(&self) -> RoundPhase {
        match (self.is_running, self.awaiting_input, self.pending_timer) {
            (true, true, _) => RoundPhase::AwaitingInput,
            (true, false, _) => RoundPhase::Armed,
            (false, _, Some(_)) => RoundPhase::FailurePending,
            (false, _, None) => RoundPhase::Idle,
        }
    }

    pub fn hide_indicators(&mut self) {
        self.revealed = None;
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionStatistics {
    pub rounds_played: u32,
    pub total_hits: u32,
    pub best_score: u32,
    pub last_score: Option<u32>,
    pub session_start: DateTime<Utc>,
}

impl Default for SessionStatistics {
    fn default() -> Self {
        Self {
            rounds_played: 0,
            total_hits: 0,
            best_score: 0,
            last_score: None,
            session_start: Utc::now(),
        }
    }
}

impl SessionStatistics {
    pub fn record_hit(&mut self) {
        self.total_hits += 1;
    }

    pub fn record_round(&mut self, score: u32) {
        self.rounds_played += 1;
        self.best_score = self.best_score.max(score);
        self.last_score = Some(score);
    }

    pub fn average_score(&self) -> f64 {
        if self.rounds_played == 0 {
            0.0
        } else {
            f64::from(self.total_hits) / f64::from(self.rounds_played)
        }
    }

    pub fn session_seconds(&self) -> i64 {
        Utc::now()
            .signed_duration_since(self.session_start)
            .num_seconds()
    }

    pub fn get_session_time_formatted(&self) -> String {
        let seconds = self.session_seconds().max(0);
        let hours = seconds / 3600;
        let minutes = (seconds % 3600) / 60;
        let seconds = seconds % 60;

        if hours > 0 {
            format!("{}h {}m {}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}s", seconds)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_state() {
        let state = GameState::new(&GameRules::default());

        assert_eq!(state.score, 0);
        assert_eq!(state.time_interval_ms, 1000);
        assert_eq!(state.direction, None);
        assert!(!state.is_running);
        assert_eq!(state.status, StatusLine::PressToStart);
        assert_eq!(state.phase(), RoundPhase::Idle);
    }

    #[test]
    fn test_phase_derivation() {
        let mut state = GameState::new(&GameRules::default());

        state.is_running = true;
        assert_eq!(state.phase(), RoundPhase::Armed);

        state.awaiting_input = true;
        assert_eq!(state.phase(), RoundPhase::AwaitingInput);

        state.is_running = false;
        state.pending_timer = Some(TimerHandle(3));
        assert_eq!(state.phase(), RoundPhase::FailurePending);
    }

    #[test]
    fn test_status_text() {
        assert_eq!(StatusLine::PressToStart.to_string(), "Press select to start");
        assert_eq!(StatusLine::TimeInterval(990).to_string(), "Time interval: 990");
        assert_eq!(StatusLine::GameOver.to_string(), "Game over");
    }

    #[test]
    fn test_ramp_interval() {
        let rules = GameRules::default();

        assert_eq!(rules.ramp_interval(0), None);
        assert_eq!(rules.ramp_interval(49), None);
        assert_eq!(rules.ramp_interval(50), Some(950));
        assert_eq!(rules.ramp_interval(100), Some(900));
        assert_eq!(rules.ramp_interval(1000), Some(50));
        assert_eq!(rules.ramp_interval(2000), Some(50));
    }

    #[test]
    fn test_tick_interval_floor() {
        let rules = GameRules::default();

        assert_eq!(rules.next_tick_interval(1000), 990);
        assert_eq!(rules.next_tick_interval(55), 50);
        assert_eq!(rules.next_tick_interval(50), 50);
    }

    #[test]
    fn test_rules_validation() {
        assert!(GameRules::default().validate().is_ok());

        let rules = GameRules {
            ramp_every: 0,
            ..GameRules::default()
        };
        assert!(rules.validate().is_err());

        let rules = GameRules {
            min_interval_ms: 2000,
            ..GameRules::default()
        };
        assert!(rules.validate().is_err());
    }

    #[test]
    fn test_statistics() {
        let mut stats = SessionStatistics::default();
        stats.record_hit();
        stats.record_hit();
        stats.record_round(2);
        stats.record_round(0);

        assert_eq!(stats.rounds_played, 2);
        assert_eq!(stats.best_score, 2);
        assert_eq!(stats.last_score, Some(0));
        assert_eq!(stats.average_score(), 1.0);
    }
}
