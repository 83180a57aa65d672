use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, info, warn};

use crate::core::events::{EventLogger, GameEvent, GameEventHandler};
use crate::core::game_state::{
    Button, Direction, GameRules, GameState, RoundPhase, SessionStatistics, StatusLine,
};
use crate::core::view::ViewModel;
use crate::host::{HighScoreStore, Scheduler, TimerHandle};
use crate::utils::GameResult;

/// Round state machine. Hosts deliver timer expiries and button presses one
/// at a time; each handler runs to completion before the next event.
pub struct GameEngine<S, R = StdRng> {
    rules: GameRules,
    state: GameState,
    store: S,
    rng: R,
    event_handler: EventLogger,
    stats: SessionStatistics,
}

impl<S: HighScoreStore> GameEngine<S, StdRng> {
    /// Seeds the prompt generator once; `None` draws the seed from the OS.
    pub fn new(rules: GameRules, store: S, seed: Option<u64>) -> GameResult<Self> {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self::with_rng(rules, store, rng)
    }
}

impl<S: HighScoreStore, R: Rng> GameEngine<S, R> {
    pub fn with_rng(rules: GameRules, store: S, rng: R) -> GameResult<Self> {
        rules.validate()?;

        Ok(Self {
            state: GameState::new(&rules),
            rules,
            store,
            rng,
            event_handler: EventLogger::default(),
            stats: SessionStatistics::default(),
        })
    }

    pub fn start_round(&mut self, scheduler: &mut dyn Scheduler) -> GameResult<()> {
        if self.state.is_running {
            debug!("Round already running, ignoring start");
            return Ok(());
        }

        if let Some(stale) = self.state.pending_timer.take() {
            // The previous round failed on a press and its timer never fired.
            scheduler.cancel(stale);
            info!("Cancelled {} left by an unfinished round", stale);
            self.finalize_round()?;
        }

        self.state.score = 0;
        self.state.hide_indicators();
        self.state.high_score_shown = None;
        self.state.time_interval_ms = self.rules.initial_interval_ms;
        self.state.is_running = true;
        self.state.awaiting_input = false;
        self.state.direction = None;
        self.state.score_shown = true;
        self.state.pending_timer = Some(scheduler.schedule_once(self.state.time_interval_ms));

        info!("Round started ({}ms to first prompt)", self.state.time_interval_ms);
        self.emit_event(GameEvent::round_started(self.state.time_interval_ms));
        Ok(())
    }

    pub fn on_timer_fire(
        &mut self,
        handle: TimerHandle,
        scheduler: &mut dyn Scheduler,
    ) -> GameResult<()> {
        if self.state.pending_timer != Some(handle) {
            warn!("Ignoring {}, expected {:?}", handle, self.state.pending_timer);
            self.emit_event(GameEvent::stale_timer_ignored(handle));
            return Ok(());
        }
        self.state.pending_timer = None;

        if self.state.awaiting_input || !self.state.is_running {
            if self.state.is_running {
                info!("Prompt {:?} timed out", self.state.direction);
                self.emit_event(GameEvent::timed_out(self.state.direction));
            }
            return self.finalize_round();
        }

        let direction = if self.rng.gen::<bool>() {
            Direction::Up
        } else {
            Direction::Down
        };
        let shown_interval = self.state.time_interval_ms;

        self.state.direction = Some(direction);
        self.state.revealed = Some(direction);
        self.state.status = StatusLine::TimeInterval(shown_interval);
        self.state.time_interval_ms = self.rules.next_tick_interval(shown_interval);
        self.state.awaiting_input = true;
        self.state.pending_timer = Some(scheduler.schedule_once(self.state.time_interval_ms));

        debug!(
            "Prompt {} shown, next deadline in {}ms",
            direction, self.state.time_interval_ms
        );
        self.emit_event(GameEvent::prompt_shown(
            direction,
            shown_interval,
            self.state.time_interval_ms,
        ));
        Ok(())
    }

    pub fn on_button_press(
        &mut self,
        button: Button,
        scheduler: &mut dyn Scheduler,
    ) -> GameResult<()> {
        let Some(pressed) = button.direction() else {
            return self.start_round(scheduler);
        };

        if !self.state.is_running {
            debug!("{:?} pressed with no round running", button);
            return Ok(());
        }

        if self.state.direction == Some(pressed) {
            self.add_score(pressed);
            self.state.awaiting_input = false;
        } else {
            // Finalization happens when the pending timer fires.
            info!(
                "Wrong button {:?} (expected {:?})",
                button, self.state.direction
            );
            self.emit_event(GameEvent::wrong_button(button, self.state.direction));
            self.state.is_running = false;
            self.state.direction = None;
        }

        Ok(())
    }

    /// Leaves the current round, if any, committing its score.
    pub fn abandon_round(&mut self, scheduler: &mut dyn Scheduler) -> GameResult<()> {
        if self.phase() == RoundPhase::Idle {
            return Ok(());
        }

        if let Some(handle) = self.state.pending_timer.take() {
            scheduler.cancel(handle);
        }
        info!("Round abandoned at score {}", self.state.score);
        self.finalize_round()
    }

    fn add_score(&mut self, direction: Direction) {
        self.state.score += 1;
        self.state.score_shown = true;

        if let Some(interval) = self.rules.ramp_interval(self.state.score) {
            debug!("Score {} resets interval to {}ms", self.state.score, interval);
            self.state.time_interval_ms = interval;
            self.emit_event(GameEvent::interval_reset(self.state.score, interval));
        }

        self.state.hide_indicators();
        self.stats.record_hit();
        self.emit_event(GameEvent::hit(direction, self.state.score));
    }

    fn finalize_round(&mut self) -> GameResult<()> {
        self.state.status = StatusLine::GameOver;
        self.state.hide_indicators();
        self.state.direction = None;
        self.state.is_running = false;
        self.state.awaiting_input = false;

        let high_score = self.commit_high_score()?;
        self.stats.record_round(self.state.score);

        info!("Game over: score {}, high score {}", self.state.score, high_score);
        self.emit_event(GameEvent::round_ended(self.state.score, high_score));
        Ok(())
    }

    fn commit_high_score(&mut self) -> GameResult<u32> {
        let key = self.rules.high_score_key;
        let mut high_score = self.store.persist_read(key)?;

        if self.state.score > high_score {
            self.store.persist_write(key, self.state.score)?;
            self.emit_event(GameEvent::new_high_score(high_score, self.state.score));
            high_score = self.state.score;
        }

        self.state.high_score_shown = Some(high_score);
        Ok(high_score)
    }

    fn emit_event(&mut self, event: GameEvent) {
        self.event_handler.handle_event(&event);
    }

    pub fn high_score(&self) -> GameResult<u32> {
        self.store.persist_read(self.rules.high_score_key)
    }

    pub fn view(&self) -> ViewModel {
        ViewModel::from_state(&self.state)
    }

    pub fn phase(&self) -> RoundPhase {
        self.state.phase()
    }

    pub fn get_game_state(&self) -> &GameState {
        &self.state
    }

    pub fn rules(&self) -> &GameRules {
        &self.rules
    }

    pub fn events(&self) -> &EventLogger {
        &self.event_handler
    }

    pub fn statistics(&self) -> &SessionStatistics {
        &self.stats
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}
