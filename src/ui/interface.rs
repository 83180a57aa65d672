use console::{Key, Term};
use dialoguer::{Confirm, Select};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::{sleep_until, Instant};

use crate::config::Config;
use crate::core::{apply_view, Button, GameEngine};
use crate::host::{FileStore, TimerQueue};
use crate::ui::{Display, ThemeManager};
use crate::utils::{GameError, GameResult};
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Input {
    Button(Button),
    Leave,
}

pub fn map_key(key: &Key) -> Option<Input> {
    match key {
        Key::Enter | Key::Char(' ') => Some(Input::Button(Button::Confirm)),
        Key::ArrowUp | Key::Char('k') | Key::Char('w') => Some(Input::Button(Button::Up)),
        Key::ArrowDown | Key::Char('j') | Key::Char('s') => Some(Input::Button(Button::Down)),
        Key::Escape | Key::Char('q') => Some(Input::Leave),
        _ => None,
    }
}

/// Forwards one key to the play loop. Returns `false` once the reader
/// should exit: after a leave key, after the loop hung up, or after stop.
fn forward_key(tx: &mpsc::UnboundedSender<Input>, key: &Key, stop: &AtomicBool) -> bool {
    if stop.load(Ordering::Acquire) {
        return false;
    }
    match map_key(key) {
        Some(input) => tx.send(input).is_ok() && input != Input::Leave,
        None => true,
    }
}

/// Reads keys on a plain thread since `Term::read_key` blocks.
///
/// Dropping the reader raises the stop flag. A thread still blocked in
/// `read_key` then exits on its next key without forwarding it.
struct KeyReader {
    stop: Arc<AtomicBool>,
}

impl KeyReader {
    fn spawn(tx: mpsc::UnboundedSender<Input>) -> Self {
        let stop = Arc::new(AtomicBool::new(false));
        let thread_stop = Arc::clone(&stop);

        std::thread::spawn(move || {
            let term = Term::stdout();
            loop {
                let key = match term.read_key() {
                    Ok(key) => key,
                    Err(e) => {
                        warn!("Key reader stopped: {}", e);
                        break;
                    }
                };
                if !forward_key(&tx, &key, &thread_stop) {
                    break;
                }
            }
        });

        Self { stop }
    }
}

impl Drop for KeyReader {
    fn drop(&mut self) {
        self.stop.store(true, Ordering::Release);
    }
}

async fn wait_until(deadline: Option<Instant>) {
    match deadline {
        Some(at) => sleep_until(at).await,
        None => std::future::pending::<()>().await,
    }
}

const RECENT_EVENTS: usize = 5;

pub struct GameInterface {
    engine: GameEngine<FileStore>,
    display: Display,
    timers: TimerQueue,
    clock_origin: Instant,
    config: Config,
}

impl GameInterface {
    pub async fn new(config: Config) -> GameResult<Self> {
        info!("Initializing game interface");
        config.validate()?;

        let mut display = Display::new(ThemeManager::new(), config.ui.text_width)
            .map_err(|e| GameError::display(format!("Failed to create display: {}", e)))?;

        if !display.set_theme(&config.ui.theme) {
            warn!("Unknown theme '{}', using default", config.ui.theme);
        }

        let store = FileStore::new(config.get_data_file());
        let engine = GameEngine::new(config.rules(), store, config.game.seed)?;

        Ok(Self {
            engine,
            display,
            timers: TimerQueue::new(),
            clock_origin: Instant::now(),
            config,
        })
    }

    pub async fn run(&mut self) -> GameResult<()> {
        info!("Starting game interface");

        while self.show_main_menu().await? {}

        if self.config.ui.show_statistics_on_exit && self.engine.statistics().rounds_played > 0 {
            self.show_statistics().await?;
        }
        self.display.show_message("Thanks for playing!", "success").ok();
        Ok(())
    }

    pub async fn show_main_menu(&mut self) -> GameResult<bool> {
        self.display.clear_screen().ok();
        self.display
            .show_title("UP / DOWN")
            .map_err(|e| GameError::display(e.to_string()))?;

        let choices = vec![
            "▶️  Play",
            "🏆 High Score",
            "📊 Session Statistics",
            "🎨 Change Theme",
            "🚪 Exit",
        ];

        let selection = Select::new()
            .with_prompt("What would you like to do?")
            .items(&choices)
            .default(0)
            .interact()
            .map_err(|e| GameError::display(format!("Menu selection error: {}", e)))?;

        match selection {
            0 => self.play().await?,
            1 => self.show_high_score().await?,
            2 => self.show_statistics().await?,
            3 => self.change_theme().await?,
            4 => return self.confirm_exit().await.map(|exit| !exit),
            _ => unreachable!(),
        }

        Ok(true)
    }

    /// Runs the play screen until the player leaves it or a handler fails.
    /// Either way the key reader is stopped and the round is finalized.
    pub async fn play(&mut self) -> GameResult<()> {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let reader = KeyReader::spawn(tx);

        let outcome = self.play_loop(&mut rx).await;
        drop(reader);
        drop(rx);

        let abandoned = self.engine.abandon_round(&mut self.timers);
        if let Err(e) = &outcome {
            warn!("Play screen failed: {}", e);
        }
        outcome.and(abandoned)?;
        info!("Left play screen");
        Ok(())
    }

    async fn play_loop(&mut self, rx: &mut mpsc::UnboundedReceiver<Input>) -> GameResult<()> {
        self.render()?;

        loop {
            let deadline = self
                .timers
                .next_deadline()
                .map(|(_, at)| self.clock_origin + Duration::from_millis(at));

            tokio::select! {
                _ = wait_until(deadline) => {
                    self.fire_due_timers()?;
                }
                input = rx.recv() => {
                    // Expired deadlines win over a press that arrives late.
                    self.fire_due_timers()?;
                    match input {
                        Some(Input::Button(button)) => {
                            debug!("Button {:?}", button);
                            self.engine.on_button_press(button, &mut self.timers)?;
                        }
                        Some(Input::Leave) | None => break,
                    }
                }
            }

            self.render()?;
        }

        Ok(())
    }

    fn fire_due_timers(&mut self) -> GameResult<()> {
        let elapsed = self.clock_origin.elapsed().as_millis() as u64;
        self.timers.set_now(elapsed);

        while let Some(handle) = self.timers.pop_due() {
            self.engine.on_timer_fire(handle, &mut self.timers)?;
        }
        Ok(())
    }

    fn render(&mut self) -> GameResult<()> {
        let view = self.engine.view();
        apply_view(&mut self.display, &view);
        self.display
            .present()
            .map_err(|e| GameError::display(format!("Failed to draw screen: {}", e)))
    }

    pub async fn show_high_score(&mut self) -> GameResult<()> {
        let high_score = self.engine.high_score()?;
        self.display
            .show_message(&format!("🏆 High Score: {}", high_score), "high_score")
            .map_err(|e| GameError::display(e.to_string()))?;
        self.display.wait_for_enter()?;
        Ok(())
    }

    pub async fn show_statistics(&mut self) -> GameResult<()> {
        let high_score = self.engine.high_score()?;
        let recent = self.engine.events().get_recent_events(RECENT_EVENTS);
        self.display
            .show_statistics(self.engine.statistics(), high_score, &recent)
            .map_err(|e| GameError::display(e.to_string()))?;
        self.display.wait_for_enter()?;
        Ok(())
    }

    async fn change_theme(&mut self) -> GameResult<()> {
        let themes = self.display.get_available_themes();

        let selection = Select::new()
            .with_prompt("Choose a theme")
            .items(&themes)
            .default(0)
            .interact()
            .map_err(|e| GameError::display(format!("Theme selection error: {}", e)))?;

        let theme = &themes[selection];
        self.display.set_theme(theme);
        self.config.ui.theme = theme.clone();
        self.display
            .show_success(&format!("Theme changed to {}", theme))
            .map_err(|e| GameError::display(e.to_string()))?;
        Ok(())
    }

    async fn confirm_exit(&self) -> GameResult<bool> {
        Confirm::new()
            .with_prompt("Leave the game?")
            .default(true)
            .interact()
            .map_err(|e| GameError::display(format!("Confirmation error: {}", e)))
    }
}
