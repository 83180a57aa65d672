use console::{pad_str, Alignment, Term};
use std::collections::HashMap;
use std::io::{self, Write};

use crate::core::{GameEvent, SessionStatistics, StatusLine};
use crate::host::{Field, Screen};
use crate::ui::ThemeManager;

#[derive(Debug, Clone, Default)]
struct FieldSlot {
    text: String,
    visible: bool,
}

/// Terminal rendition of the watch face. Field updates are retained and only
/// reach the terminal on [`Display::present`].
pub struct Display {
    term: Term,
    theme_manager: ThemeManager,
    text_width: usize,
    fields: HashMap<Field, FieldSlot>,
}

impl Display {
    pub fn new(theme_manager: ThemeManager, text_width: usize) -> io::Result<Self> {
        Ok(Self {
            term: Term::stdout(),
            theme_manager,
            text_width,
            fields: HashMap::new(),
        })
    }

    pub fn clear_screen(&self) -> io::Result<()> {
        self.term.clear_screen()
    }

    /// One line per field in layout order; hidden fields keep their row.
    pub fn frame(&self) -> Vec<String> {
        Field::LAYOUT
            .iter()
            .map(|field| match self.fields.get(field) {
                Some(slot) if slot.visible && !slot.text.is_empty() => {
                    let styled = self
                        .theme_manager
                        .apply_style(&slot.text, self.style_for(*field, &slot.text));
                    pad_str(&styled, self.text_width, Alignment::Center, None).into_owned()
                }
                _ => " ".repeat(self.text_width),
            })
            .collect()
    }

    pub fn present(&self) -> io::Result<()> {
        self.term.clear_screen()?;

        let border = self
            .theme_manager
            .apply_style(&"─".repeat(self.text_width), "separator");
        let mut out = io::stdout();

        writeln!(out, "{}", border)?;
        for line in self.frame() {
            writeln!(out, "{}", line)?;
            writeln!(out)?;
        }
        writeln!(out, "{}", border)?;

        let help = "enter: select  ↑/k: up  ↓/j: down  q: menu";
        writeln!(out, "{}", self.theme_manager.apply_style(help, "info"))?;
        out.flush()
    }

    pub fn show_title(&self, title: &str) -> io::Result<()> {
        let styled_title = self.theme_manager.apply_style(title, "title");
        let border = "═".repeat(self.text_width);
        let styled_border = self.theme_manager.apply_style(&border, "separator");

        writeln!(io::stdout(), "{}", styled_title)?;
        writeln!(io::stdout(), "{}", styled_border)?;
        writeln!(io::stdout())?;
        Ok(())
    }

    pub fn show_message(&self, message: &str, style: &str) -> io::Result<()> {
        let styled_message = self.theme_manager.apply_style(message, style);
        writeln!(io::stdout(), "{}", styled_message)?;
        Ok(())
    }

    pub fn show_success(&self, message: &str) -> io::Result<()> {
        self.show_message(&format!("✅ {}", message), "success")
    }

    pub fn show_separator(&self) -> io::Result<()> {
        let separator = "━".repeat(self.text_width);
        self.show_message(&separator, "separator")
    }

    pub fn show_statistics(
        &self,
        stats: &SessionStatistics,
        high_score: u32,
        recent: &[&GameEvent],
    ) -> io::Result<()> {
        self.show_message("📊 Session Statistics", "title")?;
        self.show_separator()?;
        for line in statistics_lines(stats, high_score) {
            self.show_message(&line, "stats")?;
        }
        if !recent.is_empty() {
            self.show_separator()?;
            self.show_message("Recent events", "title")?;
            for line in recent_event_lines(recent) {
                self.show_message(&line, "info")?;
            }
        }
        self.show_separator()
    }

    pub fn wait_for_enter(&self) -> io::Result<()> {
        let styled_prompt = self.theme_manager.apply_style("Press Enter to continue...", "info");
        print!("{}", styled_prompt);
        io::stdout().flush()?;

        let mut input = String::new();
        io::stdin().read_line(&mut input)?;
        Ok(())
    }

    pub fn set_theme(&mut self, theme_name: &str) -> bool {
        self.theme_manager.set_theme(theme_name)
    }

    pub fn get_available_themes(&self) -> Vec<String> {
        self.theme_manager.list_themes()
    }

    fn style_for(&self, field: Field, text: &str) -> &'static str {
        match field {
            Field::Score => "score",
            Field::Up | Field::Down => "indicator",
            Field::HighScore => "high_score",
            Field::Status if text == StatusLine::GameOver.to_string() => "game_over",
            Field::Status => "status",
        }
    }
}

impl Screen for Display {
    fn show_text(&mut self, field: Field, text: &str) {
        self.fields.entry(field).or_default().text = text.to_string();
    }

    fn set_visible(&mut self, field: Field, visible: bool) {
        self.fields.entry(field).or_default().visible = visible;
    }
}

pub fn statistics_lines(stats: &SessionStatistics, high_score: u32) -> Vec<String> {
    let mut lines = vec![
        format!("Rounds played: {}", stats.rounds_played),
        format!("Prompts hit: {}", stats.total_hits),
        format!("Best this session: {}", stats.best_score),
        format!("Average score: {:.1}", stats.average_score()),
        format!("High score: {}", high_score),
        format!("Session time: {}", stats.get_session_time_formatted()),
    ];
    if let Some(last) = stats.last_score {
        lines.insert(3, format!("Last round: {}", last));
    }
    lines
}

/// Newest first, as handed out by `EventLogger::get_recent_events`.
pub fn recent_event_lines(events: &[&GameEvent]) -> Vec<String> {
    events
        .iter()
        .map(|event| {
            format!(
                "{} {:?} {}",
                event.timestamp.format("%H:%M:%S"),
                event.event_type,
                event.data
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{apply_view, GameRules, GameState, ViewModel};

    #[test]
    fn test_display_creation() {
        let display = Display::new(ThemeManager::new(), 32);
        assert!(display.is_ok());
    }

    #[test]
    fn test_frame_follows_layout() {
        let mut display = Display::new(ThemeManager::new(), 32).unwrap();
        let mut state = GameState::new(&GameRules::default());
        state.score_shown = true;
        state.score = 3;
        state.revealed = Some(crate::core::Direction::Up);

        apply_view(&mut display, &ViewModel::from_state(&state));
        let frame = display.frame();

        assert_eq!(frame.len(), 5);
        assert!(frame[0].contains("Score: 3"));
        assert!(frame[1].contains("Up"));
        assert_eq!(frame[2].trim(), "");
        assert!(frame[3].contains("Press select to start"));
        assert_eq!(frame[4].trim(), "");
    }

    #[test]
    fn test_hidden_field_keeps_text() {
        let mut display = Display::new(ThemeManager::new(), 24).unwrap();
        display.show_text(Field::HighScore, "High Score: 8");
        display.set_visible(Field::HighScore, false);
        assert_eq!(display.frame()[2].trim(), "");

        display.set_visible(Field::HighScore, true);
        assert!(display.frame()[2].contains("High Score: 8"));
    }

    #[test]
    fn test_status_style() {
        let display = Display::new(ThemeManager::new(), 24).unwrap();
        assert_eq!(display.style_for(Field::Status, "Game over"), "game_over");
        assert_eq!(display.style_for(Field::Status, "Time interval: 990"), "status");
        assert_eq!(display.style_for(Field::Down, "Down"), "indicator");
    }

    #[test]
    fn test_statistics_lines() {
        let mut stats = SessionStatistics::default();
        assert_eq!(statistics_lines(&stats, 4).len(), 6);

        stats.record_round(2);
        let lines = statistics_lines(&stats, 4);
        assert_eq!(lines.len(), 7);
        assert_eq!(lines[3], "Last round: 2");
        assert_eq!(lines[5], "High score: 4");
    }

    #[test]
    fn test_recent_event_lines() {
        use crate::core::{Direction, EventLogger, GameEventHandler};

        let mut logger = EventLogger::default();
        logger.handle_event(&GameEvent::round_started(1000));
        logger.handle_event(&GameEvent::hit(Direction::Up, 1));
        logger.handle_event(&GameEvent::round_ended(1, 1));

        let lines = recent_event_lines(&logger.get_recent_events(2));

        assert_eq!(lines.len(), 2);
        assert!(lines[0].contains("RoundEnded"));
        assert!(lines[1].contains("Hit"));
        assert!(lines[1].contains("\"score\":1"));
    }
}
