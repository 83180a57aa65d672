use colored::{Color, Colorize};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Theme {
    pub name: String,
    pub colors: HashMap<String, ColorConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColorConfig {
    pub foreground: Option<String>,
    pub background: Option<String>,
    pub style: Vec<String>,
}

type Palette<'a> = &'a [(&'a str, &'a str, &'a [&'a str])];

const DEFAULT_PALETTE: Palette<'static> = &[
    ("title", "cyan", &["bold"]),
    ("score", "yellow", &["bold"]),
    ("indicator", "green", &["bold"]),
    ("status", "white", &[]),
    ("game_over", "red", &["bold"]),
    ("high_score", "magenta", &["bold"]),
    ("stats", "yellow", &[]),
    ("info", "blue", &[]),
    ("success", "green", &["bold"]),
    ("error", "red", &["bold"]),
    ("separator", "bright_black", &["dimmed"]),
];

const DARK_PALETTE: Palette<'static> = &[
    ("title", "bright_cyan", &["bold"]),
    ("score", "bright_yellow", &["bold"]),
    ("indicator", "bright_green", &["bold", "underline"]),
    ("status", "bright_white", &[]),
    ("game_over", "bright_red", &["bold"]),
    ("high_score", "bright_magenta", &["bold"]),
    ("stats", "bright_yellow", &[]),
    ("info", "bright_blue", &[]),
    ("success", "bright_green", &["bold"]),
    ("error", "bright_red", &["bold"]),
    ("separator", "white", &["dimmed"]),
];

const MONO_PALETTE: Palette<'static> = &[
    ("title", "white", &["bold"]),
    ("indicator", "white", &["bold", "underline"]),
    ("game_over", "white", &["bold"]),
    ("separator", "white", &["dimmed"]),
];

pub struct ThemeManager {
    themes: HashMap<String, Theme>,
    current_theme: String,
}

impl ThemeManager {
    pub fn new() -> Self {
        let mut manager = Self {
            themes: HashMap::new(),
            current_theme: "default".to_string(),
        };

        manager.add_palette("default", DEFAULT_PALETTE);
        manager.add_palette("dark", DARK_PALETTE);
        manager.add_palette("mono", MONO_PALETTE);
        manager
    }

    pub fn set_theme(&mut self, theme_name: &str) -> bool {
        if self.themes.contains_key(theme_name) {
            self.current_theme = theme_name.to_string();
            true
        } else {
            false
        }
    }

    pub fn current_theme_name(&self) -> &str {
        &self.current_theme
    }

    pub fn add_theme(&mut self, theme: Theme) {
        self.themes.insert(theme.name.clone(), theme);
    }

    pub fn apply_style(&self, text: &str, style_name: &str) -> String {
        let Some(color_config) = self
            .themes
            .get(&self.current_theme)
            .and_then(|theme| theme.colors.get(style_name))
        else {
            return text.to_string();
        };

        let mut styled = text.normal();

        if let Some(color) = color_config.foreground.as_deref().and_then(parse_color) {
            styled = styled.color(color);
        }
        if let Some(color) = color_config.background.as_deref().and_then(parse_color) {
            styled = styled.on_color(color);
        }

        for style in &color_config.style {
            styled = match style.as_str() {
                "bold" => styled.bold(),
                "italic" => styled.italic(),
                "underline" => styled.underline(),
                "dimmed" => styled.dimmed(),
                "reversed" => styled.reversed(),
                _ => styled,
            };
        }

        styled.to_string()
    }

    pub fn list_themes(&self) -> Vec<String> {
        let mut names: Vec<String> = self.themes.keys().cloned().collect();
        names.sort();
        names
    }

    fn add_palette(&mut self, name: &str, palette: Palette<'_>) {
        let colors = palette
            .iter()
            .map(|(style, foreground, modifiers)| {
                (
                    style.to_string(),
                    ColorConfig {
                        foreground: Some(foreground.to_string()),
                        background: None,
                        style: modifiers.iter().map(|m| m.to_string()).collect(),
                    },
                )
            })
            .collect();

        self.add_theme(Theme {
            name: name.to_string(),
            colors,
        });
    }
}

impl Default for ThemeManager {
    fn default() -> Self {
        Self::new()
    }
}

fn parse_color(color_name: &str) -> Option<Color> {
    match color_name.to_lowercase().as_str() {
        "black" => Some(Color::Black),
        "red" => Some(Color::Red),
        "green" => Some(Color::Green),
        "yellow" => Some(Color::Yellow),
        "blue" => Some(Color::Blue),
        "magenta" => Some(Color::Magenta),
        "cyan" => Some(Color::Cyan),
        "white" => Some(Color::White),
        "bright_black" => Some(Color::BrightBlack),
        "bright_red" => Some(Color::BrightRed),
        "bright_green" => Some(Color::BrightGreen),
        "bright_yellow" => Some(Color::BrightYellow),
        "bright_blue" => Some(Color::BrightBlue),
        "bright_magenta" => Some(Color::BrightMagenta),
        "bright_cyan" => Some(Color::BrightCyan),
        "bright_white" => Some(Color::BrightWhite),
        _ => None,
    }
}
