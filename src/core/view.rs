use serde::{Deserialize, Serialize};

use crate::core::game_state::{Direction, GameState};
use crate::host::{Field, Screen};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldView {
    pub text: String,
    pub visible: bool,
}

impl FieldView {
    fn shown<S: Into<String>>(text: S) -> Self {
        Self {
            text: text.into(),
            visible: true,
        }
    }

    fn toggled<S: Into<String>>(text: S, visible: bool) -> Self {
        Self {
            text: text.into(),
            visible,
        }
    }
}

/// Everything the screen shows, derived from the game state alone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewModel {
    pub status: FieldView,
    pub up: FieldView,
    pub down: FieldView,
    pub score: FieldView,
    pub high_score: FieldView,
}

impl ViewModel {
    pub fn from_state(state: &GameState) -> Self {
        let score_text = if state.score_shown {
            format!("Score: {}", state.score)
        } else {
            String::new()
        };

        let high_score = match state.high_score_shown {
            Some(value) => FieldView::shown(format!("High Score: {}", value)),
            None => FieldView::toggled("", false),
        };

        Self {
            status: FieldView::shown(state.status.to_string()),
            up: FieldView::toggled("Up", state.revealed == Some(Direction::Up)),
            down: FieldView::toggled("Down", state.revealed == Some(Direction::Down)),
            score: FieldView::shown(score_text),
            high_score,
        }
    }

    pub fn field(&self, field: Field) -> &FieldView {
        match field {
            Field::Status => &self.status,
            Field::Up => &self.up,
            Field::Down => &self.down,
            Field::Score => &self.score,
            Field::HighScore => &self.high_score,
        }
    }

    pub fn visible_fields(&self) -> Vec<Field> {
        Field::LAYOUT
            .into_iter()
            .filter(|field| self.field(*field).visible)
            .collect()
    }
}

/// Pushes every field of `view` to the screen.
pub fn apply_view(screen: &mut dyn Screen, view: &ViewModel) {
    for field in Field::ALL {
        let field_view = view.field(field);
        screen.show_text(field, &field_view.text);
        screen.set_visible(field, field_view.visible);
    }
}
