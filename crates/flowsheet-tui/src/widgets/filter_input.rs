//! FilterInput — wraps tui-input for the one-line text fields in panes.

use ratatui::crossterm::event::{Event, KeyCode, KeyEvent};
use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};
use tui_input::{backend::crossterm::EventHandler, Input};

use crate::theme::{C_FILTER_BG, C_FILTER_FG, C_MUTED, C_SECONDARY};

#[derive(Debug, PartialEq)]
pub enum FilterAction {
    Changed(String),
    Confirmed,
    Cancelled,
    None,
}

pub struct FilterInput {
    input: Input,
    active: bool,
    prefix: String,
    placeholder: String,
}

impl FilterInput {
    pub fn new(placeholder: impl Into<String>) -> Self {
        Self::with_prefix("/", placeholder)
    }

    pub fn with_prefix(prefix: impl Into<String>, placeholder: impl Into<String>) -> Self {
        Self {
            input: Input::default(),
            active: false,
            prefix: prefix.into(),
            placeholder: placeholder.into(),
        }
    }

    pub fn activate(&mut self) {
        self.active = true;
    }

    pub fn deactivate(&mut self) {
        self.active = false;
    }

    pub fn clear(&mut self) {
        self.input = Input::default();
    }

    pub fn text(&self) -> &str {
        self.input.value()
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn is_empty(&self) -> bool {
        self.input.value().is_empty()
    }

    /// Feed an editing key to the input.  Returns the new value when the text
    /// changed (cursor moves return `None`).
    pub fn edit(&mut self, key: KeyEvent) -> Option<String> {
        let before = self.input.value().to_string();
        self.input.handle_event(&Event::Key(key));
        let after = self.input.value();
        (after != before).then(|| after.to_string())
    }

    /// Handle a key event. Returns what happened.
    ///
    /// Esc behaviour:
    ///   - If the input has text: clear the text, emit `Changed("")` (keeps filter open but empty)
    ///   - If the input is already empty: deactivate and emit `Cancelled`
    pub fn handle_key(&mut self, key: KeyEvent) -> FilterAction {
        match key.code {
            KeyCode::Esc => {
                if !self.input.value().is_empty() {
                    self.clear();
                    FilterAction::Changed(String::new())
                } else {
                    self.deactivate();
                    FilterAction::Cancelled
                }
            }
            KeyCode::Enter => {
                self.deactivate();
                FilterAction::Confirmed
            }
            _ => match self.edit(key) {
                Some(value) => FilterAction::Changed(value),
                None => FilterAction::None,
            },
        }
    }

    /// Render the input bar into `area`.  The cursor is shown only when the
    /// input is active.
    pub fn draw(&self, frame: &mut Frame, area: Rect) {
        if area.width == 0 || area.height == 0 {
            return;
        }
        let lead = self.prefix.chars().count() as u16 + 1;
        let scroll = self
            .input
            .visual_scroll(area.width.saturating_sub(lead + 2) as usize);
        let value = self.input.value();
        let prefix = Span::styled(format!("{} ", self.prefix), Style::default().fg(C_SECONDARY));
        let body = if value.is_empty() {
            Span::styled(self.placeholder.clone(), Style::default().fg(C_MUTED))
        } else {
            let shown: String = value.chars().skip(scroll).collect();
            Span::styled(shown, Style::default().fg(C_FILTER_FG))
        };

        let bg = if self.active {
            Style::default().bg(C_FILTER_BG)
        } else {
            Style::default()
        };
        frame.render_widget(Paragraph::new(Line::from(vec![prefix, body])).style(bg), area);

        if self.active {
            let cursor_x = area.x + lead + (self.input.visual_cursor().saturating_sub(scroll)) as u16;
            frame.set_cursor_position((cursor_x.min(area.x + area.width - 1), area.y));
        }
    }
}

impl Default for FilterInput {
    fn default() -> Self {
        Self::new("filter...")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::crossterm::event::KeyModifiers;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn type_str(input: &mut FilterInput, s: &str) {
        for c in s.chars() {
            input.handle_key(key(KeyCode::Char(c)));
        }
    }

    #[test]
    fn test_typing_reports_changes() {
        let mut input = FilterInput::default();
        assert_eq!(
            input.handle_key(key(KeyCode::Char('a'))),
            FilterAction::Changed("a".into())
        );
        assert_eq!(input.handle_key(key(KeyCode::Left)), FilterAction::None);
        assert_eq!(input.text(), "a");
    }

    #[test]
    fn test_esc_clears_then_cancels() {
        let mut input = FilterInput::default();
        input.activate();
        type_str(&mut input, "kind");
        assert_eq!(
            input.handle_key(key(KeyCode::Esc)),
            FilterAction::Changed(String::new())
        );
        assert!(input.is_active());
        assert_eq!(input.handle_key(key(KeyCode::Esc)), FilterAction::Cancelled);
        assert!(!input.is_active());
    }

    #[test]
    fn test_enter_confirms() {
        let mut input = FilterInput::default();
        input.activate();
        type_str(&mut input, "x");
        assert_eq!(input.handle_key(key(KeyCode::Enter)), FilterAction::Confirmed);
        assert!(!input.is_active());
        assert_eq!(input.text(), "x");
    }
}
