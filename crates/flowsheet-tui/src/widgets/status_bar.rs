//! Status bar — bottom lines with backend state, mode, and keybindings.

use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::action::Workspace;
use crate::app_state::AppState;
use crate::theme::{
    C_ACCENT, C_MODE_FILTER, C_MODE_NORMAL, C_MODE_SEARCH, C_MUTED, C_ON_AIR, C_QUEUED,
    C_SECONDARY,
};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputMode {
    Normal,
    /// Typing into the flowsheet search fields.
    Search,
    /// Typing into a pane filter (catalog, rotation).
    Filter,
}

impl InputMode {
    pub fn label(self) -> &'static str {
        match self {
            Self::Normal => "NORMAL",
            Self::Search => "SEARCH",
            Self::Filter => "FILTER",
        }
    }

    pub fn color(self) -> ratatui::style::Color {
        match self {
            Self::Normal => C_MODE_NORMAL,
            Self::Search => C_MODE_SEARCH,
            Self::Filter => C_MODE_FILTER,
        }
    }
}

/// Backend dot, DJ, queue size and the last error.
pub fn draw_info_bar(frame: &mut Frame, area: Rect, state: &AppState) {
    let conn_span = if state.backend_ok {
        Span::styled("●", Style::default().fg(C_ON_AIR))
    } else {
        Span::styled("○", Style::default().fg(C_ACCENT))
    };
    let dj = match state.dj_id {
        Some(id) => format!("dj {}", id),
        None => "no dj".to_string(),
    };
    let mut spans = vec![
        conn_span,
        Span::raw(" "),
        Span::styled(state.backend_url.clone(), Style::default().fg(C_SECONDARY)),
        Span::styled("  ·  ", Style::default().fg(C_MUTED)),
        Span::styled(dj, Style::default().fg(C_SECONDARY)),
    ];
    if !state.queue.is_empty() {
        spans.push(Span::styled("  ·  ", Style::default().fg(C_MUTED)));
        spans.push(Span::styled(
            format!("{} queued", state.queue.len()),
            Style::default().fg(C_QUEUED),
        ));
    }
    if let Some(err) = &state.last_error {
        spans.push(Span::styled("  ·  ", Style::default().fg(C_MUTED)));
        spans.push(Span::styled(err.clone(), Style::default().fg(C_ACCENT)));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

/// Key hints for the current mode and workspace.
pub fn key_hints(mode: InputMode, workspace: Workspace) -> &'static str {
    match mode {
        InputMode::Normal => match workspace {
            Workspace::Flowsheet => {
                " / search  ↑↓/jk select  Enter promote  d drop  r refresh  Tab/1-2 panes  f library  ? help  q quit"
            }
            Workspace::Library => {
                " / filter  ↑↓/jk select  Enter queue  Ctrl+Enter log now  b bin  d remove  Tab/1-3 panes  f flowsheet  ? help  q quit"
            }
        },
        InputMode::Search => {
            " type to search  Tab next field  ↑↓ pick  Enter queue  Shift+Enter log now  Ctrl+R request  Esc cancel"
        }
        InputMode::Filter => " type to filter  ↑↓ move  Enter keep  Esc clear+close",
    }
}

/// Draw the keybindings footer bar (one row).
pub fn draw_keys_bar(frame: &mut Frame, area: Rect, mode: InputMode, workspace: Workspace) {
    let label = match mode {
        InputMode::Normal => workspace.label(),
        other => other.label(),
    };
    let line = Line::from(vec![
        Span::styled(
            format!(" {} ", label),
            Style::default()
                .fg(mode.color())
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(key_hints(mode, workspace), Style::default().fg(C_MUTED)),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}
