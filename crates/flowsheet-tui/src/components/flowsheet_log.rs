//! FlowsheetLog component — pending queue on top, logged plays below.

use chrono::Local;
use ratatui::crossterm::event::{
    KeyCode, KeyEvent, KeyEventKind, MouseButton, MouseEvent, MouseEventKind,
};
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::{
    action::{Action, ComponentId},
    app_state::AppState,
    component::Component,
    theme::{
        C_MUTED, C_ON_AIR, C_PRIMARY, C_QUEUED, C_SECONDARY, C_SELECTION_BG, C_SOURCE_ROTATION,
    },
    widgets::{
        album_row::fit,
        pane_chrome::{pane_chrome, Badge},
        scrollable_list::ScrollableList,
    },
};

/// Index into `AppState::queue` or `AppState::flowsheet`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogRow {
    Queued(usize),
    Logged(usize),
}

pub struct FlowsheetLog {
    list: ScrollableList<LogRow>,
}

impl FlowsheetLog {
    pub fn new() -> Self {
        Self {
            list: ScrollableList::unfiltered(),
        }
    }

    pub fn selected_row(&self) -> Option<LogRow> {
        self.list.selected_item().copied()
    }

    fn render_row(row: LogRow, state: &AppState, width: usize) -> Line<'static> {
        match row {
            LogRow::Queued(i) => {
                let Some(q) = state.queue.get(i) else {
                    return Line::default();
                };
                let req = if q.submission.request { " REQ" } else { "" };
                let text = format!(
                    "{}  {}{}",
                    q.queued_at.format("%H:%M"),
                    q.submission.display(),
                    req
                );
                Line::from(vec![
                    Span::styled("⋯ ", Style::default().fg(C_QUEUED)),
                    Span::styled(fit(&text, width.saturating_sub(2)), Style::default().fg(C_QUEUED)),
                ])
            }
            LogRow::Logged(i) => {
                let Some(e) = state.flowsheet.get(i) else {
                    return Line::default();
                };
                let time = e.play_time.with_timezone(&Local).format("%H:%M").to_string();
                let mut tail = String::new();
                if e.request_flag {
                    tail.push_str(" REQ");
                }
                let track = if e.track_title.is_empty() { "?" } else { e.track_title.as_str() };
                let body = if e.album_title.is_empty() {
                    format!("{} – {}", e.artist_name, track)
                } else {
                    format!("{} – {} ({})", e.artist_name, track, e.album_title)
                };
                let rot_w = if e.rotation.is_some() { 3 } else { 0 };
                let body_w = width.saturating_sub(time.len() + 4 + tail.len() + rot_w);
                let mut spans = vec![
                    Span::styled("● ", Style::default().fg(C_ON_AIR)),
                    Span::styled(format!("{}  ", time), Style::default().fg(C_SECONDARY)),
                    Span::styled(fit(&body, body_w), Style::default().fg(C_PRIMARY)),
                    Span::styled(tail, Style::default().fg(C_QUEUED).add_modifier(Modifier::BOLD)),
                ];
                if let Some(bin) = e.rotation {
                    spans.push(Span::styled(
                        format!(" {}", bin.code()),
                        Style::default().fg(C_SOURCE_ROTATION),
                    ));
                }
                Line::from(spans)
            }
        }
    }
}

impl Default for FlowsheetLog {
    fn default() -> Self {
        Self::new()
    }
}

impl Component for FlowsheetLog {
    fn id(&self) -> ComponentId {
        ComponentId::FlowsheetLog
    }

    fn handle_key(&mut self, key: KeyEvent, _state: &AppState) -> Vec<Action> {
        if key.kind == KeyEventKind::Release {
            return vec![];
        }
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => self.list.select_up(1),
            KeyCode::Down | KeyCode::Char('j') => self.list.select_down(1),
            KeyCode::PageUp => self.list.select_up(10),
            KeyCode::PageDown => self.list.select_down(10),
            KeyCode::Home | KeyCode::Char('g') => self.list.select_first(),
            KeyCode::End | KeyCode::Char('G') => self.list.select_last(),
            KeyCode::Enter => {
                if let Some(LogRow::Queued(i)) = self.selected_row() {
                    return vec![Action::PromoteQueued(i)];
                }
            }
            KeyCode::Char('d') | KeyCode::Delete => {
                if let Some(LogRow::Queued(i)) = self.selected_row() {
                    return vec![Action::DropQueued(i)];
                }
            }
            KeyCode::Char('r') => return vec![Action::RefreshFlowsheet],
            _ => {}
        }
        vec![]
    }

    fn handle_mouse(&mut self, event: MouseEvent, area: Rect, _state: &AppState) -> Vec<Action> {
        match event.kind {
            MouseEventKind::ScrollUp => self.list.select_up(1),
            MouseEventKind::ScrollDown => self.list.select_down(1),
            MouseEventKind::Down(MouseButton::Left) => {
                let rel_row = event.row.saturating_sub(area.y + 1) as usize;
                self.list.handle_click(rel_row);
            }
            _ => {}
        }
        vec![]
    }

    fn sync(&mut self, state: &AppState) {
        let rows = (0..state.queue.len())
            .map(LogRow::Queued)
            .chain((0..state.flowsheet.len()).map(LogRow::Logged))
            .collect();
        self.list.set_items(rows);
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect, focused: bool, state: &AppState) {
        let badge = if state.pending_posts > 0 {
            Some(Badge::new(format!("posting {}", state.pending_posts), C_QUEUED))
        } else if !state.queue.is_empty() {
            Some(Badge::new(format!("{} queued", state.queue.len()), C_QUEUED))
        } else {
            None
        };
        let block = pane_chrome("flowsheet", Some('2'), focused, badge);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        if self.list.is_empty() {
            frame.render_widget(
                Paragraph::new(Span::styled("  nothing logged yet", Style::default().fg(C_MUTED))),
                inner,
            );
            return;
        }

        let height = inner.height as usize;
        let width = inner.width as usize;
        self.list.ensure_visible(height);
        let sel_in_view = self.list.selected_in_view(height);
        let lines: Vec<Line> = self
            .list
            .visible_items(height)
            .into_iter()
            .enumerate()
            .map(|(view_row, (_, row))| {
                let line = Self::render_row(*row, state, width);
                if focused && view_row == sel_in_view {
                    line.style(Style::default().bg(C_SELECTION_BG))
                } else {
                    line
                }
            })
            .collect();
        frame.render_widget(Paragraph::new(lines), inner);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app_state::QueueEntry;
    use flowsheet_proto::records::{FlowsheetEntry, FreeformAlbum, Submission, SubmissionAlbum};
    use ratatui::crossterm::event::KeyModifiers;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn state() -> AppState {
        let mut st = AppState::new(None, "http://test");
        st.queue.push(QueueEntry::new(Submission {
            track_title: "So What".into(),
            request: false,
            album: SubmissionAlbum::Freeform(FreeformAlbum::new("Kind of Blue", "Miles Davis", "")),
        }));
        st.flowsheet.push(FlowsheetEntry {
            id: 1,
            track_title: "Blue in Green".into(),
            artist_name: "Miles Davis".into(),
            album_title: "Kind of Blue".into(),
            record_label: "Columbia".into(),
            request_flag: false,
            rotation: None,
            play_time: chrono::Utc::now(),
        });
        st
    }

    #[test]
    fn test_queue_rows_come_first() {
        let st = state();
        let mut log = FlowsheetLog::new();
        log.sync(&st);
        assert_eq!(log.selected_row(), Some(LogRow::Queued(0)));
        log.handle_key(key(KeyCode::Down), &st);
        assert_eq!(log.selected_row(), Some(LogRow::Logged(0)));
    }

    #[test]
    fn test_enter_promotes_and_d_drops_queued() {
        let st = state();
        let mut log = FlowsheetLog::new();
        log.sync(&st);
        assert!(matches!(
            log.handle_key(key(KeyCode::Enter), &st).as_slice(),
            [Action::PromoteQueued(0)]
        ));
        assert!(matches!(
            log.handle_key(key(KeyCode::Char('d')), &st).as_slice(),
            [Action::DropQueued(0)]
        ));
    }

    #[test]
    fn test_logged_rows_are_read_only() {
        let st = state();
        let mut log = FlowsheetLog::new();
        log.sync(&st);
        log.handle_key(key(KeyCode::End), &st);
        assert!(log.handle_key(key(KeyCode::Enter), &st).is_empty());
        assert!(log.handle_key(key(KeyCode::Char('d')), &st).is_empty());
        assert!(matches!(
            log.handle_key(key(KeyCode::Char('r')), &st).as_slice(),
            [Action::RefreshFlowsheet]
        ));
    }
}
