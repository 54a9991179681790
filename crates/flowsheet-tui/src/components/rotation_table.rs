//! RotationTable component — the station's current rotation, filtered locally.
//!
//! Filtering is debounced like the other searches: typing only arms the gate
//! (`ScheduleSearch(Rotation)`), and the list is narrowed when the App calls
//! [`RotationTable::apply_filter`] after the delay.

use flowsheet_proto::records::RotationEntry;
use ratatui::crossterm::event::{
    KeyCode, KeyEvent, KeyEventKind, MouseButton, MouseEvent, MouseEventKind,
};
use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::{
    action::{Action, ComponentId},
    app_state::AppState,
    component::Component,
    search::{
        matching::{query_terms, record_matches},
        route_for, submission_for, RouteKey,
    },
    theme::{C_MUTED, C_SELECTION_BG, C_SOURCE_BIN, C_SOURCE_ROTATION},
    widgets::{
        album_row::album_spans,
        filter_input::{FilterAction, FilterInput},
        pane_chrome::{pane_chrome, Badge},
        scrollable_list::ScrollableList,
        status_bar::InputMode,
    },
};

pub struct RotationTable {
    list: ScrollableList<RotationEntry>,
    filter_input: FilterInput,
}

impl RotationTable {
    pub fn new() -> Self {
        Self {
            list: ScrollableList::new(|entry: &RotationEntry, q: &str| {
                record_matches(entry, &query_terms(q))
            }),
            filter_input: FilterInput::new("artist, title or label…"),
        }
    }

    /// Narrow the list to the text currently typed in the filter.
    pub fn apply_filter(&mut self) {
        let text = self.filter_input.text().to_string();
        self.list.set_filter(&text);
    }

    pub fn visible(&self) -> Vec<&RotationEntry> {
        self.list.filtered().collect()
    }

    fn filtering(&self) -> bool {
        self.filter_input.is_active() || !self.list.filter.is_empty()
    }
}

impl Default for RotationTable {
    fn default() -> Self {
        Self::new()
    }
}

impl Component for RotationTable {
    fn id(&self) -> ComponentId {
        ComponentId::Rotation
    }

    fn handle_key(&mut self, key: KeyEvent, _state: &AppState) -> Vec<Action> {
        if key.kind == KeyEventKind::Release {
            return vec![];
        }

        if self.filter_input.is_active() {
            match key.code {
                KeyCode::Up => {
                    self.list.select_up(1);
                    return vec![];
                }
                KeyCode::Down => {
                    self.list.select_down(1);
                    return vec![];
                }
                _ => {}
            }
            return match self.filter_input.handle_key(key) {
                FilterAction::Changed(_) => vec![Action::ScheduleSearch(ComponentId::Rotation)],
                FilterAction::Confirmed => {
                    // Enter applies without waiting for the gate.
                    self.apply_filter();
                    vec![Action::CancelSearch(ComponentId::Rotation), Action::LeaveInput]
                }
                FilterAction::Cancelled => {
                    self.list.set_filter("");
                    vec![Action::CancelSearch(ComponentId::Rotation), Action::LeaveInput]
                }
                FilterAction::None => vec![],
            };
        }

        match key.code {
            KeyCode::Up | KeyCode::Char('k') => self.list.select_up(1),
            KeyCode::Down | KeyCode::Char('j') => self.list.select_down(1),
            KeyCode::PageUp => self.list.select_up(10),
            KeyCode::PageDown => self.list.select_down(10),
            KeyCode::Home | KeyCode::Char('g') => self.list.select_first(),
            KeyCode::End | KeyCode::Char('G') => self.list.select_last(),
            KeyCode::Char('/') => {
                self.filter_input.activate();
                return vec![Action::EnterInput(InputMode::Filter)];
            }
            KeyCode::Enter => {
                if let Some(entry) = self.list.selected_item() {
                    return vec![Action::Submit(
                        submission_for(entry),
                        route_for(key.modifiers, RouteKey::Ctrl),
                    )];
                }
            }
            KeyCode::Char('b') => {
                if let Some(entry) = self.list.selected_item() {
                    return vec![Action::AddToBin(entry.album_id)];
                }
            }
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
        self.list.set_items(state.rotation.clone());
    }

    fn blur(&mut self) {
        self.filter_input.deactivate();
        self.apply_filter();
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect, focused: bool, state: &AppState) {
        let badge = if self.list.filter.is_empty() {
            Badge::new(self.list.total_len().to_string(), C_SOURCE_ROTATION)
        } else {
            Badge::new(
                format!("{}/{}", self.list.len(), self.list.total_len()),
                C_SOURCE_ROTATION,
            )
        };
        let block = pane_chrome("rotation", Some('2'), focused, Some(badge));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let list_area = if self.filtering() {
            Rect {
                height: inner.height.saturating_sub(1),
                ..inner
            }
        } else {
            inner
        };

        if self.list.is_empty() {
            let msg = if self.list.filter.is_empty() {
                "  rotation is empty"
            } else {
                "  no rotation albums match filter"
            };
            frame.render_widget(
                Paragraph::new(Span::styled(msg, Style::default().fg(C_MUTED))),
                list_area,
            );
        } else {
            let height = list_area.height as usize;
            let width = list_area.width as usize;
            self.list.ensure_visible(height);
            let sel_in_view = self.list.selected_in_view(height);
            let lines: Vec<Line> = self
                .list
                .visible_items(height)
                .into_iter()
                .enumerate()
                .map(|(view_row, (_, entry))| {
                    let highlighted = focused && view_row == sel_in_view;
                    let mark = if state.in_bin(entry.album_id) { "★ " } else { "  " };
                    let mut spans = vec![Span::styled(mark, Style::default().fg(C_SOURCE_BIN))];
                    spans.extend(album_spans(entry, width.saturating_sub(2), highlighted));
                    let line = Line::from(spans);
                    if highlighted {
                        line.style(Style::default().bg(C_SELECTION_BG))
                    } else {
                        line
                    }
                })
                .collect();
            frame.render_widget(Paragraph::new(lines), list_area);
        }

        if self.filtering() && inner.height > 0 {
            let filter_area = Rect {
                y: inner.y + inner.height - 1,
                height: 1,
                ..inner
            };
            self.filter_input.draw(frame, filter_area);
        }
    }
}
