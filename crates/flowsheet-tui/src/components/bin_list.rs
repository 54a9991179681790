//! BinList component — the DJ's personal bin of albums pulled for the show.

use flowsheet_proto::records::BinEntry;
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
    search::{aggregate::overlay_bin_rotation, route_for, submission_for, RouteKey},
    theme::{C_MUTED, C_SELECTION_BG, C_SOURCE_BIN},
    widgets::{
        album_row::album_spans,
        pane_chrome::{pane_chrome, Badge},
        scrollable_list::ScrollableList,
    },
};

pub struct BinList {
    list: ScrollableList<BinEntry>,
}

impl BinList {
    pub fn new() -> Self {
        Self {
            list: ScrollableList::unfiltered(),
        }
    }

    pub fn selected(&self) -> Option<&BinEntry> {
        self.list.selected_item()
    }
}

impl Default for BinList {
    fn default() -> Self {
        Self::new()
    }
}

impl Component for BinList {
    fn id(&self) -> ComponentId {
        ComponentId::Bin
    }

    fn handle_key(&mut self, key: KeyEvent, _state: &AppState) -> Vec<Action> {
        if key.kind == KeyEventKind::Release {
            return vec![];
        }
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => self.list.select_up(1),
            KeyCode::Down | KeyCode::Char('j') => self.list.select_down(1),
            KeyCode::Home | KeyCode::Char('g') => self.list.select_first(),
            KeyCode::End | KeyCode::Char('G') => self.list.select_last(),
            KeyCode::Enter => {
                if let Some(entry) = self.list.selected_item() {
                    return vec![Action::Submit(
                        submission_for(entry),
                        route_for(key.modifiers, RouteKey::Ctrl),
                    )];
                }
            }
            KeyCode::Char('d') | KeyCode::Delete => {
                if let Some(entry) = self.list.selected_item() {
                    return vec![Action::RemoveFromBin(entry.album_id)];
                }
            }
            KeyCode::Char('r') => return vec![Action::RefreshLibrary],
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
        let mut rows = state.bin.clone();
        overlay_bin_rotation(&mut rows, &state.rotation);
        self.list.set_items(rows);
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect, focused: bool, state: &AppState) {
        let badge = Badge::new(self.list.total_len().to_string(), C_SOURCE_BIN);
        let block = pane_chrome("bin", Some('3'), focused, Some(badge));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        if self.list.is_empty() {
            let msg = if state.dj_id.is_none() {
                "  no dj id configured"
            } else {
                "  bin is empty (b adds from catalog or rotation)"
            };
            frame.render_widget(
                Paragraph::new(Span::styled(msg, Style::default().fg(C_MUTED))),
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
            .map(|(view_row, (_, entry))| {
                let highlighted = focused && view_row == sel_in_view;
                let line = Line::from(album_spans(entry, width, highlighted));
                if highlighted {
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
    use crate::search::Route;
    use flowsheet_proto::records::{ArtistRef, RotationBin, RotationEntry, SubmissionAlbum};
    use ratatui::crossterm::event::KeyModifiers;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn state() -> AppState {
        let mut st = AppState::new(Some(7), "http://test");
        st.bin = vec![
            BinEntry {
                album_id: 5,
                title: "Spiderland".into(),
                artist: ArtistRef::new("Slint"),
                label: "Touch and Go".into(),
                format: "LP".into(),
                rotation: None,
                rotation_id: None,
            },
            BinEntry {
                album_id: 6,
                title: "Laughing Stock".into(),
                artist: ArtistRef::new("Talk Talk"),
                label: "Verve".into(),
                format: "CD".into(),
                rotation: None,
                rotation_id: None,
            },
        ];
        st
    }

    #[test]
    fn test_d_removes_selected() {
        let st = state();
        let mut bin = BinList::new();
        bin.sync(&st);
        bin.handle_key(key(KeyCode::Down), &st);
        assert!(matches!(
            bin.handle_key(key(KeyCode::Char('d')), &st).as_slice(),
            [Action::RemoveFromBin(6)]
        ));
    }

    #[test]
    fn test_enter_routes_by_ctrl() {
        let st = state();
        let mut bin = BinList::new();
        bin.sync(&st);
        assert!(matches!(
            bin.handle_key(key(KeyCode::Enter), &st).as_slice(),
            [Action::Submit(_, Route::Queue)]
        ));
        assert!(matches!(
            bin.handle_key(KeyEvent::new(KeyCode::Enter, KeyModifiers::CONTROL), &st)
                .as_slice(),
            [Action::Submit(_, Route::Immediate)]
        ));
    }

    #[test]
    fn test_empty_bin_does_nothing() {
        let st = AppState::new(Some(7), "http://test");
        let mut bin = BinList::new();
        bin.sync(&st);
        assert!(bin.selected().is_none());
        assert!(bin.handle_key(key(KeyCode::Enter), &st).is_empty());
    }

    #[test]
    fn test_binned_album_in_rotation_submits_rotation_id() {
        let mut st = state();
        st.rotation = vec![RotationEntry {
            id: 3,
            album_id: 6,
            title: "Laughing Stock".into(),
            artist: ArtistRef::new("Talk Talk"),
            label: "Verve".into(),
            format: "CD".into(),
            bin: RotationBin::Heavy,
        }];
        let mut bin = BinList::new();
        bin.sync(&st);
        bin.handle_key(key(KeyCode::Down), &st);
        match bin.handle_key(key(KeyCode::Enter), &st).as_slice() {
            [Action::Submit(sub, Route::Queue)] => match &sub.album {
                SubmissionAlbum::Existing(a) => {
                    assert_eq!(a.album_id, 6);
                    assert_eq!(a.rotation_id, Some(3));
                }
                other => panic!("expected existing album, got {other:?}"),
            },
            other => panic!("unexpected actions: {other:?}"),
        }

        // dropped from rotation on the next reload
        st.rotation.clear();
        bin.sync(&st);
        assert_eq!(bin.selected().and_then(|e| e.rotation_id), None);
    }
}
