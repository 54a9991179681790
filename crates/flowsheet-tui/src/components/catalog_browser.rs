//! CatalogBrowser component — debounced remote search over the whole library.

use flowsheet_proto::api::CatalogQuery;
use flowsheet_proto::records::CatalogAlbum;
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
use tracing::debug;

use crate::{
    action::{Action, ComponentId},
    app_state::AppState,
    component::Component,
    search::{aggregate::overlay_rotation, route_for, submission_for, RequestGeneration, RouteKey},
    theme::{C_MUTED, C_SECONDARY, C_SELECTION_BG, C_SOURCE_BIN},
    widgets::{
        album_row::album_spans,
        filter_input::{FilterAction, FilterInput},
        pane_chrome::{pane_chrome, Badge},
        scrollable_list::ScrollableList,
        status_bar::InputMode,
    },
};

/// Which backend field the typed text is sent as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SearchMode {
    Artist,
    Album,
    #[default]
    Both,
}

impl SearchMode {
    pub fn next(self) -> Self {
        match self {
            Self::Artist => Self::Album,
            Self::Album => Self::Both,
            Self::Both => Self::Artist,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Artist => "artist",
            Self::Album => "album",
            Self::Both => "artist+album",
        }
    }

    fn query(self, text: &str, n: u32) -> CatalogQuery {
        match self {
            Self::Artist => CatalogQuery::new(text, "", n),
            Self::Album => CatalogQuery::new("", text, n),
            Self::Both => CatalogQuery::new(text, text, n),
        }
    }
}

pub struct CatalogBrowser {
    list: ScrollableList<CatalogAlbum>,
    filter_input: FilterInput,
    mode: SearchMode,
    generation: RequestGeneration,
    page_size: u32,
    loading: bool,
}

impl CatalogBrowser {
    pub fn new(page_size: u32) -> Self {
        Self {
            list: ScrollableList::unfiltered(),
            filter_input: FilterInput::new("search the library…"),
            mode: SearchMode::default(),
            generation: RequestGeneration::new(),
            page_size,
            loading: false,
        }
    }

    pub fn mode(&self) -> SearchMode {
        self.mode
    }

    pub fn albums(&self) -> &[CatalogAlbum] {
        &self.list.items
    }

    /// Debounce fired: stamp and return the query for the current text.
    pub fn settle(&mut self) -> Option<(u64, CatalogQuery)> {
        let text = self.filter_input.text().trim().to_string();
        if text.is_empty() {
            self.clear_results();
            return None;
        }
        let generation = self.generation.issue();
        self.loading = true;
        let query = self.mode.query(&text, self.page_size);
        debug!("catalog browser search gen={} {:?}", generation, query);
        Some((generation, query))
    }

    pub fn apply_results(&mut self, generation: u64, mut rows: Vec<CatalogAlbum>, state: &AppState) -> bool {
        if !self.generation.is_current(generation) {
            return false;
        }
        overlay_rotation(&mut rows, &state.rotation);
        self.list.set_items(rows);
        self.list.select_first();
        self.loading = false;
        true
    }

    /// Returns whether the failed request was the current one.  Rows already
    /// on screen stay.
    pub fn catalog_failed(&mut self, generation: u64) -> bool {
        let current = self.generation.is_current(generation);
        if current {
            self.loading = false;
        }
        current
    }

    fn clear_results(&mut self) {
        self.generation.invalidate();
        self.list.set_items(Vec::new());
        self.loading = false;
    }

    fn text_changed(&mut self, text: &str) -> Vec<Action> {
        if text.trim().is_empty() {
            self.clear_results();
            vec![Action::CancelSearch(ComponentId::Catalog)]
        } else {
            vec![Action::ScheduleSearch(ComponentId::Catalog)]
        }
    }

    fn cycle_mode(&mut self) -> Vec<Action> {
        self.mode = self.mode.next();
        let text = self.filter_input.text().to_string();
        self.text_changed(&text)
    }
}

impl Component for CatalogBrowser {
    fn id(&self) -> ComponentId {
        ComponentId::Catalog
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
                KeyCode::Tab => return self.cycle_mode(),
                _ => {}
            }
            return match self.filter_input.handle_key(key) {
                FilterAction::Changed(q) => self.text_changed(&q),
                FilterAction::Confirmed => vec![Action::LeaveInput],
                FilterAction::Cancelled => {
                    self.clear_results();
                    vec![Action::CancelSearch(ComponentId::Catalog), Action::LeaveInput]
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
            KeyCode::Char('m') => return self.cycle_mode(),
            KeyCode::Enter => {
                if let Some(album) = self.list.selected_item() {
                    return vec![Action::Submit(
                        submission_for(album),
                        route_for(key.modifiers, RouteKey::Ctrl),
                    )];
                }
            }
            KeyCode::Char('b') => {
                if let Some(album) = self.list.selected_item() {
                    return vec![Action::AddToBin(album.id)];
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
                // border + filter row
                let top = area.y + 2;
                if event.row == area.y + 1 {
                    self.filter_input.activate();
                    return vec![Action::EnterInput(InputMode::Filter)];
                }
                if event.row >= top {
                    self.list.handle_click((event.row - top) as usize);
                }
            }
            _ => {}
        }
        vec![]
    }

    fn sync(&mut self, state: &AppState) {
        overlay_rotation(&mut self.list.items, &state.rotation);
    }

    fn blur(&mut self) {
        self.filter_input.deactivate();
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect, focused: bool, state: &AppState) {
        let badge_text = if self.loading {
            format!("{} …", self.mode.label())
        } else {
            self.mode.label().to_string()
        };
        let block = pane_chrome("catalog", Some('1'), focused, Some(Badge::new(badge_text, C_SECONDARY)));
        let inner = block.inner(area);
        frame.render_widget(block, area);
        if inner.height == 0 {
            return;
        }

        let filter_area = Rect { height: 1, ..inner };
        self.filter_input.draw(frame, filter_area);

        let list_area = Rect {
            y: inner.y + 1,
            height: inner.height - 1,
            ..inner
        };
        if self.list.is_empty() {
            let msg = if self.filter_input.is_empty() {
                "  / to search by artist or album"
            } else if self.loading {
                "  searching…"
            } else {
                "  no albums found"
            };
            frame.render_widget(
                Paragraph::new(Span::styled(msg, Style::default().fg(C_MUTED))),
                list_area,
            );
            return;
        }

        let height = list_area.height as usize;
        let width = list_area.width as usize;
        self.list.ensure_visible(height);
        let sel_in_view = self.list.selected_in_view(height);
        let lines: Vec<Line> = self
            .list
            .visible_items(height)
            .into_iter()
            .enumerate()
            .map(|(view_row, (_, album))| {
                let highlighted = view_row == sel_in_view;
                let mark = if state.in_bin(album.id) { "★ " } else { "  " };
                let mut spans = vec![Span::styled(mark, Style::default().fg(C_SOURCE_BIN))];
                spans.extend(album_spans(album, width.saturating_sub(2), highlighted));
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
}
