//! FlowsheetSearch component — the four-field search that feeds the flowsheet.
//!
//! Typing re-arms the debounce gate (via `Action::ScheduleSearch`); when it
//! fires the App calls [`FlowsheetSearch::settle`], sends the returned catalog
//! query if any, and hands the response back through
//! [`FlowsheetSearch::apply_catalog`].  Enter or a click submits the
//! highlighted row; Shift routes it straight onto the flowsheet.

use flowsheet_proto::api::CatalogQuery;
use flowsheet_proto::records::{AlbumLike, CatalogAlbum};
use ratatui::crossterm::event::{
    KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
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
    search::{route_for, Route, RouteKey, SearchField, SearchPhase, SearchSession, SearchSettings, Source},
    theme::{
        C_ACCENT, C_MUTED, C_QUEUED, C_SECONDARY, C_SELECTION_BG, C_SOURCE_BIN,
        C_SOURCE_CATALOG, C_SOURCE_ROTATION,
    },
    widgets::{
        album_row::{album_spans, fit},
        filter_input::FilterInput,
        pane_chrome::{pane_chrome, Badge},
        status_bar::InputMode,
    },
};

/// Rows above the results: four fields plus the request line.
const HEADER_ROWS: u16 = 5;

pub struct FlowsheetSearch {
    session: SearchSession,
    inputs: [FilterInput; 4],
    field: SearchField,
    editing: bool,
    scroll: usize,
}

fn slot(field: SearchField) -> usize {
    match field {
        SearchField::Song => 0,
        SearchField::Artist => 1,
        SearchField::Album => 2,
        SearchField::Label => 3,
    }
}

fn source_badge(source: Source) -> Span<'static> {
    let color = match source {
        Source::Favorite => C_SOURCE_BIN,
        Source::Rotation => C_SOURCE_ROTATION,
        Source::Catalog => C_SOURCE_CATALOG,
    };
    Span::styled(format!("{:<4}", source.badge()), Style::default().fg(color))
}

/// Field rows and result rows inside the pane border.
fn split(area: Rect) -> (Rect, Rect) {
    let inner = Rect {
        x: area.x + 1,
        y: area.y + 1,
        width: area.width.saturating_sub(2),
        height: area.height.saturating_sub(2),
    };
    let header_h = HEADER_ROWS.min(inner.height);
    let fields = Rect {
        height: header_h,
        ..inner
    };
    let results = Rect {
        y: inner.y + header_h,
        height: inner.height - header_h,
        ..inner
    };
    (fields, results)
}

impl FlowsheetSearch {
    pub fn new(settings: SearchSettings) -> Self {
        Self {
            session: SearchSession::new(settings),
            inputs: SearchField::ALL
                .map(|f| FilterInput::with_prefix(format!("{:<6}", f.label()), "…")),
            field: SearchField::Song,
            editing: false,
            scroll: 0,
        }
    }

    pub fn session(&self) -> &SearchSession {
        &self.session
    }

    pub fn is_editing(&self) -> bool {
        self.editing
    }

    /// Debounce fired.  Returns the stamped catalog request to send, if any.
    pub fn settle(&mut self, state: &AppState) -> Option<(u64, CatalogQuery)> {
        self.session.settle(&state.bin, &state.rotation)
    }

    pub fn apply_catalog(&mut self, generation: u64, rows: Vec<CatalogAlbum>, state: &AppState) -> bool {
        self.session
            .apply_catalog(generation, rows, &state.bin, &state.rotation)
    }

    pub fn catalog_failed(&self, generation: u64) -> bool {
        self.session.catalog_failed(generation)
    }

    fn start_editing(&mut self, field: SearchField) -> Vec<Action> {
        let was_editing = self.editing;
        self.editing = true;
        self.focus_field(field);
        if was_editing {
            vec![]
        } else {
            vec![Action::EnterInput(InputMode::Search)]
        }
    }

    fn focus_field(&mut self, field: SearchField) {
        self.inputs[slot(self.field)].deactivate();
        self.field = field;
        self.inputs[slot(field)].activate();
    }

    fn stop_editing(&mut self) {
        self.editing = false;
        for input in &mut self.inputs {
            input.clear();
            input.deactivate();
        }
        self.field = SearchField::Song;
        self.scroll = 0;
    }

    fn cancel(&mut self) -> Vec<Action> {
        self.session.cancel();
        self.stop_editing();
        vec![Action::CancelSearch(ComponentId::FlowsheetSearch), Action::LeaveInput]
    }

    fn submit(&mut self, route: Route) -> Vec<Action> {
        match self.session.submit() {
            Some(submission) => {
                self.stop_editing();
                vec![
                    Action::CancelSearch(ComponentId::FlowsheetSearch),
                    Action::Submit(submission, route),
                    Action::LeaveInput,
                ]
            }
            None => vec![],
        }
    }

    fn edit(&mut self, key: KeyEvent) -> Vec<Action> {
        let Some(value) = self.inputs[slot(self.field)].edit(key) else {
            return vec![];
        };
        if self.session.edit(self.field, value) {
            vec![Action::ScheduleSearch(ComponentId::FlowsheetSearch)]
        } else {
            self.scroll = 0;
            vec![Action::CancelSearch(ComponentId::FlowsheetSearch)]
        }
    }

    fn result_lines(&mut self, area: Rect) -> Vec<Line<'static>> {
        let results = self.session.results();
        let height = area.height as usize;
        if !results.has_text() || height == 0 {
            return vec![Line::from(Span::styled(
                "  type song / artist / album / label",
                Style::default().fg(C_MUTED),
            ))];
        }

        let selected = self.session.selected();
        if selected < self.scroll {
            self.scroll = selected;
        } else if selected >= self.scroll + height {
            self.scroll = selected + 1 - height;
        }

        let width = area.width as usize;
        let query = self.session.query();
        let mut lines = Vec::with_capacity(height);
        for row in self.scroll..(results.len() + 1).min(self.scroll + height) {
            let highlighted = row == selected;
            let marker = if highlighted { "▸ " } else { "  " };
            let mut spans = vec![Span::styled(marker, Style::default().fg(C_ACCENT))];
            match results.at(row) {
                None => {
                    let text = format!(
                        "new entry: {} – {} · {}",
                        query.artist.trim(),
                        query.album.trim(),
                        query.label.trim()
                    );
                    spans.push(Span::styled(
                        fit(&text, width.saturating_sub(2)),
                        Style::default().fg(C_QUEUED),
                    ));
                }
                Some(candidate) => {
                    spans.push(source_badge(candidate.source));
                    spans.extend(album_spans(
                        &candidate.record as &dyn AlbumLike,
                        width.saturating_sub(6),
                        highlighted,
                    ));
                }
            }
            let mut line = Line::from(spans);
            if highlighted {
                line = line.style(Style::default().bg(C_SELECTION_BG));
            }
            lines.push(line);
        }
        lines
    }
}

impl Component for FlowsheetSearch {
    fn id(&self) -> ComponentId {
        ComponentId::FlowsheetSearch
    }

    fn handle_key(&mut self, key: KeyEvent, _state: &AppState) -> Vec<Action> {
        if key.kind == KeyEventKind::Release {
            return vec![];
        }

        if !self.editing {
            return match key.code {
                KeyCode::Char('/') | KeyCode::Char('a') | KeyCode::Enter => {
                    self.start_editing(SearchField::Song)
                }
                _ => vec![],
            };
        }

        match key.code {
            KeyCode::Esc => self.cancel(),
            KeyCode::Tab => {
                self.focus_field(self.field.next());
                vec![]
            }
            KeyCode::BackTab => {
                self.focus_field(self.field.prev());
                vec![]
            }
            KeyCode::Up => {
                self.session.move_up();
                vec![]
            }
            KeyCode::Down => {
                self.session.move_down();
                vec![]
            }
            KeyCode::Enter => self.submit(route_for(key.modifiers, RouteKey::Shift)),
            KeyCode::Char('r') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.session.toggle_request();
                vec![]
            }
            _ => self.edit(key),
        }
    }

    fn handle_mouse(&mut self, event: MouseEvent, area: Rect, _state: &AppState) -> Vec<Action> {
        let (fields, results) = split(area);
        match event.kind {
            MouseEventKind::ScrollUp => self.session.move_up(),
            MouseEventKind::ScrollDown => self.session.move_down(),
            MouseEventKind::Down(MouseButton::Left) => {
                if event.row >= fields.y && event.row < fields.y + fields.height.min(4) {
                    let field = SearchField::ALL[(event.row - fields.y) as usize];
                    return self.start_editing(field);
                }
                if event.row >= fields.y + 4 && event.row < fields.y + fields.height {
                    self.session.toggle_request();
                    return vec![];
                }
                if event.row >= results.y
                    && event.row < results.y + results.height
                    && self.session.results().has_text()
                {
                    let row = self.scroll + (event.row - results.y) as usize;
                    if row <= self.session.results().len() {
                        self.session.select(row);
                        return self.submit(route_for(event.modifiers, RouteKey::Shift));
                    }
                }
            }
            _ => {}
        }
        vec![]
    }

    fn sync(&mut self, state: &AppState) {
        self.session.refresh_sources(&state.bin, &state.rotation);
    }

    // The typed query survives; Enter picks it up again.
    fn blur(&mut self) {
        self.editing = false;
        for input in &mut self.inputs {
            input.deactivate();
        }
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect, focused: bool, _state: &AppState) {
        let badge = match self.session.phase() {
            SearchPhase::Idle => None,
            SearchPhase::Typing => Some(Badge::new("…", C_MUTED)),
            SearchPhase::Ready => Some(Badge::new(
                format!("{} found", self.session.results().len()),
                C_SECONDARY,
            )),
        };
        let block = pane_chrome("flowsheet search", Some('1'), focused, badge);
        frame.render_widget(block, area);

        let (fields, results) = split(area);
        for (i, input) in self.inputs.iter().enumerate() {
            if (i as u16) >= fields.height {
                break;
            }
            let row = Rect {
                y: fields.y + i as u16,
                height: 1,
                ..fields
            };
            input.draw(frame, row);
        }
        if fields.height > 4 {
            let request = self.session.query().request;
            let (text, style) = if request {
                (
                    "request ● yes",
                    Style::default().fg(C_QUEUED).add_modifier(Modifier::BOLD),
                )
            } else {
                ("request ○ no", Style::default().fg(C_MUTED))
            };
            let row = Rect {
                y: fields.y + 4,
                height: 1,
                ..fields
            };
            frame.render_widget(Paragraph::new(Span::styled(text, style)), row);
        }

        let lines = self.result_lines(results);
        frame.render_widget(Paragraph::new(lines), results);
    }
}
