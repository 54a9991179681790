//! App — component-based event loop.
//!
//! Architecture:
//! - `App` owns all components and `AppState` (shared read-only data for components).
//! - A `tokio::mpsc` channel carries `AppMessage` events in from background tasks:
//!   terminal input, debounce timers and backend responses.
//! - The event loop draws each frame, then awaits the next message.
//! - Components return `Vec<Action>`; App dispatches each Action.
//! - Backend calls run as spawned tasks and report back through the channel;
//!   nothing but the loop touches `AppState`.

use std::io;
use std::time::Duration;

use anyhow::Context;
use flowsheet_proto::api::{BackendClient, CatalogQuery};
use flowsheet_proto::config::Config;
use flowsheet_proto::records::{
    AlbumId, BinEntry, CatalogAlbum, FlowsheetEntry, RotationEntry, Submission,
};
use ratatui::crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
        KeyModifiers, MouseEvent, MouseEventKind,
    },
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    widgets::Block,
    Frame, Terminal,
};
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

use crate::{
    action::{Action, ComponentId, Workspace},
    app_state::{AppState, QueueEntry},
    component::Component,
    components::{BinList, CatalogBrowser, FlowsheetLog, FlowsheetSearch, HelpOverlay, RotationTable},
    search::{DebounceGate, Route, SearchSettings},
    theme::C_BG,
    widgets::{
        status_bar::{self, InputMode},
        toast::ToastManager,
    },
    workspace::WorkspaceManager,
};

/// How often the flowsheet log is re-fetched so entries logged from other
/// consoles show up.
const FLOWSHEET_REFRESH: Duration = Duration::from_secs(30);

// ── Internal event bus ────────────────────────────────────────────────────────

pub(crate) enum AppMessage {
    Event(Event),
    /// A search widget's debounce gate expired.
    SearchDue(ComponentId),
    CatalogResults {
        target: ComponentId,
        generation: u64,
        rows: Vec<CatalogAlbum>,
    },
    CatalogFailed {
        target: ComponentId,
        generation: u64,
        error: String,
    },
    RotationLoaded(Vec<RotationEntry>),
    BinLoaded(Vec<BinEntry>),
    FlowsheetLoaded(Vec<FlowsheetEntry>),
    EntryLogged(FlowsheetEntry),
    EntryFailed {
        submission: Submission,
        error: String,
    },
    /// A bin add/remove went through; carries the toast text.
    BinChanged(String),
    LoadFailed {
        what: &'static str,
        error: String,
    },
}

/// Last drawn rectangle of every pane, for mouse hit-testing.
#[derive(Debug, Clone, Default)]
struct PaneAreas {
    search: Rect,
    log: Rect,
    catalog: Rect,
    rotation: Rect,
    bin: Rect,
}

pub struct App {
    state: AppState,
    client: BackendClient,
    flowsheet_page_size: u32,

    wm: WorkspaceManager,
    toast: ToastManager,

    search: FlowsheetSearch,
    log: FlowsheetLog,
    catalog: CatalogBrowser,
    rotation: RotationTable,
    bin: BinList,
    help_overlay: HelpOverlay,

    search_gate: DebounceGate,
    catalog_gate: DebounceGate,
    rotation_gate: DebounceGate,

    tx: mpsc::Sender<AppMessage>,
    rx: Option<mpsc::Receiver<AppMessage>>,

    pane_areas: PaneAreas,
    should_quit: bool,
}

impl App {
    pub fn new(config: &Config, client: BackendClient) -> Self {
        let (tx, rx) = mpsc::channel::<AppMessage>(1024);
        let settings = SearchSettings::from_config(&config.search, &config.backend);
        let state = AppState::new(config.session.dj_id, client.base_url());
        Self {
            state,
            client,
            flowsheet_page_size: config.backend.flowsheet_page_size,
            wm: WorkspaceManager::new(),
            toast: ToastManager::new(),
            search: FlowsheetSearch::new(settings),
            log: FlowsheetLog::new(),
            catalog: CatalogBrowser::new(settings.page_size),
            rotation: RotationTable::new(),
            bin: BinList::new(),
            help_overlay: HelpOverlay::new(),
            search_gate: DebounceGate::new(config.search.flowsheet_debounce()),
            catalog_gate: DebounceGate::new(config.search.catalog_debounce()),
            rotation_gate: DebounceGate::new(config.search.rotation_debounce()),
            tx,
            rx: Some(rx),
            pane_areas: PaneAreas::default(),
            should_quit: false,
        }
    }

    pub async fn run(mut self) -> anyhow::Result<()> {
        let mut rx = self.rx.take().context("event loop already started")?;

        debug!("run(): enabling raw mode");
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;
        debug!("run(): terminal created, size={:?}", terminal.size());

        // ── Background task: keyboard/mouse events ────────────────────────────
        let event_tx = self.tx.clone();
        tokio::task::spawn_blocking(move || loop {
            match event::read() {
                Ok(ev) => {
                    if event_tx.blocking_send(AppMessage::Event(ev)).is_err() {
                        break;
                    }
                }
                Err(e) => {
                    error!("terminal event read failed: {}", e);
                    break;
                }
            }
        });

        info!("backend {}", self.state.backend_url);
        self.load_library();

        // Toast expiry.
        let mut toast_tick = tokio::time::interval(Duration::from_millis(250));
        toast_tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

        // First tick fires immediately and does the initial flowsheet load.
        let mut flowsheet_refresh = tokio::time::interval(FLOWSHEET_REFRESH);
        flowsheet_refresh.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

        // ── Main loop ─────────────────────────────────────────────────────────
        let mut needs_redraw = true;
        loop {
            if needs_redraw {
                terminal.draw(|f| self.draw(f))?;
            }
            needs_redraw = false;

            if self.should_quit {
                break;
            }

            tokio::select! {
                Some(msg) = rx.recv() => {
                    const MAX_DRAIN: usize = 256;
                    let mut redraw = self.handle_message(msg);
                    let mut drained = 0usize;
                    while drained < MAX_DRAIN {
                        let Ok(next) = rx.try_recv() else { break };
                        drained += 1;
                        redraw |= self.handle_message(next);
                    }
                    needs_redraw = redraw;
                }

                _ = toast_tick.tick() => {
                    if !self.toast.is_empty() {
                        self.toast.tick();
                        needs_redraw = true;
                    }
                }

                _ = flowsheet_refresh.tick() => {
                    self.load_flowsheet();
                }
            }

            if self.should_quit {
                break;
            }
        }

        // ── Teardown ──────────────────────────────────────────────────────────
        self.search_gate.cancel();
        self.catalog_gate.cancel();
        self.rotation_gate.cancel();
        disable_raw_mode()?;
        execute!(
            terminal.backend_mut(),
            LeaveAlternateScreen,
            DisableMouseCapture
        )?;
        terminal.show_cursor()?;

        Ok(())
    }

    // ── Message handling ─────────────────────────────────────────────────────

    /// Returns whether the screen needs a redraw.
    fn handle_message(&mut self, msg: AppMessage) -> bool {
        match msg {
            AppMessage::Event(ev) => match ev {
                Event::Key(key) => {
                    if key.kind == KeyEventKind::Release {
                        return false;
                    }
                    for a in self.handle_key(key) {
                        self.dispatch(a);
                    }
                }
                Event::Mouse(mouse) => {
                    for a in self.handle_mouse(mouse) {
                        self.dispatch(a);
                    }
                }
                Event::Resize(w, h) => self.dispatch(Action::Resize(w, h)),
                _ => return false,
            },

            AppMessage::SearchDue(id) => self.on_search_due(id),

            AppMessage::CatalogResults {
                target,
                generation,
                rows,
            } => {
                self.state.backend_ok = true;
                let applied = match target {
                    ComponentId::FlowsheetSearch => {
                        self.search.apply_catalog(generation, rows, &self.state)
                    }
                    ComponentId::Catalog => {
                        self.catalog.apply_results(generation, rows, &self.state)
                    }
                    _ => false,
                };
                if !applied {
                    debug!("dropped catalog rows for {:?} gen={}", target, generation);
                }
            }

            AppMessage::CatalogFailed {
                target,
                generation,
                error,
            } => {
                let current = match target {
                    ComponentId::FlowsheetSearch => self.search.catalog_failed(generation),
                    ComponentId::Catalog => self.catalog.catalog_failed(generation),
                    _ => false,
                };
                if current {
                    self.note_failure("catalog search", error);
                }
            }

            AppMessage::RotationLoaded(rows) => {
                info!("rotation loaded: {} albums", rows.len());
                self.state.backend_ok = true;
                self.state.rotation = rows;
                self.sync_all();
            }

            AppMessage::BinLoaded(rows) => {
                info!("bin loaded: {} albums", rows.len());
                self.state.backend_ok = true;
                self.state.bin = rows;
                self.sync_all();
            }

            AppMessage::FlowsheetLoaded(rows) => {
                self.state.backend_ok = true;
                self.state.flowsheet = rows;
                self.sync_all();
            }

            AppMessage::EntryLogged(entry) => {
                self.finish_post();
                info!("logged entry {}: {}", entry.id, entry.track_title);
                self.toast
                    .success(format!("logged {} – {}", entry.artist_name, entry.track_title));
                self.state.backend_ok = true;
                self.state.flowsheet.insert(0, entry);
                self.sync_all();
            }

            AppMessage::EntryFailed { submission, error } => {
                self.finish_post();
                error!("flowsheet post failed for {:?}: {}", submission.track_title, error);
                self.state.backend_ok = false;
                self.state.last_error = Some(error);
                self.toast
                    .warning(format!("not logged, kept in queue: {}", submission.display()));
                self.state.queue.insert(0, QueueEntry::new(submission));
                self.sync_all();
            }

            AppMessage::BinChanged(msg) => {
                self.toast.success(msg);
                self.load_bin();
            }

            AppMessage::LoadFailed { what, error } => self.note_failure(what, error),
        }
        true
    }

    fn on_search_due(&mut self, id: ComponentId) {
        match id {
            ComponentId::FlowsheetSearch => {
                if let Some((generation, query)) = self.search.settle(&self.state) {
                    self.spawn_catalog_search(id, generation, query);
                }
            }
            ComponentId::Catalog => {
                if let Some((generation, query)) = self.catalog.settle() {
                    self.spawn_catalog_search(id, generation, query);
                }
            }
            ComponentId::Rotation => self.rotation.apply_filter(),
            _ => {}
        }
    }

    fn note_failure(&mut self, what: &str, error: String) {
        warn!("{} failed: {}", what, error);
        self.toast.warning(format!("{} failed: {}", what, error));
        self.state.backend_ok = false;
        self.state.last_error = Some(error);
    }

    fn finish_post(&mut self) {
        self.state.pending_posts = self.state.pending_posts.saturating_sub(1);
        if self.state.pending_posts == 0 {
            self.toast.dismiss_spinner();
        }
    }

    // ── Key handling ──────────────────────────────────────────────────────────

    fn handle_key(&mut self, key: KeyEvent) -> Vec<Action> {
        let normal = self.state.input_mode == InputMode::Normal;

        // Global keys — always active regardless of focus/mode
        match key.code {
            KeyCode::Char('q') if key.modifiers == KeyModifiers::NONE && normal => {
                return vec![Action::Quit];
            }
            KeyCode::Char('c') if key.modifiers == KeyModifiers::CONTROL => {
                return vec![Action::Quit];
            }
            KeyCode::Char('?') if normal => return vec![Action::ToggleHelp],
            _ => {}
        }

        // Help overlay captures all keys when visible
        if self.wm.show_help {
            let actions = self.help_overlay.handle_key(key, &self.state);
            if !actions.is_empty() {
                return actions;
            }
            return vec![Action::ToggleHelp];
        }

        // Tab belongs to the focused field while typing.
        if normal {
            match key.code {
                KeyCode::Tab => return vec![Action::FocusNext],
                KeyCode::BackTab => return vec![Action::FocusPrev],
                KeyCode::Char('f') => {
                    return vec![Action::SwitchWorkspace(self.wm.workspace.other())];
                }
                KeyCode::Char(c @ '1'..='3') => {
                    self.wm.focus_nth(c as usize - '1' as usize);
                    return vec![];
                }
                KeyCode::Char('K') => return vec![Action::ToggleKeys],
                _ => {}
            }
        }

        // Dispatch to the focused component
        match self.wm.focused() {
            Some(id) => {
                let s = &self.state;
                match id {
                    ComponentId::FlowsheetSearch => self.search.handle_key(key, s),
                    ComponentId::FlowsheetLog => self.log.handle_key(key, s),
                    ComponentId::Catalog => self.catalog.handle_key(key, s),
                    ComponentId::Rotation => self.rotation.handle_key(key, s),
                    ComponentId::Bin => self.bin.handle_key(key, s),
                    ComponentId::HelpOverlay => self.help_overlay.handle_key(key, s),
                }
            }
            None => vec![],
        }
    }

    // ── Mouse handling ────────────────────────────────────────────────────────

    fn handle_mouse(&mut self, event: MouseEvent) -> Vec<Action> {
        let is_click = matches!(
            event.kind,
            MouseEventKind::Down(_) | MouseEventKind::ScrollUp | MouseEventKind::ScrollDown
        );
        if !is_click {
            return vec![];
        }
        if self.wm.show_help {
            return vec![Action::ToggleHelp];
        }

        let col = event.column;
        let row = event.row;

        fn hit(r: Rect, col: u16, row: u16) -> bool {
            r.width > 0
                && r.height > 0
                && col >= r.x
                && col < r.x + r.width
                && row >= r.y
                && row < r.y + r.height
        }

        let areas = self.pane_areas.clone();
        let s = &self.state;

        // Focus follows the click.
        macro_rules! click_pane {
            ($id:expr, $component:expr, $area:expr) => {{
                let mut actions = $component.handle_mouse(event, $area, s);
                if self.wm.focused() != Some($id) {
                    actions.insert(0, Action::FocusPane($id));
                }
                return actions;
            }};
        }

        if hit(areas.search, col, row) {
            click_pane!(ComponentId::FlowsheetSearch, self.search, areas.search);
        }
        if hit(areas.log, col, row) {
            click_pane!(ComponentId::FlowsheetLog, self.log, areas.log);
        }
        if hit(areas.catalog, col, row) {
            click_pane!(ComponentId::Catalog, self.catalog, areas.catalog);
        }
        if hit(areas.rotation, col, row) {
            click_pane!(ComponentId::Rotation, self.rotation, areas.rotation);
        }
        if hit(areas.bin, col, row) {
            click_pane!(ComponentId::Bin, self.bin, areas.bin);
        }

        vec![]
    }

    // ── Action dispatcher ─────────────────────────────────────────────────────

    fn dispatch(&mut self, action: Action) {
        // Broadcast to components first so they can react before App state moves.
        let secondary: Vec<Action> = {
            let s = &self.state;
            let mut out = Vec::new();
            out.extend(self.search.on_action(&action, s));
            out.extend(self.log.on_action(&action, s));
            out.extend(self.catalog.on_action(&action, s));
            out.extend(self.rotation.on_action(&action, s));
            out.extend(self.bin.on_action(&action, s));
            out.extend(self.help_overlay.on_action(&action, s));
            out
        };

        self.apply_action(action);

        // Depth-limited to 1 level
        for a in secondary {
            self.apply_action(a);
        }
    }

    fn apply_action(&mut self, action: Action) {
        match &action {
            Action::Resize(..) | Action::Noop => {}
            _ => debug!("apply_action: {:?}", action),
        }
        match action {
            // ── Navigation ────────────────────────────────────────────────────
            Action::FocusNext => {
                self.leave_input();
                self.wm.focus_next();
            }
            Action::FocusPrev => {
                self.leave_input();
                self.wm.focus_prev();
            }
            Action::FocusPane(id) => {
                if self.wm.focused() != Some(id) {
                    self.leave_input();
                    self.wm.focus_set(id);
                    self.state.workspace = self.wm.workspace;
                }
            }
            Action::SwitchWorkspace(ws) => {
                self.leave_input();
                self.wm.set_workspace(ws);
                self.state.workspace = ws;
            }

            // ── Text entry ────────────────────────────────────────────────────
            Action::EnterInput(mode) => self.state.input_mode = mode,
            Action::LeaveInput => self.state.input_mode = InputMode::Normal,

            // ── Debounced searches ────────────────────────────────────────────
            Action::ScheduleSearch(id) => {
                let tx = self.tx.clone();
                if let Some(gate) = self.gate_mut(id) {
                    gate.schedule(async move {
                        let _ = tx.send(AppMessage::SearchDue(id)).await;
                    });
                }
            }
            Action::CancelSearch(id) => {
                if let Some(gate) = self.gate_mut(id) {
                    gate.cancel();
                }
            }

            // ── Flowsheet ─────────────────────────────────────────────────────
            Action::Submit(submission, Route::Immediate) => self.post_entry(submission),
            Action::Submit(submission, Route::Queue) => {
                self.toast.info(format!("queued {}", submission.display()));
                self.state.queue.push(QueueEntry::new(submission));
                self.sync_all();
            }
            Action::PromoteQueued(i) => {
                if i < self.state.queue.len() {
                    let entry = self.state.queue.remove(i);
                    self.sync_all();
                    self.post_entry(entry.submission);
                }
            }
            Action::DropQueued(i) => {
                if i < self.state.queue.len() {
                    let entry = self.state.queue.remove(i);
                    self.toast.info(format!("dropped {}", entry.submission.display()));
                    self.sync_all();
                }
            }
            Action::RefreshFlowsheet => self.load_flowsheet(),

            // ── Library ───────────────────────────────────────────────────────
            Action::AddToBin(album_id) => {
                if self.state.in_bin(album_id) {
                    self.toast.info("already in your bin");
                } else {
                    self.change_bin(album_id, true);
                }
            }
            Action::RemoveFromBin(album_id) => self.change_bin(album_id, false),
            Action::RefreshLibrary => self.load_library(),

            // ── UI toggles ────────────────────────────────────────────────────
            Action::ToggleHelp => self.wm.show_help = !self.wm.show_help,
            Action::ToggleKeys => self.wm.show_keys_bar = !self.wm.show_keys_bar,

            // ── System ────────────────────────────────────────────────────────
            Action::Quit => self.should_quit = true,
            Action::Resize(..) | Action::Noop => {}
        }
    }

    fn gate_mut(&mut self, id: ComponentId) -> Option<&mut DebounceGate> {
        match id {
            ComponentId::FlowsheetSearch => Some(&mut self.search_gate),
            ComponentId::Catalog => Some(&mut self.catalog_gate),
            ComponentId::Rotation => Some(&mut self.rotation_gate),
            _ => None,
        }
    }

    /// Drop out of text entry before focus moves away.
    fn leave_input(&mut self) {
        if self.state.input_mode == InputMode::Normal {
            return;
        }
        match self.wm.focused() {
            Some(ComponentId::FlowsheetSearch) => self.search.blur(),
            Some(ComponentId::Catalog) => self.catalog.blur(),
            Some(ComponentId::Rotation) => self.rotation.blur(),
            Some(ComponentId::FlowsheetLog) => self.log.blur(),
            Some(ComponentId::Bin) => self.bin.blur(),
            Some(ComponentId::HelpOverlay) | None => {}
        }
        self.state.input_mode = InputMode::Normal;
    }

    fn sync_all(&mut self) {
        let s = &self.state;
        self.search.sync(s);
        self.log.sync(s);
        self.catalog.sync(s);
        self.rotation.sync(s);
        self.bin.sync(s);
    }

    // ── Backend calls ─────────────────────────────────────────────────────────

    fn spawn_catalog_search(&self, target: ComponentId, generation: u64, query: CatalogQuery) {
        let client = self.client.clone();
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let msg = match client.search_catalog(&query).await {
                Ok(rows) => AppMessage::CatalogResults {
                    target,
                    generation,
                    rows,
                },
                Err(e) => AppMessage::CatalogFailed {
                    target,
                    generation,
                    error: e.to_string(),
                },
            };
            let _ = tx.send(msg).await;
        });
    }

    fn post_entry(&mut self, submission: Submission) {
        self.state.pending_posts += 1;
        self.toast.spinner(format!("logging {}", submission.display()));
        let client = self.client.clone();
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let msg = match client.add_flowsheet_entry(&submission).await {
                Ok(entry) => AppMessage::EntryLogged(entry),
                Err(e) => AppMessage::EntryFailed {
                    submission,
                    error: e.to_string(),
                },
            };
            let _ = tx.send(msg).await;
        });
    }

    fn change_bin(&mut self, album_id: AlbumId, add: bool) {
        let Some(dj_id) = self.state.dj_id else {
            self.toast.warning("no dj id configured (--dj-id)");
            return;
        };
        let client = self.client.clone();
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let result = if add {
                client.add_to_bin(dj_id, album_id).await
            } else {
                client.remove_from_bin(dj_id, album_id).await
            };
            let msg = match result {
                Ok(()) if add => AppMessage::BinChanged("added to bin".to_string()),
                Ok(()) => AppMessage::BinChanged("removed from bin".to_string()),
                Err(e) => AppMessage::LoadFailed {
                    what: if add { "bin add" } else { "bin remove" },
                    error: e.to_string(),
                },
            };
            let _ = tx.send(msg).await;
        });
    }

    fn load_library(&self) {
        let client = self.client.clone();
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let msg = match client.fetch_rotation().await {
                Ok(rows) => AppMessage::RotationLoaded(rows),
                Err(e) => AppMessage::LoadFailed {
                    what: "rotation",
                    error: e.to_string(),
                },
            };
            let _ = tx.send(msg).await;
        });
        self.load_bin();
    }

    fn load_bin(&self) {
        let Some(dj_id) = self.state.dj_id else {
            return;
        };
        let client = self.client.clone();
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let msg = match client.fetch_bin(dj_id).await {
                Ok(rows) => AppMessage::BinLoaded(rows),
                Err(e) => AppMessage::LoadFailed {
                    what: "bin",
                    error: e.to_string(),
                },
            };
            let _ = tx.send(msg).await;
        });
    }

    fn load_flowsheet(&self) {
        let client = self.client.clone();
        let tx = self.tx.clone();
        let limit = self.flowsheet_page_size;
        tokio::spawn(async move {
            let msg = match client.fetch_flowsheet(limit).await {
                Ok(rows) => AppMessage::FlowsheetLoaded(rows),
                Err(e) => AppMessage::LoadFailed {
                    what: "flowsheet",
                    error: e.to_string(),
                },
            };
            let _ = tx.send(msg).await;
        });
    }

    // ── Drawing ───────────────────────────────────────────────────────────────

    fn draw(&mut self, frame: &mut Frame) {
        let area = frame.area();

        // Base background so gaps between panes are not terminal default.
        frame.render_widget(Block::default().style(Style::default().bg(C_BG)), area);

        let keys_h = if self.wm.show_keys_bar { 1u16 } else { 0 };
        let outer = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Min(0),
                Constraint::Length(1),
                Constraint::Length(keys_h),
            ])
            .split(area);

        self.pane_areas = PaneAreas::default();
        match self.wm.workspace {
            Workspace::Flowsheet => self.draw_flowsheet(frame, outer[0]),
            Workspace::Library => self.draw_library(frame, outer[0]),
        }

        status_bar::draw_info_bar(frame, outer[1], &self.state);
        if self.wm.show_keys_bar {
            status_bar::draw_keys_bar(frame, outer[2], self.state.input_mode, self.wm.workspace);
        }

        if self.wm.show_help {
            self.help_overlay.draw(frame, area, false, &self.state);
        }

        // Topmost layer
        self.toast.draw(frame, area);
    }

    fn draw_flowsheet(&mut self, frame: &mut Frame, area: Rect) {
        let cols = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(area);
        let focused = self.wm.focused();
        self.search.draw(
            frame,
            cols[0],
            focused == Some(ComponentId::FlowsheetSearch),
            &self.state,
        );
        self.log.draw(
            frame,
            cols[1],
            focused == Some(ComponentId::FlowsheetLog),
            &self.state,
        );
        self.pane_areas.search = cols[0];
        self.pane_areas.log = cols[1];
    }

    fn draw_library(&mut self, frame: &mut Frame, area: Rect) {
        let cols = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(area);
        let right = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
            .split(cols[1]);
        let focused = self.wm.focused();
        self.catalog
            .draw(frame, cols[0], focused == Some(ComponentId::Catalog), &self.state);
        self.rotation
            .draw(frame, right[0], focused == Some(ComponentId::Rotation), &self.state);
        self.bin
            .draw(frame, right[1], focused == Some(ComponentId::Bin), &self.state);
        self.pane_areas.catalog = cols[0];
        self.pane_areas.rotation = right[0];
        self.pane_areas.bin = right[1];
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flowsheet_proto::config::{BackendConfig, SessionConfig};
    use flowsheet_proto::records::{ArtistRef, FreeformAlbum, SubmissionAlbum};

    fn app(dj_id: Option<i64>) -> App {
        let mut config = Config::default();
        config.session.dj_id = dj_id;
        // Nothing listens here; spawned requests fail quietly.
        let backend = BackendConfig {
            base_url: "http://127.0.0.1:9".to_string(),
            ..config.backend.clone()
        };
        let client = BackendClient::new(&backend, &SessionConfig::default()).unwrap();
        App::new(&config, client)
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn press(app: &mut App, code: KeyCode) {
        for a in app.handle_key(key(code)) {
            app.dispatch(a);
        }
    }

    fn submission(track: &str) -> Submission {
        Submission {
            track_title: track.into(),
            request: false,
            album: SubmissionAlbum::Freeform(FreeformAlbum::new("Spiderland", "Slint", "Touch and Go")),
        }
    }

    fn album(id: i64) -> CatalogAlbum {
        CatalogAlbum {
            id,
            title: "Kind of Blue".into(),
            artist: ArtistRef::new("Miles Davis"),
            label: "Columbia".into(),
            format: "LP".into(),
            rotation: None,
            rotation_id: None,
        }
    }

    #[tokio::test]
    async fn test_queue_route_keeps_submission_local() {
        let mut app = app(None);
        app.dispatch(Action::Submit(submission("Nosferatu Man"), Route::Queue));
        assert_eq!(app.state.queue.len(), 1);
        assert_eq!(app.state.pending_posts, 0);

        app.dispatch(Action::DropQueued(0));
        assert!(app.state.queue.is_empty());
    }

    #[tokio::test]
    async fn test_failed_post_goes_back_to_queue() {
        let mut app = app(None);
        app.state.pending_posts = 1;
        app.handle_message(AppMessage::EntryFailed {
            submission: submission("Good Morning, Captain"),
            error: "connection refused".into(),
        });
        assert_eq!(app.state.pending_posts, 0);
        assert_eq!(app.state.queue.len(), 1);
        assert!(!app.state.backend_ok);
        assert_eq!(app.state.last_error.as_deref(), Some("connection refused"));
    }

    #[tokio::test]
    async fn test_promote_moves_entry_out_of_queue() {
        let mut app = app(None);
        app.state.queue.push(QueueEntry::new(submission("Washer")));
        app.dispatch(Action::PromoteQueued(0));
        assert!(app.state.queue.is_empty());
        assert_eq!(app.state.pending_posts, 1);
        // out of range is ignored
        app.dispatch(Action::PromoteQueued(3));
        assert_eq!(app.state.pending_posts, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_debounce_collapses_to_one_search_due() {
        let mut app = app(None);
        for _ in 0..3 {
            app.dispatch(Action::ScheduleSearch(ComponentId::Rotation));
            tokio::time::sleep(Duration::from_millis(100)).await;
        }
        tokio::time::sleep(Duration::from_millis(600)).await;
        tokio::task::yield_now().await;

        let rx = app.rx.as_mut().unwrap();
        assert!(matches!(
            rx.try_recv(),
            Ok(AppMessage::SearchDue(ComponentId::Rotation))
        ));
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_search_drops_pending_timer() {
        let mut app = app(None);
        app.dispatch(Action::ScheduleSearch(ComponentId::Catalog));
        app.dispatch(Action::CancelSearch(ComponentId::Catalog));
        tokio::time::sleep(Duration::from_secs(2)).await;
        assert!(app.rx.as_mut().unwrap().try_recv().is_err());
    }

    #[tokio::test]
    async fn test_stale_catalog_rows_are_dropped() {
        let mut app = app(None);
        app.handle_message(AppMessage::CatalogResults {
            target: ComponentId::Catalog,
            generation: 42,
            rows: vec![album(7)],
        });
        assert!(app.catalog.albums().is_empty());
    }

    #[tokio::test]
    async fn test_bin_requires_dj_id() {
        let mut app = app(None);
        app.dispatch(Action::AddToBin(7));
        assert!(app
            .toast
            .messages()
            .any(|(msg, _)| msg.contains("no dj id")));
    }

    #[tokio::test]
    async fn test_workspace_keys_only_in_normal_mode() {
        let mut app = app(None);
        press(&mut app, KeyCode::Char('f'));
        assert_eq!(app.wm.workspace, Workspace::Library);
        press(&mut app, KeyCode::Char('f'));
        assert_eq!(app.wm.workspace, Workspace::Flowsheet);

        // start typing into the flowsheet search; `f` is now text
        press(&mut app, KeyCode::Char('/'));
        assert_eq!(app.state.input_mode, InputMode::Search);
        press(&mut app, KeyCode::Char('f'));
        assert_eq!(app.wm.workspace, Workspace::Flowsheet);
        assert_eq!(app.search.session().query().song, "f");

        press(&mut app, KeyCode::Esc);
        assert_eq!(app.state.input_mode, InputMode::Normal);
        assert!(!app.search.session().query().has_text());
    }

    #[tokio::test]
    async fn test_focus_change_leaves_input_mode() {
        let mut app = app(None);
        press(&mut app, KeyCode::Char('/'));
        assert!(app.search.is_editing());
        app.dispatch(Action::FocusPane(ComponentId::FlowsheetLog));
        assert_eq!(app.state.input_mode, InputMode::Normal);
        assert!(!app.search.is_editing());
        assert_eq!(app.wm.focused(), Some(ComponentId::FlowsheetLog));
    }

    #[tokio::test]
    async fn test_loaded_rotation_reaches_components() {
        let mut app = app(None);
        app.handle_message(AppMessage::RotationLoaded(vec![RotationEntry {
            id: 3,
            album_id: 7,
            title: "Kind of Blue".into(),
            artist: ArtistRef::new("Miles Davis"),
            label: "Columbia".into(),
            format: "LP".into(),
            bin: flowsheet_proto::records::RotationBin::Light,
        }]));
        assert_eq!(app.rotation.visible().len(), 1);
    }
}
