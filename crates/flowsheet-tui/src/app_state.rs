//! AppState — shared read-only data passed to all components during render/event.
//!
//! Components read this for backend data, but never mutate it.
//! The App event-loop is the only thing that writes to AppState.

use chrono::{DateTime, Local};
use flowsheet_proto::records::{BinEntry, FlowsheetEntry, RotationEntry, Submission};

use crate::action::Workspace;
use crate::widgets::status_bar::InputMode;

/// A submission waiting in the local queue.
#[derive(Debug, Clone)]
pub struct QueueEntry {
    pub submission: Submission,
    pub queued_at: DateTime<Local>,
}

impl QueueEntry {
    pub fn new(submission: Submission) -> Self {
        Self {
            submission,
            queued_at: Local::now(),
        }
    }
}

/// The full shared state of the application.
/// Components read this; only the App event-loop writes to it.
pub struct AppState {
    // ── Backend data ────────────────────────────────────────────────────────
    pub rotation: Vec<RotationEntry>,
    /// The DJ's mail bin (favourites).
    pub bin: Vec<BinEntry>,
    /// Logged plays, newest first.
    pub flowsheet: Vec<FlowsheetEntry>,

    // ── Local ───────────────────────────────────────────────────────────────
    pub queue: Vec<QueueEntry>,
    /// Flowsheet POSTs currently in flight.
    pub pending_posts: usize,

    // ── Session ─────────────────────────────────────────────────────────────
    pub dj_id: Option<i64>,
    pub backend_url: String,
    /// False after the last backend call failed; true again on the next success.
    pub backend_ok: bool,
    pub last_error: Option<String>,

    // ── UI mode ─────────────────────────────────────────────────────────────
    pub workspace: Workspace,
    pub input_mode: InputMode,
}

impl AppState {
    pub fn new(dj_id: Option<i64>, backend_url: impl Into<String>) -> Self {
        Self {
            rotation: Vec::new(),
            bin: Vec::new(),
            flowsheet: Vec::new(),
            queue: Vec::new(),
            pending_posts: 0,
            dj_id,
            backend_url: backend_url.into(),
            backend_ok: true,
            last_error: None,
            workspace: Workspace::Flowsheet,
            input_mode: InputMode::Normal,
        }
    }

    pub fn in_bin(&self, album_id: i64) -> bool {
        self.bin.iter().any(|b| b.album_id == album_id)
    }
}
