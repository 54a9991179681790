//! Action enum — all user-initiated intents and internal events.

use flowsheet_proto::records::{AlbumId, Submission};

use crate::search::Route;
use crate::widgets::status_bar::InputMode;

/// Unique identifier for a focusable component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComponentId {
    FlowsheetSearch,
    FlowsheetLog,
    Catalog,
    Rotation,
    Bin,
    HelpOverlay,
}

/// All actions that can flow through the system.
/// Components produce Actions; the App dispatches them.
#[derive(Debug, Clone)]
pub enum Action {
    // ── Navigation ───────────────────────────────────────────────────────────
    FocusNext,
    FocusPrev,
    FocusPane(ComponentId),
    SwitchWorkspace(Workspace),

    // ── Text entry ───────────────────────────────────────────────────────────
    /// A component took the keyboard for typing.
    EnterInput(InputMode),
    /// Back to normal key handling.
    LeaveInput,

    // ── Debounced searches ───────────────────────────────────────────────────
    /// Text changed in a search widget; (re)arm its debounce gate.
    ScheduleSearch(ComponentId),
    /// Drop the pending debounce callback of a search widget.
    CancelSearch(ComponentId),

    // ── Flowsheet ────────────────────────────────────────────────────────────
    Submit(Submission, Route),
    PromoteQueued(usize),
    DropQueued(usize),
    RefreshFlowsheet,

    // ── Library ──────────────────────────────────────────────────────────────
    AddToBin(AlbumId),
    RemoveFromBin(AlbumId),
    RefreshLibrary,

    // ── UI toggles ───────────────────────────────────────────────────────────
    ToggleHelp,
    ToggleKeys,

    // ── System ───────────────────────────────────────────────────────────────
    Quit,
    Resize(u16, u16),
    Noop,
}

/// Which workspace (tab) is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Workspace {
    Flowsheet, // search + log
    Library,   // catalog, rotation, bin
}

impl Workspace {
    pub fn other(self) -> Self {
        match self {
            Self::Flowsheet => Self::Library,
            Self::Library => Self::Flowsheet,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Flowsheet => "FLOWSHEET",
            Self::Library => "LIBRARY",
        }
    }
}
