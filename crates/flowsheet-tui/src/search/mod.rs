//! Debounced multi-source album search.
//!
//! A [`SearchSession`] belongs to exactly one search widget.  It owns the
//! typed query, the selection cursor, the merged result list, the last
//! catalog rows the backend returned and the generation counter guarding
//! them.  Timers and network calls live outside (the app drives a
//! [`DebounceGate`] and a spawned request per widget); the session only
//! decides what to ask for and whether an answer still applies.

pub mod aggregate;
pub mod cursor;
pub mod debounce;
pub mod generation;
pub mod matching;
pub mod query;
pub mod submit;

use flowsheet_proto::api::CatalogQuery;
use flowsheet_proto::config::{BackendConfig, SearchConfig};
use flowsheet_proto::records::{BinEntry, CatalogAlbum, RotationEntry, Submission};
use tracing::debug;

pub use aggregate::{AggregatedList, Source};
pub use cursor::SelectionCursor;
pub use debounce::DebounceGate;
pub use generation::RequestGeneration;
pub use query::{SearchField, SearchQuery, ALBUM_FIELDS};
pub use submit::{build_submission, route_for, submission_for, Route, RouteKey};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchSettings {
    pub min_local_len: usize,
    pub min_remote_fields: usize,
    pub page_size: u32,
}

impl SearchSettings {
    pub fn from_config(search: &SearchConfig, backend: &BackendConfig) -> Self {
        Self {
            min_local_len: search.min_local_query_len,
            min_remote_fields: search.min_remote_fields,
            page_size: backend.catalog_page_size,
        }
    }
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self::from_config(&SearchConfig::default(), &BackendConfig::default())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchPhase {
    /// Nothing typed.
    Idle,
    /// Text changed since the last settle; the debounce timer is running.
    Typing,
    /// Results reflect the current text.
    Ready,
}

#[derive(Debug)]
pub struct SearchSession {
    query: SearchQuery,
    cursor: SelectionCursor,
    results: AggregatedList,
    catalog: Vec<CatalogAlbum>,
    generation: RequestGeneration,
    settings: SearchSettings,
    phase: SearchPhase,
}

impl SearchSession {
    pub fn new(settings: SearchSettings) -> Self {
        Self {
            query: SearchQuery::default(),
            cursor: SelectionCursor::default(),
            results: AggregatedList::default(),
            catalog: Vec::new(),
            generation: RequestGeneration::new(),
            settings,
            phase: SearchPhase::Idle,
        }
    }

    pub fn query(&self) -> &SearchQuery {
        &self.query
    }

    pub fn results(&self) -> &AggregatedList {
        &self.results
    }

    pub fn selected(&self) -> usize {
        self.cursor.index()
    }

    pub fn phase(&self) -> SearchPhase {
        self.phase
    }

    pub fn generation(&self) -> u64 {
        self.generation.latest()
    }

    /// Update one field.  Returns `true` when the caller should (re)arm the
    /// debounce gate; `false` means the query is now empty and everything
    /// has already been cleared.
    ///
    /// The cursor goes back to the new-entry row: the rows on screen were
    /// built for the old text, so confirming before the next settle must
    /// not pick one of them.
    pub fn edit(&mut self, field: SearchField, value: impl Into<String>) -> bool {
        self.query.set(field, value);
        if self.query.has_text() {
            self.phase = SearchPhase::Typing;
            self.cursor.reset();
            true
        } else {
            self.clear_results();
            false
        }
    }

    pub fn toggle_request(&mut self) {
        self.query.request = !self.query.request;
    }

    /// Debounce expired: recompute local matches and, when enough album
    /// fields are filled, hand back a stamped catalog query to send.
    pub fn settle(
        &mut self,
        bin: &[BinEntry],
        rotation: &[RotationEntry],
    ) -> Option<(u64, CatalogQuery)> {
        if !self.query.has_text() {
            self.clear_results();
            return None;
        }
        self.phase = SearchPhase::Ready;

        let filled = self.query.filled(&ALBUM_FIELDS);
        let request = if filled >= self.settings.min_remote_fields {
            let q = CatalogQuery::new(&self.query.artist, &self.query.album, self.settings.page_size);
            if q.is_empty() {
                None
            } else {
                let generation = self.generation.issue();
                debug!("catalog search gen={} {:?}", generation, q);
                Some((generation, q))
            }
        } else {
            None
        };
        if request.is_none() {
            // Rows from an earlier query no longer describe this text.
            self.generation.invalidate();
            self.catalog.clear();
        }

        self.recompute(bin, rotation);
        request
    }

    /// Apply a catalog response.  Returns `false` (and changes nothing) when
    /// `generation` has been superseded.
    pub fn apply_catalog(
        &mut self,
        generation: u64,
        rows: Vec<CatalogAlbum>,
        bin: &[BinEntry],
        rotation: &[RotationEntry],
    ) -> bool {
        if !self.generation.is_current(generation) {
            debug!(
                "dropping stale catalog response gen={} latest={}",
                generation,
                self.generation.latest()
            );
            return false;
        }
        self.catalog = rows;
        self.recompute(bin, rotation);
        true
    }

    /// A catalog request failed.  The last good rows stay; the return value
    /// says whether the failure belongs to the current request and is worth
    /// reporting.
    pub fn catalog_failed(&self, generation: u64) -> bool {
        self.generation.is_current(generation)
    }

    /// Bin or rotation reloaded underneath an open search.
    pub fn refresh_sources(&mut self, bin: &[BinEntry], rotation: &[RotationEntry]) {
        if self.phase == SearchPhase::Ready {
            self.recompute(bin, rotation);
        }
    }

    pub fn move_up(&mut self) {
        self.cursor.move_up();
    }

    pub fn move_down(&mut self) {
        self.cursor.move_down();
    }

    pub fn select(&mut self, index: usize) {
        self.cursor.select(index);
    }

    /// Build the submission for the highlighted row and return to Idle.
    /// `None` when nothing has been typed.
    pub fn submit(&mut self) -> Option<Submission> {
        if !self.query.has_text() {
            return None;
        }
        let submission = build_submission(&self.results, self.cursor.index(), &self.query);
        self.reset();
        Some(submission)
    }

    /// Back to Idle without submitting.
    pub fn cancel(&mut self) {
        self.reset();
    }

    fn reset(&mut self) {
        self.query.reset();
        self.clear_results();
    }

    fn clear_results(&mut self) {
        self.generation.invalidate();
        self.catalog.clear();
        self.results = AggregatedList::default();
        self.cursor.set_total(0);
        self.cursor.reset();
        self.phase = SearchPhase::Idle;
    }

    fn recompute(&mut self, bin: &[BinEntry], rotation: &[RotationEntry]) {
        self.results = aggregate::aggregate(
            bin,
            rotation,
            &self.catalog,
            &self.query,
            self.settings.min_local_len,
        );
        self.cursor.set_total(self.results.len());
    }
}
