use std::collections::HashSet;

use crate::record::{normalize, DisplayRecord, RawRecord};
use crate::request::SearchRequest;
use crate::view_model::{AppViewModel, PollProgressView};

/// Monotonic per-search counter; resolutions carrying an older value are stale.
pub type SearchGeneration = u64;

pub const TIMEOUT_MESSAGE: &str = "Scraping timed out. Please try again.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SearchPhase {
    #[default]
    Idle,
    Searching,
    Resolved,
}

/// How one search ended, as reported by the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchOutcome {
    Success { records: Vec<RawRecord> },
    TimedOut,
    Failed { message: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportOutcome {
    Saved { count: usize, path: String },
    Failed { message: String },
}

/// Records kept across runs so the last result set can be shown again.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSnapshot {
    pub query: String,
    pub max_results: u32,
    pub records: Vec<DisplayRecord>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppState {
    phase: SearchPhase,
    generation: SearchGeneration,
    in_flight: Option<SearchGeneration>,
    request: Option<SearchRequest>,
    records: Vec<DisplayRecord>,
    selected: Option<String>,
    error: Option<String>,
    progress: Option<PollProgressView>,
    notice: Option<String>,
    dirty: bool,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn view(&self) -> AppViewModel {
        AppViewModel {
            phase: self.phase,
            searching: self.phase == SearchPhase::Searching,
            error: self.error.clone(),
            records: self.records.clone(),
            selected: self.selected_record().cloned(),
            result_count: self.records.len(),
            query: self
                .request
                .as_ref()
                .map(|request| request.query().to_string())
                .unwrap_or_default(),
            max_results: self.request.as_ref().map(SearchRequest::max_results),
            progress: self.progress,
            notice: self.notice.clone(),
            dirty: self.dirty,
        }
    }

    pub fn phase(&self) -> SearchPhase {
        self.phase
    }

    pub fn generation(&self) -> SearchGeneration {
        self.generation
    }

    pub fn is_searching(&self) -> bool {
        self.phase == SearchPhase::Searching
    }

    pub fn records(&self) -> &[DisplayRecord] {
        &self.records
    }

    /// Returns whether anything changed since the last call, clearing the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub(crate) fn set_error(&mut self, message: impl Into<String>) {
        self.error = Some(message.into());
        self.mark_dirty();
    }

    pub(crate) fn set_notice(&mut self, notice: impl Into<String>) {
        self.notice = Some(notice.into());
        self.mark_dirty();
    }

    /// Enters `Searching` under a fresh generation.
    ///
    /// Returns the new generation and the one it superseded, if any.
    pub(crate) fn begin_search(
        &mut self,
        request: SearchRequest,
    ) -> (SearchGeneration, Option<SearchGeneration>) {
        let superseded = self.in_flight.take();
        self.generation += 1;
        self.in_flight = Some(self.generation);
        self.request = Some(request);
        self.phase = SearchPhase::Searching;
        self.error = None;
        self.notice = None;
        self.progress = None;
        self.mark_dirty();
        (self.generation, superseded)
    }

    /// Applies a resolution. Stale generations are ignored and return false.
    pub(crate) fn apply_outcome(
        &mut self,
        generation: SearchGeneration,
        outcome: SearchOutcome,
    ) -> bool {
        if self.in_flight != Some(generation) {
            return false;
        }
        self.in_flight = None;
        self.progress = None;
        match outcome {
            SearchOutcome::Success { records } => {
                // Selection is keyed on the channel URL, so repeats collapse to the first.
                let mut seen = HashSet::new();
                self.records = records
                    .iter()
                    .map(normalize)
                    .filter(|record| seen.insert(record.id.clone()))
                    .collect();
                self.selected = self.records.first().map(|record| record.id.clone());
                self.error = None;
            }
            SearchOutcome::TimedOut => self.clear_with_error(TIMEOUT_MESSAGE.to_string()),
            SearchOutcome::Failed { message } => self.clear_with_error(message),
        }
        self.phase = SearchPhase::Resolved;
        self.mark_dirty();
        true
    }

    fn clear_with_error(&mut self, message: String) {
        self.records.clear();
        self.selected = None;
        self.error = Some(message);
    }

    pub(crate) fn apply_progress(
        &mut self,
        generation: SearchGeneration,
        attempt: u32,
        max_attempts: u32,
    ) {
        if self.in_flight != Some(generation) {
            return;
        }
        self.progress = Some(PollProgressView {
            attempt,
            max_attempts,
        });
        self.mark_dirty();
    }

    /// Selects a record of the current result set. Unknown ids are ignored.
    pub(crate) fn select(&mut self, id: &str) -> bool {
        if !self.records.iter().any(|record| record.id == id) {
            return false;
        }
        if self.selected.as_deref() != Some(id) {
            self.selected = Some(id.to_string());
            self.mark_dirty();
        }
        true
    }

    pub(crate) fn restore(&mut self, snapshot: SessionSnapshot) {
        self.request = SearchRequest::restored(&snapshot.query, snapshot.max_results);
        self.records = snapshot.records;
        self.selected = self.records.first().map(|record| record.id.clone());
        self.error = None;
        self.phase = SearchPhase::Idle;
        self.mark_dirty();
    }

    fn selected_record(&self) -> Option<&DisplayRecord> {
        let id = self.selected.as_deref()?;
        self.records.iter().find(|record| record.id == id)
    }

    /// Snapshot of the current result set, if the last search succeeded with records.
    pub fn session_snapshot(&self) -> Option<SessionSnapshot> {
        if self.records.is_empty() {
            return None;
        }
        let request = self.request.as_ref()?;
        Some(SessionSnapshot {
            query: request.query().to_string(),
            max_results: request.max_results(),
            records: self.records.clone(),
        })
    }
}
