use crate::{DisplayRecord, SearchPhase};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollProgressView {
    pub attempt: u32,
    pub max_attempts: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppViewModel {
    pub phase: SearchPhase,
    pub searching: bool,
    pub error: Option<String>,
    pub records: Vec<DisplayRecord>,
    pub selected: Option<DisplayRecord>,
    pub result_count: usize,
    pub query: String,
    pub max_results: Option<u32>,
    pub progress: Option<PollProgressView>,
    pub notice: Option<String>,
    pub dirty: bool,
}

impl AppViewModel {
    /// One-line summary shown under the search form; `None` while an error is displayed.
    pub fn status_line(&self) -> Option<String> {
        if self.searching {
            return Some("Searching for channels...".to_string());
        }
        if self.result_count > 0 {
            return Some(format!("{} Results Found", self.result_count));
        }
        if self.error.is_none() {
            return Some("No results found. Try searching for channels.".to_string());
        }
        None
    }
}
