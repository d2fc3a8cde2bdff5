#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// User submitted the search form.
    SearchSubmitted {
        query: String,
        max_results_text: String,
    },
    /// Engine resolved the search started under `generation`.
    SearchResolved {
        generation: crate::SearchGeneration,
        outcome: crate::SearchOutcome,
    },
    /// Engine finished one status check for `generation`.
    PollProgress {
        generation: crate::SearchGeneration,
        attempt: u32,
        max_attempts: u32,
    },
    /// User picked a record from the result list.
    RecordSelected { id: String },
    /// User asked for a CSV download.
    ExportClicked,
    /// Platform finished writing the CSV artifact.
    ExportFinished(crate::ExportOutcome),
    /// Restore records saved by a previous run.
    RestoreSession(crate::SessionSnapshot),
    /// UI/render tick to coalesce rendering.
    Tick,
    /// Fallback for placeholder wiring.
    NoOp,
}
