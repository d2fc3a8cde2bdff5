use crate::{DisplayRecord, SearchGeneration, SearchRequest};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Submit the request and poll it to resolution under this generation.
    StartSearch {
        generation: SearchGeneration,
        request: SearchRequest,
    },
    /// A newer search superseded this one; its result is no longer wanted.
    CancelSearch { generation: SearchGeneration },
    /// Write the currently held records as a CSV artifact.
    ExportCsv { records: Vec<DisplayRecord> },
}
