use std::fmt;

use scout_core::{RawRecord, SearchGeneration};
use thiserror::Error;

/// Opaque id of one queued scrape job. Never reused across searches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobHandle {
    pub id: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JobStatus {
    Pending,
    Completed,
    Failed,
    /// Missing or unrecognized status; treated like `Pending`.
    #[default]
    Other,
}

/// One successful status check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobReport {
    pub status: JobStatus,
    pub records: Vec<RawRecord>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    PollProgress {
        generation: SearchGeneration,
        attempt: u32,
        max_attempts: u32,
    },
    SearchResolved {
        generation: SearchGeneration,
        result: Result<Vec<RawRecord>, PollError>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceError {
    pub kind: FailureKind,
    pub message: String,
}

impl ServiceError {
    pub(crate) fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl fmt::Display for ServiceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)
    }
}

impl std::error::Error for ServiceError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    InvalidUrl,
    HttpStatus(u16),
    Timeout,
    Network,
    /// Body was not the JSON shape the service documents.
    Decode,
    /// Submission succeeded but carried no job id.
    MissingJobId,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::InvalidUrl => write!(f, "invalid url"),
            FailureKind::HttpStatus(code) => write!(f, "http status {code}"),
            FailureKind::Timeout => write!(f, "timeout"),
            FailureKind::Network => write!(f, "network error"),
            FailureKind::Decode => write!(f, "malformed response body"),
            FailureKind::MissingJobId => write!(f, "response carried no job id"),
        }
    }
}

pub const SUBMISSION_FAILED_MESSAGE: &str = "Failed to queue scrape job";

/// Terminal failure of one submit-and-poll run.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PollError {
    #[error("job submission failed: {0}")]
    Submission(ServiceError),
    #[error("job did not complete within {attempts} attempts")]
    TimedOut { attempts: u32 },
    #[error("poll cancelled")]
    Cancelled,
    #[error("{0}")]
    Unexpected(String),
}

impl PollError {
    /// Text shown to the user for this failure.
    pub fn user_message(&self) -> String {
        match self {
            PollError::Submission(_) => SUBMISSION_FAILED_MESSAGE.to_string(),
            PollError::TimedOut { .. } => scout_core::TIMEOUT_MESSAGE.to_string(),
            PollError::Cancelled => "Search cancelled".to_string(),
            PollError::Unexpected(message) => message.clone(),
        }
    }
}
