//! Channel scout engine: scraping-service client, job poller and export IO.
mod engine;
mod export;
mod persist;
mod poller;
mod service;
mod types;
mod wire;

pub use engine::{EngineConfig, EngineError, EngineHandle};
pub use export::{
    encode_csv, write_csv_export, CsvQuoting, ExportError, ExportOptions, ExportSummary,
    DEFAULT_EXPORT_FILENAME,
};
pub use persist::{ensure_output_dir, AtomicFileWriter, PersistError};
pub use poller::{JobPoller, NoopObserver, Pacer, PollObserver, PollSettings, TokioPacer};
pub use service::{ReqwestScrapeService, ScrapeService, ServiceSettings, DEFAULT_BASE_URL};
pub use types::{
    EngineEvent, FailureKind, JobHandle, JobReport, JobStatus, PollError, ServiceError,
    SUBMISSION_FAILED_MESSAGE,
};
