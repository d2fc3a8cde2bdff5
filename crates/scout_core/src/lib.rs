//! Channel scout core: pure search state machine, record normalization and view-model helpers.
mod effect;
mod msg;
mod record;
mod request;
mod state;
mod update;
mod view_model;

pub use effect::Effect;
pub use msg::Msg;
pub use record::{
    channel_name, digits_only, normalize, scraped_value, DisplayRecord, RawRecord,
    NOT_FOUND_SENTINEL,
};
pub use request::{RequestError, SearchRequest, DEFAULT_MAX_RESULTS};
pub use state::{
    AppState, ExportOutcome, SearchGeneration, SearchOutcome, SearchPhase, SessionSnapshot,
    TIMEOUT_MESSAGE,
};
pub use update::{update, EMPTY_QUERY_MESSAGE};
pub use view_model::{AppViewModel, PollProgressView};
