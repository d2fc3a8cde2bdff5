use std::path::PathBuf;
use std::time::Duration;

use engine_logging::{engine_debug, engine_info, engine_warn};
use scout_core::{Effect, ExportOutcome, Msg, SearchOutcome};
use scout_engine::{write_csv_export, EngineEvent, EngineHandle, ExportOptions, PollError};

/// Executes core effects against the engine and the filesystem.
pub struct EffectRunner {
    engine: EngineHandle,
    output_dir: PathBuf,
    export_options: ExportOptions,
}

impl EffectRunner {
    pub fn new(engine: EngineHandle, output_dir: PathBuf, export_options: ExportOptions) -> Self {
        Self {
            engine,
            output_dir,
            export_options,
        }
    }

    /// Runs `effects` in order. Effects that complete synchronously yield their
    /// follow-up messages directly.
    pub fn run(&self, effects: Vec<Effect>) -> Vec<Msg> {
        let mut follow_ups = Vec::new();
        for effect in effects {
            match effect {
                Effect::StartSearch {
                    generation,
                    request,
                } => {
                    engine_info!(
                        "StartSearch generation={} query={:?} max_results={}",
                        generation,
                        request.query(),
                        request.max_results()
                    );
                    self.engine.start_search(generation, request);
                }
                Effect::CancelSearch { generation } => {
                    self.engine.cancel(generation);
                }
                Effect::ExportCsv { records } => {
                    let outcome =
                        match write_csv_export(&self.output_dir, &records, &self.export_options) {
                            Ok(summary) => ExportOutcome::Saved {
                                count: summary.record_count,
                                path: summary.output_path.display().to_string(),
                            },
                            Err(err) => {
                                engine_warn!("CSV export failed: {}", err);
                                ExportOutcome::Failed {
                                    message: err.to_string(),
                                }
                            }
                        };
                    follow_ups.push(Msg::ExportFinished(outcome));
                }
            }
        }
        follow_ups
    }

    /// Waits up to `timeout` for the next engine event that the core cares about.
    pub fn next_msg(&self, timeout: Duration) -> Option<Msg> {
        self.engine.recv_timeout(timeout).and_then(map_event)
    }
}

fn map_event(event: EngineEvent) -> Option<Msg> {
    match event {
        EngineEvent::PollProgress {
            generation,
            attempt,
            max_attempts,
        } => Some(Msg::PollProgress {
            generation,
            attempt,
            max_attempts,
        }),
        EngineEvent::SearchResolved { generation, result } => {
            let outcome = match result {
                Ok(records) => SearchOutcome::Success { records },
                Err(PollError::Cancelled) => {
                    engine_debug!("Dropping cancelled search generation={}", generation);
                    return None;
                }
                Err(PollError::TimedOut { attempts }) => {
                    engine_warn!(
                        "Search generation={} timed out after {} attempts",
                        generation,
                        attempts
                    );
                    SearchOutcome::TimedOut
                }
                Err(err) => {
                    engine_warn!("Search generation={} failed: {}", generation, err);
                    SearchOutcome::Failed {
                        message: err.user_message(),
                    }
                }
            };
            Some(Msg::SearchResolved {
                generation,
                outcome,
            })
        }
    }
}
