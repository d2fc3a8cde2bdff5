use crate::{AppState, Effect, ExportOutcome, Msg, SearchRequest};

pub const EMPTY_QUERY_MESSAGE: &str = "Please enter a search query";

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::SearchSubmitted {
            query,
            max_results_text,
        } => {
            let request = match SearchRequest::parse(&query, &max_results_text) {
                Ok(request) => request,
                Err(_) => {
                    state.set_error(EMPTY_QUERY_MESSAGE);
                    return (state, Vec::new());
                }
            };
            let (generation, superseded) = state.begin_search(request.clone());
            let mut effects = Vec::with_capacity(2);
            if let Some(previous) = superseded {
                effects.push(Effect::CancelSearch {
                    generation: previous,
                });
            }
            effects.push(Effect::StartSearch {
                generation,
                request,
            });
            effects
        }
        Msg::SearchResolved {
            generation,
            outcome,
        } => {
            state.apply_outcome(generation, outcome);
            Vec::new()
        }
        Msg::PollProgress {
            generation,
            attempt,
            max_attempts,
        } => {
            state.apply_progress(generation, attempt, max_attempts);
            Vec::new()
        }
        Msg::RecordSelected { id } => {
            state.select(&id);
            Vec::new()
        }
        Msg::ExportClicked => {
            if state.records().is_empty() {
                state.set_notice("Nothing to export yet");
                Vec::new()
            } else {
                vec![Effect::ExportCsv {
                    records: state.records().to_vec(),
                }]
            }
        }
        Msg::ExportFinished(outcome) => {
            match outcome {
                ExportOutcome::Saved { count, path } => {
                    state.set_notice(format!("Saved {count} records to {path}"));
                }
                ExportOutcome::Failed { message } => {
                    state.set_notice(format!("Export failed: {message}"));
                }
            }
            Vec::new()
        }
        Msg::RestoreSession(snapshot) => {
            // An in-flight search owns the result set; a late restore must not clobber it.
            if !state.is_searching() {
                state.restore(snapshot);
            }
            Vec::new()
        }
        Msg::Tick | Msg::NoOp => Vec::new(),
    };

    (state, effects)
}
