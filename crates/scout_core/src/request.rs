use thiserror::Error;

/// Result count used when the user leaves the field empty or types garbage.
pub const DEFAULT_MAX_RESULTS: u32 = 10;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RequestError {
    #[error("search query is empty")]
    EmptyQuery,
}

/// One submitted search. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    query: String,
    max_results: u32,
}

impl SearchRequest {
    /// Builds a request from raw form input.
    pub fn parse(query: &str, max_results_text: &str) -> Result<Self, RequestError> {
        let query = query.trim();
        if query.is_empty() {
            return Err(RequestError::EmptyQuery);
        }
        Ok(Self {
            query: query.to_string(),
            max_results: parse_max_results(max_results_text),
        })
    }

    /// Rebuilds the request behind a saved result set.
    pub(crate) fn restored(query: &str, max_results: u32) -> Option<Self> {
        let query = query.trim();
        if query.is_empty() {
            return None;
        }
        Some(Self {
            query: query.to_string(),
            max_results: if max_results > 0 {
                max_results
            } else {
                DEFAULT_MAX_RESULTS
            },
        })
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn max_results(&self) -> u32 {
        self.max_results
    }
}

fn parse_max_results(text: &str) -> u32 {
    match text.trim().parse::<u32>() {
        Ok(value) if value > 0 => value,
        _ => DEFAULT_MAX_RESULTS,
    }
}
