//! Runtime configuration: optional `scout.ron` file overlaid with CLI/env values.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use scout_engine::{
    CsvQuoting, EngineConfig, ExportOptions, PollSettings, ServiceSettings, DEFAULT_BASE_URL,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const DEFAULT_CONFIG_FILENAME: &str = "scout.ron";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {0}")]
    FileNotFound(String),
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },
    #[error("failed to parse config: {0}")]
    Parse(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub base_url: String,
    pub connect_timeout_secs: u64,
    pub request_timeout_secs: u64,
    pub max_attempts: u32,
    pub poll_delay_ms: u64,
    pub output_dir: PathBuf,
    pub escape_quotes: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        let service = ServiceSettings::default();
        let poll = PollSettings::default();
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            connect_timeout_secs: service.connect_timeout.as_secs(),
            request_timeout_secs: service.request_timeout.as_secs(),
            max_attempts: poll.max_attempts,
            poll_delay_ms: poll.delay.as_millis() as u64,
            output_dir: PathBuf::from("output"),
            escape_quotes: false,
        }
    }
}

/// Values supplied on the command line (or via environment) for this run.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub base_url: Option<String>,
    pub max_attempts: Option<u32>,
    pub poll_delay_ms: Option<u64>,
    pub output_dir: Option<PathBuf>,
    pub escape_quotes: bool,
}

impl AppConfig {
    pub fn with_overrides(mut self, overrides: Overrides) -> Self {
        if let Some(base_url) = overrides.base_url {
            self.base_url = base_url;
        }
        if let Some(max_attempts) = overrides.max_attempts {
            self.max_attempts = max_attempts;
        }
        if let Some(delay) = overrides.poll_delay_ms {
            self.poll_delay_ms = delay;
        }
        if let Some(dir) = overrides.output_dir {
            self.output_dir = dir;
        }
        self.escape_quotes |= overrides.escape_quotes;
        self
    }

    pub fn engine_config(&self) -> EngineConfig {
        EngineConfig {
            service: ServiceSettings {
                base_url: self.base_url.clone(),
                connect_timeout: Duration::from_secs(self.connect_timeout_secs),
                request_timeout: Duration::from_secs(self.request_timeout_secs),
            },
            poll: PollSettings {
                max_attempts: self.max_attempts,
                delay: Duration::from_millis(self.poll_delay_ms),
            },
        }
    }

    pub fn export_options(&self) -> ExportOptions {
        ExportOptions {
            quoting: if self.escape_quotes {
                CsvQuoting::Escaped
            } else {
                CsvQuoting::Verbatim
            },
            ..ExportOptions::default()
        }
    }
}

/// Loads the config file.
///
/// An explicitly requested file must exist; the default `scout.ron` is optional.
pub fn load_config(explicit: Option<&Path>) -> Result<AppConfig, ConfigError> {
    let path = match explicit {
        Some(path) => {
            if !path.exists() {
                return Err(ConfigError::FileNotFound(path.display().to_string()));
            }
            path.to_path_buf()
        }
        None => {
            let default = PathBuf::from(DEFAULT_CONFIG_FILENAME);
            if !default.exists() {
                return Ok(AppConfig::default());
            }
            default
        }
    };

    let text = fs::read_to_string(&path).map_err(|source| ConfigError::Read {
        path: path.display().to_string(),
        source,
    })?;
    load_config_from_str(&text)
}

pub fn load_config_from_str(text: &str) -> Result<AppConfig, ConfigError> {
    ron::from_str(text).map_err(|e| ConfigError::Parse(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn partial_file_keeps_defaults() {
        let config = load_config_from_str(r#"(base_url: "http://scraper.local:9000", max_attempts: 5)"#)
            .unwrap();
        assert_eq!(config.base_url, "http://scraper.local:9000");
        assert_eq!(config.max_attempts, 5);
        assert_eq!(config.poll_delay_ms, 2000);
        assert_eq!(config.output_dir, PathBuf::from("output"));
    }

    #[test]
    fn malformed_file_is_a_parse_error() {
        let err = load_config_from_str("(max_attempts: \"many\")").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn explicit_missing_file_is_reported() {
        let err = load_config(Some(Path::new("/nonexistent/scout.ron"))).unwrap_err();
        assert!(matches!(err, ConfigError::FileNotFound(_)));
    }

    #[test]
    fn explicit_file_is_loaded() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "(poll_delay_ms: 250, escape_quotes: true)").unwrap();

        let config = load_config(Some(file.path())).unwrap();
        assert_eq!(config.poll_delay_ms, 250);
        assert_eq!(config.export_options().quoting, CsvQuoting::Escaped);
    }

    #[test]
    fn overrides_win_over_file_values() {
        let config = AppConfig {
            base_url: "http://from-file".to_string(),
            max_attempts: 5,
            ..AppConfig::default()
        }
        .with_overrides(Overrides {
            base_url: Some("http://from-flag".to_string()),
            poll_delay_ms: Some(10),
            ..Overrides::default()
        });

        let engine = config.engine_config();
        assert_eq!(engine.service.base_url, "http://from-flag");
        assert_eq!(engine.poll.max_attempts, 5);
        assert_eq!(engine.poll.delay, Duration::from_millis(10));
    }
}
