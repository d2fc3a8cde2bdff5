use std::fs;
use std::path::{Path, PathBuf};

use chrono::Utc;
use engine_logging::{engine_error, engine_info, engine_warn};
use scout_core::{DisplayRecord, SessionSnapshot};
use scout_engine::{ensure_output_dir, AtomicFileWriter};
use serde::{Deserialize, Serialize};

const STATE_FILENAME: &str = ".scout_state.ron";

#[derive(Debug, Clone, Serialize, Deserialize)]
struct PersistedRecord {
    id: String,
    name: String,
    nationality: String,
    joined_on: String,
    subscribers: String,
    videos: u64,
    total_views: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct PersistedSession {
    query: String,
    max_results: u32,
    saved_utc: String,
    records: Vec<PersistedRecord>,
}

pub(crate) fn load_session(output_dir: &Path) -> Option<SessionSnapshot> {
    let path = output_dir.join(STATE_FILENAME);
    let content = match fs::read_to_string(&path) {
        Ok(text) => text,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => return None,
        Err(err) => {
            engine_warn!("Failed to read saved session from {:?}: {}", path, err);
            return None;
        }
    };

    let session: PersistedSession = match ron::from_str(&content) {
        Ok(session) => session,
        Err(err) => {
            engine_warn!("Failed to parse saved session from {:?}: {}", path, err);
            return None;
        }
    };

    engine_info!(
        "Loaded saved session from {:?} (saved {}, {} records)",
        path,
        session.saved_utc,
        session.records.len()
    );
    Some(SessionSnapshot {
        query: session.query,
        max_results: session.max_results,
        records: session
            .records
            .into_iter()
            .map(|record| DisplayRecord {
                id: record.id,
                name: record.name,
                nationality: record.nationality,
                joined_on: record.joined_on,
                subscribers: record.subscribers,
                videos: record.videos,
                total_views: record.total_views,
            })
            .collect(),
    })
}

pub(crate) fn save_session(output_dir: &Path, snapshot: &SessionSnapshot) {
    if let Err(err) = ensure_output_dir(output_dir) {
        engine_error!("Failed to ensure output dir {:?}: {}", output_dir, err);
        return;
    }

    let session = PersistedSession {
        query: snapshot.query.clone(),
        max_results: snapshot.max_results,
        saved_utc: Utc::now().to_rfc3339(),
        records: snapshot
            .records
            .iter()
            .map(|record| PersistedRecord {
                id: record.id.clone(),
                name: record.name.clone(),
                nationality: record.nationality.clone(),
                joined_on: record.joined_on.clone(),
                subscribers: record.subscribers.clone(),
                videos: record.videos,
                total_views: record.total_views.clone(),
            })
            .collect(),
    };

    let pretty = ron::ser::PrettyConfig::new();
    let content = match ron::ser::to_string_pretty(&session, pretty) {
        Ok(text) => text,
        Err(err) => {
            engine_error!("Failed to serialize session: {}", err);
            return;
        }
    };

    let writer = AtomicFileWriter::new(PathBuf::from(output_dir));
    if let Err(err) = writer.write(STATE_FILENAME, content) {
        engine_error!("Failed to write session to {:?}: {}", output_dir, err);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot() -> SessionSnapshot {
        SessionSnapshot {
            query: "tech reviews".to_string(),
            max_results: 3,
            records: vec![DisplayRecord {
                id: "https://www.youtube.com/@mkbhd".to_string(),
                name: "mkbhd".to_string(),
                nationality: "Unknown".to_string(),
                joined_on: "2008-01-01".to_string(),
                subscribers: "18M".to_string(),
                videos: 16,
                total_views: "0".to_string(),
            }],
        }
    }

    #[test]
    fn session_round_trips_through_output_dir() {
        let temp = tempfile::TempDir::new().unwrap();
        save_session(temp.path(), &snapshot());

        assert_eq!(load_session(temp.path()), Some(snapshot()));
    }

    #[test]
    fn missing_or_corrupt_state_yields_none() {
        let temp = tempfile::TempDir::new().unwrap();
        assert_eq!(load_session(temp.path()), None);

        fs::write(temp.path().join(STATE_FILENAME), "not ron at all (").unwrap();
        assert_eq!(load_session(temp.path()), None);
    }
}
