//! JSON shapes exchanged with the scraping service.
//!
//! Records come out of a pandas dataframe on the service side, so any field
//! may arrive as a string, a number or `null`. Everything is folded into
//! `Option<String>` here, with the `"Not found"` sentinel mapped to `None`.

use scout_core::{scraped_value, RawRecord};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::{JobReport, JobStatus};

#[derive(Debug, Clone, Serialize)]
pub(crate) struct SubmitBody<'a> {
    pub search_query: &'a str,
    pub max_channel_links: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct SubmitResponse {
    #[serde(default)]
    pub job_id: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    /// Only present on the deprecated synchronous protocol.
    #[serde(default)]
    pub channel_details: Option<Vec<WireRecord>>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct StatusResponse {
    #[serde(default, deserialize_with = "lenient_status")]
    pub status: JobStatus,
    /// Decoded only once the job reports `completed`.
    #[serde(default)]
    pub channel_details: Option<Value>,
}

impl StatusResponse {
    pub(crate) fn into_report(self) -> Result<JobReport, serde_json::Error> {
        if self.status != JobStatus::Completed {
            return Ok(JobReport {
                status: self.status,
                records: Vec::new(),
            });
        }
        let details: Vec<WireRecord> = match self.channel_details {
            None | Some(Value::Null) => Vec::new(),
            Some(value) => serde_json::from_value(value)?,
        };
        Ok(JobReport {
            status: self.status,
            records: details.into_iter().map(RawRecord::from).collect(),
        })
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct WireRecord {
    #[serde(default, deserialize_with = "lenient_field")]
    pub channel_url: Option<String>,
    #[serde(default, deserialize_with = "lenient_field")]
    pub nationality: Option<String>,
    #[serde(default, deserialize_with = "lenient_field")]
    pub joined_on: Option<String>,
    #[serde(default, deserialize_with = "lenient_field")]
    pub subscribers: Option<String>,
    #[serde(default, deserialize_with = "lenient_field")]
    pub videos_count: Option<String>,
    #[serde(default, deserialize_with = "lenient_field")]
    pub total_views: Option<String>,
}

impl From<WireRecord> for RawRecord {
    fn from(wire: WireRecord) -> Self {
        RawRecord {
            channel_url: wire.channel_url.unwrap_or_default(),
            nationality: wire.nationality,
            joined_on: wire.joined_on,
            subscribers: wire.subscribers,
            videos_count: wire.videos_count,
            total_views: wire.total_views,
        }
    }
}

fn lenient_status<'de, D>(deserializer: D) -> Result<JobStatus, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value.as_ref().and_then(Value::as_str) {
        Some("pending") => JobStatus::Pending,
        Some("completed") => JobStatus::Completed,
        Some("failed") => JobStatus::Failed,
        _ => JobStatus::Other,
    })
}

fn lenient_field<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        None | Some(Value::Null) => None,
        Some(Value::String(text)) => scraped_value(text),
        Some(Value::Number(number)) => Some(number.to_string()),
        Some(Value::Bool(flag)) => Some(flag.to_string()),
        Some(other) => Some(other.to_string()),
    })
}
