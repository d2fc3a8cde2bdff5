use std::time::Duration;

use engine_logging::engine_warn;
use scout_core::SearchRequest;

use crate::wire::{StatusResponse, SubmitBody, SubmitResponse};
use crate::{FailureKind, JobHandle, JobReport, ServiceError};

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000";

#[derive(Debug, Clone)]
pub struct ServiceSettings {
    pub base_url: String,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
}

impl Default for ServiceSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
        }
    }
}

/// The two operations the scraping service exposes.
#[async_trait::async_trait]
pub trait ScrapeService: Send + Sync {
    /// Queues a scrape job for `request`.
    async fn submit(&self, request: &SearchRequest) -> Result<JobHandle, ServiceError>;

    /// Fetches the current state of a queued job.
    async fn job_status(&self, job: &JobHandle) -> Result<JobReport, ServiceError>;
}

#[derive(Debug, Clone)]
pub struct ReqwestScrapeService {
    settings: ServiceSettings,
    client: reqwest::Client,
}

impl ReqwestScrapeService {
    pub fn new(settings: ServiceSettings) -> Result<Self, ServiceError> {
        let client = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.request_timeout)
            .build()
            .map_err(|err| ServiceError::new(FailureKind::Network, err.to_string()))?;
        Ok(Self { settings, client })
    }

    fn endpoint(&self, path: &str) -> Result<reqwest::Url, ServiceError> {
        let base = self.settings.base_url.trim_end_matches('/');
        reqwest::Url::parse(&format!("{base}{path}"))
            .map_err(|err| ServiceError::new(FailureKind::InvalidUrl, err.to_string()))
    }

    async fn read_success_body(response: reqwest::Response) -> Result<Vec<u8>, ServiceError> {
        let status = response.status();
        if !status.is_success() {
            return Err(ServiceError::new(
                FailureKind::HttpStatus(status.as_u16()),
                status.to_string(),
            ));
        }
        let bytes = response.bytes().await.map_err(map_reqwest_error)?;
        Ok(bytes.to_vec())
    }
}

#[async_trait::async_trait]
impl ScrapeService for ReqwestScrapeService {
    async fn submit(&self, request: &SearchRequest) -> Result<JobHandle, ServiceError> {
        let url = self.endpoint("/scrape")?;
        let body = SubmitBody {
            search_query: request.query(),
            max_channel_links: request.max_results(),
        };
        let response = self
            .client
            .post(url)
            .header(reqwest::header::ACCEPT, "application/json")
            .json(&body)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let bytes = Self::read_success_body(response).await?;
        let parsed: SubmitResponse = serde_json::from_slice(&bytes)
            .map_err(|err| ServiceError::new(FailureKind::Decode, err.to_string()))?;

        match parsed.job_id {
            Some(id) if !id.trim().is_empty() => Ok(JobHandle { id }),
            _ => {
                if parsed.channel_details.is_some() {
                    engine_warn!(
                        "Service answered with the synchronous protocol (status={:?}); only job polling is supported",
                        parsed.status
                    );
                }
                Err(ServiceError::new(
                    FailureKind::MissingJobId,
                    "submission response carried no job_id",
                ))
            }
        }
    }

    async fn job_status(&self, job: &JobHandle) -> Result<JobReport, ServiceError> {
        let mut url = self.endpoint("/data")?;
        url.path_segments_mut()
            .map_err(|_| ServiceError::new(FailureKind::InvalidUrl, "base url cannot be a base"))?
            .push(&job.id);

        let response = self
            .client
            .get(url)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let bytes = Self::read_success_body(response).await?;
        let parsed: StatusResponse = serde_json::from_slice(&bytes)
            .map_err(|err| ServiceError::new(FailureKind::Decode, err.to_string()))?;
        parsed
            .into_report()
            .map_err(|err| ServiceError::new(FailureKind::Decode, err.to_string()))
    }
}

fn map_reqwest_error(err: reqwest::Error) -> ServiceError {
    if err.is_timeout() {
        return ServiceError::new(FailureKind::Timeout, err.to_string());
    }
    ServiceError::new(FailureKind::Network, err.to_string())
}
