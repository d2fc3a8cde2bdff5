use std::sync::Arc;
use std::time::Duration;

use engine_logging::{engine_debug, engine_info, engine_warn};
use scout_core::{RawRecord, SearchRequest};
use tokio_util::sync::CancellationToken;

use crate::service::ScrapeService;
use crate::{FailureKind, JobHandle, JobStatus, PollError};

#[derive(Debug, Clone)]
pub struct PollSettings {
    /// Status checks made before giving up.
    pub max_attempts: u32,
    /// Fixed pause between two status checks. No backoff.
    pub delay: Duration,
}

impl Default for PollSettings {
    fn default() -> Self {
        Self {
            max_attempts: 30,
            delay: Duration::from_millis(2000),
        }
    }
}

/// Suspends the poll loop between attempts.
#[async_trait::async_trait]
pub trait Pacer: Send + Sync {
    async fn pause(&self, delay: Duration);
}

#[derive(Debug, Default, Clone, Copy)]
pub struct TokioPacer;

#[async_trait::async_trait]
impl Pacer for TokioPacer {
    async fn pause(&self, delay: Duration) {
        tokio::time::sleep(delay).await;
    }
}

/// Receives a notification after every status check.
pub trait PollObserver: Send + Sync {
    fn attempt_finished(&self, attempt: u32, max_attempts: u32);
}

#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl PollObserver for NoopObserver {
    fn attempt_finished(&self, _attempt: u32, _max_attempts: u32) {}
}

enum PollPhase {
    Submitting,
    Polling { job: JobHandle, attempt: u32 },
    Waiting { job: JobHandle, next_attempt: u32 },
    Resolved(Result<Vec<RawRecord>, PollError>),
}

/// Drives one search from submission to a terminal result.
pub struct JobPoller {
    service: Arc<dyn ScrapeService>,
    pacer: Arc<dyn Pacer>,
    settings: PollSettings,
}

impl JobPoller {
    pub fn new(service: Arc<dyn ScrapeService>, settings: PollSettings) -> Self {
        Self::with_pacer(service, settings, Arc::new(TokioPacer))
    }

    pub fn with_pacer(
        service: Arc<dyn ScrapeService>,
        settings: PollSettings,
        pacer: Arc<dyn Pacer>,
    ) -> Self {
        Self {
            service,
            pacer,
            settings,
        }
    }

    fn max_attempts(&self) -> u32 {
        self.settings.max_attempts.max(1)
    }

    /// Submits `request` and polls until the job completes, the attempt
    /// budget runs out, or `cancel` fires.
    ///
    /// Completing on attempt `k` costs one submit, `k` status checks and
    /// `k - 1` pauses.
    pub async fn submit_and_await(
        &self,
        request: &SearchRequest,
        cancel: &CancellationToken,
        observer: &dyn PollObserver,
    ) -> Result<Vec<RawRecord>, PollError> {
        let mut phase = PollPhase::Submitting;
        loop {
            phase = match phase {
                PollPhase::Submitting => self.submit(request, cancel).await,
                PollPhase::Polling { job, attempt } => {
                    self.check_status(job, attempt, cancel, observer).await
                }
                PollPhase::Waiting { job, next_attempt } => {
                    self.wait(job, next_attempt, cancel).await
                }
                PollPhase::Resolved(result) => return result,
            };
        }
    }

    async fn submit(&self, request: &SearchRequest, cancel: &CancellationToken) -> PollPhase {
        engine_info!(
            "Submitting scrape job query={:?} max_channel_links={}",
            request.query(),
            request.max_results()
        );
        let submitted = tokio::select! {
            biased;
            _ = cancel.cancelled() => return PollPhase::Resolved(Err(PollError::Cancelled)),
            result = self.service.submit(request) => result,
        };
        match submitted {
            Ok(job) => {
                engine_info!("Scrape job queued job_id={}", job.id);
                PollPhase::Polling { job, attempt: 1 }
            }
            Err(err) => {
                engine_warn!("Scrape job submission failed: {}", err);
                PollPhase::Resolved(Err(PollError::Submission(err)))
            }
        }
    }

    async fn check_status(
        &self,
        job: JobHandle,
        attempt: u32,
        cancel: &CancellationToken,
        observer: &dyn PollObserver,
    ) -> PollPhase {
        let max_attempts = self.max_attempts();
        let checked = tokio::select! {
            biased;
            _ = cancel.cancelled() => return PollPhase::Resolved(Err(PollError::Cancelled)),
            result = self.service.job_status(&job) => result,
        };
        observer.attempt_finished(attempt, max_attempts);

        match checked {
            Ok(report) if report.status == JobStatus::Completed => {
                engine_info!(
                    "Scrape job completed job_id={} attempt={} records={}",
                    job.id,
                    attempt,
                    report.records.len()
                );
                return PollPhase::Resolved(Ok(report.records));
            }
            Ok(report) => {
                engine_debug!(
                    "Scrape job not ready job_id={} attempt={}/{} status={:?}",
                    job.id,
                    attempt,
                    max_attempts,
                    report.status
                );
            }
            Err(err) if err.kind == FailureKind::Decode => {
                engine_warn!("Unreadable status for job_id={}: {}", job.id, err);
                return PollPhase::Resolved(Err(PollError::Unexpected(format!(
                    "Unexpected response from scraping service: {}",
                    err.message
                ))));
            }
            Err(err) => {
                // Transient: the attempt is spent, the loop carries on.
                engine_warn!(
                    "Status check failed job_id={} attempt={}/{}: {}",
                    job.id,
                    attempt,
                    max_attempts,
                    err
                );
            }
        }

        if attempt >= max_attempts {
            engine_warn!(
                "Scrape job timed out job_id={} after {} attempts",
                job.id,
                max_attempts
            );
            return PollPhase::Resolved(Err(PollError::TimedOut {
                attempts: max_attempts,
            }));
        }
        PollPhase::Waiting {
            job,
            next_attempt: attempt + 1,
        }
    }

    async fn wait(&self, job: JobHandle, next_attempt: u32, cancel: &CancellationToken) -> PollPhase {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => PollPhase::Resolved(Err(PollError::Cancelled)),
            _ = self.pacer.pause(self.settings.delay) => PollPhase::Polling { job, attempt: next_attempt },
        }
    }
}
