use std::collections::HashMap;
use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

use engine_logging::{engine_debug, engine_error, engine_info};
use scout_core::{SearchGeneration, SearchRequest};
use tokio_util::sync::CancellationToken;

use crate::poller::{JobPoller, PollObserver, PollSettings};
use crate::service::{ReqwestScrapeService, ScrapeService, ServiceSettings};
use crate::{EngineEvent, PollError, ServiceError};

#[derive(Debug, Clone, Default)]
pub struct EngineConfig {
    pub service: ServiceSettings,
    pub poll: PollSettings,
}

#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("failed to start async runtime: {0}")]
    Runtime(#[from] std::io::Error),
    #[error("failed to build service client: {0}")]
    Service(#[from] ServiceError),
}

enum EngineCommand {
    StartSearch {
        generation: SearchGeneration,
        request: SearchRequest,
    },
    Cancel {
        generation: SearchGeneration,
    },
}

/// Runs searches on a background tokio runtime and reports their events.
///
/// Dropping the handle stops the worker thread and aborts running searches.
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
    event_rx: mpsc::Receiver<EngineEvent>,
}

impl EngineHandle {
    pub fn new(config: EngineConfig) -> Result<Self, EngineError> {
        let service = Arc::new(ReqwestScrapeService::new(config.service)?);
        Self::with_service(service, config.poll)
    }

    pub fn with_service(
        service: Arc<dyn ScrapeService>,
        poll: PollSettings,
    ) -> Result<Self, EngineError> {
        Self::with_poller(JobPoller::new(service, poll))
    }

    pub fn with_poller(poller: JobPoller) -> Result<Self, EngineError> {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .thread_name("scout-engine")
            .build()?;
        let poller = Arc::new(poller);

        thread::spawn(move || {
            let mut tokens: HashMap<SearchGeneration, CancellationToken> = HashMap::new();
            while let Ok(command) = cmd_rx.recv() {
                match command {
                    EngineCommand::StartSearch {
                        generation,
                        request,
                    } => {
                        // Anything older than the newest search has lost its audience.
                        tokens.retain(|older, token| {
                            if *older < generation {
                                token.cancel();
                                false
                            } else {
                                true
                            }
                        });
                        let token = CancellationToken::new();
                        tokens.insert(generation, token.clone());
                        runtime.spawn(run_search(
                            poller.clone(),
                            generation,
                            request,
                            token,
                            event_tx.clone(),
                        ));
                    }
                    EngineCommand::Cancel { generation } => {
                        if let Some(token) = tokens.remove(&generation) {
                            engine_debug!("Cancelling search generation={}", generation);
                            token.cancel();
                        }
                    }
                }
            }
            for token in tokens.values() {
                token.cancel();
            }
        });

        Ok(Self { cmd_tx, event_rx })
    }

    pub fn start_search(&self, generation: SearchGeneration, request: SearchRequest) {
        let _ = self.cmd_tx.send(EngineCommand::StartSearch {
            generation,
            request,
        });
    }

    pub fn cancel(&self, generation: SearchGeneration) {
        let _ = self.cmd_tx.send(EngineCommand::Cancel { generation });
    }

    pub fn recv_timeout(&self, timeout: Duration) -> Option<EngineEvent> {
        self.event_rx.recv_timeout(timeout).ok()
    }
}

struct ChannelProgressSink {
    generation: SearchGeneration,
    tx: mpsc::Sender<EngineEvent>,
}

impl PollObserver for ChannelProgressSink {
    fn attempt_finished(&self, attempt: u32, max_attempts: u32) {
        let _ = self.tx.send(EngineEvent::PollProgress {
            generation: self.generation,
            attempt,
            max_attempts,
        });
    }
}

async fn run_search(
    poller: Arc<JobPoller>,
    generation: SearchGeneration,
    request: SearchRequest,
    token: CancellationToken,
    event_tx: mpsc::Sender<EngineEvent>,
) {
    engine_info!("Starting search generation={}", generation);
    let sink = ChannelProgressSink {
        generation,
        tx: event_tx.clone(),
    };
    let task = tokio::spawn(async move {
        poller.submit_and_await(&request, &token, &sink).await
    });
    let result = match task.await {
        Ok(result) => result,
        Err(join_err) => {
            engine_error!("Search task generation={} died: {}", generation, join_err);
            Err(PollError::Unexpected(format!("Search failed: {join_err}")))
        }
    };
    let _ = event_tx.send(EngineEvent::SearchResolved { generation, result });
}
