use std::collections::BTreeMap;
use std::sync::{mpsc, Arc};
use std::thread;

use dash_logging::dash_warn;
use futures_util::future::join_all;

use crate::api::{ClientSettings, CrawlerApi, ReqwestCrawlerApi};
use crate::types::{ApiError, CrawlAccepted, HealthResponse};

/// Work submitted to the background client runtime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientCommand {
    StartCrawl {
        domains: Vec<String>,
        max_depth: u8,
    },
    /// Issue every status request concurrently, wait for all of them to
    /// settle, and report the successes as one snapshot.
    PollStatuses { task_ids: Vec<String> },
    CheckHealth,
    Cancel { task_id: String },
    FetchUrls { task_id: String, domain: String },
}

/// Settled outcome of a command, handed back to the message loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientEvent {
    CrawlStarted {
        domains: Vec<String>,
        max_depth: u8,
        result: Result<CrawlAccepted, ApiError>,
    },
    /// Wire statuses for every task whose request succeeded this tick.
    /// Always emitted, even when empty, so the poll tick is known to be
    /// over.
    StatusSnapshot { statuses: BTreeMap<String, String> },
    HealthChecked {
        result: Result<HealthResponse, ApiError>,
    },
    CancelSettled {
        task_id: String,
        result: Result<(), ApiError>,
    },
    UrlsFetched {
        task_id: String,
        domain: String,
        result: Result<Vec<String>, ApiError>,
    },
}

/// Handle to the remote task client, running on its own tokio runtime
/// behind a command/event channel pair.
pub struct ClientHandle {
    cmd_tx: mpsc::Sender<ClientCommand>,
    event_rx: mpsc::Receiver<ClientEvent>,
}

impl ClientHandle {
    pub fn new(settings: ClientSettings) -> Result<Self, ApiError> {
        let api: Arc<dyn CrawlerApi> = Arc::new(ReqwestCrawlerApi::new(settings)?);
        Ok(Self::with_api(api))
    }

    /// Build a handle over an arbitrary API implementation; tests substitute
    /// a fake here.
    pub fn with_api(api: Arc<dyn CrawlerApi>) -> Self {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();

        thread::spawn(move || {
            let runtime = tokio::runtime::Runtime::new().expect("tokio runtime");
            while let Ok(command) = cmd_rx.recv() {
                let api = api.clone();
                let event_tx = event_tx.clone();
                runtime.spawn(async move {
                    handle_command(api, command, event_tx).await;
                });
            }
        });

        Self { cmd_tx, event_rx }
    }

    pub fn submit(&self, command: ClientCommand) {
        let _ = self.cmd_tx.send(command);
    }

    pub fn try_recv(&self) -> Option<ClientEvent> {
        self.event_rx.try_recv().ok()
    }
}

async fn handle_command(
    api: Arc<dyn CrawlerApi>,
    command: ClientCommand,
    event_tx: mpsc::Sender<ClientEvent>,
) {
    match command {
        ClientCommand::StartCrawl { domains, max_depth } => {
            let result = api.start_crawl(&domains, max_depth).await;
            let _ = event_tx.send(ClientEvent::CrawlStarted {
                domains,
                max_depth,
                result,
            });
        }
        ClientCommand::PollStatuses { task_ids } => {
            let statuses = poll_statuses(api.as_ref(), &task_ids).await;
            let _ = event_tx.send(ClientEvent::StatusSnapshot { statuses });
        }
        ClientCommand::CheckHealth => {
            let result = api.check_health().await;
            let _ = event_tx.send(ClientEvent::HealthChecked { result });
        }
        ClientCommand::Cancel { task_id } => {
            let result = api.cancel_task(&task_id).await;
            let _ = event_tx.send(ClientEvent::CancelSettled { task_id, result });
        }
        ClientCommand::FetchUrls { task_id, domain } => {
            let result = api
                .list_urls(&task_id, &domain)
                .await
                .map(|response| response.urls);
            let _ = event_tx.send(ClientEvent::UrlsFetched {
                task_id,
                domain,
                result,
            });
        }
    }
}

/// One poll tick: all status requests in flight at once, so one slow or
/// failing task cannot hold up the rest. Failures are logged and simply
/// left out of the snapshot.
async fn poll_statuses(api: &dyn CrawlerApi, task_ids: &[String]) -> BTreeMap<String, String> {
    let requests = task_ids.iter().map(|task_id| async move {
        (task_id.clone(), api.task_status(task_id).await)
    });

    let mut statuses = BTreeMap::new();
    for (task_id, result) in join_all(requests).await {
        match result {
            Ok(response) => {
                statuses.insert(task_id, response.status);
            }
            Err(err) => {
                dash_warn!("Status poll failed for task {}: {}", task_id, err);
            }
        }
    }
    statuses
}
