use std::collections::BTreeMap;

use chrono::Utc;
use crawldash_client::{ClientCommand, ClientEvent, ClientHandle};
use crawldash_core::{ComponentHealth, Effect, Msg, ServiceHealth, Task, TaskStatus};
use dash_logging::{dash_info, dash_warn};

use crate::store::TaskStoreAdapter;

/// Executes the effects the core requests: persistence synchronously on the
/// caller's thread, network calls via the background client runtime.
pub struct EffectRunner {
    client: ClientHandle,
    store: TaskStoreAdapter,
}

impl EffectRunner {
    pub fn new(client: ClientHandle, store: TaskStoreAdapter) -> Self {
        Self { client, store }
    }

    pub fn run(&self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::PersistTasks(tasks) => self.store.save(&tasks),
                Effect::ClearStore => self.store.clear(),
                Effect::StartCrawl { domains, max_depth } => {
                    dash_info!(
                        "Submitting crawl for [{}] at depth {}",
                        domains.join(", "),
                        max_depth
                    );
                    self.client
                        .submit(ClientCommand::StartCrawl { domains, max_depth });
                }
                Effect::PollStatuses { task_ids } => {
                    self.client.submit(ClientCommand::PollStatuses { task_ids });
                }
                Effect::CheckHealth => {
                    self.client.submit(ClientCommand::CheckHealth);
                }
                Effect::CancelTask { task_id } => {
                    self.client.submit(ClientCommand::Cancel { task_id });
                }
                Effect::FetchUrls { task_id, domain } => {
                    self.client.submit(ClientCommand::FetchUrls { task_id, domain });
                }
            }
        }
    }

    /// Next settled client event, if one is ready.
    pub fn next_event(&self) -> Option<ClientEvent> {
        self.client.try_recv()
    }
}

/// Translate a settled client event into a core message.
pub fn msg_for_event(event: ClientEvent) -> Msg {
    match event {
        ClientEvent::CrawlStarted {
            domains,
            max_depth,
            result,
        } => match result {
            Ok(accepted) => {
                dash_info!("Crawl accepted as task {}", accepted.task_id);
                Msg::TaskCreated(Task {
                    task_id: accepted.task_id,
                    domains,
                    max_depth,
                    status: accepted
                        .status
                        .as_deref()
                        .map(TaskStatus::from_wire)
                        .unwrap_or(TaskStatus::Pending),
                    created_at: Utc::now().to_rfc3339(),
                })
            }
            Err(err) => {
                dash_warn!("Crawl submission failed: {}", err);
                Msg::CrawlRejected {
                    reason: err.to_string(),
                }
            }
        },
        ClientEvent::StatusSnapshot { statuses } => {
            let snapshot: BTreeMap<_, _> = statuses
                .into_iter()
                .map(|(task_id, raw)| (task_id, TaskStatus::from_wire(&raw)))
                .collect();
            Msg::StatusSnapshot(snapshot)
        }
        ClientEvent::HealthChecked { result } => {
            let health = match result {
                Ok(response) => ServiceHealth::Reachable {
                    healthy: response.is_healthy(),
                    components: response
                        .services
                        .into_iter()
                        .map(|(name, status)| ComponentHealth {
                            name,
                            up: status == "UP",
                        })
                        .collect(),
                },
                Err(err) => {
                    dash_warn!("Health check failed: {}", err);
                    ServiceHealth::Unreachable {
                        detail: err.to_string(),
                    }
                }
            };
            Msg::HealthReport { health }
        }
        ClientEvent::CancelSettled { task_id, result } => match result {
            Ok(()) => {
                dash_info!("Server acknowledged cancel of task {}", task_id);
                Msg::CancelSettled {
                    task_id,
                    error: None,
                }
            }
            Err(err) => Msg::CancelSettled {
                task_id,
                error: Some(err.to_string()),
            },
        },
        ClientEvent::UrlsFetched {
            task_id,
            domain,
            result,
        } => Msg::UrlsArrived {
            task_id,
            domain,
            result: result.map_err(|err| err.to_string()),
        },
    }
}
