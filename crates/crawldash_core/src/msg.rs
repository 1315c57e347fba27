use std::collections::BTreeMap;

use crate::state::ServiceHealth;
use crate::task::{Task, TaskId, TaskStatus};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// Startup: tasks loaded from the durable store.
    TasksRestored(Vec<Task>),
    /// Form boundary submitted a validated crawl request.
    CrawlSubmitted { domains: Vec<String>, max_depth: u8 },
    /// The server acknowledged a crawl submission with a fresh task.
    TaskCreated(Task),
    /// The server rejected a crawl submission.
    CrawlRejected { reason: String },
    /// Status poll interval elapsed.
    StatusPollDue,
    /// All per-task status requests of one poll tick have settled; the map
    /// holds the successes only.
    StatusSnapshot(BTreeMap<TaskId, TaskStatus>),
    /// User asked to cancel a task.
    CancelRequested { task_id: TaskId },
    /// The server cancel call finished, successfully or not.
    CancelSettled {
        task_id: TaskId,
        error: Option<String>,
    },
    /// User selected a task for detail viewing.
    TaskSelected { task_id: TaskId },
    /// User asked to drop every task from the list and the cache.
    ClearAllRequested,
    /// Health poll interval elapsed.
    HealthPollDue,
    /// A health check settled.
    HealthReport { health: ServiceHealth },
    /// User asked for the extracted URLs of one of the selected task's
    /// domains.
    UrlsRequested { domain: String },
    /// A URL fetch settled.
    UrlsArrived {
        task_id: TaskId,
        domain: String,
        result: Result<Vec<String>, String>,
    },
    /// Fallback for placeholder wiring.
    NoOp,
}
