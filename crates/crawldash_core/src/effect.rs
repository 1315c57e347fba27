use crate::task::{Task, TaskId};

/// Side effects requested by [`crate::update`], executed by the platform
/// layer. Persistence effects carry the snapshot so the runner stays
/// stateless with respect to the collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Write the whole collection to the durable store.
    PersistTasks(Vec<Task>),
    /// Remove the durable store entry entirely.
    ClearStore,
    /// Submit a new crawl to the service.
    StartCrawl { domains: Vec<String>, max_depth: u8 },
    /// Request fresh statuses for these tasks, concurrently, and report one
    /// settled snapshot back.
    PollStatuses { task_ids: Vec<TaskId> },
    /// Issue one health check.
    CheckHealth,
    /// Ask the server to cancel a task.
    CancelTask { task_id: TaskId },
    /// Fetch extracted URLs for one domain of a task.
    FetchUrls { task_id: TaskId, domain: String },
}
