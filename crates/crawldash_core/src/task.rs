use std::fmt;

/// Opaque task identifier issued by the crawler service.
pub type TaskId = String;

/// Lifecycle status of a crawl task as reported by the service.
///
/// `Unknown` is client-assigned: it marks a task whose status has never been
/// observed (for example one restored from a cache written by an older
/// session). It is still pollable but is never an authoritative observation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TaskStatus {
    Pending,
    Started,
    Progress,
    Success,
    Failure,
    Revoked,
    #[default]
    Unknown,
}

impl TaskStatus {
    /// Terminal statuses are settled; the server is not expected to report
    /// anything further for such a task.
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            TaskStatus::Success | TaskStatus::Failure | TaskStatus::Revoked
        )
    }

    /// Wire form used by the HTTP contract and the durable cache.
    pub fn as_str(self) -> &'static str {
        match self {
            TaskStatus::Pending => "PENDING",
            TaskStatus::Started => "STARTED",
            TaskStatus::Progress => "PROGRESS",
            TaskStatus::Success => "SUCCESS",
            TaskStatus::Failure => "FAILURE",
            TaskStatus::Revoked => "REVOKED",
            TaskStatus::Unknown => "UNKNOWN",
        }
    }

    /// Parse the wire form. Unrecognized strings collapse to `Unknown` so a
    /// newer server vocabulary cannot wedge the client.
    pub fn from_wire(raw: &str) -> Self {
        match raw {
            "PENDING" => TaskStatus::Pending,
            "STARTED" => TaskStatus::Started,
            "PROGRESS" => TaskStatus::Progress,
            "SUCCESS" => TaskStatus::Success,
            "FAILURE" => TaskStatus::Failure,
            "REVOKED" => TaskStatus::Revoked,
            _ => TaskStatus::Unknown,
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One crawl job as known to the client.
///
/// Only `status` mutates after creation; everything else is fixed at the
/// moment the server acknowledges the submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Task {
    pub task_id: TaskId,
    /// Ordered, non-empty list of domains submitted for this task.
    pub domains: Vec<String>,
    /// Crawl depth limit, 1..=5, validated at the form boundary.
    pub max_depth: u8,
    pub status: TaskStatus,
    /// Client-assigned RFC3339 creation timestamp; opaque to the core.
    pub created_at: String,
}
