use crate::state::{ServiceHealth, UrlPanel};
use crate::task::{Task, TaskId, TaskStatus};

/// Read-only projection of [`crate::AppState`] for rendering.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppViewModel {
    pub service: ServiceHealth,
    pub tasks: Vec<TaskRowView>,
    pub selected_task: Option<Task>,
    pub url_panel: Option<UrlPanel>,
    pub notice: Option<String>,
}

/// One row of the task list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskRowView {
    pub task_id: TaskId,
    pub domains: Vec<String>,
    pub max_depth: u8,
    pub status: TaskStatus,
    pub created_at: String,
    pub selected: bool,
    /// Only tasks the server could still be working on offer a cancel
    /// action; terminal and never-observed tasks do not.
    pub cancellable: bool,
}
