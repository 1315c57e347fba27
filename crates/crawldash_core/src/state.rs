use std::collections::BTreeMap;

use crate::task::{Task, TaskId, TaskStatus};
use crate::view_model::{AppViewModel, TaskRowView};

/// Reachability of the remote crawler service, fed by the health loop.
///
/// Health never touches the task collection; it only drives the banner.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ServiceHealth {
    /// No health check has completed yet.
    #[default]
    Unknown,
    /// The service answered; overall verdict plus per-component up/down
    /// flags as reported.
    Reachable {
        healthy: bool,
        components: Vec<ComponentHealth>,
    },
    /// The health endpoint itself could not be reached.
    Unreachable { detail: String },
}

/// One backend component (api, redis, ...) and whether it reports UP.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComponentHealth {
    pub name: String,
    pub up: bool,
}

/// Outcome of the most recent URL fetch for the selected task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UrlFetchOutcome {
    Loading,
    Loaded(Vec<String>),
    Failed(String),
}

/// URL results panel: which task/domain is being viewed and what came back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlPanel {
    pub task_id: TaskId,
    pub domain: String,
    pub outcome: UrlFetchOutcome,
}

/// Canonical client-side task state.
///
/// Owns the task collection (most-recently-created first, unique ids), the
/// selection back-reference, and the poll bookkeeping. All mutation goes
/// through [`crate::update`]; the platform layer only reads views and
/// consumes the dirty flag.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppState {
    tasks: Vec<Task>,
    selected: Option<TaskId>,
    service: ServiceHealth,
    url_panel: Option<UrlPanel>,
    notice: Option<String>,
    status_poll_in_flight: bool,
    health_poll_in_flight: bool,
    dirty: bool,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn view(&self) -> AppViewModel {
        let tasks = self
            .tasks
            .iter()
            .map(|task| TaskRowView {
                task_id: task.task_id.clone(),
                domains: task.domains.clone(),
                max_depth: task.max_depth,
                status: task.status,
                created_at: task.created_at.clone(),
                selected: self.selected.as_deref() == Some(task.task_id.as_str()),
                cancellable: matches!(
                    task.status,
                    TaskStatus::Pending | TaskStatus::Started | TaskStatus::Progress
                ),
            })
            .collect();

        AppViewModel {
            service: self.service.clone(),
            tasks,
            selected_task: self.selected_task().cloned(),
            url_panel: self.url_panel.clone(),
            notice: self.notice.clone(),
        }
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn selected_task(&self) -> Option<&Task> {
        let selected = self.selected.as_deref()?;
        self.tasks.iter().find(|task| task.task_id == selected)
    }

    /// Ids the status loop should poll next tick: everything non-terminal.
    pub fn pollable_task_ids(&self) -> Vec<TaskId> {
        self.tasks
            .iter()
            .filter(|task| !task.status.is_terminal())
            .map(|task| task.task_id.clone())
            .collect()
    }

    /// Returns whether a re-render is due and resets the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub(crate) fn tasks_snapshot(&self) -> Vec<Task> {
        self.tasks.clone()
    }

    /// Replace the collection wholesale. Only the startup restore path uses
    /// this; every later mutation is keyed by id.
    pub(crate) fn restore(&mut self, tasks: Vec<Task>) {
        self.selected = tasks.first().map(|task| task.task_id.clone());
        self.tasks = tasks;
        self.mark_dirty();
    }

    /// Prepend a freshly created task and select it. A duplicate id (server
    /// ids are assumed unique, so this is a degenerate case) replaces the
    /// existing entry in its slot instead of duplicating it.
    pub(crate) fn insert_front(&mut self, task: Task) {
        self.selected = Some(task.task_id.clone());
        self.url_panel = None;
        if let Some(existing) = self
            .tasks
            .iter_mut()
            .find(|existing| existing.task_id == task.task_id)
        {
            *existing = task;
        } else {
            self.tasks.insert(0, task);
        }
        self.mark_dirty();
    }

    /// Apply a polled status snapshot onto the collection.
    ///
    /// Tasks absent from the snapshot are left untouched, so a partial poll
    /// failure never regresses state. A terminal local status wins over any
    /// stale in-flight response, and an incoming `Unknown` is a placeholder
    /// rather than an observation and never replaces a real status. Returns
    /// whether anything changed; unchanged ticks cost no persist or render.
    pub(crate) fn merge_statuses(&mut self, snapshot: &BTreeMap<TaskId, TaskStatus>) -> bool {
        let mut changed = false;
        for task in &mut self.tasks {
            let Some(&incoming) = snapshot.get(&task.task_id) else {
                continue;
            };
            if incoming == task.status || incoming == TaskStatus::Unknown {
                continue;
            }
            if task.status.is_terminal() {
                continue;
            }
            task.status = incoming;
            changed = true;
        }
        if changed {
            self.mark_dirty();
        }
        changed
    }

    /// Optimistic local cancellation. Returns false if the task is missing
    /// or already settled.
    pub(crate) fn revoke(&mut self, task_id: &str) -> bool {
        let Some(task) = self.tasks.iter_mut().find(|task| task.task_id == task_id) else {
            return false;
        };
        if task.status.is_terminal() {
            return false;
        }
        task.status = TaskStatus::Revoked;
        self.mark_dirty();
        true
    }

    pub(crate) fn select(&mut self, task_id: &str) -> bool {
        if self.selected.as_deref() == Some(task_id) {
            return false;
        }
        if !self.tasks.iter().any(|task| task.task_id == task_id) {
            return false;
        }
        self.selected = Some(task_id.to_string());
        // Stale results from the previously selected task would mislead.
        self.url_panel = None;
        self.mark_dirty();
        true
    }

    pub(crate) fn clear_all(&mut self) {
        self.tasks.clear();
        self.selected = None;
        self.url_panel = None;
        self.mark_dirty();
    }

    pub(crate) fn set_url_panel(&mut self, panel: UrlPanel) {
        self.url_panel = Some(panel);
        self.mark_dirty();
    }

    pub(crate) fn url_panel(&self) -> Option<&UrlPanel> {
        self.url_panel.as_ref()
    }

    pub(crate) fn set_service_health(&mut self, health: ServiceHealth) {
        if self.service != health {
            self.service = health;
            self.mark_dirty();
        }
    }

    pub(crate) fn set_notice(&mut self, notice: impl Into<String>) {
        self.notice = Some(notice.into());
        self.mark_dirty();
    }

    pub(crate) fn status_poll_in_flight(&self) -> bool {
        self.status_poll_in_flight
    }

    pub(crate) fn set_status_poll_in_flight(&mut self, in_flight: bool) {
        self.status_poll_in_flight = in_flight;
    }

    pub(crate) fn health_poll_in_flight(&self) -> bool {
        self.health_poll_in_flight
    }

    pub(crate) fn set_health_poll_in_flight(&mut self, in_flight: bool) {
        self.health_poll_in_flight = in_flight;
    }
}
