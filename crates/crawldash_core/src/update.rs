use crate::state::{UrlFetchOutcome, UrlPanel};
use crate::{AppState, Effect, Msg};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::TasksRestored(tasks) => {
            if tasks.is_empty() {
                return (state, Vec::new());
            }
            state.restore(tasks);
            Vec::new()
        }
        Msg::CrawlSubmitted { domains, max_depth } => {
            vec![Effect::StartCrawl { domains, max_depth }]
        }
        Msg::TaskCreated(task) => {
            state.insert_front(task);
            vec![Effect::PersistTasks(state.tasks_snapshot())]
        }
        Msg::CrawlRejected { reason } => {
            state.set_notice(format!("Failed to start crawl: {reason}"));
            Vec::new()
        }
        Msg::StatusPollDue => {
            // One tick at a time; a tick that arrives while requests are
            // still outstanding is skipped, not queued.
            if state.status_poll_in_flight() {
                return (state, Vec::new());
            }
            let task_ids = state.pollable_task_ids();
            if task_ids.is_empty() {
                Vec::new()
            } else {
                state.set_status_poll_in_flight(true);
                vec![Effect::PollStatuses { task_ids }]
            }
        }
        Msg::StatusSnapshot(snapshot) => {
            state.set_status_poll_in_flight(false);
            if state.merge_statuses(&snapshot) {
                vec![Effect::PersistTasks(state.tasks_snapshot())]
            } else {
                Vec::new()
            }
        }
        Msg::CancelRequested { task_id } => {
            // Optimistic: REVOKED locally first, server acknowledgment
            // second. There is no rollback path if the server disagrees.
            if state.revoke(&task_id) {
                vec![
                    Effect::PersistTasks(state.tasks_snapshot()),
                    Effect::CancelTask { task_id },
                ]
            } else {
                Vec::new()
            }
        }
        Msg::CancelSettled { task_id, error } => {
            if let Some(reason) = error {
                state.set_notice(format!("Failed to cancel task {task_id}: {reason}"));
            }
            Vec::new()
        }
        Msg::TaskSelected { task_id } => {
            state.select(&task_id);
            Vec::new()
        }
        Msg::ClearAllRequested => {
            state.clear_all();
            vec![Effect::ClearStore]
        }
        Msg::HealthPollDue => {
            if state.health_poll_in_flight() {
                return (state, Vec::new());
            }
            state.set_health_poll_in_flight(true);
            vec![Effect::CheckHealth]
        }
        Msg::HealthReport { health } => {
            state.set_health_poll_in_flight(false);
            state.set_service_health(health);
            Vec::new()
        }
        Msg::UrlsRequested { domain } => {
            let Some(task) = state.selected_task() else {
                return (state, Vec::new());
            };
            if !task.domains.iter().any(|candidate| candidate == &domain) {
                return (state, Vec::new());
            }
            let task_id = task.task_id.clone();
            state.set_url_panel(UrlPanel {
                task_id: task_id.clone(),
                domain: domain.clone(),
                outcome: UrlFetchOutcome::Loading,
            });
            vec![Effect::FetchUrls { task_id, domain }]
        }
        Msg::UrlsArrived {
            task_id,
            domain,
            result,
        } => {
            // Only the fetch the panel is still waiting for may land;
            // selection changes since the request was issued drop it.
            let still_wanted = state
                .url_panel()
                .is_some_and(|panel| panel.task_id == task_id && panel.domain == domain);
            if !still_wanted {
                return (state, Vec::new());
            }
            let outcome = match result {
                Ok(urls) => UrlFetchOutcome::Loaded(urls),
                Err(reason) => UrlFetchOutcome::Failed(reason),
            };
            state.set_url_panel(UrlPanel {
                task_id,
                domain,
                outcome,
            });
            Vec::new()
        }
        Msg::NoOp => Vec::new(),
    };

    (state, effects)
}
