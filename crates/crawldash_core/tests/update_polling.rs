use std::collections::BTreeMap;

use crawldash_core::{
    update, AppState, ComponentHealth, Effect, Msg, ServiceHealth, Task, TaskStatus,
};

fn task(id: &str, status: TaskStatus) -> Task {
    Task {
        task_id: id.to_string(),
        domains: vec![format!("{id}.example.com")],
        max_depth: 1,
        status,
        created_at: "2026-08-30T10:00:00+00:00".to_string(),
    }
}

#[test]
fn poll_due_requests_exactly_the_non_terminal_tasks() {
    let (state, _) = update(
        AppState::new(),
        Msg::TasksRestored(vec![
            task("pending", TaskStatus::Pending),
            task("done", TaskStatus::Success),
            task("failed", TaskStatus::Failure),
            task("revoked", TaskStatus::Revoked),
            task("stale", TaskStatus::Unknown),
        ]),
    );

    let (_, effects) = update(state, Msg::StatusPollDue);

    match effects.as_slice() {
        [Effect::PollStatuses { task_ids }] => {
            assert_eq!(task_ids, &vec!["pending".to_string(), "stale".to_string()]);
        }
        other => panic!("expected one poll effect, got {other:?}"),
    }
}

#[test]
fn poll_due_with_no_pollable_tasks_is_a_no_op() {
    let (state, _) = update(
        AppState::new(),
        Msg::TasksRestored(vec![task("done", TaskStatus::Success)]),
    );

    let (_, effects) = update(state, Msg::StatusPollDue);
    assert!(effects.is_empty());

    let (_, effects) = update(AppState::new(), Msg::StatusPollDue);
    assert!(effects.is_empty());
}

#[test]
fn overlapping_status_ticks_are_skipped_until_the_snapshot_lands() {
    let (state, _) = update(
        AppState::new(),
        Msg::TasksRestored(vec![task("t1", TaskStatus::Pending)]),
    );

    let (state, first) = update(state, Msg::StatusPollDue);
    assert_eq!(first.len(), 1);

    // The interval fires again while requests are still outstanding.
    let (state, second) = update(state, Msg::StatusPollDue);
    assert!(second.is_empty());

    // Snapshot arrival ends the tick; polling resumes.
    let (state, _) = update(state, Msg::StatusSnapshot(BTreeMap::new()));
    let (_, third) = update(state, Msg::StatusPollDue);
    assert_eq!(third.len(), 1);
}

#[test]
fn cancelled_task_is_excluded_from_the_next_poll() {
    let (state, _) = update(
        AppState::new(),
        Msg::TasksRestored(vec![
            task("t1", TaskStatus::Started),
            task("t2", TaskStatus::Started),
        ]),
    );

    let (state, _) = update(
        state,
        Msg::CancelRequested {
            task_id: "t1".to_string(),
        },
    );

    assert_eq!(state.pollable_task_ids(), vec!["t2".to_string()]);
}

#[test]
fn health_ticks_do_not_overlap_and_reports_update_the_banner() {
    let (state, effects) = update(AppState::new(), Msg::HealthPollDue);
    assert_eq!(effects, vec![Effect::CheckHealth]);

    let (state, effects) = update(state, Msg::HealthPollDue);
    assert!(effects.is_empty());

    let health = ServiceHealth::Reachable {
        healthy: true,
        components: vec![
            ComponentHealth {
                name: "api".to_string(),
                up: true,
            },
            ComponentHealth {
                name: "redis".to_string(),
                up: true,
            },
        ],
    };
    let (mut state, _) = update(
        state,
        Msg::HealthReport {
            health: health.clone(),
        },
    );
    assert!(state.consume_dirty());
    assert_eq!(state.view().service, health);

    // Same report again: tick completes but nothing re-renders.
    let (state, _) = update(state, Msg::HealthPollDue);
    let (mut state, _) = update(state, Msg::HealthReport { health });
    assert!(!state.consume_dirty());
}

#[test]
fn health_failure_never_touches_the_task_collection() {
    let (state, _) = update(
        AppState::new(),
        Msg::TasksRestored(vec![task("t1", TaskStatus::Started)]),
    );
    let tasks_before = state.tasks().to_vec();

    let (state, _) = update(state, Msg::HealthPollDue);
    let (state, effects) = update(
        state,
        Msg::HealthReport {
            health: ServiceHealth::Unreachable {
                detail: "connection refused".to_string(),
            },
        },
    );

    assert_eq!(state.tasks(), tasks_before.as_slice());
    assert!(effects.is_empty());
    assert!(matches!(
        state.view().service,
        ServiceHealth::Unreachable { .. }
    ));
}
