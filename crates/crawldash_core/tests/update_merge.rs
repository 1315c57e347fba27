use std::collections::BTreeMap;

use crawldash_core::{update, AppState, Effect, Msg, Task, TaskStatus};

fn task(id: &str, status: TaskStatus) -> Task {
    Task {
        task_id: id.to_string(),
        domains: vec![format!("{id}.example.com")],
        max_depth: 2,
        status,
        created_at: "2026-08-30T10:00:00+00:00".to_string(),
    }
}

fn state_with(tasks: Vec<Task>) -> AppState {
    let (mut state, _) = update(AppState::new(), Msg::TasksRestored(tasks));
    state.consume_dirty();
    state
}

fn snapshot(entries: &[(&str, TaskStatus)]) -> BTreeMap<String, TaskStatus> {
    entries
        .iter()
        .map(|(id, status)| (id.to_string(), *status))
        .collect()
}

fn status_of(state: &AppState, id: &str) -> TaskStatus {
    state
        .tasks()
        .iter()
        .find(|task| task.task_id == id)
        .unwrap()
        .status
}

#[test]
fn merge_updates_present_tasks_and_leaves_absent_ones_untouched() {
    let state = state_with(vec![
        task("t1", TaskStatus::Pending),
        task("t2", TaskStatus::Started),
    ]);

    // t2's status request failed this tick, so it is absent from the map.
    let (mut state, effects) = update(
        state,
        Msg::StatusSnapshot(snapshot(&[("t1", TaskStatus::Started)])),
    );

    assert_eq!(status_of(&state, "t1"), TaskStatus::Started);
    assert_eq!(status_of(&state, "t2"), TaskStatus::Started);
    assert!(state.consume_dirty());
    assert!(matches!(effects.as_slice(), [Effect::PersistTasks(_)]));
}

#[test]
fn merge_with_no_changes_persists_and_renders_nothing() {
    let state = state_with(vec![task("t1", TaskStatus::Started)]);

    let (mut state, effects) = update(
        state,
        Msg::StatusSnapshot(snapshot(&[("t1", TaskStatus::Started)])),
    );

    assert!(effects.is_empty());
    assert!(!state.consume_dirty());
}

#[test]
fn merge_is_idempotent() {
    let state = state_with(vec![
        task("t1", TaskStatus::Pending),
        task("t2", TaskStatus::Pending),
    ]);
    let map = snapshot(&[("t1", TaskStatus::Progress), ("t2", TaskStatus::Success)]);

    let (once, _) = update(state, Msg::StatusSnapshot(map.clone()));
    let tasks_after_once = once.tasks().to_vec();

    let (twice, effects) = update(once, Msg::StatusSnapshot(map));
    assert_eq!(twice.tasks(), tasks_after_once.as_slice());
    assert!(effects.is_empty());
}

#[test]
fn merge_never_introduces_tasks() {
    let state = state_with(vec![task("t1", TaskStatus::Pending)]);

    let (state, _) = update(
        state,
        Msg::StatusSnapshot(snapshot(&[
            ("t1", TaskStatus::Started),
            ("ghost", TaskStatus::Success),
        ])),
    );

    assert_eq!(state.tasks().len(), 1);
}

#[test]
fn unknown_never_overwrites_an_observed_status() {
    let state = state_with(vec![task("t1", TaskStatus::Progress)]);

    let (state, effects) = update(
        state,
        Msg::StatusSnapshot(snapshot(&[("t1", TaskStatus::Unknown)])),
    );

    assert_eq!(status_of(&state, "t1"), TaskStatus::Progress);
    assert!(effects.is_empty());
}

#[test]
fn unknown_restored_task_accepts_its_first_real_status() {
    let state = state_with(vec![task("t1", TaskStatus::Unknown)]);

    let (state, _) = update(
        state,
        Msg::StatusSnapshot(snapshot(&[("t1", TaskStatus::Success)])),
    );

    assert_eq!(status_of(&state, "t1"), TaskStatus::Success);
}

#[test]
fn stale_snapshot_cannot_resurrect_a_terminal_task() {
    let state = state_with(vec![task("t1", TaskStatus::Started)]);

    // User cancels while a poll is in flight.
    let (state, _) = update(
        state,
        Msg::CancelRequested {
            task_id: "t1".to_string(),
        },
    );
    assert_eq!(status_of(&state, "t1"), TaskStatus::Revoked);

    // The stale response reports the pre-cancel status; it must not apply.
    let (state, effects) = update(
        state,
        Msg::StatusSnapshot(snapshot(&[("t1", TaskStatus::Progress)])),
    );
    assert_eq!(status_of(&state, "t1"), TaskStatus::Revoked);
    assert!(effects.is_empty());
}

#[test]
fn task_created_while_poll_in_flight_survives_the_merge() {
    let state = state_with(vec![task("t1", TaskStatus::Pending)]);

    // Poll tick issued for t1 only.
    let (state, _) = update(state, Msg::StatusPollDue);

    // A new task lands before the poll resolves.
    let (state, _) = update(state, Msg::TaskCreated(task("t2", TaskStatus::Pending)));

    let (state, _) = update(
        state,
        Msg::StatusSnapshot(snapshot(&[("t1", TaskStatus::Started)])),
    );

    assert_eq!(state.tasks().len(), 2);
    assert_eq!(state.tasks()[0].task_id, "t2");
    assert_eq!(status_of(&state, "t2"), TaskStatus::Pending);
    assert_eq!(status_of(&state, "t1"), TaskStatus::Started);
}
