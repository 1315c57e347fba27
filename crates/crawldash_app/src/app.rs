use std::path::PathBuf;
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use crawldash_client::{ClientHandle, ClientSettings};
use crawldash_core::{update, AppState, Msg, TaskId};
use dash_logging::{dash_error, dash_info, dash_warn, LogDestination};

use crate::effects::{msg_for_event, EffectRunner};
use crate::form;
use crate::store::TaskStoreAdapter;
use crate::ui::{self, UiIntent};

// Status polls are frequent; health checks can afford a slower cadence.
const STATUS_POLL_INTERVAL: Duration = Duration::from_secs(5);
const HEALTH_POLL_INTERVAL: Duration = Duration::from_secs(30);
/// How long the main loop waits for input before draining client events.
const EVENT_POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Everything the single-threaded main loop consumes: core messages from
/// the timers and the client pump, raw intents from the terminal.
enum AppEvent {
    Core(Msg),
    Ui(UiIntent),
}

pub fn run() {
    dash_logging::initialize(LogDestination::File);

    let settings = ClientSettings {
        base_url: std::env::var("CRAWLDASH_API_URL")
            .unwrap_or_else(|_| ClientSettings::default().base_url),
        ..ClientSettings::default()
    };
    let state_dir = std::env::var_os("CRAWLDASH_STATE_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|| std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")));

    dash_info!(
        "Starting crawldash against {} (state dir {:?})",
        settings.base_url,
        state_dir
    );

    let client = match ClientHandle::new(settings) {
        Ok(client) => client,
        Err(err) => {
            dash_error!("Cannot construct API client: {}", err);
            eprintln!("Invalid service configuration: {err}");
            return;
        }
    };

    let store = TaskStoreAdapter::new(state_dir);
    let cached_tasks = store.load();
    let runner = EffectRunner::new(client, store);

    let (event_tx, event_rx) = mpsc::channel::<AppEvent>();
    spawn_interval(event_tx.clone(), Msg::StatusPollDue, STATUS_POLL_INTERVAL);
    spawn_interval(event_tx.clone(), Msg::HealthPollDue, HEALTH_POLL_INTERVAL);
    spawn_stdin_reader(event_tx);

    let mut state = AppState::new();
    ui::print_help();
    dispatch(&mut state, &runner, Msg::TasksRestored(cached_tasks));

    loop {
        let incoming = match event_rx.recv_timeout(EVENT_POLL_INTERVAL) {
            Ok(event) => Some(event),
            Err(mpsc::RecvTimeoutError::Timeout) => None,
            Err(mpsc::RecvTimeoutError::Disconnected) => break,
        };

        match incoming {
            Some(AppEvent::Core(msg)) => dispatch(&mut state, &runner, msg),
            Some(AppEvent::Ui(UiIntent::Quit)) => break,
            Some(AppEvent::Ui(intent)) => {
                if let Some(msg) = msg_for_intent(&state, intent) {
                    dispatch(&mut state, &runner, msg);
                }
            }
            None => {}
        }

        // Settled network calls since the last pass.
        while let Some(event) = runner.next_event() {
            let msg = msg_for_event(event);
            dispatch(&mut state, &runner, msg);
        }

        if state.consume_dirty() {
            ui::render(&state.view());
        }
    }

    dash_info!("Shutting down");
}

/// Apply one message and execute its effects before anything else runs, so
/// a persisted snapshot is never older than the in-memory state for longer
/// than the current loop pass.
fn dispatch(state: &mut AppState, runner: &EffectRunner, msg: Msg) {
    let (next, effects) = update(std::mem::take(state), msg);
    *state = next;
    runner.run(effects);
}

/// Turn a raw terminal intent into a core message; validation and task-id
/// resolution stay outside the core.
fn msg_for_intent(state: &AppState, intent: UiIntent) -> Option<Msg> {
    match intent {
        UiIntent::Crawl {
            domains_raw,
            depth_raw,
        } => match form::parse_crawl_request(&domains_raw, &depth_raw) {
            Ok((domains, max_depth)) => Some(Msg::CrawlSubmitted { domains, max_depth }),
            Err(reason) => {
                println!("{reason}");
                None
            }
        },
        UiIntent::Select { task_ref } => {
            resolve_task_id(state, &task_ref).map(|task_id| Msg::TaskSelected { task_id })
        }
        UiIntent::Cancel { task_ref } => {
            resolve_task_id(state, &task_ref).map(|task_id| Msg::CancelRequested { task_id })
        }
        UiIntent::Urls { domain } => Some(Msg::UrlsRequested { domain }),
        UiIntent::Clear => Some(Msg::ClearAllRequested),
        UiIntent::Help => {
            ui::print_help();
            None
        }
        // Quit never reaches here; the loop handles it.
        UiIntent::Quit => None,
    }
}

/// Resolve a typed task reference: exact id first, then unique prefix.
fn resolve_task_id(state: &AppState, task_ref: &str) -> Option<TaskId> {
    let tasks = state.tasks();
    if let Some(task) = tasks.iter().find(|task| task.task_id == task_ref) {
        return Some(task.task_id.clone());
    }

    let matches: Vec<&TaskId> = tasks
        .iter()
        .filter(|task| task.task_id.starts_with(task_ref))
        .map(|task| &task.task_id)
        .collect();
    match matches.as_slice() {
        [] => {
            println!("No task matches {task_ref:?}");
            None
        }
        [task_id] => Some((*task_id).clone()),
        _ => {
            println!("Ambiguous task id prefix {task_ref:?}");
            None
        }
    }
}

fn spawn_interval(event_tx: mpsc::Sender<AppEvent>, msg: Msg, interval: Duration) {
    thread::spawn(move || {
        // First send fires immediately, matching the fetch-on-mount
        // behaviour of the poll loops.
        while event_tx.send(AppEvent::Core(msg.clone())).is_ok() {
            thread::sleep(interval);
        }
    });
}

fn spawn_stdin_reader(event_tx: mpsc::Sender<AppEvent>) {
    thread::spawn(move || {
        let stdin = std::io::stdin();
        let mut line = String::new();
        loop {
            line.clear();
            match stdin.read_line(&mut line) {
                Ok(0) => {
                    let _ = event_tx.send(AppEvent::Ui(UiIntent::Quit));
                    break;
                }
                Ok(_) => {
                    let trimmed = line.trim();
                    if trimmed.is_empty() {
                        continue;
                    }
                    match ui::parse_intent(trimmed) {
                        Ok(intent) => {
                            if event_tx.send(AppEvent::Ui(intent)).is_err() {
                                break;
                            }
                        }
                        Err(reason) => println!("{reason}"),
                    }
                }
                Err(err) => {
                    dash_warn!("Reading stdin failed: {}", err);
                    break;
                }
            }
        }
    });
}
