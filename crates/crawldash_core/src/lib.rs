//! Dashboard core: pure task-state synchronization engine and view-model
//! helpers. No I/O happens here; the platform layer executes the effects.
mod effect;
mod msg;
mod state;
mod task;
mod update;
mod view_model;

pub use effect::Effect;
pub use msg::Msg;
pub use state::{AppState, ComponentHealth, ServiceHealth, UrlFetchOutcome, UrlPanel};
pub use task::{Task, TaskId, TaskStatus};
pub use update::update;
pub use view_model::{AppViewModel, TaskRowView};
