mod lifecycle_hook;
pub use lifecycle_hook::LifecycleHook;

mod task_spec;
pub use task_spec::{TaskLifecycle, TaskSpec};

mod task_status;
pub use task_status::TaskStatus;

mod task_state;
pub use task_state::TaskState;

use std::collections::HashMap;

/// Task name, unique within an allocation.
pub type TaskName = String;

/// Snapshot of the last known state of each task, keyed by task name.
///
/// Snapshots may be partial: a task without an entry simply has nothing reported yet.
pub type TaskStates = HashMap<TaskName, TaskState>;
