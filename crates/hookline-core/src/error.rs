use hookline_model::{LifecycleHook, TaskName};
use thiserror::Error;

/// Recoverable problems found while classifying an allocation's tasks.
///
/// None of these abort the allocation; the affected task simply takes part in no
/// prestart/poststart ordering of its own.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LifecycleError {
    #[error("task {task}: invalid lifecycle hook \"{hook}\"")]
    InvalidHook { task: TaskName, hook: LifecycleHook },
}
