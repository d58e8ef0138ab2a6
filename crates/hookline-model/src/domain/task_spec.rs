use serde::{Deserialize, Serialize};

use crate::{LifecycleHook, TaskName};

/// Lifecycle descriptor attached to a task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskLifecycle {
    pub hook: LifecycleHook,
    /// Keep the task running alongside the main tasks.
    ///
    /// Only meaningful for [`LifecycleHook::Prestart`].
    #[serde(default)]
    pub sidecar: bool,
}

impl TaskLifecycle {
    pub fn new(hook: LifecycleHook, sidecar: bool) -> Self {
        Self { hook, sidecar }
    }

    #[inline]
    pub fn is_prestart(&self) -> bool {
        self.hook == LifecycleHook::Prestart
    }

    #[inline]
    pub fn is_sidecar(&self) -> bool {
        self.sidecar
    }
}

/// Specification of a single task inside an allocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskSpec {
    /// Task name, unique within the allocation.
    pub name: TaskName,
    /// Lifecycle descriptor; `None` means the task takes part in no lifecycle ordering.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lifecycle: Option<TaskLifecycle>,
}

impl TaskSpec {
    /// Task without a lifecycle descriptor.
    pub fn new(name: impl Into<TaskName>) -> Self {
        Self {
            name: name.into(),
            lifecycle: None,
        }
    }

    pub fn prestart(name: impl Into<TaskName>, sidecar: bool) -> Self {
        Self::new(name).with_lifecycle(TaskLifecycle::new(LifecycleHook::Prestart, sidecar))
    }

    pub fn poststart(name: impl Into<TaskName>) -> Self {
        Self::new(name).with_lifecycle(TaskLifecycle::new(LifecycleHook::Poststart, false))
    }

    pub fn main(name: impl Into<TaskName>) -> Self {
        Self::new(name).with_lifecycle(TaskLifecycle::new(LifecycleHook::Main, false))
    }

    pub fn with_lifecycle(mut self, lifecycle: TaskLifecycle) -> Self {
        self.lifecycle = Some(lifecycle);
        self
    }

    /// Hook of the lifecycle descriptor, if any.
    #[inline]
    pub fn hook(&self) -> Option<&LifecycleHook> {
        self.lifecycle.as_ref().map(|lc| &lc.hook)
    }

    /// Returns `true` if the task carries a sidecar flag.
    ///
    /// The flag is read regardless of the hook.
    #[inline]
    pub fn is_sidecar(&self) -> bool {
        self.lifecycle.as_ref().is_some_and(TaskLifecycle::is_sidecar)
    }
}
