use std::collections::BTreeSet;

use hookline_model::{LifecycleHook, TaskName, TaskSpec};
use tracing::{error, trace};

use crate::error::LifecycleError;

/// Pending dependency sets derived from an allocation's task list.
#[derive(Debug, Default)]
pub(crate) struct Classification {
    /// Prestart sidecars that have not been seen started yet.
    pub(crate) sidecars: BTreeSet<TaskName>,
    /// Prestart ephemeral tasks that have not been seen succeeding yet.
    pub(crate) ephemerals: BTreeSet<TaskName>,
    /// Main tasks that have not been seen started yet.
    ///
    /// Nothing adds to this set during classification, so poststart tasks never wait on it.
    pub(crate) main: BTreeSet<TaskName>,
    pub(crate) issues: Vec<LifecycleError>,
}

impl Classification {
    /// Partition `tasks` into pending sets.
    ///
    /// `is_retired` filters out names an earlier update already satisfied, so a re-run never
    /// puts a name back into a set it left.
    pub(crate) fn of<F>(tasks: &[TaskSpec], is_retired: F) -> Self
    where
        F: Fn(&str) -> bool,
    {
        let mut out = Self::default();

        for task in tasks {
            let Some(lifecycle) = &task.lifecycle else {
                continue;
            };

            match &lifecycle.hook {
                LifecycleHook::Prestart if is_retired(task.name.as_str()) => {
                    trace!(task = %task.name, "prestart dependency already satisfied");
                }
                LifecycleHook::Prestart if lifecycle.sidecar => {
                    out.sidecars.insert(task.name.clone());
                }
                LifecycleHook::Prestart => {
                    out.ephemerals.insert(task.name.clone());
                }
                LifecycleHook::Poststart | LifecycleHook::Main => {}
                LifecycleHook::Unrecognized(raw) => {
                    error!(task = %task.name, hook = %raw, "invalid lifecycle hook");
                    out.issues.push(LifecycleError::InvalidHook {
                        task: task.name.clone(),
                        hook: lifecycle.hook.clone(),
                    });
                }
            }
        }

        out
    }

    #[inline]
    pub(crate) fn has_prestart_pending(&self) -> bool {
        !(self.sidecars.is_empty() && self.ephemerals.is_empty())
    }

    #[inline]
    pub(crate) fn has_main_pending(&self) -> bool {
        !self.main.is_empty()
    }
}
