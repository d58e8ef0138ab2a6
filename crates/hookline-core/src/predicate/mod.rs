//! Sidecar accounting over the live task runners of an allocation.
//!
//! These look only at what the caller passes in and are independent of gate state. The
//! allocation driver uses them to decide, for instance, whether an allocation made only of
//! sidecars still counts as doing work.

use std::sync::Arc;

use hookline_model::TaskSpec;

/// Anything that can expose the specification of the task it runs.
pub trait LifecycleTask {
    fn task(&self) -> &TaskSpec;
}

impl LifecycleTask for TaskSpec {
    #[inline]
    fn task(&self) -> &TaskSpec {
        self
    }
}

impl<T: LifecycleTask + ?Sized> LifecycleTask for &T {
    #[inline]
    fn task(&self) -> &TaskSpec {
        (**self).task()
    }
}

impl<T: LifecycleTask + ?Sized> LifecycleTask for Box<T> {
    #[inline]
    fn task(&self) -> &TaskSpec {
        (**self).task()
    }
}

impl<T: LifecycleTask + ?Sized> LifecycleTask for Arc<T> {
    #[inline]
    fn task(&self) -> &TaskSpec {
        (**self).task()
    }
}

/// Returns `false` if every given task is a sidecar (or there are none).
pub fn has_non_sidecar_tasks<I>(tasks: I) -> bool
where
    I: IntoIterator,
    I::Item: LifecycleTask,
{
    tasks.into_iter().any(|t| !t.task().is_sidecar())
}

/// Returns `true` if at least one given task is a sidecar.
pub fn has_sidecar_tasks<I>(tasks: I) -> bool
where
    I: IntoIterator,
    I::Item: LifecycleTask,
{
    tasks.into_iter().any(|t| t.task().is_sidecar())
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use hookline_model::{LifecycleHook, TaskLifecycle};

    use super::*;

    struct FakeRunner {
        spec: TaskSpec,
    }

    impl LifecycleTask for FakeRunner {
        fn task(&self) -> &TaskSpec {
            &self.spec
        }
    }

    fn runner(spec: TaskSpec) -> Arc<FakeRunner> {
        Arc::new(FakeRunner { spec })
    }

    #[test]
    fn only_sidecars_means_no_non_sidecar_tasks() {
        let runners = vec![
            runner(TaskSpec::prestart("side-a", true)),
            runner(TaskSpec::prestart("side-b", true)),
        ];
        assert!(!has_non_sidecar_tasks(&runners));
        assert!(has_sidecar_tasks(&runners));
    }

    #[test]
    fn task_without_lifecycle_is_not_a_sidecar() {
        let runners = vec![
            runner(TaskSpec::prestart("side", true)),
            runner(TaskSpec::new("web")),
        ];
        assert!(has_non_sidecar_tasks(&runners));
    }

    #[test]
    fn ephemeral_prestart_is_not_a_sidecar() {
        let tasks = [TaskSpec::prestart("init", false), TaskSpec::main("web")];
        assert!(has_non_sidecar_tasks(&tasks));
        assert!(!has_sidecar_tasks(&tasks));
    }

    #[test]
    fn sidecar_flag_counts_regardless_of_hook() {
        let odd = TaskSpec::new("odd").with_lifecycle(TaskLifecycle::new(LifecycleHook::Main, true));
        assert!(has_sidecar_tasks([&odd]));
        assert!(!has_non_sidecar_tasks([&odd]));
    }

    #[test]
    fn works_over_runner_map_values() {
        let mut by_name: HashMap<String, Arc<FakeRunner>> = HashMap::new();
        by_name.insert("web".into(), runner(TaskSpec::main("web")));
        assert!(!has_sidecar_tasks(by_name.values()));

        by_name.insert("side".into(), runner(TaskSpec::prestart("side", true)));
        assert!(has_sidecar_tasks(by_name.values()));
    }

    #[test]
    fn empty_collections() {
        let none: Vec<TaskSpec> = Vec::new();
        assert!(!has_non_sidecar_tasks(&none));
        assert!(!has_sidecar_tasks(&none));
    }
}
