use hookline_model::{LifecycleHook, TaskSpec};

use crate::gate::{Gate, GateKind, StartCondition};

/// The start gates of one allocation.
///
/// Cloning shares the underlying gates, so a clone can be handed to each task runner while the
/// coordinator keeps the ability to open them.
#[derive(Debug, Clone)]
pub struct GateSet {
    always: Gate,
    main: Gate,
    poststart: Gate,
}

impl GateSet {
    pub(crate) fn new() -> Self {
        Self {
            always: Gate::opened(GateKind::Always),
            main: Gate::new(GateKind::Main),
            poststart: Gate::new(GateKind::Poststart),
        }
    }

    /// Gate a task has to wait on before it may start.
    ///
    /// - prestart: nothing to wait for
    /// - poststart: main tasks started
    /// - everything else (main, no lifecycle, a hook this version does not recognize):
    ///   prestart dependencies satisfied
    pub fn gate_kind_for(&self, task: &TaskSpec) -> GateKind {
        match task.hook() {
            Some(LifecycleHook::Prestart) => GateKind::Always,
            Some(LifecycleHook::Poststart) => GateKind::Poststart,
            None | Some(LifecycleHook::Main) | Some(LifecycleHook::Unrecognized(_)) => {
                GateKind::Main
            }
        }
    }

    /// Handle the runner of `task` waits on.
    pub fn wait_handle_for(&self, task: &TaskSpec) -> StartCondition {
        self.gate(self.gate_kind_for(task)).condition()
    }

    #[inline]
    pub fn is_open(&self, kind: GateKind) -> bool {
        self.gate(kind).is_open()
    }

    fn gate(&self, kind: GateKind) -> &Gate {
        match kind {
            GateKind::Always => &self.always,
            GateKind::Main => &self.main,
            GateKind::Poststart => &self.poststart,
        }
    }

    /// Open the gate of the given kind. Returns `true` on the transition.
    pub(crate) fn open(&self, kind: GateKind) -> bool {
        self.gate(kind).open()
    }
}

#[cfg(test)]
mod tests {
    use hookline_model::TaskLifecycle;

    use super::*;

    #[test]
    fn dispatch_by_lifecycle() {
        let gates = GateSet::new();

        assert_eq!(gates.gate_kind_for(&TaskSpec::new("plain")), GateKind::Main);
        assert_eq!(gates.gate_kind_for(&TaskSpec::prestart("side", true)), GateKind::Always);
        assert_eq!(gates.gate_kind_for(&TaskSpec::prestart("init", false)), GateKind::Always);
        assert_eq!(gates.gate_kind_for(&TaskSpec::poststart("post")), GateKind::Poststart);
        assert_eq!(gates.gate_kind_for(&TaskSpec::main("web")), GateKind::Main);

        let odd = TaskSpec::new("odd").with_lifecycle(TaskLifecycle::new(
            LifecycleHook::Unrecognized("poststop".into()),
            false,
        ));
        assert_eq!(gates.gate_kind_for(&odd), GateKind::Main);
    }

    #[test]
    fn always_gate_is_open_others_closed() {
        let gates = GateSet::new();

        assert!(gates.wait_handle_for(&TaskSpec::prestart("init", false)).is_open());
        assert!(!gates.wait_handle_for(&TaskSpec::new("plain")).is_open());
        assert!(!gates.wait_handle_for(&TaskSpec::main("web")).is_open());
        assert!(!gates.wait_handle_for(&TaskSpec::poststart("post")).is_open());
    }

    #[test]
    fn clones_share_gates() {
        let gates = GateSet::new();
        let runner_view = gates.clone();
        let web = runner_view.wait_handle_for(&TaskSpec::main("web"));

        assert!(gates.open(GateKind::Main));
        assert!(web.is_open());
        assert!(runner_view.is_open(GateKind::Main));
        assert!(!runner_view.is_open(GateKind::Poststart));
    }

    #[test]
    fn always_gate_cannot_be_reopened() {
        let gates = GateSet::new();
        assert!(!gates.open(GateKind::Always));
    }
}
