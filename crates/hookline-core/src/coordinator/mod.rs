//! Allocation-wide start ordering.
//!
//! The [`Coordinator`] tracks which lifecycle dependencies are still unsatisfied and opens the
//! gates in its [`GateSet`] once they are all met:
//! - the main gate opens when every prestart sidecar has started and every prestart ephemeral
//!   task has succeeded;
//! - the poststart gate opens when no main task is pending.
//!
//! Pending sets only ever shrink and gates only ever open.
//!
//! ## Ownership
//! All mutating methods take `&mut self`: exactly one driver owns the coordinator. Task runners
//! get [`StartCondition`]s or a cloned [`GateSet`] and never touch the pending sets.

use std::collections::{BTreeSet, HashSet};

use hookline_model::{TaskName, TaskSpec, TaskStates};
use tracing::{debug, info, instrument, trace};

use crate::{
    error::LifecycleError,
    gate::{GateKind, GateSet, StartCondition},
};

mod classify;
use classify::Classification;

#[derive(Debug)]
pub struct Coordinator {
    gates: GateSet,
    pending: Classification,
    /// Names removed from a pending set by an update; never pending again.
    retired: HashSet<TaskName>,
}

impl Coordinator {
    /// Build the coordinator for an allocation's full task list.
    ///
    /// The main gate opens right away if the allocation has no prestart tasks.
    #[instrument(level = "debug", skip_all, fields(tasks = tasks.len()))]
    pub fn new(tasks: &[TaskSpec]) -> Self {
        let mut coordinator = Self {
            gates: GateSet::new(),
            pending: Classification::default(),
            retired: HashSet::new(),
        };
        coordinator.classify(tasks);
        coordinator
    }

    /// Re-derive the pending sets from an updated task list.
    ///
    /// Names already retired by an earlier update stay retired, and open gates stay open.
    #[instrument(level = "debug", skip_all, fields(tasks = tasks.len()))]
    pub fn reclassify(&mut self, tasks: &[TaskSpec]) {
        self.classify(tasks);
    }

    fn classify(&mut self, tasks: &[TaskSpec]) {
        let retired = &self.retired;
        self.pending = Classification::of(tasks, |name| retired.contains(name));

        debug!(
            sidecars = self.pending.sidecars.len(),
            ephemerals = self.pending.ephemerals.len(),
            issues = self.pending.issues.len(),
            "tasks classified"
        );
        self.open_satisfied_gates();
    }

    /// Feed the latest task states.
    ///
    /// Snapshots may be partial, repeated or stale: a task without an entry is simply not
    /// satisfied yet. Nothing here ever fails.
    pub fn on_state_update(&mut self, states: &TaskStates) {
        if self.gates.is_open(GateKind::Main) {
            trace!("prestart phase resolved; ignoring state update");
            return;
        }

        // Sidecars keep running, so having started is enough.
        retire(&mut self.pending.sidecars, &mut self.retired, "sidecar", |name| {
            states.get(name).is_some_and(|st| st.has_started())
        });
        // Ephemeral setup tasks have to run to completion.
        retire(&mut self.pending.ephemerals, &mut self.retired, "ephemeral", |name| {
            states.get(name).is_some_and(|st| st.successful())
        });
        retire(&mut self.pending.main, &mut self.retired, "main", |name| {
            states.get(name).is_some_and(|st| st.has_started())
        });

        self.open_satisfied_gates();
    }

    fn open_satisfied_gates(&self) {
        if !self.pending.has_prestart_pending() && self.gates.open(GateKind::Main) {
            info!(gate = %GateKind::Main, "prestart dependencies satisfied; gate opened");
        }
        if !self.pending.has_main_pending() && self.gates.open(GateKind::Poststart) {
            info!(gate = %GateKind::Poststart, "main tasks started; gate opened");
        }
    }

    /// Handle the runner of `task` has to wait on before starting it.
    #[inline]
    pub fn wait_handle_for(&self, task: &TaskSpec) -> StartCondition {
        self.gates.wait_handle_for(task)
    }

    /// Shared view of the gates, for task runners living elsewhere.
    pub fn gates(&self) -> GateSet {
        self.gates.clone()
    }

    #[inline]
    pub fn is_main_open(&self) -> bool {
        self.gates.is_open(GateKind::Main)
    }

    #[inline]
    pub fn is_poststart_open(&self) -> bool {
        self.gates.is_open(GateKind::Poststart)
    }

    /// Prestart sidecars not yet seen started, sorted by name.
    pub fn pending_sidecars(&self) -> Vec<&str> {
        self.pending.sidecars.iter().map(String::as_str).collect()
    }

    /// Prestart ephemeral tasks not yet seen succeeding, sorted by name.
    pub fn pending_ephemerals(&self) -> Vec<&str> {
        self.pending.ephemerals.iter().map(String::as_str).collect()
    }

    /// Main tasks not yet seen started, sorted by name.
    pub fn pending_main(&self) -> Vec<&str> {
        self.pending.main.iter().map(String::as_str).collect()
    }

    /// Problems found by the latest classification.
    pub fn issues(&self) -> &[LifecycleError] {
        &self.pending.issues
    }
}

/// Drop every name in `pending` for which `satisfied` holds, recording it as retired.
fn retire<F>(
    pending: &mut BTreeSet<TaskName>,
    retired: &mut HashSet<TaskName>,
    category: &'static str,
    satisfied: F,
) where
    F: Fn(&str) -> bool,
{
    pending.retain(|name| {
        if !satisfied(name.as_str()) {
            return true;
        }
        debug!(task = %name, category, "dependency satisfied");
        retired.insert(name.clone());
        false
    });
}
