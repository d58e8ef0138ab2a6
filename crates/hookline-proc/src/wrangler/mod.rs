//! Per-task process wranglers and the factory handing them out.

use std::{
    collections::HashMap,
    fmt,
    sync::{Arc, PoisonError, RwLock},
};

use tracing::{debug, info, instrument};

use crate::{
    CgroupMode, WranglerConfigs,
    cgroup,
    error::{WranglerError, WranglerResult},
};

mod noop;
pub use noop::NoopWrangler;

mod v1;
pub use v1::V1Wrangler;

mod v2;
pub use v2::V2Wrangler;

/// Identity of a task on the host: the allocation it belongs to plus its name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TaskIdentity {
    pub alloc_id: String,
    pub task: String,
}

impl TaskIdentity {
    pub fn new(alloc_id: impl Into<String>, task: impl Into<String>) -> Self {
        Self {
            alloc_id: alloc_id.into(),
            task: task.into(),
        }
    }

    /// Name of the control group directory for this task.
    pub(crate) fn group_name(&self) -> String {
        format!("{}.{}", self.alloc_id, self.task)
    }
}

impl fmt::Display for TaskIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.alloc_id, self.task)
    }
}

/// Owns the OS-level sandbox of a single task.
pub trait ProcessWrangler: Send + Sync {
    /// Create whatever the task's processes will be placed in.
    fn initialize(&self) -> WranglerResult<()>;
    /// Kill every process of the task.
    fn kill(&self) -> WranglerResult<()>;
    /// Remove the sandbox. Must tolerate it being already gone.
    fn cleanup(&self) -> WranglerResult<()>;
}

type Create = fn(&WranglerConfigs, &TaskIdentity) -> Arc<dyn ProcessWrangler>;

/// Factory and registry of process wranglers, one per task identity.
pub struct Wranglers {
    configs: WranglerConfigs,
    mode: CgroupMode,
    create: Create,
    m: RwLock<HashMap<TaskIdentity, Arc<dyn ProcessWrangler>>>,
}

impl Wranglers {
    /// Build the factory for this host.
    ///
    /// The mode is detected from `configs.cgroup_root` unless `configs.mode` forces one; forcing
    /// a mode the host does not have is an error, except for [`CgroupMode::Off`].
    pub fn new(configs: WranglerConfigs) -> WranglerResult<Self> {
        let detected = cgroup::detect(&configs.cgroup_root);
        let mode = match configs.mode {
            None => detected,
            Some(CgroupMode::Off) => CgroupMode::Off,
            Some(forced) if forced == detected => forced,
            Some(forced) => return Err(WranglerError::ModeUnavailable(forced)),
        };
        Ok(Self::with_mode(configs, mode))
    }

    pub(crate) fn with_mode(configs: WranglerConfigs, mode: CgroupMode) -> Self {
        let create: Create = match mode {
            CgroupMode::V1 => V1Wrangler::create,
            CgroupMode::V2 => V2Wrangler::create,
            CgroupMode::Off => NoopWrangler::create,
        };
        info!(
            %mode,
            root = %configs.cgroup_root.display(),
            parent = %configs.parent,
            "process wranglers ready"
        );
        Self {
            configs,
            mode,
            create,
            m: RwLock::new(HashMap::new()),
        }
    }

    #[inline]
    pub fn mode(&self) -> CgroupMode {
        self.mode
    }

    /// Create and initialize the wrangler for `task`, replacing any previous one.
    #[instrument(level = "debug", skip_all, fields(task = %task))]
    pub fn setup(&self, task: TaskIdentity) -> WranglerResult<Arc<dyn ProcessWrangler>> {
        let wrangler = (self.create)(&self.configs, &task);
        wrangler.initialize()?;

        self.m
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(task, Arc::clone(&wrangler));
        debug!("wrangler initialized");
        Ok(wrangler)
    }

    pub fn get(&self, task: &TaskIdentity) -> Option<Arc<dyn ProcessWrangler>> {
        self.m
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(task)
            .cloned()
    }

    /// Kill the task's processes and tear its sandbox down.
    ///
    /// The task stays registered until both steps succeed, so a failed teardown can be retried.
    #[instrument(level = "debug", skip_all, fields(task = %task))]
    pub fn destroy(&self, task: &TaskIdentity) -> WranglerResult<()> {
        let wrangler = self
            .get(task)
            .ok_or_else(|| WranglerError::UnknownTask(task.clone()))?;

        wrangler.kill()?;
        wrangler.cleanup()?;

        self.m
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(task);
        debug!("wrangler destroyed");
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.m.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
