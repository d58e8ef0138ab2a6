use std::sync::Arc;

use crate::{
    WranglerConfigs,
    error::WranglerResult,
    wrangler::{ProcessWrangler, TaskIdentity},
};

/// Wrangler for hosts without control groups. Every operation succeeds and does nothing.
#[derive(Debug, Clone)]
pub struct NoopWrangler {
    task: TaskIdentity,
}

impl NoopWrangler {
    pub fn new(task: TaskIdentity) -> Self {
        Self { task }
    }

    pub fn task(&self) -> &TaskIdentity {
        &self.task
    }

    pub(crate) fn create(_cfg: &WranglerConfigs, task: &TaskIdentity) -> Arc<dyn ProcessWrangler> {
        Arc::new(Self::new(task.clone()))
    }
}

impl ProcessWrangler for NoopWrangler {
    fn initialize(&self) -> WranglerResult<()> {
        Ok(())
    }

    fn kill(&self) -> WranglerResult<()> {
        Ok(())
    }

    fn cleanup(&self) -> WranglerResult<()> {
        Ok(())
    }
}
