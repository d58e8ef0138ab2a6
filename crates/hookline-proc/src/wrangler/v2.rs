use std::{
    fs, io,
    path::{Path, PathBuf},
    sync::Arc,
};

use tracing::trace;

use crate::{
    WranglerConfigs,
    error::{WranglerError, WranglerResult},
    wrangler::{ProcessWrangler, TaskIdentity},
};

/// Wrangler for the unified (v2) hierarchy: one scope per task under the configured parent.
#[derive(Debug, Clone)]
pub struct V2Wrangler {
    task: TaskIdentity,
    path: PathBuf,
}

impl V2Wrangler {
    pub fn new(cfg: &WranglerConfigs, task: TaskIdentity) -> Self {
        let path = cfg
            .cgroup_root
            .join(&cfg.parent)
            .join(format!("{}.scope", task.group_name()));
        Self { task, path }
    }

    /// Scope directory of the task.
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub(crate) fn create(cfg: &WranglerConfigs, task: &TaskIdentity) -> Arc<dyn ProcessWrangler> {
        Arc::new(Self::new(cfg, task.clone()))
    }
}

impl ProcessWrangler for V2Wrangler {
    fn initialize(&self) -> WranglerResult<()> {
        fs::create_dir_all(&self.path).map_err(|e| WranglerError::io("create", &self.path, e))
    }

    fn kill(&self) -> WranglerResult<()> {
        let kill_file = self.path.join("cgroup.kill");
        match fs::write(&kill_file, "1") {
            Ok(()) => {
                trace!(task = %self.task, "cgroup.kill written");
                Ok(())
            }
            // No scope, no processes.
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(WranglerError::io("write", kill_file, e)),
        }
    }

    fn cleanup(&self) -> WranglerResult<()> {
        match fs::remove_dir(&self.path) {
            Err(e) if e.kind() != io::ErrorKind::NotFound => {
                Err(WranglerError::io("remove", &self.path, e))
            }
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wrangler(root: &Path) -> V2Wrangler {
        let cfg = WranglerConfigs {
            cgroup_root: root.to_path_buf(),
            parent: "hookline.slice".into(),
            mode: None,
        };
        V2Wrangler::new(&cfg, TaskIdentity::new("alloc-1", "web"))
    }

    #[test]
    fn scope_path_layout() {
        let w = wrangler(Path::new("/sys/fs/cgroup"));
        assert_eq!(
            w.path(),
            Path::new("/sys/fs/cgroup/hookline.slice/alloc-1.web.scope")
        );
    }

    #[test]
    fn initialize_then_cleanup() {
        let dir = tempfile::tempdir().unwrap();
        let w = wrangler(dir.path());

        w.initialize().unwrap();
        assert!(w.path().is_dir());

        w.cleanup().unwrap();
        assert!(!w.path().exists());
        // Already gone is fine.
        w.cleanup().unwrap();
    }

    #[test]
    fn kill_writes_kill_file() {
        let dir = tempfile::tempdir().unwrap();
        let w = wrangler(dir.path());
        w.initialize().unwrap();

        w.kill().unwrap();
        let written = fs::read_to_string(w.path().join("cgroup.kill")).unwrap();
        assert_eq!(written, "1");
    }

    #[test]
    fn kill_without_scope_is_noop() {
        let dir = tempfile::tempdir().unwrap();
        wrangler(dir.path()).kill().unwrap();
    }
}
