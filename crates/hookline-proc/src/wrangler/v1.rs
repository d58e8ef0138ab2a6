use std::{
    fs, io,
    path::{Path, PathBuf},
    sync::Arc,
};

use tracing::{trace, warn};

use crate::{
    WranglerConfigs,
    error::{WranglerError, WranglerResult},
    wrangler::{ProcessWrangler, TaskIdentity},
};

/// Controllers a task gets a group in.
const CONTROLLERS: [&str; 3] = ["freezer", "cpuset", "memory"];

/// Wrangler for legacy (v1) hierarchies: one group per controller.
#[derive(Debug, Clone)]
pub struct V1Wrangler {
    task: TaskIdentity,
    paths: Vec<PathBuf>,
}

impl V1Wrangler {
    pub fn new(cfg: &WranglerConfigs, task: TaskIdentity) -> Self {
        let paths = CONTROLLERS
            .iter()
            .map(|c| {
                cfg.cgroup_root
                    .join(c)
                    .join(&cfg.parent)
                    .join(task.group_name())
            })
            .collect();
        Self { task, paths }
    }

    /// Group directories, freezer first.
    pub fn paths(&self) -> &[PathBuf] {
        &self.paths
    }

    fn freezer(&self) -> &Path {
        &self.paths[0]
    }

    pub(crate) fn create(cfg: &WranglerConfigs, task: &TaskIdentity) -> Arc<dyn ProcessWrangler> {
        Arc::new(Self::new(cfg, task.clone()))
    }

    fn pids(&self) -> WranglerResult<Vec<i32>> {
        let procs = self.freezer().join("cgroup.procs");
        let content = match fs::read_to_string(&procs) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(WranglerError::io("read", procs, e)),
        };
        Ok(parse_pids(&content))
    }
}

fn parse_pids(content: &str) -> Vec<i32> {
    content
        .lines()
        .filter_map(|line| line.trim().parse().ok())
        .filter(|pid| *pid > 0)
        .collect()
}

impl ProcessWrangler for V1Wrangler {
    fn initialize(&self) -> WranglerResult<()> {
        for path in &self.paths {
            fs::create_dir_all(path).map_err(|e| WranglerError::io("create", path, e))?;
        }
        Ok(())
    }

    fn kill(&self) -> WranglerResult<()> {
        for pid in self.pids()? {
            let rc = unsafe { libc::kill(pid, libc::SIGKILL) };
            if rc == 0 {
                trace!(task = %self.task, pid, "sent SIGKILL");
                continue;
            }
            let err = io::Error::last_os_error();
            if err.raw_os_error() == Some(libc::ESRCH) {
                // Exited on its own.
                continue;
            }
            return Err(WranglerError::Signal { pid, source: err });
        }
        Ok(())
    }

    fn cleanup(&self) -> WranglerResult<()> {
        let mut first_err = None;
        for path in &self.paths {
            match fs::remove_dir(path) {
                Err(e) if e.kind() != io::ErrorKind::NotFound => {
                    warn!(task = %self.task, path = %path.display(), error = %e, "failed to remove group");
                    first_err.get_or_insert(WranglerError::io("remove", path, e));
                }
                _ => {}
            }
        }
        first_err.map_or(Ok(()), Err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wrangler(root: &Path) -> V1Wrangler {
        let cfg = WranglerConfigs {
            cgroup_root: root.to_path_buf(),
            parent: "hookline".into(),
            mode: None,
        };
        V1Wrangler::new(&cfg, TaskIdentity::new("alloc-1", "web"))
    }

    #[test]
    fn one_group_per_controller() {
        let w = wrangler(Path::new("/sys/fs/cgroup"));
        assert_eq!(
            w.paths(),
            &[
                PathBuf::from("/sys/fs/cgroup/freezer/hookline/alloc-1.web"),
                PathBuf::from("/sys/fs/cgroup/cpuset/hookline/alloc-1.web"),
                PathBuf::from("/sys/fs/cgroup/memory/hookline/alloc-1.web"),
            ]
        );
    }

    #[test]
    fn initialize_then_cleanup_all_controllers() {
        let dir = tempfile::tempdir().unwrap();
        let w = wrangler(dir.path());

        w.initialize().unwrap();
        assert!(w.paths().iter().all(|p| p.is_dir()));

        w.cleanup().unwrap();
        assert!(w.paths().iter().all(|p| !p.exists()));
    }

    #[test]
    fn kill_with_no_processes_is_noop() {
        let dir = tempfile::tempdir().unwrap();
        let w = wrangler(dir.path());

        // Missing group.
        w.kill().unwrap();

        w.initialize().unwrap();
        fs::write(w.freezer().join("cgroup.procs"), "").unwrap();
        w.kill().unwrap();
    }

    #[test]
    fn parses_procs_file() {
        assert_eq!(parse_pids("12\n 34 \n\nbogus\n0\n"), vec![12, 34]);
    }
}
