use std::{io, path::PathBuf};

use thiserror::Error;

use crate::{CgroupMode, TaskIdentity};

pub type WranglerResult<T> = Result<T, WranglerError>;

#[derive(Error, Debug)]
pub enum WranglerError {
    #[error("{op} {path}: {source}")]
    Io {
        op: &'static str,
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("cgroup mode {0} requested but not available on this host")]
    ModeUnavailable(CgroupMode),
    #[error("no process wrangler for task {0}")]
    UnknownTask(TaskIdentity),
    #[error("failed to signal pid {pid}: {source}")]
    Signal {
        pid: i32,
        #[source]
        source: io::Error,
    },
}

impl WranglerError {
    pub(crate) fn io(op: &'static str, path: impl Into<PathBuf>, source: io::Error) -> Self {
        WranglerError::Io {
            op,
            path: path.into(),
            source,
        }
    }
}
