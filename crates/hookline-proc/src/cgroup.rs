//! Control group API generation detection.

use std::{fmt, path::Path};

use serde::{Deserialize, Serialize};
use tracing::debug;

/// `CGROUP2_SUPER_MAGIC` from `linux/magic.h`.
#[cfg(target_os = "linux")]
const CGROUP2_SUPER_MAGIC: i64 = 0x6367_7270;

/// Control group API generation in use on the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CgroupMode {
    /// No usable control group hierarchy.
    Off,
    /// Legacy per-controller hierarchies.
    V1,
    /// Unified hierarchy.
    V2,
}

impl CgroupMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            CgroupMode::Off => "off",
            CgroupMode::V1 => "v1",
            CgroupMode::V2 => "v2",
        }
    }
}

impl fmt::Display for CgroupMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Detect the mode of the hierarchy mounted at `root`.
///
/// A cgroup2 filesystem at `root` means [`CgroupMode::V2`]; a `freezer` controller directory
/// under it means [`CgroupMode::V1`]; anything else is [`CgroupMode::Off`].
pub fn detect(root: &Path) -> CgroupMode {
    let mode = match fs_magic(root) {
        None => CgroupMode::Off,
        #[cfg(target_os = "linux")]
        Some(CGROUP2_SUPER_MAGIC) => CgroupMode::V2,
        Some(_) if root.join("freezer").is_dir() => CgroupMode::V1,
        Some(_) => CgroupMode::Off,
    };
    debug!(root = %root.display(), %mode, "cgroup mode detected");
    mode
}

#[cfg(target_os = "linux")]
fn fs_magic(path: &Path) -> Option<i64> {
    use std::{ffi::CString, mem::MaybeUninit, os::unix::ffi::OsStrExt};

    let c_path = CString::new(path.as_os_str().as_bytes()).ok()?;
    let mut buf = MaybeUninit::<libc::statfs>::uninit();

    let rc = unsafe { libc::statfs(c_path.as_ptr(), buf.as_mut_ptr()) };
    if rc != 0 {
        return None;
    }
    let stat = unsafe { buf.assume_init() };

    #[allow(clippy::unnecessary_cast)]
    let magic = stat.f_type as i64;
    Some(magic)
}

#[cfg(not(target_os = "linux"))]
fn fs_magic(_path: &Path) -> Option<i64> {
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_root_is_off() {
        assert_eq!(
            detect(Path::new("/definitely/not/a/cgroup/root")),
            CgroupMode::Off
        );
    }

    #[test]
    fn plain_directory_is_off() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(detect(dir.path()), CgroupMode::Off);
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn freezer_controller_dir_means_v1() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("freezer")).unwrap();
        assert_eq!(detect(dir.path()), CgroupMode::V1);
    }

    #[test]
    fn serde_lowercase() {
        assert_eq!(serde_json::to_string(&CgroupMode::V1).unwrap(), r#""v1""#);
        let off: CgroupMode = serde_json::from_str(r#""off""#).unwrap();
        assert_eq!(off, CgroupMode::Off);
    }
}
