use std::path::PathBuf;

use serde::Deserialize;

use crate::CgroupMode;

/// Host configuration for process wranglers.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct WranglerConfigs {
    /// Mount point of the control group hierarchy.
    pub cgroup_root: PathBuf,
    /// Parent group all task groups are created under.
    pub parent: String,
    /// Force a mode instead of detecting it from `cgroup_root`.
    pub mode: Option<CgroupMode>,
}

impl Default for WranglerConfigs {
    fn default() -> Self {
        Self {
            cgroup_root: PathBuf::from("/sys/fs/cgroup"),
            parent: "hookline.slice".to_string(),
            mode: None,
        }
    }
}
