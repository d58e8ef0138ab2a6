//! Per-task process isolation on top of Linux control groups.
//!
//! [`Wranglers`] is a factory that hands out one [`ProcessWrangler`] per task. Which kind of
//! wrangler it creates depends on the control group API generation the host runs
//! ([`CgroupMode`]); hosts without control groups get no-op wranglers.
//!
//! Nothing in the start-order coordination depends on this crate.

mod error;
pub use error::{WranglerError, WranglerResult};

mod config;
pub use config::WranglerConfigs;

pub mod cgroup;
pub use cgroup::CgroupMode;

pub mod wrangler;
pub use wrangler::{NoopWrangler, ProcessWrangler, TaskIdentity, V1Wrangler, V2Wrangler, Wranglers};
