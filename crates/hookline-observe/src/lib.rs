//! Logging setup for allocation runner binaries.
//!
//! Libraries in this workspace only emit `tracing` events; binaries call [`logger_init`] once
//! at startup to decide where those events go.

mod logger;
pub use logger::*;
