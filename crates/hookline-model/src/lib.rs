//! Data model shared by the allocation runner crates.
//!
//! Task specifications and their lifecycle descriptors come in from the allocation definition;
//! task state snapshots come in from the task runners.

mod domain;
pub use domain::*;
