//! Start-order coordination for the tasks of a single allocation.
//!
//! The allocation driver owns a [`Coordinator`] and feeds it task state snapshots.
//! Task runners hold a [`GateSet`] (or the [`StartCondition`] it hands out) and wait
//! on it before starting their task.
//!
//! ```no_run
//! use hookline_core::Coordinator;
//! use hookline_model::{TaskSpec, TaskState, TaskStates};
//!
//! # async fn run() {
//! let tasks = vec![TaskSpec::prestart("side", true), TaskSpec::main("web")];
//! let mut coordinator = Coordinator::new(&tasks);
//!
//! // Handed to the runner of `web`, possibly on another thread.
//! let web = coordinator.wait_handle_for(&tasks[1]);
//!
//! let mut states = TaskStates::new();
//! states.insert("side".into(), TaskState::running());
//! coordinator.on_state_update(&states);
//!
//! web.wait().await;
//! # }
//! ```

pub mod error;
pub use error::LifecycleError;

pub mod gate;
pub use gate::{GateKind, GateSet, StartCondition};

pub mod coordinator;
pub use coordinator::Coordinator;

pub mod predicate;
pub use predicate::{LifecycleTask, has_non_sidecar_tasks, has_sidecar_tasks};
