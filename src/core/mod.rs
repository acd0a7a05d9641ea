//! Core types and traits for the scenario pool

pub mod error;
pub mod handle;
pub mod work;

pub use error::{PoolError, Result};
pub use handle::{TaskHandle, TaskState};
pub use work::{BoxedWork, ClosureWork, ScenarioConfig, WorkItem};

pub(crate) use handle::TaskCompletion;
