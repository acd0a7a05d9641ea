//! Convenient re-exports for common types and traits

pub use crate::core::{
    BoxedWork, ClosureWork, PoolError, Result, ScenarioConfig, TaskHandle, TaskState, WorkItem,
};
pub use crate::pool::{WorkerPool, WorkerStats};
pub use crate::suite::{
    run_group, run_group_on, run_scenario, GroupSpec, Scenario, ScenarioRegistry, TaskRegistry,
};
