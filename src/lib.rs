//! # Scenario Pool
//!
//! A bounded worker pool for dispatching named test scenarios, with
//! join-barrier draining and guaranteed shutdown.
//!
//! ## Features
//!
//! - **Worker Pool**: fixed-capacity pool; excess submissions queue FIFO
//! - **Task Handles**: future-like handles with blocking, idempotent waits
//! - **Task Registry**: ordered drain that never abandons running work
//! - **Scenario Lookup**: explicit name-to-body registry, no reflection
//! - **Guaranteed Teardown**: drain and close run on every exit path
//! - **Thread Safety**: built on parking_lot and crossbeam channels
//!
//! ## Quick Start
//!
//! ```rust
//! use scenario_pool::prelude::*;
//!
//! # fn main() -> Result<()> {
//! // Create a pool; workers start immediately
//! let pool = WorkerPool::new(3)?;
//! let mut tasks = TaskRegistry::new();
//!
//! // Dispatch work and record the handles
//! for _ in 0..3 {
//!     tasks.append(pool.schedule_fn(|| Ok(()))?);
//! }
//!
//! // Join barrier, then teardown
//! tasks.drain_all()?;
//! pool.close()?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Running a named scenario group
//!
//! ```rust
//! use scenario_pool::prelude::*;
//! use scenario_pool::suite::views_group;
//!
//! # fn main() -> Result<()> {
//! let scenarios = ScenarioRegistry::new();
//! scenarios.register("views", "view", |_config| Ok(()));
//! scenarios.register("views", "live_view", |_config| Ok(()));
//! scenarios.register("views", "materialized_view", |_config| Ok(()));
//!
//! // Dispatches the three scenarios onto a pool of capacity 3, waits for
//! // all of them, and closes the pool even if one of them failed.
//! run_group(&scenarios, &views_group())?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Custom work items
//!
//! ```rust
//! use scenario_pool::prelude::*;
//!
//! struct Probe {
//!     target: String,
//! }
//!
//! impl WorkItem for Probe {
//!     fn run(&mut self) -> Result<()> {
//!         Ok(())
//!     }
//!
//!     fn name(&self) -> &str {
//!         &self.target
//!     }
//! }
//!
//! # fn main() -> Result<()> {
//! # let pool = WorkerPool::new(2)?;
//! let handle = pool.schedule(Probe {
//!     target: "view".to_string(),
//! })?;
//! handle.wait()?;
//! # pool.close()?;
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod core;
pub mod pool;
pub mod prelude;
pub mod suite;

pub use self::core::{
    BoxedWork, ClosureWork, PoolError, Result, ScenarioConfig, TaskHandle, TaskState, WorkItem,
};
pub use self::pool::{WorkerPool, WorkerStats};
pub use self::suite::{
    run_group, run_group_on, run_scenario, GroupSpec, Scenario, ScenarioRegistry, TaskRegistry,
};
