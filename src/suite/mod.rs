//! Scenario suite machinery: lookup, task registry, and orchestration

pub mod loader;
pub mod registry;
pub mod runner;

pub use loader::{Scenario, ScenarioBody, ScenarioRegistry};
pub use registry::TaskRegistry;
pub use runner::{run_group, run_group_on, run_scenario, views_group, GroupSpec};
