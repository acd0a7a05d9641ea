//! Group orchestration: dispatch scenarios, drain, then tear down
//!
//! The sequencing contract here mirrors a two-level guaranteed-cleanup
//! structure: draining the task registry runs on every exit path once
//! submission begins, and closing the pool runs on every exit path after
//! pool creation, after the drain attempt. A cleanup failure never masks
//! the failure it was unwinding from.

use crate::core::{Result, ScenarioConfig};
use crate::pool::WorkerPool;
use crate::suite::loader::{Scenario, ScenarioRegistry};
use crate::suite::registry::TaskRegistry;
use log::{debug, warn};

/// Schedule one scenario and record its handle
///
/// Scheduling failures propagate immediately to the caller; they are never
/// swallowed.
pub fn run_scenario(
    pool: &WorkerPool,
    tasks: &mut TaskRegistry,
    scenario: Scenario,
) -> Result<()> {
    debug!("dispatching scenario '{}'", scenario.display_name());
    let handle = pool.schedule(scenario)?;
    tasks.append(handle);
    Ok(())
}

/// Declarative description of a scenario group
///
/// Names the group, the symbols to dispatch in fixed order, the pool
/// capacity, and the configuration mapping forwarded to every scenario.
/// Serializable so suites can be described in configuration files.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct GroupSpec {
    /// Group name; also the loader group and the pool's thread-name prefix
    pub name: String,
    /// Worker pool capacity for this group
    pub capacity: usize,
    /// Configuration mapping passed to each scenario unchanged
    pub config: ScenarioConfig,
    /// Scenario symbols, dispatched in this order
    pub symbols: Vec<String>,
}

impl GroupSpec {
    /// Create a group spec with no scenarios and an empty configuration
    pub fn new(name: impl Into<String>, capacity: usize) -> Self {
        Self {
            name: name.into(),
            capacity,
            config: ScenarioConfig::new(),
            symbols: Vec::new(),
        }
    }

    /// Add a scenario symbol to the end of the dispatch order
    #[must_use = "builder methods return a new value and do not modify the original"]
    pub fn with_symbol(mut self, symbol: impl Into<String>) -> Self {
        self.symbols.push(symbol.into());
        self
    }

    /// Set the configuration mapping passed to every scenario
    #[must_use = "builder methods return a new value and do not modify the original"]
    pub fn with_config(mut self, config: ScenarioConfig) -> Self {
        self.config = config;
        self
    }
}

/// The `views` group: three view scenarios on a pool of capacity 3
pub fn views_group() -> GroupSpec {
    GroupSpec::new("views", 3)
        .with_symbol("view")
        .with_symbol("live_view")
        .with_symbol("materialized_view")
}

/// Run a scenario group on a freshly created pool
///
/// Creates a pool with the spec's capacity and delegates to
/// [`run_group_on`], which closes it on every exit path.
pub fn run_group(scenarios: &ScenarioRegistry, spec: &GroupSpec) -> Result<()> {
    let pool = WorkerPool::with_name(spec.capacity, &spec.name)?;
    run_group_on(&pool, scenarios, spec)
}

/// Run a scenario group on an existing pool, closing it on every exit path
///
/// Loads and dispatches each symbol in the spec's order, aborting
/// submission on the first loader or scheduling error. Whatever happened
/// during submission, every recorded handle is drained before control
/// leaves; whatever happened during draining, the pool is closed exactly
/// once afterwards. The pool is unusable when this returns.
pub fn run_group_on(
    pool: &WorkerPool,
    scenarios: &ScenarioRegistry,
    spec: &GroupSpec,
) -> Result<()> {
    debug!(
        "running group '{}' ({} scenarios, capacity {})",
        spec.name,
        spec.symbols.len(),
        spec.capacity
    );

    let result = submit_and_drain(pool, scenarios, spec);

    match (result, pool.close()) {
        (Ok(()), close_result) => close_result,
        (Err(e), Ok(())) => Err(e),
        (Err(e), Err(close_err)) => {
            warn!(
                "group '{}': pool close failed while unwinding: {}",
                spec.name, close_err
            );
            Err(e)
        }
    }
}

/// Submit every scenario, then drain all handles regardless of how
/// submission went
fn submit_and_drain(
    pool: &WorkerPool,
    scenarios: &ScenarioRegistry,
    spec: &GroupSpec,
) -> Result<()> {
    let mut tasks = TaskRegistry::new();
    let submitted = submit_all(pool, scenarios, spec, &mut tasks);
    let drained = tasks.drain_all();

    match (submitted, drained) {
        (Ok(()), drained) => drained,
        (Err(e), Ok(())) => Err(e),
        (Err(e), Err(drain_err)) => {
            warn!(
                "group '{}': drain failed while unwinding: {}",
                spec.name, drain_err
            );
            Err(e)
        }
    }
}

fn submit_all(
    pool: &WorkerPool,
    scenarios: &ScenarioRegistry,
    spec: &GroupSpec,
    tasks: &mut TaskRegistry,
) -> Result<()> {
    for symbol in &spec.symbols {
        let body = scenarios.load(&spec.name, symbol)?;
        let scenario = Scenario::new(symbol.clone(), spec.config.clone(), body);
        run_scenario(pool, tasks, scenario)?;
    }
    Ok(())
}
