//! Scenario lookup: explicit name-to-body registry
//!
//! Scenario bodies are registered under a `(group, symbol)` key at startup
//! and resolved at dispatch time. There is no dynamic symbol resolution;
//! unknown keys fail with [`PoolError::NotFound`].

use crate::core::{PoolError, Result, ScenarioConfig, WorkItem};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

/// A scenario body: an opaque callable invoked with its configuration
pub type ScenarioBody = dyn Fn(&ScenarioConfig) -> Result<()> + Send + Sync;

/// A loaded scenario body bound to a display name and a configuration
///
/// The configuration mapping is forwarded to the body verbatim; the pool
/// never inspects it.
pub struct Scenario {
    name: String,
    config: ScenarioConfig,
    body: Arc<ScenarioBody>,
}

impl std::fmt::Debug for Scenario {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scenario")
            .field("name", &self.name)
            .field("config_keys", &self.config.len())
            .finish()
    }
}

impl Scenario {
    /// Bind a body to a display name and configuration
    pub fn new(name: impl Into<String>, config: ScenarioConfig, body: Arc<ScenarioBody>) -> Self {
        Self {
            name: name.into(),
            config,
            body,
        }
    }

    /// Get the scenario's display name
    pub fn display_name(&self) -> &str {
        &self.name
    }

    /// Get the configuration that will be passed to the body
    pub fn config(&self) -> &ScenarioConfig {
        &self.config
    }
}

impl WorkItem for Scenario {
    fn run(&mut self) -> Result<()> {
        (self.body)(&self.config)
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// A lookup table mapping `(group, symbol)` names to scenario bodies
///
/// # Example
///
/// ```rust
/// use scenario_pool::prelude::*;
///
/// # fn main() -> Result<()> {
/// let registry = ScenarioRegistry::new();
/// registry.register("views", "view", |_config| Ok(()));
///
/// assert!(registry.load("views", "view").is_ok());
/// assert!(registry.load("views", "missing").is_err());
/// # Ok(())
/// # }
/// ```
#[derive(Default)]
pub struct ScenarioRegistry {
    entries: RwLock<HashMap<(String, String), Arc<ScenarioBody>>>,
}

impl std::fmt::Debug for ScenarioRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScenarioRegistry")
            .field("entries", &self.entries.read().len())
            .finish()
    }
}

impl ScenarioRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a scenario body under a group and symbol
    ///
    /// Registering the same key twice replaces the earlier body.
    pub fn register<F>(&self, group: impl Into<String>, symbol: impl Into<String>, body: F)
    where
        F: Fn(&ScenarioConfig) -> Result<()> + Send + Sync + 'static,
    {
        self.entries
            .write()
            .insert((group.into(), symbol.into()), Arc::new(body));
    }

    /// Resolve a registered scenario body by name
    ///
    /// # Errors
    ///
    /// Returns [`PoolError::NotFound`] if no body is registered under the
    /// given group and symbol.
    pub fn load(&self, group: &str, symbol: &str) -> Result<Arc<ScenarioBody>> {
        self.entries
            .read()
            .get(&(group.to_string(), symbol.to_string()))
            .cloned()
            .ok_or_else(|| PoolError::not_found(group, symbol))
    }

    /// Get the number of registered scenarios
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// Check whether the registry is empty
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}
