//! Work item trait and related types

use crate::core::error::Result;
use std::fmt;

/// An open key-value configuration mapping passed through to each work item.
///
/// The pool never interprets its contents; values stay untyped at this layer.
pub type ScenarioConfig = serde_json::Map<String, serde_json::Value>;

/// A trait representing a unit of work to be executed by the worker pool
pub trait WorkItem: Send {
    /// Run the work to completion
    ///
    /// # Errors
    ///
    /// Returns an error if the work fails
    fn run(&mut self) -> Result<()>;

    /// Get the work item's display name for reporting and logging
    fn name(&self) -> &str {
        "WorkItem"
    }
}

impl fmt::Debug for dyn WorkItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "WorkItem({})", self.name())
    }
}

/// A boxed work item that can be sent across threads
pub type BoxedWork = Box<dyn WorkItem>;

/// Helper to create a work item from a closure
pub struct ClosureWork<F>
where
    F: FnOnce() -> Result<()> + Send,
{
    closure: Option<F>,
    name: String,
}

impl<F> ClosureWork<F>
where
    F: FnOnce() -> Result<()> + Send,
{
    /// Create a new closure work item
    pub fn new(closure: F) -> Self {
        Self {
            closure: Some(closure),
            name: "ClosureWork".to_string(),
        }
    }

    /// Create a new closure work item with a custom name
    pub fn with_name<S: Into<String>>(closure: F, name: S) -> Self {
        Self {
            closure: Some(closure),
            name: name.into(),
        }
    }
}

impl<F> WorkItem for ClosureWork<F>
where
    F: FnOnce() -> Result<()> + Send,
{
    fn run(&mut self) -> Result<()> {
        if let Some(closure) = self.closure.take() {
            closure()
        } else {
            // Closure already ran, return error instead of silently succeeding
            Err(crate::core::PoolError::work_failure(
                self.name.clone(),
                "ClosureWork already ran - cannot run twice",
            ))
        }
    }

    fn name(&self) -> &str {
        &self.name
    }
}
