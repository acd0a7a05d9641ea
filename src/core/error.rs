//! Error types for the scenario pool

/// Result type for scenario pool operations
pub type Result<T> = std::result::Result<T, PoolError>;

/// Errors that can occur while dispatching and draining scenarios
///
/// The enum is `Clone` so a captured work failure can be cached inside a
/// [`TaskHandle`](crate::core::TaskHandle) and handed back from every
/// `wait()` call.
#[derive(Debug, Clone, thiserror::Error)]
#[non_exhaustive]
pub enum PoolError {
    /// Pool was created with a capacity of zero
    #[error("Invalid worker pool capacity: {capacity} (must be at least 1)")]
    InvalidCapacity {
        /// The rejected capacity value
        capacity: usize,
    },

    /// Scheduling was attempted after the pool was closed
    #[error("Worker pool '{pool_name}' is closed")]
    PoolClosed {
        /// Name of the worker pool
        pool_name: String,
    },

    /// A scenario body returned an error
    #[error("Scenario '{scenario}' failed: {message}")]
    WorkFailure {
        /// Display name of the failed scenario
        scenario: String,
        /// Error message captured from the scenario body
        message: String,
    },

    /// A scenario body panicked
    #[error("Scenario '{scenario}' panicked: {message}")]
    WorkPanicked {
        /// Display name of the panicked scenario
        scenario: String,
        /// Captured panic payload
        message: String,
    },

    /// The scenario loader could not resolve a name
    #[error("Scenario '{group}.{symbol}' is not registered")]
    NotFound {
        /// Group the lookup was scoped to
        group: String,
        /// Symbol within the group
        symbol: String,
    },

    /// Failed to spawn a worker thread
    #[error("Failed to spawn worker thread #{worker_id}: {message}")]
    SpawnFailed {
        /// ID of the worker that failed to spawn
        worker_id: usize,
        /// Error message
        message: String,
    },

    /// Failed to join a worker thread during close
    #[error("Failed to join worker thread #{worker_id}")]
    JoinFailed {
        /// ID of the worker that failed to join
        worker_id: usize,
    },

    /// A task's work was discarded before it could run
    #[error("Task was dropped before its work ran")]
    HandleDropped,
}

impl PoolError {
    /// Create an invalid capacity error
    pub fn invalid_capacity(capacity: usize) -> Self {
        PoolError::InvalidCapacity { capacity }
    }

    /// Create a pool closed error
    pub fn pool_closed(pool_name: impl Into<String>) -> Self {
        PoolError::PoolClosed {
            pool_name: pool_name.into(),
        }
    }

    /// Create a work failure error
    pub fn work_failure(scenario: impl Into<String>, message: impl Into<String>) -> Self {
        PoolError::WorkFailure {
            scenario: scenario.into(),
            message: message.into(),
        }
    }

    /// Create a work panicked error
    pub fn work_panicked(scenario: impl Into<String>, message: impl Into<String>) -> Self {
        PoolError::WorkPanicked {
            scenario: scenario.into(),
            message: message.into(),
        }
    }

    /// Create a not found error
    pub fn not_found(group: impl Into<String>, symbol: impl Into<String>) -> Self {
        PoolError::NotFound {
            group: group.into(),
            symbol: symbol.into(),
        }
    }

    /// Create a spawn failed error
    pub fn spawn_failed(worker_id: usize, message: impl Into<String>) -> Self {
        PoolError::SpawnFailed {
            worker_id,
            message: message.into(),
        }
    }

    /// Create a join failed error
    pub fn join_failed(worker_id: usize) -> Self {
        PoolError::JoinFailed { worker_id }
    }
}
