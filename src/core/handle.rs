//! Task handles representing a future completion
//!
//! A [`TaskHandle`] is returned from every pool submission and resolves
//! exactly once, from `Pending` to either `Succeeded` or `Failed`. The
//! worker that runs the task holds the crate-private completion half and
//! publishes the outcome through it.

use crate::core::error::{PoolError, Result};
use parking_lot::{Condvar, Mutex};
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

/// Completion state of a submitted task
///
/// Transitions `Pending -> {Succeeded, Failed}` and is terminal once
/// resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskState {
    /// The work has not finished yet
    Pending,
    /// The work finished without error
    Succeeded,
    /// The work finished with a captured failure
    Failed,
}

/// Shared cell between a handle and its completion half
struct HandleInner {
    outcome: Mutex<Option<Result<()>>>,
    resolved: Condvar,
}

impl HandleInner {
    fn resolve(&self, result: Result<()>) {
        let mut outcome = self.outcome.lock();
        // First resolution wins; the state machine is terminal
        if outcome.is_none() {
            *outcome = Some(result);
            self.resolved.notify_all();
        }
    }
}

/// A future-like reference to one submission's eventual outcome
///
/// # Example
///
/// ```rust
/// use scenario_pool::prelude::*;
///
/// # fn main() -> Result<()> {
/// let pool = WorkerPool::new(2)?;
/// let handle = pool.schedule_fn(|| Ok(()))?;
/// handle.wait()?;
/// pool.close()?;
/// # Ok(())
/// # }
/// ```
pub struct TaskHandle {
    task_id: Uuid,
    inner: Arc<HandleInner>,
}

impl std::fmt::Debug for TaskHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TaskHandle")
            .field("task_id", &self.task_id)
            .field("state", &self.state())
            .finish()
    }
}

impl TaskHandle {
    /// Create a connected handle/completion pair
    pub(crate) fn new_pair() -> (TaskHandle, TaskCompletion) {
        let inner = Arc::new(HandleInner {
            outcome: Mutex::new(None),
            resolved: Condvar::new(),
        });
        let handle = TaskHandle {
            task_id: Uuid::new_v4(),
            inner: Arc::clone(&inner),
        };
        let completion = TaskCompletion {
            inner,
            resolved: false,
        };
        (handle, completion)
    }

    /// Get the unique task ID
    pub fn id(&self) -> Uuid {
        self.task_id
    }

    /// Get the current completion state without blocking
    pub fn state(&self) -> TaskState {
        match &*self.inner.outcome.lock() {
            None => TaskState::Pending,
            Some(Ok(())) => TaskState::Succeeded,
            Some(Err(_)) => TaskState::Failed,
        }
    }

    /// Block until the underlying work finishes
    ///
    /// Repeated calls return the same cached outcome.
    ///
    /// # Errors
    ///
    /// Returns the captured failure if the work failed or panicked, or
    /// [`PoolError::HandleDropped`] if the work was discarded before it ran.
    pub fn wait(&self) -> Result<()> {
        let mut outcome = self.inner.outcome.lock();
        while outcome.is_none() {
            self.inner.resolved.wait(&mut outcome);
        }
        outcome.clone().unwrap_or(Ok(()))
    }

    /// Block until the work finishes or the timeout elapses
    ///
    /// Returns `None` if the work is still pending at the deadline.
    pub fn wait_timeout(&self, timeout: Duration) -> Option<Result<()>> {
        let deadline = std::time::Instant::now() + timeout;
        let mut outcome = self.inner.outcome.lock();
        while outcome.is_none() {
            let remaining = deadline.checked_duration_since(std::time::Instant::now())?;
            if self
                .inner
                .resolved
                .wait_for(&mut outcome, remaining)
                .timed_out()
                && outcome.is_none()
            {
                return None;
            }
        }
        outcome.clone()
    }
}

/// Resolver half of a [`TaskHandle`], owned by the executing worker
pub(crate) struct TaskCompletion {
    inner: Arc<HandleInner>,
    resolved: bool,
}

impl TaskCompletion {
    /// Publish the task's outcome and wake all waiters
    ///
    /// Only the first resolution takes effect.
    pub(crate) fn resolve(mut self, result: Result<()>) {
        self.resolved = true;
        self.inner.resolve(result);
    }
}

impl Drop for TaskCompletion {
    fn drop(&mut self) {
        // Work discarded without running; waiters must not hang forever
        if !self.resolved {
            self.inner.resolve(Err(PoolError::HandleDropped));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_resolve_then_wait() {
        let (handle, completion) = TaskHandle::new_pair();
        assert_eq!(handle.state(), TaskState::Pending);

        completion.resolve(Ok(()));
        assert!(handle.wait().is_ok());
        assert_eq!(handle.state(), TaskState::Succeeded);
    }

    #[test]
    fn test_wait_is_idempotent() {
        let (handle, completion) = TaskHandle::new_pair();
        completion.resolve(Err(PoolError::work_failure("view", "boom")));

        for _ in 0..3 {
            let err = handle.wait().unwrap_err();
            assert!(matches!(err, PoolError::WorkFailure { .. }));
        }
        assert_eq!(handle.state(), TaskState::Failed);
    }

    #[test]
    fn test_wait_blocks_until_resolved() {
        let (handle, completion) = TaskHandle::new_pair();

        let resolver = thread::spawn(move || {
            thread::sleep(Duration::from_millis(50));
            completion.resolve(Ok(()));
        });

        assert!(handle.wait().is_ok());
        resolver.join().unwrap();
    }

    #[test]
    fn test_dropped_completion_resolves_handle() {
        let (handle, completion) = TaskHandle::new_pair();
        drop(completion);

        let err = handle.wait().unwrap_err();
        assert!(matches!(err, PoolError::HandleDropped));
    }

    #[test]
    fn test_wait_timeout_pending() {
        let (handle, _completion) = TaskHandle::new_pair();
        assert!(handle.wait_timeout(Duration::from_millis(10)).is_none());
    }

    #[test]
    fn test_handles_have_distinct_ids() {
        let (a, _ca) = TaskHandle::new_pair();
        let (b, _cb) = TaskHandle::new_pair();
        assert_ne!(a.id(), b.id());
    }
}
