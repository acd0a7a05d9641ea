//! Ordered task registry with join-barrier drain semantics

use crate::core::{Result, TaskHandle};
use log::warn;

/// An ordered collection of task handles awaiting completion
///
/// Insertion order is submission order. [`drain_all()`](Self::drain_all)
/// is the synchronization point before pool teardown: it waits on every
/// handle, even after one fails, so no concurrently-running task is
/// abandoned.
///
/// The registry is mutated only by the orchestrating thread; it needs no
/// locking of its own beyond what each handle's `wait` provides.
#[derive(Debug, Default)]
pub struct TaskRegistry {
    handles: Vec<TaskHandle>,
}

impl TaskRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a handle to the end of the registry
    pub fn append(&mut self, handle: TaskHandle) {
        self.handles.push(handle);
    }

    /// Get the number of handles not yet drained
    pub fn len(&self) -> usize {
        self.handles.len()
    }

    /// Check whether the registry holds no handles
    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }

    /// Wait on every handle, consuming the registry's contents
    ///
    /// All handles are waited on in insertion order regardless of failures.
    /// If one or more tasks failed, the first failure by insertion order is
    /// returned after every handle has resolved; later failures are logged
    /// at `warn` level so none goes unobserved.
    ///
    /// Each handle is drained exactly once: after this returns the registry
    /// is empty, and a second call trivially succeeds.
    pub fn drain_all(&mut self) -> Result<()> {
        let mut first_failure = None;

        for handle in self.handles.drain(..) {
            if let Err(e) = handle.wait() {
                if first_failure.is_none() {
                    first_failure = Some(e);
                } else {
                    warn!("additional task failure while draining: {}", e);
                }
            }
        }

        match first_failure {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::PoolError;
    use crate::pool::WorkerPool;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::thread;
    use std::time::Duration;

    #[test]
    fn test_drain_empty_registry() {
        let mut registry = TaskRegistry::new();
        assert!(registry.is_empty());
        assert!(registry.drain_all().is_ok());
    }

    #[test]
    fn test_drain_waits_on_every_handle() {
        let pool = WorkerPool::new(2).expect("Failed to create pool");
        let completed = Arc::new(AtomicUsize::new(0));

        let mut registry = TaskRegistry::new();
        for _ in 0..6 {
            let completed_clone = Arc::clone(&completed);
            registry.append(
                pool.schedule_fn(move || {
                    thread::sleep(Duration::from_millis(10));
                    completed_clone.fetch_add(1, Ordering::SeqCst);
                    Ok(())
                })
                .expect("Failed to schedule"),
            );
        }
        assert_eq!(registry.len(), 6);

        registry.drain_all().expect("Drain failed");

        assert_eq!(completed.load(Ordering::SeqCst), 6);
        assert!(registry.is_empty());
        pool.close().expect("Failed to close pool");
    }

    #[test]
    fn test_drain_reports_first_failure_by_insertion_order() {
        let pool = WorkerPool::new(1).expect("Failed to create pool");
        let mut registry = TaskRegistry::new();

        registry.append(pool.schedule_fn(|| Ok(())).unwrap());
        registry.append(
            pool.schedule_fn(|| Err(PoolError::work_failure("second", "early loss")))
                .unwrap(),
        );
        registry.append(
            pool.schedule_fn(|| Err(PoolError::work_failure("third", "late loss")))
                .unwrap(),
        );

        let err = registry.drain_all().unwrap_err();
        match err {
            PoolError::WorkFailure { scenario, .. } => assert_eq!(scenario, "second"),
            other => panic!("unexpected error: {other}"),
        }

        pool.close().expect("Failed to close pool");
    }

    #[test]
    fn test_drain_does_not_abandon_later_tasks_on_failure() {
        let pool = WorkerPool::new(3).expect("Failed to create pool");
        let completed = Arc::new(AtomicUsize::new(0));
        let mut registry = TaskRegistry::new();

        registry.append(
            pool.schedule_fn(|| Err(PoolError::work_failure("first", "boom")))
                .unwrap(),
        );
        for _ in 0..4 {
            let completed_clone = Arc::clone(&completed);
            registry.append(
                pool.schedule_fn(move || {
                    thread::sleep(Duration::from_millis(25));
                    completed_clone.fetch_add(1, Ordering::SeqCst);
                    Ok(())
                })
                .unwrap(),
            );
        }

        assert!(registry.drain_all().is_err());
        // Every succeeding task observably ran to completion
        assert_eq!(completed.load(Ordering::SeqCst), 4);

        pool.close().expect("Failed to close pool");
    }

    #[test]
    fn test_second_drain_is_empty() {
        let pool = WorkerPool::new(1).expect("Failed to create pool");
        let mut registry = TaskRegistry::new();
        registry.append(pool.schedule_fn(|| Ok(())).unwrap());

        registry.drain_all().expect("Drain failed");
        assert!(registry.drain_all().is_ok());

        pool.close().expect("Failed to close pool");
    }
}
