//! Worker pool implementation

use crate::core::{ClosureWork, PoolError, Result, TaskCompletion, TaskHandle, WorkItem};
use crate::pool::worker::{Worker, WorkerStats};
use crossbeam_channel::{unbounded, Receiver, Sender};
use log::{debug, error};
use parking_lot::{Mutex, RwLock};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

/// A queued unit of work paired with the resolver half of its handle
pub struct Dispatch {
    pub(crate) work: Box<dyn WorkItem>,
    pub(crate) completion: TaskCompletion,
}

impl std::fmt::Debug for Dispatch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatch")
            .field("work", &self.work.name())
            .finish()
    }
}

/// A fixed-capacity pool that runs submitted work items concurrently
///
/// The pool owns `capacity` worker threads that pull from a shared FIFO
/// queue, so at most `capacity` work items run in true overlap; excess
/// submissions queue until a slot frees. The pool is live as soon as it is
/// constructed.
///
/// # Shutdown
///
/// [`close()`](Self::close) marks the pool closed, stops accepting new
/// work, and joins every worker. Work already running finishes, and work
/// already queued still runs before the workers exit; nothing is
/// force-cancelled or silently abandoned.
///
/// # Example
///
/// ```rust
/// use scenario_pool::prelude::*;
///
/// # fn main() -> Result<()> {
/// let pool = WorkerPool::new(3)?;
///
/// let handle = pool.schedule_fn(|| Ok(()))?;
/// handle.wait()?;
///
/// pool.close()?;
/// # Ok(())
/// # }
/// ```
pub struct WorkerPool {
    name: String,
    capacity: usize,
    sender: RwLock<Option<Sender<Dispatch>>>,
    queue_probe: Receiver<Dispatch>,
    workers: Mutex<Vec<Worker>>,
    closed: AtomicBool,
    total_scheduled: AtomicU64,
    close_calls: AtomicU64,
}

impl std::fmt::Debug for WorkerPool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WorkerPool")
            .field("name", &self.name)
            .field("capacity", &self.capacity)
            .field("closed", &self.closed.load(Ordering::Relaxed))
            .field(
                "total_scheduled",
                &self.total_scheduled.load(Ordering::Relaxed),
            )
            .finish()
    }
}

impl WorkerPool {
    /// Create a pool with the given capacity and start its workers
    ///
    /// # Errors
    ///
    /// Returns [`PoolError::InvalidCapacity`] if `capacity` is zero, or
    /// [`PoolError::SpawnFailed`] if a worker thread cannot be started.
    pub fn new(capacity: usize) -> Result<Self> {
        Self::with_name(capacity, "worker")
    }

    /// Create a pool with a custom worker thread-name prefix
    pub fn with_name(capacity: usize, name: impl Into<String>) -> Result<Self> {
        if capacity == 0 {
            return Err(PoolError::invalid_capacity(capacity));
        }
        let name = name.into();

        let (sender, receiver) = unbounded();

        let mut workers = Vec::with_capacity(capacity);
        for id in 0..capacity {
            workers.push(Worker::new(id, &name, receiver.clone())?);
        }

        debug!("pool '{}' started with {} workers", name, capacity);

        Ok(Self {
            name,
            capacity,
            sender: RwLock::new(Some(sender)),
            queue_probe: receiver,
            workers: Mutex::new(workers),
            closed: AtomicBool::new(false),
            total_scheduled: AtomicU64::new(0),
            close_calls: AtomicU64::new(0),
        })
    }

    /// Schedule a work item for execution and get a handle to its outcome
    ///
    /// Non-blocking: if a worker is free the work begins immediately,
    /// otherwise it queues FIFO until a slot frees.
    ///
    /// # Errors
    ///
    /// Returns [`PoolError::PoolClosed`] once [`close()`](Self::close) has
    /// been called.
    pub fn schedule<W: WorkItem + 'static>(&self, work: W) -> Result<TaskHandle> {
        if self.closed.load(Ordering::Acquire) {
            return Err(PoolError::pool_closed(&self.name));
        }

        let sender_guard = self.sender.read();
        let sender = sender_guard
            .as_ref()
            .ok_or_else(|| PoolError::pool_closed(&self.name))?;

        let (handle, completion) = TaskHandle::new_pair();
        sender
            .send(Dispatch {
                work: Box::new(work),
                completion,
            })
            .map_err(|_| PoolError::pool_closed(&self.name))?;

        self.total_scheduled.fetch_add(1, Ordering::Relaxed);
        Ok(handle)
    }

    /// Schedule a closure as a work item
    pub fn schedule_fn<F>(&self, f: F) -> Result<TaskHandle>
    where
        F: FnOnce() -> Result<()> + Send + 'static,
    {
        self.schedule(ClosureWork::new(f))
    }

    /// Get the pool's capacity
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Check whether the pool has been closed
    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }

    /// Get the approximate number of queued, not-yet-started work items
    pub fn queued(&self) -> usize {
        self.queue_probe.len()
    }

    /// Get the total number of work items scheduled on this pool
    pub fn total_scheduled(&self) -> u64 {
        self.total_scheduled.load(Ordering::Relaxed)
    }

    /// Get the number of times [`close()`](Self::close) has been called
    ///
    /// Diagnostic accessor for verifying teardown discipline.
    pub fn close_calls(&self) -> u64 {
        self.close_calls.load(Ordering::Relaxed)
    }

    /// Get statistics for all workers
    pub fn worker_stats(&self) -> Vec<Arc<WorkerStats>> {
        self.workers.lock().iter().map(|w| w.stats()).collect()
    }

    /// Get total tasks completed successfully across all workers
    pub fn total_tasks_completed(&self) -> u64 {
        self.worker_stats()
            .iter()
            .map(|s| s.get_tasks_completed())
            .sum()
    }

    /// Get total tasks failed across all workers
    pub fn total_tasks_failed(&self) -> u64 {
        self.worker_stats()
            .iter()
            .map(|s| s.get_tasks_failed())
            .sum()
    }

    /// Get total tasks panicked across all workers
    pub fn total_tasks_panicked(&self) -> u64 {
        self.worker_stats()
            .iter()
            .map(|s| s.get_tasks_panicked())
            .sum()
    }

    /// Close the pool and wait for all workers to finish
    ///
    /// 1. Marks the pool closed so further [`schedule()`](Self::schedule)
    ///    calls fail with [`PoolError::PoolClosed`].
    /// 2. Disconnects the dispatch queue; workers drain whatever is still
    ///    queued and then exit.
    /// 3. Joins every worker thread.
    ///
    /// A second call is a no-op returning `Ok(())`, which keeps the `Drop`
    /// backstop safe; callers are expected to close exactly once.
    pub fn close(&self) -> Result<()> {
        self.close_calls.fetch_add(1, Ordering::Relaxed);

        if self
            .closed
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return Ok(());
        }

        debug!("pool '{}' closing", self.name);

        // Dropping the sender disconnects the queue once it is drained
        *self.sender.write() = None;

        let workers = std::mem::take(&mut *self.workers.lock());
        for worker in workers {
            worker.join()?;
        }

        Ok(())
    }
}

impl Drop for WorkerPool {
    fn drop(&mut self) {
        if !self.closed.load(Ordering::Acquire) {
            if let Err(e) = self.close() {
                error!("pool '{}' failed to close during drop: {}", self.name, e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;
    use std::thread;
    use std::time::Duration;

    #[test]
    fn test_pool_creation() {
        let pool = WorkerPool::new(3).expect("Failed to create pool");
        assert_eq!(pool.capacity(), 3);
        assert!(!pool.is_closed());
        pool.close().expect("Failed to close pool");
        assert!(pool.is_closed());
    }

    #[test]
    fn test_zero_capacity_rejected() {
        let result = WorkerPool::new(0);
        assert!(matches!(
            result,
            Err(PoolError::InvalidCapacity { capacity: 0 })
        ));
    }

    #[test]
    fn test_schedule_and_wait() {
        let pool = WorkerPool::new(2).expect("Failed to create pool");

        let counter = Arc::new(AtomicUsize::new(0));
        let mut handles = Vec::new();
        for _ in 0..10 {
            let counter_clone = Arc::clone(&counter);
            let handle = pool
                .schedule_fn(move || {
                    counter_clone.fetch_add(1, Ordering::Relaxed);
                    Ok(())
                })
                .expect("Failed to schedule");
            handles.push(handle);
        }

        for handle in &handles {
            handle.wait().expect("Task failed");
        }

        assert_eq!(counter.load(Ordering::Relaxed), 10);
        assert_eq!(pool.total_scheduled(), 10);

        pool.close().expect("Failed to close pool");
        assert_eq!(pool.total_tasks_completed(), 10);
    }

    #[test]
    fn test_schedule_after_close_fails() {
        let pool = WorkerPool::new(2).expect("Failed to create pool");
        pool.close().expect("Failed to close pool");

        let result = pool.schedule_fn(|| Ok(()));
        assert!(matches!(result, Err(PoolError::PoolClosed { .. })));
    }

    #[test]
    fn test_close_is_tolerant_of_second_call() {
        let pool = WorkerPool::new(1).expect("Failed to create pool");
        pool.close().expect("Failed to close pool");
        pool.close().expect("Second close should be a no-op");
        assert_eq!(pool.close_calls(), 2);
    }

    #[test]
    fn test_close_waits_for_running_work() {
        let pool = WorkerPool::new(1).expect("Failed to create pool");

        let counter = Arc::new(AtomicUsize::new(0));
        let counter_clone = Arc::clone(&counter);
        pool.schedule_fn(move || {
            thread::sleep(Duration::from_millis(100));
            counter_clone.fetch_add(1, Ordering::Relaxed);
            Ok(())
        })
        .expect("Failed to schedule");

        // close joins the worker, so the in-flight task must be done after
        pool.close().expect("Failed to close pool");
        assert_eq!(counter.load(Ordering::Relaxed), 1);
    }

    #[test]
    fn test_close_drains_queued_work() {
        let pool = WorkerPool::new(1).expect("Failed to create pool");

        let counter = Arc::new(AtomicUsize::new(0));
        let mut handles = Vec::new();
        for _ in 0..5 {
            let counter_clone = Arc::clone(&counter);
            handles.push(
                pool.schedule_fn(move || {
                    thread::sleep(Duration::from_millis(10));
                    counter_clone.fetch_add(1, Ordering::Relaxed);
                    Ok(())
                })
                .expect("Failed to schedule"),
            );
        }

        pool.close().expect("Failed to close pool");

        assert_eq!(counter.load(Ordering::Relaxed), 5);
        for handle in &handles {
            assert!(handle.wait().is_ok());
        }
    }

    #[test]
    fn test_concurrency_is_bounded_by_capacity() {
        let capacity = 3;
        let pool = WorkerPool::new(capacity).expect("Failed to create pool");

        let active = Arc::new(AtomicUsize::new(0));
        let high_water = Arc::new(AtomicUsize::new(0));

        let mut handles = Vec::new();
        for _ in 0..12 {
            let active_clone = Arc::clone(&active);
            let high_water_clone = Arc::clone(&high_water);
            handles.push(
                pool.schedule_fn(move || {
                    let now = active_clone.fetch_add(1, Ordering::SeqCst) + 1;
                    high_water_clone.fetch_max(now, Ordering::SeqCst);
                    thread::sleep(Duration::from_millis(20));
                    active_clone.fetch_sub(1, Ordering::SeqCst);
                    Ok(())
                })
                .expect("Failed to schedule"),
            );
        }

        for handle in &handles {
            handle.wait().expect("Task failed");
        }

        assert!(high_water.load(Ordering::SeqCst) <= capacity);
        pool.close().expect("Failed to close pool");
    }

    #[test]
    fn test_concurrent_schedule() {
        let pool = Arc::new(WorkerPool::new(4).expect("Failed to create pool"));
        let counter = Arc::new(AtomicUsize::new(0));

        let mut submitters = Vec::new();
        for _ in 0..8 {
            let pool_clone = Arc::clone(&pool);
            let counter_clone = Arc::clone(&counter);
            submitters.push(thread::spawn(move || {
                let mut handles = Vec::new();
                for _ in 0..50 {
                    let counter_inner = Arc::clone(&counter_clone);
                    handles.push(
                        pool_clone
                            .schedule_fn(move || {
                                counter_inner.fetch_add(1, Ordering::Relaxed);
                                Ok(())
                            })
                            .expect("Failed to schedule"),
                    );
                }
                for handle in &handles {
                    handle.wait().expect("Task failed");
                }
            }));
        }

        for submitter in submitters {
            submitter.join().expect("Submitter panicked");
        }

        assert_eq!(counter.load(Ordering::Relaxed), 400);
        assert_eq!(pool.total_scheduled(), 400);
        pool.close().expect("Failed to close pool");
    }
}
