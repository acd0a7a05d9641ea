//! Worker thread implementation

use crate::core::{PoolError, Result};
use crate::pool::worker_pool::Dispatch;
use crossbeam_channel::Receiver;
use log::{debug, error, warn};
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::thread;

/// Statistics for a worker thread
#[derive(Debug, Default)]
pub struct WorkerStats {
    /// Total number of tasks that completed successfully
    pub tasks_completed: AtomicU64,
    /// Total number of tasks that failed
    pub tasks_failed: AtomicU64,
    /// Total number of tasks that panicked
    pub tasks_panicked: AtomicU64,
    /// Total time spent running tasks (microseconds)
    pub total_busy_time_us: AtomicU64,
}

impl WorkerStats {
    /// Create new worker statistics
    pub fn new() -> Self {
        Self::default()
    }

    /// Get total tasks completed successfully
    pub fn get_tasks_completed(&self) -> u64 {
        self.tasks_completed.load(Ordering::Relaxed)
    }

    /// Get total tasks failed
    pub fn get_tasks_failed(&self) -> u64 {
        self.tasks_failed.load(Ordering::Relaxed)
    }

    /// Get total tasks panicked
    pub fn get_tasks_panicked(&self) -> u64 {
        self.tasks_panicked.load(Ordering::Relaxed)
    }

    /// Get average busy time per task in microseconds
    pub fn get_average_busy_time_us(&self) -> f64 {
        let total = self.total_busy_time_us.load(Ordering::Relaxed);
        let count = self.tasks_completed.load(Ordering::Relaxed)
            + self.tasks_failed.load(Ordering::Relaxed)
            + self.tasks_panicked.load(Ordering::Relaxed);
        if count > 0 {
            total as f64 / count as f64
        } else {
            0.0
        }
    }
}

/// A worker thread that runs dispatched tasks from the pool's queue
///
/// Each worker occupies one capacity slot; together they bound the number
/// of tasks in true overlap to the pool's capacity.
#[derive(Debug)]
pub struct Worker {
    id: usize,
    thread: Option<thread::JoinHandle<()>>,
    stats: Arc<WorkerStats>,
}

impl Worker {
    /// Create and start a new worker pulling from the shared dispatch queue
    ///
    /// Workers exit when the queue is disconnected and empty, so every task
    /// already queued is still run before shutdown completes.
    pub fn new(id: usize, name_prefix: &str, queue: Receiver<Dispatch>) -> Result<Self> {
        let stats = Arc::new(WorkerStats::new());
        let stats_clone = Arc::clone(&stats);

        let thread = thread::Builder::new()
            .name(format!("{}-{}", name_prefix, id))
            .spawn(move || {
                Self::run(id, queue, stats_clone);
            })
            .map_err(|e| PoolError::spawn_failed(id, e.to_string()))?;

        Ok(Self {
            id,
            thread: Some(thread),
            stats,
        })
    }

    /// Get worker ID
    pub fn id(&self) -> usize {
        self.id
    }

    /// Get worker statistics
    pub fn stats(&self) -> Arc<WorkerStats> {
        Arc::clone(&self.stats)
    }

    /// Join the worker thread
    pub fn join(mut self) -> Result<()> {
        if let Some(thread) = self.thread.take() {
            thread.join().map_err(|_| PoolError::join_failed(self.id))?;
        }
        Ok(())
    }

    /// Main worker loop
    ///
    /// Receives dispatches until every sender is gone and the queue is
    /// drained, then exits.
    fn run(id: usize, queue: Receiver<Dispatch>, stats: Arc<WorkerStats>) {
        debug!("worker {} started", id);

        while let Ok(dispatch) = queue.recv() {
            Self::run_task(id, dispatch, &stats);
        }

        debug!(
            "worker {} shutting down ({} completed, {} failed)",
            id,
            stats.get_tasks_completed(),
            stats.get_tasks_failed()
        );
    }

    /// Run a single task with panic protection and resolve its handle
    fn run_task(id: usize, dispatch: Dispatch, stats: &WorkerStats) {
        let Dispatch {
            mut work,
            completion,
        } = dispatch;
        let task_name = work.name().to_string();

        let start = std::time::Instant::now();
        let panic_result = catch_unwind(AssertUnwindSafe(|| work.run()));
        let elapsed_us = start.elapsed().as_micros() as u64;

        let outcome = match panic_result {
            Ok(Ok(())) => {
                stats.tasks_completed.fetch_add(1, Ordering::Relaxed);
                Ok(())
            }
            Ok(Err(e)) => {
                warn!("worker {}: task '{}' failed: {}", id, task_name, e);
                stats.tasks_failed.fetch_add(1, Ordering::Relaxed);
                Err(e)
            }
            Err(panic_info) => {
                let panic_msg = if let Some(s) = panic_info.downcast_ref::<&str>() {
                    s.to_string()
                } else if let Some(s) = panic_info.downcast_ref::<String>() {
                    s.clone()
                } else {
                    "Unknown panic".to_string()
                };
                error!("worker {}: task '{}' panicked: {}", id, task_name, panic_msg);
                stats.tasks_panicked.fetch_add(1, Ordering::Relaxed);
                Err(PoolError::work_panicked(task_name, panic_msg))
            }
        };

        stats
            .total_busy_time_us
            .fetch_add(elapsed_us, Ordering::Relaxed);
        completion.resolve(outcome);
    }
}

impl Drop for Worker {
    fn drop(&mut self) {
        if let Some(thread) = self.thread.take() {
            if thread.is_finished() {
                if thread.join().is_err() {
                    error!("worker {} panicked during shutdown", self.id);
                }
            } else {
                warn!("worker {} dropped while still running", self.id);
            }
        }
    }
}
