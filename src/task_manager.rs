//! # Task Manager Module
//!
//! Bounded-concurrency executor for discovery fetch tasks. Each task is an
//! independent fetch-and-normalize closure; N worker threads drain a shared
//! queue so network latency overlaps instead of accumulating serially.
//!
//! ## Configuration
//!
//! - `SPECFETCH_FETCH_WORKERS`: number of worker threads (default: 8)
//!
//! ## Semantics
//!
//! - No ordering guarantees between tasks.
//! - No cancellation: once submitted, every task runs to completion.
//! - [`TaskManager::wait_until_exit`] blocks until all tasks have finished
//!   and surfaces the first task error seen; later errors are logged only.

use crate::errors::DiscoveryError;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::mpsc;
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;
use tracing::{debug, error};

type Task = Box<dyn FnOnce() -> Result<(), DiscoveryError> + Send + 'static>;

/// Configuration for a [`TaskManager`].
#[derive(Debug, Clone, Copy)]
pub struct TaskManagerConfig {
    /// Number of worker threads draining the task queue.
    pub num_workers: usize,
}

impl TaskManagerConfig {
    pub fn new(num_workers: usize) -> Self {
        Self {
            num_workers: num_workers.max(1),
        }
    }

    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let num_workers = std::env::var("SPECFETCH_FETCH_WORKERS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(8);
        Self::new(num_workers)
    }
}

impl Default for TaskManagerConfig {
    fn default() -> Self {
        Self { num_workers: 8 }
    }
}

/// Runs a batch of independent fallible tasks on a pool of worker threads
/// with a single blocking join point.
pub struct TaskManager {
    sender: Option<mpsc::Sender<Task>>,
    workers: Vec<JoinHandle<()>>,
    first_error: Arc<Mutex<Option<DiscoveryError>>>,
    submitted: usize,
}

impl TaskManager {
    pub fn new(config: TaskManagerConfig) -> Self {
        let (sender, receiver) = mpsc::channel::<Task>();
        let receiver = Arc::new(Mutex::new(receiver));
        let first_error = Arc::new(Mutex::new(None));

        let mut workers = Vec::with_capacity(config.num_workers);
        for worker_id in 0..config.num_workers {
            let receiver = Arc::clone(&receiver);
            let first_error = Arc::clone(&first_error);
            let handle = std::thread::Builder::new()
                .name(format!("specfetch-fetch-{worker_id}"))
                .spawn(move || {
                    loop {
                        // Hold the lock only for the dequeue, not the fetch.
                        let task = {
                            let guard = match receiver.lock() {
                                Ok(guard) => guard,
                                Err(poisoned) => poisoned.into_inner(),
                            };
                            guard.recv()
                        };
                        let Ok(task) = task else {
                            debug!(worker_id, "task queue closed, worker exiting");
                            break;
                        };
                        match catch_unwind(AssertUnwindSafe(task)) {
                            Ok(Ok(())) => {}
                            Ok(Err(err)) => record_error(&first_error, err),
                            Err(payload) => {
                                let message = panic_message(payload.as_ref());
                                record_error(
                                    &first_error,
                                    DiscoveryError::Worker { message },
                                );
                            }
                        }
                    }
                })
                .map_err(|err| error!(worker_id, %err, "failed to spawn fetch worker"));
            if let Ok(handle) = handle {
                workers.push(handle);
            }
        }

        Self {
            sender: Some(sender),
            workers,
            first_error,
            submitted: 0,
        }
    }

    /// Register a task and begin executing it in the background.
    ///
    /// Everything the task needs is captured by the closure at registration
    /// time; nothing is visible to any other task.
    pub fn start_task<F>(&mut self, task: F)
    where
        F: FnOnce() -> Result<(), DiscoveryError> + Send + 'static,
    {
        self.submitted += 1;
        if let Some(sender) = &self.sender {
            if sender.send(Box::new(task)).is_err() {
                error!("task queue disconnected, dropping task");
            }
        }
    }

    /// Block until every registered task has completed, then surface the
    /// first task error seen, if any. Remaining tasks always run to
    /// completion; there is no cancellation.
    pub fn wait_until_exit(mut self) -> Result<(), DiscoveryError> {
        // Closing the queue lets idle workers observe the disconnect.
        drop(self.sender.take());

        let mut panicked = false;
        for handle in self.workers.drain(..) {
            if handle.join().is_err() {
                panicked = true;
            }
        }

        let first_error = {
            let mut guard = match self.first_error.lock() {
                Ok(guard) => guard,
                Err(poisoned) => poisoned.into_inner(),
            };
            guard.take()
        };

        debug!(submitted = self.submitted, "all fetch tasks finished");

        match first_error {
            Some(err) => Err(err),
            None if panicked => Err(DiscoveryError::Worker {
                message: "a fetch worker exited abnormally".to_string(),
            }),
            None => Ok(()),
        }
    }

    /// Number of tasks registered so far.
    pub fn submitted(&self) -> usize {
        self.submitted
    }
}

fn record_error(slot: &Mutex<Option<DiscoveryError>>, err: DiscoveryError) {
    let mut guard = match slot.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    };
    if guard.is_none() {
        *guard = Some(err);
    } else {
        error!(%err, "additional task failure after first error");
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_clamps_workers_to_at_least_one() {
        assert_eq!(TaskManagerConfig::new(0).num_workers, 1);
        assert_eq!(TaskManagerConfig::new(4).num_workers, 4);
    }

    #[test]
    fn wait_with_no_tasks_is_ok() {
        let manager = TaskManager::new(TaskManagerConfig::new(2));
        assert!(manager.wait_until_exit().is_ok());
    }

    #[test]
    fn panicking_task_surfaces_as_worker_error() {
        let mut manager = TaskManager::new(TaskManagerConfig::new(2));
        #[allow(clippy::panic)]
        manager.start_task(|| panic!("boom"));
        let err = manager.wait_until_exit().unwrap_err();
        assert!(matches!(err, DiscoveryError::Worker { .. }));
        assert!(err.to_string().contains("boom"));
    }
}
