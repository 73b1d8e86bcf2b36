//! The pool supervisor: owns config, the worker registry, the queue, and the
//! submission path.

use std::collections::HashMap;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;

use tracing::{info, warn};

use parking_lot::{Condvar, Mutex};

use crate::config::pool::hardware_concurrency;
use crate::config::{PoolConfig, PoolMode};
use crate::logging::LogSink;

use super::error::PoolError;
use super::queue::PriorityQueue;
use super::task::{package, Handle};
use super::worker;

pub(super) struct StaticConfig {
    pub(super) mode: PoolMode,
    pub(super) max_threads: usize,
    pub(super) min_threads: usize,
}

pub(super) struct SupervisorState {
    pub(super) running: bool,
    next_worker_id: u64,
    pub(super) registry: HashMap<u64, JoinHandle<()>>,
    pub(super) thread_count: usize,
    max_tasks: usize,
    pub(super) timeout: Duration,
    default_priority: u32,
}

/// Everything a worker needs to see: immutable sizing, guarded mutable
/// state, the queue, and the two condition variables paired with the pool
/// lock, per the concurrency model.
pub(super) struct Shared {
    pub(super) config: StaticConfig,
    pub(super) state: Mutex<SupervisorState>,
    pub(super) queue: PriorityQueue,
    pub(super) not_empty: Condvar,
    pub(super) not_full: Condvar,
    pub(super) thread_count_hint: AtomicUsize,
    log_sink: Option<Arc<dyn LogSink>>,
}

/// A priority-scheduled pool of worker threads.
///
/// Construct with [`Pool::new`] (already-validated config) or
/// [`Pool::from_config_path`] (loads and validates a configuration
/// document). Submit work with [`Pool::submit`]; shut down with
/// [`Pool::close`].
pub struct Pool {
    shared: Arc<Shared>,
}

impl Pool {
    /// Builds a pool from an already-validated configuration, spawning
    /// `config.min_threads` workers and starting `log_sink` if provided.
    pub fn new(config: PoolConfig, log_sink: Option<Arc<dyn LogSink>>) -> Result<Self, PoolError> {
        config.validate()?;

        let log_sink = log_sink.and_then(|sink| match Arc::clone(&sink).start() {
            Ok(()) => Some(sink),
            Err(err) => {
                eprintln!("log sink unavailable, continuing without logging: {err}");
                None
            }
        });

        let shared = Arc::new(Shared {
            config: StaticConfig {
                mode: config.mode,
                max_threads: config.max_threads,
                min_threads: config.min_threads,
            },
            state: Mutex::new(SupervisorState {
                running: true,
                next_worker_id: 1,
                registry: HashMap::new(),
                thread_count: 0,
                max_tasks: config.max_tasks,
                timeout: config.timeout,
                default_priority: config.default_priority,
            }),
            queue: PriorityQueue::new(),
            not_empty: Condvar::new(),
            not_full: Condvar::new(),
            thread_count_hint: AtomicUsize::new(0),
            log_sink,
        });

        {
            let mut state = shared.state.lock();
            for _ in 0..config.min_threads {
                spawn_worker(&shared, &mut state);
            }
        }

        info!(
            threads = config.min_threads,
            mode = ?config.mode,
            "pool started"
        );

        Ok(Self { shared })
    }

    /// Loads, validates, and builds a pool from a configuration document path.
    pub fn from_config_path(
        path: impl AsRef<Path>,
        log_sink: Option<Arc<dyn LogSink>>,
    ) -> Result<Self, PoolError> {
        let config = PoolConfig::from_path(path)?;
        Self::new(config, log_sink)
    }

    /// Submits `f` for execution with an optional priority (lower value runs
    /// first; defaults to the pool's configured default priority).
    ///
    /// Blocks while the queue is full, growing the pool under `MutableThread`
    /// mode once the backpressure timeout elapses, per the component design.
    pub fn submit<F, R>(&self, f: F, priority: Option<u32>) -> Result<Handle<R>, PoolError>
    where
        F: FnOnce() -> R + Send + 'static,
        R: Send + 'static,
    {
        let (task, handle) = package(f);
        let shared = &self.shared;

        let mut state = shared.state.lock();
        if !state.running {
            return Err(PoolError::PoolClosed);
        }

        while shared.queue.len() >= state.max_tasks {
            let timeout = state.timeout;
            let result = shared.not_full.wait_for(&mut state, timeout);
            if !result.timed_out() {
                continue;
            }

            let can_grow = shared.config.mode == PoolMode::MutableThread
                && state.registry.len() < shared.config.max_threads
                && state.registry.len() < hardware_concurrency();
            if can_grow {
                spawn_worker(shared, &mut state);
            }
        }

        let effective_priority = priority.unwrap_or(state.default_priority);
        shared.queue.enqueue(task, effective_priority);
        drop(state);

        shared.not_empty.notify_one();

        if let Some(sink) = &shared.log_sink {
            sink.emit(&format!("task submitted at priority {effective_priority}"), true);
        }

        Ok(handle)
    }

    /// Idempotent shutdown: stops accepting submissions, wakes every parked
    /// worker, joins them all (draining already-queued tasks first), then
    /// stops the log sink.
    pub fn close(&self) {
        {
            let mut state = self.shared.state.lock();
            if !state.running {
                return;
            }
            state.running = false;
        }

        self.shared.not_empty.notify_all();

        let handles: Vec<JoinHandle<()>> = {
            let mut state = self.shared.state.lock();
            state.registry.drain().map(|(_, handle)| handle).collect()
        };
        for handle in handles {
            let _ = handle.join();
        }

        {
            let mut state = self.shared.state.lock();
            state.thread_count = 0;
            self.shared.thread_count_hint.store(0, Ordering::Release);
        }

        if let Some(sink) = &self.shared.log_sink {
            sink.stop();
        }

        info!("pool closed");
    }

    /// Current thread population, read without blocking on the pool lock.
    #[must_use]
    pub fn thread_count(&self) -> usize {
        self.shared.thread_count_hint.load(Ordering::Acquire)
    }

    /// Current number of queued (not yet executing) tasks.
    #[must_use]
    pub fn queue_len(&self) -> usize {
        self.shared.queue.len()
    }

    /// Updates the upper bound on queued tasks. Does not wake parked
    /// submitters or drop already-queued tasks if the new bound is smaller.
    pub fn set_max_tasks(&self, max_tasks: usize) {
        self.shared.state.lock().max_tasks = max_tasks;
    }

    /// Updates the backpressure/idle wait duration. Takes effect on the next
    /// wait, not retroactively on one in progress.
    pub fn set_timeout(&self, timeout: Duration) {
        self.shared.state.lock().timeout = timeout;
    }

    /// Updates the priority applied to submissions that do not specify one.
    pub fn set_default_priority(&self, priority: u32) {
        self.shared.state.lock().default_priority = priority;
    }
}

impl Drop for Pool {
    fn drop(&mut self) {
        self.close();
    }
}

fn spawn_worker(shared: &Arc<Shared>, state: &mut SupervisorState) {
    let id = state.next_worker_id;
    state.next_worker_id += 1;
    let handle = worker::spawn(id, Arc::clone(shared));
    state.registry.insert(id, handle);
    state.thread_count += 1;
    shared.thread_count_hint.store(state.thread_count, Ordering::Release);
    if state.thread_count > shared.config.min_threads {
        warn!(worker = id, total = state.thread_count, "scaled up under backpressure");
    }
}
