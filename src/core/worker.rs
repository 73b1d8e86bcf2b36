//! The worker loop: one thread pulling tasks off the shared priority queue.

use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use tracing::debug;

use super::pool::Shared;
use crate::config::PoolMode;

/// Spawns a worker thread identified by `id`, running against `shared`.
///
/// Mirrors the component design's worker loop exactly: park on `not_empty`
/// (indefinitely in `FixedThread` mode, with a timeout in `MutableThread`
/// mode), retire when idle past the timeout and above `min_threads`,
/// otherwise dequeue-and-execute while the lock is briefly held, then signal
/// `not_full` and run the task outside any lock.
pub(super) fn spawn(id: u64, shared: Arc<Shared>) -> JoinHandle<()> {
    thread::Builder::new()
        .name(format!("priolane-worker-{id}"))
        .spawn(move || run(id, &shared))
        .expect("failed to spawn worker thread")
}

fn run(id: u64, shared: &Arc<Shared>) {
    loop {
        let mut state = shared.state.lock();

        while shared.queue.is_empty() && state.running {
            debug!(worker = id, "waiting for work");
            match shared.config.mode {
                PoolMode::FixedThread => shared.not_empty.wait(&mut state),
                PoolMode::MutableThread => {
                    let timeout = state.timeout;
                    let result = shared.not_empty.wait_for(&mut state, timeout);
                    if result.timed_out() {
                        if state.thread_count > shared.config.min_threads {
                            state.registry.remove(&id);
                            state.thread_count -= 1;
                            shared
                                .thread_count_hint
                                .store(state.thread_count, Ordering::Release);
                            debug!(worker = id, remaining = state.thread_count, "retiring");
                            return;
                        }
                        shared.not_empty.wait(&mut state);
                    }
                }
            }
        }

        if !state.running && shared.queue.is_empty() {
            return;
        }

        let dequeued = shared.queue.try_dequeue();
        drop(state);

        if let Some((task, priority)) = dequeued {
            shared.not_full.notify_one();
            debug!(worker = id, priority, "executing task");
            task();
        }
    }
}
