//! Type-erased task closures and the per-submission completion handle.

use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use parking_lot::{Condvar, Mutex};

use super::error::PoolError;

/// A type-erased unit of work queued by the pool.
///
/// Each `Task` closes over the caller's typed closure and the result slot it
/// must fill; running it drives the outcome into that slot.
pub type Task = Box<dyn FnOnce() + Send + 'static>;

enum SlotState<R> {
    Pending,
    Ready(Result<R, PoolError>),
}

struct Slot<R> {
    state: Mutex<SlotState<R>>,
    ready: Condvar,
}

/// A single-consumer handle over a submitted task's eventual result.
///
/// `Handle<R>` is moveable but not clonable: exactly one consumer may
/// observe the outcome of the task it was returned for.
pub struct Handle<R> {
    slot: Arc<Slot<R>>,
}

impl<R> Handle<R> {
    /// Blocks until the task finishes, returning its result or the captured panic.
    pub fn wait(self) -> Result<R, PoolError> {
        let mut state = self.slot.state.lock();
        loop {
            match &*state {
                SlotState::Ready(_) => break,
                SlotState::Pending => self.slot.ready.wait(&mut state),
            }
        }
        match std::mem::replace(&mut *state, SlotState::Pending) {
            SlotState::Ready(result) => result,
            SlotState::Pending => unreachable!("slot observed ready but read back pending"),
        }
    }

    /// Returns the result immediately if the task has finished, `None` otherwise.
    ///
    /// Consumes `self` only on the ready path; the handle is returned alongside
    /// `None` so the caller can poll again later.
    pub fn try_wait(self) -> Result<Result<R, PoolError>, Self> {
        let mut state = self.slot.state.lock();
        if matches!(&*state, SlotState::Ready(_)) {
            match std::mem::replace(&mut *state, SlotState::Pending) {
                SlotState::Ready(result) => return Ok(result),
                SlotState::Pending => unreachable!(),
            }
        }
        drop(state);
        Err(self)
    }
}

/// Wraps a typed closure into a type-erased [`Task`] plus the [`Handle`] that
/// observes its outcome.
///
/// The closure runs under `catch_unwind` so a panic never takes its worker
/// down with it; the panic message (if any) becomes [`PoolError::TaskPanicked`].
pub fn package<F, R>(f: F) -> (Task, Handle<R>)
where
    F: FnOnce() -> R + Send + 'static,
    R: Send + 'static,
{
    let slot = Arc::new(Slot {
        state: Mutex::new(SlotState::Pending),
        ready: Condvar::new(),
    });
    let slot_for_task = Arc::clone(&slot);

    let task: Task = Box::new(move || {
        let outcome = panic::catch_unwind(AssertUnwindSafe(f));
        let result = outcome.map_err(|payload| PoolError::TaskPanicked(panic_message(&payload)));
        *slot_for_task.state.lock() = SlotState::Ready(result);
        slot_for_task.ready.notify_all();
    });

    (task, Handle { slot })
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "task panicked with a non-string payload".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn handle_wait_returns_value() {
        let (task, handle) = package(|| 2 + 2);
        task();
        assert_eq!(handle.wait().unwrap(), 4);
    }

    #[test]
    fn handle_wait_surfaces_panic() {
        let (task, handle) = package(|| -> i32 { panic!("boom") });
        task();
        let err = handle.wait().unwrap_err();
        assert!(matches!(err, PoolError::TaskPanicked(msg) if msg == "boom"));
    }

    #[test]
    fn try_wait_before_execution_returns_handle_back() {
        let (task, handle) = package(|| 1);
        let handle = match handle.try_wait() {
            Ok(_) => panic!("should not be ready yet"),
            Err(handle) => handle,
        };
        task();
        assert_eq!(handle.wait().unwrap(), 1);
    }

    #[test]
    fn try_wait_after_execution_returns_result() {
        let (task, handle) = package(|| "done");
        task();
        match handle.try_wait() {
            Ok(result) => assert_eq!(result.unwrap(), "done"),
            Err(_) => panic!("expected ready result"),
        }
    }
}
