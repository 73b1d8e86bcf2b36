//! The external logging sink collaborator.
//!
//! The pool core only ever talks to `Arc<dyn LogSink>`; it never depends on
//! a sink's rotation behavior, format choice, or file layout. If no sink is
//! provided, the pool emits nothing.

pub mod file_sink;

use std::sync::Arc;

pub use file_sink::FileLogSink;

/// A background text sink consumed by the pool for diagnostic records.
///
/// Implementations must be safe to call from any worker thread concurrently;
/// `emit` must not block the caller on I/O. `start` takes `self` by `Arc` so
/// the drainer thread can hold its own owning reference instead of a raw
/// pointer back into the sink.
pub trait LogSink: Send + Sync {
    /// Launches the sink's background drainer. Called once, before the pool
    /// accepts its first submission.
    fn start(self: Arc<Self>) -> Result<(), crate::core::error::PoolError>;

    /// Appends `text` to the sink's internal queue, non-blocking.
    ///
    /// When `with_timestamp` is true the drainer prefixes the record with a
    /// formatted current time string; otherwise the record is written as-is.
    fn emit(&self, text: &str, with_timestamp: bool);

    /// Flushes remaining entries and stops the drainer. Idempotent.
    fn stop(&self);
}
