//! Error types for pool operations.

use thiserror::Error;

/// Errors produced by the pool.
#[derive(Debug, Error)]
pub enum PoolError {
    /// `submit` was called after `close`, or on a pool whose `running` flag is false.
    #[error("pool is closed")]
    PoolClosed,
    /// The configuration document failed validation (bad sizing, unreadable file, etc).
    #[error("invalid pool configuration: {0}")]
    ConfigInvalid(String),
    /// A task closure aborted abnormally; the panic message, if any, is captured here.
    #[error("task panicked: {0}")]
    TaskPanicked(String),
    /// The optional log sink failed to start; the pool still runs without logging.
    #[error("log sink unavailable: {0}")]
    SinkUnavailable(String),
}

/// Convenience alias for pool operations.
pub type PoolResult<T> = Result<T, PoolError>;
