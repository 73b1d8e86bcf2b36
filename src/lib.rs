//! # priolane
//!
//! A priority-scheduled worker pool with fixed and elastic thread populations.
//!
//! This crate provides a bounded, priority-ordered task queue backed by a pool
//! of OS threads. Submitters get back a [`core::Handle`] they can block on (or
//! poll) for the task's result. Two sizing regimes are supported: a fixed pool
//! that never changes its thread count, and an elastic pool that spawns extra
//! workers under backpressure and retires idle ones after a configurable
//! timeout.
//!
//! ## Key properties
//!
//! - **Priority ordering**: tasks are dequeued lowest-priority-value-first via
//!   a binary min-heap, not FIFO.
//! - **Backpressure**: submission blocks (or, for elastic pools, grows the
//!   pool) once the queue is full rather than growing unboundedly.
//! - **Panic isolation**: a panicking task never takes its worker down with
//!   it; the panic is caught and reported through the task's handle.
//! - **No-poison locking**: built directly on `parking_lot::Mutex`/`Condvar`,
//!   so a panic while holding the pool lock cannot poison it.
//!
//! ## Quick example
//!
//! ```rust,no_run
//! use priolane::config::PoolConfig;
//! use priolane::core::Pool;
//!
//! let config = PoolConfig::fixed(4);
//! let pool = Pool::new(config, None).expect("pool starts");
//!
//! let handle = pool.submit(|| 2 + 2, None).expect("task accepted");
//! assert_eq!(handle.wait().expect("task did not panic"), 4);
//!
//! pool.close();
//! ```
//!
//! For complete examples, see `tests/pool_scenarios.rs`.

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

/// Pool core: the priority queue, worker loop, task handles, and the pool itself.
pub mod core;
/// Configuration models for pool sizing and the log sink.
pub mod config;
/// Builders to construct a running pool from configuration.
pub mod builders;
/// The external logging sink collaborator and its file-backed implementation.
pub mod logging;
/// Shared utilities.
pub mod util;
