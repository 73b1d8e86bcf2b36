//! Configuration models for pool sizing and the log sink.

pub mod log;
pub mod pool;

pub use log::{LogConfig, OpenMode, TimeFormat};
pub use pool::{hardware_concurrency, PoolConfig, PoolConfigDocument, PoolMode};
