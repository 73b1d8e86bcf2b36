//! Builders to construct a running [`Pool`] from configuration documents.

use std::path::Path;
use std::sync::Arc;

use crate::config::{LogConfig, PoolConfig};
use crate::core::error::PoolError;
use crate::core::Pool;
use crate::logging::{FileLogSink, LogSink};

/// Builds a pool from an already-validated [`PoolConfig`], optionally wiring
/// up a [`FileLogSink`] built from `log_config`.
pub fn build_pool(pool_config: PoolConfig, log_config: Option<LogConfig>) -> Result<Pool, PoolError> {
    let sink: Option<Arc<dyn LogSink>> = log_config.map(|cfg| Arc::new(FileLogSink::new(cfg)) as Arc<dyn LogSink>);
    Pool::new(pool_config, sink)
}

/// Loads both configuration documents from disk, validates them, and builds
/// the pool. `log_config_path` is optional: when absent, the pool runs
/// without a logging sink.
pub fn build_pool_from_paths(
    pool_config_path: impl AsRef<Path>,
    log_config_path: Option<impl AsRef<Path>>,
) -> Result<Pool, PoolError> {
    let pool_config = PoolConfig::from_path(pool_config_path)?;
    let log_config = log_config_path.map(LogConfig::from_path).transpose()?;
    build_pool(pool_config, log_config)
}
