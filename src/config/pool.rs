//! Pool sizing and scheduling configuration.

use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::core::error::PoolError;

/// Thread population sizing regime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PoolMode {
    /// The thread count never changes after construction.
    FixedThread,
    /// The pool grows under backpressure and retires idle workers.
    MutableThread,
}

/// On-disk/wire shape of the pool configuration document (§6).
///
/// Field names and casing match the external document exactly; this is
/// converted into [`PoolConfig`] by [`PoolConfig::from_document`], which
/// performs the `hardware_concurrency` clamping the original implementation
/// does in its config parser.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PoolConfigDocument {
    /// Upper bound on the thread population, before clamping.
    pub max_threads: usize,
    /// Lower bound on the thread population, before clamping.
    pub min_threads: usize,
    /// `true` selects [`PoolMode::FixedThread`].
    #[serde(rename = "FIXED_THREAD")]
    pub fixed_thread: bool,
    /// Backpressure/idle timeout, in milliseconds.
    pub timeout: u64,
    /// Default priority applied when a submission does not specify one.
    pub priority_level: u32,
    /// Upper bound on queued (not yet executing) tasks.
    pub max_task: usize,
}

/// Validated, ready-to-use pool configuration.
///
/// `mode`, `max_threads`, and `min_threads` are fixed for the pool's
/// lifetime. `max_tasks`, `timeout`, and `default_priority` are held by the
/// supervisor under its own lock and may be changed at runtime through
/// `Pool::set_max_tasks`/`set_timeout`/`set_default_priority`.
#[derive(Debug, Clone)]
pub struct PoolConfig {
    /// Thread population sizing regime.
    pub mode: PoolMode,
    /// Upper bound on the thread population after clamping to hardware concurrency.
    pub max_threads: usize,
    /// Lower bound on the thread population after clamping to hardware concurrency.
    pub min_threads: usize,
    /// Backpressure/idle wait duration.
    pub timeout: Duration,
    /// Default priority applied when a submission does not specify one.
    pub default_priority: u32,
    /// Upper bound on queued tasks.
    pub max_tasks: usize,
}

impl PoolConfig {
    /// Builds a fixed-size pool configuration with sensible defaults, clamped
    /// to the machine's hardware concurrency.
    #[must_use]
    pub fn fixed(threads: usize) -> Self {
        let clamped = threads.min(hardware_concurrency()).max(1);
        Self {
            mode: PoolMode::FixedThread,
            max_threads: clamped,
            min_threads: clamped,
            timeout: Duration::from_millis(3000),
            default_priority: 0,
            max_tasks: 256,
        }
    }

    /// Builds an elastic pool configuration, clamped to hardware concurrency.
    #[must_use]
    pub fn elastic(min_threads: usize, max_threads: usize) -> Self {
        let hw = hardware_concurrency();
        Self {
            mode: PoolMode::MutableThread,
            max_threads: max_threads.min(hw).max(1),
            min_threads: min_threads.min(hw).max(1),
            timeout: Duration::from_millis(3000),
            default_priority: 0,
            max_tasks: 256,
        }
    }

    /// Converts an external configuration document into a validated config,
    /// applying the same `hardware_concurrency` clamping the original
    /// implementation's config parser does: in `FixedThread` mode
    /// `max_threads == min_threads == min(max_threads, hardware_concurrency)`;
    /// in `MutableThread` mode `max_threads` and `min_threads` are clamped
    /// independently.
    pub fn from_document(doc: &PoolConfigDocument) -> Result<Self, PoolError> {
        let hw = hardware_concurrency();
        let (mode, max_threads, min_threads) = if doc.fixed_thread {
            let clamped = doc.max_threads.min(hw);
            (PoolMode::FixedThread, clamped, clamped)
        } else {
            (
                PoolMode::MutableThread,
                doc.max_threads.min(hw),
                doc.min_threads.min(hw),
            )
        };

        let config = Self {
            mode,
            max_threads,
            min_threads,
            timeout: Duration::from_millis(doc.timeout),
            default_priority: doc.priority_level,
            max_tasks: doc.max_task,
        };
        config.validate()?;
        Ok(config)
    }

    /// Parses and validates a configuration document from a JSON string.
    pub fn from_json_str(input: &str) -> Result<Self, PoolError> {
        let doc: PoolConfigDocument =
            serde_json::from_str(input).map_err(|e| PoolError::ConfigInvalid(e.to_string()))?;
        Self::from_document(&doc)
    }

    /// Parses and validates a configuration document from a file path.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, PoolError> {
        let contents = fs::read_to_string(path).map_err(|e| PoolError::ConfigInvalid(e.to_string()))?;
        Self::from_json_str(&contents)
    }

    /// Validates sizing invariants: `1 <= min_threads <= max_threads`,
    /// `max_tasks > 0`, and `min_threads == max_threads` in `FixedThread` mode.
    pub fn validate(&self) -> Result<(), PoolError> {
        if self.min_threads == 0 {
            return Err(PoolError::ConfigInvalid("min_threads must be at least 1".into()));
        }
        if self.min_threads > self.max_threads {
            return Err(PoolError::ConfigInvalid(
                "min_threads must not exceed max_threads".into(),
            ));
        }
        if self.max_tasks == 0 {
            return Err(PoolError::ConfigInvalid("max_tasks must be greater than 0".into()));
        }
        if self.mode == PoolMode::FixedThread && self.min_threads != self.max_threads {
            return Err(PoolError::ConfigInvalid(
                "FixedThread mode requires min_threads == max_threads".into(),
            ));
        }
        Ok(())
    }
}

/// Number of logical CPUs available, used to clamp thread population bounds.
#[must_use]
pub fn hardware_concurrency() -> usize {
    num_cpus::get()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_mode_forces_equal_bounds() {
        let doc = PoolConfigDocument {
            max_threads: 8,
            min_threads: 2,
            fixed_thread: true,
            timeout: 100,
            priority_level: 0,
            max_task: 16,
        };
        let config = PoolConfig::from_document(&doc).unwrap();
        assert_eq!(config.mode, PoolMode::FixedThread);
        assert_eq!(config.max_threads, config.min_threads);
    }

    #[test]
    fn mutable_mode_clamps_independently() {
        let hw = hardware_concurrency();
        let doc = PoolConfigDocument {
            max_threads: hw + 100,
            min_threads: hw + 50,
            fixed_thread: false,
            timeout: 100,
            priority_level: 0,
            max_task: 16,
        };
        let config = PoolConfig::from_document(&doc).unwrap();
        assert_eq!(config.max_threads, hw);
        assert_eq!(config.min_threads, hw);
    }

    #[test]
    fn rejects_min_greater_than_max() {
        let doc = PoolConfigDocument {
            max_threads: 2,
            min_threads: 4,
            fixed_thread: false,
            timeout: 100,
            priority_level: 0,
            max_task: 16,
        };
        assert!(PoolConfig::from_document(&doc).is_err());
    }

    #[test]
    fn rejects_zero_max_task() {
        let doc = PoolConfigDocument {
            max_threads: 2,
            min_threads: 1,
            fixed_thread: false,
            timeout: 100,
            priority_level: 0,
            max_task: 0,
        };
        assert!(PoolConfig::from_document(&doc).is_err());
    }
}
