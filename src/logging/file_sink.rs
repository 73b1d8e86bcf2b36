//! File-backed implementation of [`super::LogSink`].

use std::collections::VecDeque;
use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use chrono::Local;

use parking_lot::{Condvar, Mutex};

use crate::config::log::{LogConfig, OpenMode, TimeFormat};
use crate::core::error::PoolError;

use super::LogSink;

struct Queue {
    entries: VecDeque<(String, bool)>,
    running: bool,
}

/// A background-thread file sink with size-triggered backup/rotation.
///
/// Grounded on the original implementation's singleton log class: a
/// dedicated thread drains an internal FIFO, checking the target file's
/// size before each write and renaming-with-timestamp when it exceeds the
/// configured threshold.
pub struct FileLogSink {
    config: LogConfig,
    queue: Mutex<Queue>,
    not_empty: Condvar,
    handle: Mutex<Option<JoinHandle<()>>>,
}

impl FileLogSink {
    /// Creates a sink for the given configuration. Does not open the file or
    /// spawn the drainer until [`LogSink::start`] is called.
    #[must_use]
    pub fn new(config: LogConfig) -> Self {
        Self {
            config,
            queue: Mutex::new(Queue {
                entries: VecDeque::new(),
                running: false,
            }),
            not_empty: Condvar::new(),
            handle: Mutex::new(None),
        }
    }

    fn open_file(&self) -> std::io::Result<File> {
        let path = self.config.file_path();
        let mut options = OpenOptions::new();
        options.create(true);
        match self.config.open_mode {
            OpenMode::AddTo => options.append(true),
            OpenMode::WriteOnly => options.write(true).truncate(true),
        };
        options.open(path)
    }

    fn backup_if_needed(&self) {
        if !self.config.backup {
            return;
        }
        let path = self.config.file_path();
        let Ok(metadata) = fs::metadata(&path) else {
            return;
        };
        if metadata.len() < self.config.max_log_size_bytes() {
            return;
        }
        let stamp = Local::now().format(TimeFormat::FullA.pattern()).to_string();
        let mut backup_path = PathBuf::from(&path);
        backup_path.set_file_name(format!("{} {}", self.config.log_name, stamp));
        let _ = fs::rename(&path, &backup_path);
    }

    fn format_record(&self, text: &str, with_timestamp: bool) -> String {
        if with_timestamp {
            let stamp = Local::now().format(self.config.time_format.pattern()).to_string();
            format!("{stamp} --->  {text}")
        } else {
            text.to_string()
        }
    }

    fn drain_loop(&self) {
        loop {
            let mut guard = self.queue.lock();
            while guard.entries.is_empty() && guard.running {
                self.not_empty.wait(&mut guard);
            }
            if guard.entries.is_empty() && !guard.running {
                return;
            }
            let batch: Vec<_> = guard.entries.drain(..).collect();
            drop(guard);

            self.backup_if_needed();
            if let Ok(mut file) = self.open_file() {
                for (text, with_timestamp) in batch {
                    let line = self.format_record(&text, with_timestamp);
                    let _ = writeln!(file, "{line}");
                }
                let _ = file.flush();
            }
        }
    }
}

impl LogSink for FileLogSink {
    fn start(self: Arc<Self>) -> Result<(), PoolError> {
        fs::create_dir_all(&self.config.log_path)
            .map_err(|e| PoolError::SinkUnavailable(e.to_string()))?;

        let mut queue = self.queue.lock();
        if queue.running {
            return Ok(());
        }
        queue.running = true;
        drop(queue);

        let sink = Arc::clone(&self);
        let worker = thread::spawn(move || sink.drain_loop());
        *self.handle.lock() = Some(worker);
        Ok(())
    }

    fn emit(&self, text: &str, with_timestamp: bool) {
        let mut queue = self.queue.lock();
        if !queue.running {
            return;
        }
        queue.entries.push_back((text.to_string(), with_timestamp));
        drop(queue);
        self.not_empty.notify_one();
    }

    fn stop(&self) {
        {
            let mut queue = self.queue.lock();
            if !queue.running {
                return;
            }
            queue.running = false;
        }
        self.not_empty.notify_all();
        if let Some(worker) = self.handle.lock().take() {
            let _ = worker.join();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;
    use std::time::Duration;

    fn config_in(dir: &std::path::Path, name: &str, max_log_size: u64) -> LogConfig {
        LogConfig {
            log_path: dir.to_path_buf(),
            log_name: name.to_string(),
            open_mode: OpenMode::AddTo,
            time_format: TimeFormat::FullA,
            backup: true,
            max_log_size,
        }
    }

    fn wait_until(mut condition: impl FnMut() -> bool) {
        for _ in 0..200 {
            if condition() {
                return;
            }
            thread::sleep(Duration::from_millis(10));
        }
        panic!("condition did not become true in time");
    }

    #[test]
    fn emits_bare_and_timestamped_records_to_the_log_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(dir.path(), "pool.log", 10);
        let path = config.file_path();
        let sink = Arc::new(FileLogSink::new(config));
        Arc::clone(&sink).start().unwrap();

        sink.emit("bare line", false);
        sink.emit("timestamped line", true);
        sink.stop();

        let contents = fs::read_to_string(&path).unwrap();
        assert!(contents.contains("bare line"));
        assert!(contents.contains("timestamped line --->"));
    }

    #[test]
    fn format_record_applies_the_configured_pattern_only_when_timestamped() {
        let dir = tempfile::tempdir().unwrap();
        let sink = FileLogSink::new(config_in(dir.path(), "pool.log", 10));

        assert_eq!(sink.format_record("hello", false), "hello");
        let stamped = sink.format_record("hello", true);
        assert!(stamped.ends_with("--->  hello"));
        assert_ne!(stamped, "hello");
    }

    #[test]
    fn backup_rotates_the_file_once_it_exceeds_the_configured_size() {
        let dir = tempfile::tempdir().unwrap();
        // max_log_size is in mebibytes; 0 means "rotate on the very next flush".
        let config = config_in(dir.path(), "pool.log", 0);
        let path = config.file_path();
        let sink = Arc::new(FileLogSink::new(config));
        Arc::clone(&sink).start().unwrap();

        sink.emit("first batch", false);
        wait_until(|| fs::metadata(&path).is_ok());

        sink.emit("second batch", false);
        sink.stop();

        let backups: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .filter_map(Result::ok)
            .filter(|entry| entry.file_name().to_string_lossy().starts_with("pool.log "))
            .collect();
        assert!(!backups.is_empty(), "expected a rotated backup file");
    }

    #[test]
    fn emit_before_start_is_dropped_rather_than_queued() {
        let dir = tempfile::tempdir().unwrap();
        let sink = FileLogSink::new(config_in(dir.path(), "pool.log", 10));
        sink.emit("lost", false);
        assert!(sink.queue.lock().entries.is_empty());
    }
}
