//! Logging setup.
//!
//! The desktop app writes one log file per day into the app log directory,
//! rotating when a file grows past `MAX_LOG_SIZE` and keeping the newest
//! `MAX_LOG_FILES`. Both Rust code (through the `log` facade) and the
//! webview (through `write_log`) end up in the same file. The scenario
//! runner only logs to stderr.

use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use chrono::Local;
use parking_lot::Mutex;

use crate::error::{NinResult, ResultExt};

/// Maximum log file size before rotation (5MB)
const MAX_LOG_SIZE: u64 = 5 * 1024 * 1024;

/// Maximum number of log files to keep
const MAX_LOG_FILES: usize = 5;

const LOG_PREFIX: &str = "nin_";

lazy_static::lazy_static! {
    /// Active log file, set by `init_file_logging`.
    static ref LOG_SINK: Mutex<Option<RotatingLog>> = Mutex::new(None);
}

/// Daily log file with size-based rotation.
pub struct RotatingLog {
    dir: PathBuf,
    /// File the handle below was opened on; lags behind the date until the next write.
    path: PathBuf,
    file: File,
    max_size: u64,
    max_files: usize,
}

impl RotatingLog {
    pub fn open(dir: &Path) -> NinResult<Self> {
        Self::with_limits(dir, MAX_LOG_SIZE, MAX_LOG_FILES)
    }

    pub fn with_limits(dir: &Path, max_size: u64, max_files: usize) -> NinResult<Self> {
        fs::create_dir_all(dir)
            .with_context(|| format!("failed to create log directory {}", dir.display()))?;
        let path = current_log_path(dir);
        let file = open_append(&path)
            .with_context(|| format!("failed to open log file {}", path.display()))?;
        let log = Self {
            dir: dir.to_path_buf(),
            path,
            file,
            max_size,
            max_files,
        };
        log.cleanup();
        Ok(log)
    }

    pub fn current_path(&self) -> PathBuf {
        self.path.clone()
    }

    pub fn write_line(&mut self, line: &str) -> io::Result<()> {
        self.roll_day()?;
        self.file.write_all(line.as_bytes())?;
        if !line.ends_with('\n') {
            self.file.write_all(b"\n")?;
        }
        self.file.flush()?;
        self.rotate_if_needed()
    }

    /// Switch to the new day's file once the date has changed.
    fn roll_day(&mut self) -> io::Result<()> {
        let today = current_log_path(&self.dir);
        if today == self.path {
            return Ok(());
        }

        self.file = open_append(&today)?;
        self.path = today;
        self.cleanup();
        Ok(())
    }

    fn rotate_if_needed(&mut self) -> io::Result<()> {
        // Size of the open handle, which may no longer be at `path`
        let size = self.file.metadata()?.len();
        if size <= self.max_size {
            return Ok(());
        }

        let stamp = Local::now().format("%Y-%m-%d_%H%M%S%.3f");
        let rotated = self.dir.join(format!("{}{}.log", LOG_PREFIX, stamp));
        fs::rename(&self.path, &rotated)?;
        self.file = open_append(&self.path)?;
        self.cleanup();
        Ok(())
    }

    /// Remove the oldest log files beyond `max_files`.
    fn cleanup(&self) {
        let Ok(entries) = fs::read_dir(&self.dir) else {
            return;
        };

        let current = &self.path;
        let mut log_files: Vec<_> = entries
            .filter_map(|e| e.ok())
            .filter(|e| &e.path() != current)
            .filter(|e| {
                let name = e.file_name();
                let name = name.to_string_lossy();
                name.starts_with(LOG_PREFIX) && name.ends_with(".log")
            })
            .collect();

        // Newest first
        log_files.sort_by(|a, b| {
            let a_time = a.metadata().and_then(|m| m.modified()).ok();
            let b_time = b.metadata().and_then(|m| m.modified()).ok();
            b_time.cmp(&a_time).then_with(|| b.file_name().cmp(&a.file_name()))
        });

        // The current file always counts toward the limit
        let keep = self.max_files.saturating_sub(1);
        for entry in log_files.into_iter().skip(keep) {
            let _ = fs::remove_file(entry.path());
        }
    }
}

fn open_append(path: &Path) -> io::Result<File> {
    OpenOptions::new().create(true).append(true).open(path)
}

/// Path of the current log file (one per day).
fn current_log_path(dir: &Path) -> PathBuf {
    let date = Local::now().format("%Y-%m-%d");
    dir.join(format!("{}{}.log", LOG_PREFIX, date))
}

/// `env_logger` pipe target that forwards into `LOG_SINK`.
struct SinkWriter {
    pending: Vec<u8>,
}

impl Write for SinkWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.pending.extend_from_slice(buf);
        if self.pending.ends_with(b"\n") {
            self.flush()?;
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        if self.pending.is_empty() {
            return Ok(());
        }
        let line = String::from_utf8_lossy(&self.pending).into_owned();
        self.pending.clear();

        // Echo to the console in debug builds
        #[cfg(debug_assertions)]
        eprint!("{}", line);

        if let Some(sink) = LOG_SINK.lock().as_mut() {
            sink.write_line(&line)?;
        }
        Ok(())
    }
}

/// Route the `log` facade into a rotating file under `log_dir`.
pub fn init_file_logging(log_dir: &Path) -> NinResult<PathBuf> {
    let sink = RotatingLog::open(log_dir)?;
    let path = sink.current_path();
    *LOG_SINK.lock() = Some(sink);

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format(|buf, record| {
            writeln!(
                buf,
                "[{}] [{}] [{}] {}",
                Local::now().format("%Y-%m-%d %H:%M:%S%.3f"),
                record.level(),
                record.target(),
                record.args()
            )
        })
        .target(env_logger::Target::Pipe(Box::new(SinkWriter {
            pending: Vec::new(),
        })))
        .try_init()
        .context("logger already initialized")?;

    log::info!("Logging system initialized");
    log::info!("Log directory: {}", log_dir.display());
    Ok(path)
}

/// Stderr logging for command-line use, filtered by `RUST_LOG`.
pub fn init_console_logging() {
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .try_init();
}

/// Map a webview level name onto `log::Level`. Unknown names log as info.
pub fn parse_level(level: &str) -> log::Level {
    match level.to_lowercase().as_str() {
        "debug" => log::Level::Debug,
        "trace" => log::Level::Trace,
        "warn" | "warning" => log::Level::Warn,
        "error" => log::Level::Error,
        _ => log::Level::Info,
    }
}

/// Log a line on behalf of the webview.
pub fn log_from_frontend(level: &str, source: &str, message: &str) {
    log::log!(target: "webview", parse_level(level), "[{}] {}", source, message);
}

/// Last `lines` lines of today's log file.
pub fn recent_logs(log_dir: &Path, lines: usize) -> NinResult<String> {
    let path = current_log_path(log_dir);
    if !path.exists() {
        return Ok(String::new());
    }

    let content = fs::read_to_string(&path)?;
    let recent: Vec<&str> = content.lines().rev().take(lines).collect();
    Ok(recent.into_iter().rev().collect::<Vec<_>>().join("\n"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn log_file_count(dir: &Path) -> usize {
        fs::read_dir(dir)
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_name().to_string_lossy().ends_with(".log"))
            .count()
    }

    #[test]
    fn test_write_appends_newline() {
        let dir = tempfile::tempdir().unwrap();
        let mut log = RotatingLog::open(dir.path()).unwrap();

        log.write_line("first").unwrap();
        log.write_line("second\n").unwrap();

        let content = fs::read_to_string(log.current_path()).unwrap();
        assert_eq!(content, "first\nsecond\n");
    }

    #[test]
    fn test_rotation_keeps_limit() {
        let dir = tempfile::tempdir().unwrap();
        let mut log = RotatingLog::with_limits(dir.path(), 16, 3).unwrap();

        for i in 0..10 {
            log.write_line(&format!("line number {} is long enough", i)).unwrap();
            // Rotated names carry milliseconds; keep them distinct
            std::thread::sleep(std::time::Duration::from_millis(2));
        }

        assert!(log_file_count(dir.path()) <= 3);
        assert!(log.current_path().exists());
    }

    #[test]
    fn test_day_change_switches_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut log = RotatingLog::with_limits(dir.path(), 1024, 5).unwrap();
        log.write_line("before midnight").unwrap();

        // Pretend the open file was created yesterday
        let yesterday = dir.path().join("nin_2000-01-01.log");
        fs::rename(log.current_path(), &yesterday).unwrap();
        log.path = yesterday.clone();

        for i in 0..50 {
            log.write_line(&format!("after midnight {}", i)).unwrap();
        }

        let today = current_log_path(dir.path());
        assert_eq!(log.current_path(), today);
        assert!(today.exists());
        assert_eq!(
            fs::read_to_string(&yesterday).unwrap(),
            "before midnight\n"
        );
        assert_eq!(recent_logs(dir.path(), 1).unwrap(), "after midnight 49");
        assert!(log_file_count(dir.path()) <= 5);
    }

    #[test]
    fn test_recent_logs_tail() {
        let dir = tempfile::tempdir().unwrap();
        let mut log = RotatingLog::open(dir.path()).unwrap();
        for i in 0..5 {
            log.write_line(&format!("entry {}", i)).unwrap();
        }

        assert_eq!(recent_logs(dir.path(), 2).unwrap(), "entry 3\nentry 4");
    }

    #[test]
    fn test_recent_logs_without_file() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(recent_logs(dir.path(), 10).unwrap(), "");
    }

    #[test]
    fn test_parse_level() {
        assert_eq!(parse_level("WARNING"), log::Level::Warn);
        assert_eq!(parse_level("error"), log::Level::Error);
        assert_eq!(parse_level("verbose"), log::Level::Info);
    }
}
