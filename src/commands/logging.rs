use tauri::{command, AppHandle, Manager};

use crate::error::{NinResult, ResultExt};
use crate::logging;

/// Default number of lines for `get_recent_logs`.
const DEFAULT_RECENT_LINES: usize = 100;

/// Write a log message from the frontend
#[command]
pub fn write_log(level: String, source: String, message: String) {
    logging::log_from_frontend(&level, &source, &message);
}

#[command]
pub fn get_log_dir(app: AppHandle) -> NinResult<String> {
    let log_dir = app
        .path()
        .app_log_dir()
        .context("failed to get log directory")?;
    Ok(log_dir.to_string_lossy().to_string())
}

/// Get recent logs (last N lines) for debugging
#[command]
pub fn get_recent_logs(app: AppHandle, lines: Option<usize>) -> NinResult<String> {
    let log_dir = app
        .path()
        .app_log_dir()
        .context("failed to get log directory")?;
    logging::recent_logs(&log_dir, lines.unwrap_or(DEFAULT_RECENT_LINES))
}
