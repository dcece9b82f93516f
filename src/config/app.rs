//! Desktop host configuration.
//!
//! Uses `parking_lot::RwLock` so the keyboard worker can read the poll
//! interval on every tick while the webview replaces the whole config in
//! one IPC call.

use lazy_static::lazy_static;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::nin::DEFAULT_CURSOR_STEP;

/// Polling interval for keyboard state (60Hz).
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 16;

lazy_static! {
    /// Global host configuration.
    pub static ref APP_CONFIG: RwLock<AppConfig> = RwLock::new(AppConfig::default());
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase", default)]
#[ts(export, export_to = "../ui/types/")]
pub struct AppConfig {
    /// How often the keyboard worker samples pressed keys.
    pub poll_interval_ms: u64,

    /// Pointer step in pixels for cursor-mode moves.
    pub cursor_step: i32,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
            cursor_step: DEFAULT_CURSOR_STEP,
        }
    }
}

impl AppConfig {
    /// Clamp values the worker cannot use.
    pub fn sanitized(mut self) -> Self {
        self.poll_interval_ms = self.poll_interval_ms.clamp(1, 1000);
        if self.cursor_step <= 0 {
            self.cursor_step = DEFAULT_CURSOR_STEP;
        }
        self
    }
}

// ============================================================================
// Getters (for internal Rust use)
// ============================================================================

pub fn poll_interval_ms() -> u64 {
    APP_CONFIG.read().poll_interval_ms
}

pub fn cursor_step() -> i32 {
    APP_CONFIG.read().cursor_step
}

/// Replace the whole configuration.
pub fn replace(config: AppConfig) {
    log::debug!("[APP_CONFIG] replace({:?})", config);
    *APP_CONFIG.write() = config.sanitized();
}
