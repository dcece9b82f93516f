//! nin: a modal keyboard cursor host.
//!
//! - `nin`: the Idle/Cursor state machine and chord dispatch
//! - `display`: the key-press display component
//! - `scenario`: browser scenarios against the display window
//! - `config`, `error`, `logging`: ambient plumbing
//!
//! The Tauri shell (`app`, `commands`, `host`) is behind the `desktop` feature.

pub mod config;
pub mod display;
pub mod error;
pub mod logging;
pub mod nin;
pub mod scenario;

#[cfg(feature = "desktop")]
pub mod app;
#[cfg(feature = "desktop")]
pub mod commands;
#[cfg(feature = "desktop")]
pub mod host;

#[cfg(feature = "desktop")]
#[cfg_attr(mobile, tauri::mobile_entry_point)]
pub fn run() {
    app::run()
}
