//! Tauri IPC commands.

pub mod cursor;
pub mod logging;
pub mod settings;
