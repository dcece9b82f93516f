//! Tauri application wiring.

pub mod events;

use std::sync::Arc;

use tauri::{AppHandle, Manager};

use crate::commands;
use crate::display::{EventChannel, KeyPressedDisplay};
use crate::error::{NinResult, ResultExt};
use crate::host::{self, HostState, KeyboardWorker, TauriEmitter};
use crate::logging;

/// Label of the window that hosts the key-press display.
pub const MAIN_WINDOW: &str = "main";

pub fn run() {
    tauri::Builder::default()
        .plugin(tauri_plugin_opener::init())
        .on_window_event(events::handle_window_event)
        .invoke_handler(tauri::generate_handler![
            // Pointer commands
            commands::cursor::move_cursor,
            // Settings commands
            commands::settings::get_app_config,
            commands::settings::set_app_config,
            // Logging commands
            commands::logging::write_log,
            commands::logging::get_log_dir,
            commands::logging::get_recent_logs,
        ])
        .setup(|app| {
            setup(app.handle())?;
            Ok(())
        })
        .run(tauri::generate_context!())
        .expect("error while running tauri application");
}

fn setup(app: &AppHandle) -> NinResult<()> {
    let log_dir = app
        .path()
        .app_log_dir()
        .context("failed to get log directory")?;
    if let Err(e) = logging::init_file_logging(&log_dir) {
        eprintln!("Failed to initialize logging: {}", e);
    }

    let keyboard = KeyboardWorker::spawn(Box::new(TauriEmitter::new(app.clone())))?;

    // Mount inside the Tauri runtime so setup completes on it
    let channel: Arc<dyn EventChannel> = Arc::new(app.clone());
    let display = tauri::async_runtime::block_on(async move { KeyPressedDisplay::mount(channel) });
    host::spawn_renderer(app.clone(), display.watch());

    app.manage(HostState::new(keyboard, display));
    log::info!("[APP] Ready");
    Ok(())
}
