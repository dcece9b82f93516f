use tauri::command;

use crate::config::app::{self, AppConfig, APP_CONFIG};

#[command]
pub fn get_app_config() -> AppConfig {
    APP_CONFIG.read().clone()
}

/// Replace the host configuration. The keyboard worker picks it up on its next tick.
#[command]
pub fn set_app_config(config: AppConfig) {
    app::replace(config);
}
