//! Window event handlers.

use tauri::{Manager, Window, WindowEvent};

use super::MAIN_WINDOW;
use crate::host::HostState;

/// `on_window_event` hook. Only the main window owns host resources.
pub fn handle_window_event(window: &Window, event: &WindowEvent) {
    if window.label() != MAIN_WINDOW {
        return;
    }

    match event {
        // The display goes away with its window
        WindowEvent::CloseRequested { .. } => {
            if let Some(host) = window.try_state::<HostState>() {
                host.unmount_display();
            }
        },

        WindowEvent::Destroyed => {
            if let Some(host) = window.try_state::<HostState>() {
                host.unmount_display();
                host.keyboard.shutdown();
            }
        },

        _ => {},
    }
}
