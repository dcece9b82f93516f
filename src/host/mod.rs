//! Desktop host glue.
//!
//! - `bridge`: Tauri events in both directions and the webview renderer
//! - `keyboard`: the polling worker that owns the `KeyDispatcher`
//! - `pointer`: `enigo` behind `PointerDriver`

pub mod bridge;
pub mod keyboard;
pub mod pointer;

use parking_lot::Mutex;

use crate::display::KeyPressedDisplay;

pub use bridge::{spawn_renderer, TauriEmitter, MODE_CHANGED_EVENT};
pub use keyboard::{HostRequest, KeyboardWorker};
pub use pointer::{EnigoPointer, UnavailablePointer};

/// Managed Tauri state.
pub struct HostState {
    pub keyboard: KeyboardWorker,
    display: Mutex<Option<KeyPressedDisplay>>,
}

impl HostState {
    pub fn new(keyboard: KeyboardWorker, display: KeyPressedDisplay) -> Self {
        Self {
            keyboard,
            display: Mutex::new(Some(display)),
        }
    }

    /// Unsubscribe and drop the display. Later calls do nothing.
    pub fn unmount_display(&self) {
        if let Some(display) = self.display.lock().take() {
            display.unmount();
            log::info!("[DISPLAY] Unmounted");
        }
    }
}
