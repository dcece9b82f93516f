//! Tauri side of the event seams.

use tauri::{AppHandle, Emitter, Listener, Manager};
use tokio::sync::watch;

use crate::display::{DisplayState, EventChannel, EventHandler, ListenerId};
use crate::error::NinResult;
use crate::nin::{HostEmitter, Mode};

pub const MODE_CHANGED_EVENT: &str = "changed_mode";

/// Webview element the display markup is written into.
const DISPLAY_ELEMENT_ID: &str = "display";

pub struct TauriEmitter {
    app: AppHandle,
}

impl TauriEmitter {
    pub fn new(app: AppHandle) -> Self {
        Self { app }
    }
}

impl HostEmitter for TauriEmitter {
    fn key_pressed(&self, payload: String) {
        if let Err(e) = self.app.emit(crate::display::KEY_PRESSED_EVENT, payload) {
            log::warn!("[NIN] Failed to emit key-pressed: {}", e);
        }
    }

    fn mode_changed(&self, mode: Mode) {
        if let Err(e) = self.app.emit(MODE_CHANGED_EVENT, mode.as_str()) {
            log::warn!("[NIN] Failed to emit {}: {}", MODE_CHANGED_EVENT, e);
        }
    }
}

/// Tauri registers listeners synchronously, so the returned future is already resolved.
impl EventChannel for AppHandle {
    fn listen(
        &self,
        event: &str,
        handler: EventHandler,
    ) -> futures::future::BoxFuture<'static, NinResult<ListenerId>> {
        let id = Listener::listen(self, event.to_string(), move |event: tauri::Event| {
            // Payloads arrive JSON-encoded
            let payload = serde_json::from_str::<String>(event.payload())
                .unwrap_or_else(|_| event.payload().to_string());
            handler(payload);
        });
        Box::pin(futures::future::ready(Ok(ListenerId(id))))
    }

    fn unlisten(&self, id: ListenerId) {
        Listener::unlisten(self, id.0);
    }
}

fn render_script(html: &str) -> NinResult<String> {
    Ok(format!(
        "(() => {{ const el = document.getElementById({}); if (el) el.innerHTML = {}; }})()",
        serde_json::to_string(DISPLAY_ELEMENT_ID)?,
        serde_json::to_string(html)?
    ))
}

/// Push every display state change into the main window until the display is dropped.
pub fn spawn_renderer(app: AppHandle, mut state: watch::Receiver<DisplayState>) {
    tauri::async_runtime::spawn(async move {
        loop {
            let html = state.borrow_and_update().render();
            match (render_script(&html), app.get_webview_window(crate::app::MAIN_WINDOW)) {
                (Ok(script), Some(window)) => {
                    if let Err(e) = window.eval(&script) {
                        log::warn!("[DISPLAY] Render failed: {}", e);
                    }
                },
                (Err(e), _) => log::warn!("[DISPLAY] Render failed: {}", e),
                (_, None) => {},
            }

            if state.changed().await.is_err() {
                break;
            }
        }
        log::debug!("[DISPLAY] Renderer stopped");
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_names_on_the_wire() {
        assert_eq!(MODE_CHANGED_EVENT, "changed_mode");
        assert_eq!(crate::display::KEY_PRESSED_EVENT, "key-pressed");
    }

    #[test]
    fn test_render_script_escapes_markup() {
        let script = render_script("<p>\"x\"</p>").unwrap();
        assert!(script.contains(r#"getElementById("display")"#));
        assert!(script.contains(r#"innerHTML = "<p>\"x\"</p>""#));
    }
}
