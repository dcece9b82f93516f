//! Key-press display component.
//!
//! Mounting spawns the subscription setup and returns immediately, so the
//! first render always shows the empty slot. Each delivered payload replaces
//! the stored message and wakes render watchers. Unmounting (or dropping)
//! releases the listener, including when setup has not finished yet.

use std::sync::Arc;

use parking_lot::Mutex;
use tokio::runtime::Handle;
use tokio::sync::watch;

use super::channel::{EventChannel, EventHandler, ListenerId};
use crate::error::NinError;

/// Event the host emits for every chord.
pub const KEY_PRESSED_EVENT: &str = "key-pressed";

/// What the component shows.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DisplayState {
    pub current_message: Option<String>,
}

impl DisplayState {
    /// HTML for the display container. The message slot is empty when absent.
    pub fn render(&self) -> String {
        match &self.current_message {
            Some(message) => format!(
                "<main class=\"container\"><p>{}</p></main>",
                escape_html(message)
            ),
            None => "<main class=\"container\"></main>".to_string(),
        }
    }
}

#[derive(Debug, Default)]
struct Lifecycle {
    disposed: bool,
    listener: Option<ListenerId>,
}

pub struct KeyPressedDisplay {
    channel: Arc<dyn EventChannel>,
    lifecycle: Arc<Mutex<Lifecycle>>,
    state: Arc<watch::Sender<DisplayState>>,
}

impl KeyPressedDisplay {
    /// Mount on the ambient tokio runtime. Without one the component never subscribes.
    pub fn mount(channel: Arc<dyn EventChannel>) -> Self {
        match Handle::try_current() {
            Ok(runtime) => Self::mount_on(&runtime, channel),
            Err(e) => {
                log::warn!(
                    "[DISPLAY] {}",
                    NinError::SubscriptionUnavailable(format!("no async runtime: {}", e))
                );
                Self::unsubscribed(channel)
            }
        }
    }

    pub fn mount_on(runtime: &Handle, channel: Arc<dyn EventChannel>) -> Self {
        let display = Self::unsubscribed(channel);

        let handler: EventHandler = {
            let lifecycle = display.lifecycle.clone();
            let state = display.state.clone();
            Arc::new(move |payload: String| {
                // Held while writing so unmount cannot interleave
                let lifecycle = lifecycle.lock();
                if lifecycle.disposed {
                    return;
                }
                state.send_replace(DisplayState {
                    current_message: Some(payload),
                });
            })
        };

        let channel = display.channel.clone();
        let lifecycle = display.lifecycle.clone();
        runtime.spawn(async move {
            match channel.listen(KEY_PRESSED_EVENT, handler).await {
                Ok(id) => {
                    let mut guard = lifecycle.lock();
                    if guard.disposed {
                        drop(guard);
                        log::debug!("[DISPLAY] unmounted before setup finished, releasing {:?}", id);
                        channel.unlisten(id);
                    } else {
                        guard.listener = Some(id);
                        log::debug!("[DISPLAY] listening on '{}' as {:?}", KEY_PRESSED_EVENT, id);
                    }
                }
                Err(e) => {
                    log::warn!("[DISPLAY] {}", e);
                }
            }
        });

        display
    }

    fn unsubscribed(channel: Arc<dyn EventChannel>) -> Self {
        let (state, _) = watch::channel(DisplayState::default());
        Self {
            channel,
            lifecycle: Arc::new(Mutex::new(Lifecycle::default())),
            state: Arc::new(state),
        }
    }

    pub fn current_message(&self) -> Option<String> {
        self.state.borrow().current_message.clone()
    }

    pub fn render(&self) -> String {
        self.state.borrow().render()
    }

    /// Receiver that is marked changed on every delivered event.
    pub fn watch(&self) -> watch::Receiver<DisplayState> {
        self.state.subscribe()
    }

    /// True once setup finished and until unmount.
    pub fn is_subscribed(&self) -> bool {
        self.lifecycle.lock().listener.is_some()
    }

    /// Release the subscription. Idempotent; no state changes after it returns.
    pub fn unmount(&self) {
        let listener = {
            let mut lifecycle = self.lifecycle.lock();
            if lifecycle.disposed {
                return;
            }
            lifecycle.disposed = true;
            lifecycle.listener.take()
        };

        if let Some(id) = listener {
            self.channel.unlisten(id);
            log::debug!("[DISPLAY] released {:?}", id);
        }
    }
}

impl Drop for KeyPressedDisplay {
    fn drop(&mut self) {
        self.unmount();
    }
}

fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::display::local::LocalChannel;

    async fn settle() {
        for _ in 0..10 {
            tokio::task::yield_now().await;
        }
    }

    fn mount_local() -> (Arc<LocalChannel>, KeyPressedDisplay) {
        let channel = Arc::new(LocalChannel::new());
        let display = KeyPressedDisplay::mount(channel.clone());
        (channel, display)
    }

    #[tokio::test]
    async fn test_last_write_wins() {
        let (channel, display) = mount_local();
        settle().await;
        assert!(display.is_subscribed());

        for payload in ["LControl + Space", "J", "K"] {
            channel.emit(KEY_PRESSED_EVENT, payload);
        }

        assert_eq!(display.current_message().as_deref(), Some("K"));
        assert_eq!(display.render(), "<main class=\"container\"><p>K</p></main>");
    }

    #[tokio::test]
    async fn test_initial_render_is_empty() {
        let (_channel, display) = mount_local();
        assert_eq!(display.current_message(), None);
        assert_eq!(display.render(), "<main class=\"container\"></main>");

        settle().await;
        assert_eq!(display.render(), "<main class=\"container\"></main>");
    }

    #[tokio::test]
    async fn test_unmount_before_setup_resolves() {
        let (channel, display) = mount_local();
        display.unmount();
        settle().await;

        assert!(!display.is_subscribed());
        assert_eq!(channel.listener_count(KEY_PRESSED_EVENT), 0);
        assert_eq!(channel.emit(KEY_PRESSED_EVENT, "J"), 0);
        assert_eq!(display.current_message(), None);
    }

    #[tokio::test]
    async fn test_unmount_after_event_freezes_state() {
        let (channel, display) = mount_local();
        settle().await;

        channel.emit(KEY_PRESSED_EVENT, "J");
        display.unmount();
        display.unmount();

        channel.emit(KEY_PRESSED_EVENT, "K");
        assert_eq!(display.current_message().as_deref(), Some("J"));
        assert_eq!(channel.listener_count(KEY_PRESSED_EVENT), 0);
    }

    #[tokio::test]
    async fn test_unavailable_channel_degrades_to_absent() {
        let channel = Arc::new(LocalChannel::new());
        channel.set_available(false);
        let display = KeyPressedDisplay::mount(channel.clone());
        settle().await;

        channel.set_available(true);
        channel.emit(KEY_PRESSED_EVENT, "J");
        assert!(!display.is_subscribed());
        assert_eq!(display.current_message(), None);
    }

    #[test]
    fn test_mount_without_runtime_degrades() {
        let channel = Arc::new(LocalChannel::new());
        let display = KeyPressedDisplay::mount(channel.clone());

        assert_eq!(channel.listener_count(KEY_PRESSED_EVENT), 0);
        assert_eq!(display.current_message(), None);
        display.unmount();
    }

    #[tokio::test]
    async fn test_drop_releases_listener() {
        let (channel, display) = mount_local();
        settle().await;
        assert_eq!(channel.listener_count(KEY_PRESSED_EVENT), 1);

        drop(display);
        assert_eq!(channel.listener_count(KEY_PRESSED_EVENT), 0);
    }

    #[tokio::test]
    async fn test_watch_sees_latest_payload() {
        let (channel, display) = mount_local();
        let mut rx = display.watch();
        settle().await;

        channel.emit(KEY_PRESSED_EVENT, "H");
        channel.emit(KEY_PRESSED_EVENT, "L");

        rx.changed().await.unwrap();
        assert_eq!(rx.borrow_and_update().current_message.as_deref(), Some("L"));
    }

    #[test]
    fn test_render_escapes_markup() {
        let state = DisplayState {
            current_message: Some("<b>&</b>".to_string()),
        };
        assert_eq!(
            state.render(),
            "<main class=\"container\"><p>&lt;b&gt;&amp;&lt;/b&gt;</p></main>"
        );
    }
}
