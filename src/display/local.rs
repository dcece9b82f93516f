//! In-process `EventChannel` for exercising the display without a host.

use futures::future::BoxFuture;
use parking_lot::Mutex;

use super::channel::{EventChannel, EventHandler, ListenerId};
use crate::error::{NinError, NinResult};

struct LocalListener {
    id: ListenerId,
    event: String,
    handler: EventHandler,
}

struct LocalInner {
    next_id: u32,
    available: bool,
    listeners: Vec<LocalListener>,
}

/// In-process channel. Delivery is synchronous and in registration order.
pub struct LocalChannel {
    inner: Mutex<LocalInner>,
}

impl LocalChannel {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(LocalInner {
                next_id: 1,
                available: true,
                listeners: Vec::new(),
            }),
        }
    }

    /// When unavailable, new `listen` calls fail. Existing listeners stay.
    pub fn set_available(&self, available: bool) {
        self.inner.lock().available = available;
    }

    pub fn listener_count(&self, event: &str) -> usize {
        self.inner
            .lock()
            .listeners
            .iter()
            .filter(|l| l.event == event)
            .count()
    }

    /// Deliver `payload` to every listener of `event`. Returns how many were called.
    pub fn emit(&self, event: &str, payload: impl Into<String>) -> usize {
        let payload = payload.into();

        // Handlers run without the lock so they may unlisten
        let handlers: Vec<EventHandler> = self
            .inner
            .lock()
            .listeners
            .iter()
            .filter(|l| l.event == event)
            .map(|l| l.handler.clone())
            .collect();

        for handler in &handlers {
            handler(payload.clone());
        }

        handlers.len()
    }
}

impl Default for LocalChannel {
    fn default() -> Self {
        Self::new()
    }
}

impl EventChannel for LocalChannel {
    fn listen(&self, event: &str, handler: EventHandler) -> BoxFuture<'static, NinResult<ListenerId>> {
        let result = {
            let mut inner = self.inner.lock();
            if inner.available {
                let id = ListenerId(inner.next_id);
                inner.next_id += 1;
                inner.listeners.push(LocalListener {
                    id,
                    event: event.to_string(),
                    handler,
                });
                Ok(id)
            } else {
                Err(NinError::SubscriptionUnavailable(format!(
                    "local channel closed for '{}'",
                    event
                )))
            }
        };

        Box::pin(async move { result })
    }

    fn unlisten(&self, id: ListenerId) {
        self.inner.lock().listeners.retain(|l| l.id != id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[tokio::test]
    async fn test_emit_reaches_only_matching_event() {
        let channel = LocalChannel::new();
        let hits = Arc::new(AtomicUsize::new(0));
        let counter = hits.clone();

        channel
            .listen(
                "key-pressed",
                Arc::new(move |_| {
                    counter.fetch_add(1, Ordering::SeqCst);
                }),
            )
            .await
            .unwrap();

        assert_eq!(channel.emit("key-pressed", "J"), 1);
        assert_eq!(channel.emit("changed_mode", "Cursor"), 0);
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_unlisten_stops_delivery() {
        let channel = LocalChannel::new();
        let id = channel
            .listen("key-pressed", Arc::new(|_| {}))
            .await
            .unwrap();
        assert_eq!(channel.listener_count("key-pressed"), 1);

        channel.unlisten(id);
        assert_eq!(channel.listener_count("key-pressed"), 0);
        assert_eq!(channel.emit("key-pressed", "J"), 0);

        // Unknown ids are ignored
        channel.unlisten(id);
    }

    #[tokio::test]
    async fn test_unavailable_channel_rejects_listen() {
        let channel = LocalChannel::new();
        channel.set_available(false);

        let err = channel
            .listen("key-pressed", Arc::new(|_| {}))
            .await
            .unwrap_err();
        assert!(matches!(err, NinError::SubscriptionUnavailable(_)));
    }
}
