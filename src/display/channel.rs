//! Named event channels the display listens on.

use std::sync::Arc;

use futures::future::BoxFuture;

use crate::error::NinResult;

/// Callback invoked with the payload of each delivered event.
pub type EventHandler = Arc<dyn Fn(String) + Send + Sync + 'static>;

/// Identifies one registered listener on a channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(pub u32);

/// A host-provided stream of named events.
///
/// `listen` may complete asynchronously; `unlisten` stops delivery to the
/// listener before it returns.
pub trait EventChannel: Send + Sync + 'static {
    fn listen(&self, event: &str, handler: EventHandler) -> BoxFuture<'static, NinResult<ListenerId>>;
    fn unlisten(&self, id: ListenerId);
}
