//! Event-driven key-press display.
//!
//! - `channel`: the `EventChannel` seam and an in-process implementation
//! - `component`: the mount/unmount lifecycle and rendering

pub mod channel;
pub mod component;
#[cfg(test)]
pub(crate) mod local;

pub use channel::{EventChannel, EventHandler, ListenerId};
pub use component::{DisplayState, KeyPressedDisplay, KEY_PRESSED_EVENT};
