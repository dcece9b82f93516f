//! Modal keyboard control.
//!
//! - `core`: the Idle/Cursor mode state machine
//! - `input`: host key names to core keys
//! - `dispatch`: routes chords to the emitter and the pointer driver

pub mod core;
pub mod dispatch;
pub mod input;

pub use self::core::{Action, Key, Mode, NinCore, DEFAULT_CURSOR_STEP};
pub use dispatch::{Direction, HostEmitter, KeyDispatcher, PointerDriver};
pub use input::{chord_label, ChordTracker, InputParser};
