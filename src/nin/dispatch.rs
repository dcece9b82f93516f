//! Routes chords through the core and out to the host.

#[cfg(test)]
use mockall::automock;
use serde::{Deserialize, Serialize};

use super::core::{Action, Mode, NinCore};
use super::input::{chord_label, InputParser};
use crate::error::NinResult;

/// Outbound notifications to the webview.
#[cfg_attr(test, automock)]
pub trait HostEmitter: Send {
    /// A non-empty chord was pressed.
    fn key_pressed(&self, payload: String);
    /// The core switched modes.
    fn mode_changed(&self, mode: Mode);
}

/// Moves and clicks the system pointer.
#[cfg_attr(test, automock)]
pub trait PointerDriver {
    /// Move relative to the current position.
    fn move_by(&mut self, dx: i32, dy: i32) -> NinResult<()>;
    fn click(&mut self) -> NinResult<()>;
}

/// Direction requested by the webview buttons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub fn delta(&self, step: i32) -> (i32, i32) {
        match self {
            Direction::Up => (0, -step),
            Direction::Down => (0, step),
            Direction::Left => (-step, 0),
            Direction::Right => (step, 0),
        }
    }
}

pub struct KeyDispatcher {
    core: NinCore,
    emitter: Box<dyn HostEmitter>,
    pointer: Box<dyn PointerDriver>,
}

impl KeyDispatcher {
    pub fn new(
        core: NinCore,
        emitter: Box<dyn HostEmitter>,
        pointer: Box<dyn PointerDriver>,
    ) -> Self {
        Self {
            core,
            emitter,
            pointer,
        }
    }

    pub fn mode(&self) -> Mode {
        self.core.mode()
    }

    pub fn set_step(&mut self, step: i32) {
        self.core.set_step(step);
    }

    /// Handle one chord of host key names. Empty chords are ignored.
    pub fn dispatch<S: AsRef<str>>(&mut self, names: &[S]) -> NinResult<Action> {
        if names.is_empty() {
            return Ok(Action::None);
        }

        self.emitter.key_pressed(chord_label(names));

        let keys = InputParser::new(names).parse();
        let action = self.core.pass_keys(&keys);
        self.apply(action)?;

        Ok(action)
    }

    /// Move the pointer one step regardless of the current mode.
    pub fn move_cursor(&mut self, direction: Direction) -> NinResult<()> {
        let (dx, dy) = direction.delta(self.core.step());
        self.apply(Action::CursorMoved { dx, dy })
    }

    fn apply(&mut self, action: Action) -> NinResult<()> {
        match action {
            Action::ModeChanged(mode) => {
                log::info!("[NIN] mode -> {}", mode);
                self.emitter.mode_changed(mode);
            }
            Action::CursorMoved { dx, dy } => {
                log::debug!("[NIN] move cursor ({}, {})", dx, dy);
                self.pointer.move_by(dx, dy)?;
            }
            Action::Clicked => {
                log::debug!("[NIN] click");
                self.pointer.click()?;
            }
            Action::None => {}
        }
        Ok(())
    }
}
