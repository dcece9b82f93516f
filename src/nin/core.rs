//! Modal key state machine.
//!
//! The core has two modes. Idle ignores everything except the
//! `Control + Space` chord that enters cursor mode; cursor mode maps single
//! keys to pointer moves and clicks until `Escape` returns to idle.

use serde::{Deserialize, Serialize};

/// Default pointer step in pixels.
pub const DEFAULT_CURSOR_STEP: i32 = 10;

/// Keys the core understands. Ordering is used to compare chords.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Key {
    Control,
    Space,
    Escape,
    J,
    K,
    H,
    L,
    I,
}

/// Current input mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Mode {
    #[default]
    Idle,
    Cursor,
}

impl Mode {
    /// Name sent to the webview in `changed_mode` events.
    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Idle => "Idle",
            Mode::Cursor => "Cursor",
        }
    }

    /// Interpret a chord in this mode. The chord is order-insensitive.
    pub fn interpret(&self, keys: &[Key], step: i32) -> Action {
        let mut chord = keys.to_vec();
        chord.sort();
        chord.dedup();

        match self {
            Mode::Idle => match chord.as_slice() {
                [Key::Control, Key::Space] => Action::ModeChanged(Mode::Cursor),
                _ => Action::None,
            },
            Mode::Cursor => match chord.as_slice() {
                [Key::J] => Action::CursorMoved { dx: 0, dy: step },
                [Key::K] => Action::CursorMoved { dx: 0, dy: -step },
                [Key::H] => Action::CursorMoved { dx: -step, dy: 0 },
                [Key::L] => Action::CursorMoved { dx: step, dy: 0 },
                [Key::I] => Action::Clicked,
                [Key::Escape] => Action::ModeChanged(Mode::Idle),
                _ => Action::None,
            },
        }
    }
}

impl std::fmt::Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a chord asks the host to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    None,
    ModeChanged(Mode),
    CursorMoved { dx: i32, dy: i32 },
    Clicked,
}

/// Holds the current mode and applies mode changes.
#[derive(Debug)]
pub struct NinCore {
    mode: Mode,
    step: i32,
}

impl NinCore {
    pub fn new() -> Self {
        Self::with_step(DEFAULT_CURSOR_STEP)
    }

    pub fn with_step(step: i32) -> Self {
        Self {
            mode: Mode::Idle,
            step,
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn is_idle(&self) -> bool {
        self.mode == Mode::Idle
    }

    pub fn step(&self) -> i32 {
        self.step
    }

    pub fn set_step(&mut self, step: i32) {
        self.step = step;
    }

    /// Feed a chord and return the resulting action.
    pub fn pass_keys(&mut self, keys: &[Key]) -> Action {
        let action = self.mode.interpret(keys, self.step);
        if let Action::ModeChanged(mode) = action {
            self.mode = mode;
        }
        action
    }
}

impl Default for NinCore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn cursor_mode_core() -> NinCore {
        let mut core = NinCore::new();
        core.pass_keys(&[Key::Space, Key::Control]);
        core
    }

    #[rstest]
    #[case::enter_cursor_mode(vec![Key::Space, Key::Control], Action::ModeChanged(Mode::Cursor))]
    #[case::order_does_not_matter(vec![Key::Control, Key::Space], Action::ModeChanged(Mode::Cursor))]
    #[case::single_key_ignored(vec![Key::J], Action::None)]
    #[case::escape_ignored(vec![Key::Escape], Action::None)]
    fn test_idle_mode(#[case] input: Vec<Key>, #[case] expected: Action) {
        assert_eq!(Mode::Idle.interpret(&input, DEFAULT_CURSOR_STEP), expected);
    }

    #[rstest]
    #[case::down(vec![Key::J], Action::CursorMoved { dx: 0, dy: 10 })]
    #[case::up(vec![Key::K], Action::CursorMoved { dx: 0, dy: -10 })]
    #[case::left(vec![Key::H], Action::CursorMoved { dx: -10, dy: 0 })]
    #[case::right(vec![Key::L], Action::CursorMoved { dx: 10, dy: 0 })]
    #[case::click(vec![Key::I], Action::Clicked)]
    #[case::back_to_idle(vec![Key::Escape], Action::ModeChanged(Mode::Idle))]
    #[case::space_ignored(vec![Key::Space], Action::None)]
    #[case::two_moves_ignored(vec![Key::J, Key::K], Action::None)]
    fn test_cursor_mode(#[case] input: Vec<Key>, #[case] expected: Action) {
        assert_eq!(Mode::Cursor.interpret(&input, DEFAULT_CURSOR_STEP), expected);
    }

    #[test]
    fn test_starts_idle() {
        assert!(NinCore::new().is_idle());
    }

    #[test]
    fn test_idle_move_does_nothing() {
        let mut core = NinCore::new();
        assert_eq!(core.pass_keys(&[Key::J]), Action::None);
        assert!(core.is_idle());
    }

    #[test]
    fn test_escape_returns_to_idle() {
        let mut core = cursor_mode_core();
        assert_eq!(core.mode(), Mode::Cursor);

        assert_eq!(core.pass_keys(&[Key::Escape]), Action::ModeChanged(Mode::Idle));
        assert!(core.is_idle());
    }

    #[test]
    fn test_custom_step() {
        let mut core = cursor_mode_core();
        core.set_step(25);
        assert_eq!(
            core.pass_keys(&[Key::K]),
            Action::CursorMoved { dx: 0, dy: -25 }
        );
    }
}
