//! Host key names to core keys.
//!
//! The host reports keys by their `device_query` names ("LControl", "J",
//! "Down", ...). Only the first two keys of a chord are considered.

use super::core::Key;

/// Maximum number of host keys looked at per chord.
const MAX_CHORD_KEYS: usize = 2;

pub struct InputParser {
    names: Vec<String>,
}

impl InputParser {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            names: names
                .into_iter()
                .take(MAX_CHORD_KEYS)
                .map(|s| s.as_ref().to_string())
                .collect(),
        }
    }

    pub fn parse(&self) -> Vec<Key> {
        let mut keys = Vec::with_capacity(MAX_CHORD_KEYS * 2);

        for name in &self.names {
            match name.as_str() {
                "Space" => keys.push(Key::Space),
                "Escape" => keys.push(Key::Escape),
                "LControl" | "RControl" => keys.push(Key::Control),
                "J" => keys.push(Key::J),
                "K" => keys.push(Key::K),
                "H" => keys.push(Key::H),
                "L" => keys.push(Key::L),
                "I" => keys.push(Key::I),
                // Arrows behave like Control + the vi key
                "Down" => keys.extend([Key::Control, Key::J]),
                "Up" => keys.extend([Key::Control, Key::K]),
                "Left" => keys.extend([Key::Control, Key::H]),
                "Right" => keys.extend([Key::Control, Key::L]),
                _ => {}
            }
        }

        keys
    }
}

/// Text shown for a chord in `key-pressed` events, e.g. "LControl + Space".
pub fn chord_label<S: AsRef<str>>(names: &[S]) -> String {
    names
        .iter()
        .map(|s| s.as_ref())
        .collect::<Vec<_>>()
        .join(" + ")
}

/// Held keys between polls. A chord is reported only when a new key goes down,
/// so releasing part of a chord stays silent.
#[derive(Debug, Default)]
pub struct ChordTracker {
    held: Vec<String>,
}

impl ChordTracker {
    pub fn update<S: AsRef<str>>(&mut self, names: &[S]) -> Option<Vec<String>> {
        let current: Vec<String> = names.iter().map(|n| n.as_ref().to_string()).collect();
        let pressed = current.iter().any(|n| !self.held.contains(n));
        self.held = current;
        pressed.then(|| self.held.clone())
    }
}
