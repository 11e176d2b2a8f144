use crate::action::Action;
use std::fmt;

/// Errors from resolving key bindings.
#[derive(Debug, thiserror::Error)]
pub enum InputError {
    #[error("unknown key name: {0:?}")]
    UnknownKey(String),
    #[error("key {key} is bound to both {first:?} and {second:?}")]
    DuplicateKey {
        key: Key,
        first: Action,
        second: Action,
    },
}

/// Physical keys the controls can be bound to, independent of the windowing
/// back end. The desktop app translates its native key codes into these.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Key {
    W,
    A,
    S,
    D,
    Q,
    E,
    R,
    F,
    Z,
    X,
    C,
    Space,
    LeftShift,
    RightShift,
    LeftControl,
    RightControl,
    Up,
    Down,
    Left,
    Right,
    Tab,
    Escape,
    F1,
}

const KEY_NAMES: &[(Key, &str)] = &[
    (Key::W, "W"),
    (Key::A, "A"),
    (Key::S, "S"),
    (Key::D, "D"),
    (Key::Q, "Q"),
    (Key::E, "E"),
    (Key::R, "R"),
    (Key::F, "F"),
    (Key::Z, "Z"),
    (Key::X, "X"),
    (Key::C, "C"),
    (Key::Space, "Space"),
    (Key::LeftShift, "LeftShift"),
    (Key::RightShift, "RightShift"),
    (Key::LeftControl, "LeftControl"),
    (Key::RightControl, "RightControl"),
    (Key::Up, "Up"),
    (Key::Down, "Down"),
    (Key::Left, "Left"),
    (Key::Right, "Right"),
    (Key::Tab, "Tab"),
    (Key::Escape, "Escape"),
    (Key::F1, "F1"),
];

impl Key {
    /// Resolve a key name as written in config files. Case-insensitive.
    pub fn from_name(name: &str) -> Result<Self, InputError> {
        let trimmed = name.trim();
        KEY_NAMES
            .iter()
            .find(|(_, n)| n.eq_ignore_ascii_case(trimmed))
            .map(|(k, _)| *k)
            .ok_or_else(|| InputError::UnknownKey(name.to_string()))
    }

    pub fn name(self) -> &'static str {
        KEY_NAMES
            .iter()
            .find(|(k, _)| *k == self)
            .map(|(_, n)| *n)
            .unwrap_or("?")
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_resolve_case_insensitively() {
        assert_eq!(Key::from_name("w").unwrap(), Key::W);
        assert_eq!(Key::from_name(" leftshift ").unwrap(), Key::LeftShift);
        assert_eq!(Key::from_name("F1").unwrap(), Key::F1);
    }

    #[test]
    fn unknown_name_is_error() {
        let err = Key::from_name("Hyper").unwrap_err();
        assert!(err.to_string().contains("Hyper"));
    }

    #[test]
    fn every_key_has_a_name_that_roundtrips() {
        for (key, name) in KEY_NAMES {
            assert_eq!(key.name(), *name);
            assert_eq!(Key::from_name(name).unwrap(), *key);
        }
    }
}
