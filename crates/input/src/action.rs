use crate::key::{InputError, Key};
use skyline_common::BindingsConfig;
use std::collections::BTreeMap;

/// A high-level control action a key can be bound to.
///
/// The kernel consumes the [`ControlFrame`](skyline_kernel::ControlFrame)
/// built from these, never raw key events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Action {
    MoveForward,
    MoveBackward,
    StrafeLeft,
    StrafeRight,
    /// Decelerate toward rest.
    Brake,
}

/// Maps keys to actions. Each key drives at most one action and each action
/// has at most one key.
#[derive(Debug, Clone, PartialEq)]
pub struct KeyBindings {
    key_to_action: BTreeMap<Key, Action>,
}

impl Default for KeyBindings {
    fn default() -> Self {
        let mut bindings = Self {
            key_to_action: BTreeMap::new(),
        };
        bindings.bind(Key::W, Action::MoveForward);
        bindings.bind(Key::S, Action::MoveBackward);
        bindings.bind(Key::A, Action::StrafeLeft);
        bindings.bind(Key::D, Action::StrafeRight);
        bindings.bind(Key::LeftShift, Action::Brake);
        bindings
    }
}

impl KeyBindings {
    /// Resolve the key names of a bindings config section. Each action needs
    /// its own key.
    pub fn from_config(config: &BindingsConfig) -> Result<Self, InputError> {
        let mut bindings = Self {
            key_to_action: BTreeMap::new(),
        };
        let pairs = [
            (&config.forward, Action::MoveForward),
            (&config.backward, Action::MoveBackward),
            (&config.left, Action::StrafeLeft),
            (&config.right, Action::StrafeRight),
            (&config.brake, Action::Brake),
        ];
        for (name, action) in pairs {
            let key = Key::from_name(name)?;
            if let Some(first) = bindings.action_for(key) {
                return Err(InputError::DuplicateKey {
                    key,
                    first,
                    second: action,
                });
            }
            bindings.bind(key, action);
        }
        Ok(bindings)
    }

    /// Bind `key` to `action`, replacing any previous binding of either.
    pub fn bind(&mut self, key: Key, action: Action) {
        self.key_to_action.retain(|_, a| *a != action);
        if let Some(old) = self.key_to_action.insert(key, action) {
            if old != action {
                tracing::debug!("key {key} rebound from {old:?} to {action:?}");
            }
        }
    }

    pub fn action_for(&self, key: Key) -> Option<Action> {
        self.key_to_action.get(&key).copied()
    }

    pub fn key_for(&self, action: Action) -> Option<Key> {
        self.key_to_action
            .iter()
            .find(|(_, a)| **a == action)
            .map(|(k, _)| *k)
    }
}
