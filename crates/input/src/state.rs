// Per-frame input snapshot: held keys plus mouse/scroll deltas accumulated
// between frames. Fed by whichever windowing back end is in use.

use crate::action::{Action, KeyBindings};
use crate::key::Key;
use glam::Vec2;
use skyline_kernel::{ControlFrame, MoveIntent};
use std::collections::HashSet;

#[derive(Debug, Clone, Default)]
pub struct InputState {
    keys_held: HashSet<Key>,
    // Accumulated since the last end_frame()
    mouse_delta: Vec2,
    scroll_delta: f32,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn press(&mut self, key: Key) {
        self.keys_held.insert(key);
    }

    pub fn release(&mut self, key: Key) {
        self.keys_held.remove(&key);
    }

    /// Forget every held key, e.g. when the window loses focus.
    pub fn release_all(&mut self) {
        self.keys_held.clear();
    }

    pub fn is_pressed(&self, key: Key) -> bool {
        self.keys_held.contains(&key)
    }

    pub fn mouse_moved(&mut self, dx: f32, dy: f32) {
        self.mouse_delta += Vec2::new(dx, dy);
    }

    pub fn scrolled(&mut self, dy: f32) {
        self.scroll_delta += dy;
    }

    pub fn mouse_delta(&self) -> Vec2 {
        self.mouse_delta
    }

    pub fn scroll_delta(&self) -> f32 {
        self.scroll_delta
    }

    /// Whether any held key is bound to `action`.
    pub fn action_active(&self, bindings: &KeyBindings, action: Action) -> bool {
        self.keys_held
            .iter()
            .any(|k| bindings.action_for(*k) == Some(action))
    }

    /// Build this frame's controls from held keys and accumulated deltas.
    pub fn control_frame(&self, bindings: &KeyBindings) -> ControlFrame {
        ControlFrame {
            movement: MoveIntent {
                forward: self.action_active(bindings, Action::MoveForward),
                backward: self.action_active(bindings, Action::MoveBackward),
                left: self.action_active(bindings, Action::StrafeLeft),
                right: self.action_active(bindings, Action::StrafeRight),
            },
            brake: self.action_active(bindings, Action::Brake),
            look: self.mouse_delta,
            scroll: self.scroll_delta,
        }
    }

    /// Call once per frame after the controls were consumed.
    /// Resets the per-frame accumulators; held keys persist.
    pub fn end_frame(&mut self) {
        self.mouse_delta = Vec2::ZERO;
        self.scroll_delta = 0.0;
    }
}
