use glam::{Vec2, Vec3};

/// Which directional movement intents are held this frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MoveIntent {
    pub forward: bool,
    pub backward: bool,
    pub left: bool,
    pub right: bool,
}

impl MoveIntent {
    pub fn is_idle(&self) -> bool {
        !(self.forward || self.backward || self.left || self.right)
    }

    /// Sum of unit contributions along `front` and `right`. Opposing
    /// intents cancel.
    pub fn combine(&self, front: Vec3, right: Vec3) -> Vec3 {
        let front = front.normalize_or_zero();
        let right = right.normalize_or_zero();
        let mut dir = Vec3::ZERO;
        if self.forward {
            dir += front;
        }
        if self.backward {
            dir -= front;
        }
        if self.right {
            dir += right;
        }
        if self.left {
            dir -= right;
        }
        dir
    }
}

/// Braking parameters: the brake engages above `threshold` speed and never
/// exceeds `braking_constant * speed`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BrakeSettings {
    pub threshold: f32,
    pub braking_constant: f32,
}

impl Default for BrakeSettings {
    fn default() -> Self {
        Self {
            threshold: 1.0,
            braking_constant: 10.0,
        }
    }
}

/// Everything the player consumes from input in one frame.
///
/// Produced by the input layer; the kernel never sees raw key events.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ControlFrame {
    pub movement: MoveIntent,
    pub brake: bool,
    /// Raw mouse delta, scaled by the player's sensitivity when applied.
    pub look: Vec2,
    pub scroll: f32,
}

impl ControlFrame {
    pub fn is_idle(&self) -> bool {
        self.movement.is_idle() && !self.brake && self.look == Vec2::ZERO && self.scroll == 0.0
    }
}
