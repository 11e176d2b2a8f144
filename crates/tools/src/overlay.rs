use glam::Vec3;
use skyline_kernel::Player;

/// The debug text drawn in the corner of the screen.
///
/// Captures plain values so the overlay can be formatted or drawn by any UI
/// layer without holding a borrow on the player.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DebugOverlay {
    pub fps: f32,
    pub position: Vec3,
    pub front: Vec3,
    pub velocity: Vec3,
}

impl DebugOverlay {
    pub fn capture(player: &Player, fps: f32) -> Self {
        Self {
            fps,
            position: player.position(),
            front: player.front(),
            velocity: player.velocity(),
        }
    }

    /// One string per overlay line, top to bottom.
    pub fn lines(&self) -> [String; 4] {
        [
            format!("{} FPS", self.fps as i32),
            format!("Position {}", fmt_vec(self.position)),
            format!("Front {}", fmt_vec(self.front)),
            format!("Velocity {}", fmt_vec(self.velocity)),
        ]
    }
}

impl std::fmt::Display for DebugOverlay {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.lines().join("\n"))
    }
}

fn fmt_vec(v: Vec3) -> String {
    format!("<{:.2}, {:.2}, {:.2}>", v.x, v.y, v.z)
}

#[cfg(test)]
mod tests {
    use super::*;
    use skyline_common::SkylineConfig;

    #[test]
    fn overlay_lines_for_spawn() {
        let player = Player::from_config(&SkylineConfig::default());
        let overlay = DebugOverlay::capture(&player, 59.7);
        let lines = overlay.lines();
        assert_eq!(lines[0], "59 FPS");
        assert_eq!(lines[1], "Position <81.00, 66.00, -1800.00>");
        assert!(lines[2].starts_with("Front <"));
        assert!(lines[2].ends_with("0.00, 0.00, -1.00>"));
        assert_eq!(lines[3], "Velocity <0.00, 0.00, 0.00>");
    }

    #[test]
    fn display_joins_lines() {
        let player = Player::from_config(&SkylineConfig::default());
        let text = DebugOverlay::capture(&player, 120.0).to_string();
        assert_eq!(text.lines().count(), 4);
        assert!(text.starts_with("120 FPS"));
    }
}
