use crate::control::{BrakeSettings, ControlFrame};
use crate::integrator::Integrator;
use crate::player::Player;
use skyline_common::SkylineConfig;

/// Outcome of one call to [`World::step`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    Advanced,
    /// The delta was negative or not finite; nothing changed.
    Skipped,
}

/// The simulation state owned by the frame loop.
///
/// All mutations flow through [`World::step`] (or an explicit teleport via
/// [`World::player_mut`]). Frame timing is supplied by the caller; the world
/// keeps no clock of its own beyond summing the deltas it was given.
#[derive(Debug, Clone)]
pub struct World {
    player: Player,
    integrator: Integrator,
    brake: BrakeSettings,
    gravity_enabled: bool,
    tick: u64,
    elapsed: f64,
}

impl World {
    /// Spawn the player and integrator described by a validated config.
    pub fn new(config: &SkylineConfig) -> Self {
        Self {
            player: Player::from_config(config),
            integrator: Integrator::new(&config.physics),
            brake: BrakeSettings {
                threshold: config.player.brake_threshold,
                braking_constant: config.player.braking_constant,
            },
            gravity_enabled: config.physics.gravity_enabled,
            tick: 0,
            elapsed: 0.0,
        }
    }

    /// Number of completed steps.
    pub fn tick(&self) -> u64 {
        self.tick
    }

    /// Sum of all accepted deltas, in seconds.
    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn player_mut(&mut self) -> &mut Player {
        &mut self.player
    }

    pub fn integrator(&self) -> &Integrator {
        &self.integrator
    }

    pub fn gravity_enabled(&self) -> bool {
        self.gravity_enabled
    }

    /// Apply one frame of controls and integrate the player by `dt` seconds.
    pub fn step(&mut self, controls: &ControlFrame, dt: f32) -> StepOutcome {
        if !dt.is_finite() || dt < 0.0 {
            tracing::warn!(dt, "rejecting frame delta");
            return StepOutcome::Skipped;
        }

        self.player
            .apply_controls(controls, dt, &self.brake, &self.integrator);
        if self.gravity_enabled {
            self.player.apply_force(self.integrator.gravity());
        }
        self.player.integrate(&self.integrator, dt);

        self.tick += 1;
        self.elapsed += f64::from(dt);
        StepOutcome::Advanced
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::control::MoveIntent;
    use glam::Vec3;

    fn forward() -> ControlFrame {
        ControlFrame {
            movement: MoveIntent {
                forward: true,
                ..MoveIntent::default()
            },
            ..ControlFrame::default()
        }
    }

    #[test]
    fn world_starts_at_spawn() {
        let w = World::new(&SkylineConfig::default());
        assert_eq!(w.tick(), 0);
        assert_eq!(w.elapsed(), 0.0);
        assert_eq!(w.player().position(), Vec3::new(81.0, 66.0, -1800.0));
    }

    #[test]
    fn idle_steps_keep_player_still() {
        let mut w = World::new(&SkylineConfig::default());
        let start = w.player().position();
        for _ in 0..10 {
            assert_eq!(w.step(&ControlFrame::default(), 0.016), StepOutcome::Advanced);
        }
        assert_eq!(w.tick(), 10);
        assert_eq!(w.player().position(), start);
    }

    #[test]
    fn forward_input_moves_along_front() {
        let mut w = World::new(&SkylineConfig::default());
        let start = w.player().position();
        for _ in 0..30 {
            w.step(&forward(), 1.0 / 60.0);
        }
        let moved = w.player().position() - start;
        assert!(moved.z < 0.0);
        assert_eq!(moved.y, 0.0);
        assert!(w.player().velocity().length() > 0.0);
    }

    #[test]
    fn braking_brings_player_to_rest() {
        let mut w = World::new(&SkylineConfig::default());
        for _ in 0..60 {
            w.step(&forward(), 1.0 / 60.0);
        }
        let brake = ControlFrame {
            brake: true,
            ..ControlFrame::default()
        };
        for _ in 0..600 {
            w.step(&brake, 1.0 / 60.0);
        }
        assert_eq!(w.player().velocity(), Vec3::ZERO);
    }

    #[test]
    fn stalled_brake_frame_does_not_reverse() {
        let mut w = World::new(&SkylineConfig::default());
        for _ in 0..60 {
            w.step(&forward(), 1.0 / 60.0);
        }
        let before = w.player().velocity();
        assert!(before.length() > 10.0);
        let brake = ControlFrame {
            brake: true,
            ..ControlFrame::default()
        };
        // The clamped maximum frame delta, where the brake cap equals |v| / dt.
        w.step(&brake, 0.1);
        assert!(w.player().velocity().dot(before) >= 0.0);
    }

    #[test]
    fn invalid_dt_is_skipped() {
        let mut w = World::new(&SkylineConfig::default());
        assert_eq!(w.step(&forward(), -0.1), StepOutcome::Skipped);
        assert_eq!(w.step(&forward(), f32::NAN), StepOutcome::Skipped);
        assert_eq!(w.tick(), 0);
        assert_eq!(w.player().body().force(), Vec3::ZERO);
    }

    #[test]
    fn gravity_only_when_enabled() {
        let mut off = World::new(&SkylineConfig::default());
        off.step(&ControlFrame::default(), 0.5);
        assert_eq!(off.player().velocity(), Vec3::ZERO);

        let mut config = SkylineConfig::default();
        config.physics.gravity_enabled = true;
        let mut on = World::new(&config);
        for _ in 0..5 {
            on.step(&ControlFrame::default(), 0.5);
        }
        assert!(on.player().velocity().y < 0.0);
        assert!(on.player().position().y < 66.0);
    }

    #[test]
    fn identical_inputs_give_identical_state() {
        let mut a = World::new(&SkylineConfig::default());
        let mut b = World::new(&SkylineConfig::default());
        let mut controls = forward();
        controls.look = glam::Vec2::new(3.0, -1.0);
        for _ in 0..120 {
            a.step(&controls, 1.0 / 60.0);
            b.step(&controls, 1.0 / 60.0);
        }
        assert_eq!(a.player(), b.player());
        assert_eq!(a.tick(), b.tick());
    }
}
