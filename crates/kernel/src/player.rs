use crate::camera::FlyCamera;
use crate::control::{BrakeSettings, ControlFrame, MoveIntent};
use crate::integrator::Integrator;
use crate::particle::Particle;
use glam::{Mat4, Vec3};
use skyline_common::SkylineConfig;

/// Per-session input scaling.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlayerPreferences {
    /// Mouse delta to degrees.
    pub sensitivity: f32,
    /// Movement intent to force.
    pub command_magnitude: f32,
}

impl Default for PlayerPreferences {
    fn default() -> Self {
        Self {
            sensitivity: 0.1,
            command_magnitude: 500.0,
        }
    }
}

/// The player: a kinematic body plus the camera it looks through.
///
/// Position changes always go through [`Player::set_position`] or
/// [`Player::integrate`], both of which keep the camera at the body.
#[derive(Debug, Clone, PartialEq)]
pub struct Player {
    body: Particle,
    camera: FlyCamera,
    preferences: PlayerPreferences,
}

impl Player {
    /// Spawn at `position` with the default orientation.
    pub fn new(position: Vec3, drag: f32, mass: f32, preferences: PlayerPreferences) -> Self {
        let mut camera = FlyCamera::default();
        camera.set_position(position);
        Self {
            body: Particle::new(position, drag, mass),
            camera,
            preferences,
        }
    }

    /// Build the spawn state described by a validated config.
    pub fn from_config(config: &SkylineConfig) -> Self {
        let p = &config.player;
        let c = &config.camera;
        Self {
            body: Particle::new(p.spawn, p.drag, p.mass),
            camera: FlyCamera::new(p.spawn, c.yaw, c.pitch, c.zoom),
            preferences: PlayerPreferences {
                sensitivity: p.sensitivity,
                command_magnitude: p.command_magnitude,
            },
        }
    }

    pub fn body(&self) -> &Particle {
        &self.body
    }

    pub fn camera(&self) -> &FlyCamera {
        &self.camera
    }

    pub fn preferences(&self) -> PlayerPreferences {
        self.preferences
    }

    pub fn position(&self) -> Vec3 {
        self.body.position()
    }

    pub fn velocity(&self) -> Vec3 {
        self.body.velocity()
    }

    pub fn front(&self) -> Vec3 {
        self.camera.front()
    }

    pub fn right(&self) -> Vec3 {
        self.camera.right()
    }

    pub fn zoom(&self) -> f32 {
        self.camera.zoom()
    }

    pub fn view_matrix(&self) -> Mat4 {
        self.camera.view_matrix()
    }

    /// Teleport the body and the camera together.
    pub fn set_position(&mut self, position: Vec3) {
        self.body.set_position(position);
        self.camera.set_position(position);
    }

    pub fn apply_force(&mut self, f: Vec3) {
        self.body.apply_force(f);
    }

    /// Push along the held directions on the horizontal plane.
    ///
    /// The combined direction is normalized and scaled by the command
    /// magnitude before its vertical component is dropped. Returns the force
    /// applied, or `None` when no direction is held or the intents cancel.
    pub fn command_move(&mut self, intent: MoveIntent) -> Option<Vec3> {
        if intent.is_idle() {
            return None;
        }
        let dir = intent
            .combine(self.camera.front(), self.camera.right())
            .try_normalize()?;
        let scaled = self.preferences.command_magnitude * dir;
        let force = Vec3::new(scaled.x, 0.0, scaled.z);
        self.body.apply_force(force);
        Some(force)
    }

    /// Apply a force opposing velocity that brings the body to rest within
    /// `dt` if the braking limit allows it.
    ///
    /// The requested force is `|v| / dt`, capped at `braking_constant * |v|`.
    /// It is further capped so that, together with the drag `integrator`
    /// will add on its next step, the body decelerates at most to rest and
    /// never reverses. Does nothing at or below the brake threshold or for a
    /// non-positive `dt`. Returns the force applied.
    pub fn brake(
        &mut self,
        dt: f32,
        settings: &BrakeSettings,
        integrator: &Integrator,
    ) -> Option<Vec3> {
        let velocity = self.body.velocity();
        let speed = velocity.length();
        if speed <= settings.threshold || dt <= 0.0 {
            return None;
        }
        let direction = velocity / speed;
        let stopping = speed / dt;
        let limit = settings.braking_constant * speed;
        let drag = integrator.drag_force(&self.body).length();
        let headroom = (self.body.mass() * speed / dt - drag).max(0.0);
        let force = -stopping.min(limit).min(headroom) * direction;
        self.body.apply_force(force);
        Some(force)
    }

    /// Turn by a raw mouse delta scaled by sensitivity.
    pub fn look(&mut self, dx: f32, dy: f32) {
        let s = self.preferences.sensitivity;
        self.camera.rotate(dx * s, dy * s);
    }

    pub fn zoom_by(&mut self, scroll: f32) {
        self.camera.zoom_by(scroll);
    }

    /// Consume one frame of controls: orientation first, so movement uses
    /// the updated basis, then brake, then movement.
    pub fn apply_controls(
        &mut self,
        controls: &ControlFrame,
        dt: f32,
        brake: &BrakeSettings,
        integrator: &Integrator,
    ) {
        if controls.look != glam::Vec2::ZERO {
            self.look(controls.look.x, controls.look.y);
        }
        if controls.scroll != 0.0 {
            self.zoom_by(controls.scroll);
        }
        if controls.brake {
            if let Some(force) = self.brake(dt, brake, integrator) {
                tracing::debug!(%force, "brake engaged");
            }
        }
        self.command_move(controls.movement);
    }

    /// Step the body and move the camera with it.
    pub fn integrate(&mut self, integrator: &Integrator, dt: f32) {
        integrator.step(&mut self.body, dt);
        self.camera.set_position(self.body.position());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn player_at_origin() -> Player {
        Player::new(Vec3::ZERO, 0.0, 1.0, PlayerPreferences::default())
    }

    fn forward() -> MoveIntent {
        MoveIntent {
            forward: true,
            ..MoveIntent::default()
        }
    }

    #[test]
    fn set_position_moves_camera() {
        let mut player = player_at_origin();
        player.set_position(Vec3::new(4.0, 5.0, 6.0));
        assert_eq!(player.position(), Vec3::new(4.0, 5.0, 6.0));
        assert_eq!(player.camera().position(), Vec3::new(4.0, 5.0, 6.0));
    }

    #[test]
    fn integrate_keeps_camera_in_sync() {
        let mut player = player_at_origin();
        player.apply_force(Vec3::new(0.0, 0.0, -40.0));
        player.integrate(&Integrator::default(), 0.5);
        assert!(player.position().z < 0.0);
        assert_eq!(player.camera().position(), player.position());
    }

    #[test]
    fn idle_intent_applies_nothing() {
        let mut player = player_at_origin();
        assert_eq!(player.command_move(MoveIntent::default()), None);
        assert_eq!(player.body().force(), Vec3::ZERO);
    }

    #[test]
    fn forward_force_has_command_magnitude() {
        let mut player = player_at_origin();
        let force = player.command_move(forward()).unwrap();
        assert_abs_diff_eq!(force.length(), 500.0, epsilon = 1e-2);
        assert_abs_diff_eq!(force.z, -500.0, epsilon = 1e-2);
        assert_eq!(player.body().force(), force);
    }

    #[test]
    fn diagonal_force_is_normalized() {
        let mut player = player_at_origin();
        let intent = MoveIntent {
            forward: true,
            left: true,
            ..MoveIntent::default()
        };
        let force = player.command_move(intent).unwrap();
        assert_abs_diff_eq!(force.length(), 500.0, epsilon = 1e-2);
        assert!(force.x < 0.0 && force.z < 0.0);
    }

    #[test]
    fn movement_is_locked_to_horizontal_plane() {
        let mut player = player_at_origin();
        player.look(0.0, 450.0); // pitch 45 degrees up
        let force = player.command_move(forward()).unwrap();
        assert_eq!(force.y, 0.0);
        assert!(force.z < 0.0);
        assert!(force.length() < 500.0);
    }

    #[test]
    fn cancelling_intents_apply_nothing() {
        let mut player = player_at_origin();
        let intent = MoveIntent {
            left: true,
            right: true,
            ..MoveIntent::default()
        };
        assert_eq!(player.command_move(intent), None);
    }

    #[test]
    fn brake_ignored_when_slow() {
        let mut player = player_at_origin();
        player.body.set_velocity(Vec3::new(0.8, 0.0, 0.0));
        assert_eq!(player.brake(0.016, &BrakeSettings::default(), &Integrator::default()), None);
    }

    #[test]
    fn brake_ignores_zero_dt() {
        let mut player = player_at_origin();
        player.body.set_velocity(Vec3::new(50.0, 0.0, 0.0));
        assert_eq!(player.brake(0.0, &BrakeSettings::default(), &Integrator::default()), None);
    }

    #[test]
    fn brake_is_capped_by_braking_constant() {
        let mut player = player_at_origin();
        player.body.set_velocity(Vec3::new(5.0, 0.0, 0.0));
        // stopping force 5/0.01 = 500 exceeds the cap 10*5 = 50
        let force = player
            .brake(0.01, &BrakeSettings::default(), &Integrator::default())
            .unwrap();
        assert_abs_diff_eq!(force.x, -50.0, epsilon = 1e-3);
    }

    #[test]
    fn brake_stops_exactly_when_under_cap() {
        let mut player = player_at_origin();
        player.body.set_velocity(Vec3::new(0.0, 0.0, 8.0));
        // stopping force 8/0.5 = 16 is below the cap 80
        let force = player
            .brake(0.5, &BrakeSettings::default(), &Integrator::default())
            .unwrap();
        assert_abs_diff_eq!(force.z, -16.0, epsilon = 1e-4);
        player.integrate(&Integrator::default(), 0.5);
        assert_eq!(player.velocity(), Vec3::ZERO);
    }

    #[test]
    fn brake_force_ignores_mass() {
        let mut player = Player::new(Vec3::ZERO, 0.0, 2.0, PlayerPreferences::default());
        player.body.set_velocity(Vec3::new(4.0, 0.0, 0.0));
        let force = player
            .brake(1.0, &BrakeSettings::default(), &Integrator::default())
            .unwrap();
        assert_abs_diff_eq!(force.x, -4.0, epsilon = 1e-5);
        assert_eq!(force.y, 0.0);
    }

    #[test]
    fn brake_leaves_room_for_drag() {
        let mut player = Player::new(Vec3::ZERO, 0.01, 1.0, PlayerPreferences::default());
        player.body.set_velocity(Vec3::new(20.0, 0.0, 0.0));
        let integrator = Integrator::default();
        // drag adds 0.01 * 400 = 4, so the brake supplies the remaining 36
        let force = player
            .brake(0.5, &BrakeSettings::default(), &integrator)
            .unwrap();
        assert_abs_diff_eq!(force.x, -36.0, epsilon = 1e-3);
        player.integrate(&integrator, 0.5);
        assert_eq!(player.velocity(), Vec3::ZERO);
    }

    #[test]
    fn brake_never_reverses_direction() {
        let velocities = [
            Vec3::new(9.0, 0.0, 0.0),
            Vec3::new(-3.0, 2.0, 7.5),
            Vec3::new(1.5, 0.0, -1.5),
            Vec3::new(20.0, 0.0, 0.0),
            Vec3::new(0.0, -40.0, 120.0),
            Vec3::new(300.0, 0.0, -300.0),
        ];
        let integrator = Integrator::default();
        for drag in [0.0, 0.01, 0.2] {
            for mass in [0.25, 1.0, 2.0] {
                for dt in [0.001, 0.016, 0.1, 0.5, 2.0] {
                    for v in velocities {
                        let mut player =
                            Player::new(Vec3::ZERO, drag, mass, PlayerPreferences::default());
                        player.body.set_velocity(v);
                        // Cases where drag alone flips the body in one step
                        // say nothing about the brake.
                        let drag_dv = integrator.drag_force(player.body()).length() / mass * dt;
                        if drag_dv > v.length() {
                            continue;
                        }
                        let dir = v.normalize();
                        player.brake(dt, &BrakeSettings::default(), &integrator);
                        player.integrate(&integrator, dt);
                        assert!(
                            player.velocity().dot(dir) >= 0.0,
                            "v={v} dt={dt} drag={drag} mass={mass}"
                        );
                    }
                }
            }
        }
    }

    #[test]
    fn look_scales_by_sensitivity() {
        let mut player = player_at_origin();
        player.look(100.0, -50.0);
        assert_abs_diff_eq!(player.camera().yaw(), -80.0, epsilon = 1e-4);
        assert_abs_diff_eq!(player.camera().pitch(), -5.0, epsilon = 1e-4);
    }

    #[test]
    fn apply_controls_turns_before_moving() {
        let mut player = player_at_origin();
        let controls = ControlFrame {
            movement: forward(),
            look: glam::Vec2::new(900.0, 0.0), // 90 degrees: now facing +X
            ..ControlFrame::default()
        };
        player.apply_controls(
            &controls,
            0.016,
            &BrakeSettings::default(),
            &Integrator::default(),
        );
        let force = player.body().force();
        assert_abs_diff_eq!(force.x, 500.0, epsilon = 1e-2);
        assert_abs_diff_eq!(force.z, 0.0, epsilon = 1e-2);
    }

    #[test]
    fn apply_controls_zooms() {
        let mut player = player_at_origin();
        let controls = ControlFrame {
            scroll: 5.0,
            ..ControlFrame::default()
        };
        player.apply_controls(
            &controls,
            0.016,
            &BrakeSettings::default(),
            &Integrator::default(),
        );
        assert_eq!(player.zoom(), 40.0);
        assert_eq!(player.body().force(), Vec3::ZERO);
    }

    #[test]
    fn from_config_uses_spawn_state() {
        let config = SkylineConfig::default();
        let player = Player::from_config(&config);
        assert_eq!(player.position(), Vec3::new(81.0, 66.0, -1800.0));
        assert_eq!(player.camera().position(), player.position());
        assert_eq!(player.body().mass(), 1.0);
        assert_eq!(player.preferences().command_magnitude, 500.0);
        assert_abs_diff_eq!(player.front().z, -1.0, epsilon = 1e-6);
    }
}
