use glam::{Mat4, Vec3};

/// Fixed world up axis used to derive the camera basis.
pub const WORLD_UP: Vec3 = Vec3::Y;
/// Pitch is clamped to `[-PITCH_LIMIT, PITCH_LIMIT]` degrees.
pub const PITCH_LIMIT: f32 = 89.0;
pub const ZOOM_MIN: f32 = 1.0;
pub const ZOOM_MAX: f32 = 45.0;

/// First-person orientation: yaw/pitch in degrees plus the derived
/// front/right/up basis and a zoom (vertical field of view).
///
/// The basis is recomputed whenever yaw or pitch changes and is never set
/// directly, so it is always orthonormal.
#[derive(Debug, Clone, PartialEq)]
pub struct FlyCamera {
    position: Vec3,
    yaw: f32,
    pitch: f32,
    zoom: f32,
    front: Vec3,
    right: Vec3,
    up: Vec3,
}

impl Default for FlyCamera {
    fn default() -> Self {
        Self::new(Vec3::ZERO, -90.0, 0.0, ZOOM_MAX)
    }
}

impl FlyCamera {
    /// Create a camera. Pitch and zoom are clamped into range.
    pub fn new(position: Vec3, yaw: f32, pitch: f32, zoom: f32) -> Self {
        let mut cam = Self {
            position,
            yaw,
            pitch: pitch.clamp(-PITCH_LIMIT, PITCH_LIMIT),
            zoom: zoom.clamp(ZOOM_MIN, ZOOM_MAX),
            front: Vec3::NEG_Z,
            right: Vec3::X,
            up: Vec3::Y,
        };
        cam.update_vectors();
        cam
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn set_position(&mut self, position: Vec3) {
        self.position = position;
    }

    pub fn yaw(&self) -> f32 {
        self.yaw
    }

    pub fn pitch(&self) -> f32 {
        self.pitch
    }

    pub fn zoom(&self) -> f32 {
        self.zoom
    }

    pub fn front(&self) -> Vec3 {
        self.front
    }

    pub fn right(&self) -> Vec3 {
        self.right
    }

    pub fn up(&self) -> Vec3 {
        self.up
    }

    /// Add angle offsets in degrees, clamp pitch, and rebuild the basis.
    pub fn rotate(&mut self, dx: f32, dy: f32) {
        self.yaw += dx;
        self.pitch = (self.pitch + dy).clamp(-PITCH_LIMIT, PITCH_LIMIT);
        self.update_vectors();
    }

    /// Narrow (positive scroll) or widen the field of view. Leaves the basis untouched.
    pub fn zoom_by(&mut self, scroll: f32) {
        self.zoom = (self.zoom - scroll).clamp(ZOOM_MIN, ZOOM_MAX);
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.position + self.front, self.up)
    }

    /// Perspective projection using `zoom` as the vertical field of view.
    pub fn projection_matrix(&self, aspect: f32, near: f32, far: f32) -> Mat4 {
        Mat4::perspective_rh(self.zoom.to_radians(), aspect, near, far)
    }

    // The pitch clamp keeps front away from WORLD_UP, so the cross products
    // below never degenerate.
    fn update_vectors(&mut self) {
        let (yaw, pitch) = (self.yaw.to_radians(), self.pitch.to_radians());
        self.front = Vec3::new(
            yaw.cos() * pitch.cos(),
            pitch.sin(),
            yaw.sin() * pitch.cos(),
        )
        .normalize();
        self.right = self.front.cross(WORLD_UP).normalize();
        self.up = self.right.cross(self.front).normalize();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn assert_orthonormal(cam: &FlyCamera) {
        for v in [cam.front(), cam.right(), cam.up()] {
            assert_abs_diff_eq!(v.length(), 1.0, epsilon = 1e-5);
        }
        assert_abs_diff_eq!(cam.front().dot(cam.right()), 0.0, epsilon = 1e-5);
        assert_abs_diff_eq!(cam.front().dot(cam.up()), 0.0, epsilon = 1e-5);
        assert_abs_diff_eq!(cam.right().dot(cam.up()), 0.0, epsilon = 1e-5);
    }

    #[test]
    fn default_faces_negative_z() {
        let cam = FlyCamera::default();
        assert_abs_diff_eq!(cam.front().x, 0.0, epsilon = 1e-6);
        assert_abs_diff_eq!(cam.front().y, 0.0, epsilon = 1e-6);
        assert_abs_diff_eq!(cam.front().z, -1.0, epsilon = 1e-6);
        assert_abs_diff_eq!(cam.right().x, 1.0, epsilon = 1e-6);
        assert_abs_diff_eq!(cam.up().y, 1.0, epsilon = 1e-6);
    }

    #[test]
    fn pitch_clamps_at_both_limits() {
        let mut cam = FlyCamera::default();
        for _ in 0..50 {
            cam.rotate(0.0, 1000.0);
            assert!(cam.pitch() <= PITCH_LIMIT);
        }
        assert_eq!(cam.pitch(), PITCH_LIMIT);
        for _ in 0..50 {
            cam.rotate(0.0, -1000.0);
            assert!(cam.pitch() >= -PITCH_LIMIT);
        }
        assert_eq!(cam.pitch(), -PITCH_LIMIT);
    }

    #[test]
    fn basis_stays_orthonormal() {
        let mut cam = FlyCamera::default();
        let deltas = [
            (13.0, 7.0),
            (-250.0, 40.0),
            (0.5, -200.0),
            (720.0, 300.0),
            (-33.3, -12.1),
        ];
        for (dx, dy) in deltas {
            cam.rotate(dx, dy);
            assert_orthonormal(&cam);
        }
    }

    #[test]
    fn yaw_rotates_front_in_horizontal_plane() {
        let mut cam = FlyCamera::default();
        cam.rotate(90.0, 0.0);
        // yaw 0 looks down +X
        assert_abs_diff_eq!(cam.front().x, 1.0, epsilon = 1e-5);
        assert_abs_diff_eq!(cam.front().y, 0.0, epsilon = 1e-5);
    }

    #[test]
    fn zoom_clamps_and_keeps_basis() {
        let mut cam = FlyCamera::default();
        let front = cam.front();
        cam.zoom_by(10.0);
        assert_eq!(cam.zoom(), 35.0);
        cam.zoom_by(100.0);
        assert_eq!(cam.zoom(), ZOOM_MIN);
        cam.zoom_by(-100.0);
        assert_eq!(cam.zoom(), ZOOM_MAX);
        assert_eq!(cam.front(), front);
    }

    #[test]
    fn constructor_clamps_out_of_range_values() {
        let cam = FlyCamera::new(Vec3::ZERO, 0.0, 120.0, 80.0);
        assert_eq!(cam.pitch(), PITCH_LIMIT);
        assert_eq!(cam.zoom(), ZOOM_MAX);
        assert_orthonormal(&cam);
    }

    #[test]
    fn view_matrix_is_finite() {
        let cam = FlyCamera::new(Vec3::new(81.0, 66.0, -1800.0), -90.0, 0.0, 45.0);
        let vp = cam.projection_matrix(16.0 / 9.0, 0.1, 100_000.0) * cam.view_matrix();
        assert!(vp.is_finite());
        // The eye maps to the view-space origin.
        let eye = cam.view_matrix().transform_point3(cam.position());
        assert_abs_diff_eq!(eye.length(), 0.0, epsilon = 1e-2);
    }
}
