use crate::city::CityLayout;
use glam::{Mat4, Vec3};
use skyline_common::CameraConfig;
use skyline_kernel::{Player, World};

/// Camera/view configuration for rendering, derived from the player.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderView {
    /// Camera position in world space.
    pub eye: Vec3,
    pub front: Vec3,
    pub up: Vec3,
    /// Vertical field of view in degrees (the camera zoom).
    pub fov_degrees: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for RenderView {
    fn default() -> Self {
        let camera = CameraConfig::default();
        Self {
            eye: Vec3::ZERO,
            front: Vec3::NEG_Z,
            up: Vec3::Y,
            fov_degrees: camera.zoom,
            near: camera.near,
            far: camera.far,
        }
    }
}

impl RenderView {
    /// Snapshot the player's camera for this frame.
    pub fn from_player(player: &Player, camera: &CameraConfig) -> Self {
        let cam = player.camera();
        Self {
            eye: cam.position(),
            front: cam.front(),
            up: cam.up(),
            fov_degrees: cam.zoom(),
            near: camera.near,
            far: camera.far,
        }
    }

    /// Point one unit ahead of the eye.
    pub fn target(&self) -> Vec3 {
        self.eye + self.front
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye, self.target(), self.up)
    }

    pub fn projection_matrix(&self, aspect: f32) -> Mat4 {
        Mat4::perspective_rh(self.fov_degrees.to_radians(), aspect, self.near, self.far)
    }

    /// Combined view-projection matrix ready to upload to the GPU.
    pub fn view_projection(&self, aspect: f32) -> Mat4 {
        self.projection_matrix(aspect) * self.view_matrix()
    }
}

/// Renderer-agnostic interface. All renderers implement this trait.
///
/// The renderer reads world state and a view configuration, then produces
/// output. It never mutates the world.
pub trait Renderer {
    /// The output type produced by this renderer.
    type Output;

    /// Render one frame from the given world, city and view.
    fn render(&self, world: &World, city: &CityLayout, view: &RenderView) -> Self::Output;
}

/// Produces a human-readable dump of the frame. Used by the headless CLI
/// and for testing the render interface.
#[derive(Debug, Default)]
pub struct DebugTextRenderer;

impl DebugTextRenderer {
    pub fn new() -> Self {
        Self
    }
}

impl Renderer for DebugTextRenderer {
    type Output = String;

    fn render(&self, world: &World, city: &CityLayout, view: &RenderView) -> String {
        let mut out = String::new();
        let player = world.player();
        let p = player.position();
        let v = player.velocity();
        out.push_str(&format!(
            "=== Frame (tick={}, elapsed={:.2}s) ===\n",
            world.tick(),
            world.elapsed()
        ));
        out.push_str(&format!("Buildings: {}\n", city.buildings().len()));
        out.push_str(&format!(
            "Camera: eye=({:.1}, {:.1}, {:.1}) front=({:.2}, {:.2}, {:.2}) fov={:.0}\n",
            view.eye.x,
            view.eye.y,
            view.eye.z,
            view.front.x,
            view.front.y,
            view.front.z,
            view.fov_degrees
        ));
        out.push_str(&format!(
            "Player: pos=({:.2}, {:.2}, {:.2}) vel=({:.2}, {:.2}, {:.2})\n",
            p.x,
            p.y,
            p.z,
            v.x,
            v.y,
            v.z
        ));
        if let Some(b) = city.building_at(p) {
            out.push_str(&format!(
                "Inside building at ({:.1}, {:.1})\n",
                b.center.x, b.center.z
            ));
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::city::CityParams;
    use approx::assert_abs_diff_eq;
    use skyline_common::SkylineConfig;
    use skyline_kernel::ControlFrame;

    #[test]
    fn view_follows_player() {
        let config = SkylineConfig::default();
        let world = World::new(&config);
        let view = RenderView::from_player(world.player(), &config.camera);
        assert_eq!(view.eye, Vec3::new(81.0, 66.0, -1800.0));
        assert_eq!(view.fov_degrees, 45.0);
        assert_abs_diff_eq!(view.front.z, -1.0, epsilon = 1e-6);
    }

    #[test]
    fn view_projection_is_finite() {
        let view = RenderView::default();
        let vp = view.view_projection(16.0 / 9.0);
        assert!(vp.is_finite());
    }

    #[test]
    fn point_ahead_projects_to_screen_centre() {
        let config = SkylineConfig::default();
        let world = World::new(&config);
        let view = RenderView::from_player(world.player(), &config.camera);
        let ahead = view.eye + view.front * 100.0;
        let clip = view.view_projection(1.0).project_point3(ahead);
        assert_abs_diff_eq!(clip.x, 0.0, epsilon = 1e-3);
        assert_abs_diff_eq!(clip.y, 0.0, epsilon = 1e-3);
    }

    #[test]
    fn narrower_zoom_magnifies() {
        let wide = RenderView::default();
        let narrow = RenderView {
            fov_degrees: 10.0,
            ..RenderView::default()
        };
        let point = Vec3::new(1.0, 0.0, -10.0);
        let a = wide.view_projection(1.0).project_point3(point);
        let b = narrow.view_projection(1.0).project_point3(point);
        assert!(b.x > a.x);
    }

    #[test]
    fn debug_renderer_reports_player() {
        let config = SkylineConfig::default();
        let mut world = World::new(&config);
        world.step(&ControlFrame::default(), 0.016);
        let city = CityLayout::generate(&CityParams::default());
        let view = RenderView::from_player(world.player(), &config.camera);
        let output = DebugTextRenderer::new().render(&world, &city, &view);

        assert!(output.contains("tick=1"));
        assert!(output.contains(&format!("Buildings: {}", city.buildings().len())));
        assert!(output.contains("pos=(81.00, 66.00, -1800.00)"));
        assert!(!output.contains("Inside building"));
    }
}
