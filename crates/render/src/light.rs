use glam::Vec3;

/// A single directional light (the sun over the city).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DirectionalLight {
    /// Direction the light travels, not the direction towards it.
    pub direction: Vec3,
    pub ambient: Vec3,
    pub diffuse: Vec3,
    pub specular: Vec3,
}

impl Default for DirectionalLight {
    fn default() -> Self {
        Self {
            direction: Vec3::new(0.2, -1.0, 0.2),
            ambient: Vec3::splat(0.4),
            diffuse: Vec3::splat(0.6),
            specular: Vec3::splat(1.0),
        }
    }
}

impl DirectionalLight {
    /// Ambient plus Lambert diffuse for a surface with the given normal.
    /// Mirrors the fragment shader, minus the specular term.
    pub fn lambert(&self, normal: Vec3) -> Vec3 {
        let to_light = -self.direction.normalize_or_zero();
        let n_dot_l = normal.normalize_or_zero().dot(to_light).max(0.0);
        self.ambient + self.diffuse * n_dot_l
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roofs_are_brighter_than_floors_facing_down() {
        let light = DirectionalLight::default();
        let roof = light.lambert(Vec3::Y);
        let underside = light.lambert(Vec3::NEG_Y);
        assert!(roof.x > underside.x);
        assert_eq!(underside, light.ambient);
    }

    #[test]
    fn lighting_never_drops_below_ambient() {
        let light = DirectionalLight::default();
        for n in [Vec3::X, Vec3::NEG_X, Vec3::Z, Vec3::NEG_Z, Vec3::ZERO] {
            let c = light.lambert(n);
            assert!(c.x >= light.ambient.x);
        }
    }
}
