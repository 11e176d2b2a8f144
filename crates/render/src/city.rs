use glam::{Mat4, Vec3};

/// Parameters for the procedural city block grid.
#[derive(Debug, Clone, PartialEq)]
pub struct CityParams {
    /// Ground-level centre of the grid. Lies on a street intersection.
    pub origin: Vec3,
    /// Blocks per side.
    pub blocks: u32,
    /// Distance between block centres.
    pub spacing: f32,
    /// Maximum footprint as a fraction of `spacing`; the rest is street.
    pub max_footprint: f32,
    pub min_height: f32,
    pub max_height: f32,
    pub seed: u64,
}

impl Default for CityParams {
    fn default() -> Self {
        Self {
            origin: Vec3::new(81.0, 0.0, -1800.0),
            blocks: 16,
            spacing: 60.0,
            max_footprint: 0.7,
            min_height: 20.0,
            max_height: 180.0,
            seed: 0x5eed,
        }
    }
}

/// An axis-aligned box standing on the ground plane.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Building {
    /// Centre of the footprint at ground level.
    pub center: Vec3,
    /// Width, height, depth.
    pub size: Vec3,
    pub color: [f32; 4],
}

impl Building {
    /// Transform taking the unit cube centred on the origin onto this building.
    pub fn model_matrix(&self) -> Mat4 {
        let mid = self.center + Vec3::new(0.0, self.size.y * 0.5, 0.0);
        Mat4::from_scale_rotation_translation(self.size, glam::Quat::IDENTITY, mid)
    }

    pub fn contains(&self, p: Vec3) -> bool {
        let half = self.size * 0.5;
        let d = p - self.center;
        d.x.abs() <= half.x && d.z.abs() <= half.z && p.y >= self.center.y && d.y <= self.size.y
    }
}

/// Stand-in for the loaded city model: a deterministic grid of box buildings.
#[derive(Debug, Clone, PartialEq)]
pub struct CityLayout {
    buildings: Vec<Building>,
    origin: Vec3,
    spacing: f32,
    half_extent: f32,
}

impl CityLayout {
    /// Generate the layout. The same params always give the same city.
    pub fn generate(params: &CityParams) -> Self {
        let n = params.blocks;
        let half_extent = n as f32 * params.spacing * 0.5;
        let mut state = params.seed;
        let mut next_unit = || {
            state = splitmix64(state);
            (state >> 40) as f32 / (1u64 << 24) as f32
        };

        let mut buildings = Vec::with_capacity((n * n) as usize);
        for i in 0..n {
            for j in 0..n {
                let x = (i as f32 + 0.5) * params.spacing - half_extent;
                let z = (j as f32 + 0.5) * params.spacing - half_extent;
                let footprint = params.spacing * params.max_footprint;
                let width = footprint * (0.6 + 0.4 * next_unit());
                let depth = footprint * (0.6 + 0.4 * next_unit());
                let height =
                    params.min_height + (params.max_height - params.min_height) * next_unit();
                let shade = 0.45 + 0.4 * next_unit();
                buildings.push(Building {
                    center: params.origin + Vec3::new(x, 0.0, z),
                    size: Vec3::new(width, height, depth),
                    color: [shade, shade * 0.95, shade * 0.9, 1.0],
                });
            }
        }

        tracing::debug!(count = buildings.len(), "generated city layout");
        Self {
            buildings,
            origin: params.origin,
            spacing: params.spacing,
            half_extent,
        }
    }

    pub fn buildings(&self) -> &[Building] {
        &self.buildings
    }

    pub fn origin(&self) -> Vec3 {
        self.origin
    }

    /// Distance between street centre lines.
    pub fn spacing(&self) -> f32 {
        self.spacing
    }

    /// Half the side length of the square the city covers.
    pub fn half_extent(&self) -> f32 {
        self.half_extent
    }

    /// The building containing `p`, if any.
    pub fn building_at(&self, p: Vec3) -> Option<&Building> {
        self.buildings.iter().find(|b| b.contains(p))
    }
}

/// Splitmix64 step, used as a small deterministic PRNG for the layout.
fn splitmix64(mut state: u64) -> u64 {
    state = state.wrapping_add(0x9e37_79b9_7f4a_7c15);
    let mut z = state;
    z = (z ^ (z >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
    z ^ (z >> 31)
}
