//! wgpu render back end for the city.
//!
//! Draws the street grid and the instanced, directionally lit buildings of a
//! [`skyline_render::CityLayout`], viewed through a
//! [`skyline_render::RenderView`].
//!
//! # Invariants
//! - The renderer never touches simulation state; it only sees view snapshots.
//! - Building geometry is uploaded once; frames only rewrite the uniforms.

mod gpu;
mod shaders;

pub use gpu::WgpuRenderer;
