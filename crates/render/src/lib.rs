//! Rendering adapter: renderer-agnostic view, lighting and scene layout.
//!
//! # Invariants
//! - Renderers cannot mutate the world; they read the player through
//!   [`RenderView`] snapshots.
//! - The city layout is a pure function of [`CityParams`].
//!
//! The trait-based [`Renderer`] interface has a text implementation here for
//! headless use; the wgpu back end lives in `skyline-render-wgpu`.

mod city;
mod light;
mod renderer;

pub use city::{Building, CityLayout, CityParams};
pub use light::DirectionalLight;
pub use renderer::{DebugTextRenderer, RenderView, Renderer};
