//! Developer tooling: frame timing, FPS statistics and the debug overlay.
//!
//! # Invariants
//! - Tools only read simulation state; the frame clock is the single place
//!   wall-clock time enters the frame loop.

pub mod frame;
pub mod overlay;

pub use frame::{FrameClock, FrameStats};
pub use overlay::DebugOverlay;
