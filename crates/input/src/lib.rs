//! Input mapping: backend-agnostic keys and mouse deltas turned into one
//! [`ControlFrame`](skyline_kernel::ControlFrame) per frame.
//!
//! # Invariants
//! - The same bindings drive every windowing back end (desktop, headless CLI).
//! - Mouse and scroll deltas are consumed exactly once, at `end_frame`.

pub mod action;
pub mod key;
pub mod state;

pub use action::{Action, KeyBindings};
pub use key::{InputError, Key};
pub use state::InputState;
