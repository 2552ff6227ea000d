//! Input: per-frame key state and mouse motion mapped onto the camera.
//!
//! # Invariants
//! - The ground probe runs every frame before vertical input is handled.
//! - Only the descend control collides with the grid; horizontal moves and
//!   ascending pass through blocks.
//! - The first mouse sample after focus is acquired only sets the reference point.

pub mod action;
mod controller;
mod mouse;

pub use action::{Control, KeyState};
pub use controller::{FrameInput, InputController, MovementParams};
pub use mouse::MouseLook;
