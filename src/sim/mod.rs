//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and headless:
//! - One discrete step per invocation, driven by the host frame scheduler
//! - Fixed iteration order over the brick grid (column-major)
//! - No rendering, audio, or platform dependencies

pub mod state;
pub mod step;

pub use state::{Ball, Brick, BrickGrid, GameState, InputEvent, Paddle, PaddleDir};
pub use step::{GameEvent, step};
