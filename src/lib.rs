//! Neon Bricks - a classic brick-smashing arcade game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (paddle, ball, brick grid, scoring)
//! - `renderer`: WebGPU rendering pipeline
//! - `audio`: Sound effect triggering (Web Audio adapter + null sink)
//! - `settings`: Player preferences persisted to LocalStorage

pub mod audio;
pub mod renderer;
pub mod settings;
pub mod sim;

pub use settings::Settings;

/// Game configuration constants
///
/// Ball and paddle velocities are expressed in pixels per frame; the
/// simulation advances one step per display refresh tick.
pub mod consts {
    /// Arena dimensions (pixels)
    pub const ARENA_WIDTH: f32 = 800.0;
    pub const ARENA_HEIGHT: f32 = 600.0;

    /// Ball defaults
    pub const BALL_RADIUS: f32 = 10.0;
    /// Vertical speed magnitude restored on every paddle bounce
    pub const BALL_BASE_SPEED: f32 = 2.0;
    pub const BALL_START_DX: f32 = 4.0;
    pub const BALL_START_DY: f32 = -4.0;

    /// Paddle defaults - sits near the bottom edge, moves horizontally
    pub const PADDLE_WIDTH: f32 = 80.0;
    pub const PADDLE_HEIGHT: f32 = 10.0;
    pub const PADDLE_SPEED: f32 = 8.0;
    /// Distance from the arena bottom to the paddle top
    pub const PADDLE_BOTTOM_MARGIN: f32 = 40.0;

    /// Brick grid layout
    pub const BRICK_COLUMNS: usize = 9;
    pub const BRICK_ROWS: usize = 5;
    pub const BRICK_WIDTH: f32 = 70.0;
    pub const BRICK_HEIGHT: f32 = 20.0;
    pub const BRICK_PADDING: f32 = 10.0;
    pub const BRICK_OFFSET_X: f32 = 45.0;
    pub const BRICK_OFFSET_Y: f32 = 60.0;
}
