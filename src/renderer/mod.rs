//! WebGPU rendering module
//!
//! Flat-shaded triangle lists: rects for paddle and bricks, a fan for the
//! ball. Text overlays (score, level, FPS) are DOM elements, not geometry.

pub mod pipeline;
pub mod shapes;
pub mod vertex;

pub use pipeline::RenderState;
pub use shapes::build_frame;
