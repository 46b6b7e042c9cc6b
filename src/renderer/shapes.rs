//! Shape generation for 2D primitives
//!
//! Builds the per-frame triangle list in arena coordinates (top-left origin,
//! y down); the pipeline maps to NDC at upload time.

use glam::Vec2;
use std::f32::consts::PI;

use super::vertex::{Vertex, colors};
use crate::sim::GameState;

/// Triangle fan segments used for the ball
const CIRCLE_SEGMENTS: u32 = 32;

/// Generate vertices for a filled circle
pub fn circle(center: Vec2, radius: f32, color: [f32; 4], segments: u32) -> Vec<Vertex> {
    let mut vertices = Vec::with_capacity((segments * 3) as usize);

    for i in 0..segments {
        let theta1 = (i as f32 / segments as f32) * 2.0 * PI;
        let theta2 = ((i + 1) as f32 / segments as f32) * 2.0 * PI;

        // Triangle from center to edge
        vertices.push(Vertex::new(center.x, center.y, color));
        vertices.push(Vertex::new(
            center.x + radius * theta1.cos(),
            center.y + radius * theta1.sin(),
            color,
        ));
        vertices.push(Vertex::new(
            center.x + radius * theta2.cos(),
            center.y + radius * theta2.sin(),
            color,
        ));
    }

    vertices
}

/// Generate vertices for an axis-aligned filled rectangle
pub fn rect(top_left: Vec2, width: f32, height: f32, color: [f32; 4]) -> Vec<Vertex> {
    let tl = top_left;
    let tr = Vec2::new(top_left.x + width, top_left.y);
    let bl = Vec2::new(top_left.x, top_left.y + height);
    let br = Vec2::new(top_left.x + width, top_left.y + height);

    vec![
        Vertex::new(tl.x, tl.y, color),
        Vertex::new(bl.x, bl.y, color),
        Vertex::new(tr.x, tr.y, color),
        Vertex::new(tr.x, tr.y, color),
        Vertex::new(bl.x, bl.y, color),
        Vertex::new(br.x, br.y, color),
    ]
}

/// Assemble the full frame: visible bricks, paddle, ball.
///
/// Invisible bricks are skipped entirely. Score/level text lives in the DOM
/// HUD, not in the vertex stream.
pub fn build_frame(state: &GameState) -> Vec<Vertex> {
    let mut vertices = Vec::new();

    for brick in state.bricks.iter() {
        if brick.visible {
            vertices.extend(rect(
                brick.pos,
                brick.width,
                brick.height,
                colors::BRICK,
            ));
        }
    }

    vertices.extend(rect(
        state.paddle.pos,
        state.paddle.width,
        state.paddle.height,
        colors::PADDLE,
    ));

    vertices.extend(circle(
        state.ball.pos,
        state.ball.radius,
        colors::BALL,
        CIRCLE_SEGMENTS,
    ));

    vertices
}
