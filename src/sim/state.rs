//! Game state and core simulation types
//!
//! Everything the renderer and step function read lives here. Entities are
//! created once at startup and mutated in place; nothing is ever destroyed,
//! bricks only toggle visibility.

use glam::Vec2;

use crate::consts::*;

/// The ball entity
#[derive(Debug, Clone, PartialEq)]
pub struct Ball {
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    /// Vertical speed magnitude restored on paddle bounce. The components of
    /// `vel` are free to differ from this except immediately after a bounce.
    pub base_speed: f32,
}

impl Ball {
    /// Ball at arena center with the fixed starting velocity
    pub fn new() -> Self {
        Self {
            pos: Vec2::new(ARENA_WIDTH / 2.0, ARENA_HEIGHT / 2.0),
            vel: Vec2::new(BALL_START_DX, BALL_START_DY),
            radius: BALL_RADIUS,
            base_speed: BALL_BASE_SPEED,
        }
    }

    /// Advance one frame of free motion (reflection is applied afterwards)
    pub fn advance(&mut self) {
        self.pos += self.vel;
    }
}

impl Default for Ball {
    fn default() -> Self {
        Self::new()
    }
}

/// Which direction the player is steering the paddle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaddleDir {
    Left,
    Right,
}

/// A discrete key press/release delivered by the input source
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    Press(PaddleDir),
    Release(PaddleDir),
}

/// The player's paddle - fixed vertical position, horizontal motion only
#[derive(Debug, Clone, PartialEq)]
pub struct Paddle {
    pub pos: Vec2,
    pub width: f32,
    pub height: f32,
    /// Current horizontal velocity intent, one of {-speed, 0, +speed}
    pub dx: f32,
}

impl Default for Paddle {
    fn default() -> Self {
        Self {
            pos: Vec2::new(
                ARENA_WIDTH / 2.0 - PADDLE_WIDTH / 2.0,
                ARENA_HEIGHT - PADDLE_BOTTOM_MARGIN,
            ),
            width: PADDLE_WIDTH,
            height: PADDLE_HEIGHT,
            dx: 0.0,
        }
    }
}

impl Paddle {
    /// Apply velocity intent and clamp to the arena
    pub fn advance(&mut self) {
        self.pos.x = (self.pos.x + self.dx).clamp(0.0, ARENA_WIDTH - self.width);
    }
}

/// A single destructible brick
#[derive(Debug, Clone, PartialEq)]
pub struct Brick {
    pub pos: Vec2,
    pub width: f32,
    pub height: f32,
    pub visible: bool,
}

impl Brick {
    fn new(col: usize, row: usize) -> Self {
        Self {
            pos: Vec2::new(
                col as f32 * (BRICK_WIDTH + BRICK_PADDING) + BRICK_OFFSET_X,
                row as f32 * (BRICK_HEIGHT + BRICK_PADDING) + BRICK_OFFSET_Y,
            ),
            width: BRICK_WIDTH,
            height: BRICK_HEIGHT,
            visible: true,
        }
    }
}

/// The fixed 9x5 brick grid, stored column-major
///
/// Cardinality never changes; only the `visible` flags mutate.
#[derive(Debug, Clone, PartialEq)]
pub struct BrickGrid {
    bricks: Vec<Brick>,
}

impl BrickGrid {
    pub fn new() -> Self {
        let mut bricks = Vec::with_capacity(BRICK_COLUMNS * BRICK_ROWS);
        for col in 0..BRICK_COLUMNS {
            for row in 0..BRICK_ROWS {
                bricks.push(Brick::new(col, row));
            }
        }
        Self { bricks }
    }

    /// Total brick count (visible or not)
    pub fn len(&self) -> usize {
        self.bricks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bricks.is_empty()
    }

    pub fn get(&self, col: usize, row: usize) -> &Brick {
        &self.bricks[col * BRICK_ROWS + row]
    }

    pub fn get_mut(&mut self, col: usize, row: usize) -> &mut Brick {
        &mut self.bricks[col * BRICK_ROWS + row]
    }

    /// Iterate column-major (all rows of column 0, then column 1, ...)
    pub fn iter(&self) -> impl Iterator<Item = &Brick> {
        self.bricks.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Brick> {
        self.bricks.iter_mut()
    }

    /// Restore every brick, used by both win and loss resets
    pub fn show_all(&mut self) {
        for brick in &mut self.bricks {
            brick.visible = true;
        }
    }

    pub fn visible_count(&self) -> usize {
        self.bricks.iter().filter(|b| b.visible).count()
    }
}

impl Default for BrickGrid {
    fn default() -> Self {
        Self::new()
    }
}

/// Complete game state
///
/// Owned by the host context and passed by reference to `step` and the
/// renderer; there are no ambient globals.
#[derive(Debug, Clone, PartialEq)]
pub struct GameState {
    pub ball: Ball,
    pub paddle: Paddle,
    pub bricks: BrickGrid,
    /// Increments by 1 per destroyed brick; reset to 0 only on loss
    pub score: u32,
    /// Increments by 1 per cleared grid; reset to 1 only on loss
    pub level: u32,
}

impl GameState {
    pub fn new() -> Self {
        Self {
            ball: Ball::new(),
            paddle: Paddle::default(),
            bricks: BrickGrid::new(),
            score: 0,
            level: 1,
        }
    }

    /// Map a key event to paddle velocity intent. Last event wins; releasing
    /// either key zeroes the intent even if the other key is still held.
    pub fn apply_input(&mut self, event: InputEvent) {
        self.paddle.dx = match event {
            InputEvent::Press(PaddleDir::Right) => PADDLE_SPEED,
            InputEvent::Press(PaddleDir::Left) => -PADDLE_SPEED,
            InputEvent::Release(_) => 0.0,
        };
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}
