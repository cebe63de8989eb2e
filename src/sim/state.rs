//! Entities and core simulation types
//!
//! Plain data owned by the [`ObjectManager`](super::objects::ObjectManager).
//! Engines mutate these in place; creation and removal go through the
//! registry.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::geometry::Rect;
use crate::consts::*;

/// Current phase of the simulation loop
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Ticks are being advanced
    Running,
    /// Every ball was lost; terminal until the next start
    GameOver,
}

/// Rectangular play area, open at the bottom
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlayField {
    pub width: f32,
    pub height: f32,
}

impl Default for PlayField {
    fn default() -> Self {
        Self {
            width: FIELD_WIDTH,
            height: FIELD_HEIGHT,
        }
    }
}

impl PlayField {
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.width / 2.0, self.height / 2.0)
    }
}

/// A ball entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ball {
    pub id: u32,
    /// Center position
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
}

impl Ball {
    pub fn new(id: u32, pos: Vec2, vel: Vec2, radius: f32) -> Self {
        Self {
            id,
            pos,
            vel,
            radius,
        }
    }

    #[inline]
    pub fn speed(&self) -> f32 {
        self.vel.length()
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.pos.y - self.radius
    }

    /// Scale speed by `factor`, keeping it inside the allowed range
    pub fn scale_speed(&mut self, factor: f32) {
        let speed = (self.speed() * factor).clamp(BALL_MIN_SPEED, BALL_MAX_SPEED);
        self.vel = self.vel.normalize_or_zero() * speed;
    }
}

/// The player's paddle
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Paddle {
    /// Horizontal center
    pub x: f32,
    /// Top edge (fixed for the level)
    pub y: f32,
    pub width: f32,
    pub height: f32,
    /// Width to return to when a widen effect expires
    pub base_width: f32,
    /// Sub-steps left on the current widen effect
    #[serde(default)]
    pub widen_ticks: u32,
}

impl Paddle {
    /// Paddle centered horizontally, `PADDLE_BOTTOM_OFFSET` above the field bottom
    pub fn new(field: &PlayField) -> Self {
        Self {
            x: field.width / 2.0,
            y: field.height - PADDLE_BOTTOM_OFFSET,
            width: PADDLE_WIDTH,
            height: PADDLE_HEIGHT,
            base_width: PADDLE_WIDTH,
            widen_ticks: 0,
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.x - self.width / 2.0, self.y, self.width, self.height)
    }

    /// Follow the pointer, keeping the whole paddle inside the field
    pub fn move_to(&mut self, pointer_x: f32, field: &PlayField) {
        let half = (self.width / 2.0).min(field.width / 2.0);
        self.x = pointer_x.clamp(half, field.width - half);
    }

    /// Grow the paddle and restart the widen timer at `duration` sub-steps
    pub fn widen(&mut self, duration: u32) {
        self.width = (self.width * WIDEN_FACTOR).min(self.base_width * MAX_WIDEN_FACTOR);
        self.widen_ticks = duration;
    }

    /// Count down the widen timer; restores the base width on expiry
    pub fn decay_widen(&mut self) {
        if self.widen_ticks > 0 {
            self.widen_ticks -= 1;
            if self.widen_ticks == 0 {
                self.width = self.base_width;
            }
        }
    }
}

/// Which edge of the field a wall guards
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WallSide {
    Left,
    Right,
    Top,
}

/// A boundary segment used purely as a reflector
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Wall {
    pub side: WallSide,
    pub rect: Rect,
}

impl Wall {
    /// Left, right and top walls for a field; the bottom is open
    pub fn boundary(field: &PlayField) -> Vec<Wall> {
        vec![
            Wall {
                side: WallSide::Left,
                rect: Rect::new(0.0, 0.0, WALL_THICKNESS, field.height),
            },
            Wall {
                side: WallSide::Right,
                rect: Rect::new(
                    field.width - WALL_THICKNESS,
                    0.0,
                    WALL_THICKNESS,
                    field.height,
                ),
            },
            Wall {
                side: WallSide::Top,
                rect: Rect::new(0.0, 0.0, field.width, WALL_THICKNESS),
            },
        ]
    }
}

/// A brick cell
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Brick {
    pub column: u32,
    pub row: u32,
    pub rect: Rect,
    /// Broken bricks are inert; a brick never un-breaks
    pub broken: bool,
}

impl Brick {
    #[inline]
    pub fn is_active(&self) -> bool {
        !self.broken
    }
}

/// Power-up types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PowerupKind {
    /// Adds a ball diverging from an existing one
    ExtraBall,
    /// Temporarily widens the paddle
    WidePaddle,
    /// Slows every ball
    SlowBall,
}

impl PowerupKind {
    pub const ALL: [PowerupKind; 3] = [
        PowerupKind::ExtraBall,
        PowerupKind::WidePaddle,
        PowerupKind::SlowBall,
    ];
}

/// A falling power-up
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Powerup {
    pub id: u32,
    pub kind: PowerupKind,
    /// Center position
    pub pos: Vec2,
    pub vel: Vec2,
    pub size: Vec2,
}

impl Powerup {
    pub fn new(id: u32, kind: PowerupKind, pos: Vec2) -> Self {
        Self {
            id,
            kind,
            pos,
            vel: Vec2::new(0.0, POWERUP_FALL_SPEED),
            size: Vec2::new(POWERUP_WIDTH, POWERUP_HEIGHT),
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::from_center(self.pos, self.size)
    }
}

/// Something that happened during a collision pass
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    WallBounce { ball: u32, side: WallSide },
    PaddleBounce { ball: u32, angle: f32 },
    BrickBroken { ball: u32, column: u32, row: u32 },
    PowerupSpawned { id: u32, kind: PowerupKind },
    PowerupCaught { id: u32, kind: PowerupKind },
    PowerupMissed { id: u32, kind: PowerupKind },
    BallLost { ball: u32 },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paddle_clamped_to_field() {
        let field = PlayField::default();
        let mut paddle = Paddle::new(&field);
        paddle.move_to(-100.0, &field);
        assert_eq!(paddle.rect().min.x, 0.0);
        paddle.move_to(10_000.0, &field);
        assert_eq!(paddle.rect().max.x, field.width);
        paddle.move_to(300.0, &field);
        assert_eq!(paddle.x, 300.0);
    }

    #[test]
    fn test_widen_caps_and_expires() {
        let field = PlayField::default();
        let mut paddle = Paddle::new(&field);
        paddle.widen(50);
        paddle.widen(50);
        paddle.widen(50);
        assert_eq!(paddle.width, PADDLE_WIDTH * MAX_WIDEN_FACTOR);
        for _ in 0..49 {
            paddle.decay_widen();
        }
        assert_eq!(paddle.width, PADDLE_WIDTH * MAX_WIDEN_FACTOR);
        paddle.decay_widen();
        assert_eq!(paddle.width, PADDLE_WIDTH);
        assert_eq!(paddle.widen_ticks, 0);
    }

    #[test]
    fn test_scale_speed_clamps() {
        let mut ball = Ball::new(1, Vec2::ZERO, Vec2::new(0.0, 2.0), BALL_RADIUS);
        ball.scale_speed(0.1);
        assert!((ball.speed() - BALL_MIN_SPEED).abs() < 1e-5);
        ball.scale_speed(100.0);
        assert!((ball.speed() - BALL_MAX_SPEED).abs() < 1e-5);
    }

    #[test]
    fn test_boundary_walls() {
        let walls = Wall::boundary(&PlayField::default());
        assert_eq!(walls.len(), 3);
        assert!(walls.iter().all(|w| w.side != WallSide::Left || w.rect.min.x == 0.0));
        assert!(walls.iter().any(|w| w.side == WallSide::Top));
    }
}
