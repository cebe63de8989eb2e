//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (insertion order, bricks in grid scan order)
//! - No rendering or platform dependencies

pub mod collision;
pub mod geometry;
pub mod input;
pub mod level;
pub mod movement;
pub mod objects;
pub mod state;
pub mod tick;

pub use collision::{CollisionEngine, bounce_angle};
pub use geometry::{CollisionResult, Rect, circle_overlaps_rect, circle_rect_collision, reflect_velocity};
pub use input::InputState;
pub use level::{GridSize, LEVEL_NAMES, LevelDescriptor};
pub use movement::MoveEngine;
pub use objects::{BrickGrid, EntitiesMut, ObjectManager};
pub use state::{
    Ball, Brick, GameEvent, GamePhase, Paddle, PlayField, Powerup, PowerupKind, Wall, WallSide,
};
pub use tick::{Schedule, Simulation};
