//! Brickfall - A brick-breaker arcade simulation
//!
//! Core modules:
//! - `sim`: Deterministic simulation (entities, movement, collisions, loop)
//! - `audio`: Sound cue interface and the default audio manager
//! - `render`: Drawing interface consumed once per tick
//! - `settings`: Data-driven tuning and preferences
//! - `error`: Error taxonomy shared by the simulation

pub mod audio;
pub mod error;
pub mod render;
pub mod settings;
pub mod sim;

pub use audio::{AudioManager, AudioSink, SoundCue};
pub use error::SimError;
pub use render::Renderer;
pub use settings::Settings;

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Fixed tick interval in milliseconds (60 Hz)
    pub const TICK_INTERVAL_MS: f64 = 1000.0 / 60.0;
    /// Movement + collision passes per due tick (game speed knob)
    pub const SUBSTEPS: u32 = 2;

    /// Play field dimensions
    pub const FIELD_WIDTH: f32 = 800.0;
    pub const FIELD_HEIGHT: f32 = 600.0;
    /// Walls sit inside the field along its edges
    pub const WALL_THICKNESS: f32 = 8.0;

    /// Paddle defaults
    pub const PADDLE_WIDTH: f32 = 80.0;
    pub const PADDLE_HEIGHT: f32 = 10.0;
    /// Distance from the field bottom to the paddle's top edge
    pub const PADDLE_BOTTOM_OFFSET: f32 = 40.0;
    /// Maximum deflection from straight up on a paddle hit
    pub const MAX_BOUNCE_ANGLE: f32 = std::f32::consts::PI / 12.0;

    /// Ball defaults (speeds are per sub-step)
    pub const BALL_RADIUS: f32 = 5.0;
    pub const BALL_START_SPEED: f32 = 3.0;
    pub const BALL_MIN_SPEED: f32 = 1.5;
    pub const BALL_MAX_SPEED: f32 = 6.0;
    /// Launch direction, measured from straight down
    pub const BALL_LAUNCH_ANGLE: f32 = std::f32::consts::PI / 8.0;

    /// Brick grid
    pub const BRICK_COLUMNS: u32 = 10;
    pub const BRICK_HEIGHT: f32 = 20.0;
    /// Narrowest brick a level may ask for
    pub const MIN_BRICK_WIDTH: f32 = 1.0;
    /// Rows switched on when a level supplies no layout
    pub const DEFAULT_ACTIVE_ROWS: u32 = 8;

    /// Power-ups
    pub const POWERUP_WIDTH: f32 = 20.0;
    pub const POWERUP_HEIGHT: f32 = 10.0;
    pub const POWERUP_FALL_SPEED: f32 = 1.5;
    pub const POWERUP_SPAWN_CHANCE: f64 = 0.15;
    /// Rotation applied to the cloned ball's velocity (radians)
    pub const EXTRA_BALL_SPREAD: f32 = 0.5;
    pub const WIDEN_FACTOR: f32 = 1.5;
    pub const MAX_WIDEN_FACTOR: f32 = 2.0;
    /// How long a widened paddle keeps its width
    pub const WIDEN_DURATION_MS: f64 = 10_000.0;
    pub const SLOW_FACTOR: f32 = 0.7;
}

/// Rotate a vector by `angle` radians
#[inline]
pub fn rotate(v: Vec2, angle: f32) -> Vec2 {
    Vec2::from_angle(angle).rotate(v)
}

/// Velocity of magnitude `speed` pointing `angle` radians off straight up
/// (positive angles lean right, y grows downward)
#[inline]
pub fn velocity_from_bounce_angle(speed: f32, angle: f32) -> Vec2 {
    Vec2::new(speed * angle.sin(), -speed * angle.cos())
}

/// Inverse of [`velocity_from_bounce_angle`]: angle off straight up
#[inline]
pub fn bounce_angle_of(vel: Vec2) -> f32 {
    vel.x.atan2(-vel.y)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn test_bounce_angle_roundtrip() {
        let v = velocity_from_bounce_angle(4.0, 0.2);
        assert!((v.length() - 4.0).abs() < 1e-5);
        assert!((bounce_angle_of(v) - 0.2).abs() < 1e-5);
        assert!(v.y < 0.0, "bounce velocity should point up");
    }

    #[test]
    fn test_rotate_quarter_turn() {
        let v = rotate(Vec2::new(1.0, 0.0), FRAC_PI_2);
        assert!(v.x.abs() < 1e-5);
        assert!((v.y - 1.0).abs() < 1e-5);
    }
}
