//! Movement engine
//!
//! Pure kinematic integration for one sub-step. No collision logic here.

use super::geometry::validate_circle;
use super::input::InputState;
use super::objects::ObjectManager;

/// Advances every movable entity by one sub-step
#[derive(Debug, Clone, Default)]
pub struct MoveEngine;

impl MoveEngine {
    pub fn new() -> Self {
        Self
    }

    /// Move the paddle to the pointer, then every ball and power-up by its
    /// velocity. Balls with broken state are left in place and logged.
    pub fn move_all(&self, objects: &mut ObjectManager, input: &InputState) {
        let entities = objects.entities_mut();

        entities.paddle.decay_widen();
        if input.pointer_x.is_finite() {
            entities.paddle.move_to(input.pointer_x, entities.field);
        } else {
            log::warn!("Ignoring non-finite pointer x {}", input.pointer_x);
        }

        for ball in entities.balls.iter_mut() {
            if let Err(err) = validate_circle("ball", ball.pos, ball.radius) {
                log::warn!("Skipping movement of ball {}: {}", ball.id, err);
                continue;
            }
            if !ball.vel.is_finite() {
                log::warn!("Skipping movement of ball {}: non-finite velocity", ball.id);
                continue;
            }
            ball.pos += ball.vel;
        }

        for powerup in entities.powerups.iter_mut() {
            powerup.pos += powerup.vel;
        }
    }
}
