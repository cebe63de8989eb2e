//! Pointer input shared with the movement engine
//!
//! The input collaborator is the only writer; the movement engine reads it
//! once per paddle update.

use serde::{Deserialize, Serialize};

use super::objects::ObjectManager;

/// Latest pointer position in play-field coordinates
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct InputState {
    pub pointer_x: f32,
    pub pointer_y: f32,
}

impl InputState {
    pub fn new(pointer_x: f32, pointer_y: f32) -> Self {
        Self {
            pointer_x,
            pointer_y,
        }
    }

    /// Record a pointer move
    pub fn set_pointer(&mut self, x: f32, y: f32) {
        self.pointer_x = x;
        self.pointer_y = y;
    }

    /// Demo-mode reading: follow the lowest ball that is falling, or the
    /// lowest ball at all when none is. Keeps the current reading when the
    /// field is empty.
    pub fn track(&self, objects: &ObjectManager) -> Self {
        let lowest = |falling: bool| {
            objects
                .balls()
                .iter()
                .filter(|b| !falling || b.vel.y > 0.0)
                .max_by(|a, b| a.pos.y.total_cmp(&b.pos.y))
        };

        match lowest(true).or_else(|| lowest(false)) {
            Some(ball) => Self::new(ball.pos.x, objects.paddle().y),
            None => *self,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::PlayField;
    use glam::Vec2;

    #[test]
    fn test_track_follows_lowest_falling_ball() {
        let mut objects = ObjectManager::new(PlayField::default());
        objects.init_all(None).unwrap();
        let first = objects.balls()[0].id;
        objects.remove_ball(first);
        objects.add_ball(Vec2::new(100.0, 500.0), Vec2::new(0.0, -3.0), 5.0);
        objects.add_ball(Vec2::new(600.0, 400.0), Vec2::new(0.0, 3.0), 5.0);

        let input = InputState::default().track(&objects);
        assert_eq!(input.pointer_x, 600.0);
    }

    #[test]
    fn test_track_without_balls_keeps_reading() {
        let objects = ObjectManager::new(PlayField::default());
        let input = InputState::new(123.0, 4.0);
        assert_eq!(input.track(&objects), input);
    }
}
