//! Collision detection and response
//!
//! For every ball, in order: walls, paddle, bricks. Then balls that left
//! the field are removed and falling power-ups are checked against the
//! paddle. Spawns and removals are deferred until the ball scan is over so
//! the scan never sees a collection change under it.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::geometry::{Rect, bounce_off, circle_overlaps_rect, circle_rect_collision, validate_circle};
use super::objects::{BrickGrid, ObjectManager};
use super::state::{Ball, GameEvent, PowerupKind, Wall, WallSide};
use crate::consts::*;
use crate::error::SimError;
use crate::settings::Settings;
use crate::{rotate, velocity_from_bounce_angle};

/// Resolves all pairwise interactions for one sub-step
#[derive(Debug, Clone)]
pub struct CollisionEngine {
    rng: Pcg32,
    max_bounce_angle: f32,
    spawn_chance: f64,
    powerup_kinds: Vec<PowerupKind>,
    /// Sub-steps a caught `WidePaddle` lasts
    widen_substeps: u32,
}

impl CollisionEngine {
    pub fn new(settings: &Settings) -> Self {
        Self {
            rng: Pcg32::seed_from_u64(settings.seed),
            max_bounce_angle: settings.max_bounce_angle,
            spawn_chance: settings.powerup_spawn_chance.clamp(0.0, 1.0),
            powerup_kinds: settings.powerup_kinds.clone(),
            widen_substeps: settings.widen_substeps(),
        }
    }

    /// Resolve every collision for the current sub-step
    pub fn collide_all(&mut self, objects: &mut ObjectManager) -> Vec<GameEvent> {
        let mut events = Vec::new();
        // Deferred registry changes
        let mut spawns: Vec<(PowerupKind, Vec2)> = Vec::new();
        let mut lost: Vec<u32> = Vec::new();

        {
            let entities = objects.entities_mut();
            let paddle = entities.paddle.rect();
            let paddle = match paddle.validate("paddle") {
                Ok(()) => Some(paddle),
                Err(err) => {
                    log::warn!("Skipping paddle collisions: {}", err);
                    None
                }
            };

            for ball in entities.balls.iter_mut() {
                if let Err(err) = self.resolve_ball(
                    ball,
                    entities.walls,
                    paddle.as_ref(),
                    entities.bricks,
                    &mut events,
                    &mut spawns,
                ) {
                    log::warn!("Skipping collisions for ball {}: {}", ball.id, err);
                }

                if ball.top() > entities.field.height {
                    lost.push(ball.id);
                }
            }
        }

        for (kind, pos) in spawns {
            let id = objects.add_powerup(kind, pos);
            log::debug!("Power-up {:?} ({}) spawned at {}", kind, id, pos);
            events.push(GameEvent::PowerupSpawned { id, kind });
        }

        for id in lost {
            if objects.remove_ball(id).is_some() {
                log::debug!("Ball {} left the field", id);
                events.push(GameEvent::BallLost { ball: id });
            }
        }

        self.collect_powerups(objects, &mut events);
        events
    }

    /// Walls, then paddle, then at most one brick
    fn resolve_ball(
        &mut self,
        ball: &mut Ball,
        walls: &[Wall],
        paddle: Option<&Rect>,
        bricks: &mut BrickGrid,
        events: &mut Vec<GameEvent>,
        spawns: &mut Vec<(PowerupKind, Vec2)>,
    ) -> Result<(), SimError> {
        validate_circle("ball", ball.pos, ball.radius)?;

        for wall in walls {
            if let Err(err) = wall.rect.validate("wall") {
                log::warn!("Skipping {:?} wall: {}", wall.side, err);
                continue;
            }
            if resolve_wall(ball, wall) {
                events.push(GameEvent::WallBounce {
                    ball: ball.id,
                    side: wall.side,
                });
            }
        }

        if let Some(paddle) = paddle {
            if let Some(angle) = resolve_paddle(ball, paddle, self.max_bounce_angle) {
                events.push(GameEvent::PaddleBounce {
                    ball: ball.id,
                    angle,
                });
            }
        }

        if let Some((column, row, center)) = resolve_brick(ball, bricks) {
            log::debug!("Ball {} broke brick ({}, {})", ball.id, column, row);
            events.push(GameEvent::BrickBroken {
                ball: ball.id,
                column,
                row,
            });
            if let Some(kind) = self.roll_powerup() {
                spawns.push((kind, center));
            }
        }

        Ok(())
    }

    /// Decide whether a breaking brick drops a power-up, and which
    fn roll_powerup(&mut self) -> Option<PowerupKind> {
        if self.powerup_kinds.is_empty() || self.rng.random::<f64>() >= self.spawn_chance {
            return None;
        }
        let index = self.rng.random_range(0..self.powerup_kinds.len());
        Some(self.powerup_kinds[index])
    }

    /// Catch power-ups touching the paddle; drop those below the field
    fn collect_powerups(&mut self, objects: &mut ObjectManager, events: &mut Vec<GameEvent>) {
        let paddle = objects.paddle().rect();
        let paddle_ok = paddle.validate("paddle").is_ok();
        let bottom = objects.field().height;

        let mut caught = Vec::new();
        let mut missed = Vec::new();
        for powerup in objects.powerups() {
            let rect = powerup.rect();
            if paddle_ok && rect.overlaps(&paddle) {
                caught.push((powerup.id, powerup.kind));
            } else if rect.min.y > bottom {
                missed.push((powerup.id, powerup.kind));
            }
        }

        for (id, kind) in caught {
            if objects.remove_powerup(id).is_some() {
                log::debug!("Power-up {:?} ({}) caught", kind, id);
                apply_powerup(kind, objects, self.widen_substeps);
                events.push(GameEvent::PowerupCaught { id, kind });
            }
        }
        for (id, kind) in missed {
            if objects.remove_powerup(id).is_some() {
                events.push(GameEvent::PowerupMissed { id, kind });
            }
        }
    }
}

/// Reflect off a wall and park the ball just outside it
fn resolve_wall(ball: &mut Ball, wall: &Wall) -> bool {
    if !circle_overlaps_rect(ball.pos, ball.radius, &wall.rect) {
        return false;
    }
    match wall.side {
        WallSide::Left => {
            ball.vel.x = ball.vel.x.abs();
            ball.pos.x = wall.rect.max.x + ball.radius;
        }
        WallSide::Right => {
            ball.vel.x = -ball.vel.x.abs();
            ball.pos.x = wall.rect.min.x - ball.radius;
        }
        WallSide::Top => {
            ball.vel.y = ball.vel.y.abs();
            ball.pos.y = wall.rect.max.y + ball.radius;
        }
    }
    true
}

/// Bounce angle for an impact at `impact_x`: proportional to the offset
/// from the paddle center, normalized by half the width, clamped to
/// `[-max_angle, max_angle]`
pub fn bounce_angle(impact_x: f32, paddle: &Rect, max_angle: f32) -> f32 {
    let half_width = paddle.width() / 2.0;
    let offset = ((impact_x - paddle.center().x) / half_width).clamp(-1.0, 1.0);
    offset * max_angle
}

/// Redirect a descending ball off the paddle, keeping its speed
fn resolve_paddle(ball: &mut Ball, paddle: &Rect, max_angle: f32) -> Option<f32> {
    if ball.vel.y <= 0.0 || !circle_overlaps_rect(ball.pos, ball.radius, paddle) {
        return None;
    }
    let angle = bounce_angle(ball.pos.x, paddle, max_angle);
    ball.vel = velocity_from_bounce_angle(ball.speed(), angle);
    ball.pos.y = paddle.min.y - ball.radius;
    Some(angle)
}

/// Break the first active brick the ball overlaps, in scan order
fn resolve_brick(ball: &mut Ball, bricks: &mut BrickGrid) -> Option<(u32, u32, Vec2)> {
    for brick in bricks.iter_mut().filter(|b| b.is_active()) {
        if let Err(err) = brick.rect.validate("brick") {
            log::warn!("Skipping brick ({}, {}): {}", brick.column, brick.row, err);
            continue;
        }
        let hit = circle_rect_collision(ball.pos, ball.radius, &brick.rect);
        if !hit.hit {
            continue;
        }
        brick.broken = true;
        // A component already leaving the brick is kept as is
        ball.vel = bounce_off(ball.vel, hit.normal);
        return Some((brick.column, brick.row, brick.rect.center()));
    }
    None
}

/// Apply a caught power-up's effect
fn apply_powerup(kind: PowerupKind, objects: &mut ObjectManager, widen_substeps: u32) {
    match kind {
        PowerupKind::ExtraBall => {
            let (pos, vel, radius) = match objects.balls().first() {
                Some(ball) => (ball.pos, rotate(ball.vel, EXTRA_BALL_SPREAD), ball.radius),
                None => {
                    let paddle = objects.paddle();
                    (
                        Vec2::new(paddle.x, paddle.y - BALL_RADIUS),
                        Vec2::new(0.0, -BALL_START_SPEED),
                        BALL_RADIUS,
                    )
                }
            };
            objects.add_ball(pos, vel, radius);
        }
        PowerupKind::WidePaddle => objects.paddle_mut().widen(widen_substeps),
        PowerupKind::SlowBall => {
            for ball in objects.balls_mut() {
                ball.scale_speed(SLOW_FACTOR);
            }
        }
    }
}
