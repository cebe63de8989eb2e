//! Axis-aligned rectangle and circle geometry
//!
//! Everything the collision engine needs: overlap tests between a ball's
//! circle and an entity's rectangle, penetration depth per axis, and
//! velocity reflection. No internal state.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::error::SimError;

/// An axis-aligned rectangle (y grows downward, so `min` is the top-left)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub min: Vec2,
    pub max: Vec2,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            min: Vec2::new(x, y),
            max: Vec2::new(x + width, y + height),
        }
    }

    pub fn from_center(center: Vec2, size: Vec2) -> Self {
        let half = size * 0.5;
        Self {
            min: center - half,
            max: center + half,
        }
    }

    #[inline]
    pub fn width(&self) -> f32 {
        self.max.x - self.min.x
    }

    #[inline]
    pub fn height(&self) -> f32 {
        self.max.y - self.min.y
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        (self.min + self.max) * 0.5
    }

    /// Rectangle-rectangle overlap (touching edges do not count)
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.min.x < other.max.x
            && self.max.x > other.min.x
            && self.min.y < other.max.y
            && self.max.y > other.min.y
    }

    /// Closest point of the rectangle to `point`
    #[inline]
    pub fn closest_point(&self, point: Vec2) -> Vec2 {
        point.clamp(self.min, self.max)
    }

    /// Reject empty or non-finite rectangles
    pub fn validate(&self, entity: &'static str) -> Result<(), SimError> {
        if !(self.min.is_finite() && self.max.is_finite()) {
            return Err(SimError::geometry(entity, "non-finite rectangle"));
        }
        if self.width() <= 0.0 || self.height() <= 0.0 {
            return Err(SimError::geometry(
                entity,
                format!("non-positive size {}x{}", self.width(), self.height()),
            ));
        }
        Ok(())
    }
}

/// Reject zero, negative or non-finite radii and positions
pub fn validate_circle(entity: &'static str, center: Vec2, radius: f32) -> Result<(), SimError> {
    if !center.is_finite() {
        return Err(SimError::geometry(entity, "non-finite position"));
    }
    if !(radius.is_finite() && radius > 0.0) {
        return Err(SimError::geometry(
            entity,
            format!("non-positive radius {radius}"),
        ));
    }
    Ok(())
}

/// Result of a circle-rectangle check
#[derive(Debug, Clone)]
pub struct CollisionResult {
    /// Whether a collision occurred
    pub hit: bool,
    /// Axis-aligned normal of the shallowest side, pointing toward the ball
    pub normal: Vec2,
    /// Penetration depth along `normal`
    pub penetration: f32,
}

impl CollisionResult {
    pub fn miss() -> Self {
        Self {
            hit: false,
            normal: Vec2::ZERO,
            penetration: 0.0,
        }
    }
}

/// Does the circle overlap the rectangle? Touching at exactly `radius`
/// does not count, so a ball placed flush against a surface stays clear.
#[inline]
pub fn circle_overlaps_rect(center: Vec2, radius: f32, rect: &Rect) -> bool {
    center.distance_squared(rect.closest_point(center)) < radius * radius
}

/// Overlap of the circle's bounding box with the rectangle on each axis
pub fn penetration_depth(center: Vec2, radius: f32, rect: &Rect) -> Vec2 {
    let x = (center.x + radius - rect.min.x).min(rect.max.x - (center.x - radius));
    let y = (center.y + radius - rect.min.y).min(rect.max.y - (center.y - radius));
    Vec2::new(x.max(0.0), y.max(0.0))
}

/// Check collision between a ball and a rectangle
///
/// The normal is chosen along the axis with the smaller penetration, which
/// tells a side hit apart from a top/bottom hit.
pub fn circle_rect_collision(center: Vec2, radius: f32, rect: &Rect) -> CollisionResult {
    if !circle_overlaps_rect(center, radius, rect) {
        return CollisionResult::miss();
    }

    let depth = penetration_depth(center, radius, rect);
    let rect_center = rect.center();
    let (normal, penetration) = if depth.x < depth.y {
        let sign = if center.x < rect_center.x { -1.0 } else { 1.0 };
        (Vec2::new(sign, 0.0), depth.x)
    } else {
        let sign = if center.y < rect_center.y { -1.0 } else { 1.0 };
        (Vec2::new(0.0, sign), depth.y)
    };

    CollisionResult {
        hit: true,
        normal,
        penetration,
    }
}

/// Reflect velocity off a surface
///
/// Standard reflection: v' = v - 2(v·n)n
#[inline]
pub fn reflect_velocity(velocity: Vec2, normal: Vec2) -> Vec2 {
    velocity - 2.0 * velocity.dot(normal) * normal
}

/// Send the velocity away from the surface along an axis-aligned normal.
///
/// Unlike [`reflect_velocity`] this never turns a ball back into a surface
/// it is already leaving.
#[inline]
pub fn bounce_off(velocity: Vec2, normal: Vec2) -> Vec2 {
    if velocity.dot(normal) < 0.0 {
        reflect_velocity(velocity, normal)
    } else {
        velocity
    }
}
