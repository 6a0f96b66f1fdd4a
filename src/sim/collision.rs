//! Collision detection between balls and the arena's static geometry
//!
//! Balls are circles; walls are straight segments with an inward normal; the
//! spinning bar is a segment with rounded thickness. Detection is discrete
//! (evaluated once per step, no sweep), which is fine while a ball moves much
//! less than its radius per tick.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::geometry::Segment;
use super::obstacle::SpinningBar;

/// Result of a collision check
#[derive(Debug, Clone)]
pub struct CollisionResult {
    /// Whether a collision occurred
    pub hit: bool,
    /// Contact point on the surface (if hit)
    pub point: Vec2,
    /// Unit surface normal, pointing toward the ball center
    pub normal: Vec2,
    /// Penetration depth (for position correction)
    pub penetration: f32,
}

impl CollisionResult {
    pub fn miss() -> Self {
        Self {
            hit: false,
            point: Vec2::ZERO,
            normal: Vec2::ZERO,
            penetration: 0.0,
        }
    }
}

/// A static arena wall
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Wall {
    pub segment: Segment,
    /// Unit normal pointing into the arena
    pub normal: Vec2,
}

/// The rectangular arena: four walls, fixed after construction
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Arena {
    pub min: Vec2,
    pub max: Vec2,
    walls: [Wall; 4],
}

impl Arena {
    pub fn new(left: f32, top: f32, width: f32, height: f32) -> Self {
        let min = Vec2::new(left, top);
        let max = Vec2::new(left + width, top + height);
        let top_left = min;
        let top_right = Vec2::new(max.x, min.y);
        let bottom_left = Vec2::new(min.x, max.y);
        let bottom_right = max;

        let walls = [
            Wall {
                segment: Segment::new(top_left, top_right),
                normal: Vec2::Y,
            },
            Wall {
                segment: Segment::new(bottom_left, bottom_right),
                normal: Vec2::NEG_Y,
            },
            Wall {
                segment: Segment::new(top_left, bottom_left),
                normal: Vec2::X,
            },
            Wall {
                segment: Segment::new(top_right, bottom_right),
                normal: Vec2::NEG_X,
            },
        ];

        Self { min, max, walls }
    }

    #[inline]
    pub fn walls(&self) -> &[Wall; 4] {
        &self.walls
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        (self.min + self.max) * 0.5
    }

    /// Whether a circle lies fully inside the arena
    pub fn contains_circle(&self, center: Vec2, radius: f32) -> bool {
        center.x - radius >= self.min.x
            && center.x + radius <= self.max.x
            && center.y - radius >= self.min.y
            && center.y + radius <= self.max.y
    }
}

/// Check a ball against one wall.
///
/// Walls span a full side of the arena, so the wall is treated as its
/// infinite line; the two walls meeting at a corner cover it together.
pub fn ball_wall_collision(ball_pos: Vec2, ball_radius: f32, wall: &Wall) -> CollisionResult {
    // Signed distance from the wall line, positive inside the arena
    let dist = (ball_pos - wall.segment.start).dot(wall.normal);
    if dist < ball_radius {
        return CollisionResult {
            hit: true,
            point: ball_pos - wall.normal * dist,
            normal: wall.normal,
            penetration: ball_radius - dist,
        };
    }
    CollisionResult::miss()
}

/// Check a ball against the spinning bar (a capsule of radius `half_width`)
pub fn ball_bar_collision(ball_pos: Vec2, ball_radius: f32, bar: &SpinningBar) -> CollisionResult {
    let segment = bar.segment();
    let closest = segment.closest_point(ball_pos);
    let reach = ball_radius + bar.half_width;
    let offset = ball_pos - closest;
    let dist_sq = offset.length_squared();

    if dist_sq >= reach * reach {
        return CollisionResult::miss();
    }

    let dist = dist_sq.sqrt();
    let normal = match offset.try_normalize() {
        Some(n) => n,
        None => {
            // Ball center sits on the centerline - push out sideways from the bar
            let along = (segment.end - segment.start).normalize_or_zero();
            let perp = along.perp();
            if perp == Vec2::ZERO { Vec2::Y } else { perp }
        }
    };

    CollisionResult {
        hit: true,
        point: closest + normal * bar.half_width,
        normal,
        penetration: reach - dist,
    }
}
