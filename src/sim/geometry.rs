//! Segment and circle geometry
//!
//! Pure functions shared by the physics step and the combat resolver.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// A line segment between two points
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub start: Vec2,
    pub end: Vec2,
}

impl Segment {
    pub fn new(start: Vec2, end: Vec2) -> Self {
        Self { start, end }
    }

    #[inline]
    pub fn length(&self) -> f32 {
        (self.end - self.start).length()
    }

    /// Closest point on this segment to `p`
    #[inline]
    pub fn closest_point(&self, p: Vec2) -> Vec2 {
        closest_point_on_segment(p, self.start, self.end)
    }

    /// Whether a circle touches this segment
    #[inline]
    pub fn hits_circle(&self, center: Vec2, radius: f32) -> bool {
        segment_hits_circle(self.start, self.end, center, radius)
    }
}

/// Closest point on segment `a`-`b` to `p`.
///
/// The projection is clamped to the segment, so points beyond either end
/// resolve to that endpoint.
pub fn closest_point_on_segment(p: Vec2, a: Vec2, b: Vec2) -> Vec2 {
    let line_vec = b - a;
    let len_sq = line_vec.length_squared();
    if len_sq == 0.0 {
        return a;
    }
    let t = ((p - a).dot(line_vec) / len_sq).clamp(0.0, 1.0);
    a + line_vec * t
}

/// Whether a circle overlaps segment `a`-`b` (touching counts).
///
/// A zero-length segment never hits.
pub fn segment_hits_circle(a: Vec2, b: Vec2, center: Vec2, radius: f32) -> bool {
    if (b - a).length_squared() == 0.0 {
        return false;
    }
    let closest = closest_point_on_segment(center, a, b);
    center.distance_squared(closest) <= radius * radius
}

/// Reflect a velocity off a surface, keeping `restitution` of the normal part.
///
/// `normal` must be unit length. Only the component along the normal changes:
/// v' = v - (1 + e)(v·n)n
#[inline]
pub fn reflect_with_restitution(velocity: Vec2, normal: Vec2, restitution: f32) -> Vec2 {
    velocity - (1.0 + restitution) * velocity.dot(normal) * normal
}

/// Unit direction and length of `v`, even when squaring a component would overflow
fn split_speed(v: Vec2) -> (Vec2, f32) {
    let m = v.abs().max_element();
    if m == 0.0 || !m.is_finite() {
        return (Vec2::ZERO, 0.0);
    }
    let scaled = v / m;
    let len = scaled.length();
    (scaled / len, len * m)
}

/// Cap the length of `v` at `max_speed`. Non-finite input becomes zero.
pub fn limit_speed(v: Vec2, max_speed: f32) -> Vec2 {
    if v.length_squared() <= max_speed * max_speed {
        return v;
    }
    let (dir, _) = split_speed(v);
    dir * max_speed
}

/// `v * factor` with the result capped at `max_speed`, without overflowing
/// for huge factors
pub fn scale_speed(v: Vec2, factor: f32, max_speed: f32) -> Vec2 {
    let scaled = v * factor;
    if scaled.is_finite() && scaled.length_squared() <= max_speed * max_speed {
        return scaled;
    }
    let (dir, speed) = split_speed(v);
    dir * factor.signum() * (speed * factor.abs()).min(max_speed)
}
