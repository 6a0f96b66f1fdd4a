//! Physics world: ball bodies, arena walls, the spinning bar and the force field
//!
//! Bodies live in a generational slot array. A handle stays valid until its
//! body is removed; removing the same handle again is a no-op.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::{Arena, ball_bar_collision, ball_wall_collision};
use super::geometry::{limit_speed, reflect_with_restitution};
use super::obstacle::SpinningBar;
use crate::consts::{BALL_MAX_SPEED, FIELD_LIMIT};
use crate::error::{ArenaError, require_finite};

/// Handle to a body in the physics world
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BodyHandle {
    index: u32,
    generation: u32,
}

/// A dynamic ball body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Body {
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    /// Last nonzero direction of travel (unit length)
    heading: Vec2,
}

impl Body {
    pub fn new(pos: Vec2, vel: Vec2, radius: f32) -> Self {
        Self {
            pos,
            vel,
            radius,
            heading: vel.try_normalize().unwrap_or(Vec2::X),
        }
    }

    /// Unit direction the ball faces: its velocity, or the last direction it
    /// moved in while stopped. A ball that never moved faces +X.
    #[inline]
    pub fn facing(&self) -> Vec2 {
        self.vel.try_normalize().unwrap_or(self.heading)
    }

    fn remember_heading(&mut self) {
        if let Some(dir) = self.vel.try_normalize() {
            self.heading = dir;
        }
    }
}

#[derive(Debug, Clone)]
struct Slot {
    generation: u32,
    body: Option<Body>,
}

/// Owns every body and the static/kinematic geometry they bounce off
#[derive(Debug, Clone)]
pub struct PhysicsWorld {
    pub arena: Arena,
    pub obstacle: SpinningBar,
    /// Normal velocity kept after a bounce
    pub restitution: f32,
    /// Field acceleration per second is `field * field_gain`
    pub field_gain: f32,
    /// Speed cap applied before integration (px/s)
    pub max_speed: f32,
    field: f32,
    slots: Vec<Slot>,
    free: Vec<u32>,
    live: usize,
}

impl PhysicsWorld {
    pub fn new(arena: Arena, obstacle: SpinningBar, restitution: f32, field_gain: f32) -> Self {
        Self {
            arena,
            obstacle,
            restitution,
            field_gain,
            max_speed: BALL_MAX_SPEED,
            field: 0.0,
            slots: Vec::new(),
            free: Vec::new(),
            live: 0,
        }
    }

    /// Add a body, reusing a free slot when one exists
    pub fn add_body(&mut self, body: Body) -> BodyHandle {
        self.live += 1;
        if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index as usize];
            slot.body = Some(body);
            return BodyHandle {
                index,
                generation: slot.generation,
            };
        }
        let index = self.slots.len() as u32;
        self.slots.push(Slot {
            generation: 0,
            body: Some(body),
        });
        BodyHandle {
            index,
            generation: 0,
        }
    }

    /// Remove a body. Returns None if the handle was already removed.
    pub fn remove_body(&mut self, handle: BodyHandle) -> Option<Body> {
        let slot = self.slots.get_mut(handle.index as usize)?;
        if slot.generation != handle.generation {
            return None;
        }
        let body = slot.body.take()?;
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(handle.index);
        self.live -= 1;
        Some(body)
    }

    pub fn body(&self, handle: BodyHandle) -> Option<&Body> {
        let slot = self.slots.get(handle.index as usize)?;
        if slot.generation != handle.generation {
            return None;
        }
        slot.body.as_ref()
    }

    pub fn body_mut(&mut self, handle: BodyHandle) -> Option<&mut Body> {
        let slot = self.slots.get_mut(handle.index as usize)?;
        if slot.generation != handle.generation {
            return None;
        }
        slot.body.as_mut()
    }

    /// Number of bodies currently simulated
    #[inline]
    pub fn body_count(&self) -> usize {
        self.live
    }

    #[inline]
    pub fn field(&self) -> f32 {
        self.field
    }

    /// Set the global force field, clamped to [-1, 1]. Returns the stored value.
    ///
    /// NaN and infinities are rejected and leave the field unchanged.
    pub fn set_field(&mut self, value: f32) -> Result<f32, ArenaError> {
        let value = require_finite("gravity field", value)?;
        self.field = value.clamp(-FIELD_LIMIT, FIELD_LIMIT);
        Ok(self.field)
    }

    /// Advance every body by `dt` seconds.
    ///
    /// Order per body: force field, speed cap, integration, wall bounces,
    /// bar bounce.
    pub fn step(&mut self, dt: f32) {
        let field_dv = Vec2::new(0.0, self.field * self.field_gain * dt);
        let arena = &self.arena;
        let obstacle = &self.obstacle;
        let restitution = self.restitution;
        let max_speed = self.max_speed;

        for body in self.slots.iter_mut().filter_map(|s| s.body.as_mut()) {
            body.vel = limit_speed(body.vel + field_dv, max_speed);
            body.pos += body.vel * dt;

            for wall in arena.walls() {
                let result = ball_wall_collision(body.pos, body.radius, wall);
                if !result.hit {
                    continue;
                }
                body.pos += result.normal * result.penetration;
                if body.vel.dot(result.normal) < 0.0 {
                    body.vel = reflect_with_restitution(body.vel, result.normal, restitution);
                }
            }

            let result = ball_bar_collision(body.pos, body.radius, obstacle);
            if result.hit {
                body.pos += result.normal * result.penetration;
                // Bounce relative to the moving bar surface
                let surface_vel = obstacle.surface_velocity(result.point, dt);
                let rel = body.vel - surface_vel;
                if rel.dot(result.normal) < 0.0 {
                    body.vel = surface_vel + reflect_with_restitution(rel, result.normal, restitution);
                }
            }

            body.remember_heading();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::*;

    fn world() -> PhysicsWorld {
        let arena = Arena::new(ARENA_LEFT, ARENA_TOP, ARENA_WIDTH, ARENA_HEIGHT);
        let bar = SpinningBar::new(arena.center(), BAR_LENGTH, BAR_WIDTH, BAR_SPEED);
        PhysicsWorld::new(arena, bar, RESTITUTION, FIELD_GAIN)
    }

    #[test]
    fn test_add_and_remove_is_idempotent() {
        let mut world = world();
        let handle = world.add_body(Body::new(Vec2::new(100.0, 100.0), Vec2::ZERO, 20.0));
        assert_eq!(world.body_count(), 1);

        assert!(world.remove_body(handle).is_some());
        assert!(world.remove_body(handle).is_none());
        assert_eq!(world.body_count(), 0);
        assert!(world.body(handle).is_none());
    }

    #[test]
    fn test_stale_handle_does_not_alias_reused_slot() {
        let mut world = world();
        let old = world.add_body(Body::new(Vec2::new(100.0, 100.0), Vec2::ZERO, 20.0));
        world.remove_body(old);
        let new = world.add_body(Body::new(Vec2::new(200.0, 200.0), Vec2::ZERO, 20.0));

        assert_ne!(old, new);
        assert!(world.body(old).is_none());
        assert!(world.remove_body(old).is_none());
        assert_eq!(world.body(new).unwrap().pos, Vec2::new(200.0, 200.0));
    }

    #[test]
    fn test_integrates_velocity() {
        let mut world = world();
        let h = world.add_body(Body::new(Vec2::new(100.0, 100.0), Vec2::new(60.0, -30.0), 20.0));
        world.step(SIM_DT);
        let body = world.body(h).unwrap();
        assert!((body.pos - Vec2::new(101.0, 99.5)).length() < 1e-3);
    }

    #[test]
    fn test_wall_bounce_applies_restitution() {
        let mut world = world();
        // Right wall at x = 760; ball edge reaches it this step
        let h = world.add_body(Body::new(Vec2::new(739.5, 300.0), Vec2::new(60.0, 0.0), 20.0));
        world.step(SIM_DT);
        let body = world.body(h).unwrap();
        assert!((body.vel.x - (-48.0)).abs() < 1e-3);
        assert!(body.pos.x + body.radius <= ARENA_LEFT + ARENA_WIDTH + 1e-3);
    }

    #[test]
    fn test_bar_bounce_pushes_ball_out() {
        let mut world = world();
        let center = world.arena.center();
        // Falling onto the bar from above, near its middle
        let h = world.add_body(Body::new(center + Vec2::new(2.0, -26.0), Vec2::new(0.0, 120.0), 20.0));
        world.step(SIM_DT);
        let body = world.body(h).unwrap();
        assert!(body.vel.y < 0.0);
        let closest = world.obstacle.segment().closest_point(body.pos);
        assert!(body.pos.distance(closest) >= body.radius + world.obstacle.half_width - 1e-3);
    }

    #[test]
    fn test_field_clamps_and_rejects_nan() {
        let mut world = world();
        assert_eq!(world.set_field(5.0).unwrap(), 1.0);
        assert_eq!(world.set_field(-5.0).unwrap(), -1.0);
        assert_eq!(world.set_field(0.25).unwrap(), 0.25);
        assert!(world.set_field(f32::NAN).is_err());
        assert_eq!(world.field(), 0.25);
    }

    #[test]
    fn test_field_accelerates_per_second() {
        let mut world = world();
        world.set_field(0.5).unwrap();
        let h = world.add_body(Body::new(Vec2::new(100.0, 100.0), Vec2::ZERO, 20.0));
        for _ in 0..60 {
            world.step(SIM_DT);
        }
        // 0.5 * 60 px/s² for one second
        assert!((world.body(h).unwrap().vel.y - 30.0).abs() < 1e-2);
    }

    #[test]
    fn test_step_caps_speed() {
        let mut world = world();
        let h = world.add_body(Body::new(Vec2::new(100.0, 300.0), Vec2::new(1e30, 0.0), 20.0));
        world.step(SIM_DT);
        let body = world.body(h).unwrap();
        assert!(body.vel.length() <= BALL_MAX_SPEED + 1e-2);
        assert!(body.pos.is_finite());
        assert!(world.arena.contains_circle(body.pos, body.radius - 1e-2));
    }

    #[test]
    fn test_heading_survives_stop() {
        let mut body = Body::new(Vec2::ZERO, Vec2::new(0.0, -5.0), 20.0);
        assert_eq!(body.facing(), Vec2::NEG_Y);
        body.vel = Vec2::ZERO;
        assert_eq!(body.facing(), Vec2::NEG_Y);

        let still = Body::new(Vec2::ZERO, Vec2::ZERO, 20.0);
        assert_eq!(still.facing(), Vec2::X);
    }
}
