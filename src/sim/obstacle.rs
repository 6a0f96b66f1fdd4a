//! The spinning bar in the middle of the arena

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::geometry::Segment;
use crate::{polar_to_cartesian, wrap_angle};

/// Kinematic bar that rotates about its center at a fixed rate
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpinningBar {
    pub center: Vec2,
    /// Current angle (radians, in [0, 2π))
    angle: f32,
    /// Radians added every tick
    pub angular_speed: f32,
    pub half_length: f32,
    /// Half the bar's thickness; balls bounce off its rounded outline
    pub half_width: f32,
}

impl SpinningBar {
    pub fn new(center: Vec2, length: f32, width: f32, angular_speed: f32) -> Self {
        Self {
            center,
            angle: 0.0,
            angular_speed,
            half_length: length / 2.0,
            half_width: width / 2.0,
        }
    }

    #[inline]
    pub fn angle(&self) -> f32 {
        self.angle
    }

    /// Rotate by one tick's worth
    pub fn advance(&mut self) {
        self.angle = wrap_angle(self.angle + self.angular_speed);
    }

    /// The bar's centerline, from its +angle tip to the opposite tip
    pub fn segment(&self) -> Segment {
        let offset = polar_to_cartesian(self.half_length, self.angle);
        Segment::new(self.center + offset, self.center - offset)
    }

    /// Velocity of the bar surface at `point` when a tick lasts `dt` seconds
    pub fn surface_velocity(&self, point: Vec2, dt: f32) -> Vec2 {
        if dt <= 0.0 {
            return Vec2::ZERO;
        }
        let omega = self.angular_speed / dt;
        (point - self.center).perp() * omega
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::f32::consts::TAU;

    #[test]
    fn test_endpoints_follow_angle() {
        let mut bar = SpinningBar::new(Vec2::new(400.0, 300.0), 100.0, 10.0, std::f32::consts::FRAC_PI_2);
        let seg = bar.segment();
        assert!((seg.start - Vec2::new(450.0, 300.0)).length() < 1e-3);
        assert!((seg.end - Vec2::new(350.0, 300.0)).length() < 1e-3);

        bar.advance();
        let seg = bar.segment();
        assert!((seg.start - Vec2::new(400.0, 350.0)).length() < 1e-3);
        assert!((seg.end - Vec2::new(400.0, 250.0)).length() < 1e-3);
    }

    #[test]
    fn test_angle_wraps_after_full_turn() {
        let speed = 0.05;
        let mut bar = SpinningBar::new(Vec2::ZERO, 100.0, 10.0, speed);
        let n = 200; // 200 * 0.05 = 10 rad > 2π
        for _ in 0..n {
            bar.advance();
        }
        let expected = (n as f32 * speed) % TAU;
        assert!((bar.angle() - expected).abs() < 1e-3);
        assert!(bar.angle() >= 0.0 && bar.angle() < TAU);
    }

    #[test]
    fn test_surface_velocity_is_tangential() {
        let bar = SpinningBar::new(Vec2::ZERO, 100.0, 10.0, 0.05);
        let v = bar.surface_velocity(Vec2::new(50.0, 0.0), 1.0 / 60.0);
        assert!(v.x.abs() < 1e-4);
        // 0.05 rad/tick * 60 ticks/s * 50 = 150
        assert!((v.y - 150.0).abs() < 1e-2);
    }

    proptest! {
        #[test]
        fn angle_stays_in_range(speed in 0.0f32..1.0, ticks in 0usize..2000) {
            let mut bar = SpinningBar::new(Vec2::ZERO, 100.0, 10.0, speed);
            for _ in 0..ticks {
                bar.advance();
                prop_assert!(bar.angle() >= 0.0 && bar.angle() < TAU);
            }
        }
    }
}
