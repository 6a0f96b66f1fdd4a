//! Blade Arena - A live-audience sword-ball arena
//!
//! Core modules:
//! - `sim`: Deterministic simulation (physics, obstacle, combat, registry)
//! - `feed`: Host-side translation of live-feed events into commands
//! - `leaderboard`: Per-name score table
//! - `settings`: Data-driven arena tuning
//! - `error`: Crate error type

pub mod error;
pub mod feed;
pub mod leaderboard;
pub mod settings;
pub mod sim;

pub use error::ArenaError;
pub use leaderboard::Leaderboard;
pub use settings::ArenaSettings;

use glam::Vec2;

/// Arena configuration constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Window the arena is laid out in
    pub const VIEW_WIDTH: f32 = 800.0;
    pub const VIEW_HEIGHT: f32 = 600.0;
    /// Arena rectangle (90% of the view, centered)
    pub const ARENA_WIDTH: f32 = VIEW_WIDTH * 0.9;
    pub const ARENA_HEIGHT: f32 = VIEW_HEIGHT * 0.9;
    pub const ARENA_LEFT: f32 = (VIEW_WIDTH - ARENA_WIDTH) / 2.0;
    pub const ARENA_TOP: f32 = (VIEW_HEIGHT - ARENA_HEIGHT) / 2.0;

    /// Velocity kept along a surface normal after a bounce
    pub const RESTITUTION: f32 = 0.8;

    /// Fighter defaults
    pub const BALL_RADIUS: f32 = 20.0;
    pub const SWORD_LENGTH: f32 = BALL_RADIUS * 1.5;
    pub const MAX_HEALTH: u32 = 100;
    /// Each spawn velocity component is drawn from [-SPAWN_SPEED, SPAWN_SPEED)
    pub const SPAWN_SPEED: f32 = 100.0;
    /// Speed cap (px/s). Per-tick travel stays under a ball radius.
    pub const BALL_MAX_SPEED: f32 = 1000.0;
    /// Alive fighters allowed at once
    pub const MAX_POPULATION: usize = 50;

    /// Combat
    pub const SWORD_DAMAGE: u32 = 20;
    pub const KILL_BOUNTY: u64 = 10;
    pub const HIT_FLASH_TICKS: u32 = 10;

    /// Spinning bar obstacle
    pub const BAR_LENGTH: f32 = 100.0;
    pub const BAR_WIDTH: f32 = 10.0;
    /// Radians per tick
    pub const BAR_SPEED: f32 = 0.05;

    /// Force field is acceleration per second, applied as field * gain * dt
    pub const FIELD_GAIN: f32 = 60.0;
    pub const FIELD_LIMIT: f32 = 1.0;

    /// Velocity multiplier for a `!boost`
    pub const BOOST_FACTOR: f32 = 1.5;

    /// Leaderboard rows shown by hosts
    pub const LEADERBOARD_ROWS: usize = 5;
}

/// Wrap an angle into [0, 2π)
#[inline]
pub fn wrap_angle(angle: f32) -> f32 {
    use std::f32::consts::TAU;
    let wrapped = angle.rem_euclid(TAU);
    // rem_euclid can round up to exactly TAU for tiny negative inputs
    if wrapped >= TAU { 0.0 } else { wrapped }
}

/// Convert polar (r, theta) to cartesian (x, y)
#[inline]
pub fn polar_to_cartesian(r: f32, theta: f32) -> Vec2 {
    Vec2::new(r * theta.cos(), r * theta.sin())
}
