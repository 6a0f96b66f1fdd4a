//! Arena settings
//!
//! Every tunable of the simulation, loadable from a JSON file. Missing keys
//! fall back to the defaults in `consts`.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::ArenaError;

/// Arena tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArenaSettings {
    /// RNG seed for spawns and palette picks
    pub seed: u64,

    // === Arena ===
    pub arena_left: f32,
    pub arena_top: f32,
    pub arena_width: f32,
    pub arena_height: f32,
    /// Normal velocity kept after a bounce (0.0 - 1.0)
    pub restitution: f32,

    // === Fighters ===
    pub ball_radius: f32,
    pub sword_length: f32,
    pub max_population: usize,
    /// Spawn velocity components are drawn from [-spawn_speed, spawn_speed)
    pub spawn_speed: f32,
    /// Speed cap (px/s), applied to boosts and every physics step
    pub max_speed: f32,

    // === Combat ===
    pub sword_damage: u32,
    pub kill_bounty: u64,
    pub hit_flash_ticks: u32,

    // === Obstacle ===
    pub bar_length: f32,
    pub bar_width: f32,
    /// Radians per tick
    pub bar_speed: f32,

    // === Force field ===
    pub field_gain: f32,

    // === Host ===
    pub leaderboard_rows: usize,
}

impl Default for ArenaSettings {
    fn default() -> Self {
        Self {
            seed: 0x5eed_ba11,

            arena_left: ARENA_LEFT,
            arena_top: ARENA_TOP,
            arena_width: ARENA_WIDTH,
            arena_height: ARENA_HEIGHT,
            restitution: RESTITUTION,

            ball_radius: BALL_RADIUS,
            sword_length: SWORD_LENGTH,
            max_population: MAX_POPULATION,
            spawn_speed: SPAWN_SPEED,
            max_speed: BALL_MAX_SPEED,

            sword_damage: SWORD_DAMAGE,
            kill_bounty: KILL_BOUNTY,
            hit_flash_ticks: HIT_FLASH_TICKS,

            bar_length: BAR_LENGTH,
            bar_width: BAR_WIDTH,
            bar_speed: BAR_SPEED,

            field_gain: FIELD_GAIN,

            leaderboard_rows: LEADERBOARD_ROWS,
        }
    }
}

impl ArenaSettings {
    /// Parse and validate settings from a JSON string
    pub fn from_json_str(json: &str) -> Result<Self, ArenaError> {
        let settings: Self = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Read, parse and validate a settings file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ArenaError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Load settings, falling back to defaults on any failure
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match Self::load(path) {
            Ok(settings) => {
                log::info!("Loaded settings from {}", path.display());
                settings
            }
            Err(e) => {
                log::warn!("{e}; using default settings");
                Self::default()
            }
        }
    }

    /// Check that every value keeps the simulation well-formed
    pub fn validate(&self) -> Result<(), ArenaError> {
        positive("arena_width", self.arena_width)?;
        positive("arena_height", self.arena_height)?;
        positive("ball_radius", self.ball_radius)?;
        positive("sword_length", self.sword_length)?;
        positive("bar_length", self.bar_length)?;
        positive("max_speed", self.max_speed)?;
        non_negative("bar_width", self.bar_width)?;
        non_negative("spawn_speed", self.spawn_speed)?;
        non_negative("field_gain", self.field_gain)?;
        finite("arena_left", self.arena_left)?;
        finite("arena_top", self.arena_top)?;
        finite("bar_speed", self.bar_speed)?;

        if !(0.0..=1.0).contains(&self.restitution) {
            return Err(invalid("restitution", self.restitution, "a value in [0, 1]"));
        }
        if 2.0 * self.ball_radius >= self.arena_width.min(self.arena_height) {
            return Err(invalid(
                "ball_radius",
                self.ball_radius,
                "a diameter smaller than the arena",
            ));
        }
        if self.max_population == 0 {
            return Err(ArenaError::InvalidSetting {
                name: "max_population",
                value: "0".to_string(),
                expected: "at least 1",
            });
        }
        Ok(())
    }
}

fn invalid(name: &'static str, value: f32, expected: &'static str) -> ArenaError {
    ArenaError::InvalidSetting {
        name,
        value: value.to_string(),
        expected,
    }
}

fn finite(name: &'static str, value: f32) -> Result<(), ArenaError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(invalid(name, value, "a finite number"))
    }
}

fn positive(name: &'static str, value: f32) -> Result<(), ArenaError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(invalid(name, value, "a positive number"))
    }
}

fn non_negative(name: &'static str, value: f32) -> Result<(), ArenaError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(invalid(name, value, "zero or more"))
    }
}
