//! Fighters: sword-carrying balls and their combat state

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::geometry::Segment;
use super::physics::{Body, BodyHandle};
use crate::consts::MAX_HEALTH;

/// Stable id for a spawned fighter (ids are never reused)
pub type EntityId = u32;

/// 8-bit RGB color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const RED: Rgb = Rgb::new(255, 0, 0);
    pub const GREEN: Rgb = Rgb::new(0, 255, 0);
    pub const BLUE: Rgb = Rgb::new(0, 0, 255);
    pub const YELLOW: Rgb = Rgb::new(255, 255, 0);
    pub const PURPLE: Rgb = Rgb::new(255, 0, 255);
    pub const CYAN: Rgb = Rgb::new(0, 255, 255);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Look up one of the named palette colors
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "red" => Some(Rgb::RED),
            "blue" => Some(Rgb::BLUE),
            "green" => Some(Rgb::GREEN),
            "yellow" => Some(Rgb::YELLOW),
            "purple" => Some(Rgb::PURPLE),
            "cyan" => Some(Rgb::CYAN),
            _ => None,
        }
    }
}

/// Colors handed out to fighters spawned without one
pub const PALETTE: [Rgb; 6] = [
    Rgb::RED,
    Rgb::GREEN,
    Rgb::BLUE,
    Rgb::YELLOW,
    Rgb::PURPLE,
    Rgb::CYAN,
];

/// A fighter
#[derive(Debug, Clone, Serialize)]
pub struct Fighter {
    pub id: EntityId,
    /// Name of whoever spawned it; commands target fighters by name
    pub name: String,
    pub color: Rgb,
    /// In [0, 100]; only ever goes down
    pub health: u32,
    /// Once false, never true again
    pub alive: bool,
    /// Bounty points earned by this fighter
    pub score: u64,
    /// Ticks left on the "just got hit" marker
    pub hit_flash: u32,
    /// Physics body while alive
    #[serde(skip)]
    pub(crate) body: Option<BodyHandle>,
    /// Where the fighter was when it was eliminated
    pub final_pos: Option<Vec2>,
}

impl Fighter {
    pub fn new(id: EntityId, name: &str, color: Rgb, body: BodyHandle) -> Self {
        Self {
            id,
            name: name.to_string(),
            color,
            health: MAX_HEALTH,
            alive: true,
            score: 0,
            hit_flash: 0,
            body: Some(body),
            final_pos: None,
        }
    }

    #[inline]
    pub fn body_handle(&self) -> Option<BodyHandle> {
        self.body
    }

    /// Apply sword damage. Returns true if this hit is the one that brought
    /// health to zero.
    pub fn take_damage(&mut self, damage: u32, flash_ticks: u32) -> bool {
        let before = self.health;
        self.health = self.health.saturating_sub(damage);
        self.hit_flash = flash_ticks;
        before > 0 && self.health == 0
    }

    /// Count the hit marker down by one tick
    pub fn tick_flash(&mut self) {
        self.hit_flash = self.hit_flash.saturating_sub(1);
    }
}

/// The sword: from the ball's center out along its facing direction
pub fn weapon_segment(body: &Body, sword_length: f32) -> Segment {
    Segment::new(body.pos, body.pos + body.facing() * sword_length)
}
