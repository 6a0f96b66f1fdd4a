//! Read-only view of the arena for renderers and leaderboards

use glam::Vec2;
use serde::Serialize;

use super::entity::{EntityId, Rgb};
use super::geometry::Segment;
use crate::leaderboard::LeaderboardEntry;

/// One fighter as a renderer sees it
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FighterView {
    pub id: EntityId,
    pub name: String,
    pub color: Rgb,
    /// Current position, or where it fell if eliminated
    pub pos: Vec2,
    pub radius: f32,
    pub health: u32,
    pub alive: bool,
    pub hit_flash: u32,
    /// None once eliminated
    pub weapon: Option<Segment>,
}

/// Snapshot of everything drawable after a tick
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderState {
    pub tick: u64,
    pub arena_min: Vec2,
    pub arena_max: Vec2,
    pub obstacle: Segment,
    pub obstacle_width: f32,
    pub gravity_field: f32,
    /// Every fighter ever spawned, in id order
    pub fighters: Vec<FighterView>,
    /// Highest scores first
    pub leaderboard: Vec<LeaderboardEntry>,
}

impl RenderState {
    /// Fighters still in play
    pub fn alive(&self) -> impl Iterator<Item = &FighterView> {
        self.fighters.iter().filter(|f| f.alive)
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}
