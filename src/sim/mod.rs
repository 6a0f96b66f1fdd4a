//! Deterministic simulation module
//!
//! All arena logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (by entity ID)
//! - No rendering, feed or platform dependencies

pub mod collision;
pub mod combat;
pub mod command;
pub mod entity;
pub mod geometry;
pub mod obstacle;
pub mod physics;
pub mod registry;
pub mod snapshot;
pub mod state;
pub mod tick;

pub use collision::{Arena, CollisionResult, Wall, ball_bar_collision, ball_wall_collision};
pub use combat::{CombatEvent, CombatRules, resolve_combat};
pub use command::Command;
pub use entity::{EntityId, Fighter, PALETTE, Rgb, weapon_segment};
pub use geometry::{Segment, closest_point_on_segment, reflect_with_restitution, segment_hits_circle};
pub use obstacle::SpinningBar;
pub use physics::{Body, BodyHandle, PhysicsWorld};
pub use registry::{EntityRegistry, SpawnRules};
pub use snapshot::{FighterView, RenderState};
pub use state::ArenaState;
pub use tick::{FixedStep, TickInput, tick};
