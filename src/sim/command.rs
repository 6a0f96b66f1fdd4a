//! Typed commands from outside the simulation
//!
//! Hosts translate whatever their input source is (live feed, keyboard,
//! scripts) into these. They are applied at tick boundaries only.

use serde::{Deserialize, Serialize};

use super::entity::Rgb;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Command {
    /// Spawn a fighter for `name`; a random palette color if `color` is None
    Spawn { name: String, color: Option<Rgb> },
    /// Multiply the velocity of every alive fighter owned by `name`
    Boost { name: String, factor: f32 },
    /// Recolor every alive fighter owned by `name`
    SetColor { name: String, color: Rgb },
    /// Set the global force field (clamped to [-1, 1])
    SetGravity { value: f32 },
}
