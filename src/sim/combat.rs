//! Sword combat
//!
//! Every tick, each unordered pair of fighters alive at the start of the
//! tick gets two directed checks: A's sword against B's body and B's sword
//! against A's. Damage lands immediately; eliminations are collected and
//! applied once the whole scan is done, so a fighter killed mid-scan still
//! swings for the rest of this tick.

use glam::Vec2;
use serde::Serialize;

use super::entity::{EntityId, weapon_segment};
use super::geometry::Segment;
use super::physics::PhysicsWorld;
use super::registry::EntityRegistry;

/// Damage and scoring constants
#[derive(Debug, Clone, Copy)]
pub struct CombatRules {
    pub sword_length: f32,
    pub damage: u32,
    pub bounty: u64,
    pub hit_flash_ticks: u32,
}

/// Something that happened during combat resolution
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum CombatEvent {
    /// A sword connected; `health` is the target's health afterwards
    Hit {
        attacker: EntityId,
        target: EntityId,
        health: u32,
    },
    /// `target` was taken out and `attacker` earned the bounty
    Eliminated {
        attacker: EntityId,
        target: EntityId,
        bounty: u64,
    },
}

/// Position, size and sword of a fighter, captured before any damage lands
struct Combatant {
    id: EntityId,
    pos: Vec2,
    radius: f32,
    sword: Segment,
}

/// Resolve all sword hits for one tick
pub fn resolve_combat(
    registry: &mut EntityRegistry,
    world: &mut PhysicsWorld,
    rules: &CombatRules,
) -> Vec<CombatEvent> {
    let mut combatants = Vec::with_capacity(registry.alive_count());
    for id in registry.alive_ids() {
        let Some(fighter) = registry.get_mut(id) else {
            continue;
        };
        fighter.tick_flash();
        let Some(body) = fighter.body_handle().and_then(|h| world.body(h)) else {
            continue;
        };
        combatants.push(Combatant {
            id,
            pos: body.pos,
            radius: body.radius,
            sword: weapon_segment(body, rules.sword_length),
        });
    }

    let mut events = Vec::new();
    let mut kills: Vec<(EntityId, EntityId)> = Vec::new();

    for (i, a) in combatants.iter().enumerate() {
        for b in &combatants[i + 1..] {
            for (attacker, target) in [(a, b), (b, a)] {
                if !attacker.sword.hits_circle(target.pos, target.radius) {
                    continue;
                }
                let Some(victim) = registry.get_mut(target.id) else {
                    continue;
                };
                let lethal = victim.take_damage(rules.damage, rules.hit_flash_ticks);
                events.push(CombatEvent::Hit {
                    attacker: attacker.id,
                    target: target.id,
                    health: victim.health,
                });
                if lethal {
                    kills.push((attacker.id, target.id));
                }
            }
        }
    }

    for (attacker, target) in kills {
        if registry.eliminate(world, target) {
            registry.award(attacker, rules.bounty);
            log::info!(
                "Fighter #{target} eliminated by #{attacker} (+{} points)",
                rules.bounty
            );
            events.push(CombatEvent::Eliminated {
                attacker,
                target,
                bounty: rules.bounty,
            });
        }
    }

    events
}
