//! Entity registry: every fighter ever spawned, plus the name leaderboard

use glam::Vec2;
use rand::Rng;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::entity::{EntityId, Fighter, PALETTE, Rgb};
use super::geometry::limit_speed;
use super::physics::{Body, PhysicsWorld};
use crate::error::{ArenaError, require_finite};
use crate::leaderboard::Leaderboard;

/// Spawn limits and initial motion
#[derive(Debug, Clone, Copy)]
pub struct SpawnRules {
    pub max_population: usize,
    pub radius: f32,
    /// Velocity components are drawn from [-spawn_speed, spawn_speed)
    pub spawn_speed: f32,
}

/// Owns fighters and their lifecycle. Fighters are stored in id order and
/// never removed, so eliminated ones keep their name and score.
#[derive(Debug, Clone)]
pub struct EntityRegistry {
    rules: SpawnRules,
    fighters: Vec<Fighter>,
    leaderboard: Leaderboard,
    rng: Pcg32,
    next_id: EntityId,
    alive: usize,
}

impl EntityRegistry {
    pub fn new(rules: SpawnRules, seed: u64) -> Self {
        Self {
            rules,
            fighters: Vec::new(),
            leaderboard: Leaderboard::new(),
            rng: Pcg32::seed_from_u64(seed),
            next_id: 1,
            alive: 0,
        }
    }

    /// Spawn a fighter at a random spot inside the arena.
    ///
    /// Returns None when the alive population is already at the cap.
    pub fn spawn(&mut self, world: &mut PhysicsWorld, name: &str, color: Option<Rgb>) -> Option<EntityId> {
        if self.is_full() {
            log::debug!("Spawn for {name} dropped: arena full ({} alive)", self.alive);
            return None;
        }

        let r = self.rules.radius;
        let (min, max) = (world.arena.min, world.arena.max);
        let pos = Vec2::new(
            random_between(&mut self.rng, min.x + r, max.x - r),
            random_between(&mut self.rng, min.y + r, max.y - r),
        );
        let speed = self.rules.spawn_speed;
        let vel = Vec2::new(
            random_between(&mut self.rng, -speed, speed),
            random_between(&mut self.rng, -speed, speed),
        );
        let color = color.unwrap_or_else(|| PALETTE[self.rng.random_range(0..PALETTE.len())]);

        self.spawn_at(world, name, color, pos, vel)
    }

    /// Spawn a fighter with an exact position and velocity.
    ///
    /// Same population cap as `spawn`. Non-finite input is rejected. The
    /// position is clamped so the ball starts inside the arena, and the
    /// velocity is capped at the world's `max_speed`.
    pub fn spawn_at(
        &mut self,
        world: &mut PhysicsWorld,
        name: &str,
        color: Rgb,
        pos: Vec2,
        vel: Vec2,
    ) -> Option<EntityId> {
        if self.is_full() {
            log::debug!("Spawn for {name} dropped: arena full ({} alive)", self.alive);
            return None;
        }
        let (pos, vel) = match (finite_vec("spawn position", pos), finite_vec("spawn velocity", vel)) {
            (Ok(pos), Ok(vel)) => (pos, vel),
            (Err(e), _) | (_, Err(e)) => {
                log::warn!("Spawn for {name} rejected: {e}");
                return None;
            }
        };
        let inset = Vec2::splat(self.rules.radius);
        let pos = pos.clamp(world.arena.min + inset, world.arena.max - inset);
        let vel = limit_speed(vel, world.max_speed);

        let id = self.next_id;
        self.next_id += 1;
        let handle = world.add_body(Body::new(pos, vel, self.rules.radius));
        self.fighters.push(Fighter::new(id, name, color, handle));
        self.leaderboard.register(name);
        self.alive += 1;

        log::info!("{name} spawned fighter #{id} at ({:.0}, {:.0})", pos.x, pos.y);
        Some(id)
    }

    #[inline]
    pub fn is_full(&self) -> bool {
        self.alive >= self.rules.max_population
    }

    #[inline]
    pub fn alive_count(&self) -> usize {
        self.alive
    }

    /// Every fighter ever spawned, in id order
    #[inline]
    pub fn fighters(&self) -> &[Fighter] {
        &self.fighters
    }

    #[inline]
    pub fn leaderboard(&self) -> &Leaderboard {
        &self.leaderboard
    }

    pub fn get(&self, id: EntityId) -> Option<&Fighter> {
        let idx = self.index_of(id)?;
        Some(&self.fighters[idx])
    }

    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut Fighter> {
        let idx = self.index_of(id)?;
        Some(&mut self.fighters[idx])
    }

    /// Alive fighters spawned under `name`. A name can own several at once.
    pub fn find_alive_by_name<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Fighter> + 'a {
        self.fighters.iter().filter(move |f| f.alive && f.name == name)
    }

    /// Mutable variant of `find_alive_by_name`
    pub fn find_alive_by_name_mut<'a>(
        &'a mut self,
        name: &'a str,
    ) -> impl Iterator<Item = &'a mut Fighter> + 'a {
        self.fighters.iter_mut().filter(move |f| f.alive && f.name == name)
    }

    /// Ids of every alive fighter, in id order
    pub fn alive_ids(&self) -> Vec<EntityId> {
        self.fighters.iter().filter(|f| f.alive).map(|f| f.id).collect()
    }

    /// Take a fighter out of play. Idempotent: returns true only for the
    /// call that actually eliminated it.
    pub fn eliminate(&mut self, world: &mut PhysicsWorld, id: EntityId) -> bool {
        let Some(idx) = self.index_of(id) else {
            return false;
        };
        let fighter = &mut self.fighters[idx];
        if !fighter.alive {
            return false;
        }

        fighter.alive = false;
        fighter.health = 0;
        fighter.hit_flash = 0;
        if let Some(handle) = fighter.body.take() {
            if let Some(body) = world.remove_body(handle) {
                fighter.final_pos = Some(body.pos);
            }
        }
        self.alive -= 1;
        true
    }

    /// Credit bounty points to a fighter and its name on the leaderboard
    pub fn award(&mut self, id: EntityId, points: u64) {
        let Some(idx) = self.index_of(id) else {
            return;
        };
        let fighter = &mut self.fighters[idx];
        fighter.score = fighter.score.saturating_add(points);
        self.leaderboard.award(&fighter.name, points);
    }

    fn index_of(&self, id: EntityId) -> Option<usize> {
        self.fighters.binary_search_by_key(&id, |f| f.id).ok()
    }
}

fn finite_vec(field: &'static str, v: Vec2) -> Result<Vec2, ArenaError> {
    require_finite(field, v.x)?;
    require_finite(field, v.y)?;
    Ok(v)
}

/// Uniform sample from [lo, hi), or `lo` when the range is empty
fn random_between(rng: &mut Pcg32, lo: f32, hi: f32) -> f32 {
    if hi > lo { rng.random_range(lo..hi) } else { lo }
}
