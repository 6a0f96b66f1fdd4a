//! Arena state and the operations hosts call on it
//!
//! All mutable simulation state lives in `ArenaState` and is owned by the
//! simulation thread. Commands mutate it between ticks only.

use glam::Vec2;

use super::collision::Arena;
use super::combat::{CombatEvent, CombatRules};
use super::command::Command;
use super::entity::{EntityId, Fighter, Rgb, weapon_segment};
use super::geometry::scale_speed;
use super::obstacle::SpinningBar;
use super::physics::PhysicsWorld;
use super::registry::{EntityRegistry, SpawnRules};
use super::snapshot::{FighterView, RenderState};
use crate::error::{ArenaError, require_finite};
use crate::leaderboard::Leaderboard;
use crate::settings::ArenaSettings;

/// Complete arena state
#[derive(Debug, Clone)]
pub struct ArenaState {
    pub settings: ArenaSettings,
    /// Simulation tick counter
    pub time_ticks: u64,
    pub world: PhysicsWorld,
    pub registry: EntityRegistry,
    pub combat: CombatRules,
    /// Combat events from the most recent tick
    pub last_events: Vec<CombatEvent>,
}

impl ArenaState {
    /// Build an empty arena from settings
    pub fn new(settings: ArenaSettings) -> Self {
        let arena = Arena::new(
            settings.arena_left,
            settings.arena_top,
            settings.arena_width,
            settings.arena_height,
        );
        let bar = SpinningBar::new(
            arena.center(),
            settings.bar_length,
            settings.bar_width,
            settings.bar_speed,
        );
        let mut world = PhysicsWorld::new(arena, bar, settings.restitution, settings.field_gain);
        world.max_speed = settings.max_speed;
        let registry = EntityRegistry::new(
            SpawnRules {
                max_population: settings.max_population,
                radius: settings.ball_radius,
                spawn_speed: settings.spawn_speed,
            },
            settings.seed,
        );
        let combat = CombatRules {
            sword_length: settings.sword_length,
            damage: settings.sword_damage,
            bounty: settings.kill_bounty,
            hit_flash_ticks: settings.hit_flash_ticks,
        };

        Self {
            settings,
            time_ticks: 0,
            world,
            registry,
            combat,
            last_events: Vec::new(),
        }
    }

    /// Arena with default settings and the given seed
    pub fn with_seed(seed: u64) -> Self {
        Self::new(ArenaSettings {
            seed,
            ..ArenaSettings::default()
        })
    }

    /// Spawn a fighter at a random spot. None at the population cap.
    pub fn spawn(&mut self, name: &str, color: Option<Rgb>) -> Option<EntityId> {
        self.registry.spawn(&mut self.world, name, color)
    }

    /// Spawn a fighter at an exact position and velocity. None at the cap.
    pub fn spawn_at(&mut self, name: &str, color: Rgb, pos: Vec2, vel: Vec2) -> Option<EntityId> {
        self.registry.spawn_at(&mut self.world, name, color, pos, vel)
    }

    /// Scale the velocity of every alive fighter owned by `name`, capped at
    /// `max_speed`. Returns how many fighters were boosted.
    pub fn boost(&mut self, name: &str, factor: f32) -> Result<usize, ArenaError> {
        let factor = require_finite("boost factor", factor)?;
        let handles: Vec<_> = self
            .registry
            .find_alive_by_name(name)
            .filter_map(Fighter::body_handle)
            .collect();

        let max_speed = self.world.max_speed;
        let mut boosted = 0;
        for handle in handles {
            if let Some(body) = self.world.body_mut(handle) {
                body.vel = scale_speed(body.vel, factor, max_speed);
                boosted += 1;
            }
        }
        if boosted == 0 {
            log::debug!("Boost for {name} ignored: no fighter alive");
        } else {
            log::debug!("{name} boosted {boosted} fighter(s) by {factor}");
        }
        Ok(boosted)
    }

    /// Recolor every alive fighter owned by `name`. Returns how many changed.
    pub fn set_color(&mut self, name: &str, color: Rgb) -> usize {
        let mut changed = 0;
        for fighter in self.registry.find_alive_by_name_mut(name) {
            fighter.color = color;
            changed += 1;
        }
        if changed == 0 {
            log::debug!("Recolor for {name} ignored: no fighter alive");
        } else {
            log::debug!("{name} recolored {changed} fighter(s)");
        }
        changed
    }

    /// Set the global force field. Values are clamped to [-1, 1]; NaN and
    /// infinities are rejected and the field stays as it was.
    pub fn set_gravity_field(&mut self, value: f32) -> Result<f32, ArenaError> {
        let field = self.world.set_field(value)?;
        log::info!("Gravity field set to {field}");
        Ok(field)
    }

    #[inline]
    pub fn gravity_field(&self) -> f32 {
        self.world.field()
    }

    /// Apply one command. Rejected commands are logged and change nothing.
    pub fn apply(&mut self, command: &Command) {
        match command {
            Command::Spawn { name, color } => {
                self.spawn(name, *color);
            }
            Command::Boost { name, factor } => {
                if let Err(e) = self.boost(name, *factor) {
                    log::warn!("Boost from {name} rejected: {e}");
                }
            }
            Command::SetColor { name, color } => {
                self.set_color(name, *color);
            }
            Command::SetGravity { value } => {
                if let Err(e) = self.set_gravity_field(*value) {
                    log::warn!("Gravity change rejected: {e}");
                }
            }
        }
    }

    pub fn fighter(&self, id: EntityId) -> Option<&Fighter> {
        self.registry.get(id)
    }

    /// Position of a fighter while it is alive
    pub fn position(&self, id: EntityId) -> Option<Vec2> {
        let handle = self.registry.get(id)?.body_handle()?;
        self.world.body(handle).map(|b| b.pos)
    }

    /// Velocity of a fighter while it is alive
    pub fn velocity(&self, id: EntityId) -> Option<Vec2> {
        let handle = self.registry.get(id)?.body_handle()?;
        self.world.body(handle).map(|b| b.vel)
    }

    #[inline]
    pub fn leaderboard(&self) -> &Leaderboard {
        self.registry.leaderboard()
    }

    /// Read-only snapshot for rendering
    pub fn render_state(&self) -> RenderState {
        let fighters = self
            .registry
            .fighters()
            .iter()
            .map(|f| {
                let body = f.body_handle().and_then(|h| self.world.body(h));
                FighterView {
                    id: f.id,
                    name: f.name.clone(),
                    color: f.color,
                    pos: body
                        .map(|b| b.pos)
                        .or(f.final_pos)
                        .unwrap_or(Vec2::ZERO),
                    radius: self.settings.ball_radius,
                    health: f.health,
                    alive: f.alive,
                    hit_flash: f.hit_flash,
                    weapon: body.map(|b| weapon_segment(b, self.combat.sword_length)),
                }
            })
            .collect();

        RenderState {
            tick: self.time_ticks,
            arena_min: self.world.arena.min,
            arena_max: self.world.arena.max,
            obstacle: self.world.obstacle.segment(),
            obstacle_width: self.world.obstacle.half_width * 2.0,
            gravity_field: self.world.field(),
            fighters,
            leaderboard: self.leaderboard().top(self.settings.leaderboard_rows),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::*;
    use crate::sim::{TickInput, tick};

    fn assert_in_arena(state: &ArenaState, id: EntityId) {
        let pos = state.position(id).unwrap();
        let vel = state.velocity(id).unwrap();
        assert!(pos.is_finite() && vel.is_finite(), "pos={pos} vel={vel}");
        assert!(vel.length() <= state.settings.max_speed + 1e-2, "vel={vel}");
        assert!(
            state.world.arena.contains_circle(pos, BALL_RADIUS - 0.01),
            "pos={pos}"
        );
    }

    #[test]
    fn test_boost_scales_only_named_alive() {
        let mut state = ArenaState::with_seed(1);
        let a1 = state.spawn_at("a", Rgb::RED, Vec2::new(100.0, 100.0), Vec2::new(10.0, 20.0)).unwrap();
        let a2 = state.spawn_at("a", Rgb::RED, Vec2::new(600.0, 100.0), Vec2::new(-4.0, 0.0)).unwrap();
        let b = state.spawn_at("b", Rgb::BLUE, Vec2::new(100.0, 500.0), Vec2::new(10.0, 0.0)).unwrap();

        assert_eq!(state.boost("a", BOOST_FACTOR).unwrap(), 2);
        assert_eq!(state.velocity(a1).unwrap(), Vec2::new(15.0, 30.0));
        assert_eq!(state.velocity(a2).unwrap(), Vec2::new(-6.0, 0.0));
        assert_eq!(state.velocity(b).unwrap(), Vec2::new(10.0, 0.0));

        assert_eq!(state.boost("nobody", BOOST_FACTOR).unwrap(), 0);
        assert!(state.boost("a", f32::NAN).is_err());
        assert_eq!(state.velocity(a1).unwrap(), Vec2::new(15.0, 30.0));
    }

    #[test]
    fn test_repeated_boosts_stay_in_arena() {
        let mut state = ArenaState::with_seed(1);
        let a = state.spawn_at("a", Rgb::RED, Vec2::new(200.0, 200.0), Vec2::new(50.0, 30.0)).unwrap();
        for _ in 0..250 {
            state.apply(&Command::Boost {
                name: "a".into(),
                factor: BOOST_FACTOR,
            });
        }
        assert!((state.velocity(a).unwrap().length() - BALL_MAX_SPEED).abs() < 1e-2);

        for _ in 0..3 {
            tick(&mut state, &TickInput::default(), SIM_DT);
            assert_in_arena(&state, a);
        }
        assert!(state.fighter(a).unwrap().alive);
    }

    #[test]
    fn test_huge_boost_is_capped() {
        let mut state = ArenaState::with_seed(1);
        let a = state.spawn_at("a", Rgb::RED, Vec2::new(200.0, 200.0), Vec2::new(10.0, 20.0)).unwrap();
        assert_eq!(state.boost("a", 1e28).unwrap(), 1);

        let vel = state.velocity(a).unwrap();
        assert!((vel.length() - BALL_MAX_SPEED).abs() < 1e-2);
        // Direction survives the cap
        assert!(vel.normalize().dot(Vec2::new(10.0, 20.0).normalize()) > 0.999);

        for _ in 0..3 {
            tick(&mut state, &TickInput::default(), SIM_DT);
            assert_in_arena(&state, a);
        }
    }

    #[test]
    fn test_max_speed_comes_from_settings() {
        let mut state = ArenaState::new(ArenaSettings {
            max_speed: 200.0,
            ..ArenaSettings::default()
        });
        let a = state.spawn_at("a", Rgb::RED, Vec2::new(200.0, 200.0), Vec2::new(100.0, 0.0)).unwrap();
        state.boost("a", 10.0).unwrap();
        assert!((state.velocity(a).unwrap().x - 200.0).abs() < 1e-3);
    }

    #[test]
    fn test_set_color_skips_dead() {
        let mut state = ArenaState::with_seed(1);
        let old = state.spawn("sam", Some(Rgb::RED)).unwrap();
        let new = state.spawn("sam", Some(Rgb::RED)).unwrap();
        state.registry.eliminate(&mut state.world, old);

        assert_eq!(state.set_color("sam", Rgb::CYAN), 1);
        assert_eq!(state.fighter(old).unwrap().color, Rgb::RED);
        assert_eq!(state.fighter(new).unwrap().color, Rgb::CYAN);
        assert_eq!(state.set_color("nobody", Rgb::CYAN), 0);
    }

    #[test]
    fn test_gravity_clamp() {
        let mut state = ArenaState::with_seed(1);
        assert_eq!(state.set_gravity_field(5.0).unwrap(), 1.0);
        assert_eq!(state.gravity_field(), 1.0);
        assert_eq!(state.set_gravity_field(-5.0).unwrap(), -1.0);
        assert_eq!(state.gravity_field(), -1.0);

        state.apply(&Command::SetGravity { value: f32::NAN });
        assert_eq!(state.gravity_field(), -1.0);
    }

    #[test]
    fn test_spawn_command_caps_quietly() {
        let mut state = ArenaState::with_seed(3);
        for i in 0..MAX_POPULATION + 1 {
            state.apply(&Command::Spawn {
                name: format!("p{i}"),
                color: None,
            });
        }
        assert_eq!(state.registry.alive_count(), MAX_POPULATION);
        assert_eq!(state.leaderboard().len(), MAX_POPULATION);
    }

    #[test]
    fn test_render_state_reports_everyone() {
        let mut state = ArenaState::with_seed(5);
        let a = state.spawn("a", None).unwrap();
        let b = state.spawn("b", None).unwrap();
        let fallen_at = state.position(b).unwrap();
        state.registry.eliminate(&mut state.world, b);

        let view = state.render_state();
        assert_eq!(view.fighters.len(), 2);
        assert_eq!(view.alive().count(), 1);

        let va = view.fighters.iter().find(|f| f.id == a).unwrap();
        assert!(va.weapon.is_some());
        let vb = view.fighters.iter().find(|f| f.id == b).unwrap();
        assert!(!vb.alive);
        assert!(vb.weapon.is_none());
        assert_eq!(vb.pos, fallen_at);

        assert_eq!(view.leaderboard.len(), 2);
        assert!(view.to_json().unwrap().contains("\"leaderboard\""));
    }
}
