//! Fixed timestep simulation tick
//!
//! One tick: apply pending commands, spin the bar, step physics, resolve
//! combat. Nothing inside a tick can fail or be interrupted.

use super::combat::resolve_combat;
use super::command::Command;
use super::state::ArenaState;
use crate::consts::{MAX_SUBSTEPS, SIM_DT};

/// Commands to apply before a tick runs
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    pub commands: Vec<Command>,
}

impl TickInput {
    pub fn new(commands: Vec<Command>) -> Self {
        Self { commands }
    }
}

/// Advance the arena by one fixed timestep
pub fn tick(state: &mut ArenaState, input: &TickInput, dt: f32) {
    for command in &input.commands {
        state.apply(command);
    }

    state.time_ticks += 1;

    state.world.obstacle.advance();
    state.world.step(dt);
    state.last_events = resolve_combat(&mut state.registry, &mut state.world, &state.combat);
}

/// Turns variable frame times into a whole number of fixed ticks
#[derive(Debug, Clone)]
pub struct FixedStep {
    accumulator: f32,
    dt: f32,
    max_substeps: u32,
}

impl Default for FixedStep {
    fn default() -> Self {
        Self::new(SIM_DT, MAX_SUBSTEPS)
    }
}

impl FixedStep {
    pub fn new(dt: f32, max_substeps: u32) -> Self {
        Self {
            accumulator: 0.0,
            dt,
            max_substeps,
        }
    }

    #[inline]
    pub fn dt(&self) -> f32 {
        self.dt
    }

    /// Add a frame's elapsed time and return how many ticks to run now.
    ///
    /// Long frames (e.g. after a stall) are clamped to 0.1 s, and at most
    /// `max_substeps` ticks run per frame.
    pub fn advance(&mut self, frame_dt: f32) -> u32 {
        self.accumulator += frame_dt.clamp(0.0, 0.1);

        let mut substeps = 0;
        while self.accumulator >= self.dt && substeps < self.max_substeps {
            self.accumulator -= self.dt;
            substeps += 1;
        }
        substeps
    }
}
