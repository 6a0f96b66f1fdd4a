//! Blade Arena entry point
//!
//! Runs the arena headless. Feed events are read from stdin, one per line
//! (`gift <user>` or `<user> <comment>`), on a producer thread. When stdin
//! closes the arena keeps running in offline mode.
//!
//! Usage: blade-arena [--settings PATH] [--ticks N]

use std::io::BufRead;
use std::time::{Duration, Instant};

use blade_arena::ArenaSettings;
use blade_arena::feed::{CommandQueue, FeedTranslator, parse_line};
use blade_arena::sim::{ArenaState, FixedStep, TickInput, tick};

struct Args {
    settings_path: Option<String>,
    max_ticks: Option<u64>,
}

fn parse_args() -> Args {
    let mut args = Args {
        settings_path: None,
        max_ticks: None,
    };
    let mut iter = std::env::args().skip(1);
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--settings" => args.settings_path = iter.next(),
            "--ticks" => {
                args.max_ticks = iter.next().and_then(|v| v.parse().ok());
                if args.max_ticks.is_none() {
                    log::warn!("--ticks expects a number; running until stopped");
                }
            }
            other => log::warn!("Ignoring unknown argument {other:?}"),
        }
    }
    args
}

/// Read feed lines from stdin and forward them as commands
fn spawn_stdin_feed(queue: &CommandQueue, seed: u64) {
    let tx = queue.sender();
    let spawned = std::thread::Builder::new()
        .name("feed".into())
        .spawn(move || {
            let mut translator = FeedTranslator::new(seed);
            for line in std::io::stdin().lock().lines() {
                let line = match line {
                    Ok(line) => line,
                    Err(e) => {
                        log::warn!("Feed read failed: {e}");
                        break;
                    }
                };
                let Some(command) = parse_line(&line).and_then(|ev| translator.translate(&ev)) else {
                    continue;
                };
                if tx.send(command).is_err() {
                    break;
                }
            }
            log::warn!("Feed closed; running in offline mode");
        });

    if let Err(e) = spawned {
        log::warn!("Failed to start feed thread: {e}. Running in offline mode.");
    }
}

fn main() {
    env_logger::init();
    log::info!("Blade Arena starting...");

    let args = parse_args();
    let settings = match &args.settings_path {
        Some(path) => ArenaSettings::load_or_default(path),
        None => ArenaSettings::default(),
    };
    let rows = settings.leaderboard_rows;
    let seed = settings.seed;

    let mut state = ArenaState::new(settings);
    log::info!("Arena initialized with seed: {seed}");
    state.spawn("Player1", None);
    state.spawn("Player2", None);

    let queue = CommandQueue::new();
    spawn_stdin_feed(&queue, seed.wrapping_add(1));

    let mut stepper = FixedStep::default();
    let frame = Duration::from_secs_f32(stepper.dt());
    let mut last = Instant::now();

    loop {
        let now = Instant::now();
        let substeps = stepper.advance(now.duration_since(last).as_secs_f32());
        last = now;

        for i in 0..substeps {
            // Commands land on the first tick of the frame only
            let input = if i == 0 {
                TickInput::new(queue.drain())
            } else {
                TickInput::default()
            };
            tick(&mut state, &input, stepper.dt());

            if state.time_ticks % 60 == 0 {
                log_leaderboard(&state, rows);
            }
            if args.max_ticks.is_some_and(|max| state.time_ticks >= max) {
                log::info!("Stopping after {} ticks", state.time_ticks);
                log_leaderboard(&state, rows);
                return;
            }
        }

        std::thread::sleep(frame.saturating_sub(now.elapsed()));
    }
}

fn log_leaderboard(state: &ArenaState, rows: usize) {
    let alive = state.registry.alive_count();
    let board = state
        .leaderboard()
        .top(rows)
        .iter()
        .enumerate()
        .map(|(i, e)| format!("{}. {}: {}", i + 1, e.name, e.score))
        .collect::<Vec<_>>()
        .join("  ");
    log::info!(
        "tick {} | {alive} alive | gravity {:.2} | {board}",
        state.time_ticks,
        state.gravity_field()
    );
}
