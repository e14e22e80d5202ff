//! Roguelike Adventure - headless native runner
//!
//! Usage: `roguelike-adventure [LEVEL] [SEED]`
//!
//! LEVEL is a built-in level name (`dungeon`, `patrol_maze`) or a path to a
//! level JSON file. The run is driven by a random-walk autopilot so the whole
//! game loop (input, simulation, audio policy) can be exercised without a
//! window. Set `RUST_LOG=debug` to see every pickup, hit and redirect.

#[cfg(not(target_arch = "wasm32"))]
use std::path::Path;

#[cfg(not(target_arch = "wasm32"))]
use rand::{Rng, SeedableRng};
#[cfg(not(target_arch = "wasm32"))]
use rand_pcg::Pcg32;
#[cfg(not(target_arch = "wasm32"))]
use roguelike_adventure::consts::SIM_HZ;
#[cfg(not(target_arch = "wasm32"))]
use roguelike_adventure::sim::{Direction, GamePhase, GameState, LevelConfig, TickInput, tick};
#[cfg(not(target_arch = "wasm32"))]
use roguelike_adventure::{AudioManager, LogBackend, Settings};

/// Give up after two minutes of game time
#[cfg(not(target_arch = "wasm32"))]
const MAX_FRAMES: u64 = SIM_HZ as u64 * 120;

#[cfg(not(target_arch = "wasm32"))]
const DEFAULT_SEED: u64 = 0x5EED;

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Roguelike Adventure (native) starting...");

    let mut args = std::env::args().skip(1);
    let level = args.next().map(|arg| load_level(&arg)).unwrap_or_default();
    let seed = match args.next() {
        Some(arg) => arg.parse().unwrap_or_else(|_| {
            log::warn!("Seed '{arg}' is not a number, using {DEFAULT_SEED}");
            DEFAULT_SEED
        }),
        None => DEFAULT_SEED,
    };

    let mut state = match GameState::from_level(level, seed) {
        Ok(state) => state,
        Err(err) => {
            log::warn!("Level rejected ({err}), falling back to the dungeon");
            GameState::new(seed)
        }
    };
    let settings = Settings::load(Path::new(Settings::FILE_NAME));
    let mut audio = AudioManager::new(LogBackend, settings);
    // Separate stream so the autopilot never perturbs the simulation's rolls
    let mut pilot = Pcg32::seed_from_u64(seed.wrapping_add(1));

    audio.tick(state.phase);
    let mut input = TickInput {
        start: true,
        ..Default::default()
    };
    while state.time_ticks < MAX_FRAMES {
        tick(&mut state, &input);
        for event in state.drain_events() {
            audio.handle_event(&event);
        }
        audio.tick(state.phase);

        if matches!(state.phase, GamePhase::GameOver | GamePhase::Win) {
            break;
        }
        input = TickInput {
            movement: autopilot(&state, &mut pilot),
            ..Default::default()
        };
    }

    let seconds = state.time_ticks as f32 / SIM_HZ as f32;
    match state.phase {
        GamePhase::Win => log::info!(
            "Won '{}' in {seconds:.1}s with score {}",
            state.level().name,
            state.score
        ),
        GamePhase::GameOver => log::info!(
            "Game over on '{}' after {seconds:.1}s: {}/{} gems, score {}",
            state.level().name,
            state.collected,
            state.total_collectibles,
            state.score
        ),
        _ => log::info!(
            "Stopped after {seconds:.1}s: {}/{} gems, health {}",
            state.collected,
            state.total_collectibles,
            state.player.health()
        ),
    }
}

/// Built-in name or JSON path; anything unusable falls back to the default
#[cfg(not(target_arch = "wasm32"))]
fn load_level(arg: &str) -> LevelConfig {
    if let Some(level) = LevelConfig::builtin(arg) {
        return level;
    }
    let loaded = std::fs::read_to_string(arg)
        .map_err(|err| err.to_string())
        .and_then(|json| LevelConfig::from_json(&json).map_err(|err| err.to_string()));
    match loaded {
        Ok(level) => {
            log::info!("Loaded level file {arg}");
            level
        }
        Err(err) => {
            log::warn!("Could not load level '{arg}': {err}");
            LevelConfig::default()
        }
    }
}

/// Random walk: a fresh direction whenever the player is standing still
#[cfg(not(target_arch = "wasm32"))]
fn autopilot(state: &GameState, rng: &mut Pcg32) -> Option<Direction> {
    if state.player.is_moving() {
        return None;
    }
    Some(Direction::ALL[rng.random_range(0..Direction::ALL.len())])
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // The web front end drives `sim::tick` from its own frame callback
}
