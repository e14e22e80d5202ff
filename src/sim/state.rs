//! Game state and core simulation types
//!
//! Everything the per-frame tick reads or writes lives in `GameState`. The
//! level it was built from is kept so the run can be reset in place.

use glam::{IVec2, Vec2};
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::collision::Hitbox;
use super::enemy::{Enemy, WanderBounds};
use super::grid::{Tile, TileMap};
use super::level::{BehaviorConfig, LevelConfig, LevelError};
use super::player::Player;
use crate::consts::HITBOX_MARGIN;

/// Current phase of the game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GamePhase {
    /// Title screen, waiting for start
    #[default]
    Menu,
    /// Active gameplay
    Playing,
    /// Health ran out
    GameOver,
    /// Every gem collected
    Win,
}

/// Things that happened during a tick, for audio and UI
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    /// A gem was picked up
    GemCollected { cell: IVec2 },
    /// An enemy landed a hit; `health` is what's left
    PlayerHurt { health: u8 },
    /// A menu action was accepted (start, back to menu)
    Select,
    GameOver,
    Win,
}

/// A gem still lying on the map
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Collectible {
    pub cell: IVec2,
    /// Top-left pixel of the cell
    pub pos: Vec2,
}

impl Collectible {
    pub fn hitbox(&self, cell_size: f32) -> Hitbox {
        Hitbox::for_cell(self.pos, cell_size, HITBOX_MARGIN)
    }
}

/// Complete game state
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    /// Wanderer direction and cooldown rolls
    pub(crate) rng: Pcg32,
    /// Template for `reset`
    level: LevelConfig,
    pub phase: GamePhase,
    /// Simulation tick counter (playing frames only)
    pub time_ticks: u64,
    pub map: TileMap,
    pub player: Player,
    /// Updated in list order every frame
    pub enemies: Vec<Enemy>,
    /// Gems not yet picked up, in map order
    pub collectibles: Vec<Collectible>,
    pub total_collectibles: u32,
    pub collected: u32,
    pub score: u64,
    /// Events raised since the last `drain_events`
    pub events: Vec<GameEvent>,
}

impl GameState {
    /// New run on the built-in dungeon
    pub fn new(seed: u64) -> Self {
        Self::build(LevelConfig::dungeon(), seed)
    }

    /// New run on a custom level
    pub fn from_level(level: LevelConfig, seed: u64) -> Result<Self, LevelError> {
        level.validate()?;
        Ok(Self::build(level, seed))
    }

    fn build(level: LevelConfig, seed: u64) -> Self {
        let mut state = Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            map: level.tile_map(),
            player: Player::new(Vec2::ZERO),
            level,
            phase: GamePhase::Menu,
            time_ticks: 0,
            enemies: Vec::new(),
            collectibles: Vec::new(),
            total_collectibles: 0,
            collected: 0,
            score: 0,
            events: Vec::new(),
        };
        state.populate();
        log::info!(
            "Loaded level '{}' ({}x{}, {} gems, {} enemies)",
            state.level.name,
            state.map.cols(),
            state.map.rows(),
            state.total_collectibles,
            state.enemies.len()
        );
        state
    }

    /// Spawn everything from the level template onto a fresh map
    fn populate(&mut self) {
        self.map = self.level.tile_map();
        let cell_size = self.map.cell_size();

        self.player = Player::new(self.map.cell_origin(self.level.player_start));

        self.enemies = self
            .level
            .enemies
            .iter()
            .map(|spawn| {
                let pos = self.map.cell_origin(spawn.cell);
                match &spawn.behavior {
                    BehaviorConfig::Wander { margin } => Enemy::wanderer(
                        spawn.kind,
                        spawn.profile(),
                        pos,
                        WanderBounds::inset(&self.map, *margin),
                        &mut self.rng,
                    ),
                    BehaviorConfig::Patrol { waypoints } => Enemy::patroller(
                        spawn.kind,
                        spawn.profile(),
                        pos,
                        waypoints.clone(),
                        cell_size,
                    ),
                }
            })
            .collect();

        self.collectibles = self
            .map
            .cells_of(Tile::Collectible)
            .map(|cell| Collectible {
                cell,
                pos: self.map.cell_origin(cell),
            })
            .collect();
        self.total_collectibles = self.collectibles.len() as u32;
        self.collected = 0;
        self.score = 0;
    }

    /// Back to the start of the level, on the title screen. The RNG stream
    /// carries on so the next run differs from the last.
    pub fn reset(&mut self) {
        self.populate();
        self.time_ticks = 0;
        self.events.clear();
        self.phase = GamePhase::Menu;
    }

    #[inline]
    pub fn level(&self) -> &LevelConfig {
        &self.level
    }

    #[inline]
    pub fn cell_size(&self) -> f32 {
        self.map.cell_size()
    }

    /// Take the events raised since the last call
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Switch phase and raise the matching event
    pub(crate) fn enter_phase(&mut self, phase: GamePhase) {
        if self.phase == phase {
            return;
        }
        log::info!("Phase {:?} -> {:?} (score {})", self.phase, phase, self.score);
        self.phase = phase;
        match phase {
            GamePhase::GameOver => self.events.push(GameEvent::GameOver),
            GamePhase::Win => self.events.push(GameEvent::Win),
            GamePhase::Menu | GamePhase::Playing => {}
        }
    }
}
