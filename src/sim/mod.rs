//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only (one tick per frame)
//! - Seeded RNG only
//! - Stable iteration order (map order for gems, list order for enemies)
//! - No rendering or platform dependencies

pub mod collision;
pub mod enemy;
pub mod grid;
pub mod level;
pub mod motion;
pub mod player;
pub mod state;
pub mod tick;

pub use collision::{Hitbox, first_overlap};
pub use enemy::{Behavior, Enemy, EnemyKind, EnemyProfile, WanderBounds, WanderState};
pub use grid::{Tile, TileMap};
pub use level::{BehaviorConfig, EnemySpawn, LevelConfig, LevelError};
pub use motion::{Animation, Direction, GridMotion};
pub use player::Player;
pub use state::{Collectible, GameEvent, GamePhase, GameState};
pub use tick::{TickInput, tick};
