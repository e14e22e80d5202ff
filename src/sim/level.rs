//! Level configuration
//!
//! Levels are plain data (JSON on disk): the tile codes, the pixel window the
//! movers live in, where everyone starts, and how each enemy behaves. Loading
//! is the only fallible step in the game; the simulation itself never errors.

use glam::{IVec2, Vec2};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::enemy::{EnemyKind, EnemyProfile};
use super::grid::{Tile, TileMap};
use crate::consts::*;

#[derive(Debug, Error)]
pub enum LevelError {
    #[error("level file is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("level grid is empty")]
    EmptyGrid,
    #[error("row {row} has {found} tiles, expected {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        found: usize,
    },
    #[error("unknown tile code {code} at ({col}, {row})")]
    UnknownTile { col: usize, row: usize, code: u8 },
    #[error("cell size {0} leaves no room for a hitbox")]
    BadCellSize(f32),
    #[error("pixel bounds {0:?} are smaller than one cell")]
    BadBounds(Vec2),
    #[error("{what} at ({col}, {row}) is not an enterable cell")]
    BlockedSpawn {
        what: &'static str,
        col: i32,
        row: i32,
    },
    #[error("enemy {index} has an empty patrol route")]
    EmptyPatrol { index: usize },
    #[error("enemy {index} has non-positive speed {speed}")]
    BadSpeed { index: usize, speed: f32 },
}

/// How a spawned enemy decides where to go
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BehaviorConfig {
    /// Random single-cell steps inside a box `margin` cells in from the edge
    Wander {
        #[serde(default = "default_wander_margin")]
        margin: i32,
    },
    /// Cycle through cells in order
    Patrol { waypoints: Vec<IVec2> },
}

fn default_wander_margin() -> i32 {
    1
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnemySpawn {
    pub kind: EnemyKind,
    pub cell: IVec2,
    pub behavior: BehaviorConfig,
    /// Overrides the kind's default speed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub speed: Option<f32>,
    /// Overrides the kind's default animation period
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub animation_period: Option<f32>,
}

impl EnemySpawn {
    pub fn profile(&self) -> EnemyProfile {
        let base = self.kind.profile();
        EnemyProfile::new(
            self.speed.unwrap_or(base.speed),
            self.animation_period.unwrap_or(base.animation_period),
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelConfig {
    pub name: String,
    #[serde(default = "default_cell_size")]
    pub cell_size: f32,
    /// Playable pixel window
    #[serde(default = "default_bounds")]
    pub bounds: Vec2,
    /// Tile codes, row-major: 0 empty, 1 wall, 2 gem
    pub grid: Vec<Vec<u8>>,
    pub player_start: IVec2,
    #[serde(default)]
    pub enemies: Vec<EnemySpawn>,
}

fn default_cell_size() -> f32 {
    CELL_SIZE
}

fn default_bounds() -> Vec2 {
    Vec2::new(SCREEN_WIDTH, SCREEN_HEIGHT)
}

impl LevelConfig {
    /// Parse and validate a JSON level
    pub fn from_json(json: &str) -> Result<Self, LevelError> {
        let level: LevelConfig = serde_json::from_str(json)?;
        level.validate()?;
        Ok(level)
    }

    pub fn to_json(&self) -> Result<String, LevelError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn tile_map(&self) -> TileMap {
        TileMap::from_codes(&self.grid, self.cell_size, self.bounds)
    }

    pub fn collectible_count(&self) -> usize {
        self.grid
            .iter()
            .flatten()
            .filter(|&&code| code == Tile::Collectible.code())
            .count()
    }

    /// Check everything the simulation assumes about a level: a rectangular
    /// grid of known tiles, room for hitboxes, and every spawn and waypoint
    /// on a cell a mover may enter.
    pub fn validate(&self) -> Result<(), LevelError> {
        if !(self.cell_size > 2.0 * HITBOX_MARGIN) {
            return Err(LevelError::BadCellSize(self.cell_size));
        }
        if !(self.bounds.x > self.cell_size && self.bounds.y > self.cell_size) {
            return Err(LevelError::BadBounds(self.bounds));
        }

        let expected = self.grid.first().map(|r| r.len()).unwrap_or(0);
        if expected == 0 {
            return Err(LevelError::EmptyGrid);
        }
        for (row, tiles) in self.grid.iter().enumerate() {
            if tiles.len() != expected {
                return Err(LevelError::RaggedRow {
                    row,
                    expected,
                    found: tiles.len(),
                });
            }
            if let Some((col, &code)) = tiles
                .iter()
                .enumerate()
                .find(|(_, code)| Tile::from_code(**code).is_none())
            {
                return Err(LevelError::UnknownTile { col, row, code });
            }
        }

        let map = self.tile_map();
        let check = |what: &'static str, cell: IVec2| {
            if map.is_valid_target(map.cell_origin(cell)) {
                Ok(())
            } else {
                Err(LevelError::BlockedSpawn {
                    what,
                    col: cell.x,
                    row: cell.y,
                })
            }
        };

        check("player start", self.player_start)?;
        for (index, spawn) in self.enemies.iter().enumerate() {
            check("enemy spawn", spawn.cell)?;
            let speed = spawn.profile().speed;
            if !(speed > 0.0) {
                return Err(LevelError::BadSpeed { index, speed });
            }
            if let BehaviorConfig::Patrol { waypoints } = &spawn.behavior {
                if waypoints.is_empty() {
                    return Err(LevelError::EmptyPatrol { index });
                }
                for &waypoint in waypoints {
                    check("patrol waypoint", waypoint)?;
                }
            }
        }
        Ok(())
    }

    /// The gem dungeon: 16x14 cells, four gems, three wanderers
    pub fn dungeon() -> Self {
        let grid = vec![
            vec![1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1],
            vec![1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1],
            vec![1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1],
            vec![1, 0, 0, 1, 1, 1, 0, 0, 0, 0, 1, 1, 1, 0, 0, 1],
            vec![1, 0, 0, 1, 0, 0, 0, 0, 0, 0, 0, 0, 1, 0, 0, 1],
            vec![1, 0, 0, 1, 0, 2, 0, 0, 0, 0, 2, 0, 1, 0, 0, 1],
            vec![1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1],
            vec![1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1],
            vec![1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1],
            vec![1, 0, 0, 1, 0, 2, 0, 0, 0, 0, 2, 0, 1, 0, 0, 1],
            vec![1, 0, 0, 1, 0, 0, 0, 0, 0, 0, 0, 0, 1, 0, 0, 1],
            vec![1, 0, 0, 1, 1, 1, 0, 0, 0, 0, 1, 1, 1, 0, 0, 1],
            vec![1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1],
            vec![1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1],
        ];
        let wander = |kind, x, y| EnemySpawn {
            kind,
            cell: IVec2::new(x, y),
            behavior: BehaviorConfig::Wander { margin: 1 },
            speed: None,
            animation_period: None,
        };
        Self {
            name: "dungeon".to_string(),
            cell_size: CELL_SIZE,
            bounds: default_bounds(),
            grid,
            player_start: IVec2::new(2, 2),
            enemies: vec![
                wander(EnemyKind::Ghost, 5, 5),
                wander(EnemyKind::Skeleton, 10, 4),
                wander(EnemyKind::Slime, 8, 8),
            ],
        }
    }

    /// The patrol maze: 16x12 corridors, three guards on fixed routes
    pub fn patrol_maze() -> Self {
        let grid = vec![
            vec![1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1],
            vec![1, 0, 0, 0, 0, 0, 1, 0, 0, 0, 0, 0, 0, 0, 0, 1],
            vec![1, 0, 1, 1, 0, 0, 1, 0, 0, 1, 1, 1, 0, 1, 0, 1],
            vec![1, 0, 1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1, 0, 1],
            vec![1, 0, 1, 0, 1, 1, 1, 1, 0, 0, 1, 1, 0, 0, 0, 1],
            vec![1, 0, 0, 0, 0, 0, 0, 1, 0, 0, 0, 1, 0, 1, 0, 1],
            vec![1, 0, 1, 0, 1, 0, 0, 0, 0, 1, 0, 0, 0, 1, 0, 1],
            vec![1, 0, 1, 0, 1, 1, 1, 1, 0, 1, 1, 1, 0, 1, 0, 1],
            vec![1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1],
            vec![1, 0, 1, 1, 1, 0, 1, 1, 1, 1, 0, 1, 1, 1, 0, 1],
            vec![1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1],
            vec![1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1],
        ];
        let patrol = |kind, route: &[(i32, i32)]| {
            let waypoints: Vec<IVec2> = route.iter().map(|&(x, y)| IVec2::new(x, y)).collect();
            EnemySpawn {
                kind,
                cell: waypoints[0],
                behavior: BehaviorConfig::Patrol { waypoints },
                speed: Some(PATROL_SPEED),
                animation_period: Some(PATROL_ANIM_PERIOD),
            }
        };
        Self {
            name: "patrol_maze".to_string(),
            cell_size: CELL_SIZE,
            bounds: default_bounds(),
            grid,
            player_start: IVec2::new(1, 1),
            enemies: vec![
                patrol(EnemyKind::Slime, &[(3, 5), (3, 8), (1, 8), (1, 5)]),
                patrol(EnemyKind::Ghost, &[(12, 1), (12, 8), (14, 8), (14, 1)]),
                patrol(EnemyKind::Skeleton, &[(5, 10), (10, 10), (10, 8), (5, 8)]),
            ],
        }
    }

    /// Built-in level by name
    pub fn builtin(name: &str) -> Option<Self> {
        match name {
            "dungeon" => Some(Self::dungeon()),
            "patrol_maze" | "maze" => Some(Self::patrol_maze()),
            _ => None,
        }
    }
}

impl Default for LevelConfig {
    fn default() -> Self {
        Self::dungeon()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_levels_validate() {
        LevelConfig::dungeon().validate().unwrap();
        LevelConfig::patrol_maze().validate().unwrap();
    }

    #[test]
    fn test_dungeon_shape() {
        let level = LevelConfig::dungeon();
        let map = level.tile_map();
        assert_eq!((map.cols(), map.rows()), (16, 14));
        assert_eq!(level.collectible_count(), 4);
        assert_eq!(level.enemies.len(), 3);
    }

    #[test]
    fn test_json_round_trip_keeps_level() {
        let level = LevelConfig::patrol_maze();
        let json = level.to_json().unwrap();
        assert_eq!(LevelConfig::from_json(&json).unwrap(), level);
    }

    #[test]
    fn test_minimal_json_uses_defaults() {
        let json = r#"{
            "name": "tiny",
            "grid": [[1,1,1,1],[1,0,2,1],[1,0,0,1],[1,1,1,1]],
            "player_start": [1, 1],
            "enemies": [
                { "kind": "ghost", "cell": [2, 2], "behavior": { "type": "wander" } }
            ]
        }"#;
        let level = LevelConfig::from_json(json).unwrap();
        assert_eq!(level.cell_size, CELL_SIZE);
        assert_eq!(level.bounds, Vec2::new(SCREEN_WIDTH, SCREEN_HEIGHT));
        assert_eq!(level.enemies[0].behavior, BehaviorConfig::Wander { margin: 1 });
        assert_eq!(level.enemies[0].profile(), EnemyKind::Ghost.profile());
    }

    #[test]
    fn test_rejects_ragged_rows() {
        let mut level = LevelConfig::dungeon();
        level.grid[3].pop();
        assert!(matches!(
            level.validate(),
            Err(LevelError::RaggedRow { row: 3, expected: 16, found: 15 })
        ));
    }

    #[test]
    fn test_rejects_unknown_tile() {
        let mut level = LevelConfig::dungeon();
        level.grid[2][4] = 9;
        assert!(matches!(
            level.validate(),
            Err(LevelError::UnknownTile { col: 4, row: 2, code: 9 })
        ));
    }

    #[test]
    fn test_rejects_spawn_in_wall() {
        let mut level = LevelConfig::dungeon();
        level.enemies[1].cell = IVec2::new(10, 3);
        let err = level.validate().unwrap_err();
        assert!(matches!(err, LevelError::BlockedSpawn { col: 10, row: 3, .. }));
        assert_eq!(err.to_string(), "enemy spawn at (10, 3) is not an enterable cell");
    }

    #[test]
    fn test_rejects_waypoint_outside_window() {
        let mut level = LevelConfig::dungeon();
        level.enemies[0].behavior = BehaviorConfig::Patrol {
            waypoints: vec![IVec2::new(5, 5), IVec2::new(5, 12)],
        };
        assert!(matches!(
            level.validate(),
            Err(LevelError::BlockedSpawn { what: "patrol waypoint", .. })
        ));
    }

    #[test]
    fn test_rejects_empty_patrol_and_bad_speed() {
        let mut level = LevelConfig::patrol_maze();
        level.enemies[2].behavior = BehaviorConfig::Patrol { waypoints: vec![] };
        assert!(matches!(level.validate(), Err(LevelError::EmptyPatrol { index: 2 })));

        let mut level = LevelConfig::patrol_maze();
        level.enemies[0].speed = Some(0.0);
        assert!(matches!(level.validate(), Err(LevelError::BadSpeed { index: 0, .. })));
    }

    #[test]
    fn test_rejects_tiny_cells_and_bad_json() {
        let mut level = LevelConfig::dungeon();
        level.cell_size = 20.0;
        assert!(matches!(level.validate(), Err(LevelError::BadCellSize(_))));
        assert!(matches!(
            LevelConfig::from_json("{ not json"),
            Err(LevelError::Parse(_))
        ));
    }

    #[test]
    fn test_builtin_lookup() {
        assert_eq!(LevelConfig::builtin("maze"), Some(LevelConfig::patrol_maze()));
        assert!(LevelConfig::builtin("castle").is_none());
    }
}
