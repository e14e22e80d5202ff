//! Tile map and target validity
//!
//! The map is a fixed-size grid of tiles addressed by (column, row). Movers
//! never commit to a target pixel without asking `is_valid_target` first;
//! pickups write back into the grid, so validity can change mid-game.

use glam::{IVec2, Vec2};

use crate::{cell_to_pixel, pixel_to_cell};

/// Tile kinds, with the numeric codes used by level files
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tile {
    #[default]
    Empty,
    Wall,
    Collectible,
}

impl Tile {
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(Tile::Empty),
            1 => Some(Tile::Wall),
            2 => Some(Tile::Collectible),
            _ => None,
        }
    }

    pub fn code(self) -> u8 {
        match self {
            Tile::Empty => 0,
            Tile::Wall => 1,
            Tile::Collectible => 2,
        }
    }

    /// Walls block; everything else can be entered
    #[inline]
    pub fn is_passable(self) -> bool {
        self != Tile::Wall
    }
}

/// Grid of tiles plus the pixel bounds movers must stay inside
#[derive(Debug, Clone, PartialEq)]
pub struct TileMap {
    cols: i32,
    rows: i32,
    cell_size: f32,
    /// Playable pixel extent; may be smaller than the grid itself
    bounds: Vec2,
    /// Row-major
    tiles: Vec<Tile>,
}

impl TileMap {
    pub fn new(cols: i32, rows: i32, cell_size: f32, bounds: Vec2, fill: Tile) -> Self {
        let len = (cols.max(0) * rows.max(0)) as usize;
        Self {
            cols: cols.max(0),
            rows: rows.max(0),
            cell_size,
            bounds,
            tiles: vec![fill; len],
        }
    }

    /// Build from level codes. Unknown codes become walls; level validation
    /// rejects them before a map is ever built from untrusted input.
    pub fn from_codes(grid: &[Vec<u8>], cell_size: f32, bounds: Vec2) -> Self {
        let rows = grid.len() as i32;
        let cols = grid.first().map(|r| r.len()).unwrap_or(0) as i32;
        let mut map = Self::new(cols, rows, cell_size, bounds, Tile::Empty);
        for (y, row) in grid.iter().enumerate() {
            for (x, &code) in row.iter().enumerate().take(cols as usize) {
                let tile = Tile::from_code(code).unwrap_or(Tile::Wall);
                map.set(IVec2::new(x as i32, y as i32), tile);
            }
        }
        map
    }

    #[inline]
    pub fn cols(&self) -> i32 {
        self.cols
    }

    #[inline]
    pub fn rows(&self) -> i32 {
        self.rows
    }

    #[inline]
    pub fn cell_size(&self) -> f32 {
        self.cell_size
    }

    #[inline]
    pub fn bounds(&self) -> Vec2 {
        self.bounds
    }

    pub fn in_grid(&self, cell: IVec2) -> bool {
        cell.x >= 0 && cell.y >= 0 && cell.x < self.cols && cell.y < self.rows
    }

    fn index(&self, cell: IVec2) -> Option<usize> {
        self.in_grid(cell).then(|| (cell.y * self.cols + cell.x) as usize)
    }

    pub fn get(&self, cell: IVec2) -> Option<Tile> {
        self.index(cell).map(|i| self.tiles[i])
    }

    /// Overwrite a tile; returns false if the cell is outside the grid
    pub fn set(&mut self, cell: IVec2, tile: Tile) -> bool {
        match self.index(cell) {
            Some(i) => {
                self.tiles[i] = tile;
                true
            }
            None => false,
        }
    }

    /// Cell under a pixel position
    #[inline]
    pub fn cell_at(&self, pos: Vec2) -> IVec2 {
        pixel_to_cell(pos, self.cell_size)
    }

    /// Top-left pixel of a cell
    #[inline]
    pub fn cell_origin(&self, cell: IVec2) -> Vec2 {
        cell_to_pixel(cell, self.cell_size)
    }

    /// Can a mover commit to this pixel target?
    ///
    /// Rejects anything outside `[0, width - cell) x [0, height - cell)`, then
    /// anything off the grid, then walls.
    pub fn is_valid_target(&self, pos: Vec2) -> bool {
        let max = self.bounds - Vec2::splat(self.cell_size);
        if !(pos.x >= 0.0 && pos.y >= 0.0 && pos.x < max.x && pos.y < max.y) {
            return false;
        }
        self.get(self.cell_at(pos)).is_some_and(|tile| tile.is_passable())
    }

    /// All cells holding the given tile, in row-major order
    pub fn cells_of(&self, kind: Tile) -> impl Iterator<Item = IVec2> + '_ {
        let cols = self.cols;
        self.tiles
            .iter()
            .enumerate()
            .filter(move |(_, t)| **t == kind)
            .map(move |(i, _)| IVec2::new(i as i32 % cols, i as i32 / cols))
    }
}
