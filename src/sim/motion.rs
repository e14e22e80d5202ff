//! Grid-to-continuous motion
//!
//! Movers live on a cell grid but slide between cells at a constant pixel
//! speed. `GridMotion` owns that interpolation and reports the arrival frame.
//! Fixed timestep only: speed is pixels per tick, not per second.

use glam::{IVec2, Vec2};
use serde::{Deserialize, Serialize};

use crate::consts::ANIMATION_FRAMES;

/// Facing / heading on the grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Up,
    #[default]
    Down,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    /// Cell offset (y grows downward)
    pub fn offset(self) -> IVec2 {
        match self {
            Direction::Up => IVec2::new(0, -1),
            Direction::Down => IVec2::new(0, 1),
            Direction::Left => IVec2::new(-1, 0),
            Direction::Right => IVec2::new(1, 0),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Direction::Up => "up",
            Direction::Down => "down",
            Direction::Left => "left",
            Direction::Right => "right",
        }
    }

    /// Heading along the dominant axis of a travel vector
    pub fn from_delta(delta: Vec2) -> Option<Self> {
        if delta == Vec2::ZERO {
            return None;
        }
        Some(if delta.x.abs() > delta.y.abs() {
            if delta.x > 0.0 { Direction::Right } else { Direction::Left }
        } else if delta.y > 0.0 {
            Direction::Down
        } else {
            Direction::Up
        })
    }
}

/// Constant-speed interpolation toward a grid-aligned target
#[derive(Debug, Clone, PartialEq)]
pub struct GridMotion {
    pos: Vec2,
    target: Vec2,
    /// Last cell the mover came to rest on
    origin: Vec2,
    speed: f32,
    moving: bool,
}

impl GridMotion {
    /// At rest on `pos`
    pub fn new(pos: Vec2, speed: f32) -> Self {
        Self {
            pos,
            target: pos,
            origin: pos,
            speed,
            moving: false,
        }
    }

    #[inline]
    pub fn pos(&self) -> Vec2 {
        self.pos
    }

    #[inline]
    pub fn target(&self) -> Vec2 {
        self.target
    }

    #[inline]
    pub fn origin(&self) -> Vec2 {
        self.origin
    }

    #[inline]
    pub fn speed(&self) -> f32 {
        self.speed
    }

    #[inline]
    pub fn is_moving(&self) -> bool {
        self.moving
    }

    /// Commit a target. The caller has already validated it against the map.
    pub fn set_target(&mut self, target: Vec2) {
        self.target = target;
        self.moving = self.pos != target;
    }

    /// Abandon the current target and head back to the last resting cell.
    /// A mover that has not left that cell simply stops.
    pub fn cancel(&mut self) {
        self.set_target(self.origin);
    }

    /// Advance one frame. Returns true on the arrival frame.
    pub fn step(&mut self) -> bool {
        if !self.moving {
            return false;
        }

        let delta = self.target - self.pos;
        let distance = delta.length();
        if distance <= self.speed {
            // Also covers distance == 0, so the division below never sees it
            self.pos = self.target;
            self.origin = self.target;
            self.moving = false;
            return true;
        }

        self.pos += delta / distance * self.speed;
        false
    }
}

/// Four-frame sprite cycle driven by a frame counter
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Animation {
    frame: u8,
    timer: u32,
}

impl Animation {
    #[inline]
    pub fn frame(&self) -> u8 {
        self.frame
    }

    /// Count one tick; flip to the next frame once `period` ticks have passed
    pub fn advance(&mut self, period: f32) {
        self.timer += 1;
        if self.timer as f32 >= period {
            self.frame = (self.frame + 1) % ANIMATION_FRAMES;
            self.timer = 0;
        }
    }
}
