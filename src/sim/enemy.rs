//! Enemies
//!
//! One `Enemy` type for every monster. What differs between a ghost and a
//! slime is an `EnemyProfile` (speed, animation period); what differs between
//! a wanderer and a patroller is the `Behavior` variant.

use glam::{IVec2, Vec2};
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::collision::Hitbox;
use super::grid::TileMap;
use super::motion::{Animation, Direction, GridMotion};
use crate::consts::*;

/// Monster flavour; picks the sprite set and default tuning
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnemyKind {
    Ghost,
    Skeleton,
    Slime,
}

impl EnemyKind {
    pub fn as_str(self) -> &'static str {
        match self {
            EnemyKind::Ghost => "ghost",
            EnemyKind::Skeleton => "skeleton",
            EnemyKind::Slime => "slime",
        }
    }

    /// Wandering defaults: ghosts drift, skeletons walk, slimes crawl
    pub fn profile(self) -> EnemyProfile {
        match self {
            EnemyKind::Ghost => EnemyProfile::new(1.5, 7.2),
            EnemyKind::Skeleton => EnemyProfile::new(2.0, 6.0),
            EnemyKind::Slime => EnemyProfile::new(1.0, 4.8),
        }
    }
}

/// Per-enemy tuning
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnemyProfile {
    /// Pixels per frame
    pub speed: f32,
    /// Frames per animation step
    pub animation_period: f32,
}

impl EnemyProfile {
    pub fn new(speed: f32, animation_period: f32) -> Self {
        Self {
            speed,
            animation_period,
        }
    }
}

/// Inclusive pixel rectangle a wanderer's targets must stay in
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WanderBounds {
    pub min: Vec2,
    pub max: Vec2,
}

impl WanderBounds {
    /// `margin` cells in from every edge of the grid
    pub fn inset(map: &TileMap, margin: i32) -> Self {
        let cs = map.cell_size();
        Self {
            min: Vec2::splat(margin as f32 * cs),
            max: Vec2::new(
                (map.cols() - 1 - margin) as f32 * cs,
                (map.rows() - 1 - margin) as f32 * cs,
            ),
        }
    }

    pub fn contains(&self, pos: Vec2) -> bool {
        pos.cmpge(self.min).all() && pos.cmple(self.max).all()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WanderState {
    /// Resting; picks a new direction once the cooldown hits zero
    Idle { cooldown: u32 },
    /// Heading for the committed target. `retreating` means the first
    /// target was abandoned and no rest follows arrival.
    Moving { retreating: bool },
}

#[derive(Debug, Clone, PartialEq)]
pub enum Behavior {
    Wander {
        bounds: WanderBounds,
        state: WanderState,
    },
    Patrol {
        waypoints: Vec<IVec2>,
        current: usize,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Enemy {
    kind: EnemyKind,
    profile: EnemyProfile,
    motion: GridMotion,
    direction: Direction,
    animation: Animation,
    behavior: Behavior,
}

impl Enemy {
    /// Random walker. Starts idle with no cooldown, so it sets off on its
    /// first update.
    pub fn wanderer<R: Rng + ?Sized>(
        kind: EnemyKind,
        profile: EnemyProfile,
        pos: Vec2,
        bounds: WanderBounds,
        rng: &mut R,
    ) -> Self {
        let direction = Direction::ALL[rng.random_range(0..Direction::ALL.len())];
        Self {
            kind,
            profile,
            motion: GridMotion::new(pos, profile.speed),
            direction,
            animation: Animation::default(),
            behavior: Behavior::Wander {
                bounds,
                state: WanderState::Idle { cooldown: 0 },
            },
        }
    }

    /// Route follower. `waypoints` must be non-empty; the level loader
    /// checks that, and an empty route just leaves the enemy standing.
    pub fn patroller(
        kind: EnemyKind,
        profile: EnemyProfile,
        pos: Vec2,
        waypoints: Vec<IVec2>,
        cell_size: f32,
    ) -> Self {
        let mut motion = GridMotion::new(pos, profile.speed);
        if let Some(&first) = waypoints.first() {
            motion.set_target(crate::cell_to_pixel(first, cell_size));
        }
        let direction = Direction::from_delta(motion.target() - pos).unwrap_or_default();
        Self {
            kind,
            profile,
            motion,
            direction,
            animation: Animation::default(),
            behavior: Behavior::Patrol {
                waypoints,
                current: 0,
            },
        }
    }

    #[inline]
    pub fn kind(&self) -> EnemyKind {
        self.kind
    }

    #[inline]
    pub fn profile(&self) -> EnemyProfile {
        self.profile
    }

    #[inline]
    pub fn pos(&self) -> Vec2 {
        self.motion.pos()
    }

    #[inline]
    pub fn target(&self) -> Vec2 {
        self.motion.target()
    }

    #[inline]
    pub fn is_moving(&self) -> bool {
        self.motion.is_moving()
    }

    #[inline]
    pub fn direction(&self) -> Direction {
        self.direction
    }

    #[inline]
    pub fn animation_frame(&self) -> u8 {
        self.animation.frame()
    }

    #[inline]
    pub fn behavior(&self) -> &Behavior {
        &self.behavior
    }

    /// Current waypoint index for patrollers
    pub fn patrol_index(&self) -> Option<usize> {
        match self.behavior {
            Behavior::Patrol { current, .. } => Some(current),
            Behavior::Wander { .. } => None,
        }
    }

    /// True if the committed target has become unenterable
    pub fn has_invalid_target(&self, map: &TileMap) -> bool {
        self.motion.is_moving() && !map.is_valid_target(self.motion.target())
    }

    /// Per-frame behavior step
    pub fn update<R: Rng + ?Sized>(&mut self, map: &TileMap, rng: &mut R) {
        match self.behavior {
            Behavior::Wander { .. } => self.update_wander(map, rng),
            Behavior::Patrol { .. } => self.update_patrol(map),
        }
    }

    fn update_wander<R: Rng + ?Sized>(&mut self, map: &TileMap, rng: &mut R) {
        let Behavior::Wander { bounds, state } = &mut self.behavior else {
            return;
        };

        match *state {
            WanderState::Moving { retreating } => {
                if self.motion.step() {
                    let cooldown = if retreating { 0 } else { roll_cooldown(rng) };
                    *state = WanderState::Idle { cooldown };
                }
                self.animation.advance(self.profile.animation_period);
            }
            WanderState::Idle { cooldown } if cooldown > 0 => {
                *state = WanderState::Idle {
                    cooldown: cooldown - 1,
                };
            }
            WanderState::Idle { .. } => match pick_step(self.motion.pos(), bounds, map, rng) {
                Some((direction, target)) => {
                    self.direction = direction;
                    self.motion.set_target(target);
                    *state = WanderState::Moving { retreating: false };
                }
                None => {
                    // Boxed in: sit out another cooldown and try again
                    *state = WanderState::Idle {
                        cooldown: roll_cooldown(rng),
                    };
                }
            },
        }
    }

    fn update_patrol(&mut self, map: &TileMap) {
        // Resting on a waypoint (spawned on it, or a one-point route) counts
        // as having arrived there
        if !self.motion.is_moving() {
            self.advance_patrol(map);
        }
        if self.motion.step() {
            self.advance_patrol(map);
        }
        if let Some(direction) = Direction::from_delta(self.motion.target() - self.motion.pos()) {
            self.direction = direction;
        }
        self.animation.advance(self.profile.animation_period);
    }

    /// Move on to the next waypoint that is currently enterable. With none
    /// available, fall back to the last resting cell.
    fn advance_patrol(&mut self, map: &TileMap) {
        let Behavior::Patrol { waypoints, current } = &mut self.behavior else {
            return;
        };
        let len = waypoints.len();
        if len == 0 {
            return;
        }

        let next = (1..=len)
            .map(|offset| (*current + offset) % len)
            .find(|&i| map.is_valid_target(map.cell_origin(waypoints[i])));
        match next {
            Some(i) => {
                *current = i;
                self.motion.set_target(map.cell_origin(waypoints[i]));
            }
            None => self.motion.cancel(),
        }
    }

    /// The committed target turned out to be invalid (the map changed under
    /// us). Wanderers head back to their last cell and pick a fresh direction
    /// as soon as they get there; patrollers skip to the next usable waypoint.
    pub fn redirect(&mut self, map: &TileMap) {
        log::debug!(
            "{} redirected away from {:?}",
            self.kind.as_str(),
            self.motion.target()
        );
        match self.behavior {
            Behavior::Wander { .. } => self.retreat(),
            Behavior::Patrol { .. } => self.advance_patrol(map),
        }
    }

    fn retreat(&mut self) {
        let Behavior::Wander { state, .. } = &mut self.behavior else {
            return;
        };
        self.motion.cancel();
        *state = if self.motion.is_moving() {
            WanderState::Moving { retreating: true }
        } else {
            WanderState::Idle { cooldown: 0 }
        };
        if let Some(direction) = Direction::from_delta(self.motion.target() - self.motion.pos()) {
            self.direction = direction;
        }
    }

    pub fn hitbox(&self, cell_size: f32) -> Hitbox {
        Hitbox::for_cell(self.motion.pos(), cell_size, HITBOX_MARGIN)
    }

    pub fn collides_with(&self, other: &Hitbox, cell_size: f32) -> bool {
        self.hitbox(cell_size).overlaps(other)
    }

    /// Sprite name, e.g. `enemies/ghost/ghost_left_2`
    pub fn sprite_key(&self) -> String {
        let kind = self.kind.as_str();
        format!(
            "enemies/{kind}/{kind}_{}_{}",
            self.direction.as_str(),
            self.animation.frame()
        )
    }
}

fn roll_cooldown<R: Rng + ?Sized>(rng: &mut R) -> u32 {
    rng.random_range(WANDER_COOLDOWN_MIN..=WANDER_COOLDOWN_MAX)
}

/// Uniform choice among the single-cell steps that stay inside `bounds` and
/// land on a valid target
fn pick_step<R: Rng + ?Sized>(
    pos: Vec2,
    bounds: &WanderBounds,
    map: &TileMap,
    rng: &mut R,
) -> Option<(Direction, Vec2)> {
    let candidates: Vec<(Direction, Vec2)> = Direction::ALL
        .iter()
        .map(|&d| (d, pos + d.offset().as_vec2() * map.cell_size()))
        .filter(|&(_, target)| bounds.contains(target) && map.is_valid_target(target))
        .collect();

    if candidates.is_empty() {
        return None;
    }
    Some(candidates[rng.random_range(0..candidates.len())])
}
