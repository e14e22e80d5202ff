//! The player mover
//!
//! Moves exactly one cell per request and refuses new requests until the
//! current one has arrived. Health and the post-hit invulnerability window
//! live here too.

use glam::Vec2;

use super::collision::Hitbox;
use super::grid::TileMap;
use super::motion::{Animation, Direction, GridMotion};
use crate::consts::*;

#[derive(Debug, Clone, PartialEq)]
pub struct Player {
    motion: GridMotion,
    direction: Direction,
    animation: Animation,
    health: u8,
    invulnerable: bool,
    /// Frames spent invulnerable so far
    invulnerable_ticks: u32,
}

impl Player {
    pub fn new(pos: Vec2) -> Self {
        Self {
            motion: GridMotion::new(pos, PLAYER_SPEED),
            direction: Direction::Down,
            animation: Animation::default(),
            health: MAX_HEALTH,
            invulnerable: false,
            invulnerable_ticks: 0,
        }
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
    pub fn health(&self) -> u8 {
        self.health
    }

    #[inline]
    pub fn is_invulnerable(&self) -> bool {
        self.invulnerable
    }

    pub fn is_dead(&self) -> bool {
        self.health == 0
    }

    /// Ask to step one cell. Ignored while a move is in flight; refused if
    /// the destination is not a valid target. Facing changes either way.
    pub fn request_move(&mut self, direction: Direction, map: &TileMap) -> bool {
        if self.motion.is_moving() {
            return false;
        }
        self.direction = direction;

        let target = self.motion.pos() + direction.offset().as_vec2() * map.cell_size();
        if !map.is_valid_target(target) {
            log::debug!("player move {} refused at {:?}", direction.as_str(), target);
            return false;
        }
        self.motion.set_target(target);
        true
    }

    /// Drop the in-flight move and return to the last resting cell
    pub fn cancel_movement(&mut self) {
        self.motion.cancel();
    }

    /// Per-frame update: invulnerability countdown, motion, animation
    pub fn update(&mut self) {
        if self.invulnerable {
            self.invulnerable_ticks += 1;
            if self.invulnerable_ticks >= INVULNERABLE_TICKS {
                self.invulnerable = false;
                self.invulnerable_ticks = 0;
            }
        }

        self.motion.step();

        // Idle players still breathe, just slower
        let period = if self.motion.is_moving() {
            PLAYER_MOVE_ANIM_PERIOD
        } else {
            PLAYER_IDLE_ANIM_PERIOD
        };
        self.animation.advance(period);
    }

    /// Returns true if the hit landed (false while invulnerable)
    pub fn take_damage(&mut self) -> bool {
        if self.invulnerable {
            return false;
        }
        self.health = self.health.saturating_sub(1);
        self.invulnerable = true;
        self.invulnerable_ticks = 0;
        true
    }

    /// Blink while invulnerable: hidden for BLINK_PERIOD frames, then shown
    pub fn visible(&self) -> bool {
        !self.invulnerable || self.invulnerable_ticks % (BLINK_PERIOD * 2) >= BLINK_PERIOD
    }

    pub fn hitbox(&self, cell_size: f32) -> Hitbox {
        Hitbox::for_cell(self.motion.pos(), cell_size, HITBOX_MARGIN)
    }

    /// Sprite name, e.g. `player/player_left_2`
    pub fn sprite_key(&self) -> String {
        format!(
            "player/player_{}_{}",
            self.direction.as_str(),
            self.animation.frame()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::grid::Tile;
    use glam::IVec2;

    fn open_map() -> TileMap {
        let bounds = Vec2::new(SCREEN_WIDTH, SCREEN_HEIGHT);
        let mut map = TileMap::new(16, 14, CELL_SIZE, bounds, Tile::Empty);
        map.set(IVec2::new(2, 1), Tile::Wall);
        map
    }

    #[test]
    fn test_move_right_from_two_two() {
        let map = open_map();
        let mut player = Player::new(Vec2::new(100.0, 100.0));
        assert!(player.request_move(Direction::Right, &map));
        assert_eq!(player.target(), Vec2::new(150.0, 100.0));

        let steps = (CELL_SIZE / PLAYER_SPEED).ceil() as usize;
        for _ in 0..steps {
            player.update();
        }
        assert_eq!(player.pos(), Vec2::new(150.0, 100.0));
        assert!(!player.is_moving());
        assert_eq!(player.direction(), Direction::Right);
    }

    #[test]
    fn test_moves_are_serialized() {
        let map = open_map();
        let mut player = Player::new(Vec2::new(100.0, 100.0));
        assert!(player.request_move(Direction::Down, &map));
        player.update();
        assert!(!player.request_move(Direction::Right, &map));
        assert_eq!(player.target(), Vec2::new(100.0, 150.0));
        assert_eq!(player.direction(), Direction::Down);
    }

    #[test]
    fn test_move_into_wall_is_refused_but_turns() {
        let map = open_map();
        let mut player = Player::new(Vec2::new(100.0, 100.0));
        assert!(!player.request_move(Direction::Up, &map));
        assert!(!player.is_moving());
        assert_eq!(player.target(), player.pos());
        assert_eq!(player.direction(), Direction::Up);
    }

    #[test]
    fn test_invulnerability_gates_damage() {
        let mut player = Player::new(Vec2::new(100.0, 100.0));
        assert!(player.take_damage());
        assert_eq!(player.health(), 2);

        for _ in 0..30 {
            player.update();
        }
        assert!(!player.take_damage());
        assert_eq!(player.health(), 2);

        for _ in 0..30 {
            player.update();
        }
        assert!(!player.is_invulnerable());
        assert!(player.take_damage());
        assert_eq!(player.health(), 1);
    }

    #[test]
    fn test_window_is_exactly_sixty_frames() {
        let mut player = Player::new(Vec2::new(100.0, 100.0));
        player.take_damage();
        for _ in 0..INVULNERABLE_TICKS - 1 {
            player.update();
        }
        assert!(player.is_invulnerable());
        player.update();
        assert!(!player.is_invulnerable());
    }

    #[test]
    fn test_death_at_zero_health() {
        let mut player = Player::new(Vec2::new(100.0, 100.0));
        for _ in 0..MAX_HEALTH {
            assert!(!player.is_dead());
            player.take_damage();
            for _ in 0..INVULNERABLE_TICKS {
                player.update();
            }
        }
        assert!(player.is_dead());
        assert_eq!(player.health(), 0);
    }

    #[test]
    fn test_blinks_every_five_frames() {
        let mut player = Player::new(Vec2::new(100.0, 100.0));
        assert!(player.visible());
        player.take_damage();
        let mut pattern = Vec::new();
        for _ in 0..20 {
            pattern.push(player.visible());
            player.update();
        }
        let hidden = [false; 5];
        let shown = [true; 5];
        assert_eq!(&pattern[0..5], &hidden);
        assert_eq!(&pattern[5..10], &shown);
        assert_eq!(&pattern[10..15], &hidden);
        assert_eq!(&pattern[15..20], &shown);
    }

    #[test]
    fn test_sprite_key() {
        let player = Player::new(Vec2::new(100.0, 100.0));
        assert_eq!(player.sprite_key(), "player/player_down_0");
    }
}
