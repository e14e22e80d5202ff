//! Roguelike Adventure - a top-down grid arcade game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (grid motion, tile map, enemies, collisions)
//! - `audio`: Sound effect policy (event mapping, music ducking)
//! - `settings`: Player preferences (music and sound toggles, volumes)

pub mod audio;
pub mod settings;
pub mod sim;

pub use audio::{AudioBackend, AudioManager, LogBackend, SoundEffect};
pub use settings::Settings;

use glam::{IVec2, Vec2};

/// Game configuration constants
pub mod consts {
    /// Nominal simulation rate; one `tick` per rendered frame
    pub const SIM_HZ: u32 = 60;

    /// Grid cell edge in pixels
    pub const CELL_SIZE: f32 = 50.0;
    /// Playable pixel bounds (window size)
    pub const SCREEN_WIDTH: f32 = 800.0;
    pub const SCREEN_HEIGHT: f32 = 600.0;

    /// Player movement, pixels per frame
    pub const PLAYER_SPEED: f32 = 5.0;
    /// Player animation period in frames while walking / standing
    pub const PLAYER_MOVE_ANIM_PERIOD: f32 = 3.0;
    pub const PLAYER_IDLE_ANIM_PERIOD: f32 = 6.0;

    /// Player health
    pub const MAX_HEALTH: u8 = 3;
    /// Invulnerability window after a hit (1 second)
    pub const INVULNERABLE_TICKS: u32 = 60;
    /// Sprite visibility toggles every BLINK_PERIOD frames while invulnerable
    pub const BLINK_PERIOD: u32 = 5;

    /// Hitboxes are the cell box inset by this margin on every side
    pub const HITBOX_MARGIN: f32 = 10.0;
    /// Points per gem
    pub const GEM_SCORE: u64 = 100;

    /// Wanderer rest between moves, inclusive range in frames
    pub const WANDER_COOLDOWN_MIN: u32 = 30;
    pub const WANDER_COOLDOWN_MAX: u32 = 90;

    /// Default patroller tuning
    pub const PATROL_SPEED: f32 = 2.0;
    pub const PATROL_ANIM_PERIOD: f32 = 11.0;

    /// Frames per animation cycle (every sprite sheet has four)
    pub const ANIMATION_FRAMES: u8 = 4;

    /// Music volume normally and while an effect is being highlighted
    pub const NORMAL_MUSIC_VOLUME: f32 = 1.0;
    pub const LOWERED_MUSIC_VOLUME: f32 = 0.3;
    /// How long music stays ducked (1.5 seconds)
    pub const MUSIC_DUCK_TICKS: u32 = 90;
    /// Delay before the gem chime repeats
    pub const GEM_ECHO_TICKS: u32 = 6;
}

/// Pixel position of a cell's top-left corner
#[inline]
pub fn cell_to_pixel(cell: IVec2, cell_size: f32) -> Vec2 {
    cell.as_vec2() * cell_size
}

/// Cell containing a pixel position (floor division by cell size)
#[inline]
pub fn pixel_to_cell(pos: Vec2, cell_size: f32) -> IVec2 {
    (pos / cell_size).floor().as_ivec2()
}
