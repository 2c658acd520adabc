//! VacPop - a single-screen vacuum-and-throw arcade platformer
//!
//! Core modules:
//! - `sim`: Deterministic simulation (tile collision, player, enemies, projectiles, scoring)
//! - `input`: Key snapshots and edge detection
//! - `render`: Draw-call composition and sprite-sheet frame lookup
//! - `audio`: Sound cue mapping for simulation events
//! - `settings` / `tuning`: Player preferences and data-driven game balance

pub mod audio;
pub mod input;
pub mod render;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use settings::{Settings, SettingsError};
pub use tuning::Tuning;

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (the reference frame rate)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Velocities are authored in pixels per reference frame
    pub const REFERENCE_FPS: f32 = 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;
    /// Frame delta clamp (bounds physics step after stalls)
    pub const MAX_FRAME_DT: f32 = 0.1;

    /// Screen dimensions (pixels)
    pub const SCREEN_WIDTH: f32 = 1136.0;
    pub const SCREEN_HEIGHT: f32 = 896.0;

    /// Tile grid
    pub const CELL_SIZE: i32 = 64;
    pub const LEVEL_ROWS: i32 = 14;
    pub const LEVEL_COLS: i32 = 18;
    /// Row drawn (and collided) higher than its grid height
    pub const STAGGER_ROW: i32 = 11;
    pub const STAGGER_OFFSET: i32 = -44;

    /// Physics (per reference frame)
    pub const GRAVITY: f32 = 0.8;
    pub const TERMINAL_VELOCITY: f32 = 15.0;
    pub const JUMP_STRENGTH: f32 = -18.0;
    /// Sprite nudge below the collision surface while grounded
    pub const GROUND_SNAP_PX: f32 = 12.0;

    /// Player sprite frames are 96px drawn at 1.95x
    pub const PLAYER_FRAME_WIDTH: i32 = 96;
    pub const PLAYER_FRAME_HEIGHT: i32 = 96;
    pub const PLAYER_SCALE: f32 = 1.95;
    pub const PLAYER_WIDTH: f32 = 187.0;
    pub const PLAYER_HEIGHT: f32 = 187.0;
    pub const PLAYER_FOOT_MARGIN: f32 = 10.0;
    pub const PLAYER_MAX_HEALTH: u8 = 5;
    pub const PLAYER_START_HEALTH: u8 = 3;
    pub const PLAYER_SPAWN_X: f32 = 100.0;
    pub const PLAYER_SPAWN_Y: f32 = 700.0;

    /// Enemy sprite frames are 64px drawn at 1.75x
    pub const ENEMY_FRAME_WIDTH: i32 = 64;
    pub const ENEMY_FRAME_HEIGHT: i32 = 64;
    pub const ENEMY_SCALE: f32 = 1.75;
    pub const ENEMY_WIDTH: f32 = 112.0;
    pub const ENEMY_HEIGHT: f32 = 112.0;
    pub const ENEMY_FOOT_MARGIN: f32 = 5.0;

    /// Player-fired projectiles
    pub const PROJECTILE_SPEED: f32 = 12.0;
    pub const ROLL_SPEED: f32 = 0.9;
    pub const PROJECTILE_LIFETIME: f32 = 10.0;
    pub const PROJECTILE_SIZE: f32 = 44.0;
    pub const PROJECTILE_SCALE: f32 = 1.4;

    /// Enemy-fired projectiles
    pub const ENEMY_SHOT_SPEED: f32 = 5.5;
    pub const ENEMY_SHOT_SIZE: f32 = 16.0;
    pub const OFFSCREEN_MARGIN: f32 = 50.0;

    /// Power-up pickup box
    pub const POWERUP_SIZE: f32 = 48.0;
}

/// Convert a pixel coordinate to a grid index (floors, so negatives stay out of bounds)
#[inline]
pub fn cell_of(px: f32) -> i32 {
    (px / consts::CELL_SIZE as f32).floor() as i32
}

/// Number of reference frames covered by `dt` seconds
#[inline]
pub fn frames(dt: f32) -> f32 {
    dt * consts::REFERENCE_FPS
}

/// Absolute angular difference in degrees, wrapped into [0, 180]
#[inline]
pub fn angle_difference_deg(a: f32, b: f32) -> f32 {
    let diff = (a - b).abs() % 360.0;
    if diff > 180.0 { 360.0 - diff } else { diff }
}

/// Angle of a vector in degrees (screen space: +y is down)
#[inline]
pub fn vector_angle_deg(v: Vec2) -> f32 {
    v.y.atan2(v.x).to_degrees()
}
