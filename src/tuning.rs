//! Data-driven game balance
//!
//! Timers, multipliers and toggles the simulation reads every tick. Loaded as
//! part of `Settings`; every field has a default so partial JSON documents work.

use serde::{Deserialize, Serialize};

use crate::sim::Character;

/// Base stats of a selectable character
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CharacterStats {
    /// Horizontal speed (pixels per reference frame)
    pub speed: f32,
    pub vacuum_range: f32,
    /// Half-width of the vacuum cone in degrees
    pub vacuum_angle: f32,
    /// Pull speed (pixels per reference frame)
    pub vacuum_power: f32,
}

/// Balance values shared by the simulation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub yellow: CharacterStats,
    pub green: CharacterStats,
    /// Seconds between single shots
    pub shot_cooldown: f32,
    /// Seconds between burst releases
    pub burst_cooldown: f32,
    /// Horizontal spacing between burst projectiles
    pub burst_spread: f32,
    /// Invulnerability after taking damage
    pub invulnerability: f32,
    /// Delay between the killing blow and game over
    pub death_delay: f32,
    /// Power-up effect duration
    pub powerup_duration: f32,
    pub speed_boost: f32,
    pub range_boost: f32,
    pub power_boost: f32,
    /// Combo decays after this many seconds without a defeat
    pub combo_window: f32,
    /// Horizontal distance at which an approaching projectile triggers the alert pose
    pub danger_radius: f32,
    /// Pause between a cleared wave and the next one
    pub wave_delay: f32,
    /// Frames in the vacuum beam sequence
    pub vacuum_frames: u16,
    /// Vacuum beam frames per second while growing
    pub vacuum_anim_speed: f32,
    /// Contact damage only from enemies within one row (chelnov always hits)
    pub row_gated_contact: bool,
    /// Vertical launches target the row holding the most enemies
    pub projectile_row_assist: bool,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            yellow: CharacterStats {
                speed: 8.0,
                vacuum_range: 180.0,
                vacuum_angle: 54.0,
                vacuum_power: 5.0,
            },
            green: CharacterStats {
                speed: 12.0,
                vacuum_range: 150.0,
                vacuum_angle: 45.0,
                vacuum_power: 5.0,
            },
            shot_cooldown: 0.4,
            burst_cooldown: 1.5,
            burst_spread: 30.0,
            invulnerability: 2.0,
            death_delay: 1.2,
            powerup_duration: 10.0,
            speed_boost: 2.0,
            range_boost: 1.5,
            power_boost: 1.5,
            combo_window: 3.0,
            danger_radius: 240.0,
            wave_delay: 1.0,
            vacuum_frames: 8,
            vacuum_anim_speed: 24.0,
            row_gated_contact: true,
            projectile_row_assist: true,
        }
    }
}

impl Tuning {
    pub fn character(&self, character: Character) -> CharacterStats {
        match character {
            Character::Yellow => self.yellow,
            Character::Green => self.green,
        }
    }
}
