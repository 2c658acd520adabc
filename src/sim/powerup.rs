//! Collectible power-ups

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::Rect;
use crate::consts::POWERUP_SIZE;

/// Bob amplitude (pixels) and angular rate (radians per second)
const BOB_AMPLITUDE: f32 = 5.0;
const BOB_RATE: f32 = 3.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PowerupKind {
    /// Faster running
    Speed,
    /// Longer vacuum reach
    Range,
    /// Wider cone and stronger pull
    Power,
    /// One extra health point
    Life,
}

impl PowerupKind {
    pub fn name(self) -> &'static str {
        match self {
            PowerupKind::Speed => "speed",
            PowerupKind::Range => "range",
            PowerupKind::Power => "power",
            PowerupKind::Life => "life",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Powerup {
    pub id: u32,
    pub kind: PowerupKind,
    /// Pickup box origin (top-left)
    pub pos: Vec2,
    pub active: bool,
    bob_timer: f32,
}

impl Powerup {
    pub fn new(id: u32, kind: PowerupKind, pos: Vec2) -> Self {
        Self {
            id,
            kind,
            pos,
            active: true,
            bob_timer: 0.0,
        }
    }

    pub fn update(&mut self, dt: f32) {
        if self.active {
            self.bob_timer += dt;
        }
    }

    /// Vertical draw offset; the pickup box itself does not move
    pub fn bob_offset(&self) -> f32 {
        (self.bob_timer * BOB_RATE).sin() * BOB_AMPLITUDE
    }

    pub fn rect(&self) -> Rect {
        Rect::from_pos_size(self.pos, Vec2::splat(POWERUP_SIZE))
    }

    pub fn touches(&self, hitbox: &Rect) -> bool {
        self.active && self.rect().intersects(hitbox)
    }
}
