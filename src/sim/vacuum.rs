//! Vacuum aim, cone geometry and capture inventory
//!
//! - Aim comes from four directional keys, most recent press wins
//! - An enemy is pullable inside a range + half-angle cone around the aim
//! - Captured enemies live in a bounded stack as kinds only

use glam::Vec2;

use super::enemy::EnemyKind;
use crate::input::{InputFrame, Key};
use crate::{angle_difference_deg, frames, vector_angle_deg};

/// Stop pulling once this close to avoid jitter
pub const PULL_DEAD_ZONE: f32 = 5.0;
/// Float slack on the range check so targets placed exactly at range count
const RANGE_TOLERANCE: f32 = 1e-3;

/// One of the four aim/launch directions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AimDirection {
    Right,
    Up,
    Left,
    Down,
}

impl AimDirection {
    /// Key priority when several aim keys are held
    pub const PRIORITY: [AimDirection; 4] = [
        AimDirection::Right,
        AimDirection::Up,
        AimDirection::Left,
        AimDirection::Down,
    ];

    pub fn from_facing(facing_right: bool) -> Self {
        if facing_right {
            AimDirection::Right
        } else {
            AimDirection::Left
        }
    }

    /// Canonical screen angle in degrees (+y is down)
    pub fn angle_deg(self) -> f32 {
        match self {
            AimDirection::Right => 0.0,
            AimDirection::Up => -90.0,
            AimDirection::Left => 180.0,
            AimDirection::Down => 90.0,
        }
    }

    pub fn unit(self) -> Vec2 {
        match self {
            AimDirection::Right => Vec2::X,
            AimDirection::Up => Vec2::NEG_Y,
            AimDirection::Left => Vec2::NEG_X,
            AimDirection::Down => Vec2::Y,
        }
    }

    pub fn is_vertical(self) -> bool {
        matches!(self, AimDirection::Up | AimDirection::Down)
    }

    pub fn key(self) -> Key {
        match self {
            AimDirection::Right => Key::AimRight,
            AimDirection::Up => Key::AimUp,
            AimDirection::Left => Key::AimLeft,
            AimDirection::Down => Key::AimDown,
        }
    }
}

/// Pick the aim for this tick.
///
/// A key pressed this tick wins; otherwise the current aim sticks while its
/// key is held; otherwise any held key by priority; otherwise `None`.
pub fn held_aim(input: &InputFrame, current: AimDirection) -> Option<AimDirection> {
    AimDirection::PRIORITY
        .into_iter()
        .find(|d| input.pressed(d.key()))
        .or_else(|| input.held(current.key()).then_some(current))
        .or_else(|| {
            AimDirection::PRIORITY
                .into_iter()
                .find(|d| input.held(d.key()))
        })
}

/// Whether `target` lies inside the vacuum cone from `origin`
pub fn in_vacuum_cone(
    origin: Vec2,
    target: Vec2,
    direction: AimDirection,
    range: f32,
    half_angle_deg: f32,
) -> bool {
    let delta = target - origin;
    if delta.length() > range + RANGE_TOLERANCE {
        return false;
    }
    if delta.length_squared() == 0.0 {
        return true;
    }
    angle_difference_deg(vector_angle_deg(delta), direction.angle_deg()) < half_angle_deg
}

/// Displacement that pulls `from` toward `to` at `power` per reference frame
pub fn pull_step(from: Vec2, to: Vec2, power: f32, dt: f32) -> Vec2 {
    let delta = to - from;
    let dist = delta.length();
    if dist <= PULL_DEAD_ZONE {
        return Vec2::ZERO;
    }
    let step = (power * frames(dt)).min(dist);
    delta / dist * step
}

/// A stat with a timed multiplier from a power-up
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Boosted {
    pub base: f32,
    multiplier: f32,
    remaining: f32,
}

impl Boosted {
    pub fn new(base: f32) -> Self {
        Self {
            base,
            multiplier: 1.0,
            remaining: 0.0,
        }
    }

    pub fn value(&self) -> f32 {
        self.base * self.multiplier
    }

    pub fn is_boosted(&self) -> bool {
        self.remaining > 0.0
    }

    pub fn remaining(&self) -> f32 {
        self.remaining
    }

    pub fn boost(&mut self, multiplier: f32, duration: f32) {
        self.multiplier = multiplier;
        self.remaining = duration;
    }

    pub fn tick(&mut self, dt: f32) {
        if self.remaining > 0.0 {
            self.remaining -= dt;
            if self.remaining <= 0.0 {
                self.remaining = 0.0;
                self.multiplier = 1.0;
            }
        }
    }
}

/// Bounded stack of captured enemy kinds
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CaptureStack {
    kinds: Vec<EnemyKind>,
    capacity: usize,
}

impl CaptureStack {
    pub fn new(capacity: usize) -> Self {
        Self {
            kinds: Vec::with_capacity(capacity),
            capacity,
        }
    }

    pub fn len(&self) -> usize {
        self.kinds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.kinds.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn is_full(&self) -> bool {
        self.kinds.len() >= self.capacity
    }

    pub fn kinds(&self) -> &[EnemyKind] {
        &self.kinds
    }

    /// Push a kind; returns false (stack unchanged) when full
    pub fn push(&mut self, kind: EnemyKind) -> bool {
        if self.is_full() {
            return false;
        }
        self.kinds.push(kind);
        true
    }

    /// Most recent capture
    pub fn pop(&mut self) -> Option<EnemyKind> {
        self.kinds.pop()
    }

    /// Empty the stack, oldest capture first
    pub fn drain_all(&mut self) -> Vec<EnemyKind> {
        std::mem::take(&mut self.kinds)
    }

    pub fn reset(&mut self, capacity: usize) {
        self.kinds.clear();
        self.capacity = capacity;
    }
}

/// Beam animation phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BeamPhase {
    #[default]
    Off,
    Grow,
    Sustain,
    Shrink,
}

/// Vacuum beam frame counter
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct BeamAnim {
    pub phase: BeamPhase,
    pub frame: f32,
}

impl BeamAnim {
    pub fn update(&mut self, active: bool, dt: f32, total_frames: u16, speed: f32) {
        if active {
            if matches!(self.phase, BeamPhase::Off | BeamPhase::Shrink) {
                self.phase = BeamPhase::Grow;
            }
        } else if matches!(self.phase, BeamPhase::Grow | BeamPhase::Sustain) {
            self.phase = BeamPhase::Shrink;
        }

        if total_frames == 0 {
            return;
        }
        let max = total_frames as f32;
        let grow_end = max - 1.0;
        let sustain_start = max * 0.6;

        match self.phase {
            BeamPhase::Grow => {
                self.frame += dt * speed;
                if self.frame >= grow_end {
                    self.phase = BeamPhase::Sustain;
                    self.frame = grow_end;
                }
            }
            BeamPhase::Sustain => {
                self.frame += dt * speed;
                if self.frame >= max {
                    self.frame = sustain_start;
                }
            }
            BeamPhase::Shrink => {
                self.frame -= dt * speed * 1.5;
                if self.frame <= 0.0 {
                    self.frame = 0.0;
                    self.phase = BeamPhase::Off;
                }
            }
            BeamPhase::Off => {}
        }
    }

    pub fn is_visible(&self) -> bool {
        self.phase != BeamPhase::Off
    }
}
