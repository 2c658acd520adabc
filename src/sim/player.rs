//! Player controller
//!
//! - Direct horizontal control (no acceleration), grounded jumps with a short
//!   forward carry
//! - Vacuum aim, activation and beam animation
//! - Bounded capture stack
//! - Animation state machine driven by ground contact and vertical velocity

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::anim::{AnimSpec, AnimState, Animator};
use super::collision::{Body, Probe, Rect, apply_gravity, resolve_body};
use super::grid::{Grid, Tile};
use super::powerup::PowerupKind;
use super::vacuum::{AimDirection, BeamAnim, Boosted, CaptureStack, held_aim};
use crate::consts::*;
use crate::input::{InputFrame, Key};
use crate::tuning::{CharacterStats, Tuning};
use crate::{cell_of, frames};

/// Seconds a jump keeps carrying the player forward without input
pub const JUMP_CARRY: f32 = 0.35;
/// Pixels the player is nudged forward on take-off
pub const JUMP_NUDGE: f32 = 18.0;
/// Below this horizontal speed the player counts as standing
const STANDING_SPEED: f32 = 0.1;

/// Selectable playable characters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Character {
    /// Long reach, wide cone
    #[default]
    Yellow,
    /// Fast runner, tighter cone
    Green,
}

impl Character {
    pub fn name(self) -> &'static str {
        match self {
            Character::Yellow => "yellow",
            Character::Green => "green",
        }
    }
}

/// Player animation states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlayerAnim {
    Idle,
    Run,
    Slide,
    JumpStart,
    JumpMid,
    JumpPeak,
    Fall,
    Alert,
    Land,
    Crouch,
    Hurt,
    Knockdown,
    Victory,
    DeathFade,
    PowerRun,
    Jetpack,
    Shoot,
    ShootForward,
    ShootSide,
}

impl AnimState for PlayerAnim {
    type Context = ();

    fn spec(self, _: ()) -> AnimSpec {
        use PlayerAnim::*;
        match self {
            Idle => AnimSpec::new("idle", 0, 4, 1, 4.0),
            Run => AnimSpec::new("run", 0, 4, 4, 10.0),
            Slide => AnimSpec::new("slide", 0, 18, 2, 10.0),
            JumpStart => AnimSpec::new("jump_start", 0, 12, 2, 14.0),
            JumpMid => AnimSpec::new("jump_mid", 0, 14, 2, 12.0),
            JumpPeak => AnimSpec::new("jump_peak", 0, 16, 1, 10.0),
            Fall => AnimSpec::new("fall", 0, 17, 1, 10.0),
            Alert => AnimSpec::new("alert", 0, 16, 1, 10.0),
            Land => AnimSpec::new("land", 1, 19, 1, 12.0),
            Crouch => AnimSpec::new("crouch", 0, 18, 1, 8.0),
            Hurt => AnimSpec::new("hurt", 0, 19, 4, 12.0).committed(0.35),
            Knockdown => AnimSpec::new("knockdown", 1, 8, 7, 16.0).committed(0.5),
            Victory => AnimSpec::new("victory", 0, 21, 3, 10.0),
            DeathFade => AnimSpec::new("death_fade", 1, 1, 6, 8.0),
            PowerRun => AnimSpec::new("power_run", 0, 4, 4, 12.0),
            Jetpack => AnimSpec::new("jetpack", 0, 28, 3, 12.0),
            Shoot => AnimSpec::new("shoot", 0, 12, 2, 14.0).committed(0.3),
            ShootForward => AnimSpec::new("shoot_forward", 1, 0, 4, 14.0).committed(0.3),
            ShootSide => AnimSpec::new("shoot_side", 1, 4, 4, 14.0).committed(0.3),
        }
    }
}

/// Vacuum aim and activation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VacuumState {
    pub direction: AimDirection,
    pub active: bool,
    /// An aim key is held this tick
    pub aiming: bool,
    pub beam: BeamAnim,
}

impl Default for VacuumState {
    fn default() -> Self {
        Self {
            direction: AimDirection::Right,
            active: false,
            aiming: false,
            beam: BeamAnim::default(),
        }
    }
}

/// Slope cell under the player's feet
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SlopeContact {
    pub row: i32,
    pub col: i32,
    /// Exact surface height at the foot column
    pub surface_y: f32,
    /// -1 downhill to the left, 1 to the right, 0 flat
    pub downhill: i8,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Player {
    pub body: Body,
    pub character: Character,
    pub health: u8,
    pub facing_right: bool,
    pub speed: Boosted,
    pub vacuum_range: Boosted,
    pub vacuum_angle: Boosted,
    pub vacuum_power: Boosted,
    pub vacuum: VacuumState,
    pub captured: CaptureStack,
    pub anim: Animator<PlayerAnim>,
    /// Remaining forward carry after a jump
    pub jump_carry: f32,
    /// Remaining invulnerability after a hit
    pub invulnerable: f32,
    pub crouching: bool,
    /// An own projectile is rolling toward the player
    pub danger: bool,
    /// Set while standing on a ramp cell
    pub slope: Option<SlopeContact>,
}

impl Player {
    pub fn new(character: Character, stats: CharacterStats) -> Self {
        let mut player = Self {
            body: Body::new(
                Vec2::new(PLAYER_SPAWN_X, PLAYER_SPAWN_Y),
                Vec2::new(PLAYER_WIDTH, PLAYER_HEIGHT),
            ),
            character,
            health: PLAYER_START_HEALTH,
            facing_right: true,
            speed: Boosted::new(stats.speed),
            vacuum_range: Boosted::new(stats.vacuum_range),
            vacuum_angle: Boosted::new(stats.vacuum_angle),
            vacuum_power: Boosted::new(stats.vacuum_power),
            vacuum: VacuumState::default(),
            captured: CaptureStack::new(capacity_for_level(1)),
            anim: Animator::new(PlayerAnim::Idle),
            jump_carry: 0.0,
            invulnerable: 0.0,
            crouching: false,
            danger: false,
            slope: None,
        };
        player.reset(1, stats);
        player
    }

    /// Back to the spawn point with level-dependent capacity; boosts cleared
    pub fn reset(&mut self, level: u32, stats: CharacterStats) {
        self.body = Body::new(
            Vec2::new(PLAYER_SPAWN_X, PLAYER_SPAWN_Y),
            Vec2::new(PLAYER_WIDTH, PLAYER_HEIGHT),
        );
        self.health = PLAYER_START_HEALTH;
        self.facing_right = true;
        self.speed = Boosted::new(stats.speed);
        self.vacuum_range = Boosted::new(stats.vacuum_range);
        self.vacuum_angle = Boosted::new(stats.vacuum_angle);
        self.vacuum_power = Boosted::new(stats.vacuum_power);
        self.vacuum = VacuumState::default();
        self.captured.reset(capacity_for_level(level));
        self.anim.force(PlayerAnim::Idle);
        self.jump_carry = 0.0;
        self.invulnerable = 0.0;
        self.crouching = false;
        self.danger = false;
        self.slope = None;
    }

    pub fn center(&self) -> Vec2 {
        self.body.center()
    }

    /// Row the feet stand in (no probe slack)
    pub fn foot_row(&self) -> i32 {
        cell_of(self.body.bottom())
    }

    pub fn is_dead(&self) -> bool {
        self.health == 0
    }

    pub fn is_invulnerable(&self) -> bool {
        self.invulnerable > 0.0
    }

    /// Damage box, narrower than the sprite
    pub fn hitbox(&self) -> Rect {
        let frame_w = PLAYER_FRAME_WIDTH as f32 * PLAYER_SCALE;
        let frame_h = PLAYER_FRAME_HEIGHT as f32 * PLAYER_SCALE;
        Rect::new(
            self.body.pos.x + 28.0 * PLAYER_SCALE,
            self.body.pos.y + 20.0 * PLAYER_SCALE,
            0.42 * frame_w,
            0.80 * frame_h,
        )
    }

    /// Movement, jump and crouch from this tick's input
    pub fn handle_movement(&mut self, input: &InputFrame, dt: f32) {
        let left = input.held(Key::MoveLeft);
        let right = input.held(Key::MoveRight);
        let speed = self.speed.value();

        self.body.vel.x = 0.0;
        if left {
            self.body.vel.x = -speed;
            self.facing_right = false;
        }
        if right {
            self.body.vel.x = speed;
            self.facing_right = true;
        }
        if !left && !right && self.jump_carry > 0.0 && !self.body.on_ground {
            self.body.vel.x = if self.facing_right { speed } else { -speed };
        }

        if input.pressed(Key::Jump) && self.body.on_ground {
            self.jump(left, right);
        }

        if self.jump_carry > 0.0 {
            self.jump_carry = (self.jump_carry - dt).max(0.0);
        }

        self.crouching = input.held(Key::Crouch) && self.body.on_ground;
        if self.crouching {
            self.body.vel.x = 0.0;
        }
    }

    fn jump(&mut self, left: bool, right: bool) {
        let speed = self.speed.value();
        self.body.vel.y = JUMP_STRENGTH;
        self.body.on_ground = false;
        if right || (self.facing_right && !left) {
            self.body.vel.x = speed;
            self.body.pos.x += JUMP_NUDGE;
        } else {
            self.body.vel.x = -speed;
            self.body.pos.x -= JUMP_NUDGE;
        }
        self.jump_carry = JUMP_CARRY;
        self.body.pos.x = self
            .body
            .pos
            .x
            .clamp(0.0, SCREEN_WIDTH - self.body.size.x);
    }

    /// Aim selection, hold-to-activate and the beam animation
    pub fn handle_vacuum(&mut self, input: &InputFrame, tuning: &Tuning, dt: f32) {
        let aim = held_aim(input, self.vacuum.direction);
        self.vacuum.aiming = aim.is_some();
        if let Some(direction) = aim {
            self.vacuum.direction = direction;
        }
        self.vacuum.active = input.held(Key::Vacuum);
        if self.vacuum.active && aim.is_none() {
            self.vacuum.direction = AimDirection::from_facing(self.facing_right);
        }
        self.vacuum
            .beam
            .update(self.vacuum.active, dt, tuning.vacuum_frames, tuning.vacuum_anim_speed);
    }

    /// Launch direction for a shot: held aim, else facing
    pub fn shot_direction(&self) -> AimDirection {
        if self.vacuum.aiming {
            self.vacuum.direction
        } else {
            AimDirection::from_facing(self.facing_right)
        }
    }

    /// Hand position a projectile leaves from (before centering the projectile)
    pub fn launch_point(&self, direction: AimDirection) -> Vec2 {
        let frame_w = PLAYER_FRAME_WIDTH as f32 * PLAYER_SCALE;
        let frame_h = PLAYER_FRAME_HEIGHT as f32 * PLAYER_SCALE;
        let mut origin = self.center();
        if self.foot_row() == STAGGER_ROW {
            origin.y -= 10.0;
        }
        let hand_x = if self.facing_right { frame_w * 0.62 } else { -frame_w * 0.62 };
        let hand_y = match direction {
            AimDirection::Up => -frame_h * 0.10,
            AimDirection::Down => frame_h * 0.20,
            _ => frame_h * 0.26,
        };
        origin + Vec2::new(hand_x, hand_y) + direction.unit() * 12.0
    }

    /// Apply a hit. Returns true when this hit was fatal.
    pub fn take_hit(&mut self, lethal: bool, reaction: PlayerAnim, invulnerability: f32) -> bool {
        if self.is_dead() {
            return false;
        }
        self.health = if lethal { 0 } else { self.health.saturating_sub(1) };
        self.invulnerable = invulnerability;
        if self.is_dead() {
            self.anim.force(PlayerAnim::DeathFade);
            true
        } else {
            self.anim.force(reaction);
            false
        }
    }

    pub fn apply_powerup(&mut self, kind: PowerupKind, tuning: &Tuning) {
        let duration = tuning.powerup_duration;
        match kind {
            PowerupKind::Speed => self.speed.boost(tuning.speed_boost, duration),
            PowerupKind::Range => self.vacuum_range.boost(tuning.range_boost, duration),
            PowerupKind::Power => {
                self.vacuum_angle.boost(tuning.power_boost, duration);
                self.vacuum_power.boost(tuning.power_boost, duration);
            }
            PowerupKind::Life => self.health = (self.health + 1).min(PLAYER_MAX_HEALTH),
        }
    }

    /// Physics step, slope lookup and animation evaluation
    pub fn update(&mut self, grid: &Grid, dt: f32) {
        self.speed.tick(dt);
        self.vacuum_range.tick(dt);
        self.vacuum_angle.tick(dt);
        self.vacuum_power.tick(dt);
        self.invulnerable = (self.invulnerable - dt).max(0.0);

        let f = frames(dt);
        apply_gravity(&mut self.body, GRAVITY, f);
        self.body.pos += self.body.vel * f;
        resolve_body(grid, &mut self.body, Probe::player(self.facing_right));

        self.slope = self.slope_contact(grid);
        self.evaluate_animation();
        self.anim.advance(dt, ());
    }

    fn evaluate_animation(&mut self) {
        if self.is_dead() || self.anim.is_committed(()) {
            return;
        }
        let moving = self.body.vel.x.abs() > STANDING_SPEED;
        let vy = self.body.vel.y;
        let next = if self.body.on_ground {
            if self.crouching {
                PlayerAnim::Crouch
            } else if self.vacuum.active {
                PlayerAnim::Shoot
            } else if self.danger && !self.is_invulnerable() {
                PlayerAnim::Alert
            } else if !moving {
                PlayerAnim::Idle
            } else if self.slope.is_some() {
                PlayerAnim::Slide
            } else if self.speed.is_boosted() {
                PlayerAnim::PowerRun
            } else {
                PlayerAnim::Run
            }
        } else if vy < -9.0 {
            PlayerAnim::JumpStart
        } else if vy < -2.0 {
            PlayerAnim::JumpMid
        } else if vy.abs() < 1.8 {
            PlayerAnim::JumpPeak
        } else if vy > 0.0 {
            PlayerAnim::Fall
        } else {
            return;
        };
        self.anim.set(next);
    }

    /// Ramp cell under the feet, with its exact surface height and downhill side
    pub fn slope_contact(&self, grid: &Grid) -> Option<SlopeContact> {
        let row = self.foot_row();
        let col = self.body.center_col();
        let tile = grid.tile_at(row, col);
        if !tile.is_slope() {
            return None;
        }

        let mut neighbor = (row, (col + 1).min(grid.cols() - 1));
        if tile == Tile::Slope {
            let below = (row + 1).min(grid.rows() - 1);
            let right = (col + 1).min(grid.cols() - 1);
            let left = (col - 1).max(0);
            if grid.tile_at(below, right) == Tile::Slope {
                neighbor = (below, right);
            } else if grid.tile_at(below, left) == Tile::Slope {
                neighbor = (below, left);
            }
        }

        let here_y = grid.surface_top_y(row, col);
        let there_y = grid.surface_top_y(neighbor.0, neighbor.1);
        let toward_neighbor: i8 = if neighbor.1 > col { 1 } else { -1 };
        let downhill = match there_y.cmp(&here_y) {
            std::cmp::Ordering::Greater => toward_neighbor,
            std::cmp::Ordering::Less => -toward_neighbor,
            std::cmp::Ordering::Equal => 0,
        };

        Some(SlopeContact {
            row,
            col,
            surface_y: here_y as f32,
            downhill,
        })
    }

    /// Top-left of the drawn sprite.
    ///
    /// Grounded sprites sit lower to close the gap left by the collision
    /// probe; on ramps they align to the exact surface instead.
    pub fn sprite_origin(&self) -> Vec2 {
        if let Some(slope) = self.slope {
            return Vec2::new(self.body.pos.x, slope.surface_y - self.body.size.y);
        }
        let mut origin = self.body.pos;
        if self.body.on_ground {
            origin.y += (GROUND_SNAP_PX + 2.0) * PLAYER_SCALE;
        }
        origin
    }
}

/// Capture stack size for a level
pub fn capacity_for_level(level: u32) -> usize {
    if level <= 1 { 3 } else { 5 }
}
