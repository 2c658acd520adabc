//! Enemy behavior engine
//!
//! Every enemy is a shared `Mob` (body, timers, jump plan, animation) driven by
//! a per-kind `Brain`. Brains implement `EnemyBehavior`; the shared update
//! wraps them with timer bookkeeping, platform-edge handling, random pauses
//! and jump steering.

mod chelnov;
mod ghost;
mod invisible;
mod skeleton;

pub use chelnov::Chelnov;
pub use ghost::Ghost;
pub use invisible::InvisibleMan;
pub use skeleton::Skeleton;

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::anim::{AnimSpec, AnimState, Animator};
use super::collision::{Body, Probe, Rect, apply_gravity, resolve_body};
use super::grid::Grid;
use crate::consts::*;
use crate::{cell_of, frames};

/// Default walking speed (pixels per reference frame)
pub const WALK_SPEED: f32 = 2.0;
/// Horizontal creep used when turning at edges and while steering a jump
pub const CREEP_SPEED: f32 = 0.5;
/// Contact hitbox inset applied to the other rectangle
pub const CONTACT_INSET: f32 = 10.0;

/// The four enemy archetypes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EnemyKind {
    Ghost,
    Skeleton,
    InvisibleMan,
    Chelnov,
}

impl EnemyKind {
    pub const ALL: [EnemyKind; 4] = [
        EnemyKind::Ghost,
        EnemyKind::Skeleton,
        EnemyKind::InvisibleMan,
        EnemyKind::Chelnov,
    ];

    /// Points for a capture (defeats award double)
    pub fn capture_points(self) -> u32 {
        match self {
            EnemyKind::Ghost => 50,
            EnemyKind::Skeleton => 75,
            EnemyKind::InvisibleMan => 150,
            EnemyKind::Chelnov => 200,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            EnemyKind::Ghost => "ghost",
            EnemyKind::Skeleton => "skeleton",
            EnemyKind::InvisibleMan => "invisible man",
            EnemyKind::Chelnov => "chelnov",
        }
    }
}

/// Enemy animation states (not every kind uses every state)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnemyAnim {
    Idle,
    Walk,
    Chase,
    Charge,
    Attack,
    Windup,
    Throw,
    Jump,
    Spin,
    Recover,
    /// Being sucked in by the vacuum
    Pulled,
    /// Chelnov leaning back against a far vacuum
    LeanBack,
}

impl AnimState for EnemyAnim {
    type Context = EnemyKind;

    fn spec(self, kind: EnemyKind) -> AnimSpec {
        use EnemyAnim::*;
        match (kind, self) {
            (EnemyKind::Ghost, Walk | Chase) => AnimSpec::new("chase", 0, 7, 11, 10.0),
            (EnemyKind::Ghost, Charge) => AnimSpec::new("charge", 0, 18, 1, 10.0),
            (EnemyKind::Ghost, Attack) => AnimSpec::new("attack", 0, 19, 2, 10.0),
            (EnemyKind::Ghost, _) => AnimSpec::new("idle", 0, 0, 7, 0.6),

            (EnemyKind::Skeleton, Walk | Chase) => AnimSpec::new("walk", 0, 0, 7, 8.0),
            (EnemyKind::Skeleton, Windup) => AnimSpec::new("windup", 0, 7, 2, 8.0),
            (EnemyKind::Skeleton, Throw | Attack) => AnimSpec::new("attack", 0, 9, 7, 10.0),
            (EnemyKind::Skeleton, Jump) => AnimSpec::new("jump", 0, 16, 10, 10.0),
            (EnemyKind::Skeleton, Pulled) => AnimSpec::new("capture", 0, 26, 2, 6.0),
            (EnemyKind::Skeleton, _) => AnimSpec::new("idle", 0, 0, 7, 0.6),

            (EnemyKind::InvisibleMan, Walk | Chase) => AnimSpec::new("run", 0, 3, 6, 10.0),
            (EnemyKind::InvisibleMan, Spin) => AnimSpec::new("spin", 0, 9, 3, 12.0),
            (EnemyKind::InvisibleMan, Recover) => {
                AnimSpec::new("recover", 0, 12, 3, 10.0).committed(0.3)
            }
            (EnemyKind::InvisibleMan, _) => AnimSpec::new("idle", 0, 0, 3, 6.0),

            (EnemyKind::Chelnov, Jump) => AnimSpec::new("jump", 1, 0, 3, 1.5),
            (EnemyKind::Chelnov, Attack) => AnimSpec::new("attack_orb", 2, 3, 3, 6.0),
            (EnemyKind::Chelnov, LeanBack) => AnimSpec::new("lean_back", 1, 3, 2, 6.0),
            (EnemyKind::Chelnov, Pulled) => AnimSpec::new("stagger", 1, 5, 2, 6.0),
            (EnemyKind::Chelnov, _) => AnimSpec::new("walk", 0, 0, 5, 1.2),
        }
    }
}

/// Per-enemy behavior clocks (seconds)
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct EnemyTimers {
    /// Time since the last wander decision (pause, reverse)
    pub state: f32,
    /// Time since the current action began
    pub action: f32,
    /// Time since the last attack began
    pub shoot: f32,
    /// Remaining stand-still time
    pub pause: f32,
    pub jump_cooldown: f32,
}

/// An in-progress jump toward another platform
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct JumpPlan {
    pub target_x: f32,
    pub target_row: i32,
    /// Set once the body has actually left the ground
    pub left_ground: bool,
    /// Cooldown applied on landing (`None` keeps the current cooldown)
    pub land_cooldown: Option<f32>,
}

impl JumpPlan {
    pub fn new(target_x: f32, target_row: i32) -> Self {
        Self {
            target_x,
            target_row,
            left_ground: false,
            land_cooldown: Some(4.5),
        }
    }
}

/// State shared by every enemy kind
#[derive(Debug, Clone, PartialEq)]
pub struct Mob {
    pub body: Body,
    pub facing_right: bool,
    pub timers: EnemyTimers,
    pub jump: Option<JumpPlan>,
    pub anim: Animator<EnemyAnim>,
}

impl Mob {
    pub fn center(&self) -> Vec2 {
        self.body.center()
    }

    pub fn is_paused(&self) -> bool {
        self.timers.pause > 0.0
    }

    /// Gravity, horizontal walk (unless paused), vertical move, tile collision.
    ///
    /// A stopped walker restarts at `restart_speed` when given one.
    pub fn integrate(
        &mut self,
        grid: &Grid,
        gravity_scale: f32,
        restart_speed: Option<f32>,
        dt: f32,
    ) {
        let f = frames(dt);
        apply_gravity(&mut self.body, GRAVITY * gravity_scale, f);
        if !self.is_paused() {
            if self.body.vel.x == 0.0
                && let Some(speed) = restart_speed
            {
                self.body.vel.x = if self.facing_right { speed } else { -speed };
            }
            self.body.pos.x += self.body.vel.x * f;
        }
        self.body.pos.y += self.body.vel.y * f;
        resolve_body(grid, &mut self.body, Probe::enemy());
    }

    /// Keep inside `[margin, screen - width - margin]`, bouncing off the bounds
    pub fn bounce_within(&mut self, margin: f32) {
        let max_x = SCREEN_WIDTH - self.body.size.x - margin;
        if self.body.pos.x < margin {
            self.body.pos.x = margin;
            self.body.vel.x = self.body.vel.x.abs();
        }
        if self.body.pos.x > max_x {
            self.body.pos.x = max_x;
            self.body.vel.x = -self.body.vel.x.abs();
        }
    }

    /// Horizontal and vertical distance from the center to `target`
    pub fn distance_to(&self, target: Vec2) -> Vec2 {
        (self.center() - target).abs()
    }

    /// Begin a jump toward `plan` with the given launch velocity
    pub fn launch_jump(&mut self, plan: JumpPlan, vy: f32, cooldown: f32) {
        self.body.vel.y = vy;
        self.body.on_ground = false;
        self.timers.jump_cooldown = cooldown;
        self.jump = Some(plan);
    }
}

/// Everything a brain may read from the world this tick
pub struct EnemyContext<'a> {
    pub grid: &'a Grid,
    /// Player center
    pub target: Vec2,
    pub dt: f32,
    pub rng: &'a mut Pcg32,
}

/// A brain's request to fire at the player from `origin`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Shot {
    pub origin: Vec2,
}

/// Per-kind behavior
pub trait EnemyBehavior {
    /// Advance one tick; may ask to fire at the player
    fn update(&mut self, mob: &mut Mob, cx: &mut EnemyContext<'_>) -> Option<Shot>;

    fn can_be_captured(&self) -> bool {
        true
    }

    fn is_attacking(&self) -> bool {
        false
    }

    /// Drawn at full opacity (the invisible man dims while teleporting)
    fn is_visible(&self) -> bool {
        true
    }

    /// React to being pulled by the vacuum
    fn on_pulled(&mut self, _mob: &mut Mob, _player_center: Vec2) {}
}

/// Kind-specific state, selected at spawn
#[derive(Debug, Clone, PartialEq)]
pub enum Brain {
    Ghost(Ghost),
    Skeleton(Skeleton),
    InvisibleMan(InvisibleMan),
    Chelnov(Chelnov),
}

impl Brain {
    pub fn new(kind: EnemyKind) -> Self {
        match kind {
            EnemyKind::Ghost => Brain::Ghost(Ghost::default()),
            EnemyKind::Skeleton => Brain::Skeleton(Skeleton::default()),
            EnemyKind::InvisibleMan => Brain::InvisibleMan(InvisibleMan::default()),
            EnemyKind::Chelnov => Brain::Chelnov(Chelnov::default()),
        }
    }

    pub fn kind(&self) -> EnemyKind {
        match self {
            Brain::Ghost(_) => EnemyKind::Ghost,
            Brain::Skeleton(_) => EnemyKind::Skeleton,
            Brain::InvisibleMan(_) => EnemyKind::InvisibleMan,
            Brain::Chelnov(_) => EnemyKind::Chelnov,
        }
    }

    fn behavior(&self) -> &dyn EnemyBehavior {
        match self {
            Brain::Ghost(b) => b,
            Brain::Skeleton(b) => b,
            Brain::InvisibleMan(b) => b,
            Brain::Chelnov(b) => b,
        }
    }

    fn behavior_mut(&mut self) -> &mut dyn EnemyBehavior {
        match self {
            Brain::Ghost(b) => b,
            Brain::Skeleton(b) => b,
            Brain::InvisibleMan(b) => b,
            Brain::Chelnov(b) => b,
        }
    }
}

/// A live (or just removed) enemy
#[derive(Debug, Clone, PartialEq)]
pub struct Enemy {
    pub id: u32,
    pub kind: EnemyKind,
    pub active: bool,
    pub captured: bool,
    pub mob: Mob,
    brain: Brain,
}

impl Enemy {
    /// Spawn at `pos` walking in a random direction
    pub fn spawn(id: u32, kind: EnemyKind, pos: Vec2, rng: &mut Pcg32) -> Self {
        let facing_right = rng.random_bool(0.5);
        let mut body = Body::new(pos, Vec2::new(ENEMY_WIDTH, ENEMY_HEIGHT));
        body.vel.x = if facing_right { WALK_SPEED } else { -WALK_SPEED };
        Self {
            id,
            kind,
            active: true,
            captured: false,
            mob: Mob {
                body,
                facing_right,
                timers: EnemyTimers::default(),
                jump: None,
                anim: Animator::new(EnemyAnim::Idle),
            },
            brain: Brain::new(kind),
        }
    }

    /// Drop onto the nearest supporting surface and stand still vertically
    pub fn settle(&mut self, grid: &Grid) {
        self.mob.body.vel.y = 0.0;
        resolve_body(grid, &mut self.mob.body, Probe::enemy());
        self.mob.body.on_ground = true;
    }

    pub fn is_live(&self) -> bool {
        self.active && !self.captured
    }

    pub fn brain(&self) -> &Brain {
        &self.brain
    }

    pub fn can_be_captured(&self) -> bool {
        self.is_live() && self.brain.behavior().can_be_captured()
    }

    pub fn is_attacking(&self) -> bool {
        self.brain.behavior().is_attacking()
    }

    pub fn is_visible(&self) -> bool {
        self.brain.behavior().is_visible()
    }

    pub fn rect(&self) -> Rect {
        self.mob.body.rect()
    }

    pub fn center(&self) -> Vec2 {
        self.mob.center()
    }

    pub fn foot_row(&self) -> i32 {
        cell_of(self.mob.body.bottom())
    }

    /// Overlap against `other` shrunk by the contact inset
    pub fn touches(&self, other: &Rect) -> bool {
        self.rect().intersects(&other.inset(CONTACT_INSET))
    }

    /// Vacuum pull toward the player
    pub fn pull_toward(&mut self, player_center: Vec2, power: f32, dt: f32) {
        let step = super::vacuum::pull_step(self.center(), player_center, power, dt);
        self.mob.body.pos += step;
        self.brain.behavior_mut().on_pulled(&mut self.mob, player_center);
    }

    pub fn mark_captured(&mut self) {
        self.captured = true;
        self.active = false;
    }

    pub fn mark_defeated(&mut self) {
        self.active = false;
    }

    /// One simulation tick
    pub fn update(&mut self, cx: &mut EnemyContext<'_>) -> Option<Shot> {
        if !self.is_live() {
            return None;
        }
        let dt = cx.dt;
        let mob = &mut self.mob;
        mob.timers.state += dt;
        mob.timers.action += dt;
        mob.timers.shoot += dt;
        if mob.timers.pause > 0.0 {
            mob.timers.pause -= dt;
        }
        if mob.timers.jump_cooldown > 0.0 {
            mob.timers.jump_cooldown -= dt;
        }
        mob.anim.advance(dt, self.kind);

        if mob.body.vel.x > 0.0 {
            mob.facing_right = true;
        } else if mob.body.vel.x < 0.0 {
            mob.facing_right = false;
        }

        let behavior = self.brain.behavior_mut();
        let shot = behavior.update(mob, cx);
        let attacking = behavior.is_attacking();

        if mob.body.on_ground {
            platform_edge(mob, cx, attacking);
        }

        if mob.body.on_ground
            && !mob.is_paused()
            && mob.timers.state > 1.5
            && cx.rng.random_bool(0.03)
        {
            mob.timers.pause = cx.rng.random_range(0.8..1.2);
            mob.body.vel.x = 0.0;
            mob.timers.state = 0.0;
        }

        steer_jump(mob);
        shot
    }
}

/// Turn or jump at segment ends, plus the occasional spontaneous jump
fn platform_edge(mob: &mut Mob, cx: &mut EnemyContext<'_>, attacking: bool) {
    let body = mob.body;
    let row = body.foot_row();
    let col = body.center_col();
    let (left_bound, right_bound) = segment_bounds(cx.grid, row, col);
    let seg_left_x = ((left_bound + 1) * CELL_SIZE) as f32 + 8.0;
    let seg_right_x = (right_bound * CELL_SIZE) as f32 + (CELL_SIZE as f32 - body.size.x - 8.0);
    let x = body.pos.x;

    if mob.jump.is_none() {
        if x <= seg_left_x || x >= seg_right_x {
            match find_jump_target(cx.grid, row, col) {
                Some(plan) => {
                    mob.launch_jump(plan, -9.0, 5.0);
                    mob.body.vel.x = if x < plan.target_x { WALK_SPEED } else { -WALK_SPEED };
                }
                None if x <= seg_left_x => mob.body.vel.x = CREEP_SPEED,
                None => mob.body.vel.x = -CREEP_SPEED,
            }
        }
        if !mob.is_paused() && mob.body.vel.x.abs() < 0.05 && !attacking {
            mob.body.vel.x = if mob.facing_right { CREEP_SPEED } else { -CREEP_SPEED };
        }
    }

    if mob.jump.is_none()
        && !attacking
        && !mob.is_paused()
        && mob.timers.jump_cooldown <= 0.0
        && cx.rng.random_bool(0.02)
        && let Some(plan) = find_jump_target(cx.grid, row, col)
    {
        let speed = mob.body.vel.x.abs();
        mob.launch_jump(plan, -9.0, 5.0);
        mob.body.vel.x = if x < plan.target_x { speed } else { -speed };
    }
}

/// Creep toward the jump target; end the plan on landing
fn steer_jump(mob: &mut Mob) {
    let Some(mut plan) = mob.jump else {
        return;
    };
    let x = mob.body.pos.x;
    if x < plan.target_x {
        mob.body.vel.x = CREEP_SPEED;
    } else if x > plan.target_x {
        mob.body.vel.x = -CREEP_SPEED;
    }

    if !mob.body.on_ground {
        plan.left_ground = true;
        mob.jump = Some(plan);
    } else if plan.left_ground {
        mob.jump = None;
        if let Some(cooldown) = plan.land_cooldown {
            mob.timers.jump_cooldown = cooldown;
        }
        mob.timers.pause = 0.6;
        mob.body.vel.x = if mob.facing_right { CREEP_SPEED } else { -CREEP_SPEED };
    }
}

/// Walk outward from `col` along a row's walls.
///
/// Returns the first non-wall column (or the screen edge) on each side.
pub fn segment_bounds(grid: &Grid, row: i32, col: i32) -> (i32, i32) {
    let mut left = col;
    while left > 0 && grid.is_wall(row, left) {
        left -= 1;
    }
    let mut right = col;
    while right < grid.cols() - 1 && grid.is_wall(row, right) {
        right += 1;
    }
    (left, right)
}

/// Nearest wall row above `row` at `col` (else below), aimed at the column
/// clamped into that row's segment
pub fn find_jump_target(grid: &Grid, row: i32, col: i32) -> Option<JumpPlan> {
    let target_row = (0..row)
        .rev()
        .find(|&r| grid.is_wall(r, col))
        .or_else(|| (row + 1..grid.rows()).find(|&r| grid.is_wall(r, col)))?;

    let (left, right) = segment_bounds(grid, target_row, col);
    let target_col = col.min(right - 1).max(left + 1);
    Some(JumpPlan::new(
        (target_col * CELL_SIZE) as f32 + 8.0,
        target_row,
    ))
}

/// Where a teleporting enemy reappears.
///
/// Searches columns outward from the player's column for the wall row closest
/// to the player's row, then picks a spot on that segment biased toward the
/// player with up to +/-0.2 jitter.
pub fn reappear_position(grid: &Grid, player_center: Vec2, size: Vec2, rng: &mut Pcg32) -> Vec2 {
    let preferred_col = cell_of(player_center.x);
    let player_row = cell_of(player_center.y).clamp(0, grid.rows() - 1);

    let mut best: Option<(i32, i32)> = None;
    for radius in 0..grid.cols() {
        let mut best_dist = i32::MAX;
        for col in [preferred_col - radius, preferred_col + radius] {
            if col < 0 || col >= grid.cols() {
                continue;
            }
            if let Some(row) = (0..grid.rows()).find(|&r| grid.is_wall(r, col)) {
                let dist = (row - player_row).abs();
                if dist < best_dist {
                    best_dist = dist;
                    best = Some((row, col));
                }
            }
        }
        if best.is_some() {
            break;
        }
    }

    let (row, col) = best.unwrap_or((
        player_row,
        preferred_col.clamp(0, grid.cols() - 1),
    ));

    let (left, right) = segment_bounds(grid, row, col);
    let seg_left_col = left + 1;
    let seg_right_col = right - 1;
    let seg_left_x = (seg_left_col * CELL_SIZE) as f32 + 8.0;
    let seg_right_x = (seg_right_col * CELL_SIZE) as f32 + (CELL_SIZE as f32 - size.x - 8.0);

    let mut x = player_center.x;
    if seg_right_col >= seg_left_col {
        let width = seg_right_x - seg_left_x;
        let prefer = if width > 0.0 && (seg_left_x..=seg_right_x).contains(&player_center.x) {
            (player_center.x - seg_left_x) / width
        } else {
            0.5
        };
        let jitter = rng.random_range(-0.2..=0.2);
        let mix = (prefer + jitter).clamp(0.2, 0.8);
        x = seg_left_x + mix * width.max(0.0);
    }

    Vec2::new(x, (row * CELL_SIZE) as f32 - size.y - 2.0)
}

/// Push apart live enemies standing on the same row
pub fn separate(enemies: &mut [Enemy]) {
    for i in 0..enemies.len() {
        let (head, tail) = enemies.split_at_mut(i + 1);
        let a = &mut head[i];
        if !a.is_live() {
            continue;
        }
        for b in tail.iter_mut().filter(|b| b.is_live()) {
            if a.foot_row() != b.foot_row() {
                continue;
            }
            let min_gap = (a.mob.body.size.x + b.mob.body.size.x) * 0.5;
            let dx = a.center().x - b.center().x;
            let overlap = min_gap - dx.abs();
            if overlap <= 0.0 {
                continue;
            }
            let push = overlap * 0.5;
            let (ab, bb) = (&mut a.mob.body, &mut b.mob.body);
            if dx > 0.0 {
                ab.pos.x += push;
                bb.pos.x -= push;
                ab.vel.x = ab.vel.x.abs();
                bb.vel.x = -bb.vel.x.abs();
            } else {
                ab.pos.x -= push;
                bb.pos.x += push;
                ab.vel.x = -ab.vel.x.abs();
                bb.vel.x = bb.vel.x.abs();
            }
        }
    }
}
