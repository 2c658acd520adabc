//! Player-fired and enemy-fired projectiles
//!
//! A player projectile is a captured enemy thrown back out. It is in exactly
//! one phase at a time and only ever moves forward through them:
//!
//! - `MovingToRow` (thrown up or down) travels to a target row's surface
//! - `Rolling` slides along platforms under light gravity until it expires
//!
//! Sideways throws start rolling on the spawn row, even in mid-air.
//!
//! Enemy projectiles fly in a straight line toward where the player was.

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;

use super::collision::Rect;
use super::enemy::{CONTACT_INSET, Enemy, EnemyKind};
use super::grid::Grid;
use super::vacuum::AimDirection;
use crate::consts::*;
use crate::{cell_of, frames};

/// Keep rolling projectiles this far from the screen sides
const EDGE_MARGIN: f32 = 10.0;
/// Spin while airborne (degrees per reference frame)
const AIR_SPIN: f32 = 15.0;

/// Locomotion phase of a player projectile
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectilePhase {
    MovingToRow { target_row: i32 },
    Rolling,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Projectile {
    pub id: u32,
    /// Captured kind being thrown (sprite only)
    pub kind: EnemyKind,
    /// Top-left corner
    pub pos: Vec2,
    pub vel: Vec2,
    pub direction: AimDirection,
    pub spawn_row: i32,
    pub lifetime: f32,
    /// Cosmetic spin in degrees
    pub rotation: f32,
    pub active: bool,
    phase: ProjectilePhase,
    /// Sign of the roll once rolling starts
    roll_sign: f32,
}

impl Projectile {
    /// Launch from `pos` (top-left).
    ///
    /// Sideways throws roll along the platform surface of the spawn row.
    /// Vertical throws head for the adjacent row. `roll_right` fixes the eventual roll direction; `None`
    /// picks one at random.
    pub fn launch(
        id: u32,
        kind: EnemyKind,
        pos: Vec2,
        direction: AimDirection,
        roll_right: Option<bool>,
        grid: &Grid,
        rng: &mut Pcg32,
    ) -> Self {
        let right = roll_right.unwrap_or_else(|| rng.random_bool(0.5));
        let spawn_row = cell_of(pos.y + PROJECTILE_SIZE);
        let mut projectile = Self {
            id,
            kind,
            pos,
            vel: Vec2::ZERO,
            direction,
            spawn_row,
            lifetime: PROJECTILE_LIFETIME,
            rotation: 0.0,
            active: true,
            phase: ProjectilePhase::Rolling,
            roll_sign: if right { 1.0 } else { -1.0 },
        };

        match direction {
            AimDirection::Right | AimDirection::Left => {
                let sign = if direction == AimDirection::Right { 1.0 } else { -1.0 };
                projectile.roll_sign = sign;
                projectile.start_rolling_on_row(grid, spawn_row);
            }
            AimDirection::Up | AimDirection::Down => {
                let step = if direction == AimDirection::Up { -1 } else { 1 };
                let target_row = (spawn_row + step).clamp(0, grid.rows() - 1);
                projectile.phase = ProjectilePhase::MovingToRow {
                    target_row: spawn_row,
                };
                if !projectile.retarget(target_row) {
                    projectile.start_rolling_on_row(grid, spawn_row);
                }
            }
        }
        projectile
    }

    pub fn phase(&self) -> ProjectilePhase {
        self.phase
    }

    pub fn is_rolling(&self) -> bool {
        self.phase == ProjectilePhase::Rolling
    }

    /// Not yet rolling (defeats award the aerial bonus)
    pub fn is_aerial(&self) -> bool {
        !self.is_rolling()
    }

    pub fn rect(&self) -> Rect {
        Rect::from_pos_size(self.pos, Vec2::splat(PROJECTILE_SIZE))
    }

    pub fn center(&self) -> Vec2 {
        self.pos + Vec2::splat(PROJECTILE_SIZE * 0.5)
    }

    /// Row the projectile's bottom edge is in
    pub fn bottom_row(&self) -> i32 {
        cell_of(self.pos.y + PROJECTILE_SIZE)
    }

    /// Send a vertical throw to `row` instead.
    ///
    /// Only vertical throws that have not started rolling can be redirected;
    /// returns false (unchanged) otherwise or when `row` is the spawn row.
    pub fn retarget(&mut self, row: i32) -> bool {
        if !self.direction.is_vertical() || self.is_rolling() || row == self.spawn_row {
            return false;
        }
        let up = row < self.spawn_row;
        self.phase = ProjectilePhase::MovingToRow { target_row: row };
        self.vel = Vec2::new(0.0, if up { -PROJECTILE_SPEED } else { PROJECTILE_SPEED });
        true
    }

    fn start_rolling_on_row(&mut self, grid: &Grid, row: i32) {
        self.phase = ProjectilePhase::Rolling;
        self.pos.y = grid.row_top_y(row) as f32 - PROJECTILE_SIZE;
        self.vel = Vec2::new(self.roll_sign * ROLL_SPEED, 0.0);
    }

    fn start_rolling_at(&mut self, surface_y: f32) {
        self.phase = ProjectilePhase::Rolling;
        self.pos.y = surface_y - PROJECTILE_SIZE;
        if self.vel.x != 0.0 {
            self.roll_sign = self.vel.x.signum();
        }
        self.vel = Vec2::new(self.roll_sign * ROLL_SPEED, 0.0);
    }

    /// Solid cell under the bottom-center, if any
    fn support(&self, grid: &Grid) -> Option<(i32, i32)> {
        let row = self.bottom_row();
        let col = cell_of(self.pos.x + PROJECTILE_SIZE * 0.5);
        grid.is_solid(row, col).then_some((row, col))
    }

    pub fn update(&mut self, grid: &Grid, dt: f32) {
        if !self.active {
            return;
        }
        self.lifetime -= dt;
        if self.lifetime <= 0.0 {
            self.active = false;
            return;
        }
        let f = frames(dt);

        match self.phase {
            ProjectilePhase::MovingToRow { target_row } => {
                self.pos.y += self.vel.y * f;
                let target_y = grid.row_top_y(target_row) as f32 - PROJECTILE_SIZE;
                let reached = if self.vel.y < 0.0 {
                    self.pos.y <= target_y
                } else {
                    self.pos.y >= target_y
                };
                if reached {
                    self.start_rolling_at(target_y + PROJECTILE_SIZE);
                }
            }
            ProjectilePhase::Rolling => {
                self.pos.x += self.vel.x * f;
                self.vel.y += GRAVITY * 0.5 * f;
                self.pos.y += self.vel.y * f;
                if let Some((row, col)) = self.support(grid) {
                    self.pos.y = grid.surface_top_y(row, col) as f32 - PROJECTILE_SIZE;
                    self.vel.y = 0.0;
                }

                let max_x = SCREEN_WIDTH - PROJECTILE_SIZE - EDGE_MARGIN;
                if self.pos.x < EDGE_MARGIN {
                    self.pos.x = EDGE_MARGIN;
                    self.vel.x = ROLL_SPEED;
                }
                if self.pos.x > max_x {
                    self.pos.x = max_x;
                    self.vel.x = -ROLL_SPEED;
                }
                if self.pos.y > SCREEN_HEIGHT - PROJECTILE_SIZE {
                    self.pos.y = SCREEN_HEIGHT - PROJECTILE_SIZE;
                    self.vel.y = 0.0;
                }
            }
        }

        let spin = if self.is_rolling() {
            self.vel.x.abs() * 1.2
        } else {
            AIR_SPIN
        };
        self.rotation = (self.rotation + spin * f) % 360.0;
    }

    /// Overlap with a live enemy's inset body
    pub fn hits(&self, enemy: &Enemy) -> bool {
        self.active
            && enemy.is_live()
            && self.rect().intersects(&enemy.rect().inset(CONTACT_INSET))
    }
}

/// Straight-line shot fired by an enemy
#[derive(Debug, Clone, PartialEq)]
pub struct EnemyProjectile {
    pub id: u32,
    pub source: EnemyKind,
    /// Top-left corner
    pub pos: Vec2,
    pub vel: Vec2,
    pub active: bool,
}

impl EnemyProjectile {
    /// Aim at `target` once; the shot never re-homes
    pub fn new(id: u32, source: EnemyKind, from: Vec2, target: Vec2) -> Self {
        let dir = (target - from).try_normalize().unwrap_or(Vec2::X);
        Self {
            id,
            source,
            pos: from,
            vel: dir * ENEMY_SHOT_SPEED,
            active: true,
        }
    }

    pub fn update(&mut self, dt: f32) {
        if !self.active {
            return;
        }
        self.pos += self.vel * frames(dt);
        let m = OFFSCREEN_MARGIN;
        if self.pos.x < -m
            || self.pos.x > SCREEN_WIDTH + m
            || self.pos.y < -m
            || self.pos.y > SCREEN_HEIGHT + m
        {
            self.active = false;
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::from_pos_size(self.pos, Vec2::splat(ENEMY_SHOT_SIZE))
    }

    /// Mostly vertical flight reads as a hit from above
    pub fn is_vertical(&self) -> bool {
        self.vel.y.abs() > self.vel.x.abs()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;

    fn level() -> Grid {
        let mut grid = Grid::standard();
        grid.fill_wall(13, 0, LEVEL_COLS - 1);
        grid.fill_wall(8, 0, LEVEL_COLS - 1);
        grid
    }

    fn rng() -> Pcg32 {
        Pcg32::seed_from_u64(7)
    }

    #[test]
    fn test_sideways_throw_rolls_immediately() {
        let grid = level();
        let spawn = Vec2::new(400.0, 13.0 * 64.0 - PROJECTILE_SIZE - 20.0);
        let mut p = Projectile::launch(1, EnemyKind::Ghost, spawn, AimDirection::Left, Some(false), &grid, &mut rng());
        assert!(p.is_rolling());
        assert_eq!(p.spawn_row, 12);
        assert_eq!(p.vel, Vec2::new(-ROLL_SPEED, 0.0));
        // starts on the spawn row's top and settles onto the floor below
        assert_eq!(p.pos.y, 12.0 * 64.0 - PROJECTILE_SIZE);
        for _ in 0..60 {
            p.update(&grid, SIM_DT);
        }
        assert_eq!(p.pos.y, 13.0 * 64.0 - PROJECTILE_SIZE);
        assert!(p.vel.x < 0.0);
    }

    #[test]
    fn test_midair_sideways_throw_rolls_on_spawn_row() {
        let grid = level();
        // well above the floor, bottom edge in row 10
        let spawn = Vec2::new(400.0, 13.0 * 64.0 - 200.0);
        let p = Projectile::launch(1, EnemyKind::Skeleton, spawn, AimDirection::Right, Some(true), &grid, &mut rng());
        assert_eq!(p.spawn_row, 10);
        assert!(p.is_rolling());
        assert!(!p.is_aerial());
        assert_eq!(p.pos.y, grid.row_top_y(p.spawn_row) as f32 - PROJECTILE_SIZE);
        assert_eq!(p.vel, Vec2::new(ROLL_SPEED, 0.0));
    }

    #[test]
    fn test_down_throw_targets_next_row() {
        let grid = level();
        let spawn = Vec2::new(400.0, 8.0 * 64.0 - PROJECTILE_SIZE - 10.0);
        let mut p = Projectile::launch(1, EnemyKind::Ghost, spawn, AimDirection::Down, None, &grid, &mut rng());
        assert_eq!(p.spawn_row, 7);
        assert_eq!(p.phase(), ProjectilePhase::MovingToRow { target_row: 8 });
        p.update(&grid, SIM_DT);
        assert!(p.is_rolling());
        assert_eq!(p.pos.y, 8.0 * 64.0 - PROJECTILE_SIZE);
        assert_eq!(p.vel.x.abs(), ROLL_SPEED);
    }

    #[test]
    fn test_retarget_only_before_rolling() {
        let grid = level();
        let spawn = Vec2::new(400.0, 13.0 * 64.0 - PROJECTILE_SIZE - 10.0);
        let mut up = Projectile::launch(1, EnemyKind::Ghost, spawn, AimDirection::Up, None, &grid, &mut rng());
        assert!(up.retarget(8));
        assert_eq!(up.phase(), ProjectilePhase::MovingToRow { target_row: 8 });
        assert!(up.vel.y < 0.0);

        let mut side = Projectile::launch(2, EnemyKind::Ghost, spawn, AimDirection::Right, None, &grid, &mut rng());
        assert!(!side.retarget(8));
        assert!(side.is_rolling());
    }

    #[test]
    fn test_rolling_bounces_off_edges() {
        let grid = level();
        let spawn = Vec2::new(EDGE_MARGIN + 1.0, 13.0 * 64.0 - PROJECTILE_SIZE);
        let mut p = Projectile::launch(1, EnemyKind::Ghost, spawn, AimDirection::Left, None, &grid, &mut rng());
        for _ in 0..10 {
            p.update(&grid, SIM_DT);
        }
        assert!(p.pos.x >= EDGE_MARGIN);
        assert_eq!(p.vel.x, ROLL_SPEED);
    }

    #[test]
    fn test_lifetime_expires() {
        let grid = level();
        let spawn = Vec2::new(400.0, 13.0 * 64.0 - PROJECTILE_SIZE);
        let mut p = Projectile::launch(1, EnemyKind::Ghost, spawn, AimDirection::Right, None, &grid, &mut rng());
        let ticks = (PROJECTILE_LIFETIME / SIM_DT) as usize + 2;
        for _ in 0..ticks {
            p.update(&grid, SIM_DT);
        }
        assert!(!p.active);
    }

    #[test]
    fn test_enemy_shot_flies_straight_and_expires() {
        let mut shot = EnemyProjectile::new(1, EnemyKind::Ghost, Vec2::new(100.0, 100.0), Vec2::new(100.0, 400.0));
        assert!(shot.is_vertical());
        assert!((shot.vel.length() - ENEMY_SHOT_SPEED).abs() < 1e-4);
        let vel = shot.vel;
        for _ in 0..400 {
            shot.update(SIM_DT);
            if shot.active {
                assert_eq!(shot.vel, vel);
            }
        }
        assert!(!shot.active);
    }

    #[test]
    fn test_enemy_shot_at_own_position_goes_right() {
        let shot = EnemyProjectile::new(1, EnemyKind::Chelnov, Vec2::ONE, Vec2::ONE);
        assert_eq!(shot.vel, Vec2::new(ENEMY_SHOT_SPEED, 0.0));
    }

    fn direction_from(i: u8) -> AimDirection {
        AimDirection::PRIORITY[(i % 4) as usize]
    }

    proptest! {
        #[test]
        fn prop_rolling_is_never_exited(
            x in 20.0f32..1000.0,
            y in 100.0f32..780.0,
            dir in 0u8..4,
            seed in any::<u64>(),
        ) {
            let grid = level();
            let mut rng = Pcg32::seed_from_u64(seed);
            let mut p = Projectile::launch(1, EnemyKind::Ghost, Vec2::new(x, y), direction_from(dir), None, &grid, &mut rng);
            let mut rolled = p.is_rolling();
            let mut saw_target: Option<ProjectilePhase> = None;
            for _ in 0..300 {
                p.update(&grid, SIM_DT);
                if !p.active {
                    break;
                }
                match p.phase() {
                    ProjectilePhase::Rolling => rolled = true,
                    other => {
                        prop_assert!(!rolled, "left rolling for {:?}", other);
                        if let Some(prev) = saw_target {
                            prop_assert_eq!(prev, other);
                        }
                        saw_target = Some(other);
                    }
                }
            }
        }
    }
}
