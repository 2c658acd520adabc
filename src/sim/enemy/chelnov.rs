//! Chelnov: platform hopper that stops to throw an orb every few seconds

use glam::Vec2;
use rand::Rng;

use super::{
    EnemyAnim, EnemyBehavior, EnemyContext, JumpPlan, Mob, Shot, WALK_SPEED, find_jump_target,
};

const ATTACK_INTERVAL: f32 = 4.0;
const ATTACK_DURATION: f32 = 1.0;
const JUMP_CHANCE: f64 = 0.04;
const JUMP_VELOCITY: f32 = -11.0;
const JUMP_COOLDOWN: f32 = 3.5;
const SCREEN_MARGIN: f32 = 50.0;

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Chelnov {
    attacking: bool,
    fired: bool,
}

impl EnemyBehavior for Chelnov {
    fn update(&mut self, mob: &mut Mob, cx: &mut EnemyContext<'_>) -> Option<Shot> {
        if !self.attacking && mob.timers.shoot >= ATTACK_INTERVAL {
            self.attacking = true;
            self.fired = false;
            mob.timers.shoot = 0.0;
            mob.timers.action = 0.0;
        }

        if self.attacking {
            mob.anim.set(EnemyAnim::Attack);
            let mut shot = None;
            if !self.fired {
                self.fired = true;
                shot = Some(Shot {
                    origin: mob.center(),
                });
            }
            if mob.timers.action >= ATTACK_DURATION {
                self.attacking = false;
            }
            // Body frozen for the attack: a zero step moves nothing
            mob.integrate(cx.grid, 1.0, None, 0.0);
            mob.bounce_within(SCREEN_MARGIN);
            return shot;
        }

        mob.integrate(cx.grid, 1.0, Some(WALK_SPEED), cx.dt);

        if mob.body.on_ground
            && mob.jump.is_none()
            && mob.timers.jump_cooldown <= 0.0
            && cx.rng.random_bool(JUMP_CHANCE)
            && let Some(plan) = find_jump_target(cx.grid, mob.body.foot_row(), mob.body.center_col())
        {
            let plan = JumpPlan {
                land_cooldown: None,
                ..plan
            };
            let speed = mob.body.vel.x.abs().max(WALK_SPEED);
            mob.launch_jump(plan, JUMP_VELOCITY, JUMP_COOLDOWN);
            mob.body.vel.x = if mob.body.pos.x < plan.target_x { speed } else { -speed };
        }

        if !mob.body.on_ground || mob.jump.is_some() {
            mob.anim.set(EnemyAnim::Jump);
        } else {
            mob.anim.set(EnemyAnim::Walk);
        }

        mob.bounce_within(SCREEN_MARGIN);
        None
    }

    fn can_be_captured(&self) -> bool {
        !self.attacking
    }

    fn is_attacking(&self) -> bool {
        self.attacking
    }

    fn on_pulled(&mut self, mob: &mut Mob, player_center: Vec2) {
        let dist = mob.distance_to(player_center);
        if dist.x < 200.0 && dist.y < 150.0 {
            mob.anim.set(if dist.x > 80.0 {
                EnemyAnim::LeanBack
            } else {
                EnemyAnim::Pulled
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::{Enemy, EnemyKind};
    use super::*;
    use crate::consts::*;
    use crate::sim::grid::Grid;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn floor() -> Grid {
        let mut grid = Grid::standard();
        grid.fill_wall(13, 0, 17);
        grid
    }

    #[test]
    fn test_attack_fires_once_and_blocks_capture() {
        let grid = floor();
        let mut rng = Pcg32::seed_from_u64(4);
        let mut chelnov = Enemy::spawn(1, EnemyKind::Chelnov, Vec2::new(500.0, 720.0), &mut rng);
        chelnov.settle(&grid);
        chelnov.mob.timers.shoot = ATTACK_INTERVAL;

        let mut cx = EnemyContext {
            grid: &grid,
            target: Vec2::new(200.0, 700.0),
            dt: SIM_DT,
            rng: &mut rng,
        };
        assert!(chelnov.update(&mut cx).is_some());
        assert!(chelnov.is_attacking());
        assert!(!chelnov.can_be_captured());
        let x = chelnov.mob.body.pos.x;

        let mut later_shots = 0;
        for _ in 0..30 {
            if chelnov.update(&mut cx).is_some() {
                later_shots += 1;
            }
        }
        assert_eq!(later_shots, 0);
        assert_eq!(chelnov.mob.body.pos.x, x);
    }

    #[test]
    fn test_attack_ends_after_duration() {
        let grid = floor();
        let mut rng = Pcg32::seed_from_u64(4);
        let mut chelnov = Enemy::spawn(1, EnemyKind::Chelnov, Vec2::new(500.0, 720.0), &mut rng);
        chelnov.settle(&grid);
        chelnov.mob.timers.shoot = ATTACK_INTERVAL;
        let mut cx = EnemyContext {
            grid: &grid,
            target: Vec2::new(200.0, 700.0),
            dt: SIM_DT,
            rng: &mut rng,
        };
        for _ in 0..70 {
            chelnov.update(&mut cx);
        }
        assert!(!chelnov.is_attacking());
        assert!(chelnov.can_be_captured());
    }

    #[test]
    fn test_lean_back_when_pulled_from_range() {
        let mut rng = Pcg32::seed_from_u64(4);
        let mut chelnov = Enemy::spawn(1, EnemyKind::Chelnov, Vec2::new(500.0, 720.0), &mut rng);
        let center = chelnov.center();
        chelnov.pull_toward(center + Vec2::new(150.0, 0.0), 0.0, SIM_DT);
        assert_eq!(chelnov.mob.anim.state(), EnemyAnim::LeanBack);
        chelnov.pull_toward(center + Vec2::new(40.0, 0.0), 0.0, SIM_DT);
        assert_eq!(chelnov.mob.anim.state(), EnemyAnim::Pulled);
    }
}
