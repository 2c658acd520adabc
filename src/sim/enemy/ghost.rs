//! Ghost: floaty wanderer that chases at close range and spits at the player

use rand::Rng;

use super::{EnemyAnim, EnemyBehavior, EnemyContext, Mob, Shot, WALK_SPEED};

const GRAVITY_SCALE: f32 = 0.5;
const ATTACK_COOLDOWN: f32 = 3.5;
const ATTACK_DURATION: f32 = 0.35;
/// Projectile leaves during this window of the attack
const FIRE_WINDOW: (f32, f32) = (0.15, 0.35);
const SCREEN_MARGIN: f32 = 50.0;

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Ghost {
    attacking: bool,
    fired: bool,
}

impl EnemyBehavior for Ghost {
    fn update(&mut self, mob: &mut Mob, cx: &mut EnemyContext<'_>) -> Option<Shot> {
        let dist = mob.distance_to(cx.target);
        let very_close = dist.x < 140.0 && dist.y < 110.0;
        let close = dist.x < 200.0 && dist.y < 140.0;

        // Constant speed; direction kept, or turned toward the player when near
        let mut right = if mob.body.vel.x == 0.0 {
            mob.facing_right
        } else {
            mob.body.vel.x > 0.0
        };
        if close && !self.attacking {
            right = cx.target.x >= mob.center().x;
        }
        mob.body.vel.x = if right { WALK_SPEED } else { -WALK_SPEED };
        mob.integrate(cx.grid, GRAVITY_SCALE, None, cx.dt);

        if !mob.is_paused() && mob.timers.state > 1.0 && cx.rng.random_bool(0.06) {
            mob.timers.pause = cx.rng.random_range(1.0..1.8);
            mob.timers.state = 0.0;
            if cx.rng.random_bool(0.5) {
                mob.body.vel.x = -mob.body.vel.x;
            }
        }

        let mut shot = None;
        if self.attacking {
            mob.anim.set(EnemyAnim::Attack);
            let t = mob.timers.action;
            if !self.fired && t > FIRE_WINDOW.0 && t < FIRE_WINDOW.1 {
                self.fired = true;
                shot = Some(Shot {
                    origin: mob.center(),
                });
            }
            if t >= ATTACK_DURATION {
                self.attacking = false;
            }
        } else if very_close && mob.timers.shoot >= ATTACK_COOLDOWN {
            self.attacking = true;
            self.fired = false;
            mob.timers.shoot = 0.0;
            mob.timers.action = 0.0;
            mob.anim.set(EnemyAnim::Charge);
        } else if close {
            mob.anim.set(EnemyAnim::Chase);
        } else {
            mob.anim.set(EnemyAnim::Idle);
        }

        if !mob.is_paused() && mob.timers.state > 2.2 && cx.rng.random_bool(0.04) {
            mob.body.vel.x = -mob.body.vel.x;
            mob.timers.state = 0.0;
        }

        mob.bounce_within(SCREEN_MARGIN);
        shot
    }

    fn is_attacking(&self) -> bool {
        self.attacking
    }
}

#[cfg(test)]
mod tests {
    use super::super::{Enemy, EnemyKind};
    use super::*;
    use crate::consts::*;
    use crate::sim::grid::Grid;
    use glam::Vec2;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn floor() -> Grid {
        let mut grid = Grid::standard();
        grid.fill_wall(13, 0, 17);
        grid
    }

    #[test]
    fn test_ghost_fires_once_when_very_close() {
        let grid = floor();
        let mut rng = Pcg32::seed_from_u64(11);
        let mut ghost = Enemy::spawn(1, EnemyKind::Ghost, Vec2::new(500.0, 720.0), &mut rng);
        ghost.settle(&grid);
        ghost.mob.timers.shoot = ATTACK_COOLDOWN;

        let mut shots = 0;
        for _ in 0..60 {
            let target = ghost.center() + Vec2::new(60.0, 0.0);
            let mut cx = EnemyContext {
                grid: &grid,
                target,
                dt: SIM_DT,
                rng: &mut rng,
            };
            if ghost.update(&mut cx).is_some() {
                shots += 1;
            }
        }
        assert_eq!(shots, 1);
        assert!(!ghost.is_attacking());
    }

    #[test]
    fn test_ghost_stays_inside_margins() {
        let grid = floor();
        let mut rng = Pcg32::seed_from_u64(5);
        let mut ghost = Enemy::spawn(1, EnemyKind::Ghost, Vec2::new(10.0, 720.0), &mut rng);
        for _ in 0..600 {
            let mut cx = EnemyContext {
                grid: &grid,
                target: Vec2::new(1000.0, 100.0),
                dt: SIM_DT,
                rng: &mut rng,
            };
            ghost.update(&mut cx);
            let x = ghost.mob.body.pos.x;
            assert!(x >= SCREEN_MARGIN - 1e-3);
            assert!(x <= SCREEN_WIDTH - ENEMY_WIDTH - SCREEN_MARGIN + 1e-3);
        }
    }
}
