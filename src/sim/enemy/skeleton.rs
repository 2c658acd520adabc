//! Skeleton: platform walker that winds up and throws its head

use glam::Vec2;

use super::{EnemyAnim, EnemyBehavior, EnemyContext, Mob, Shot, WALK_SPEED};

const THROW_INTERVAL: f32 = 5.0;
const WINDUP: f32 = 0.6;
const THROW_END: f32 = 1.4;
const SCREEN_MARGIN: f32 = 10.0;

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Skeleton {
    attacking: bool,
    fired: bool,
}

impl EnemyBehavior for Skeleton {
    fn update(&mut self, mob: &mut Mob, cx: &mut EnemyContext<'_>) -> Option<Shot> {
        let dist = mob.distance_to(cx.target);
        let in_throw_range = dist.x < 260.0 && dist.y < 160.0;

        if mob.body.on_ground && mob.timers.shoot >= THROW_INTERVAL && in_throw_range {
            self.attacking = true;
            self.fired = false;
            mob.timers.shoot = 0.0;
            mob.timers.action = 0.0;
        }

        let mut shot = None;
        if self.attacking {
            let t = mob.timers.action;
            if t < WINDUP {
                mob.anim.set(EnemyAnim::Windup);
            } else if t < THROW_END {
                mob.anim.set(EnemyAnim::Throw);
                if !self.fired {
                    self.fired = true;
                    shot = Some(Shot {
                        origin: mob.center(),
                    });
                }
            } else {
                self.attacking = false;
            }
        }

        mob.integrate(cx.grid, 1.0, Some(WALK_SPEED), cx.dt);

        if !self.attacking {
            if !mob.body.on_ground || mob.jump.is_some() {
                mob.anim.set(EnemyAnim::Jump);
            } else if mob.body.vel.x.abs() > 0.1 && !mob.is_paused() {
                mob.anim.set(EnemyAnim::Walk);
            } else {
                mob.anim.set(EnemyAnim::Idle);
            }
        }

        mob.bounce_within(SCREEN_MARGIN);
        shot
    }

    fn is_attacking(&self) -> bool {
        self.attacking
    }

    fn on_pulled(&mut self, mob: &mut Mob, _player_center: Vec2) {
        mob.anim.set(EnemyAnim::Pulled);
    }
}
