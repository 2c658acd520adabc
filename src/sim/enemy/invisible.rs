//! Invisible man: walker that spins out and reappears near the player

use rand::Rng;

use super::{
    EnemyAnim, EnemyBehavior, EnemyContext, EnemyKind, Mob, Shot, WALK_SPEED, reappear_position,
};

const SCREEN_MARGIN: f32 = 50.0;
/// Minimum time walking before a teleport may start
const TELEPORT_READY: f32 = 0.8;
const TELEPORT_CHANCE: f64 = 0.4;
const RECOVER_PAUSE: f32 = 0.3;

#[derive(Debug, Clone, PartialEq, Default)]
pub struct InvisibleMan {
    teleporting: bool,
    /// Time spent spinning out
    spin_timer: f32,
    /// Spin-out length for the current teleport
    spin_duration: f32,
    cooldown: f32,
}

impl InvisibleMan {
    pub fn is_teleporting(&self) -> bool {
        self.teleporting
    }
}

impl EnemyBehavior for InvisibleMan {
    fn update(&mut self, mob: &mut Mob, cx: &mut EnemyContext<'_>) -> Option<Shot> {
        mob.integrate(cx.grid, 1.0, Some(WALK_SPEED), cx.dt);
        mob.bounce_within(SCREEN_MARGIN);

        if !self.teleporting
            && self.cooldown <= 0.0
            && mob.jump.is_none()
            && mob.timers.action > TELEPORT_READY
            && cx.rng.random_bool(TELEPORT_CHANCE)
        {
            self.teleporting = true;
            self.spin_timer = 0.0;
            self.spin_duration = cx.rng.random_range(0.12..=0.25);
            mob.timers.pause = 0.05;
            mob.timers.action = 0.0;
            mob.body.vel.x = 0.0;
            mob.anim.set(EnemyAnim::Spin);
        }

        if self.teleporting {
            self.spin_timer += cx.dt;
            if self.spin_timer >= self.spin_duration {
                let pos = reappear_position(cx.grid, cx.target, mob.body.size, cx.rng);
                mob.body.pos = pos;
                mob.body.vel.y = 0.0;
                self.teleporting = false;
                self.cooldown = cx.rng.random_range(0.3..0.6);
                mob.timers.pause = RECOVER_PAUSE;
                mob.facing_right = cx.target.x >= pos.x;
                mob.anim.set(EnemyAnim::Recover);
                log::debug!("invisible man reappeared at ({:.0}, {:.0})", pos.x, pos.y);
            }
        }

        if self.cooldown > 0.0 {
            self.cooldown -= cx.dt;
        }

        if !self.teleporting && !mob.anim.is_committed(EnemyKind::InvisibleMan) {
            let moving = mob.body.vel.x.abs() > 0.1 && !mob.is_paused();
            mob.anim.set(if moving { EnemyAnim::Walk } else { EnemyAnim::Idle });
        }
        None
    }

    fn can_be_captured(&self) -> bool {
        !self.teleporting
    }

    fn is_visible(&self) -> bool {
        !self.teleporting
    }
}
