//! Fixed timestep simulation tick
//!
//! A play tick runs in a fixed order:
//! 1. restart, timers and the death delay
//! 2. player input, shots and bursts, then player physics
//! 3. enemies (brains, vacuum pull and capture, contact damage), separation
//! 4. enemy shots, then player projectiles (self hits, defeats, multi-kills)
//! 5. danger flag, power-up pickups
//! 6. removal of inactive entities, then wave and level progress
//!
//! Entities are only flagged inactive during the passes; the lists are
//! compacted once all collision checks for the tick are done.

use glam::Vec2;

use super::enemy::{EnemyContext, EnemyKind, separate};
use super::level;
use super::player::{Character, PlayerAnim};
use super::projectile::{EnemyProjectile, Projectile};
use super::state::{DamageSource, GameEvent, GamePhase, GameState};
use super::vacuum::{AimDirection, in_vacuum_cone};
use crate::consts::*;
use crate::input::{InputFrame, Key};

/// Advance the game state by one fixed timestep
pub fn tick(state: &mut GameState, input: &InputFrame, dt: f32) {
    state.time_ticks += 1;
    match state.phase {
        GamePhase::CharacterSelect => character_select(state, input),
        GamePhase::Playing => play(state, input, dt),
        GamePhase::GameOver | GamePhase::Victory => {
            if input.pressed(Key::Restart) {
                state.return_to_select();
            }
        }
    }
}

fn character_select(state: &mut GameState, input: &InputFrame) {
    if input.pressed(Key::SelectYellow) {
        state.select_character(Character::Yellow);
    }
    if input.pressed(Key::SelectGreen) {
        state.select_character(Character::Green);
    }
    if input.pressed(Key::Confirm) {
        state.start_game();
    }
}

fn play(state: &mut GameState, input: &InputFrame, dt: f32) {
    if input.pressed(Key::Restart) {
        log::info!("restarting level {}", state.session.level);
        state.start_level(state.session.level);
        return;
    }

    state.score.update(dt);
    state.shot_cooldown = (state.shot_cooldown - dt).max(0.0);
    state.burst_cooldown = (state.burst_cooldown - dt).max(0.0);

    if let Some(timer) = state.death_timer {
        let remaining = timer - dt;
        state.death_timer = Some(remaining);
        state.player.update(&state.grid, dt);
        if remaining <= 0.0 {
            let score = state.score.score();
            log::info!("game over with {score} points");
            state.phase = GamePhase::GameOver;
            state.emit(GameEvent::GameOver { score });
        }
        return;
    }

    player_controls(state, input, dt);
    state.player.update(&state.grid, dt);

    update_enemies(state, dt);
    update_enemy_projectiles(state, dt);
    update_projectiles(state, dt);
    update_danger(state);
    collect_powerups(state, dt);

    state.enemies.retain(|e| e.is_live());
    state.projectiles.retain(|p| p.active);
    state.enemy_projectiles.retain(|p| p.active);
    state.powerups.retain(|p| p.active);
    state.normalize_order();

    progress(state, dt);
}

fn player_controls(state: &mut GameState, input: &InputFrame, dt: f32) {
    state.player.handle_movement(input, dt);
    state.player.handle_vacuum(input, &state.tuning, dt);

    if input.pressed(Key::Shoot)
        && state.shot_cooldown <= 0.0
        && let Some(kind) = state.player.captured.pop()
    {
        let direction = state.player.shot_direction();
        fire(state, kind, direction, 0.0);
        state.shot_cooldown = state.tuning.shot_cooldown;
    }

    if input.pressed(Key::Burst) && state.burst_cooldown <= 0.0 && !state.player.captured.is_empty() {
        let kinds = state.player.captured.drain_all();
        let direction = state.player.shot_direction();
        let spread = state.tuning.burst_spread;
        let mid = (kinds.len() - 1) as f32 * 0.5;
        for (i, &kind) in kinds.iter().enumerate() {
            // Sideways bursts fan out ahead of the player, vertical ones around them
            let offset = match direction {
                AimDirection::Right => i as f32 * spread,
                AimDirection::Left => -(i as f32) * spread,
                AimDirection::Up | AimDirection::Down => (i as f32 - mid) * spread,
            };
            fire(state, kind, direction, offset);
        }
        state.burst_cooldown = state.tuning.burst_cooldown;
        log::debug!("burst released {} captures", kinds.len());
        state.emit(GameEvent::BurstReleased { count: kinds.len() });
    }
}

/// Throw one captured enemy from the player's hand
fn fire(state: &mut GameState, kind: EnemyKind, direction: AimDirection, offset_x: f32) {
    let origin = state.player.launch_point(direction) - Vec2::splat(PROJECTILE_SIZE * 0.5)
        + Vec2::new(offset_x, 0.0);
    let roll_right = (!direction.is_vertical()).then_some(state.player.facing_right);
    let id = state.next_entity_id();
    let mut projectile = Projectile::launch(
        id,
        kind,
        origin,
        direction,
        roll_right,
        &state.grid,
        &mut state.rng,
    );

    if state.tuning.projectile_row_assist
        && direction.is_vertical()
        && let Some(row) = level::busiest_row(
            &state.grid,
            &state.enemies,
            projectile.spawn_row,
            direction == AimDirection::Up,
        )
    {
        projectile.retarget(row);
    }

    log::debug!(
        "fired {} {:?} from row {} ({:?})",
        kind.name(),
        direction,
        projectile.spawn_row,
        projectile.phase()
    );
    state.projectiles.push(projectile);
    state.emit(GameEvent::ShotFired { kind, direction });
}

/// Contact damage is limited to enemies within a row of the player unless
/// the toggle is off; chelnov always connects
fn contact_in_reach(gated: bool, kind: EnemyKind, player_row: i32, enemy_row: i32) -> bool {
    !gated || kind == EnemyKind::Chelnov || (player_row - enemy_row).abs() <= 1
}

fn update_enemies(state: &mut GameState, dt: f32) {
    let target = state.player.center();
    let hitbox = state.player.hitbox();
    let player_row = state.player.foot_row();
    let vacuum = state.player.vacuum;
    let range = state.player.vacuum_range.value();
    let angle = state.player.vacuum_angle.value();
    let power = state.player.vacuum_power.value();
    let gated = state.tuning.row_gated_contact;

    let mut shots = Vec::new();
    let mut captures = Vec::new();
    let mut contact: Option<(EnemyKind, bool, PlayerAnim)> = None;

    for enemy in state.enemies.iter_mut().filter(|e| e.is_live()) {
        let mut cx = EnemyContext {
            grid: &state.grid,
            target,
            dt,
            rng: &mut state.rng,
        };
        if let Some(shot) = enemy.update(&mut cx) {
            shots.push((enemy.id, enemy.kind, shot.origin));
        }

        let player = &mut state.player;
        if vacuum.active
            && !player.is_dead()
            && !player.captured.is_full()
            && enemy.can_be_captured()
            && in_vacuum_cone(target, enemy.center(), vacuum.direction, range, angle)
        {
            enemy.pull_toward(target, power, dt);
            if enemy.touches(&hitbox) && player.captured.push(enemy.kind) {
                enemy.mark_captured();
                log::debug!("captured {} #{}", enemy.kind.name(), enemy.id);
                captures.push((enemy.id, enemy.kind));
                continue;
            }
        }

        if contact.is_none()
            && !vacuum.active
            && !player.is_dead()
            && !player.is_invulnerable()
            && enemy.is_visible()
            && contact_in_reach(gated, enemy.kind, player_row, enemy.foot_row())
            && enemy.touches(&hitbox)
        {
            let from_above = enemy.center().y < target.y - 10.0;
            let reaction = if from_above {
                PlayerAnim::ShootForward
            } else {
                PlayerAnim::ShootSide
            };
            contact = Some((enemy.kind, enemy.kind == EnemyKind::Ghost, reaction));
        }
    }

    separate(&mut state.enemies);

    for (id, kind) in captures {
        state.emit(GameEvent::EnemyCaptured { id, kind });
    }
    if let Some((kind, lethal, reaction)) = contact {
        damage_player(state, DamageSource::Contact(kind), lethal, reaction);
    }
    for (enemy_id, kind, origin) in shots {
        let id = state.next_entity_id();
        state
            .enemy_projectiles
            .push(EnemyProjectile::new(id, kind, origin, target));
        state.emit(GameEvent::EnemyFired { id: enemy_id, kind });
    }
}

fn update_enemy_projectiles(state: &mut GameState, dt: f32) {
    let hitbox = state.player.hitbox();
    let vulnerable = !state.player.is_dead() && !state.player.is_invulnerable();
    let mut hit = None;
    for shot in state.enemy_projectiles.iter_mut().filter(|s| s.active) {
        shot.update(dt);
        if vulnerable && hit.is_none() && shot.active && shot.rect().intersects(&hitbox) {
            shot.active = false;
            hit = Some((shot.source, shot.is_vertical()));
        }
    }
    if let Some((kind, vertical)) = hit {
        let reaction = if vertical {
            PlayerAnim::ShootForward
        } else {
            PlayerAnim::ShootSide
        };
        damage_player(state, DamageSource::EnemyShot(kind), false, reaction);
    }
}

fn update_projectiles(state: &mut GameState, dt: f32) {
    let hitbox = state.player.hitbox();
    let vulnerable = !state.player.is_dead() && !state.player.is_invulnerable();
    let mut self_hit = false;
    let mut events = Vec::new();
    let mut defeated = 0;

    for projectile in state.projectiles.iter_mut().filter(|p| p.active) {
        projectile.update(&state.grid, dt);
        if !projectile.active {
            continue;
        }

        if vulnerable && !self_hit && projectile.is_rolling() && projectile.rect().intersects(&hitbox) {
            projectile.active = false;
            self_hit = true;
            continue;
        }

        if let Some(enemy) = state.enemies.iter_mut().find(|e| projectile.hits(e)) {
            enemy.mark_defeated();
            projectile.active = false;
            defeated += 1;
            log::debug!("defeated {} #{}", enemy.kind.name(), enemy.id);
            if projectile.is_aerial() {
                events.push(GameEvent::AerialHit { id: enemy.id });
            }
            events.push(GameEvent::EnemyDefeated {
                id: enemy.id,
                kind: enemy.kind,
            });
        }
    }

    for event in events {
        state.emit(event);
    }
    if defeated >= 2 {
        state.emit(GameEvent::MultiKill { count: defeated });
    }
    if self_hit {
        damage_player(state, DamageSource::OwnProjectile, false, PlayerAnim::Hurt);
    }
}

/// Flag a rolling projectile closing in on the player's row
fn update_danger(state: &mut GameState) {
    let player = &state.player;
    let row = player.foot_row();
    let center_x = player.center().x;
    let radius = state.tuning.danger_radius;
    let danger = player.body.on_ground
        && state.projectiles.iter().any(|p| {
            let dx = center_x - p.center().x;
            p.active
                && p.is_rolling()
                && p.bottom_row() == row
                && dx * p.vel.x >= 0.0
                && dx.abs() < radius
        });
    state.player.danger = danger;
}

fn collect_powerups(state: &mut GameState, dt: f32) {
    let hitbox = state.player.hitbox();
    let alive = !state.player.is_dead();
    let mut collected = Vec::new();
    for powerup in state.powerups.iter_mut() {
        powerup.update(dt);
        if alive && powerup.touches(&hitbox) {
            powerup.active = false;
            collected.push(powerup.kind);
        }
    }
    for kind in collected {
        state.player.apply_powerup(kind, &state.tuning);
        log::debug!("collected {} power-up", kind.name());
        state.emit(GameEvent::PowerupCollected { kind });
    }
}

fn damage_player(state: &mut GameState, source: DamageSource, lethal: bool, reaction: PlayerAnim) {
    if state.player.is_dead() {
        return;
    }
    let fatal = state
        .player
        .take_hit(lethal, reaction, state.tuning.invulnerability);
    let health = state.player.health;
    log::debug!("player hit by {source:?}, health {health}");
    state.emit(GameEvent::PlayerDamaged { source, health });
    if fatal {
        state.death_timer = Some(state.tuning.death_delay);
        state.player.vacuum.active = false;
        log::info!("player died on level {}", state.session.level);
        state.emit(GameEvent::PlayerDied);
    }
}

/// Spawn pending waves and finish the level once the field is clear
fn progress(state: &mut GameState, dt: f32) {
    let live = state.live_enemies();
    if let Some((kind, count)) = state.session.poll_wave(live, state.tuning.wave_delay, dt) {
        state.spawn_wave(kind, count);
        return;
    }
    if !state.session.is_cleared(live) {
        return;
    }

    let level = state.session.level;
    state.emit(GameEvent::LevelCleared { level });
    if state.session.is_last_level() {
        let score = state.score.score();
        log::info!("victory with {score} points");
        state.player.anim.force(PlayerAnim::Victory);
        state.phase = GamePhase::Victory;
        state.emit(GameEvent::Victory { score });
    } else {
        state.start_level(level + 1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::{EdgeDetector, KeyState};
    use crate::sim::enemy::Enemy;
    use crate::tuning::Tuning;

    fn playing(seed: u64) -> GameState {
        let mut state = GameState::new(seed, Tuning::default());
        state.start_game();
        state.take_events();
        state
    }

    /// Level 1 with every enemy removed
    fn empty_level(seed: u64) -> GameState {
        let mut state = playing(seed);
        state.enemies.clear();
        state.powerups.clear();
        state
    }

    fn press(keys: &[Key]) -> InputFrame {
        let mut edges = EdgeDetector::default();
        edges.sample(KeyState::with(keys))
    }

    fn hold(keys: &[Key]) -> InputFrame {
        let mut edges = EdgeDetector::default();
        edges.reset(KeyState::with(keys));
        edges.sample(KeyState::with(keys))
    }

    /// Let the player drop onto the floor without running a level tick
    fn settle_player(state: &mut GameState) {
        for _ in 0..90 {
            state.player.update(&state.grid, SIM_DT);
        }
    }

    fn add_enemy(state: &mut GameState, kind: EnemyKind, pos: Vec2) -> u32 {
        let id = state.next_entity_id();
        let mut enemy = Enemy::spawn(id, kind, pos, &mut state.rng);
        enemy.settle(&state.grid);
        state.enemies.push(enemy);
        id
    }

    #[test]
    fn test_select_and_confirm() {
        let mut state = GameState::new(3, Tuning::default());
        tick(&mut state, &press(&[Key::SelectGreen]), SIM_DT);
        assert_eq!(state.selected, Character::Green);
        assert_eq!(state.phase, GamePhase::CharacterSelect);
        tick(&mut state, &press(&[Key::Confirm]), SIM_DT);
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.player.character, Character::Green);
    }

    #[test]
    fn test_shot_consumes_capture_and_cooldown() {
        let mut state = empty_level(4);
        add_enemy(&mut state, EnemyKind::Skeleton, Vec2::new(1000.0, 719.0));
        settle_player(&mut state);
        state.player.captured.push(EnemyKind::Ghost);
        state.player.captured.push(EnemyKind::Ghost);
        state.take_events();

        tick(&mut state, &press(&[Key::Shoot]), SIM_DT);
        assert_eq!(state.player.captured.len(), 1);
        assert_eq!(state.projectiles.len(), 1);
        assert!(state.projectiles[0].is_rolling());
        assert!(state.shot_cooldown > 0.0);

        // still cooling down
        tick(&mut state, &InputFrame::default(), SIM_DT);
        tick(&mut state, &press(&[Key::Shoot]), SIM_DT);
        assert_eq!(state.player.captured.len(), 1);
        let shots = state
            .take_events()
            .iter()
            .filter(|e| matches!(e, GameEvent::ShotFired { .. }))
            .count();
        assert_eq!(shots, 1);
    }

    #[test]
    fn test_burst_releases_everything() {
        let mut state = empty_level(4);
        add_enemy(&mut state, EnemyKind::Skeleton, Vec2::new(1000.0, 719.0));
        settle_player(&mut state);
        for _ in 0..3 {
            state.player.captured.push(EnemyKind::Ghost);
        }
        state.take_events();
        let before = state.score.score();
        tick(&mut state, &press(&[Key::Burst]), SIM_DT);
        assert!(state.player.captured.is_empty());
        assert_eq!(state.projectiles.len(), 3);
        assert!(state.take_events().contains(&GameEvent::BurstReleased { count: 3 }));
        assert!(state.score.score() >= before + 300);
        assert!(!state.player.is_invulnerable());
    }

    #[test]
    fn test_vacuum_captures_enemy_in_cone() {
        let mut state = empty_level(6);
        add_enemy(&mut state, EnemyKind::Skeleton, Vec2::new(1000.0, 719.0));
        settle_player(&mut state);
        let center = state.player.center();
        let id = add_enemy(&mut state, EnemyKind::Skeleton, Vec2::new(center.x + 40.0, 719.0));
        state.take_events();

        let mut captured = false;
        for _ in 0..60 {
            tick(&mut state, &hold(&[Key::Vacuum]), SIM_DT);
            if state
                .take_events()
                .contains(&GameEvent::EnemyCaptured { id, kind: EnemyKind::Skeleton })
            {
                captured = true;
                break;
            }
        }
        assert!(captured);
        assert_eq!(state.player.captured.kinds(), &[EnemyKind::Skeleton]);
        assert!(state.enemies.iter().all(|e| e.id != id));
    }

    #[test]
    fn test_contact_damage_and_iframes() {
        let mut state = empty_level(8);
        settle_player(&mut state);
        let pos = state.player.body.pos + Vec2::new(40.0, 187.0 - ENEMY_HEIGHT);
        add_enemy(&mut state, EnemyKind::Skeleton, pos);
        state.take_events();

        tick(&mut state, &InputFrame::default(), SIM_DT);
        assert_eq!(state.player.health, PLAYER_START_HEALTH - 1);
        assert!(state.player.is_invulnerable());
        tick(&mut state, &InputFrame::default(), SIM_DT);
        assert_eq!(state.player.health, PLAYER_START_HEALTH - 1);
        let hits = state
            .take_events()
            .iter()
            .filter(|e| matches!(e, GameEvent::PlayerDamaged { .. }))
            .count();
        assert_eq!(hits, 1);
    }

    #[test]
    fn test_ghost_contact_is_lethal() {
        let mut state = empty_level(8);
        settle_player(&mut state);
        let pos = state.player.body.pos + Vec2::new(40.0, 187.0 - ENEMY_HEIGHT);
        add_enemy(&mut state, EnemyKind::Ghost, pos);
        tick(&mut state, &InputFrame::default(), SIM_DT);
        assert!(state.player.is_dead());
        assert!(state.death_timer.is_some());
        assert!(state.take_events().contains(&GameEvent::PlayerDied));
    }

    #[test]
    fn test_row_gate_blocks_distant_contact() {
        assert!(contact_in_reach(true, EnemyKind::Skeleton, 13, 12));
        assert!(!contact_in_reach(true, EnemyKind::Skeleton, 13, 11));
        assert!(contact_in_reach(true, EnemyKind::Chelnov, 13, 8));
        assert!(contact_in_reach(false, EnemyKind::Ghost, 13, 5));
    }

    #[test]
    fn test_rolling_projectile_defeats_enemy() {
        let mut state = empty_level(10);
        settle_player(&mut state);
        // just ahead of the throwing hand, clear of the player's hitbox
        let player_x = state.player.body.pos.x;
        let id = add_enemy(&mut state, EnemyKind::Skeleton, Vec2::new(player_x + 230.0, 719.0));
        add_enemy(&mut state, EnemyKind::Skeleton, Vec2::new(1000.0, 719.0));
        state.player.captured.push(EnemyKind::Ghost);
        state.take_events();

        let mut defeated = false;
        for i in 0..120 {
            let input = if i == 0 {
                press(&[Key::Shoot])
            } else {
                InputFrame::default()
            };
            tick(&mut state, &input, SIM_DT);
            let events = state.take_events();
            if events.contains(&GameEvent::EnemyDefeated { id, kind: EnemyKind::Skeleton }) {
                assert!(!events.iter().any(|e| matches!(e, GameEvent::AerialHit { .. })));
                defeated = true;
                break;
            }
        }
        assert!(defeated);
        assert_eq!(state.score.combo(), 1);
        assert!(state.projectiles.is_empty());
    }

    /// Rolling projectile dropped onto `target`, heading left
    fn rolling_at(state: &mut GameState, target: Vec2) -> Projectile {
        let id = state.next_entity_id();
        let mut projectile = Projectile::launch(
            id,
            EnemyKind::Ghost,
            target,
            AimDirection::Left,
            None,
            &state.grid,
            &mut state.rng,
        );
        projectile.pos = target - Vec2::splat(PROJECTILE_SIZE * 0.5);
        projectile
    }

    #[test]
    fn test_same_tick_defeats_award_multi_kill() {
        let mut state = empty_level(14);
        settle_player(&mut state);
        let first = add_enemy(&mut state, EnemyKind::Skeleton, Vec2::new(600.0, 719.0));
        let second = add_enemy(&mut state, EnemyKind::Skeleton, Vec2::new(850.0, 719.0));
        add_enemy(&mut state, EnemyKind::Skeleton, Vec2::new(1000.0, 719.0));
        for id in [first, second] {
            let center = state.enemies.iter().find(|e| e.id == id).unwrap().center();
            let projectile = rolling_at(&mut state, center);
            state.projectiles.push(projectile);
        }
        state.take_events();
        let before = state.score.score();

        tick(&mut state, &InputFrame::default(), SIM_DT);
        let events = state.take_events();
        let defeats = events
            .iter()
            .filter(|e| matches!(e, GameEvent::EnemyDefeated { .. }))
            .count();
        assert_eq!(defeats, 2);
        let multi: Vec<&GameEvent> = events
            .iter()
            .filter(|e| matches!(e, GameEvent::MultiKill { .. }))
            .collect();
        assert_eq!(multi, vec![&GameEvent::MultiKill { count: 2 }]);
        // two skeletons at 150 each plus the two-kill bonus
        assert_eq!(state.score.score(), before + 150 + 150 + 200);
        assert_eq!(state.score.combo(), 2);
    }

    #[test]
    fn test_own_rolling_projectile_hurts_player() {
        let mut state = empty_level(15);
        add_enemy(&mut state, EnemyKind::Skeleton, Vec2::new(1000.0, 719.0));
        settle_player(&mut state);
        let center = state.player.center();
        let projectile = rolling_at(&mut state, center);
        state.projectiles.push(projectile);
        state.take_events();
        let before = state.score.score();

        tick(&mut state, &InputFrame::default(), SIM_DT);
        let events = state.take_events();
        assert!(events.contains(&GameEvent::PlayerDamaged {
            source: DamageSource::OwnProjectile,
            health: PLAYER_START_HEALTH - 1,
        }));
        assert_eq!(state.player.health, PLAYER_START_HEALTH - 1);
        assert!(state.player.is_invulnerable());
        assert_eq!(state.player.anim.state(), PlayerAnim::Hurt);
        assert_eq!(state.score.score(), before - 50);
        assert!(state.projectiles.is_empty());

        // a second roll through the player is ignored during the i-frames
        let center = state.player.center();
        let projectile = rolling_at(&mut state, center);
        state.projectiles.push(projectile);
        tick(&mut state, &InputFrame::default(), SIM_DT);
        assert!(
            !state
                .take_events()
                .iter()
                .any(|e| matches!(e, GameEvent::PlayerDamaged { .. }))
        );
        assert_eq!(state.player.health, PLAYER_START_HEALTH - 1);
    }

    #[test]
    fn test_danger_flag_for_approaching_roll() {
        let mut state = empty_level(12);
        add_enemy(&mut state, EnemyKind::Skeleton, Vec2::new(1000.0, 719.0));
        settle_player(&mut state);
        let row_top = state.grid.row_top_y(13) as f32;
        let center_x = state.player.center().x;
        let id = state.next_entity_id();
        let spawn = Vec2::new(center_x + 150.0, row_top - PROJECTILE_SIZE);
        let projectile = Projectile::launch(
            id,
            EnemyKind::Ghost,
            spawn,
            AimDirection::Left,
            None,
            &state.grid,
            &mut state.rng,
        );
        state.projectiles.push(projectile);
        tick(&mut state, &InputFrame::default(), SIM_DT);
        assert!(state.player.danger);
        tick(&mut state, &InputFrame::default(), SIM_DT);
        assert_eq!(state.player.anim.state(), PlayerAnim::Alert);
    }

    #[test]
    fn test_cleared_level_one_advances() {
        let mut state = empty_level(14);
        tick(&mut state, &InputFrame::default(), SIM_DT);
        assert_eq!(state.session.level, 2);
        assert_eq!(state.phase, GamePhase::Playing);
        let events = state.take_events();
        assert!(events.contains(&GameEvent::LevelCleared { level: 1 }));
        assert!(events.contains(&GameEvent::LevelStarted { level: 2 }));
    }

    #[test]
    fn test_restart_rebuilds_level() {
        let mut state = playing(16);
        state.enemies.truncate(3);
        tick(&mut state, &press(&[Key::Restart]), SIM_DT);
        assert_eq!(state.enemies.len(), 12);
        assert_eq!(state.session.level, 1);
    }
}
