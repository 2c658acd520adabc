//! Score and combo bookkeeping
//!
//! Points come from game events. Penalties saturate at zero, so the score is
//! never negative.

use super::enemy::EnemyKind;
use super::state::GameEvent;

pub const AERIAL_BONUS: u64 = 150;
pub const BURST_BONUS: u64 = 300;
pub const CHARACTER_BONUS: u64 = 500;
pub const HIT_PENALTY: u64 = 50;
pub const DEATH_PENALTY: u64 = 200;

/// Minimum released captures for the burst bonus
const BURST_MIN: usize = 3;

/// Level clear award table
#[derive(Debug, Clone, Copy, PartialEq)]
struct ClearAward {
    base: u64,
    no_damage: u64,
    /// (elapsed under, bonus), fastest first
    time_tiers: [(f32, u64); 3],
}

const LEVEL_ONE_CLEAR: ClearAward = ClearAward {
    base: 1000,
    no_damage: 1500,
    time_tiers: [(30.0, 2000), (45.0, 1000), (60.0, 500)],
};

const LEVEL_TWO_CLEAR: ClearAward = ClearAward {
    base: 2000,
    no_damage: 2500,
    time_tiers: [(60.0, 3000), (90.0, 1500), (120.0, 750)],
};

impl ClearAward {
    fn for_level(level: u32) -> Self {
        if level <= 1 {
            LEVEL_ONE_CLEAR
        } else {
            LEVEL_TWO_CLEAR
        }
    }

    fn total(&self, elapsed: f32, no_damage: bool) -> u64 {
        let time = self
            .time_tiers
            .iter()
            .find(|(under, _)| elapsed < *under)
            .map_or(0, |(_, bonus)| *bonus);
        self.base + if no_damage { self.no_damage } else { 0 } + time
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScoreManager {
    score: u64,
    combo: u32,
    combo_timer: f32,
    combo_window: f32,
    level_time: f32,
    no_damage: bool,
}

impl ScoreManager {
    pub fn new(combo_window: f32) -> Self {
        Self {
            score: 0,
            combo: 0,
            combo_timer: 0.0,
            combo_window,
            level_time: 0.0,
            no_damage: true,
        }
    }

    pub fn score(&self) -> u64 {
        self.score
    }

    pub fn combo(&self) -> u32 {
        self.combo
    }

    pub fn combo_timer(&self) -> f32 {
        self.combo_timer
    }

    pub fn level_time(&self) -> f32 {
        self.level_time
    }

    pub fn is_no_damage(&self) -> bool {
        self.no_damage
    }

    /// Advance level time and let the combo lapse
    pub fn update(&mut self, dt: f32) {
        self.level_time += dt;
        if self.combo_timer > 0.0 {
            self.combo_timer -= dt;
            if self.combo_timer <= 0.0 {
                self.combo_timer = 0.0;
                self.combo = 0;
            }
        }
    }

    /// Whole-session reset (new game)
    pub fn reset(&mut self) {
        *self = Self::new(self.combo_window);
    }

    /// Per-level reset; the score carries over
    pub fn reset_level(&mut self) {
        self.combo = 0;
        self.combo_timer = 0.0;
        self.level_time = 0.0;
        self.no_damage = true;
    }

    fn award(&mut self, points: u64) -> u64 {
        self.score += points;
        points
    }

    fn penalize(&mut self, points: u64) {
        self.score = self.score.saturating_sub(points);
    }

    pub fn capture(&mut self, kind: EnemyKind) -> u64 {
        self.award(u64::from(kind.capture_points()))
    }

    /// Defeat points scale with the combo reached before this kill
    pub fn defeat(&mut self, kind: EnemyKind) -> u64 {
        let doubled = u64::from(kind.capture_points()) * 2;
        let points = if self.combo >= 5 {
            doubled * 2
        } else if self.combo >= 3 {
            doubled * 3 / 2
        } else {
            doubled
        };
        self.combo += 1;
        self.combo_timer = self.combo_window;
        self.award(points)
    }

    /// Bonus for defeats landing in the same tick
    pub fn multi_kill(&mut self, count: usize) -> u64 {
        match count {
            0 | 1 => 0,
            2 => self.award(200),
            _ => self.award(500),
        }
    }

    pub fn burst(&mut self, released: usize) -> u64 {
        if released >= BURST_MIN {
            self.award(BURST_BONUS)
        } else {
            0
        }
    }

    pub fn player_hit(&mut self) {
        self.penalize(HIT_PENALTY);
        self.no_damage = false;
        self.combo = 0;
        self.combo_timer = 0.0;
    }

    pub fn player_death(&mut self) {
        self.penalize(DEATH_PENALTY);
    }

    pub fn level_complete(&mut self, level: u32) -> u64 {
        let points = ClearAward::for_level(level).total(self.level_time, self.no_damage);
        self.award(points)
    }

    /// Fold one game event into the score
    pub fn apply(&mut self, event: &GameEvent) {
        match *event {
            GameEvent::EnemyCaptured { kind, .. } => {
                self.capture(kind);
            }
            GameEvent::EnemyDefeated { kind, .. } => {
                self.defeat(kind);
            }
            GameEvent::AerialHit { .. } => {
                self.award(AERIAL_BONUS);
            }
            GameEvent::MultiKill { count } => {
                self.multi_kill(count);
            }
            GameEvent::BurstReleased { count } => {
                self.burst(count);
            }
            GameEvent::PlayerDamaged { .. } => self.player_hit(),
            GameEvent::PlayerDied => self.player_death(),
            GameEvent::LevelStarted { .. } => {
                self.reset_level();
                self.award(CHARACTER_BONUS);
            }
            GameEvent::LevelCleared { level } => {
                let points = self.level_complete(level);
                log::info!(
                    "level {level} cleared in {:.1}s, bonus {points}",
                    self.level_time
                );
            }
            _ => {}
        }
    }
}

impl Default for ScoreManager {
    fn default() -> Self {
        Self::new(3.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_capture_ignores_combo() {
        let mut score = ScoreManager::default();
        score.defeat(EnemyKind::Ghost);
        score.defeat(EnemyKind::Ghost);
        score.defeat(EnemyKind::Ghost);
        assert_eq!(score.capture(EnemyKind::Chelnov), 200);
    }

    #[test]
    fn test_defeat_multiplier_escalates() {
        let mut score = ScoreManager::default();
        let awards: Vec<u64> = (0..7).map(|_| score.defeat(EnemyKind::Ghost)).collect();
        assert_eq!(awards, vec![100, 100, 100, 150, 150, 200, 200]);
        assert_eq!(score.combo(), 7);
    }

    #[test]
    fn test_multi_kill_tiers() {
        let mut score = ScoreManager::default();
        assert_eq!(score.multi_kill(1), 0);
        assert_eq!(score.multi_kill(2), 200);
        assert_eq!(score.multi_kill(4), 500);
    }

    #[test]
    fn test_burst_needs_three() {
        let mut score = ScoreManager::default();
        assert_eq!(score.burst(2), 0);
        assert_eq!(score.burst(3), BURST_BONUS);
    }

    #[test]
    fn test_hit_resets_combo_and_clamps() {
        let mut score = ScoreManager::default();
        score.capture(EnemyKind::Ghost);
        score.defeat(EnemyKind::Ghost);
        assert_eq!(score.score(), 150);
        score.player_hit();
        assert_eq!(score.score(), 100);
        assert_eq!(score.combo(), 0);
        assert!(!score.is_no_damage());
        score.player_death();
        assert_eq!(score.score(), 0);
    }

    #[test]
    fn test_level_clear_awards() {
        let mut score = ScoreManager::default();
        score.update(20.0);
        assert_eq!(score.level_complete(1), 1000 + 1500 + 2000);

        let mut score = ScoreManager::default();
        score.update(50.0);
        score.player_hit();
        assert_eq!(score.level_complete(1), 1000 + 500);

        let mut score = ScoreManager::default();
        score.update(100.0);
        assert_eq!(score.level_complete(2), 2000 + 2500 + 750);

        let mut score = ScoreManager::default();
        score.update(200.0);
        assert_eq!(score.level_complete(2), 2000 + 2500);
    }

    #[test]
    fn test_reset_level_keeps_score() {
        let mut score = ScoreManager::default();
        score.capture(EnemyKind::Skeleton);
        score.defeat(EnemyKind::Ghost);
        score.player_hit();
        score.update(12.0);
        score.reset_level();
        assert_eq!(score.score(), 75 + 100 - 50);
        assert_eq!(score.level_time(), 0.0);
        assert!(score.is_no_damage());
        score.reset();
        assert_eq!(score.score(), 0);
    }

    #[test]
    fn test_apply_level_started_awards_character_bonus() {
        let mut score = ScoreManager::default();
        score.update(5.0);
        score.apply(&GameEvent::LevelStarted { level: 1 });
        assert_eq!(score.score(), CHARACTER_BONUS);
        assert_eq!(score.level_time(), 0.0);
    }

    #[derive(Debug, Clone)]
    enum Op {
        Capture,
        Defeat,
        Hit,
        Death,
        Wait(f32),
    }

    fn op() -> impl Strategy<Value = Op> {
        prop_oneof![
            Just(Op::Capture),
            Just(Op::Defeat),
            Just(Op::Hit),
            Just(Op::Death),
            (0.0f32..2.0).prop_map(Op::Wait),
        ]
    }

    proptest! {
        #[test]
        fn prop_penalties_clamp_at_zero(ops in proptest::collection::vec(op(), 0..60)) {
            let mut score = ScoreManager::default();
            let mut model: i64 = 0;
            for op in ops {
                match op {
                    Op::Capture => model += i64::try_from(score.capture(EnemyKind::Ghost)).unwrap(),
                    Op::Defeat => model += i64::try_from(score.defeat(EnemyKind::Ghost)).unwrap(),
                    Op::Hit => {
                        score.player_hit();
                        model = (model - 50).max(0);
                    }
                    Op::Death => {
                        score.player_death();
                        model = (model - 200).max(0);
                    }
                    Op::Wait(dt) => score.update(dt),
                }
                prop_assert_eq!(i64::try_from(score.score()).unwrap(), model);
            }
        }

        #[test]
        fn prop_combo_lapses_once(
            defeats in 1usize..8,
            steps in proptest::collection::vec(0.01f32..0.5, 1..40),
        ) {
            let mut score = ScoreManager::default();
            for _ in 0..defeats {
                score.defeat(EnemyKind::Skeleton);
            }
            let mut elapsed = 0.0;
            for dt in steps {
                score.update(dt);
                elapsed += dt;
                if elapsed >= 3.0 + 1e-3 {
                    prop_assert_eq!(score.combo(), 0);
                } else if elapsed < 3.0 - 1e-3 {
                    prop_assert_eq!(score.combo(), u32::try_from(defeats).unwrap());
                }
            }
            score.update(3.0);
            score.update(3.0);
            prop_assert_eq!(score.combo(), 0);
            prop_assert_eq!(score.combo_timer(), 0.0);
        }
    }
}
