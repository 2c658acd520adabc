//! Game state and session lifecycle
//!
//! Everything the tick reads or writes lives here. Entity lists stay sorted by
//! id so iteration order is deterministic for a given seed.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::enemy::{Enemy, EnemyKind};
use super::grid::Grid;
use super::level::{self, LevelSession, Placement};
use super::player::{Character, Player};
use super::powerup::{Powerup, PowerupKind};
use super::projectile::{EnemyProjectile, Projectile};
use super::score::ScoreManager;
use super::vacuum::AimDirection;
use crate::tuning::Tuning;

/// Current phase of the session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamePhase {
    /// Choosing a character before the first level
    CharacterSelect,
    /// A level is running (including the death delay)
    Playing,
    /// The player died; waiting for restart
    GameOver,
    /// The last level was cleared
    Victory,
}

/// What hurt the player
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DamageSource {
    Contact(EnemyKind),
    EnemyShot(EnemyKind),
    /// One of the player's own rolling projectiles
    OwnProjectile,
}

/// Something that happened during a tick.
///
/// Scoring is driven by these; the audio layer maps them to cues.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GameEvent {
    CharacterSelected { character: Character },
    LevelStarted { level: u32 },
    WaveSpawned { wave: usize, kind: EnemyKind, count: usize },
    EnemyCaptured { id: u32, kind: EnemyKind },
    ShotFired { kind: EnemyKind, direction: AimDirection },
    BurstReleased { count: usize },
    EnemyFired { id: u32, kind: EnemyKind },
    EnemyDefeated { id: u32, kind: EnemyKind },
    /// The defeating projectile had not started rolling yet
    AerialHit { id: u32 },
    /// Two or more defeats in one tick
    MultiKill { count: usize },
    PlayerDamaged { source: DamageSource, health: u8 },
    PlayerDied,
    PowerupCollected { kind: PowerupKind },
    LevelCleared { level: u32 },
    GameOver { score: u64 },
    Victory { score: u64 },
}

/// Complete session state (deterministic for a given seed and input stream)
#[derive(Debug, Clone)]
pub struct GameState {
    /// Seed the session RNG started from
    pub seed: u64,
    pub tuning: Tuning,
    pub phase: GamePhase,
    /// Character highlighted on the select screen
    pub selected: Character,
    pub session: LevelSession,
    pub grid: Grid,
    pub player: Player,
    /// Sorted by id
    pub enemies: Vec<Enemy>,
    pub projectiles: Vec<Projectile>,
    pub enemy_projectiles: Vec<EnemyProjectile>,
    pub powerups: Vec<Powerup>,
    pub score: ScoreManager,
    /// Seconds until the next single shot
    pub shot_cooldown: f32,
    /// Seconds until the next burst
    pub burst_cooldown: f32,
    /// Counts down after the killing blow, then the game is over
    pub death_timer: Option<f32>,
    /// Simulation tick counter
    pub time_ticks: u64,
    pub(crate) rng: Pcg32,
    events: Vec<GameEvent>,
    next_id: u32,
}

impl GameState {
    /// Fresh session on the character select screen
    pub fn new(seed: u64, tuning: Tuning) -> Self {
        let selected = Character::default();
        let stats = tuning.character(selected);
        let score = ScoreManager::new(tuning.combo_window);
        Self {
            seed,
            tuning,
            phase: GamePhase::CharacterSelect,
            selected,
            session: LevelSession::new(1),
            grid: Grid::standard(),
            player: Player::new(selected, stats),
            enemies: Vec::new(),
            projectiles: Vec::new(),
            enemy_projectiles: Vec::new(),
            powerups: Vec::new(),
            score,
            shot_cooldown: 0.0,
            burst_cooldown: 0.0,
            death_timer: None,
            time_ticks: 0,
            rng: Pcg32::seed_from_u64(seed),
            events: Vec::new(),
            next_id: 1,
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Record an event and fold it into the score
    pub fn emit(&mut self, event: GameEvent) {
        self.score.apply(&event);
        self.events.push(event);
    }

    /// Drain the events produced since the last call
    pub fn take_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn select_character(&mut self, character: Character) {
        if self.selected != character {
            self.selected = character;
            self.emit(GameEvent::CharacterSelected { character });
        }
    }

    /// New game with the selected character, starting at level 1
    pub fn start_game(&mut self) {
        let stats = self.tuning.character(self.selected);
        self.player = Player::new(self.selected, stats);
        self.score.reset();
        log::info!("new game as {} (seed {})", self.selected.name(), self.seed);
        self.start_level(1);
    }

    /// Build `level` and put the player at the spawn point
    pub fn start_level(&mut self, level: u32) {
        self.session = LevelSession::new(level);
        self.grid = level::build_grid(level, &mut self.rng);
        let stats = self.tuning.character(self.player.character);
        self.player.reset(level, stats);

        self.enemies.clear();
        self.projectiles.clear();
        self.enemy_projectiles.clear();
        self.powerups.clear();
        self.shot_cooldown = 0.0;
        self.burst_cooldown = 0.0;
        self.death_timer = None;

        let placements = level::opening_placements(level, &mut self.rng);
        let spawned = self.spawn(&placements);
        for (kind, pos) in level::powerup_layout(level) {
            let id = self.next_entity_id();
            self.powerups.push(Powerup::new(id, kind, pos));
        }

        self.phase = GamePhase::Playing;
        log::info!("level {level} started with {spawned} enemies");
        self.emit(GameEvent::LevelStarted { level });
    }

    /// Leave game over or victory for the select screen; score is cleared
    pub fn return_to_select(&mut self) {
        self.score.reset();
        self.enemies.clear();
        self.projectiles.clear();
        self.enemy_projectiles.clear();
        self.powerups.clear();
        self.death_timer = None;
        self.phase = GamePhase::CharacterSelect;
    }

    /// Create and settle enemies for `placements`; returns how many
    pub fn spawn(&mut self, placements: &[Placement]) -> usize {
        for placement in placements {
            let id = self.next_entity_id();
            let mut enemy = Enemy::spawn(id, placement.kind, placement.pos, &mut self.rng);
            enemy.settle(&self.grid);
            self.enemies.push(enemy);
        }
        placements.len()
    }

    /// Spawn the next level-2 wave across the wave segments
    pub fn spawn_wave(&mut self, kind: EnemyKind, count: usize) {
        let mut occupied: Vec<Vec2> = self
            .enemies
            .iter()
            .filter(|e| e.is_live())
            .map(|e| e.mob.body.pos)
            .collect();
        let placements = level::wave_placements(kind, count, &mut occupied, &mut self.rng);
        let spawned = self.spawn(&placements);
        let wave = self.session.wave;
        log::info!("wave {wave}: {spawned} x {}", kind.name());
        self.emit(GameEvent::WaveSpawned {
            wave,
            kind,
            count: spawned,
        });
    }

    /// Enemies still on the field (not captured or defeated)
    pub fn live_enemies(&self) -> usize {
        self.enemies.iter().filter(|e| e.is_live()).count()
    }

    /// Ensure entity lists are sorted by ID for deterministic iteration
    pub fn normalize_order(&mut self) {
        self.enemies.sort_by_key(|e| e.id);
        self.projectiles.sort_by_key(|p| p.id);
        self.enemy_projectiles.sort_by_key(|p| p.id);
        self.powerups.sort_by_key(|p| p.id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::*;

    #[test]
    fn test_new_state_waits_for_selection() {
        let state = GameState::new(1, Tuning::default());
        assert_eq!(state.phase, GamePhase::CharacterSelect);
        assert!(state.enemies.is_empty());
        assert_eq!(state.score.score(), 0);
    }

    #[test]
    fn test_start_game_builds_level_one() {
        let mut state = GameState::new(5, Tuning::default());
        state.select_character(Character::Green);
        state.start_game();
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.player.character, Character::Green);
        assert_eq!(state.player.speed.value(), 12.0);
        assert_eq!(state.enemies.len(), 12);
        assert_eq!(state.powerups.len(), 2);
        assert_eq!(state.player.captured.capacity(), 3);
        assert!(state.enemies.iter().all(|e| e.mob.body.on_ground));

        let events = state.take_events();
        assert_eq!(
            events,
            vec![
                GameEvent::CharacterSelected {
                    character: Character::Green
                },
                GameEvent::LevelStarted { level: 1 },
            ]
        );
        assert_eq!(state.score.score(), 500);
        assert!(state.take_events().is_empty());
    }

    #[test]
    fn test_ids_are_unique_and_sorted() {
        let mut state = GameState::new(5, Tuning::default());
        state.start_game();
        state.start_level(2);
        assert_eq!(state.enemies.len(), 3);
        assert_eq!(state.player.captured.capacity(), 5);
        let ids: Vec<u32> = state.enemies.iter().map(|e| e.id).collect();
        let mut sorted = ids.clone();
        sorted.sort_unstable();
        sorted.dedup();
        assert_eq!(ids, sorted);
        assert!(state.powerups.iter().all(|p| !ids.contains(&p.id)));
    }

    #[test]
    fn test_spawn_wave_adds_enemies() {
        let mut state = GameState::new(9, Tuning::default());
        state.start_game();
        state.start_level(2);
        state.take_events();
        state.spawn_wave(EnemyKind::Chelnov, 4);
        assert_eq!(state.live_enemies(), 7);
        assert!(matches!(
            state.take_events().as_slice(),
            [GameEvent::WaveSpawned {
                kind: EnemyKind::Chelnov,
                count: 4,
                ..
            }]
        ));
    }

    #[test]
    fn test_same_seed_same_level() {
        let mut a = GameState::new(77, Tuning::default());
        let mut b = GameState::new(77, Tuning::default());
        a.start_game();
        b.start_game();
        a.start_level(2);
        b.start_level(2);
        assert_eq!(a.grid, b.grid);
        let pa: Vec<Vec2> = a.enemies.iter().map(|e| e.mob.body.pos).collect();
        let pb: Vec<Vec2> = b.enemies.iter().map(|e| e.mob.body.pos).collect();
        assert_eq!(pa, pb);
        assert_eq!(a.player.body.pos, Vec2::new(PLAYER_SPAWN_X, PLAYER_SPAWN_Y));
    }
}
