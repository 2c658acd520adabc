//! VacPop entry point
//!
//! Runs a headless demo session: a seeded game driven by a scripted input
//! pattern through the fixed-step accumulator, with draw calls composed
//! against metadata-only sheets and audio cues sent to the log. The script
//! presses Quit once the requested time is up, which ends the run.
//!
//! Usage: `vacpop [settings.json] [seconds]`

use std::error::Error;
use std::time::{SystemTime, UNIX_EPOCH};

use vacpop::Settings;
use vacpop::audio::{AudioManager, LogSink};
use vacpop::consts::*;
use vacpop::input::{EdgeDetector, Key, KeyState};
use vacpop::render::{self, SheetHandle, SheetKey, SpriteAtlas, SpriteSheet};
use vacpop::sim::{AimDirection, Character, EnemyKind, GameEvent, GamePhase, GameState, PowerupKind, tick};

const DEFAULT_SETTINGS: &str = "vacpop.json";
const DEFAULT_SECONDS: f32 = 120.0;
/// Host frame pattern: mostly 60 Hz with the odd slow frame and one stall
const FRAME_PATTERN: [f32; 8] = [
    1.0 / 60.0,
    1.0 / 60.0,
    1.0 / 30.0,
    1.0 / 60.0,
    1.0 / 144.0,
    1.0 / 60.0,
    1.0 / 60.0,
    1.0 / 20.0,
];
const STALL_EVERY: u64 = 900;
const STALL_DT: f32 = 0.35;

/// Tallies reported at the end of the run
#[derive(Debug, Default)]
struct Summary {
    frames: u64,
    ticks: u64,
    clamped_frames: u64,
    captures: u32,
    shots: u32,
    defeats: u32,
    hits_taken: u32,
    pickups: u32,
    waves: u32,
    levels_cleared: u32,
    draw_calls: u64,
}

impl Summary {
    fn record(&mut self, event: &GameEvent) {
        match event {
            GameEvent::EnemyCaptured { .. } => self.captures += 1,
            GameEvent::ShotFired { .. } => self.shots += 1,
            GameEvent::EnemyDefeated { .. } => self.defeats += 1,
            GameEvent::PlayerDamaged { .. } => self.hits_taken += 1,
            GameEvent::PowerupCollected { .. } => self.pickups += 1,
            GameEvent::WaveSpawned { .. } => self.waves += 1,
            GameEvent::LevelCleared { .. } => self.levels_cleared += 1,
            _ => {}
        }
    }
}

/// Demo session holding all state
struct Demo {
    state: GameState,
    audio: AudioManager<LogSink>,
    atlas: SpriteAtlas,
    edges: EdgeDetector,
    character: Character,
    accumulator: f32,
    clock: f32,
    /// Simulated time at which the script presses Quit
    quit_at: f32,
    quit: bool,
    summary: Summary,
}

impl Demo {
    fn new(settings: &Settings, seed: u64, seconds: f32) -> Self {
        let mut state = GameState::new(seed, settings.tuning.clone());
        state.select_character(settings.character);
        Self {
            state,
            audio: AudioManager::new(LogSink, settings),
            atlas: demo_atlas(),
            edges: EdgeDetector::default(),
            character: settings.character,
            accumulator: 0.0,
            clock: 0.0,
            quit_at: seconds,
            quit: false,
            summary: Summary::default(),
        }
    }

    /// Run simulation ticks for one host frame
    fn update(&mut self, dt: f32) {
        if dt > MAX_FRAME_DT {
            self.summary.clamped_frames += 1;
        }
        let dt = dt.min(MAX_FRAME_DT);
        self.accumulator += dt;

        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            let mut keys = scripted_keys(self.state.phase, self.character, self.clock);
            if self.clock >= self.quit_at {
                keys.press(Key::Quit);
            }
            let input = self.edges.sample(keys);
            if input.pressed(Key::Quit) {
                log::info!("quit after {:.1}s", self.clock);
                self.quit = true;
                break;
            }
            tick(&mut self.state, &input, SIM_DT);
            self.accumulator -= SIM_DT;
            self.clock += SIM_DT;
            substeps += 1;
            self.summary.ticks += 1;

            let events = self.state.take_events();
            for event in &events {
                self.summary.record(event);
                match event {
                    GameEvent::LevelStarted { level } => log::info!("level {level} begins"),
                    GameEvent::GameOver { score } => log::info!("game over with {score} points"),
                    GameEvent::Victory { score } => log::info!("victory with {score} points"),
                    _ => {}
                }
            }
            self.audio.handle_events(&events);
            self.audio.sync_phase(self.state.phase);
        }

        self.summary.frames += 1;
        self.summary.draw_calls += render::compose(&self.state, &self.atlas).len() as u64;
    }
}

/// Keys held at `clock` seconds for the current phase
fn scripted_keys(phase: GamePhase, character: Character, clock: f32) -> KeyState {
    let mut keys = KeyState::default();
    match phase {
        GamePhase::CharacterSelect => {
            keys.press(match character {
                Character::Yellow => Key::SelectYellow,
                Character::Green => Key::SelectGreen,
            });
            // Pulse confirm so the edge fires once per second
            if clock.fract() > 0.5 {
                keys.press(Key::Confirm);
            }
        }
        GamePhase::Playing => {
            let t = clock % 6.0;
            match t {
                t if t < 1.0 => keys.press(Key::MoveRight),
                t if t < 2.2 => {
                    keys.press(Key::Vacuum);
                    keys.press(Key::AimRight);
                }
                t if t < 2.3 => keys.press(Key::Shoot),
                t if t < 3.2 => keys.press(Key::MoveLeft),
                t if t < 3.3 => keys.press(Key::Jump),
                t if t < 4.4 => {
                    keys.press(Key::Vacuum);
                    keys.press(Key::AimLeft);
                }
                t if t < 4.5 => keys.press(Key::Burst),
                t if t < 5.0 => keys.press(Key::Crouch),
                t if t < 5.8 => {
                    keys.press(Key::Vacuum);
                    keys.press(Key::AimUp);
                }
                _ => {
                    keys.press(Key::AimUp);
                    keys.press(Key::Shoot);
                }
            }
        }
        GamePhase::GameOver | GamePhase::Victory => {
            if clock.fract() > 0.5 {
                keys.press(Key::Restart);
            }
        }
    }
    keys
}

/// Sheets sized like the shipped art so frame lookup runs as it would in game
fn demo_atlas() -> SpriteAtlas {
    let mut atlas = SpriteAtlas::new();
    let h = SheetHandle(0);
    for level in 1..=2 {
        atlas.insert(SheetKey::Background { level }, SpriteSheet::single(h, 1136, 896));
    }
    atlas.insert(SheetKey::Platform, SpriteSheet::single(h, 64, 64));
    atlas.insert(SheetKey::Ramp, SpriteSheet::single(h, 64, 64));
    for character in [Character::Yellow, Character::Green] {
        atlas.insert(
            SheetKey::Player { character, strip: 0 },
            SpriteSheet::strip(h, PLAYER_FRAME_WIDTH as u32 * 34, PLAYER_FRAME_HEIGHT as u32, 34, 96),
        );
        atlas.insert(
            SheetKey::Player { character, strip: 1 },
            SpriteSheet::strip(h, PLAYER_FRAME_WIDTH as u32 * 20, PLAYER_FRAME_HEIGHT as u32, 20, 96),
        );
    }
    let frame = ENEMY_FRAME_WIDTH as u32;
    for kind in EnemyKind::ALL {
        atlas.insert(SheetKey::Enemy(kind), SpriteSheet::new(h, frame * 28, frame * 3, frame, frame));
    }
    atlas.insert(SheetKey::InvisibleDim, SpriteSheet::new(h, frame * 15, frame, frame, frame));
    for kind in [PowerupKind::Speed, PowerupKind::Range, PowerupKind::Power, PowerupKind::Life] {
        atlas.insert(SheetKey::Powerup(kind), SpriteSheet::single(h, 32, 32));
    }
    for direction in [AimDirection::Right, AimDirection::Left, AimDirection::Up, AimDirection::Down] {
        let (w, fh) = if direction.is_vertical() { (64, 128) } else { (128, 64) };
        atlas.insert(SheetKey::Beam(direction), SpriteSheet::new(h, w * 8, fh, w, fh));
    }
    atlas.insert(SheetKey::EnemyShot, SpriteSheet::single(h, 16, 16));
    atlas
}

/// Host frame time for frame number `frame`
fn host_frame_dt(frame: u64) -> f32 {
    if frame % STALL_EVERY == 0 {
        STALL_DT
    } else {
        FRAME_PATTERN[(frame % FRAME_PATTERN.len() as u64) as usize]
    }
}

fn time_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();
    log::info!("VacPop (headless) starting...");

    let mut args = std::env::args().skip(1);
    // An explicit settings path must load; the default one may be absent
    let settings = match args.next() {
        Some(path) => Settings::load_from(path)?,
        None => Settings::load_or_default(DEFAULT_SETTINGS),
    };
    let seconds = args.next().map(|s| s.parse::<f32>()).transpose()?.unwrap_or(DEFAULT_SECONDS);
    if !(seconds.is_finite() && seconds > 0.0) {
        return Err(format!("run length must be a positive number of seconds, got {seconds}").into());
    }
    let seed = settings.seed.unwrap_or_else(time_seed);
    log::info!("seed {seed}, {seconds}s of simulated play");

    let mut demo = Demo::new(&settings, seed, seconds);
    let mut frame: u64 = 0;
    while !demo.quit {
        frame += 1;
        demo.update(host_frame_dt(frame));
    }

    let state = &demo.state;
    let summary = &demo.summary;
    log::info!(
        "finished in phase {:?} on level {} with score {} (health {})",
        state.phase,
        state.session.level,
        state.score.score(),
        state.player.health
    );
    log::info!(
        "{} frames ({} clamped), {} ticks, {:.1} draw calls per frame",
        summary.frames,
        summary.clamped_frames,
        summary.ticks,
        summary.draw_calls as f64 / summary.frames.max(1) as f64
    );
    log::info!(
        "{} captures, {} shots, {} defeats, {} hits taken, {} power-ups, {} waves, {} levels cleared",
        summary.captures,
        summary.shots,
        summary.defeats,
        summary.hits_taken,
        summary.pickups,
        summary.waves,
        summary.levels_cleared
    );
    Ok(())
}
