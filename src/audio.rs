//! Sound cues for simulation events
//!
//! The simulation never talks to an audio device. Events drained from the
//! game state are mapped to cues here and forwarded to an `AudioSink`, which
//! is fire-and-forget: nothing is ever read back.

use crate::settings::Settings;
use crate::sim::{GameEvent, GamePhase};

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SoundEffect {
    /// Character highlighted on the select screen
    Select,
    /// Enemy sucked into the vacuum
    Capture,
    /// Single projectile thrown
    Shot,
    /// Whole capture stack released
    Burst,
    /// Enemy projectile or orb launched
    EnemyShot,
    /// Enemy knocked out by a projectile
    Defeat,
    /// Defeat by a projectile still in the air
    AerialHit,
    /// Several defeats in one tick
    MultiKill,
    /// Player lost health
    Hurt,
    /// Player lost a life to a ghost or ran out of health
    Death,
    /// Power-up collected
    Pickup,
    /// New wave entered the field
    WaveStart,
    /// Level cleared
    LevelClear,
    GameOver,
    Victory,
}

/// Looping music tracks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MusicTrack {
    Menu,
    LevelOne,
    LevelTwo,
}

impl MusicTrack {
    pub fn for_level(level: u32) -> Self {
        if level <= 1 { MusicTrack::LevelOne } else { MusicTrack::LevelTwo }
    }

    /// Mix level before the music volume setting is applied
    fn base_gain(self) -> f32 {
        match self {
            MusicTrack::Menu => 0.5,
            MusicTrack::LevelOne | MusicTrack::LevelTwo => 0.4,
        }
    }
}

/// Playback backend
pub trait AudioSink {
    fn play(&mut self, effect: SoundEffect, volume: f32);
    fn play_loop(&mut self, track: MusicTrack, volume: f32);
    fn stop(&mut self, track: MusicTrack);
    fn set_volume(&mut self, track: MusicTrack, volume: f32);
}

/// Sink that only logs; used when running headless
#[derive(Debug, Default)]
pub struct LogSink;

impl AudioSink for LogSink {
    fn play(&mut self, effect: SoundEffect, volume: f32) {
        log::trace!("sfx {effect:?} at {volume:.2}");
    }

    fn play_loop(&mut self, track: MusicTrack, volume: f32) {
        log::debug!("music {track:?} looping at {volume:.2}");
    }

    fn stop(&mut self, track: MusicTrack) {
        log::debug!("music {track:?} stopped");
    }

    fn set_volume(&mut self, track: MusicTrack, volume: f32) {
        log::trace!("music {track:?} volume {volume:.2}");
    }
}

/// Cue for an event, if it has one
pub fn cue_for(event: &GameEvent) -> Option<SoundEffect> {
    let effect = match event {
        GameEvent::CharacterSelected { .. } => SoundEffect::Select,
        GameEvent::EnemyCaptured { .. } => SoundEffect::Capture,
        GameEvent::ShotFired { .. } => SoundEffect::Shot,
        GameEvent::BurstReleased { .. } => SoundEffect::Burst,
        GameEvent::EnemyFired { .. } => SoundEffect::EnemyShot,
        GameEvent::EnemyDefeated { .. } => SoundEffect::Defeat,
        GameEvent::AerialHit { .. } => SoundEffect::AerialHit,
        GameEvent::MultiKill { .. } => SoundEffect::MultiKill,
        // The killing blow is voiced by PlayerDied instead
        GameEvent::PlayerDamaged { health: 0, .. } => return None,
        GameEvent::PlayerDamaged { .. } => SoundEffect::Hurt,
        GameEvent::PlayerDied => SoundEffect::Death,
        GameEvent::PowerupCollected { .. } => SoundEffect::Pickup,
        GameEvent::WaveSpawned { .. } => SoundEffect::WaveStart,
        GameEvent::LevelCleared { .. } => SoundEffect::LevelClear,
        GameEvent::GameOver { .. } => SoundEffect::GameOver,
        GameEvent::Victory { .. } => SoundEffect::Victory,
        GameEvent::LevelStarted { .. } => return None,
    };
    Some(effect)
}

/// Audio manager for the game
pub struct AudioManager<S: AudioSink> {
    sink: S,
    master_volume: f32,
    sfx_volume: f32,
    music_volume: f32,
    muted: bool,
    current: Option<MusicTrack>,
}

impl<S: AudioSink> AudioManager<S> {
    pub fn new(sink: S, settings: &Settings) -> Self {
        Self {
            sink,
            master_volume: settings.master_volume.clamp(0.0, 1.0),
            sfx_volume: settings.sfx_volume.clamp(0.0, 1.0),
            music_volume: settings.music_volume.clamp(0.0, 1.0),
            muted: false,
            current: None,
        }
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn current_track(&self) -> Option<MusicTrack> {
        self.current
    }

    /// Set master volume (0.0 - 1.0)
    pub fn set_master_volume(&mut self, vol: f32) {
        self.master_volume = vol.clamp(0.0, 1.0);
        self.refresh_music_volume();
    }

    /// Set SFX volume (0.0 - 1.0)
    pub fn set_sfx_volume(&mut self, vol: f32) {
        self.sfx_volume = vol.clamp(0.0, 1.0);
    }

    /// Set music volume (0.0 - 1.0)
    pub fn set_music_volume(&mut self, vol: f32) {
        self.music_volume = vol.clamp(0.0, 1.0);
        self.refresh_music_volume();
    }

    /// Mute/unmute all audio
    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
        self.refresh_music_volume();
    }

    fn effective_volume(&self) -> f32 {
        if self.muted { 0.0 } else { self.master_volume * self.sfx_volume }
    }

    fn music_gain(&self, track: MusicTrack) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume * self.music_volume * track.base_gain()
        }
    }

    fn refresh_music_volume(&mut self) {
        if let Some(track) = self.current {
            let gain = self.music_gain(track);
            self.sink.set_volume(track, gain);
        }
    }

    /// Play a sound effect
    pub fn play(&mut self, effect: SoundEffect) {
        let vol = self.effective_volume();
        if vol <= 0.0 {
            return;
        }
        self.sink.play(effect, vol);
    }

    /// Switch the looping track; a no-op if it is already playing
    pub fn play_music(&mut self, track: MusicTrack) {
        if self.current == Some(track) {
            return;
        }
        self.stop_music();
        let gain = self.music_gain(track);
        self.sink.play_loop(track, gain);
        self.current = Some(track);
    }

    pub fn stop_music(&mut self) {
        if let Some(track) = self.current.take() {
            self.sink.stop(track);
        }
    }

    /// Voice every event from one tick and follow level music changes
    pub fn handle_events(&mut self, events: &[GameEvent]) {
        for event in events {
            match event {
                GameEvent::LevelStarted { level } => self.play_music(MusicTrack::for_level(*level)),
                GameEvent::GameOver { .. } | GameEvent::Victory { .. } => self.stop_music(),
                _ => {}
            }
            if let Some(effect) = cue_for(event) {
                self.play(effect);
            }
        }
    }

    /// Menu music runs whenever the select screen is showing
    pub fn sync_phase(&mut self, phase: GamePhase) {
        if phase == GamePhase::CharacterSelect {
            self.play_music(MusicTrack::Menu);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{Character, DamageSource, EnemyKind};

    #[derive(Debug, Default)]
    struct RecordingSink {
        played: Vec<(SoundEffect, f32)>,
        looping: Vec<MusicTrack>,
        stopped: Vec<MusicTrack>,
        volumes: Vec<(MusicTrack, f32)>,
    }

    impl AudioSink for RecordingSink {
        fn play(&mut self, effect: SoundEffect, volume: f32) {
            self.played.push((effect, volume));
        }

        fn play_loop(&mut self, track: MusicTrack, _volume: f32) {
            self.looping.push(track);
        }

        fn stop(&mut self, track: MusicTrack) {
            self.stopped.push(track);
        }

        fn set_volume(&mut self, track: MusicTrack, volume: f32) {
            self.volumes.push((track, volume));
        }
    }

    fn manager() -> AudioManager<RecordingSink> {
        AudioManager::new(RecordingSink::default(), &Settings::default())
    }

    #[test]
    fn test_event_cues() {
        assert_eq!(
            cue_for(&GameEvent::EnemyCaptured {
                id: 1,
                kind: EnemyKind::Skeleton
            }),
            Some(SoundEffect::Capture)
        );
        assert_eq!(cue_for(&GameEvent::MultiKill { count: 3 }), Some(SoundEffect::MultiKill));
        assert_eq!(cue_for(&GameEvent::LevelStarted { level: 1 }), None);
        assert_eq!(
            cue_for(&GameEvent::PlayerDamaged {
                source: DamageSource::OwnProjectile,
                health: 2
            }),
            Some(SoundEffect::Hurt)
        );
        assert_eq!(
            cue_for(&GameEvent::PlayerDamaged {
                source: DamageSource::EnemyShot(EnemyKind::Chelnov),
                health: 0
            }),
            None
        );
        assert_eq!(
            cue_for(&GameEvent::CharacterSelected {
                character: Character::Green
            }),
            Some(SoundEffect::Select)
        );
    }

    #[test]
    fn test_sfx_volume_and_mute() {
        let mut audio = manager();
        audio.play(SoundEffect::Pickup);
        let (_, vol) = audio.sink().played[0];
        assert!((vol - 0.8).abs() < 1e-6);

        audio.set_muted(true);
        audio.play(SoundEffect::Pickup);
        assert_eq!(audio.sink().played.len(), 1);
    }

    #[test]
    fn test_music_follows_levels() {
        let mut audio = manager();
        audio.sync_phase(GamePhase::CharacterSelect);
        audio.sync_phase(GamePhase::CharacterSelect);
        assert_eq!(audio.sink().looping, vec![MusicTrack::Menu]);

        audio.handle_events(&[GameEvent::LevelStarted { level: 1 }]);
        audio.handle_events(&[GameEvent::LevelStarted { level: 1 }]);
        audio.handle_events(&[GameEvent::LevelCleared { level: 1 }, GameEvent::LevelStarted { level: 2 }]);
        assert_eq!(
            audio.sink().looping,
            vec![MusicTrack::Menu, MusicTrack::LevelOne, MusicTrack::LevelTwo]
        );
        assert_eq!(audio.sink().stopped, vec![MusicTrack::Menu, MusicTrack::LevelOne]);

        audio.handle_events(&[GameEvent::Victory { score: 10 }]);
        assert_eq!(audio.current_track(), None);
        assert_eq!(audio.sink().played.last().map(|p| p.0), Some(SoundEffect::Victory));
    }

    #[test]
    fn test_volume_change_reaches_current_track() {
        let mut audio = manager();
        audio.set_music_volume(0.5);
        assert!(audio.sink().volumes.is_empty());
        audio.play_music(MusicTrack::LevelOne);
        audio.set_master_volume(1.0);
        let (track, gain) = audio.sink().volumes[0];
        assert_eq!(track, MusicTrack::LevelOne);
        assert!((gain - 0.2).abs() < 1e-6);
    }
}
