//! Audio collaborator
//!
//! The simulation only records `GameEvent`s. `AudioManager` turns them into
//! calls on an `AudioService` backend, keyed by small integer ids.

use serde::{Deserialize, Serialize};

use crate::settings::Settings;
use crate::sim::state::GameEvent;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SoundEffect {
    /// Coin or key picked up
    Coin,
    /// Player hit, or sword swing
    Damage,
    /// Last level finished
    Win,
    /// Sword powerup collected
    Sword,
    /// Enemy stomped
    Bounce,
    GameOver,
}

impl SoundEffect {
    /// Backend id; ids below 3 are the level music tracks
    pub fn id(self) -> u32 {
        match self {
            SoundEffect::Coin => 3,
            SoundEffect::Damage => 4,
            SoundEffect::Win => 5,
            SoundEffect::Sword => 6,
            SoundEffect::Bounce => 7,
            SoundEffect::GameOver => 8,
        }
    }

    pub fn asset_name(self) -> &'static str {
        match self {
            SoundEffect::Coin => "sfx_pickup_coin.wav",
            SoundEffect::Damage => "sfx_player_damage.wav",
            SoundEffect::Win => "sfx_game_victory.wav",
            SoundEffect::Sword => "sfx_player_powerup.wav",
            SoundEffect::Bounce => "sfx_player_bounce.wav",
            SoundEffect::GameOver => "sfx_game_over.wav",
        }
    }
}

/// Music file for background track `track`
pub fn track_asset_name(track: u32) -> Option<&'static str> {
    match track {
        0 => Some("music_level1_theme.wav"),
        1 => Some("music_level2_theme.wav"),
        2 => Some("music_level3_theme.wav"),
        _ => None,
    }
}

/// Fire-and-forget playback backend
pub trait AudioService {
    fn play_effect(&mut self, id: u32, volume: f32);
    /// Stop the current loop and start looping `track`
    fn switch_loop(&mut self, track: u32, volume: f32);
    fn pause_loop(&mut self);
    fn resume_loop(&mut self);
}

/// Backend that only logs, for headless runs
#[derive(Debug, Default)]
pub struct LoggingAudio;

impl AudioService for LoggingAudio {
    fn play_effect(&mut self, id: u32, volume: f32) {
        log::debug!("play effect {id} at {volume:.2}");
    }

    fn switch_loop(&mut self, track: u32, volume: f32) {
        log::debug!(
            "loop track {track} ({}) at {volume:.2}",
            track_asset_name(track).unwrap_or("?")
        );
    }

    fn pause_loop(&mut self) {
        log::debug!("pause loop");
    }

    fn resume_loop(&mut self) {
        log::debug!("resume loop");
    }
}

/// Audio manager for the game
///
/// Volumes come from the player's `Settings`.
pub struct AudioManager<S> {
    service: S,
    settings: Settings,
}

impl<S: AudioService> AudioManager<S> {
    pub fn new(service: S) -> Self {
        Self::from_settings(service, &Settings::default())
    }

    pub fn from_settings(service: S, settings: &Settings) -> Self {
        Self {
            service,
            settings: settings.clone(),
        }
    }

    /// Mute/unmute all audio
    pub fn set_muted(&mut self, muted: bool) {
        self.settings.muted = muted;
    }

    /// Play a sound effect
    pub fn play(&mut self, effect: SoundEffect) {
        let vol = self.settings.effective_sfx_volume();
        if vol <= 0.0 {
            return;
        }
        self.service.play_effect(effect.id(), vol);
    }

    /// React to one simulation event; non-audio events are ignored
    pub fn handle(&mut self, event: &GameEvent) {
        match *event {
            GameEvent::Sound(effect) => self.play(effect),
            // Music keeps its position even while muted
            GameEvent::SwitchMusic { track } => {
                let vol = self.settings.effective_music_volume();
                self.service.switch_loop(track, vol);
            }
            GameEvent::PauseMusic => self.service.pause_loop(),
            GameEvent::ResumeMusic => self.service.resume_loop(),
            GameEvent::EnemyDefeated { .. }
            | GameEvent::LevelCompleted { .. }
            | GameEvent::GameOver { .. } => {}
        }
    }

    pub fn dispatch<'a>(&mut self, events: impl IntoIterator<Item = &'a GameEvent>) {
        for event in events {
            self.handle(event);
        }
    }

    pub fn service(&self) -> &S {
        &self.service
    }
}
