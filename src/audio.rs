//! Audio trigger dispatch
//!
//! The core never plays audio itself. It emits [`GameEvent::Sound`] and
//! [`GameEvent::Music`] triggers; [`AudioManager`] applies the user's volume
//! and music settings and forwards them to whatever [`AudioSink`] the host
//! provides.

use serde::{Deserialize, Serialize};

use crate::settings::Settings;
use crate::sim::GameEvent;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SoundEffect {
    /// Player volley
    Shoot,
    /// Enemy, asteroid or ramming destruction
    Explosion,
    /// Player bullet lands on the boss
    BossHit,
}

/// Background music selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MusicCue {
    /// Menus and the game-over screen
    Menu,
    /// Active gameplay
    Game,
}

/// Host-side playback backend
pub trait AudioSink {
    fn play_sound(&mut self, effect: SoundEffect, volume: f32);
    fn play_music(&mut self, cue: MusicCue, volume: f32);
    fn stop_music(&mut self);
}

/// Sink that only logs; used by the headless driver
#[derive(Debug, Default)]
pub struct LogSink;

impl AudioSink for LogSink {
    fn play_sound(&mut self, effect: SoundEffect, volume: f32) {
        log::trace!("sfx {effect:?} @ {volume:.2}");
    }

    fn play_music(&mut self, cue: MusicCue, volume: f32) {
        log::debug!("music {cue:?} @ {volume:.2}");
    }

    fn stop_music(&mut self) {
        log::debug!("music stopped");
    }
}

/// Settings-aware dispatcher in front of an [`AudioSink`]
pub struct AudioManager {
    sink: Box<dyn AudioSink>,
    sfx_volume: f32,
    music_volume: f32,
    music_on: bool,
    muted: bool,
    /// Cue the game last asked for, kept while music is toggled off
    current_music: Option<MusicCue>,
}

impl AudioManager {
    pub fn new(sink: Box<dyn AudioSink>, settings: &Settings) -> Self {
        let mut manager = Self {
            sink,
            sfx_volume: 1.0,
            music_volume: 1.0,
            music_on: true,
            muted: false,
            current_music: None,
        };
        manager.apply_settings(settings);
        manager
    }

    /// Pick up volume and music changes
    pub fn apply_settings(&mut self, settings: &Settings) {
        self.set_sfx_volume(settings.sfx_volume);
        self.music_volume = settings.music_volume.clamp(0.0, 1.0);
        self.set_music_on(settings.music_on);
    }

    /// Set SFX volume (0.0 - 1.0)
    pub fn set_sfx_volume(&mut self, vol: f32) {
        self.sfx_volume = vol.clamp(0.0, 1.0);
    }

    /// Mute/unmute sound effects and music
    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
        self.refresh_music();
    }

    pub fn set_music_on(&mut self, on: bool) {
        if self.music_on != on {
            self.music_on = on;
            self.refresh_music();
        }
    }

    pub fn current_music(&self) -> Option<MusicCue> {
        self.current_music
    }

    fn effective_volume(&self) -> f32 {
        if self.muted { 0.0 } else { self.sfx_volume }
    }

    fn music_audible(&self) -> bool {
        self.music_on && !self.muted
    }

    fn refresh_music(&mut self) {
        match self.current_music {
            Some(cue) if self.music_audible() => self.sink.play_music(cue, self.music_volume),
            _ => self.sink.stop_music(),
        }
    }

    /// Play a sound effect
    pub fn play(&mut self, effect: SoundEffect) {
        let vol = self.effective_volume();
        if vol <= 0.0 {
            return;
        }
        self.sink.play_sound(effect, vol);
    }

    /// Switch background music; repeated cues are ignored
    pub fn play_music(&mut self, cue: MusicCue) {
        if self.current_music == Some(cue) {
            return;
        }
        self.current_music = Some(cue);
        if self.music_audible() {
            self.sink.play_music(cue, self.music_volume);
        }
    }

    /// Forward every audio trigger in `events`, ignoring the rest
    pub fn dispatch(&mut self, events: &[GameEvent]) {
        for event in events {
            match event {
                GameEvent::Sound(effect) => self.play(*effect),
                GameEvent::Music(cue) => self.play_music(*cue),
                GameEvent::MusicEnabled(on) => self.set_music_on(*on),
                _ => {}
            }
        }
    }
}
