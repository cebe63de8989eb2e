//! Audio cue interface
//!
//! The simulation only announces cues; playback belongs to a platform
//! backend. [`AudioManager`] applies volume and mute settings and queues
//! the resulting commands for that backend to drain.

use std::collections::VecDeque;

use crate::settings::Settings;

/// Sound cue types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundCue {
    /// A level was (re)started
    GameStart,
    /// The last ball was lost
    GameOver,
    /// Background music, looped while a level runs
    Music,
}

impl SoundCue {
    /// Base volume of the cue before user settings
    pub fn base_volume(&self) -> f32 {
        match self {
            SoundCue::GameStart => 0.4,
            SoundCue::GameOver => 0.4,
            SoundCue::Music => 0.1,
        }
    }

    pub fn looping(&self) -> bool {
        matches!(self, SoundCue::Music)
    }

    pub fn is_music(&self) -> bool {
        matches!(self, SoundCue::Music)
    }
}

/// Receiver of fire-and-forget sound cues
pub trait AudioSink {
    /// Start playing a cue
    fn play(&mut self, cue: SoundCue);
    /// Stop a cue (only meaningful for looping cues)
    fn stop(&mut self, cue: SoundCue);
}

/// Command for the platform audio backend
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AudioCommand {
    Play {
        cue: SoundCue,
        volume: f32,
        looping: bool,
    },
    Stop {
        cue: SoundCue,
    },
}

/// Audio manager for the game
#[derive(Debug, Clone)]
pub struct AudioManager {
    master_volume: f32,
    sfx_volume: f32,
    music_volume: f32,
    muted: bool,
    pending: VecDeque<AudioCommand>,
}

impl Default for AudioManager {
    fn default() -> Self {
        Self::new()
    }
}

impl AudioManager {
    pub fn new() -> Self {
        Self {
            master_volume: 1.0,
            sfx_volume: 1.0,
            music_volume: 1.0,
            muted: false,
            pending: VecDeque::new(),
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        let mut audio = Self::new();
        audio.set_master_volume(settings.master_volume);
        audio.set_sfx_volume(settings.sfx_volume);
        audio.set_music_volume(settings.music_volume);
        audio.set_muted(settings.muted);
        audio
    }

    /// Set master volume (0.0 - 1.0)
    pub fn set_master_volume(&mut self, vol: f32) {
        self.master_volume = vol.clamp(0.0, 1.0);
    }

    /// Set SFX volume (0.0 - 1.0)
    pub fn set_sfx_volume(&mut self, vol: f32) {
        self.sfx_volume = vol.clamp(0.0, 1.0);
    }

    /// Set music volume (0.0 - 1.0)
    pub fn set_music_volume(&mut self, vol: f32) {
        self.music_volume = vol.clamp(0.0, 1.0);
    }

    /// Mute/unmute all audio
    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    /// Get effective volume for a cue
    fn effective_volume(&self, cue: SoundCue) -> f32 {
        if self.muted {
            return 0.0;
        }
        let channel = if cue.is_music() {
            self.music_volume
        } else {
            self.sfx_volume
        };
        cue.base_volume() * self.master_volume * channel
    }

    /// Hand queued commands to the backend
    pub fn drain(&mut self) -> impl Iterator<Item = AudioCommand> + '_ {
        self.pending.drain(..)
    }
}

impl AudioSink for AudioManager {
    fn play(&mut self, cue: SoundCue) {
        let volume = self.effective_volume(cue);
        if volume <= 0.0 {
            log::trace!("Skipping silent cue {:?}", cue);
            return;
        }
        log::debug!("Play {:?} at volume {:.2}", cue, volume);
        self.pending.push_back(AudioCommand::Play {
            cue,
            volume,
            looping: cue.looping(),
        });
    }

    fn stop(&mut self, cue: SoundCue) {
        self.pending.push_back(AudioCommand::Stop { cue });
    }
}
