/// Mute-aware sound effects and music.

use log::info;

use crate::platform::Audio;

#[cfg(feature = "sound")]
pub mod rodio_backend;

/// Backend that accepts every call and plays nothing.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullAudio;

impl Audio for NullAudio {
    fn play_sound(&mut self, _name: &str) {}
    fn set_music_volume(&mut self, _volume: f32) {}
    fn loop_music(&mut self, _track: &str) {}
    fn stop_music(&mut self) {}
}

/// Wraps a backend with a global mute and music bookkeeping.
/// While muted, sound effects are dropped and music plays at volume 0.
#[derive(Debug)]
pub struct SoundManager<A: Audio> {
    backend: A,
    muted: bool,
    music_playing: bool,
    volume: f32,
    track: String,
}

impl<A: Audio> SoundManager<A> {
    pub fn new(backend: A, track: impl Into<String>, volume: f32) -> Self {
        SoundManager {
            backend,
            muted: false,
            music_playing: false,
            volume: volume.clamp(0.0, 1.0),
            track: track.into(),
        }
    }

    pub fn backend(&self) -> &A {
        &self.backend
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }

    pub fn is_music_playing(&self) -> bool {
        self.music_playing
    }

    fn effective_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.volume
        }
    }

    pub fn toggle_mute(&mut self) {
        self.muted = !self.muted;
        info!("audio {}", if self.muted { "muted" } else { "unmuted" });
        let volume = self.effective_volume();
        self.backend.set_music_volume(volume);
    }

    pub fn play(&mut self, name: &str) {
        if !self.muted {
            self.backend.play_sound(name);
        }
    }

    pub fn start_music(&mut self) {
        if self.music_playing {
            return;
        }
        let volume = self.effective_volume();
        self.backend.set_music_volume(volume);
        self.backend.loop_music(&self.track);
        self.music_playing = true;
    }

    pub fn stop_music(&mut self) {
        if self.music_playing {
            self.backend.stop_music();
            self.music_playing = false;
        }
    }
}
