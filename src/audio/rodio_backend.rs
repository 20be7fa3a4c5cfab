//! Sound card output through rodio.
//!
//! Effects are read into memory once at construction and decoded per play;
//! the music track loops on its own sink. Anything that goes wrong (no output
//! device, missing file, undecodable data) is logged and turns the affected
//! sound into silence.

use std::collections::HashMap;
use std::io::Cursor;
use std::path::{Path, PathBuf};

use log::{debug, warn};
use rodio::{Decoder, OutputStream, OutputStreamHandle, Sink, Source};

use crate::platform::Audio;

const EXTENSIONS: [&str; 3] = ["wav", "ogg", "mp3"];

pub const EFFECTS: [&str; 3] = ["coin", "power", "hit"];

struct Device {
    // Dropping the stream silences every sink, so it lives as long as the handle.
    _stream: OutputStream,
    handle: OutputStreamHandle,
}

pub struct RodioAudio {
    device: Option<Device>,
    asset_dir: PathBuf,
    effects: HashMap<String, Vec<u8>>,
    music: Option<Sink>,
    volume: f32,
}

impl RodioAudio {
    /// Open the default output device and preload `EFFECTS` from `asset_dir`.
    pub fn new(asset_dir: impl Into<PathBuf>) -> Self {
        let asset_dir = asset_dir.into();
        let device = match OutputStream::try_default() {
            Ok((stream, handle)) => Some(Device {
                _stream: stream,
                handle,
            }),
            Err(e) => {
                warn!("no audio output device, running silent: {e}");
                None
            }
        };

        let mut effects = HashMap::new();
        if device.is_some() {
            for name in EFFECTS {
                match read_asset(&asset_dir, name) {
                    Some(bytes) => {
                        effects.insert(name.to_string(), bytes);
                    }
                    None => warn!("sound '{name}' not found in {}", asset_dir.display()),
                }
            }
        }

        RodioAudio {
            device,
            asset_dir,
            effects,
            music: None,
            volume: 1.0,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.device.is_some()
    }
}

fn read_asset(dir: &Path, name: &str) -> Option<Vec<u8>> {
    EXTENSIONS
        .iter()
        .map(|ext| dir.join(format!("{name}.{ext}")))
        .find_map(|path| std::fs::read(path).ok())
}

impl Audio for RodioAudio {
    fn play_sound(&mut self, name: &str) {
        let (Some(device), Some(bytes)) = (&self.device, self.effects.get(name)) else {
            return;
        };
        match Decoder::new(Cursor::new(bytes.clone())) {
            Ok(source) => {
                if let Err(e) = device.handle.play_raw(source.convert_samples()) {
                    warn!("could not play '{name}': {e}");
                }
            }
            Err(e) => warn!("could not decode '{name}': {e}"),
        }
    }

    fn set_music_volume(&mut self, volume: f32) {
        self.volume = volume.clamp(0.0, 1.0);
        if let Some(sink) = &self.music {
            sink.set_volume(self.volume);
        }
    }

    fn loop_music(&mut self, track: &str) {
        self.stop_music();
        let Some(device) = &self.device else {
            return;
        };
        let Some(bytes) = read_asset(&self.asset_dir, track) else {
            warn!("music '{track}' not found in {}", self.asset_dir.display());
            return;
        };
        let source = match Decoder::new(Cursor::new(bytes)) {
            Ok(source) => source,
            Err(e) => {
                warn!("could not decode music '{track}': {e}");
                return;
            }
        };
        match Sink::try_new(&device.handle) {
            Ok(sink) => {
                sink.set_volume(self.volume);
                sink.append(source.repeat_infinite());
                debug!("looping music '{track}'");
                self.music = Some(sink);
            }
            Err(e) => warn!("could not open music sink: {e}"),
        }
    }

    fn stop_music(&mut self) {
        if let Some(sink) = self.music.take() {
            sink.stop();
        }
    }
}
