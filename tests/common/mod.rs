#![allow(dead_code)]

use std::collections::HashSet;
use std::convert::Infallible;

use collect_the_point::geometry::Rect;
use collect_the_point::platform::{Audio, Color, Image, Input, Key, Surface};

// ── Input ─────────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, Default)]
pub struct ScriptedInput {
    pub held: HashSet<Key>,
    pub quit: bool,
}

impl ScriptedInput {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn holding(keys: &[Key]) -> Self {
        ScriptedInput {
            held: keys.iter().copied().collect(),
            quit: false,
        }
    }

    pub fn quitting() -> Self {
        ScriptedInput {
            held: HashSet::new(),
            quit: true,
        }
    }
}

impl Input for ScriptedInput {
    fn is_held(&self, key: Key) -> bool {
        self.held.contains(&key)
    }

    fn quit_requested(&self) -> bool {
        self.quit
    }
}

// ── Audio ─────────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub enum AudioCall {
    Play(String),
    Volume(f32),
    Loop(String),
    Stop,
}

#[derive(Debug, Default)]
pub struct RecordingAudio {
    pub calls: Vec<AudioCall>,
}

impl RecordingAudio {
    pub fn played(&self, name: &str) -> usize {
        self.calls
            .iter()
            .filter(|c| **c == AudioCall::Play(name.to_string()))
            .count()
    }

    pub fn count(&self, call: &AudioCall) -> usize {
        self.calls.iter().filter(|c| *c == call).count()
    }
}

impl Audio for RecordingAudio {
    fn play_sound(&mut self, name: &str) {
        self.calls.push(AudioCall::Play(name.to_string()));
    }

    fn set_music_volume(&mut self, volume: f32) {
        self.calls.push(AudioCall::Volume(volume));
    }

    fn loop_music(&mut self, track: &str) {
        self.calls.push(AudioCall::Loop(track.to_string()));
    }

    fn stop_music(&mut self) {
        self.calls.push(AudioCall::Stop);
    }
}

// ── Surface ───────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub enum DrawOp {
    Clear(Color),
    Blit(Image, Rect),
    Text(String, i32, i32),
    Present,
}

#[derive(Debug, Default)]
pub struct RecordingSurface {
    pub ops: Vec<DrawOp>,
}

impl RecordingSurface {
    pub fn blits(&self) -> Vec<(Image, Rect)> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                DrawOp::Blit(image, rect) => Some((*image, *rect)),
                _ => None,
            })
            .collect()
    }

    pub fn has_text(&self, needle: &str) -> bool {
        self.ops
            .iter()
            .any(|op| matches!(op, DrawOp::Text(text, _, _) if text.contains(needle)))
    }
}

impl Surface for RecordingSurface {
    type Error = Infallible;

    fn clear(&mut self, color: Color) -> Result<(), Infallible> {
        self.ops.push(DrawOp::Clear(color));
        Ok(())
    }

    fn blit(&mut self, image: &Image, dest: Rect) -> Result<(), Infallible> {
        self.ops.push(DrawOp::Blit(*image, dest));
        Ok(())
    }

    fn draw_text(&mut self, text: &str, x: i32, y: i32, _color: Color) -> Result<(), Infallible> {
        self.ops.push(DrawOp::Text(text.to_string(), x, y));
        Ok(())
    }

    fn present(&mut self) -> Result<(), Infallible> {
        self.ops.push(DrawOp::Present);
        Ok(())
    }
}
