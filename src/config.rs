/// Tunables for one run of the game.

use std::time::Duration;

use crate::animation::CHARACTER_SHEET;
use crate::error::ConfigError;
use crate::geometry::{Bounds, Rect};

#[derive(Clone, Debug, PartialEq)]
pub struct GameConfig {
    pub width: i32,
    pub height: i32,
    pub fps: u32,
    pub initial_lives: u32,
    pub player_speed: i32,
    pub enemy_speed: i32,
    /// Time each animation frame stays on screen.
    pub frame_time_ms: u64,
    /// How long an unclaimed power-up stays on the field.
    pub powerup_lifetime_ms: u64,
    /// Invincibility granted by a pickup.
    pub powerup_duration_ms: u64,
    pub spawn_delay_min_ms: u64,
    pub spawn_delay_max_ms: u64,
    pub music_volume: f32,
    pub music_track: String,
}

impl Default for GameConfig {
    fn default() -> Self {
        GameConfig {
            width: 800,
            height: 600,
            fps: 60,
            initial_lives: 3,
            player_speed: 5,
            enemy_speed: 4,
            frame_time_ms: 120,
            powerup_lifetime_ms: 6000,
            powerup_duration_ms: 3000,
            spawn_delay_min_ms: 4000,
            spawn_delay_max_ms: 9000,
            music_volume: 0.6,
            music_track: "music".to_string(),
        }
    }
}

impl GameConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let (min_width, min_height) = CHARACTER_SHEET.drawn_size();
        if self.width < min_width || self.height < min_height {
            return Err(ConfigError::PlayfieldTooSmall {
                width: self.width,
                height: self.height,
                min_width,
                min_height,
            });
        }
        let player = self.spawn_rect(self.player_spawn());
        if player.overlaps(&self.spawn_rect(self.enemy_spawn())) {
            return Err(ConfigError::SpawnsOverlap {
                width: self.width,
                height: self.height,
            });
        }
        if self.fps == 0 {
            return Err(ConfigError::NotPositive("fps"));
        }
        if self.initial_lives == 0 {
            return Err(ConfigError::NotPositive("initial_lives"));
        }
        if self.player_speed <= 0 {
            return Err(ConfigError::NotPositive("player_speed"));
        }
        if self.enemy_speed <= 0 {
            return Err(ConfigError::NotPositive("enemy_speed"));
        }
        if self.frame_time_ms == 0 {
            return Err(ConfigError::NotPositive("frame_time_ms"));
        }
        if self.spawn_delay_min_ms > self.spawn_delay_max_ms {
            return Err(ConfigError::InvertedSpawnWindow {
                min: self.spawn_delay_min_ms,
                max: self.spawn_delay_max_ms,
            });
        }
        if !(0.0..=1.0).contains(&self.music_volume) {
            return Err(ConfigError::VolumeOutOfRange(self.music_volume));
        }
        Ok(())
    }

    pub fn bounds(&self) -> Bounds {
        Bounds::new(self.width, self.height)
    }

    pub fn frame_duration(&self) -> Duration {
        Duration::from_millis(1000 / u64::from(self.fps.max(1)))
    }

    pub fn player_spawn(&self) -> (i32, i32) {
        self.fit_spawn(100, self.height / 2)
    }

    pub fn enemy_spawn(&self) -> (i32, i32) {
        self.fit_spawn(self.width - 140, self.height / 2)
    }

    fn spawn_rect(&self, (x, y): (i32, i32)) -> Rect {
        let (w, h) = CHARACTER_SHEET.drawn_size();
        Rect::new(x, y, w, h)
    }

    /// Keep a character-sized spawn point on small playfields.
    fn fit_spawn(&self, x: i32, y: i32) -> (i32, i32) {
        let (w, h) = CHARACTER_SHEET.drawn_size();
        (
            x.min(self.width - w).max(0),
            y.min(self.height - h).max(0),
        )
    }
}
