use thiserror::Error;

/// Rejected game configuration.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("playfield {width}x{height} cannot hold a {min_width}x{min_height} sprite")]
    PlayfieldTooSmall {
        width: i32,
        height: i32,
        min_width: i32,
        min_height: i32,
    },

    #[error("playfield {width}x{height} puts the player and enemy spawn points on top of each other")]
    SpawnsOverlap { width: i32, height: i32 },

    #[error("{0} must be greater than zero")]
    NotPositive(&'static str),

    #[error("spawn delay window is inverted: {min} ms > {max} ms")]
    InvertedSpawnWindow { min: u64, max: u64 },

    #[error("music volume {0} is outside 0.0..=1.0")]
    VolumeOutOfRange(f32),
}
