pub mod animation;
pub mod audio;
pub mod collision;
pub mod compute;
pub mod config;
pub mod entities;
pub mod error;
pub mod game;
pub mod geometry;
pub mod platform;
pub mod spawn;
