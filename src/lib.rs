//! Emotion Blaster - arcade core of the daily affirmation app
//!
//! Core modules:
//! - `sim`: Frame-driven simulation (entities, spawning, collisions, engine loop)
//! - `achievements`: Lifetime statistics and one-time unlocks
//! - `persistence`: Key-value storage used by achievements, settings and scores
//! - `settings`: Data-driven tunables

pub mod achievements;
pub mod highscores;
pub mod persistence;
pub mod settings;
pub mod sim;

pub use achievements::{Achievement, AchievementTracker};
pub use highscores::HighScores;
pub use persistence::{FileStore, KeyValueStore, MemoryStore, StoreError};
pub use settings::{QualityPreset, Settings, Upgrades};
pub use sim::{Engine, GameHost};

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Logical frames per second the host is expected to drive `tick()` at
    pub const FRAMES_PER_SECOND: u32 = 60;

    /// Default playfield dimensions (origin top-left, y grows downward)
    pub const PLAYFIELD_WIDTH: f32 = 800.0;
    pub const PLAYFIELD_HEIGHT: f32 = 600.0;

    /// Player defaults
    pub const PLAYER_RADIUS: f32 = 15.0;
    pub const PLAYER_SPEED: f32 = 6.0;
    pub const PLAYER_MAX_HEALTH: u32 = 5;
    /// Fraction of the remaining distance covered per frame when easing to target
    pub const PLAYER_SMOOTHING: f32 = 0.2;
    /// Frames between automatic shots before upgrades
    pub const BASE_FIRE_INTERVAL: u32 = 12;
    /// Fire interval never drops below this, whatever the upgrades
    pub const MIN_FIRE_INTERVAL: u32 = 4;
    /// Damage dealt to the player by enemy contact
    pub const CONTACT_DAMAGE: u32 = 1;

    /// Projectiles
    pub const BULLET_SPEED: f32 = 10.0;
    pub const BULLET_RADIUS: f32 = 4.0;
    pub const BULLET_DAMAGE: u32 = 1;
    pub const ENEMY_BULLET_SPEED: f32 = 4.0;
    pub const ENEMY_BULLET_RADIUS: f32 = 5.0;

    /// Collision radius used when an entity reports none
    pub const DEFAULT_RADIUS: f32 = 12.0;

    /// Boss defaults
    pub const BOSS_RADIUS: f32 = 50.0;
    pub const BOSS_HOVER_Y: f32 = 120.0;
    pub const BOSS_POINTS: u64 = 1000;
    pub const BOSS_COINS: u64 = 50;

    /// Cosmetic effects
    pub const PARTICLE_GRAVITY: f32 = 0.1;
    pub const PARTICLE_LIFETIME: u32 = 30;
    pub const AFFIRMATION_LIFETIME: u32 = 120;
    pub const HIT_BURST: usize = 5;
    pub const KILL_BURST: usize = 20;
}

/// Normalize a direction, treating zero input as no movement.
///
/// Diagonal input comes out at unit length, so diagonal speed matches axis speed.
#[inline]
pub fn normalize_direction(dir: Vec2) -> Vec2 {
    dir.normalize_or_zero()
}

/// Convert a frame count to seconds at the nominal frame rate
#[inline]
pub fn frames_to_seconds(frames: u64) -> f32 {
    frames as f32 / consts::FRAMES_PER_SECOND as f32
}
