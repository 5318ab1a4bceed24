//! Deterministic simulation module
//!
//! All gameplay logic lives here. Given the same seed, settings and input
//! sequence, a run replays identically:
//! - Frame-count timers only
//! - Seeded RNG only
//! - No rendering or platform dependencies

pub mod collision;
pub mod difficulty;
pub mod emotion;
pub mod engine;
pub mod entity;
pub mod level;
pub mod movement;
pub mod state;

pub use collision::{CombatEvent, circles_overlap, collides};
pub use difficulty::DifficultyScaler;
pub use emotion::{EmotionStats, EmotionType};
pub use engine::{Direction, Engine, GameHost, LevelSummary, NoopHost, TickInput};
pub use entity::{
    Enemy, EnemyKind, Entity, EntityError, Faction, FloatingAffirmation, Particle, Player,
    Projectile, SpawnScaling, Steering,
};
pub use level::{LevelManager, SpawnDecision};
pub use movement::{Motion, MovementPattern};
pub use state::{BREATHER_DURATION_TICKS, GamePhase, GameState};
