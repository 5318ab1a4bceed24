//! Game state and core simulation types
//!
//! Everything the frame loop mutates lives here. Nothing in this struct is
//! persisted; a session starts from scratch on every `start()`.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::emotion::EmotionType;
use super::entity::{Enemy, EntityError, FloatingAffirmation, Particle, Player, Projectile};
use crate::consts::*;
use crate::settings::Upgrades;

/// Current phase of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamePhase {
    /// Created but not started
    Ready,
    /// Active gameplay
    Playing,
    /// Between-level rest period
    Breather,
    /// Run ended, waiting for a new `start()`
    GameOver,
    /// Halted for good
    Stopped,
}

/// Breather duration in frames (2 seconds)
pub const BREATHER_DURATION_TICKS: u32 = 2 * FRAMES_PER_SECOND;

/// Complete session state
#[derive(Debug, Clone)]
pub struct GameState {
    pub rng: Pcg32,
    /// Current level (1-based)
    pub level: u32,
    pub score: u64,
    /// Coins earned this session
    pub coins: u64,
    /// Frames simulated while playing
    pub time_ticks: u64,
    pub phase: GamePhase,
    /// Breather frames remaining
    pub breather_ticks: u32,
    /// Playfield size
    pub bounds: Vec2,
    pub player: Player,
    pub enemies: Vec<Enemy>,
    /// Player bullets
    pub bullets: Vec<Projectile>,
    pub enemy_bullets: Vec<Projectile>,
    /// Visual particles (not gameplay-affecting)
    pub particles: Vec<Particle>,
    pub affirmations: Vec<FloatingAffirmation>,
    /// Screen shake intensity (0-1), decays each frame
    pub screen_shake: f32,
    /// Next entity ID
    next_id: u32,
}

impl GameState {
    /// Create a fresh session with the player at the bottom center
    pub fn new(
        seed: u64,
        bounds: Vec2,
        max_health: u32,
        upgrades: Upgrades,
    ) -> Result<Self, EntityError> {
        let start = Vec2::new(bounds.x / 2.0, bounds.y - PLAYER_RADIUS * 3.0);
        let player = Player::new(start, max_health, upgrades)?;

        Ok(Self {
            rng: Pcg32::seed_from_u64(seed),
            level: 1,
            score: 0,
            coins: 0,
            time_ticks: 0,
            phase: GamePhase::Ready,
            breather_ticks: 0,
            bounds,
            player,
            enemies: Vec::new(),
            bullets: Vec::new(),
            enemy_bullets: Vec::new(),
            particles: Vec::new(),
            affirmations: Vec::new(),
            screen_shake: 0.0,
            next_id: 1,
        })
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Random x inside the playfield for an entity of the given radius
    pub fn random_spawn_x(&mut self, radius: f32) -> f32 {
        let max = (self.bounds.x - radius).max(radius);
        if max <= radius {
            return self.bounds.x / 2.0;
        }
        self.rng.random_range(radius..max)
    }

    /// Emit a radial burst of particles, respecting the cap
    pub fn burst(&mut self, pos: Vec2, count: usize, emotion: Option<EmotionType>, cap: usize) {
        let room = cap.saturating_sub(self.particles.len());
        for _ in 0..count.min(room) {
            let angle: f32 = self.rng.random_range(0.0..std::f32::consts::TAU);
            let speed: f32 = self.rng.random_range(1.0..4.0);
            let size: f32 = self.rng.random_range(2.0..5.0);
            self.particles.push(Particle {
                pos,
                vel: Vec2::new(angle.cos(), angle.sin()) * speed,
                life: PARTICLE_LIFETIME,
                max_life: PARTICLE_LIFETIME,
                size,
                emotion,
            });
        }
    }

    /// Advance cosmetic effects and drop expired ones
    pub fn update_effects(&mut self) {
        for particle in &mut self.particles {
            particle.update();
        }
        self.particles.retain(|p| p.is_alive());

        for affirmation in &mut self.affirmations {
            affirmation.update();
        }
        self.affirmations.retain(|a| a.is_alive());

        self.screen_shake *= 0.9;
        if self.screen_shake < 0.01 {
            self.screen_shake = 0.0;
        }
    }

    /// Drop everything hostile or in flight (level transitions)
    pub fn clear_field(&mut self) {
        self.enemies.clear();
        self.bullets.clear();
        self.enemy_bullets.clear();
    }
}
