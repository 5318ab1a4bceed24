//! Entity types
//!
//! Player, enemies (regular and boss), projectiles and cosmetic effects.
//! Constructors reject non-finite positions and zero damage so the frame loop
//! never has to handle them downstream.

use std::fmt;

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;

use super::emotion::{BOSS_AFFIRMATION, EmotionType};
use super::movement::{MoveContext, Motion, MovementPattern};
use crate::consts::*;
use crate::settings::Upgrades;

/// Anything that occupies space on the playfield
pub trait Entity {
    fn pos(&self) -> Vec2;
    fn radius(&self) -> f32;

    /// Radius used for overlap tests; unset radii fall back to a default
    fn collision_radius(&self) -> f32 {
        let r = self.radius();
        if r.is_finite() && r > 0.0 { r } else { DEFAULT_RADIUS }
    }
}

/// Rejected entity construction
#[derive(Debug, Clone, PartialEq)]
pub enum EntityError {
    NonFinitePosition(Vec2),
    NonFiniteVelocity(Vec2),
    ZeroDamage,
    ZeroHealth,
}

impl fmt::Display for EntityError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityError::NonFinitePosition(p) => write!(f, "non-finite position {p}"),
            EntityError::NonFiniteVelocity(v) => write!(f, "non-finite velocity {v}"),
            EntityError::ZeroDamage => write!(f, "projectile damage must be positive"),
            EntityError::ZeroHealth => write!(f, "entity health must be positive"),
        }
    }
}

impl std::error::Error for EntityError {}

fn check_pos(pos: Vec2) -> Result<Vec2, EntityError> {
    if pos.is_finite() {
        Ok(pos)
    } else {
        Err(EntityError::NonFinitePosition(pos))
    }
}

/// Per-frame steering resolved from buffered input
#[derive(Debug, Clone, Copy, Default)]
pub struct Steering {
    /// Unit-length (or zero) keyboard direction
    pub direction: Vec2,
    /// Pointer/touch target, takes precedence over keys
    pub pointer: Option<Vec2>,
}

/// The player's ship
#[derive(Debug, Clone)]
pub struct Player {
    pub pos: Vec2,
    /// Where the ship is easing toward
    pub target: Vec2,
    pub radius: f32,
    pub health: u32,
    pub max_health: u32,
    /// Base speed in units per frame, before upgrades
    pub speed: f32,
    pub upgrades: Upgrades,
    pub can_shoot: bool,
    pub cooldown_timer: u32,
}

impl Player {
    pub fn new(pos: Vec2, max_health: u32, upgrades: Upgrades) -> Result<Self, EntityError> {
        let pos = check_pos(pos)?;
        if max_health == 0 {
            return Err(EntityError::ZeroHealth);
        }
        Ok(Self {
            pos,
            target: pos,
            radius: PLAYER_RADIUS,
            health: max_health,
            max_health,
            speed: PLAYER_SPEED,
            upgrades,
            can_shoot: true,
            cooldown_timer: 0,
        })
    }

    /// Speed after movement upgrades
    pub fn effective_speed(&self) -> f32 {
        self.speed * self.upgrades.speed_multiplier()
    }

    /// Frames between shots after fire-rate upgrades
    pub fn fire_interval(&self) -> u32 {
        self.upgrades.fire_interval()
    }

    /// Advance one frame: steer, ease toward target, clamp, tick cooldown
    pub fn update(&mut self, steering: Steering, smoothing: f32, bounds: Vec2) {
        if let Some(pointer) = steering.pointer.filter(|p| p.is_finite()) {
            self.target = pointer;
        } else if steering.direction != Vec2::ZERO {
            self.target += steering.direction * self.effective_speed();
        }

        let min = Vec2::splat(self.radius);
        let max = (bounds - Vec2::splat(self.radius)).max(min);
        self.target = self.target.clamp(min, max);

        self.pos += (self.target - self.pos) * smoothing.clamp(0.0, 1.0);
        self.pos = self.pos.clamp(min, max);

        if !self.can_shoot {
            self.cooldown_timer = self.cooldown_timer.saturating_sub(1);
            if self.cooldown_timer == 0 {
                self.can_shoot = true;
            }
        }
    }

    /// Consume the shot if available and start the cooldown
    pub fn try_fire(&mut self) -> bool {
        if !self.can_shoot {
            return false;
        }
        self.can_shoot = false;
        self.cooldown_timer = self.fire_interval();
        true
    }

    /// Apply damage, clamping at zero. Returns remaining health.
    pub fn take_damage(&mut self, amount: u32) -> u32 {
        self.health = self.health.saturating_sub(amount);
        self.health
    }

    pub fn is_alive(&self) -> bool {
        self.health > 0
    }
}

impl Entity for Player {
    fn pos(&self) -> Vec2 {
        self.pos
    }
    fn radius(&self) -> f32 {
        self.radius
    }
}

/// Enemy discriminant: regular emotion or end-of-level boss
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnemyKind {
    Regular,
    Boss,
}

/// An emotion on the playfield
#[derive(Debug, Clone)]
pub struct Enemy {
    pub id: u32,
    pub kind: EnemyKind,
    pub emotion: EmotionType,
    pub pattern: MovementPattern,
    pub motion: Motion,
    pub health: u32,
    pub max_health: u32,
    pub point_value: u64,
    pub coin_value: u64,
    pub can_shoot: bool,
    /// Frames until the next shot (only meaningful when `can_shoot`)
    pub shoot_timer: u32,
    pub shoot_interval: u32,
    affirmation: &'static str,
}

/// Level/difficulty adjusted values applied at spawn time
#[derive(Debug, Clone, Copy)]
pub struct SpawnScaling {
    pub health: u32,
    pub speed: f32,
}

impl Enemy {
    /// Spawn a regular enemy with a random affirmation from its pool
    pub fn new(
        id: u32,
        emotion: EmotionType,
        pos: Vec2,
        scaling: SpawnScaling,
        rng: &mut Pcg32,
    ) -> Result<Self, EntityError> {
        let pos = check_pos(pos)?;
        if scaling.health == 0 {
            return Err(EntityError::ZeroHealth);
        }
        let stats = emotion.stats();
        let shoot_interval = 150;
        Ok(Self {
            id,
            kind: EnemyKind::Regular,
            emotion,
            pattern: stats.pattern,
            motion: Motion::new(pos, scaling.speed.max(0.1), stats.radius),
            health: scaling.health,
            max_health: scaling.health,
            point_value: stats.points,
            coin_value: stats.coins,
            can_shoot: stats.can_shoot,
            // stagger the first shot so a wave doesn't fire in unison
            shoot_timer: rng.random_range(shoot_interval / 2..shoot_interval),
            shoot_interval,
            affirmation: emotion.pick_affirmation(rng),
        })
    }

    /// Spawn the level boss
    pub fn boss(
        id: u32,
        emotion: EmotionType,
        pos: Vec2,
        scaling: SpawnScaling,
    ) -> Result<Self, EntityError> {
        let pos = check_pos(pos)?;
        if scaling.health == 0 {
            return Err(EntityError::ZeroHealth);
        }
        Ok(Self {
            id,
            kind: EnemyKind::Boss,
            emotion,
            pattern: MovementPattern::BossSweep,
            motion: Motion::new(pos, scaling.speed.max(0.1), BOSS_RADIUS),
            health: scaling.health,
            max_health: scaling.health,
            point_value: BOSS_POINTS,
            coin_value: BOSS_COINS,
            can_shoot: true,
            shoot_timer: 90,
            shoot_interval: 60,
            affirmation: BOSS_AFFIRMATION,
        })
    }

    pub fn is_boss(&self) -> bool {
        self.kind == EnemyKind::Boss
    }

    /// The affirmation fixed at spawn
    pub fn affirmation(&self) -> &'static str {
        self.affirmation
    }

    /// Advance one frame. Returns a projectile when the enemy fires.
    pub fn update(&mut self, ctx: &mut MoveContext<'_>) -> Option<Projectile> {
        self.pattern.apply(&mut self.motion, ctx);

        if !self.can_shoot {
            return None;
        }
        self.shoot_timer = self.shoot_timer.saturating_sub(1);
        if self.shoot_timer > 0 {
            return None;
        }
        self.shoot_timer = self.shoot_interval;
        let dir = (ctx.player_pos - self.motion.pos).normalize_or(Vec2::Y);
        Projectile::enemy(self.motion.pos, dir * ENEMY_BULLET_SPEED).ok()
    }

    /// Apply damage, clamping at zero. Returns remaining health.
    pub fn take_damage(&mut self, amount: u32) -> u32 {
        self.health = self.health.saturating_sub(amount);
        self.health
    }

    pub fn is_dead(&self) -> bool {
        self.health == 0
    }

    /// Fell past the bottom edge (or drifted far outside the sides)
    pub fn is_off_field(&self, bounds: Vec2) -> bool {
        let p = self.motion.pos;
        let r = self.motion.radius;
        p.y - r > bounds.y || p.x + r < -bounds.x * 0.5 || p.x - r > bounds.x * 1.5
    }
}

impl Entity for Enemy {
    fn pos(&self) -> Vec2 {
        self.motion.pos
    }
    fn radius(&self) -> f32 {
        self.motion.radius
    }
}

/// Who fired a projectile
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Faction {
    Player,
    Enemy,
}

/// A bullet, friendly or hostile
#[derive(Debug, Clone)]
pub struct Projectile {
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    pub damage: u32,
    pub faction: Faction,
}

impl Projectile {
    pub fn new(pos: Vec2, vel: Vec2, damage: u32, faction: Faction) -> Result<Self, EntityError> {
        let pos = check_pos(pos)?;
        if !vel.is_finite() {
            return Err(EntityError::NonFiniteVelocity(vel));
        }
        if damage == 0 {
            return Err(EntityError::ZeroDamage);
        }
        let radius = match faction {
            Faction::Player => BULLET_RADIUS,
            Faction::Enemy => ENEMY_BULLET_RADIUS,
        };
        Ok(Self {
            pos,
            vel,
            radius,
            damage,
            faction,
        })
    }

    /// Player bullet travelling straight up
    pub fn player(pos: Vec2) -> Result<Self, EntityError> {
        Self::new(pos, Vec2::new(0.0, -BULLET_SPEED), BULLET_DAMAGE, Faction::Player)
    }

    /// Enemy bullet with the given velocity
    pub fn enemy(pos: Vec2, vel: Vec2) -> Result<Self, EntityError> {
        Self::new(pos, vel, 1, Faction::Enemy)
    }

    pub fn update(&mut self) {
        self.pos += self.vel;
    }

    pub fn is_off_field(&self, bounds: Vec2) -> bool {
        self.pos.x + self.radius < 0.0
            || self.pos.y + self.radius < 0.0
            || self.pos.x - self.radius > bounds.x
            || self.pos.y - self.radius > bounds.y
    }
}

impl Entity for Projectile {
    fn pos(&self) -> Vec2 {
        self.pos
    }
    fn radius(&self) -> f32 {
        self.radius
    }
}

/// A particle for visual effects
#[derive(Debug, Clone)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    /// Frames remaining
    pub life: u32,
    pub max_life: u32,
    pub size: f32,
    /// Emotion the particle came from, for color lookup
    pub emotion: Option<EmotionType>,
}

impl Particle {
    pub fn update(&mut self) {
        self.pos += self.vel;
        self.vel.y += PARTICLE_GRAVITY;
        self.life = self.life.saturating_sub(1);
    }

    pub fn is_alive(&self) -> bool {
        self.life > 0
    }

    /// 1.0 when fresh, fading to 0.0
    pub fn alpha(&self) -> f32 {
        if self.max_life == 0 {
            0.0
        } else {
            self.life as f32 / self.max_life as f32
        }
    }
}

/// Affirmation text rising from where an emotion was released
#[derive(Debug, Clone)]
pub struct FloatingAffirmation {
    pub text: &'static str,
    pub pos: Vec2,
    pub life: u32,
    pub max_life: u32,
}

impl FloatingAffirmation {
    pub fn new(text: &'static str, pos: Vec2) -> Self {
        Self {
            text,
            pos,
            life: AFFIRMATION_LIFETIME,
            max_life: AFFIRMATION_LIFETIME,
        }
    }

    pub fn update(&mut self) {
        self.pos.y -= 0.5;
        self.life = self.life.saturating_sub(1);
    }

    pub fn is_alive(&self) -> bool {
        self.life > 0
    }

    pub fn alpha(&self) -> f32 {
        self.life as f32 / self.max_life.max(1) as f32
    }
}
