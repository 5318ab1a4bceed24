//! Movement patterns
//!
//! Each pattern is a plain per-frame update rule looked up from a table by
//! pattern, so the set stays closed and every enemy kind shares one code path.

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::consts::BOSS_HOVER_Y;

/// Named per-frame positional update rules
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MovementPattern {
    Rush,
    Zigzag,
    Slow,
    Orbit,
    Wave,
    Spiral,
    Erratic,
    /// Descend to hover height, then sweep side to side
    BossSweep,
}

/// Kinematic state a pattern reads and advances
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Motion {
    pub pos: Vec2,
    /// Reference point for patterns that oscillate around a moving center
    pub anchor: Vec2,
    /// Free velocity used by erratic and sweeping patterns
    pub vel: Vec2,
    pub speed: f32,
    pub radius: f32,
    /// Frames since spawn
    pub age: u32,
}

impl Motion {
    pub fn new(pos: Vec2, speed: f32, radius: f32) -> Self {
        Self {
            pos,
            anchor: pos,
            vel: Vec2::new(0.0, speed),
            speed,
            radius,
            age: 0,
        }
    }
}

/// World information a movement rule may consult
pub struct MoveContext<'a> {
    pub player_pos: Vec2,
    pub width: f32,
    pub rng: &'a mut Pcg32,
}

type MoveFn = fn(&mut Motion, &mut MoveContext<'_>);

/// Dispatch table, indexed in declaration order of [`MovementPattern`]
const MOVERS: [MoveFn; 8] = [
    move_rush,
    move_zigzag,
    move_slow,
    move_orbit,
    move_wave,
    move_spiral,
    move_erratic,
    move_boss_sweep,
];

impl MovementPattern {
    pub const ALL: [MovementPattern; 8] = [
        MovementPattern::Rush,
        MovementPattern::Zigzag,
        MovementPattern::Slow,
        MovementPattern::Orbit,
        MovementPattern::Wave,
        MovementPattern::Spiral,
        MovementPattern::Erratic,
        MovementPattern::BossSweep,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MovementPattern::Rush => "rush",
            MovementPattern::Zigzag => "zigzag",
            MovementPattern::Slow => "slow",
            MovementPattern::Orbit => "orbit",
            MovementPattern::Wave => "wave",
            MovementPattern::Spiral => "spiral",
            MovementPattern::Erratic => "erratic",
            MovementPattern::BossSweep => "boss",
        }
    }

    /// Unknown names fall back to a straight slow descent
    pub fn from_name(name: &str) -> Self {
        Self::ALL
            .iter()
            .copied()
            .find(|p| p.as_str() == name)
            .unwrap_or_else(|| {
                log::warn!("Unknown movement pattern {name:?}, using slow");
                MovementPattern::Slow
            })
    }

    /// Advance `motion` by one frame
    pub fn apply(self, motion: &mut Motion, ctx: &mut MoveContext<'_>) {
        MOVERS[self as usize](motion, ctx);
        motion.age = motion.age.saturating_add(1);
    }
}

fn move_rush(m: &mut Motion, ctx: &mut MoveContext<'_>) {
    let dir = (ctx.player_pos - m.pos).normalize_or(Vec2::Y);
    m.pos += dir * m.speed;
}

fn move_zigzag(m: &mut Motion, _ctx: &mut MoveContext<'_>) {
    m.pos.y += m.speed;
    m.pos.x = m.anchor.x + (m.age as f32 * 0.1).sin() * 60.0;
}

fn move_slow(m: &mut Motion, _ctx: &mut MoveContext<'_>) {
    m.pos.y += m.speed * 0.5;
}

fn move_orbit(m: &mut Motion, _ctx: &mut MoveContext<'_>) {
    m.anchor.y += m.speed * 0.6;
    let angle = m.age as f32 * 0.05;
    m.pos = m.anchor + Vec2::new(angle.cos(), angle.sin()) * 40.0;
}

fn move_wave(m: &mut Motion, _ctx: &mut MoveContext<'_>) {
    m.pos.y += m.speed;
    m.pos.x = m.anchor.x + (m.age as f32 * 0.03).sin() * 90.0;
}

fn move_spiral(m: &mut Motion, _ctx: &mut MoveContext<'_>) {
    m.anchor.y += m.speed * 0.7;
    let angle = m.age as f32 * 0.08;
    let r = 20.0 + (m.age as f32 * 0.2).min(60.0);
    m.pos = m.anchor + Vec2::new(angle.cos(), angle.sin()) * r;
}

fn move_erratic(m: &mut Motion, ctx: &mut MoveContext<'_>) {
    let jitter = Vec2::new(
        ctx.rng.random_range(-0.6..0.6),
        ctx.rng.random_range(-0.2..0.4),
    ) * m.speed;
    m.vel += jitter;
    m.vel.x = m.vel.x.clamp(-m.speed, m.speed);
    m.vel.y = m.vel.y.clamp(m.speed * 0.3, m.speed);
    m.pos += m.vel;
    // bounce off the side walls
    if m.pos.x < m.radius || m.pos.x > ctx.width - m.radius {
        m.vel.x = -m.vel.x;
        m.pos.x = m.pos.x.clamp(m.radius, (ctx.width - m.radius).max(m.radius));
    }
}

fn move_boss_sweep(m: &mut Motion, ctx: &mut MoveContext<'_>) {
    if m.pos.y < BOSS_HOVER_Y {
        m.pos.y = (m.pos.y + m.speed).min(BOSS_HOVER_Y);
        return;
    }
    if m.vel.x == 0.0 {
        m.vel = Vec2::new(m.speed, 0.0);
    }
    m.pos.x += m.vel.x;
    let max_x = (ctx.width - m.radius).max(m.radius);
    if m.pos.x <= m.radius || m.pos.x >= max_x {
        m.vel.x = -m.vel.x;
        m.pos.x = m.pos.x.clamp(m.radius, max_x);
    }
}
