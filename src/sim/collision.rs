//! Collision detection and combat resolution
//!
//! Everything is a circle: two entities touch when the distance between their
//! centers is less than the sum of their radii. Resolution mutates the entity
//! collections in place and reports what happened as [`CombatEvent`]s so the
//! engine can credit score, feed achievements and spawn effects afterwards.

use glam::Vec2;

use super::emotion::EmotionType;
use super::entity::{Enemy, EnemyKind, Entity, Player, Projectile};
use crate::consts::CONTACT_DAMAGE;

/// Circle-circle overlap test
#[inline]
pub fn circles_overlap(a: Vec2, a_radius: f32, b: Vec2, b_radius: f32) -> bool {
    let reach = a_radius + b_radius;
    a.distance_squared(b) < reach * reach
}

/// Overlap test between two entities using their collision radii
#[inline]
pub fn collides(a: &impl Entity, b: &impl Entity) -> bool {
    circles_overlap(a.pos(), a.collision_radius(), b.pos(), b.collision_radius())
}

/// Outcome of one resolved contact
#[derive(Debug, Clone, PartialEq)]
pub enum CombatEvent {
    /// A bullet hit an enemy that survived
    Hit { pos: Vec2, emotion: EmotionType },
    /// An enemy was destroyed (already removed from the collection)
    Kill {
        pos: Vec2,
        emotion: EmotionType,
        kind: EnemyKind,
        points: u64,
        coins: u64,
        affirmation: &'static str,
    },
    /// The player took damage
    PlayerHit {
        pos: Vec2,
        damage: u32,
        emotion: Option<EmotionType>,
    },
}

/// Resolve player bullets against enemies.
///
/// Each bullet damages at most one enemy. Both collections are walked in
/// reverse so removals never skip an unvisited element.
pub fn resolve_bullet_hits(bullets: &mut Vec<Projectile>, enemies: &mut Vec<Enemy>) -> Vec<CombatEvent> {
    let mut events = Vec::new();

    for i in (0..bullets.len()).rev() {
        let mut hit_index = None;
        for j in (0..enemies.len()).rev() {
            if collides(&bullets[i], &enemies[j]) {
                hit_index = Some(j);
                break;
            }
        }
        let Some(j) = hit_index else {
            continue;
        };

        let bullet = bullets.swap_remove(i);
        let enemy = &mut enemies[j];
        let pos = enemy.motion.pos;
        enemy.take_damage(bullet.damage);
        if !enemy.is_dead() {
            events.push(CombatEvent::Hit {
                pos,
                emotion: enemy.emotion,
            });
            continue;
        }

        let enemy = enemies.remove(j);
        events.push(CombatEvent::Kill {
            pos,
            emotion: enemy.emotion,
            kind: enemy.kind,
            points: enemy.point_value,
            coins: enemy.coin_value,
            affirmation: enemy.affirmation(),
        });
    }

    events
}

/// Resolve enemy bodies touching the player.
///
/// Every enemy that touches the player is consumed by the contact, boss
/// included. A consumed enemy earns no score.
pub fn resolve_player_contacts(player: &mut Player, enemies: &mut Vec<Enemy>) -> Vec<CombatEvent> {
    let mut events = Vec::new();

    for j in (0..enemies.len()).rev() {
        if !collides(player, &enemies[j]) {
            continue;
        }
        player.take_damage(CONTACT_DAMAGE);
        events.push(CombatEvent::PlayerHit {
            pos: player.pos,
            damage: CONTACT_DAMAGE,
            emotion: Some(enemies[j].emotion),
        });
        enemies.remove(j);
    }

    events
}

/// Resolve enemy bullets against the player
pub fn resolve_enemy_fire(player: &mut Player, bullets: &mut Vec<Projectile>) -> Vec<CombatEvent> {
    let mut events = Vec::new();

    for i in (0..bullets.len()).rev() {
        if !collides(player, &bullets[i]) {
            continue;
        }
        let bullet = bullets.swap_remove(i);
        player.take_damage(bullet.damage);
        events.push(CombatEvent::PlayerHit {
            pos: player.pos,
            damage: bullet.damage,
            emotion: None,
        });
    }

    events
}
