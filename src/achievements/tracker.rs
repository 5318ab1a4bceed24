//! Statistic tracking and unlock evaluation

use std::time::{SystemTime, UNIX_EPOCH};

use super::stats::{SessionStats, Statistics};
use super::{Achievement, CATALOG};
use crate::persistence::{KeyValueStore, load_json, save_json};
use crate::sim::EmotionType;

/// Days since the Unix epoch (UTC)
pub fn current_day() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() / 86_400)
        .unwrap_or(0)
}

/// Catalog entry with the player's current standing
#[derive(Debug, Clone)]
pub struct AchievementProgress {
    pub achievement: &'static Achievement,
    pub current: u64,
    pub unlocked: bool,
}

impl AchievementProgress {
    /// Completion in [0, 1]
    pub fn fraction(&self) -> f32 {
        (self.current as f32 / self.achievement.goal.max(1) as f32).min(1.0)
    }
}

/// Lifetime statistics plus unlock bookkeeping.
///
/// Every mutating call writes the full record to the store before returning.
/// A failed write is logged and play continues; unlocks that were missed are
/// reported on the next call that changes a statistic.
pub struct AchievementTracker {
    store: Box<dyn KeyValueStore>,
    stats: Statistics,
    session: SessionStats,
    day_source: fn() -> u64,
}

impl AchievementTracker {
    /// Storage key
    const STORAGE_KEY: &'static str = "emotion_blaster_stats";

    /// Load the record from `store`, starting from zero if absent or unreadable
    pub fn load(store: Box<dyn KeyValueStore>) -> Self {
        let (stats, fresh) = match load_json::<Statistics>(store.as_ref(), Self::STORAGE_KEY) {
            Ok(Some(stats)) => {
                log::info!(
                    "Loaded statistics ({} achievements unlocked)",
                    stats.unlocked.len()
                );
                (stats, false)
            }
            Ok(None) => {
                log::info!("No statistics found, starting fresh");
                (Statistics::default(), true)
            }
            Err(e) => {
                log::warn!("Failed to load statistics ({e}), starting fresh");
                (Statistics::default(), false)
            }
        };

        let mut tracker = Self {
            store,
            stats,
            session: SessionStats::default(),
            day_source: current_day,
        };
        if fresh {
            tracker.persist();
        }
        tracker
    }

    /// Replace the calendar source (for hosts with their own clock, and tests)
    pub fn with_day_source(mut self, day_source: fn() -> u64) -> Self {
        self.day_source = day_source;
        self
    }

    pub fn stats(&self) -> &Statistics {
        &self.stats
    }

    pub fn session(&self) -> &SessionStats {
        &self.session
    }

    pub fn is_unlocked(&self, id: &str) -> bool {
        self.stats.unlocked.contains(id)
    }

    /// Every catalog entry with its current value
    pub fn progress(&self) -> Vec<AchievementProgress> {
        CATALOG
            .iter()
            .map(|a| AchievementProgress {
                achievement: a,
                current: self.stats.get(a.stat),
                unlocked: self.is_unlocked(a.id),
            })
            .collect()
    }

    pub fn track_enemy_kill(&mut self, emotion: EmotionType) -> Vec<&'static Achievement> {
        self.stats.enemies_defeated += 1;
        *self.stats.kills_by_type.entry(emotion).or_insert(0) += 1;
        self.commit()
    }

    pub fn track_boss_kill(&mut self) -> Vec<&'static Achievement> {
        self.stats.bosses_defeated += 1;
        self.commit()
    }

    /// Record reaching a level; only advances past the stored max
    pub fn track_level(&mut self, level: u32) -> Vec<&'static Achievement> {
        let level = u64::from(level);
        if level <= self.stats.max_level {
            return Vec::new();
        }
        self.stats.max_level = level;
        self.commit()
    }

    /// Record a score; only advances past the stored high score
    pub fn track_score(&mut self, score: u64) -> Vec<&'static Achievement> {
        if score <= self.stats.high_score {
            return Vec::new();
        }
        self.stats.high_score = score;
        self.commit()
    }

    pub fn track_coins(&mut self, amount: u64) -> Vec<&'static Achievement> {
        if amount == 0 {
            return Vec::new();
        }
        self.stats.total_coins = self.stats.total_coins.saturating_add(amount);
        self.commit()
    }

    /// Update the session no-damage streak; the stored max only moves up
    pub fn track_no_damage_time(&mut self, seconds: u64) -> Vec<&'static Achievement> {
        self.session.no_damage_seconds = seconds;
        if seconds <= self.stats.max_no_damage_seconds {
            return Vec::new();
        }
        self.stats.max_no_damage_seconds = seconds;
        self.commit()
    }

    /// Zero the session streak without touching the stored max
    pub fn reset_no_damage_time(&mut self) {
        self.session.no_damage_seconds = 0;
    }

    pub fn track_shot(&mut self) -> Vec<&'static Achievement> {
        self.session.shots_fired += 1;
        self.stats.shots_fired += 1;
        self.commit()
    }

    pub fn track_shot_hit(&mut self) -> Vec<&'static Achievement> {
        self.session.shots_hit += 1;
        self.stats.shots_hit += 1;
        self.commit()
    }

    /// Count a new game, and a new play day at most once per calendar day
    pub fn track_game_start(&mut self) -> Vec<&'static Achievement> {
        self.session = SessionStats::default();
        self.stats.games_played += 1;
        let today = (self.day_source)();
        if self.stats.last_played_day != Some(today) {
            self.stats.days_played += 1;
            self.stats.last_played_day = Some(today);
        }
        self.commit()
    }

    /// Close out a level. Perfect when at least one shot was fired and every
    /// shot hit. Starts fresh shot accounting for the next level.
    pub fn track_level_complete(&mut self) -> Vec<&'static Achievement> {
        let perfect =
            self.session.shots_fired > 0 && self.session.shots_fired == self.session.shots_hit;
        self.session.shots_fired = 0;
        self.session.shots_hit = 0;
        if !perfect {
            return Vec::new();
        }
        self.stats.perfect_levels += 1;
        self.commit()
    }

    /// Wipe all statistics and unlocks
    pub fn reset(&mut self) {
        log::info!("Resetting statistics");
        self.stats = Statistics::default();
        self.session = SessionStats::default();
        self.persist();
    }

    /// Evaluate unlocks, mark them, and persist the whole record
    fn commit(&mut self) -> Vec<&'static Achievement> {
        let newly: Vec<&'static Achievement> = CATALOG
            .iter()
            .filter(|a| !self.stats.unlocked.contains(a.id) && self.stats.get(a.stat) >= a.goal)
            .collect();
        for a in &newly {
            log::info!("Achievement unlocked: {}", a.name);
            self.stats.unlocked.insert(a.id.to_string());
        }
        self.persist();
        newly
    }

    fn persist(&mut self) {
        if let Err(e) = save_json(self.store.as_mut(), Self::STORAGE_KEY, &self.stats) {
            log::error!("Failed to save statistics: {e}");
        }
    }
}
