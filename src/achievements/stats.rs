//! Persisted lifetime statistics

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::sim::EmotionType;

/// Record format version, bumped when fields change meaning
pub const STATS_VERSION: u32 = 1;

/// A tracked statistic an achievement can be keyed to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stat {
    EnemiesDefeated,
    Kills(EmotionType),
    BossesDefeated,
    MaxLevel,
    HighScore,
    TotalCoins,
    MaxNoDamageSeconds,
    ShotsHit,
    PerfectLevels,
    GamesPlayed,
    DaysPlayed,
}

/// Lifetime statistics, written whole on every change
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Statistics {
    pub version: u32,
    pub enemies_defeated: u64,
    pub kills_by_type: BTreeMap<EmotionType, u64>,
    pub bosses_defeated: u64,
    pub max_level: u64,
    pub high_score: u64,
    pub total_coins: u64,
    pub max_no_damage_seconds: u64,
    pub shots_fired: u64,
    pub shots_hit: u64,
    pub perfect_levels: u64,
    pub games_played: u64,
    pub days_played: u64,
    /// Days since the Unix epoch of the last game start
    pub last_played_day: Option<u64>,
    /// Ids of achievements already reported
    pub unlocked: BTreeSet<String>,
}

impl Default for Statistics {
    fn default() -> Self {
        Self {
            version: STATS_VERSION,
            enemies_defeated: 0,
            kills_by_type: BTreeMap::new(),
            bosses_defeated: 0,
            max_level: 0,
            high_score: 0,
            total_coins: 0,
            max_no_damage_seconds: 0,
            shots_fired: 0,
            shots_hit: 0,
            perfect_levels: 0,
            games_played: 0,
            days_played: 0,
            last_played_day: None,
            unlocked: BTreeSet::new(),
        }
    }
}

impl Statistics {
    pub fn get(&self, stat: Stat) -> u64 {
        match stat {
            Stat::EnemiesDefeated => self.enemies_defeated,
            Stat::Kills(emotion) => self.kills(emotion),
            Stat::BossesDefeated => self.bosses_defeated,
            Stat::MaxLevel => self.max_level,
            Stat::HighScore => self.high_score,
            Stat::TotalCoins => self.total_coins,
            Stat::MaxNoDamageSeconds => self.max_no_damage_seconds,
            Stat::ShotsHit => self.shots_hit,
            Stat::PerfectLevels => self.perfect_levels,
            Stat::GamesPlayed => self.games_played,
            Stat::DaysPlayed => self.days_played,
        }
    }

    pub fn kills(&self, emotion: EmotionType) -> u64 {
        self.kills_by_type.get(&emotion).copied().unwrap_or(0)
    }

    /// Hit ratio over all recorded shots
    pub fn accuracy(&self) -> f32 {
        if self.shots_fired == 0 {
            0.0
        } else {
            self.shots_hit as f32 / self.shots_fired as f32
        }
    }
}

/// Per-session counters that are not persisted
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionStats {
    /// Shots fired since the last level start
    pub shots_fired: u64,
    /// Shots that hit since the last level start
    pub shots_hit: u64,
    /// Current no-damage streak in whole seconds
    pub no_damage_seconds: u64,
}
