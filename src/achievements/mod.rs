//! Achievement system
//!
//! A fixed catalog of milestones, each keyed to a monotonic statistic. The
//! tracker owns the only persistent gameplay state and reports each
//! achievement exactly once, on the call that first pushes its statistic to
//! the goal.

pub mod stats;
pub mod tracker;

pub use stats::{SessionStats, Stat, Statistics};
pub use tracker::{AchievementProgress, AchievementTracker};

use crate::sim::EmotionType;

/// A one-time milestone
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Achievement {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub stat: Stat,
    pub goal: u64,
    /// Coins credited when unlocked
    pub reward: u64,
}

const fn achievement(
    id: &'static str,
    name: &'static str,
    description: &'static str,
    stat: Stat,
    goal: u64,
    reward: u64,
) -> Achievement {
    Achievement {
        id,
        name,
        description,
        stat,
        goal,
        reward,
    }
}

pub const CATALOG: &[Achievement] = &[
    achievement("first_release", "First Release", "Release your first emotion", Stat::EnemiesDefeated, 1, 10),
    achievement("emotion_warrior", "Emotion Warrior", "Release 100 emotions", Stat::EnemiesDefeated, 100, 50),
    achievement("inner_peace", "Inner Peace", "Release 1,000 emotions", Stat::EnemiesDefeated, 1000, 250),
    achievement("anger_slayer", "Anger Slayer", "Release 100 angers", Stat::Kills(EmotionType::Anger), 100, 50),
    achievement("fear_conqueror", "Fear Conqueror", "Release 100 fears", Stat::Kills(EmotionType::Fear), 100, 50),
    achievement("sadness_lifter", "Sadness Lifter", "Release 100 sadnesses", Stat::Kills(EmotionType::Sadness), 100, 50),
    achievement("regret_releaser", "Regret Releaser", "Release 50 regrets", Stat::Kills(EmotionType::Regret), 50, 40),
    achievement("anxiety_soother", "Anxiety Soother", "Release 50 anxieties", Stat::Kills(EmotionType::Anxiety), 50, 40),
    achievement("boss_breaker", "Boss Breaker", "Defeat your first boss", Stat::BossesDefeated, 1, 50),
    achievement("boss_master", "Boss Master", "Defeat 10 bosses", Stat::BossesDefeated, 10, 200),
    achievement("level_climber", "Level Climber", "Reach level 5", Stat::MaxLevel, 5, 30),
    achievement("summit_seeker", "Summit Seeker", "Reach level 10", Stat::MaxLevel, 10, 100),
    achievement("score_chaser", "Score Chaser", "Score 10,000 points in one game", Stat::HighScore, 10_000, 50),
    achievement("score_legend", "Score Legend", "Score 50,000 points in one game", Stat::HighScore, 50_000, 200),
    achievement("coin_collector", "Coin Collector", "Collect 500 coins", Stat::TotalCoins, 500, 25),
    achievement("treasure_keeper", "Treasure Keeper", "Collect 5,000 coins", Stat::TotalCoins, 5000, 100),
    achievement("untouchable", "Untouchable", "Go 60 seconds without taking damage", Stat::MaxNoDamageSeconds, 60, 50),
    achievement("zen_master", "Zen Master", "Go 180 seconds without taking damage", Stat::MaxNoDamageSeconds, 180, 150),
    achievement("perfectionist", "Perfectionist", "Finish a level without missing a shot", Stat::PerfectLevels, 1, 75),
    achievement("sharpshooter", "Sharpshooter", "Land 500 shots", Stat::ShotsHit, 500, 40),
    achievement("dedicated", "Dedicated", "Play 10 games", Stat::GamesPlayed, 10, 30),
    achievement("daily_devotion", "Daily Devotion", "Play on 7 different days", Stat::DaysPlayed, 7, 100),
];

/// Look up a catalog entry by id
pub fn find(id: &str) -> Option<&'static Achievement> {
    CATALOG.iter().find(|a| a.id == id)
}
