//! Spawn and level orchestration
//!
//! Decides what enters the playfield each frame. Counted spawns draw down the
//! level budget (`base_enemy_count`, plus one for the boss on boss levels);
//! keep-flowing spawns top the live count up and are never counted.

use rand::Rng;
use rand_pcg::Pcg32;

use super::difficulty::DifficultyScaler;
use super::emotion::EmotionType;

/// Spawn cadence never drops below this many frames
pub const MIN_SPAWN_RATE: u32 = 25;
/// Frames after level start before the boss may appear (3 s)
pub const BOSS_SPAWN_DELAY: u64 = 180;
/// Base time budget per level before difficulty scaling (frames)
pub const BASE_TIME_LIMIT: u32 = 60 * 60;
/// Boss levels come every this many levels
pub const BOSS_LEVEL_INTERVAL: u32 = 3;

/// What to put on the playfield this frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpawnDecision {
    /// Counted against the level budget
    Enemy(EmotionType),
    /// Counted against the level budget, always the last counted spawn
    Boss(EmotionType),
    /// Keep-flowing top-up, not counted
    Filler(EmotionType),
}

impl SpawnDecision {
    pub fn emotion(&self) -> EmotionType {
        match self {
            SpawnDecision::Enemy(e) | SpawnDecision::Boss(e) | SpawnDecision::Filler(e) => *e,
        }
    }
}

/// Weighted emotion table for a band of levels
pub fn weight_table(level: u32) -> &'static [(EmotionType, u32)] {
    use EmotionType::*;
    match level {
        0..=3 => &[(Anger, 25), (Fear, 25), (Sadness, 25), (Regret, 25)],
        4..=6 => &[
            (Anger, 25),
            (Fear, 25),
            (Sadness, 15),
            (Regret, 15),
            (Guilt, 10),
            (Anxiety, 10),
        ],
        _ => &[
            (Anger, 12),
            (Fear, 12),
            (Sadness, 11),
            (Regret, 11),
            (Guilt, 10),
            (Anxiety, 10),
            (Doubt, 9),
            (Shame, 8),
            (Envy, 7),
            (Loneliness, 5),
            (Overwhelm, 5),
        ],
    }
}

/// Uniform draw over the declared weights. A zero-sum table yields the default type.
pub fn pick_weighted<R: Rng + ?Sized>(table: &[(EmotionType, u32)], rng: &mut R) -> EmotionType {
    let total: u32 = table.iter().map(|(_, w)| *w).sum();
    if total == 0 {
        log::warn!("Emotion weight table sums to zero, using default");
        return EmotionType::DEFAULT;
    }
    let mut roll = rng.random_range(0..total);
    for &(emotion, weight) in table {
        if roll < weight {
            return emotion;
        }
        roll -= weight;
    }
    EmotionType::DEFAULT
}

/// Per-level spawn orchestration
#[derive(Debug, Clone)]
pub struct LevelManager {
    pub level: u32,
    /// Regular enemies budgeted for this level
    pub base_enemy_count: u32,
    /// Counted spawns so far (regular + boss)
    pub enemies_spawned: u32,
    /// Frames between counted spawns
    pub spawn_rate: u32,
    /// Live enemy floor the keep-flowing rule tops up toward
    pub min_enemies: u32,
    /// Frames between keep-flowing checks
    pub keep_flowing_interval: u32,
    /// Time budget for the level (frames)
    pub time_limit: u32,
    boss_spawned: bool,
    /// Frames since the level started
    elapsed: u64,
    last_spawn: u64,
    last_top_up: u64,
}

impl LevelManager {
    pub fn new(level: u32) -> Self {
        let level = level.max(1);
        Self {
            level,
            base_enemy_count: Self::base_enemy_count_for(level),
            enemies_spawned: 0,
            spawn_rate: Self::spawn_rate_for(level),
            min_enemies: Self::min_enemies_for(level),
            keep_flowing_interval: 90,
            time_limit: BASE_TIME_LIMIT,
            boss_spawned: false,
            elapsed: 0,
            last_spawn: 0,
            last_top_up: 0,
        }
    }

    /// Build a level with the difficulty scaler applied to cadence and time budget
    pub fn with_difficulty(level: u32, scaler: &DifficultyScaler) -> Self {
        let mut manager = Self::new(level);
        manager.spawn_rate = scaler.scale_spawn_rate(manager.spawn_rate, MIN_SPAWN_RATE);
        manager.time_limit = scaler.scale_time_limit(BASE_TIME_LIMIT);
        manager
    }

    pub fn base_enemy_count_for(level: u32) -> u32 {
        5 + level * 2
    }

    pub fn spawn_rate_for(level: u32) -> u32 {
        90u32.saturating_sub(level * 5).max(MIN_SPAWN_RATE)
    }

    pub fn min_enemies_for(level: u32) -> u32 {
        (1 + level).min(6)
    }

    pub fn is_boss_level(&self) -> bool {
        self.level % BOSS_LEVEL_INTERVAL == 0
    }

    /// Total counted spawns for the level
    pub fn total_enemies(&self) -> u32 {
        self.base_enemy_count + u32::from(self.is_boss_level())
    }

    pub fn budget_exhausted(&self) -> bool {
        self.enemies_spawned >= self.total_enemies()
    }

    pub fn boss_spawned(&self) -> bool {
        self.boss_spawned
    }

    pub fn elapsed_frames(&self) -> u64 {
        self.elapsed
    }

    /// All counted enemies spawned and none left alive
    pub fn is_level_complete(&self, live_enemies: usize) -> bool {
        self.budget_exhausted() && live_enemies == 0
    }

    /// Advance one frame and return this frame's spawns
    pub fn update(&mut self, live_enemies: usize, rng: &mut Pcg32) -> Vec<SpawnDecision> {
        self.elapsed += 1;
        let mut spawns = Vec::new();

        if self.enemies_spawned < self.base_enemy_count {
            if self.elapsed - self.last_spawn >= self.spawn_rate as u64 {
                self.last_spawn = self.elapsed;
                self.enemies_spawned += 1;
                spawns.push(SpawnDecision::Enemy(self.pick_emotion(rng)));
            }
        } else if self.is_boss_level()
            && !self.boss_spawned
            && self.elapsed >= BOSS_SPAWN_DELAY
        {
            self.boss_spawned = true;
            self.enemies_spawned += 1;
            log::info!("Level {}: boss incoming", self.level);
            spawns.push(SpawnDecision::Boss(self.pick_emotion(rng)));
        }

        if !self.budget_exhausted()
            && self.elapsed - self.last_top_up >= self.keep_flowing_interval as u64
        {
            self.last_top_up = self.elapsed;
            let live = live_enemies + spawns.len();
            let floor = self.min_enemies.min(self.total_enemies()) as usize;
            for _ in live..floor {
                spawns.push(SpawnDecision::Filler(self.pick_emotion(rng)));
            }
        }

        spawns
    }

    fn pick_emotion(&self, rng: &mut Pcg32) -> EmotionType {
        pick_weighted(weight_table(self.level), rng)
    }
}
