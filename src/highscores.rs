//! High score leaderboard
//!
//! Persisted through the key-value store, keeps the top 10 runs.

use serde::{Deserialize, Serialize};

use crate::persistence::{KeyValueStore, load_json, save_json};

/// Maximum number of high scores to keep
pub const MAX_HIGH_SCORES: usize = 10;

/// A single finished run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HighScoreEntry {
    pub score: u64,
    /// Level reached
    pub level: u32,
    /// Unix timestamp (seconds) when achieved
    pub timestamp: u64,
}

/// High score leaderboard, sorted descending by score
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct HighScores {
    pub entries: Vec<HighScoreEntry>,
}

impl HighScores {
    /// Storage key
    const STORAGE_KEY: &'static str = "emotion_blaster_highscores";

    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Check if a score qualifies for the leaderboard
    pub fn qualifies(&self, score: u64) -> bool {
        if score == 0 {
            return false;
        }
        if self.entries.len() < MAX_HIGH_SCORES {
            return true;
        }
        self.entries.last().map(|e| score > e.score).unwrap_or(true)
    }

    /// Rank a score would achieve (1-indexed, None if it doesn't qualify)
    pub fn potential_rank(&self, score: u64) -> Option<usize> {
        if !self.qualifies(score) {
            return None;
        }
        let rank = self.entries.iter().position(|e| score > e.score);
        Some(rank.unwrap_or(self.entries.len()) + 1)
    }

    /// Insert a run if it qualifies. Returns the rank achieved (1-indexed).
    pub fn add_score(&mut self, score: u64, level: u32, timestamp: u64) -> Option<usize> {
        let rank = self.potential_rank(score)?;
        self.entries.insert(
            rank - 1,
            HighScoreEntry {
                score,
                level,
                timestamp,
            },
        );
        self.entries.truncate(MAX_HIGH_SCORES);
        Some(rank)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn top_score(&self) -> Option<u64> {
        self.entries.first().map(|e| e.score)
    }

    /// Load the leaderboard, starting empty if absent or unreadable
    pub fn load(store: &dyn KeyValueStore) -> Self {
        match load_json::<HighScores>(store, Self::STORAGE_KEY) {
            Ok(Some(mut scores)) => {
                scores.entries.sort_by(|a, b| b.score.cmp(&a.score));
                scores.entries.truncate(MAX_HIGH_SCORES);
                log::info!("Loaded {} high scores", scores.entries.len());
                scores
            }
            Ok(None) => {
                log::info!("No high scores found, starting fresh");
                Self::new()
            }
            Err(e) => {
                log::warn!("Failed to load high scores ({e}), starting fresh");
                Self::new()
            }
        }
    }

    pub fn save(&self, store: &mut dyn KeyValueStore) {
        match save_json(store, Self::STORAGE_KEY, self) {
            Ok(()) => log::info!("High scores saved ({} entries)", self.entries.len()),
            Err(e) => log::error!("Failed to save high scores: {e}"),
        }
    }
}

/// Format a timestamp relative to `now` (both Unix seconds)
pub fn format_date(timestamp: u64, now: u64) -> String {
    let diff_mins = now.saturating_sub(timestamp) / 60;
    let diff_hours = diff_mins / 60;
    let diff_days = diff_hours / 24;

    match (diff_days, diff_hours, diff_mins) {
        (1, _, _) => "Yesterday".to_string(),
        (d, _, _) if d > 1 => format!("{d} days ago"),
        (_, 1, _) => "1 hour ago".to_string(),
        (_, h, _) if h > 1 => format!("{h} hours ago"),
        (_, _, 1) => "1 min ago".to_string(),
        (_, _, m) if m > 1 => format!("{m} mins ago"),
        _ => "Just now".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryStore;

    #[test]
    fn test_zero_never_qualifies() {
        let scores = HighScores::new();
        assert!(!scores.qualifies(0));
        assert!(scores.qualifies(1));
    }

    #[test]
    fn test_add_keeps_descending_order() {
        let mut scores = HighScores::new();
        assert_eq!(scores.add_score(500, 2, 0), Some(1));
        assert_eq!(scores.add_score(900, 4, 0), Some(1));
        assert_eq!(scores.add_score(700, 3, 0), Some(2));
        let ordered: Vec<u64> = scores.entries.iter().map(|e| e.score).collect();
        assert_eq!(ordered, vec![900, 700, 500]);
        assert_eq!(scores.top_score(), Some(900));
    }

    #[test]
    fn test_board_caps_at_ten() {
        let mut scores = HighScores::new();
        for i in 1..=MAX_HIGH_SCORES as u64 {
            scores.add_score(i * 100, 1, 0);
        }
        assert!(!scores.qualifies(100));
        assert_eq!(scores.potential_rank(150), Some(MAX_HIGH_SCORES));
        assert_eq!(scores.add_score(5000, 6, 0), Some(1));
        assert_eq!(scores.entries.len(), MAX_HIGH_SCORES);
        assert_eq!(scores.entries.last().map(|e| e.score), Some(200));
    }

    #[test]
    fn test_load_save_through_store() {
        let mut store = MemoryStore::new();
        assert!(HighScores::load(&store).is_empty());

        let mut scores = HighScores::new();
        scores.add_score(1234, 3, 1_700_000_000);
        scores.save(&mut store);

        let loaded = HighScores::load(&store);
        assert_eq!(loaded.entries, scores.entries);
    }

    #[test]
    fn test_corrupt_board_starts_empty() {
        let mut store = MemoryStore::new();
        store.put("emotion_blaster_highscores", "{not json").unwrap();
        assert!(HighScores::load(&store).is_empty());
    }

    #[test]
    fn test_format_date() {
        let now = 1_000_000;
        assert_eq!(format_date(now - 10, now), "Just now");
        assert_eq!(format_date(now - 60, now), "1 min ago");
        assert_eq!(format_date(now - 300, now), "5 mins ago");
        assert_eq!(format_date(now - 3 * 3600, now), "3 hours ago");
        assert_eq!(format_date(now - 86_400, now), "Yesterday");
        assert_eq!(format_date(now - 4 * 86_400, now), "4 days ago");
    }
}
