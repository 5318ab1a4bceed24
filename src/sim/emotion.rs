//! Emotion taxonomy: per-type stats and affirmation pools

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::movement::MovementPattern;

/// The emotions an enemy can embody
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmotionType {
    Anger,
    Fear,
    Regret,
    Sadness,
    Guilt,
    Shame,
    Anxiety,
    Doubt,
    Envy,
    Loneliness,
    Overwhelm,
}

/// Base stats for one emotion before level and difficulty scaling
#[derive(Debug, Clone, Copy)]
pub struct EmotionStats {
    pub health: u32,
    pub speed: f32,
    pub radius: f32,
    pub pattern: MovementPattern,
    pub points: u64,
    pub coins: u64,
    pub can_shoot: bool,
}

impl EmotionType {
    pub const ALL: [EmotionType; 11] = [
        EmotionType::Anger,
        EmotionType::Fear,
        EmotionType::Regret,
        EmotionType::Sadness,
        EmotionType::Guilt,
        EmotionType::Shame,
        EmotionType::Anxiety,
        EmotionType::Doubt,
        EmotionType::Envy,
        EmotionType::Loneliness,
        EmotionType::Overwhelm,
    ];

    /// Fallback when configuration yields no usable type
    pub const DEFAULT: EmotionType = EmotionType::Anger;

    pub fn as_str(&self) -> &'static str {
        match self {
            EmotionType::Anger => "anger",
            EmotionType::Fear => "fear",
            EmotionType::Regret => "regret",
            EmotionType::Sadness => "sadness",
            EmotionType::Guilt => "guilt",
            EmotionType::Shame => "shame",
            EmotionType::Anxiety => "anxiety",
            EmotionType::Doubt => "doubt",
            EmotionType::Envy => "envy",
            EmotionType::Loneliness => "loneliness",
            EmotionType::Overwhelm => "overwhelm",
        }
    }

    /// Look up a type by key; unknown keys map to [`EmotionType::DEFAULT`]
    pub fn from_key(key: &str) -> Self {
        Self::ALL
            .iter()
            .copied()
            .find(|e| e.as_str().eq_ignore_ascii_case(key))
            .unwrap_or_else(|| {
                log::warn!("Unknown emotion type {key:?}, using {}", Self::DEFAULT.as_str());
                Self::DEFAULT
            })
    }

    pub fn stats(&self) -> EmotionStats {
        use MovementPattern::*;
        let (health, speed, radius, pattern, points, coins, can_shoot) = match self {
            EmotionType::Anger => (2, 2.5, 16.0, Rush, 100, 2, true),
            EmotionType::Fear => (1, 3.0, 14.0, Zigzag, 80, 1, false),
            EmotionType::Regret => (3, 1.2, 18.0, Slow, 120, 2, false),
            EmotionType::Sadness => (2, 1.5, 16.0, Wave, 90, 1, false),
            EmotionType::Guilt => (3, 1.8, 17.0, Orbit, 130, 2, false),
            EmotionType::Shame => (4, 1.0, 20.0, Slow, 150, 3, false),
            EmotionType::Anxiety => (1, 3.5, 13.0, Erratic, 110, 2, false),
            EmotionType::Doubt => (2, 2.2, 15.0, Zigzag, 100, 2, false),
            EmotionType::Envy => (3, 2.0, 17.0, Spiral, 140, 3, true),
            EmotionType::Loneliness => (2, 1.6, 16.0, Wave, 120, 2, false),
            EmotionType::Overwhelm => (5, 1.4, 24.0, Rush, 200, 4, true),
        };
        EmotionStats {
            health,
            speed,
            radius,
            pattern,
            points,
            coins,
            can_shoot,
        }
    }

    /// Affirmations that can replace this emotion when it is released
    pub fn affirmations(&self) -> &'static [&'static str] {
        match self {
            EmotionType::Anger => &[
                "I choose calm over chaos.",
                "I release what I cannot control.",
                "My peace is my power.",
            ],
            EmotionType::Fear => &[
                "I am safe in this moment.",
                "Courage grows every time I act.",
                "I trust myself to handle what comes.",
            ],
            EmotionType::Regret => &[
                "I learn and I let go.",
                "My past does not define my future.",
                "Today is a fresh start.",
            ],
            EmotionType::Sadness => &[
                "This feeling will pass.",
                "I allow myself to heal.",
                "Joy is finding its way back to me.",
            ],
            EmotionType::Guilt => &[
                "I forgive myself.",
                "I did the best I could with what I knew.",
                "I am allowed to move forward.",
            ],
            EmotionType::Shame => &[
                "I am worthy exactly as I am.",
                "My mistakes make me human, not less.",
            ],
            EmotionType::Anxiety => &[
                "I breathe in calm, I breathe out worry.",
                "One step at a time is enough.",
                "I am grounded and present.",
            ],
            EmotionType::Doubt => &[
                "I believe in my abilities.",
                "I have done hard things before.",
            ],
            EmotionType::Envy => &[
                "My path is my own.",
                "There is enough good for everyone.",
            ],
            EmotionType::Loneliness => &[
                "I am connected to those who care for me.",
                "I am good company for myself.",
            ],
            EmotionType::Overwhelm => &[
                "I can only do one thing at a time, and that is enough.",
                "I give myself permission to rest.",
            ],
        }
    }

    /// Draw one affirmation uniformly from this type's pool
    pub fn pick_affirmation<R: Rng + ?Sized>(&self, rng: &mut R) -> &'static str {
        let pool = self.affirmations();
        if pool.is_empty() {
            return BOSS_AFFIRMATION;
        }
        pool[rng.random_range(0..pool.len())]
    }
}

/// The single line every boss leaves behind
pub const BOSS_AFFIRMATION: &str = "I am stronger than any emotion.";

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_every_type_has_affirmations() {
        for emotion in EmotionType::ALL {
            assert!(!emotion.affirmations().is_empty(), "{emotion:?}");
        }
    }

    #[test]
    fn test_pick_affirmation_comes_from_pool() {
        let mut rng = Pcg32::seed_from_u64(3);
        for _ in 0..20 {
            let line = EmotionType::Fear.pick_affirmation(&mut rng);
            assert!(EmotionType::Fear.affirmations().contains(&line));
        }
    }

    #[test]
    fn test_unknown_key_falls_back() {
        assert_eq!(EmotionType::from_key("ENVY"), EmotionType::Envy);
        assert_eq!(EmotionType::from_key("boredom"), EmotionType::DEFAULT);
    }

    #[test]
    fn test_serde_uses_lowercase_keys() {
        let json = serde_json::to_string(&EmotionType::Loneliness).unwrap();
        assert_eq!(json, "\"loneliness\"");
    }
}
