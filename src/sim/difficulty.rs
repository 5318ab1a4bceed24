//! Dynamic difficulty adjustment
//!
//! A bounded multiplier driven by the mean of the three most recent
//! performance samples. Scaling functions are pure; callers decide when to
//! apply them.

use std::collections::VecDeque;

/// Samples kept in the rolling history
pub const HISTORY_SIZE: usize = 10;
/// Samples averaged for each adjustment
pub const WINDOW: usize = 3;
pub const MIN_MULTIPLIER: f32 = 0.5;
pub const MAX_MULTIPLIER: f32 = 2.0;
const STEP: f32 = 0.1;
const RELAX_STEP: f32 = 0.05;
const HIGH_WATER: f32 = 0.8;
const LOW_WATER: f32 = 0.3;

#[derive(Debug, Clone)]
pub struct DifficultyScaler {
    history: VecDeque<f32>,
    multiplier: f32,
}

impl Default for DifficultyScaler {
    fn default() -> Self {
        Self::new()
    }
}

impl DifficultyScaler {
    pub fn new() -> Self {
        Self {
            history: VecDeque::with_capacity(HISTORY_SIZE),
            multiplier: 1.0,
        }
    }

    pub fn multiplier(&self) -> f32 {
        self.multiplier
    }

    pub fn history(&self) -> impl Iterator<Item = f32> + '_ {
        self.history.iter().copied()
    }

    /// Record a performance sample in [0, 1] and adjust the multiplier.
    ///
    /// Out-of-range samples are clamped; NaN samples are ignored.
    pub fn record(&mut self, sample: f32) {
        if sample.is_nan() {
            log::warn!("Ignoring NaN performance sample");
            return;
        }
        if self.history.len() == HISTORY_SIZE {
            self.history.pop_front();
        }
        self.history.push_back(sample.clamp(0.0, 1.0));

        if self.history.len() >= WINDOW {
            self.adjust();
        }
    }

    fn adjust(&mut self) {
        let recent: f32 = self.history.iter().rev().take(WINDOW).sum::<f32>() / WINDOW as f32;

        self.multiplier = if recent >= HIGH_WATER {
            (self.multiplier + STEP).min(MAX_MULTIPLIER)
        } else if recent <= LOW_WATER {
            (self.multiplier - STEP).max(MIN_MULTIPLIER)
        } else if self.multiplier > 1.0 {
            (self.multiplier - RELAX_STEP).max(1.0)
        } else {
            (self.multiplier + RELAX_STEP).min(1.0)
        };
        log::debug!("Difficulty multiplier {:.2} (recent {:.2})", self.multiplier, recent);
    }

    /// Forget history and return to neutral
    pub fn reset(&mut self) {
        self.history.clear();
        self.multiplier = 1.0;
    }

    /// Enemy speed scales with the multiplier
    pub fn scale_speed(&self, base: f32) -> f32 {
        base * self.multiplier
    }

    /// Spawn interval shrinks as difficulty rises, never below `floor` frames
    pub fn scale_spawn_rate(&self, base: u32, floor: u32) -> u32 {
        ((base as f32 / self.multiplier).round() as u32).max(floor)
    }

    /// Enemy health scales with the multiplier, at least 1
    pub fn scale_health(&self, base: u32) -> u32 {
        ((base as f32 * self.multiplier).round() as u32).max(1)
    }

    /// Time budgets shrink as difficulty rises, at least one frame
    pub fn scale_time_limit(&self, base: u32) -> u32 {
        ((base as f32 / self.multiplier).round() as u32).max(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_needs_three_samples() {
        let mut scaler = DifficultyScaler::new();
        scaler.record(1.0);
        scaler.record(1.0);
        assert_eq!(scaler.multiplier(), 1.0);
        scaler.record(1.0);
        assert!((scaler.multiplier() - 1.1).abs() < 1e-5);
    }

    #[test]
    fn test_poor_play_eases_off() {
        let mut scaler = DifficultyScaler::new();
        for _ in 0..3 {
            scaler.record(0.1);
        }
        assert!((scaler.multiplier() - 0.9).abs() < 1e-5);
    }

    #[test]
    fn test_middling_play_relaxes_without_overshoot() {
        let mut scaler = DifficultyScaler::new();
        for _ in 0..4 {
            scaler.record(1.0);
        }
        // 1.0 -> 1.1 -> 1.2
        assert!((scaler.multiplier() - 1.2).abs() < 1e-5);

        // windows 0.83 (up), 0.67 (relax), 0.5 (relax)
        for _ in 0..3 {
            scaler.record(0.5);
        }
        assert!((scaler.multiplier() - 1.2).abs() < 1e-5);
        for _ in 0..20 {
            scaler.record(0.5);
        }
        assert_eq!(scaler.multiplier(), 1.0);
    }

    #[test]
    fn test_relax_from_below() {
        let mut scaler = DifficultyScaler::new();
        for _ in 0..3 {
            scaler.record(0.0);
        }
        assert!((scaler.multiplier() - 0.9).abs() < 1e-5);
        for _ in 0..10 {
            scaler.record(0.55);
        }
        assert_eq!(scaler.multiplier(), 1.0);
    }

    #[test]
    fn test_history_bounded() {
        let mut scaler = DifficultyScaler::new();
        for _ in 0..25 {
            scaler.record(0.5);
        }
        assert_eq!(scaler.history().count(), HISTORY_SIZE);
    }

    #[test]
    fn test_nan_ignored_and_out_of_range_clamped() {
        let mut scaler = DifficultyScaler::new();
        scaler.record(f32::NAN);
        assert_eq!(scaler.history().count(), 0);
        scaler.record(7.0);
        scaler.record(-3.0);
        let samples: Vec<f32> = scaler.history().collect();
        assert_eq!(samples, vec![1.0, 0.0]);
    }

    #[test]
    fn test_scaling_functions() {
        let mut scaler = DifficultyScaler::new();
        assert_eq!(scaler.scale_spawn_rate(60, 25), 60);
        for _ in 0..20 {
            scaler.record(1.0);
        }
        assert_eq!(scaler.multiplier(), MAX_MULTIPLIER);
        assert_eq!(scaler.scale_spawn_rate(60, 25), 30);
        assert_eq!(scaler.scale_spawn_rate(40, 25), 25);
        assert_eq!(scaler.scale_health(3), 6);
        assert_eq!(scaler.scale_time_limit(600), 300);
        assert!((scaler.scale_speed(2.0) - 4.0).abs() < 1e-5);

        scaler.reset();
        assert_eq!(scaler.multiplier(), 1.0);
        assert_eq!(scaler.scale_health(1), 1);
    }

    proptest! {
        #[test]
        fn prop_multiplier_stays_bounded(samples in proptest::collection::vec(-2.0f32..3.0, 0..200)) {
            let mut scaler = DifficultyScaler::new();
            for s in samples {
                scaler.record(s);
                prop_assert!(scaler.multiplier() >= MIN_MULTIPLIER);
                prop_assert!(scaler.multiplier() <= MAX_MULTIPLIER);
            }
        }

        #[test]
        fn prop_long_streaks_saturate(high in proptest::bool::ANY, len in 15usize..100) {
            let mut scaler = DifficultyScaler::new();
            for _ in 0..len {
                scaler.record(if high { 1.0 } else { 0.0 });
            }
            let expected = if high { MAX_MULTIPLIER } else { MIN_MULTIPLIER };
            prop_assert!((scaler.multiplier() - expected).abs() < 1e-4);
        }
    }
}
