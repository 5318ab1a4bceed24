//! Game settings and preferences
//!
//! Persisted separately from statistics through the same key-value store.

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::persistence::{KeyValueStore, load_json, save_json};

/// Quality preset levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum QualityPreset {
    Low,
    #[default]
    Medium,
    High,
}

impl QualityPreset {
    pub fn as_str(&self) -> &'static str {
        match self {
            QualityPreset::Low => "Low",
            QualityPreset::Medium => "Medium",
            QualityPreset::High => "High",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "low" => Some(QualityPreset::Low),
            "medium" | "med" => Some(QualityPreset::Medium),
            "high" => Some(QualityPreset::High),
            _ => None,
        }
    }

    /// Maximum live particles for this preset
    pub fn max_particles(&self) -> usize {
        match self {
            QualityPreset::Low => 60,
            QualityPreset::Medium => 250,
            QualityPreset::High => 800,
        }
    }

    /// Maximum floating affirmations on screen at once
    pub fn max_affirmations(&self) -> usize {
        match self {
            QualityPreset::Low => 3,
            QualityPreset::Medium => 6,
            QualityPreset::High => 12,
        }
    }
}

/// Game settings/preferences
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Particle quality preset
    pub quality: QualityPreset,

    // === Playfield ===
    pub playfield_width: f32,
    pub playfield_height: f32,

    // === Player ===
    /// Health at the start of a run
    pub starting_health: u32,
    /// Fire automatically on cooldown (otherwise only on the fire trigger)
    pub auto_fire: bool,
    /// Per-frame easing factor toward the movement target (0-1)
    pub movement_smoothing: f32,

    // === Pacing ===
    /// Live enemy floor the keep-flowing rule tops up toward (0 = level default)
    pub min_enemies: u32,
    /// Frames between keep-flowing checks
    pub keep_flowing_interval: u32,

    // === Visual Effects ===
    /// Screen shake on damage
    pub screen_shake: bool,
    /// Particle effects (hits, kills)
    pub particles: bool,

    // === Accessibility ===
    /// Reduced motion (no shake)
    pub reduced_motion: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            quality: QualityPreset::Medium,

            playfield_width: PLAYFIELD_WIDTH,
            playfield_height: PLAYFIELD_HEIGHT,

            starting_health: PLAYER_MAX_HEALTH,
            auto_fire: true,
            movement_smoothing: PLAYER_SMOOTHING,

            min_enemies: 0,
            keep_flowing_interval: 90,

            screen_shake: true,
            particles: true,

            reduced_motion: false,
        }
    }
}

impl Settings {
    /// Storage key
    const STORAGE_KEY: &'static str = "emotion_blaster_settings";

    /// Create settings from a quality preset
    pub fn from_preset(preset: QualityPreset) -> Self {
        Self {
            quality: preset,
            ..Self::default()
        }
    }

    /// Effective screen shake (respects reduced_motion)
    pub fn effective_screen_shake(&self) -> bool {
        self.screen_shake && !self.reduced_motion
    }

    /// Effective particle count cap
    pub fn max_particles(&self) -> usize {
        if !self.particles {
            0
        } else {
            self.quality.max_particles()
        }
    }

    /// Replace out-of-range values with defaults
    pub fn sanitized(mut self) -> Self {
        let defaults = Self::default();
        if !(self.playfield_width.is_finite() && self.playfield_width > 0.0) {
            log::warn!("Invalid playfield width {}, using default", self.playfield_width);
            self.playfield_width = defaults.playfield_width;
        }
        if !(self.playfield_height.is_finite() && self.playfield_height > 0.0) {
            log::warn!("Invalid playfield height {}, using default", self.playfield_height);
            self.playfield_height = defaults.playfield_height;
        }
        if self.starting_health == 0 {
            self.starting_health = defaults.starting_health;
        }
        if !(self.movement_smoothing > 0.0 && self.movement_smoothing <= 1.0) {
            self.movement_smoothing = defaults.movement_smoothing;
        }
        if self.keep_flowing_interval == 0 {
            self.keep_flowing_interval = defaults.keep_flowing_interval;
        }
        self
    }

    /// Load settings from the store, falling back to defaults
    pub fn load(store: &dyn KeyValueStore) -> Self {
        match load_json::<Settings>(store, Self::STORAGE_KEY) {
            Ok(Some(settings)) => {
                log::info!("Loaded settings");
                settings.sanitized()
            }
            Ok(None) => {
                log::info!("Using default settings");
                Self::default()
            }
            Err(e) => {
                log::warn!("Failed to load settings ({e}), using defaults");
                Self::default()
            }
        }
    }

    /// Save settings to the store
    pub fn save(&self, store: &mut dyn KeyValueStore) {
        match save_json(store, Self::STORAGE_KEY, self) {
            Ok(()) => log::info!("Settings saved"),
            Err(e) => log::error!("Failed to save settings: {e}"),
        }
    }
}

/// Purchased movement/fire upgrades applied for a run
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Upgrades {
    /// Fractional bonus to movement speed (0.25 = 25% faster)
    pub speed_bonus: f32,
    /// Fractional reduction of the fire interval (0.5 = twice as often)
    pub fire_rate_bonus: f32,
}

impl Upgrades {
    /// Movement speed multiplier, never below 1.0
    pub fn speed_multiplier(&self) -> f32 {
        if self.speed_bonus.is_finite() {
            1.0 + self.speed_bonus.max(0.0)
        } else {
            1.0
        }
    }

    /// Frames between shots after applying the fire-rate bonus
    pub fn fire_interval(&self) -> u32 {
        let bonus = if self.fire_rate_bonus.is_finite() {
            self.fire_rate_bonus.clamp(0.0, 0.9)
        } else {
            0.0
        };
        let interval = (BASE_FIRE_INTERVAL as f32 * (1.0 - bonus)).round() as u32;
        interval.max(MIN_FIRE_INTERVAL)
    }
}
