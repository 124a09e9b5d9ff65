//! Data-driven game balance
//!
//! Every balance constant lives here, including the enemy radius floor and
//! large-enemy threshold used for damage and scoring. Fixed body sizes are in
//! `crate::consts`. Persisted as JSON in the key-value store; missing fields
//! take their defaults so older or partial documents keep working.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::platform::storage::{KeyValueStore, StoreError};

/// Errors from parsing or validating a tuning document
#[derive(Debug, Error)]
pub enum TuningError {
    #[error("invalid tuning document: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("`{field}` must be positive (got {value})")]
    NonPositive { field: &'static str, value: f64 },
    #[error("`{field}` must be within {min}..={max} (got {value})")]
    OutOfRange {
        field: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },
}

/// Gameplay tuning values
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Spawning ===
    /// Delay between regular enemy spawns
    pub enemy_spawn_interval_ms: f64,
    /// Delay between upgrade spawns
    pub upgrade_spawn_interval_ms: f64,
    /// Delay between boss spawns (each one halves the other two intervals)
    pub boss_interval_ms: f64,
    /// Escalation never pushes a spawn interval below this
    pub min_spawn_interval_ms: f64,

    // === Upgrades ===
    /// How long a collected upgrade stays active
    pub upgrade_duration_ms: f64,
    /// Minimum time between automatic shots while fire is held
    pub auto_shoot_interval_ms: f64,
    /// Angular offset of the side shots (radians)
    pub triple_shot_spread: f32,

    // === Movement (units per frame) ===
    pub player_speed: f32,
    pub projectile_speed: f32,
    pub enemy_speed: f32,
    pub boss_speed: f32,
    /// Player wraps around the arena edges instead of leaving it
    pub wrap_around: bool,

    // === Damage & scoring ===
    /// Radius removed per hit (doubled by Double Damage & Points)
    pub base_damage: f32,
    /// Enemies that would shrink to or below this radius are destroyed
    pub enemy_radius_floor: f32,
    /// Enemies above this radius award `large_enemy_points`
    pub large_enemy_radius: f32,
    pub large_enemy_points: u64,
    pub small_enemy_points: u64,

    // === Visuals ===
    /// Alpha of the per-frame fade fill (lower = longer trails)
    pub trail_fade_alpha: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            enemy_spawn_interval_ms: 500.0,
            upgrade_spawn_interval_ms: 10_000.0,
            boss_interval_ms: 150_000.0,
            min_spawn_interval_ms: 50.0,

            upgrade_duration_ms: 10_000.0,
            auto_shoot_interval_ms: 80.0,
            triple_shot_spread: 0.1,

            player_speed: 2.0,
            projectile_speed: 5.0,
            enemy_speed: 1.0,
            boss_speed: 0.5,
            wrap_around: false,

            base_damage: 10.0,
            enemy_radius_floor: 10.0,
            large_enemy_radius: 20.0,
            large_enemy_points: 100,
            small_enemy_points: 250,

            trail_fade_alpha: 0.1,
        }
    }
}

impl Tuning {
    /// Store key
    pub const STORAGE_KEY: &'static str = "orb_siege_tuning";

    /// Parse and validate a JSON document
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Reject values that would stall or break the simulation
    pub fn validate(&self) -> Result<(), TuningError> {
        let positive: [(&'static str, f64); 13] = [
            ("enemy_spawn_interval_ms", self.enemy_spawn_interval_ms),
            ("upgrade_spawn_interval_ms", self.upgrade_spawn_interval_ms),
            ("boss_interval_ms", self.boss_interval_ms),
            ("min_spawn_interval_ms", self.min_spawn_interval_ms),
            ("upgrade_duration_ms", self.upgrade_duration_ms),
            ("auto_shoot_interval_ms", self.auto_shoot_interval_ms),
            ("player_speed", f64::from(self.player_speed)),
            ("projectile_speed", f64::from(self.projectile_speed)),
            ("enemy_speed", f64::from(self.enemy_speed)),
            ("boss_speed", f64::from(self.boss_speed)),
            ("base_damage", f64::from(self.base_damage)),
            ("enemy_radius_floor", f64::from(self.enemy_radius_floor)),
            ("large_enemy_radius", f64::from(self.large_enemy_radius)),
        ];
        for (field, value) in positive {
            if value.is_nan() || value <= 0.0 {
                return Err(TuningError::NonPositive { field, value });
            }
        }

        // A zero-alpha fade never clears the canvas
        let ranged: [(&'static str, f64, f64, f64); 2] = [
            ("trail_fade_alpha", f64::from(self.trail_fade_alpha), f64::MIN_POSITIVE, 1.0),
            (
                "triple_shot_spread",
                f64::from(self.triple_shot_spread),
                0.0,
                std::f64::consts::PI,
            ),
        ];
        for (field, value, min, max) in ranged {
            if !(min..=max).contains(&value) {
                return Err(TuningError::OutOfRange {
                    field,
                    value,
                    min,
                    max,
                });
            }
        }
        Ok(())
    }

    /// Load from the store, falling back to defaults on any problem
    pub fn load(store: &dyn KeyValueStore) -> Self {
        match store.get(Self::STORAGE_KEY) {
            Some(json) => match Self::from_json(&json) {
                Ok(tuning) => {
                    log::info!("Loaded tuning overrides");
                    tuning
                }
                Err(e) => {
                    log::warn!("Ignoring stored tuning: {}", e);
                    Self::default()
                }
            },
            None => {
                log::info!("Using default tuning");
                Self::default()
            }
        }
    }

    pub fn save(&self, store: &mut dyn KeyValueStore) -> Result<(), StoreError> {
        let json = serde_json::to_string(self)?;
        store.set(Self::STORAGE_KEY, &json)
    }
}
