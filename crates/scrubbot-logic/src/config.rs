//! Session configuration: every tunable constant of a cleaning session.
//!
//! All sections deserialize with defaults, so a JSON file only needs the
//! keys it overrides:
//!
//! ```
//! use scrubbot_logic::config::SessionConfig;
//!
//! let cfg = SessionConfig::from_json_str(r#"{ "capacity": { "max_units": 4 } }"#).unwrap();
//! assert_eq!(cfg.capacity.max_units, 4);
//! assert_eq!(cfg.surface.resolution, 512);
//! ```
//!
//! Durations are written in seconds and converted to simulation ticks with
//! [`SessionConfig::ticks`].

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while loading or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("surface resolution must be positive")]
    ZeroResolution,
    #[error("tick rate must be positive")]
    ZeroTickRate,
    #[error("unit threshold must be positive and finite, got {0}")]
    InvalidThreshold(f64),
    #[error("max capacity must be at least 1")]
    ZeroCapacity,
    #[error("hit limit must be at least 1")]
    ZeroHitLimit,
    #[error("max health must be at least 1")]
    ZeroHealth,
    #[error("{name} must be finite and non-negative, got {value}")]
    InvalidDuration { name: &'static str, value: f32 },
    #[error("speed `{name}` must be finite and non-negative, got {value}")]
    InvalidSpeed { name: &'static str, value: f32 },
    #[error("bitmap {width}x{height} needs {expected} bytes, got {found}")]
    BitmapSize {
        width: u32,
        height: u32,
        expected: usize,
        found: usize,
    },
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Json(#[from] serde_json::Error),
}

/// Which penalty wins when the bag is full and the agent is also slowed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpeedPrecedence {
    /// Full bag speed applies; the pickup slowdown only matters when not full.
    #[default]
    FullFirst,
    /// Pickup slowdown applies even when the bag is full.
    SlowedFirst,
}

/// What happens to the surface when the probe passes over it with a full bag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CleaningWhenFull {
    /// No stroke is made at all.
    #[default]
    Blocked,
    /// The surface is still cleared and scored, but no capacity is gained.
    VisualOnly,
}

/// How a pickup that lands while already slowed is timed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SlowRetrigger {
    /// Each pickup restarts the slowdown; older timers are stale.
    #[default]
    Sequenced,
    /// Every pickup schedules its own timer and the first one to fire clears
    /// the slowdown, even when a later pickup is still "active".
    Legacy,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SurfaceConfig {
    pub resolution: u32,
    pub brush_radius: u32,
    /// World-space floor rectangle mapped onto the canvas: min corner.
    pub floor_min: [f32; 2],
    /// World-space floor rectangle mapped onto the canvas: max corner.
    pub floor_max: [f32; 2],
}

impl Default for SurfaceConfig {
    fn default() -> Self {
        Self {
            resolution: 512,
            brush_radius: 15,
            floor_min: [-25.0, -25.0],
            floor_max: [25.0, 25.0],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CleaningConfig {
    /// Cleaned pixels per capacity unit.
    pub unit_threshold: f64,
    pub when_full: CleaningWhenFull,
    /// Seconds the cleaning indicator stays lit after the last stroke.
    pub activity_linger: f32,
}

impl Default for CleaningConfig {
    fn default() -> Self {
        Self {
            unit_threshold: 500.0,
            when_full: CleaningWhenFull::Blocked,
            activity_linger: 0.2,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CapacityConfig {
    pub max_units: u32,
    /// Units at which the HUD starts pointing at the disposal zone.
    pub hint_threshold: u32,
}

impl Default for CapacityConfig {
    fn default() -> Self {
        Self {
            max_units: 10,
            hint_threshold: 5,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConditionConfig {
    pub hit_limit: u32,
    pub broken_secs: f32,
    pub slow_secs: f32,
    pub dash_secs: f32,
    pub dash_cooldown_secs: f32,
    pub empty_secs: f32,
    pub scan_secs: f32,
    pub scan_cooldown_secs: f32,
    pub slow_retrigger: SlowRetrigger,
}

impl Default for ConditionConfig {
    fn default() -> Self {
        Self {
            hit_limit: 3,
            broken_secs: 5.0,
            slow_secs: 1.0,
            dash_secs: 0.25,
            dash_cooldown_secs: 2.0,
            empty_secs: 5.5,
            scan_secs: 5.0,
            scan_cooldown_secs: 10.0,
            slow_retrigger: SlowRetrigger::Sequenced,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpeedConfig {
    pub base: f32,
    pub full: f32,
    pub slowed: f32,
    pub dash: f32,
    pub precedence: SpeedPrecedence,
}

impl Default for SpeedConfig {
    fn default() -> Self {
        Self {
            base: 10.0,
            full: 5.0,
            slowed: 2.0,
            dash: 25.0,
            precedence: SpeedPrecedence::FullFirst,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PickupConfig {
    pub dust_score: i64,
    pub dust_capacity: u32,
    pub obstacle_penalty: i64,
}

impl Default for PickupConfig {
    fn default() -> Self {
        Self {
            dust_score: 20,
            dust_capacity: 1,
            obstacle_penalty: 50,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HealthConfig {
    pub max_health: u32,
    pub death_delay_secs: f32,
}

impl Default for HealthConfig {
    fn default() -> Self {
        Self {
            max_health: 10,
            death_delay_secs: 5.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ObjectiveConfig {
    pub dust_required: u32,
    pub require_weapon: bool,
}

impl Default for ObjectiveConfig {
    fn default() -> Self {
        Self {
            dust_required: 20,
            require_weapon: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScatterConfig {
    pub count: u32,
    pub center: [f32; 2],
    pub radius: f32,
    pub dust_radius: f32,
    pub max_attempts: u32,
    pub seed: u64,
}

impl Default for ScatterConfig {
    fn default() -> Self {
        Self {
            count: 10,
            center: [0.0, 0.0],
            radius: 20.0,
            dust_radius: 0.5,
            max_attempts: 50,
            seed: 42,
        }
    }
}

/// Complete configuration for one session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Simulation ticks per second.
    pub tick_rate: u32,
    pub surface: SurfaceConfig,
    pub cleaning: CleaningConfig,
    pub capacity: CapacityConfig,
    pub conditions: ConditionConfig,
    pub speed: SpeedConfig,
    pub pickups: PickupConfig,
    pub health: HealthConfig,
    pub objectives: ObjectiveConfig,
    pub scatter: ScatterConfig,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            tick_rate: 60,
            surface: SurfaceConfig::default(),
            cleaning: CleaningConfig::default(),
            capacity: CapacityConfig::default(),
            conditions: ConditionConfig::default(),
            speed: SpeedConfig::default(),
            pickups: PickupConfig::default(),
            health: HealthConfig::default(),
            objectives: ObjectiveConfig::default(),
            scatter: ScatterConfig::default(),
        }
    }
}

impl SessionConfig {
    /// Parse and validate a JSON document.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let cfg: Self = serde_json::from_str(json)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Read, parse and validate a JSON file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    /// Reject values the simulation cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.tick_rate == 0 {
            return Err(ConfigError::ZeroTickRate);
        }
        if self.surface.resolution == 0 {
            return Err(ConfigError::ZeroResolution);
        }
        let threshold = self.cleaning.unit_threshold;
        if !threshold.is_finite() || threshold <= 0.0 {
            return Err(ConfigError::InvalidThreshold(threshold));
        }
        if self.capacity.max_units == 0 {
            return Err(ConfigError::ZeroCapacity);
        }
        if self.conditions.hit_limit == 0 {
            return Err(ConfigError::ZeroHitLimit);
        }
        if self.health.max_health == 0 {
            return Err(ConfigError::ZeroHealth);
        }

        let c = &self.conditions;
        let durations = [
            ("broken_secs", c.broken_secs),
            ("slow_secs", c.slow_secs),
            ("dash_secs", c.dash_secs),
            ("dash_cooldown_secs", c.dash_cooldown_secs),
            ("empty_secs", c.empty_secs),
            ("scan_secs", c.scan_secs),
            ("scan_cooldown_secs", c.scan_cooldown_secs),
            ("activity_linger", self.cleaning.activity_linger),
            ("death_delay_secs", self.health.death_delay_secs),
        ];
        for (name, value) in durations {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::InvalidDuration { name, value });
            }
        }

        let s = &self.speed;
        for (name, value) in [
            ("base", s.base),
            ("full", s.full),
            ("slowed", s.slowed),
            ("dash", s.dash),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::InvalidSpeed { name, value });
            }
        }
        Ok(())
    }

    /// Convert a duration in seconds to whole ticks (at least one).
    pub fn ticks(&self, seconds: f32) -> u64 {
        let raw = (seconds * self.tick_rate as f32).round();
        if raw.is_finite() && raw >= 1.0 {
            raw as u64
        } else {
            1
        }
    }

    /// Seconds covered by a single tick.
    pub fn tick_seconds(&self) -> f32 {
        1.0 / self.tick_rate.max(1) as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_validate() {
        assert!(SessionConfig::default().validate().is_ok());
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let cfg = SessionConfig::from_json_str(
            r#"{ "tick_rate": 30, "speed": { "precedence": "slowed_first" } }"#,
        )
        .unwrap();
        assert_eq!(cfg.tick_rate, 30);
        assert_eq!(cfg.speed.precedence, SpeedPrecedence::SlowedFirst);
        assert_eq!(cfg.speed.base, 10.0);
        assert_eq!(cfg.cleaning.when_full, CleaningWhenFull::Blocked);
    }

    #[test]
    fn rejects_zero_threshold() {
        let err = SessionConfig::from_json_str(r#"{ "cleaning": { "unit_threshold": 0.0 } }"#)
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidThreshold(_)));
    }

    #[test]
    fn rejects_negative_duration() {
        let mut cfg = SessionConfig::default();
        cfg.conditions.slow_secs = -1.0;
        match cfg.validate() {
            Err(ConfigError::InvalidDuration { name, .. }) => assert_eq!(name, "slow_secs"),
            other => panic!("expected InvalidDuration, got {:?}", other),
        }
    }

    #[test]
    fn rejects_malformed_json() {
        assert!(matches!(
            SessionConfig::from_json_str("{ not json"),
            Err(ConfigError::Json(_))
        ));
    }

    #[test]
    fn seconds_to_ticks() {
        let cfg = SessionConfig::default();
        assert_eq!(cfg.ticks(1.0), 60);
        assert_eq!(cfg.ticks(5.5), 330);
        assert_eq!(cfg.ticks(0.0), 1);
        assert_eq!(cfg.ticks(0.25), 15);
    }
}
