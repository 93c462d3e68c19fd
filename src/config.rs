// Copyright 2026 Hypermesh Foundation. All rights reserved.
// EMF Meter Simulation - Configuration

//! Tunable constants for the meter and the two named presets.
//!
//! Every value the page used to hard-code lives here. A host may pass a
//! partial object (JS or JSON); missing fields fall back to the default
//! preset.

use serde::{Deserialize, Serialize};

// ─── Defaults ───────────────────────────────────────────────────────────────

const BASE_FLUCTUATION: f64 = 0.5;
const FLUCTUATION_DAMPING: f64 = 0.1;

const GHOST_EFFECT_MAX: f64 = 10.0;
const GHOST_RISE: f64 = 0.5;
const GHOST_DECAY: f64 = 0.3;

const ELEVATED_THRESHOLD: f64 = 2.0;
const HIGH_THRESHOLD: f64 = 5.0;

const UPDATE_PERIOD_MS: u64 = 100;
const GHOST_CHECK_PERIOD_MS: u64 = 3000;

const GHOST_PROBABILITY: f64 = 0.2;
const GHOST_MIN_DURATION_MS: u64 = 5000;
const GHOST_MAX_DURATION_MS: u64 = 15000;

const GLOW_MIN_PX: f64 = 5.0;
const GLOW_MAX_PX: f64 = 15.0;

// ─── Errors ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("unknown preset {0:?} (expected \"high-base\" or \"low-base\")")]
    UnknownPreset(String),

    #[error("{field} must be finite")]
    NotFinite { field: &'static str },

    #[error("{field} must not be negative (got {value})")]
    Negative { field: &'static str, value: f64 },

    #[error("initial reading {initial} is below the floor {floor}")]
    InitialBelowFloor { initial: f64, floor: f64 },

    #[error("{field} must be greater than zero")]
    ZeroPeriod { field: &'static str },

    #[error("ghost probability must be within [0, 1] (got {0})")]
    Probability(f64),

    #[error("ghost duration range is inverted ({min_ms}ms > {max_ms}ms)")]
    DurationRange { min_ms: u64, max_ms: u64 },

    #[error("thresholds must increase strictly (elevated {elevated}, high {high})")]
    Thresholds { elevated: f64, high: f64 },

    #[error("glow range is inverted ({min}px > {max}px)")]
    GlowRange { min: f64, max: f64 },

    #[error("invalid config: {0}")]
    Parse(String),
}

// ─── Presets ────────────────────────────────────────────────────────────────

/// The two shipped variants of the meter. They differ only in where the
/// reading starts and how low background noise may drift.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Preset {
    /// Starts at 1.5 mG with a 1.0 floor: the green light stays on.
    #[default]
    HighBase,
    /// Starts at 0.5 mG and may settle all the way to zero.
    LowBase,
}

impl Preset {
    pub fn from_name(name: &str) -> Result<Self, ConfigError> {
        match name.trim().to_ascii_lowercase().as_str() {
            "high-base" | "high" => Ok(Self::HighBase),
            "low-base" | "low" => Ok(Self::LowBase),
            _ => Err(ConfigError::UnknownPreset(name.to_string())),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::HighBase => "high-base",
            Self::LowBase => "low-base",
        }
    }

    /// (initial reading, floor)
    fn baseline(&self) -> (f64, f64) {
        match self {
            Self::HighBase => (1.5, 1.0),
            Self::LowBase => (0.5, 0.0),
        }
    }

    pub fn config(&self) -> MeterConfig {
        let (initial_reading, reading_floor) = self.baseline();
        MeterConfig {
            initial_reading,
            reading_floor,
            ..MeterConfig::base()
        }
    }
}

// ─── MeterConfig ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MeterConfig {
    pub initial_reading: f64,
    pub reading_floor: f64,
    /// Width of the symmetric noise band around zero.
    pub fluctuation: f64,
    pub damping: f64,

    pub ghost_max: f64,
    pub ghost_rise: f64,
    pub ghost_decay: f64,

    pub elevated_threshold: f64,
    pub high_threshold: f64,

    pub update_period_ms: u64,
    pub ghost_check_period_ms: u64,

    pub ghost_probability: f64,
    pub ghost_min_duration_ms: u64,
    pub ghost_max_duration_ms: u64,

    pub glow_min_px: f64,
    pub glow_max_px: f64,
}

impl Default for MeterConfig {
    fn default() -> Self {
        Preset::default().config()
    }
}

impl MeterConfig {
    fn base() -> Self {
        Self {
            initial_reading: 0.0,
            reading_floor: 0.0,
            fluctuation: BASE_FLUCTUATION,
            damping: FLUCTUATION_DAMPING,
            ghost_max: GHOST_EFFECT_MAX,
            ghost_rise: GHOST_RISE,
            ghost_decay: GHOST_DECAY,
            elevated_threshold: ELEVATED_THRESHOLD,
            high_threshold: HIGH_THRESHOLD,
            update_period_ms: UPDATE_PERIOD_MS,
            ghost_check_period_ms: GHOST_CHECK_PERIOD_MS,
            ghost_probability: GHOST_PROBABILITY,
            ghost_min_duration_ms: GHOST_MIN_DURATION_MS,
            ghost_max_duration_ms: GHOST_MAX_DURATION_MS,
            glow_min_px: GLOW_MIN_PX,
            glow_max_px: GLOW_MAX_PX,
        }
    }

    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let floats = [
            ("initial_reading", self.initial_reading),
            ("reading_floor", self.reading_floor),
            ("fluctuation", self.fluctuation),
            ("damping", self.damping),
            ("ghost_max", self.ghost_max),
            ("ghost_rise", self.ghost_rise),
            ("ghost_decay", self.ghost_decay),
            ("elevated_threshold", self.elevated_threshold),
            ("high_threshold", self.high_threshold),
            ("ghost_probability", self.ghost_probability),
            ("glow_min_px", self.glow_min_px),
            ("glow_max_px", self.glow_max_px),
        ];
        for (field, value) in floats {
            if !value.is_finite() {
                return Err(ConfigError::NotFinite { field });
            }
        }

        let non_negative = [
            ("reading_floor", self.reading_floor),
            ("fluctuation", self.fluctuation),
            ("damping", self.damping),
            ("ghost_max", self.ghost_max),
            ("ghost_rise", self.ghost_rise),
            ("ghost_decay", self.ghost_decay),
            ("glow_min_px", self.glow_min_px),
        ];
        for (field, value) in non_negative {
            if value < 0.0 {
                return Err(ConfigError::Negative { field, value });
            }
        }

        if self.initial_reading < self.reading_floor {
            return Err(ConfigError::InitialBelowFloor {
                initial: self.initial_reading,
                floor: self.reading_floor,
            });
        }
        if self.update_period_ms == 0 {
            return Err(ConfigError::ZeroPeriod { field: "update_period_ms" });
        }
        if self.ghost_check_period_ms == 0 {
            return Err(ConfigError::ZeroPeriod { field: "ghost_check_period_ms" });
        }
        if !(0.0..=1.0).contains(&self.ghost_probability) {
            return Err(ConfigError::Probability(self.ghost_probability));
        }
        if self.ghost_min_duration_ms > self.ghost_max_duration_ms {
            return Err(ConfigError::DurationRange {
                min_ms: self.ghost_min_duration_ms,
                max_ms: self.ghost_max_duration_ms,
            });
        }
        if self.elevated_threshold >= self.high_threshold {
            return Err(ConfigError::Thresholds {
                elevated: self.elevated_threshold,
                high: self.high_threshold,
            });
        }
        if self.glow_min_px > self.glow_max_px {
            return Err(ConfigError::GlowRange {
                min: self.glow_min_px,
                max: self.glow_max_px,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_high_base() {
        let config = MeterConfig::default();
        assert_eq!(config.initial_reading, 1.5);
        assert_eq!(config.reading_floor, 1.0);
        assert_eq!(config.ghost_max, 10.0);
        assert_eq!(config.update_period_ms, 100);
        assert_eq!(config.ghost_check_period_ms, 3000);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_low_base_preset() {
        let config = Preset::LowBase.config();
        assert_eq!(config.initial_reading, 0.5);
        assert_eq!(config.reading_floor, 0.0);
        // Everything else matches the default preset
        assert_eq!(config.high_threshold, MeterConfig::default().high_threshold);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_preset_names() {
        assert_eq!(Preset::from_name("high-base"), Ok(Preset::HighBase));
        assert_eq!(Preset::from_name(" LOW-BASE "), Ok(Preset::LowBase));
        assert_eq!(Preset::from_name("low"), Ok(Preset::LowBase));
        assert!(matches!(
            Preset::from_name("haunted"),
            Err(ConfigError::UnknownPreset(_))
        ));
        assert_eq!(Preset::LowBase.name(), "low-base");
    }

    #[test]
    fn test_rejects_initial_below_floor() {
        let config = MeterConfig {
            initial_reading: 0.5,
            ..MeterConfig::default()
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::InitialBelowFloor { initial: 0.5, floor: 1.0 })
        );
    }

    #[test]
    fn test_rejects_zero_period() {
        let config = MeterConfig {
            ghost_check_period_ms: 0,
            ..MeterConfig::default()
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::ZeroPeriod { field: "ghost_check_period_ms" })
        );
    }

    #[test]
    fn test_rejects_bad_probability_and_ranges() {
        let config = MeterConfig { ghost_probability: 1.5, ..MeterConfig::default() };
        assert_eq!(config.validate(), Err(ConfigError::Probability(1.5)));

        let config = MeterConfig {
            ghost_min_duration_ms: 20_000,
            ..MeterConfig::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::DurationRange { .. })));

        let config = MeterConfig { high_threshold: 2.0, ..MeterConfig::default() };
        assert!(matches!(config.validate(), Err(ConfigError::Thresholds { .. })));

        let config = MeterConfig { glow_min_px: 20.0, ..MeterConfig::default() };
        assert!(matches!(config.validate(), Err(ConfigError::GlowRange { .. })));
    }

    #[test]
    fn test_rejects_non_finite_and_negative() {
        let config = MeterConfig { damping: f64::NAN, ..MeterConfig::default() };
        assert_eq!(config.validate(), Err(ConfigError::NotFinite { field: "damping" }));

        let config = MeterConfig { ghost_decay: -0.1, ..MeterConfig::default() };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Negative { field: "ghost_decay", .. })
        ));
    }

    #[test]
    fn test_partial_json_falls_back_to_defaults() {
        let config = MeterConfig::from_json(r#"{ "ghost_probability": 0.5 }"#).unwrap();
        assert_eq!(config.ghost_probability, 0.5);
        assert_eq!(config.initial_reading, 1.5);
        assert_eq!(config.glow_max_px, 15.0);
    }

    #[test]
    fn test_json_errors_surface() {
        assert!(matches!(
            MeterConfig::from_json("{ not json"),
            Err(ConfigError::Parse(_))
        ));
        assert!(matches!(
            MeterConfig::from_json(r#"{ "update_period_ms": 0 }"#),
            Err(ConfigError::ZeroPeriod { .. })
        ));
    }
}
