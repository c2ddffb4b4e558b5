//! Ball tuning and validation
//!
//! Every constant the simulation depends on lives in [`BallConfig`]. A config
//! is checked once, before a ball is built; nothing in the tick path can fail.

use std::path::{Path, PathBuf};

use glam::Vec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;

/// Which side of the settling threshold an exactly-equal rebound falls on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SettleBoundary {
    /// `speed <= threshold` settles (a rebound landing exactly on the threshold stops)
    #[default]
    Inclusive,
    /// `speed < threshold` settles (a rebound landing exactly on the threshold keeps bouncing)
    Exclusive,
}

impl SettleBoundary {
    /// Whether `speed` counts as settled against `threshold`
    #[inline]
    pub fn settles(self, speed: f32, threshold: f32) -> bool {
        match self {
            SettleBoundary::Inclusive => speed <= threshold,
            SettleBoundary::Exclusive => speed < threshold,
        }
    }
}

/// Boundary policy used unless a config overrides it. Rounds toward stopping.
pub const DEFAULT_SETTLE_BOUNDARY: SettleBoundary = SettleBoundary::Inclusive;

/// Configuration errors, raised before a ball becomes usable
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("frame list is empty; a ball needs at least one sprite frame")]
    NoFrames,
    #[error("radius must be positive and finite, got {0}")]
    InvalidRadius(f32),
    #[error("damping factor must be strictly between 0 and 1, got {0}")]
    InvalidDamping(f32),
    #[error("timestep must be positive and finite, got {0}")]
    InvalidTimestep(f32),
    #[error("gravity must be positive and finite, got {0}")]
    InvalidGravity(f32),
    #[error("settle threshold must be non-negative and finite, got {0}")]
    InvalidThreshold(f32),
    #[error("frame cadence must be at least one tick")]
    InvalidCadence,
    #[error("start position {start} is below ground level {ground}")]
    StartBelowGround { start: f32, ground: f32 },
    #[error("failed to read config {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Tuning for one bouncing ball
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BallConfig {
    /// Downward acceleration magnitude (units/s²)
    pub gravity: f32,
    /// Fixed timestep in seconds; must match the driver's tick rate
    pub dt: f32,
    pub ground_level: f32,
    /// Fraction of vertical speed retained after a bounce, in (0, 1)
    pub damping_factor: f32,
    pub settle_threshold: f32,
    pub settle_boundary: SettleBoundary,
    /// Physics ticks per sprite frame
    pub frame_cadence: u32,
    pub radius: f32,
    pub start_position: Vec2,
}

impl Default for BallConfig {
    fn default() -> Self {
        Self {
            gravity: GRAVITY,
            dt: SIM_DT,
            ground_level: GROUND_LEVEL,
            damping_factor: DAMPING_FACTOR,
            settle_threshold: SETTLE_THRESHOLD,
            settle_boundary: DEFAULT_SETTLE_BOUNDARY,
            frame_cadence: FRAME_CADENCE_TICKS,
            radius: BALL_RADIUS,
            start_position: Vec2::new(BALL_START_X, BALL_START_Y),
        }
    }
}

impl BallConfig {
    /// Check every invariant the tick path relies on
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.radius.is_finite() && self.radius > 0.0) {
            return Err(ConfigError::InvalidRadius(self.radius));
        }
        if !(self.damping_factor > 0.0 && self.damping_factor < 1.0) {
            return Err(ConfigError::InvalidDamping(self.damping_factor));
        }
        if !(self.dt.is_finite() && self.dt > 0.0) {
            return Err(ConfigError::InvalidTimestep(self.dt));
        }
        if !(self.gravity.is_finite() && self.gravity > 0.0) {
            return Err(ConfigError::InvalidGravity(self.gravity));
        }
        if !(self.settle_threshold.is_finite() && self.settle_threshold >= 0.0) {
            return Err(ConfigError::InvalidThreshold(self.settle_threshold));
        }
        if self.frame_cadence == 0 {
            return Err(ConfigError::InvalidCadence);
        }
        // NaN start heights fail this comparison too
        if !(self.start_position.y >= self.ground_level) {
            return Err(ConfigError::StartBelowGround {
                start: self.start_position.y,
                ground: self.ground_level,
            });
        }
        Ok(())
    }

    /// Speed gravity removes in a single tick
    #[inline]
    pub fn gravity_per_tick(&self) -> f32 {
        self.gravity * self.dt
    }

    /// Parse and validate a JSON config. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: BallConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a JSON config file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_json(&json)?;
        log::info!("Loaded ball config from {}", path.display());
        Ok(config)
    }

    /// Serialize to pretty JSON (for writing a starter config)
    pub fn to_json(&self) -> String {
        // Plain floats and enums cannot fail to serialize
        serde_json::to_string_pretty(self).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config_is_valid() {
        assert!(BallConfig::default().validate().is_ok());
    }

    #[test]
    fn test_rejects_bad_damping() {
        for damping in [0.0, 1.0, -0.5, 1.5, f32::NAN] {
            let config = BallConfig {
                damping_factor: damping,
                ..Default::default()
            };
            assert!(
                matches!(config.validate(), Err(ConfigError::InvalidDamping(_))),
                "damping {damping} should be rejected"
            );
        }
    }

    #[test]
    fn test_rejects_bad_timestep() {
        for dt in [0.0, -1.0 / 60.0, f32::NAN, f32::INFINITY] {
            let config = BallConfig {
                dt,
                ..Default::default()
            };
            assert!(matches!(
                config.validate(),
                Err(ConfigError::InvalidTimestep(_))
            ));
        }
    }

    #[test]
    fn test_rejects_bad_radius() {
        let config = BallConfig {
            radius: 0.0,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::InvalidRadius(_))));
    }

    #[test]
    fn test_rejects_zero_cadence_and_low_start() {
        let config = BallConfig {
            frame_cadence: 0,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::InvalidCadence)));

        let config = BallConfig {
            start_position: Vec2::new(0.0, -1.0),
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::StartBelowGround { .. })
        ));
    }

    #[test]
    fn test_settle_boundary_direction() {
        assert!(SettleBoundary::Inclusive.settles(0.01, 0.01));
        assert!(!SettleBoundary::Exclusive.settles(0.01, 0.01));
        assert!(SettleBoundary::Exclusive.settles(0.009, 0.01));
        assert!(!SettleBoundary::Inclusive.settles(0.011, 0.01));
    }

    #[test]
    fn test_from_json_fills_defaults() {
        let config = BallConfig::from_json(r#"{ "damping_factor": 0.5, "settle_boundary": "Exclusive" }"#)
            .expect("valid json");
        assert_eq!(config.damping_factor, 0.5);
        assert_eq!(config.settle_boundary, SettleBoundary::Exclusive);
        assert_eq!(config.gravity, GRAVITY);
        assert_eq!(config.frame_cadence, FRAME_CADENCE_TICKS);
    }

    #[test]
    fn test_from_json_validates() {
        let err = BallConfig::from_json(r#"{ "damping_factor": 1.0 }"#).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidDamping(_)));

        let err = BallConfig::from_json("not json").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_load_round_trips_through_file() {
        let expected = BallConfig {
            gravity: 9.8,
            ..Default::default()
        };
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        file.write_all(expected.to_json().as_bytes()).expect("write");

        let loaded = BallConfig::load(file.path()).expect("load");
        assert_eq!(loaded, expected);
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().expect("temp dir");
        let err = BallConfig::load(dir.path().join("missing.json")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
