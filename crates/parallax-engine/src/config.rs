//! Options and their resolution into a validated [`ParallaxConfig`].
//!
//! Hosts describe the effect with a [`ParallaxOptions`] value, either built in
//! code or parsed from a TOML document using the same camelCase keys:
//!
//! ```toml
//! calibrationThreshold = 100.0
//! calibrationDelay = 500        # milliseconds
//! calibrateX = false
//! calibrateY = true
//! invertX = true
//! invertY = true
//! limitX = false                # or a number, e.g. 40.0
//! limitY = "25"                 # numeric strings are accepted
//! scalarX = 10.0                # percent of the container size
//! scalarY = 10.0
//! frictionX = 0.1
//! frictionY = 0.1
//! sensorFrequency = 10.0        # Hz
//! ```
//!
//! Every key is optional.  [`ParallaxOptions::resolve`] merges the options
//! over [`ParallaxConfig::default`] once and validates the result.

use std::fs;
use std::path::Path;
use std::time::Duration;

use parallax_perception::math::clamp;
use parallax_types::{AxisPair, ParallaxError};
use serde::{Deserialize, Serialize};

/// Sampling frequency the orientation sensor is opened with by default.
pub const DEFAULT_SENSOR_FREQUENCY_HZ: f64 = 10.0;

// ────────────────────────────────────────────────────────────────────────────
// LimitSetting
// ────────────────────────────────────────────────────────────────────────────

/// Per-axis clamp of the scaled motion.
///
/// Deserializes from `false` (disabled), a number, or a numeric string.
/// Anything that is not a number (`true`, `"wide"`, NaN) disables clamping.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "RawLimit", into = "RawLimit")]
pub enum LimitSetting {
    #[default]
    Disabled,
    /// Clamp to `[-bound, +bound]`.
    Bound(f64),
}

impl LimitSetting {
    /// A numeric limit; NaN disables clamping.
    pub fn bound(value: f64) -> Self {
        if value.is_nan() {
            Self::Disabled
        } else {
            Self::Bound(value)
        }
    }

    /// Parse a textual limit such as `"25"` or `" 12.5 "`.
    pub fn parse(text: &str) -> Self {
        text.trim()
            .parse::<f64>()
            .map_or(Self::Disabled, Self::bound)
    }

    /// Apply the limit to `value`.
    pub fn apply(self, value: f64) -> f64 {
        match self {
            Self::Disabled => value,
            Self::Bound(limit) => clamp(value, -limit, limit),
        }
    }
}

impl From<f64> for LimitSetting {
    fn from(value: f64) -> Self {
        Self::bound(value)
    }
}

#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum RawLimit {
    Flag(bool),
    Number(f64),
    Text(String),
}

impl From<RawLimit> for LimitSetting {
    fn from(raw: RawLimit) -> Self {
        match raw {
            RawLimit::Flag(_) => Self::Disabled,
            RawLimit::Number(value) => Self::bound(value),
            RawLimit::Text(text) => Self::parse(&text),
        }
    }
}

impl From<LimitSetting> for RawLimit {
    fn from(limit: LimitSetting) -> Self {
        match limit {
            LimitSetting::Disabled => Self::Flag(false),
            LimitSetting::Bound(value) => Self::Number(value),
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// ParallaxConfig
// ────────────────────────────────────────────────────────────────────────────

/// Fully resolved, validated configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct ParallaxConfig {
    /// Calibrated delta (scaled angle units) above which the reference pose
    /// is recaptured on the next reading.
    pub calibration_threshold: f64,
    /// Delay before the startup recalibration.
    pub calibration_delay: Duration,
    /// Use the calibrated delta (`true`) or the raw input (`false`).
    pub calibrate: AxisPair<bool>,
    /// Move layers against the tilt direction.
    pub invert: AxisPair<bool>,
    pub limit: AxisPair<LimitSetting>,
    /// Percent of the container size one scaled angle unit moves.
    pub scalar: AxisPair<f64>,
    /// Smoothing coefficient per axis, nominally in `[0, 1]`.
    pub friction: AxisPair<f64>,
    pub sensor_frequency_hz: f64,
}

impl Default for ParallaxConfig {
    fn default() -> Self {
        Self {
            calibration_threshold: 100.0,
            calibration_delay: Duration::from_millis(500),
            calibrate: AxisPair::new(false, true),
            invert: AxisPair::splat(true),
            limit: AxisPair::splat(LimitSetting::Disabled),
            scalar: AxisPair::splat(10.0),
            friction: AxisPair::splat(0.1),
            sensor_frequency_hz: DEFAULT_SENSOR_FREQUENCY_HZ,
        }
    }
}

impl ParallaxConfig {
    /// Check the numeric invariants.
    ///
    /// # Errors
    ///
    /// Returns [`ParallaxError::InvalidOption`] naming the first offending
    /// option.
    pub fn validate(&self) -> Result<(), ParallaxError> {
        if self.calibration_threshold.is_nan() || self.calibration_threshold < 0.0 {
            return Err(ParallaxError::invalid(
                "calibrationThreshold",
                format!("must be a non-negative number, got {}", self.calibration_threshold),
            ));
        }
        ParallaxError::require_finite("scalarX", self.scalar.x)?;
        ParallaxError::require_finite("scalarY", self.scalar.y)?;
        ParallaxError::require_finite("frictionX", self.friction.x)?;
        ParallaxError::require_finite("frictionY", self.friction.y)?;
        if !(self.sensor_frequency_hz.is_finite() && self.sensor_frequency_hz > 0.0) {
            return Err(ParallaxError::invalid(
                "sensorFrequency",
                format!("must be a positive frequency, got {}", self.sensor_frequency_hz),
            ));
        }
        Ok(())
    }
}

// ────────────────────────────────────────────────────────────────────────────
// ParallaxOptions
// ────────────────────────────────────────────────────────────────────────────

/// User-facing options.  `None` means "use the default".
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ParallaxOptions {
    pub calibration_threshold: Option<f64>,
    /// Milliseconds.
    #[serde(rename = "calibrationDelay")]
    pub calibration_delay_ms: Option<u64>,
    pub calibrate_x: Option<bool>,
    pub calibrate_y: Option<bool>,
    pub invert_x: Option<bool>,
    pub invert_y: Option<bool>,
    pub limit_x: Option<LimitSetting>,
    pub limit_y: Option<LimitSetting>,
    pub scalar_x: Option<f64>,
    pub scalar_y: Option<f64>,
    pub friction_x: Option<f64>,
    pub friction_y: Option<f64>,
    pub sensor_frequency: Option<f64>,
}

impl ParallaxOptions {
    /// Parse options from a TOML document.
    pub fn from_toml_str(raw: &str) -> Result<Self, ParallaxError> {
        toml::from_str(raw)
            .map_err(|e| ParallaxError::Config(format!("Failed to parse options: {e}")))
    }

    /// Read and parse options from a TOML file.
    pub fn load_from(path: &Path) -> Result<Self, ParallaxError> {
        let raw = fs::read_to_string(path).map_err(|e| {
            ParallaxError::Config(format!("Failed to read options at {}: {}", path.display(), e))
        })?;
        Self::from_toml_str(&raw)
    }

    /// Merge these options over the defaults and validate the result.
    ///
    /// # Errors
    ///
    /// Returns [`ParallaxError::InvalidOption`] when a scalar or friction is
    /// not finite, the threshold is negative or NaN, or the sensor frequency
    /// is not positive.
    pub fn resolve(&self) -> Result<ParallaxConfig, ParallaxError> {
        let mut config = ParallaxConfig::default();
        if let Some(threshold) = self.calibration_threshold {
            config.calibration_threshold = threshold;
        }
        if let Some(ms) = self.calibration_delay_ms {
            config.calibration_delay = Duration::from_millis(ms);
        }
        config.calibrate.assign(self.calibrate_x, self.calibrate_y);
        config.invert.assign(self.invert_x, self.invert_y);
        config.limit.assign(self.limit_x, self.limit_y);
        config.scalar.assign(self.scalar_x, self.scalar_y);
        config.friction.assign(self.friction_x, self.friction_y);
        if let Some(hz) = self.sensor_frequency {
            config.sensor_frequency_hz = hz;
        }
        config.validate()?;
        Ok(config)
    }
}
