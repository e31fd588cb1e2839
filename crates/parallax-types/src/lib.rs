use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A raw orientation reading as delivered by the sensor, `[w, x, y, z]`.
///
/// Missing components deserialize as `0.0`, matching how a partially filled
/// reading is treated by the orientation adapter.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Quaternion {
    #[serde(default)]
    pub w: f64,
    #[serde(default)]
    pub x: f64,
    #[serde(default)]
    pub y: f64,
    #[serde(default)]
    pub z: f64,
}

impl Quaternion {
    pub fn new(w: f64, x: f64, y: f64, z: f64) -> Self {
        Self { w, x, y, z }
    }

    /// The identity rotation (device lying in its reference orientation).
    pub fn identity() -> Self {
        Self::new(1.0, 0.0, 0.0, 0.0)
    }

    /// Build a reading from the sensor's `[qw, qx, qy, qz]` array.
    ///
    /// Components past the end of `components` default to `0.0`.
    pub fn from_components(components: &[f64]) -> Self {
        let at = |i: usize| components.get(i).copied().unwrap_or(0.0);
        Self::new(at(0), at(1), at(2), at(3))
    }
}

impl Default for Quaternion {
    fn default() -> Self {
        Self::identity()
    }
}

/// A value carried once per screen axis.
///
/// Every per-axis option (`calibrateX`/`calibrateY`, `limitX`/`limitY`, …)
/// and every per-axis piece of motion state is stored as an `AxisPair`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AxisPair<T> {
    pub x: T,
    pub y: T,
}

impl<T> AxisPair<T> {
    pub fn new(x: T, y: T) -> Self {
        Self { x, y }
    }

    /// Apply `f` to both axes.
    pub fn map<U>(self, mut f: impl FnMut(T) -> U) -> AxisPair<U> {
        AxisPair::new(f(self.x), f(self.y))
    }

    /// Partial update: `None` leaves the current value of that axis unchanged.
    pub fn assign(&mut self, x: Option<T>, y: Option<T>) {
        if let Some(x) = x {
            self.x = x;
        }
        if let Some(y) = y {
            self.y = y;
        }
    }
}

impl<T: Clone> AxisPair<T> {
    /// The same value on both axes.
    pub fn splat(value: T) -> Self {
        Self::new(value.clone(), value)
    }
}

/// A 2-D translation command applied to a single layer.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Translation {
    pub x: f64,
    pub y: f64,
}

impl Translation {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Error type shared by every parallax crate.
#[derive(Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ParallaxError {
    #[error("Invalid option {option}: {reason}")]
    InvalidOption { option: String, reason: String },

    #[error("Configuration Error: {0}")]
    Config(String),

    #[error("Sensor Fault on {component}: {details}")]
    SensorFault { component: String, details: String },

    #[error("Parallax instance has been destroyed")]
    Destroyed,
}

impl ParallaxError {
    /// Build an [`ParallaxError::InvalidOption`] for `option`.
    pub fn invalid(option: &str, reason: impl Into<String>) -> Self {
        Self::InvalidOption {
            option: option.to_string(),
            reason: reason.into(),
        }
    }

    /// Reject a non-finite value for `option`.
    pub fn require_finite(option: &str, value: f64) -> Result<f64, Self> {
        if value.is_finite() {
            Ok(value)
        } else {
            Err(Self::invalid(option, format!("must be a finite number, got {value}")))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quaternion_from_short_array_pads_with_zero() {
        let q = Quaternion::from_components(&[0.5, 0.25]);
        assert_eq!(q, Quaternion::new(0.5, 0.25, 0.0, 0.0));

        let empty = Quaternion::from_components(&[]);
        assert_eq!(empty, Quaternion::new(0.0, 0.0, 0.0, 0.0));
    }

    #[test]
    fn quaternion_missing_json_fields_default_to_zero() {
        let q: Quaternion = serde_json::from_str(r#"{"w": 1.0, "y": 0.5}"#).unwrap();
        assert_eq!(q, Quaternion::new(1.0, 0.0, 0.5, 0.0));
    }

    #[test]
    fn axis_pair_assign_is_partial() {
        let mut pair = AxisPair::new(1.0, 2.0);
        pair.assign(None, Some(5.0));
        assert_eq!(pair, AxisPair::new(1.0, 5.0));
        pair.assign(Some(-1.0), None);
        assert_eq!(pair, AxisPair::new(-1.0, 5.0));
        pair.assign(None, None);
        assert_eq!(pair, AxisPair::new(-1.0, 5.0));
    }

    #[test]
    fn axis_pair_map_and_splat() {
        let doubled = AxisPair::new(1.5, -2.0).map(|v| v * 2.0);
        assert_eq!(doubled, AxisPair::new(3.0, -4.0));
        assert_eq!(AxisPair::splat(true), AxisPair::new(true, true));
    }

    #[test]
    fn require_finite_rejects_nan_and_infinity() {
        assert_eq!(ParallaxError::require_finite("scalarX", 12.5), Ok(12.5));
        assert!(matches!(
            ParallaxError::require_finite("scalarX", f64::NAN),
            Err(ParallaxError::InvalidOption { ref option, .. }) if option == "scalarX"
        ));
        assert!(ParallaxError::require_finite("frictionY", f64::INFINITY).is_err());
    }

    #[test]
    fn parallax_error_display() {
        let err = ParallaxError::SensorFault {
            component: "orientation".to_string(),
            details: "not supported".to_string(),
        };
        assert!(err.to_string().contains("orientation"));
        assert!(ParallaxError::Destroyed.to_string().contains("destroyed"));
    }
}
