//! Orientation adapter.
//!
//! Converts a sensor quaternion `[qw, qx, qy, qz]` into the two tilt angles
//! that drive the effect:
//!
//! ```text
//! roll  = atan2(2(qw·qx + qy·qz), 1 − 2(qx² + qy²))   → degrees, in [0, 360)
//! pitch = asin(clamp(2(qw·qy − qz·qx), −1, 1))        → degrees, in [−90, 90]
//! ```
//!
//! Pitch drives the X axis and roll drives the Y axis.  Before either angle
//! reaches calibration it is divided by [`ANGLE_SCALE`], which compresses the
//! sensor's natural range into the working range the scalar options were
//! tuned for.
//!
//! # Example
//!
//! ```rust
//! use parallax_perception::orientation::Tilt;
//! use parallax_types::Quaternion;
//!
//! let tilt = Tilt::from_quaternion(Quaternion::identity());
//! assert_eq!(tilt.pitch_deg, 0.0);
//! assert_eq!(tilt.roll_deg, 0.0);
//! ```

use parallax_types::{AxisPair, Quaternion};

use crate::math::clamp;

/// Divisor applied to both tilt angles (degrees) before calibration.
pub const ANGLE_SCALE: f64 = 30.0;

/// Tilt angles extracted from one orientation reading, in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tilt {
    /// Rotation about the device's lateral axis, `[−90, 90]`.
    pub pitch_deg: f64,
    /// Rotation about the device's longitudinal axis, `[0, 360)`.
    pub roll_deg: f64,
}

impl Tilt {
    pub fn from_quaternion(q: Quaternion) -> Self {
        let roll = (2.0 * (q.w * q.x + q.y * q.z)).atan2(1.0 - 2.0 * (q.x * q.x + q.y * q.y));
        let pitch = clamp(2.0 * (q.w * q.y - q.z * q.x), -1.0, 1.0).asin();

        Self {
            pitch_deg: pitch.to_degrees(),
            roll_deg: normalize_angle(roll.to_degrees()),
        }
    }

    /// The tilt as scaled `(x, y)` angles: pitch on X, roll on Y.
    pub fn scaled(self) -> AxisPair<f64> {
        scale_angles(self.pitch_deg, self.roll_deg)
    }
}

/// Wrap an angle in `(−360, ∞)` degrees into `[0, 360)`.
pub fn normalize_angle(deg: f64) -> f64 {
    (deg + 360.0) % 360.0
}

/// Scale a `(beta, gamma)` angle pair in degrees into the working range.
///
/// A non-finite angle (a missing or unreadable component) counts as `0`.
pub fn scale_angles(beta: f64, gamma: f64) -> AxisPair<f64> {
    AxisPair::new(beta, gamma).map(|angle| {
        if angle.is_finite() {
            angle / ANGLE_SCALE
        } else {
            0.0
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    /// Unit quaternion for a rotation of `deg` degrees about a principal axis.
    fn about(axis: char, deg: f64) -> Quaternion {
        let half = deg.to_radians() / 2.0;
        let (s, c) = half.sin_cos();
        match axis {
            'x' => Quaternion::new(c, s, 0.0, 0.0),
            'y' => Quaternion::new(c, 0.0, s, 0.0),
            _ => Quaternion::new(c, 0.0, 0.0, s),
        }
    }

    #[test]
    fn identity_has_no_tilt() {
        let tilt = Tilt::from_quaternion(Quaternion::identity());
        assert!(tilt.pitch_deg.abs() < EPS);
        assert!(tilt.roll_deg.abs() < EPS);
    }

    #[test]
    fn rotation_about_y_is_pitch() {
        let tilt = Tilt::from_quaternion(about('y', 25.0));
        assert!((tilt.pitch_deg - 25.0).abs() < 1e-6);
        assert!(tilt.roll_deg.abs() < 1e-6);
    }

    #[test]
    fn rotation_about_x_is_roll() {
        let tilt = Tilt::from_quaternion(about('x', 40.0));
        assert!((tilt.roll_deg - 40.0).abs() < 1e-6);
        assert!(tilt.pitch_deg.abs() < 1e-6);
    }

    #[test]
    fn negative_roll_wraps_into_positive_range() {
        let tilt = Tilt::from_quaternion(about('x', -30.0));
        assert!((tilt.roll_deg - 330.0).abs() < 1e-6);
    }

    #[test]
    fn pitch_argument_is_clamped_for_non_unit_input() {
        // 2(qw·qy) = 2 would put asin out of its domain.
        let tilt = Tilt::from_quaternion(Quaternion::new(1.0, 0.0, 1.0, 0.0));
        assert!((tilt.pitch_deg - 90.0).abs() < 1e-9);
        assert!(!tilt.pitch_deg.is_nan());
    }

    #[test]
    fn all_zero_reading_is_finite() {
        let tilt = Tilt::from_quaternion(Quaternion::from_components(&[]));
        assert_eq!(tilt.pitch_deg, 0.0);
        assert_eq!(tilt.roll_deg, 0.0);
    }

    #[test]
    fn normalize_angle_range() {
        assert_eq!(normalize_angle(0.0), 0.0);
        assert_eq!(normalize_angle(-90.0), 270.0);
        assert_eq!(normalize_angle(180.0), 180.0);
        assert_eq!(normalize_angle(-180.0), 180.0);
    }

    #[test]
    fn scaled_divides_by_angle_scale() {
        let scaled = scale_angles(45.0, 90.0);
        assert!((scaled.x - 1.5).abs() < EPS);
        assert!((scaled.y - 3.0).abs() < EPS);
    }

    #[test]
    fn non_finite_angles_fall_back_to_zero() {
        let scaled = scale_angles(f64::NAN, f64::INFINITY);
        assert_eq!(scaled, AxisPair::new(0.0, 0.0));
    }

    #[test]
    fn tilt_scaled_maps_pitch_to_x_and_roll_to_y() {
        let tilt = Tilt {
            pitch_deg: 30.0,
            roll_deg: 60.0,
        };
        assert_eq!(tilt.scaled(), AxisPair::new(1.0, 2.0));
    }
}
