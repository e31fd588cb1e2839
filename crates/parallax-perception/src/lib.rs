//! `parallax-perception` – turns raw orientation readings into the tilt
//! signal the motion pipeline consumes.
//!
//! # Modules
//!
//! - [`math`] – [`clamp`][math::clamp]: order-tolerant clamping.
//! - [`orientation`] – [`Tilt`][orientation::Tilt]: roll/pitch extraction
//!   from a sensor quaternion and the fixed angle scaling applied before
//!   calibration.
//! - [`smoothing`] – [`ExponentialSmoother`][smoothing::ExponentialSmoother]:
//!   the one-pole low-pass filter behind the "friction" options.

pub mod math;
pub mod orientation;
pub mod smoothing;

pub use math::clamp;
pub use orientation::{ANGLE_SCALE, Tilt, normalize_angle, scale_angles};
pub use smoothing::ExponentialSmoother;
