//! Exponential smoothing ("friction").
//!
//! Each call to [`ExponentialSmoother::step`] moves the output a fixed
//! fraction of the way toward the target:
//!
//! ```text
//! value += (target − value) * friction
//! ```
//!
//! This is a first-order low-pass filter with one pole; its time constant is
//! roughly `1 / friction` steps.  `friction = 1` tracks the target exactly,
//! `friction = 0` freezes the output.
//!
//! # Example
//!
//! ```rust
//! use parallax_perception::smoothing::ExponentialSmoother;
//!
//! let mut smoother = ExponentialSmoother::new();
//! assert_eq!(smoother.step(10.0, 0.5), 5.0);
//! assert_eq!(smoother.step(10.0, 0.5), 7.5);
//! ```

/// One-pole low-pass filter holding a single persistent output value.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ExponentialSmoother {
    value: f64,
}

impl ExponentialSmoother {
    /// A smoother whose output starts at `0`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance one step toward `target` and return the new output.
    pub fn step(&mut self, target: f64, friction: f64) -> f64 {
        self.value += (target - self.value) * friction;
        self.value
    }

    /// Current output.
    pub fn value(&self) -> f64 {
        self.value
    }
}
