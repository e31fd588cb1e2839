//! [`MotionState`] – per-tick motion and smoothed velocity.
//!
//! Every tick the motion is rebuilt from scratch from the current input:
//!
//! 1. pick the calibrated delta or the raw input per axis (`calibrate`),
//! 2. scale by `container size * scalar / 100` (width on X, height on Y),
//! 3. clamp with the axis limit, if any,
//!
//! and the velocity is pulled toward it through an
//! [`ExponentialSmoother`] with the axis friction.  Velocity is the only
//! state that persists between ticks.

use parallax_perception::ExponentialSmoother;
use parallax_types::AxisPair;

use crate::config::ParallaxConfig;

#[derive(Debug, Default)]
pub struct MotionState {
    motion: AxisPair<f64>,
    velocity: AxisPair<ExponentialSmoother>,
}

impl MotionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run one tick and return the new velocity.
    ///
    /// `raw` is the latest scaled input, `calibrated` the same input relative
    /// to the reference pose, `bounds` the container `(width, height)`.
    pub fn step(
        &mut self,
        raw: AxisPair<f64>,
        calibrated: AxisPair<f64>,
        bounds: AxisPair<f64>,
        config: &ParallaxConfig,
    ) -> AxisPair<f64> {
        let source = AxisPair::new(
            if config.calibrate.x { calibrated.x } else { raw.x },
            if config.calibrate.y { calibrated.y } else { raw.y },
        );

        self.motion = AxisPair::new(
            config.limit.x.apply(source.x * bounds.x * (config.scalar.x / 100.0)),
            config.limit.y.apply(source.y * bounds.y * (config.scalar.y / 100.0)),
        );

        AxisPair::new(
            self.velocity.x.step(self.motion.x, config.friction.x),
            self.velocity.y.step(self.motion.y, config.friction.y),
        )
    }

    /// Scaled, clamped displacement computed by the last tick.
    pub fn motion(&self) -> AxisPair<f64> {
        self.motion
    }

    /// Smoothed output.
    pub fn velocity(&self) -> AxisPair<f64> {
        AxisPair::new(self.velocity.x.value(), self.velocity.y.value())
    }
}
