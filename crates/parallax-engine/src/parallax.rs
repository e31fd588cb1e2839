//! [`Parallax`] – the engine facade.
//!
//! One `Parallax` owns a scene, a sensor provider and a scheduler, and wires
//! the pipeline between them:
//!
//! ```text
//! on_orientation_reading ─► Tilt ─► rotate ─► CalibrationController
//!                                                   │
//! on_animation_frame ─► bounds ─► drift check ─► MotionState ─► LayerCompositor
//!                                                                   │
//!                                                        Layer::set_translation
//! ```
//!
//! The host delivers every event through the `on_*` handlers.  Handlers run
//! to completion and never call back into the host other than through the
//! collaborator traits.

use std::time::Duration;

use parallax_hal::{FrameHandle, Scene, Scheduler, SensorProvider, TimerHandle};
use parallax_perception::{Tilt, scale_angles};
use parallax_types::{AxisPair, ParallaxError, Quaternion};
use tracing::trace;

use crate::calibration::CalibrationController;
use crate::compositor::LayerCompositor;
use crate::config::{LimitSetting, ParallaxConfig, ParallaxOptions};
use crate::lifecycle::{LifecycleController, LifecycleState};
use crate::motion::MotionState;

pub struct Parallax {
    config: ParallaxConfig,
    scene: Option<Box<dyn Scene>>,
    sensors: Box<dyn SensorProvider>,
    scheduler: Box<dyn Scheduler>,
    calibration: CalibrationController,
    motion: MotionState,
    compositor: LayerCompositor,
    lifecycle: LifecycleController,
    bounds: AxisPair<f64>,
}

impl Parallax {
    /// Resolve `options` and start the effect on `scene`.
    ///
    /// See [`with_config`][Self::with_config].
    pub fn new(
        scene: Box<dyn Scene>,
        options: &ParallaxOptions,
        sensors: Box<dyn SensorProvider>,
        scheduler: Box<dyn Scheduler>,
    ) -> Result<Self, ParallaxError> {
        Self::with_config(scene, options.resolve()?, sensors, scheduler)
    }

    /// Start the effect with an already resolved configuration.
    ///
    /// Scans the layers, enables the sensor and the tick loop, and arms the
    /// startup recalibration after `calibration_delay`.
    ///
    /// # Errors
    ///
    /// [`ParallaxError::InvalidOption`] for an invalid `config`, or the
    /// sensor fault when the sensor cannot be opened or started.
    pub fn with_config(
        scene: Box<dyn Scene>,
        config: ParallaxConfig,
        sensors: Box<dyn SensorProvider>,
        scheduler: Box<dyn Scheduler>,
    ) -> Result<Self, ParallaxError> {
        config.validate()?;
        let delay = config.calibration_delay;
        let mut parallax = Self {
            config,
            scene: Some(scene),
            sensors,
            scheduler,
            calibration: CalibrationController::new(),
            motion: MotionState::new(),
            compositor: LayerCompositor::new(),
            lifecycle: LifecycleController::new(),
            bounds: AxisPair::default(),
        };
        parallax.update_layers()?;
        parallax.enable()?;
        parallax.queue_calibration(delay)?;
        Ok(parallax)
    }

    // ── Setters ─────────────────────────────────────────────────────────────

    pub fn calibrate(&mut self, x: Option<bool>, y: Option<bool>) {
        self.config.calibrate.assign(x, y);
    }

    pub fn invert(&mut self, x: Option<bool>, y: Option<bool>) {
        self.config.invert.assign(x, y);
    }

    pub fn limit(&mut self, x: Option<LimitSetting>, y: Option<LimitSetting>) {
        self.config.limit.assign(x, y);
    }

    /// Set the smoothing coefficients.  Nothing changes if either value is
    /// not finite.
    pub fn friction(&mut self, x: Option<f64>, y: Option<f64>) -> Result<(), ParallaxError> {
        check_finite("frictionX", x)?;
        check_finite("frictionY", y)?;
        self.config.friction.assign(x, y);
        Ok(())
    }

    /// Set the motion scalars (percent of the container size).  Nothing
    /// changes if either value is not finite.
    pub fn scalar(&mut self, x: Option<f64>, y: Option<f64>) -> Result<(), ParallaxError> {
        check_finite("scalarX", x)?;
        check_finite("scalarY", y)?;
        self.config.scalar.assign(x, y);
        Ok(())
    }

    // ── Event handlers ──────────────────────────────────────────────────────

    /// Feed a `(beta, gamma)` tilt in degrees.  `beta` drives X, `gamma` Y.
    pub fn rotate(&mut self, beta: f64, gamma: f64) {
        if self.lifecycle.is_destroyed() {
            return;
        }
        self.calibration.rotate(scale_angles(beta, gamma));
    }

    /// Handle one sensor sample.  Samples that arrive while disabled are
    /// dropped.
    pub fn on_orientation_reading(&mut self, reading: Quaternion) {
        if !self.lifecycle.is_enabled() {
            trace!("dropping reading while disabled");
            return;
        }
        self.calibration.rotate(Tilt::from_quaternion(reading).scaled());
    }

    /// Run one animation tick for `frame`.
    pub fn on_animation_frame(&mut self, frame: FrameHandle) {
        if !self.lifecycle.accept_frame(frame) {
            return;
        }

        if let Some(scene) = &self.scene {
            self.bounds = AxisPair::new(scene.width(), scene.height());
        }

        if self
            .calibration
            .drift_exceeds(self.config.calibration_threshold)
        {
            self.calibration.queue(self.scheduler.as_mut(), Duration::ZERO);
        }

        let velocity = self.motion.step(
            self.calibration.input(),
            self.calibration.delta(),
            self.bounds,
            &self.config,
        );
        self.compositor.apply(velocity, self.config.invert);
        trace!(frame = frame.0, vx = velocity.x, vy = velocity.y, "tick");

        self.lifecycle.schedule_frame(self.scheduler.as_mut());
    }

    /// Handle a fired timeout.
    pub fn on_calibration_timer(&mut self, timer: TimerHandle) {
        if !self.calibration.on_timer(timer) {
            trace!(timer = timer.0, "ignoring stale timer");
        }
    }

    /// Handle a display visibility change.
    ///
    /// # Errors
    ///
    /// The sensor fault when re-enabling on display-on fails.
    pub fn on_display_changed(&mut self, on: bool) -> Result<(), ParallaxError> {
        self.lifecycle.display_changed(
            on,
            self.sensors.as_mut(),
            self.scheduler.as_mut(),
            self.config.sensor_frequency_hz,
        )
    }

    // ── Lifecycle ───────────────────────────────────────────────────────────

    /// Make the next reading the reference pose after `delay`.
    pub fn queue_calibration(&mut self, delay: Duration) -> Result<(), ParallaxError> {
        if self.lifecycle.is_destroyed() {
            return Err(ParallaxError::Destroyed);
        }
        self.calibration.queue(self.scheduler.as_mut(), delay);
        Ok(())
    }

    /// Re-scan the scene's layers and return how many were found.
    pub fn update_layers(&mut self) -> Result<usize, ParallaxError> {
        let scene = self.scene.as_deref().ok_or(ParallaxError::Destroyed)?;
        Ok(self.compositor.refresh(scene))
    }

    /// Start the sensor and the tick loop.  Returns `Ok(false)` when already
    /// enabled.
    pub fn enable(&mut self) -> Result<bool, ParallaxError> {
        self.lifecycle.enable(
            self.sensors.as_mut(),
            self.scheduler.as_mut(),
            self.config.sensor_frequency_hz,
        )
    }

    /// Stop the sensor and the tick loop.  Returns `false` when not enabled.
    pub fn disable(&mut self) -> bool {
        self.lifecycle.disable(self.scheduler.as_mut())
    }

    /// Tear down: disable, disarm the calibration timer and release the
    /// scene.  Returns `false` when already destroyed.
    pub fn destroy(&mut self) -> bool {
        if !self.lifecycle.destroy(self.scheduler.as_mut()) {
            return false;
        }
        self.calibration.cancel(self.scheduler.as_mut());
        self.compositor.release();
        self.scene = None;
        true
    }

    // ── Accessors ───────────────────────────────────────────────────────────

    pub fn config(&self) -> &ParallaxConfig {
        &self.config
    }

    pub fn state(&self) -> LifecycleState {
        self.lifecycle.state()
    }

    /// Latest scaled input.
    pub fn input(&self) -> AxisPair<f64> {
        self.calibration.input()
    }

    pub fn reference(&self) -> AxisPair<f64> {
        self.calibration.reference()
    }

    pub fn is_calibration_pending(&self) -> bool {
        self.calibration.is_pending()
    }

    pub fn motion(&self) -> AxisPair<f64> {
        self.motion.motion()
    }

    pub fn velocity(&self) -> AxisPair<f64> {
        self.motion.velocity()
    }

    /// Container size read by the last tick.
    pub fn bounds(&self) -> AxisPair<f64> {
        self.bounds
    }

    pub fn layer_count(&self) -> usize {
        self.compositor.len()
    }

    pub fn pending_frame(&self) -> Option<FrameHandle> {
        self.lifecycle.pending_frame()
    }

    pub fn calibration_timer(&self) -> Option<TimerHandle> {
        self.calibration.armed_timer()
    }
}

impl Drop for Parallax {
    fn drop(&mut self) {
        self.destroy();
    }
}

fn check_finite(option: &str, value: Option<f64>) -> Result<(), ParallaxError> {
    if let Some(value) = value {
        ParallaxError::require_finite(option, value)?;
    }
    Ok(())
}
