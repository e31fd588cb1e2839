//! [`CalibrationController`] – neutral reference pose.
//!
//! The controller remembers the latest scaled input and a reference pose
//! that counts as "level".  The reference is captured opportunistically: a
//! one-shot calibration flag makes the next reading the new reference.  The
//! flag is raised at startup, whenever the calibration timer fires, and
//! (through a zero-delay timer) whenever the input drifts further than the
//! calibration threshold from the reference.

use std::time::Duration;

use parallax_hal::{Scheduler, TimerHandle};
use parallax_types::AxisPair;
use tracing::debug;

/// Tracks the reference pose, the latest input and the calibration timer.
#[derive(Debug)]
pub struct CalibrationController {
    pending: bool,
    reference: AxisPair<f64>,
    input: AxisPair<f64>,
    timer: Option<TimerHandle>,
}

impl Default for CalibrationController {
    fn default() -> Self {
        Self::new()
    }
}

impl CalibrationController {
    /// A controller whose first reading becomes the reference pose.
    pub fn new() -> Self {
        Self {
            pending: true,
            reference: AxisPair::default(),
            input: AxisPair::default(),
            timer: None,
        }
    }

    /// Record a scaled reading, capturing it as the reference pose first if
    /// calibration is pending.
    pub fn rotate(&mut self, angle: AxisPair<f64>) {
        if self.pending {
            self.pending = false;
            self.reference = angle;
            debug!(x = angle.x, y = angle.y, "reference pose captured");
        }
        self.input = angle;
    }

    /// (Re)arm the calibration timer to fire after `delay`, disarming any
    /// previously armed one.
    pub fn queue(&mut self, scheduler: &mut dyn Scheduler, delay: Duration) {
        if let Some(timer) = self.timer.take() {
            scheduler.clear_timeout(timer);
        }
        self.timer = Some(scheduler.set_timeout(delay));
    }

    /// Handle a fired timeout.  Returns `false` and changes nothing when
    /// `timer` is not the armed one.
    pub fn on_timer(&mut self, timer: TimerHandle) -> bool {
        if self.timer != Some(timer) {
            return false;
        }
        self.timer = None;
        self.pending = true;
        true
    }

    /// Disarm the calibration timer, if armed.
    pub fn cancel(&mut self, scheduler: &mut dyn Scheduler) {
        if let Some(timer) = self.timer.take() {
            scheduler.clear_timeout(timer);
        }
    }

    /// Latest input minus the reference pose.
    pub fn delta(&self) -> AxisPair<f64> {
        AxisPair::new(
            self.input.x - self.reference.x,
            self.input.y - self.reference.y,
        )
    }

    /// `true` when either axis of [`delta`][Self::delta] exceeds `threshold`.
    pub fn drift_exceeds(&self, threshold: f64) -> bool {
        let delta = self.delta();
        delta.x.abs() > threshold || delta.y.abs() > threshold
    }

    /// `true` while the next reading will become the reference pose.
    pub fn is_pending(&self) -> bool {
        self.pending
    }

    pub fn reference(&self) -> AxisPair<f64> {
        self.reference
    }

    pub fn input(&self) -> AxisPair<f64> {
        self.input
    }

    /// The currently armed timer.
    pub fn armed_timer(&self) -> Option<TimerHandle> {
        self.timer
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parallax_hal::sim::SimScheduler;

    #[test]
    fn first_reading_becomes_reference() {
        let mut calibration = CalibrationController::new();
        assert!(calibration.is_pending());

        calibration.rotate(AxisPair::new(1.0, 2.0));
        assert!(!calibration.is_pending());
        assert_eq!(calibration.reference(), AxisPair::new(1.0, 2.0));
        assert_eq!(calibration.delta(), AxisPair::new(0.0, 0.0));
    }

    #[test]
    fn later_reading_does_not_move_reference() {
        let mut calibration = CalibrationController::new();
        calibration.rotate(AxisPair::new(1.0, 2.0));
        calibration.rotate(AxisPair::new(1.5, 1.0));
        assert_eq!(calibration.reference(), AxisPair::new(1.0, 2.0));
        assert_eq!(calibration.input(), AxisPair::new(1.5, 1.0));
        assert_eq!(calibration.delta(), AxisPair::new(0.5, -1.0));
    }

    #[test]
    fn timer_fire_rearms_capture() {
        let mut scheduler = SimScheduler::new();
        let mut calibration = CalibrationController::new();
        calibration.rotate(AxisPair::new(1.0, 1.0));

        calibration.queue(&mut scheduler, Duration::from_millis(500));
        let (timer, delay) = scheduler.take_timer().expect("timer armed");
        assert_eq!(delay, Duration::from_millis(500));

        assert!(calibration.on_timer(timer));
        assert!(calibration.is_pending());
        assert_eq!(calibration.armed_timer(), None);

        calibration.rotate(AxisPair::new(3.0, -1.0));
        assert_eq!(calibration.reference(), AxisPair::new(3.0, -1.0));
    }

    #[test]
    fn requeue_replaces_armed_timer() {
        let mut scheduler = SimScheduler::new();
        let mut calibration = CalibrationController::new();
        calibration.rotate(AxisPair::new(0.0, 0.0));

        calibration.queue(&mut scheduler, Duration::from_millis(500));
        let first = calibration.armed_timer().expect("armed");
        calibration.queue(&mut scheduler, Duration::ZERO);

        assert_eq!(scheduler.pending_timers().len(), 1);
        assert!(!calibration.on_timer(first), "stale timer must be ignored");
        assert!(!calibration.is_pending());
    }

    #[test]
    fn cancel_disarms_timer() {
        let mut scheduler = SimScheduler::new();
        let mut calibration = CalibrationController::new();
        calibration.queue(&mut scheduler, Duration::from_millis(500));
        calibration.cancel(&mut scheduler);
        assert_eq!(scheduler.active(), 0);
        assert_eq!(calibration.armed_timer(), None);
    }

    #[test]
    fn drift_is_strictly_greater_than_threshold() {
        let mut calibration = CalibrationController::new();
        calibration.rotate(AxisPair::new(0.0, 0.0));

        calibration.rotate(AxisPair::new(1.0, 0.0));
        assert!(!calibration.drift_exceeds(1.0));

        calibration.rotate(AxisPair::new(0.0, -1.001));
        assert!(calibration.drift_exceeds(1.0));
    }
}
