//! [`LifecycleController`] – sensor subscription and tick-loop gating.
//!
//! # State machine
//!
//! ```text
//!            enable()                 destroy()
//! Disabled ───────────► Enabled ─────────────────► Destroyed
//!    ▲                     │                           ▲
//!    └──── disable() ──────┘                           │
//!    └─────────────────────── destroy() ───────────────┘
//! ```
//!
//! The sensor subscription and the pending animation frame exist if and only
//! if the controller is [`Enabled`][LifecycleState::Enabled].  Display
//! notifications pause the controller and, when the display comes back,
//! restore whatever state it had before.

use parallax_hal::{FrameHandle, OrientationSensor, Scheduler, SensorProvider};
use parallax_types::ParallaxError;
use tracing::{debug, info, trace};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleState {
    Disabled,
    Enabled,
    /// Terminal.
    Destroyed,
}

pub struct LifecycleController {
    state: LifecycleState,
    was_enabled: bool,
    display_on: bool,
    sensor: Option<Box<dyn OrientationSensor>>,
    frame: Option<FrameHandle>,
}

impl Default for LifecycleController {
    fn default() -> Self {
        Self::new()
    }
}

impl LifecycleController {
    /// A disabled controller that assumes the display is on.
    pub fn new() -> Self {
        Self {
            state: LifecycleState::Disabled,
            was_enabled: false,
            display_on: true,
            sensor: None,
            frame: None,
        }
    }

    /// Open and start the sensor, then schedule the first frame.
    ///
    /// Returns `Ok(false)` when already enabled.
    ///
    /// # Errors
    ///
    /// [`ParallaxError::Destroyed`] after [`destroy`][Self::destroy], or the
    /// sensor fault when the sensor cannot be opened or started.  On error
    /// nothing stays acquired and the controller remains disabled.
    pub fn enable(
        &mut self,
        sensors: &mut dyn SensorProvider,
        scheduler: &mut dyn Scheduler,
        frequency_hz: f64,
    ) -> Result<bool, ParallaxError> {
        match self.state {
            LifecycleState::Destroyed => return Err(ParallaxError::Destroyed),
            LifecycleState::Enabled => return Ok(false),
            LifecycleState::Disabled => {}
        }

        let mut sensor = sensors.open(frequency_hz)?;
        sensor.start()?;

        self.sensor = Some(sensor);
        self.frame = Some(scheduler.request_frame());
        self.state = LifecycleState::Enabled;
        info!(frequency_hz, "parallax enabled");
        Ok(true)
    }

    /// Stop and release the sensor and cancel the pending frame.
    ///
    /// Returns `false` when not enabled.
    pub fn disable(&mut self, scheduler: &mut dyn Scheduler) -> bool {
        if self.state != LifecycleState::Enabled {
            return false;
        }
        if let Some(mut sensor) = self.sensor.take() {
            sensor.stop();
        }
        if let Some(frame) = self.frame.take() {
            scheduler.cancel_frame(frame);
        }
        self.state = LifecycleState::Disabled;
        info!("parallax disabled");
        true
    }

    /// Consume a delivered frame.  Returns `false` for a frame that is not
    /// the pending one, or when not enabled.
    pub fn accept_frame(&mut self, frame: FrameHandle) -> bool {
        if self.state != LifecycleState::Enabled || self.frame != Some(frame) {
            trace!(frame = frame.0, "ignoring stale frame");
            return false;
        }
        self.frame = None;
        true
    }

    /// Request the next frame if enabled and none is pending.
    pub fn schedule_frame(&mut self, scheduler: &mut dyn Scheduler) -> Option<FrameHandle> {
        if self.state == LifecycleState::Enabled && self.frame.is_none() {
            self.frame = Some(scheduler.request_frame());
        }
        self.frame
    }

    /// React to a display visibility change.
    ///
    /// Display off remembers whether the controller was enabled and
    /// disables it; display on re-enables it if it was.  A notification that
    /// repeats the current display state is ignored.
    ///
    /// A failed resume leaves the display recorded as off, so the intent to
    /// run survives and the next display-on retries.
    pub fn display_changed(
        &mut self,
        on: bool,
        sensors: &mut dyn SensorProvider,
        scheduler: &mut dyn Scheduler,
        frequency_hz: f64,
    ) -> Result<(), ParallaxError> {
        if self.state == LifecycleState::Destroyed || on == self.display_on {
            return Ok(());
        }
        debug!(on, was_enabled = self.was_enabled, "display changed");

        if on {
            if self.was_enabled {
                self.enable(sensors, scheduler, frequency_hz)?;
            }
        } else {
            self.was_enabled = self.state == LifecycleState::Enabled;
            self.disable(scheduler);
        }
        self.display_on = on;
        Ok(())
    }

    /// Disable and enter the terminal state.  Returns `false` when already
    /// destroyed.
    pub fn destroy(&mut self, scheduler: &mut dyn Scheduler) -> bool {
        if self.state == LifecycleState::Destroyed {
            return false;
        }
        self.disable(scheduler);
        self.was_enabled = false;
        self.state = LifecycleState::Destroyed;
        info!("parallax destroyed");
        true
    }

    pub fn state(&self) -> LifecycleState {
        self.state
    }

    pub fn is_enabled(&self) -> bool {
        self.state == LifecycleState::Enabled
    }

    pub fn is_destroyed(&self) -> bool {
        self.state == LifecycleState::Destroyed
    }

    pub fn was_enabled(&self) -> bool {
        self.was_enabled
    }

    pub fn display_on(&self) -> bool {
        self.display_on
    }

    pub fn pending_frame(&self) -> Option<FrameHandle> {
        self.frame
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parallax_hal::sim::{SimScheduler, SimSensorProvider};

    struct Rig {
        sensors: SimSensorProvider,
        scheduler: SimScheduler,
        lifecycle: LifecycleController,
    }

    impl Rig {
        fn new(sensors: SimSensorProvider) -> Self {
            Self {
                sensors,
                scheduler: SimScheduler::new(),
                lifecycle: LifecycleController::new(),
            }
        }

        fn enable(&mut self) -> Result<bool, ParallaxError> {
            self.lifecycle
                .enable(&mut self.sensors, &mut self.scheduler, 10.0)
        }

        fn display(&mut self, on: bool) -> Result<(), ParallaxError> {
            self.lifecycle
                .display_changed(on, &mut self.sensors, &mut self.scheduler, 10.0)
        }
    }

    #[test]
    fn enable_twice_acquires_once() {
        let mut rig = Rig::new(SimSensorProvider::new());
        assert!(rig.enable().unwrap());
        assert!(!rig.enable().unwrap());

        assert_eq!(rig.sensors.opened(), 1);
        assert_eq!(rig.sensors.running(), 1);
        assert_eq!(rig.scheduler.pending_frames(), 1);
        assert_eq!(rig.lifecycle.state(), LifecycleState::Enabled);
    }

    #[test]
    fn disable_releases_everything() {
        let mut rig = Rig::new(SimSensorProvider::new());
        rig.enable().unwrap();
        assert!(rig.lifecycle.disable(&mut rig.scheduler));
        assert!(!rig.lifecycle.disable(&mut rig.scheduler));

        assert_eq!(rig.sensors.live(), 0);
        assert_eq!(rig.sensors.running(), 0);
        assert_eq!(rig.scheduler.pending_frames(), 0);
        assert_eq!(rig.lifecycle.pending_frame(), None);
    }

    #[test]
    fn sensor_fault_leaves_controller_disabled() {
        let mut rig = Rig::new(SimSensorProvider::new().refusing_start());
        let err = rig.enable().unwrap_err();
        assert!(matches!(err, ParallaxError::SensorFault { .. }));

        assert_eq!(rig.lifecycle.state(), LifecycleState::Disabled);
        assert_eq!(rig.sensors.live(), 0, "failed sensor must be released");
        assert_eq!(rig.scheduler.pending_frames(), 0);
    }

    #[test]
    fn unavailable_sensor_is_reported() {
        let mut rig = Rig::new(SimSensorProvider::new().unavailable());
        assert!(rig.enable().is_err());
        assert!(!rig.lifecycle.is_enabled());
    }

    #[test]
    fn frames_are_accepted_once() {
        let mut rig = Rig::new(SimSensorProvider::new());
        rig.enable().unwrap();
        let frame = rig.scheduler.take_frame().unwrap();

        assert!(rig.lifecycle.accept_frame(frame));
        assert!(!rig.lifecycle.accept_frame(frame), "second delivery is stale");

        let next = rig.lifecycle.schedule_frame(&mut rig.scheduler).unwrap();
        assert_ne!(next, frame);
        assert_eq!(rig.lifecycle.schedule_frame(&mut rig.scheduler), Some(next));
        assert_eq!(rig.scheduler.pending_frames(), 1);
    }

    #[test]
    fn no_frames_scheduled_while_disabled() {
        let mut rig = Rig::new(SimSensorProvider::new());
        assert_eq!(rig.lifecycle.schedule_frame(&mut rig.scheduler), None);
        assert_eq!(rig.scheduler.frames_requested(), 0);
    }

    #[test]
    fn display_toggle_restores_enabled_state() {
        let mut rig = Rig::new(SimSensorProvider::new());
        rig.enable().unwrap();

        rig.display(false).unwrap();
        assert!(!rig.lifecycle.is_enabled());
        assert!(rig.lifecycle.was_enabled());
        assert_eq!(rig.sensors.live(), 0);

        rig.display(true).unwrap();
        assert!(rig.lifecycle.is_enabled());
        assert_eq!(rig.sensors.running(), 1);
        assert_eq!(rig.scheduler.pending_frames(), 1);
    }

    #[test]
    fn duplicate_display_off_keeps_intent() {
        let mut rig = Rig::new(SimSensorProvider::new());
        rig.enable().unwrap();

        rig.display(false).unwrap();
        rig.display(false).unwrap();
        assert!(rig.lifecycle.was_enabled());

        rig.display(true).unwrap();
        assert!(rig.lifecycle.is_enabled());
    }

    #[test]
    fn failed_resume_is_retried_on_next_display_on() {
        let mut rig = Rig::new(SimSensorProvider::new());
        rig.enable().unwrap();
        rig.display(false).unwrap();

        rig.sensors.set_refusing_start(true);
        let err = rig.display(true).unwrap_err();
        assert!(matches!(err, ParallaxError::SensorFault { .. }));
        assert!(rig.lifecycle.was_enabled());
        assert!(!rig.lifecycle.display_on());
        assert_eq!(rig.sensors.opened(), 2);

        // Another off/on cycle still tries to resume.
        rig.display(false).unwrap();
        assert!(rig.lifecycle.was_enabled());
        assert!(rig.display(true).is_err());
        assert_eq!(rig.sensors.opened(), 3);
        assert_eq!(rig.sensors.live(), 0);

        rig.sensors.set_refusing_start(false);
        rig.display(false).unwrap();
        rig.display(true).unwrap();
        assert!(rig.lifecycle.is_enabled());
        assert!(rig.lifecycle.display_on());
        assert_eq!(rig.sensors.opened(), 4);
        assert_eq!(rig.sensors.running(), 1);
    }

    #[test]
    fn display_on_does_not_enable_a_disabled_controller() {
        let mut rig = Rig::new(SimSensorProvider::new());
        rig.display(false).unwrap();
        rig.display(true).unwrap();
        assert!(!rig.lifecycle.is_enabled());
        assert_eq!(rig.sensors.opened(), 0);
    }

    #[test]
    fn destroy_is_terminal() {
        let mut rig = Rig::new(SimSensorProvider::new());
        rig.enable().unwrap();

        assert!(rig.lifecycle.destroy(&mut rig.scheduler));
        assert!(!rig.lifecycle.destroy(&mut rig.scheduler));
        assert_eq!(rig.scheduler.active(), 0);
        assert_eq!(rig.sensors.live(), 0);

        assert_eq!(rig.enable(), Err(ParallaxError::Destroyed));
        rig.display(false).unwrap();
        rig.display(true).unwrap();
        assert_eq!(rig.sensors.opened(), 1);
    }
}
