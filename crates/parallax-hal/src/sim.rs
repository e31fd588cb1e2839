//! In-process simulators for headless tests and hosts without a device.
//!
//! Every simulator is a cheap `Clone` handle around shared state: hand one
//! clone to the engine as its collaborator and keep the other to drive it
//! and to assert on what the engine did.
//!
//! # Example
//!
//! ```rust
//! use parallax_hal::sim::{SimScene, SimScheduler, SimSensorProvider};
//! use parallax_hal::{OrientationSensor, Scheduler, SensorProvider};
//!
//! let sensors = SimSensorProvider::new();
//! let mut handle = sensors.clone();
//! let mut sensor = handle.open(10.0).expect("sim sensor must open");
//! sensor.start().expect("sim sensor must start");
//! assert_eq!(sensors.running(), 1);
//!
//! let mut scheduler = SimScheduler::new();
//! let frame = scheduler.request_frame();
//! assert_eq!(scheduler.take_frame(), Some(frame));
//!
//! let scene = SimScene::new(800.0, 600.0).with_layer(Some(50.0));
//! assert_eq!(scene.layer_count(), 1);
//! ```

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;
use std::time::Duration;

use parallax_types::{ParallaxError, Translation};
use tracing::debug;

use crate::scene::{Layer, Scene};
use crate::scheduler::{FrameHandle, Scheduler, TimerHandle};
use crate::sensor::{OrientationSensor, SensorProvider};

// ────────────────────────────────────────────────────────────────────────────
// Sensor
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Default)]
struct SensorLog {
    opened: usize,
    released: usize,
    running: usize,
    last_frequency: Option<f64>,
    unavailable: bool,
    refuse_start: bool,
}

/// Simulated orientation-sensor factory that counts subscriptions.
#[derive(Clone, Default)]
pub struct SimSensorProvider {
    log: Rc<RefCell<SensorLog>>,
}

impl SimSensorProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent [`SensorProvider::open`] fail, as on a device
    /// without an orientation sensor.
    pub fn unavailable(self) -> Self {
        self.log.borrow_mut().unavailable = true;
        self
    }

    /// Open successfully but refuse to start, as when permission is denied.
    pub fn refusing_start(self) -> Self {
        self.set_refusing_start(true);
        self
    }

    /// Toggle start refusal on every handle sharing this log.
    pub fn set_refusing_start(&self, refuse: bool) {
        self.log.borrow_mut().refuse_start = refuse;
    }

    /// Number of subscriptions opened so far.
    pub fn opened(&self) -> usize {
        self.log.borrow().opened
    }

    /// Number of subscriptions currently started.
    pub fn running(&self) -> usize {
        self.log.borrow().running
    }

    /// Number of subscriptions opened and not yet released.
    pub fn live(&self) -> usize {
        let log = self.log.borrow();
        log.opened - log.released
    }

    /// Frequency passed to the most recent `open`.
    pub fn last_frequency(&self) -> Option<f64> {
        self.log.borrow().last_frequency
    }
}

impl SensorProvider for SimSensorProvider {
    fn open(&mut self, frequency_hz: f64) -> Result<Box<dyn OrientationSensor>, ParallaxError> {
        let mut log = self.log.borrow_mut();
        if log.unavailable {
            return Err(ParallaxError::SensorFault {
                component: "sim_orientation".to_string(),
                details: "no orientation sensor available".to_string(),
            });
        }
        log.opened += 1;
        log.last_frequency = Some(frequency_hz);
        debug!(frequency_hz, "sim orientation sensor opened");
        Ok(Box::new(SimSensor {
            log: Rc::clone(&self.log),
            running: false,
        }))
    }
}

/// A subscription handed out by [`SimSensorProvider`].
pub struct SimSensor {
    log: Rc<RefCell<SensorLog>>,
    running: bool,
}

impl OrientationSensor for SimSensor {
    fn start(&mut self) -> Result<(), ParallaxError> {
        if self.log.borrow().refuse_start {
            return Err(ParallaxError::SensorFault {
                component: "sim_orientation".to_string(),
                details: "permission denied".to_string(),
            });
        }
        if !self.running {
            self.running = true;
            self.log.borrow_mut().running += 1;
        }
        Ok(())
    }

    fn stop(&mut self) {
        if self.running {
            self.running = false;
            self.log.borrow_mut().running -= 1;
        }
    }
}

impl Drop for SimSensor {
    fn drop(&mut self) {
        self.stop();
        self.log.borrow_mut().released += 1;
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Scheduler
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Default)]
struct ScheduleLog {
    next_id: u64,
    frames: VecDeque<FrameHandle>,
    timers: Vec<(TimerHandle, Duration)>,
    frames_requested: usize,
}

impl ScheduleLog {
    fn next_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }
}

/// Manually driven scheduler.  Nothing fires on its own: tests pop pending
/// frames and timers and hand them to the engine.
#[derive(Clone, Default)]
pub struct SimScheduler {
    log: Rc<RefCell<ScheduleLog>>,
}

impl SimScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of frame requests not yet taken or cancelled.
    pub fn pending_frames(&self) -> usize {
        self.log.borrow().frames.len()
    }

    /// Armed timeouts with the delay each was armed with.
    pub fn pending_timers(&self) -> Vec<(TimerHandle, Duration)> {
        self.log.borrow().timers.clone()
    }

    /// Total number of frames ever requested.
    pub fn frames_requested(&self) -> usize {
        self.log.borrow().frames_requested
    }

    /// Pending frames plus armed timeouts.
    pub fn active(&self) -> usize {
        let log = self.log.borrow();
        log.frames.len() + log.timers.len()
    }

    /// Pop the oldest pending frame, as the render clock would deliver it.
    pub fn take_frame(&self) -> Option<FrameHandle> {
        self.log.borrow_mut().frames.pop_front()
    }

    /// Pop the armed timeout that would fire first (shortest delay, oldest
    /// first on ties).
    pub fn take_timer(&self) -> Option<(TimerHandle, Duration)> {
        let mut log = self.log.borrow_mut();
        let index = log
            .timers
            .iter()
            .enumerate()
            .min_by_key(|(i, (_, delay))| (*delay, *i))
            .map(|(i, _)| i)?;
        Some(log.timers.remove(index))
    }
}

impl Scheduler for SimScheduler {
    fn request_frame(&mut self) -> FrameHandle {
        let mut log = self.log.borrow_mut();
        let frame = FrameHandle(log.next_id());
        log.frames.push_back(frame);
        log.frames_requested += 1;
        frame
    }

    fn cancel_frame(&mut self, frame: FrameHandle) {
        self.log.borrow_mut().frames.retain(|f| *f != frame);
    }

    fn set_timeout(&mut self, delay: Duration) -> TimerHandle {
        let mut log = self.log.borrow_mut();
        let timer = TimerHandle(log.next_id());
        log.timers.push((timer, delay));
        timer
    }

    fn clear_timeout(&mut self, timer: TimerHandle) {
        self.log.borrow_mut().timers.retain(|(t, _)| *t != timer);
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Scene
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Default)]
struct LayerState {
    depth: Option<f64>,
    translation: Translation,
    writes: usize,
}

#[derive(Debug)]
struct SceneState {
    width: f64,
    height: f64,
    layers: Vec<Rc<RefCell<LayerState>>>,
}

/// Simulated scene container with inspectable layers.
#[derive(Clone)]
pub struct SimScene {
    state: Rc<RefCell<SceneState>>,
}

impl SimScene {
    /// Create an empty container of the given size.
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            state: Rc::new(RefCell::new(SceneState {
                width,
                height,
                layers: Vec::new(),
            })),
        }
    }

    /// Builder form of [`push_layer`][Self::push_layer].
    pub fn with_layer(self, depth: Option<f64>) -> Self {
        self.push_layer(depth);
        self
    }

    /// Append a layer carrying the given `layer` depth attribute.
    pub fn push_layer(&self, depth: Option<f64>) {
        self.state
            .borrow_mut()
            .layers
            .push(Rc::new(RefCell::new(LayerState {
                depth,
                ..LayerState::default()
            })));
    }

    /// Resize the container.
    pub fn set_bounds(&self, width: f64, height: f64) {
        let mut state = self.state.borrow_mut();
        state.width = width;
        state.height = height;
    }

    pub fn layer_count(&self) -> usize {
        self.state.borrow().layers.len()
    }

    /// Last translation written to layer `index`.
    pub fn translation(&self, index: usize) -> Option<Translation> {
        self.state
            .borrow()
            .layers
            .get(index)
            .map(|layer| layer.borrow().translation)
    }

    /// Number of translations written to layer `index`.
    pub fn writes(&self, index: usize) -> usize {
        self.state
            .borrow()
            .layers
            .get(index)
            .map_or(0, |layer| layer.borrow().writes)
    }
}

impl Scene for SimScene {
    fn width(&self) -> f64 {
        self.state.borrow().width
    }

    fn height(&self) -> f64 {
        self.state.borrow().height
    }

    fn layers(&self) -> Vec<Box<dyn Layer>> {
        self.state
            .borrow()
            .layers
            .iter()
            .map(|state| {
                Box::new(SimLayer {
                    state: Rc::clone(state),
                }) as Box<dyn Layer>
            })
            .collect()
    }
}

/// Handle to one [`SimScene`] layer.
pub struct SimLayer {
    state: Rc<RefCell<LayerState>>,
}

impl Layer for SimLayer {
    fn depth_attribute(&self) -> Option<f64> {
        self.state.borrow().depth
    }

    fn set_translation(&mut self, translation: Translation) {
        let mut state = self.state.borrow_mut();
        state.translation = translation;
        state.writes += 1;
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sim_sensor_counts_running_and_released() {
        let sensors = SimSensorProvider::new();
        let mut factory = sensors.clone();

        let mut sensor = factory.open(10.0).expect("sim sensor must open");
        assert_eq!(sensors.opened(), 1);
        assert_eq!(sensors.running(), 0);
        assert_eq!(sensors.last_frequency(), Some(10.0));

        sensor.start().unwrap();
        sensor.start().unwrap();
        assert_eq!(sensors.running(), 1, "double start must not double count");

        drop(sensor);
        assert_eq!(sensors.running(), 0, "drop stops a running sensor");
        assert_eq!(sensors.live(), 0);
    }

    #[test]
    fn unavailable_sensor_fails_to_open() {
        let mut sensors = SimSensorProvider::new().unavailable();
        let result = sensors.open(10.0);
        assert!(matches!(result, Err(ParallaxError::SensorFault { .. })));
        assert_eq!(sensors.opened(), 0);
    }

    #[test]
    fn refusing_sensor_opens_but_does_not_start() {
        let mut sensors = SimSensorProvider::new().refusing_start();
        let mut sensor = sensors.open(10.0).unwrap();
        assert!(sensor.start().is_err());
        assert_eq!(sensors.running(), 0);
    }

    #[test]
    fn sim_scheduler_frames_are_fifo_and_cancellable() {
        let mut scheduler = SimScheduler::new();
        let a = scheduler.request_frame();
        let b = scheduler.request_frame();
        assert_ne!(a, b);
        scheduler.cancel_frame(a);
        assert_eq!(scheduler.pending_frames(), 1);
        assert_eq!(scheduler.take_frame(), Some(b));
        assert_eq!(scheduler.take_frame(), None);
        assert_eq!(scheduler.frames_requested(), 2);
    }

    #[test]
    fn sim_scheduler_takes_shortest_timer_first() {
        let mut scheduler = SimScheduler::new();
        let slow = scheduler.set_timeout(Duration::from_millis(500));
        let fast = scheduler.set_timeout(Duration::ZERO);
        assert_eq!(scheduler.active(), 2);

        assert_eq!(scheduler.take_timer(), Some((fast, Duration::ZERO)));
        scheduler.clear_timeout(slow);
        assert_eq!(scheduler.take_timer(), None);
        assert_eq!(scheduler.active(), 0);
    }

    #[test]
    fn sim_scene_layers_share_state_with_the_scene() {
        let scene = SimScene::new(320.0, 240.0)
            .with_layer(Some(20.0))
            .with_layer(None);

        let mut layers = scene.layers();
        assert_eq!(layers.len(), 2);
        assert_eq!(layers[0].depth_attribute(), Some(20.0));
        assert_eq!(layers[1].depth_attribute(), None);

        layers[1].set_translation(Translation::new(4.0, 2.0));
        assert_eq!(scene.translation(1), Some(Translation::new(4.0, 2.0)));
        assert_eq!(scene.writes(1), 1);
        assert_eq!(scene.writes(0), 0);
        assert_eq!(scene.translation(7), None);
    }

    #[test]
    fn sim_scene_bounds_can_change() {
        let scene = SimScene::new(100.0, 50.0);
        scene.set_bounds(640.0, 480.0);
        assert_eq!(scene.width(), 640.0);
        assert_eq!(scene.height(), 480.0);
    }
}
