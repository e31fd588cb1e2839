//! [`ParallaxRuntime`] – single-threaded async host for one [`Parallax`].
//!
//! The runtime owns the engine together with a [`LoopScheduler`] and a
//! [`ChannelSensorProvider`], and multiplexes every event source with
//! `tokio::select!`:
//!
//! | Source | Delivered to |
//! |---|---|
//! | `mpsc::Receiver<Vec<f64>>` (sensor started) | [`Parallax::on_orientation_reading`] |
//! | frame interval (while a frame is pending) | [`Parallax::on_animation_frame`] |
//! | earliest armed timeout | [`Parallax::on_calibration_timer`] |
//! | `watch::Receiver<bool>` | [`Parallax::on_display_changed`] |
//! | `oneshot::Receiver<()>` (or its sender dropped) | [`Parallax::destroy`], then return |
//!
//! Samples are raw `[qw, qx, qy, qz]` readings; missing components count as 0.
//!
//! Everything runs on the calling task; the engine and its collaborators are
//! `!Send`, so drive [`ParallaxRuntime::run`] with `.await`, `tokio::join!`
//! or a `LocalSet` rather than `tokio::spawn`.
//!
//! # Example
//!
//! ```rust,no_run
//! use parallax_engine::ParallaxOptions;
//! use parallax_hal::sim::SimScene;
//! use parallax_runtime::{ParallaxRuntime, RuntimeConfig};
//! use tokio::sync::{mpsc, oneshot, watch};
//!
//! # async fn demo() -> Result<(), parallax_types::ParallaxError> {
//! let scene = SimScene::new(800.0, 600.0).with_layer(Some(50.0));
//! let runtime = ParallaxRuntime::new(
//!     Box::new(scene),
//!     &ParallaxOptions::default(),
//!     RuntimeConfig::default(),
//! )?;
//!
//! let (_samples_tx, samples_rx) = mpsc::channel(64);
//! let (_display_tx, display_rx) = watch::channel(true);
//! let (_stop_tx, stop_rx) = oneshot::channel();
//! let engine = runtime.run(samples_rx, display_rx, stop_rx).await;
//! assert!(engine.state() == parallax_engine::LifecycleState::Destroyed);
//! # Ok(())
//! # }
//! ```

use std::time::Duration;

use parallax_engine::{Parallax, ParallaxOptions};
use parallax_hal::Scene;
use parallax_types::{ParallaxError, Quaternion};
use tokio::sync::{mpsc, oneshot, watch};
use tokio::time::{self, Instant, MissedTickBehavior};
use tracing::{debug, info, warn};

use crate::scheduler::LoopScheduler;
use crate::sensor::ChannelSensorProvider;

/// Default animation frame interval (60 Hz).
pub const DEFAULT_FRAME_INTERVAL: Duration = Duration::from_micros(16_667);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RuntimeConfig {
    /// Time between animation frames.
    pub frame_interval: Duration,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            frame_interval: DEFAULT_FRAME_INTERVAL,
        }
    }
}

pub struct ParallaxRuntime {
    engine: Parallax,
    scheduler: LoopScheduler,
    sensor: ChannelSensorProvider,
    config: RuntimeConfig,
}

impl ParallaxRuntime {
    /// Build the engine on `scene` with runtime-backed collaborators.
    ///
    /// # Errors
    ///
    /// Returns [`ParallaxError::InvalidOption`] for invalid `options`.
    pub fn new(
        scene: Box<dyn Scene>,
        options: &ParallaxOptions,
        config: RuntimeConfig,
    ) -> Result<Self, ParallaxError> {
        if config.frame_interval.is_zero() {
            return Err(ParallaxError::invalid("frameInterval", "must be non-zero"));
        }
        let scheduler = LoopScheduler::new();
        let sensor = ChannelSensorProvider::new();
        let engine = Parallax::new(
            scene,
            options,
            Box::new(sensor.clone()),
            Box::new(scheduler.clone()),
        )?;
        Ok(Self {
            engine,
            scheduler,
            sensor,
            config,
        })
    }

    pub fn engine(&self) -> &Parallax {
        &self.engine
    }

    /// Mutable access for setters and lifecycle calls before [`run`][Self::run].
    pub fn engine_mut(&mut self) -> &mut Parallax {
        &mut self.engine
    }

    pub fn scheduler(&self) -> &LoopScheduler {
        &self.scheduler
    }

    pub fn sensor(&self) -> &ChannelSensorProvider {
        &self.sensor
    }

    /// Drive the engine until `shutdown` resolves, then destroy it and hand
    /// it back.
    pub async fn run(
        self,
        mut samples: mpsc::Receiver<Vec<f64>>,
        mut display: watch::Receiver<bool>,
        mut shutdown: oneshot::Receiver<()>,
    ) -> Parallax {
        let Self {
            mut engine,
            scheduler,
            sensor,
            config,
        } = self;

        let mut ticker = time::interval(config.frame_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        let mut samples_open = true;
        let mut display_open = true;

        let initially_on = *display.borrow_and_update();
        if let Err(e) = engine.on_display_changed(initially_on) {
            warn!(error = %e, "initial display state could not be applied");
        }
        info!(
            frame_interval = ?config.frame_interval,
            sensor_frequency_hz = ?sensor.frequency_hz(),
            "parallax runtime started"
        );

        loop {
            let deadline = scheduler.next_deadline();
            let frame_pending = scheduler.has_frame();

            tokio::select! {
                _ = &mut shutdown => break,

                reading = samples.recv(), if samples_open => match reading {
                    Some(components) if sensor.is_active() => {
                        engine.on_orientation_reading(Quaternion::from_components(&components));
                    }
                    Some(_) => {}
                    None => {
                        samples_open = false;
                        debug!("sample channel closed");
                    }
                },

                changed = display.changed(), if display_open => match changed {
                    Ok(()) => {
                        let on = *display.borrow_and_update();
                        if let Err(e) = engine.on_display_changed(on) {
                            warn!(error = %e, "failed to resume after display on");
                        }
                    }
                    Err(_) => {
                        display_open = false;
                        debug!("display channel closed");
                    }
                },

                _ = time::sleep_until(deadline.unwrap_or_else(Instant::now)),
                    if deadline.is_some() =>
                {
                    for timer in scheduler.take_due(Instant::now()) {
                        engine.on_calibration_timer(timer);
                    }
                }

                _ = ticker.tick(), if frame_pending => {
                    if let Some(frame) = scheduler.next_frame() {
                        engine.on_animation_frame(frame);
                    }
                }
            }
        }

        engine.destroy();
        info!("parallax runtime stopped");
        engine
    }
}
