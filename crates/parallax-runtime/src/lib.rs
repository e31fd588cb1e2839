//! `parallax-runtime` – async host for the parallax engine.
//!
//! # Modules
//!
//! - [`event_loop`] – [`ParallaxRuntime`][event_loop::ParallaxRuntime]: a
//!   `tokio::select!` loop that feeds samples, frames, timeouts and display
//!   changes to one engine.
//! - [`scheduler`] – [`LoopScheduler`][scheduler::LoopScheduler]: frame and
//!   timeout bookkeeping on the tokio clock.
//! - [`sensor`] – [`ChannelSensorProvider`][sensor::ChannelSensorProvider]:
//!   gates a sample channel behind the sensor start/stop lifecycle.
//! - [`telemetry`] – [`init_tracing`][telemetry::init_tracing]: global
//!   subscriber setup.

pub mod event_loop;
pub mod scheduler;
pub mod sensor;
pub mod telemetry;

pub use event_loop::{DEFAULT_FRAME_INTERVAL, ParallaxRuntime, RuntimeConfig};
pub use scheduler::LoopScheduler;
pub use sensor::ChannelSensorProvider;
