//! `parallax-engine` – orientation-driven parallax
//!
//! Turns a stream of device-orientation readings into smoothed, depth-weighted
//! translations of the layers of a scene.
//!
//! # Modules
//!
//! - [`config`] – [`ParallaxOptions`][config::ParallaxOptions] (partial,
//!   camelCase, TOML-loadable) resolved once into a validated
//!   [`ParallaxConfig`][config::ParallaxConfig].
//! - [`calibration`] – [`CalibrationController`][calibration::CalibrationController]:
//!   the neutral reference pose, its one-shot capture flag and the
//!   calibration timer.
//! - [`motion`] – [`MotionState`][motion::MotionState]: per-tick scaling,
//!   clamping and exponential smoothing.
//! - [`compositor`] – [`LayerCompositor`][compositor::LayerCompositor]:
//!   depth factors and per-layer translations.
//! - [`lifecycle`] – [`LifecycleController`][lifecycle::LifecycleController]:
//!   enable/disable/destroy and display gating of the sensor and tick loop.
//! - [`parallax`] – [`Parallax`][parallax::Parallax]: the facade that owns
//!   the collaborators and exposes the public operations and event handlers.

pub mod calibration;
pub mod compositor;
pub mod config;
pub mod lifecycle;
pub mod motion;
pub mod parallax;

pub use calibration::CalibrationController;
pub use compositor::LayerCompositor;
pub use config::{LimitSetting, ParallaxConfig, ParallaxOptions};
pub use lifecycle::{LifecycleController, LifecycleState};
pub use motion::MotionState;
pub use parallax::Parallax;
