//! `parallax-hal` – collaborator boundary.
//!
//! The parallax engine never talks to a device, a display compositor or a
//! frame clock directly.  It talks to the traits in this crate, so the same
//! engine runs against real platform bindings, the async runtime in
//! `parallax-runtime`, or the in-process simulators in [`sim`].
//!
//! # Modules
//!
//! - [`sensor`] – [`SensorProvider`][sensor::SensorProvider] opens an
//!   [`OrientationSensor`][sensor::OrientationSensor] at a sampling frequency.
//! - [`scheduler`] – [`Scheduler`][scheduler::Scheduler]: animation-frame
//!   requests and one-shot timeouts addressed by opaque handles.
//! - [`scene`] – [`Scene`][scene::Scene] and [`Layer`][scene::Layer]: the
//!   container bounds and the ordered layers that receive translations.
//! - [`sim`] – recording stub implementations of all of the above for tests
//!   and headless hosts.

pub mod scene;
pub mod scheduler;
pub mod sensor;
pub mod sim;

pub use scene::{Layer, Scene};
pub use scheduler::{FrameHandle, Scheduler, TimerHandle};
pub use sensor::{OrientationSensor, SensorProvider};
