//! Orientation sensor traits.
//!
//! A [`SensorProvider`] stands for the platform's orientation-sensor
//! constructor: every call to [`SensorProvider::open`] yields a fresh
//! [`OrientationSensor`] subscription.  Readings are not pulled through the
//! trait; the host delivers each quaternion to the engine's reading handler
//! while the sensor is started.

use parallax_types::ParallaxError;

/// A single orientation-sensor subscription.
///
/// Dropping the handle releases the subscription.
pub trait OrientationSensor {
    /// Begin delivering readings.
    ///
    /// # Errors
    ///
    /// Returns [`ParallaxError::SensorFault`] when the device refuses to
    /// start (permission denied, hardware missing, …).
    fn start(&mut self) -> Result<(), ParallaxError>;

    /// Stop delivering readings.  Stopping an idle sensor is a no-op.
    fn stop(&mut self);
}

/// Factory for [`OrientationSensor`] subscriptions.
pub trait SensorProvider {
    /// Open a new subscription sampling at `frequency_hz`.
    ///
    /// # Errors
    ///
    /// Returns [`ParallaxError::SensorFault`] when no orientation sensor is
    /// available.
    fn open(&mut self, frequency_hz: f64) -> Result<Box<dyn OrientationSensor>, ParallaxError>;
}
