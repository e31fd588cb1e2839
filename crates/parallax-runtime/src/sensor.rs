//! [`ChannelSensorProvider`] – orientation sensor backed by a sample channel.
//!
//! The samples themselves arrive on the event loop's `mpsc` receiver; the
//! sensor only gates whether they are forwarded to the engine.

use std::cell::Cell;
use std::rc::Rc;

use parallax_hal::{OrientationSensor, SensorProvider};
use parallax_types::ParallaxError;
use tracing::debug;

#[derive(Clone, Default)]
pub struct ChannelSensorProvider {
    active: Rc<Cell<bool>>,
    frequency_hz: Rc<Cell<Option<f64>>>,
}

impl ChannelSensorProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// `true` while a subscription is started.
    pub fn is_active(&self) -> bool {
        self.active.get()
    }

    /// Frequency the current or last subscription was opened with.
    pub fn frequency_hz(&self) -> Option<f64> {
        self.frequency_hz.get()
    }
}

impl SensorProvider for ChannelSensorProvider {
    fn open(&mut self, frequency_hz: f64) -> Result<Box<dyn OrientationSensor>, ParallaxError> {
        self.frequency_hz.set(Some(frequency_hz));
        debug!(frequency_hz, "channel sensor opened");
        Ok(Box::new(ChannelSensor {
            active: Rc::clone(&self.active),
        }))
    }
}

struct ChannelSensor {
    active: Rc<Cell<bool>>,
}

impl OrientationSensor for ChannelSensor {
    fn start(&mut self) -> Result<(), ParallaxError> {
        self.active.set(true);
        Ok(())
    }

    fn stop(&mut self) {
        self.active.set(false);
    }
}

impl Drop for ChannelSensor {
    fn drop(&mut self) {
        self.active.set(false);
    }
}
