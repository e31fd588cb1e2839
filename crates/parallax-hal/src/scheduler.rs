//! Frame and timer scheduling.
//!
//! The engine asks for at most one animation frame at a time and at most one
//! calibration timeout at a time.  Both come back to the engine as handles so
//! a callback that arrives after its request was cancelled can be recognised
//! and dropped.

use std::time::Duration;

/// Opaque identifier of a requested animation frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FrameHandle(pub u64);

/// Opaque identifier of an armed one-shot timeout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerHandle(pub u64);

/// Animation-frame and timeout source.
///
/// Implementations call back into the engine's frame handler with the
/// [`FrameHandle`] and into its timer handler with the [`TimerHandle`] they
/// returned here.
pub trait Scheduler {
    /// Request a callback on the next render tick.
    fn request_frame(&mut self) -> FrameHandle;

    /// Cancel a pending frame request.  Unknown handles are ignored.
    fn cancel_frame(&mut self, frame: FrameHandle);

    /// Arm a one-shot timeout that fires after `delay`.
    fn set_timeout(&mut self, delay: Duration) -> TimerHandle;

    /// Disarm a timeout.  Unknown or already fired handles are ignored.
    fn clear_timeout(&mut self, timer: TimerHandle);
}
