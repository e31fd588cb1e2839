//! [`LoopScheduler`] – frame requests and timeouts on the tokio clock.
//!
//! The engine only records what it wants; the event loop asks the scheduler
//! whether a frame is pending and when the next timeout is due, and delivers
//! them itself.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;
use std::time::Duration;

use parallax_hal::{FrameHandle, Scheduler, TimerHandle};
use tokio::time::Instant;

#[derive(Debug, Default)]
struct LoopState {
    next_id: u64,
    frames: VecDeque<FrameHandle>,
    timers: Vec<(TimerHandle, Instant)>,
}

impl LoopState {
    fn next_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }
}

/// Shared handle: one clone goes to the engine, the event loop keeps another.
#[derive(Clone, Default)]
pub struct LoopScheduler {
    state: Rc<RefCell<LoopState>>,
}

impl LoopScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn has_frame(&self) -> bool {
        !self.state.borrow().frames.is_empty()
    }

    /// Pop the oldest pending frame.
    pub fn next_frame(&self) -> Option<FrameHandle> {
        self.state.borrow_mut().frames.pop_front()
    }

    /// Earliest deadline among the armed timeouts.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.state
            .borrow()
            .timers
            .iter()
            .map(|(_, deadline)| *deadline)
            .min()
    }

    /// Remove and return every timeout due at `now`, earliest first.
    pub fn take_due(&self, now: Instant) -> Vec<TimerHandle> {
        let mut state = self.state.borrow_mut();
        let mut due: Vec<(TimerHandle, Instant)> = state
            .timers
            .iter()
            .copied()
            .filter(|(_, deadline)| *deadline <= now)
            .collect();
        state.timers.retain(|(_, deadline)| *deadline > now);
        due.sort_by_key(|(timer, deadline)| (*deadline, *timer));
        due.into_iter().map(|(timer, _)| timer).collect()
    }

    /// Pending frames plus armed timeouts.
    pub fn active(&self) -> usize {
        let state = self.state.borrow();
        state.frames.len() + state.timers.len()
    }
}

impl Scheduler for LoopScheduler {
    fn request_frame(&mut self) -> FrameHandle {
        let mut state = self.state.borrow_mut();
        let frame = FrameHandle(state.next_id());
        state.frames.push_back(frame);
        frame
    }

    fn cancel_frame(&mut self, frame: FrameHandle) {
        self.state.borrow_mut().frames.retain(|f| *f != frame);
    }

    fn set_timeout(&mut self, delay: Duration) -> TimerHandle {
        let mut state = self.state.borrow_mut();
        let timer = TimerHandle(state.next_id());
        state.timers.push((timer, Instant::now() + delay));
        timer
    }

    fn clear_timeout(&mut self, timer: TimerHandle) {
        self.state.borrow_mut().timers.retain(|(t, _)| *t != timer);
    }
}
