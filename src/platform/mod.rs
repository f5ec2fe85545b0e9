//! Platform abstraction layer
//!
//! Handles host differences for:
//! - Time (a millisecond clock)
//! - Frame pacing (the "request next tick" capability)
//!
//! The manual implementations share their state between clones, so a test or
//! headless loop can keep one handle while the session owns another.

#[cfg(target_arch = "wasm32")]
pub mod web;

use std::cell::Cell;
use std::rc::Rc;

/// Monotonic millisecond clock
pub trait Clock {
    fn now_ms(&self) -> f64;
}

/// Token for one outstanding frame request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameHandle(pub u32);

/// Ask the host to call back on its next frame
pub trait FrameScheduler {
    fn request_frame(&mut self) -> FrameHandle;
    /// Withdraw a request. Unknown or already-served handles are ignored.
    fn cancel_frame(&mut self, handle: FrameHandle);
}

/// Clock that only moves when told to
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now: Rc<Cell<f64>>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn advance(&self, ms: f64) {
        self.now.set(self.now.get() + ms);
    }

    pub fn set(&self, ms: f64) {
        self.now.set(ms);
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> f64 {
        self.now.get()
    }
}

/// Wall clock measured from construction
#[cfg(not(target_arch = "wasm32"))]
#[derive(Debug, Clone)]
pub struct SystemClock {
    start: std::time::Instant,
}

#[cfg(not(target_arch = "wasm32"))]
impl Default for SystemClock {
    fn default() -> Self {
        Self {
            start: std::time::Instant::now(),
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl Clock for SystemClock {
    fn now_ms(&self) -> f64 {
        self.start.elapsed().as_secs_f64() * 1000.0
    }
}

/// Frame scheduler that just remembers the pending request.
///
/// The driver polls [`ManualFrames::take_pending`] and, if a frame was
/// requested, calls the session's frame handler. This is a fixed-timestep
/// loop when paired with a [`ManualClock`].
#[derive(Debug, Clone, Default)]
pub struct ManualFrames {
    pending: Rc<Cell<Option<FrameHandle>>>,
    next_id: Rc<Cell<u32>>,
    requests: Rc<Cell<u32>>,
}

impl ManualFrames {
    pub fn new() -> Self {
        Self::default()
    }

    /// Consume the pending request, if any
    pub fn take_pending(&self) -> Option<FrameHandle> {
        self.pending.take()
    }

    pub fn is_pending(&self) -> bool {
        self.pending.get().is_some()
    }

    /// Total requests made so far
    pub fn requests(&self) -> u32 {
        self.requests.get()
    }
}

impl FrameScheduler for ManualFrames {
    fn request_frame(&mut self) -> FrameHandle {
        let handle = FrameHandle(self.next_id.get());
        self.next_id.set(self.next_id.get().wrapping_add(1));
        self.requests.set(self.requests.get() + 1);
        self.pending.set(Some(handle));
        handle
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        if self.pending.get() == Some(handle) {
            self.pending.set(None);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manual_clock_shared() {
        let clock = ManualClock::new();
        let handle = clock.clone();
        handle.advance(16.0);
        handle.advance(4.0);
        assert_eq!(clock.now_ms(), 20.0);
        clock.set(5.0);
        assert_eq!(handle.now_ms(), 5.0);
    }

    #[cfg(not(target_arch = "wasm32"))]
    #[test]
    fn test_system_clock_moves_forward() {
        let clock = SystemClock::default();
        let a = clock.now_ms();
        let b = clock.now_ms();
        assert!(a >= 0.0 && b >= a);
    }

    #[test]
    fn test_manual_frames_request_and_cancel() {
        let frames = ManualFrames::new();
        let mut owned = frames.clone();

        let first = owned.request_frame();
        assert!(frames.is_pending());
        owned.cancel_frame(first);
        assert!(!frames.is_pending());

        let second = owned.request_frame();
        assert_ne!(first, second);
        // Cancelling a stale handle leaves the newer request alone
        owned.cancel_frame(first);
        assert_eq!(frames.take_pending(), Some(second));
        assert_eq!(frames.take_pending(), None);
        assert_eq!(frames.requests(), 2);
    }
}
