/// Leading-edge debounce of render requests
use std::time::{Duration, Instant};

/// Collapses bursts of "redraw needed" into one render per `delay`.
///
/// The first request in an idle period arms a deadline `delay` in the future;
/// requests arriving before it elapses are absorbed. Time is passed in by
/// the caller, so the event loop can wait on [`FrameScheduler::deadline`]
/// instead of sleeping.
#[derive(Debug, Clone)]
pub struct FrameScheduler {
    delay: Duration,
    pending: Option<Instant>,
}

impl FrameScheduler {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Ask for a render. Returns `true` if this armed a new deadline,
    /// `false` if it was folded into the pending one.
    pub fn request(&mut self, now: Instant) -> bool {
        if self.pending.is_some() {
            return false;
        }
        self.pending = Some(now + self.delay);
        true
    }

    /// Returns `true` exactly once per armed deadline, at or after it
    pub fn poll(&mut self, now: Instant) -> bool {
        match self.pending {
            Some(deadline) if now >= deadline => {
                self.pending = None;
                true
            }
            _ => false,
        }
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.pending
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn cancel(&mut self) {
        self.pending = None;
    }
}
