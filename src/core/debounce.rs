use std::time::{Duration, Instant};

/// Trailing-edge debounce driven by caller-supplied timestamps.
///
/// Every `trigger` pushes the deadline out by `delay`; `poll` fires once the
/// quiet period has elapsed and disarms until the next trigger.
#[derive(Debug, Clone)]
pub struct Debouncer {
    delay: Duration,
    deadline: Option<Instant>,
    coalesced: u64,
}

impl Debouncer {
    #[must_use]
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            deadline: None,
            coalesced: 0,
        }
    }

    #[must_use]
    pub fn delay(&self) -> Duration {
        self.delay
    }

    pub fn trigger(&mut self, now: Instant) {
        if self.deadline.is_some() {
            self.coalesced += 1;
        }
        self.deadline = Some(now + self.delay);
    }

    /// Returns `true` exactly once per settled burst.
    pub fn poll(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }

    #[must_use]
    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    /// Triggers absorbed into an already pending burst.
    #[must_use]
    pub fn coalesced(&self) -> u64 {
        self.coalesced
    }
}
