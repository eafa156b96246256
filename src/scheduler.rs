//! Timing primitives for the polling cycle: the visible countdown, the
//! one-second cadence driving it, and cancellable delayed resyncs.

use std::time::{Duration, Instant};

/// Seconds shown before each status fetch.
pub const DEFAULT_COUNTDOWN: u32 = 3;

/// What one countdown step produced.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CountdownStep {
    /// Value to show on this tick.
    pub display: u32,
    /// The counter hit zero and a status fetch is due.
    pub fetch: bool,
}

/// Seconds-remaining counter. Each tick shows the current value, then either
/// decrements or, at zero, resets and asks for a fetch.
#[derive(Clone, Debug)]
pub struct Countdown {
    remaining: u32,
    reset_to: u32,
}

impl Countdown {
    pub fn new(reset_to: u32) -> Self {
        Self {
            remaining: reset_to,
            reset_to,
        }
    }

    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    pub fn step(&mut self) -> CountdownStep {
        let display = self.remaining;
        if self.remaining == 0 {
            self.remaining = self.reset_to;
            CountdownStep { display, fetch: true }
        } else {
            self.remaining -= 1;
            CountdownStep { display, fetch: false }
        }
    }
}

impl Default for Countdown {
    fn default() -> Self {
        Self::new(DEFAULT_COUNTDOWN)
    }
}

/// Fixed cadence checked from the event loop. Missed periods collapse into
/// one tick; the loop never tries to catch up.
#[derive(Clone, Debug)]
pub struct Ticker {
    period: Duration,
    last: Instant,
}

impl Ticker {
    pub fn new(period: Duration, now: Instant) -> Self {
        Self { period, last: now }
    }

    pub fn due(&mut self, now: Instant) -> bool {
        if now.duration_since(self.last) < self.period {
            return false;
        }
        self.last = now;
        true
    }

    pub fn until_next(&self, now: Instant) -> Duration {
        self.period.saturating_sub(now.duration_since(self.last))
    }
}

/// One-shot deadline. Scheduling again replaces the pending deadline.
#[derive(Clone, Debug, Default)]
pub struct DelayedTask {
    due: Option<Instant>,
}

impl DelayedTask {
    pub fn schedule(&mut self, at: Instant) {
        self.due = Some(at);
    }

    pub fn cancel(&mut self) {
        self.due = None;
    }

    pub fn is_pending(&self) -> bool {
        self.due.is_some()
    }

    /// Fires at most once per schedule.
    pub fn fire_if_due(&mut self, now: Instant) -> bool {
        match self.due {
            Some(at) if now >= at => {
                self.due = None;
                true
            }
            _ => false,
        }
    }
}
