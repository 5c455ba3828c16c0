//! Throttle and debounce as plain state machines.
//!
//! Neither type owns a timer. A call either returns its arguments for
//! immediate execution or parks them with a deadline; the owner asks for the
//! [`Throttle::deadline`] and hands the arguments back out with
//! [`Throttle::poll`] once the deadline has passed. This keeps them testable
//! with synthetic instants and lets the owner drop every pending call at once.

use std::time::Duration;
use web_time::Instant;

#[derive(Debug, Clone)]
struct Pending<A> {
    due: Instant,
    args: A,
}

/// Leading-edge throttle with a trailing call.
///
/// - A call outside the window of the last executed call runs immediately
///   and opens a new window.
/// - A call inside the window is deferred to the end of the window. Later
///   calls in the same window replace the arguments, so exactly one deferred
///   execution happens, with the latest arguments.
///
/// A zero threshold disables throttling.
#[derive(Debug, Clone)]
pub struct Throttle<A> {
    threshold: Duration,
    last: Option<Instant>,
    pending: Option<Pending<A>>,
}

impl<A> Throttle<A> {
    /// Create a throttle with the given window.
    pub fn new(threshold: Duration) -> Self {
        Self {
            threshold,
            last: None,
            pending: None,
        }
    }

    /// The throttle window.
    pub fn threshold(&self) -> Duration {
        self.threshold
    }

    /// Offer a call. Returns the arguments when the call should run now.
    pub fn call(&mut self, now: Instant, args: A) -> Option<A> {
        if let Some(last) = self.last {
            let window_end = last + self.threshold;
            if now < window_end {
                // hold on to the latest arguments
                self.pending = Some(Pending {
                    due: window_end,
                    args,
                });
                return None;
            }
        }

        self.last = Some(now);
        self.pending = None;
        Some(args)
    }

    /// Release the deferred call if its deadline has passed.
    pub fn poll(&mut self, now: Instant) -> Option<A> {
        if self.deadline()? > now {
            return None;
        }
        let pending = self.pending.take()?;
        self.last = Some(pending.due);
        Some(pending.args)
    }

    /// Release the deferred call regardless of its deadline.
    pub fn flush(&mut self) -> Option<A> {
        let pending = self.pending.take()?;
        self.last = Some(pending.due);
        Some(pending.args)
    }

    /// When the deferred call is due, if there is one.
    pub fn deadline(&self) -> Option<Instant> {
        self.pending.as_ref().map(|p| p.due)
    }

    /// Whether a deferred call is waiting.
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Drop the deferred call and forget the current window.
    pub fn reset(&mut self) {
        self.last = None;
        self.pending = None;
    }
}

/// Trailing-edge debounce.
///
/// Every call restarts the delay; only the last call of a burst runs, once
/// `delay` has passed without another call. A zero delay runs every call.
#[derive(Debug, Clone)]
pub struct Debounce<A> {
    delay: Duration,
    pending: Option<Pending<A>>,
}

impl<A> Debounce<A> {
    /// Create a debounce with the given quiet period.
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
        }
    }

    /// The quiet period.
    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Offer a call. Returns the arguments only when the delay is zero.
    pub fn call(&mut self, now: Instant, args: A) -> Option<A> {
        if self.delay.is_zero() {
            self.pending = None;
            return Some(args);
        }
        self.pending = Some(Pending {
            due: now + self.delay,
            args,
        });
        None
    }

    /// Release the last call once the quiet period has passed.
    pub fn poll(&mut self, now: Instant) -> Option<A> {
        if self.deadline()? > now {
            return None;
        }
        self.pending.take().map(|p| p.args)
    }

    /// When the waiting call is due, if there is one.
    pub fn deadline(&self) -> Option<Instant> {
        self.pending.as_ref().map(|p| p.due)
    }

    /// Whether a call is waiting.
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Drop the waiting call.
    pub fn cancel(&mut self) {
        self.pending = None;
    }
}
