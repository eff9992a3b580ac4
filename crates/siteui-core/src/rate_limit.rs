#![forbid(unsafe_code)]

//! Throttle and debounce gates driven by an explicit monotonic timestamp.
//!
//! Neither gate owns a timer. [`Throttle`] only compares `now` against the end
//! of its current window. [`Debounce`] records a deadline and the latest
//! payload; the host is expected to call [`Debounce::poll`] once the deadline
//! (see [`Debounce::deadline`]) has passed, typically from a one-shot timer
//! that it reschedules on every call.
//!
//! ```text
//! throttle (window = 100ms)
//!   calls:  x  x x x      x   x
//!   runs:   ^             ^
//!           |-- 100ms --| |-- 100ms --|
//!
//! debounce (wait = 250ms)
//!   calls:  x  x  x
//!   runs:           ........^ (last call + 250ms)
//! ```

use core::time::Duration;

/// Leading-edge throttle: admits the first call of a burst, then rejects every
/// call until `window` has elapsed since the admitted one. Rejected calls are
/// dropped, never queued.
#[derive(Debug, Clone)]
pub struct Throttle {
    window: Duration,
    open_at: Option<Duration>,
}

impl Throttle {
    #[must_use]
    pub const fn new(window: Duration) -> Self {
        Self {
            window,
            open_at: None,
        }
    }

    /// Throttle window length.
    #[must_use]
    pub const fn window(&self) -> Duration {
        self.window
    }

    /// Returns `true` if the wrapped handler should run at `now`.
    pub fn admit(&mut self, now: Duration) -> bool {
        match self.open_at {
            Some(open_at) if now < open_at => false,
            _ => {
                self.open_at = Some(now.saturating_add(self.window));
                true
            }
        }
    }

    /// Whether a call at `now` would be rejected.
    #[must_use]
    pub fn is_closed(&self, now: Duration) -> bool {
        self.open_at.is_some_and(|open_at| now < open_at)
    }

    /// Forget the current window.
    pub fn reset(&mut self) {
        self.open_at = None;
    }
}

/// Trailing-edge debounce carrying the most recent payload.
#[derive(Debug, Clone)]
pub struct Debounce<T> {
    wait: Duration,
    pending: Option<(Duration, T)>,
}

impl<T> Debounce<T> {
    #[must_use]
    pub const fn new(wait: Duration) -> Self {
        Self {
            wait,
            pending: None,
        }
    }

    /// Quiet period length.
    #[must_use]
    pub const fn wait(&self) -> Duration {
        self.wait
    }

    /// Record a call at `now`, superseding any pending one.
    ///
    /// Returns the new deadline.
    pub fn call(&mut self, now: Duration, value: T) -> Duration {
        let deadline = now.saturating_add(self.wait);
        self.pending = Some((deadline, value));
        deadline
    }

    /// Deadline of the pending call, if any.
    #[must_use]
    pub fn deadline(&self) -> Option<Duration> {
        self.pending.as_ref().map(|(deadline, _)| *deadline)
    }

    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Yield the pending payload if its deadline has been reached.
    pub fn poll(&mut self, now: Duration) -> Option<T> {
        if self.deadline().is_some_and(|deadline| now >= deadline) {
            self.pending.take().map(|(_, v)| v)
        } else {
            None
        }
    }

    /// Drop the pending call without running it.
    pub fn cancel(&mut self) -> Option<T> {
        self.pending.take().map(|(_, v)| v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    #[test]
    fn throttle_admits_leading_edge_only() {
        let mut t = Throttle::new(ms(100));
        assert!(t.admit(ms(0)));
        assert!(!t.admit(ms(1)));
        assert!(!t.admit(ms(99)));
        assert!(t.is_closed(ms(99)));
        // The window lapses exactly at 100ms.
        assert!(t.admit(ms(100)));
        assert!(!t.admit(ms(150)));
        assert!(t.admit(ms(260)));
    }

    #[test]
    fn throttle_reset_reopens_window() {
        let mut t = Throttle::new(ms(100));
        assert!(t.admit(ms(10)));
        t.reset();
        assert!(t.admit(ms(11)));
    }

    #[test]
    fn debounce_fires_once_after_quiet_period() {
        let mut d = Debounce::new(ms(250));
        d.call(ms(0), 600.0);
        d.call(ms(100), 700.0);
        assert_eq!(d.call(ms(200), 900.0), ms(450));

        assert_eq!(d.poll(ms(300)), None);
        assert_eq!(d.poll(ms(449)), None);
        assert_eq!(d.poll(ms(450)), Some(900.0));
        assert_eq!(d.poll(ms(900)), None);
        assert!(!d.is_pending());
    }

    #[test]
    fn debounce_cancel_drops_pending() {
        let mut d = Debounce::new(ms(250));
        d.call(ms(0), 1u32);
        assert_eq!(d.deadline(), Some(ms(250)));
        assert_eq!(d.cancel(), Some(1));
        assert_eq!(d.deadline(), None);
        assert_eq!(d.poll(ms(1_000)), None);
    }
}
