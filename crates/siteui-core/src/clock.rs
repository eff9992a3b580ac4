#![forbid(unsafe_code)]

//! Monotonic time sources.
//!
//! The coordinator never calls `Instant::now()` directly; all time flows
//! through [`Clock`]. In the browser that is [`SystemClock`]
//! (`performance.now()` via `web-time`), in tests and replay it is
//! [`DeterministicClock`], which only moves when the host says so.

use core::time::Duration;

use web_time::Instant;

/// Monotonic clock abstraction.
pub trait Clock {
    /// Elapsed time since an unspecified epoch, monotonically increasing.
    fn now_mono(&self) -> Duration;
}

/// Deterministic monotonic clock controlled by the host.
#[derive(Debug, Default, Clone)]
pub struct DeterministicClock {
    now: Duration,
}

impl DeterministicClock {
    /// Create a clock starting at `0`.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            now: Duration::ZERO,
        }
    }

    /// Set current monotonic time.
    pub fn set(&mut self, now: Duration) {
        self.now = now;
    }

    /// Advance monotonic time by `dt`.
    pub fn advance(&mut self, dt: Duration) {
        self.now = self.now.saturating_add(dt);
    }

    /// Advance by `dt_ms` milliseconds. Non-finite or negative values are ignored.
    pub fn advance_ms(&mut self, dt_ms: f64) {
        if dt_ms.is_finite() && dt_ms > 0.0 {
            self.advance(Duration::from_secs_f64(dt_ms / 1000.0));
        }
    }
}

impl Clock for DeterministicClock {
    fn now_mono(&self) -> Duration {
        self.now
    }
}

/// Wall-clock backed monotonic time, anchored at construction.
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    #[must_use]
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now_mono(&self) -> Duration {
        self.origin.elapsed()
    }
}
