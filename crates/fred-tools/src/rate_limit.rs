//! Outbound rate limiting for the FRED API.
//!
//! FRED enforces 120 requests per minute per API key. We enforce the same
//! limit locally as a trailing-window counter with lazy eviction: timestamps
//! of permitted calls are retained, entries older than the window are pruned
//! on every check, and a check that finds the window full is rejected without
//! being recorded.
//!
//! This is not a token bucket: bursts up to the limit are allowed within any
//! trailing window, with no smoothing.

use crate::error::{FredError, Result};
use parking_lot::Mutex;
use std::time::{Duration, Instant};

pub const MAX_CALLS: usize = 120;
pub const WINDOW: Duration = Duration::from_secs(60);

/// Trailing-window rate limiter.
///
/// Owned explicitly and passed into [`crate::FredClient`] rather than living
/// as process-global state, so tests can run independent limiters in
/// parallel. The check-then-record step holds the lock for its whole duration
/// and contains no await point, so two concurrent callers can never both
/// observe a non-full window and both proceed.
pub struct RateLimiter {
    timestamps: Mutex<Vec<Instant>>,
    max_calls: usize,
    window: Duration,
}

impl RateLimiter {
    #[must_use]
    pub fn new(max_calls: usize, window: Duration) -> Self {
        Self {
            timestamps: Mutex::new(Vec::new()),
            max_calls,
            window,
        }
    }

    /// Check the window and record the call if permitted.
    ///
    /// # Errors
    ///
    /// Returns [`FredError::RateLimited`] if the trailing window already
    /// holds `max_calls` entries. The rejected attempt is not counted.
    pub fn check_and_record(&self) -> Result<()> {
        self.check_and_record_at(Instant::now())
    }

    /// Clear all retained timestamps. Test hook; not part of normal use.
    pub fn reset(&self) {
        self.timestamps.lock().clear();
    }

    pub(crate) fn check_and_record_at(&self, now: Instant) -> Result<()> {
        let mut timestamps = self.timestamps.lock();
        timestamps.retain(|&t| now.saturating_duration_since(t) < self.window);
        if timestamps.len() >= self.max_calls {
            return Err(FredError::RateLimited {
                limit: self.max_calls,
                window: self.window,
            });
        }
        timestamps.push(now);
        Ok(())
    }
}

impl Default for RateLimiter {
    /// The production FRED limit: 120 calls per 60 seconds.
    fn default() -> Self {
        Self::new(MAX_CALLS, WINDOW)
    }
}
