//! Timing instrumentation helpers
//!
//! Measures woven calls (entry to exit) and generation attempts.

use std::time::{Duration, Instant};

/// Tracks the elapsed time of one operation
///
/// # Example
///
/// ```ignore
/// use weft_application::utils::TimedOperation;
///
/// let timer = TimedOperation::start();
/// // Run the body
/// let elapsed = timer.elapsed();
/// ```
#[derive(Debug, Clone, Copy)]
pub struct TimedOperation {
    start: Instant,
}

impl TimedOperation {
    /// Start a new timed operation
    pub fn start() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    /// Get elapsed time as Duration
    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    /// Get elapsed time in microseconds
    pub fn elapsed_micros(&self) -> u64 {
        u64::try_from(self.start.elapsed().as_micros()).unwrap_or(u64::MAX)
    }
}
