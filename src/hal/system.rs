//! Wall clock for running consoles.

use tokio::time::Instant;

use crate::traits::Clock;

/// Milliseconds since construction, read from [`tokio::time::Instant`].
///
/// Uses the tokio clock rather than `std::time` so that tests running with
/// paused time (`#[tokio::test(start_paused = true)]`) see the same time as
/// the scheduler's intervals.
#[derive(Clone, Copy, Debug)]
pub struct SystemClock {
    start: Instant,
}

impl SystemClock {
    /// Starts counting from now.
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    #[inline]
    fn now_ms(&self) -> u64 {
        self.start.elapsed().as_millis() as u64
    }
}
