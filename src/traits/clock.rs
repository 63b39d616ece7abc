//! Time source abstraction.

use std::sync::Arc;

/// Monotonic time source.
///
/// All deadline logic in the crate (carousel auto-advance, notification
/// timestamps) reads time through this trait.
///
/// # Example
///
/// ```rust
/// use ride_console::traits::Clock;
/// use ride_console::hal::MockClock;
///
/// let clock = MockClock::new();
/// assert_eq!(clock.now_ms(), 0);
///
/// clock.advance(100);
/// assert_eq!(clock.now_ms(), 100);
/// ```
pub trait Clock: Send + Sync {
    /// Milliseconds since an arbitrary epoch. Never decreases.
    fn now_ms(&self) -> u64;
}

impl<C: Clock + ?Sized> Clock for Arc<C> {
    fn now_ms(&self) -> u64 {
        (**self).now_ms()
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now_ms(&self) -> u64 {
        (**self).now_ms()
    }
}
