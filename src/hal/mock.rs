//! Test doubles for the console's seams.
//!
//! | Mock | Trait | Purpose |
//! |------|-------|---------|
//! | [`MockClock`] | [`Clock`] | Controllable time source, shared between clones |
//! | [`MockRenderer`] | [`DashboardRenderer`] | Records frames and messages |
//!
//! # Example
//!
//! ```rust
//! use ride_console::{Dashboard, DashboardCommand, SimulationConfig};
//! use ride_console::hal::MockClock;
//!
//! let clock = MockClock::new();
//! let dashboard = Dashboard::new(SimulationConfig::default().with_seed(1), clock.clone());
//!
//! clock.advance(60_000);
//! assert!(dashboard.carousel_tick());
//! assert_eq!(dashboard.carousel().active_index, 1);
//!
//! dashboard.apply_command(DashboardCommand::CarouselPrev);
//! assert_eq!(dashboard.carousel().active_index, 0);
//! ```
//!
//! [`Clock`]: crate::traits::Clock
//! [`DashboardRenderer`]: crate::traits::DashboardRenderer

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use crate::dashboard::DashboardSnapshot;
use crate::traits::{Clock, DashboardRenderer};

// ============================================================================
// Clock
// ============================================================================

/// Mock clock for testing.
///
/// Clones share the same time, so a test can keep a handle while the
/// dashboard owns another.
///
/// ```rust
/// use ride_console::hal::MockClock;
/// use ride_console::traits::Clock;
///
/// let clock = MockClock::new();
/// let handle = clock.clone();
///
/// handle.set(1000);
/// assert_eq!(clock.now_ms(), 1000);
///
/// handle.advance(500);
/// assert_eq!(clock.now_ms(), 1500);
/// ```
#[derive(Clone, Debug, Default)]
pub struct MockClock {
    current_ms: Arc<AtomicU64>,
}

impl MockClock {
    /// Creates a new mock clock starting at 0ms.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the current time in milliseconds.
    pub fn set(&self, ms: u64) {
        self.current_ms.store(ms, Ordering::SeqCst);
    }

    /// Advances the clock by the given duration.
    pub fn advance(&self, ms: u64) {
        self.current_ms.fetch_add(ms, Ordering::SeqCst);
    }
}

impl Clock for MockClock {
    fn now_ms(&self) -> u64 {
        self.current_ms.load(Ordering::SeqCst)
    }
}

// ============================================================================
// Renderer
// ============================================================================

/// Everything a [`MockRenderer`] has seen.
#[derive(Debug, Default)]
pub struct RenderLog {
    /// The last frame rendered.
    pub last_snapshot: Option<DashboardSnapshot>,
    /// Number of times render() was called.
    pub render_count: usize,
    /// Last message shown via show_message().
    pub last_message: Option<(String, Option<String>)>,
    /// Whether init() was called.
    pub initialized: bool,
}

/// Mock renderer that records what it is asked to draw.
///
/// Clones share one [`RenderLog`], so a test can hand a clone to the
/// scheduler and inspect the original.
#[derive(Clone, Debug, Default)]
pub struct MockRenderer {
    log: Arc<Mutex<RenderLog>>,
    fail: bool,
}

impl MockRenderer {
    /// Creates a new mock renderer.
    pub fn new() -> Self {
        Self::default()
    }

    /// A renderer whose every call fails.
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    /// Lock the shared log for inspection.
    pub fn log(&self) -> MutexGuard<'_, RenderLog> {
        self.log.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Number of frames rendered so far.
    pub fn render_count(&self) -> usize {
        self.log().render_count
    }

    fn check(&self) -> Result<(), MockRenderError> {
        if self.fail {
            Err(MockRenderError)
        } else {
            Ok(())
        }
    }
}

/// Error returned by [`MockRenderer::failing`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("mock renderer failure")]
pub struct MockRenderError;

impl DashboardRenderer for MockRenderer {
    type Error = MockRenderError;

    fn init(&mut self) -> Result<(), Self::Error> {
        self.check()?;
        self.log().initialized = true;
        Ok(())
    }

    fn render(&mut self, snapshot: &DashboardSnapshot) -> Result<(), Self::Error> {
        self.check()?;
        let mut log = self.log();
        log.last_snapshot = Some(snapshot.clone());
        log.render_count += 1;
        Ok(())
    }

    fn show_message(&mut self, line1: &str, line2: Option<&str>) -> Result<(), Self::Error> {
        self.check()?;
        self.log().last_message = Some((line1.into(), line2.map(Into::into)));
        Ok(())
    }
}
