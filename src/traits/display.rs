//! Renderer abstraction for the console.
//!
//! The core never draws anything. A renderer receives complete
//! [`DashboardSnapshot`]s, already carrying gauge geometry, and turns them
//! into pixels, markup, or terminal text.

use crate::dashboard::DashboardSnapshot;

/// Presentation layer fed by the scheduler's render loop.
///
/// # Example
///
/// ```rust
/// use ride_console::traits::DashboardRenderer;
/// use ride_console::DashboardSnapshot;
///
/// struct LineRenderer;
///
/// impl DashboardRenderer for LineRenderer {
///     type Error = std::fmt::Error;
///
///     fn render(&mut self, snapshot: &DashboardSnapshot) -> Result<(), Self::Error> {
///         println!("{:.0} km/h", snapshot.telemetry.speed_kmh);
///         Ok(())
///     }
///
///     fn show_message(&mut self, line1: &str, _line2: Option<&str>) -> Result<(), Self::Error> {
///         println!("{line1}");
///         Ok(())
///     }
/// }
/// ```
pub trait DashboardRenderer: Send {
    /// Error type for rendering.
    type Error: core::fmt::Display;

    /// Called once before the first frame.
    fn init(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }

    /// Draw one frame.
    fn render(&mut self, snapshot: &DashboardSnapshot) -> Result<(), Self::Error>;

    /// Show a short status message (startup, shutdown, command feedback).
    fn show_message(&mut self, line1: &str, line2: Option<&str>) -> Result<(), Self::Error>;
}
