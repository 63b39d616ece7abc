//! Seams between the console core and its environment.
//!
//! - [`Clock`]: where "now" comes from, so timer logic is testable without sleeping
//! - [`DashboardRenderer`]: the external presentation layer that consumes snapshots
//!
//! Implementations live in [`crate::hal`].

pub mod clock;
pub mod display;

pub use clock::*;
pub use display::*;
