//! Concrete implementations of the traits in [`crate::traits`].
//!
//! - `mock`: controllable clock and recording renderer for tests
//! - `system`: the real clock, backed by the tokio timer
//! - `terminal`: plain-text renderer used by the demo binary

pub mod mock;
pub mod system;
pub mod terminal;

pub use mock::*;
pub use system::*;
pub use terminal::*;
