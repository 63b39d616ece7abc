//! Network services.
//!
//! - `web` feature: axum HTTP API exposing the command and observation
//!   interfaces to a browser renderer on the local machine
//!
//! Services share the one [`Dashboard`](crate::Dashboard) through an `Arc`;
//! every request goes through the same locks as the scheduler's ticks.

#[cfg(feature = "web")]
pub mod api;

#[cfg(feature = "web")]
pub mod web;

#[cfg(feature = "web")]
pub use api::*;

#[cfg(feature = "web")]
pub use web::*;
