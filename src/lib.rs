//! # ride-console
//!
//! Core of a simulated ride-hailing driver console: a speedometer, a battery
//! dial, ride status with a notification feed, and a swipeable carousel of
//! info panels.
//!
//! ## Features
//!
//! - **Telemetry simulation**: bounded random-walk speed, charge/discharge ticks, battery swap, cabin indicators
//! - **Ride lifecycle**: online flag and a guarded state machine that reports invalid transitions
//! - **Gauge geometry**: reading to percentage to needle angle and arc dash offset
//! - **Carousel**: deadline-based auto-advance, wrap-around navigation, swipe detection
//! - **Scheduler**: cancelable tokio tasks, one per periodic concern
//!
//! Drawing is left to a [`DashboardRenderer`](traits::DashboardRenderer): the
//! core hands it complete snapshots with geometry already computed.
//!
//! ## Architecture
//!
//! - `telemetry`, `ride`, `notifications`, `gauge`, `carousel` - pure state and rules
//! - `dashboard` - owns the components, dispatches commands, builds snapshots
//! - `scheduler` - periodic tasks driving the dashboard
//! - `traits` / `hal` - clock and renderer seams with mock and real implementations
//! - `services` - HTTP API (feature `web`)
//!
//! ## Example
//!
//! ```rust
//! use ride_console::{Dashboard, DashboardCommand, CommandOutcome, SimulationConfig};
//! use ride_console::hal::MockClock;
//! use ride_console::ride::RideStatus;
//!
//! let clock = MockClock::new();
//! let dashboard = Dashboard::new(SimulationConfig::default().with_seed(1), clock.clone());
//!
//! // Rides need the driver online
//! assert!(dashboard.apply_command(DashboardCommand::AcceptRide).is_rejected());
//!
//! dashboard.apply_command(DashboardCommand::ToggleOnline);
//! assert_eq!(dashboard.apply_command(DashboardCommand::AcceptRide), CommandOutcome::Applied);
//! assert_eq!(dashboard.ride().status, RideStatus::PickingUp);
//!
//! // Ticks are driven by the scheduler in production, directly in tests
//! dashboard.speed_tick();
//! let snapshot = dashboard.snapshot();
//! assert!(snapshot.telemetry.speed_kmh <= 120.0);
//! ```

#![warn(missing_docs)]

/// Info-panel carousel with auto-advance and swipe navigation.
pub mod carousel;
/// Command types and outcomes.
pub mod commands;
/// Simulation, web, and trip configuration.
pub mod config;
/// Component ownership, command dispatch, and snapshots.
pub mod dashboard;
/// Value-to-visual gauge mapping.
pub mod gauge;
/// Clock and renderer implementations.
pub mod hal;
/// Driver notification feed.
pub mod notifications;
/// Ride lifecycle state machine.
pub mod ride;
/// Periodic tasks that drive the dashboard.
pub mod scheduler;
/// Vehicle telemetry simulation.
pub mod telemetry;
/// Clock and renderer traits.
pub mod traits;

/// Network services (feature-gated).
#[cfg(feature = "web")]
pub mod services;

// Re-exports for convenience
pub use carousel::{CarouselController, CarouselError, CarouselState, SwipeDirection, SwipeTracker};
pub use commands::{
    CommandOutcome, CommandParseError, CommandSource, DashboardCommand, RejectReason,
};
pub use config::{Config, ConfigError, SimulationConfig, TripConfig, WebConfig};
pub use dashboard::{Dashboard, DashboardSnapshot, GaugeReading};
pub use gauge::{map_reading, ArcConfig, GaugeGeometry, GaugeSpec, SweepDirection};
pub use notifications::{Notification, NotificationFeed, NotificationKind};
pub use ride::{RideCommand, RideError, RideState, RideStateMachine, RideStatus};
pub use scheduler::Scheduler;
pub use telemetry::{BatteryReadouts, TelemetryEngine, VehicleIndicators, VehicleTelemetry};
pub use traits::{Clock, DashboardRenderer};
