//! Configuration: simulation tuning, web server settings, and trip data.
//!
//! [`SimulationConfig`] and [`WebConfig`] use the builder pattern and are
//! assembled in code. [`TripConfig`] is the descriptive rider/vehicle/trip
//! record, loaded once from a JSON file at startup.
//!
//! # Example
//!
//! ```rust
//! use ride_console::config::{Config, SimulationConfig, WebConfig};
//!
//! // Use defaults
//! let config = Config::default();
//! assert_eq!(config.simulation.speed_tick_ms, 2000);
//!
//! // Or customize
//! let config = Config::default()
//!     .with_simulation(SimulationConfig::default().with_seed(7).with_swipe_threshold(80.0))
//!     .with_web(WebConfig::default().with_port(3000));
//! ```
//!
//! # Trip Data Fallback
//!
//! [`TripConfig::load_or_default`] never fails: any I/O or parse error is
//! logged and the built-in default record is returned instead.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while reading a trip config file.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("failed to read trip config: {0}")]
    Io(#[from] std::io::Error),

    /// The file is not a valid trip config document.
    #[error("invalid trip config: {0}")]
    Parse(#[from] serde_json::Error),
}

// ============================================================================
// Main Config
// ============================================================================

/// Complete application configuration
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Config {
    /// Tick periods, rates, and carousel tuning
    pub simulation: SimulationConfig,
    /// Web server configuration
    pub web: WebConfig,
}

impl Config {
    /// Set simulation configuration
    pub fn with_simulation(mut self, simulation: SimulationConfig) -> Self {
        self.simulation = simulation;
        self
    }

    /// Set web configuration
    pub fn with_web(mut self, web: WebConfig) -> Self {
        self.web = web;
        self
    }
}

// ============================================================================
// Simulation Config
// ============================================================================

/// Telemetry, carousel, and scheduling parameters
///
/// Missing fields in a serialized config take their default values.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Speed random-walk period in milliseconds
    pub speed_tick_ms: u64,
    /// Indicator (turn signal) simulation period in milliseconds
    pub indicator_tick_ms: u64,
    /// Battery charge/discharge period in milliseconds
    pub battery_tick_ms: u64,
    /// Battery swap progress period in milliseconds
    pub swap_tick_ms: u64,
    /// Carousel auto-advance period in milliseconds
    pub carousel_advance_ms: u64,
    /// Renderer refresh period in milliseconds
    pub render_interval_ms: u64,
    /// Speed ceiling in km/h
    pub max_speed_kmh: f64,
    /// Battery at session start (percent)
    pub initial_battery_percent: f64,
    /// Percent gained per battery tick while charging
    pub charge_rate: f64,
    /// Percent lost per battery tick while not charging
    pub discharge_rate: f64,
    /// Minimum horizontal swipe distance that navigates the carousel
    pub swipe_threshold: f64,
    /// Seed for the speed random walk (entropy when unset)
    pub seed: Option<u64>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            speed_tick_ms: 2000,
            indicator_tick_ms: 2000,
            battery_tick_ms: 5000,
            swap_tick_ms: 100,
            carousel_advance_ms: 60_000,
            render_interval_ms: 200,
            max_speed_kmh: 120.0,
            initial_battery_percent: 78.0,
            charge_rate: 1.0,
            discharge_rate: 0.1,
            swipe_threshold: 50.0,
            seed: None,
        }
    }
}

impl SimulationConfig {
    /// Set the speed tick period (minimum 1ms)
    pub fn with_speed_tick_ms(mut self, ms: u64) -> Self {
        self.speed_tick_ms = ms.max(1);
        self
    }

    /// Set the indicator tick period (minimum 1ms)
    pub fn with_indicator_tick_ms(mut self, ms: u64) -> Self {
        self.indicator_tick_ms = ms.max(1);
        self
    }

    /// Set the battery tick period (minimum 1ms)
    pub fn with_battery_tick_ms(mut self, ms: u64) -> Self {
        self.battery_tick_ms = ms.max(1);
        self
    }

    /// Set the swap tick period (minimum 1ms)
    pub fn with_swap_tick_ms(mut self, ms: u64) -> Self {
        self.swap_tick_ms = ms.max(1);
        self
    }

    /// Set the carousel auto-advance period (minimum 1ms)
    pub fn with_carousel_advance_ms(mut self, ms: u64) -> Self {
        self.carousel_advance_ms = ms.max(1);
        self
    }

    /// Set the renderer refresh period (minimum 1ms)
    pub fn with_render_interval_ms(mut self, ms: u64) -> Self {
        self.render_interval_ms = ms.max(1);
        self
    }

    /// Set the speed ceiling
    pub fn with_max_speed(mut self, kmh: f64) -> Self {
        self.max_speed_kmh = kmh.max(0.0);
        self
    }

    /// Set the starting battery level
    pub fn with_initial_battery(mut self, percent: f64) -> Self {
        self.initial_battery_percent = percent.clamp(0.0, 100.0);
        self
    }

    /// Set the charge and discharge rates per tick
    pub fn with_rates(mut self, charge: f64, discharge: f64) -> Self {
        self.charge_rate = charge.abs();
        self.discharge_rate = discharge.abs();
        self
    }

    /// Set the swipe threshold
    pub fn with_swipe_threshold(mut self, threshold: f64) -> Self {
        self.swipe_threshold = threshold.abs();
        self
    }

    /// Fix the random seed
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}

// ============================================================================
// Web Config
// ============================================================================

/// Web server configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct WebConfig {
    /// Port to listen on
    pub port: u16,
    /// Whether to enable CORS for all origins
    pub cors_permissive: bool,
    /// Whether web server is enabled
    pub enabled: bool,
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            port: 8080,
            cors_permissive: true,
            enabled: true,
        }
    }
}

impl WebConfig {
    /// Set the port
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Set CORS mode
    pub fn with_cors(mut self, permissive: bool) -> Self {
        self.cors_permissive = permissive;
        self
    }

    /// Enable or disable web server
    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }
}

// ============================================================================
// Trip Config
// ============================================================================

/// Rider, vehicle, and trip descriptive data.
///
/// Read-only for the session. A fresh load replaces the whole record.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TripConfig {
    /// Current rider
    pub rider: RiderInfo,
    /// Vehicle being driven
    pub vehicle: VehicleInfo,
    /// Booking details
    pub trip: TripDetails,
}

/// Rider and route details
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RiderInfo {
    /// Rider name
    pub name: String,
    /// Contact phone number
    pub phone: String,
    /// Rider rating (0-5)
    pub rating: f32,
    /// Pickup address
    pub pickup_location: String,
    /// Drop-off address
    pub drop_location: String,
    /// Estimated trip time
    pub estimated_time: String,
    /// Trip distance
    pub distance: String,
    /// Quoted fare
    pub fare: String,
}

/// Vehicle details
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VehicleInfo {
    /// Make and model
    pub model: String,
    /// Plate number
    pub license_plate: String,
    /// Pack capacity
    pub battery_capacity: String,
    /// Rated range
    pub range: String,
}

/// Booking details
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TripDetails {
    /// Booking identifier
    pub trip_id: String,
    /// Scheduled start time
    pub start_time: String,
    /// Service tier
    pub ride_type: String,
    /// Payment method
    pub payment_method: String,
}

impl Default for TripConfig {
    fn default() -> Self {
        Self {
            rider: RiderInfo {
                name: "John Smith".into(),
                phone: "+1 (555) 123-4567".into(),
                rating: 4.8,
                pickup_location: "Central Station, Platform 2".into(),
                drop_location: "Downtown Mall, Main Entrance".into(),
                estimated_time: "12 min".into(),
                distance: "5.2 km".into(),
                fare: "$18.50".into(),
            },
            vehicle: VehicleInfo {
                model: "Tesla Model Y".into(),
                license_plate: "TXI-2024".into(),
                battery_capacity: "75 kWh".into(),
                range: "450 km".into(),
            },
            trip: TripDetails {
                trip_id: "TXI-789456".into(),
                start_time: "14:30".into(),
                ride_type: "Premium".into(),
                payment_method: "Credit Card".into(),
            },
        }
    }
}

impl TripConfig {
    /// Parse a trip config from JSON text.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read and parse a trip config file.
    pub async fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = tokio::fs::read_to_string(path.as_ref()).await?;
        Self::from_json(&text)
    }

    /// Read a trip config file, substituting the built-in default on any failure.
    pub async fn load_or_default(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match Self::load(path).await {
            Ok(config) => {
                tracing::info!(path = %path.display(), trip_id = %config.trip.trip_id, "loaded trip config");
                config
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "using default trip config");
                Self::default()
            }
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
