//! Vehicle telemetry simulation.
//!
//! [`TelemetryEngine`] owns the speed and battery readings and advances them
//! on independent ticks. It never schedules anything itself: callers (the
//! [`Scheduler`](crate::scheduler::Scheduler) in production, tests directly)
//! decide when a tick happens.
//!
//! # Update Rules
//!
//! - Speed tick: bounded random walk, `speed + (u - 0.5) * 10` clamped to
//!   `[0, max_speed]` where `u` is uniform in `[0, 1)`.
//! - Battery tick: `+charge_rate` while charging, `-discharge_rate` otherwise,
//!   clamped to `[0, 100]`.
//! - Swap tick: advances an in-progress battery swap by a fixed step; the
//!   battery jumps to 100% when the swap completes.
//! - Indicator tick: with probability [`SIGNAL_CHANGE_PROBABILITY`] both turn
//!   signals are redrawn, each on with probability one half. The other
//!   indicators keep their initial values.
//!
//! Config values are sanitized on construction: negative rates count by
//! magnitude, non-finite rates fall back to the defaults, and a NaN starting
//! battery becomes the default level.
//!
//! # Example
//!
//! ```rust
//! use ride_console::telemetry::TelemetryEngine;
//! use ride_console::SimulationConfig;
//!
//! let mut engine = TelemetryEngine::seeded(&SimulationConfig::default(), 7);
//! engine.speed_tick();
//! engine.battery_tick();
//!
//! let t = engine.snapshot();
//! assert!(t.speed_kmh >= 0.0 && t.speed_kmh <= 120.0);
//! assert!(t.battery_percent < 78.0); // discharging by default
//! ```

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::config::SimulationConfig;

/// Peak-to-peak width of one speed random-walk step, in km/h.
pub const SPEED_JITTER_KMH: f64 = 10.0;

/// Estimated driving range per percent of battery, in km.
pub const RANGE_KM_PER_PERCENT: f64 = 3.2;

/// Estimated charging time per missing percent of battery, in minutes.
pub const CHARGE_MINUTES_PER_PERCENT: f64 = 2.0;

/// Swap progress added per swap tick, in percentage points.
pub const SWAP_STEP_PERCENT: u8 = 2;

/// Chance per indicator tick that the turn signals are redrawn.
pub const SIGNAL_CHANGE_PROBABILITY: f64 = 0.1;

/// Four-corner flags (doors, seatbelts).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Corners {
    /// Driver side, front.
    pub front_left: bool,
    /// Passenger side, front.
    pub front_right: bool,
    /// Driver side, rear.
    pub rear_left: bool,
    /// Passenger side, rear.
    pub rear_right: bool,
}

/// Turn signal lamps.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnSignals {
    /// Left lamp lit.
    pub left: bool,
    /// Right lamp lit.
    pub right: bool,
}

/// Cabin and body indicators.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct VehicleIndicators {
    /// Open doors.
    pub doors_open: Corners,
    /// Fastened seatbelts.
    pub seatbelts: Corners,
    /// Cabin temperature in °C.
    pub cabin_temp_c: f64,
    /// Parking brake engaged.
    pub parking_brake: bool,
    /// Air conditioning running.
    pub ac_on: bool,
    /// Turn signal lamps.
    pub turn_signals: TurnSignals,
}

impl Default for VehicleIndicators {
    fn default() -> Self {
        Self {
            doors_open: Corners::default(),
            seatbelts: Corners {
                front_left: true,
                ..Corners::default()
            },
            cabin_temp_c: 22.0,
            parking_brake: true,
            ac_on: true,
            turn_signals: TurnSignals::default(),
        }
    }
}

/// Current vehicle readings.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct VehicleTelemetry {
    /// Speed in km/h, `0 <= speed_kmh <= max_speed`.
    pub speed_kmh: f64,
    /// Battery charge, `0 <= battery_percent <= 100`.
    pub battery_percent: f64,
    /// Whether the vehicle is plugged in.
    pub is_charging: bool,
    /// Progress of a battery swap in `[0, 100]`, if one is running.
    pub swap_progress: Option<u8>,
    /// Doors, seatbelts, cabin, and turn signals.
    pub indicators: VehicleIndicators,
}

impl Default for VehicleTelemetry {
    fn default() -> Self {
        Self {
            speed_kmh: 0.0,
            battery_percent: 78.0,
            is_charging: false,
            swap_progress: None,
            indicators: VehicleIndicators::default(),
        }
    }
}

impl VehicleTelemetry {
    /// Estimated remaining range in km.
    pub fn range_km(&self) -> f64 {
        self.battery_percent * RANGE_KM_PER_PERCENT
    }

    /// Estimated minutes until full, only while charging.
    pub fn minutes_to_full(&self) -> Option<u32> {
        if !self.is_charging {
            return None;
        }
        let minutes = ((100.0 - self.battery_percent) * CHARGE_MINUTES_PER_PERCENT).round();
        Some(minutes.max(0.0) as u32)
    }

    /// Coarse charge level used for color coding.
    pub fn band(&self) -> BatteryBand {
        BatteryBand::from_percent(self.battery_percent)
    }

    /// Battery status label.
    pub fn health(&self) -> BatteryHealth {
        BatteryHealth::from_percent(self.battery_percent)
    }

    /// Whether a battery swap is in progress.
    pub fn is_swapping(&self) -> bool {
        self.swap_progress.is_some()
    }

    /// Derived readouts for display.
    pub fn readouts(&self) -> BatteryReadouts {
        BatteryReadouts {
            range_km: self.range_km(),
            minutes_to_full: self.minutes_to_full(),
            band: self.band(),
            health: self.health(),
        }
    }
}

/// Charge band (above 60 high, above 30 medium, otherwise low).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BatteryBand {
    /// More than 60%.
    High,
    /// More than 30%.
    Medium,
    /// 30% or less.
    Low,
}

impl BatteryBand {
    /// Classify a battery percentage.
    pub fn from_percent(percent: f64) -> Self {
        if percent > 60.0 {
            Self::High
        } else if percent > 30.0 {
            Self::Medium
        } else {
            Self::Low
        }
    }
}

/// Battery status (above 90 fully charged, above 20 good, otherwise low).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BatteryHealth {
    /// More than 90%.
    FullyCharged,
    /// More than 20%.
    Good,
    /// 20% or less.
    Low,
}

impl BatteryHealth {
    /// Classify a battery percentage.
    pub fn from_percent(percent: f64) -> Self {
        if percent > 90.0 {
            Self::FullyCharged
        } else if percent > 20.0 {
            Self::Good
        } else {
            Self::Low
        }
    }

    /// Display label.
    pub const fn label(&self) -> &'static str {
        match self {
            Self::FullyCharged => "Fully Charged",
            Self::Good => "Good",
            Self::Low => "Low Battery",
        }
    }
}

/// Values derived from the battery reading.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct BatteryReadouts {
    /// Estimated range in km.
    pub range_km: f64,
    /// Minutes until full while charging.
    pub minutes_to_full: Option<u32>,
    /// Charge band.
    pub band: BatteryBand,
    /// Status label.
    pub health: BatteryHealth,
}

/// Owns and advances vehicle telemetry.
///
/// Generic over the random source so simulations can be replayed: use
/// [`TelemetryEngine::seeded`] in tests.
pub struct TelemetryEngine<R: Rng = StdRng> {
    state: VehicleTelemetry,
    rng: R,
    max_speed_kmh: f64,
    charge_rate: f64,
    discharge_rate: f64,
}

impl TelemetryEngine<StdRng> {
    /// Create an engine, seeding from `config.seed` when set and from entropy otherwise.
    pub fn from_config(config: &SimulationConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self::with_rng(config, rng)
    }

    /// Create an engine with a fixed seed.
    pub fn seeded(config: &SimulationConfig, seed: u64) -> Self {
        Self::with_rng(config, StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> TelemetryEngine<R> {
    /// Create an engine with an explicit random source.
    ///
    /// Values that would break the speed or battery bounds are sanitized, so
    /// a hand-edited config cannot push readings out of range.
    pub fn with_rng(config: &SimulationConfig, rng: R) -> Self {
        let defaults = SimulationConfig::default();
        // f64::max ignores NaN, so a NaN ceiling becomes 0
        let max_speed_kmh = if config.max_speed_kmh.is_infinite() {
            defaults.max_speed_kmh
        } else {
            config.max_speed_kmh.max(0.0)
        };
        let battery_percent = if config.initial_battery_percent.is_nan() {
            defaults.initial_battery_percent
        } else {
            config.initial_battery_percent.clamp(0.0, 100.0)
        };
        let state = VehicleTelemetry {
            battery_percent,
            ..VehicleTelemetry::default()
        };
        Self {
            state,
            rng,
            max_speed_kmh,
            charge_rate: sanitize_rate(config.charge_rate, defaults.charge_rate),
            discharge_rate: sanitize_rate(config.discharge_rate, defaults.discharge_rate),
        }
    }

    /// Apply one random-walk step to the speed. Returns the new speed.
    pub fn speed_tick(&mut self) -> f64 {
        let change = (self.rng.gen::<f64>() - 0.5) * SPEED_JITTER_KMH;
        self.state.speed_kmh = (self.state.speed_kmh + change).clamp(0.0, self.max_speed_kmh);
        tracing::trace!(speed_kmh = self.state.speed_kmh, "speed tick");
        self.state.speed_kmh
    }

    /// Maybe redraw the turn signals. Returns `true` when they were redrawn.
    pub fn indicator_tick(&mut self) -> bool {
        if self.rng.gen::<f64>() >= SIGNAL_CHANGE_PROBABILITY {
            return false;
        }
        let signals = TurnSignals {
            left: self.rng.gen::<f64>() < 0.5,
            right: self.rng.gen::<f64>() < 0.5,
        };
        self.state.indicators.turn_signals = signals;
        tracing::trace!(left = signals.left, right = signals.right, "turn signals redrawn");
        true
    }

    /// Charge or discharge the battery by one step. Returns the new level.
    ///
    /// Does nothing while a swap is in progress.
    pub fn battery_tick(&mut self) -> f64 {
        if self.state.is_swapping() {
            return self.state.battery_percent;
        }
        let level = self.state.battery_percent;
        self.state.battery_percent = if self.state.is_charging {
            (level + self.charge_rate).min(100.0)
        } else {
            (level - self.discharge_rate).max(0.0)
        };
        tracing::trace!(
            battery_percent = self.state.battery_percent,
            charging = self.state.is_charging,
            "battery tick"
        );
        self.state.battery_percent
    }

    /// Flip the charging flag. The battery level is untouched until the next tick.
    pub fn toggle_charging(&mut self) -> bool {
        self.state.is_charging = !self.state.is_charging;
        tracing::debug!(charging = self.state.is_charging, "charging toggled");
        self.state.is_charging
    }

    /// Begin a battery swap. Returns `false` if one is already running.
    pub fn start_swap(&mut self) -> bool {
        if self.state.is_swapping() {
            return false;
        }
        self.state.swap_progress = Some(0);
        tracing::info!(battery_percent = self.state.battery_percent, "battery swap started");
        true
    }

    /// Advance a running swap by one step.
    ///
    /// Returns `true` when this tick completed the swap.
    pub fn swap_tick(&mut self) -> bool {
        let Some(progress) = self.state.swap_progress else {
            return false;
        };
        let progress = progress.saturating_add(SWAP_STEP_PERCENT).min(100);
        if progress >= 100 {
            self.state.swap_progress = None;
            self.state.battery_percent = 100.0;
            tracing::info!("battery swap complete");
            true
        } else {
            self.state.swap_progress = Some(progress);
            false
        }
    }

    /// Current readings.
    pub fn snapshot(&self) -> VehicleTelemetry {
        self.state
    }

    /// Configured speed ceiling.
    pub fn max_speed_kmh(&self) -> f64 {
        self.max_speed_kmh
    }
}

fn sanitize_rate(rate: f64, default: f64) -> f64 {
    if rate.is_finite() {
        rate.abs()
    } else {
        default
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::mock::StepRng;

    fn config() -> SimulationConfig {
        SimulationConfig::default()
    }

    #[test]
    fn initial_state() {
        let engine = TelemetryEngine::seeded(&config(), 1);
        let t = engine.snapshot();
        assert_eq!(t.speed_kmh, 0.0);
        assert_eq!(t.battery_percent, 78.0);
        assert!(!t.is_charging);
        assert!(t.swap_progress.is_none());

        let ind = t.indicators;
        assert_eq!(ind.doors_open, Corners::default());
        assert!(ind.seatbelts.front_left);
        assert!(!ind.seatbelts.front_right && !ind.seatbelts.rear_left && !ind.seatbelts.rear_right);
        assert_eq!(ind.cabin_temp_c, 22.0);
        assert!(ind.parking_brake);
        assert!(ind.ac_on);
        assert_eq!(ind.turn_signals, TurnSignals::default());
    }

    #[test]
    fn hand_edited_config_cannot_break_battery_bounds() {
        let mut json = serde_json::to_value(config()).unwrap();
        json["charge_rate"] = serde_json::json!(-50.0);
        json["discharge_rate"] = serde_json::json!(-3.0);
        let edited: SimulationConfig = serde_json::from_value(json).unwrap();

        let mut engine = TelemetryEngine::seeded(&edited, 1);
        for _ in 0..3 {
            let level = engine.battery_tick();
            assert!((0.0..=100.0).contains(&level), "battery {level}");
        }
        assert!((engine.snapshot().battery_percent - 69.0).abs() < 1e-9);

        engine.toggle_charging();
        assert_eq!(engine.battery_tick(), 100.0);
    }

    #[test]
    fn non_finite_config_values_fall_back() {
        let mut edited = config();
        edited.initial_battery_percent = f64::NAN;
        edited.charge_rate = f64::INFINITY;
        edited.discharge_rate = f64::NAN;
        edited.max_speed_kmh = f64::NAN;

        let mut engine = TelemetryEngine::seeded(&edited, 1);
        assert_eq!(engine.snapshot().battery_percent, 78.0);
        assert!((engine.battery_tick() - 77.9).abs() < 1e-9);
        engine.toggle_charging();
        assert!((engine.battery_tick() - 78.9).abs() < 1e-9);
        assert_eq!(engine.speed_tick(), 0.0);
    }

    #[test]
    fn indicator_tick_redraws_signals_on_low_draw() {
        // Every draw is 0.0: below the change probability, then both lamps on
        let mut engine = TelemetryEngine::with_rng(&config(), StepRng::new(0, 0));
        assert!(engine.indicator_tick());
        let ind = engine.snapshot().indicators;
        assert_eq!(ind.turn_signals, TurnSignals { left: true, right: true });
        assert_eq!(ind.cabin_temp_c, 22.0);
        assert!(ind.parking_brake);
    }

    #[test]
    fn indicator_tick_keeps_signals_on_high_draw() {
        let mut engine = TelemetryEngine::with_rng(&config(), StepRng::new(u64::MAX, 0));
        for _ in 0..20 {
            assert!(!engine.indicator_tick());
        }
        assert_eq!(engine.snapshot().indicators, VehicleIndicators::default());
    }

    #[test]
    fn indicator_tick_leaves_speed_and_battery_alone() {
        let mut engine = TelemetryEngine::with_rng(&config(), StepRng::new(0, 0));
        engine.indicator_tick();
        let t = engine.snapshot();
        assert_eq!(t.speed_kmh, 0.0);
        assert_eq!(t.battery_percent, 78.0);
    }

    #[test]
    fn speed_stays_in_bounds() {
        let mut engine = TelemetryEngine::seeded(&config(), 42);
        for _ in 0..10_000 {
            let speed = engine.speed_tick();
            assert!((0.0..=120.0).contains(&speed));
        }
    }

    #[test]
    fn speed_clamped_at_zero() {
        // StepRng(0, 0) always yields 0 -> u = 0.0 -> change of -5
        let mut engine = TelemetryEngine::with_rng(&config(), StepRng::new(0, 0));
        assert_eq!(engine.speed_tick(), 0.0);
        assert_eq!(engine.speed_tick(), 0.0);
    }

    #[test]
    fn speed_clamped_at_max() {
        // u64::MAX yields u just below 1.0 -> change just below +5
        let mut engine = TelemetryEngine::with_rng(&config(), StepRng::new(u64::MAX, 0));
        for _ in 0..100 {
            engine.speed_tick();
        }
        assert_eq!(engine.snapshot().speed_kmh, 120.0);
    }

    #[test]
    fn same_seed_same_walk() {
        let mut a = TelemetryEngine::seeded(&config(), 9);
        let mut b = TelemetryEngine::seeded(&config(), 9);
        for _ in 0..50 {
            assert_eq!(a.speed_tick().to_bits(), b.speed_tick().to_bits());
        }
    }

    #[test]
    fn discharge_and_charge_rates() {
        let mut engine = TelemetryEngine::seeded(&config(), 1);
        engine.battery_tick();
        assert!((engine.snapshot().battery_percent - 77.9).abs() < 1e-9);

        engine.toggle_charging();
        engine.battery_tick();
        assert!((engine.snapshot().battery_percent - 78.9).abs() < 1e-9);
    }

    #[test]
    fn battery_clamped_at_bounds() {
        let full = config().with_initial_battery(99.5);
        let mut engine = TelemetryEngine::seeded(&full, 1);
        engine.toggle_charging();
        assert_eq!(engine.battery_tick(), 100.0);
        assert_eq!(engine.battery_tick(), 100.0);

        let empty = config().with_initial_battery(0.05);
        let mut engine = TelemetryEngine::seeded(&empty, 1);
        assert_eq!(engine.battery_tick(), 0.0);
        assert_eq!(engine.battery_tick(), 0.0);
    }

    #[test]
    fn toggle_twice_has_no_side_effect() {
        let mut engine = TelemetryEngine::seeded(&config(), 1);
        let before = engine.snapshot();
        engine.toggle_charging();
        engine.toggle_charging();
        assert_eq!(engine.snapshot(), before);
    }

    #[test]
    fn swap_completes_after_fifty_ticks() {
        let mut engine = TelemetryEngine::seeded(&config().with_initial_battery(25.0), 1);
        assert!(engine.start_swap());
        assert!(!engine.start_swap());

        for _ in 0..49 {
            assert!(!engine.swap_tick());
        }
        assert_eq!(engine.snapshot().swap_progress, Some(98));
        assert!(engine.swap_tick());

        let t = engine.snapshot();
        assert_eq!(t.battery_percent, 100.0);
        assert!(t.swap_progress.is_none());
    }

    #[test]
    fn battery_frozen_during_swap() {
        let mut engine = TelemetryEngine::seeded(&config(), 1);
        engine.start_swap();
        engine.battery_tick();
        assert_eq!(engine.snapshot().battery_percent, 78.0);
    }

    #[test]
    fn swap_tick_without_swap_is_noop() {
        let mut engine = TelemetryEngine::seeded(&config(), 1);
        assert!(!engine.swap_tick());
        assert_eq!(engine.snapshot().battery_percent, 78.0);
    }

    #[test]
    fn readouts() {
        let t = VehicleTelemetry {
            battery_percent: 50.0,
            is_charging: true,
            ..VehicleTelemetry::default()
        };
        assert!((t.range_km() - 160.0).abs() < 1e-9);
        assert_eq!(t.minutes_to_full(), Some(100));
        assert_eq!(t.band(), BatteryBand::Medium);
        assert_eq!(t.health(), BatteryHealth::Good);

        let idle = VehicleTelemetry::default();
        assert_eq!(idle.minutes_to_full(), None);
        assert_eq!(idle.band(), BatteryBand::High);
    }

    #[test]
    fn band_and_health_thresholds() {
        assert_eq!(BatteryBand::from_percent(60.0), BatteryBand::Medium);
        assert_eq!(BatteryBand::from_percent(30.0), BatteryBand::Low);
        assert_eq!(BatteryHealth::from_percent(90.5), BatteryHealth::FullyCharged);
        assert_eq!(BatteryHealth::from_percent(20.0), BatteryHealth::Low);
        assert_eq!(BatteryHealth::Low.label(), "Low Battery");
    }
}
