//! The console core: components, command dispatch, and snapshots.
//!
//! [`Dashboard`] owns every stateful component behind its own lock:
//!
//! | Slice | Lock | Written by |
//! |-------|------|------------|
//! | telemetry | `Mutex<TelemetryEngine>` | speed, indicator, battery, swap ticks; charging and swap commands |
//! | ride desk | `Mutex<RideDesk>` | ride commands (state machine and notification feed together) |
//! | carousel | `Mutex<CarouselController>` | carousel tick; navigation and touch commands |
//! | trip | `RwLock<Arc<TripConfig>>` | replaced wholesale by a reload |
//!
//! Each tick and each command takes one slice lock for its whole update, so
//! a tick and a command never interleave within a slice. Snapshots read the
//! slices one after another; each slice is internally consistent.
//!
//! Explicit carousel navigation wakes [`Dashboard::carousel_changed`] so the
//! scheduler can re-read the auto-advance deadline.

use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard, RwLock};

use serde::Serialize;
use tokio::sync::Notify;

use crate::carousel::{CarouselController, CarouselError, CarouselState};
use crate::commands::{CommandOutcome, CommandSource, DashboardCommand};
use crate::config::{SimulationConfig, TripConfig};
use crate::gauge::{GaugeGeometry, GaugeId, GaugeSpec, Reading};
use crate::hal::SystemClock;
use crate::notifications::{Notification, NotificationFeed};
use crate::ride::{RideCommand, RideState, RideStateMachine};
use crate::telemetry::{BatteryReadouts, TelemetryEngine, VehicleTelemetry};
use crate::traits::Clock;

// ============================================================================
// Snapshot Types
// ============================================================================

/// One gauge, evaluated against the current telemetry.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct GaugeReading {
    /// Registered gauge id.
    pub id: GaugeId,
    /// Value shown.
    pub reading: Reading,
    /// Raw reading value.
    pub value: f64,
    /// Reading at 0%.
    pub min: f64,
    /// Reading at 100%.
    pub max: f64,
    /// Visual geometry for the value.
    pub geometry: GaugeGeometry,
}

/// Everything a renderer needs for one frame.
#[derive(Clone, Debug, Serialize)]
pub struct DashboardSnapshot {
    /// Clock time when taken.
    pub timestamp_ms: u64,
    /// Speed, battery, charging, swap.
    pub telemetry: VehicleTelemetry,
    /// Derived battery readouts.
    pub battery: BatteryReadouts,
    /// Ride lifecycle and online flag.
    pub ride: RideState,
    /// Headline for the ride status.
    pub ride_label: &'static str,
    /// Detail line for the ride status.
    pub ride_detail: &'static str,
    /// Ride commands that would succeed now.
    pub available_commands: Vec<RideCommand>,
    /// Notification feed, newest first.
    pub notifications: Vec<Notification>,
    /// Visible info panel.
    pub carousel: CarouselState,
    /// Rider, vehicle, and trip details.
    pub trip: TripConfig,
    /// Every registered gauge.
    pub gauges: Vec<GaugeReading>,
}

/// Ride state machine and the feed that reacts to it, updated together.
#[derive(Debug, Default)]
struct RideDesk {
    machine: RideStateMachine,
    feed: NotificationFeed,
}

// ============================================================================
// Dashboard
// ============================================================================

/// Shared console state. Wrap in an [`Arc`] to hand to the scheduler and services.
pub struct Dashboard<C: Clock = SystemClock> {
    clock: C,
    config: SimulationConfig,
    telemetry: Mutex<TelemetryEngine>,
    ride: Mutex<RideDesk>,
    carousel: Mutex<CarouselController>,
    trip: RwLock<Arc<TripConfig>>,
    gauges: Vec<GaugeSpec>,
    carousel_changed: Notify,
}

impl Dashboard<SystemClock> {
    /// A dashboard on the system clock with the built-in trip record.
    pub fn with_system_clock(config: SimulationConfig) -> Self {
        Self::new(config, SystemClock::new())
    }
}

impl<C: Clock> Dashboard<C> {
    /// Build a dashboard in its initial state: speed 0, configured battery,
    /// offline and idle, first panel, default notifications, default gauges.
    pub fn new(config: SimulationConfig, clock: C) -> Self {
        let now_ms = clock.now_ms();
        let gauges = vec![
            GaugeSpec::speedometer(config.max_speed_kmh),
            GaugeSpec::battery_dial(),
        ];
        Self {
            telemetry: Mutex::new(TelemetryEngine::from_config(&config)),
            ride: Mutex::new(RideDesk {
                machine: RideStateMachine::new(),
                feed: NotificationFeed::with_defaults(),
            }),
            carousel: Mutex::new(CarouselController::from_config(&config, now_ms)),
            trip: RwLock::new(Arc::new(TripConfig::default())),
            gauges,
            carousel_changed: Notify::new(),
            clock,
            config,
        }
    }

    /// Use a loaded trip record instead of the built-in one.
    pub fn with_trip(self, trip: TripConfig) -> Self {
        self.reload_trip(trip);
        self
    }

    /// Register a gauge, replacing any gauge with the same id.
    pub fn with_gauge(mut self, spec: GaugeSpec) -> Self {
        match self.gauges.iter_mut().find(|g| g.id == spec.id) {
            Some(existing) => *existing = spec,
            None => self.gauges.push(spec),
        }
        self
    }

    /// Simulation settings the dashboard was built with.
    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Current clock time.
    #[inline]
    pub fn now_ms(&self) -> u64 {
        self.clock.now_ms()
    }

    // ------------------------------------------------------------------------
    // Commands
    // ------------------------------------------------------------------------

    /// Apply a command from a local source.
    pub fn apply_command(&self, cmd: DashboardCommand) -> CommandOutcome {
        self.apply_command_from(cmd, CommandSource::Local)
    }

    /// Apply a command, recording where it came from in the log.
    pub fn apply_command_from(&self, cmd: DashboardCommand, source: CommandSource) -> CommandOutcome {
        let now_ms = self.now_ms();
        let outcome = match cmd {
            DashboardCommand::ToggleCharging => {
                lock(&self.telemetry).toggle_charging();
                CommandOutcome::Applied
            }
            DashboardCommand::StartBatterySwap => {
                if lock(&self.telemetry).start_swap() {
                    CommandOutcome::Applied
                } else {
                    CommandOutcome::Ignored
                }
            }
            DashboardCommand::ToggleOnline
            | DashboardCommand::AcceptRide
            | DashboardCommand::StartRide
            | DashboardCommand::EndRide => match cmd.ride_command() {
                Some(ride_cmd) => self.apply_ride(ride_cmd, now_ms),
                None => CommandOutcome::Ignored,
            },
            DashboardCommand::CarouselNext => {
                lock(&self.carousel).next(now_ms);
                self.carousel_changed.notify_one();
                CommandOutcome::Applied
            }
            DashboardCommand::CarouselPrev => {
                lock(&self.carousel).prev(now_ms);
                self.carousel_changed.notify_one();
                CommandOutcome::Applied
            }
            DashboardCommand::CarouselGoTo { index } => {
                let result = lock(&self.carousel).go_to(index, now_ms);
                match result {
                    Ok(_) => {
                        self.carousel_changed.notify_one();
                        CommandOutcome::Applied
                    }
                    Err(e) => CommandOutcome::Rejected(e.into()),
                }
            }
            DashboardCommand::Swipe { start_x, end_x } => {
                let swiped = lock(&self.carousel).swipe(start_x, end_x, now_ms);
                self.navigated(swiped.is_some())
            }
            DashboardCommand::TouchStart { x } => {
                lock(&self.carousel).touch_start(x);
                CommandOutcome::Applied
            }
            DashboardCommand::TouchMove { x } => {
                lock(&self.carousel).touch_move(x);
                CommandOutcome::Applied
            }
            DashboardCommand::TouchEnd => {
                let swiped = lock(&self.carousel).touch_end(now_ms);
                self.navigated(swiped.is_some())
            }
        };

        match &outcome {
            CommandOutcome::Rejected(reason) => {
                tracing::info!(command = cmd.name(), ?source, %reason, "command rejected")
            }
            _ => tracing::debug!(command = cmd.name(), ?source, ?outcome, "command handled"),
        }
        outcome
    }

    fn apply_ride(&self, cmd: RideCommand, now_ms: u64) -> CommandOutcome {
        let trip = self.trip();
        let mut desk = lock(&self.ride);
        match desk.machine.apply(cmd) {
            Ok(transition) => {
                desk.feed.on_transition(&transition, &trip, now_ms);
                CommandOutcome::Applied
            }
            Err(e) => CommandOutcome::Rejected(e.into()),
        }
    }

    fn navigated(&self, changed: bool) -> CommandOutcome {
        if changed {
            self.carousel_changed.notify_one();
            CommandOutcome::Applied
        } else {
            CommandOutcome::Ignored
        }
    }

    // ------------------------------------------------------------------------
    // Ticks
    // ------------------------------------------------------------------------

    /// Random-walk the speed. Returns the new speed.
    pub fn speed_tick(&self) -> f64 {
        lock(&self.telemetry).speed_tick()
    }

    /// Maybe redraw the turn signals. Returns `true` when they were redrawn.
    pub fn indicator_tick(&self) -> bool {
        lock(&self.telemetry).indicator_tick()
    }

    /// Charge or drain the battery. Returns the new level.
    pub fn battery_tick(&self) -> f64 {
        lock(&self.telemetry).battery_tick()
    }

    /// Advance a running battery swap. Returns `true` when it completed.
    pub fn swap_tick(&self) -> bool {
        lock(&self.telemetry).swap_tick()
    }

    /// Auto-advance the carousel if due. Returns `true` when the panel changed.
    pub fn carousel_tick(&self) -> bool {
        let now_ms = self.now_ms();
        lock(&self.carousel).tick(now_ms)
    }

    /// Milliseconds until the carousel auto-advances, `None` when it cannot cycle.
    pub fn carousel_time_until_due(&self) -> Option<u64> {
        let now_ms = self.now_ms();
        lock(&self.carousel).time_until_due(now_ms)
    }

    /// Woken whenever explicit navigation moves the auto-advance deadline.
    pub fn carousel_changed(&self) -> &Notify {
        &self.carousel_changed
    }

    // ------------------------------------------------------------------------
    // Configuration changes
    // ------------------------------------------------------------------------

    /// Replace the carousel panels.
    pub fn set_panels<I, S>(&self, panels: I) -> Result<(), CarouselError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let now_ms = self.now_ms();
        lock(&self.carousel).set_panels(panels, now_ms)?;
        self.carousel_changed.notify_one();
        Ok(())
    }

    /// Replace the trip record wholesale.
    pub fn reload_trip(&self, trip: TripConfig) {
        let mut slot = self.trip.write().unwrap_or_else(|poisoned| poisoned.into_inner());
        *slot = Arc::new(trip);
    }

    /// Load a trip file and replace the trip record, falling back to the
    /// built-in record on any failure.
    pub async fn reload_trip_from(&self, path: impl AsRef<Path>) {
        let trip = TripConfig::load_or_default(path).await;
        self.reload_trip(trip);
    }

    // ------------------------------------------------------------------------
    // Observation
    // ------------------------------------------------------------------------

    /// Current telemetry.
    pub fn telemetry(&self) -> VehicleTelemetry {
        lock(&self.telemetry).snapshot()
    }

    /// Current ride state.
    pub fn ride(&self) -> RideState {
        lock(&self.ride).machine.state()
    }

    /// Notification feed, newest first.
    pub fn notifications(&self) -> Vec<Notification> {
        lock(&self.ride).feed.items().to_vec()
    }

    /// Current carousel state.
    pub fn carousel(&self) -> CarouselState {
        lock(&self.carousel).state()
    }

    /// Current trip record.
    pub fn trip(&self) -> Arc<TripConfig> {
        let slot = self.trip.read().unwrap_or_else(|poisoned| poisoned.into_inner());
        Arc::clone(&slot)
    }

    /// Registered gauges.
    pub fn gauges(&self) -> &[GaugeSpec] {
        &self.gauges
    }

    /// Evaluate one gauge against the current telemetry.
    pub fn gauge(&self, id: &str) -> Option<GaugeReading> {
        let spec = self.gauges.iter().find(|g| g.id.as_str() == id)?;
        Some(evaluate(spec, &self.telemetry()))
    }

    /// Everything a renderer needs for one frame.
    pub fn snapshot(&self) -> DashboardSnapshot {
        let timestamp_ms = self.now_ms();
        let telemetry = self.telemetry();
        let (ride, available_commands, notifications) = {
            let desk = lock(&self.ride);
            (
                desk.machine.state(),
                desk.machine.available_commands(),
                desk.feed.items().to_vec(),
            )
        };
        let carousel = self.carousel();
        let trip = TripConfig::clone(&self.trip());
        let gauges = self
            .gauges
            .iter()
            .map(|spec| evaluate(spec, &telemetry))
            .collect();

        DashboardSnapshot {
            timestamp_ms,
            telemetry,
            battery: telemetry.readouts(),
            ride,
            ride_label: ride.status.label(),
            ride_detail: ride.status.detail(),
            available_commands,
            notifications,
            carousel,
            trip,
            gauges,
        }
    }
}

fn evaluate(spec: &GaugeSpec, telemetry: &VehicleTelemetry) -> GaugeReading {
    let value = match spec.reading {
        Reading::Speed => telemetry.speed_kmh,
        Reading::Battery => telemetry.battery_percent,
    };
    GaugeReading {
        id: spec.id.clone(),
        reading: spec.reading,
        value,
        min: spec.min,
        max: spec.max,
        geometry: spec.geometry(value),
    }
}

/// Lock a slice, recovering the data if a previous holder panicked.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
