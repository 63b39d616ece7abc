//! Integration tests for the dashboard command and observation interfaces.

use ride_console::hal::MockClock;
use ride_console::notifications::NotificationKind;
use ride_console::{
    map_reading, CommandOutcome, Dashboard, DashboardCommand, RejectReason, RideError, RideStatus,
    SimulationConfig, TripConfig,
};

fn create_dashboard() -> (Dashboard<MockClock>, MockClock) {
    let clock = MockClock::new();
    let dashboard = Dashboard::new(SimulationConfig::default().with_seed(2024), clock.clone());
    (dashboard, clock)
}

// ============================================================================
// Telemetry
// ============================================================================

#[test]
fn telemetry_stays_in_bounds_over_many_ticks() {
    let (dash, _) = create_dashboard();
    dash.apply_command(DashboardCommand::ToggleCharging);

    for i in 0..5_000 {
        dash.speed_tick();
        dash.battery_tick();
        if i == 2_500 {
            dash.apply_command(DashboardCommand::ToggleCharging);
        }
        let t = dash.telemetry();
        assert!((0.0..=120.0).contains(&t.speed_kmh), "speed {}", t.speed_kmh);
        assert!((0.0..=100.0).contains(&t.battery_percent), "battery {}", t.battery_percent);
    }
}

#[test]
fn battery_saturates_at_full_while_charging() {
    let (dash, _) = create_dashboard();
    dash.apply_command(DashboardCommand::ToggleCharging);
    for _ in 0..40 {
        dash.battery_tick();
    }
    assert_eq!(dash.telemetry().battery_percent, 100.0);
    assert_eq!(dash.snapshot().battery.minutes_to_full, Some(0));
}

#[test]
fn double_toggle_charging_has_no_side_effect() {
    let (dash, _) = create_dashboard();
    let before = dash.telemetry();
    dash.apply_command(DashboardCommand::ToggleCharging);
    dash.apply_command(DashboardCommand::ToggleCharging);
    assert_eq!(dash.telemetry(), before);
}

#[test]
fn same_seed_same_speed_trace() {
    let (a, _) = create_dashboard();
    let (b, _) = create_dashboard();
    for _ in 0..50 {
        assert_eq!(a.speed_tick(), b.speed_tick());
    }
}

#[test]
fn battery_swap_completes_after_fifty_ticks() {
    let (dash, _) = create_dashboard();
    assert!(dash.apply_command(DashboardCommand::StartBatterySwap).is_applied());

    for _ in 0..49 {
        assert!(!dash.swap_tick());
        // Battery ticks are held during a swap
        assert_eq!(dash.battery_tick(), 78.0);
    }
    assert_eq!(dash.telemetry().swap_progress, Some(98));
    assert!(dash.swap_tick());

    let t = dash.telemetry();
    assert_eq!(t.battery_percent, 100.0);
    assert_eq!(t.swap_progress, None);
}

#[test]
fn indicator_ticks_only_touch_turn_signals() {
    let (dash, _) = create_dashboard();
    let initial = dash.telemetry();
    for _ in 0..500 {
        dash.indicator_tick();
        let t = dash.telemetry();
        assert_eq!(t.speed_kmh, initial.speed_kmh);
        assert_eq!(t.battery_percent, initial.battery_percent);
        let mut ind = t.indicators;
        ind.turn_signals = initial.indicators.turn_signals;
        assert_eq!(ind, initial.indicators);
    }
}

#[test]
fn snapshot_carries_indicators() {
    let (dash, _) = create_dashboard();
    let json = serde_json::to_value(dash.snapshot()).unwrap();
    let ind = &json["telemetry"]["indicators"];
    assert_eq!(ind["cabin_temp_c"], 22.0);
    assert_eq!(ind["parking_brake"], true);
    assert_eq!(ind["seatbelts"]["front_left"], true);
    assert_eq!(ind["turn_signals"]["left"], false);
}

// ============================================================================
// Ride lifecycle
// ============================================================================

#[test]
fn accept_while_offline_changes_nothing() {
    let (dash, _) = create_dashboard();
    let ride = dash.ride();
    let feed = dash.notifications();

    let outcome = dash.apply_command(DashboardCommand::AcceptRide);
    assert_eq!(outcome, CommandOutcome::Rejected(RejectReason::Ride(RideError::Offline)));
    assert_eq!(dash.ride(), ride);
    assert_eq!(dash.notifications(), feed);
}

#[test]
fn full_ride_sequence_ends_idle_online() {
    let (dash, _) = create_dashboard();
    for cmd in [
        DashboardCommand::ToggleOnline,
        DashboardCommand::AcceptRide,
        DashboardCommand::StartRide,
        DashboardCommand::EndRide,
    ] {
        assert_eq!(dash.apply_command(cmd), CommandOutcome::Applied, "{}", cmd.name());
    }
    let ride = dash.ride();
    assert_eq!(ride.status, RideStatus::Idle);
    assert!(ride.is_online);

    let kinds: Vec<_> = dash.notifications().iter().map(|n| n.kind).collect();
    assert_eq!(kinds, vec![NotificationKind::Payment, NotificationKind::Info]);
}

#[test]
fn going_offline_in_ride_forces_idle() {
    let (dash, _) = create_dashboard();
    dash.apply_command(DashboardCommand::ToggleOnline);
    dash.apply_command(DashboardCommand::AcceptRide);
    dash.apply_command(DashboardCommand::StartRide);
    assert_eq!(dash.ride().status, RideStatus::InRide);

    dash.apply_command(DashboardCommand::ToggleOnline);
    let ride = dash.ride();
    assert_eq!(ride.status, RideStatus::Idle);
    assert!(!ride.is_online);
}

#[test]
fn snapshot_lists_valid_ride_commands() {
    let (dash, _) = create_dashboard();
    dash.apply_command(DashboardCommand::ToggleOnline);
    dash.apply_command(DashboardCommand::AcceptRide);

    let snap = dash.snapshot();
    assert_eq!(snap.ride_label, "En Route to Pickup");
    assert!(snap
        .available_commands
        .iter()
        .any(|c| c.as_str() == "start_ride"));
}

// ============================================================================
// Gauges
// ============================================================================

#[test]
fn reading_mapping_reference_values() {
    assert_eq!(map_reading(60.0, 0.0, 120.0), 50.0);
    assert_eq!(map_reading(150.0, 0.0, 120.0), 100.0);
    assert_eq!(map_reading(-10.0, 0.0, 120.0), 0.0);
}

#[test]
fn snapshot_gauges_match_lookup() {
    let (dash, _) = create_dashboard();
    for _ in 0..10 {
        dash.speed_tick();
    }
    let snap = dash.snapshot();
    let speed = dash.gauge("speed").unwrap();
    let from_snapshot = snap.gauges.iter().find(|g| g.id.as_str() == "speed").unwrap();
    assert_eq!(&speed, from_snapshot);

    let expected = 180.0 - speed.value / 120.0 * 180.0;
    assert!((speed.geometry.angle_deg - expected).abs() < 1e-9);
}

// ============================================================================
// Carousel
// ============================================================================

#[test]
fn next_from_last_wraps() {
    let (dash, _) = create_dashboard();
    dash.apply_command(DashboardCommand::CarouselGoTo { index: 3 });
    dash.apply_command(DashboardCommand::CarouselNext);
    assert_eq!(dash.carousel().active_index, 0);
}

#[test]
fn out_of_range_go_to_is_noop() {
    let (dash, _) = create_dashboard();
    dash.apply_command(DashboardCommand::CarouselGoTo { index: 2 });
    assert!(dash
        .apply_command(DashboardCommand::CarouselGoTo { index: 4 })
        .is_rejected());
    assert!(dash
        .apply_command(DashboardCommand::CarouselGoTo { index: usize::MAX })
        .is_rejected());
    assert_eq!(dash.carousel().active_index, 2);
}

#[test]
fn swipe_triggers_exactly_one_step() {
    let (dash, _) = create_dashboard();
    dash.apply_command(DashboardCommand::Swipe { start_x: 100.0, end_x: 40.0 });
    assert_eq!(dash.carousel().active_index, 1);

    dash.apply_command(DashboardCommand::Swipe { start_x: 100.0, end_x: 70.0 });
    assert_eq!(dash.carousel().active_index, 1);
}

#[test]
fn auto_advance_cycles_through_panels() {
    let (dash, clock) = create_dashboard();
    let mut seen = Vec::new();
    for _ in 0..4 {
        clock.advance(60_000);
        assert!(dash.carousel_tick());
        seen.push(dash.carousel().active_index);
    }
    assert_eq!(seen, vec![1, 2, 3, 0]);
}

#[test]
fn explicit_navigation_postpones_auto_advance() {
    let (dash, clock) = create_dashboard();
    clock.set(59_000);
    dash.apply_command(DashboardCommand::CarouselPrev);
    assert_eq!(dash.carousel().active_index, 3);

    clock.set(60_000);
    assert!(!dash.carousel_tick());
    clock.set(119_000);
    assert!(dash.carousel_tick());
    assert_eq!(dash.carousel().active_index, 0);
}

#[test]
fn single_panel_never_cycles() {
    let (dash, clock) = create_dashboard();
    dash.set_panels(["Battery"]).unwrap();
    clock.advance(10 * 60_000);
    assert!(!dash.carousel_tick());
    assert_eq!(
        dash.apply_command(DashboardCommand::Swipe { start_x: 400.0, end_x: 0.0 }),
        CommandOutcome::Ignored
    );
    assert_eq!(dash.carousel_time_until_due(), None);
}

// ============================================================================
// Trip config
// ============================================================================

#[tokio::test]
async fn reload_from_missing_file_uses_defaults() {
    let (dash, _) = create_dashboard();
    dash.reload_trip_from("/definitely/not/here.json").await;
    assert_eq!(*dash.trip(), TripConfig::default());
}

#[tokio::test]
async fn reload_from_file_replaces_record() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("trip.json");
    let mut trip = TripConfig::default();
    trip.rider.name = "Ada Lovelace".into();
    trip.trip.trip_id = "TXI-000001".into();
    std::fs::write(&path, serde_json::to_string(&trip).unwrap()).unwrap();

    let (dash, _) = create_dashboard();
    dash.reload_trip_from(&path).await;
    assert_eq!(dash.trip().rider.name, "Ada Lovelace");
    assert_eq!(dash.snapshot().trip.trip.trip_id, "TXI-000001");
}
