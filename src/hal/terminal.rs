//! Plain-text renderer for terminals.
//!
//! # Layout
//!
//! ```text
//! Speed   [##########----------]  61 km/h
//! Battery [################----]  78% High   250 km  Good
//! Status  Available - Ready for new rides (online)
//! Cabin   22°C AC on  brake on  belts 1/4  doors closed  signals --
//! Panel   2/4 Trip Details
//!         Central Station, Platform 2 -> Downtown Mall, Main Entrance  $18.50
//! !       New Ride Request: Passenger waiting at Central Station
//! ```

use std::io::{self, Write};

use crate::dashboard::DashboardSnapshot;
use crate::telemetry::Corners;
use crate::traits::DashboardRenderer;

/// Width of the bar graphs in characters.
const BAR_WIDTH: usize = 20;

/// Notifications shown per frame.
const MAX_NOTIFICATIONS: usize = 3;

/// Writes one text frame per render to any [`Write`] sink.
pub struct TerminalRenderer<W: Write + Send> {
    out: W,
    clear_screen: bool,
}

impl TerminalRenderer<io::Stdout> {
    /// Render to stdout, clearing the screen between frames.
    pub fn stdout() -> Self {
        Self {
            out: io::stdout(),
            clear_screen: true,
        }
    }
}

impl<W: Write + Send> TerminalRenderer<W> {
    /// Render to `out` without clear-screen escapes.
    pub fn new(out: W) -> Self {
        Self {
            out,
            clear_screen: false,
        }
    }

    /// Consume the renderer and return the sink.
    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write + Send> DashboardRenderer for TerminalRenderer<W> {
    type Error = io::Error;

    fn render(&mut self, snapshot: &DashboardSnapshot) -> Result<(), Self::Error> {
        if self.clear_screen {
            write!(self.out, "\x1b[2J\x1b[H")?;
        }
        let t = &snapshot.telemetry;
        let battery = &snapshot.battery;

        let speed_pct = snapshot
            .gauges
            .iter()
            .find(|g| g.id.as_str() == "speed")
            .map_or(0.0, |g| g.geometry.percentage);
        writeln!(
            self.out,
            "Speed   [{}] {:>3.0} km/h",
            bar(speed_pct),
            t.speed_kmh
        )?;

        write!(
            self.out,
            "Battery [{}] {:>3.0}% {:?}   {:.0} km  {}",
            bar(t.battery_percent),
            t.battery_percent,
            battery.band,
            battery.range_km,
            battery.health.label()
        )?;
        if let Some(minutes) = battery.minutes_to_full {
            write!(self.out, "  charging, full in {minutes} min")?;
        }
        if let Some(progress) = t.swap_progress {
            write!(self.out, "  swapping {progress}%")?;
        }
        writeln!(self.out)?;

        writeln!(
            self.out,
            "Status  {} - {} ({})",
            snapshot.ride_label,
            snapshot.ride_detail,
            if snapshot.ride.is_online { "online" } else { "offline" }
        )?;

        let ind = &t.indicators;
        let corners = |c: &Corners| {
            [c.front_left, c.front_right, c.rear_left, c.rear_right]
                .into_iter()
                .filter(|&on| on)
                .count()
        };
        let open_doors = corners(&ind.doors_open);
        writeln!(
            self.out,
            "Cabin   {:.0}°C AC {}  brake {}  belts {}/4  {}  signals {}{}",
            ind.cabin_temp_c,
            on_off(ind.ac_on),
            on_off(ind.parking_brake),
            corners(&ind.seatbelts),
            if open_doors == 0 {
                "doors closed".to_string()
            } else {
                format!("{open_doors} door(s) open")
            },
            if ind.turn_signals.left { '<' } else { '-' },
            if ind.turn_signals.right { '>' } else { '-' },
        )?;

        let carousel = &snapshot.carousel;
        writeln!(
            self.out,
            "Panel   {}/{} {}",
            carousel.active_index + 1,
            carousel.panel_count,
            carousel.active_title
        )?;
        if let Some(body) = panel_body(snapshot) {
            writeln!(self.out, "        {body}")?;
        }

        for n in snapshot.notifications.iter().take(MAX_NOTIFICATIONS) {
            let marker = if n.urgent { '!' } else { '-' };
            writeln!(self.out, "{marker}       {}: {}", n.title, n.message)?;
        }
        self.out.flush()
    }

    fn show_message(&mut self, line1: &str, line2: Option<&str>) -> Result<(), Self::Error> {
        writeln!(self.out, "{line1}")?;
        if let Some(line2) = line2 {
            writeln!(self.out, "{line2}")?;
        }
        self.out.flush()
    }
}

/// Body line for the active panel, chosen by its title. Unknown panels show
/// only their title.
fn panel_body(snapshot: &DashboardSnapshot) -> Option<String> {
    let trip = &snapshot.trip;
    let body = match snapshot.carousel.active_title.as_str() {
        "Rider Info" => format!(
            "{}  {}  rating {:.1}",
            trip.rider.name, trip.rider.phone, trip.rider.rating
        ),
        "Trip Details" => format!(
            "{} -> {}  {}",
            trip.rider.pickup_location, trip.rider.drop_location, trip.rider.fare
        ),
        "Vehicle" => format!("{}  {}", trip.vehicle.model, trip.vehicle.license_plate),
        "Battery" => format!(
            "{} pack, rated {}",
            trip.vehicle.battery_capacity, trip.vehicle.range
        ),
        _ => return None,
    };
    Some(body)
}

fn on_off(on: bool) -> &'static str {
    if on {
        "on"
    } else {
        "off"
    }
}

/// `#` for the filled share of `percentage`, `-` for the rest.
fn bar(percentage: f64) -> String {
    let filled = ((percentage.clamp(0.0, 100.0) / 100.0) * BAR_WIDTH as f64).round() as usize;
    let mut s = "#".repeat(filled);
    s.push_str(&"-".repeat(BAR_WIDTH - filled));
    s
}
