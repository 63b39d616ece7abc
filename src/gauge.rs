//! Gauge mapping: numeric readings to visual geometry.
//!
//! Everything in this module is pure. A reading is first normalized to a
//! percentage of its configured range with [`map_reading`], then placed on an
//! arc described by [`ArcConfig`].
//!
//! # Angle Convention
//!
//! Angles are in degrees using the math convention: 0° points along the
//! positive x axis and angles grow counter-clockwise. An arc's
//! [`SweepDirection`] is part of its configuration and is never inferred from
//! the start angle.
//!
//! # Example
//!
//! ```rust
//! use ride_console::gauge::{map_reading, ArcConfig};
//!
//! assert_eq!(map_reading(60.0, 0.0, 120.0), 50.0);
//! assert_eq!(map_reading(150.0, 0.0, 120.0), 100.0);
//!
//! // Speedometer semicircle: 0% at the left (180°), 100% at the right (0°)
//! let arc = ArcConfig::semicircle();
//! let geometry = arc.geometry(50.0);
//! assert!((geometry.angle_deg - 90.0).abs() < 1e-9);
//! assert!((geometry.arc_length - 219.91).abs() < 0.01);
//! ```

use heapless::String as HString;
use serde::{Deserialize, Serialize};

/// Maximum length of a gauge identifier.
pub const MAX_GAUGE_ID: usize = 16;

/// Short gauge identifier (e.g. `"speed"`).
pub type GaugeId = HString<MAX_GAUGE_ID>;

/// Normalize `value` to a percentage of `[min, max]`, clamped to `[0, 100]`.
///
/// A degenerate range (`max <= min`) or a non-finite result maps to 0 so the
/// gauge always has something renderable.
pub fn map_reading(value: f64, min: f64, max: f64) -> f64 {
    let span = max - min;
    if span.is_nan() || span <= 0.0 {
        return 0.0;
    }
    let percentage = 100.0 * (value - min) / span;
    if percentage.is_nan() {
        return 0.0;
    }
    percentage.clamp(0.0, 100.0)
}

/// Direction in which the needle travels as the reading grows.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SweepDirection {
    /// Angle decreases with the reading: `start - fraction * sweep`.
    #[default]
    Clockwise,
    /// Angle increases with the reading: `start + fraction * sweep`.
    CounterClockwise,
}

/// Arc that a gauge needle or progress stroke travels along.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ArcConfig {
    /// Angle at 0% in degrees.
    pub start_angle_deg: f64,
    /// Total sweep in degrees (positive).
    pub sweep_deg: f64,
    /// Direction of travel.
    pub direction: SweepDirection,
    /// Arc radius in renderer units, used for stroke lengths.
    pub radius: f64,
}

impl Default for ArcConfig {
    fn default() -> Self {
        Self::semicircle()
    }
}

impl ArcConfig {
    /// 180° speedometer arc from the left horizontal to the right horizontal.
    pub const fn semicircle() -> Self {
        Self {
            start_angle_deg: 180.0,
            sweep_deg: 180.0,
            direction: SweepDirection::Clockwise,
            radius: 70.0,
        }
    }

    /// 270° arc opening at the bottom, from lower-left to lower-right.
    pub const fn three_quarter() -> Self {
        Self {
            start_angle_deg: 225.0,
            sweep_deg: 270.0,
            direction: SweepDirection::Clockwise,
            radius: 70.0,
        }
    }

    /// Set the start angle
    pub fn with_start_angle(mut self, degrees: f64) -> Self {
        self.start_angle_deg = degrees;
        self
    }

    /// Set the sweep, taking its magnitude
    pub fn with_sweep(mut self, degrees: f64) -> Self {
        self.sweep_deg = degrees.abs();
        self
    }

    /// Set the sweep direction
    pub fn with_direction(mut self, direction: SweepDirection) -> Self {
        self.direction = direction;
        self
    }

    /// Set the radius, taking its magnitude
    pub fn with_radius(mut self, radius: f64) -> Self {
        self.radius = radius.abs();
        self
    }

    /// Needle angle for a percentage (clamped to `[0, 100]`).
    pub fn angle_for(&self, percentage: f64) -> f64 {
        let fraction = clamp_percentage(percentage) / 100.0;
        match self.direction {
            SweepDirection::Clockwise => self.start_angle_deg - fraction * self.sweep_deg,
            SweepDirection::CounterClockwise => self.start_angle_deg + fraction * self.sweep_deg,
        }
    }

    /// Full stroke length of the arc.
    pub fn arc_length(&self) -> f64 {
        self.radius * self.sweep_deg.to_radians()
    }

    /// Complete geometry for a percentage.
    pub fn geometry(&self, percentage: f64) -> GaugeGeometry {
        let percentage = clamp_percentage(percentage);
        let arc_length = self.arc_length();
        GaugeGeometry {
            percentage,
            angle_deg: self.angle_for(percentage),
            arc_length,
            dash_offset: arc_length - arc_length * percentage / 100.0,
        }
    }
}

fn clamp_percentage(percentage: f64) -> f64 {
    if percentage.is_nan() {
        0.0
    } else {
        percentage.clamp(0.0, 100.0)
    }
}

/// Visual parameters derived from one reading. Never stored.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct GaugeGeometry {
    /// Reading as a percentage of its range, in `[0, 100]`.
    pub percentage: f64,
    /// Needle angle in degrees.
    pub angle_deg: f64,
    /// Total stroke length of the arc (dash array).
    pub arc_length: f64,
    /// Unfilled stroke length (dash offset).
    pub dash_offset: f64,
}

/// A labelled position along a gauge scale.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScaleMark {
    /// Reading value at this mark.
    pub value: f64,
    /// Angle of the mark in degrees.
    pub angle_deg: f64,
    /// X position on the unit circle.
    pub x: f64,
    /// Y position on the unit circle (math convention, up is positive).
    pub y: f64,
}

/// Which telemetry value a gauge displays.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Reading {
    /// Vehicle speed in km/h.
    Speed,
    /// Battery charge in percent.
    Battery,
}

/// A registered gauge: a reading, its range, and the arc it is drawn on.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GaugeSpec {
    /// Identifier used to look the gauge up.
    pub id: GaugeId,
    /// Value shown by the gauge.
    pub reading: Reading,
    /// Reading at 0%.
    pub min: f64,
    /// Reading at 100%.
    pub max: f64,
    /// Arc geometry.
    pub arc: ArcConfig,
}

impl GaugeSpec {
    /// Create a gauge spec. Ids longer than [`MAX_GAUGE_ID`] are truncated.
    pub fn new(id: &str, reading: Reading, min: f64, max: f64, arc: ArcConfig) -> Self {
        let mut gauge_id = GaugeId::new();
        for c in id.chars() {
            if gauge_id.push(c).is_err() {
                break;
            }
        }
        Self {
            id: gauge_id,
            reading,
            min,
            max,
            arc,
        }
    }

    /// The default speedometer: 0..120 km/h on a semicircle.
    pub fn speedometer(max_speed_kmh: f64) -> Self {
        Self::new("speed", Reading::Speed, 0.0, max_speed_kmh, ArcConfig::semicircle())
    }

    /// The default battery dial: 0..100 % on a three-quarter arc.
    pub fn battery_dial() -> Self {
        Self::new("battery", Reading::Battery, 0.0, 100.0, ArcConfig::three_quarter())
    }

    /// Geometry for a raw reading value.
    pub fn geometry(&self, value: f64) -> GaugeGeometry {
        self.arc.geometry(map_reading(value, self.min, self.max))
    }

    /// `count` evenly spaced scale marks from `min` to `max` inclusive.
    ///
    /// Fewer than two marks cannot span the scale and yields an empty list.
    pub fn scale_marks(&self, count: usize) -> Vec<ScaleMark> {
        if count < 2 {
            return Vec::new();
        }
        let steps = (count - 1) as f64;
        (0..count)
            .map(|i| {
                let fraction = i as f64 / steps;
                let value = self.min + fraction * (self.max - self.min);
                let angle_deg = self.arc.angle_for(fraction * 100.0);
                let radians = angle_deg.to_radians();
                ScaleMark {
                    value,
                    angle_deg,
                    x: radians.cos(),
                    y: radians.sin(),
                }
            })
            .collect()
    }
}
