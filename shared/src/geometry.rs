//! Geometry kernel - polar mapping between wall-clock time and the clock face
//!
//! The face is a single generic 24-hour cycle: 0° sits at 12 o'clock (midnight)
//! and angles grow clockwise, 15° per hour. Points use surface coordinates with
//! y growing downward, the same convention as SVG.

use std::fmt;

use chrono::{NaiveDateTime, NaiveTime, Timelike};
use serde::{Deserialize, Serialize};

/// Degrees of arc per hour of the day (360 / 24)
pub const DEGREES_PER_HOUR: f64 = 15.0;

/// Degrees of arc covered by a 15 minute slot
pub const SNAP_STEP_DEGREES: f64 = 3.75;

/// Largest sweep an arc path may describe before the endpoints coincide
pub const MAX_SWEEP_DEGREES: f64 = 359.99;

/// Minutes in the 24-hour cycle
pub const MINUTES_PER_DAY: i64 = 1440;

/// A point in surface coordinates
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance(&self, other: Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// Convert a face angle into a point on a circle.
///
/// The standard trigonometric parameterization is rotated by -90° so that
/// angle 0 lands at the top of the circle.
pub fn polar_to_cartesian(center_x: f64, center_y: f64, radius: f64, angle_degrees: f64) -> Point {
    let radians = (angle_degrees - 90.0).to_radians();
    Point {
        x: center_x + radius * radians.cos(),
        y: center_y + radius * radians.sin(),
    }
}

/// Map a time of day onto the face, `[0, 360)`
pub fn time_to_angle<T: Timelike>(time: &T) -> f64 {
    (time.hour() as f64 + time.minute() as f64 / 60.0) * DEGREES_PER_HOUR
}

/// Inverse of [`time_to_angle`]: place the time of day under `angle` on a copy
/// of `base`, keeping its calendar date and zeroing seconds.
///
/// Minute rounding that lands on 60 rolls over into the next hour, and 24:00
/// wraps to 00:00 of the same date.
pub fn angle_to_time(angle: f64, base: NaiveDateTime) -> NaiveDateTime {
    let total_hours = normalize_angle(angle) / DEGREES_PER_HOUR;
    let mut hours = total_hours.floor() as u32;
    let mut minutes = ((total_hours - hours as f64) * 60.0).round() as u32;
    if minutes >= 60 {
        minutes = 0;
        hours += 1;
    }
    let hours = hours % 24;

    NaiveTime::from_hms_opt(hours, minutes, 0)
        .map(|time| base.date().and_time(time))
        .unwrap_or(base)
}

/// Wrap an angle into `[0, 360)`
pub fn normalize_angle(angle: f64) -> f64 {
    let wrapped = angle.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360 for tiny negative inputs
    if wrapped >= 360.0 {
        0.0
    } else {
        wrapped
    }
}

/// Shortest signed rotation from `from` to `to`, in `[-180, 180)`
pub fn angle_delta(from: f64, to: f64) -> f64 {
    normalize_angle(to - from + 180.0) - 180.0
}

/// Round an angle to the nearest 15 minute boundary (multiple of 3.75°)
pub fn snap_angle_to_15_min(angle: f64) -> f64 {
    (angle / SNAP_STEP_DEGREES).round() * SNAP_STEP_DEGREES
}

/// Angles of the 24 hour ticks: 0, 15, ... 345
pub fn hour_tick_angles() -> impl Iterator<Item = f64> {
    (0..24).map(|hour| hour as f64 * DEGREES_PER_HOUR)
}

/// Angles of the 48 half-hour ticks: 0, 7.5, ... 352.5
pub fn half_hour_tick_angles() -> impl Iterator<Item = f64> {
    (0..48).map(|step| step as f64 * DEGREES_PER_HOUR / 2.0)
}

/// Horizontal alignment hint for a label placed at some face angle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TextAnchor {
    Start,
    Middle,
    End,
}

impl fmt::Display for TextAnchor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TextAnchor::Start => write!(f, "start"),
            TextAnchor::Middle => write!(f, "middle"),
            TextAnchor::End => write!(f, "end"),
        }
    }
}

/// Labels on the right half grow away from the face to the right, labels on
/// the left half to the left. The two vertical axis points stay centered.
pub fn label_anchor(angle: f64) -> TextAnchor {
    let angle = normalize_angle(angle);
    if angle == 0.0 || angle == 180.0 {
        TextAnchor::Middle
    } else if angle < 180.0 {
        TextAnchor::Start
    } else {
        TextAnchor::End
    }
}

/// A closed wedge from the face center out to an arc
#[derive(Debug, Clone, PartialEq)]
pub struct ArcPath {
    pub center: Point,
    pub radius: f64,
    pub start_angle: f64,
    /// End angle after unwrapping and clamping, `start_angle < end_angle`
    pub end_angle: f64,
    /// Point the path moves to first (at `end_angle`)
    pub from: Point,
    /// Point the arc segment ends on (at `start_angle`)
    pub to: Point,
    pub large_arc: bool,
}

impl ArcPath {
    pub fn sweep(&self) -> f64 {
        self.end_angle - self.start_angle
    }

    /// Flatten the wedge into a polygon: the center followed by points along
    /// the arc from start to end.
    pub fn outline(&self, segments: usize) -> Vec<Point> {
        let segments = segments.max(1);
        let mut points = Vec::with_capacity(segments + 2);
        points.push(self.center);
        for i in 0..=segments {
            let angle = self.start_angle + self.sweep() * i as f64 / segments as f64;
            points.push(polar_to_cartesian(
                self.center.x,
                self.center.y,
                self.radius,
                angle,
            ));
        }
        points
    }
}

impl fmt::Display for ArcPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "M {} {} A {} {} 0 {} 0 {} {} L {} {} Z",
            coord(self.from.x),
            coord(self.from.y),
            coord(self.radius),
            coord(self.radius),
            u8::from(self.large_arc),
            coord(self.to.x),
            coord(self.to.y),
            coord(self.center.x),
            coord(self.center.y),
        )
    }
}

fn coord(value: f64) -> String {
    let text = format!("{:.3}", value);
    let text = text.trim_end_matches('0').trim_end_matches('.');
    if text == "-0" {
        "0".to_string()
    } else {
        text.to_string()
    }
}

/// Build the wedge path for an activity spanning `start_angle..end_angle`.
///
/// The path starts at the end point and arcs back to the start point with the
/// sweep flag fixed at 0; that ordering is what makes the filled region the
/// wedge rather than its complement. An `end_angle` below `start_angle` wraps
/// past midnight.
pub fn describe_arc(cx: f64, cy: f64, radius: f64, start_angle: f64, end_angle: f64) -> ArcPath {
    let mut end_angle = end_angle;
    if end_angle < start_angle {
        end_angle += 360.0;
    }
    if end_angle - start_angle > MAX_SWEEP_DEGREES {
        end_angle = start_angle + MAX_SWEEP_DEGREES;
    }

    ArcPath {
        center: Point::new(cx, cy),
        radius,
        start_angle,
        end_angle,
        from: polar_to_cartesian(cx, cy, radius, end_angle),
        to: polar_to_cartesian(cx, cy, radius, start_angle),
        large_arc: end_angle - start_angle > 180.0,
    }
}
