//! Activity model - the time blocks placed on the face

use std::fmt;

use chrono::{Duration, NaiveDateTime, NaiveTime, Timelike};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::geometry::{time_to_angle, MINUTES_PER_DAY};

/// Colours offered by the editor when none is configured
pub const DEFAULT_PALETTE: &[&str] = &[
    "#4f86f7", "#f76f4f", "#4fc78a", "#f7c04f", "#a26ff7", "#f74fa2", "#4fd0e0", "#8a8f99",
];

/// Opaque activity identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ActivityId(Uuid);

impl ActivityId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ActivityId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ActivityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A titled, coloured time block.
///
/// Only the time of day of `start_time` and `end_time` matters for geometry.
/// An end earlier in the day than the start wraps past midnight.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Activity {
    pub id: ActivityId,
    pub title: String,
    pub start_time: NaiveDateTime,
    pub end_time: NaiveDateTime,
    pub duration_minutes: i64,
    pub color: String,
}

impl Activity {
    pub fn new(
        title: impl Into<String>,
        start_time: NaiveDateTime,
        end_time: NaiveDateTime,
        color: impl Into<String>,
    ) -> Self {
        Self {
            id: ActivityId::new(),
            title: title.into(),
            start_time,
            end_time,
            duration_minutes: duration_minutes(start_time, end_time),
            color: color.into(),
        }
    }

    /// Copy with new endpoints and a recomputed duration
    pub fn with_times(&self, start_time: NaiveDateTime, end_time: NaiveDateTime) -> Self {
        Self {
            start_time,
            end_time,
            duration_minutes: duration_minutes(start_time, end_time),
            ..self.clone()
        }
    }

    /// Restore the duration invariant after the endpoints were edited in place
    pub fn refresh_duration(&mut self) {
        self.duration_minutes = duration_minutes(self.start_time, self.end_time);
    }

    /// Move the start to a new time of day, keeping its date
    pub fn set_start_time_of_day(&mut self, time: NaiveTime) {
        self.start_time = self.start_time.date().and_time(time);
        self.refresh_duration();
    }

    /// Move the end to a new time of day, keeping its date
    pub fn set_end_time_of_day(&mut self, time: NaiveTime) {
        self.end_time = self.end_time.date().and_time(time);
        self.refresh_duration();
    }

    pub fn start_angle(&self) -> f64 {
        time_to_angle(&self.start_time)
    }

    pub fn end_angle(&self) -> f64 {
        time_to_angle(&self.end_time)
    }

    /// Start as minutes past midnight
    pub fn start_minute(&self) -> i64 {
        minute_of_day(&self.start_time)
    }

    /// Half-open span on the 24h cycle; the end may exceed 1440 when the
    /// activity wraps past midnight.
    pub fn minute_span(&self) -> (i64, i64) {
        let start = self.start_minute();
        (start, start + self.duration_minutes)
    }

    /// Strict interval overlap on the 24h cycle. Touching endpoints do not
    /// overlap.
    pub fn overlaps(&self, other: &Activity) -> bool {
        let (s1, e1) = self.minute_span();
        let (s2, e2) = other.minute_span();
        [-MINUTES_PER_DAY, 0, MINUTES_PER_DAY]
            .iter()
            .any(|shift| s1 < e2 + shift && e1 > s2 + shift)
    }

    pub fn format_span(&self) -> String {
        format!(
            "{} – {}",
            self.start_time.format("%H:%M"),
            self.end_time.format("%H:%M")
        )
    }
}

/// Minutes from `start` to `end`, wrapped into `[0, 1440)`
pub fn duration_minutes(start: NaiveDateTime, end: NaiveDateTime) -> i64 {
    (end - start).num_minutes().rem_euclid(MINUTES_PER_DAY)
}

fn minute_of_day<T: Timelike>(time: &T) -> i64 {
    time.hour() as i64 * 60 + time.minute() as i64
}

/// Round to the nearest quarter hour, dropping seconds
pub fn round_to_quarter_hour(time: NaiveDateTime) -> NaiveDateTime {
    let minutes = minute_of_day(&time);
    let rounded = ((minutes as f64 / 15.0).round() as i64) * 15;
    time.date().and_time(NaiveTime::MIN) + Duration::minutes(rounded)
}

/// Parse a `#rrggbb` colour
pub fn parse_hex_color(color: &str) -> Option<[u8; 3]> {
    let hex = color.strip_prefix('#')?;
    if hex.len() != 6 || !hex.is_ascii() {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
    Some([channel(0)?, channel(2)?, channel(4)?])
}

pub fn format_hex_color(rgb: [u8; 3]) -> String {
    format!("#{:02x}{:02x}{:02x}", rgb[0], rgb[1], rgb[2])
}
