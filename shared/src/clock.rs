//! Wall-clock sampling for the current-time indicator
//!
//! The indicator only moves once a minute, so the face resamples the clock on a
//! one-minute cadence instead of every frame.

use chrono::{Local, NaiveDateTime, Timelike};

/// Current local time without a timezone, truncated to the minute
pub fn local_now() -> NaiveDateTime {
    truncate_to_minute(Local::now().naive_local())
}

pub fn truncate_to_minute(time: NaiveDateTime) -> NaiveDateTime {
    time.with_second(0)
        .and_then(|t| t.with_nanosecond(0))
        .unwrap_or(time)
}

/// Reports a new sample only when the wall-clock minute changes
#[derive(Debug, Clone, Default)]
pub struct MinuteClock {
    last: Option<NaiveDateTime>,
}

impl MinuteClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed the current time; returns the minute-truncated sample when it
    /// differs from the previous one.
    pub fn poll(&mut self, now: NaiveDateTime) -> Option<NaiveDateTime> {
        let minute = truncate_to_minute(now);
        if self.last == Some(minute) {
            return None;
        }
        self.last = Some(minute);
        Some(minute)
    }

    pub fn last(&self) -> Option<NaiveDateTime> {
        self.last
    }
}
