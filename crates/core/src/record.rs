//! Time-record interval rules: duration, closing, and ordering checks.

use chrono_tz::Tz;
use serde::Serialize;

use crate::error::CoreError;
use crate::types::Timestamp;

/// Start/end pair of a record, with the zone each was entered in.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordTimes {
    pub start_time: Timestamp,
    pub start_time_tz: String,
    pub end_time: Option<Timestamp>,
    pub end_time_tz: String,
}

/// Result of attempting to close a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CloseOutcome {
    /// `end_time` was set to the closing instant.
    Closed,
    /// The record already had an end time; nothing changed.
    AlreadyClosed,
    /// The record starts after the closing instant; nothing changed.
    StartsInFuture,
}

/// Length of the interval in seconds, with microsecond precision.
///
/// Open records (no end time) have a duration of zero.
pub fn duration_seconds(start: Timestamp, end: Option<Timestamp>) -> f64 {
    let Some(end) = end else {
        return 0.0;
    };
    let delta = end - start;
    match delta.num_microseconds() {
        Some(micros) => micros as f64 / 1_000_000.0,
        // Beyond ~292k years; millisecond precision is plenty there.
        None => delta.num_milliseconds() as f64 / 1_000.0,
    }
}

/// Reject an end time that precedes the start time.
pub fn validate_interval(start: Timestamp, end: Option<Timestamp>) -> Result<(), CoreError> {
    match end {
        Some(end) if end < start => Err(CoreError::invalid(
            "end_time",
            "End time cannot be before start time",
        )),
        _ => Ok(()),
    }
}

impl RecordTimes {
    /// Close the interval at `now`, tagging the end with `current`.
    ///
    /// Only an open record whose start is not after `now` is modified.
    pub fn close(&mut self, now: Timestamp, current: Tz) -> CloseOutcome {
        if self.end_time.is_some() {
            return CloseOutcome::AlreadyClosed;
        }
        if now < self.start_time {
            return CloseOutcome::StartsInFuture;
        }
        self.end_time = Some(now);
        self.end_time_tz = current.name().to_string();
        CloseOutcome::Closed
    }

    pub fn duration_seconds(&self) -> f64 {
        duration_seconds(self.start_time, self.end_time)
    }

    pub fn is_open(&self) -> bool {
        self.end_time.is_none()
    }
}
