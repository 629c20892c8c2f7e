//! Named-timezone handling for record timestamps.
//!
//! A record's start and end are entered as wall-clock readings together with
//! an independently chosen IANA zone. The reading arrives already attached to
//! the server's current zone, so it is first turned back into a naive clock
//! reading in that zone and then re-attached to the chosen zone.

use chrono::offset::LocalResult;
use chrono::{NaiveDateTime, TimeZone, Utc};
use chrono_tz::{Tz, TZ_VARIANTS};
use serde::Deserialize;

use crate::error::CoreError;
use crate::types::Timestamp;

/// Parse an IANA zone name, reporting failures against `field`.
pub fn parse_zone(field: &'static str, name: &str) -> Result<Tz, CoreError> {
    name.trim()
        .parse::<Tz>()
        .map_err(|_| CoreError::invalid(field, format!("Unknown time zone '{name}'")))
}

/// A submitted start or end time.
///
/// Either an RFC 3339 instant (`2024-01-15T09:00:00Z`), read on the current
/// zone's clock, or a bare reading (`2024-01-15T09:00:00`) with no offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum ClockReading {
    Instant(Timestamp),
    Naive(NaiveDateTime),
}

impl From<Timestamp> for ClockReading {
    fn from(value: Timestamp) -> Self {
        Self::Instant(value)
    }
}

impl ClockReading {
    /// The naive wall-clock reading, as seen on `current`'s clock.
    pub fn naive_in(&self, current: Tz) -> NaiveDateTime {
        match self {
            Self::Instant(value) => value.with_timezone(&current).naive_local(),
            Self::Naive(naive) => *naive,
        }
    }
}

/// Re-interpret `value` as a clock reading in `target`.
///
/// `value` is expressed as a naive local time in `current`, and that same
/// naive reading is then made aware in `target`. Readings that are ambiguous
/// in `target` (clocks falling back) resolve to the earlier instant; readings
/// that do not exist there (clocks springing forward) are rejected.
pub fn convert_time(
    field: &'static str,
    value: impl Into<ClockReading>,
    current: Tz,
    target: Tz,
) -> Result<Timestamp, CoreError> {
    let naive = value.into().naive_in(current);

    match target.from_local_datetime(&naive) {
        LocalResult::Single(dt) => Ok(dt.with_timezone(&Utc)),
        LocalResult::Ambiguous(earliest, _) => Ok(earliest.with_timezone(&Utc)),
        LocalResult::None => Err(CoreError::invalid(
            field,
            format!("{naive} does not exist in time zone {}", target.name()),
        )),
    }
}

/// Zone names offered for selection, sorted alphabetically.
///
/// Region-style names (`Europe/Berlin`) plus `UTC`; legacy aliases under
/// `Etc/`, `US/` and `SystemV/` are left out.
pub fn common_timezones() -> Vec<&'static str> {
    let mut names: Vec<&'static str> = TZ_VARIANTS
        .iter()
        .map(|tz| tz.name())
        .filter(|name| {
            *name == "UTC"
                || (name.contains('/')
                    && !name.starts_with("Etc/")
                    && !name.starts_with("US/")
                    && !name.starts_with("SystemV/"))
        })
        .collect();
    names.sort_unstable();
    names
}
