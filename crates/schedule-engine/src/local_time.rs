//! Local wall-clock time → absolute UTC instant.
//!
//! Uses a single-correction approximation against the `chrono-tz` database:
//! treat the wall-clock time as if it were UTC, ask the zone what local time
//! that provisional instant shows, and shift back by the difference. This is
//! exact away from DST transitions. For a local time inside a spring-forward
//! gap or a fall-back overlap the result can be off by the transition offset.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use chrono_tz::Tz;

use crate::error::{Result, ScheduleError};

/// Parse an `HH:mm` (or `HH:mm:ss`) wall-clock string.
///
/// # Errors
/// Returns `ScheduleError::InvalidTime` if neither format matches.
pub fn parse_wall_clock(input: &str) -> Result<NaiveTime> {
    let trimmed = input.trim();
    NaiveTime::parse_from_str(trimmed, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(trimmed, "%H:%M:%S"))
        .map_err(|_| ScheduleError::InvalidTime(input.to_string()))
}

/// Look up an IANA zone identifier.
///
/// `None` or an unknown identifier both mean "interpret as UTC"; the unknown
/// case is logged since it usually points at bad upstream data.
pub fn lookup_zone(time_zone: Option<&str>) -> Option<Tz> {
    let name = time_zone?.trim();
    if name.is_empty() {
        return None;
    }
    match name.parse::<Tz>() {
        Ok(tz) => Some(tz),
        Err(_) => {
            tracing::debug!(time_zone = name, "unknown timezone, falling back to UTC");
            None
        }
    }
}

/// Resolve `date` + `time` in `zone` to a UTC instant.
///
/// With no zone the wall-clock time is already UTC and no correction is made.
pub fn resolve_in_zone(date: NaiveDate, time: NaiveTime, zone: Option<Tz>) -> DateTime<Utc> {
    let intended = date.and_time(time);
    let provisional = intended.and_utc();

    let Some(tz) = zone else {
        return provisional;
    };

    let observed = provisional.with_timezone(&tz).naive_local();
    let delta = observed - intended;
    provisional - delta
}

/// Resolve `date` + `time` with an optional IANA zone identifier.
pub fn resolve_local_time(date: NaiveDate, time: NaiveTime, time_zone: Option<&str>) -> DateTime<Utc> {
    resolve_in_zone(date, time, lookup_zone(time_zone))
}
