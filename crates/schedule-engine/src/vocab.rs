//! Static identifier tables shared by the model and the serde boundary.
//!
//! Status values and weekday names arrive as schema.org identifiers, short
//! names, or both. The tables here are read-only and owned by this module.

use serde::de::Error as _;
use serde::{Deserialize, Deserializer};
use std::collections::BTreeSet;

use crate::error::{Result, ScheduleError};
use crate::event::EventStatus;

/// Category tag carried by the main recurring service of an organisation.
pub const PRIMARY_SERVICE_CATEGORY: &str = "primary-service";

const SCHEMA_ORG: &str = "https://schema.org/";

/// Weekday names indexed 0=Sunday..6=Saturday.
pub const WEEKDAY_NAMES: [&str; 7] = [
    "Sunday",
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
];

/// `(status, short name, schema.org name)`.
pub(crate) static STATUS_TABLE: [(EventStatus, &str, &str); 5] = [
    (EventStatus::Scheduled, "scheduled", "EventScheduled"),
    (EventStatus::Cancelled, "cancelled", "EventCancelled"),
    (EventStatus::Postponed, "postponed", "EventPostponed"),
    (EventStatus::Rescheduled, "rescheduled", "EventRescheduled"),
    (EventStatus::MovedOnline, "movedOnline", "EventMovedOnline"),
];

fn strip_schema_org(input: &str) -> &str {
    let trimmed = input.trim();
    trimmed
        .strip_prefix(SCHEMA_ORG)
        .or_else(|| trimmed.strip_prefix("http://schema.org/"))
        .or_else(|| trimmed.strip_prefix("schema:"))
        .unwrap_or(trimmed)
}

/// Weekday index for a name: `"Sunday"`, `"sun"`, or `"https://schema.org/Sunday"`.
pub fn weekday_index(name: &str) -> Option<u8> {
    let bare = strip_schema_org(name);
    WEEKDAY_NAMES
        .iter()
        .position(|full| {
            full.eq_ignore_ascii_case(bare)
                || (bare.len() == 3 && full[..3].eq_ignore_ascii_case(bare))
        })
        .and_then(|i| u8::try_from(i).ok())
}

/// Weekday name for an index, `None` when out of range.
pub fn weekday_name(index: u8) -> Option<&'static str> {
    WEEKDAY_NAMES.get(usize::from(index)).copied()
}

/// Look up a status by short name, schema.org name, or schema.org URI.
pub(crate) fn status_from_identifier(input: &str) -> Result<EventStatus> {
    let bare = strip_schema_org(input);
    STATUS_TABLE
        .iter()
        .find(|(_, short, schema)| short.eq_ignore_ascii_case(bare) || *schema == bare)
        .map(|(status, _, _)| *status)
        .ok_or_else(|| ScheduleError::InvalidStatus(input.to_string()))
}

/// Full schema.org URI for a status.
pub fn status_uri(status: EventStatus) -> String {
    format!("{}{}", SCHEMA_ORG, status.schema_name())
}

#[derive(Deserialize)]
#[serde(untagged)]
enum WeekdayRef {
    Index(u8),
    Name(String),
}

/// Serde helper: a list of weekday indices or names into an index set.
pub(crate) fn deserialize_weekdays<'de, D>(deserializer: D) -> std::result::Result<BTreeSet<u8>, D::Error>
where
    D: Deserializer<'de>,
{
    let refs = Vec::<WeekdayRef>::deserialize(deserializer)?;
    refs.into_iter()
        .map(|r| match r {
            WeekdayRef::Index(i) if i < 7 => Ok(i),
            WeekdayRef::Index(i) => Err(ScheduleError::InvalidWeekday(i.to_string())),
            WeekdayRef::Name(name) => {
                weekday_index(&name).ok_or(ScheduleError::InvalidWeekday(name))
            }
        })
        .collect::<Result<BTreeSet<u8>>>()
        .map_err(D::Error::custom)
}
