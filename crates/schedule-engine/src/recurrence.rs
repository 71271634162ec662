//! Recurrence definitions -- the repeating pattern behind a recurring event.

use std::collections::BTreeSet;

use chrono::{DateTime, NaiveDate, Utc};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};

use crate::period::RepeatPeriod;
use crate::vocab;

/// A repeating occurrence pattern.
///
/// Two shapes are meaningful:
///
/// - **Day-of-week**: `days_of_week` non-empty; fires on those weekdays in every
///   `repeat_period.repeat_weeks()`-th week counted from the anchor date.
/// - **Fixed interval**: `days_of_week` empty; fires every `repeat_period`
///   starting at the first day of the effective bounds.
///
/// An empty weekday set together with a zero period is inert: it produces no
/// instances and is not an error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RecurrenceDefinition {
    /// Weekday indices, 0=Sunday..6=Saturday.
    #[serde(deserialize_with = "vocab::deserialize_weekdays")]
    pub days_of_week: BTreeSet<u8>,
    /// Local `HH:mm` start; absent means the occurrence is date-only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_time: Option<String>,
    pub repeat_period: RepeatPeriod,
    #[serde(
        deserialize_with = "deserialize_optional_date",
        skip_serializing_if = "Option::is_none"
    )]
    pub valid_from: Option<NaiveDate>,
    /// Last day on which the recurrence may fire (inclusive).
    #[serde(
        deserialize_with = "deserialize_optional_date",
        skip_serializing_if = "Option::is_none"
    )]
    pub valid_until: Option<NaiveDate>,
    #[serde(deserialize_with = "deserialize_except_dates")]
    pub except_dates: BTreeSet<NaiveDate>,
    /// IANA zone for `start_time`/`end_time`; absent means UTC.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_zone: Option<String>,
}

impl Default for RecurrenceDefinition {
    fn default() -> Self {
        Self {
            days_of_week: BTreeSet::new(),
            start_time: None,
            end_time: None,
            repeat_period: RepeatPeriod::WEEKLY,
            valid_from: None,
            valid_until: None,
            except_dates: BTreeSet::new(),
            time_zone: None,
        }
    }
}

impl RecurrenceDefinition {
    /// Weekly on the given weekday indices.
    pub fn weekly(days: impl IntoIterator<Item = u8>) -> Self {
        Self {
            days_of_week: days.into_iter().collect(),
            ..Self::default()
        }
    }

    /// Fixed-interval recurrence with no weekday set.
    pub fn every(period: RepeatPeriod) -> Self {
        Self {
            repeat_period: period,
            ..Self::default()
        }
    }

    /// Set the local `HH:mm` start time.
    pub fn at(mut self, start_time: &str) -> Self {
        self.start_time = Some(start_time.to_string());
        self
    }

    /// Set the local `HH:mm` end time. An end at or before the start falls
    /// on the following day.
    pub fn ending_at(mut self, end_time: &str) -> Self {
        self.end_time = Some(end_time.to_string());
        self
    }

    /// IANA zone used to interpret the start and end times.
    pub fn in_zone(mut self, time_zone: &str) -> Self {
        self.time_zone = Some(time_zone.to_string());
        self
    }

    /// Season bounds, both inclusive. `None` leaves that side open.
    pub fn valid_between(mut self, from: Option<NaiveDate>, until: Option<NaiveDate>) -> Self {
        self.valid_from = from;
        self.valid_until = until;
        self
    }

    /// Add exception dates on which the recurrence does not fire.
    pub fn except(mut self, dates: impl IntoIterator<Item = NaiveDate>) -> Self {
        self.except_dates.extend(dates);
        self
    }

    /// True when neither generation mode applies.
    pub fn is_inert(&self) -> bool {
        self.days_of_week.is_empty() && self.repeat_period.is_zero()
    }

    /// True when the season's last day is before the UTC date of `instant`.
    ///
    /// `valid_until` is inclusive of its whole day, so a window opening
    /// partway through that day still sees the season as live.
    pub fn expired_before(&self, instant: DateTime<Utc>) -> bool {
        self.valid_until
            .is_some_and(|until| until < instant.date_naive())
    }
}

/// Accepts `YYYY-MM-DD` or an RFC 3339 instant (its UTC date is used).
pub(crate) fn parse_lenient_date(input: &str) -> Option<NaiveDate> {
    let trimmed = input.trim();
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d").ok().or_else(|| {
        DateTime::parse_from_rfc3339(trimmed)
            .ok()
            .map(|dt| dt.with_timezone(&Utc).date_naive())
    })
}

fn deserialize_optional_date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<String>::deserialize(deserializer)? {
        None => Ok(None),
        Some(raw) => parse_lenient_date(&raw)
            .map(Some)
            .ok_or_else(|| D::Error::custom(format!("invalid date: {}", raw))),
    }
}

/// Malformed exception dates are dropped rather than failing the definition.
fn deserialize_except_dates<'de, D>(deserializer: D) -> Result<BTreeSet<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Vec::<String>::deserialize(deserializer)?;
    Ok(raw
        .iter()
        .filter_map(|s| {
            let parsed = parse_lenient_date(s);
            if parsed.is_none() {
                tracing::debug!(value = %s, "ignoring malformed exception date");
            }
            parsed
        })
        .collect())
}
