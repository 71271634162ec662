//! Event definitions and resolved instances.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{Result, ScheduleError};
use crate::recurrence::RecurrenceDefinition;
use crate::vocab;

/// Lifecycle status of an event.
///
/// Statuses are assigned by whoever built the definitions; the resolver only
/// uses them to decide which instances are overrides.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum EventStatus {
    #[default]
    Scheduled,
    Cancelled,
    Postponed,
    Rescheduled,
    MovedOnline,
}

impl EventStatus {
    /// Short camelCase name, as used in serialized output.
    pub fn as_str(&self) -> &'static str {
        self.table_entry().1
    }

    /// schema.org `EventStatusType` member name.
    pub fn schema_name(&self) -> &'static str {
        self.table_entry().2
    }

    fn table_entry(&self) -> &'static (EventStatus, &'static str, &'static str) {
        vocab::STATUS_TABLE
            .iter()
            .find(|(status, _, _)| status == self)
            .unwrap_or(&vocab::STATUS_TABLE[0])
    }

    /// Cancelled and rescheduled events supersede a scheduled occurrence.
    pub fn is_override(&self) -> bool {
        matches!(self, EventStatus::Cancelled | EventStatus::Rescheduled)
    }
}

impl fmt::Display for EventStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EventStatus {
    type Err = ScheduleError;

    fn from_str(s: &str) -> Result<Self> {
        vocab::status_from_identifier(s)
    }
}

impl Serialize for EventStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for EventStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// A place an event happens at. Only `id` takes part in override matching.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl Location {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: None,
        }
    }
}

/// Timing of a single, non-repeating event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OneOff {
    pub occurs_at: DateTime<Utc>,
    pub ends_at: Option<DateTime<Utc>>,
    /// The instant this event replaces; only kept for rescheduled events.
    pub previous_occurs_at: Option<DateTime<Utc>>,
}

/// When an event happens: once, or on a recurrence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Schedule {
    OneOff(OneOff),
    Recurring(RecurrenceDefinition),
}

impl Schedule {
    /// Build a schedule from loosely-typed parts.
    ///
    /// A recurrence wins over `occurs_at` when both are present. Returns `None`
    /// when neither is, since such a definition cannot produce an instance.
    /// `previous_occurs_at` is dropped unless `status` is rescheduled.
    pub fn from_parts(
        status: EventStatus,
        occurs_at: Option<DateTime<Utc>>,
        ends_at: Option<DateTime<Utc>>,
        previous_occurs_at: Option<DateTime<Utc>>,
        recurrence: Option<RecurrenceDefinition>,
    ) -> Option<Self> {
        if let Some(recurrence) = recurrence {
            return Some(Schedule::Recurring(recurrence));
        }
        let occurs_at = occurs_at?;
        Some(Schedule::OneOff(OneOff {
            occurs_at,
            ends_at,
            previous_occurs_at: previous_occurs_at.filter(|_| status == EventStatus::Rescheduled),
        }))
    }
}

/// An event as supplied by the caller: descriptive metadata plus a schedule.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(try_from = "RawEventDefinition")]
pub struct EventDefinition {
    pub name: String,
    pub description: Option<String>,
    pub category: Option<String>,
    pub languages: Vec<String>,
    pub performers: Vec<String>,
    pub location: Option<Location>,
    pub status: EventStatus,
    pub schedule: Schedule,
}

impl EventDefinition {
    pub fn new(name: impl Into<String>, schedule: Schedule) -> Self {
        Self {
            name: name.into(),
            description: None,
            category: None,
            languages: Vec::new(),
            performers: Vec::new(),
            location: None,
            status: EventStatus::Scheduled,
            schedule,
        }
    }

    pub fn recurring(name: impl Into<String>, recurrence: RecurrenceDefinition) -> Self {
        Self::new(name, Schedule::Recurring(recurrence))
    }

    pub fn one_off(name: impl Into<String>, occurs_at: DateTime<Utc>) -> Self {
        Self::new(
            name,
            Schedule::OneOff(OneOff {
                occurs_at,
                ends_at: None,
                previous_occurs_at: None,
            }),
        )
    }

    pub fn with_status(mut self, status: EventStatus) -> Self {
        self.status = status;
        self
    }

    pub fn with_category(mut self, category: &str) -> Self {
        self.category = Some(category.to_string());
        self
    }

    pub fn with_languages(mut self, languages: &[&str]) -> Self {
        self.languages = languages.iter().map(|l| l.to_string()).collect();
        self
    }

    pub fn with_location(mut self, location: Location) -> Self {
        self.location = Some(location);
        self
    }

    /// Marks a one-off event as rescheduled from `previous`.
    ///
    /// Has no effect on recurring definitions, which never carry a previous instant.
    pub fn rescheduled_from(mut self, previous: DateTime<Utc>) -> Self {
        if let Schedule::OneOff(one_off) = &mut self.schedule {
            one_off.previous_occurs_at = Some(previous);
            self.status = EventStatus::Rescheduled;
        }
        self
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawEventDefinition {
    name: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    category: Option<String>,
    #[serde(default)]
    languages: Vec<String>,
    #[serde(default)]
    performers: Vec<String>,
    #[serde(default)]
    location: Option<Location>,
    #[serde(default)]
    status: EventStatus,
    #[serde(default)]
    occurs_at: Option<DateTime<Utc>>,
    #[serde(default)]
    ends_at: Option<DateTime<Utc>>,
    #[serde(default)]
    previous_occurs_at: Option<DateTime<Utc>>,
    #[serde(default)]
    recurrence: Option<RecurrenceDefinition>,
}

impl TryFrom<RawEventDefinition> for EventDefinition {
    type Error = ScheduleError;

    fn try_from(raw: RawEventDefinition) -> Result<Self> {
        let schedule = Schedule::from_parts(
            raw.status,
            raw.occurs_at,
            raw.ends_at,
            raw.previous_occurs_at,
            raw.recurrence,
        )
        .ok_or_else(|| ScheduleError::MissingSchedule(raw.name.clone()))?;

        Ok(Self {
            name: raw.name,
            description: raw.description,
            category: raw.category,
            languages: raw.languages,
            performers: raw.performers,
            location: raw.location,
            status: raw.status,
            schedule,
        })
    }
}

/// One concrete occurrence produced by resolution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedInstance {
    pub starts_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ends_at: Option<DateTime<Utc>>,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub languages: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub performers: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<Location>,
    pub status: EventStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub previous_occurs_at: Option<DateTime<Utc>>,
}

impl ResolvedInstance {
    pub(crate) fn from_definition(
        definition: &EventDefinition,
        starts_at: DateTime<Utc>,
        ends_at: Option<DateTime<Utc>>,
        previous_occurs_at: Option<DateTime<Utc>>,
    ) -> Self {
        Self {
            starts_at,
            ends_at,
            name: definition.name.clone(),
            description: definition.description.clone(),
            category: definition.category.clone(),
            languages: definition.languages.clone(),
            performers: definition.performers.clone(),
            location: definition.location.clone(),
            status: definition.status,
            previous_occurs_at,
        }
    }

    /// UTC calendar day of `starts_at`.
    pub fn day(&self) -> NaiveDate {
        self.starts_at.date_naive()
    }

    /// Location identifier used for override matching; empty when absent.
    pub fn location_key(&self) -> &str {
        self.location.as_ref().map_or("", |l| l.id.as_str())
    }
}
