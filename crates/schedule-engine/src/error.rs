//! Error types for schedule-engine parse boundaries.
//!
//! Resolution itself never fails: malformed periods, unknown zones and
//! degenerate recurrences are absorbed into "fewer instances". These errors
//! surface only when converting loose input (strings, optional fields) into
//! the typed model.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScheduleError {
    #[error("Invalid duration: {0}")]
    InvalidDuration(String),

    #[error("Invalid wall-clock time: {0}")]
    InvalidTime(String),

    #[error("Invalid event status: {0}")]
    InvalidStatus(String),

    #[error("Invalid weekday: {0}")]
    InvalidWeekday(String),

    /// Neither a recurrence nor a one-off instant was supplied.
    #[error("Event definition has no schedule: {0}")]
    MissingSchedule(String),
}

pub type Result<T> = std::result::Result<T, ScheduleError>;
