//! # schedule-engine
//!
//! Resolves recurring event definitions into concrete, timezone-correct
//! occurrences for an arbitrary time window.
//!
//! The engine expands weekday-based and fixed-interval recurrences, converts
//! local wall-clock times to UTC through `chrono-tz`, applies exception dates
//! and season bounds, filters definitions by category and language, and
//! reconciles one-off cancellations and reschedules against the generated
//! occurrences.
//!
//! Resolution is pure: no I/O, no shared state, and no failure mode beyond
//! producing fewer instances.
//!
//! ## Modules
//!
//! - [`period`]: `P[nY][nM][nW][nD]` repeat periods with a weekly fallback
//! - [`local_time`]: date + `HH:mm` + IANA zone → UTC instant
//! - [`generator`]: recurrence + window → ordered instants
//! - [`filter`]: category/language predicate
//! - [`resolver`]: full pipeline including override reconciliation
//! - [`event`], [`recurrence`], [`window`]: the data model
//! - [`vocab`]: static status, weekday and category identifiers
//! - [`error`]: Error types for parse boundaries

pub mod error;
pub mod event;
pub mod filter;
pub mod generator;
pub mod local_time;
pub mod period;
pub mod recurrence;
pub mod resolver;
pub mod vocab;
pub mod window;

pub use error::ScheduleError;
pub use event::{EventDefinition, EventStatus, Location, OneOff, ResolvedInstance, Schedule};
pub use filter::{matches, FilterCriteria};
pub use generator::{generate, generate_occurrences, Occurrence};
pub use local_time::{parse_wall_clock, resolve_local_time};
pub use period::{parse_period, RepeatPeriod};
pub use recurrence::RecurrenceDefinition;
pub use resolver::{resolve, resolve_primary_services};
pub use vocab::PRIMARY_SERVICE_CATEGORY;
pub use window::{ResolutionWindow, DEFAULT_LIMIT};
