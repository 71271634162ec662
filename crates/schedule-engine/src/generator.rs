//! Occurrence generation -- recurrence definition + window → concrete instants.
//!
//! Walking is day-granular on the UTC calendar so the walk itself never hits
//! local-time ambiguity; only the final wall-clock → instant step consults the
//! timezone database (see [`crate::local_time`]).

use chrono::{DateTime, Datelike, NaiveDate, NaiveTime, Utc};

use crate::local_time::{lookup_zone, parse_wall_clock, resolve_in_zone};
use crate::recurrence::RecurrenceDefinition;
use crate::window::ResolutionWindow;

/// A generated occurrence: the calendar date it was generated for and the
/// resolved start instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Occurrence {
    pub date: NaiveDate,
    pub starts_at: DateTime<Utc>,
}

/// Expand a recurrence into the ordered start instants inside `window`.
///
/// # Arguments
///
/// * `recurrence` - The repeating pattern to expand.
/// * `window` - Inclusive instant range and per-definition cap.
///
/// # Returns
///
/// At most `window.limit` instants, each within `[window.from, window.to]`.
/// Inert definitions, empty effective bounds and malformed start times all
/// produce an empty list.
pub fn generate(recurrence: &RecurrenceDefinition, window: &ResolutionWindow) -> Vec<DateTime<Utc>> {
    generate_occurrences(recurrence, window)
        .into_iter()
        .map(|o| o.starts_at)
        .collect()
}

/// Like [`generate`], keeping the calendar date each instant was resolved on.
pub fn generate_occurrences(
    recurrence: &RecurrenceDefinition,
    window: &ResolutionWindow,
) -> Vec<Occurrence> {
    if window.limit == 0 || recurrence.is_inert() {
        return Vec::new();
    }

    // Date-only recurrences sit at UTC midnight regardless of zone.
    let (start_time, zone) = match recurrence.start_time.as_deref().map(parse_wall_clock) {
        None => (NaiveTime::MIN, None),
        Some(Ok(time)) => (time, lookup_zone(recurrence.time_zone.as_deref())),
        Some(Err(err)) => {
            tracing::warn!(error = %err, "recurrence has an unreadable start time, skipping");
            return Vec::new();
        }
    };

    let Some((first, last)) = effective_days(recurrence, window) else {
        return Vec::new();
    };

    let dates: Box<dyn Iterator<Item = NaiveDate> + '_> = if recurrence.days_of_week.is_empty() {
        Box::new(interval_dates(recurrence, first, last))
    } else {
        Box::new(weekday_dates(recurrence, first, last))
    };

    // The walk covers whole days; instants on the edge days can still fall
    // outside the window and are dropped before the cap applies.
    let occurrences: Vec<Occurrence> = dates
        .map(|date| Occurrence {
            date,
            starts_at: resolve_in_zone(date, start_time, zone),
        })
        .filter(|occurrence| window.contains(occurrence.starts_at))
        .take(window.limit)
        .collect();

    tracing::trace!(
        count = occurrences.len(),
        first = %first,
        last = %last,
        "generated recurrence dates"
    );
    occurrences
}

/// First and last UTC calendar day of the window intersected with the
/// recurrence's season. `None` when the intersection is empty.
///
/// Season bounds are whole dates: `valid_from` and `valid_until` are both
/// inclusive, whatever the time of day of the window edges.
fn effective_days(
    recurrence: &RecurrenceDefinition,
    window: &ResolutionWindow,
) -> Option<(NaiveDate, NaiveDate)> {
    if window.from > window.to {
        return None;
    }
    let first = match recurrence.valid_from {
        Some(from) => from.max(window.from.date_naive()),
        None => window.from.date_naive(),
    };
    let last = match recurrence.valid_until {
        Some(until) => until.min(window.to.date_naive()),
        None => window.to.date_naive(),
    };

    (first <= last).then_some((first, last))
}

/// Day-of-week mode: every listed weekday in every `repeat_weeks`-th week,
/// counting whole weeks from `valid_from` (or the first walked day).
fn weekday_dates(
    recurrence: &RecurrenceDefinition,
    first: NaiveDate,
    last: NaiveDate,
) -> impl Iterator<Item = NaiveDate> + '_ {
    let anchor = recurrence.valid_from.unwrap_or(first);
    let repeat_weeks = i64::from(recurrence.repeat_period.repeat_weeks());

    first
        .iter_days()
        .take_while(move |day| *day <= last)
        .filter(move |day| {
            let weekday = u8::try_from(day.weekday().num_days_from_sunday()).unwrap_or(u8::MAX);
            recurrence.days_of_week.contains(&weekday)
        })
        .filter(move |day| {
            let offset_weeks = day.signed_duration_since(anchor).num_days().div_euclid(7);
            offset_weeks.rem_euclid(repeat_weeks) == 0
        })
        .filter(move |day| !recurrence.except_dates.contains(day))
}

/// Fixed-interval mode: `first`, `first + period`, ... through `last`.
fn interval_dates(
    recurrence: &RecurrenceDefinition,
    first: NaiveDate,
    last: NaiveDate,
) -> impl Iterator<Item = NaiveDate> + '_ {
    let period = recurrence.repeat_period;
    std::iter::successors(Some(first), move |cursor| {
        period.advance(*cursor).filter(|next| next > cursor)
    })
    .take_while(move |cursor| *cursor <= last)
    .filter(move |cursor| !recurrence.except_dates.contains(cursor))
}
