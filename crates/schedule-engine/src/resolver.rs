//! Resolution -- definitions → filtered, expanded, reconciled instance list.
//!
//! Overrides (cancelled or rescheduled one-off events) supersede the scheduled
//! instances that share their UTC calendar day and location identifier, leaving
//! exactly one instance for that pair. The day is taken from `starts_at` in
//! UTC, so a non-UTC event close to local midnight can miss its counterpart.

use std::collections::BTreeMap;

use chrono::{Days, NaiveDate};

use crate::event::{EventDefinition, EventStatus, ResolvedInstance, Schedule};
use crate::filter::{self, FilterCriteria};
use crate::generator::generate_occurrences;
use crate::local_time::{lookup_zone, parse_wall_clock, resolve_in_zone};
use crate::recurrence::RecurrenceDefinition;
use crate::vocab::PRIMARY_SERVICE_CATEGORY;
use crate::window::ResolutionWindow;

/// Resolve `definitions` into concrete instances within `window`.
///
/// Definitions failing `criteria` are skipped before any expansion. The result
/// is sorted by `starts_at`; instances with equal start keep input order.
pub fn resolve(
    definitions: &[EventDefinition],
    window: &ResolutionWindow,
    criteria: &FilterCriteria,
) -> Vec<ResolvedInstance> {
    let mut emitted = Vec::new();
    let mut considered = 0usize;

    for definition in definitions {
        if !filter::matches(definition, criteria) {
            continue;
        }
        considered += 1;
        match &definition.schedule {
            Schedule::Recurring(recurrence) => {
                if recurrence.expired_before(window.from) {
                    tracing::trace!(name = %definition.name, "recurrence ended before window");
                    continue;
                }
                expand_recurring(definition, recurrence, window, &mut emitted);
            }
            Schedule::OneOff(one_off) => {
                if window.contains(one_off.occurs_at) {
                    emitted.push(ResolvedInstance::from_definition(
                        definition,
                        one_off.occurs_at,
                        one_off.ends_at,
                        one_off.previous_occurs_at,
                    ));
                }
            }
        }
    }

    let mut resolved = reconcile_overrides(emitted);
    resolved.sort_by_key(|instance| instance.starts_at);

    tracing::debug!(
        definitions = definitions.len(),
        considered,
        instances = resolved.len(),
        "resolved event definitions"
    );
    resolved
}

/// [`resolve`] restricted to the primary service category.
///
/// Most source data never tags its main service, so uncategorized definitions
/// are always included. Language filtering from `criteria` is kept as given.
pub fn resolve_primary_services(
    definitions: &[EventDefinition],
    window: &ResolutionWindow,
    criteria: &FilterCriteria,
) -> Vec<ResolvedInstance> {
    let criteria = FilterCriteria {
        categories: [PRIMARY_SERVICE_CATEGORY.to_string()].into_iter().collect(),
        include_uncategorized: true,
        ..criteria.clone()
    };
    resolve(definitions, window, &criteria)
}

fn expand_recurring(
    definition: &EventDefinition,
    recurrence: &RecurrenceDefinition,
    window: &ResolutionWindow,
    out: &mut Vec<ResolvedInstance>,
) {
    let end_time = match recurrence.end_time.as_deref().map(parse_wall_clock) {
        None => None,
        Some(Ok(time)) => Some(time),
        Some(Err(err)) => {
            tracing::debug!(name = %definition.name, error = %err, "ignoring unreadable end time");
            None
        }
    };
    let zone = lookup_zone(recurrence.time_zone.as_deref());

    for occurrence in generate_occurrences(recurrence, window) {
        let ends_at = end_time.map(|time| {
            let same_day = resolve_in_zone(occurrence.date, time, zone);
            if same_day > occurrence.starts_at {
                return same_day;
            }
            // Ends past midnight local time.
            occurrence
                .date
                .checked_add_days(Days::new(1))
                .map_or(same_day, |next| resolve_in_zone(next, time, zone))
        });
        out.push(ResolvedInstance::from_definition(
            definition,
            occurrence.starts_at,
            ends_at,
            None,
        ));
    }
}

/// (UTC day of `starts_at`, location id) pair that overrides match on.
type OverrideKey = (NaiveDate, String);

fn override_key(instance: &ResolvedInstance) -> OverrideKey {
    (instance.day(), instance.location_key().to_string())
}

/// Substitute overrides for the scheduled instances they supersede.
///
/// Every scheduled instance sharing an override's key collapses into that
/// override, which takes the place of the first of them. When several
/// overrides share a key the first one in input order wins. Overrides with no
/// matching scheduled instance are kept as standalone entries. Instances that
/// are neither scheduled nor overrides pass through unchanged.
fn reconcile_overrides(instances: Vec<ResolvedInstance>) -> Vec<ResolvedInstance> {
    let (overrides, rest): (Vec<_>, Vec<_>) = instances
        .into_iter()
        .partition(|instance| instance.status.is_override());

    let mut slots: Vec<Option<ResolvedInstance>> = Vec::with_capacity(overrides.len());
    let mut by_key: BTreeMap<OverrideKey, usize> = BTreeMap::new();
    for instance in overrides {
        let key = override_key(&instance);
        if by_key.contains_key(&key) {
            tracing::debug!(
                name = %instance.name,
                day = %key.0,
                location = %key.1,
                "dropping duplicate override"
            );
            continue;
        }
        by_key.insert(key, slots.len());
        slots.push(Some(instance));
    }

    let mut result = Vec::with_capacity(rest.len() + slots.len());
    for instance in rest {
        if instance.status != EventStatus::Scheduled {
            result.push(instance);
            continue;
        }
        let Some(&slot) = by_key.get(&override_key(&instance)) else {
            result.push(instance);
            continue;
        };
        tracing::trace!(
            name = %instance.name,
            day = %instance.day(),
            "scheduled instance superseded"
        );
        // Later instances on an already-substituted key are absorbed.
        if let Some(replacement) = slots[slot].take() {
            result.push(replacement);
        }
    }

    result.extend(slots.into_iter().flatten());
    result
}
