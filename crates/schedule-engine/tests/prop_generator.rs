//! Property-based tests for occurrence generation and resolution using proptest.
//!
//! These check invariants that hold for any recurrence, not just the worked
//! examples in `generator_tests.rs`.

use std::collections::BTreeSet;

use chrono::{DateTime, Datelike, Duration, NaiveDate, TimeZone, Utc};
use proptest::prelude::*;
use schedule_engine::{
    generate, resolve, EventDefinition, EventStatus, FilterCriteria, Location,
    RecurrenceDefinition, RepeatPeriod, ResolutionWindow,
};

// ---------------------------------------------------------------------------
// Strategies
// ---------------------------------------------------------------------------

fn arb_weekdays() -> impl Strategy<Value = BTreeSet<u8>> {
    prop::collection::btree_set(0u8..7, 1..=3)
}

fn arb_repeat_weeks() -> impl Strategy<Value = u32> {
    1u32..=4
}

/// Daytime start so the single-correction conversion never crosses a date line.
fn arb_start_time() -> impl Strategy<Value = String> {
    (10u32..=16, 0u32..=59).prop_map(|(h, m)| format!("{:02}:{:02}", h, m))
}

fn arb_timezone() -> impl Strategy<Value = Option<String>> {
    prop_oneof![
        Just(None),
        Just(Some("UTC".to_string())),
        Just(Some("Europe/London".to_string())),
        Just(Some("Europe/Berlin".to_string())),
        Just(Some("Africa/Nairobi".to_string())),
    ]
}

/// A window start in 2025–2026 and a length of 1–120 days.
fn arb_window() -> impl Strategy<Value = ResolutionWindow> {
    (0i64..730, 1i64..=120).prop_map(|(offset, len)| {
        let from = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap() + Duration::days(offset);
        ResolutionWindow::new(from, from + Duration::days(len))
    })
}

/// Like [`arb_window`] but with edges at arbitrary minutes of the day.
fn arb_partial_day_window() -> impl Strategy<Value = ResolutionWindow> {
    (0i64..730, 0i64..1440, 1i64..=120 * 1440).prop_map(|(offset, minute, len)| {
        let from = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap()
            + Duration::days(offset)
            + Duration::minutes(minute);
        ResolutionWindow::new(from, from + Duration::minutes(len))
    })
}

fn arb_except_dates() -> impl Strategy<Value = BTreeSet<NaiveDate>> {
    prop::collection::btree_set(0i64..850, 0..20).prop_map(|offsets| {
        let base = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
        offsets
            .into_iter()
            .map(|o| base + Duration::days(o))
            .collect()
    })
}

fn arb_recurrence() -> impl Strategy<Value = RecurrenceDefinition> {
    (
        arb_weekdays(),
        arb_repeat_weeks(),
        arb_start_time(),
        arb_timezone(),
        arb_except_dates(),
    )
        .prop_map(|(days, weeks, start, tz, except)| RecurrenceDefinition {
            days_of_week: days,
            start_time: Some(start),
            repeat_period: RepeatPeriod::weeks(weeks),
            time_zone: tz,
            except_dates: except,
            ..RecurrenceDefinition::default()
        })
}

fn local_date(instant: DateTime<Utc>, tz: Option<&str>) -> NaiveDate {
    match tz.and_then(|name| name.parse::<chrono_tz::Tz>().ok()) {
        Some(zone) => instant.with_timezone(&zone).date_naive(),
        None => instant.date_naive(),
    }
}

fn config() -> ProptestConfig {
    ProptestConfig {
        cases: 256,
        ..ProptestConfig::default()
    }
}

// ---------------------------------------------------------------------------
// Property 1: Every instant falls on a requested weekday (local calendar)
// ---------------------------------------------------------------------------
proptest! {
    #![proptest_config(config())]

    #[test]
    fn instants_fall_on_requested_weekdays(
        recurrence in arb_recurrence(),
        window in arb_window(),
    ) {
        for instant in generate(&recurrence, &window) {
            let day = local_date(instant, recurrence.time_zone.as_deref());
            let index = day.weekday().num_days_from_sunday() as u8;
            prop_assert!(
                recurrence.days_of_week.contains(&index),
                "{:?} (local {}) is not one of {:?}",
                instant,
                day,
                recurrence.days_of_week
            );
        }
    }
}

// ---------------------------------------------------------------------------
// Property 2: No instant on an exception date
// ---------------------------------------------------------------------------
proptest! {
    #![proptest_config(config())]

    #[test]
    fn except_dates_never_generated(
        recurrence in arb_recurrence(),
        window in arb_window(),
    ) {
        for instant in generate(&recurrence, &window) {
            let day = local_date(instant, recurrence.time_zone.as_deref());
            prop_assert!(
                !recurrence.except_dates.contains(&day),
                "{:?} generated on excepted date {}",
                instant,
                day
            );
        }
    }
}

// ---------------------------------------------------------------------------
// Property 3: A season that ended before the window yields nothing
// ---------------------------------------------------------------------------
proptest! {
    #![proptest_config(config())]

    #[test]
    fn stale_season_is_empty(
        recurrence in arb_recurrence(),
        window in arb_window(),
        days_before in 1i64..400,
    ) {
        let until = (window.from - Duration::days(days_before)).date_naive();
        let stale = RecurrenceDefinition {
            valid_until: Some(until),
            ..recurrence
        };
        prop_assert!(generate(&stale, &window).is_empty());
    }
}

// ---------------------------------------------------------------------------
// Property 4: Output is strictly increasing and within the limit
// ---------------------------------------------------------------------------
proptest! {
    #![proptest_config(config())]

    #[test]
    fn output_sorted_and_capped(
        recurrence in arb_recurrence(),
        window in arb_window(),
        limit in 0usize..40,
    ) {
        let capped = window.with_limit(limit);
        let instants = generate(&recurrence, &capped);
        prop_assert!(instants.len() <= limit);
        for pair in instants.windows(2) {
            prop_assert!(pair[0] < pair[1], "not increasing: {:?}", pair);
        }
    }
}

// ---------------------------------------------------------------------------
// Property 5: Multi-week cycles only fire in weeks aligned with the anchor
// ---------------------------------------------------------------------------
proptest! {
    #![proptest_config(config())]

    #[test]
    fn multi_week_cycle_respects_anchor(
        weeks in 2u32..=4,
        anchor_offset in 0i64..60,
        window in arb_window(),
    ) {
        let anchor = NaiveDate::from_ymd_opt(2024, 12, 1).unwrap() + Duration::days(anchor_offset);
        let recurrence = RecurrenceDefinition {
            days_of_week: (0u8..7).collect(),
            repeat_period: RepeatPeriod::weeks(weeks),
            valid_from: Some(anchor),
            ..RecurrenceDefinition::default()
        };

        for instant in generate(&recurrence, &window) {
            let offset_weeks = instant.date_naive().signed_duration_since(anchor).num_days() / 7;
            prop_assert_eq!(offset_weeks % i64::from(weeks), 0);
        }
    }
}

// ---------------------------------------------------------------------------
// Property 6: Resolution is idempotent and sorted
// ---------------------------------------------------------------------------
proptest! {
    #![proptest_config(config())]

    #[test]
    fn resolution_is_idempotent(
        recurrence in arb_recurrence(),
        window in arb_window(),
        cancel_day in 0i64..120,
    ) {
        let cancelled_at = window.from + Duration::days(cancel_day);
        let definitions = vec![
            EventDefinition::recurring("Service", recurrence).with_location(Location::new("L")),
            EventDefinition::one_off("Service", cancelled_at)
                .with_status(EventStatus::Cancelled)
                .with_location(Location::new("L")),
        ];
        let criteria = FilterCriteria::default();

        let first = resolve(&definitions, &window, &criteria);
        let second = resolve(&definitions, &window, &criteria);
        prop_assert_eq!(&first, &second);
        for pair in first.windows(2) {
            prop_assert!(pair[0].starts_at <= pair[1].starts_at);
        }
    }
}

// ---------------------------------------------------------------------------
// Property 7: Every instant lies inside the window, whatever its edges
// ---------------------------------------------------------------------------
proptest! {
    #![proptest_config(config())]

    #[test]
    fn instants_stay_inside_window(
        recurrence in arb_recurrence(),
        window in arb_partial_day_window(),
    ) {
        for instant in generate(&recurrence, &window) {
            prop_assert!(
                window.contains(instant),
                "{:?} outside [{:?}, {:?}]",
                instant,
                window.from,
                window.to
            );
        }
    }
}

// ---------------------------------------------------------------------------
// Property 8: An overridden (day, location) pair keeps exactly one instance
// ---------------------------------------------------------------------------
proptest! {
    #![proptest_config(config())]

    #[test]
    fn overridden_day_has_single_instance(
        first in arb_recurrence(),
        second in arb_recurrence(),
        window in arb_window(),
        cancel_day in 0i64..120,
    ) {
        let cancelled_at = window.from + Duration::days(cancel_day) + Duration::hours(12);
        let definitions = vec![
            EventDefinition::recurring("First", first).with_location(Location::new("L")),
            EventDefinition::recurring("Second", second).with_location(Location::new("L")),
            EventDefinition::one_off("First", cancelled_at)
                .with_status(EventStatus::Cancelled)
                .with_location(Location::new("L")),
        ];

        let result = resolve(&definitions, &window, &FilterCriteria::default());
        if window.contains(cancelled_at) {
            let on_day = result
                .iter()
                .filter(|i| i.day() == cancelled_at.date_naive())
                .count();
            prop_assert_eq!(on_day, 1);
        }
    }
}
