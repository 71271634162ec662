//! Tests for repeat period parsing and arithmetic.

use chrono::NaiveDate;
use schedule_engine::{parse_period, RepeatPeriod};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

// ---------------------------------------------------------------------------
// Parsing
// ---------------------------------------------------------------------------

#[test]
fn parses_single_components() {
    assert_eq!(parse_period("P1W"), RepeatPeriod::weeks(1));
    assert_eq!(parse_period("P2W"), RepeatPeriod::weeks(2));
    assert_eq!(parse_period("P10D"), RepeatPeriod::days(10));
    assert_eq!(
        parse_period("P1M"),
        RepeatPeriod {
            months: Some(1),
            ..RepeatPeriod::default()
        }
    );
}

#[test]
fn parses_all_components_in_order() {
    let period = parse_period("P1Y2M3W4D");
    assert_eq!(period.years, Some(1));
    assert_eq!(period.months, Some(2));
    assert_eq!(period.weeks, Some(3));
    assert_eq!(period.days, Some(4));
}

#[test]
fn bare_p_is_an_empty_period_not_a_fallback() {
    let period = parse_period("P");
    assert_eq!(period, RepeatPeriod::default());
    assert!(period.is_zero());
}

#[test]
fn unparseable_input_falls_back_to_one_week() {
    for input in ["", "weekly", "1W", "P1H", "PT1H", "P1W2Y", "P3", "PW", "P1W1W", "P-1W"] {
        assert_eq!(
            parse_period(input),
            RepeatPeriod::WEEKLY,
            "input {:?} should fall back to one week",
            input
        );
    }
}

#[test]
fn strict_parse_reports_invalid_duration() {
    let err = "P1H".parse::<RepeatPeriod>().unwrap_err();
    assert_eq!(err.to_string(), "Invalid duration: P1H");
}

#[test]
fn display_renders_iso_form() {
    assert_eq!(parse_period("P1Y2M3W4D").to_string(), "P1Y2M3W4D");
    assert_eq!(RepeatPeriod::weeks(2).to_string(), "P2W");
    assert_eq!(RepeatPeriod::default().to_string(), "P0D");
}

// ---------------------------------------------------------------------------
// Cycle length and zero detection
// ---------------------------------------------------------------------------

#[test]
fn repeat_weeks_defaults_to_one() {
    assert_eq!(RepeatPeriod::weeks(3).repeat_weeks(), 3);
    assert_eq!(RepeatPeriod::days(10).repeat_weeks(), 1);
    assert_eq!(RepeatPeriod::weeks(0).repeat_weeks(), 1);
}

#[test]
fn zero_components_count_as_zero() {
    assert!(parse_period("P0W").is_zero());
    assert!(parse_period("P0Y0M0W0D").is_zero());
    assert!(!parse_period("P0W1D").is_zero());
}

// ---------------------------------------------------------------------------
// Advancing dates
// ---------------------------------------------------------------------------

#[test]
fn advance_by_weeks_and_days() {
    assert_eq!(RepeatPeriod::weeks(2).advance(date(2025, 3, 2)), Some(date(2025, 3, 16)));
    assert_eq!(parse_period("P1W3D").advance(date(2025, 3, 2)), Some(date(2025, 3, 12)));
}

#[test]
fn advance_by_months_clamps_to_month_end() {
    let monthly = parse_period("P1M");
    assert_eq!(monthly.advance(date(2025, 1, 31)), Some(date(2025, 2, 28)));
    assert_eq!(monthly.advance(date(2024, 1, 31)), Some(date(2024, 2, 29)));
}

#[test]
fn advance_applies_months_before_days() {
    // Jan 31 + 1 month = Feb 28, then + 1 day = Mar 1.
    assert_eq!(parse_period("P1M1D").advance(date(2025, 1, 31)), Some(date(2025, 3, 1)));
}

#[test]
fn advance_by_years() {
    assert_eq!(parse_period("P1Y").advance(date(2024, 2, 29)), Some(date(2025, 2, 28)));
}
