//! Repeat periods -- the date-only subset of ISO-8601 durations.
//!
//! Accepts `P[nY][nM][nW][nD]`. Designators must appear in that order and at
//! most once; there is no time component. Upstream data is frequently sloppy,
//! so [`parse_period`] never fails: anything it cannot read becomes one week.

use std::fmt;
use std::str::FromStr;

use chrono::{Days, Months, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{Result, ScheduleError};

/// A structured calendar period. Absent components count as zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct RepeatPeriod {
    pub years: Option<u32>,
    pub months: Option<u32>,
    pub weeks: Option<u32>,
    pub days: Option<u32>,
}

impl RepeatPeriod {
    /// Exactly one week -- the fallback for unreadable input.
    pub const WEEKLY: RepeatPeriod = RepeatPeriod {
        years: None,
        months: None,
        weeks: Some(1),
        days: None,
    };

    pub fn weeks(n: u32) -> Self {
        Self {
            weeks: Some(n),
            ..Self::default()
        }
    }

    pub fn days(n: u32) -> Self {
        Self {
            days: Some(n),
            ..Self::default()
        }
    }

    /// True when no component is non-zero. Such a period never advances.
    pub fn is_zero(&self) -> bool {
        [self.years, self.months, self.weeks, self.days]
            .iter()
            .all(|c| c.unwrap_or(0) == 0)
    }

    /// Cycle length in weeks for day-of-week recurrences.
    ///
    /// Periods without a week component (or with `0W`) cycle every week.
    pub fn repeat_weeks(&self) -> u32 {
        match self.weeks {
            Some(w) if w > 0 => w,
            _ => 1,
        }
    }

    /// Advance a calendar date by one period.
    ///
    /// Years and months are applied first (clamped to the end of the target
    /// month, so Jan 31 + P1M is the last day of February), then weeks and days.
    /// Returns `None` on overflow past chrono's representable range.
    pub fn advance(&self, date: NaiveDate) -> Option<NaiveDate> {
        let months = u64::from(self.years.unwrap_or(0)) * 12 + u64::from(self.months.unwrap_or(0));
        let days = u64::from(self.weeks.unwrap_or(0)) * 7 + u64::from(self.days.unwrap_or(0));

        let shifted = if months > 0 {
            date.checked_add_months(Months::new(u32::try_from(months).ok()?))?
        } else {
            date
        };
        shifted.checked_add_days(Days::new(days))
    }
}

/// Parse a repeat period, falling back to [`RepeatPeriod::WEEKLY`] on bad input.
pub fn parse_period(input: &str) -> RepeatPeriod {
    match input.parse::<RepeatPeriod>() {
        Ok(period) => period,
        Err(err) => {
            tracing::debug!(input, error = %err, "unreadable repeat period, using one week");
            RepeatPeriod::WEEKLY
        }
    }
}

impl FromStr for RepeatPeriod {
    type Err = ScheduleError;

    /// Strict parse. `"P"` alone is accepted and yields an all-empty period,
    /// which callers treat as inert rather than as an error.
    fn from_str(s: &str) -> Result<Self> {
        let invalid = || ScheduleError::InvalidDuration(s.to_string());

        let body = s.trim().strip_prefix('P').ok_or_else(invalid)?;
        let mut period = RepeatPeriod::default();
        // Index into DESIGNATORS of the last component read; enforces ordering.
        let mut next_slot = 0usize;
        let mut digits = String::new();

        for ch in body.chars() {
            if ch.is_ascii_digit() {
                digits.push(ch);
                continue;
            }
            let slot = DESIGNATORS
                .iter()
                .position(|&d| d == ch)
                .ok_or_else(invalid)?;
            if slot < next_slot || digits.is_empty() {
                return Err(invalid());
            }
            let value: u32 = digits.parse().map_err(|_| invalid())?;
            digits.clear();
            match ch {
                'Y' => period.years = Some(value),
                'M' => period.months = Some(value),
                'W' => period.weeks = Some(value),
                _ => period.days = Some(value),
            }
            next_slot = slot + 1;
        }

        // Trailing digits with no designator ("P3").
        if !digits.is_empty() {
            return Err(invalid());
        }
        Ok(period)
    }
}

const DESIGNATORS: [char; 4] = ['Y', 'M', 'W', 'D'];

impl fmt::Display for RepeatPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("P")?;
        let parts = [self.years, self.months, self.weeks, self.days];
        let mut wrote = false;
        for (value, designator) in parts.iter().zip(DESIGNATORS) {
            if let Some(v) = value {
                write!(f, "{}{}", v, designator)?;
                wrote = true;
            }
        }
        if !wrote {
            f.write_str("0D")?;
        }
        Ok(())
    }
}

impl Serialize for RepeatPeriod {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for RepeatPeriod {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(parse_period(&raw))
    }
}
