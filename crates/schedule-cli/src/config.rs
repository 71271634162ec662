//! Configuration for the `schedule` CLI.
//!
//! A JSON file supplies default window bounds and filter criteria; command
//! line flags override whatever it sets.
//!
//! ```json
//! {
//!   "window": { "from": "2025-03-01", "to": "2025-03-31", "limit": 200 },
//!   "criteria": { "languages": ["en"], "includeLanguageUnset": true }
//! }
//! ```

use std::path::Path;

use anyhow::{bail, Context, Result};
use chrono::{DateTime, NaiveDate, Utc};
use schedule_engine::{FilterCriteria, ResolutionWindow, DEFAULT_LIMIT};
use serde::Deserialize;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Config {
    pub window: WindowConfig,
    pub criteria: FilterCriteria,
}

/// Window bounds as written by a human: RFC 3339 instants or plain dates.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub from: Option<String>,
    pub to: Option<String>,
    pub limit: Option<usize>,
}

/// Window and filter overrides taken from the command line.
#[derive(Debug, Default)]
pub struct Overrides {
    pub from: Option<String>,
    pub to: Option<String>,
    pub limit: Option<usize>,
    pub categories: Vec<String>,
    pub languages: Vec<String>,
    pub include_uncategorized: bool,
    pub include_language_unset: bool,
}

/// Load the config file, or the empty default when no path is given.
pub fn load_config(path: Option<&Path>) -> Result<Config> {
    let Some(path) = path else {
        return Ok(Config::default());
    };
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;
    let config: Config = serde_json::from_str(&raw)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
    tracing::debug!(path = %path.display(), ?config, "loaded config");
    Ok(config)
}

impl Config {
    /// Resolution window from flags, falling back to the config file.
    pub fn window(&self, overrides: &Overrides) -> Result<ResolutionWindow> {
        let from = overrides.from.as_deref().or(self.window.from.as_deref());
        let to = overrides.to.as_deref().or(self.window.to.as_deref());

        let Some(from) = from else {
            bail!("Missing window start: pass --from or set window.from in the config file");
        };
        let Some(to) = to else {
            bail!("Missing window end: pass --to or set window.to in the config file");
        };

        let limit = overrides
            .limit
            .or(self.window.limit)
            .unwrap_or(DEFAULT_LIMIT);

        Ok(ResolutionWindow::new(parse_bound(from, false)?, parse_bound(to, true)?).with_limit(limit))
    }

    /// Filter criteria with flag values layered over the config file.
    ///
    /// Tag lists given on the command line replace the file's lists; the
    /// include flags can only be switched on.
    pub fn criteria(&self, overrides: &Overrides) -> FilterCriteria {
        let mut criteria = self.criteria.clone();
        if !overrides.categories.is_empty() {
            criteria.categories = overrides.categories.iter().cloned().collect();
        }
        if !overrides.languages.is_empty() {
            criteria.languages = overrides.languages.iter().cloned().collect();
        }
        criteria.include_uncategorized |= overrides.include_uncategorized;
        criteria.include_language_unset |= overrides.include_language_unset;
        criteria
    }
}

/// Parse a window bound: an RFC 3339 instant, or a `YYYY-MM-DD` date taken as
/// the start of that UTC day (or its last second when `end_of_day`).
pub fn parse_bound(input: &str, end_of_day: bool) -> Result<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(input) {
        return Ok(dt.with_timezone(&Utc));
    }
    let date = NaiveDate::parse_from_str(input, "%Y-%m-%d")
        .with_context(|| format!("Invalid window bound '{}': expected RFC 3339 or YYYY-MM-DD", input))?;
    let (h, m, s) = if end_of_day { (23, 59, 59) } else { (0, 0, 0) };
    date.and_hms_opt(h, m, s)
        .map(|naive| naive.and_utc())
        .with_context(|| format!("Invalid window bound '{}'", input))
}
