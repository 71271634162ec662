//! Resolution windows.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Default cap on instances generated per recurring definition.
pub const DEFAULT_LIMIT: usize = 500;

fn default_limit() -> usize {
    DEFAULT_LIMIT
}

/// The instant range occurrences are requested for, inclusive at both ends.
///
/// `limit` bounds the work done for any single recurring definition, which
/// matters for definitions with no `validUntil` and a short period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolutionWindow {
    pub from: DateTime<Utc>,
    pub to: DateTime<Utc>,
    #[serde(default = "default_limit")]
    pub limit: usize,
}

impl ResolutionWindow {
    /// Window from `from` to `to`, both inclusive, with the default cap of
    /// [`DEFAULT_LIMIT`] instances per recurring definition.
    pub fn new(from: DateTime<Utc>, to: DateTime<Utc>) -> Self {
        Self {
            from,
            to,
            limit: DEFAULT_LIMIT,
        }
    }

    /// Replace the per-definition instance cap.
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    /// True when `instant` lies in `[from, to]`.
    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        self.from <= instant && instant <= self.to
    }
}
