//! Busy and free time intervals

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Time range during which the user is unavailable.
///
/// `start < end` always holds for intervals produced by the normalizer. The
/// same shape is used for merged output, where the set for one query is also
/// sorted by `start` and pairwise non-overlapping.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BusyInterval {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub label: String,
}

impl BusyInterval {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>, label: impl Into<String>) -> Self {
        Self { start, end, label: label.into() }
    }

    /// Strict open overlap with `[start, end)`; touching ranges do not overlap.
    pub fn overlaps(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> bool {
        start < self.end && end > self.start
    }
}

/// Time range inside one day's working-hour window not covered by busy time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FreeInterval {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl FreeInterval {
    pub fn duration(&self) -> Duration {
        self.end - self.start
    }

    pub fn duration_minutes(&self) -> i64 {
        self.duration().num_minutes()
    }
}
