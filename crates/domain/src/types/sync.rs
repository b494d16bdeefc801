//! Sync request/response types exposed to the surrounding CRUD layer

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::interval::{BusyInterval, FreeInterval};
use crate::errors::SyncError;

/// Inclusive range of calendar days.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateRange {
    /// Build a range, rejecting `start > end`.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, SyncError> {
        if start > end {
            return Err(SyncError::InvalidRequest(format!(
                "start date {start} is after end date {end}"
            )));
        }
        Ok(Self { start, end })
    }

    /// Single-day range.
    pub fn day(date: NaiveDate) -> Self {
        Self { start: date, end: date }
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    /// Every day from `start` to `end`, inclusive.
    pub fn days(&self) -> impl Iterator<Item = NaiveDate> {
        let end = self.end;
        self.start.iter_days().take_while(move |day| *day <= end)
    }
}

/// Parameters of one `sync` invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncRequest {
    pub user_id: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[serde(default)]
    pub remove_conflicts: bool,
    #[serde(default)]
    pub group_id: Option<String>,
}

/// Result of a successful sync.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncOutcome {
    pub busy_times: Vec<BusyInterval>,
    pub free_times: Vec<FreeInterval>,
    pub conflicts_resolved: usize,
    /// Provider events dropped because they could not be parsed.
    pub skipped_events: usize,
}

/// Link state of a user's external calendar account.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkStatus {
    pub has_credential: bool,
    pub token_expired: bool,
    pub is_linked: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn days_are_inclusive_and_cross_month_boundaries() {
        let range = DateRange::new(date(2025, 1, 30), date(2025, 2, 2)).unwrap();
        let days: Vec<_> = range.days().collect();
        assert_eq!(days, vec![date(2025, 1, 30), date(2025, 1, 31), date(2025, 2, 1), date(2025, 2, 2)]);
    }

    #[test]
    fn reversed_range_is_rejected() {
        let err = DateRange::new(date(2025, 2, 2), date(2025, 2, 1)).unwrap_err();
        assert!(matches!(err, SyncError::InvalidRequest(_)));
    }

    #[test]
    fn sync_request_defaults_optional_fields() {
        let request: SyncRequest = serde_json::from_str(
            r#"{"userId":"u-1","startDate":"2025-03-10","endDate":"2025-03-12"}"#,
        )
        .unwrap();
        assert!(!request.remove_conflicts);
        assert_eq!(request.group_id, None);
    }
}
