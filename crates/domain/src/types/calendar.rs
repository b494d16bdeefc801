//! Raw calendar events as fetched from the external provider

use serde::{Deserialize, Serialize};

/// Start or end of a provider event.
///
/// Timed events carry `date_time` (RFC 3339); all-day events carry only a
/// `date` (`YYYY-MM-DD`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventTime {
    pub date_time: Option<String>,
    pub date: Option<String>,
}

impl EventTime {
    /// Timed boundary.
    pub fn at(date_time: impl Into<String>) -> Self {
        Self { date_time: Some(date_time.into()), date: None }
    }

    /// Date-only (all-day) boundary.
    pub fn on(date: impl Into<String>) -> Self {
        Self { date_time: None, date: Some(date.into()) }
    }

    pub fn is_all_day(&self) -> bool {
        self.date_time.is_none() && self.date.is_some()
    }
}

/// Calendar event from the provider API (before normalization)
///
/// Ephemeral: fetched per sync call and never persisted by the engine.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawCalendarEvent {
    pub id: String,
    pub title: Option<String>,
    pub start: EventTime,
    pub end: EventTime,
    pub status: Option<String>,
    pub transparency: Option<String>,
}
