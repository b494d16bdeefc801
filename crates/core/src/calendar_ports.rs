//! Calendar provider port interface
//!
//! The engine talks to the external calendar (Google Calendar or compatible)
//! only through this trait.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rallypoint_domain::{RawCalendarEvent, Result, TokenRefresh};

/// Trait for calendar provider operations
#[async_trait]
pub trait CalendarProvider: Send + Sync {
    /// List single (expanded) event instances in `[time_min, time_max]`,
    /// ordered by start time and capped at `max_results`.
    ///
    /// Exactly one provider request; no pagination.
    async fn list_events(
        &self,
        access_token: &str,
        time_min: DateTime<Utc>,
        time_max: DateTime<Utc>,
        max_results: u32,
    ) -> Result<Vec<RawCalendarEvent>>;

    /// Exchange a refresh token for a new access token.
    async fn refresh_token(&self, access_token: &str, refresh_token: &str)
        -> Result<TokenRefresh>;
}
