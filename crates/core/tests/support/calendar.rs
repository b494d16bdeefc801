//! Calendar provider mock and raw event fixtures

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration as StdDuration;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use rallypoint_core::CalendarProvider;
use rallypoint_domain::{
    EventTime, RallypointError, RawCalendarEvent, Result as DomainResult, TokenRefresh,
};

/// Confirmed, opaque, timed event.
pub fn timed_event(id: &str, title: &str, start: DateTime<Utc>, end: DateTime<Utc>) -> RawCalendarEvent {
    RawCalendarEvent {
        id: id.to_string(),
        title: Some(title.to_string()),
        start: EventTime::at(start.to_rfc3339()),
        end: EventTime::at(end.to_rfc3339()),
        status: Some("confirmed".to_string()),
        transparency: None,
    }
}

/// Scripted calendar provider.
///
/// Returns a fixed event list, optionally after a delay, and issues refreshed
/// tokens valid for one hour after the configured issue time.
pub struct MockCalendarProvider {
    events: Vec<RawCalendarEvent>,
    list_error: Option<String>,
    refresh_error: Option<String>,
    delay: Option<StdDuration>,
    issued_at: DateTime<Utc>,
    pub list_calls: AtomicUsize,
    pub refresh_calls: AtomicUsize,
    pub tokens_seen: Mutex<Vec<String>>,
    pub windows_seen: Mutex<Vec<(DateTime<Utc>, DateTime<Utc>)>>,
}

impl MockCalendarProvider {
    pub fn with_events(events: Vec<RawCalendarEvent>) -> Self {
        Self {
            events,
            list_error: None,
            refresh_error: None,
            delay: None,
            issued_at: super::now(),
            list_calls: AtomicUsize::new(0),
            refresh_calls: AtomicUsize::new(0),
            tokens_seen: Mutex::new(Vec::new()),
            windows_seen: Mutex::new(Vec::new()),
        }
    }

    pub fn failing_fetch(message: &str) -> Self {
        Self { list_error: Some(message.to_string()), ..Self::with_events(Vec::new()) }
    }

    pub fn rejecting_refresh(mut self, message: &str) -> Self {
        self.refresh_error = Some(message.to_string());
        self
    }

    pub fn slow(mut self, delay: StdDuration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }

    pub fn refresh_calls(&self) -> usize {
        self.refresh_calls.load(Ordering::SeqCst)
    }

    pub fn last_token(&self) -> Option<String> {
        self.tokens_seen.lock().unwrap().last().cloned()
    }

    pub fn last_window(&self) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
        self.windows_seen.lock().unwrap().last().copied()
    }
}

#[async_trait]
impl CalendarProvider for MockCalendarProvider {
    async fn list_events(
        &self,
        access_token: &str,
        time_min: DateTime<Utc>,
        time_max: DateTime<Utc>,
        max_results: u32,
    ) -> DomainResult<Vec<RawCalendarEvent>> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        self.tokens_seen.lock().unwrap().push(access_token.to_string());
        self.windows_seen.lock().unwrap().push((time_min, time_max));

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if let Some(message) = &self.list_error {
            return Err(RallypointError::Network(message.clone()));
        }

        Ok(self.events.iter().take(max_results as usize).cloned().collect())
    }

    async fn refresh_token(
        &self,
        _access_token: &str,
        _refresh_token: &str,
    ) -> DomainResult<TokenRefresh> {
        let call = self.refresh_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(message) = &self.refresh_error {
            return Err(RallypointError::Auth(message.clone()));
        }

        Ok(TokenRefresh {
            access_token: format!("refreshed-token-{call}"),
            expires_at: self.issued_at + Duration::hours(1),
        })
    }
}
