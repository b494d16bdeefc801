//! Event fetching
//!
//! One bounded provider query per sync. The provider is expected to expand
//! recurring events and order by start; the fetcher enforces the result cap.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use rallypoint_domain::{RawCalendarEvent, SyncError};
use tracing::{debug, instrument};

use crate::calendar_ports::CalendarProvider;

pub struct EventFetcher {
    provider: Arc<dyn CalendarProvider>,
    max_results: u32,
}

impl EventFetcher {
    pub fn new(provider: Arc<dyn CalendarProvider>, max_results: u32) -> Self {
        Self { provider, max_results: max_results.max(1) }
    }

    pub fn max_results(&self) -> u32 {
        self.max_results
    }

    /// Fetch raw events between `time_min` and `time_max`.
    ///
    /// Issues exactly one provider request and never retries; any provider
    /// failure is reported as [`SyncError::ProviderFetch`].
    #[instrument(skip(self, access_token), fields(max_results = self.max_results))]
    pub async fn fetch_events(
        &self,
        access_token: &str,
        time_min: DateTime<Utc>,
        time_max: DateTime<Utc>,
    ) -> Result<Vec<RawCalendarEvent>, SyncError> {
        if time_min > time_max {
            return Err(SyncError::InvalidRequest(format!(
                "fetch window start {time_min} is after end {time_max}"
            )));
        }

        let mut events = self
            .provider
            .list_events(access_token, time_min, time_max, self.max_results)
            .await
            .map_err(|e| SyncError::ProviderFetch(e.to_string()))?;

        let cap = self.max_results as usize;
        if events.len() > cap {
            debug!(returned = events.len(), cap, "provider exceeded result cap, truncating");
            events.truncate(cap);
        }

        debug!(count = events.len(), "fetched calendar events");
        Ok(events)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use chrono::TimeZone;
    use rallypoint_domain::{RallypointError, TokenRefresh};

    use super::*;

    struct StubProvider {
        events: usize,
        fail: bool,
        calls: AtomicUsize,
    }

    impl StubProvider {
        fn returning(events: usize) -> Self {
            Self { events, fail: false, calls: AtomicUsize::new(0) }
        }
    }

    #[async_trait]
    impl CalendarProvider for StubProvider {
        async fn list_events(
            &self,
            _access_token: &str,
            _time_min: DateTime<Utc>,
            _time_max: DateTime<Utc>,
            _max_results: u32,
        ) -> rallypoint_domain::Result<Vec<RawCalendarEvent>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(RallypointError::Network("503 Service Unavailable".into()));
            }
            Ok((0..self.events)
                .map(|i| RawCalendarEvent { id: format!("evt-{i}"), ..RawCalendarEvent::default() })
                .collect())
        }

        async fn refresh_token(
            &self,
            _access_token: &str,
            _refresh_token: &str,
        ) -> rallypoint_domain::Result<TokenRefresh> {
            Err(RallypointError::Auth("not used".into()))
        }
    }

    fn window() -> (DateTime<Utc>, DateTime<Utc>) {
        (
            Utc.with_ymd_and_hms(2025, 3, 10, 0, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(2025, 3, 11, 0, 0, 0).unwrap(),
        )
    }

    #[tokio::test]
    async fn results_are_capped() {
        let provider = Arc::new(StubProvider::returning(150));
        let fetcher = EventFetcher::new(provider.clone(), 100);
        let (min, max) = window();

        let events = fetcher.fetch_events("token", min, max).await.unwrap();

        assert_eq!(events.len(), 100);
        assert_eq!(provider.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn provider_failure_is_not_retried() {
        let provider =
            Arc::new(StubProvider { events: 0, fail: true, calls: AtomicUsize::new(0) });
        let fetcher = EventFetcher::new(provider.clone(), 100);
        let (min, max) = window();

        let err = fetcher.fetch_events("token", min, max).await.unwrap_err();

        assert!(matches!(err, SyncError::ProviderFetch(ref msg) if msg.contains("503")));
        assert_eq!(provider.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn inverted_window_never_reaches_provider() {
        let provider = Arc::new(StubProvider::returning(1));
        let fetcher = EventFetcher::new(provider.clone(), 100);
        let (min, max) = window();

        let err = fetcher.fetch_events("token", max, min).await.unwrap_err();

        assert!(matches!(err, SyncError::InvalidRequest(_)));
        assert_eq!(provider.calls.load(Ordering::SeqCst), 0);
    }
}
