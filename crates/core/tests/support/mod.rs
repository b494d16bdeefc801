//! Shared test helpers for `rallypoint-core` integration tests.
//!
//! In-memory port mocks and event fixtures so the service tests can focus on
//! behaviour instead of boilerplate.

#![allow(dead_code)]

pub mod calendar;
pub mod repositories;

use std::sync::Arc;

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use rallypoint_core::{AvailabilitySyncService, ManualClock, SyncPorts, SyncSettings};

pub use calendar::{timed_event, MockCalendarProvider};
pub use repositories::{MockAvailabilityStore, MockCredentialStore};

/// Fixed "now" used by every fixture: 2025-03-10 06:00 UTC.
pub fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 3, 10, 6, 0, 0).unwrap()
}

pub fn utc(day: u32, hour: u32, minute: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 3, day, hour, minute, 0).unwrap()
}

pub fn march(day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 3, day).unwrap()
}

/// Service plus handles on every mock behind it.
pub struct Harness {
    pub service: AvailabilitySyncService,
    pub credentials: Arc<MockCredentialStore>,
    pub provider: Arc<MockCalendarProvider>,
    pub availability: Arc<MockAvailabilityStore>,
    pub clock: Arc<ManualClock>,
}

impl Harness {
    pub fn new(
        credentials: MockCredentialStore,
        provider: MockCalendarProvider,
        availability: MockAvailabilityStore,
    ) -> Self {
        Self::with_settings(credentials, provider, availability, SyncSettings::default())
    }

    pub fn with_settings(
        credentials: MockCredentialStore,
        provider: MockCalendarProvider,
        availability: MockAvailabilityStore,
        settings: SyncSettings,
    ) -> Self {
        let credentials = Arc::new(credentials);
        let provider = Arc::new(provider);
        let availability = Arc::new(availability);
        let clock = Arc::new(ManualClock::new(now()));

        let service = AvailabilitySyncService::new(
            SyncPorts {
                credentials: credentials.clone(),
                provider: provider.clone(),
                availability: availability.clone(),
                clock: clock.clone(),
            },
            settings,
        );

        Self { service, credentials, provider, availability, clock }
    }
}
