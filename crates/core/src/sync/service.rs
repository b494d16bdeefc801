//! Availability sync service - core business logic
//!
//! Runs the engine stages in order for one request:
//! credential check → bounded fetch → normalize → merge → free time, then the
//! optional conflict cleanup against stored availability.

use std::sync::Arc;
use std::time::Duration as StdDuration;

use chrono::{DateTime, Duration, NaiveDate, Utc};
use rallypoint_domain::constants::REFRESH_BUFFER_SECS;
use rallypoint_domain::{
    AccessCredential, BusyInterval, Config, DateRange, FreeInterval, LinkStatus, Result, SyncError,
    SyncOutcome, SyncRequest, WorkingHours,
};
use tracing::{debug, info, instrument, warn};

use crate::availability::ports::AvailabilityStore;
use crate::calendar_ports::CalendarProvider;
use crate::clock::Clock;
use crate::engine::{
    merge, normalize, ConflictResolver, CredentialLifecycleManager, EventFetcher,
    FreeTimeCalculator,
};
use crate::user::ports::CredentialStore;

/// External collaborators the service depends on.
#[derive(Clone)]
pub struct SyncPorts {
    pub credentials: Arc<dyn CredentialStore>,
    pub provider: Arc<dyn CalendarProvider>,
    pub availability: Arc<dyn AvailabilityStore>,
    pub clock: Arc<dyn Clock>,
}

/// Tunables resolved from configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyncSettings {
    pub hours: WorkingHours,
    pub refresh_buffer: Duration,
    pub refresh_lock_idle: StdDuration,
    pub fetch_timeout: StdDuration,
    pub max_results: u32,
}

impl SyncSettings {
    /// Resolve settings from a loaded configuration.
    ///
    /// # Errors
    /// Returns a `Config` error for an invalid timezone or working-hour window.
    pub fn from_config(config: &Config) -> Result<Self> {
        let availability = &config.availability;
        Ok(Self {
            hours: availability.working_hours()?,
            refresh_buffer: availability.refresh_buffer()?,
            refresh_lock_idle: StdDuration::from_secs(availability.refresh_lock_idle_secs.max(1)),
            fetch_timeout: config.provider.fetch_timeout(),
            max_results: config.provider.max_results,
        })
    }
}

impl Default for SyncSettings {
    fn default() -> Self {
        let config = Config::default();
        Self {
            hours: WorkingHours::default(),
            refresh_buffer: Duration::seconds(REFRESH_BUFFER_SECS),
            refresh_lock_idle: StdDuration::from_secs(config.availability.refresh_lock_idle_secs),
            fetch_timeout: config.provider.fetch_timeout(),
            max_results: config.provider.max_results,
        }
    }
}

/// Calendar availability sync service
pub struct AvailabilitySyncService {
    credentials: Arc<dyn CredentialStore>,
    availability: Arc<dyn AvailabilityStore>,
    clock: Arc<dyn Clock>,
    lifecycle: CredentialLifecycleManager,
    fetcher: EventFetcher,
    calculator: FreeTimeCalculator,
    resolver: ConflictResolver,
    fetch_timeout: StdDuration,
}

impl AvailabilitySyncService {
    pub fn new(ports: SyncPorts, settings: SyncSettings) -> Self {
        let lifecycle = CredentialLifecycleManager::new(
            Arc::clone(&ports.credentials),
            Arc::clone(&ports.provider),
            Arc::clone(&ports.clock),
            settings.refresh_buffer,
            settings.refresh_lock_idle,
        );

        Self {
            credentials: ports.credentials,
            availability: ports.availability,
            clock: ports.clock,
            lifecycle,
            fetcher: EventFetcher::new(ports.provider, settings.max_results),
            calculator: FreeTimeCalculator::new(settings.hours),
            resolver: ConflictResolver::new(settings.hours.timezone),
            fetch_timeout: settings.fetch_timeout,
        }
    }

    /// Fetch the user's calendar for the requested days and compute busy and
    /// free time, optionally deleting stored availability that now conflicts.
    ///
    /// Nothing is deleted unless every earlier stage succeeded.
    #[instrument(
        skip(self, request),
        fields(
            user_id = %request.user_id,
            start_date = %request.start_date,
            end_date = %request.end_date,
            remove_conflicts = request.remove_conflicts,
        )
    )]
    pub async fn sync(&self, request: SyncRequest) -> std::result::Result<SyncOutcome, SyncError> {
        let range = DateRange::new(request.start_date, request.end_date)?;

        let (busy_times, skipped_events) = self.collect_busy(&request.user_id, &range).await?;
        let free_times = self.calculator.compute_free(&busy_times, &range);

        let conflicts_resolved = if request.remove_conflicts {
            self.remove_conflicts(&request.user_id, request.group_id.as_deref(), &busy_times, &range)
                .await?
        } else {
            0
        };

        info!(
            busy = busy_times.len(),
            free = free_times.len(),
            conflicts_resolved,
            skipped_events,
            "availability sync complete"
        );

        Ok(SyncOutcome { busy_times, free_times, conflicts_resolved, skipped_events })
    }

    /// Link state of the user's calendar account. Never calls the provider.
    #[instrument(skip(self))]
    pub async fn get_status(&self, user_id: &str) -> std::result::Result<LinkStatus, SyncError> {
        let Some(credential) = self.load_credential(user_id).await? else {
            return Ok(LinkStatus::default());
        };

        let token_expired = credential.is_expired(self.clock.now());
        Ok(LinkStatus {
            has_credential: true,
            token_expired,
            is_linked: !token_expired || credential.usable_refresh_token().is_some(),
        })
    }

    /// Free slots of at least `min_duration_minutes` on a single day.
    ///
    /// Read-only: stored availability is never touched.
    #[instrument(skip(self))]
    pub async fn suggest_free_times(
        &self,
        user_id: &str,
        date: NaiveDate,
        min_duration_minutes: i64,
    ) -> std::result::Result<Vec<FreeInterval>, SyncError> {
        let min_duration = Some(min_duration_minutes)
            .filter(|minutes| *minutes > 0)
            .and_then(Duration::try_minutes)
            .ok_or_else(|| {
                SyncError::InvalidRequest(format!(
                    "minimum duration must be a positive number of minutes, got {min_duration_minutes}"
                ))
            })?;

        let range = DateRange::day(date);
        let (busy, _) = self.collect_busy(user_id, &range).await?;

        Ok(self
            .calculator
            .with_min_duration(min_duration)
            .compute_free(&busy, &range))
    }

    /// Credential check, bounded fetch, normalize and merge.
    ///
    /// Returns the merged busy set and the number of skipped events.
    async fn collect_busy(
        &self,
        user_id: &str,
        range: &DateRange,
    ) -> std::result::Result<(Vec<BusyInterval>, usize), SyncError> {
        let credential = self.load_credential(user_id).await?.ok_or(SyncError::NoCredential)?;
        let token = self.lifecycle.ensure_usable(user_id, credential).await?;

        let (time_min, time_max) = self.calculator.fetch_bounds(range);
        let events = tokio::time::timeout(
            self.fetch_timeout,
            self.fetcher.fetch_events(&token.access_token, time_min, time_max),
        )
        .await
        .map_err(|_| {
            warn!(timeout_secs = self.fetch_timeout.as_secs(), "calendar fetch timed out");
            SyncError::Timeout(self.fetch_timeout.as_secs())
        })??;

        let normalized = normalize(&events);
        for failure in &normalized.skipped {
            warn!(
                event_id = %failure.event_id,
                field = failure.field,
                reason = %failure.reason,
                "skipping calendar event with unparseable time"
            );
        }
        if !normalized.skipped.is_empty() {
            warn!(
                skipped = normalized.skipped.len(),
                fetched = events.len(),
                "some calendar events were skipped"
            );
        }

        let merged = merge(&normalized.intervals);
        debug!(raw = normalized.intervals.len(), merged = merged.len(), "busy intervals merged");
        Ok((merged, normalized.skipped.len()))
    }

    async fn remove_conflicts(
        &self,
        user_id: &str,
        group_id: Option<&str>,
        busy: &[BusyInterval],
        range: &DateRange,
    ) -> std::result::Result<usize, SyncError> {
        let (range_start, range_end): (DateTime<Utc>, DateTime<Utc>) =
            self.calculator.fetch_bounds(range);

        let records = self
            .availability
            .query_records(user_id, group_id, range_start, range_end)
            .await
            .map_err(|e| SyncError::Storage(e.to_string()))?;

        let resolution = self.resolver.resolve(busy, records, range);
        if resolution.removed.is_empty() {
            debug!(kept = resolution.keep.len(), "no conflicting availability");
            return Ok(0);
        }

        let deleted = self
            .availability
            .delete_records(&resolution.removed)
            .await
            .map_err(|e| SyncError::Storage(e.to_string()))?;

        info!(
            flagged = resolution.removed.len(),
            deleted,
            kept = resolution.keep.len(),
            "removed conflicting availability"
        );
        Ok(deleted)
    }

    async fn load_credential(
        &self,
        user_id: &str,
    ) -> std::result::Result<Option<AccessCredential>, SyncError> {
        self.credentials.get_credential(user_id).await.map_err(|e| SyncError::Storage(e.to_string()))
    }
}
