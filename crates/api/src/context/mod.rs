//! Application context - dependency injection container

use std::sync::Arc;

use rallypoint_core::{
    AvailabilitySyncService, CalendarProvider, Clock, SyncPorts, SyncSettings, SystemClock,
};
use rallypoint_domain::{Config, RallypointError, Result};
use rallypoint_infra::{DbManager, GoogleCalendarProvider, SqliteAvailabilityStore, SqliteCredentialStore};

use crate::utils::health::{ComponentHealth, HealthStatus};

/// Application context - holds all services and dependencies
pub struct AppContext {
    pub config: Config,
    pub db: Arc<DbManager>,
    pub credentials: Arc<SqliteCredentialStore>,
    pub availability: Arc<SqliteAvailabilityStore>,
    pub sync_service: Arc<AvailabilitySyncService>,
}

impl AppContext {
    /// Create a context from the configuration found by
    /// [`rallypoint_infra::config::load`].
    pub fn new() -> Result<Self> {
        Self::new_with_config(rallypoint_infra::config::load()?)
    }

    /// Create a context talking to the configured Google Calendar endpoint.
    pub fn new_with_config(config: Config) -> Result<Self> {
        let provider = Arc::new(GoogleCalendarProvider::from_config(&config.provider)?);
        Self::with_provider(config, provider)
    }

    /// Create a context with an explicit calendar provider.
    pub fn with_provider(config: Config, provider: Arc<dyn CalendarProvider>) -> Result<Self> {
        config.validate()?;
        let settings = SyncSettings::from_config(&config)?;

        let db = Arc::new(DbManager::new(&config.database.path, config.database.pool_size)?);
        db.run_migrations()?;

        let credentials = Arc::new(SqliteCredentialStore::new(Arc::clone(&db)));
        let availability = Arc::new(SqliteAvailabilityStore::new(Arc::clone(&db)));
        let clock: Arc<dyn Clock> = Arc::new(SystemClock);

        let ports = SyncPorts {
            credentials: credentials.clone(),
            provider,
            availability: availability.clone(),
            clock,
        };
        let sync_service = Arc::new(AvailabilitySyncService::new(ports, settings));

        tracing::info!(
            database = %config.database.path,
            timezone = %settings.hours.timezone,
            "application context initialized"
        );

        Ok(Self { config, db, credentials, availability, sync_service })
    }

    /// Check the components that can fail at runtime.
    pub async fn health_check(&self) -> HealthStatus {
        let mut status = HealthStatus::new().add_component(self.check_database_health().await);

        status.calculate_score();
        status
    }

    /// Uses spawn_blocking so the pool checkout never stalls the runtime.
    async fn check_database_health(&self) -> ComponentHealth {
        let db = Arc::clone(&self.db);
        match tokio::task::spawn_blocking(move || db.health_check()).await {
            Ok(Ok(())) => ComponentHealth::healthy("database"),
            Ok(Err(e)) => {
                tracing::warn!(error = %e, "database health check failed");
                ComponentHealth::unhealthy("database", format!("query failed: {e}"))
            }
            Err(e) => {
                tracing::error!(error = %e, "database health check task panicked");
                let err = RallypointError::Internal(e.to_string());
                ComponentHealth::unhealthy("database", err.to_string())
            }
        }
    }
}
