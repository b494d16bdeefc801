//! Configuration structures
//!
//! Plain serde structures; loading from environment/files lives in the infra
//! crate. Every section has defaults so partial files are accepted.

use std::str::FromStr;

use chrono::{Duration, NaiveTime};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_CALENDAR_ID, DEFAULT_DAY_END, DEFAULT_DAY_START, DEFAULT_FETCH_TIMEOUT_SECS,
    DEFAULT_TIMEZONE, GOOGLE_CALENDAR_API_BASE, GOOGLE_TOKEN_ENDPOINT, MAX_EVENTS_PER_FETCH,
    MIN_FREE_MINUTES, REFRESH_BUFFER_SECS, REFRESH_LOCK_IDLE_SECS,
};
use crate::errors::{RallypointError, Result};

/// Top-level application configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub database: DatabaseConfig,
    pub provider: ProviderConfig,
    pub availability: AvailabilityConfig,
    pub server: ServerConfig,
    pub logging: LoggingConfig,
}

impl Config {
    /// Reject configurations the engine cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.database.pool_size == 0 {
            return Err(RallypointError::Config("database.pool_size must be at least 1".into()));
        }
        if self.provider.max_results == 0 {
            return Err(RallypointError::Config("provider.max_results must be at least 1".into()));
        }
        self.availability.working_hours()?;
        self.availability.refresh_buffer().map(|_| ())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    pub path: String,
    pub pool_size: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self { path: "rallypoint.db".to_string(), pool_size: 4 }
    }
}

/// External calendar provider (Google Calendar v3 compatible)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    pub api_base_url: String,
    pub token_endpoint: String,
    pub client_id: String,
    pub client_secret: Option<String>,
    pub calendar_id: String,
    pub fetch_timeout_secs: u64,
    pub max_results: u32,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            api_base_url: GOOGLE_CALENDAR_API_BASE.to_string(),
            token_endpoint: GOOGLE_TOKEN_ENDPOINT.to_string(),
            client_id: String::new(),
            client_secret: None,
            calendar_id: DEFAULT_CALENDAR_ID.to_string(),
            fetch_timeout_secs: DEFAULT_FETCH_TIMEOUT_SECS,
            max_results: MAX_EVENTS_PER_FETCH,
        }
    }
}

impl ProviderConfig {
    pub fn fetch_timeout(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.fetch_timeout_secs.max(1))
    }
}

/// Working-hour window and credential timing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AvailabilityConfig {
    /// IANA timezone used for every day-boundary computation.
    pub timezone: String,
    /// `HH:MM` local start of the daily window.
    pub day_start: String,
    /// `HH:MM` local end of the daily window.
    pub day_end: String,
    pub min_free_minutes: i64,
    pub refresh_buffer_secs: i64,
    pub refresh_lock_idle_secs: u64,
}

impl Default for AvailabilityConfig {
    fn default() -> Self {
        Self {
            timezone: DEFAULT_TIMEZONE.to_string(),
            day_start: DEFAULT_DAY_START.to_string(),
            day_end: DEFAULT_DAY_END.to_string(),
            min_free_minutes: MIN_FREE_MINUTES,
            refresh_buffer_secs: REFRESH_BUFFER_SECS,
            refresh_lock_idle_secs: REFRESH_LOCK_IDLE_SECS,
        }
    }
}

impl AvailabilityConfig {
    /// Resolve the textual settings into a [`WorkingHours`] value.
    pub fn working_hours(&self) -> Result<WorkingHours> {
        let timezone = Tz::from_str(self.timezone.trim()).map_err(|e| {
            RallypointError::Config(format!("invalid timezone '{}': {e}", self.timezone))
        })?;
        let day_start = parse_clock_time(&self.day_start, "day_start")?;
        let day_end = parse_clock_time(&self.day_end, "day_end")?;

        if day_start >= day_end {
            return Err(RallypointError::Config(format!(
                "day_start ({}) must be before day_end ({})",
                self.day_start, self.day_end
            )));
        }
        let min_duration = Some(self.min_free_minutes)
            .filter(|minutes| *minutes > 0)
            .and_then(Duration::try_minutes)
            .ok_or_else(|| {
                RallypointError::Config(format!(
                    "min_free_minutes must be a positive number of minutes, got {}",
                    self.min_free_minutes
                ))
            })?;

        Ok(WorkingHours { timezone, day_start, day_end, min_duration })
    }

    /// Refresh buffer as a duration; negative values mean no buffer.
    pub fn refresh_buffer(&self) -> Result<Duration> {
        Duration::try_seconds(self.refresh_buffer_secs.max(0)).ok_or_else(|| {
            RallypointError::Config(format!(
                "refresh_buffer_secs out of range: {}",
                self.refresh_buffer_secs
            ))
        })
    }
}

fn parse_clock_time(value: &str, field: &str) -> Result<NaiveTime> {
    let trimmed = value.trim();
    NaiveTime::parse_from_str(trimmed, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(trimmed, "%H:%M:%S"))
        .map_err(|e| RallypointError::Config(format!("invalid {field} '{value}': {e}")))
}

/// Daily window inside which free time is computed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkingHours {
    /// Single calendar reference for day bucketing and window boundaries.
    pub timezone: Tz,
    pub day_start: NaiveTime,
    pub day_end: NaiveTime,
    pub min_duration: Duration,
}

impl WorkingHours {
    /// Same window with a different minimum free-slot duration.
    #[must_use]
    pub fn with_min_duration(mut self, min_duration: Duration) -> Self {
        self.min_duration = min_duration;
        self
    }
}

impl Default for WorkingHours {
    fn default() -> Self {
        Self {
            timezone: Tz::UTC,
            day_start: NaiveTime::from_hms_opt(7, 0, 0).unwrap_or(NaiveTime::MIN),
            day_end: NaiveTime::from_hms_opt(22, 0, 0).unwrap_or(NaiveTime::MIN),
            min_duration: Duration::minutes(MIN_FREE_MINUTES),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind_addr: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { bind_addr: "127.0.0.1:8080".to_string() }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `tracing` filter directive, overridden by `RUST_LOG`.
    pub level: String,
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: "info".to_string(), json: false }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_resolve_to_seven_to_ten_utc() {
        let hours = AvailabilityConfig::default().working_hours().unwrap();
        assert_eq!(hours, WorkingHours::default());
        assert_eq!(hours.timezone, Tz::UTC);
        assert_eq!(hours.min_duration, Duration::minutes(30));
    }

    #[test]
    fn inverted_window_is_rejected() {
        let config = AvailabilityConfig {
            day_start: "18:00".into(),
            day_end: "09:00".into(),
            ..AvailabilityConfig::default()
        };
        assert!(matches!(config.working_hours(), Err(RallypointError::Config(_))));
    }

    #[test]
    fn unknown_timezone_is_rejected() {
        let config =
            AvailabilityConfig { timezone: "Mars/Olympus_Mons".into(), ..AvailabilityConfig::default() };
        let err = config.working_hours().unwrap_err();
        assert!(err.to_string().contains("Mars/Olympus_Mons"));
    }

    #[test]
    fn oversized_durations_are_config_errors() {
        let config =
            AvailabilityConfig { min_free_minutes: i64::MAX, ..AvailabilityConfig::default() };
        assert!(matches!(config.working_hours(), Err(RallypointError::Config(_))));

        let config =
            AvailabilityConfig { refresh_buffer_secs: i64::MAX, ..AvailabilityConfig::default() };
        assert!(matches!(config.refresh_buffer(), Err(RallypointError::Config(_))));

        let config = Config { availability: config, ..Config::default() };
        assert!(matches!(config.validate(), Err(RallypointError::Config(_))));
    }

    #[test]
    fn partial_toml_falls_back_to_defaults() {
        let config: Config = toml::from_str(
            r#"
            [availability]
            timezone = "Europe/Berlin"
            "#,
        )
        .unwrap();

        assert_eq!(config.availability.timezone, "Europe/Berlin");
        assert_eq!(config.availability.day_start, "07:00");
        assert_eq!(config.provider.max_results, 100);
        config.validate().unwrap();
    }
}
