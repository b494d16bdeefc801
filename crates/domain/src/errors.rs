//! Error types used throughout the engine

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Main error type for Rallypoint infrastructure operations
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "message")]
pub enum RallypointError {
    #[error("Database error: {0}")]
    Database(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Authentication error: {0}")]
    Auth(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias for Rallypoint operations
pub type Result<T> = std::result::Result<T, RallypointError>;

/// Failure modes of the credential lifecycle manager.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CredentialError {
    /// Credential is expired (or about to be) and carries no refresh token.
    #[error("credential expired and no refresh token is available")]
    NoRefreshToken,

    /// The provider rejected the refresh attempt.
    #[error("token refresh failed: {detail}")]
    RefreshFailed { detail: String },

    /// The credential store could not persist the refreshed token.
    #[error("credential store error: {0}")]
    Store(RallypointError),
}

/// What the presentation layer should offer the user after a failed sync.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Remediation {
    /// The calendar account must be linked (again).
    Relink,
    /// Transient failure; retrying the whole sync may succeed.
    Retry,
    /// The request itself is invalid.
    FixRequest,
}

/// Caller-facing failure of a sync-family operation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SyncError {
    #[error("no calendar account linked for user")]
    NoCredential,

    #[error("calendar credential expired and cannot be renewed")]
    NoRefreshToken,

    #[error("calendar provider rejected token refresh: {0}")]
    RefreshFailed(String),

    #[error("failed to fetch events from calendar provider: {0}")]
    ProviderFetch(String),

    #[error("calendar provider did not respond within {0} seconds")]
    Timeout(u64),

    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("storage error: {0}")]
    Storage(String),
}

impl SyncError {
    /// Remediation the caller should surface for this failure.
    pub fn remediation(&self) -> Remediation {
        match self {
            Self::NoCredential | Self::NoRefreshToken | Self::RefreshFailed(_) => {
                Remediation::Relink
            }
            Self::ProviderFetch(_) | Self::Timeout(_) | Self::Storage(_) => Remediation::Retry,
            Self::InvalidRequest(_) => Remediation::FixRequest,
        }
    }

    /// Stable label suitable for logs and metrics.
    pub fn label(&self) -> &'static str {
        match self {
            Self::NoCredential => "no_credential",
            Self::NoRefreshToken => "no_refresh_token",
            Self::RefreshFailed(_) => "refresh_failed",
            Self::ProviderFetch(_) => "provider_fetch",
            Self::Timeout(_) => "timeout",
            Self::InvalidRequest(_) => "invalid_request",
            Self::Storage(_) => "storage",
        }
    }
}

impl From<CredentialError> for SyncError {
    fn from(err: CredentialError) -> Self {
        match err {
            CredentialError::NoRefreshToken => Self::NoRefreshToken,
            CredentialError::RefreshFailed { detail } => Self::RefreshFailed(detail),
            CredentialError::Store(inner) => Self::Storage(inner.to_string()),
        }
    }
}

/// A raw event that could not be turned into start/end instants.
///
/// Never fails a sync on its own; the normalizer collects these so the skip is
/// observable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventParseFailure {
    pub event_id: String,
    pub field: &'static str,
    pub reason: String,
}

impl EventParseFailure {
    pub fn new(event_id: impl Into<String>, field: &'static str, reason: impl Into<String>) -> Self {
        Self { event_id: event_id.into(), field, reason: reason.into() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn credential_failures_ask_for_relink() {
        let errors = [
            SyncError::NoCredential,
            SyncError::from(CredentialError::NoRefreshToken),
            SyncError::from(CredentialError::RefreshFailed { detail: "invalid_grant".into() }),
        ];

        for err in errors {
            assert_eq!(err.remediation(), Remediation::Relink, "{err}");
        }
    }

    #[test]
    fn provider_and_storage_failures_are_retryable() {
        assert_eq!(SyncError::ProviderFetch("503".into()).remediation(), Remediation::Retry);
        assert_eq!(SyncError::Timeout(15).remediation(), Remediation::Retry);

        let store = SyncError::from(CredentialError::Store(RallypointError::Database(
            "database is locked".into(),
        )));
        assert_eq!(store.remediation(), Remediation::Retry);
        assert_eq!(store.label(), "storage");
    }

    #[test]
    fn rallypoint_error_serializes_with_tag() {
        let json = serde_json::to_value(RallypointError::NotFound("user".into())).unwrap();
        assert_eq!(json["type"], "NotFound");
        assert_eq!(json["message"], "user");
    }
}
