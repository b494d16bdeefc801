//! OAuth-style access credential types

use std::fmt;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Access credential linked to one user's external calendar account.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessCredential {
    pub access_token: String,
    pub refresh_token: Option<String>,
    pub expires_at: DateTime<Utc>,
}

impl AccessCredential {
    /// Whether at least `buffer` remains before expiry.
    pub fn is_fresh(&self, now: DateTime<Utc>, buffer: Duration) -> bool {
        self.expires_at - now >= buffer
    }

    /// Whether the token has already expired at `now`.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }

    /// The refresh token, if present and non-blank.
    pub fn usable_refresh_token(&self) -> Option<&str> {
        self.refresh_token.as_deref().map(str::trim).filter(|token| !token.is_empty())
    }
}

// Tokens never reach logs.
impl fmt::Debug for AccessCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccessCredential")
            .field("access_token", &"<redacted>")
            .field("refresh_token", &self.refresh_token.as_ref().map(|_| "<redacted>"))
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

/// Result of a successful refresh call against the provider.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenRefresh {
    pub access_token: String,
    pub expires_at: DateTime<Utc>,
}

impl fmt::Debug for TokenRefresh {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenRefresh")
            .field("access_token", &"<redacted>")
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

/// Token handed to the event fetcher.
#[derive(Clone, PartialEq, Eq)]
pub struct UsableToken {
    pub access_token: String,
    pub refreshed: bool,
}

impl fmt::Debug for UsableToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UsableToken")
            .field("access_token", &"<redacted>")
            .field("refreshed", &self.refreshed)
            .finish()
    }
}
