//! Port interfaces for per-user calendar credentials
//!
//! These traits define the boundaries between core business logic
//! and infrastructure implementations for credential persistence.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rallypoint_domain::{AccessCredential, Result};

/// Trait for credential persistence and retrieval
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Get the linked credential for a user, `None` if never linked
    async fn get_credential(&self, user_id: &str) -> Result<Option<AccessCredential>>;

    /// Persist a refreshed access token and its new expiry
    async fn update_access_token(
        &self,
        user_id: &str,
        access_token: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<()>;
}
