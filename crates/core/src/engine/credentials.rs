//! Credential lifecycle
//!
//! Guarantees a usable access token before any provider call. Tokens expiring
//! within the refresh buffer are renewed once through the provider and the
//! result is persisted. Refreshes for the same user are serialised through a
//! keyed lock so concurrent syncs share one provider round-trip.

use std::sync::Arc;

use chrono::Duration;
use moka::future::Cache;
use rallypoint_domain::{AccessCredential, CredentialError, UsableToken};
use tokio::sync::Mutex;
use tracing::{debug, info, instrument, warn};

use crate::calendar_ports::CalendarProvider;
use crate::clock::Clock;
use crate::user::ports::CredentialStore;

pub struct CredentialLifecycleManager {
    store: Arc<dyn CredentialStore>,
    provider: Arc<dyn CalendarProvider>,
    clock: Arc<dyn Clock>,
    buffer: Duration,
    refresh_locks: Cache<String, Arc<Mutex<()>>>,
}

impl CredentialLifecycleManager {
    /// Create a manager refreshing tokens that expire within `buffer`.
    ///
    /// Per-user locks are evicted after `lock_idle` without use.
    pub fn new(
        store: Arc<dyn CredentialStore>,
        provider: Arc<dyn CalendarProvider>,
        clock: Arc<dyn Clock>,
        buffer: Duration,
        lock_idle: std::time::Duration,
    ) -> Self {
        let refresh_locks = Cache::builder().time_to_idle(lock_idle).build();
        Self { store, provider, clock, buffer, refresh_locks }
    }

    pub fn buffer(&self) -> Duration {
        self.buffer
    }

    /// Return an access token valid for at least the refresh buffer.
    ///
    /// Refreshes at most once and never retries. A refresh that fails leaves
    /// the stored credential untouched.
    ///
    /// # Errors
    /// - [`CredentialError::NoRefreshToken`] when the token is stale and
    ///   cannot be renewed
    /// - [`CredentialError::RefreshFailed`] when the provider rejects the
    ///   refresh or returns an already expired token
    /// - [`CredentialError::Store`] when the store cannot be read or updated
    #[instrument(skip(self, credential), fields(user_id = %user_id))]
    pub async fn ensure_usable(
        &self,
        user_id: &str,
        credential: AccessCredential,
    ) -> Result<UsableToken, CredentialError> {
        if credential.is_fresh(self.clock.now(), self.buffer) {
            return Ok(UsableToken { access_token: credential.access_token, refreshed: false });
        }
        if credential.usable_refresh_token().is_none() {
            warn!("credential is stale and has no refresh token");
            return Err(CredentialError::NoRefreshToken);
        }

        let lock = self
            .refresh_locks
            .get_with(user_id.to_string(), async { Arc::new(Mutex::new(())) })
            .await;
        let _guard = lock.lock().await;

        // Another sync may have refreshed while this one waited.
        let current = self
            .store
            .get_credential(user_id)
            .await
            .map_err(CredentialError::Store)?
            .unwrap_or(credential);
        if current.is_fresh(self.clock.now(), self.buffer) {
            debug!("credential refreshed by a concurrent sync");
            return Ok(UsableToken { access_token: current.access_token, refreshed: false });
        }
        let Some(refresh_token) = current.usable_refresh_token() else {
            return Err(CredentialError::NoRefreshToken);
        };

        let renewed = self
            .provider
            .refresh_token(&current.access_token, refresh_token)
            .await
            .map_err(|e| {
                warn!(error = %e, "provider rejected token refresh");
                CredentialError::RefreshFailed { detail: e.to_string() }
            })?;

        if renewed.expires_at <= self.clock.now() {
            return Err(CredentialError::RefreshFailed {
                detail: format!("provider returned a token expiring at {}", renewed.expires_at),
            });
        }

        self.store
            .update_access_token(user_id, &renewed.access_token, renewed.expires_at)
            .await
            .map_err(CredentialError::Store)?;

        info!(expires_at = %renewed.expires_at, "access token refreshed");
        Ok(UsableToken { access_token: renewed.access_token, refreshed: true })
    }
}
