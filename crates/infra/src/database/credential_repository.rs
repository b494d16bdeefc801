//! SQLite-backed implementation of the `CredentialStore` port.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rallypoint_core::CredentialStore;
use rallypoint_domain::{AccessCredential, RallypointError, Result as DomainResult};
use rusqlite::{params, OptionalExtension};
use tokio::task;
use tracing::{debug, instrument};

use super::manager::{map_join_error, map_sql_error, timestamp_column, DbManager};

/// Per-user calendar credentials stored in `calendar_credentials`.
pub struct SqliteCredentialStore {
    db: Arc<DbManager>,
}

impl SqliteCredentialStore {
    pub fn new(db: Arc<DbManager>) -> Self {
        Self { db }
    }

    /// Insert or replace the credential of a user (account linking).
    #[instrument(skip(self, credential))]
    pub async fn save_credential(
        &self,
        user_id: &str,
        credential: &AccessCredential,
    ) -> DomainResult<()> {
        let db = Arc::clone(&self.db);
        let user_id = user_id.to_string();
        let credential = credential.clone();

        task::spawn_blocking(move || -> DomainResult<()> {
            let conn = db.get_connection()?;
            conn.execute(
                "INSERT INTO calendar_credentials
                    (user_id, access_token, refresh_token, expires_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5)
                 ON CONFLICT(user_id) DO UPDATE SET
                    access_token = excluded.access_token,
                    refresh_token = excluded.refresh_token,
                    expires_at = excluded.expires_at,
                    updated_at = excluded.updated_at",
                params![
                    user_id,
                    credential.access_token,
                    credential.refresh_token,
                    credential.expires_at.timestamp(),
                    Utc::now().timestamp(),
                ],
            )
            .map_err(map_sql_error)?;
            Ok(())
        })
        .await
        .map_err(map_join_error)?
    }

    /// Unlink a user's calendar. Returns whether a credential existed.
    #[instrument(skip(self))]
    pub async fn remove_credential(&self, user_id: &str) -> DomainResult<bool> {
        let db = Arc::clone(&self.db);
        let user_id = user_id.to_string();

        task::spawn_blocking(move || -> DomainResult<bool> {
            let conn = db.get_connection()?;
            let removed = conn
                .execute("DELETE FROM calendar_credentials WHERE user_id = ?1", params![user_id])
                .map_err(map_sql_error)?;
            Ok(removed > 0)
        })
        .await
        .map_err(map_join_error)?
    }
}

#[async_trait]
impl CredentialStore for SqliteCredentialStore {
    #[instrument(skip(self))]
    async fn get_credential(&self, user_id: &str) -> DomainResult<Option<AccessCredential>> {
        let db = Arc::clone(&self.db);
        let user_id = user_id.to_string();

        task::spawn_blocking(move || -> DomainResult<Option<AccessCredential>> {
            let conn = db.get_connection()?;
            conn.query_row(
                "SELECT access_token, refresh_token, expires_at
                 FROM calendar_credentials
                 WHERE user_id = ?1",
                params![user_id],
                |row| {
                    Ok(AccessCredential {
                        access_token: row.get(0)?,
                        refresh_token: row.get(1)?,
                        expires_at: timestamp_column(row, 2)?,
                    })
                },
            )
            .optional()
            .map_err(map_sql_error)
        })
        .await
        .map_err(map_join_error)?
    }

    #[instrument(skip(self, access_token))]
    async fn update_access_token(
        &self,
        user_id: &str,
        access_token: &str,
        expires_at: DateTime<Utc>,
    ) -> DomainResult<()> {
        let db = Arc::clone(&self.db);
        let user_id = user_id.to_string();
        let access_token = access_token.to_string();

        task::spawn_blocking(move || -> DomainResult<()> {
            let conn = db.get_connection()?;
            let updated = conn
                .execute(
                    "UPDATE calendar_credentials
                     SET access_token = ?1, expires_at = ?2, updated_at = ?3
                     WHERE user_id = ?4",
                    params![
                        access_token,
                        expires_at.timestamp(),
                        Utc::now().timestamp(),
                        user_id
                    ],
                )
                .map_err(map_sql_error)?;

            if updated == 0 {
                return Err(RallypointError::NotFound(format!(
                    "no calendar credential for user {user_id}"
                )));
            }
            debug!(%expires_at, "access token persisted");
            Ok(())
        })
        .await
        .map_err(map_join_error)?
    }
}
