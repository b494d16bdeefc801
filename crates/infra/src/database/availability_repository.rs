//! SQLite-backed implementation of the `AvailabilityStore` port.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rallypoint_core::AvailabilityStore;
use rallypoint_domain::{AvailabilityRecord, RallypointError, Result as DomainResult};
use rusqlite::params;
use tokio::task;
use tracing::{debug, instrument};

use super::manager::{map_join_error, map_sql_error, timestamp_column, DbManager};

/// Availability records stored in `availability_records`.
pub struct SqliteAvailabilityStore {
    db: Arc<DbManager>,
}

impl SqliteAvailabilityStore {
    pub fn new(db: Arc<DbManager>) -> Self {
        Self { db }
    }

    /// Insert a record on behalf of the surrounding CRUD layer.
    #[instrument(skip(self, record), fields(id = %record.id))]
    pub async fn insert_record(&self, record: &AvailabilityRecord) -> DomainResult<()> {
        if record.start >= record.end {
            return Err(RallypointError::InvalidInput(format!(
                "availability record {} must start before it ends",
                record.id
            )));
        }
        // Stored as unix seconds
        if record.start.timestamp_subsec_nanos() != 0 || record.end.timestamp_subsec_nanos() != 0 {
            return Err(RallypointError::InvalidInput(format!(
                "availability record {} must use whole-second bounds",
                record.id
            )));
        }

        let db = Arc::clone(&self.db);
        let record = record.clone();

        task::spawn_blocking(move || -> DomainResult<()> {
            let conn = db.get_connection()?;
            conn.execute(
                "INSERT INTO availability_records
                    (id, owner_user, group_id, start_ts, end_ts, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                params![
                    record.id,
                    record.owner_user,
                    record.group_id,
                    record.start.timestamp(),
                    record.end.timestamp(),
                    Utc::now().timestamp(),
                ],
            )
            .map_err(map_sql_error)?;
            Ok(())
        })
        .await
        .map_err(map_join_error)?
    }
}

#[async_trait]
impl AvailabilityStore for SqliteAvailabilityStore {
    #[instrument(skip(self))]
    async fn query_records(
        &self,
        owner_id: &str,
        group_id: Option<&str>,
        range_start: DateTime<Utc>,
        range_end: DateTime<Utc>,
    ) -> DomainResult<Vec<AvailabilityRecord>> {
        let db = Arc::clone(&self.db);
        let owner_id = owner_id.to_string();
        let group_id = group_id.map(str::to_string);

        task::spawn_blocking(move || -> DomainResult<Vec<AvailabilityRecord>> {
            let conn = db.get_connection()?;
            let mut stmt = conn
                .prepare(
                    "SELECT id, owner_user, group_id, start_ts, end_ts
                     FROM availability_records
                     WHERE owner_user = ?1
                       AND (?2 IS NULL OR group_id = ?2)
                       AND start_ts < ?4
                       AND end_ts > ?3
                     ORDER BY start_ts, id",
                )
                .map_err(map_sql_error)?;

            let rows = stmt
                .query_map(
                    params![owner_id, group_id, range_start.timestamp(), range_end.timestamp()],
                    |row| {
                        Ok(AvailabilityRecord {
                            id: row.get(0)?,
                            owner_user: row.get(1)?,
                            group_id: row.get(2)?,
                            start: timestamp_column(row, 3)?,
                            end: timestamp_column(row, 4)?,
                        })
                    },
                )
                .map_err(map_sql_error)?;

            rows.collect::<rusqlite::Result<Vec<_>>>().map_err(map_sql_error)
        })
        .await
        .map_err(map_join_error)?
    }

    #[instrument(skip(self, ids), fields(count = ids.len()))]
    async fn delete_records(&self, ids: &[String]) -> DomainResult<usize> {
        if ids.is_empty() {
            return Ok(0);
        }

        let db = Arc::clone(&self.db);
        let ids = ids.to_vec();

        task::spawn_blocking(move || -> DomainResult<usize> {
            let mut conn = db.get_connection()?;
            let tx = conn.transaction().map_err(map_sql_error)?;

            let mut deleted = 0;
            {
                let mut stmt = tx
                    .prepare("DELETE FROM availability_records WHERE id = ?1")
                    .map_err(map_sql_error)?;
                for id in &ids {
                    deleted += stmt.execute(params![id]).map_err(map_sql_error)?;
                }
            }

            // Dropping `tx` on any error above rolls the whole batch back.
            tx.commit().map_err(map_sql_error)?;
            debug!(requested = ids.len(), deleted, "availability records deleted");
            Ok(deleted)
        })
        .await
        .map_err(map_join_error)?
    }
}
