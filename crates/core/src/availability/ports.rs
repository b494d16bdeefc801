//! Port interfaces for persisted availability records

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rallypoint_domain::{AvailabilityRecord, Result};

/// Trait for availability record queries and deletion
#[async_trait]
pub trait AvailabilityStore: Send + Sync {
    /// Records owned by `owner_id` (optionally limited to one group) that
    /// overlap `[range_start, range_end)`.
    async fn query_records(
        &self,
        owner_id: &str,
        group_id: Option<&str>,
        range_start: DateTime<Utc>,
        range_end: DateTime<Utc>,
    ) -> Result<Vec<AvailabilityRecord>>;

    /// Delete all listed records atomically: either every id is removed or
    /// none is. Unknown ids are ignored. Returns the number of rows deleted.
    async fn delete_records(&self, ids: &[String]) -> Result<usize>;
}
