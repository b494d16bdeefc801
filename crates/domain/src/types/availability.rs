//! Persisted availability records and conflict resolution results

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Availability slot a user entered for a group.
///
/// Owned by the surrounding CRUD layer; the engine only reads and deletes
/// these.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityRecord {
    pub id: String,
    pub owner_user: String,
    pub group_id: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

/// Decision produced by the conflict resolver.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConflictResolution {
    /// Ids of records overlapping busy time, to be deleted.
    pub removed: Vec<String>,
    /// Records left untouched.
    pub keep: Vec<AvailabilityRecord>,
}
