//! In-memory mocks for the credential and availability stores

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use rallypoint_core::{AvailabilityStore, CredentialStore};
use rallypoint_domain::{
    AccessCredential, AvailabilityRecord, RallypointError, Result as DomainResult,
};

/// Mutex-backed credential store keyed by user id.
#[derive(Default)]
pub struct MockCredentialStore {
    credentials: Mutex<HashMap<String, AccessCredential>>,
}

impl MockCredentialStore {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Store holding one credential expiring `expires_in` after the fixture
    /// clock's "now".
    pub fn with_credential(user_id: &str, expires_in: Duration, refresh_token: Option<&str>) -> Self {
        let store = Self::default();
        store.credentials.lock().unwrap().insert(
            user_id.to_string(),
            AccessCredential {
                access_token: "stored-token".to_string(),
                refresh_token: refresh_token.map(str::to_string),
                expires_at: super::now() + expires_in,
            },
        );
        store
    }

    pub fn credential(&self, user_id: &str) -> Option<AccessCredential> {
        self.credentials.lock().unwrap().get(user_id).cloned()
    }
}

#[async_trait]
impl CredentialStore for MockCredentialStore {
    async fn get_credential(&self, user_id: &str) -> DomainResult<Option<AccessCredential>> {
        Ok(self.credential(user_id))
    }

    async fn update_access_token(
        &self,
        user_id: &str,
        access_token: &str,
        expires_at: DateTime<Utc>,
    ) -> DomainResult<()> {
        let mut credentials = self.credentials.lock().unwrap();
        let credential = credentials
            .get_mut(user_id)
            .ok_or_else(|| RallypointError::NotFound(format!("credential for {user_id}")))?;
        credential.access_token = access_token.to_string();
        credential.expires_at = expires_at;
        Ok(())
    }
}

/// Mutex-backed availability store.
///
/// `fail_deletes` makes every delete fail without touching the records,
/// matching the all-or-nothing contract of the real store.
#[derive(Default)]
pub struct MockAvailabilityStore {
    records: Mutex<Vec<AvailabilityRecord>>,
    fail_deletes: AtomicBool,
}

impl MockAvailabilityStore {
    pub fn new(records: Vec<AvailabilityRecord>) -> Self {
        Self { records: Mutex::new(records), fail_deletes: AtomicBool::new(false) }
    }

    pub fn failing_deletes(self) -> Self {
        self.fail_deletes.store(true, Ordering::SeqCst);
        self
    }

    pub fn ids(&self) -> Vec<String> {
        self.records.lock().unwrap().iter().map(|r| r.id.clone()).collect()
    }
}

pub fn record(id: &str, group_id: &str, start: DateTime<Utc>, end: DateTime<Utc>) -> AvailabilityRecord {
    AvailabilityRecord {
        id: id.to_string(),
        owner_user: "user-1".to_string(),
        group_id: group_id.to_string(),
        start,
        end,
    }
}

#[async_trait]
impl AvailabilityStore for MockAvailabilityStore {
    async fn query_records(
        &self,
        owner_id: &str,
        group_id: Option<&str>,
        range_start: DateTime<Utc>,
        range_end: DateTime<Utc>,
    ) -> DomainResult<Vec<AvailabilityRecord>> {
        Ok(self
            .records
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.owner_user == owner_id)
            .filter(|r| group_id.map_or(true, |g| r.group_id == g))
            .filter(|r| r.start < range_end && r.end > range_start)
            .cloned()
            .collect())
    }

    async fn delete_records(&self, ids: &[String]) -> DomainResult<usize> {
        if self.fail_deletes.load(Ordering::SeqCst) {
            return Err(RallypointError::Database("database is locked".into()));
        }
        let mut records = self.records.lock().unwrap();
        let before = records.len();
        records.retain(|r| !ids.contains(&r.id));
        Ok(before - records.len())
    }
}
