//! Process record storage.

use super::record::ProcessRecord;
use crate::error::{RedactorError, RedactorResult};
use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};
use uuid::Uuid;

/// Returns true once `retention` has fully elapsed since `created_at`.
pub fn is_expired(created_at: DateTime<Utc>, now: DateTime<Utc>, retention: Duration) -> bool {
    now - created_at > retention
}

/// Storage for process records, injected into the service layer.
pub trait ProcessStore: Send + Sync {
    /// Inserts a new record. Fails if the identifier is already taken.
    fn create(&self, record: ProcessRecord) -> RedactorResult<()>;

    fn get(&self, id: Uuid) -> RedactorResult<ProcessRecord>;

    /// Replaces an existing record.
    fn update(&self, record: ProcessRecord) -> RedactorResult<()>;

    fn delete(&self, id: Uuid) -> RedactorResult<ProcessRecord>;

    fn list(&self) -> Vec<Uuid>;

    /// Removes and returns every record older than `retention`.
    fn sweep(&self, now: DateTime<Utc>, retention: Duration) -> Vec<ProcessRecord>;
}

/// Process-local store. Contents do not survive a restart.
#[derive(Debug, Default)]
pub struct InMemoryProcessStore {
    records: RwLock<HashMap<Uuid, ProcessRecord>>,
}

impl InMemoryProcessStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl ProcessStore for InMemoryProcessStore {
    fn create(&self, record: ProcessRecord) -> RedactorResult<()> {
        let mut records = self.records.write().unwrap_or_else(PoisonError::into_inner);
        if records.contains_key(&record.id) {
            return Err(RedactorError::InvalidInput {
                parameter: "id".to_string(),
                reason: format!("process '{}' already exists", record.id),
            });
        }
        records.insert(record.id, record);
        Ok(())
    }

    fn get(&self, id: Uuid) -> RedactorResult<ProcessRecord> {
        self.records
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&id)
            .cloned()
            .ok_or(RedactorError::ProcessNotFound { id })
    }

    fn update(&self, record: ProcessRecord) -> RedactorResult<()> {
        let mut records = self.records.write().unwrap_or_else(PoisonError::into_inner);
        match records.get_mut(&record.id) {
            Some(slot) => {
                *slot = record;
                Ok(())
            }
            None => Err(RedactorError::ProcessNotFound { id: record.id }),
        }
    }

    fn delete(&self, id: Uuid) -> RedactorResult<ProcessRecord> {
        self.records
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&id)
            .ok_or(RedactorError::ProcessNotFound { id })
    }

    fn list(&self) -> Vec<Uuid> {
        let records = self.records.read().unwrap_or_else(PoisonError::into_inner);
        let mut ids: Vec<(DateTime<Utc>, Uuid)> =
            records.values().map(|r| (r.created_at, r.id)).collect();
        ids.sort();
        ids.into_iter().map(|(_, id)| id).collect()
    }

    fn sweep(&self, now: DateTime<Utc>, retention: Duration) -> Vec<ProcessRecord> {
        let mut records = self.records.write().unwrap_or_else(PoisonError::into_inner);
        let expired: Vec<Uuid> = records
            .values()
            .filter(|r| is_expired(r.created_at, now, retention))
            .map(|r| r.id)
            .collect();

        expired
            .into_iter()
            .filter_map(|id| records.remove(&id))
            .collect()
    }
}
