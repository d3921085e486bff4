//! Per-occurrence completion ledger.
//!
//! A recurring template has no single "completed" flag; every date it appears
//! on is tracked separately, keyed by [`InstanceKey`]. A missing record means
//! "not completed", so marking an occurrence incomplete deletes its record.

use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use uuid::Uuid;

use crate::error::CoreError;
use crate::models::{CompletionRecord, InstanceKey};
use crate::repository::LedgerRepository;

/// Storage port behind the ledger.
///
/// Implementations are synchronous: either in-memory or loaded in full before
/// the engine runs.
pub trait CompletionStore {
    fn get(&self, key: &InstanceKey) -> Result<Option<CompletionRecord>, CoreError>;
    /// Inserts or replaces the record for `record.key()`.
    fn set(&mut self, record: CompletionRecord) -> Result<(), CoreError>;
    /// Removes the record for `key`. Removing a missing key is not an error.
    fn delete(&mut self, key: &InstanceKey) -> Result<(), CoreError>;
    fn list(&self) -> Result<Vec<CompletionRecord>, CoreError>;
}

/// In-memory store, ordered by task then date.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    records: BTreeMap<InstanceKey, CompletionRecord>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a store from a persisted snapshot. Later duplicates of a key
    /// replace earlier ones.
    pub fn from_records(records: impl IntoIterator<Item = CompletionRecord>) -> Self {
        Self {
            records: records.into_iter().map(|r| (r.key(), r)).collect(),
        }
    }
}

impl CompletionStore for MemoryStore {
    fn get(&self, key: &InstanceKey) -> Result<Option<CompletionRecord>, CoreError> {
        Ok(self.records.get(key).cloned())
    }

    fn set(&mut self, record: CompletionRecord) -> Result<(), CoreError> {
        self.records.insert(record.key(), record);
        Ok(())
    }

    fn delete(&mut self, key: &InstanceKey) -> Result<(), CoreError> {
        self.records.remove(key);
        Ok(())
    }

    fn list(&self) -> Result<Vec<CompletionRecord>, CoreError> {
        Ok(self.records.values().cloned().collect())
    }
}

#[derive(Debug, Clone, Default)]
pub struct CompletionLedger<S = MemoryStore> {
    store: S,
}

impl<S: CompletionStore> CompletionLedger<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn mark_complete(&mut self, key: InstanceKey) -> Result<CompletionRecord, CoreError> {
        self.mark_complete_at(key, Utc::now())
    }

    /// Upserts a completed record. Repeated calls overwrite `completed_at`.
    pub fn mark_complete_at(
        &mut self,
        key: InstanceKey,
        at: DateTime<Utc>,
    ) -> Result<CompletionRecord, CoreError> {
        let record = CompletionRecord::completed(key, at);
        self.store.set(record.clone())?;
        tracing::debug!(instance = %key, "marked occurrence complete");
        Ok(record)
    }

    pub fn mark_incomplete(&mut self, key: InstanceKey) -> Result<(), CoreError> {
        self.store.delete(&key)?;
        tracing::debug!(instance = %key, "marked occurrence incomplete");
        Ok(())
    }

    /// Flips the occurrence's state and returns the new one.
    pub fn toggle(&mut self, key: InstanceKey) -> Result<bool, CoreError> {
        if self.is_complete(&key) {
            self.mark_incomplete(key)?;
            Ok(false)
        } else {
            self.mark_complete(key)?;
            Ok(true)
        }
    }

    /// The stored record, if any. Read failures are logged and reported as
    /// "no record".
    pub fn completion(&self, key: &InstanceKey) -> Option<CompletionRecord> {
        match self.store.get(key) {
            Ok(record) => record.filter(|r| r.is_completed),
            Err(e) => {
                tracing::warn!(instance = %key, error = %e, "completion lookup failed, treating as incomplete");
                None
            }
        }
    }

    pub fn is_complete(&self, key: &InstanceKey) -> bool {
        self.completion(key).is_some()
    }

    pub fn list_all(&self) -> Result<Vec<CompletionRecord>, CoreError> {
        self.store.list()
    }

    pub fn clear_all(&mut self) -> Result<usize, CoreError> {
        let records = self.store.list()?;
        for record in &records {
            self.store.delete(&record.key())?;
        }
        tracing::debug!(removed = records.len(), "cleared completion ledger");
        Ok(records.len())
    }

    /// Removes every record belonging to `task_id`, returning how many went.
    pub fn clear_for_task(&mut self, task_id: Uuid) -> Result<usize, CoreError> {
        let keys: Vec<InstanceKey> = self
            .store
            .list()?
            .into_iter()
            .filter(|r| r.task_id == task_id)
            .map(|r| r.key())
            .collect();
        for key in &keys {
            self.store.delete(key)?;
        }
        tracing::debug!(task_id = %task_id, removed = keys.len(), "cleared task completions");
        Ok(keys.len())
    }

    /// Writes the full record list through `repo`.
    pub async fn save<R: LedgerRepository + ?Sized>(&self, repo: &R) -> Result<(), CoreError> {
        let records = self.store.list()?;
        repo.save_records(&records).await
    }
}

impl CompletionLedger<MemoryStore> {
    pub fn in_memory() -> Self {
        Self::new(MemoryStore::new())
    }

    /// Loads the full record list from `repo` into memory.
    pub async fn load<R: LedgerRepository + ?Sized>(repo: &R) -> Result<Self, CoreError> {
        let records = repo.load_records().await?;
        tracing::debug!(records = records.len(), "loaded completion ledger");
        Ok(Self::new(MemoryStore::from_records(records)))
    }
}
