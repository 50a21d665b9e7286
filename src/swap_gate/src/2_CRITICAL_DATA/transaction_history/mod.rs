//! # Transaction History
//!
//! Address-keyed, newest-first list of settled swap records. Each requester's
//! records live under one key (`<namespace>_<address>`) in a simple keyed
//! store as a JSON array; amounts are written as decimal strings.
//!
//! ## Guarantees
//! - Only fully-populated records are ever written
//! - Read-modify-write cycles are serialized, so concurrent prepends and
//!   status updates cannot drop each other's changes
//! - Corrupted stored data is reported, never silently discarded

use std::sync::{Arc, Mutex, MutexGuard};

use dashmap::DashMap;
use log::{debug, info};

use crate::infrastructure::errors::{Result, StorageError, SystemError};
use crate::types::{TransactionRecord, TransactionStatus};

/// Minimal keyed string store (browser-storage style)
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: String);
    fn remove(&self, key: &str);
}

/// In-process store; no durability
#[derive(Debug, Default)]
pub struct MemoryKeyValueStore {
    entries: DashMap<String, String>,
}

impl MemoryKeyValueStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl KeyValueStore for MemoryKeyValueStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).map(|v| v.value().clone())
    }

    fn set(&self, key: &str, value: String) {
        self.entries.insert(key.to_string(), value);
    }

    fn remove(&self, key: &str) {
        self.entries.remove(key);
    }
}

pub struct TransactionHistory {
    store: Arc<dyn KeyValueStore>,
    namespace: String,
    write_lock: Mutex<()>,
}

impl TransactionHistory {
    pub fn new(store: Arc<dyn KeyValueStore>, namespace: impl Into<String>) -> Self {
        Self {
            store,
            namespace: namespace.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn key_for(&self, address: &str) -> String {
        format!("{}_{}", self.namespace, address)
    }

    /// Records for `address`, newest first; empty when nothing is stored
    pub fn load(&self, address: &str) -> Result<Vec<TransactionRecord>> {
        let key = self.key_for(address);
        match self.store.get(&key) {
            None => Ok(Vec::new()),
            Some(raw) => serde_json::from_str(&raw).map_err(|e| {
                StorageError::Deserialization { key, reason: e.to_string() }.into()
            }),
        }
    }

    /// Insert a new record at the head of the requester's list
    pub fn prepend(&self, address: &str, record: TransactionRecord) -> Result<()> {
        let _write = self.lock_writes()?;

        let mut records = self.load(address)?;
        let id = record.id.clone();
        records.insert(0, record);
        self.save(address, &records)?;

        debug!("💾 Stored {} for {} ({} records)", id, address, records.len());
        Ok(())
    }

    /// Apply `pending → confirmed | failed` to one record
    pub fn update_status(
        &self,
        address: &str,
        id: &str,
        status: TransactionStatus,
    ) -> Result<TransactionRecord> {
        let _write = self.lock_writes()?;

        let mut records = self.load(address)?;
        let record = records
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or_else(|| StorageError::RecordNotFound {
                address: address.to_string(),
                id: id.to_string(),
            })?;

        if !record.status.can_transition_to(status) {
            return Err(StorageError::InvalidStatusTransition {
                id: id.to_string(),
                from: record.status.to_string(),
                to: status.to_string(),
            }
            .into());
        }

        record.status = status;
        let updated = record.clone();
        self.save(address, &records)?;

        info!("✅ Transaction {} marked {}", id, status);
        Ok(updated)
    }

    /// Remove the requester's entire collection
    pub fn clear(&self, address: &str) -> Result<()> {
        let _write = self.lock_writes()?;
        self.store.remove(&self.key_for(address));
        info!("🗑️ Cleared transaction history for {}", address);
        Ok(())
    }

    fn save(&self, address: &str, records: &[TransactionRecord]) -> Result<()> {
        let key = self.key_for(address);
        let raw = serde_json::to_string(records).map_err(|e| StorageError::Serialization {
            key: key.clone(),
            reason: e.to_string(),
        })?;
        self.store.set(&key, raw);
        Ok(())
    }

    fn lock_writes(&self) -> Result<MutexGuard<'_, ()>> {
        self.write_lock.lock().map_err(|_| {
            SystemError::StateCorrupted {
                reason: "transaction history write lock poisoned".to_string(),
            }
            .into()
        })
    }
}
