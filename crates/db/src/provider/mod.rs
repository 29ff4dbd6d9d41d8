// Copyright (C) 2025 Ryan Daum <ryan.daum@gmail.com> This program is free
// software: you can redistribute it and/or modify it under the terms of the GNU
// General Public License as published by the Free Software Foundation, version
// 3.
//
// This program is distributed in the hope that it will be useful, but WITHOUT
// ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS
// FOR A PARTICULAR PURPOSE. See the GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License along with
// this program. If not, see <https://www.gnu.org/licenses/>.
//

use mib_common::OrderedKey;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use thiserror::Error;

pub mod fjall_provider;

#[derive(Error, Debug, Clone, Eq, PartialEq)]
pub enum PersistenceError {
    #[error("Could not open row store: {0}")]
    OpenFailure(String),
    #[error("Failed to write row {key} of {file_id}: {reason}")]
    WriteFailure {
        file_id: String,
        key: OrderedKey,
        reason: String,
    },
    #[error("Failed to read rows of {file_id}: {reason}")]
    ReadFailure { file_id: String, reason: String },
    #[error("Failed to sync row store: {0}")]
    SyncFailure(String),
    #[error("Encoding error: {0}")]
    EncodingFailure(String),
}

/// Durable storage for committed rows.
///
/// Rows are addressed by the table's file id and the row key; a backend must return loaded rows
/// in key order. Records are opaque to the backend.
pub trait Persistence: Send + Sync {
    fn save(&self, file_id: &str, key: &OrderedKey, record: &[u8])
    -> Result<(), PersistenceError>;

    fn remove(&self, file_id: &str, key: &OrderedKey) -> Result<(), PersistenceError>;

    fn load(&self, file_id: &str) -> Result<Vec<(OrderedKey, Vec<u8>)>, PersistenceError>;

    /// Make everything written so far durable.
    fn flush(&self) -> Result<(), PersistenceError> {
        Ok(())
    }
}

/// Keeps rows in memory. Clones share the same contents.
#[derive(Clone, Default)]
pub struct MemoryPersistence {
    rows: Arc<Mutex<BTreeMap<(String, OrderedKey), Vec<u8>>>>,
    writes: Arc<Mutex<Vec<(String, OrderedKey)>>>,
    failing: Arc<AtomicBool>,
}

impl MemoryPersistence {
    /// Make every subsequent write fail.
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Every successful save, in the order it happened.
    pub fn writes(&self) -> Vec<(String, OrderedKey)> {
        self.writes
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    pub fn keys(&self, file_id: &str) -> Vec<OrderedKey> {
        self.rows
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .keys()
            .filter(|(f, _)| f == file_id)
            .map(|(_, k)| k.clone())
            .collect()
    }

    fn check(&self, file_id: &str, key: &OrderedKey) -> Result<(), PersistenceError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(PersistenceError::WriteFailure {
                file_id: file_id.to_string(),
                key: key.clone(),
                reason: "store marked failing".to_string(),
            });
        }
        Ok(())
    }
}

impl Persistence for MemoryPersistence {
    fn save(
        &self,
        file_id: &str,
        key: &OrderedKey,
        record: &[u8],
    ) -> Result<(), PersistenceError> {
        self.check(file_id, key)?;
        self.rows
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert((file_id.to_string(), key.clone()), record.to_vec());
        self.writes
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push((file_id.to_string(), key.clone()));
        Ok(())
    }

    fn remove(&self, file_id: &str, key: &OrderedKey) -> Result<(), PersistenceError> {
        self.check(file_id, key)?;
        self.rows
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .remove(&(file_id.to_string(), key.clone()));
        Ok(())
    }

    fn load(&self, file_id: &str) -> Result<Vec<(OrderedKey, Vec<u8>)>, PersistenceError> {
        Ok(self
            .rows
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .iter()
            .filter(|((f, _), _)| f == file_id)
            .map(|((_, k), v)| (k.clone(), v.clone()))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_memory_persistence_is_keyed_per_file() {
        let store = MemoryPersistence::default();
        let a = OrderedKey::from_implied(b"a");
        let b = OrderedKey::from_implied(b"b");
        store.save("one", &b, b"2").unwrap();
        store.save("one", &a, b"1").unwrap();
        store.save("two", &a, b"x").unwrap();

        let loaded = store.load("one").unwrap();
        assert_eq!(loaded, vec![(a.clone(), b"1".to_vec()), (b.clone(), b"2".to_vec())]);

        store.remove("one", &a).unwrap();
        assert_eq!(store.keys("one"), vec![b]);
        assert_eq!(store.keys("two"), vec![a]);
        assert_eq!(store.writes().len(), 3);
    }

    #[test]
    fn test_failing_store_rejects_writes() {
        let store = MemoryPersistence::default();
        store.set_failing(true);
        let key = OrderedKey::from_implied(b"a");
        assert!(matches!(
            store.save("one", &key, b"1"),
            Err(PersistenceError::WriteFailure { .. })
        ));
        assert!(store.load("one").unwrap().is_empty());
    }
}
