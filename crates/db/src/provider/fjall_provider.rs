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

//! Row persistence on a fjall keyspace, one partition per table.

use fjall::{Config, Keyspace, PartitionCreateOptions, PartitionHandle};
use mib_common::OrderedKey;
use std::collections::HashMap;
use std::path::Path;
use std::sync::Mutex;
use tracing::{debug, error, warn};

use crate::provider::{Persistence, PersistenceError};

pub struct FjallPersistence {
    keyspace: Keyspace,
    partitions: Mutex<HashMap<String, PartitionHandle>>,
    options: HashMap<String, PartitionCreateOptions>,
}

impl FjallPersistence {
    /// Open (or create) a keyspace under `path`. Also reports whether it was freshly created.
    pub fn open(path: &Path) -> Result<(Self, bool), PersistenceError> {
        let keyspace = Config::new(path).open().map_err(|e| {
            error!("Failed to open row store at {path:?}: {e:?}");
            PersistenceError::OpenFailure(e.to_string())
        })?;
        let fresh = keyspace.partition_count() == 0;
        debug!(?path, fresh, "Opened row store");
        Ok((
            Self {
                keyspace,
                partitions: Mutex::new(HashMap::new()),
                options: HashMap::new(),
            },
            fresh,
        ))
    }

    /// Creation options for the partition holding `file_id`, used the first time it is opened.
    pub fn with_partition_options(mut self, file_id: &str, options: PartitionCreateOptions) -> Self {
        self.options.insert(file_id.to_string(), options);
        self
    }

    fn partition(&self, file_id: &str) -> Result<PartitionHandle, PersistenceError> {
        let mut partitions = self.partitions.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(partition) = partitions.get(file_id) {
            return Ok(partition.clone());
        }
        let partition = self
            .keyspace
            .open_partition(
                file_id,
                self.options.get(file_id).cloned().unwrap_or_default(),
            )
            .map_err(|e| {
                error!("Failed to open partition {file_id}: {e:?}");
                PersistenceError::OpenFailure(e.to_string())
            })?;
        partitions.insert(file_id.to_string(), partition.clone());
        Ok(partition)
    }
}

impl Persistence for FjallPersistence {
    fn save(
        &self,
        file_id: &str,
        key: &OrderedKey,
        record: &[u8],
    ) -> Result<(), PersistenceError> {
        self.partition(file_id)?
            .insert(key.encode(), record)
            .map_err(|e| PersistenceError::WriteFailure {
                file_id: file_id.to_string(),
                key: key.clone(),
                reason: e.to_string(),
            })
    }

    fn remove(&self, file_id: &str, key: &OrderedKey) -> Result<(), PersistenceError> {
        self.partition(file_id)?
            .remove(key.encode())
            .map_err(|e| PersistenceError::WriteFailure {
                file_id: file_id.to_string(),
                key: key.clone(),
                reason: e.to_string(),
            })
    }

    fn load(&self, file_id: &str) -> Result<Vec<(OrderedKey, Vec<u8>)>, PersistenceError> {
        let read_failure = |reason: String| PersistenceError::ReadFailure {
            file_id: file_id.to_string(),
            reason,
        };
        let mut rows = vec![];
        for entry in self.partition(file_id)?.iter() {
            let (key, value) = entry.map_err(|e| read_failure(e.to_string()))?;
            let Some(key) = OrderedKey::decode(key.as_ref()) else {
                warn!(file_id, "Skipping record with malformed key");
                continue;
            };
            rows.push((key, value.to_vec()));
        }
        Ok(rows)
    }

    fn flush(&self) -> Result<(), PersistenceError> {
        self.keyspace
            .persist(fjall::PersistMode::SyncAll)
            .map_err(|e| {
                error!("Failed to persist row store: {e:?}");
                PersistenceError::SyncFailure(e.to_string())
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    // Verify creation of an empty store, then reopening it.
    #[test]
    fn open_reopen() {
        let tmpdir = tempfile::tempdir().expect("Unable to create temporary directory");
        let path = tmpdir.path();
        {
            let (store, fresh) = FjallPersistence::open(path).unwrap();
            assert!(fresh);
            assert!(store.load("snmp_community").unwrap().is_empty());
        }
        {
            let (store, fresh) = FjallPersistence::open(path).unwrap();
            assert!(!fresh);
            assert!(store.load("snmp_community").unwrap().is_empty());
        }
    }

    // Rows come back in key order after a reopen, and removals stick.
    #[test]
    fn save_load_in_key_order() {
        let tmpdir = tempfile::tempdir().expect("Unable to create temporary directory");
        let path = tmpdir.path();
        let keys = ["public", "private", "monitor"].map(|k| OrderedKey::from_implied(k.as_bytes()));
        {
            let (store, _) = FjallPersistence::open(path).unwrap();
            for (i, key) in keys.iter().enumerate() {
                store.save("snmp_community", key, &[i as u8]).unwrap();
            }
            store.save("snmp_target_addr", &keys[0], b"other").unwrap();
            store.remove("snmp_community", &keys[1]).unwrap();
            store.flush().unwrap();
        }
        {
            let (store, _) = FjallPersistence::open(path).unwrap();
            let loaded = store.load("snmp_community").unwrap();
            assert_eq!(
                loaded,
                vec![(keys[2].clone(), vec![2]), (keys[0].clone(), vec![0])]
            );
            assert_eq!(store.load("snmp_target_addr").unwrap().len(), 1);
        }
    }
}
