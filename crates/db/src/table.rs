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

use mib_common::{ErrorStatus, Oid, OrderedKey, RowStatusAction, StorageType, Value};
use std::sync::Arc;
use tracing::{debug, error, warn};

use crate::descriptor::{ColumnAccessor, ColumnDef, ColumnRole, TableDescriptor};
use crate::identity::EngineIdentity;
use crate::provider::{Persistence, PersistenceError};
use crate::row::{Row, RowFields};
use crate::store::RowStore;

/// A management table: its descriptor, its rows, and the collaborators it talks to.
///
/// The write path (CREATE / SET / COMMIT / UNDO) lives in `coordinator`, the read path
/// (GET / GET-NEXT / GET-BULK) in `walk`.
pub struct Table<F> {
    pub(crate) desc: TableDescriptor<F>,
    pub(crate) store: RowStore<F>,
    pub(crate) identity: Arc<dyn EngineIdentity>,
    pub(crate) persistence: Arc<dyn Persistence>,
}

impl<F: RowFields> Table<F> {
    pub fn new(
        desc: TableDescriptor<F>,
        identity: Arc<dyn EngineIdentity>,
        persistence: Arc<dyn Persistence>,
    ) -> Self {
        Self {
            desc,
            store: RowStore::new(),
            identity,
            persistence,
        }
    }

    pub fn name(&self) -> &'static str {
        self.desc.name
    }

    pub fn entry(&self) -> &Oid {
        &self.desc.entry
    }

    pub fn descriptor(&self) -> &TableDescriptor<F> {
        &self.desc
    }

    pub fn store(&self) -> &RowStore<F> {
        &self.store
    }

    /// Load committed rows from the persistence collaborator. Returns the number of rows loaded.
    ///
    /// Records that fail to decode, or whose key disagrees with their storage key, are skipped.
    pub fn load(&mut self) -> Result<usize, PersistenceError> {
        let mut loaded = 0;
        for (key, record) in self.persistence.load(&self.desc.file_id)? {
            let row: Row<F> = match serde_json::from_slice(&record) {
                Ok(row) => row,
                Err(e) => {
                    warn!(table = self.desc.name, %key, "Skipping undecodable row: {e}");
                    continue;
                }
            };
            if row.key() != &key {
                warn!(table = self.desc.name, %key, "Skipping row stored under a foreign key");
                continue;
            }
            if let Err(e) = self.store.insert_committed(row) {
                warn!(table = self.desc.name, "Skipping row: {e}");
                continue;
            }
            loaded += 1;
        }
        debug!(table = self.desc.name, loaded, "Loaded rows");
        Ok(loaded)
    }

    /// Write a committed row out, or drop it from storage if its class is not persistent.
    /// Failures are logged and otherwise ignored.
    pub(crate) fn persist_row(&self, key: &OrderedKey) {
        let Some(row) = self.store.get_committed(key) else {
            return;
        };
        let result = if row.storage_type().is_persistent() {
            serde_json::to_vec(row)
                .map_err(|e| PersistenceError::EncodingFailure(e.to_string()))
                .and_then(|record| self.persistence.save(&self.desc.file_id, key, &record))
        } else {
            self.persistence.remove(&self.desc.file_id, key)
        };
        if let Err(e) = result {
            error!(table = self.desc.name, %key, "Failed to persist row: {e}");
        }
    }

    pub(crate) fn unpersist_row(&self, key: &OrderedKey) {
        if let Err(e) = self.persistence.remove(&self.desc.file_id, key) {
            error!(table = self.desc.name, %key, "Failed to remove persisted row: {e}");
        }
    }

    pub(crate) fn flush(&self) {
        if let Err(e) = self.persistence.flush() {
            error!(table = self.desc.name, "Failed to flush rows: {e}");
        }
    }

    /// A new row for `key` carrying the table's defaults.
    pub(crate) fn new_row(&self, key: &OrderedKey) -> Row<F> {
        Row::new(
            key.clone(),
            F::defaults(key, self.identity.as_ref()),
            self.desc.default_storage,
        )
    }
}

/// Apply one column write to a row. Row-status writes only record the request.
pub(crate) fn write_column<F>(
    accessor: &dyn ColumnAccessor<F>,
    row: &mut Row<F>,
    column: &ColumnDef,
    value: &Value,
) -> Result<(), ErrorStatus> {
    match column.role {
        ColumnRole::Index => Err(ErrorStatus::ReadOnly),
        ColumnRole::Field => accessor.set(&mut row.fields, column.id, value),
        ColumnRole::StorageType => {
            let requested = value.as_integer().ok_or(ErrorStatus::WrongType)?;
            row.storage_type = StorageType::from_request(requested)?;
            Ok(())
        }
        ColumnRole::RowStatus => {
            let requested = value.as_integer().ok_or(ErrorStatus::WrongType)?;
            let action = RowStatusAction::from_request(requested)?;
            match row.row_flag {
                Some(pending) if pending != action => Err(ErrorStatus::InconsistentValue),
                _ => {
                    row.row_flag = Some(action);
                    Ok(())
                }
            }
        }
    }
}

/// Read one column of a row.
pub(crate) fn read_column<F>(
    accessor: &dyn ColumnAccessor<F>,
    row: &Row<F>,
    column: &ColumnDef,
) -> Option<Value> {
    match column.role {
        ColumnRole::Index => None,
        ColumnRole::Field => accessor.get(&row.fields, column.id),
        ColumnRole::StorageType => Some(Value::Integer(row.storage_type as i32)),
        ColumnRole::RowStatus => Some(Value::Integer(row.row_status as i32)),
    }
}
