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

//! Ordered row storage for a single table, split into committed and staged rows.

use mib_common::{ErrorStatus, OrderedKey};
use std::collections::BTreeMap;
use std::ops::Bound;
use thiserror::Error;

use crate::row::{Row, RowFields};

#[derive(Error, Debug, Clone, Eq, PartialEq)]
pub enum StoreError {
    #[error("Duplicate key: {0}")]
    DuplicateKey(OrderedKey),
    #[error("Row is not staged: {0}")]
    NotStaged(OrderedKey),
}

impl From<StoreError> for ErrorStatus {
    fn from(_: StoreError) -> Self {
        ErrorStatus::GenError
    }
}

/// Which of the two collections holds a row.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum Location {
    Committed,
    Staging,
}

/// The rows of one table.
///
/// Committed rows are what reads and persistence see. Staged rows exist only between the
/// CREATE that made them and the end of the PDU that created them. A key is unique across both.
#[derive(Debug, Clone)]
pub struct RowStore<F> {
    committed: BTreeMap<OrderedKey, Row<F>>,
    staging: BTreeMap<OrderedKey, Row<F>>,
}

impl<F> Default for RowStore<F> {
    fn default() -> Self {
        Self {
            committed: BTreeMap::new(),
            staging: BTreeMap::new(),
        }
    }
}

impl<F: RowFields> RowStore<F> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, key: &OrderedKey) -> bool {
        self.committed.contains_key(key) || self.staging.contains_key(key)
    }

    /// Stage a freshly created row. Fails if the key is already in use in either collection.
    pub fn insert_staging(&mut self, row: Row<F>) -> Result<(), StoreError> {
        if self.contains(row.key()) {
            return Err(StoreError::DuplicateKey(row.key().clone()));
        }
        self.staging.insert(row.key().clone(), row);
        Ok(())
    }

    /// Insert directly into the committed set, as when loading persisted rows.
    pub fn insert_committed(&mut self, row: Row<F>) -> Result<(), StoreError> {
        if self.contains(row.key()) {
            return Err(StoreError::DuplicateKey(row.key().clone()));
        }
        self.committed.insert(row.key().clone(), row);
        Ok(())
    }

    /// Exact lookup, committed rows first, then staged ones.
    pub fn find(&self, key: &OrderedKey) -> Option<&Row<F>> {
        self.committed.get(key).or_else(|| self.staging.get(key))
    }

    pub fn find_mut(&mut self, key: &OrderedKey) -> Option<&mut Row<F>> {
        match self.committed.get_mut(key) {
            Some(row) => Some(row),
            None => self.staging.get_mut(key),
        }
    }

    pub fn locate(&self, key: &OrderedKey) -> Option<Location> {
        if self.committed.contains_key(key) {
            Some(Location::Committed)
        } else if self.staging.contains_key(key) {
            Some(Location::Staging)
        } else {
            None
        }
    }

    /// Exact lookup among committed rows only.
    pub fn get_committed(&self, key: &OrderedKey) -> Option<&Row<F>> {
        self.committed.get(key)
    }

    /// The committed row with the least key strictly greater than `key`.
    pub fn find_next(&self, key: &OrderedKey) -> Option<&Row<F>> {
        self.committed
            .range((Bound::Excluded(key), Bound::Unbounded))
            .next()
            .map(|(_, row)| row)
    }

    /// The committed row with the least key.
    pub fn first(&self) -> Option<&Row<F>> {
        self.committed.values().next()
    }

    /// Move a staged row into the committed set.
    pub fn promote(&mut self, key: &OrderedKey) -> Result<(), StoreError> {
        let row = self
            .staging
            .remove(key)
            .ok_or_else(|| StoreError::NotStaged(key.clone()))?;
        self.committed.insert(key.clone(), row);
        Ok(())
    }

    /// Promote every staged row, returning the promoted keys in order.
    pub fn promote_all(&mut self) -> Vec<OrderedKey> {
        let staged = std::mem::take(&mut self.staging);
        let keys = staged.keys().cloned().collect();
        self.committed.extend(staged);
        keys
    }

    /// Remove a row from whichever collection holds it.
    pub fn remove(&mut self, key: &OrderedKey) -> Option<(Location, Row<F>)> {
        if let Some(row) = self.committed.remove(key) {
            return Some((Location::Committed, row));
        }
        self.staging.remove(key).map(|row| (Location::Staging, row))
    }

    /// Committed rows in key order.
    pub fn committed(&self) -> impl Iterator<Item = &Row<F>> {
        self.committed.values()
    }

    /// Staged rows in key order.
    pub fn staged(&self) -> impl Iterator<Item = &Row<F>> {
        self.staging.values()
    }

    pub fn committed_len(&self) -> usize {
        self.committed.len()
    }

    pub fn staged_len(&self) -> usize {
        self.staging.len()
    }
}
