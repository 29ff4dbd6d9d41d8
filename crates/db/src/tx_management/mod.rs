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

//! The state of one in-flight SET PDU.
//!
//! Everything a PDU accumulates between its first SET and its final COMMIT or UNDO lives in a
//! `Transaction`, one slot per table the PDU touches. Nothing survives the PDU.
//!
//! A transaction may defer batch completion: a table whose pending count reaches zero is then
//! only marked ready, and its staged rows are promoted and persisted when the driver calls
//! `finish` after every varbind of the PDU has committed.

use ahash::AHashMap;
use mib_common::{ErrorStatus, OrderedKey, RowStatus, StorageType};
use std::any::Any;
use std::collections::{BTreeMap, BTreeSet};
use tracing::error;

use crate::row::Row;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Ord, PartialOrd, Hash)]
pub struct TxId(pub u64);

/// A committed row as it was before this PDU first wrote to it.
#[derive(Debug, Clone)]
pub(crate) struct PreImage<F> {
    pub(crate) fields: F,
    pub(crate) storage_type: StorageType,
    pub(crate) row_status: RowStatus,
}

/// Per-table bookkeeping for one transaction.
#[derive(Debug)]
pub(crate) struct TableTx<F> {
    /// Rows written by this PDU, in key order.
    pub(crate) touched: BTreeSet<OrderedKey>,
    /// Committed rows destroyed by this PDU, kept until the batch completes.
    pub(crate) destroyed: BTreeMap<OrderedKey, Row<F>>,
    pub(crate) pre_images: BTreeMap<OrderedKey, PreImage<F>>,
}

impl<F> Default for TableTx<F> {
    fn default() -> Self {
        Self {
            touched: BTreeSet::new(),
            destroyed: BTreeMap::new(),
            pre_images: BTreeMap::new(),
        }
    }
}

struct TableSlot {
    commit_pending: i64,
    state: Box<dyn Any + Send>,
}

/// One PDU's worth of pending table mutations.
pub struct Transaction {
    id: TxId,
    tables: AHashMap<&'static str, TableSlot>,
    defer_completion: bool,
    ready: BTreeSet<&'static str>,
}

impl Transaction {
    pub fn new(id: TxId) -> Self {
        Self {
            id,
            tables: AHashMap::new(),
            defer_completion: false,
            ready: BTreeSet::new(),
        }
    }

    /// Hold every table's batch back until `finish` is called for it.
    pub fn defer_completion(&mut self) {
        self.defer_completion = true;
    }

    pub fn defers_completion(&self) -> bool {
        self.defer_completion
    }

    pub fn id(&self) -> TxId {
        self.id
    }

    /// Number of SET/CREATE operations on `table` still awaiting their COMMIT.
    pub fn pending(&self, table: &str) -> i64 {
        self.tables.get(table).map_or(0, |s| s.commit_pending)
    }

    /// True once every table touched by this transaction has committed or undone everything.
    pub fn is_settled(&self) -> bool {
        self.tables.values().all(|s| s.commit_pending == 0)
    }

    fn slot<F: Send + 'static>(&mut self, table: &'static str) -> &mut TableSlot {
        self.tables.entry(table).or_insert_with(|| TableSlot {
            commit_pending: 0,
            state: Box::new(TableTx::<F>::default()),
        })
    }

    pub(crate) fn table<F: Send + 'static>(
        &mut self,
        table: &'static str,
    ) -> Result<&mut TableTx<F>, ErrorStatus> {
        self.slot::<F>(table)
            .state
            .downcast_mut::<TableTx<F>>()
            .ok_or_else(|| {
                error!(table, "Transaction slot holds rows of a different type");
                ErrorStatus::GenError
            })
    }

    pub(crate) fn begin_op<F: Send + 'static>(&mut self, table: &'static str) {
        self.slot::<F>(table).commit_pending += 1;
    }

    /// Count one COMMIT, returning the number of operations still pending.
    pub(crate) fn end_op<F: Send + 'static>(&mut self, table: &'static str) -> i64 {
        let slot = self.slot::<F>(table);
        slot.commit_pending -= 1;
        slot.commit_pending
    }

    pub(crate) fn reset<F: Send + 'static>(&mut self, table: &'static str) {
        self.slot::<F>(table).commit_pending = 0;
    }

    pub(crate) fn mark_ready(&mut self, table: &'static str) {
        self.ready.insert(table);
    }

    /// Whether `table` had a deferred batch waiting, clearing the mark.
    pub(crate) fn take_ready(&mut self, table: &'static str) -> bool {
        self.ready.remove(table)
    }

    /// Take the table's accumulated state, leaving a fresh one behind.
    pub(crate) fn take_table<F: Send + 'static>(
        &mut self,
        table: &'static str,
    ) -> Result<TableTx<F>, ErrorStatus> {
        Ok(std::mem::take(self.table::<F>(table)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pending_counter() {
        let mut tx = Transaction::new(TxId(1));
        assert_eq!(tx.pending("t"), 0);
        tx.begin_op::<()>("t");
        tx.begin_op::<()>("t");
        tx.begin_op::<()>("u");
        assert_eq!(tx.pending("t"), 2);
        assert_eq!(tx.end_op::<()>("t"), 1);
        assert!(!tx.is_settled());
        tx.reset::<()>("t");
        assert_eq!(tx.end_op::<()>("u"), 0);
        assert!(tx.is_settled());
    }

    #[test]
    fn test_slot_type_mismatch_is_gen_error() {
        let mut tx = Transaction::new(TxId(2));
        tx.table::<u32>("t").unwrap();
        assert_eq!(tx.table::<String>("t").err(), Some(ErrorStatus::GenError));
    }

    #[test]
    fn test_take_table_resets_state() {
        let mut tx = Transaction::new(TxId(3));
        tx.table::<u8>("t")
            .unwrap()
            .touched
            .insert(OrderedKey::from_implied(b"a"));
        let taken = tx.take_table::<u8>("t").unwrap();
        assert_eq!(taken.touched.len(), 1);
        assert!(tx.table::<u8>("t").unwrap().touched.is_empty());
        assert!(tx.take_table::<u16>("t").is_err());
    }

    #[test]
    fn test_ready_marks_are_taken_once() {
        let mut tx = Transaction::new(TxId(4));
        assert!(!tx.defers_completion());
        tx.defer_completion();
        assert!(tx.defers_completion());
        tx.mark_ready("t");
        assert!(!tx.take_ready("u"));
        assert!(tx.take_ready("t"));
        assert!(!tx.take_ready("t"));
    }
}
