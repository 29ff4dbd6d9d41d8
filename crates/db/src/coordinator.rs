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

//! The write path of a table: two-phase SET with COMMIT / UNDO.
//!
//! SET and CREATE stage their effects and count one pending operation each in the transaction.
//! Every COMMIT settles the row-status of the row it names and counts down; the COMMIT that
//! brings the count to zero completes the batch: staged rows are promoted, pending status
//! requests are cleared and touched rows are written to the persistence collaborator. When the
//! transaction defers completion, that last step waits for `finish` instead, so a later failure
//! elsewhere in the PDU can still be undone. UNDO discards staged rows, restores committed rows
//! (destroyed ones included) to their pre-images and zeroes the count.

use mib_common::{ErrorStatus, Oid, OrderedKey, Value};
use std::collections::BTreeSet;
use tracing::{debug, warn};

use crate::descriptor::{ColumnDef, ColumnRole};
use crate::row::RowFields;
use crate::store::Location;
use crate::table::{Table, write_column};
use crate::transition::{self, Outcome};
use crate::tx_management::{PreImage, Transaction};

impl<F: RowFields> Table<F> {
    /// Resolve an instance OID to its key and (writable) column.
    fn write_target(&self, oid: &Oid, value: &Value) -> Result<(OrderedKey, ColumnDef), ErrorStatus> {
        let (column, suffix) = self.desc.split_instance(oid)?;
        let key = self.desc.index.parse(suffix)?;
        let column = self
            .desc
            .column(column)
            .ok_or(ErrorStatus::NoSuchName)?
            .clone();
        column.check_write(value)?;
        Ok((key, column))
    }

    /// Create a row for the instance named by `oid` and apply `value` to it.
    ///
    /// The row is staged only if the value is acceptable; a failed CREATE leaves no trace.
    pub fn create(
        &mut self,
        tx: &mut Transaction,
        oid: &Oid,
        value: &Value,
    ) -> Result<(), ErrorStatus> {
        let (column, suffix) = self.desc.split_instance(oid)?;
        let key = self.desc.index.parse(suffix)?;
        if self.store.contains(&key) {
            warn!(table = self.desc.name, %key, "CREATE of an existing row");
            return Err(ErrorStatus::GenError);
        }
        let column = self
            .desc
            .column(column)
            .ok_or(ErrorStatus::NoSuchName)?
            .clone();
        column.check_write(value)?;

        let mut row = self.new_row(&key);
        write_column(self.desc.accessor.as_ref(), &mut row, &column, value)?;
        self.store.insert_staging(row)?;

        tx.table::<F>(self.desc.name)?.touched.insert(key.clone());
        tx.begin_op::<F>(self.desc.name);
        debug!(table = self.desc.name, %key, column = column.name, "Staged new row");
        Ok(())
    }

    /// Write `value` into an existing row. `NoSuchInstance` if there is no such row.
    fn update(&mut self, tx: &mut Transaction, oid: &Oid, value: &Value) -> Result<(), ErrorStatus> {
        let (key, column) = self.write_target(oid, value)?;
        let location = self
            .store
            .locate(&key)
            .ok_or(ErrorStatus::NoSuchInstance)?;

        let state = tx.table::<F>(self.desc.name)?;
        let row = self
            .store
            .find_mut(&key)
            .ok_or(ErrorStatus::NoSuchInstance)?;
        if location == Location::Committed && !state.pre_images.contains_key(&key) {
            state.pre_images.insert(
                key.clone(),
                PreImage {
                    fields: row.fields.clone(),
                    storage_type: row.storage_type,
                    row_status: row.row_status,
                },
            );
        }
        write_column(self.desc.accessor.as_ref(), row, &column, value)?;

        state.touched.insert(key);
        tx.begin_op::<F>(self.desc.name);
        Ok(())
    }

    /// SET one column. A SET naming a row that does not exist yet creates it.
    pub fn set(&mut self, tx: &mut Transaction, oid: &Oid, value: &Value) -> Result<(), ErrorStatus> {
        match self.update(tx, oid, value) {
            Err(ErrorStatus::NoSuchInstance) => self.create(tx, oid, value),
            result => result,
        }
    }

    /// COMMIT the varbind naming `oid`.
    ///
    /// A row that no longer exists (destroyed by an earlier varbind of the same PDU) commits
    /// trivially.
    pub fn commit(&mut self, tx: &mut Transaction, oid: &Oid) -> Result<(), ErrorStatus> {
        let (column, suffix) = self.desc.split_instance(oid)?;
        let key = self.desc.index.parse(suffix)?;
        let remaining = tx.end_op::<F>(self.desc.name);
        let is_status_column = self
            .desc
            .column(column)
            .is_some_and(|c| c.role == ColumnRole::RowStatus);

        if let Some(location) = self.store.locate(&key) {
            self.settle_row(tx, &key, location, is_status_column)?;
        }

        if remaining <= 0 {
            tx.reset::<F>(self.desc.name);
            if tx.defers_completion() {
                tx.mark_ready(self.desc.name);
            } else {
                self.complete_batch(tx)?;
            }
        }
        Ok(())
    }

    /// Complete a batch held back by a deferring transaction. Does nothing if this table has no
    /// batch waiting.
    pub fn finish(&mut self, tx: &mut Transaction) -> Result<(), ErrorStatus> {
        if tx.take_ready(self.desc.name) {
            self.complete_batch(tx)?;
        }
        Ok(())
    }

    fn settle_row(
        &mut self,
        tx: &mut Transaction,
        key: &OrderedKey,
        location: Location,
        is_status_column: bool,
    ) -> Result<(), ErrorStatus> {
        let Some(row) = self.store.find(key) else {
            return Ok(());
        };
        let is_new = location == Location::Staging;
        let outcome = match row.row_flag() {
            Some(action) if is_status_column => {
                transition::apply_action(action, is_new, row.row_status(), row.is_ready())
                    .inspect_err(|_| {
                        warn!(
                            table = self.desc.name,
                            %key,
                            %action,
                            status = %row.row_status(),
                            is_new,
                            "Rejected row status transition"
                        )
                    })?
            }
            pending => transition::settle(pending, row.is_ready()),
        };

        match outcome {
            Outcome::Status(status) => {
                if let Some(row) = self.store.find_mut(key) {
                    row.row_status = status;
                }
            }
            Outcome::Destroy => {
                if let Some((Location::Committed, row)) = self.store.remove(key) {
                    tx.table::<F>(self.desc.name)?
                        .destroyed
                        .insert(key.clone(), row);
                }
                debug!(table = self.desc.name, %key, "Destroyed row");
            }
            Outcome::Unchanged => {}
        }
        Ok(())
    }

    /// Finish the PDU's batch for this table: promote staged rows, clear pending requests and
    /// hand the touched rows to persistence.
    fn complete_batch(&mut self, tx: &mut Transaction) -> Result<(), ErrorStatus> {
        let state = tx.take_table::<F>(self.desc.name)?;
        let promoted = self.store.promote_all();

        let mut touched: BTreeSet<OrderedKey> = state.touched;
        touched.extend(promoted.iter().cloned());
        for key in &touched {
            if let Some(row) = self.store.find_mut(key) {
                row.row_flag = None;
            }
        }
        for key in &touched {
            self.persist_row(key);
        }
        for key in state.destroyed.keys() {
            if !self.store.contains(key) {
                self.unpersist_row(key);
            }
        }
        self.flush();
        debug!(
            table = self.desc.name,
            promoted = promoted.len(),
            touched = touched.len(),
            destroyed = state.destroyed.len(),
            "Committed batch"
        );
        Ok(())
    }

    /// UNDO the varbind naming `oid`. Never fails for addressing reasons: there is nothing to
    /// undo for an instance that could not have been written.
    ///
    /// A committed row gets back the fields, storage type and status it had before the PDU,
    /// even if an earlier COMMIT of the same PDU already changed or destroyed it.
    pub fn undo(&mut self, tx: &mut Transaction, oid: &Oid) -> Result<(), ErrorStatus> {
        tx.reset::<F>(self.desc.name);
        tx.take_ready(self.desc.name);
        let Ok((_, suffix)) = self.desc.split_instance(oid) else {
            return Ok(());
        };
        let Ok(key) = self.desc.index.parse(suffix) else {
            return Ok(());
        };

        let state = tx.table::<F>(self.desc.name)?;
        if self.store.locate(&key) == Some(Location::Staging) {
            self.store.remove(&key);
            state.touched.remove(&key);
            debug!(table = self.desc.name, %key, "Discarded staged row");
            return Ok(());
        }
        if let Some(row) = state.destroyed.remove(&key) {
            self.store.insert_committed(row)?;
            debug!(table = self.desc.name, %key, "Restored destroyed row");
        }
        let pre_image = state.pre_images.remove(&key);
        if let Some(row) = self.store.find_mut(&key) {
            row.row_flag = None;
            if let Some(pre_image) = pre_image {
                row.fields = pre_image.fields;
                row.storage_type = pre_image.storage_type;
                row.row_status = pre_image.row_status;
            }
        }
        Ok(())
    }
}
