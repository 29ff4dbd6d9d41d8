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

//! The read path of a table.
//!
//! Instances are laid out `entry . column . key`, so canonical order visits every row of a
//! column before moving on to the next column. Only committed rows are ever visible.

use mib_common::{ErrorStatus, Oid, OrderedKey, VarBind};

use crate::row::{Row, RowFields};
use crate::table::{Table, read_column};
use crate::descriptor::ColumnDef;

impl<F: RowFields> Table<F> {
    fn instance(&self, row: &Row<F>, column: &ColumnDef) -> Option<VarBind> {
        let value = read_column(self.desc.accessor.as_ref(), row, column)?;
        Some(VarBind {
            oid: self.desc.instance_oid(column.id, row.key().sub_ids()),
            value,
        })
    }

    /// GET of one instance.
    pub fn get(&self, oid: &Oid) -> Result<VarBind, ErrorStatus> {
        let (column, suffix) = self.desc.split_instance(oid)?;
        let key = self.desc.index.parse(suffix)?;
        let row = self
            .store
            .get_committed(&key)
            .ok_or(ErrorStatus::NoSuchInstance)?;
        let column = self
            .desc
            .column(column)
            .filter(|c| c.is_readable())
            .ok_or(ErrorStatus::NoSuchName)?;
        let value =
            read_column(self.desc.accessor.as_ref(), row, column).ok_or(ErrorStatus::NoSuchName)?;
        Ok(VarBind {
            oid: oid.clone(),
            value,
        })
    }

    /// GET-NEXT: the first instance of this table that sorts strictly after `oid`.
    ///
    /// `NoSuchName` once the table has nothing further to offer.
    pub fn get_next(&self, oid: &Oid) -> Result<VarBind, ErrorStatus> {
        let entry = &self.desc.entry;
        let (start_column, after) = if oid.starts_with(entry) {
            match oid.get(entry.len()) {
                None => (0, None),
                Some(column) => (
                    column,
                    Some(OrderedKey::from_suffix(oid.tail(entry.len() + 1))),
                ),
            }
        } else if oid < entry {
            (0, None)
        } else {
            return Err(ErrorStatus::NoSuchName);
        };

        for column in self.desc.readable_from(start_column) {
            let row = match &after {
                Some(key) if column.id == start_column => self.store.find_next(key),
                _ => self.store.first(),
            };
            if let Some(row) = row
                && let Some(instance) = self.instance(row, column)
            {
                return Ok(instance);
            }
        }
        Err(ErrorStatus::NoSuchName)
    }

    /// GET-BULK: up to `max_repetitions` successive rows of the column reached by the first
    /// GET-NEXT from `oid`.
    ///
    /// A miss on the first repetition is `NoSuchName`; running out of rows afterwards just ends
    /// the list.
    pub fn get_bulk(&self, oid: &Oid, max_repetitions: usize) -> Result<Vec<VarBind>, ErrorStatus> {
        if max_repetitions == 0 {
            return Ok(vec![]);
        }
        let first = self.get_next(oid)?;
        let (column, suffix) = self.desc.split_instance(&first.oid)?;
        let column = self
            .desc
            .column(column)
            .ok_or(ErrorStatus::NoSuchName)?;

        let mut key = OrderedKey::from_suffix(suffix);
        let mut results = vec![first];
        while results.len() < max_repetitions {
            let Some(row) = self.store.find_next(&key) else {
                break;
            };
            let Some(instance) = self.instance(row, column) else {
                break;
            };
            key = row.key().clone();
            results.push(instance);
        }
        Ok(results)
    }
}
