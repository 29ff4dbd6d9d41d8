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

use mib_common::{ErrorStatus, Oid, Value, VarBind};

use crate::provider::PersistenceError;
use crate::row::RowFields;
use crate::table::Table;
use crate::tx_management::Transaction;

/// A managed object the registry can route requests to: a table, or a scalar living under its
/// own subtree.
pub trait MibObject: Send {
    fn name(&self) -> &'static str;

    /// Every instance this object serves starts with this prefix.
    fn subtree(&self) -> &Oid;

    fn get(&self, oid: &Oid) -> Result<VarBind, ErrorStatus>;
    fn get_next(&self, oid: &Oid) -> Result<VarBind, ErrorStatus>;
    fn get_bulk(&self, oid: &Oid, max_repetitions: usize) -> Result<Vec<VarBind>, ErrorStatus>;

    fn set(&mut self, tx: &mut Transaction, oid: &Oid, value: &Value)
    -> Result<(), ErrorStatus>;
    fn create(
        &mut self,
        tx: &mut Transaction,
        oid: &Oid,
        value: &Value,
    ) -> Result<(), ErrorStatus>;
    fn commit(&mut self, tx: &mut Transaction, oid: &Oid) -> Result<(), ErrorStatus>;
    fn undo(&mut self, tx: &mut Transaction, oid: &Oid) -> Result<(), ErrorStatus>;

    /// Make this object's share of a deferring transaction visible once the whole PDU has
    /// committed.
    fn finish(&mut self, _tx: &mut Transaction) -> Result<(), ErrorStatus> {
        Ok(())
    }

    /// Restore persisted state, returning the number of records loaded.
    fn load(&mut self) -> Result<usize, PersistenceError> {
        Ok(0)
    }
}

impl<F: RowFields> MibObject for Table<F> {
    fn name(&self) -> &'static str {
        Table::name(self)
    }

    fn subtree(&self) -> &Oid {
        self.entry()
    }

    fn get(&self, oid: &Oid) -> Result<VarBind, ErrorStatus> {
        Table::get(self, oid)
    }

    fn get_next(&self, oid: &Oid) -> Result<VarBind, ErrorStatus> {
        Table::get_next(self, oid)
    }

    fn get_bulk(&self, oid: &Oid, max_repetitions: usize) -> Result<Vec<VarBind>, ErrorStatus> {
        Table::get_bulk(self, oid, max_repetitions)
    }

    fn set(
        &mut self,
        tx: &mut Transaction,
        oid: &Oid,
        value: &Value,
    ) -> Result<(), ErrorStatus> {
        Table::set(self, tx, oid, value)
    }

    fn create(
        &mut self,
        tx: &mut Transaction,
        oid: &Oid,
        value: &Value,
    ) -> Result<(), ErrorStatus> {
        Table::create(self, tx, oid, value)
    }

    fn commit(&mut self, tx: &mut Transaction, oid: &Oid) -> Result<(), ErrorStatus> {
        Table::commit(self, tx, oid)
    }

    fn undo(&mut self, tx: &mut Transaction, oid: &Oid) -> Result<(), ErrorStatus> {
        Table::undo(self, tx, oid)
    }

    fn finish(&mut self, tx: &mut Transaction) -> Result<(), ErrorStatus> {
        Table::finish(self, tx)
    }

    fn load(&mut self) -> Result<usize, PersistenceError> {
        Table::load(self)
    }
}
