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

//! Static description of a table's shape: where it lives in the OID tree, how its index is
//! encoded, and what its columns are.

use mib_common::{ErrorStatus, IndexSpec, Oid, StorageType, Syntax, Value};

/// Reads and writes the table-specific field columns of a row.
///
/// Storage-type and row-status columns never reach the accessor; the engine owns them.
pub trait ColumnAccessor<F>: Send + Sync {
    /// The current value of `column`, `None` if the accessor does not know the column.
    fn get(&self, fields: &F, column: u32) -> Option<Value>;

    /// Validate `value` against the column's domain and store it.
    fn set(&self, fields: &mut F, column: u32, value: &Value) -> Result<(), ErrorStatus>;
}

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum Access {
    NotAccessible,
    ReadOnly,
    ReadCreate,
}

/// How the engine treats a column.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum ColumnRole {
    Index,
    Field,
    StorageType,
    RowStatus,
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct ColumnDef {
    pub id: u32,
    pub name: &'static str,
    pub access: Access,
    pub syntax: Syntax,
    pub role: ColumnRole,
}

impl ColumnDef {
    pub const fn new(
        id: u32,
        name: &'static str,
        access: Access,
        syntax: Syntax,
        role: ColumnRole,
    ) -> Self {
        Self {
            id,
            name,
            access,
            syntax,
            role,
        }
    }

    /// A read-create field column.
    pub const fn field(id: u32, name: &'static str, syntax: Syntax) -> Self {
        Self::new(id, name, Access::ReadCreate, syntax, ColumnRole::Field)
    }

    pub const fn index(id: u32, name: &'static str, syntax: Syntax) -> Self {
        Self::new(id, name, Access::NotAccessible, syntax, ColumnRole::Index)
    }

    pub const fn storage_type(id: u32, name: &'static str) -> Self {
        Self::new(
            id,
            name,
            Access::ReadCreate,
            Syntax::Integer,
            ColumnRole::StorageType,
        )
    }

    pub const fn row_status(id: u32, name: &'static str) -> Self {
        Self::new(
            id,
            name,
            Access::ReadCreate,
            Syntax::Integer,
            ColumnRole::RowStatus,
        )
    }

    pub fn is_readable(&self) -> bool {
        self.access != Access::NotAccessible
    }

    /// Check that a write of `value` to this column is acceptable in principle.
    pub fn check_write(&self, value: &Value) -> Result<(), ErrorStatus> {
        match self.access {
            Access::NotAccessible | Access::ReadOnly => return Err(ErrorStatus::ReadOnly),
            Access::ReadCreate => {}
        }
        if value.syntax() != self.syntax {
            return Err(ErrorStatus::WrongType);
        }
        Ok(())
    }
}

/// Everything the engine needs to know about one table.
pub struct TableDescriptor<F> {
    pub name: &'static str,
    /// Identifies the table to the persistence collaborator.
    pub file_id: String,
    /// OID of the table's entry object; instances are `entry . column . index`.
    pub entry: Oid,
    pub index: IndexSpec,
    /// Columns in ascending id order.
    pub columns: Vec<ColumnDef>,
    pub default_storage: StorageType,
    pub accessor: Box<dyn ColumnAccessor<F>>,
}

impl<F> TableDescriptor<F> {
    pub fn new(
        name: &'static str,
        file_id: &str,
        entry: Oid,
        index: IndexSpec,
        mut columns: Vec<ColumnDef>,
        accessor: Box<dyn ColumnAccessor<F>>,
    ) -> Self {
        columns.sort_by_key(|c| c.id);
        Self {
            name,
            file_id: file_id.to_string(),
            entry,
            index,
            columns,
            default_storage: StorageType::NonVolatile,
            accessor,
        }
    }

    pub fn with_default_storage(mut self, storage: StorageType) -> Self {
        self.default_storage = storage;
        self
    }

    pub fn with_file_id(mut self, file_id: &str) -> Self {
        self.file_id = file_id.to_string();
        self
    }

    pub fn column(&self, id: u32) -> Option<&ColumnDef> {
        self.columns.iter().find(|c| c.id == id)
    }

    /// Readable columns with an id of at least `from`, in order.
    pub fn readable_from(&self, from: u32) -> impl Iterator<Item = &ColumnDef> {
        self.columns
            .iter()
            .filter(move |c| c.id >= from && c.is_readable())
    }

    /// Split an instance OID into its column and index suffix.
    pub fn split_instance<'a>(&self, oid: &'a Oid) -> Result<(u32, &'a [u32]), ErrorStatus> {
        if !oid.starts_with(&self.entry) {
            return Err(ErrorStatus::NoSuchObject);
        }
        let column = oid
            .get(self.entry.len())
            .ok_or(ErrorStatus::NoSuchObject)?;
        Ok((column, oid.tail(self.entry.len() + 1)))
    }

    pub fn instance_oid(&self, column: u32, key: &[u32]) -> Oid {
        self.entry.child(column).join(key)
    }
}
