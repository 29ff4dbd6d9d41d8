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

//! Fixtures shared by the unit tests of this crate.

use mib_common::{ErrorStatus, IndexSpec, OrderedKey, StorageType, Syntax, Value};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::descriptor::{Access, ColumnAccessor, ColumnDef, ColumnRole, TableDescriptor};
use crate::identity::{EngineIdentity, LocalEngine};
use crate::provider::{MemoryPersistence, Persistence};
use crate::row::{Row, RowFields};
use crate::table::Table;

pub const TEST_ENTRY: [u32; 6] = [1, 3, 6, 1, 99, 1];

/// A two-string row, ready once both are set, with an optional integer.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TestFields {
    pub name: Vec<u8>,
    pub owner: Vec<u8>,
    pub weight: i32,
}

impl RowFields for TestFields {
    fn defaults(_key: &OrderedKey, identity: &dyn EngineIdentity) -> Self {
        Self {
            weight: identity.engine_boots() as i32,
            ..Default::default()
        }
    }

    fn is_ready(&self) -> bool {
        !self.name.is_empty() && !self.owner.is_empty()
    }
}

pub const COL_NAME: u32 = 2;
pub const COL_OWNER: u32 = 3;
pub const COL_WEIGHT: u32 = 4;
pub const COL_STORAGE: u32 = 5;
pub const COL_STATUS: u32 = 6;

struct TestColumns;

impl ColumnAccessor<TestFields> for TestColumns {
    fn get(&self, fields: &TestFields, column: u32) -> Option<Value> {
        match column {
            COL_NAME => Some(Value::OctetString(fields.name.clone())),
            COL_OWNER => Some(Value::OctetString(fields.owner.clone())),
            COL_WEIGHT => Some(Value::Integer(fields.weight)),
            _ => None,
        }
    }

    fn set(&self, fields: &mut TestFields, column: u32, value: &Value) -> Result<(), ErrorStatus> {
        match (column, value) {
            (COL_NAME | COL_OWNER, Value::OctetString(s)) if s.len() > 16 => {
                Err(ErrorStatus::WrongLength)
            }
            (COL_NAME, Value::OctetString(s)) => {
                fields.name = s.clone();
                Ok(())
            }
            (COL_OWNER, Value::OctetString(s)) => {
                fields.owner = s.clone();
                Ok(())
            }
            (COL_WEIGHT, Value::Integer(i)) if *i < 0 => Err(ErrorStatus::WrongValue),
            (COL_WEIGHT, Value::Integer(i)) => {
                fields.weight = *i;
                Ok(())
            }
            _ => Err(ErrorStatus::NoSuchName),
        }
    }
}

pub fn test_descriptor() -> TableDescriptor<TestFields> {
    TableDescriptor::new(
        "testTable",
        "test_table",
        TEST_ENTRY.into(),
        IndexSpec::implied_string(1, 32),
        vec![
            ColumnDef::new(1, "testIndex", Access::NotAccessible, Syntax::OctetString, ColumnRole::Index),
            ColumnDef::field(COL_NAME, "testName", Syntax::OctetString),
            ColumnDef::field(COL_OWNER, "testOwner", Syntax::OctetString),
            ColumnDef::new(COL_WEIGHT, "testWeight", Access::ReadOnly, Syntax::Integer, ColumnRole::Field),
            ColumnDef::storage_type(COL_STORAGE, "testStorageType"),
            ColumnDef::row_status(COL_STATUS, "testStatus"),
        ],
        Box::new(TestColumns),
    )
}

pub fn test_row(name: &str) -> Row<TestFields> {
    Row::new(
        OrderedKey::from_implied(name.as_bytes()),
        TestFields::default(),
        StorageType::NonVolatile,
    )
}

pub fn test_table() -> (Table<TestFields>, MemoryPersistence) {
    let persistence = MemoryPersistence::default();
    let table = Table::new(
        test_descriptor(),
        Arc::new(LocalEngine::default()),
        Arc::new(persistence.clone()) as Arc<dyn Persistence>,
    );
    (table, persistence)
}
