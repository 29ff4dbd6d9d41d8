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

use mib_common::{OrderedKey, RowStatus, RowStatusAction, StorageType};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;

use crate::identity::EngineIdentity;

/// The table-specific attribute set of a row.
pub trait RowFields:
    Clone + Debug + PartialEq + Send + Sync + Serialize + DeserializeOwned + 'static
{
    /// Field values for a freshly created row.
    fn defaults(key: &OrderedKey, identity: &dyn EngineIdentity) -> Self;

    /// True when every field the table requires for activation is populated.
    fn is_ready(&self) -> bool;
}

/// One entry of a management table.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Row<F> {
    key: OrderedKey,
    pub(crate) fields: F,
    pub(crate) storage_type: StorageType,
    pub(crate) row_status: RowStatus,
    /// Status requested by the PDU in flight, if any. Never persisted.
    #[serde(skip)]
    pub(crate) row_flag: Option<RowStatusAction>,
}

impl<F: RowFields> Row<F> {
    pub fn new(key: OrderedKey, fields: F, storage_type: StorageType) -> Self {
        let mut row = Self {
            key,
            fields,
            storage_type,
            row_status: RowStatus::NotReady,
            row_flag: None,
        };
        row.row_status = row.natural_status();
        row
    }

    pub fn with_status(mut self, row_status: RowStatus) -> Self {
        self.row_status = row_status;
        self
    }

    pub fn key(&self) -> &OrderedKey {
        &self.key
    }

    pub fn fields(&self) -> &F {
        &self.fields
    }

    pub fn storage_type(&self) -> StorageType {
        self.storage_type
    }

    pub fn row_status(&self) -> RowStatus {
        self.row_status
    }

    pub fn row_flag(&self) -> Option<RowStatusAction> {
        self.row_flag
    }

    pub fn is_ready(&self) -> bool {
        self.fields.is_ready()
    }

    /// The status that follows from field completeness alone.
    pub fn natural_status(&self) -> RowStatus {
        if self.is_ready() {
            RowStatus::NotInService
        } else {
            RowStatus::NotReady
        }
    }
}
