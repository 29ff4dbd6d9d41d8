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

use fjall::PartitionCreateOptions;
use mib_common::StorageType;
use serde::{Deserialize, Serialize};

/// Upper bound applied to every GET-BULK repetition count.
pub const DEFAULT_MAX_REPETITIONS: u32 = 64;

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct MibConfig {
    /// The local engine id, as hex. When absent a fixed local id is used.
    pub engine_id: Option<String>,
    pub engine_boots: u32,
    /// Storage type given to new rows of tables that don't override it.
    pub default_storage_type: StorageType,
    pub max_repetitions: u32,

    /// Per-table configurations
    pub community: Option<TableConfig>,
    pub target_addr: Option<TableConfig>,
    pub target_params: Option<TableConfig>,
}

impl Default for MibConfig {
    fn default() -> Self {
        Self {
            engine_id: None,
            engine_boots: 1,
            default_storage_type: StorageType::NonVolatile,
            max_repetitions: DEFAULT_MAX_REPETITIONS,
            community: None,
            target_addr: None,
            target_params: None,
        }
    }
}

impl MibConfig {
    /// Clamp a requested GET-BULK repetition count.
    pub fn clamp_repetitions(&self, requested: u32) -> usize {
        requested.min(self.max_repetitions) as usize
    }
}

/// Per-table configuration.
#[derive(Clone, Default, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct TableConfig {
    /// Persistence partition for the table's rows, if not the table's own file id.
    pub partition: Option<String>,
    pub default_storage_type: Option<StorageType>,
    /// Various fjall partition creation options.
    /// Refer to the fjall documentation for more information.
    pub max_memtable_size: Option<u32>,
    pub block_size: Option<u32>,
}

impl TableConfig {
    pub fn partition_options(&self) -> PartitionCreateOptions {
        let mut opts = PartitionCreateOptions::default();
        if let Some(max_memtable_size) = self.max_memtable_size {
            opts = opts.max_memtable_size(max_memtable_size);
        }
        if let Some(block_size) = self.block_size {
            opts = opts.block_size(block_size);
        }
        opts
    }
}
