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

//! Row storage and the transaction engine behind the agent's management tables: ordered
//! committed / staged rows, the RowStatus lifecycle, two-phase SET with COMMIT / UNDO, ordered
//! walks, and the registry that routes PDUs to tables.

mod config;
mod coordinator;
mod descriptor;
mod identity;
mod object;
mod provider;
mod registry;
mod row;
mod store;
mod table;
#[cfg(test)]
mod testing;
mod transition;
mod tx_management;
mod walk;

pub use config::{DEFAULT_MAX_REPETITIONS, MibConfig, TableConfig};
pub use descriptor::{Access, ColumnAccessor, ColumnDef, ColumnRole, TableDescriptor};
pub use identity::{EngineIdentity, IdentityError, LocalEngine};
pub use object::MibObject;
pub use provider::fjall_provider::FjallPersistence;
pub use provider::{MemoryPersistence, Persistence, PersistenceError};
pub use registry::{MibRegistry, RegistryError, SetFailure};
pub use row::{Row, RowFields};
pub use store::{Location, RowStore, StoreError};
pub use table::Table;
pub use transition::{Outcome, StateClass, apply_action, is_legal, settle};
pub use tx_management::{Transaction, TxId};
