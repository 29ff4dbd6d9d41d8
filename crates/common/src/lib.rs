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

//! Types shared by every part of the MIB engine: object identifiers, row keys, typed values,
//! RowStatus / StorageType and the error-status taxonomy reported to the PDU layer.

mod errors;
mod key;
mod oid;
mod request;
mod row_status;
pub mod tracing;
mod value;

pub use errors::{ErrorStatus, NO_ERROR, status_code};
pub use key::{IndexPart, IndexSpec, OrderedKey};
pub use oid::{Oid, OidParseError};
pub use request::{Request, RequestKind};
pub use row_status::{RowStatus, RowStatusAction, StorageType};
pub use value::{Syntax, Value, VarBind, parse_hex};
