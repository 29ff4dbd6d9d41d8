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

//! Value-domain checks shared by the tables' column accessors.

use mib_common::{ErrorStatus, Value};
use std::ops::RangeInclusive;

pub(crate) fn octets(value: &Value) -> Result<&[u8], ErrorStatus> {
    value.as_bytes().ok_or(ErrorStatus::WrongType)
}

/// An `SnmpAdminString`-style value: length within `len`, no embedded NUL.
pub(crate) fn admin_string(value: &Value, len: RangeInclusive<usize>) -> Result<Vec<u8>, ErrorStatus> {
    let bytes = octets(value)?;
    if !len.contains(&bytes.len()) {
        return Err(ErrorStatus::WrongLength);
    }
    if bytes.contains(&0) {
        return Err(ErrorStatus::WrongValue);
    }
    Ok(bytes.to_vec())
}

pub(crate) fn integer_in(value: &Value, range: RangeInclusive<i32>) -> Result<i32, ErrorStatus> {
    let i = value.as_integer().ok_or(ErrorStatus::WrongType)?;
    if !range.contains(&i) {
        return Err(ErrorStatus::WrongValue);
    }
    Ok(i)
}
