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

use crate::Oid;
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use strum::Display as StrumDisplay;

/// The syntax of a column, used to reject values of the wrong type before they reach a table.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, StrumDisplay)]
pub enum Syntax {
    #[strum(to_string = "INTEGER")]
    Integer,
    #[strum(to_string = "OCTET STRING")]
    OctetString,
    #[strum(to_string = "OBJECT IDENTIFIER")]
    ObjectId,
    #[strum(to_string = "Unsigned32")]
    Unsigned,
}

/// A typed payload carried by a request or returned from a read.
#[derive(Debug, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum Value {
    Integer(i32),
    OctetString(Vec<u8>),
    ObjectId(Oid),
    Unsigned(u32),
}

impl Value {
    pub fn syntax(&self) -> Syntax {
        match self {
            Value::Integer(_) => Syntax::Integer,
            Value::OctetString(_) => Syntax::OctetString,
            Value::ObjectId(_) => Syntax::ObjectId,
            Value::Unsigned(_) => Syntax::Unsigned,
        }
    }

    pub fn as_integer(&self) -> Option<i32> {
        match self {
            Value::Integer(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Value::OctetString(b) => Some(b),
            _ => None,
        }
    }

    pub fn as_oid(&self) -> Option<&Oid> {
        match self {
            Value::ObjectId(o) => Some(o),
            _ => None,
        }
    }

    pub fn as_unsigned(&self) -> Option<u32> {
        match self {
            Value::Unsigned(u) => Some(*u),
            _ => None,
        }
    }

    /// Value-length as carried in a request: octets for strings, sub-identifiers for OIDs.
    pub fn len(&self) -> usize {
        match self {
            Value::OctetString(b) => b.len(),
            Value::ObjectId(o) => o.len(),
            Value::Integer(_) | Value::Unsigned(_) => 4,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Integer(i)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::OctetString(s.as_bytes().to_vec())
    }
}

impl From<&[u8]> for Value {
    fn from(b: &[u8]) -> Self {
        Value::OctetString(b.to_vec())
    }
}

impl From<Oid> for Value {
    fn from(o: Oid) -> Self {
        Value::ObjectId(o)
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Integer(i) => write!(f, "INTEGER: {i}"),
            Value::Unsigned(u) => write!(f, "Unsigned32: {u}"),
            Value::ObjectId(o) => write!(f, "OID: {o}"),
            Value::OctetString(b) => match std::str::from_utf8(b) {
                Ok(s) if !s.chars().any(char::is_control) => write!(f, "STRING: \"{s}\""),
                _ => write!(
                    f,
                    "Hex-STRING: {}",
                    b.iter().map(|b| format!("{b:02X}")).join(" ")
                ),
            },
        }
    }
}

/// A variable binding: an instance OID and its value.
#[derive(Debug, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct VarBind {
    pub oid: Oid,
    pub value: Value,
}

impl VarBind {
    pub fn new(oid: Oid, value: impl Into<Value>) -> Self {
        Self {
            oid,
            value: value.into(),
        }
    }
}

impl Display for VarBind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} = {}", self.oid, self.value)
    }
}

/// Parse a hex octet string, with optional `0x` prefix and `:` separators.
pub fn parse_hex(hex: &str) -> Option<Vec<u8>> {
    let digits: String = hex
        .trim()
        .trim_start_matches("0x")
        .chars()
        .filter(|c| *c != ':')
        .collect();
    if digits.is_empty() || digits.len() % 2 != 0 {
        return None;
    }
    (0..digits.len())
        .step_by(2)
        .map(|i| u8::from_str_radix(digits.get(i..i + 2)?, 16).ok())
        .collect()
}
