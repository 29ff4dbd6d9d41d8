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

use crate::{Oid, Value};
use strum::Display;

/// The operations a table can be asked to perform for one varbind of a PDU.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Display)]
pub enum RequestKind {
    Get,
    GetNext,
    GetBulk,
    Set,
    Create,
    Commit,
    Undo,
}

impl RequestKind {
    pub fn is_write(&self) -> bool {
        matches!(
            self,
            RequestKind::Set | RequestKind::Create | RequestKind::Commit | RequestKind::Undo
        )
    }
}

/// A single column-oriented request against the table engine.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Request {
    pub kind: RequestKind,
    pub oid: Oid,
    /// Payload for `Set` and `Create`.
    pub value: Option<Value>,
    /// Only meaningful for `GetBulk`.
    pub max_repetitions: u32,
}

impl Request {
    pub fn read(kind: RequestKind, oid: Oid) -> Self {
        Self {
            kind,
            oid,
            value: None,
            max_repetitions: 0,
        }
    }

    pub fn get(oid: Oid) -> Self {
        Self::read(RequestKind::Get, oid)
    }

    pub fn get_next(oid: Oid) -> Self {
        Self::read(RequestKind::GetNext, oid)
    }

    pub fn get_bulk(oid: Oid, max_repetitions: u32) -> Self {
        Self {
            max_repetitions,
            ..Self::read(RequestKind::GetBulk, oid)
        }
    }

    pub fn write(kind: RequestKind, oid: Oid, value: impl Into<Value>) -> Self {
        Self {
            kind,
            oid,
            value: Some(value.into()),
            max_repetitions: 0,
        }
    }

    pub fn commit(oid: Oid) -> Self {
        Self::read(RequestKind::Commit, oid)
    }

    pub fn undo(oid: Oid) -> Self {
        Self::read(RequestKind::Undo, oid)
    }
}
