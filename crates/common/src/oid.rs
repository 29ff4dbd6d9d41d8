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

//! Object identifiers.

use itertools::Itertools;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::fmt::{Debug, Display, Formatter};
use std::str::FromStr;

/// Most identifiers the agent deals with (table entries plus a short index) fit inline.
const INLINE_SUB_IDS: usize = 24;

/// An SNMP object identifier: an ordered sequence of unsigned 32-bit sub-identifiers.
///
/// The derived ordering is lexicographic over the sub-identifiers, which is the canonical
/// order every walk in the agent follows.
#[derive(Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Oid(SmallVec<[u32; INLINE_SUB_IDS]>);

#[derive(Debug, Clone, Eq, PartialEq, thiserror::Error)]
pub enum OidParseError {
    #[error("Empty object identifier")]
    Empty,
    #[error("Invalid sub-identifier `{0}`")]
    InvalidSubId(String),
}

impl Oid {
    #[must_use]
    pub fn new() -> Self {
        Self(SmallVec::new())
    }

    #[must_use]
    pub fn from_slice(sub_ids: &[u32]) -> Self {
        Self(SmallVec::from_slice(sub_ids))
    }

    pub fn as_slice(&self) -> &[u32] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn push(&mut self, sub_id: u32) {
        self.0.push(sub_id);
    }

    /// True if `prefix` is a (non-strict) prefix of this identifier.
    pub fn starts_with(&self, prefix: &Oid) -> bool {
        self.0.starts_with(&prefix.0)
    }

    /// A new identifier made of this one followed by `sub_id`.
    #[must_use]
    pub fn child(&self, sub_id: u32) -> Oid {
        let mut oid = self.clone();
        oid.push(sub_id);
        oid
    }

    /// A new identifier made of this one followed by every sub-identifier in `tail`.
    #[must_use]
    pub fn join(&self, tail: &[u32]) -> Oid {
        let mut oid = self.clone();
        oid.0.extend_from_slice(tail);
        oid
    }

    /// The sub-identifiers following the first `offset` ones, or an empty slice.
    pub fn tail(&self, offset: usize) -> &[u32] {
        self.0.get(offset..).unwrap_or(&[])
    }

    pub fn get(&self, index: usize) -> Option<u32> {
        self.0.get(index).copied()
    }

    /// The smallest identifier that sorts after every identifier starting with `self`,
    /// i.e. the identifier bounding this subtree from above. `None` for an all-max identifier.
    pub fn subtree_end(&self) -> Option<Oid> {
        let mut end = self.clone();
        while let Some(last) = end.0.pop() {
            if last < u32::MAX {
                end.0.push(last + 1);
                return Some(end);
            }
        }
        None
    }
}

impl<const N: usize> From<[u32; N]> for Oid {
    fn from(sub_ids: [u32; N]) -> Self {
        Self::from_slice(&sub_ids)
    }
}

impl From<&[u32]> for Oid {
    fn from(sub_ids: &[u32]) -> Self {
        Self::from_slice(sub_ids)
    }
}

impl From<Vec<u32>> for Oid {
    fn from(sub_ids: Vec<u32>) -> Self {
        Self(SmallVec::from_vec(sub_ids))
    }
}

impl FromStr for Oid {
    type Err = OidParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim().trim_start_matches('.');
        if s.is_empty() {
            return Err(OidParseError::Empty);
        }
        let sub_ids = s
            .split('.')
            .map(|part| {
                part.parse::<u32>()
                    .map_err(|_| OidParseError::InvalidSubId(part.to_string()))
            })
            .collect::<Result<SmallVec<_>, _>>()?;
        Ok(Self(sub_ids))
    }
}

impl Display for Oid {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.iter().join("."))
    }
}

impl Debug for Oid {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "Oid({self})")
    }
}
