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

//! Row keys, and the rules for turning an instance OID suffix into one.

use crate::ErrorStatus;
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::fmt::{Debug, Display, Formatter};

/// The index of a table row, held in its encoded form: the exact sub-identifiers that follow
/// `entry . column` in an instance OID.
///
/// Keys are either a single implied-length byte string, or a composite of byte strings where
/// every part but the last carries a length prefix. Because the encoded form is what gets
/// compared, key order is exactly the canonical OID order of the rows' instances, and for a
/// single-part key it reduces to byte-lexicographic order.
#[derive(Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct OrderedKey(SmallVec<[u32; 32]>);

impl OrderedKey {
    /// A key made of a single implied-length byte string.
    #[must_use]
    pub fn from_implied(bytes: &[u8]) -> Self {
        Self(bytes.iter().map(|b| u32::from(*b)).collect())
    }

    /// A composite key. Every part except the last is length-prefixed.
    #[must_use]
    pub fn from_parts<P: AsRef<[u8]>>(parts: &[P]) -> Self {
        let mut encoded = SmallVec::new();
        let last = parts.len().saturating_sub(1);
        for (i, part) in parts.iter().enumerate() {
            let part = part.as_ref();
            if i != last {
                encoded.push(part.len() as u32);
            }
            encoded.extend(part.iter().map(|b| u32::from(*b)));
        }
        Self(encoded)
    }

    /// Wrap a raw suffix without validating it. Used as a search bound by walks, where the
    /// requested position need not name an actual row.
    #[must_use]
    pub fn from_suffix(sub_ids: &[u32]) -> Self {
        Self(SmallVec::from_slice(sub_ids))
    }

    pub fn sub_ids(&self) -> &[u32] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The key's bytes when it is a single implied string.
    pub fn implied_bytes(&self) -> Option<Vec<u8>> {
        self.0.iter().map(|s| u8::try_from(*s).ok()).collect()
    }

    /// Big-endian encoding of the sub-identifiers. Byte order of encoded keys matches key order,
    /// so it can be used directly as a storage key.
    pub fn encode(&self) -> Vec<u8> {
        self.0.iter().flat_map(|s| s.to_be_bytes()).collect()
    }

    pub fn decode(bytes: &[u8]) -> Option<Self> {
        if bytes.len() % 4 != 0 {
            return None;
        }
        let sub_ids = bytes
            .chunks_exact(4)
            .map(|c| u32::from_be_bytes([c[0], c[1], c[2], c[3]]))
            .collect();
        Some(Self(sub_ids))
    }
}

impl Display for OrderedKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let printable = !self.0.is_empty() && self.0.iter().all(|s| (0x20..0x7f).contains(s));
        if printable {
            let s: String = self.0.iter().filter_map(|s| char::from_u32(*s)).collect();
            write!(f, "\"{s}\"")
        } else {
            write!(f, "{}", self.0.iter().join("."))
        }
    }
}

impl Debug for OrderedKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "OrderedKey({self})")
    }
}

/// One component of a table index.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct IndexPart {
    pub min_len: usize,
    pub max_len: usize,
    /// The last part of an index may omit its length prefix.
    pub implied: bool,
}

/// Describes how a table's instance suffix decomposes into its index parts.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct IndexSpec {
    parts: Vec<IndexPart>,
}

impl IndexSpec {
    pub fn new(parts: Vec<IndexPart>) -> Self {
        Self { parts }
    }

    /// A single `IMPLIED SnmpAdminString`-style index.
    pub fn implied_string(min_len: usize, max_len: usize) -> Self {
        Self::new(vec![IndexPart {
            min_len,
            max_len,
            implied: true,
        }])
    }

    pub fn parts(&self) -> &[IndexPart] {
        &self.parts
    }

    /// Validate an instance suffix and turn it into a key.
    ///
    /// Every byte must be in `1..=255`, every part must respect its length bounds, and nothing
    /// may trail the final part. Anything else does not name an instance.
    pub fn parse(&self, suffix: &[u32]) -> Result<OrderedKey, ErrorStatus> {
        if suffix.is_empty() || self.parts.is_empty() {
            return Err(ErrorStatus::NoSuchInstance);
        }
        let mut pos = 0;
        for (i, part) in self.parts.iter().enumerate() {
            let is_last = i + 1 == self.parts.len();
            let len = if part.implied && is_last {
                suffix.len() - pos
            } else {
                let len = *suffix.get(pos).ok_or(ErrorStatus::NoSuchInstance)? as usize;
                pos += 1;
                len
            };
            if len < part.min_len || len > part.max_len {
                return Err(ErrorStatus::NoSuchInstance);
            }
            let bytes = suffix
                .get(pos..pos + len)
                .ok_or(ErrorStatus::NoSuchInstance)?;
            if bytes.iter().any(|b| *b == 0 || *b > 255) {
                return Err(ErrorStatus::NoSuchInstance);
            }
            pos += len;
        }
        if pos != suffix.len() {
            return Err(ErrorStatus::NoSuchInstance);
        }
        Ok(OrderedKey::from_suffix(suffix))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_implied_key_order_is_byte_order() {
        let a = OrderedKey::from_implied(b"abc");
        let b = OrderedKey::from_implied(b"abd");
        let c = OrderedKey::from_implied(b"abcd");
        assert!(a < b);
        assert!(a < c);
        assert!(c < b);
    }

    #[test]
    fn test_composite_key_encoding() {
        let key = OrderedKey::from_parts(&[b"ab".as_slice(), b"c".as_slice()]);
        assert_eq!(key.sub_ids(), &[2, 97, 98, 99]);

        // A shorter length-prefixed first part sorts first regardless of content.
        let shorter = OrderedKey::from_parts(&[b"z".as_slice(), b"a".as_slice()]);
        assert!(shorter < key);
    }

    #[test]
    fn test_encode_preserves_order() {
        let keys = [
            OrderedKey::from_implied(b"a"),
            OrderedKey::from_suffix(&[97, 300]),
            OrderedKey::from_implied(b"b"),
        ];
        for pair in keys.windows(2) {
            assert!(pair[0] < pair[1]);
            assert!(pair[0].encode() < pair[1].encode());
        }
        let decoded = OrderedKey::decode(&keys[1].encode()).unwrap();
        assert_eq!(decoded, keys[1]);
        assert_eq!(OrderedKey::decode(&[0, 1, 2]), None);
    }

    #[test]
    fn test_implied_bytes() {
        let key = OrderedKey::from_implied(b"public");
        assert_eq!(key.implied_bytes(), Some(b"public".to_vec()));
        assert_eq!(OrderedKey::from_suffix(&[1, 256]).implied_bytes(), None);
    }

    #[test]
    fn test_display() {
        assert_eq!(OrderedKey::from_implied(b"public").to_string(), "\"public\"");
        assert_eq!(OrderedKey::from_suffix(&[1, 2]).to_string(), "1.2");
    }

    #[test]
    fn test_parse_implied_string() {
        let spec = IndexSpec::implied_string(1, 32);
        let key = spec.parse(&[112, 117, 98]).unwrap();
        assert_eq!(key, OrderedKey::from_implied(b"pub"));

        assert_eq!(spec.parse(&[]), Err(ErrorStatus::NoSuchInstance));
        assert_eq!(spec.parse(&[112, 0, 98]), Err(ErrorStatus::NoSuchInstance));
        assert_eq!(spec.parse(&[112, 256]), Err(ErrorStatus::NoSuchInstance));
        assert_eq!(spec.parse(&[65; 33]), Err(ErrorStatus::NoSuchInstance));
        assert!(spec.parse(&[65; 32]).is_ok());
    }

    #[test]
    fn test_parse_composite() {
        let spec = IndexSpec::new(vec![
            IndexPart {
                min_len: 1,
                max_len: 8,
                implied: false,
            },
            IndexPart {
                min_len: 1,
                max_len: 8,
                implied: true,
            },
        ]);
        let key = spec.parse(&[2, 97, 98, 99]).unwrap();
        assert_eq!(key, OrderedKey::from_parts(&[b"ab".as_slice(), b"c".as_slice()]));

        // Length prefix runs past the suffix.
        assert_eq!(spec.parse(&[5, 97]), Err(ErrorStatus::NoSuchInstance));
        // Implied last part is empty.
        assert_eq!(spec.parse(&[2, 97, 98]), Err(ErrorStatus::NoSuchInstance));
    }

    #[test]
    fn test_parse_rejects_trailing_sub_ids() {
        let spec = IndexSpec::new(vec![IndexPart {
            min_len: 1,
            max_len: 8,
            implied: false,
        }]);
        assert!(spec.parse(&[1, 97]).is_ok());
        assert_eq!(spec.parse(&[1, 97, 98]), Err(ErrorStatus::NoSuchInstance));
    }
}
