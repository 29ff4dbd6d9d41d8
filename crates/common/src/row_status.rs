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

use enum_primitive_derive::Primitive;
use num_traits::FromPrimitive;
use serde::{Deserialize, Serialize};
use strum::Display;

use crate::ErrorStatus;

/// The states a row can actually be in. The remaining RowStatus values are write intents.
#[derive(
    Debug, Clone, Copy, Eq, PartialEq, Hash, Primitive, Display, Serialize, Deserialize,
)]
pub enum RowStatus {
    #[strum(to_string = "active")]
    Active = 1,
    #[strum(to_string = "notInService")]
    NotInService = 2,
    #[strum(to_string = "notReady")]
    NotReady = 3,
}

/// A value written to a RowStatus column.
#[derive(
    Debug, Clone, Copy, Eq, PartialEq, Hash, Primitive, Display, Serialize, Deserialize,
)]
pub enum RowStatusAction {
    #[strum(to_string = "active")]
    Active = 1,
    #[strum(to_string = "notInService")]
    NotInService = 2,
    #[strum(to_string = "notReady")]
    NotReady = 3,
    #[strum(to_string = "createAndGo")]
    CreateAndGo = 4,
    #[strum(to_string = "createAndWait")]
    CreateAndWait = 5,
    #[strum(to_string = "destroy")]
    Destroy = 6,
}

impl RowStatusAction {
    pub const ALL: [RowStatusAction; 6] = [
        RowStatusAction::Active,
        RowStatusAction::NotInService,
        RowStatusAction::NotReady,
        RowStatusAction::CreateAndGo,
        RowStatusAction::CreateAndWait,
        RowStatusAction::Destroy,
    ];

    /// Decode an integer written to a RowStatus column; anything outside 1..=6 is `wrongValue`.
    pub fn from_request(value: i32) -> Result<Self, ErrorStatus> {
        Self::from_i32(value).ok_or(ErrorStatus::WrongValue)
    }
}

/// Storage class of a row, per the `StorageType` textual convention.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    Eq,
    PartialEq,
    Hash,
    Primitive,
    Display,
    Serialize,
    Deserialize,
)]
#[serde(rename_all = "camelCase")]
pub enum StorageType {
    #[strum(to_string = "other")]
    Other = 1,
    #[strum(to_string = "volatile")]
    Volatile = 2,
    #[default]
    #[strum(to_string = "nonVolatile")]
    NonVolatile = 3,
    #[strum(to_string = "permanent")]
    Permanent = 4,
    #[strum(to_string = "readOnly")]
    ReadOnly = 5,
}

impl StorageType {
    pub fn from_request(value: i32) -> Result<Self, ErrorStatus> {
        Self::from_i32(value).ok_or(ErrorStatus::WrongValue)
    }

    /// Whether rows of this class survive an agent restart.
    pub fn is_persistent(&self) -> bool {
        matches!(
            self,
            StorageType::NonVolatile | StorageType::Permanent | StorageType::ReadOnly
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case(1 => Ok(RowStatusAction::Active))]
    #[test_case(4 => Ok(RowStatusAction::CreateAndGo))]
    #[test_case(6 => Ok(RowStatusAction::Destroy))]
    #[test_case(0 => Err(ErrorStatus::WrongValue))]
    #[test_case(7 => Err(ErrorStatus::WrongValue))]
    #[test_case(-1 => Err(ErrorStatus::WrongValue))]
    fn test_action_from_request(value: i32) -> Result<RowStatusAction, ErrorStatus> {
        RowStatusAction::from_request(value)
    }

    #[test_case(2 => Ok(StorageType::Volatile))]
    #[test_case(5 => Ok(StorageType::ReadOnly))]
    #[test_case(0 => Err(ErrorStatus::WrongValue))]
    #[test_case(6 => Err(ErrorStatus::WrongValue))]
    fn test_storage_from_request(value: i32) -> Result<StorageType, ErrorStatus> {
        StorageType::from_request(value)
    }

    #[test]
    fn test_display_uses_mib_names() {
        assert_eq!(RowStatus::NotInService.to_string(), "notInService");
        assert_eq!(RowStatusAction::CreateAndWait.to_string(), "createAndWait");
        assert_eq!(StorageType::default().to_string(), "nonVolatile");
        assert!(StorageType::Permanent.is_persistent());
        assert!(!StorageType::Volatile.is_persistent());
    }
}
