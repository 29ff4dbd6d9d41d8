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

use thiserror::Error;

/// SNMP `noError`. Successful operations return `Ok`, so this never appears as an `ErrorStatus`.
pub const NO_ERROR: u32 = 0;

/// Status of a failed table operation, as reported back to the PDU layer.
#[derive(Error, Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub enum ErrorStatus {
    #[error("noSuchName")]
    NoSuchName,
    #[error("noSuchInstance")]
    NoSuchInstance,
    #[error("noSuchObject")]
    NoSuchObject,
    #[error("wrongType")]
    WrongType,
    #[error("wrongValue")]
    WrongValue,
    #[error("wrongLength")]
    WrongLength,
    #[error("inconsistentValue")]
    InconsistentValue,
    #[error("readOnly")]
    ReadOnly,
    #[error("commitFailed")]
    CommitFailed,
    #[error("genErr")]
    GenError,
}

impl ErrorStatus {
    /// The error-status value carried in a response PDU.
    ///
    /// `noSuchInstance` and `noSuchObject` are per-varbind exceptions in SNMPv2; when they have to
    /// be carried as an error-status they degrade to `noSuchName`.
    pub fn snmp_code(&self) -> u32 {
        match self {
            ErrorStatus::NoSuchName | ErrorStatus::NoSuchInstance | ErrorStatus::NoSuchObject => 2,
            ErrorStatus::ReadOnly => 4,
            ErrorStatus::GenError => 5,
            ErrorStatus::WrongType => 7,
            ErrorStatus::WrongLength => 8,
            ErrorStatus::WrongValue => 10,
            ErrorStatus::InconsistentValue => 12,
            ErrorStatus::CommitFailed => 14,
        }
    }

    /// True for the statuses SNMPv2 reports in place of a value rather than as a PDU error.
    pub fn is_exception(&self) -> bool {
        matches!(self, ErrorStatus::NoSuchInstance | ErrorStatus::NoSuchObject)
    }
}

/// Error-status code for the outcome of an operation, `NO_ERROR` on success.
pub fn status_code<T>(result: &Result<T, ErrorStatus>) -> u32 {
    match result {
        Ok(_) => NO_ERROR,
        Err(e) => e.snmp_code(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case(ErrorStatus::NoSuchName => 2)]
    #[test_case(ErrorStatus::NoSuchInstance => 2)]
    #[test_case(ErrorStatus::ReadOnly => 4)]
    #[test_case(ErrorStatus::GenError => 5)]
    #[test_case(ErrorStatus::WrongType => 7)]
    #[test_case(ErrorStatus::WrongLength => 8)]
    #[test_case(ErrorStatus::WrongValue => 10)]
    #[test_case(ErrorStatus::InconsistentValue => 12)]
    #[test_case(ErrorStatus::CommitFailed => 14)]
    fn test_snmp_code(status: ErrorStatus) -> u32 {
        status.snmp_code()
    }

    #[test]
    fn test_status_code_of_result() {
        assert_eq!(status_code::<()>(&Ok(())), NO_ERROR);
        assert_eq!(status_code::<()>(&Err(ErrorStatus::WrongValue)), 10);
        assert!(ErrorStatus::NoSuchObject.is_exception());
        assert!(!ErrorStatus::NoSuchName.is_exception());
    }
}
