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

//! RowStatus lifecycle rules.
//!
//! A requested action is first gated by the legality table, keyed by the action and the class of
//! the row's current state. Actions that pass the gate are then resolved against the row's field
//! completeness to yield the status the row ends up in.

use mib_common::{ErrorStatus, RowStatus, RowStatusAction};

/// The state of a row as seen by the legality table.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub enum StateClass {
    /// Created in the PDU being committed.
    New,
    NotReady,
    NotInService,
    Active,
}

impl StateClass {
    pub fn of(is_new: bool, status: RowStatus) -> Self {
        if is_new {
            return StateClass::New;
        }
        match status {
            RowStatus::NotReady => StateClass::NotReady,
            RowStatus::NotInService => StateClass::NotInService,
            RowStatus::Active => StateClass::Active,
        }
    }

    fn index(&self) -> usize {
        match self {
            StateClass::New => 0,
            StateClass::NotReady => 1,
            StateClass::NotInService => 2,
            StateClass::Active => 3,
        }
    }
}

/// What COMMIT does to the row.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum Outcome {
    Status(RowStatus),
    Destroy,
    Unchanged,
}

const OK: bool = true;
const NO: bool = false;

/// Legality of each action (rows, by RowStatus value) in each state class
/// (columns: new, notReady, notInService, active).
const LEGALITY: [[bool; 4]; 6] = [
    /* active        */ [NO, NO, OK, OK],
    /* notInService  */ [NO, NO, OK, OK],
    /* notReady      */ [NO, NO, NO, NO],
    /* createAndGo   */ [OK, NO, NO, NO],
    /* createAndWait */ [OK, NO, NO, NO],
    /* destroy       */ [OK, OK, OK, OK],
];

pub fn is_legal(action: RowStatusAction, class: StateClass) -> bool {
    LEGALITY[action as usize - 1][class.index()]
}

fn natural(ready: bool) -> RowStatus {
    if ready {
        RowStatus::NotInService
    } else {
        RowStatus::NotReady
    }
}

/// Resolve an explicit write to the row-status column.
pub fn apply_action(
    action: RowStatusAction,
    is_new: bool,
    current: RowStatus,
    ready: bool,
) -> Result<Outcome, ErrorStatus> {
    if !is_legal(action, StateClass::of(is_new, current)) {
        return Err(ErrorStatus::InconsistentValue);
    }
    // Past the gate, activation and creation only depend on field completeness.
    match action {
        RowStatusAction::Active | RowStatusAction::CreateAndGo if ready => {
            Ok(Outcome::Status(RowStatus::Active))
        }
        RowStatusAction::NotInService if ready => Ok(Outcome::Status(RowStatus::NotInService)),
        RowStatusAction::CreateAndWait => Ok(Outcome::Status(natural(ready))),
        RowStatusAction::Destroy => Ok(Outcome::Destroy),
        _ => Err(ErrorStatus::InconsistentValue),
    }
}

/// Settle the status of a row whose committed column was not its row-status column.
///
/// Without a pending request the status follows field completeness. A pending create request
/// from the same PDU still governs; other pending requests are resolved by their own column.
pub fn settle(pending: Option<RowStatusAction>, ready: bool) -> Outcome {
    match pending {
        None | Some(RowStatusAction::Destroy) => Outcome::Status(natural(ready)),
        Some(_) if !ready => Outcome::Status(RowStatus::NotReady),
        Some(RowStatusAction::CreateAndGo) => Outcome::Status(RowStatus::Active),
        Some(RowStatusAction::CreateAndWait) => Outcome::Status(RowStatus::NotInService),
        Some(
            RowStatusAction::Active | RowStatusAction::NotInService | RowStatusAction::NotReady,
        ) => Outcome::Unchanged,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mib_common::ErrorStatus::InconsistentValue as Incons;
    use mib_common::RowStatus::{Active, NotInService, NotReady};
    use test_case::test_case;

    // (is_new, current status, ready)
    const NEW_INCOMPLETE: (bool, RowStatus, bool) = (true, NotReady, false);
    const NEW_COMPLETE: (bool, RowStatus, bool) = (true, NotInService, true);
    const NOT_READY: (bool, RowStatus, bool) = (false, NotReady, false);
    const NOT_IN_SERVICE: (bool, RowStatus, bool) = (false, NotInService, true);
    const ACTIVE: (bool, RowStatus, bool) = (false, Active, true);

    fn run(action: RowStatusAction, row: (bool, RowStatus, bool)) -> Result<Outcome, ErrorStatus> {
        apply_action(action, row.0, row.1, row.2)
    }

    #[test_case(RowStatusAction::CreateAndGo, NEW_INCOMPLETE => Err(Incons); "createAndGo on new incomplete row")]
    #[test_case(RowStatusAction::CreateAndGo, NEW_COMPLETE => Ok(Outcome::Status(Active)); "createAndGo on new complete row")]
    #[test_case(RowStatusAction::CreateAndGo, NOT_READY => Err(Incons); "createAndGo on notReady")]
    #[test_case(RowStatusAction::CreateAndGo, NOT_IN_SERVICE => Err(Incons); "createAndGo on notInService")]
    #[test_case(RowStatusAction::CreateAndGo, ACTIVE => Err(Incons); "createAndGo on active")]
    #[test_case(RowStatusAction::CreateAndWait, NEW_INCOMPLETE => Ok(Outcome::Status(NotReady)); "createAndWait on new incomplete row")]
    #[test_case(RowStatusAction::CreateAndWait, NEW_COMPLETE => Ok(Outcome::Status(NotInService)); "createAndWait on new complete row")]
    #[test_case(RowStatusAction::CreateAndWait, NOT_READY => Err(Incons); "createAndWait on notReady")]
    #[test_case(RowStatusAction::CreateAndWait, NOT_IN_SERVICE => Err(Incons); "createAndWait on notInService")]
    #[test_case(RowStatusAction::CreateAndWait, ACTIVE => Err(Incons); "createAndWait on active")]
    #[test_case(RowStatusAction::Active, NEW_INCOMPLETE => Err(Incons); "active on new incomplete row")]
    #[test_case(RowStatusAction::Active, NEW_COMPLETE => Err(Incons); "active on new complete row")]
    #[test_case(RowStatusAction::Active, NOT_READY => Err(Incons); "active on notReady")]
    #[test_case(RowStatusAction::Active, NOT_IN_SERVICE => Ok(Outcome::Status(Active)); "active on notInService")]
    #[test_case(RowStatusAction::Active, ACTIVE => Ok(Outcome::Status(Active)); "active on active")]
    #[test_case(RowStatusAction::NotInService, NEW_INCOMPLETE => Err(Incons); "notInService on new incomplete row")]
    #[test_case(RowStatusAction::NotInService, NEW_COMPLETE => Err(Incons); "notInService on new complete row")]
    #[test_case(RowStatusAction::NotInService, NOT_READY => Err(Incons); "notInService on notReady")]
    #[test_case(RowStatusAction::NotInService, NOT_IN_SERVICE => Ok(Outcome::Status(NotInService)); "notInService on notInService")]
    #[test_case(RowStatusAction::NotInService, ACTIVE => Ok(Outcome::Status(NotInService)); "notInService on active")]
    #[test_case(RowStatusAction::NotReady, NEW_INCOMPLETE => Err(Incons); "notReady on new incomplete row")]
    #[test_case(RowStatusAction::NotReady, NEW_COMPLETE => Err(Incons); "notReady on new complete row")]
    #[test_case(RowStatusAction::NotReady, NOT_READY => Err(Incons); "notReady on notReady")]
    #[test_case(RowStatusAction::NotReady, NOT_IN_SERVICE => Err(Incons); "notReady on notInService")]
    #[test_case(RowStatusAction::NotReady, ACTIVE => Err(Incons); "notReady on active")]
    #[test_case(RowStatusAction::Destroy, NEW_INCOMPLETE => Ok(Outcome::Destroy); "destroy on new incomplete row")]
    #[test_case(RowStatusAction::Destroy, NEW_COMPLETE => Ok(Outcome::Destroy); "destroy on new complete row")]
    #[test_case(RowStatusAction::Destroy, NOT_READY => Ok(Outcome::Destroy); "destroy on notReady")]
    #[test_case(RowStatusAction::Destroy, NOT_IN_SERVICE => Ok(Outcome::Destroy); "destroy on notInService")]
    #[test_case(RowStatusAction::Destroy, ACTIVE => Ok(Outcome::Destroy); "destroy on active")]
    fn test_transition_matrix(
        action: RowStatusAction,
        row: (bool, RowStatus, bool),
    ) -> Result<Outcome, ErrorStatus> {
        run(action, row)
    }

    #[test]
    fn test_legality_table_matches_rules() {
        // Destroy is the only action legal everywhere, notReady is never legal.
        for class in [
            StateClass::New,
            StateClass::NotReady,
            StateClass::NotInService,
            StateClass::Active,
        ] {
            assert!(is_legal(RowStatusAction::Destroy, class));
            assert!(!is_legal(RowStatusAction::NotReady, class));
        }
        for action in RowStatusAction::ALL {
            let create = matches!(
                action,
                RowStatusAction::CreateAndGo | RowStatusAction::CreateAndWait
            );
            if create {
                assert!(is_legal(action, StateClass::New));
                assert!(!is_legal(action, StateClass::NotInService));
            }
        }
    }

    #[test_case(None, false => Outcome::Status(NotReady); "no request, incomplete")]
    #[test_case(None, true => Outcome::Status(NotInService); "no request, complete")]
    #[test_case(Some(RowStatusAction::CreateAndGo), true => Outcome::Status(Active); "pending createAndGo")]
    #[test_case(Some(RowStatusAction::CreateAndGo), false => Outcome::Status(NotReady); "pending createAndGo, incomplete")]
    #[test_case(Some(RowStatusAction::CreateAndWait), true => Outcome::Status(NotInService); "pending createAndWait")]
    #[test_case(Some(RowStatusAction::Destroy), true => Outcome::Status(NotInService); "pending destroy")]
    #[test_case(Some(RowStatusAction::Active), true => Outcome::Unchanged; "pending active")]
    #[test_case(Some(RowStatusAction::NotInService), true => Outcome::Unchanged; "pending notInService")]
    fn test_settle(pending: Option<RowStatusAction>, ready: bool) -> Outcome {
        settle(pending, ready)
    }
}
