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

use mib_common::{ErrorStatus, Oid, Value, VarBind};
use mib_db::{MibObject, Transaction};
use tracing::debug;

/// `snmpTargetSpinLock`, a `TestAndIncr` scalar.
pub const TARGET_SPIN_LOCK: [u32; 9] = [1, 3, 6, 1, 6, 3, 12, 1, 1];

/// Advisory lock managers use to coordinate changes to the target tables.
///
/// A SET must carry the current value; the value advances by one, wrapping at 2^31, when the
/// SET commits, or when the PDU finishes if the transaction defers completion.
#[derive(Debug)]
pub struct TargetSpinLock {
    subtree: Oid,
    instance: Oid,
    value: i32,
    pending: bool,
}

impl Default for TargetSpinLock {
    fn default() -> Self {
        Self::new(0)
    }
}

impl TargetSpinLock {
    pub fn new(value: i32) -> Self {
        let subtree = Oid::from(TARGET_SPIN_LOCK);
        Self {
            instance: subtree.child(0),
            subtree,
            value,
            pending: false,
        }
    }

    pub fn value(&self) -> i32 {
        self.value
    }

    fn current(&self) -> VarBind {
        VarBind::new(self.instance.clone(), self.value)
    }

    fn advance(&mut self) {
        if std::mem::take(&mut self.pending) {
            self.value = if self.value == i32::MAX {
                0
            } else {
                self.value + 1
            };
            debug!(value = self.value, "Advanced target spin lock");
        }
    }
}

impl MibObject for TargetSpinLock {
    fn name(&self) -> &'static str {
        "snmpTargetSpinLock"
    }

    fn subtree(&self) -> &Oid {
        &self.subtree
    }

    fn get(&self, oid: &Oid) -> Result<VarBind, ErrorStatus> {
        if *oid != self.instance {
            return Err(ErrorStatus::NoSuchInstance);
        }
        Ok(self.current())
    }

    fn get_next(&self, oid: &Oid) -> Result<VarBind, ErrorStatus> {
        if *oid < self.instance {
            Ok(self.current())
        } else {
            Err(ErrorStatus::NoSuchName)
        }
    }

    fn get_bulk(&self, oid: &Oid, max_repetitions: usize) -> Result<Vec<VarBind>, ErrorStatus> {
        if max_repetitions == 0 {
            return Ok(vec![]);
        }
        self.get_next(oid).map(|vb| vec![vb])
    }

    fn set(&mut self, _tx: &mut Transaction, oid: &Oid, value: &Value) -> Result<(), ErrorStatus> {
        if *oid != self.instance {
            return Err(ErrorStatus::NoSuchName);
        }
        let requested = value.as_integer().ok_or(ErrorStatus::WrongType)?;
        if requested != self.value {
            return Err(ErrorStatus::InconsistentValue);
        }
        self.pending = true;
        Ok(())
    }

    fn create(&mut self, tx: &mut Transaction, oid: &Oid, value: &Value) -> Result<(), ErrorStatus> {
        self.set(tx, oid, value)
    }

    fn commit(&mut self, tx: &mut Transaction, _oid: &Oid) -> Result<(), ErrorStatus> {
        if !tx.defers_completion() {
            self.advance();
        }
        Ok(())
    }

    fn finish(&mut self, _tx: &mut Transaction) -> Result<(), ErrorStatus> {
        self.advance();
        Ok(())
    }

    fn undo(&mut self, _tx: &mut Transaction, _oid: &Oid) -> Result<(), ErrorStatus> {
        self.pending = false;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mib_db::TxId;
    use pretty_assertions::assert_eq;

    fn instance() -> Oid {
        Oid::from(TARGET_SPIN_LOCK).child(0)
    }

    #[test]
    fn test_set_must_match_current_value() {
        let mut lock = TargetSpinLock::new(5);
        let mut tx = Transaction::new(TxId(1));
        assert_eq!(
            lock.set(&mut tx, &instance(), &Value::Integer(4)),
            Err(ErrorStatus::InconsistentValue)
        );
        assert_eq!(
            lock.set(&mut tx, &instance(), &Value::from("5")),
            Err(ErrorStatus::WrongType)
        );
        lock.set(&mut tx, &instance(), &Value::Integer(5)).unwrap();
        // Not advanced until commit.
        assert_eq!(lock.get(&instance()), Ok(VarBind::new(instance(), 5)));
        lock.commit(&mut tx, &instance()).unwrap();
        assert_eq!(lock.value(), 6);
        // A second commit of the same PDU doesn't advance it again.
        lock.commit(&mut tx, &instance()).unwrap();
        assert_eq!(lock.value(), 6);
    }

    #[test]
    fn test_undo_and_wrap() {
        let mut lock = TargetSpinLock::new(i32::MAX);
        let mut tx = Transaction::new(TxId(2));
        lock.set(&mut tx, &instance(), &Value::Integer(i32::MAX)).unwrap();
        lock.undo(&mut tx, &instance()).unwrap();
        lock.commit(&mut tx, &instance()).unwrap();
        assert_eq!(lock.value(), i32::MAX);

        lock.set(&mut tx, &instance(), &Value::Integer(i32::MAX)).unwrap();
        lock.commit(&mut tx, &instance()).unwrap();
        assert_eq!(lock.value(), 0);
    }

    #[test]
    fn test_deferred_commit_advances_at_finish() {
        let mut lock = TargetSpinLock::new(3);
        let mut tx = Transaction::new(TxId(3));
        tx.defer_completion();
        lock.set(&mut tx, &instance(), &Value::Integer(3)).unwrap();
        lock.commit(&mut tx, &instance()).unwrap();
        assert_eq!(lock.value(), 3);
        lock.finish(&mut tx).unwrap();
        assert_eq!(lock.value(), 4);

        // Undone after its commit, the lock stays put.
        let mut tx = Transaction::new(TxId(4));
        tx.defer_completion();
        lock.set(&mut tx, &instance(), &Value::Integer(4)).unwrap();
        lock.commit(&mut tx, &instance()).unwrap();
        lock.undo(&mut tx, &instance()).unwrap();
        lock.finish(&mut tx).unwrap();
        assert_eq!(lock.value(), 4);
    }

    #[test]
    fn test_reads() {
        let lock = TargetSpinLock::default();
        let subtree = Oid::from(TARGET_SPIN_LOCK);
        assert_eq!(lock.get(&subtree), Err(ErrorStatus::NoSuchInstance));
        assert_eq!(lock.get_next(&subtree), Ok(VarBind::new(instance(), 0)));
        assert_eq!(lock.get_next(&instance()), Err(ErrorStatus::NoSuchName));
        assert_eq!(lock.get_bulk(&Oid::from([1, 3]), 10).unwrap().len(), 1);
        assert_eq!(lock.get_bulk(&Oid::from([1, 3]), 0), Ok(vec![]));
    }
}
