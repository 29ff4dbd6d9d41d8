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

//! Routing of requests and whole PDUs to the registered MIB objects.

use mib_common::{ErrorStatus, Oid, Request, RequestKind, VarBind};
use thiserror::Error;
use tracing::{debug, error, info, warn};

use crate::config::MibConfig;
use crate::object::MibObject;
use crate::provider::PersistenceError;
use crate::tx_management::{Transaction, TxId};

#[derive(Error, Debug, Clone, Eq, PartialEq)]
pub enum RegistryError {
    #[error("{name} at {subtree} overlaps {existing}")]
    Overlap {
        name: &'static str,
        subtree: Oid,
        existing: &'static str,
    },
}

/// A rejected SET PDU: the status to report and the zero-based index of the varbind at fault.
#[derive(Error, Debug, Clone, Copy, Eq, PartialEq)]
#[error("{status} at varbind {index}")]
pub struct SetFailure {
    pub status: ErrorStatus,
    pub index: usize,
}

/// Every MIB object the agent serves, ordered by subtree.
pub struct MibRegistry {
    objects: Vec<Box<dyn MibObject>>,
    next_tx: u64,
    config: MibConfig,
}

/// Read errors that mean "nothing here", so a walk moves on to the next object.
fn is_exhausted(status: ErrorStatus) -> bool {
    matches!(
        status,
        ErrorStatus::NoSuchName | ErrorStatus::NoSuchObject | ErrorStatus::NoSuchInstance
    )
}

impl MibRegistry {
    pub fn new(config: &MibConfig) -> Self {
        Self {
            objects: vec![],
            next_tx: 1,
            config: config.clone(),
        }
    }

    /// Add an object. Subtrees may not nest inside one another.
    pub fn register(&mut self, object: Box<dyn MibObject>) -> Result<(), RegistryError> {
        let subtree = object.subtree();
        if let Some(existing) = self
            .objects
            .iter()
            .find(|o| o.subtree().starts_with(subtree) || subtree.starts_with(o.subtree()))
        {
            return Err(RegistryError::Overlap {
                name: object.name(),
                subtree: subtree.clone(),
                existing: existing.name(),
            });
        }
        let position = self
            .objects
            .partition_point(|o| o.subtree() < object.subtree());
        debug!(name = object.name(), subtree = %object.subtree(), "Registered object");
        self.objects.insert(position, object);
        Ok(())
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.objects.iter().map(|o| o.name())
    }

    /// Load every object's persisted state.
    pub fn load_all(&mut self) -> Result<usize, PersistenceError> {
        let mut total = 0;
        for object in &mut self.objects {
            let loaded = object.load()?;
            info!(name = object.name(), loaded, "Loaded object state");
            total += loaded;
        }
        Ok(total)
    }

    /// Start a transaction for one SET PDU.
    pub fn begin(&mut self) -> Transaction {
        let id = TxId(self.next_tx);
        self.next_tx += 1;
        Transaction::new(id)
    }

    fn route(&self, oid: &Oid) -> Option<usize> {
        self.objects.iter().position(|o| oid.starts_with(o.subtree()))
    }

    /// Handle one request. Reads yield their varbinds, writes an empty list.
    pub fn dispatch(
        &mut self,
        tx: &mut Transaction,
        request: &Request,
    ) -> Result<Vec<VarBind>, ErrorStatus> {
        let oid = &request.oid;
        match request.kind {
            RequestKind::Get => self.get_one(oid).map(|vb| vec![vb]),
            RequestKind::GetNext => self.get_next_one(oid).map(|vb| vec![vb]),
            RequestKind::GetBulk => self.get_bulk(oid, request.max_repetitions),
            RequestKind::Set | RequestKind::Create => {
                let Some(value) = &request.value else {
                    warn!(kind = %request.kind, %oid, "Write request without a value");
                    return Err(ErrorStatus::GenError);
                };
                let index = self.route(oid).ok_or(ErrorStatus::NoSuchName)?;
                let object = &mut self.objects[index];
                if request.kind == RequestKind::Set {
                    object.set(tx, oid, value)?;
                } else {
                    object.create(tx, oid, value)?;
                }
                Ok(vec![])
            }
            RequestKind::Commit => {
                let index = self.route(oid).ok_or(ErrorStatus::NoSuchName)?;
                self.objects[index].commit(tx, oid)?;
                Ok(vec![])
            }
            RequestKind::Undo => {
                if let Some(index) = self.route(oid) {
                    self.objects[index].undo(tx, oid)?;
                }
                Ok(vec![])
            }
        }
    }

    fn get_one(&self, oid: &Oid) -> Result<VarBind, ErrorStatus> {
        let index = self.route(oid).ok_or(ErrorStatus::NoSuchObject)?;
        self.objects[index].get(oid)
    }

    /// Objects that may hold instances after `oid`, in order.
    fn objects_after<'a>(&'a self, oid: &'a Oid) -> impl Iterator<Item = &'a dyn MibObject> + 'a {
        self.objects
            .iter()
            .filter(move |o| o.subtree().subtree_end().is_none_or(|end| *oid < end))
            .map(|o| o.as_ref())
    }

    fn get_next_one(&self, oid: &Oid) -> Result<VarBind, ErrorStatus> {
        for object in self.objects_after(oid) {
            match object.get_next(oid) {
                Ok(vb) => return Ok(vb),
                Err(e) if is_exhausted(e) => continue,
                Err(e) => return Err(e),
            }
        }
        Err(ErrorStatus::NoSuchName)
    }

    /// GET of each OID.
    pub fn get(&self, oids: &[Oid]) -> Vec<Result<VarBind, ErrorStatus>> {
        oids.iter().map(|oid| self.get_one(oid)).collect()
    }

    /// GET-NEXT of each OID, moving on to later objects when one is exhausted.
    pub fn get_next(&self, oids: &[Oid]) -> Vec<Result<VarBind, ErrorStatus>> {
        oids.iter().map(|oid| self.get_next_one(oid)).collect()
    }

    /// GET-BULK from `oid`, served by the first object with anything after it. The repetition
    /// count is clamped to the configured maximum.
    pub fn get_bulk(&self, oid: &Oid, max_repetitions: u32) -> Result<Vec<VarBind>, ErrorStatus> {
        let max_repetitions = self.config.clamp_repetitions(max_repetitions);
        if max_repetitions == 0 {
            return Ok(vec![]);
        }
        for object in self.objects_after(oid) {
            match object.get_bulk(oid, max_repetitions) {
                Ok(results) => return Ok(results),
                Err(e) if is_exhausted(e) => continue,
                Err(e) => return Err(e),
            }
        }
        Err(ErrorStatus::NoSuchName)
    }

    /// Every instance under `root`, in order.
    pub fn walk(&self, root: &Oid) -> Result<Vec<VarBind>, ErrorStatus> {
        let mut results = vec![];
        let mut cursor = root.clone();
        loop {
            match self.get_next_one(&cursor) {
                Ok(vb) if vb.oid.starts_with(root) => {
                    cursor = vb.oid.clone();
                    results.push(vb);
                }
                Ok(_) | Err(ErrorStatus::NoSuchName) => return Ok(results),
                Err(e) => return Err(e),
            }
        }
    }

    fn undo_all(&mut self, tx: &mut Transaction, varbinds: &[VarBind]) {
        for vb in varbinds {
            let Some(index) = self.route(&vb.oid) else {
                continue;
            };
            if let Err(e) = self.objects[index].undo(tx, &vb.oid) {
                error!(oid = %vb.oid, "UNDO failed: {e}");
            }
        }
    }

    /// Apply a SET PDU: SET every varbind, then COMMIT every varbind. A failure in either phase
    /// undoes the varbinds processed so far and reports the one at fault.
    ///
    /// Batches are only completed once every COMMIT has succeeded, so a rejected PDU leaves no
    /// trace in any table or in persistence.
    pub fn set_pdu(&mut self, varbinds: &[VarBind]) -> Result<(), SetFailure> {
        let mut tx = self.begin();
        tx.defer_completion();
        for (index, vb) in varbinds.iter().enumerate() {
            let result = match self.route(&vb.oid) {
                Some(object) => self.objects[object].set(&mut tx, &vb.oid, &vb.value),
                None => Err(ErrorStatus::NoSuchName),
            };
            if let Err(status) = result {
                debug!(tx = ?tx.id(), index, oid = %vb.oid, %status, "SET rejected");
                self.undo_all(&mut tx, &varbinds[..=index]);
                return Err(SetFailure { status, index });
            }
        }
        for (index, vb) in varbinds.iter().enumerate() {
            let result = match self.route(&vb.oid) {
                Some(object) => self.objects[object].commit(&mut tx, &vb.oid),
                None => Err(ErrorStatus::NoSuchName),
            };
            if let Err(status) = result {
                debug!(tx = ?tx.id(), index, oid = %vb.oid, %status, "COMMIT rejected");
                self.undo_all(&mut tx, varbinds);
                return Err(SetFailure { status, index });
            }
        }
        for object in &mut self.objects {
            if let Err(e) = object.finish(&mut tx) {
                error!(tx = ?tx.id(), name = object.name(), "Completing batch failed: {e}");
            }
        }
        debug!(tx = ?tx.id(), varbinds = varbinds.len(), "SET PDU applied");
        Ok(())
    }
}
