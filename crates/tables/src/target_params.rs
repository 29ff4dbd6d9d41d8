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

//! `snmpTargetParamsTable` (SNMP-TARGET-MIB): message processing and security parameters used
//! when generating messages to a target.

use mib_common::{ErrorStatus, IndexSpec, Oid, OrderedKey, Syntax, Value};
use mib_db::{
    ColumnAccessor, ColumnDef, EngineIdentity, MibConfig, Persistence, RowFields, Table,
    TableDescriptor,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::configure;
use crate::domain::{admin_string, integer_in};

pub const TARGET_PARAMS_ENTRY: [u32; 10] = [1, 3, 6, 1, 6, 3, 12, 1, 3, 1];
pub const TARGET_PARAMS_FILE_ID: &str = "snmp_target_params";

pub const COL_MP_MODEL: u32 = 2;
pub const COL_SECURITY_MODEL: u32 = 3;
pub const COL_SECURITY_NAME: u32 = 4;
pub const COL_SECURITY_LEVEL: u32 = 5;
pub const COL_STORAGE_TYPE: u32 = 6;
pub const COL_STATUS: u32 = 7;

/// Unset columns stay `None` until written; a row needs all four before it can be activated.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetParamsFields {
    pub mp_model: Option<i32>,
    pub security_model: Option<i32>,
    pub security_name: Option<Vec<u8>>,
    pub security_level: Option<i32>,
}

impl RowFields for TargetParamsFields {
    fn defaults(_key: &OrderedKey, _identity: &dyn EngineIdentity) -> Self {
        Self::default()
    }

    fn is_ready(&self) -> bool {
        self.mp_model.is_some()
            && self.security_model.is_some()
            && self.security_name.is_some()
            && self.security_level.is_some()
    }
}

struct TargetParamsColumns;

impl ColumnAccessor<TargetParamsFields> for TargetParamsColumns {
    fn get(&self, fields: &TargetParamsFields, column: u32) -> Option<Value> {
        let value = match column {
            COL_MP_MODEL => Value::Integer(fields.mp_model.unwrap_or_default()),
            COL_SECURITY_MODEL => Value::Integer(fields.security_model.unwrap_or_default()),
            COL_SECURITY_NAME => {
                Value::OctetString(fields.security_name.clone().unwrap_or_default())
            }
            COL_SECURITY_LEVEL => Value::Integer(fields.security_level.unwrap_or_default()),
            _ => return None,
        };
        Some(value)
    }

    fn set(
        &self,
        fields: &mut TargetParamsFields,
        column: u32,
        value: &Value,
    ) -> Result<(), ErrorStatus> {
        match column {
            COL_MP_MODEL => {
                let model = value.as_integer().ok_or(ErrorStatus::WrongType)?;
                // SNMPv1, SNMPv2c, SNMPv3.
                if !matches!(model, 0 | 1 | 3) {
                    return Err(ErrorStatus::WrongValue);
                }
                fields.mp_model = Some(model);
            }
            COL_SECURITY_MODEL => fields.security_model = Some(integer_in(value, 1..=3)?),
            COL_SECURITY_NAME => fields.security_name = Some(admin_string(value, 1..=31)?),
            COL_SECURITY_LEVEL => fields.security_level = Some(integer_in(value, 1..=3)?),
            _ => return Err(ErrorStatus::NoSuchName),
        }
        Ok(())
    }
}

pub fn target_params_descriptor() -> TableDescriptor<TargetParamsFields> {
    TableDescriptor::new(
        "snmpTargetParamsTable",
        TARGET_PARAMS_FILE_ID,
        Oid::from(TARGET_PARAMS_ENTRY),
        IndexSpec::implied_string(1, 32),
        vec![
            ColumnDef::index(1, "snmpTargetParamsName", Syntax::OctetString),
            ColumnDef::field(COL_MP_MODEL, "snmpTargetParamsMPModel", Syntax::Integer),
            ColumnDef::field(
                COL_SECURITY_MODEL,
                "snmpTargetParamsSecurityModel",
                Syntax::Integer,
            ),
            ColumnDef::field(
                COL_SECURITY_NAME,
                "snmpTargetParamsSecurityName",
                Syntax::OctetString,
            ),
            ColumnDef::field(
                COL_SECURITY_LEVEL,
                "snmpTargetParamsSecurityLevel",
                Syntax::Integer,
            ),
            ColumnDef::storage_type(COL_STORAGE_TYPE, "snmpTargetParamsStorageType"),
            ColumnDef::row_status(COL_STATUS, "snmpTargetParamsRowStatus"),
        ],
        Box::new(TargetParamsColumns),
    )
}

pub fn target_params_table(
    config: &MibConfig,
    identity: Arc<dyn EngineIdentity>,
    persistence: Arc<dyn Persistence>,
) -> Table<TargetParamsFields> {
    let desc = configure(
        target_params_descriptor(),
        config,
        config.target_params.as_ref(),
    );
    Table::new(desc, identity, persistence)
}
