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

//! `snmpCommunityTable` (SNMP-COMMUNITY-MIB): community strings and the security name and
//! context each one maps to.

use mib_common::{ErrorStatus, IndexSpec, Oid, OrderedKey, Syntax, Value};
use mib_db::{
    ColumnAccessor, ColumnDef, EngineIdentity, MibConfig, Persistence, RowFields, Table,
    TableDescriptor,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::configure;
use crate::domain::{admin_string, octets};

pub const COMMUNITY_ENTRY: [u32; 10] = [1, 3, 6, 1, 6, 3, 18, 1, 1, 1];
pub const COMMUNITY_FILE_ID: &str = "snmp_community";

pub const COL_NAME: u32 = 2;
pub const COL_SECURITY_NAME: u32 = 3;
pub const COL_CONTEXT_ENGINE_ID: u32 = 4;
pub const COL_CONTEXT_NAME: u32 = 5;
pub const COL_TRANSPORT_TAG: u32 = 6;
pub const COL_STORAGE_TYPE: u32 = 7;
pub const COL_STATUS: u32 = 8;

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommunityFields {
    pub name: Vec<u8>,
    pub security_name: Vec<u8>,
    pub context_engine_id: Vec<u8>,
    pub context_name: Vec<u8>,
    pub transport_tag: Vec<u8>,
}

impl RowFields for CommunityFields {
    fn defaults(_key: &OrderedKey, identity: &dyn EngineIdentity) -> Self {
        Self {
            context_engine_id: identity.engine_id().to_vec(),
            ..Default::default()
        }
    }

    fn is_ready(&self) -> bool {
        !self.name.is_empty() && !self.security_name.is_empty()
    }
}

struct CommunityColumns;

impl ColumnAccessor<CommunityFields> for CommunityColumns {
    fn get(&self, fields: &CommunityFields, column: u32) -> Option<Value> {
        let bytes = match column {
            COL_NAME => &fields.name,
            COL_SECURITY_NAME => &fields.security_name,
            COL_CONTEXT_ENGINE_ID => &fields.context_engine_id,
            COL_CONTEXT_NAME => &fields.context_name,
            COL_TRANSPORT_TAG => &fields.transport_tag,
            _ => return None,
        };
        Some(Value::OctetString(bytes.clone()))
    }

    fn set(
        &self,
        fields: &mut CommunityFields,
        column: u32,
        value: &Value,
    ) -> Result<(), ErrorStatus> {
        match column {
            COL_NAME => fields.name = admin_string(value, 1..=31)?,
            COL_SECURITY_NAME => fields.security_name = admin_string(value, 1..=31)?,
            COL_CONTEXT_ENGINE_ID => {
                let id = octets(value)?;
                if !(5..=32).contains(&id.len()) {
                    return Err(ErrorStatus::WrongLength);
                }
                fields.context_engine_id = id.to_vec();
            }
            COL_CONTEXT_NAME => fields.context_name = admin_string(value, 0..=31)?,
            COL_TRANSPORT_TAG => {
                let tag = octets(value)?;
                if tag.len() > 255 {
                    return Err(ErrorStatus::WrongLength);
                }
                // Tags are limited to 32 octets and may not contain NUL.
                if tag.len() > 32 || tag.contains(&0) {
                    return Err(ErrorStatus::WrongValue);
                }
                fields.transport_tag = tag.to_vec();
            }
            _ => return Err(ErrorStatus::NoSuchName),
        }
        Ok(())
    }
}

pub fn community_descriptor() -> TableDescriptor<CommunityFields> {
    TableDescriptor::new(
        "snmpCommunityTable",
        COMMUNITY_FILE_ID,
        Oid::from(COMMUNITY_ENTRY),
        IndexSpec::implied_string(1, 32),
        vec![
            ColumnDef::index(1, "snmpCommunityIndex", Syntax::OctetString),
            ColumnDef::field(COL_NAME, "snmpCommunityName", Syntax::OctetString),
            ColumnDef::field(
                COL_SECURITY_NAME,
                "snmpCommunitySecurityName",
                Syntax::OctetString,
            ),
            ColumnDef::field(
                COL_CONTEXT_ENGINE_ID,
                "snmpCommunityContextEngineID",
                Syntax::OctetString,
            ),
            ColumnDef::field(COL_CONTEXT_NAME, "snmpCommunityContextName", Syntax::OctetString),
            ColumnDef::field(
                COL_TRANSPORT_TAG,
                "snmpCommunityTransportTag",
                Syntax::OctetString,
            ),
            ColumnDef::storage_type(COL_STORAGE_TYPE, "snmpCommunityStorageType"),
            ColumnDef::row_status(COL_STATUS, "snmpCommunityStatus"),
        ],
        Box::new(CommunityColumns),
    )
}

pub fn community_table(
    config: &MibConfig,
    identity: Arc<dyn EngineIdentity>,
    persistence: Arc<dyn Persistence>,
) -> Table<CommunityFields> {
    let desc = configure(community_descriptor(), config, config.community.as_ref());
    Table::new(desc, identity, persistence)
}

#[cfg(test)]
mod tests {
    use super::*;
    use mib_db::LocalEngine;
    use test_case::test_case;

    fn set(column: u32, value: Value) -> Result<CommunityFields, ErrorStatus> {
        let mut fields = CommunityFields::default();
        CommunityColumns.set(&mut fields, column, &value)?;
        Ok(fields)
    }

    #[test_case(COL_NAME, Value::from("") => Err(ErrorStatus::WrongLength); "empty name")]
    #[test_case(COL_NAME, Value::from("x".repeat(32).as_str()) => Err(ErrorStatus::WrongLength); "long name")]
    #[test_case(COL_NAME, Value::from(b"pu\0b".as_slice()) => Err(ErrorStatus::WrongValue); "nul in name")]
    #[test_case(COL_SECURITY_NAME, Value::from("") => Err(ErrorStatus::WrongLength); "empty security name")]
    #[test_case(COL_CONTEXT_ENGINE_ID, Value::from("1234") => Err(ErrorStatus::WrongLength); "short engine id")]
    #[test_case(COL_CONTEXT_ENGINE_ID, Value::from("x".repeat(33).as_str()) => Err(ErrorStatus::WrongLength); "long engine id")]
    #[test_case(COL_CONTEXT_NAME, Value::from("") => Ok(()); "empty context name")]
    #[test_case(COL_CONTEXT_NAME, Value::from(b"\0".as_slice()) => Err(ErrorStatus::WrongValue); "nul in context name")]
    #[test_case(COL_TRANSPORT_TAG, Value::from("x".repeat(33).as_str()) => Err(ErrorStatus::WrongValue); "tag over 32")]
    #[test_case(COL_TRANSPORT_TAG, Value::from("x".repeat(256).as_str()) => Err(ErrorStatus::WrongLength); "tag over 255")]
    #[test_case(COL_TRANSPORT_TAG, Value::from("x".repeat(32).as_str()) => Ok(()); "tag of 32")]
    #[test_case(9, Value::from("x") => Err(ErrorStatus::NoSuchName); "unknown column")]
    fn test_column_domains(column: u32, value: Value) -> Result<(), ErrorStatus> {
        set(column, value).map(|_| ())
    }

    #[test]
    fn test_defaults_and_readiness() {
        let engine = LocalEngine::new(vec![0x80, 0, 0, 0, 1], 1);
        let mut fields = CommunityFields::defaults(&OrderedKey::from_implied(b"c"), &engine);
        assert_eq!(fields.context_engine_id, vec![0x80, 0, 0, 0, 1]);
        assert!(!fields.is_ready());

        CommunityColumns
            .set(&mut fields, COL_NAME, &Value::from("public"))
            .unwrap();
        assert!(!fields.is_ready());
        CommunityColumns
            .set(&mut fields, COL_SECURITY_NAME, &Value::from("public"))
            .unwrap();
        assert!(fields.is_ready());
        assert_eq!(
            CommunityColumns.get(&fields, COL_NAME),
            Some(Value::from("public"))
        );
        assert_eq!(CommunityColumns.get(&fields, COL_STATUS), None);
    }
}
