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

//! `snmpTargetAddrTable` (SNMP-TARGET-MIB): where notifications go.

use mib_common::{ErrorStatus, IndexSpec, Oid, OrderedKey, Syntax, Value};
use mib_db::{
    ColumnAccessor, ColumnDef, EngineIdentity, MibConfig, Persistence, RowFields, Table,
    TableDescriptor,
};
use serde::{Deserialize, Serialize};
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};
use std::sync::Arc;

use crate::configure;
use crate::domain::{admin_string, integer_in, octets};

pub const TARGET_ADDR_ENTRY: [u32; 10] = [1, 3, 6, 1, 6, 3, 12, 1, 2, 1];
pub const TARGET_ADDR_FILE_ID: &str = "snmp_target_addr";

/// `snmpUDPDomain`.
pub const UDP_DOMAIN: [u32; 7] = [1, 3, 6, 1, 6, 1, 1];
pub const DEFAULT_TIMEOUT: i32 = 1500;
pub const DEFAULT_RETRY_COUNT: i32 = 3;

pub const COL_TDOMAIN: u32 = 2;
pub const COL_TADDRESS: u32 = 3;
pub const COL_TIMEOUT: u32 = 4;
pub const COL_RETRY_COUNT: u32 = 5;
pub const COL_TAG_LIST: u32 = 6;
pub const COL_PARAMS: u32 = 7;
pub const COL_STORAGE_TYPE: u32 = 8;
pub const COL_STATUS: u32 = 9;

/// An IP transport address. Port 0 means the notification default.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransportAddress {
    pub ip: IpAddr,
    pub port: u16,
}

impl TransportAddress {
    /// Decode a 4 or 16 octet address, optionally followed by a big-endian port.
    pub fn from_octets(bytes: &[u8]) -> Result<Self, ErrorStatus> {
        let (ip, port) = match bytes.len() {
            4 | 6 => {
                let octets: [u8; 4] = bytes[..4].try_into().map_err(|_| ErrorStatus::WrongLength)?;
                (IpAddr::V4(Ipv4Addr::from(octets)), &bytes[4..])
            }
            16 | 18 => {
                let octets: [u8; 16] =
                    bytes[..16].try_into().map_err(|_| ErrorStatus::WrongLength)?;
                (IpAddr::V6(Ipv6Addr::from(octets)), &bytes[16..])
            }
            _ => return Err(ErrorStatus::WrongLength),
        };
        let port = match port {
            [hi, lo] => u16::from_be_bytes([*hi, *lo]),
            _ => 0,
        };
        Ok(Self { ip, port })
    }

    /// Address octets followed by the port, always.
    pub fn to_octets(&self) -> Vec<u8> {
        let mut bytes = match self.ip {
            IpAddr::V4(ip) => ip.octets().to_vec(),
            IpAddr::V6(ip) => ip.octets().to_vec(),
        };
        bytes.extend_from_slice(&self.port.to_be_bytes());
        bytes
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetAddrFields {
    pub t_domain: Oid,
    pub t_address: Option<TransportAddress>,
    pub timeout: i32,
    pub retry_count: i32,
    pub tag_list: Vec<u8>,
    pub params: Vec<u8>,
}

impl RowFields for TargetAddrFields {
    fn defaults(_key: &OrderedKey, _identity: &dyn EngineIdentity) -> Self {
        Self {
            t_domain: Oid::from(UDP_DOMAIN),
            t_address: None,
            timeout: DEFAULT_TIMEOUT,
            retry_count: DEFAULT_RETRY_COUNT,
            tag_list: vec![],
            params: vec![],
        }
    }

    fn is_ready(&self) -> bool {
        !self.t_domain.is_empty() && self.t_address.is_some() && !self.params.is_empty()
    }
}

struct TargetAddrColumns;

impl ColumnAccessor<TargetAddrFields> for TargetAddrColumns {
    fn get(&self, fields: &TargetAddrFields, column: u32) -> Option<Value> {
        let value = match column {
            COL_TDOMAIN => Value::ObjectId(fields.t_domain.clone()),
            COL_TADDRESS => Value::OctetString(
                fields
                    .t_address
                    .map(|a| a.to_octets())
                    .unwrap_or_default(),
            ),
            COL_TIMEOUT => Value::Integer(fields.timeout),
            COL_RETRY_COUNT => Value::Integer(fields.retry_count),
            COL_TAG_LIST => Value::OctetString(fields.tag_list.clone()),
            COL_PARAMS => Value::OctetString(fields.params.clone()),
            _ => return None,
        };
        Some(value)
    }

    fn set(
        &self,
        fields: &mut TargetAddrFields,
        column: u32,
        value: &Value,
    ) -> Result<(), ErrorStatus> {
        match column {
            COL_TDOMAIN => {
                let domain = value.as_oid().ok_or(ErrorStatus::WrongType)?;
                if !(7..=31).contains(&domain.len()) {
                    return Err(ErrorStatus::WrongLength);
                }
                fields.t_domain = domain.clone();
            }
            COL_TADDRESS => fields.t_address = Some(TransportAddress::from_octets(octets(value)?)?),
            COL_TIMEOUT => fields.timeout = integer_in(value, 0..=i32::MAX)?,
            COL_RETRY_COUNT => fields.retry_count = integer_in(value, 0..=255)?,
            COL_TAG_LIST => fields.tag_list = admin_string(value, 0..=31)?,
            COL_PARAMS => fields.params = admin_string(value, 0..=31)?,
            _ => return Err(ErrorStatus::NoSuchName),
        }
        Ok(())
    }
}

pub fn target_addr_descriptor() -> TableDescriptor<TargetAddrFields> {
    TableDescriptor::new(
        "snmpTargetAddrTable",
        TARGET_ADDR_FILE_ID,
        Oid::from(TARGET_ADDR_ENTRY),
        IndexSpec::implied_string(1, 32),
        vec![
            ColumnDef::index(1, "snmpTargetAddrName", Syntax::OctetString),
            ColumnDef::field(COL_TDOMAIN, "snmpTargetAddrTDomain", Syntax::ObjectId),
            ColumnDef::field(COL_TADDRESS, "snmpTargetAddrTAddress", Syntax::OctetString),
            ColumnDef::field(COL_TIMEOUT, "snmpTargetAddrTimeout", Syntax::Integer),
            ColumnDef::field(COL_RETRY_COUNT, "snmpTargetAddrRetryCount", Syntax::Integer),
            ColumnDef::field(COL_TAG_LIST, "snmpTargetAddrTagList", Syntax::OctetString),
            ColumnDef::field(COL_PARAMS, "snmpTargetAddrParams", Syntax::OctetString),
            ColumnDef::storage_type(COL_STORAGE_TYPE, "snmpTargetAddrStorageType"),
            ColumnDef::row_status(COL_STATUS, "snmpTargetAddrRowStatus"),
        ],
        Box::new(TargetAddrColumns),
    )
}

pub fn target_addr_table(
    config: &MibConfig,
    identity: Arc<dyn EngineIdentity>,
    persistence: Arc<dyn Persistence>,
) -> Table<TargetAddrFields> {
    let desc = configure(target_addr_descriptor(), config, config.target_addr.as_ref());
    Table::new(desc, identity, persistence)
}
