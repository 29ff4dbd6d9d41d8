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

//! The SNMP-COMMUNITY-MIB and SNMP-TARGET-MIB tables served by the agent, wired into a
//! [`MibRegistry`].

use mib_db::{
    EngineIdentity, MibConfig, MibRegistry, Persistence, RegistryError, TableConfig,
    TableDescriptor,
};
use std::sync::Arc;

pub mod community;
mod domain;
pub mod spin_lock;
pub mod target_addr;
pub mod target_params;

pub use community::{CommunityFields, community_table};
pub use spin_lock::TargetSpinLock;
pub use target_addr::{TargetAddrFields, TransportAddress, target_addr_table};
pub use target_params::{TargetParamsFields, target_params_table};

/// Apply global and per-table configuration to a descriptor.
pub(crate) fn configure<F>(
    desc: TableDescriptor<F>,
    config: &MibConfig,
    table_config: Option<&TableConfig>,
) -> TableDescriptor<F> {
    let storage = table_config
        .and_then(|t| t.default_storage_type)
        .unwrap_or(config.default_storage_type);
    let desc = desc.with_default_storage(storage);
    match table_config.and_then(|t| t.partition.as_deref()) {
        Some(partition) => desc.with_file_id(partition),
        None => desc,
    }
}

/// The persistence partition of every standard table, with its configuration.
pub fn table_partitions(config: &MibConfig) -> Vec<(String, TableConfig)> {
    [
        (community::COMMUNITY_FILE_ID, &config.community),
        (target_addr::TARGET_ADDR_FILE_ID, &config.target_addr),
        (target_params::TARGET_PARAMS_FILE_ID, &config.target_params),
    ]
    .into_iter()
    .map(|(file_id, table_config)| {
        let table_config = table_config.clone().unwrap_or_default();
        let partition = table_config
            .partition
            .clone()
            .unwrap_or_else(|| file_id.to_string());
        (partition, table_config)
    })
    .collect()
}

/// A registry serving the community table, the target tables and the target spin lock.
pub fn standard_registry(
    config: &MibConfig,
    identity: Arc<dyn EngineIdentity>,
    persistence: Arc<dyn Persistence>,
) -> Result<MibRegistry, RegistryError> {
    let mut registry = MibRegistry::new(config);
    registry.register(Box::new(community_table(
        config,
        identity.clone(),
        persistence.clone(),
    )))?;
    registry.register(Box::new(TargetSpinLock::default()))?;
    registry.register(Box::new(target_addr_table(
        config,
        identity.clone(),
        persistence.clone(),
    )))?;
    registry.register(Box::new(target_params_table(config, identity, persistence)))?;
    Ok(registry)
}

#[cfg(test)]
mod tests {
    use super::*;
    use mib_common::StorageType;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_configure_overrides() {
        let config = MibConfig {
            default_storage_type: StorageType::Volatile,
            community: Some(TableConfig {
                partition: Some("communities".to_string()),
                default_storage_type: Some(StorageType::Permanent),
                ..TableConfig::default()
            }),
            ..MibConfig::default()
        };
        let community = configure(
            community::community_descriptor(),
            &config,
            config.community.as_ref(),
        );
        assert_eq!(community.file_id, "communities");
        assert_eq!(community.default_storage, StorageType::Permanent);

        let addr = configure(
            target_addr::target_addr_descriptor(),
            &config,
            config.target_addr.as_ref(),
        );
        assert_eq!(addr.file_id, "snmp_target_addr");
        assert_eq!(addr.default_storage, StorageType::Volatile);

        let partitions: Vec<String> = table_partitions(&config)
            .into_iter()
            .map(|(p, _)| p)
            .collect();
        assert_eq!(
            partitions,
            vec!["communities", "snmp_target_addr", "snmp_target_params"]
        );
    }
}
