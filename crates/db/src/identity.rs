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

use mib_common::parse_hex;
use std::time::Instant;
use thiserror::Error;

use crate::config::MibConfig;

/// Supplies the local SNMP engine's identity, used when populating defaults of new rows.
pub trait EngineIdentity: Send + Sync {
    fn engine_id(&self) -> &[u8];
    fn engine_boots(&self) -> u32;
    /// Seconds since the engine last booted.
    fn engine_time(&self) -> u32;
}

/// Engine identity of this agent process.
#[derive(Debug, Clone)]
pub struct LocalEngine {
    engine_id: Vec<u8>,
    engine_boots: u32,
    started: Instant,
}

/// RFC 3411 format: enterprise 8072 (net-snmp private range) with the text format marker.
const DEFAULT_ENGINE_ID: [u8; 12] = [
    0x80, 0x00, 0x1f, 0x88, 0x04, b'm', b'i', b'b', b'-', b'a', b'g', b't',
];

impl LocalEngine {
    pub fn new(engine_id: Vec<u8>, engine_boots: u32) -> Self {
        Self {
            engine_id,
            engine_boots,
            started: Instant::now(),
        }
    }
}

#[derive(Error, Debug, Clone, Eq, PartialEq)]
pub enum IdentityError {
    #[error("Invalid engine id `{0}`: expected 5 to 32 octets of hex")]
    InvalidEngineId(String),
}

impl LocalEngine {
    /// The engine described by `config`, falling back to the built-in id when none is given.
    pub fn from_config(config: &MibConfig) -> Result<Self, IdentityError> {
        let engine_id = match &config.engine_id {
            None => DEFAULT_ENGINE_ID.to_vec(),
            Some(hex) => parse_hex(hex)
                .filter(|id| (5..=32).contains(&id.len()))
                .ok_or_else(|| IdentityError::InvalidEngineId(hex.clone()))?,
        };
        Ok(Self::new(engine_id, config.engine_boots))
    }
}

impl Default for LocalEngine {
    fn default() -> Self {
        Self::new(DEFAULT_ENGINE_ID.to_vec(), 1)
    }
}

impl EngineIdentity for LocalEngine {
    fn engine_id(&self) -> &[u8] {
        &self.engine_id
    }

    fn engine_boots(&self) -> u32 {
        self.engine_boots
    }

    fn engine_time(&self) -> u32 {
        u32::try_from(self.started.elapsed().as_secs()).unwrap_or(u32::MAX)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_config() {
        let config = MibConfig {
            engine_id: Some("0x80001f8804".to_string()),
            engine_boots: 7,
            ..MibConfig::default()
        };
        let engine = LocalEngine::from_config(&config).unwrap();
        assert_eq!(engine.engine_id(), &[0x80, 0x00, 0x1f, 0x88, 0x04]);
        assert_eq!(engine.engine_boots(), 7);

        let short = MibConfig {
            engine_id: Some("8000".to_string()),
            ..MibConfig::default()
        };
        assert_eq!(
            LocalEngine::from_config(&short).err(),
            Some(IdentityError::InvalidEngineId("8000".to_string()))
        );
        let fallback = LocalEngine::from_config(&MibConfig::default()).unwrap();
        assert_eq!(fallback.engine_id(), LocalEngine::default().engine_id());
    }

    #[test]
    fn test_default_engine_id_is_well_formed() {
        let engine = LocalEngine::default();
        // Between 5 and 32 octets.
        assert!((5..=32).contains(&engine.engine_id().len()));
        assert_eq!(engine.engine_boots(), 1);
    }
}
