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

use clap::builder::ValueHint;
use clap_derive::{Parser, Subcommand};
use eyre::eyre;
use figment::Figment;
use figment::providers::{Format as ProviderFormat, Serialized, Yaml};
use mib_common::{Oid, Value, VarBind, parse_hex};
use mib_db::MibConfig;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::str::FromStr;

#[derive(Parser, Debug)]
#[command(name = "mibctl")]
#[command(about = "Read and write the agent's SNMP tables", long_about = None)]
pub struct Args {
    #[arg(
        long,
        value_name = "data-dir",
        help = "Directory holding the persisted tables",
        value_hint = ValueHint::DirPath,
        default_value = "./mib-data"
    )]
    pub data_dir: PathBuf,

    #[arg(
        long,
        value_name = "config",
        help = "Path to configuration (YAML) file to use, if any. If not specified, defaults are used.\
                Configuration file values can be overridden by command line arguments.",
        value_hint = ValueHint::FilePath
    )]
    pub config_file: Option<PathBuf>,

    #[command(flatten)]
    pub engine_args: EngineArgs,

    #[arg(long, help = "Enable debug logging")]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Parser, Debug, Serialize, Deserialize)]
pub struct EngineArgs {
    #[arg(
        long,
        value_name = "engine-id",
        help = "Local engine id, as hex (5 to 32 octets)"
    )]
    pub engine_id: Option<String>,

    #[arg(
        long,
        value_name = "max-bulk",
        help = "Upper bound on GET-BULK repetitions"
    )]
    pub max_bulk: Option<u32>,
}

impl EngineArgs {
    fn merge_config(&self, config: &mut MibConfig) -> Result<(), eyre::Report> {
        if let Some(engine_id) = &self.engine_id {
            config.engine_id = Some(engine_id.clone());
        }
        if let Some(max_bulk) = self.max_bulk {
            config.max_repetitions = max_bulk;
        }
        Ok(())
    }
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// GET one or more instances.
    Get {
        #[arg(required = true)]
        oids: Vec<Oid>,
    },
    /// GET-NEXT from one or more OIDs.
    Next {
        #[arg(required = true)]
        oids: Vec<Oid>,
    },
    /// GET-BULK from an OID.
    Bulk {
        oid: Oid,
        #[arg(short = 'n', long, default_value_t = 10)]
        max_repetitions: u32,
    },
    /// Every instance under an OID, or under the whole agent.
    Walk { root: Option<Oid> },
    /// Apply one SET PDU. Each assignment is `OID=TYPE:VALUE` where TYPE is one of
    /// `i` (integer), `u` (unsigned), `s` (string), `x` (hex octets) or `o` (object identifier).
    Set {
        #[arg(required = true)]
        assignments: Vec<Assignment>,
    },
}

/// One `OID=TYPE:VALUE` varbind given on the command line.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Assignment(pub VarBind);

impl FromStr for Assignment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (oid, typed) = s
            .split_once('=')
            .ok_or_else(|| format!("expected OID=TYPE:VALUE, got {s:?}"))?;
        let oid = Oid::from_str(oid).map_err(|e| format!("bad OID {oid:?}: {e}"))?;
        let (kind, raw) = typed
            .split_once(':')
            .ok_or_else(|| format!("expected TYPE:VALUE, got {typed:?}"))?;
        let value = match kind {
            "i" => Value::Integer(raw.parse().map_err(|e| format!("bad integer {raw:?}: {e}"))?),
            "u" => Value::Unsigned(raw.parse().map_err(|e| format!("bad unsigned {raw:?}: {e}"))?),
            "s" => Value::from(raw),
            "x" => Value::OctetString(parse_hex(raw).ok_or_else(|| format!("bad hex {raw:?}"))?),
            "o" => Value::ObjectId(Oid::from_str(raw).map_err(|e| format!("bad OID {raw:?}: {e}"))?),
            _ => return Err(format!("unknown value type {kind:?}")),
        };
        Ok(Assignment(VarBind::new(oid, value)))
    }
}

impl Args {
    /// Load the configuration file if we have it, then merge the arguments into it.
    pub fn load_config(&self) -> Result<MibConfig, eyre::Report> {
        let mut config = match &self.config_file {
            Some(config_path) => Figment::new()
                .merge(Serialized::defaults(MibConfig::default()))
                .merge(Yaml::file(config_path))
                .extract::<MibConfig>()
                .map_err(|e| {
                    eyre!(
                        "Failed to parse configuration from {:?}: {}",
                        config_path,
                        e
                    )
                })?,
            None => MibConfig::default(),
        };
        self.engine_args.merge_config(&mut config)?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("1.3.6.1.6.3.12.1.1.0=i:7" => Ok(Value::Integer(7)); "integer")]
    #[test_case("1.3.6.1=u:4294967295" => Ok(Value::Unsigned(u32::MAX)); "unsigned")]
    #[test_case("1.3.6.1=s:public" => Ok(Value::from("public")); "string")]
    #[test_case("1.3.6.1=s:" => Ok(Value::from("")); "empty string")]
    #[test_case("1.3.6.1=x:c0:00:02:0a" => Ok(Value::OctetString(vec![192, 0, 2, 10])); "hex")]
    #[test_case("1.3.6.1=o:1.3.6.1.6.1.1" => Ok(Value::ObjectId(Oid::from([1, 3, 6, 1, 6, 1, 1]))); "oid")]
    fn test_parse_assignment(s: &str) -> Result<Value, ()> {
        s.parse::<Assignment>().map(|a| a.0.value).map_err(|_| ())
    }

    #[test_case("1.3.6.1"; "missing value")]
    #[test_case("1.3.6.1=public"; "missing type")]
    #[test_case("1.3.6.1=q:1"; "unknown type")]
    #[test_case("1.3.6.1=i:one"; "bad integer")]
    #[test_case("1.3.6.1=x:zz"; "bad hex")]
    fn test_reject_assignment(s: &str) {
        assert!(s.parse::<Assignment>().is_err());
    }

    #[test]
    fn test_assignment_keeps_oid() {
        use pretty_assertions::assert_eq;

        let a: Assignment = "1.3.6.1.6.3.12.1.1.0=i:3".parse().unwrap();
        assert_eq!(a.0.oid, Oid::from([1, 3, 6, 1, 6, 3, 12, 1, 1, 0]));
    }

    #[test]
    fn test_engine_args_override_config() {
        use pretty_assertions::assert_eq;

        let args = EngineArgs {
            engine_id: Some("8000000001".to_string()),
            max_bulk: Some(5),
        };
        let mut config = MibConfig::default();
        args.merge_config(&mut config).unwrap();
        assert_eq!(config.engine_id.as_deref(), Some("8000000001"));
        assert_eq!(config.max_repetitions, 5);
    }
}
