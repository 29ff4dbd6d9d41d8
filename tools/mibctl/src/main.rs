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

//! Command-line access to the agent's tables: the same registry the agent serves, opened
//! directly over its data directory.

mod args;

use crate::args::{Args, Command};
use clap::Parser;
use eyre::{Report, bail, eyre};
use mib_common::{ErrorStatus, Oid, VarBind, tracing::init_tracing};
use mib_db::{FjallPersistence, LocalEngine, MibRegistry};
use mib_tables::{standard_registry, table_partitions};
use std::sync::Arc;
use tracing::info;

/// Everything the standard registry serves lives under snmpModules.
const AGENT_ROOT: [u32; 6] = [1, 3, 6, 1, 6, 3];

fn print_results(results: Vec<Result<VarBind, ErrorStatus>>, oids: &[Oid]) {
    for (result, oid) in results.into_iter().zip(oids) {
        match result {
            Ok(vb) => println!("{vb}"),
            Err(status) => println!("{oid} = {status}"),
        }
    }
}

fn run(registry: &mut MibRegistry, command: Command) -> Result<(), Report> {
    match command {
        Command::Get { oids } => print_results(registry.get(&oids), &oids),
        Command::Next { oids } => print_results(registry.get_next(&oids), &oids),
        Command::Bulk {
            oid,
            max_repetitions,
        } => {
            for vb in registry
                .get_bulk(&oid, max_repetitions)
                .map_err(|e| eyre!("GET-BULK from {oid} failed: {e}"))?
            {
                println!("{vb}");
            }
        }
        Command::Walk { root } => {
            let root = root.unwrap_or_else(|| Oid::from(AGENT_ROOT));
            let results = registry
                .walk(&root)
                .map_err(|e| eyre!("Walk of {root} failed: {e}"))?;
            for vb in &results {
                println!("{vb}");
            }
            info!(%root, instances = results.len(), "Walk complete");
        }
        Command::Set { assignments } => {
            let varbinds: Vec<VarBind> = assignments.into_iter().map(|a| a.0).collect();
            if let Err(failure) = registry.set_pdu(&varbinds) {
                bail!(
                    "SET failed at varbind {} ({}): {}",
                    failure.index + 1,
                    varbinds[failure.index].oid,
                    failure.status
                );
            }
            for vb in &varbinds {
                println!("{vb}");
            }
        }
    }
    Ok(())
}

fn main() -> Result<(), Report> {
    color_eyre::install()?;

    let args = Args::parse();
    init_tracing(args.debug)?;

    let config = args.load_config()?;
    let identity = LocalEngine::from_config(&config)?;

    std::fs::create_dir_all(&args.data_dir)?;
    info!("Opening tables at {:?}", args.data_dir);
    let (persistence, fresh) = FjallPersistence::open(&args.data_dir)?;
    let persistence = table_partitions(&config)
        .into_iter()
        .fold(persistence, |persistence, (partition, table_config)| {
            persistence.with_partition_options(&partition, table_config.partition_options())
        });
    if fresh {
        info!("Created new table store");
    }

    let mut registry = standard_registry(&config, Arc::new(identity), Arc::new(persistence))?;
    let loaded = registry.load_all()?;
    info!(loaded, objects = ?registry.names().collect::<Vec<_>>(), "Registry ready");

    run(&mut registry, args.command)
}
