// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;

use smartledger::{
    cli, commands, config::Config, db, extraction::GeminiGateway, store::LedgerStore, utils,
};

fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    utils::init_tracing();

    let cli = cli::build_cli();
    let matches = cli.get_matches();

    let cfg = Config::from_env()?;
    let conn = db::open_or_init(&cfg)?;
    let mut store = LedgerStore::open(conn);

    match matches.subcommand() {
        Some(("init", _)) => {
            println!("Database initialized at {}", db::db_path(&cfg)?.display());
        }
        Some(("analyze", sub)) => {
            let gateway = GeminiGateway::from_config(&cfg)?;
            commands::analyze::handle(&mut store, &gateway, sub)?
        }
        Some(("tx", sub)) => commands::transactions::handle(&mut store, sub)?,
        Some(("dedup", sub)) => commands::dedup::handle(&mut store, sub)?,
        Some(("budget", sub)) => commands::budgets::handle(&mut store, sub)?,
        Some(("report", sub)) => commands::reports::handle(&store, sub)?,
        Some(("export", sub)) => commands::exporter::handle(&store, sub)?,
        Some(("import", sub)) => commands::importer::handle(&mut store, sub)?,
        Some(("doctor", _)) => commands::doctor::handle(&store)?,
        _ => {
            cli::build_cli().print_help()?;
            println!();
        }
    }
    Ok(())
}
