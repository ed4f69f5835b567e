// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::store::LedgerStore;
use crate::transfer::{export_document, export_file_name};
use crate::utils::today;
use anyhow::{Context, Result};
use chrono::NaiveDate;
use std::path::{Path, PathBuf};

pub fn handle(store: &LedgerStore, m: &clap::ArgMatches) -> Result<()> {
    let dir = m.get_one::<String>("dir").unwrap().trim();
    let path = export_to(store, Path::new(dir), today())?;
    println!(
        "Exported {} transactions and {} budgets to {}",
        store.transactions().len(),
        store.budgets().len(),
        path.display()
    );
    Ok(())
}

/// Writes the whole ledger to `<dir>/smartledger_backup_<date>.json`.
pub fn export_to(store: &LedgerStore, dir: &Path, date: NaiveDate) -> Result<PathBuf> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Create export dir {}", dir.display()))?;
    let path = dir.join(export_file_name(date));
    let json = export_document(&store.snapshot())?;
    std::fs::write(&path, json).with_context(|| format!("Write {}", path.display()))?;
    Ok(path)
}
