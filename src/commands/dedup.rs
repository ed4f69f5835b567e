// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::dedup::resolve_duplicates;
use crate::store::LedgerStore;
use crate::utils::confirm;
use anyhow::Result;

pub fn handle(store: &mut LedgerStore, m: &clap::ArgMatches) -> Result<()> {
    let resolution = resolve_duplicates(store.transactions());
    if resolution.discarded == 0 {
        println!("No duplicates found (matched on date and amount)");
        return Ok(());
    }
    let prompt = format!(
        "Found {} duplicate records (e.g. a wallet payment and its bank-card debit). Merge them?",
        resolution.discarded
    );
    if !confirm(&prompt, m.get_flag("yes"))? {
        println!("Cancelled");
        return Ok(());
    }
    store.replace_transactions(resolution.transactions);
    println!("Merged {} duplicate records", resolution.discarded);
    Ok(())
}
