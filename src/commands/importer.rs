// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::store::LedgerStore;
use crate::transfer::{ImportMode, ImportPlan, parse_import, plan_import};
use crate::utils::confirm;
use anyhow::{Context, Result};

pub fn handle(store: &mut LedgerStore, m: &clap::ArgMatches) -> Result<()> {
    let path = m.get_one::<String>("path").unwrap().trim();
    let text = std::fs::read_to_string(path).with_context(|| format!("Open {}", path))?;
    let doc = parse_import(&text).with_context(|| format!("Import {}", path))?;

    let mode = match m.get_one::<String>("mode") {
        Some(raw) => raw.parse::<ImportMode>()?,
        None => {
            let prompt = format!(
                "Found {} transactions and {} budgets. Overwrite current data? \
                 (No appends new transactions; budgets are replaced either way)",
                doc.transactions.len(),
                doc.budgets.len()
            );
            if confirm(&prompt, false)? {
                ImportMode::Overwrite
            } else {
                ImportMode::Append
            }
        }
    };

    let plan = plan_import(&store.snapshot(), doc, mode);
    let summary = describe(&plan, mode);
    store.commit_import(plan.next);
    tracing::info!(?mode, path, "import committed");
    println!("{}", summary);
    Ok(())
}

fn describe(plan: &ImportPlan, mode: ImportMode) -> String {
    let mut out = match mode {
        ImportMode::Overwrite => format!("Replaced ledger with {} transactions", plan.added),
        ImportMode::Append => format!(
            "Appended {} transactions ({} already present)",
            plan.added, plan.skipped
        ),
    };
    if plan.budgets_replaced {
        out.push_str(&format!("; budgets replaced ({})", plan.next.budgets.len()));
    }
    out
}
