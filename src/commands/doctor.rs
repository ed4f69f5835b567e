// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::db::{self, BUDGETS_KEY, TRANSACTIONS_KEY};
use crate::models::{Budget, Transaction};
use crate::store::LedgerStore;
use crate::utils::pretty_table;
use anyhow::Result;
use once_cell::sync::Lazy;
use regex::Regex;
use rust_decimal::Decimal;
use std::collections::HashSet;

static DATE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").unwrap());

pub fn handle(store: &LedgerStore) -> Result<()> {
    let rows = inspect(store)?;
    if rows.is_empty() {
        println!("✅ doctor: no issues found");
    } else {
        println!("{}", pretty_table(&["Issue", "Detail"], rows));
    }
    Ok(())
}

/// The store cleans both collections on load, so this looks at what is on disk.
pub fn inspect(store: &LedgerStore) -> Result<Vec<Vec<String>>> {
    let mut unreadable = Vec::new();
    let raw_transactions: Vec<Transaction> = read_raw(store, TRANSACTIONS_KEY, &mut unreadable)?;
    let raw_budgets: Vec<Budget> = read_raw(store, BUDGETS_KEY, &mut unreadable)?;
    let mut rows = find_issues(&raw_transactions, &raw_budgets);
    rows.extend(unreadable);
    Ok(rows)
}

/// An entry that is not a list of records (bad JSON or wrong shape) loads as empty,
/// so it is reported here instead.
fn read_raw<T: serde::de::DeserializeOwned>(
    store: &LedgerStore,
    key: &str,
    rows: &mut Vec<Vec<String>>,
) -> Result<Vec<T>> {
    let Some(raw) = db::read_entry(store.conn(), key)? else {
        return Ok(Vec::new());
    };
    match serde_json::from_str(&raw) {
        Ok(items) => Ok(items),
        Err(err) => {
            rows.push(vec!["unreadable_entry".into(), format!("{}: {}", key, err)]);
            Ok(Vec::new())
        }
    }
}

pub fn find_issues(transactions: &[Transaction], budgets: &[Budget]) -> Vec<Vec<String>> {
    let mut rows = Vec::new();

    // 1) Repeated ids
    let mut seen = HashSet::new();
    for t in transactions {
        if !seen.insert(t.id.as_str()) {
            rows.push(vec!["duplicate_id".into(), t.id.clone()]);
        }
    }

    // 2) Dates that will never match a month window
    for t in transactions.iter().filter(|t| !DATE_RE.is_match(&t.date)) {
        rows.push(vec!["malformed_date".into(), format!("{} '{}'", t.id, t.date)]);
    }

    // 3) Negative amounts
    for t in transactions.iter().filter(|t| t.amount < Decimal::ZERO) {
        rows.push(vec!["negative_amount".into(), format!("{} {}", t.id, t.amount)]);
    }

    // 4) Budget entries the store would drop or merge
    let mut cats = HashSet::new();
    for b in budgets {
        if b.limit <= Decimal::ZERO {
            rows.push(vec!["non_positive_budget".into(), format!("{} {}", b.category, b.limit)]);
        }
        if !cats.insert(b.category) {
            rows.push(vec!["repeated_budget".into(), b.category.to_string()]);
        }
    }
    rows
}
