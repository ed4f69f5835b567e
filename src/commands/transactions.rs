// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::Transaction;
use crate::store::LedgerStore;
use crate::utils::{
    confirm, fmt_money, maybe_print_json, parse_date, parse_money, parse_month, parse_time,
    pretty_table,
};
use anyhow::{Result, anyhow};
use rust_decimal::Decimal;
use serde::Serialize;

pub fn handle(store: &mut LedgerStore, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("list", sub)) => list(store, sub)?,
        Some(("edit", sub)) => edit(store, sub)?,
        Some(("rm", sub)) => remove(store, sub)?,
        Some(("clear", sub)) => clear(store, sub)?,
        _ => {}
    }
    Ok(())
}

fn list(store: &LedgerStore, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let data = query_rows(store, sub)?;
    if !maybe_print_json(json_flag, jsonl_flag, &data)? {
        let total = data
            .iter()
            .fold(Decimal::ZERO, |acc, r| acc.saturating_add(r.amount));
        let rows: Vec<Vec<String>> = data
            .iter()
            .map(|r| {
                vec![
                    r.id.clone(),
                    match &r.time {
                        Some(t) => format!("{} {}", r.date, t),
                        None => r.date.clone(),
                    },
                    r.label.clone(),
                    fmt_money(&r.amount),
                    r.platform.clone(),
                    r.category.clone(),
                    r.consumption_object.clone(),
                    r.note.clone(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(
                &["ID", "Date", "Item", "Amount", "Platform", "Category", "For", "Note"],
                rows,
            )
        );
        println!("Total: {} ({} records)", fmt_money(&total), data.len());
    }
    Ok(())
}

#[derive(Serialize)]
pub struct TransactionRow {
    pub id: String,
    pub date: String,
    pub time: Option<String>,
    pub label: String,
    pub merchant: String,
    pub amount: Decimal,
    pub platform: String,
    pub category: String,
    pub consumption_object: String,
    pub note: String,
}

impl From<&Transaction> for TransactionRow {
    fn from(t: &Transaction) -> Self {
        Self {
            id: t.id.clone(),
            date: t.date.clone(),
            time: t.time.clone(),
            label: t.label().to_string(),
            merchant: t.merchant.clone(),
            amount: t.amount,
            platform: t.platform.to_string(),
            category: t.category.to_string(),
            consumption_object: t.consumption_object.to_string(),
            note: t.note.clone(),
        }
    }
}

/// Newest date first; records sharing a date keep ledger order.
pub fn query_rows(store: &LedgerStore, sub: &clap::ArgMatches) -> Result<Vec<TransactionRow>> {
    let month = match sub.get_one::<String>("month") {
        Some(m) => Some(parse_month(m.trim())?),
        None => None,
    };
    let mut items: Vec<&Transaction> = store
        .transactions()
        .iter()
        .filter(|t| month.as_deref().is_none_or(|m| t.date.starts_with(m)))
        .collect();
    items.sort_by(|a, b| b.date.cmp(&a.date));
    if let Some(limit) = sub.get_one::<usize>("limit") {
        items.truncate(*limit);
    }
    Ok(items.into_iter().map(TransactionRow::from).collect())
}

fn edit(store: &mut LedgerStore, sub: &clap::ArgMatches) -> Result<()> {
    let id = sub.get_one::<String>("id").unwrap().trim();
    let mut tx = store
        .get(id)
        .cloned()
        .ok_or_else(|| anyhow!("Transaction '{}' not found", id))?;
    apply_edits(&mut tx, sub)?;
    store.update(tx)?;
    println!("Updated transaction {}", id);
    Ok(())
}

/// Every field except `id` can be replaced.
pub fn apply_edits(tx: &mut Transaction, sub: &clap::ArgMatches) -> Result<()> {
    let arg = |name: &str| sub.get_one::<String>(name).map(|s| s.trim().to_string());

    if let Some(d) = arg("date") {
        parse_date(&d)?;
        tx.date = d;
    }
    if let Some(t) = arg("time") {
        tx.time = if t.is_empty() { None } else { Some(parse_time(&t)?) };
    }
    if let Some(a) = arg("amount") {
        let amount = parse_money(&a)?;
        if amount.is_sign_negative() {
            return Err(anyhow!("Amount must not be negative: {}", a));
        }
        tx.amount = amount;
    }
    if let Some(v) = arg("merchant") {
        tx.merchant = v;
    }
    if let Some(v) = arg("description") {
        tx.description = v;
    }
    if let Some(v) = arg("platform") {
        tx.platform = v.parse()?;
    }
    if let Some(v) = arg("category") {
        tx.category = v.parse()?;
    }
    if let Some(v) = arg("object") {
        tx.consumption_object = v.parse()?;
    }
    if let Some(v) = arg("note") {
        tx.note = v;
    }
    Ok(())
}

fn remove(store: &mut LedgerStore, sub: &clap::ArgMatches) -> Result<()> {
    let id = sub.get_one::<String>("id").unwrap().trim();
    let Some(tx) = store.get(id) else {
        return Err(anyhow!("Transaction '{}' not found", id));
    };
    let prompt = format!(
        "Delete {} {} on {}?",
        tx.label(),
        fmt_money(&tx.amount),
        tx.date
    );
    if !confirm(&prompt, sub.get_flag("yes"))? {
        println!("Cancelled");
        return Ok(());
    }
    store.delete(id)?;
    println!("Removed transaction {}", id);
    Ok(())
}

fn clear(store: &mut LedgerStore, sub: &clap::ArgMatches) -> Result<()> {
    if store.transactions().is_empty() {
        println!("Ledger is already empty");
        return Ok(());
    }
    let prompt = format!(
        "Delete all {} transactions? This cannot be undone.",
        store.transactions().len()
    );
    if !confirm(&prompt, sub.get_flag("yes"))? {
        println!("Cancelled");
        return Ok(());
    }
    let n = store.clear();
    println!("Cleared {} transactions", n);
    Ok(())
}
