// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::{Category, Transaction};
use crate::store::LedgerStore;
use crate::utils::{fmt_money, maybe_print_json, parse_month, pretty_table};
use anyhow::Result;
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};

pub fn handle(store: &LedgerStore, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("categories", sub)) => categories(store, sub)?,
        Some(("daily", sub)) => daily(store, sub)?,
        _ => {}
    }
    Ok(())
}

#[derive(Debug, Serialize, PartialEq)]
pub struct CategorySummary {
    pub name: Category,
    pub value: Decimal,
}

#[derive(Debug, Serialize, PartialEq)]
pub struct DailySummary {
    pub date: String,
    pub total: Decimal,
}

/// Spend per category, largest first.
pub fn category_summary(transactions: &[Transaction], month: Option<&str>) -> Vec<CategorySummary> {
    let mut agg: HashMap<Category, Decimal> = HashMap::new();
    for t in in_month(transactions, month) {
        let total = agg.entry(t.category).or_insert(Decimal::ZERO);
        *total = total.saturating_add(t.amount);
    }
    let mut items: Vec<CategorySummary> = agg
        .into_iter()
        .map(|(name, value)| CategorySummary { name, value })
        .collect();
    items.sort_by(|a, b| b.value.cmp(&a.value).then(a.name.cmp(&b.name)));
    items
}

/// Totals per calendar day, oldest first.
pub fn daily_summary(transactions: &[Transaction], month: Option<&str>) -> Vec<DailySummary> {
    let mut agg: BTreeMap<&str, Decimal> = BTreeMap::new();
    for t in in_month(transactions, month) {
        let total = agg.entry(t.date.as_str()).or_insert(Decimal::ZERO);
        *total = total.saturating_add(t.amount);
    }
    agg.into_iter()
        .map(|(date, total)| DailySummary {
            date: date.to_string(),
            total,
        })
        .collect()
}

fn in_month<'a>(
    transactions: &'a [Transaction],
    month: Option<&'a str>,
) -> impl Iterator<Item = &'a Transaction> {
    transactions
        .iter()
        .filter(move |t| month.is_none_or(|m| t.date.starts_with(m)))
}

fn month_arg(sub: &clap::ArgMatches) -> Result<Option<String>> {
    sub.get_one::<String>("month")
        .map(|m| parse_month(m.trim()))
        .transpose()
}

fn categories(store: &LedgerStore, sub: &clap::ArgMatches) -> Result<()> {
    let month = month_arg(sub)?;
    let data = category_summary(store.transactions(), month.as_deref());
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
        let rows = data
            .iter()
            .map(|c| vec![c.name.to_string(), fmt_money(&c.value)])
            .collect();
        println!("{}", pretty_table(&["Category", "Spent"], rows));
    }
    Ok(())
}

fn daily(store: &LedgerStore, sub: &clap::ArgMatches) -> Result<()> {
    let month = month_arg(sub)?;
    let data = daily_summary(store.transactions(), month.as_deref());
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
        let rows = data
            .iter()
            .map(|d| vec![d.date.clone(), fmt_money(&d.total)])
            .collect();
        println!("{}", pretty_table(&["Date", "Total"], rows));
    }
    Ok(())
}
