// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::budget::{AlertLevel, BudgetStatus, alerts, budget_statuses, month_prefix};
use crate::models::{Budget, Category};
use crate::store::LedgerStore;
use crate::utils::{fmt_money, maybe_print_json, parse_money, pretty_table, today};
use anyhow::{Context, Result, anyhow};
use chrono::NaiveDate;

pub fn handle(store: &mut LedgerStore, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("set", sub)) => set(store, sub)?,
        Some(("list", sub)) => list(store, sub)?,
        Some(("status", sub)) => status(store, sub, today())?,
        _ => {}
    }
    Ok(())
}

/// Parses `CATEGORY=LIMIT`; the category may be its label or slug.
pub fn parse_limit_pair(raw: &str) -> Result<Budget> {
    let (cat, amount) = raw
        .split_once('=')
        .ok_or_else(|| anyhow!("Expected CATEGORY=LIMIT, got '{}'", raw))?;
    let category: Category = cat.parse()?;
    let limit = parse_money(amount.trim())
        .with_context(|| format!("Invalid limit for {}", category))?;
    Ok(Budget { category, limit })
}

/// The given pairs become the complete budget set; categories left out lose their budget.
fn set(store: &mut LedgerStore, sub: &clap::ArgMatches) -> Result<()> {
    let budgets = sub
        .get_many::<String>("limits")
        .into_iter()
        .flatten()
        .map(String::as_str)
        .map(parse_limit_pair)
        .collect::<Result<Vec<_>>>()?;
    store.set_budgets(budgets);
    println!("Saved {} budgets", store.budgets().len());
    for b in store.budgets() {
        println!("  {} = {}", b.category, fmt_money(&b.limit));
    }
    Ok(())
}

fn list(store: &LedgerStore, sub: &clap::ArgMatches) -> Result<()> {
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &store.budgets())? {
        return Ok(());
    }
    let rows = store
        .budgets()
        .iter()
        .map(|b| vec![b.category.to_string(), fmt_money(&b.limit)])
        .collect();
    println!("{}", pretty_table(&["Category", "Monthly limit"], rows));
    Ok(())
}

pub fn status(store: &LedgerStore, sub: &clap::ArgMatches, today: NaiveDate) -> Result<()> {
    let stats = budget_statuses(store.transactions(), store.budgets(), today);
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &stats)? {
        return Ok(());
    }
    if stats.is_empty() {
        println!("No budgets set. Use `smartledger budget set CATEGORY=LIMIT ...`");
        return Ok(());
    }
    for (s, level) in alerts(&stats) {
        println!("{}", alert_line(s, level));
    }
    let rows = stats
        .iter()
        .map(|s| {
            vec![
                s.category.to_string(),
                fmt_money(&s.spent),
                fmt_money(&s.limit),
                format!("{:.0}%", s.percentage),
            ]
        })
        .collect();
    println!("Budgets for {}", month_prefix(today));
    println!(
        "{}",
        pretty_table(&["Category", "Spent", "Limit", "Used"], rows)
    );
    Ok(())
}

pub fn alert_line(s: &BudgetStatus, level: AlertLevel) -> String {
    let tag = match level {
        AlertLevel::Over => "OVER BUDGET",
        AlertLevel::Approaching => "approaching budget",
    };
    format!(
        "! {}: {} ({:.0}% of {} used)",
        s.category,
        tag,
        s.percentage,
        fmt_money(&s.limit)
    )
}
