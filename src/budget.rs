// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::HashMap;

use crate::models::{Budget, Category, Transaction};

pub const APPROACHING_PCT: Decimal = Decimal::from_parts(80, 0, 0, false, 0);
pub const OVER_PCT: Decimal = Decimal::ONE_HUNDRED;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertLevel {
    /// 80% up to (not including) 100%.
    Approaching,
    Over,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BudgetStatus {
    pub category: Category,
    pub limit: Decimal,
    pub spent: Decimal,
    pub percentage: Decimal,
}

impl BudgetStatus {
    pub fn alert(&self) -> Option<AlertLevel> {
        if self.percentage >= OVER_PCT {
            Some(AlertLevel::Over)
        } else if self.percentage >= APPROACHING_PCT {
            Some(AlertLevel::Approaching)
        } else {
            None
        }
    }
}

/// `YYYY-MM` for the month containing `today`.
pub fn month_prefix(today: NaiveDate) -> String {
    format!("{:04}-{:02}", today.year(), today.month())
}

/// Sums amounts per category over transactions whose date string starts with `prefix`.
/// Dates that are not `YYYY-MM-DD` simply never match.
pub fn spend_by_category(transactions: &[Transaction], prefix: &str) -> HashMap<Category, Decimal> {
    let mut spent: HashMap<Category, Decimal> = HashMap::new();
    for t in transactions.iter().filter(|t| t.date.starts_with(prefix)) {
        let total = spent.entry(t.category).or_insert(Decimal::ZERO);
        *total = total.saturating_add(t.amount);
    }
    spent
}

pub fn percentage(spent: Decimal, limit: Decimal) -> Decimal {
    if limit <= Decimal::ZERO {
        // a zero ceiling is breached by any spend at all
        return if spent > Decimal::ZERO {
            OVER_PCT
        } else {
            Decimal::ZERO
        };
    }
    // imported amounts are unbounded; saturate instead of overflowing
    spent
        .saturating_mul(Decimal::ONE_HUNDRED)
        .checked_div(limit)
        .unwrap_or(Decimal::MAX)
}

/// Current-month status for every budgeted category, highest utilisation first.
pub fn budget_statuses(
    transactions: &[Transaction],
    budgets: &[Budget],
    today: NaiveDate,
) -> Vec<BudgetStatus> {
    let spent_by_cat = spend_by_category(transactions, &month_prefix(today));
    let mut out: Vec<BudgetStatus> = budgets
        .iter()
        .map(|b| {
            let spent = spent_by_cat.get(&b.category).copied().unwrap_or(Decimal::ZERO);
            BudgetStatus {
                category: b.category,
                limit: b.limit,
                spent,
                percentage: percentage(spent, b.limit),
            }
        })
        .collect();
    out.sort_by(|a, b| b.percentage.cmp(&a.percentage));
    out
}

/// Statuses at or above the approaching threshold, in priority order.
pub fn alerts(statuses: &[BudgetStatus]) -> Vec<(&BudgetStatus, AlertLevel)> {
    statuses
        .iter()
        .filter_map(|s| s.alert().map(|lvl| (s, lvl)))
        .collect()
}
