// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! The ledger store: sole owner and writer of transactions and budgets.
//!
//! Every mutation updates the in-memory collections first and then writes the
//! affected entry back to SQLite. Writes are best-effort: a failure is logged
//! and the in-memory state stays authoritative for the rest of the process.

use rusqlite::Connection;
use rust_decimal::Decimal;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::collections::{BTreeMap, HashSet};

use crate::db::{self, BUDGETS_KEY, TRANSACTIONS_KEY};
use crate::errors::LedgerError;
use crate::models::{Budget, Category, Transaction};

/// Proposed full next-state of the ledger, produced by import reconciliation.
#[derive(Debug, Clone, PartialEq)]
pub struct LedgerSnapshot {
    pub transactions: Vec<Transaction>,
    pub budgets: Vec<Budget>,
}

pub struct LedgerStore {
    conn: Connection,
    transactions: Vec<Transaction>,
    budgets: Vec<Budget>,
}

impl LedgerStore {
    /// Loads both entries. Missing entries start empty; corrupt ones are logged and start empty.
    /// Repeated ids and unusable budget rows are dropped so the invariants hold from the start.
    pub fn open(conn: Connection) -> Self {
        let transactions = unique_by_id(load_lenient(&conn, TRANSACTIONS_KEY));
        let budgets = normalize_budgets(load_lenient(&conn, BUDGETS_KEY));
        tracing::debug!(
            transactions = transactions.len(),
            budgets = budgets.len(),
            "ledger loaded"
        );
        Self {
            conn,
            transactions,
            budgets,
        }
    }

    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    pub fn budgets(&self) -> &[Budget] {
        &self.budgets
    }

    pub fn get(&self, id: &str) -> Option<&Transaction> {
        self.transactions.iter().find(|t| t.id == id)
    }

    pub fn snapshot(&self) -> LedgerSnapshot {
        LedgerSnapshot {
            transactions: self.transactions.clone(),
            budgets: self.budgets.clone(),
        }
    }

    /// Puts a freshly extracted batch in front of the existing records.
    /// Returns how many were inserted; ids already in the ledger are skipped.
    pub fn prepend_batch(&mut self, batch: Vec<Transaction>) -> usize {
        let mut seen: HashSet<String> = self.transactions.iter().map(|t| t.id.clone()).collect();
        let mut fresh = Vec::with_capacity(batch.len());
        for t in batch {
            if seen.insert(t.id.clone()) {
                fresh.push(t);
            } else {
                tracing::warn!(id = %t.id, "skipping transaction with an id already in the ledger");
            }
        }
        let added = fresh.len();
        if added == 0 {
            return 0;
        }
        fresh.append(&mut self.transactions);
        self.transactions = fresh;
        self.persist_transactions();
        added
    }

    /// Replaces the record carrying the same id.
    pub fn update(&mut self, updated: Transaction) -> Result<(), LedgerError> {
        let slot = self
            .transactions
            .iter_mut()
            .find(|t| t.id == updated.id)
            .ok_or_else(|| LedgerError::NotFound(updated.id.clone()))?;
        *slot = updated;
        self.persist_transactions();
        Ok(())
    }

    pub fn delete(&mut self, id: &str) -> Result<Transaction, LedgerError> {
        let idx = self
            .transactions
            .iter()
            .position(|t| t.id == id)
            .ok_or_else(|| LedgerError::NotFound(id.to_string()))?;
        let removed = self.transactions.remove(idx);
        self.persist_transactions();
        Ok(removed)
    }

    /// Drops every transaction; budgets are kept.
    pub fn clear(&mut self) -> usize {
        let n = self.transactions.len();
        self.transactions.clear();
        self.persist_transactions();
        n
    }

    /// Wholesale replacement, used when committing a duplicate merge.
    pub fn replace_transactions(&mut self, transactions: Vec<Transaction>) {
        self.transactions = unique_by_id(transactions);
        self.persist_transactions();
    }

    /// Replaces the whole budget set. Non-positive limits mean "no budget" and are
    /// dropped; a category given twice keeps its last limit.
    pub fn set_budgets(&mut self, budgets: Vec<Budget>) {
        self.budgets = normalize_budgets(budgets);
        self.persist_budgets();
    }

    pub fn commit_import(&mut self, next: LedgerSnapshot) {
        let budgets_changed = next.budgets != self.budgets;
        self.transactions = unique_by_id(next.transactions);
        self.persist_transactions();
        if budgets_changed {
            self.budgets = normalize_budgets(next.budgets);
            self.persist_budgets();
        }
    }

    fn persist_transactions(&self) {
        persist(&self.conn, TRANSACTIONS_KEY, &self.transactions);
    }

    fn persist_budgets(&self) {
        persist(&self.conn, BUDGETS_KEY, &self.budgets);
    }
}

pub fn normalize_budgets(budgets: Vec<Budget>) -> Vec<Budget> {
    let mut by_cat: BTreeMap<Category, Decimal> = BTreeMap::new();
    for b in budgets {
        if b.limit > Decimal::ZERO {
            by_cat.insert(b.category, b.limit);
        } else {
            by_cat.remove(&b.category);
        }
    }
    by_cat
        .into_iter()
        .map(|(category, limit)| Budget { category, limit })
        .collect()
}

fn unique_by_id(transactions: Vec<Transaction>) -> Vec<Transaction> {
    let mut seen = HashSet::new();
    let before = transactions.len();
    let out: Vec<Transaction> = transactions
        .into_iter()
        .filter(|t| seen.insert(t.id.clone()))
        .collect();
    if out.len() != before {
        tracing::warn!(dropped = before - out.len(), "dropped transactions with repeated ids");
    }
    out
}

fn load_lenient<T: DeserializeOwned>(conn: &Connection, key: &str) -> Vec<T> {
    let raw = match db::read_entry(conn, key) {
        Ok(Some(raw)) => raw,
        Ok(None) => return Vec::new(),
        Err(err) => {
            tracing::warn!(key, error = %err, "failed to read stored entry; starting empty");
            return Vec::new();
        }
    };
    match serde_json::from_str(&raw) {
        Ok(items) => items,
        Err(err) => {
            tracing::warn!(key, error = %err, "failed to parse stored entry; starting empty");
            Vec::new()
        }
    }
}

fn persist<T: Serialize>(conn: &Connection, key: &str, items: &[T]) {
    let result = serde_json::to_string(items)
        .map_err(LedgerError::from)
        .and_then(|json| db::write_entry(conn, key, &json).map_err(LedgerError::from));
    if let Err(err) = result {
        tracing::error!(key, error = %err, "failed to persist ledger entry");
    }
}
