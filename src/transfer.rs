// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Portable full-ledger document: export, import parsing, and the
//! overwrite/append reconciliation with the current ledger.

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::HashSet;

use crate::errors::ImportError;
use crate::models::{Budget, Transaction};
use crate::store::LedgerSnapshot;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportDocument {
    pub transactions: Vec<Transaction>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub budgets: Vec<Budget>,
}

fn null_as_empty<'de, D, T>(de: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(de)?.unwrap_or_default())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportMode {
    Overwrite,
    Append,
}

impl std::str::FromStr for ImportMode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "overwrite" => Ok(ImportMode::Overwrite),
            "append" => Ok(ImportMode::Append),
            other => Err(anyhow::anyhow!(
                "Unknown import mode '{}' (use overwrite|append)",
                other
            )),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ImportPlan {
    pub next: LedgerSnapshot,
    pub added: usize,
    pub skipped: usize,
    pub budgets_replaced: bool,
}

pub fn export_file_name(date: NaiveDate) -> String {
    format!("smartledger_backup_{}.json", date.format("%Y-%m-%d"))
}

pub fn export_document(snapshot: &LedgerSnapshot) -> serde_json::Result<String> {
    let doc = ExportDocument {
        transactions: snapshot.transactions.clone(),
        budgets: snapshot.budgets.clone(),
    };
    serde_json::to_string_pretty(&doc)
}

/// Accepts the current `{transactions, budgets?}` object or a legacy bare array.
pub fn parse_import(text: &str) -> Result<ExportDocument, ImportError> {
    let value: Value = serde_json::from_str(text).map_err(ImportError::Malformed)?;
    let doc = if value.is_array() {
        let transactions: Vec<Transaction> = serde_json::from_value(value)
            .map_err(|e| ImportError::UnrecognizedShape(e.to_string()))?;
        ExportDocument {
            transactions,
            budgets: Vec::new(),
        }
    } else if value.get("transactions").is_some_and(|v| !v.is_null()) {
        serde_json::from_value(value).map_err(|e| ImportError::UnrecognizedShape(e.to_string()))?
    } else {
        return Err(ImportError::UnrecognizedShape(
            "expected a transaction array or an object with a `transactions` list".into(),
        ));
    };
    if doc.transactions.is_empty() && doc.budgets.is_empty() {
        return Err(ImportError::NoData);
    }
    Ok(doc)
}

/// Computes the ledger that results from applying `doc` in `mode`.
///
/// Budgets are replaced whenever the document carries any, in both modes;
/// append only protects transactions.
pub fn plan_import(current: &LedgerSnapshot, doc: ExportDocument, mode: ImportMode) -> ImportPlan {
    let budgets_replaced = !doc.budgets.is_empty();
    let budgets = if budgets_replaced {
        doc.budgets
    } else {
        current.budgets.clone()
    };
    let incoming = doc.transactions.len();

    match mode {
        ImportMode::Overwrite => {
            let mut seen: HashSet<String> = HashSet::new();
            let transactions: Vec<Transaction> = doc
                .transactions
                .into_iter()
                .filter(|t| seen.insert(t.id.clone()))
                .collect();
            let added = transactions.len();
            ImportPlan {
                next: LedgerSnapshot {
                    transactions,
                    budgets,
                },
                added,
                skipped: incoming - added,
                budgets_replaced,
            }
        }
        ImportMode::Append => {
            let mut seen: HashSet<&str> =
                current.transactions.iter().map(|t| t.id.as_str()).collect();
            let fresh: Vec<Transaction> = doc
                .transactions
                .iter()
                .filter(|t| seen.insert(t.id.as_str()))
                .cloned()
                .collect();
            let added = fresh.len();
            let mut transactions = current.transactions.clone();
            transactions.extend(fresh);
            ImportPlan {
                next: LedgerSnapshot {
                    transactions,
                    budgets,
                },
                added,
                skipped: incoming - added,
                budgets_replaced,
            }
        }
    }
}
