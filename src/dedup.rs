// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Collapses records that describe the same purchase seen on two payment rails
//! (typically a wallet debit plus the matching bank-card line).

use rust_decimal::{Decimal, RoundingStrategy};
use std::collections::HashMap;
use std::hash::Hash;

use crate::models::{Platform, Transaction};

/// Decides which transactions are candidates for the same purchase.
pub trait Fingerprint {
    type Key: Eq + Hash;

    fn key(&self, t: &Transaction) -> Self::Key;
}

/// `(date, amount rounded to cents)`. Merchant is ignored on purpose: the same
/// purchase shows the retailer in a wallet and the processor on a bank statement.
#[derive(Debug, Clone, Copy, Default)]
pub struct DateAmount;

impl Fingerprint for DateAmount {
    type Key = (String, Decimal);

    fn key(&self, t: &Transaction) -> Self::Key {
        (t.date.clone(), round_cents(t.amount))
    }
}

pub fn round_cents(amount: Decimal) -> Decimal {
    amount
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
        .normalize()
}

/// How much a platform's record is trusted to carry the real merchant and details.
pub fn platform_rank(p: Platform) -> u8 {
    match p {
        Platform::WeChat | Platform::Alipay => 10,
        Platform::Meituan | Platform::JD | Platform::Taobao => 8,
        Platform::Bank => 1,
        Platform::Cash
        | Platform::ApplePay
        | Platform::Douyin
        | Platform::Pinduoduo
        | Platform::Other => 5,
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Resolution {
    /// Proposed replacement collection: one survivor per fingerprint group.
    pub transactions: Vec<Transaction>,
    pub discarded: usize,
}

pub fn resolve_duplicates(transactions: &[Transaction]) -> Resolution {
    resolve_duplicates_with(transactions, &DateAmount)
}

/// Groups by fingerprint and keeps the highest-ranked record of each group;
/// ties keep the earliest. Groups are emitted in order of their first member.
pub fn resolve_duplicates_with<F: Fingerprint>(
    transactions: &[Transaction],
    fingerprint: &F,
) -> Resolution {
    let mut slot_of: HashMap<F::Key, usize> = HashMap::new();
    let mut survivors: Vec<&Transaction> = Vec::new();
    let mut discarded = 0;

    for t in transactions {
        match slot_of.get(&fingerprint.key(t)) {
            Some(&slot) => {
                discarded += 1;
                if platform_rank(t.platform) > platform_rank(survivors[slot].platform) {
                    survivors[slot] = t;
                }
            }
            None => {
                slot_of.insert(fingerprint.key(t), survivors.len());
                survivors.push(t);
            }
        }
    }

    Resolution {
        transactions: survivors.into_iter().cloned().collect(),
        discarded,
    }
}
