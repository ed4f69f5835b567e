// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("Transaction '{0}' not found")]
    NotFound(String),
    #[error("Database error: {0}")]
    Db(#[from] rusqlite::Error),
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

/// Reasons an import document is refused. None of them touch the ledger.
#[derive(Debug, Error)]
pub enum ImportError {
    #[error("Could not parse import file as JSON: {0}")]
    Malformed(#[source] serde_json::Error),
    #[error("Unrecognised import format: {0}")]
    UnrecognizedShape(String),
    #[error("Import file contains no transactions or budgets")]
    NoData,
}

#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("No API key configured (set GEMINI_API_KEY)")]
    MissingApiKey,
    #[error("Extraction request timed out after {0}s")]
    Timeout(u64),
    #[error("Extraction service error: {0}")]
    Service(String),
    #[error("Extraction service returned an unreadable response: {0}")]
    InvalidResponse(String),
    #[error("Could not read image {path}: {source}")]
    Image {
        path: String,
        #[source]
        source: std::io::Error,
    },
}
