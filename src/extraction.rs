// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Screenshot analysis: the gateway seam, the Gemini-backed implementation,
//! and merging a recognised batch into the ledger.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as B64;
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::{Value, json};
use std::path::Path;
use uuid::Uuid;

use crate::config::Config;
use crate::errors::ExtractionError;
use crate::models::{Category, ConsumptionObject, Platform, Transaction};
use crate::store::LedgerStore;

#[derive(Debug, Clone)]
pub struct ImageInput {
    pub name: String,
    pub bytes: Vec<u8>,
    pub mime_type: String,
}

impl ImageInput {
    pub fn from_path(path: &Path) -> Result<Self, ExtractionError> {
        let bytes = std::fs::read(path).map_err(|source| ExtractionError::Image {
            path: path.display().to_string(),
            source,
        })?;
        Ok(Self {
            name: path.display().to_string(),
            bytes,
            mime_type: mime_for_path(path).to_string(),
        })
    }
}

pub fn mime_for_path(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "webp" => "image/webp",
        "gif" => "image/gif",
        "heic" => "image/heic",
        "heif" => "image/heif",
        _ => "application/octet-stream",
    }
}

/// A record as recognised by the gateway, before it gets an id.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    pub date: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    #[serde(default)]
    pub merchant: String,
    #[serde(default)]
    pub description: String,
    pub platform: Platform,
    pub category: Category,
    #[serde(default)]
    pub consumption_object: Option<String>,
    #[serde(default)]
    pub note: Option<String>,
}

impl Candidate {
    /// Mints a fresh id and fills the defaults the gateway may leave out.
    pub fn into_transaction(self) -> Transaction {
        let consumption_object = match self.consumption_object.as_deref().map(str::trim) {
            None | Some("") => ConsumptionObject::Myself,
            Some(raw) => ConsumptionObject::from_label_lenient(raw),
        };
        Transaction {
            id: Uuid::new_v4().to_string(),
            date: self.date,
            time: None,
            amount: self.amount,
            merchant: self.merchant,
            description: self.description,
            platform: self.platform,
            category: self.category,
            consumption_object,
            note: self.note.unwrap_or_default(),
            original_image: None,
        }
    }
}

pub trait ExtractionGateway {
    fn extract(&self, images: &[ImageInput]) -> Result<Vec<Candidate>, ExtractionError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnalysisOutcome {
    Added(usize),
    NothingRecognized,
}

/// Runs one extraction and prepends the recognised batch. On any error the
/// ledger is left untouched.
pub fn analyze<G>(
    store: &mut LedgerStore,
    gateway: &G,
    images: &[ImageInput],
) -> Result<AnalysisOutcome, ExtractionError>
where
    G: ExtractionGateway + ?Sized,
{
    if images.is_empty() {
        return Ok(AnalysisOutcome::NothingRecognized);
    }
    tracing::info!(images = images.len(), "requesting transaction extraction");
    let candidates = gateway.extract(images)?;
    if candidates.is_empty() {
        return Ok(AnalysisOutcome::NothingRecognized);
    }
    let batch: Vec<Transaction> = candidates
        .into_iter()
        .map(Candidate::into_transaction)
        .collect();
    let added = store.prepend_batch(batch);
    tracing::info!(added, "extracted transactions merged");
    Ok(AnalysisOutcome::Added(added))
}

const PROMPT: &str = "You are a household bookkeeper. Read these payment screenshots \
(wallet bills, bank statements, e-commerce orders) and list every individual expense. \
For list screenshots, return one item per row. Infer what was bought, which payment \
platform was used, and the spend category. The amount must be a number and the date \
must be YYYY-MM-DD. consumptionObject defaults to \"自己\"; use \"女儿\" for children's \
clothes or toys and \"父母\" for products for the elderly. Put any remarks or specs \
(colour, size, plan name) in note. Use only the enum labels given in the schema.";

pub struct GeminiGateway {
    client: reqwest::blocking::Client,
    api_key: String,
    endpoint: String,
    timeout_secs: u64,
}

impl GeminiGateway {
    pub fn from_config(cfg: &Config) -> Result<Self, ExtractionError> {
        let api_key = cfg.api_key.clone().ok_or(ExtractionError::MissingApiKey)?;
        let client = crate::utils::http_client(cfg.timeout_secs)
            .map_err(|e| ExtractionError::Service(e.to_string()))?;
        Ok(Self {
            client,
            api_key,
            endpoint: format!("{}/models/{}:generateContent", cfg.api_base, cfg.model),
            timeout_secs: cfg.timeout_secs,
        })
    }
}

impl ExtractionGateway for GeminiGateway {
    fn extract(&self, images: &[ImageInput]) -> Result<Vec<Candidate>, ExtractionError> {
        let body = request_body(images);
        let resp = self
            .client
            .post(&self.endpoint)
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .map_err(|e| {
                if e.is_timeout() {
                    ExtractionError::Timeout(self.timeout_secs)
                } else {
                    ExtractionError::Service(e.to_string())
                }
            })?;
        let status = resp.status();
        let text = resp
            .text()
            .map_err(|e| ExtractionError::Service(e.to_string()))?;
        if !status.is_success() {
            let snippet: String = text.chars().take(300).collect();
            return Err(ExtractionError::Service(format!("HTTP {}: {}", status, snippet)));
        }
        parse_generate_response(&text)
    }
}

pub fn request_body(images: &[ImageInput]) -> Value {
    let mut parts: Vec<Value> = images
        .iter()
        .map(|img| {
            json!({
                "inline_data": { "mime_type": img.mime_type, "data": B64.encode(&img.bytes) }
            })
        })
        .collect();
    parts.push(json!({ "text": PROMPT }));

    let platforms: Vec<&str> = Platform::ALL.iter().map(|p| p.label()).collect();
    let categories: Vec<&str> = Category::ALL.iter().map(|c| c.label()).collect();
    let objects: Vec<&str> = ConsumptionObject::ALL.iter().map(|o| o.label()).collect();

    json!({
        "contents": [{ "parts": parts }],
        "generationConfig": {
            "responseMimeType": "application/json",
            "responseSchema": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "date": { "type": "STRING", "description": "YYYY-MM-DD" },
                        "amount": { "type": "NUMBER", "description": "Transaction amount" },
                        "merchant": { "type": "STRING", "description": "Merchant or payee" },
                        "description": { "type": "STRING", "description": "What was bought" },
                        "platform": { "type": "STRING", "enum": platforms },
                        "category": { "type": "STRING", "enum": categories },
                        "consumptionObject": { "type": "STRING", "enum": objects },
                        "note": { "type": "STRING", "description": "Extra details or remarks" }
                    },
                    "required": ["date", "amount", "merchant", "description", "platform", "category", "consumptionObject"]
                }
            }
        }
    })
}

/// Pulls the JSON array out of a `generateContent` reply. A reply without text
/// means nothing was recognised.
pub fn parse_generate_response(body: &str) -> Result<Vec<Candidate>, ExtractionError> {
    let v: Value =
        serde_json::from_str(body).map_err(|e| ExtractionError::InvalidResponse(e.to_string()))?;
    if let Some(msg) = v.pointer("/error/message").and_then(Value::as_str) {
        return Err(ExtractionError::Service(msg.to_string()));
    }
    let text: String = v
        .pointer("/candidates/0/content/parts")
        .and_then(Value::as_array)
        .map(|parts| {
            parts
                .iter()
                .filter_map(|p| p.get("text").and_then(Value::as_str))
                .collect()
        })
        .unwrap_or_default();
    let text = strip_code_fence(&text);
    if text.is_empty() {
        return Ok(Vec::new());
    }
    serde_json::from_str(text).map_err(|e| ExtractionError::InvalidResponse(e.to_string()))
}

fn strip_code_fence(s: &str) -> &str {
    let s = s.trim();
    let Some(inner) = s.strip_prefix("```") else {
        return s;
    };
    let inner = inner.strip_prefix("json").unwrap_or(inner);
    inner.strip_suffix("```").unwrap_or(inner).trim()
}
