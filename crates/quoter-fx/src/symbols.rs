//! # Currency Code List
//!
//! Looks up which currencies can be offered for selection. Failure never
//! propagates: the list degrades to the configured fallback codes.
//!
//! ```text
//! symbols endpoint OK   ──► common codes, then provider codes (sorted, unique)
//! OK without "symbols"  ──► common codes only
//! symbols endpoint FAIL ──► fallback codes
//! ```

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use std::collections::BTreeSet;
use tracing::{debug, warn};

use crate::config::{FxConfig, SymbolSettings};
use crate::error::FxResult;
use crate::provider::{build_client, get_json};
use quoter_core::validation::is_currency_code;

/// Source of supported currency codes.
#[async_trait]
pub trait SymbolSource: Send + Sync {
    /// Fetches every code the source knows, in any order.
    async fn fetch_codes(&self) -> FxResult<Vec<String>>;
}

/// Reads `{ "symbols": { "CODE": {...}, ... } }` over HTTP GET.
#[derive(Debug, Clone)]
pub struct HttpSymbolSource {
    url: String,
    client: Client,
}

impl HttpSymbolSource {
    pub fn new(url: impl Into<String>, client: Client) -> Self {
        HttpSymbolSource {
            url: url.into(),
            client,
        }
    }

    pub fn from_config(config: &FxConfig) -> FxResult<Self> {
        Ok(HttpSymbolSource::new(
            config.symbols.url.clone(),
            build_client(&config.http)?,
        ))
    }
}

#[async_trait]
impl SymbolSource for HttpSymbolSource {
    async fn fetch_codes(&self) -> FxResult<Vec<String>> {
        debug!(url = %self.url, "Requesting currency symbols");
        let body = get_json(&self.client, "symbols", &self.url).await?;
        Ok(symbol_codes(&body))
    }
}

/// Keys of the body's `symbols` object. A body without one lists no codes.
fn symbol_codes(body: &Value) -> Vec<String> {
    match body.get("symbols").and_then(Value::as_object) {
        Some(symbols) => symbols.keys().cloned().collect(),
        None => {
            debug!("Symbols response has no symbols object");
            Vec::new()
        }
    }
}

/// Orders codes for display: `common` first, then the rest sorted, no repeats.
pub fn order_codes(common: &[String], fetched: &[String]) -> Vec<String> {
    let mut ordered: Vec<String> = Vec::with_capacity(common.len() + fetched.len());
    for code in common {
        let code = code.to_ascii_uppercase();
        if !ordered.contains(&code) {
            ordered.push(code);
        }
    }

    let rest: BTreeSet<String> = fetched
        .iter()
        .filter(|code| is_currency_code(code))
        .map(|code| code.to_ascii_uppercase())
        .filter(|code| !ordered.contains(code))
        .collect();

    ordered.extend(rest);
    ordered
}

/// Selectable currency codes, falling back to `settings.fallback` on any failure.
pub async fn available_currency_codes(
    source: &dyn SymbolSource,
    settings: &SymbolSettings,
) -> Vec<String> {
    match source.fetch_codes().await {
        Ok(codes) => order_codes(&settings.common, &codes),
        Err(e) => {
            warn!(error = %e, "Currency list unavailable, using fallback codes");
            settings.fallback.clone()
        }
    }
}
