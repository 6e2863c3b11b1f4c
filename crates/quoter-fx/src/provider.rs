//! # Rate Providers
//!
//! A provider is one public endpoint that returns USD-based exchange rates.
//! Each speaks one of three JSON envelopes; [`normalize`] folds them all into
//! a [`RateTable`] of uppercase 3-letter codes.
//!
//! ## Accepted Shapes
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  ResponseShape::Rates          { "rates": { "EUR": 0.92, ... } }        │
//! │                                                                         │
//! │  ResponseShape::ResultSuccess  { "result": "success",                   │
//! │                                  "rates": { "EUR": 0.92, ... } }        │
//! │                                                                         │
//! │  ResponseShape::NestedByBase   { "date": "...",                         │
//! │                                  "usd": { "eur": 0.92, "1inch": 4.1 } } │
//! │                                  keys uppercased, non-3-letter dropped  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::time::Duration;
use tracing::debug;

use crate::config::{HttpSettings, ProviderSettings};
use crate::error::{FxError, FxResult};
use quoter_core::validation::is_currency_code;
use quoter_core::{RateTable, BASE_CURRENCY};

// =============================================================================
// Response Shape
// =============================================================================

/// The JSON envelope a provider answers with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseShape {
    /// Flat `rates` object.
    Rates,
    /// `rates` object guarded by `result: "success"`.
    ResultSuccess,
    /// Rates nested under the lowercase base code.
    NestedByBase,
}

impl std::fmt::Display for ResponseShape {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ResponseShape::Rates => write!(f, "rates"),
            ResponseShape::ResultSuccess => write!(f, "result_success"),
            ResponseShape::NestedByBase => write!(f, "nested_by_base"),
        }
    }
}

/// Normalizes a provider body into a rate table.
///
/// Returns `None` when the body does not have the expected envelope.
/// Entries whose key is not a 3-letter code or whose value is not numeric
/// are dropped.
pub fn normalize(shape: ResponseShape, body: &Value) -> Option<RateTable> {
    let rates = match shape {
        ResponseShape::Rates => body.get("rates")?.as_object()?,
        ResponseShape::ResultSuccess => {
            if body.get("result")?.as_str()? != "success" {
                return None;
            }
            body.get("rates")?.as_object()?
        }
        ResponseShape::NestedByBase => body
            .get(BASE_CURRENCY.to_ascii_lowercase().as_str())?
            .as_object()?,
    };
    Some(collect_rates(rates))
}

fn collect_rates(rates: &Map<String, Value>) -> RateTable {
    rates
        .iter()
        .filter(|(code, _)| is_currency_code(code))
        .filter_map(|(code, value)| numeric(value).map(|rate| (code.as_str(), rate)))
        .collect()
}

/// Reads a JSON number, or a string holding one.
fn numeric(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

// =============================================================================
// Provider Trait
// =============================================================================

/// A source of USD-based rate tables.
///
/// Implementations make exactly one attempt per call. The resolver owns the
/// fallback policy.
#[async_trait]
pub trait RateProvider: Send + Sync {
    /// Short name used in logs and results.
    fn name(&self) -> &str;

    /// Fetches and normalizes the provider's full table.
    async fn fetch_rates(&self) -> FxResult<RateTable>;
}

// =============================================================================
// HTTP Provider
// =============================================================================

/// Builds the shared HTTP client.
pub fn build_client(settings: &HttpSettings) -> FxResult<Client> {
    let mut builder = Client::builder().user_agent(settings.user_agent.clone());
    if let Some(secs) = settings.timeout_secs {
        builder = builder.timeout(Duration::from_secs(secs));
    }
    Ok(builder.build()?)
}

/// GETs `url` and parses the body as JSON, failing on non-success status.
pub(crate) async fn get_json(client: &Client, source: &str, url: &str) -> FxResult<Value> {
    let response = client.get(url).send().await?;
    let status = response.status();
    if !status.is_success() {
        return Err(FxError::BadStatus {
            provider: source.to_string(),
            status: status.as_u16(),
        });
    }
    let text = response.text().await?;
    Ok(serde_json::from_str(&text)?)
}

/// A provider reached over HTTP GET.
#[derive(Debug, Clone)]
pub struct HttpRateProvider {
    settings: ProviderSettings,
    client: Client,
}

impl HttpRateProvider {
    pub fn new(settings: ProviderSettings, client: Client) -> Self {
        HttpRateProvider { settings, client }
    }
}

#[async_trait]
impl RateProvider for HttpRateProvider {
    fn name(&self) -> &str {
        &self.settings.name
    }

    async fn fetch_rates(&self) -> FxResult<RateTable> {
        debug!(provider = %self.settings.name, url = %self.settings.url, "Requesting rates");
        let body = get_json(&self.client, &self.settings.name, &self.settings.url).await?;
        normalize(self.settings.shape, &body).ok_or_else(|| FxError::UnrecognizedShape {
            provider: self.settings.name.clone(),
        })
    }
}
