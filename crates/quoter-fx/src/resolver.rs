//! # Rate Resolver
//!
//! Walks the provider chain until one returns a table containing the
//! requested currency.
//!
//! ## First-Acceptable-Wins
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  resolve_rates("AED")                                                   │
//! │                                                                         │
//! │  provider 1 ──► transport error ─────────────────► skip (warn)          │
//! │  provider 2 ──► 200, rates {EUR, GBP} ───────────► skip (no AED)        │
//! │  provider 3 ──► 200, rates {AED, EUR, ...} ──────► ACCEPT, stop         │
//! │  provider 4     (never called)                                          │
//! │                                                                         │
//! │  The whole table of provider 3 is returned. Tables are never merged.    │
//! │  Providers run one after another, each exactly once.                    │
//! │  If nobody accepts: NoProviderAvailable.                                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::config::FxConfig;
use crate::error::{FxError, FxResult};
use crate::provider::{build_client, HttpRateProvider, RateProvider};
use quoter_core::validation::validate_currency_code;
use quoter_core::RateTable;

/// An accepted rate table and where it came from.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedRates {
    /// Name of the provider that was accepted.
    pub provider: String,

    /// The provider's complete normalized table.
    pub table: RateTable,

    /// When the table was accepted.
    pub fetched_at: DateTime<Utc>,
}

/// Ordered provider chain.
#[derive(Clone)]
pub struct RateResolver {
    providers: Vec<Arc<dyn RateProvider>>,
}

impl RateResolver {
    /// Creates a resolver over an explicit chain.
    pub fn new(providers: Vec<Arc<dyn RateProvider>>) -> Self {
        RateResolver { providers }
    }

    /// Creates the HTTP chain from configuration, skipping disabled providers.
    pub fn from_config(config: &FxConfig) -> FxResult<Self> {
        let client = build_client(&config.http)?;
        let providers = config
            .enabled_providers()
            .map(|settings| {
                Arc::new(HttpRateProvider::new(settings.clone(), client.clone()))
                    as Arc<dyn RateProvider>
            })
            .collect();
        Ok(RateResolver::new(providers))
    }

    /// Provider names, in chain order.
    pub fn provider_names(&self) -> Vec<&str> {
        self.providers.iter().map(|p| p.name()).collect()
    }

    /// Resolves a table containing `code`.
    ///
    /// ## Errors
    /// - `InvalidCurrency` if `code` is not three letters
    /// - `NoProviderAvailable` if every provider failed or lacked `code`
    pub async fn resolve_rates(&self, code: &str) -> FxResult<ResolvedRates> {
        let code = validate_currency_code(code)?;

        for provider in &self.providers {
            match self.attempt(provider.as_ref(), &code).await {
                Ok(table) => {
                    info!(provider = provider.name(), currency = %code, rates = table.len(), "Accepted exchange rates");
                    return Ok(ResolvedRates {
                        provider: provider.name().to_string(),
                        table,
                        fetched_at: Utc::now(),
                    });
                }
                Err(e) if e.is_provider_failure() => {
                    warn!(provider = provider.name(), currency = %code, error = %e, "Provider skipped");
                }
                Err(e) => return Err(e),
            }
        }

        warn!(currency = %code, "No exchange-rate provider returned the requested currency");
        Err(FxError::NoProviderAvailable { code })
    }

    /// One provider attempt, including the code-presence check.
    async fn attempt(&self, provider: &dyn RateProvider, code: &str) -> FxResult<RateTable> {
        let table = provider.fetch_rates().await?;
        if !table.contains(code) {
            debug!(provider = provider.name(), currency = code, "Table lacks requested code");
            return Err(FxError::MissingCurrency {
                provider: provider.name().to_string(),
                code: code.to_string(),
            });
        }
        Ok(table)
    }
}

impl std::fmt::Debug for RateResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RateResolver")
            .field("providers", &self.provider_names())
            .finish()
    }
}
