//! # Rate Loader
//!
//! Owns the rate table for the currently selected display currency and the
//! Fetch State shown to the user.
//!
//! ## Generations
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  select AED ──► begin() gen=1 ──► resolve("AED") ····slow····┐          │
//! │  select EUR ──► begin() gen=2 ──► resolve("EUR") ──┐         │          │
//! │                                                    ▼         │          │
//! │                            finish(gen=2) == current ✓ apply  │          │
//! │                                                              ▼          │
//! │                                  finish(gen=1) != current ✗ discard     │
//! │                                                                         │
//! │  Last write wins by selection order, never by arrival order.           │
//! │  State is replaced whole under the write lock, never patched.          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Fetch State Machine
//! ```text
//!   Idle ──select(code)──► Loading ──ok──► Ready
//!    ▲                        │
//!    │                        └──err──► Error
//!    └──select(none)── (any)
//! ```

use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::error::FxResult;
use crate::resolver::{RateResolver, ResolvedRates};
use quoter_core::RateTable;

// =============================================================================
// Fetch State
// =============================================================================

/// Freshness of the rate table for the selected currency.
///
/// Advisory only: USD figures never depend on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FetchState {
    /// No currency selected.
    #[default]
    Idle,
    /// A resolution is in flight.
    Loading,
    /// A table containing the selected code is loaded.
    Ready,
    /// Every provider failed for the selected code.
    Error,
}

impl FetchState {
    /// Note shown next to the pricing table, if any.
    pub fn advisory_note(&self) -> Option<&'static str> {
        match self {
            FetchState::Idle => None,
            FetchState::Loading => Some("Fetching latest exchange rates…"),
            FetchState::Error => Some(
                "Could not fetch exchange rates. USD values shown; converted amounts may be missing.",
            ),
            FetchState::Ready => Some(
                "Converted amounts are indicative based on current rates; billing remains in USD.",
            ),
        }
    }
}

impl std::fmt::Display for FetchState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FetchState::Idle => write!(f, "idle"),
            FetchState::Loading => write!(f, "loading"),
            FetchState::Ready => write!(f, "ready"),
            FetchState::Error => write!(f, "error"),
        }
    }
}

// =============================================================================
// Rate State
// =============================================================================

/// Snapshot of the loader's state.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RateState {
    /// Selected display currency, uppercased as typed.
    pub currency: Option<String>,

    pub fetch_state: FetchState,

    /// Accepted table. `None` unless `fetch_state` is `Ready`.
    pub rates: Option<ResolvedRates>,

    /// Last resolution error, for logs and `--json` output.
    pub last_error: Option<String>,
}

impl RateState {
    /// The loaded table, if any.
    pub fn table(&self) -> Option<&RateTable> {
        self.rates.as_ref().map(|r| &r.table)
    }
}

/// Proof that a resolution was started at a given generation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadTicket {
    generation: u64,
    currency: String,
}

impl LoadTicket {
    pub fn currency(&self) -> &str {
        &self.currency
    }
}

// =============================================================================
// Rate Loader
// =============================================================================

/// Generation-guarded owner of the selected currency's rate table.
///
/// Cheap to clone: clones share state.
#[derive(Debug, Clone)]
pub struct RateLoader {
    resolver: Arc<RateResolver>,
    state: Arc<RwLock<RateState>>,
    generation: Arc<AtomicU64>,
}

impl RateLoader {
    pub fn new(resolver: RateResolver) -> Self {
        RateLoader {
            resolver: Arc::new(resolver),
            state: Arc::new(RwLock::new(RateState::default())),
            generation: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Current state snapshot.
    pub async fn state(&self) -> RateState {
        self.state.read().await.clone()
    }

    /// Starts a resolution for `code`: bumps the generation, clears the
    /// previous table and enters Loading.
    pub async fn begin(&self, code: &str) -> LoadTicket {
        let currency = code.trim().to_ascii_uppercase();
        let mut state = self.state.write().await;
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        *state = RateState {
            currency: Some(currency.clone()),
            fetch_state: FetchState::Loading,
            rates: None,
            last_error: None,
        };
        debug!(currency = %currency, generation, "Rate load started");
        LoadTicket {
            generation,
            currency,
        }
    }

    /// Applies a resolution result if `ticket` is still current.
    ///
    /// Returns whether the result was applied.
    pub async fn finish(&self, ticket: LoadTicket, result: FxResult<ResolvedRates>) -> bool {
        let mut state = self.state.write().await;
        let current = self.generation.load(Ordering::SeqCst);
        if ticket.generation != current {
            debug!(
                currency = %ticket.currency,
                generation = ticket.generation,
                current,
                "Discarding stale rate result"
            );
            return false;
        }

        *state = match result {
            Ok(resolved) => {
                info!(currency = %ticket.currency, provider = %resolved.provider, "Rates ready");
                RateState {
                    currency: Some(ticket.currency),
                    fetch_state: FetchState::Ready,
                    rates: Some(resolved),
                    last_error: None,
                }
            }
            Err(e) => {
                warn!(currency = %ticket.currency, error = %e, "Rate load failed");
                RateState {
                    currency: Some(ticket.currency),
                    fetch_state: FetchState::Error,
                    rates: None,
                    last_error: Some(e.to_string()),
                }
            }
        };
        true
    }

    /// Clears the selection: Idle, no table, and any in-flight result
    /// becomes stale.
    pub async fn reset(&self) {
        let mut state = self.state.write().await;
        self.generation.fetch_add(1, Ordering::SeqCst);
        *state = RateState::default();
        debug!("Rate selection cleared");
    }

    /// Resolves `code` and applies the result, inline.
    ///
    /// Returns whether the result was applied.
    pub async fn load(&self, code: &str) -> bool {
        let ticket = self.begin(code).await;
        let result = self.resolver.resolve_rates(ticket.currency()).await;
        self.finish(ticket, result).await
    }

    /// Reacts to a currency selection change.
    ///
    /// `Some(code)` spawns a background load and returns its handle.
    /// `None` or blank text resets to Idle.
    pub async fn select_currency(&self, code: Option<&str>) -> Option<JoinHandle<bool>> {
        match code.map(str::trim) {
            None | Some("") => {
                self.reset().await;
                None
            }
            Some(code) => {
                let ticket = self.begin(code).await;
                let loader = self.clone();
                Some(tokio::spawn(async move {
                    let result = loader.resolver.resolve_rates(ticket.currency()).await;
                    loader.finish(ticket, result).await
                }))
            }
        }
    }
}
