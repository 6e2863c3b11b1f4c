//! # quoter-fx: Exchange Rates for Quoter
//!
//! This crate resolves USD-based exchange-rate tables from an ordered chain
//! of public providers and tracks the rate state for the selected display
//! currency. USD prices never depend on anything here: every failure
//! degrades to "converted amounts missing".
//!
//! ## Architecture Overview
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Exchange-Rate Pipeline                           │
//! │                                                                         │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │                  RateLoader (selection owner)                    │  │
//! │  │                                                                  │  │
//! │  │  select_currency(code) bumps the generation and spawns a load   │  │
//! │  │  Results from older generations are discarded                    │  │
//! │  └────────────────────────────┬─────────────────────────────────────┘  │
//! │                               │                                         │
//! │                               ▼                                         │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │                  RateResolver (provider chain)                   │  │
//! │  │                                                                  │  │
//! │  │  frankfurter ─► exchangerate_host ─► open_er_api ─► jsdelivr     │  │
//! │  │  first table containing the code wins                            │  │
//! │  └────────────────────────────┬─────────────────────────────────────┘  │
//! │                               │                                         │
//! │                               ▼                                         │
//! │  ┌────────────────┐  ┌────────────────┐  ┌────────────────────────┐    │
//! │  │HttpRateProvider│  │   normalize    │  │   HttpSymbolSource     │    │
//! │  │                │  │                │  │                        │    │
//! │  │ one GET per    │─►│ rates          │  │ currency list, falls   │    │
//! │  │ attempt        │  │ result_success │  │ back to fixed codes    │    │
//! │  │                │  │ nested_by_base │  │                        │    │
//! │  └────────────────┘  └────────────────┘  └────────────────────────┘    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//! - [`config`] - Provider chain, HTTP and symbol settings (TOML + env)
//! - [`error`] - FX error types
//! - [`provider`] - `RateProvider` trait, HTTP provider and body normalization
//! - [`resolver`] - First-acceptable-wins provider chain
//! - [`loader`] - Generation-guarded rate state and Fetch State
//! - [`symbols`] - Selectable currency codes
//!
//! ## Usage
//!
//! ```rust,ignore
//! use quoter_fx::{FxConfig, RateLoader, RateResolver};
//!
//! let config = FxConfig::load(None)?;
//! let loader = RateLoader::new(RateResolver::from_config(&config)?);
//!
//! loader.load("AED").await;
//! let state = loader.state().await;
//! println!("{}: {:?}", state.fetch_state, state.table());
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod config;
pub mod error;
pub mod loader;
pub mod provider;
pub mod resolver;
pub mod symbols;

// =============================================================================
// Re-exports
// =============================================================================

pub use config::{FxConfig, HttpSettings, ProviderSettings, SymbolSettings};
pub use error::{FxError, FxResult};
pub use loader::{FetchState, LoadTicket, RateLoader, RateState};
pub use provider::{normalize, HttpRateProvider, RateProvider, ResponseShape};
pub use resolver::{RateResolver, ResolvedRates};
pub use symbols::{available_currency_codes, order_codes, HttpSymbolSource, SymbolSource};
