//! # quoter-core: Pure Quoting Logic for Quoter
//!
//! This crate is the **heart** of Quoter. It turns a plan tier, a set of
//! add-on products and a discount policy into prices, totals and a ready to
//! send offer message. Everything here is a pure function with zero I/O.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Quoter Architecture                              │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    quoter-cli (presentation)                    │   │
//! │  │    flags ──► QuoteSession ──► table + advisory note + message   │   │
//! │  └──────────────┬──────────────────────────────────┬───────────────┘   │
//! │                 │                                  │                    │
//! │  ┌──────────────▼──────────────────┐  ┌────────────▼───────────────┐   │
//! │  │  ★ quoter-core (THIS CRATE) ★   │  │   quoter-fx                │   │
//! │  │                                 │  │                            │   │
//! │  │  catalog ─► discount ─► pricing │  │  providers ─► resolver     │   │
//! │  │                │                │  │       │                    │   │
//! │  │                ▼                │  │       ▼                    │   │
//! │  │   convert ◄── RateTable ◄───────┼──┼── RateLoader (Fetch State) │   │
//! │  │      │                          │  │                            │   │
//! │  │      ▼                          │  └────────────────────────────┘   │
//! │  │   message                       │                                   │
//! │  │                                 │                                   │
//! │  │  NO I/O • NO NETWORK • PURE     │                                   │
//! │  └─────────────────────────────────┘                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Plan tiers and discount percentages
//! - [`money`] - Money type with integer arithmetic and display formatting
//! - [`catalog`] - The fixed product table
//! - [`discount`] - Global vs. per-product discount resolution
//! - [`pricing`] - Pricing rows, totals and the tabular summary
//! - [`convert`] - Rate tables and base-currency conversion
//! - [`message`] - Deterministic offer message composition
//! - [`session`] - The interactive quoting session
//! - [`error`] - Domain error types
//! - [`validation`] - Input validation
//!
//! ## Example Usage
//!
//! ```rust
//! use quoter_core::{Catalog, QuoteSession, Tier};
//!
//! let catalog = Catalog::builtin();
//! let mut session = QuoteSession::new();
//! session.set_tier(Tier::ShopifyBasic);
//! session.toggle_product("color_swatch_king_variants");
//! session.set_global_discount("10");
//!
//! let quote = session.quote(&catalog).unwrap();
//! assert_eq!(quote.totals.discounted.cents(), 1341); // $13.41
//! assert_eq!(quote.totals.savings.cents(), 149); // $1.49
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod catalog;
pub mod convert;
pub mod discount;
pub mod error;
pub mod message;
pub mod money;
pub mod pricing;
pub mod session;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use catalog::{Catalog, Product};
pub use convert::{convert, RateTable};
pub use discount::{effective_discount, DiscountInput, DiscountResolver};
pub use error::{CoreError, CoreResult, ValidationError};
pub use message::{compose_message, CurrencyView, DiscountMode, MessageInput};
pub use money::Money;
pub use pricing::{compute_rows, compute_totals, PricingRow, PricingSummary, SummaryLine, Totals};
pub use session::{Quote, QuoteSession, Selection};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// The only currency prices are stored and billed in.
///
/// Rate tables are always expressed as "units of X per one USD".
pub const BASE_CURRENCY: &str = "USD";

/// Greeting used when the merchant name is blank.
pub const DEFAULT_GREETING_NAME: &str = "there";
