//! # Error Types
//!
//! Domain-specific error types for quoter-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  quoter-core errors (this file)                                        │
//! │  ├── CoreError        - Catalog and selection errors                   │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  quoter-fx errors (separate crate)                                     │
//! │  └── FxError          - Provider, config and HTTP failures             │
//! │                                                                         │
//! │  CLI (in app)                                                          │
//! │  └── anyhow::Error    - What the operator sees on stderr               │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → anyhow → stderr                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Bad free-form discount text is never an error: it silently resolves to a
//! fallback value. Errors here are reserved for states the catalog itself
//! makes impossible in a healthy build.

use thiserror::Error;

use crate::types::Tier;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A product id is not in the catalog.
    ///
    /// ## When This Occurs
    /// - A selection names a product removed from a custom catalog file
    /// - A typo in a `--app` flag
    #[error("Unknown product: {0}")]
    UnknownProduct(String),

    /// A tier name could not be parsed.
    #[error("Unknown tier: {0}")]
    UnknownTier(String),

    /// A catalog product has no price for the requested tier.
    ///
    /// ## When This Occurs
    /// Only with a hand-edited catalog file. The built-in catalog prices
    /// every product at every tier and its tests assert that.
    #[error("Product {product_id} has no price for tier {tier}")]
    MissingTierPrice { product_id: String, tier: Tier },

    /// Two catalog products share an id.
    #[error("Duplicate product id in catalog: {0}")]
    DuplicateProduct(String),

    /// A catalog file could not be parsed.
    #[error("Invalid catalog: {0}")]
    InvalidCatalog(String),

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// Raised while loading catalogs and currency codes, before any pricing runs.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Invalid format (e.g., a currency code that is not three letters).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
