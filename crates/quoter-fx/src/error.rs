//! # FX Error Types
//!
//! Error types for exchange-rate resolution.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        FX Error Categories                              │
//! │                                                                         │
//! │  ┌─────────────────┐  ┌─────────────────┐  ┌─────────────────────────┐ │
//! │  │  Configuration  │  │ Provider (skip) │  │     Resolution          │ │
//! │  │                 │  │                 │  │                         │ │
//! │  │  InvalidConfig  │  │  Http           │  │  NoProviderAvailable    │ │
//! │  │  InvalidUrl     │  │  BadStatus      │  │  InvalidCurrency        │ │
//! │  │  ConfigLoad...  │  │  InvalidBody    │  │                         │ │
//! │  │  ConfigSave...  │  │  Unrecognized.. │  │                         │ │
//! │  │                 │  │  MissingCurr... │  │                         │ │
//! │  └─────────────────┘  └─────────────────┘  └─────────────────────────┘ │
//! │                                                                         │
//! │  Provider errors are absorbed by the resolver, which moves on to the   │
//! │  next provider. Only NoProviderAvailable reaches the caller.           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

/// Result type alias for FX operations.
pub type FxResult<T> = Result<T, FxError>;

/// FX error type covering every rate lookup failure.
#[derive(Debug, Error)]
pub enum FxError {
    // =========================================================================
    // Configuration Errors
    // =========================================================================
    /// Invalid FX configuration.
    #[error("Invalid FX configuration: {0}")]
    InvalidConfig(String),

    /// A provider or symbols URL does not parse or is not http(s).
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Failed to load config file.
    #[error("Failed to load config: {0}")]
    ConfigLoadFailed(String),

    /// Failed to save config file.
    #[error("Failed to save config: {0}")]
    ConfigSaveFailed(String),

    // =========================================================================
    // Provider Errors
    // =========================================================================
    /// The request could not be sent or the response not received.
    #[error("HTTP request failed: {0}")]
    Http(String),

    /// The provider answered with a non-success status.
    #[error("Provider {provider} returned HTTP {status}")]
    BadStatus { provider: String, status: u16 },

    /// The body is not valid JSON.
    #[error("Invalid response body: {0}")]
    InvalidBody(String),

    /// The JSON does not have the shape the provider is configured for.
    #[error("Provider {provider} returned an unrecognized response shape")]
    UnrecognizedShape { provider: String },

    /// The response is well formed but lacks the requested code.
    #[error("Provider {provider} has no rate for {code}")]
    MissingCurrency { provider: String, code: String },

    // =========================================================================
    // Resolution Errors
    // =========================================================================
    /// Every provider failed or none carried the requested code.
    #[error("No exchange-rate provider returned {code}")]
    NoProviderAvailable { code: String },

    /// The requested code is not a 3-letter currency code.
    #[error("Invalid currency code: {0}")]
    InvalidCurrency(String),
}

// =============================================================================
// Error Conversions
// =============================================================================

impl From<reqwest::Error> for FxError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            FxError::InvalidBody(err.to_string())
        } else {
            FxError::Http(err.to_string())
        }
    }
}

impl From<serde_json::Error> for FxError {
    fn from(err: serde_json::Error) -> Self {
        FxError::InvalidBody(err.to_string())
    }
}

impl From<url::ParseError> for FxError {
    fn from(err: url::ParseError) -> Self {
        FxError::InvalidUrl(err.to_string())
    }
}

impl From<std::io::Error> for FxError {
    fn from(err: std::io::Error) -> Self {
        FxError::ConfigLoadFailed(err.to_string())
    }
}

impl From<toml::de::Error> for FxError {
    fn from(err: toml::de::Error) -> Self {
        FxError::ConfigLoadFailed(err.to_string())
    }
}

impl From<toml::ser::Error> for FxError {
    fn from(err: toml::ser::Error) -> Self {
        FxError::ConfigSaveFailed(err.to_string())
    }
}

impl From<quoter_core::ValidationError> for FxError {
    fn from(err: quoter_core::ValidationError) -> Self {
        FxError::InvalidCurrency(err.to_string())
    }
}

// =============================================================================
// Error Categorization (for the fallback chain)
// =============================================================================

impl FxError {
    /// Returns true if this error is confined to one provider attempt, so the
    /// resolver should move on to the next provider.
    pub fn is_provider_failure(&self) -> bool {
        matches!(
            self,
            FxError::Http(_)
                | FxError::BadStatus { .. }
                | FxError::InvalidBody(_)
                | FxError::UnrecognizedShape { .. }
                | FxError::MissingCurrency { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_failures() {
        assert!(FxError::Http("connection refused".into()).is_provider_failure());
        assert!(FxError::BadStatus {
            provider: "frankfurter".into(),
            status: 503
        }
        .is_provider_failure());
        assert!(FxError::MissingCurrency {
            provider: "frankfurter".into(),
            code: "AED".into()
        }
        .is_provider_failure());

        assert!(!FxError::NoProviderAvailable { code: "AED".into() }.is_provider_failure());
        assert!(!FxError::InvalidConfig("bad".into()).is_provider_failure());
    }

    #[test]
    fn test_error_display() {
        let err = FxError::MissingCurrency {
            provider: "frankfurter".into(),
            code: "AED".into(),
        };
        assert_eq!(err.to_string(), "Provider frankfurter has no rate for AED");

        let err = FxError::NoProviderAvailable { code: "AED".into() };
        assert_eq!(err.to_string(), "No exchange-rate provider returned AED");
    }
}
