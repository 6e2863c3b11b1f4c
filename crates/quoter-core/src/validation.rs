//! # Validation Module
//!
//! Input validation for catalog files and currency codes.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: CLI flags (clap)                                             │
//! │  └── Type validation (tier names, flag shapes)                         │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE                                                  │
//! │  ├── Catalog files: ids, names, prices                                 │
//! │  └── Currency codes: three ASCII letters                               │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Lenient parsing (discount module)                            │
//! │  └── Free-form discount text never fails, it falls back                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use quoter_core::validation::{validate_currency_code, validate_product_id};
//!
//! assert_eq!(validate_currency_code(" eur ").unwrap(), "EUR");
//! validate_product_id("color_swatch_king_variants").unwrap();
//! ```

use crate::error::ValidationError;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Longest product id accepted from a catalog file.
pub const MAX_PRODUCT_ID_LEN: usize = 64;

/// Longest product name accepted from a catalog file.
pub const MAX_PRODUCT_NAME_LEN: usize = 200;

// =============================================================================
// String Validators
// =============================================================================

/// Validates a product id.
///
/// ## Rules
/// - Must not be empty
/// - At most 64 characters
/// - Lowercase ASCII letters, digits and underscores only, so surrounding
///   whitespace is rejected rather than trimmed
///
/// ## Example
/// ```rust
/// use quoter_core::validation::validate_product_id;
///
/// assert!(validate_product_id("sa_variant_image_automator").is_ok());
/// assert!(validate_product_id("").is_err());
/// assert!(validate_product_id("Has Space").is_err());
/// ```
pub fn validate_product_id(id: &str) -> ValidationResult<()> {
    if id.is_empty() {
        return Err(ValidationError::Required {
            field: "id".to_string(),
        });
    }

    if id.len() > MAX_PRODUCT_ID_LEN {
        return Err(ValidationError::TooLong {
            field: "id".to_string(),
            max: MAX_PRODUCT_ID_LEN,
        });
    }

    if !id
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_')
    {
        return Err(ValidationError::InvalidFormat {
            field: "id".to_string(),
            reason: "must contain only lowercase letters, digits, and underscores".to_string(),
        });
    }

    Ok(())
}

/// Validates a product display name.
///
/// ## Rules
/// - Must not be empty
/// - At most 200 characters
pub fn validate_product_name(name: &str) -> ValidationResult<()> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Required {
            field: "name".to_string(),
        });
    }

    if name.chars().count() > MAX_PRODUCT_NAME_LEN {
        return Err(ValidationError::TooLong {
            field: "name".to_string(),
            max: MAX_PRODUCT_NAME_LEN,
        });
    }

    Ok(())
}

/// Validates an ISO-4217-style currency code and returns it uppercased.
///
/// ## Rules
/// - Exactly three ASCII letters after trimming
/// - Case-insensitive on input, uppercase on output
///
/// ## Example
/// ```rust
/// use quoter_core::validation::validate_currency_code;
///
/// assert_eq!(validate_currency_code("aed").unwrap(), "AED");
/// assert!(validate_currency_code("EURO").is_err());
/// assert!(validate_currency_code("").is_err());
/// ```
pub fn validate_currency_code(code: &str) -> ValidationResult<String> {
    let code = code.trim();

    if code.is_empty() {
        return Err(ValidationError::Required {
            field: "currency".to_string(),
        });
    }

    if code.len() != 3 || !code.chars().all(|c| c.is_ascii_alphabetic()) {
        return Err(ValidationError::InvalidFormat {
            field: "currency".to_string(),
            reason: "must be three letters".to_string(),
        });
    }

    Ok(code.to_ascii_uppercase())
}

/// Checks the currency code shape without allocating.
#[inline]
pub fn is_currency_code(code: &str) -> bool {
    code.len() == 3 && code.chars().all(|c| c.is_ascii_alphabetic())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a price in cents.
///
/// ## Rules
/// - Must be non-negative (>= 0)
/// - Zero is allowed (free tier)
///
/// ## Example
/// ```rust
/// use quoter_core::validation::validate_price_cents;
///
/// assert!(validate_price_cents(1490).is_ok());  // $14.90
/// assert!(validate_price_cents(0).is_ok());
/// assert!(validate_price_cents(-100).is_err());
/// ```
pub fn validate_price_cents(cents: i64) -> ValidationResult<()> {
    if cents < 0 {
        return Err(ValidationError::OutOfRange {
            field: "price".to_string(),
            min: 0,
            max: i64::MAX,
        });
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_product_id() {
        assert!(validate_product_id("color_swatch_king_variants").is_ok());
        assert!(validate_product_id("app2").is_ok());

        assert!(validate_product_id("").is_err());
        assert!(validate_product_id("   ").is_err());
        assert!(validate_product_id("has space").is_err());
        assert!(validate_product_id("Upper").is_err());
        assert!(validate_product_id(&"a".repeat(100)).is_err());
    }

    #[test]
    fn test_product_id_surrounding_whitespace_rejected() {
        for id in [" app", "app ", "\tapp", "app\n"] {
            assert!(matches!(
                validate_product_id(id),
                Err(ValidationError::InvalidFormat { .. })
            ));
        }
    }

    #[test]
    fn test_validate_product_name() {
        assert!(validate_product_name("Variant Descriptions King").is_ok());
        assert!(validate_product_name("").is_err());
        assert!(validate_product_name(&"A".repeat(300)).is_err());
    }

    #[test]
    fn test_validate_currency_code() {
        assert_eq!(validate_currency_code("usd").unwrap(), "USD");
        assert_eq!(validate_currency_code(" Aed ").unwrap(), "AED");

        assert!(validate_currency_code("").is_err());
        assert!(validate_currency_code("US").is_err());
        assert!(validate_currency_code("U5D").is_err());
        assert!(validate_currency_code("EURO").is_err());
    }

    #[test]
    fn test_is_currency_code() {
        assert!(is_currency_code("eur"));
        assert!(!is_currency_code("1inch"));
        assert!(!is_currency_code("ZAR "));
    }

    #[test]
    fn test_validate_price_cents() {
        assert!(validate_price_cents(0).is_ok());
        assert!(validate_price_cents(9990).is_ok());
        assert!(validate_price_cents(-100).is_err());
    }
}
