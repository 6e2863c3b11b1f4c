//! # Discount Module
//!
//! Resolves the effective discount for each product from free-form text.
//!
//! ## Resolution Order
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  effective_discount(product_id)                                         │
//! │                                                                         │
//! │  global text ──parse──► finite? ──no──► 0                               │
//! │                            │yes                                         │
//! │                            ▼                                            │
//! │                      clamp [0,100] = G                                  │
//! │                            │                                            │
//! │  per-product mode off? ────┼──────────────────────────────► G           │
//! │                            │                                            │
//! │  override missing/blank? ──┼──────────────────────────────► G           │
//! │                            │                                            │
//! │  override not finite? ─────┼──────────────────────────────► G           │
//! │                            │                                            │
//! │                            └──► clamp [0,100] of override               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Nothing in this module returns an error: malformed text always resolves
//! to a fallback value.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::types::DiscountPercent;

// =============================================================================
// Lenient Number Parsing
// =============================================================================

/// Parses free-form numeric text the way a form field is read.
///
/// ## Rules
/// - Surrounding whitespace is ignored
/// - Empty text reads as `0`
/// - Unparseable or non-finite text (`abc`, `inf`, `NaN`) reads as `None`
///
/// ## Example
/// ```rust
/// use quoter_core::discount::parse_number;
///
/// assert_eq!(parse_number(" 12.5 "), Some(12.5));
/// assert_eq!(parse_number(""), Some(0.0));
/// assert_eq!(parse_number("abc"), None);
/// ```
pub fn parse_number(text: &str) -> Option<f64> {
    let text = text.trim();
    if text.is_empty() {
        return Some(0.0);
    }
    text.parse::<f64>().ok().filter(|n| n.is_finite())
}

/// Parses and clamps the global discount. Anything unreadable counts as 0.
pub fn parse_global(text: &str) -> DiscountPercent {
    parse_number(text)
        .map(DiscountPercent::clamped)
        .unwrap_or_else(DiscountPercent::zero)
}

/// Resolves the discount for one product.
///
/// ## Example
/// ```rust
/// use std::collections::BTreeMap;
/// use quoter_core::effective_discount;
///
/// let mut overrides = BTreeMap::new();
/// overrides.insert("app".to_string(), "  ".to_string());
///
/// // Blank override falls back to the global value
/// assert_eq!(effective_discount("app", "15", &overrides, true).value(), 15.0);
///
/// overrides.insert("app".to_string(), "150".to_string());
/// assert_eq!(effective_discount("app", "15", &overrides, true).value(), 100.0);
/// ```
pub fn effective_discount(
    product_id: &str,
    global: &str,
    per_product: &BTreeMap<String, String>,
    use_per_product: bool,
) -> DiscountPercent {
    resolve(parse_global(global), product_id, per_product, use_per_product)
}

fn resolve(
    global: DiscountPercent,
    product_id: &str,
    per_product: &BTreeMap<String, String>,
    use_per_product: bool,
) -> DiscountPercent {
    if !use_per_product {
        return global;
    }

    let raw = match per_product.get(product_id) {
        Some(raw) if !raw.trim().is_empty() => raw,
        _ => return global,
    };

    match parse_number(raw) {
        Some(n) => DiscountPercent::clamped(n),
        None => global,
    }
}

// =============================================================================
// Discount Input
// =============================================================================

/// The raw discount fields of a quoting session, exactly as typed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscountInput {
    /// Global percentage text.
    pub global: String,

    /// Product id → override percentage text.
    pub per_product: BTreeMap<String, String>,

    /// When false, overrides are ignored and every product uses the global value.
    pub use_per_product: bool,
}

impl DiscountInput {
    /// A uniform discount with no overrides.
    pub fn uniform(global: impl Into<String>) -> Self {
        DiscountInput {
            global: global.into(),
            ..Default::default()
        }
    }

    /// Builds a resolver over the current text.
    pub fn resolver(&self) -> DiscountResolver<'_> {
        DiscountResolver::new(self)
    }
}

// =============================================================================
// Discount Resolver
// =============================================================================

/// Resolves discounts against one snapshot of [`DiscountInput`].
///
/// The global value is parsed once on construction.
#[derive(Debug, Clone, Copy)]
pub struct DiscountResolver<'a> {
    input: &'a DiscountInput,
    global: DiscountPercent,
}

impl<'a> DiscountResolver<'a> {
    pub fn new(input: &'a DiscountInput) -> Self {
        DiscountResolver {
            input,
            global: parse_global(&input.global),
        }
    }

    /// The clamped global discount.
    pub fn global(&self) -> DiscountPercent {
        self.global
    }

    /// Whether per-product overrides are in effect.
    pub fn is_per_product(&self) -> bool {
        self.input.use_per_product
    }

    /// The effective discount for `product_id`.
    pub fn resolve(&self, product_id: &str) -> DiscountPercent {
        resolve(
            self.global,
            product_id,
            &self.input.per_product,
            self.input.use_per_product,
        )
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn overrides(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_parse_number() {
        assert_eq!(parse_number("10"), Some(10.0));
        assert_eq!(parse_number("  7.5\t"), Some(7.5));
        assert_eq!(parse_number("-50"), Some(-50.0));
        assert_eq!(parse_number("1e1"), Some(10.0));
        assert_eq!(parse_number("   "), Some(0.0));
        assert_eq!(parse_number("abc"), None);
        assert_eq!(parse_number("inf"), None);
        assert_eq!(parse_number("NaN"), None);
        assert_eq!(parse_number("10%"), None);
    }

    #[test]
    fn test_global_clamp_table() {
        let none = BTreeMap::new();
        let cases = [
            ("-50", 0.0),
            ("0", 0.0),
            ("50", 50.0),
            ("100", 100.0),
            ("150", 100.0),
            ("abc", 0.0),
            ("", 0.0),
            ("  ", 0.0),
        ];
        for (input, expected) in cases {
            let d = effective_discount("app", input, &none, false);
            assert_eq!(d.value(), expected, "input {:?}", input);
        }
    }

    #[test]
    fn test_override_precedence() {
        let table = overrides(&[("a", "25"), ("b", ""), ("c", "  "), ("d", "abc"), ("e", "-5")]);

        assert_eq!(effective_discount("a", "10", &table, true).value(), 25.0);
        assert_eq!(effective_discount("b", "10", &table, true).value(), 10.0);
        assert_eq!(effective_discount("c", "10", &table, true).value(), 10.0);
        assert_eq!(effective_discount("d", "10", &table, true).value(), 10.0);
        assert_eq!(effective_discount("e", "10", &table, true).value(), 0.0);
        assert_eq!(effective_discount("missing", "10", &table, true).value(), 10.0);
    }

    #[test]
    fn test_overrides_ignored_when_mode_off() {
        let table = overrides(&[("a", "25")]);
        assert_eq!(effective_discount("a", "10", &table, false).value(), 10.0);
    }

    #[test]
    fn test_override_falls_back_to_clamped_global() {
        let table = overrides(&[("a", "oops")]);
        assert_eq!(effective_discount("a", "250", &table, true).value(), 100.0);
    }

    #[test]
    fn test_resolver_matches_free_function() {
        let input = DiscountInput {
            global: "12".to_string(),
            per_product: overrides(&[("a", "30")]),
            use_per_product: true,
        };
        let resolver = input.resolver();
        assert_eq!(resolver.global().value(), 12.0);
        assert!(resolver.is_per_product());
        assert_eq!(resolver.resolve("a").value(), 30.0);
        assert_eq!(resolver.resolve("b").value(), 12.0);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(256))]

        #[test]
        fn test_effective_discount_always_in_range(
            global in ".{0,12}",
            override_text in ".{0,12}",
            use_per_product in any::<bool>(),
        ) {
            let table = overrides(&[("app", override_text.as_str())]);
            let d = effective_discount("app", &global, &table, use_per_product);
            prop_assert!((0.0..=100.0).contains(&d.value()));
        }

        #[test]
        fn test_numeric_discount_always_in_range(
            global in any::<f64>(),
            override_value in any::<f64>(),
        ) {
            let table = overrides(&[("app", override_value.to_string().as_str())]);
            let d = effective_discount("app", &global.to_string(), &table, true);
            prop_assert!((0.0..=100.0).contains(&d.value()));
        }

        #[test]
        fn test_well_formed_override_wins(
            global in -200.0f64..200.0,
            override_value in 0.0f64..=100.0,
        ) {
            let table = overrides(&[("app", override_value.to_string().as_str())]);
            let d = effective_discount("app", &global.to_string(), &table, true);
            prop_assert_eq!(d.value(), override_value);
        }
    }
}
