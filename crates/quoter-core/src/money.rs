//! # Money Module
//!
//! Provides the `Money` type for base-currency (USD) amounts and the display
//! helpers used by the pricing table and the offer message.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  In floating point:                                                     │
//! │    14.90 × 0.9 = 13.410000000000002                                     │
//! │    Sum the rows, subtract, round at the end → totals drift by a cent   │
//! │                                                                         │
//! │  OUR SOLUTION: Integer Cents                                            │
//! │    1490 cents, 10% off → 1341 cents, savings 149 cents                 │
//! │    Every row is rounded once; totals are exact sums of those cents     │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Converted (non-USD) amounts are indicative only and stay `f64`; they are
//! rounded to two decimals only when rendered by [`format_amount`].
//!
//! ## Usage
//! ```rust
//! use quoter_core::money::Money;
//! use quoter_core::DiscountPercent;
//!
//! let price = Money::from_cents(1490); // $14.90
//! let discounted = price.apply_discount(DiscountPercent::clamped(10.0));
//! assert_eq!(discounted.cents(), 1341);
//! assert_eq!(discounted.to_string(), "$13.41");
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, Sub};
use ts_rs::TS;

use crate::types::DiscountPercent;

// =============================================================================
// Money Type
// =============================================================================

/// Represents a USD amount in cents.
///
/// ## Design Decisions
/// - **i64 (signed)**: Savings are differences and may be computed before
///   they are known to be non-negative
/// - **Single field tuple struct**: Zero-cost abstraction over i64
///
/// ## Where Money is Used
/// ```text
/// Product.prices[tier] ──► PricingRow.actual ──► apply_discount ──► PricingRow.discounted
///                                  │                                        │
///                                  └──────────────► Totals ◄────────────────┘
///                                                     │
///                                     table + message (USD) / convert (other)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from cents (the smallest currency unit).
    ///
    /// ## Example
    /// ```rust
    /// use quoter_core::money::Money;
    ///
    /// let price = Money::from_cents(1490); // Represents $14.90
    /// assert_eq!(price.cents(), 1490);
    /// ```
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Returns the value in cents.
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    /// Returns the amount in major units as a float.
    ///
    /// Only for currency conversion, which is indicative by nature.
    #[inline]
    pub fn to_major(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    /// Applies a percentage-off discount and rounds to the nearest cent
    /// (half away from zero).
    ///
    /// ## Formula
    /// `discounted = actual × (1 − d/100)`
    ///
    /// ## Example
    /// ```rust
    /// use quoter_core::money::Money;
    /// use quoter_core::DiscountPercent;
    ///
    /// let price = Money::from_cents(990); // $9.90
    /// let discounted = price.apply_discount(DiscountPercent::clamped(25.0));
    /// // $9.90 × 0.75 = $7.425 → $7.43
    /// assert_eq!(discounted.cents(), 743);
    /// ```
    pub fn apply_discount(&self, discount: DiscountPercent) -> Money {
        let remaining = self.0 as f64 * (DiscountPercent::MAX - discount.value())
            / DiscountPercent::MAX;
        // 1e-6 absorbs representation error such as 742.4999999 for an exact half
        Money((remaining + 1e-6_f64.copysign(remaining)).round() as i64)
    }
}

// =============================================================================
// Display Formatting
// =============================================================================

/// Inserts thousands separators into a non-negative integer: `1234567` → `1,234,567`.
fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}

/// Formats an amount given in minor units (cents) as `1,234.56`, without sign.
fn format_minor_units(minor: i64) -> String {
    let abs = minor.unsigned_abs();
    format!("{}.{:02}", group_thousands(abs / 100), abs % 100)
}

/// Display symbol for the currencies that have a well-known one.
///
/// Anything else is rendered as `CODE 1,234.56`.
pub fn currency_symbol(code: &str) -> Option<&'static str> {
    match code {
        "USD" => Some("$"),
        "EUR" => Some("€"),
        "GBP" => Some("£"),
        "INR" => Some("₹"),
        "JPY" => Some("¥"),
        "AUD" => Some("A$"),
        "CAD" => Some("CA$"),
        "CNY" => Some("CN¥"),
        _ => None,
    }
}

/// Formats an amount in any currency with two decimals.
///
/// ## Example
/// ```rust
/// use quoter_core::money::format_amount;
///
/// assert_eq!(format_amount(54.7234, "AED"), "AED 54.72");
/// assert_eq!(format_amount(1234.5, "EUR"), "€1,234.50");
/// ```
pub fn format_amount(value: f64, code: &str) -> String {
    let minor = (value * 100.0).round() as i64;
    let sign = if minor < 0 { "-" } else { "" };
    let digits = format_minor_units(minor);
    match currency_symbol(code) {
        Some(symbol) => format!("{}{}{}", sign, symbol, digits),
        None => format!("{}{} {}", sign, code, digits),
    }
}

/// Display shows USD with thousands separators: `$1,234.50`, `-$5.50`.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{}${}", sign, format_minor_units(self.0))
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Default money is zero.
impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0 + other.0)
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0 - other.0)
    }
}

/// Summing rows into totals.
impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), Add::add)
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
