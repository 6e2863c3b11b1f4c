//! # Currency Conversion
//!
//! A [`RateTable`] maps uppercase 3-letter codes to "units of that currency
//! per one USD". [`convert`] applies it to a USD amount.
//!
//! ```text
//! convert($13.41, "AED", Some({AED: 3.6725}))  ──► Some(49.248...)
//! convert($13.41, "AED", None)                 ──► None   (nothing loaded)
//! convert($13.41, "AED", Some({}))             ──► None   (code missing)
//! ```
//!
//! `None` always means "omit the converted figure". It is never rendered as 0.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::money::Money;

/// Normalized rate table: uppercase code → multiplier against USD.
///
/// Keys are uppercased on insert, so lookups are case-insensitive.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RateTable(BTreeMap<String, f64>);

impl RateTable {
    pub fn new() -> Self {
        RateTable(BTreeMap::new())
    }

    /// Inserts a rate, uppercasing the code.
    pub fn insert(&mut self, code: &str, rate: f64) {
        self.0.insert(code.to_ascii_uppercase(), rate);
    }

    /// Rate for `code`, case-insensitively.
    pub fn get(&self, code: &str) -> Option<f64> {
        self.0.get(&code.to_ascii_uppercase()).copied()
    }

    /// Whether the table carries a usable rate for `code`.
    ///
    /// Zero, negative and non-finite multipliers count as missing.
    pub fn contains(&self, code: &str) -> bool {
        self.usable_rate(code).is_some()
    }

    /// Rate for `code` if it can be used for conversion.
    pub fn usable_rate(&self, code: &str) -> Option<f64> {
        self.get(code).filter(|r| r.is_finite() && *r > 0.0)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: AsRef<str>> FromIterator<(K, f64)> for RateTable {
    fn from_iter<I: IntoIterator<Item = (K, f64)>>(iter: I) -> Self {
        let mut table = RateTable::new();
        for (code, rate) in iter {
            table.insert(code.as_ref(), rate);
        }
        table
    }
}

/// Converts a USD amount into `code` using `table`.
///
/// Returns `None` when no table is loaded or the table lacks a usable rate.
///
/// ## Example
/// ```rust
/// use quoter_core::{convert, Money, RateTable};
///
/// let table: RateTable = [("aed", 3.6725)].into_iter().collect();
/// let aed = convert(Money::from_cents(1000), "AED", Some(&table)).unwrap();
/// assert!((aed - 36.725).abs() < 1e-9);
///
/// assert_eq!(convert(Money::from_cents(1000), "AED", None), None);
/// ```
pub fn convert(amount: Money, code: &str, table: Option<&RateTable>) -> Option<f64> {
    let rate = table?.usable_rate(code)?;
    Some(amount.to_major() * rate)
}

// =============================================================================
// Unit Tests
// =============================================================================
