//! # Pricing Engine
//!
//! Turns the selected products, the active tier and a discount resolver into
//! pricing rows, totals and the tabular summary handed to presentation.
//!
//! ## Data Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  selected products (selection order)                                    │
//! │        │                                                                │
//! │        ▼                                                                │
//! │  compute_rows(tier, resolver)                                           │
//! │        │   actual     = product.prices[tier]                            │
//! │        │   discount   = resolver.resolve(product.id)                    │
//! │        │   discounted = actual.apply_discount(discount)                 │
//! │        ▼                                                                │
//! │  Vec<PricingRow> ──► compute_totals ──► Totals                          │
//! │        │                                  │                             │
//! │        └──────────► PricingSummary ◄──────┘                             │
//! │                                                                         │
//! │  Everything is recomputed from scratch on every read.                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::catalog::Product;
use crate::discount::DiscountResolver;
use crate::error::CoreResult;
use crate::money::Money;
use crate::types::{DiscountPercent, Tier};

// =============================================================================
// Pricing Row
// =============================================================================

/// Prices for one selected product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct PricingRow {
    pub product_id: String,
    pub name: String,

    /// Monthly price at the active tier.
    pub actual: Money,

    /// `actual` after the effective discount, rounded to the cent.
    pub discounted: Money,

    /// Effective discount used for this row.
    pub discount: DiscountPercent,
}

impl PricingRow {
    /// Monthly saving for this row.
    pub fn savings(&self) -> Money {
        self.actual - self.discounted
    }
}

/// Computes one row per product, in the order given.
///
/// ## Errors
/// `MissingTierPrice` if a product does not price `tier`.
pub fn compute_rows(
    products: &[&Product],
    tier: Tier,
    resolver: &DiscountResolver<'_>,
) -> CoreResult<Vec<PricingRow>> {
    products
        .iter()
        .map(|product| {
            let actual = product.price_for(tier)?;
            let discount = resolver.resolve(&product.id);
            Ok(PricingRow {
                product_id: product.id.clone(),
                name: product.name.clone(),
                actual,
                discounted: actual.apply_discount(discount),
                discount,
            })
        })
        .collect()
}

// =============================================================================
// Totals
// =============================================================================

/// Sums over the selected rows.
///
/// ## Invariants
/// - `actual` is the sum of row actuals
/// - `discounted` is the sum of row discounted amounts
/// - `savings == actual - discounted`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Totals {
    pub actual: Money,
    pub discounted: Money,
    pub savings: Money,
}

/// Sums rows into totals. An empty slice gives all zeros.
pub fn compute_totals(rows: &[PricingRow]) -> Totals {
    let actual: Money = rows.iter().map(|r| r.actual).sum();
    let discounted: Money = rows.iter().map(|r| r.discounted).sum();
    Totals {
        actual,
        discounted,
        savings: actual - discounted,
    }
}

// =============================================================================
// Tabular Summary
// =============================================================================

/// One line of the pricing table (a product or the totals row).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SummaryLine {
    pub name: String,
    pub actual: Money,
    pub discounted: Money,
    pub savings: Money,
}

/// The table handed to presentation: product lines plus a totals line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PricingSummary {
    pub lines: Vec<SummaryLine>,
    pub totals: SummaryLine,
}

/// Label of the totals line.
pub const TOTALS_LABEL: &str = "Total";

impl PricingSummary {
    pub fn new(rows: &[PricingRow], totals: &Totals) -> Self {
        PricingSummary {
            lines: rows
                .iter()
                .map(|row| SummaryLine {
                    name: row.name.clone(),
                    actual: row.actual,
                    discounted: row.discounted,
                    savings: row.savings(),
                })
                .collect(),
            totals: SummaryLine {
                name: TOTALS_LABEL.to_string(),
                actual: totals.actual,
                discounted: totals.discounted,
                savings: totals.savings,
            },
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
