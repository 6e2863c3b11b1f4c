//! # Domain Types
//!
//! Small value types shared by every quoting module.
//!
//! ## Type Overview
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌──────────────────────────┐        ┌──────────────────────────┐      │
//! │  │          Tier            │        │     DiscountPercent      │      │
//! │  │  ──────────────────────  │        │  ──────────────────────  │      │
//! │  │  PauseAndBuild           │        │  f64, always in [0,100]  │      │
//! │  │  ShopifyBasic (default)  │        │  clamped on construction │      │
//! │  │  ShopifyGrow             │        │  10.0 = 10% off          │      │
//! │  │  ShopifyAdvanced         │        └──────────────────────────┘      │
//! │  │  ShopifyPlus             │                                          │
//! │  └──────────────────────────┘                                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use ts_rs::TS;

use crate::error::CoreError;

// =============================================================================
// Plan Tier
// =============================================================================

/// A subscription plan level. Exactly one is active per quote and it decides
/// which price column of the catalog applies.
///
/// Variants are declared in display order; `Ord` follows that order.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize, TS,
)]
#[ts(export)]
#[serde(rename_all = "kebab-case")]
pub enum Tier {
    PauseAndBuild,
    #[default]
    ShopifyBasic,
    ShopifyGrow,
    ShopifyAdvanced,
    ShopifyPlus,
}

impl Tier {
    /// Every tier, in display order.
    pub const ALL: [Tier; 5] = [
        Tier::PauseAndBuild,
        Tier::ShopifyBasic,
        Tier::ShopifyGrow,
        Tier::ShopifyAdvanced,
        Tier::ShopifyPlus,
    ];

    /// Human-readable plan name, as it appears in the offer message.
    pub const fn display_name(&self) -> &'static str {
        match self {
            Tier::PauseAndBuild => "Pause and Build",
            Tier::ShopifyBasic => "Shopify Basic",
            Tier::ShopifyGrow => "Shopify Grow",
            Tier::ShopifyAdvanced => "Shopify Advanced",
            Tier::ShopifyPlus => "Shopify Plus",
        }
    }

    /// Short machine name (`shopify-basic`), matching the serde form.
    pub const fn slug(&self) -> &'static str {
        match self {
            Tier::PauseAndBuild => "pause-and-build",
            Tier::ShopifyBasic => "shopify-basic",
            Tier::ShopifyGrow => "shopify-grow",
            Tier::ShopifyAdvanced => "shopify-advanced",
            Tier::ShopifyPlus => "shopify-plus",
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for Tier {
    type Err = CoreError;

    /// Accepts the display name ("Shopify Basic"), the slug ("shopify-basic")
    /// or the short plan name ("basic"), case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase().replace(['_', ' '], "-");
        Tier::ALL
            .iter()
            .copied()
            .find(|tier| {
                let slug = tier.slug();
                slug == wanted || slug.strip_prefix("shopify-") == Some(wanted.as_str())
            })
            .ok_or_else(|| CoreError::UnknownTier(s.to_string()))
    }
}

// =============================================================================
// Discount Percent
// =============================================================================

/// A percentage-off value that is always within `[0, 100]`.
///
/// ## Why a newtype?
/// The clamp invariant lives in the constructor, so no code path can build a
/// discount outside the range. NaN collapses to zero.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, TS)]
#[ts(export)]
pub struct DiscountPercent(f64);

impl<'de> Deserialize<'de> for DiscountPercent {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        f64::deserialize(deserializer).map(DiscountPercent::clamped)
    }
}

impl From<f64> for DiscountPercent {
    fn from(value: f64) -> Self {
        DiscountPercent::clamped(value)
    }
}

impl DiscountPercent {
    /// Smallest allowed value.
    pub const MIN: f64 = 0.0;

    /// Largest allowed value.
    pub const MAX: f64 = 100.0;

    /// Creates a discount, clamping into `[0, 100]`.
    pub fn clamped(value: f64) -> Self {
        if value.is_nan() {
            return DiscountPercent(Self::MIN);
        }
        DiscountPercent(value.clamp(Self::MIN, Self::MAX))
    }

    /// No discount.
    #[inline]
    pub const fn zero() -> Self {
        DiscountPercent(0.0)
    }

    /// Returns the raw percentage (10.0 = 10%).
    #[inline]
    pub const fn value(&self) -> f64 {
        self.0
    }
}

/// Renders the percentage rounded to one decimal, dropping a trailing `.0`:
/// `10%`, `12.5%`, `33.3%`.
impl fmt::Display for DiscountPercent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tenths = (self.0 * 10.0).round() as i64;
        if tenths % 10 == 0 {
            write!(f, "{}%", tenths / 10)
        } else {
            write!(f, "{}.{}%", tenths / 10, tenths % 10)
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
