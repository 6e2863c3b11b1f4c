//! # Catalog Module
//!
//! The fixed table of add-on products and their monthly price per plan tier.
//!
//! ## Shape
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Catalog (ordered, read-only for the process lifetime)                  │
//! │                                                                         │
//! │  Product                                                                │
//! │  ├── id      "color_swatch_king_variants"   (stable, used in flags)    │
//! │  ├── name    "Color Swatch King: Variants"  (used in table + message)  │
//! │  └── prices  Tier ──► Money                 (one entry per tier)       │
//! │                                                                         │
//! │  Integrity: unique ids, non-empty names, non-negative prices,          │
//! │             every tier priced. Checked by Catalog::validate().         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! A catalog file (JSON here, TOML in the CLI) uses tier slugs as price keys
//! and integer cents as values:
//! ```json
//! { "products": [ { "id": "app", "name": "App",
//!   "prices": { "pause-and-build": 500, "shopify-basic": 990,
//!               "shopify-grow": 990, "shopify-advanced": 990,
//!               "shopify-plus": 990 } } ] }
//! ```

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::money::Money;
use crate::session::Selection;
use crate::types::Tier;
use crate::validation::{validate_price_cents, validate_product_id, validate_product_name};

// =============================================================================
// Product
// =============================================================================

/// One add-on product with a price for each plan tier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    /// Stable identifier, e.g. `variant_descriptions_king`.
    pub id: String,

    /// Display name used in the pricing table and the message.
    pub name: String,

    /// Monthly USD price per tier.
    pub prices: BTreeMap<Tier, Money>,
}

impl Product {
    /// Builds a product from its five tier prices, given in tier order.
    fn priced(id: &str, name: &str, cents: [i64; 5]) -> Self {
        Product {
            id: id.to_string(),
            name: name.to_string(),
            prices: Tier::ALL
                .iter()
                .copied()
                .zip(cents.iter().map(|c| Money::from_cents(*c)))
                .collect(),
        }
    }

    /// Returns the monthly price at `tier`.
    ///
    /// ## Errors
    /// `MissingTierPrice` if the catalog entry does not price that tier.
    pub fn price_for(&self, tier: Tier) -> CoreResult<Money> {
        self.prices
            .get(&tier)
            .copied()
            .ok_or_else(|| CoreError::MissingTierPrice {
                product_id: self.id.clone(),
                tier,
            })
    }
}

// =============================================================================
// Catalog
// =============================================================================

/// The ordered product table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Catalog {
    products: Vec<Product>,
}

impl Catalog {
    /// The catalog shipped with the application.
    pub fn builtin() -> Self {
        Catalog {
            products: vec![
                Product::priced(
                    "color_swatch_king_variants",
                    "Color Swatch King: Variants",
                    [500, 1490, 2990, 4990, 9990],
                ),
                Product::priced(
                    "sa_variants_combined_listings",
                    "SA Variants: Combined Listings",
                    [500, 1490, 2990, 4990, 9990],
                ),
                Product::priced(
                    "sa_variant_image_automator",
                    "SA Variant Image Automator",
                    [500, 990, 2490, 2490, 4990],
                ),
                Product::priced(
                    "variant_descriptions_king",
                    "Variant Descriptions King",
                    [500, 990, 990, 990, 990],
                ),
            ],
        }
    }

    /// Parses and validates a JSON catalog document.
    pub fn from_json_str(json: &str) -> CoreResult<Self> {
        let catalog: Catalog =
            serde_json::from_str(json).map_err(|e| CoreError::InvalidCatalog(e.to_string()))?;
        catalog.validate()?;
        Ok(catalog)
    }

    /// All products in catalog order.
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    /// Looks a product up by id.
    pub fn get(&self, id: &str) -> Option<&Product> {
        self.products.iter().find(|p| p.id == id)
    }

    /// Maps a selection to its products, preserving selection order.
    ///
    /// ## Errors
    /// `UnknownProduct` for the first id not in the catalog.
    pub fn resolve_selection<'a>(&'a self, selection: &Selection) -> CoreResult<Vec<&'a Product>> {
        selection
            .ids()
            .iter()
            .map(|id| {
                self.get(id)
                    .ok_or_else(|| CoreError::UnknownProduct(id.clone()))
            })
            .collect()
    }

    /// Checks catalog integrity.
    ///
    /// ## Rules
    /// - Ids are valid and unique
    /// - Names are non-empty
    /// - Every tier has a non-negative price
    pub fn validate(&self) -> CoreResult<()> {
        let mut seen = HashSet::new();

        for product in &self.products {
            validate_product_id(&product.id)?;
            validate_product_name(&product.name)?;

            if !seen.insert(product.id.as_str()) {
                return Err(CoreError::DuplicateProduct(product.id.clone()));
            }

            for tier in Tier::ALL {
                let price = product.price_for(tier)?;
                validate_price_cents(price.cents()).map_err(|_| {
                    ValidationError::OutOfRange {
                        field: format!("{} price at {}", product.id, tier),
                        min: 0,
                        max: i64::MAX,
                    }
                })?;
            }
        }

        Ok(())
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Catalog::builtin()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
