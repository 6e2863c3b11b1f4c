//! # Quoting Session
//!
//! Holds the user-editable state of one quote and derives everything else
//! from it on demand.
//!
//! ## Session Operations Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Session Operations                                   │
//! │                                                                         │
//! │  User Action               Method                   State Change        │
//! │  ───────────               ──────                   ────────────        │
//! │                                                                         │
//! │  Tick/untick product ────► toggle_product() ──────► append / remove     │
//! │  Pick plan ──────────────► set_tier() ────────────► tier = t            │
//! │  Type discount ──────────► set_global_discount() ─► discount.global     │
//! │  Type override ──────────► set_product_discount() ► per_product[id]     │
//! │  Pick currency ──────────► set_target_currency() ─► target_currency     │
//! │                                                                         │
//! │  Read quote ─────────────► quote() ───────────────► (derived, no cache) │
//! │  Read message ───────────► message() ─────────────► (derived, no cache) │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};

use crate::catalog::Catalog;
use crate::convert::RateTable;
use crate::discount::DiscountInput;
use crate::error::CoreResult;
use crate::message::{compose_message, CurrencyView, DiscountMode, MessageInput};
use crate::pricing::{compute_rows, compute_totals, PricingRow, PricingSummary, Totals};
use crate::types::Tier;
use crate::validation::{validate_currency_code, ValidationResult};

// =============================================================================
// Selection
// =============================================================================

/// Ordered, duplicate-free list of selected product ids.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Selection(Vec<String>);

impl Selection {
    pub fn new() -> Self {
        Selection(Vec::new())
    }

    /// Removes `id` if selected, appends it otherwise.
    ///
    /// Returns whether `id` is selected afterwards.
    pub fn toggle(&mut self, id: &str) -> bool {
        if self.deselect(id) {
            false
        } else {
            self.0.push(id.to_string());
            true
        }
    }

    /// Appends `id` unless already selected.
    pub fn select(&mut self, id: &str) {
        if !self.contains(id) {
            self.0.push(id.to_string());
        }
    }

    /// Removes `id`. Returns whether it was selected.
    pub fn deselect(&mut self, id: &str) -> bool {
        match self.0.iter().position(|s| s == id) {
            Some(index) => {
                self.0.remove(index);
                true
            }
            None => false,
        }
    }

    pub fn contains(&self, id: &str) -> bool {
        self.0.iter().any(|s| s == id)
    }

    /// Selected ids in selection order.
    pub fn ids(&self) -> &[String] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<S: AsRef<str>> FromIterator<S> for Selection {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut selection = Selection::new();
        for id in iter {
            selection.select(id.as_ref());
        }
        selection
    }
}

// =============================================================================
// Quote
// =============================================================================

/// Derived pricing for the current session state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quote {
    pub rows: Vec<PricingRow>,
    pub totals: Totals,
    pub summary: PricingSummary,
}

// =============================================================================
// Quote Session
// =============================================================================

/// The editable state of one quote.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QuoteSession {
    pub merchant_name: String,
    pub tier: Tier,
    pub selection: Selection,
    pub discount: DiscountInput,
    pub target_currency: Option<String>,
}

impl QuoteSession {
    /// A fresh session: default tier, nothing selected, 0% discount.
    pub fn new() -> Self {
        QuoteSession {
            discount: DiscountInput::uniform("0"),
            ..Default::default()
        }
    }

    pub fn set_merchant_name(&mut self, name: impl Into<String>) {
        self.merchant_name = name.into();
    }

    pub fn set_tier(&mut self, tier: Tier) {
        self.tier = tier;
    }

    /// Toggles a product in or out of the selection.
    pub fn toggle_product(&mut self, id: &str) -> bool {
        self.selection.toggle(id)
    }

    pub fn set_global_discount(&mut self, text: impl Into<String>) {
        self.discount.global = text.into();
    }

    pub fn set_per_product_mode(&mut self, enabled: bool) {
        self.discount.use_per_product = enabled;
    }

    /// Stores an override as typed. Blank or invalid text falls back to the
    /// global value when resolved.
    pub fn set_product_discount(&mut self, id: &str, text: impl Into<String>) {
        self.discount.per_product.insert(id.to_string(), text.into());
    }

    /// Sets the display currency. Blank text clears it.
    ///
    /// ## Errors
    /// `InvalidFormat` if the code is not three letters.
    pub fn set_target_currency(&mut self, code: Option<&str>) -> ValidationResult<()> {
        self.target_currency = match code.map(str::trim) {
            None | Some("") => None,
            Some(code) => Some(validate_currency_code(code)?),
        };
        Ok(())
    }

    /// Header wording for the current discount input.
    pub fn discount_mode(&self) -> DiscountMode {
        let resolver = self.discount.resolver();
        if resolver.is_per_product() {
            DiscountMode::PerProduct
        } else {
            DiscountMode::Uniform(resolver.global())
        }
    }

    /// Recomputes rows, totals and the summary table.
    ///
    /// ## Errors
    /// `UnknownProduct` or `MissingTierPrice` from the catalog.
    pub fn quote(&self, catalog: &Catalog) -> CoreResult<Quote> {
        let products = catalog.resolve_selection(&self.selection)?;
        let rows = compute_rows(&products, self.tier, &self.discount.resolver())?;
        let totals = compute_totals(&rows);
        let summary = PricingSummary::new(&rows, &totals);
        Ok(Quote {
            rows,
            totals,
            summary,
        })
    }

    /// Composes the offer message, converting into the target currency when
    /// `rates` holds a rate for it.
    pub fn message(&self, catalog: &Catalog, rates: Option<&RateTable>) -> CoreResult<String> {
        let quote = self.quote(catalog)?;
        let currency = self.target_currency.as_deref().map(|code| CurrencyView {
            code,
            table: rates,
        });
        Ok(compose_message(&MessageInput {
            merchant_name: &self.merchant_name,
            tier: self.tier,
            rows: &quote.rows,
            totals: &quote.totals,
            mode: self.discount_mode(),
            currency,
        }))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::DiscountPercent;

    #[test]
    fn test_selection_toggle() {
        let mut selection = Selection::new();
        assert!(selection.toggle("a"));
        assert!(selection.toggle("b"));
        assert!(!selection.toggle("a"));
        assert_eq!(selection.ids(), ["b"]);

        assert!(selection.toggle("a"));
        assert_eq!(selection.ids(), ["b", "a"]);
    }

    #[test]
    fn test_selection_has_no_duplicates() {
        let selection: Selection = ["a", "b", "a"].into_iter().collect();
        assert_eq!(selection.ids(), ["a", "b"]);
    }

    #[test]
    fn test_new_session_defaults() {
        let session = QuoteSession::new();
        assert_eq!(session.tier, Tier::ShopifyBasic);
        assert!(session.selection.is_empty());
        assert_eq!(
            session.discount_mode(),
            DiscountMode::Uniform(DiscountPercent::zero())
        );
    }

    #[test]
    fn test_quote_recomputes_on_every_change() {
        let catalog = Catalog::builtin();
        let mut session = QuoteSession::new();
        session.toggle_product("color_swatch_king_variants");
        session.set_global_discount("10");

        let quote = session.quote(&catalog).unwrap();
        assert_eq!(quote.totals.discounted.cents(), 1341);

        session.set_tier(Tier::ShopifyPlus);
        let quote = session.quote(&catalog).unwrap();
        assert_eq!(quote.totals.actual.cents(), 9990);
        assert_eq!(quote.totals.discounted.cents(), 8991);

        session.toggle_product("color_swatch_king_variants");
        let quote = session.quote(&catalog).unwrap();
        assert!(quote.rows.is_empty());
        assert_eq!(quote.totals, Totals::default());
    }

    #[test]
    fn test_per_product_mode() {
        let catalog = Catalog::builtin();
        let mut session = QuoteSession::new();
        session.toggle_product("variant_descriptions_king");
        session.toggle_product("sa_variant_image_automator");
        session.set_global_discount("10");
        session.set_product_discount("sa_variant_image_automator", "20");

        // Mode off: overrides ignored
        let quote = session.quote(&catalog).unwrap();
        assert_eq!(quote.rows[1].discount.value(), 10.0);

        session.set_per_product_mode(true);
        let quote = session.quote(&catalog).unwrap();
        assert_eq!(quote.rows[0].discount.value(), 10.0);
        assert_eq!(quote.rows[1].discount.value(), 20.0);
        assert_eq!(session.discount_mode(), DiscountMode::PerProduct);
    }

    #[test]
    fn test_target_currency() {
        let mut session = QuoteSession::new();
        session.set_target_currency(Some("aed")).unwrap();
        assert_eq!(session.target_currency.as_deref(), Some("AED"));

        session.set_target_currency(Some("  ")).unwrap();
        assert_eq!(session.target_currency, None);

        assert!(session.set_target_currency(Some("dirham")).is_err());
    }

    #[test]
    fn test_message_with_and_without_rates() {
        let catalog = Catalog::builtin();
        let mut session = QuoteSession::new();
        session.set_merchant_name("Jane");
        session.toggle_product("color_swatch_king_variants");
        session.set_global_discount("10");
        session.set_target_currency(Some("GBP")).unwrap();

        let without = session.message(&catalog, None).unwrap();
        assert!(without.contains("$13.41 per month"));
        assert!(!without.contains('£'));

        let rates: RateTable = [("GBP", 2.0)].into_iter().collect();
        let with = session.message(&catalog, Some(&rates)).unwrap();
        assert!(with.contains("$13.41 (£26.82) per month"));
    }

    #[test]
    fn test_unknown_product_in_selection() {
        let catalog = Catalog::builtin();
        let mut session = QuoteSession::new();
        session.toggle_product("nope");
        assert!(session.quote(&catalog).is_err());
    }
}
