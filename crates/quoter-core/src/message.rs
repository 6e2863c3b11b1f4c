//! # Message Composer
//!
//! Builds the offer message a merchant receives. The output is a pure
//! function of its input: identical input always gives byte-identical text.
//!
//! ## Layout
//! ```text
//! Hi {name},_                                  ◄── "_" marks one trailing space
//! ____                                          ◄── a line of four spaces
//! I see that you are currently on the {tier} plan, and thus, ...
//! {product}: {usd} ({converted})              ◄── one line per row, actual
//!
//! {discount header}                            ◄── uniform vs per-product
//! {product}: {usd} ({converted}) — {pct} off   ◄── one line per row, discounted
//!
//! This means you will pay {total discounted} per month instead of
//! {total actual}, saving a total of {total savings}
//!
//! Please let me know ...
//! ```
//!
//! The parenthetical is present only when a currency is selected and its
//! rate is loaded.

use crate::convert::{convert, RateTable};
use crate::money::{format_amount, Money};
use crate::pricing::{PricingRow, Totals};
use crate::types::{DiscountPercent, Tier};
use crate::DEFAULT_GREETING_NAME;

/// Header used when each product carries its own discount.
pub const PER_PRODUCT_HEADER: &str =
    "Once I have applied the discounts, the prices will be revised to:";

/// How the discount header is worded.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DiscountMode {
    /// One global percentage applies to every row. The header shows the
    /// clamped value unrounded.
    Uniform(DiscountPercent),
    /// Rows may carry different percentages.
    PerProduct,
}

impl DiscountMode {
    pub fn header(&self) -> String {
        match self {
            DiscountMode::Uniform(pct) => format!(
                "Once I have applied the {}% discount, the prices will be revised to:",
                pct.value()
            ),
            DiscountMode::PerProduct => PER_PRODUCT_HEADER.to_string(),
        }
    }
}

/// The selected display currency and its rate table, if one has loaded.
#[derive(Debug, Clone, Copy)]
pub struct CurrencyView<'a> {
    pub code: &'a str,
    pub table: Option<&'a RateTable>,
}

impl CurrencyView<'_> {
    /// Converts and formats `amount`, or `None` when no rate is available.
    pub fn render(&self, amount: Money) -> Option<String> {
        convert(amount, self.code, self.table).map(|v| format_amount(v, self.code))
    }
}

/// Everything the message depends on.
#[derive(Debug, Clone, Copy)]
pub struct MessageInput<'a> {
    pub merchant_name: &'a str,
    pub tier: Tier,
    pub rows: &'a [PricingRow],
    pub totals: &'a Totals,
    pub mode: DiscountMode,
    pub currency: Option<CurrencyView<'a>>,
}

impl MessageInput<'_> {
    fn amount(&self, usd: Money) -> String {
        match self.currency.and_then(|view| view.render(usd)) {
            Some(converted) => format!("{} ({})", usd, converted),
            None => usd.to_string(),
        }
    }

    fn greeting_name(&self) -> &str {
        match self.merchant_name.trim() {
            "" => DEFAULT_GREETING_NAME,
            name => name,
        }
    }
}

/// Composes the offer message.
///
/// ## Example
/// ```rust
/// use quoter_core::{compose_message, DiscountMode, DiscountPercent, MessageInput, Tier, Totals};
///
/// let totals = Totals::default();
/// let text = compose_message(&MessageInput {
///     merchant_name: "  ",
///     tier: Tier::ShopifyBasic,
///     rows: &[],
///     totals: &totals,
///     mode: DiscountMode::Uniform(DiscountPercent::zero()),
///     currency: None,
/// });
/// assert!(text.starts_with("Hi there, \n"));
/// ```
pub fn compose_message(input: &MessageInput<'_>) -> String {
    let actual_lines: Vec<String> = input
        .rows
        .iter()
        .map(|row| format!("{}: {}", row.name, input.amount(row.actual)))
        .collect();

    let discounted_lines: Vec<String> = input
        .rows
        .iter()
        .map(|row| {
            format!(
                "{}: {} — {} off",
                row.name,
                input.amount(row.discounted),
                row.discount
            )
        })
        .collect();

    format!(
        "Hi {name}, \n    \n\
         I see that you are currently on the {tier} plan, and thus, the pricing for you will be as follows:\n\
         {actual}\n\
         \n\
         {header}\n\
         {discounted}\n\
         \n\
         This means you will pay {total_discounted} per month instead of {total_actual}, saving a total of {total_savings}\n\
         \n\
         Please let me know if you would like me to go ahead and apply this discount for you",
        name = input.greeting_name(),
        tier = input.tier,
        actual = actual_lines.join("\n"),
        header = input.mode.header(),
        discounted = discounted_lines.join("\n"),
        total_discounted = input.amount(input.totals.discounted),
        total_actual = input.amount(input.totals.actual),
        total_savings = input.amount(input.totals.savings),
    )
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pricing::compute_totals;

    fn jane_row() -> PricingRow {
        let actual = Money::from_cents(1490);
        let discount = DiscountPercent::clamped(10.0);
        PricingRow {
            product_id: "color_swatch_king_variants".to_string(),
            name: "Color Swatch King: Variants".to_string(),
            actual,
            discounted: actual.apply_discount(discount),
            discount,
        }
    }

    fn compose(name: &str, rows: &[PricingRow], currency: Option<CurrencyView<'_>>) -> String {
        let totals = compute_totals(rows);
        compose_message(&MessageInput {
            merchant_name: name,
            tier: Tier::ShopifyBasic,
            rows,
            totals: &totals,
            mode: DiscountMode::Uniform(DiscountPercent::clamped(10.0)),
            currency,
        })
    }

    #[test]
    fn test_jane_message_exact() {
        let text = compose("Jane", &[jane_row()], None);
        let expected = "Hi Jane, \n    \n\
            I see that you are currently on the Shopify Basic plan, and thus, the pricing for you will be as follows:\n\
            Color Swatch King: Variants: $14.90\n\
            \n\
            Once I have applied the 10% discount, the prices will be revised to:\n\
            Color Swatch King: Variants: $13.41 — 10% off\n\
            \n\
            This means you will pay $13.41 per month instead of $14.90, saving a total of $1.49\n\
            \n\
            Please let me know if you would like me to go ahead and apply this discount for you";
        assert_eq!(text, expected);
    }

    #[test]
    fn test_message_is_deterministic() {
        let rows = [jane_row()];
        let first = compose("Jane", &rows, None);
        for _ in 0..10 {
            assert_eq!(compose("Jane", &rows, None), first);
        }
        assert!(first.contains("13.41"));
        assert!(first.contains("1.49"));
    }

    #[test]
    fn test_blank_name_uses_greeting() {
        let text = compose("   ", &[jane_row()], None);
        assert!(text.starts_with("Hi there, \n    \n"));
    }

    #[test]
    fn test_name_is_trimmed() {
        let text = compose("  Jane  ", &[jane_row()], None);
        assert!(text.starts_with("Hi Jane, \n"));
    }

    #[test]
    fn test_converted_amounts_in_parentheses() {
        let table: RateTable = [("EUR", 2.0)].into_iter().collect();
        let view = CurrencyView {
            code: "EUR",
            table: Some(&table),
        };
        let text = compose("Jane", &[jane_row()], Some(view));
        assert!(text.contains("Color Swatch King: Variants: $14.90 (€29.80)\n"));
        assert!(text.contains("$13.41 (€26.82) — 10% off"));
        assert!(text.contains("saving a total of $1.49 (€2.98)"));
    }

    #[test]
    fn test_missing_rate_omits_parentheses() {
        let table: RateTable = [("GBP", 0.8)].into_iter().collect();
        let view = CurrencyView {
            code: "AED",
            table: Some(&table),
        };
        let with_view = compose("Jane", &[jane_row()], Some(view));
        assert_eq!(with_view, compose("Jane", &[jane_row()], None));

        let not_loaded = CurrencyView {
            code: "AED",
            table: None,
        };
        assert!(!compose("Jane", &[jane_row()], Some(not_loaded)).contains('('));
    }

    #[test]
    fn test_zero_converted_amount_is_shown() {
        let table: RateTable = [("AED", 3.6725)].into_iter().collect();
        let view = CurrencyView {
            code: "AED",
            table: Some(&table),
        };
        let row = PricingRow {
            product_id: "free".to_string(),
            name: "Free".to_string(),
            actual: Money::zero(),
            discounted: Money::zero(),
            discount: DiscountPercent::zero(),
        };
        let text = compose("Jane", &[row], Some(view));
        assert!(text.contains("Free: $0.00 (AED 0.00)"));
    }

    #[test]
    fn test_per_product_header_and_percentages() {
        let mut second = jane_row();
        second.discount = DiscountPercent::clamped(12.5);
        second.discounted = second.actual.apply_discount(second.discount);
        let rows = [jane_row(), second];
        let totals = compute_totals(&rows);

        let text = compose_message(&MessageInput {
            merchant_name: "Jane",
            tier: Tier::ShopifyBasic,
            rows: &rows,
            totals: &totals,
            mode: DiscountMode::PerProduct,
            currency: None,
        });
        assert!(text.contains(PER_PRODUCT_HEADER));
        assert!(text.contains("— 10% off"));
        assert!(text.contains("— 12.5% off"));
    }

    #[test]
    fn test_uniform_header_uses_unrounded_percent() {
        let mode = DiscountMode::Uniform(DiscountPercent::clamped(12.345));
        assert_eq!(
            mode.header(),
            "Once I have applied the 12.345% discount, the prices will be revised to:"
        );
        let whole = DiscountMode::Uniform(DiscountPercent::clamped(10.0));
        assert_eq!(
            whole.header(),
            "Once I have applied the 10% discount, the prices will be revised to:"
        );
        let clamped = DiscountMode::Uniform(DiscountPercent::clamped(250.0));
        assert!(clamped.header().contains("the 100% discount"));
    }

    #[test]
    fn test_rows_keep_rounded_percent_under_unrounded_header() {
        let mut row = jane_row();
        row.discount = DiscountPercent::clamped(12.345);
        row.discounted = row.actual.apply_discount(row.discount);
        let rows = [row];
        let totals = compute_totals(&rows);
        let text = compose_message(&MessageInput {
            merchant_name: "Jane",
            tier: Tier::ShopifyBasic,
            rows: &rows,
            totals: &totals,
            mode: DiscountMode::Uniform(DiscountPercent::clamped(12.345)),
            currency: None,
        });
        assert!(text.contains("the 12.345% discount"));
        assert!(text.contains("— 12.3% off"));
    }
}
