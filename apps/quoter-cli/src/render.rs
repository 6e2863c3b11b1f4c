//! Plain-text tables for the terminal.
//!
//! ```text
//! Product                       Actual      Discounted  Savings
//! Color Swatch King: Variants   $14.90      $13.41      $1.49
//! Total                         $14.90      $13.41      $1.49
//! ```

use quoter_core::{Catalog, Money, PricingSummary, SummaryLine, Tier};

const PRODUCT_HEADER: &str = "Product";

/// Left-aligns every column to its widest cell.
fn layout(rows: &[Vec<String>]) -> String {
    let columns = rows.iter().map(Vec::len).max().unwrap_or(0);
    let widths: Vec<usize> = (0..columns)
        .map(|col| {
            rows.iter()
                .filter_map(|row| row.get(col))
                .map(|cell| cell.chars().count())
                .max()
                .unwrap_or(0)
        })
        .collect();

    let mut out = String::new();
    for row in rows {
        let last = row.len().saturating_sub(1);
        let line: Vec<String> = row
            .iter()
            .enumerate()
            .map(|(col, cell)| {
                if col == last {
                    cell.clone()
                } else {
                    let pad = widths[col] - cell.chars().count();
                    format!("{}{}", cell, " ".repeat(pad))
                }
            })
            .collect();
        out.push_str(&line.join("  "));
        out.push('\n');
    }
    out
}

fn summary_row(line: &SummaryLine) -> Vec<String> {
    vec![
        line.name.clone(),
        line.actual.to_string(),
        line.discounted.to_string(),
        line.savings.to_string(),
    ]
}

/// The pricing table with a totals line. USD only: converted amounts
/// appear in the message, never here.
pub fn pricing_table(summary: &PricingSummary) -> String {
    let mut rows = vec![vec![
        PRODUCT_HEADER.to_string(),
        "Actual".to_string(),
        "Discounted".to_string(),
        "Savings".to_string(),
    ]];
    rows.extend(summary.lines.iter().map(summary_row));
    rows.push(summary_row(&summary.totals));
    layout(&rows)
}

/// Every product with one column per tier, or a single tier's column.
pub fn catalog_table(catalog: &Catalog, tier: Option<Tier>) -> String {
    let tiers: Vec<Tier> = match tier {
        Some(tier) => vec![tier],
        None => Tier::ALL.to_vec(),
    };

    let mut header = vec!["Id".to_string(), PRODUCT_HEADER.to_string()];
    header.extend(tiers.iter().map(|t| t.display_name().to_string()));

    let mut rows = vec![header];
    for product in catalog.products() {
        let mut row = vec![product.id.clone(), product.name.clone()];
        row.extend(tiers.iter().map(|t| {
            product
                .prices
                .get(t)
                .map(Money::to_string)
                .unwrap_or_else(|| "-".to_string())
        }));
        rows.push(row);
    }
    layout(&rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use quoter_core::QuoteSession;

    fn sample_summary() -> PricingSummary {
        let mut session = QuoteSession::new();
        session.toggle_product("color_swatch_king_variants");
        session.set_global_discount("10");
        session.quote(&Catalog::builtin()).unwrap().summary
    }

    #[test]
    fn test_pricing_table() {
        let table = pricing_table(&sample_summary());
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("Product"));
        assert!(lines[1].starts_with("Color Swatch King: Variants  $14.90"));
        assert!(lines[2].starts_with("Total"));
        assert!(lines[2].ends_with("$1.49"));
    }

    #[test]
    fn test_pricing_table_is_usd_only() {
        let table = pricing_table(&sample_summary());
        assert!(!table.contains('('));
        assert!(!table.contains('€'));
        assert!(table
            .lines()
            .skip(1)
            .all(|line| line.matches('$').count() == 3));
    }

    #[test]
    fn test_catalog_table() {
        let table = catalog_table(&Catalog::builtin(), Some(Tier::ShopifyPlus));
        assert!(table.lines().next().unwrap().ends_with("Shopify Plus"));
        assert!(table.contains("variant_descriptions_king"));
        assert!(table.contains("$99.90"));
        assert_eq!(table.lines().count(), 5);
    }

    #[test]
    fn test_catalog_table_all_tiers() {
        let table = catalog_table(&Catalog::builtin(), None);
        let header = table.lines().next().unwrap();
        assert!(header.contains("Pause and Build"));
        assert!(header.ends_with("Shopify Plus"));
    }
}
