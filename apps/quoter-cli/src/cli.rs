//! Command-line arguments.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use quoter_core::Tier;

#[derive(Debug, Parser)]
#[command(name = "quoter", version, about = "Quote add-on pricing and compose offer messages")]
pub struct Cli {
    /// FX configuration file (defaults to the platform config dir)
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Price a selection and print the offer message
    Quote(QuoteArgs),

    /// List products and their prices
    Catalog(CatalogArgs),

    /// Print the selectable display currencies
    Currencies,

    /// Print the effective FX configuration
    Config(ConfigArgs),
}

#[derive(Debug, Args)]
pub struct QuoteArgs {
    /// Merchant's plan tier (e.g. "basic", "shopify-plus")
    #[arg(long, default_value = "shopify-basic", value_parser = parse_tier)]
    pub tier: Tier,

    /// Product id to include; repeat in the order rows should appear
    #[arg(long = "app", value_name = "ID")]
    pub apps: Vec<String>,

    /// Global discount percentage, free-form text
    #[arg(long, default_value = "0", allow_hyphen_values = true)]
    pub discount: String,

    /// Per-product discount as id=pct; any occurrence switches to per-product mode
    #[arg(long = "per-app", value_name = "ID=PCT", value_parser = parse_override)]
    pub per_app: Vec<(String, String)>,

    /// Merchant name used in the greeting
    #[arg(long, default_value = "")]
    pub name: String,

    /// Display currency for converted amounts (3-letter code)
    #[arg(long, value_name = "CODE")]
    pub currency: Option<String>,

    /// Catalog file (.json or .toml) replacing the built-in products
    #[arg(long, value_name = "FILE")]
    pub catalog: Option<PathBuf>,

    /// Print only the message
    #[arg(long, conflicts_with = "json")]
    pub message_only: bool,

    /// Print the quote, rate state and message as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Args)]
pub struct CatalogArgs {
    /// Show a single tier's prices
    #[arg(long, value_parser = parse_tier)]
    pub tier: Option<Tier>,

    /// Catalog file (.json or .toml) replacing the built-in products
    #[arg(long, value_name = "FILE")]
    pub catalog: Option<PathBuf>,
}

#[derive(Debug, Args)]
pub struct ConfigArgs {
    /// Write the default configuration to the config path
    #[arg(long)]
    pub init: bool,
}

fn parse_tier(s: &str) -> Result<Tier, String> {
    s.parse::<Tier>().map_err(|e| e.to_string())
}

/// Splits `id=pct`. The percentage stays free-form text; only the id is
/// required.
pub fn parse_override(s: &str) -> Result<(String, String), String> {
    let (id, pct) = s
        .split_once('=')
        .ok_or_else(|| format!("expected ID=PCT, got '{s}'"))?;
    let id = id.trim();
    if id.is_empty() {
        return Err(format!("missing product id in '{s}'"));
    }
    Ok((id.to_string(), pct.to_string()))
}
