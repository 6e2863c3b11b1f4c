//! Subcommand handlers.
//!
//! ```text
//! QuoteArgs ──► QuoteSession ──► quote() ──► pricing table
//!                    │                              │
//!                    │  --currency                  ▼
//!                    └──► RateLoader.load() ──► advisory note
//!                                │                  │
//!                                ▼                  ▼
//!                           RateTable ──────► message()
//! ```

use anyhow::{bail, Context, Result};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::cli::{CatalogArgs, ConfigArgs, QuoteArgs};
use crate::render;
use quoter_core::{Catalog, Quote, QuoteSession, Tier};
use quoter_fx::{
    available_currency_codes, FetchState, FxConfig, HttpSymbolSource, RateLoader, RateResolver,
    RateState,
};

// =============================================================================
// Catalog Loading
// =============================================================================

/// Reads a catalog from `.json` or `.toml`, or returns the built-in one.
pub fn load_catalog(path: Option<&Path>) -> Result<Catalog> {
    let Some(path) = path else {
        return Ok(Catalog::builtin());
    };

    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("reading catalog {}", path.display()))?;
    let catalog = parse_catalog(&contents, path)?;
    catalog
        .validate()
        .with_context(|| format!("invalid catalog {}", path.display()))?;

    info!(path = %path.display(), products = catalog.products().len(), "Loaded catalog");
    Ok(catalog)
}

fn parse_catalog(contents: &str, path: &Path) -> Result<Catalog> {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some("json") => Ok(Catalog::from_json_str(contents)?),
        Some("toml") => toml::from_str(contents)
            .with_context(|| format!("parsing catalog {}", path.display())),
        _ => bail!(
            "catalog {} must have a .json or .toml extension",
            path.display()
        ),
    }
}

// =============================================================================
// quote
// =============================================================================

/// Builds the session from flags. Repeated `--app` ids are kept once.
pub fn build_session(args: &QuoteArgs) -> Result<QuoteSession> {
    let mut session = QuoteSession::new();
    session.set_merchant_name(args.name.as_str());
    session.set_tier(args.tier);
    for id in &args.apps {
        session.selection.select(id);
    }
    session.set_global_discount(args.discount.as_str());

    if !args.per_app.is_empty() {
        session.set_per_product_mode(true);
        for (id, pct) in &args.per_app {
            session.set_product_discount(id, pct.as_str());
        }
    }

    session.set_target_currency(args.currency.as_deref())?;
    Ok(session)
}

#[derive(Debug, Serialize)]
struct QuoteReport<'a> {
    tier: Tier,
    quote: &'a Quote,
    rates: &'a RateState,
    advisory_note: Option<&'static str>,
    message: &'a str,
}

/// Loads rates for the display currency.
///
/// An unusable FX configuration ends in the Error state like a failed
/// fetch, so the USD quote is still printed.
pub async fn display_rates(config_path: Option<PathBuf>, code: &str) -> RateState {
    let resolver =
        FxConfig::load(config_path).and_then(|config| RateResolver::from_config(&config));
    match resolver {
        Ok(resolver) => {
            let loader = RateLoader::new(resolver);
            loader.load(code).await;
            loader.state().await
        }
        Err(e) => {
            warn!(currency = code, error = %e, "FX configuration unusable, showing USD only");
            RateState {
                currency: Some(code.to_string()),
                fetch_state: FetchState::Error,
                rates: None,
                last_error: Some(e.to_string()),
            }
        }
    }
}

/// Renders the quote for stdout.
fn quote_output(
    args: &QuoteArgs,
    session: &QuoteSession,
    catalog: &Catalog,
    rates: &RateState,
) -> Result<String> {
    let quote = session.quote(catalog)?;
    let message = session.message(catalog, rates.table())?;
    let note = rates.fetch_state.advisory_note();

    if args.json {
        let report = QuoteReport {
            tier: session.tier,
            quote: &quote,
            rates,
            advisory_note: note,
            message: &message,
        };
        return Ok(format!("{}\n", serde_json::to_string_pretty(&report)?));
    }

    let mut out = String::new();
    if !args.message_only {
        out.push_str(&render::pricing_table(&quote.summary));
        if let Some(note) = note {
            out.push_str(&format!("\n{note}\n"));
        }
        out.push('\n');
    }
    out.push_str(&message);
    out.push('\n');
    Ok(out)
}

pub async fn quote(config_path: Option<PathBuf>, args: QuoteArgs) -> Result<()> {
    let catalog = load_catalog(args.catalog.as_deref())?;
    let session = build_session(&args)?;
    if session.selection.is_empty() {
        warn!("No --app given, the quote has no rows");
    }

    let rates = match session.target_currency.as_deref() {
        Some(code) => display_rates(config_path, code).await,
        None => RateState::default(),
    };
    debug!(fetch_state = %rates.fetch_state, "Rate state settled");

    print!("{}", quote_output(&args, &session, &catalog, &rates)?);
    Ok(())
}

// =============================================================================
// catalog / currencies / config
// =============================================================================

pub fn catalog(args: CatalogArgs) -> Result<()> {
    let catalog = load_catalog(args.catalog.as_deref())?;
    print!("{}", render::catalog_table(&catalog, args.tier));
    Ok(())
}

pub async fn currencies(config_path: Option<PathBuf>) -> Result<()> {
    let config = FxConfig::load(config_path).context("loading FX config")?;
    let source = HttpSymbolSource::from_config(&config)?;
    for code in available_currency_codes(&source, &config.symbols).await {
        println!("{code}");
    }
    Ok(())
}

pub fn config(config_path: Option<PathBuf>, args: ConfigArgs) -> Result<()> {
    if args.init {
        let path = FxConfig::default().save(config_path)?;
        println!("Wrote default FX config to {}", path.display());
        return Ok(());
    }

    let config = FxConfig::load(config_path).context("loading FX config")?;
    print!("{}", toml::to_string_pretty(&config)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{Cli, Command};
    use clap::Parser;
    use chrono::Utc;
    use quoter_core::{DiscountMode, RateTable};
    use quoter_fx::ResolvedRates;

    fn quote_args(argv: &[&str]) -> QuoteArgs {
        let mut full = vec!["quoter", "quote"];
        full.extend_from_slice(argv);
        match Cli::try_parse_from(full).unwrap().command {
            Command::Quote(args) => args,
            other => panic!("expected quote, got {other:?}"),
        }
    }

    #[test]
    fn test_build_session_uniform() {
        let args = quote_args(&[
            "--app",
            "variant_descriptions_king",
            "--app",
            "variant_descriptions_king",
            "--discount",
            "10",
            "--name",
            "Jane",
        ]);
        let session = build_session(&args).unwrap();
        assert_eq!(session.selection.ids(), ["variant_descriptions_king"]);
        assert_eq!(session.merchant_name, "Jane");
        assert!(matches!(session.discount_mode(), DiscountMode::Uniform(_)));
        assert_eq!(session.target_currency, None);
    }

    #[test]
    fn test_build_session_per_product() {
        let args = quote_args(&[
            "--app",
            "color_swatch_king_variants",
            "--app",
            "sa_variant_image_automator",
            "--discount",
            "10",
            "--per-app",
            "sa_variant_image_automator=50",
        ]);
        let session = build_session(&args).unwrap();
        assert_eq!(session.discount_mode(), DiscountMode::PerProduct);

        let quote = session.quote(&Catalog::builtin()).unwrap();
        assert_eq!(quote.rows[0].discounted.cents(), 1341);
        assert_eq!(quote.rows[1].discounted.cents(), 495);
    }

    #[test]
    fn test_build_session_rejects_bad_currency() {
        let args = quote_args(&["--currency", "dirham"]);
        assert!(build_session(&args).is_err());
    }

    #[test]
    fn test_blank_currency_means_none() {
        let args = quote_args(&["--currency", " "]);
        assert_eq!(build_session(&args).unwrap().target_currency, None);
    }

    #[test]
    fn test_parse_catalog_formats() {
        let toml_text = r#"
            [[products]]
            id = "solo"
            name = "Solo App"
            [products.prices]
            pause-and-build = 100
            shopify-basic = 200
            shopify-grow = 300
            shopify-advanced = 400
            shopify-plus = 500
        "#;
        let catalog = parse_catalog(toml_text, Path::new("c.toml")).unwrap();
        assert_eq!(catalog.products().len(), 1);
        assert!(catalog.validate().is_ok());

        let json_text = serde_json::to_string(&Catalog::builtin()).unwrap();
        let catalog = parse_catalog(&json_text, Path::new("c.json")).unwrap();
        assert_eq!(catalog, Catalog::builtin());

        assert!(parse_catalog(toml_text, Path::new("c.yaml")).is_err());
    }

    #[test]
    fn test_load_builtin_catalog_without_path() {
        assert_eq!(load_catalog(None).unwrap(), Catalog::builtin());
    }

    fn temp_dir(tag: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("quoter-cli-{tag}-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[tokio::test]
    async fn test_bad_fx_config_keeps_usd_quote() {
        let dir = temp_dir("bad-fx");
        let path = dir.join("fx.toml");
        std::fs::write(&path, "[symbols]\nurl = \"not a url\"\n").unwrap();

        let rates = display_rates(Some(path), "AED").await;
        assert_eq!(rates.fetch_state, FetchState::Error);
        assert_eq!(rates.currency.as_deref(), Some("AED"));
        assert!(rates.table().is_none());
        assert!(rates.last_error.is_some());

        let args = quote_args(&[
            "--app",
            "color_swatch_king_variants",
            "--discount",
            "10",
            "--currency",
            "AED",
        ]);
        let session = build_session(&args).unwrap();
        let out = quote_output(&args, &session, &Catalog::builtin(), &rates).unwrap();
        assert!(out.contains("This means you will pay $13.41 per month instead of $14.90"));
        assert!(out.contains("Could not fetch exchange rates."));
        assert!(!out.contains("AED "));

        std::fs::remove_dir_all(dir).ok();
    }

    #[test]
    fn test_converted_amounts_only_in_message() {
        let args = quote_args(&["--app", "color_swatch_king_variants", "--currency", "EUR"]);
        let session = build_session(&args).unwrap();
        let table: RateTable = [("EUR", 2.0)].into_iter().collect();
        let rates = RateState {
            currency: Some("EUR".to_string()),
            fetch_state: FetchState::Ready,
            rates: Some(ResolvedRates {
                provider: "test".to_string(),
                table,
                fetched_at: Utc::now(),
            }),
            last_error: None,
        };

        let out = quote_output(&args, &session, &Catalog::builtin(), &rates).unwrap();
        let (table_part, message_part) = out.split_once("Hi there,").unwrap();
        assert!(!table_part.contains('€'));
        assert!(table_part.contains("$14.90"));
        assert!(message_part.contains("$14.90 (€29.80)"));
    }
}
