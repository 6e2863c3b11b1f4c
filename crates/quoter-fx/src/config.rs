//! # FX Configuration
//!
//! Configuration for the exchange-rate provider chain and the currency list.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     QUOTER_FX_TIMEOUT_SECS=10                                          │
//! │     QUOTER_FX_DISABLED_PROVIDERS=frankfurter,exchangerate_host         │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     ~/.config/quoter/fx.toml (Linux)                                   │
//! │     ~/Library/Application Support/com.quoter.quoter/fx.toml (macOS)    │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! │     Four public providers, tried in order                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! # fx.toml
//! [http]
//! timeout_secs = 10      # omit to rely on the transport default
//! user_agent = "quoter/0.1"
//!
//! [[providers]]
//! name = "frankfurter"
//! url = "https://api.frankfurter.app/latest?from=USD"
//! shape = "rates"        # rates | result_success | nested_by_base
//! enabled = true
//!
//! [symbols]
//! url = "https://api.exchangerate.host/symbols"
//! common = ["AED", "EUR", "GBP", "INR", "AUD", "CAD", "JPY", "ZAR"]
//! fallback = ["AED", "EUR", "GBP", "INR", "AUD", "CAD", "JPY"]
//! ```

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::PathBuf;
use tracing::{debug, info, warn};
use url::Url;

use crate::error::{FxError, FxResult};
use crate::provider::ResponseShape;
use quoter_core::validation::is_currency_code;

// =============================================================================
// HTTP Settings
// =============================================================================

/// Settings shared by every outbound request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HttpSettings {
    /// Per-request timeout. `None` leaves timing to the transport.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,

    /// User-Agent header sent to providers.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

fn default_user_agent() -> String {
    format!("quoter/{}", env!("CARGO_PKG_VERSION"))
}

impl Default for HttpSettings {
    fn default() -> Self {
        HttpSettings {
            timeout_secs: None,
            user_agent: default_user_agent(),
        }
    }
}

// =============================================================================
// Provider Settings
// =============================================================================

/// One entry of the ordered provider chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderSettings {
    /// Short name used in logs and in `QUOTER_FX_DISABLED_PROVIDERS`.
    pub name: String,

    /// Full GET URL returning USD-based rates.
    pub url: String,

    /// Envelope the response uses.
    pub shape: ResponseShape,

    /// Disabled providers are skipped without a request.
    #[serde(default = "default_true")]
    pub enabled: bool,
}

fn default_true() -> bool {
    true
}

impl ProviderSettings {
    pub fn new(name: &str, url: &str, shape: ResponseShape) -> Self {
        ProviderSettings {
            name: name.to_string(),
            url: url.to_string(),
            shape,
            enabled: true,
        }
    }
}

/// The public providers, in the order they are tried.
pub fn default_providers() -> Vec<ProviderSettings> {
    vec![
        ProviderSettings::new(
            "frankfurter",
            "https://api.frankfurter.app/latest?from=USD",
            ResponseShape::Rates,
        ),
        ProviderSettings::new(
            "exchangerate_host",
            "https://api.exchangerate.host/latest?base=USD",
            ResponseShape::Rates,
        ),
        ProviderSettings::new(
            "open_er_api",
            "https://open.er-api.com/v6/latest/USD",
            ResponseShape::ResultSuccess,
        ),
        ProviderSettings::new(
            "jsdelivr_currency_api",
            "https://cdn.jsdelivr.net/npm/@fawazahmed0/currency-api@latest/v1/currencies/usd.json",
            ResponseShape::NestedByBase,
        ),
    ]
}

// =============================================================================
// Symbols Settings
// =============================================================================

/// Where the selectable currency list comes from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SymbolSettings {
    /// Endpoint returning `{ "symbols": { "CODE": {...} } }`.
    #[serde(default = "default_symbols_url")]
    pub url: String,

    /// Codes listed first, in this order.
    #[serde(default = "default_common_codes")]
    pub common: Vec<String>,

    /// List used when the endpoint fails.
    #[serde(default = "default_fallback_codes")]
    pub fallback: Vec<String>,
}

fn default_symbols_url() -> String {
    "https://api.exchangerate.host/symbols".to_string()
}

fn default_common_codes() -> Vec<String> {
    ["AED", "EUR", "GBP", "INR", "AUD", "CAD", "JPY", "ZAR"]
        .iter()
        .map(|c| c.to_string())
        .collect()
}

fn default_fallback_codes() -> Vec<String> {
    ["AED", "EUR", "GBP", "INR", "AUD", "CAD", "JPY"]
        .iter()
        .map(|c| c.to_string())
        .collect()
}

impl Default for SymbolSettings {
    fn default() -> Self {
        SymbolSettings {
            url: default_symbols_url(),
            common: default_common_codes(),
            fallback: default_fallback_codes(),
        }
    }
}

// =============================================================================
// Main FX Configuration
// =============================================================================

/// Complete FX configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FxConfig {
    #[serde(default)]
    pub http: HttpSettings,

    /// Ordered provider chain. A file that lists providers replaces the
    /// default chain entirely.
    #[serde(default = "default_providers")]
    pub providers: Vec<ProviderSettings>,

    #[serde(default)]
    pub symbols: SymbolSettings,
}

impl Default for FxConfig {
    fn default() -> Self {
        FxConfig {
            http: HttpSettings::default(),
            providers: default_providers(),
            symbols: SymbolSettings::default(),
        }
    }
}

impl FxConfig {
    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (fx.toml)
    /// 3. Environment variables
    pub fn load(config_path: Option<PathBuf>) -> FxResult<Self> {
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading FX config from file");
                let contents = std::fs::read_to_string(&path)?;
                config = toml::from_str(&contents)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    /// Saves configuration to file, creating parent directories.
    ///
    /// Returns the path written.
    pub fn save(&self, config_path: Option<PathBuf>) -> FxResult<PathBuf> {
        let path = config_path
            .or_else(Self::default_config_path)
            .ok_or_else(|| FxError::ConfigSaveFailed("No config path available".into()))?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)?;
        std::fs::write(&path, contents)?;

        info!(?path, "FX config saved");
        Ok(path)
    }

    /// Validates the configuration.
    pub fn validate(&self) -> FxResult<()> {
        let mut names = HashSet::new();
        for provider in &self.providers {
            if provider.name.trim().is_empty() {
                return Err(FxError::InvalidConfig("provider name must not be empty".into()));
            }
            if !names.insert(provider.name.as_str()) {
                return Err(FxError::InvalidConfig(format!(
                    "duplicate provider name: {}",
                    provider.name
                )));
            }
            validate_http_url(&provider.url)?;
        }

        if !self.providers.iter().any(|p| p.enabled) {
            return Err(FxError::InvalidConfig(
                "at least one provider must be enabled".into(),
            ));
        }

        validate_http_url(&self.symbols.url)?;

        if self.symbols.fallback.is_empty() {
            return Err(FxError::InvalidConfig(
                "symbols.fallback must not be empty".into(),
            ));
        }

        if let Some(bad) = self
            .symbols
            .common
            .iter()
            .chain(&self.symbols.fallback)
            .find(|code| !is_currency_code(code))
        {
            return Err(FxError::InvalidConfig(format!(
                "not a 3-letter currency code: {}",
                bad
            )));
        }

        if self.http.timeout_secs == Some(0) {
            return Err(FxError::InvalidConfig(
                "http.timeout_secs must be greater than 0".into(),
            ));
        }

        Ok(())
    }

    /// Applies environment variable overrides.
    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Applies overrides from any key lookup.
    fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(secs) = lookup("QUOTER_FX_TIMEOUT_SECS") {
            match secs.trim().parse::<u64>() {
                Ok(s) => {
                    debug!(timeout_secs = s, "Overriding HTTP timeout from environment");
                    self.http.timeout_secs = Some(s);
                }
                Err(_) => warn!(value = %secs, "Ignoring non-numeric QUOTER_FX_TIMEOUT_SECS"),
            }
        }

        if let Some(url) = lookup("QUOTER_FX_SYMBOLS_URL") {
            debug!(url = %url, "Overriding symbols URL from environment");
            self.symbols.url = url;
        }

        if let Some(agent) = lookup("QUOTER_FX_USER_AGENT") {
            self.http.user_agent = agent;
        }

        if let Some(list) = lookup("QUOTER_FX_DISABLED_PROVIDERS") {
            let disabled: HashSet<&str> = list
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .collect();
            for provider in &mut self.providers {
                if disabled.contains(provider.name.as_str()) {
                    debug!(provider = %provider.name, "Provider disabled from environment");
                    provider.enabled = false;
                }
            }
        }
    }

    /// Returns the default config file path.
    pub fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "quoter", "quoter")
            .map(|dirs| dirs.config_dir().join("fx.toml"))
    }

    // =========================================================================
    // Convenience Methods
    // =========================================================================

    /// Enabled providers, in chain order.
    pub fn enabled_providers(&self) -> impl Iterator<Item = &ProviderSettings> {
        self.providers.iter().filter(|p| p.enabled)
    }
}

/// Checks that `raw` parses as an absolute http or https URL.
fn validate_http_url(raw: &str) -> FxResult<Url> {
    let url = Url::parse(raw)?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(FxError::InvalidUrl(format!(
            "URL must use http or https, got {}: {}",
            other, raw
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_default_config() {
        let config = FxConfig::default();
        assert!(config.validate().is_ok());
        let names: Vec<&str> = config.providers.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(
            names,
            ["frankfurter", "exchangerate_host", "open_er_api", "jsdelivr_currency_api"]
        );
        assert_eq!(config.providers[2].shape, ResponseShape::ResultSuccess);
        assert_eq!(config.providers[3].shape, ResponseShape::NestedByBase);
        assert_eq!(config.http.timeout_secs, None);
        assert_eq!(config.symbols.fallback.len(), 7);
    }

    #[test]
    fn test_config_validation() {
        let mut config = FxConfig::default();

        config.providers[0].url = "ftp://example.com/rates".to_string();
        assert!(matches!(config.validate(), Err(FxError::InvalidUrl(_))));

        let mut config = FxConfig::default();
        config.providers[1].name = "frankfurter".to_string();
        assert!(config.validate().is_err());

        let mut config = FxConfig::default();
        for provider in &mut config.providers {
            provider.enabled = false;
        }
        assert!(config.validate().is_err());

        let mut config = FxConfig::default();
        config.symbols.fallback = vec!["EURO".to_string()];
        assert!(config.validate().is_err());

        let mut config = FxConfig::default();
        config.symbols.fallback.clear();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_overrides() {
        let env: HashMap<&str, &str> = [
            ("QUOTER_FX_TIMEOUT_SECS", "7"),
            ("QUOTER_FX_SYMBOLS_URL", "http://127.0.0.1:9/symbols"),
            ("QUOTER_FX_DISABLED_PROVIDERS", "frankfurter, open_er_api"),
            ("QUOTER_FX_USER_AGENT", "test-agent"),
        ]
        .into_iter()
        .collect();

        let mut config = FxConfig::default();
        config.apply_overrides(|key| env.get(key).map(|v| v.to_string()));

        assert_eq!(config.http.timeout_secs, Some(7));
        assert_eq!(config.http.user_agent, "test-agent");
        assert_eq!(config.symbols.url, "http://127.0.0.1:9/symbols");
        let enabled: Vec<&str> = config.enabled_providers().map(|p| p.name.as_str()).collect();
        assert_eq!(enabled, ["exchangerate_host", "jsdelivr_currency_api"]);
    }

    #[test]
    fn test_bad_timeout_override_is_ignored() {
        let mut config = FxConfig::default();
        config.apply_overrides(|key| (key == "QUOTER_FX_TIMEOUT_SECS").then(|| "soon".to_string()));
        assert_eq!(config.http.timeout_secs, None);
    }

    #[test]
    fn test_toml_round_trip_and_partial_file() {
        let config = FxConfig::default();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        assert!(toml_str.contains("[[providers]]"));
        assert!(toml_str.contains("[symbols]"));
        assert_eq!(toml::from_str::<FxConfig>(&toml_str).unwrap(), config);

        let partial: FxConfig = toml::from_str(
            r#"
            [[providers]]
            name = "local"
            url = "http://127.0.0.1:8080/rates"
            shape = "nested_by_base"
            "#,
        )
        .unwrap();
        assert_eq!(partial.providers.len(), 1);
        assert!(partial.providers[0].enabled);
        assert_eq!(partial.symbols, SymbolSettings::default());
        assert!(partial.validate().is_ok());
    }

    #[test]
    fn test_load_from_file_and_save() {
        let dir = std::env::temp_dir().join(format!("quoter-fx-config-{}", std::process::id()));
        let path = dir.join("nested").join("fx.toml");

        let mut config = FxConfig::default();
        config.http.timeout_secs = Some(3);
        let written = config.save(Some(path.clone())).unwrap();
        assert_eq!(written, path);

        let loaded = FxConfig::load(Some(path)).unwrap();
        assert!(loaded.http.timeout_secs.is_some());

        std::fs::remove_dir_all(dir).ok();
    }
}
