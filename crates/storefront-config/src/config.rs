//! # Storefront Configuration
//!
//! Coupon table and logging settings.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     STOREFRONT_COUPONS="SAVE10=10,HALF=50"                             │
//! │     STOREFRONT_LOG=debug                                               │
//! │     STOREFRONT_LOG_FORMAT=json                                         │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     path argument, else $STOREFRONT_CONFIG, else                       │
//! │     ~/.config/storefront/storefront.toml (Linux)                       │
//! │     ~/Library/Application Support/com.storefront.storefront/ (macOS)   │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! │     SAVE10 (10%), SAVE20 (20%), compact logs                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! # storefront.toml
//! [coupons]
//! SAVE10 = 1000   # basis points
//! SAVE20 = 2000
//!
//! [logging]
//! filter = "info,storefront=debug"
//! format = "compact"   # compact | json
//! ```
//!
//! A `[coupons]` section replaces the built-in codes; leave it out to keep
//! them.

use std::path::PathBuf;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use storefront_core::validation;
use storefront_core::{Cart, CouponResolver, CouponTable, DiscountRate};
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

use crate::error::{ConfigError, ConfigResult};

/// Env var naming the config file.
pub const CONFIG_PATH_ENV: &str = "STOREFRONT_CONFIG";

/// Env var replacing the coupon table (`CODE=percent,...`).
pub const COUPONS_ENV: &str = "STOREFRONT_COUPONS";

/// Env var overriding the log filter.
pub const LOG_FILTER_ENV: &str = "STOREFRONT_LOG";

/// Env var overriding the log format.
pub const LOG_FORMAT_ENV: &str = "STOREFRONT_LOG_FORMAT";

// =============================================================================
// Log Format
// =============================================================================

/// Output format for log lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    /// Human-readable single-line output.
    #[default]
    Compact,

    /// One JSON object per line, for log shippers.
    Json,
}

impl std::fmt::Display for LogFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LogFormat::Compact => write!(f, "compact"),
            LogFormat::Json => write!(f, "json"),
        }
    }
}

impl std::str::FromStr for LogFormat {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "compact" | "text" | "pretty" => Ok(LogFormat::Compact),
            "json" => Ok(LogFormat::Json),
            other => Err(ConfigError::InvalidValue {
                field: "logging.format".to_string(),
                reason: format!("unknown format '{}'. Valid options: compact, json", other),
            }),
        }
    }
}

// =============================================================================
// Logging Configuration
// =============================================================================

/// Logging settings, consumed by [`crate::telemetry::init_tracing`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// `EnvFilter` directives. `RUST_LOG` still wins when set.
    #[serde(default = "default_filter")]
    pub filter: String,

    /// Output format.
    #[serde(default)]
    pub format: LogFormat,
}

fn default_filter() -> String {
    "info,storefront=debug".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        LoggingConfig {
            filter: default_filter(),
            format: LogFormat::default(),
        }
    }
}

// =============================================================================
// Main Configuration
// =============================================================================

/// Complete storefront configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorefrontConfig {
    /// Coupon code → discount in basis points.
    #[serde(default)]
    pub coupons: CouponTable,

    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl StorefrontConfig {
    /// Creates a config with the built-in coupons and default logging.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (`config_path`, else `$STOREFRONT_CONFIG`, else the
    ///    platform config directory); a missing file is not an error
    /// 3. Environment variables
    pub fn load(config_path: Option<PathBuf>) -> ConfigResult<Self> {
        Self::load_with(config_path, env_lookup)
    }

    /// [`StorefrontConfig::load`] with environment variables read through
    /// `lookup`.
    fn load_with(
        config_path: Option<PathBuf>,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> ConfigResult<Self> {
        let mut config = Self::default();

        let path = config_path
            .or_else(|| lookup(CONFIG_PATH_ENV).map(PathBuf::from))
            .or_else(Self::default_config_path);

        if let Some(path) = path {
            if path.exists() {
                info!(?path, "Loading storefront config from file");
                let contents = std::fs::read_to_string(&path)?;
                config = toml::from_str(&contents)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_overrides(lookup)?;
        config.validate()?;

        Ok(config)
    }

    /// Loads config or returns default if load fails.
    pub fn load_or_default(config_path: Option<PathBuf>) -> Self {
        Self::load_or_default_with(config_path, env_lookup)
    }

    fn load_or_default_with(
        config_path: Option<PathBuf>,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Self {
        Self::load_with(config_path, lookup).unwrap_or_else(|e| {
            warn!("Failed to load storefront config: {}. Using defaults.", e);
            Self::default()
        })
    }

    /// Parses and validates a TOML document. Env vars are not consulted.
    pub fn from_toml_str(contents: &str) -> ConfigResult<Self> {
        let config: Self = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Renders the config as TOML.
    pub fn to_toml_string(&self) -> ConfigResult<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Saves configuration to file.
    pub fn save(&self, config_path: Option<PathBuf>) -> ConfigResult<()> {
        let path = config_path
            .or_else(Self::default_config_path)
            .ok_or(ConfigError::NoConfigPath)?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(&path, self.to_toml_string()?)?;

        info!(?path, "Storefront config saved");
        Ok(())
    }

    /// Validates the configuration.
    pub fn validate(&self) -> ConfigResult<()> {
        for (code, rate) in self.coupons.iter() {
            validation::validate_coupon_code(code)
                .and_then(|_| validation::validate_discount_bps(rate.bps()))
                .map_err(|e| ConfigError::InvalidCoupon {
                    code: code.to_string(),
                    reason: e.to_string(),
                })?;
        }

        EnvFilter::try_new(&self.logging.filter).map_err(|e| ConfigError::InvalidValue {
            field: "logging.filter".to_string(),
            reason: e.to_string(),
        })?;

        Ok(())
    }

    /// Applies overrides from `lookup`, which maps a variable name to its
    /// value.
    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) -> ConfigResult<()> {
        if let Some(list) = lookup(COUPONS_ENV) {
            let table = parse_coupon_list(&list)?;
            debug!(codes = table.len(), "Overriding coupon table from environment");
            self.coupons = table;
        }

        if let Some(filter) = lookup(LOG_FILTER_ENV) {
            debug!(filter = %filter, "Overriding log filter from environment");
            self.logging.filter = filter;
        }

        if let Some(format) = lookup(LOG_FORMAT_ENV) {
            self.logging.format = format.parse()?;
        }

        Ok(())
    }

    /// Returns the default config file path.
    fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "storefront", "storefront")
            .map(|dirs| dirs.config_dir().join("storefront.toml"))
    }

    // =========================================================================
    // Convenience Methods
    // =========================================================================

    /// Returns a copy of the configured coupon table.
    pub fn coupon_table(&self) -> CouponTable {
        self.coupons.clone()
    }

    /// Returns the coupon table as a resolver that carts can share.
    pub fn shared_coupons(&self) -> Arc<dyn CouponResolver> {
        Arc::new(self.coupon_table())
    }

    /// Creates an empty cart that resolves coupons through this config.
    pub fn new_cart(&self) -> Cart {
        Cart::with_coupons(self.coupon_table())
    }
}

/// Reads a variable from the process environment.
fn env_lookup(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Parses `CODE=percent` pairs separated by commas.
///
/// Percentages may be fractional (`HALF=50`, `DEAL=12.5`). An empty string
/// yields an empty table.
fn parse_coupon_list(list: &str) -> ConfigResult<CouponTable> {
    let mut table = CouponTable::empty();

    for entry in list.split(',').map(str::trim).filter(|e| !e.is_empty()) {
        let invalid = |reason: &str| ConfigError::InvalidCoupon {
            code: entry.to_string(),
            reason: reason.to_string(),
        };

        let (code, pct) = entry
            .split_once('=')
            .ok_or_else(|| invalid("expected CODE=percent"))?;
        let code = code.trim();
        let rate = pct
            .trim()
            .parse::<f64>()
            .ok()
            .and_then(DiscountRate::from_percentage)
            .ok_or_else(|| invalid("percent must be a number from 0 to 100"))?;

        table.insert(code, rate).map_err(|e| ConfigError::InvalidCoupon {
            code: code.to_string(),
            reason: e.to_string(),
        })?;
    }

    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use storefront_core::{Money, NewItem};

    fn no_env(_: &str) -> Option<String> {
        None
    }

    fn env(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_default_config() {
        let config = StorefrontConfig::default();
        assert_eq!(config.coupons, CouponTable::default());
        assert_eq!(config.logging.filter, "info,storefront=debug");
        assert_eq!(config.logging.format, LogFormat::Compact);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_log_format_parsing() {
        assert_eq!("compact".parse::<LogFormat>().unwrap(), LogFormat::Compact);
        assert_eq!("JSON".parse::<LogFormat>().unwrap(), LogFormat::Json);
        assert!("xml".parse::<LogFormat>().is_err());
    }

    #[test]
    fn test_from_toml_str() {
        let config = StorefrontConfig::from_toml_str(
            r#"
            [coupons]
            WELCOME = 1500

            [logging]
            format = "json"
            "#,
        )
        .unwrap();

        // The section replaces the built-ins
        assert_eq!(config.coupons.len(), 1);
        assert_eq!(config.coupons.get("WELCOME"), Some(DiscountRate::from_bps(1500)));
        assert_eq!(config.coupons.get("SAVE10"), None);

        assert_eq!(config.logging.format, LogFormat::Json);
        assert_eq!(config.logging.filter, "info,storefront=debug");
    }

    #[test]
    fn test_missing_sections_use_defaults() {
        let config = StorefrontConfig::from_toml_str("").unwrap();
        assert_eq!(config, StorefrontConfig::default());
    }

    #[test]
    fn test_from_toml_str_rejects_bad_content() {
        let err = StorefrontConfig::from_toml_str("[coupons]\nFREE = 20000\n").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidCoupon { ref code, .. } if code == "FREE"));

        let err = StorefrontConfig::from_toml_str("[logging]\nformat = \"xml\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));

        let err = StorefrontConfig::from_toml_str("[coupons]\nSAVE10 = \"ten\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_toml_serialization() {
        let config = StorefrontConfig::default();
        let toml_str = config.to_toml_string().unwrap();
        assert!(toml_str.contains("[coupons]"));
        assert!(toml_str.contains("SAVE10 = 1000"));
        assert!(toml_str.contains("[logging]"));

        let back = StorefrontConfig::from_toml_str(&toml_str).unwrap();
        assert_eq!(back, config);
    }

    #[test]
    fn test_env_overrides() {
        let vars = env(&[
            (COUPONS_ENV, "HALF=50, DEAL=12.5"),
            (LOG_FILTER_ENV, "warn"),
            (LOG_FORMAT_ENV, "json"),
        ]);

        let mut config = StorefrontConfig::default();
        config.apply_overrides(|key| vars.get(key).cloned()).unwrap();

        assert_eq!(config.coupons.len(), 2);
        assert_eq!(config.coupons.get("HALF"), Some(DiscountRate::from_bps(5000)));
        assert_eq!(config.coupons.get("DEAL"), Some(DiscountRate::from_bps(1250)));
        assert_eq!(config.logging.filter, "warn");
        assert_eq!(config.logging.format, LogFormat::Json);
    }

    #[test]
    fn test_env_overrides_reject_garbage() {
        for bad in ["SAVE10", "SAVE10=abc", "SAVE10=101", "=10"] {
            let vars = env(&[(COUPONS_ENV, bad)]);
            let mut config = StorefrontConfig::default();
            let err = config.apply_overrides(|key| vars.get(key).cloned()).unwrap_err();
            assert!(matches!(err, ConfigError::InvalidCoupon { .. }), "{}", bad);
            assert_eq!(config.coupons, CouponTable::default());
        }

        let vars = env(&[(LOG_FORMAT_ENV, "xml")]);
        let mut config = StorefrontConfig::default();
        assert!(config.apply_overrides(|key| vars.get(key).cloned()).is_err());
    }

    #[test]
    fn test_empty_coupon_env_clears_table() {
        let vars = env(&[(COUPONS_ENV, "")]);
        let mut config = StorefrontConfig::default();
        config.apply_overrides(|key| vars.get(key).cloned()).unwrap();
        assert!(config.coupons.is_empty());
    }

    #[test]
    fn test_validate_rejects_bad_filter() {
        let mut config = StorefrontConfig::default();
        config.logging.filter = "storefront=loud".to_string();
        let err = config.validate().unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { ref field, .. } if field == "logging.filter"));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("storefront.toml");
        std::fs::write(&path, "[coupons]\nVIP = 2500\n").unwrap();

        let config = StorefrontConfig::load_with(Some(path), no_env).unwrap();
        assert_eq!(config.coupons.get("VIP"), Some(DiscountRate::from_bps(2500)));
    }

    #[test]
    fn test_load_reads_path_and_overrides_from_lookup() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("from-env.toml");
        std::fs::write(&path, "[coupons]\nVIP = 2500\n").unwrap();

        let path_str = path.to_string_lossy().to_string();
        let vars = env(&[(CONFIG_PATH_ENV, path_str.as_str()), (LOG_FORMAT_ENV, "json")]);
        let config = StorefrontConfig::load_with(None, |key| vars.get(key).cloned()).unwrap();

        assert_eq!(config.coupons.get("VIP"), Some(DiscountRate::from_bps(2500)));
        assert_eq!(config.logging.format, LogFormat::Json);

        // An explicit path wins over the variable
        let other = dir.path().join("explicit.toml");
        std::fs::write(&other, "[coupons]\nSTAFF = 3000\n").unwrap();
        let config = StorefrontConfig::load_with(Some(other), |key| vars.get(key).cloned()).unwrap();
        assert_eq!(config.coupons.get("STAFF"), Some(DiscountRate::from_bps(3000)));
        assert_eq!(config.coupons.get("VIP"), None);
    }

    #[test]
    fn test_load_rejects_bad_override_after_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("storefront.toml");
        std::fs::write(&path, "[coupons]\nVIP = 2500\n").unwrap();

        let vars = env(&[(COUPONS_ENV, "VIP=200")]);
        let err = StorefrontConfig::load_with(Some(path.clone()), |key| vars.get(key).cloned())
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidCoupon { .. }));

        let config =
            StorefrontConfig::load_or_default_with(Some(path), |key| vars.get(key).cloned());
        assert_eq!(config, StorefrontConfig::default());
    }

    #[test]
    fn test_load_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = StorefrontConfig::load_with(Some(dir.path().join("absent.toml")), no_env).unwrap();
        assert_eq!(config.coupons, CouponTable::default());
    }

    #[test]
    fn test_load_or_default_on_broken_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("storefront.toml");
        std::fs::write(&path, "[coupons\nnot toml").unwrap();

        assert!(StorefrontConfig::load_with(Some(path.clone()), no_env).is_err());
        let config = StorefrontConfig::load_or_default_with(Some(path), no_env);
        assert_eq!(config.coupons, CouponTable::default());
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("storefront.toml");

        let mut config = StorefrontConfig::default();
        config.coupons.insert("SPRING", DiscountRate::from_bps(750)).unwrap();
        config.logging.format = LogFormat::Json;
        config.save(Some(path.clone())).unwrap();

        let loaded = StorefrontConfig::load_with(Some(path), no_env).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_new_cart_uses_configured_coupons() {
        let config = StorefrontConfig::from_toml_str("[coupons]\nHALF = 5000\n").unwrap();

        let mut cart = config.new_cart();
        cart.add_item(NewItem::new("Lamp", Money::from_cents(4000)), 1).unwrap();

        cart.apply_coupon("SAVE10");
        assert_eq!(cart.total(), Money::from_cents(4000));

        cart.apply_coupon("HALF");
        assert_eq!(cart.total(), Money::from_cents(2000));

        let shared = config.shared_coupons();
        assert_eq!(shared.resolve("HALF"), Some(DiscountRate::from_bps(5000)));
    }
}
