//! # Kernel Configuration
//!
//! Locale and policy settings consumed by the kernel.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     OHADA_CURRENCY_CODE=XOF                                            │
//! │     OHADA_DEFAULT_TAX_RATE=18                                          │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     ~/.config/ohada-erp/ohada.toml (Linux)                             │
//! │     ~/Library/Application Support/sn.ohada.ohada-erp/ohada.toml (macOS)│
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! │     XOF / FCFA, TVA 18%, Senegal phone numbers                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! # ohada.toml
//! [currency]
//! code = "XOF"
//! symbol = "FCFA"
//! decimal_separator = ","
//! thousands_separator = " "
//!
//! [tax]
//! default_rate_bps = 1800   # 18.00%
//! max_rate_bps = 10000
//!
//! [validation]
//! phone_format = "senegal"  # senegal | international
//! max_amount_cents = 100000000000
//! ```

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::{debug, info, warn};

use crate::error::{ConfigError, ConfigResult};
use crate::formats::PhoneFormat;
use crate::money::{Money, Percent};
use crate::rules::RuleSet;
use crate::schemas;
use crate::validation::AmountBounds;

/// Config file name inside the platform config directory.
pub const CONFIG_FILE_NAME: &str = "ohada.toml";

// =============================================================================
// Currency Settings
// =============================================================================

/// How amounts are labelled and rendered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrencySettings {
    /// ISO 4217 code.
    #[serde(default = "default_currency_code")]
    pub code: String,

    /// Symbol appended by [`Money::format_with`]. Empty for none.
    #[serde(default = "default_currency_symbol")]
    pub symbol: String,

    #[serde(default = "default_decimal_separator")]
    pub decimal_separator: String,

    #[serde(default = "default_thousands_separator")]
    pub thousands_separator: String,
}

fn default_currency_code() -> String {
    "XOF".to_string()
}

fn default_currency_symbol() -> String {
    "FCFA".to_string()
}

fn default_decimal_separator() -> String {
    ",".to_string()
}

fn default_thousands_separator() -> String {
    " ".to_string()
}

impl Default for CurrencySettings {
    fn default() -> Self {
        CurrencySettings {
            code: default_currency_code(),
            symbol: default_currency_symbol(),
            decimal_separator: default_decimal_separator(),
            thousands_separator: default_thousands_separator(),
        }
    }
}

// =============================================================================
// Tax Settings
// =============================================================================

/// Tax defaults.
///
/// Rates are in basis points: 1800 = 18.00% (Senegal VAT).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxSettings {
    /// Rate applied to new invoices.
    #[serde(default = "default_tax_rate_bps")]
    pub default_rate_bps: i64,

    /// Highest rate a document may carry.
    #[serde(default = "default_max_rate_bps")]
    pub max_rate_bps: i64,
}

fn default_tax_rate_bps() -> i64 {
    1800
}

fn default_max_rate_bps() -> i64 {
    Percent::SCALE
}

impl Default for TaxSettings {
    fn default() -> Self {
        TaxSettings {
            default_rate_bps: default_tax_rate_bps(),
            max_rate_bps: default_max_rate_bps(),
        }
    }
}

// =============================================================================
// Validation Settings
// =============================================================================

/// Form validation policy.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationSettings {
    /// Which phone numbers customer forms accept.
    #[serde(default)]
    pub phone_format: PhoneFormat,

    /// Upper bound for a single document amount, in cents. None = unbounded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_amount_cents: Option<i64>,
}

// =============================================================================
// Main Kernel Configuration
// =============================================================================

/// Complete kernel configuration.
///
/// ## Example
/// ```rust
/// use ohada_core::config::KernelConfig;
///
/// let config = KernelConfig::default();
/// assert_eq!(config.currency.code, "XOF");
/// assert_eq!(config.tax_rate().to_string(), "18%");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KernelConfig {
    #[serde(default)]
    pub currency: CurrencySettings,

    #[serde(default)]
    pub tax: TaxSettings,

    #[serde(default)]
    pub validation: ValidationSettings,
}

impl KernelConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (ohada.toml)
    /// 3. Environment variables
    pub fn load(config_path: Option<PathBuf>) -> ConfigResult<Self> {
        Self::load_with(config_path, |key| std::env::var(key).ok())
    }

    /// [`KernelConfig::load`] with an explicit variable lookup.
    pub fn load_with<F>(config_path: Option<PathBuf>, lookup: F) -> ConfigResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading kernel config from file");
                let contents = std::fs::read_to_string(&path)?;
                config = toml::from_str(&contents)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_overrides(lookup);
        config.validate()?;

        Ok(config)
    }

    /// Loads config or returns default if load fails.
    pub fn load_or_default(config_path: Option<PathBuf>) -> Self {
        Self::load(config_path).unwrap_or_else(|e| {
            warn!("Failed to load kernel config: {}. Using defaults.", e);
            Self::default()
        })
    }

    /// Saves configuration to file.
    pub fn save(&self, config_path: Option<PathBuf>) -> ConfigResult<()> {
        let path = config_path
            .or_else(Self::default_config_path)
            .ok_or(ConfigError::NoConfigPath)?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)?;
        std::fs::write(&path, contents)?;

        info!(?path, "Kernel config saved");
        Ok(())
    }

    /// Validates the configuration.
    pub fn validate(&self) -> ConfigResult<()> {
        let code = &self.currency.code;
        if code.len() != 3 || !code.chars().all(|c| c.is_ascii_uppercase()) {
            return Err(ConfigError::InvalidConfig(format!(
                "currency code must be 3 uppercase letters, got: '{}'",
                code
            )));
        }

        if self.currency.decimal_separator.is_empty() {
            return Err(ConfigError::InvalidConfig(
                "decimal_separator must not be empty".into(),
            ));
        }

        if self.currency.decimal_separator == self.currency.thousands_separator {
            return Err(ConfigError::InvalidConfig(
                "decimal_separator and thousands_separator must differ".into(),
            ));
        }

        let tax = &self.tax;
        if tax.max_rate_bps < 0 || tax.max_rate_bps > Percent::SCALE {
            return Err(ConfigError::InvalidConfig(format!(
                "max_rate_bps must be between 0 and {}, got: {}",
                Percent::SCALE,
                tax.max_rate_bps
            )));
        }

        if tax.default_rate_bps < 0 || tax.default_rate_bps > tax.max_rate_bps {
            return Err(ConfigError::InvalidConfig(format!(
                "default_rate_bps must be between 0 and {}, got: {}",
                tax.max_rate_bps, tax.default_rate_bps
            )));
        }

        if let Some(max) = self.validation.max_amount_cents {
            if max <= 0 {
                return Err(ConfigError::InvalidConfig(
                    "max_amount_cents must be greater than 0".into(),
                ));
            }
        }

        Ok(())
    }

    /// Applies `OHADA_*` overrides read through `lookup`.
    ///
    /// Unparseable values are ignored with a warning.
    fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(code) = lookup("OHADA_CURRENCY_CODE") {
            debug!(code = %code, "Overriding currency code from environment");
            self.currency.code = code.trim().to_uppercase();
        }

        if let Some(symbol) = lookup("OHADA_CURRENCY_SYMBOL") {
            self.currency.symbol = symbol;
        }

        if let Some(rate) = lookup("OHADA_DEFAULT_TAX_RATE") {
            match Percent::parse(&rate) {
                Ok(parsed) => {
                    debug!(rate = %parsed, "Overriding default tax rate from environment");
                    self.tax.default_rate_bps = parsed.bps();
                }
                Err(e) => warn!(rate = %rate, error = %e, "Invalid tax rate in environment"),
            }
        }

        if let Some(format) = lookup("OHADA_PHONE_FORMAT") {
            match format.parse::<PhoneFormat>() {
                Ok(parsed) => self.validation.phone_format = parsed,
                Err(e) => warn!(format = %format, "{}", e),
            }
        }

        if let Some(amount) = lookup("OHADA_MAX_AMOUNT") {
            match Money::parse(&amount) {
                Ok(parsed) => {
                    debug!(max = %parsed, "Overriding max amount from environment");
                    self.validation.max_amount_cents = Some(parsed.cents());
                }
                Err(e) => warn!(amount = %amount, error = %e, "Invalid max amount in environment"),
            }
        }
    }

    /// Returns the default config file path.
    fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("sn", "ohada", "ohada-erp")
            .map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
    }

    // =========================================================================
    // Convenience Methods
    // =========================================================================

    /// Default tax rate for new invoices.
    pub fn tax_rate(&self) -> Percent {
        Percent::from_bps(self.tax.default_rate_bps)
    }

    /// Highest accepted tax rate.
    pub fn max_tax_rate(&self) -> Percent {
        Percent::from_bps(self.tax.max_rate_bps)
    }

    /// Amount bounds for document amounts: non-negative, capped by
    /// `max_amount_cents` when set.
    pub fn amount_bounds(&self) -> AmountBounds {
        match self.validation.max_amount_cents {
            Some(max) => AmountBounds::default().with_max(Money::from_cents(max)),
            None => AmountBounds::default(),
        }
    }

    pub fn phone_format(&self) -> PhoneFormat {
        self.validation.phone_format
    }

    /// Customer rule set using the configured phone format.
    pub fn customer_rules(&self) -> RuleSet {
        schemas::customer_rules_for(self.phone_format())
    }

    /// Invoice rule set using the configured tax ceiling and amount cap.
    pub fn invoice_rules(&self) -> RuleSet {
        schemas::invoice_rules_with(self.max_tax_rate(), self.amount_bounds())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
