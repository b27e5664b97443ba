//! # Tally Configuration
//!
//! Configuration for the pricing policy and report generation.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     TALLY_STRICT_CLIENT_DISCOUNT=true                                  │
//! │     TALLY_TOP_CLIENTS=5                                                │
//! │     TALLY_TOP_SUBCATEGORIES=5                                          │
//! │     TALLY_GRANULARITY=weekly                                           │
//! │     TALLY_CURRENCY=INR                                                 │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     ~/.config/tally/tally.toml (Linux)                                 │
//! │     ~/Library/Application Support/com.tally.tally/tally.toml (macOS)   │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! │     lenient client validation, top 10 clients and subcategories,       │
//! │     monthly revenue summary, INR                                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! # tally.toml
//! [pricing]
//! strict_client_validation = false
//!
//! [report]
//! top_clients = 10
//! top_subcategories = 10
//! granularity = "monthly"
//! currency = "INR"
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tally_core::{PricingEngine, PricingPolicy};
use tracing::{debug, info, warn};

use crate::error::{ReportError, ReportResult};
use crate::performance::{Granularity, PerformanceOptions};

// =============================================================================
// Report Settings
// =============================================================================

/// Report generation settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportSettings {
    /// How many clients the branch performance report lists.
    #[serde(default = "default_top_clients")]
    pub top_clients: usize,

    /// How many rows the top subcategories table lists.
    #[serde(default = "default_top_clients")]
    pub top_subcategories: usize,

    /// Row length of the revenue summary.
    #[serde(default)]
    pub granularity: Granularity,

    /// ISO 4217 code the display layer formats amounts with.
    #[serde(default = "default_currency")]
    pub currency: String,
}

fn default_top_clients() -> usize {
    10
}

fn default_currency() -> String {
    "INR".to_string()
}

impl Default for ReportSettings {
    fn default() -> Self {
        ReportSettings {
            top_clients: default_top_clients(),
            top_subcategories: default_top_clients(),
            granularity: Granularity::default(),
            currency: default_currency(),
        }
    }
}

// =============================================================================
// Main Configuration
// =============================================================================

/// Complete Tally configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TallyConfig {
    /// Engine policy.
    #[serde(default)]
    pub pricing: PricingPolicy,

    /// Report settings.
    #[serde(default)]
    pub report: ReportSettings,
}

impl TallyConfig {
    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (tally.toml)
    /// 3. Environment variables
    pub fn load(config_path: Option<PathBuf>) -> ReportResult<Self> {
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading tally config from file");
                let contents = std::fs::read_to_string(&path)?;
                config = toml::from_str(&contents)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_overrides(|key| std::env::var(key).ok());
        config.validate()?;

        Ok(config)
    }

    /// Loads config or returns default if load fails.
    pub fn load_or_default(config_path: Option<PathBuf>) -> Self {
        Self::load(config_path).unwrap_or_else(|e| {
            warn!("Failed to load tally config: {}. Using defaults.", e);
            Self::default()
        })
    }

    /// Saves configuration to file.
    pub fn save(&self, config_path: Option<PathBuf>) -> ReportResult<()> {
        let path = config_path
            .or_else(Self::default_config_path)
            .ok_or_else(|| ReportError::ConfigSaveFailed("No config path available".into()))?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| ReportError::ConfigSaveFailed(e.to_string()))?;
        }

        let contents = toml::to_string_pretty(self)?;
        std::fs::write(&path, contents).map_err(|e| ReportError::ConfigSaveFailed(e.to_string()))?;

        info!(?path, "Tally config saved");
        Ok(())
    }

    /// Validates the configuration.
    pub fn validate(&self) -> ReportResult<()> {
        if self.report.top_clients == 0 {
            return Err(ReportError::InvalidConfig(
                "report.top_clients must be greater than 0".into(),
            ));
        }

        if self.report.top_subcategories == 0 {
            return Err(ReportError::InvalidConfig(
                "report.top_subcategories must be greater than 0".into(),
            ));
        }

        let currency = &self.report.currency;
        if currency.len() != 3 || !currency.chars().all(|c| c.is_ascii_uppercase()) {
            return Err(ReportError::InvalidConfig(format!(
                "report.currency must be a three-letter ISO code, got: {}",
                currency
            )));
        }

        Ok(())
    }

    /// Applies overrides from a key lookup (the process environment in
    /// [`load`](Self::load)).
    fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(strict) = lookup("TALLY_STRICT_CLIENT_DISCOUNT") {
            match strict.to_lowercase().as_str() {
                "1" | "true" | "yes" => self.pricing.strict_client_validation = true,
                "0" | "false" | "no" => self.pricing.strict_client_validation = false,
                _ => warn!(value = %strict, "Unknown TALLY_STRICT_CLIENT_DISCOUNT value"),
            }
        }

        if let Some(top) = lookup("TALLY_TOP_CLIENTS") {
            match top.parse::<usize>() {
                Ok(n) => {
                    debug!(top_clients = n, "Overriding top clients from environment");
                    self.report.top_clients = n;
                }
                Err(_) => warn!(value = %top, "TALLY_TOP_CLIENTS is not a number"),
            }
        }

        if let Some(top) = lookup("TALLY_TOP_SUBCATEGORIES") {
            match top.parse::<usize>() {
                Ok(n) => self.report.top_subcategories = n,
                Err(_) => warn!(value = %top, "TALLY_TOP_SUBCATEGORIES is not a number"),
            }
        }

        if let Some(granularity) = lookup("TALLY_GRANULARITY") {
            match granularity.to_lowercase().as_str() {
                "daily" => self.report.granularity = Granularity::Daily,
                "weekly" => self.report.granularity = Granularity::Weekly,
                "monthly" => self.report.granularity = Granularity::Monthly,
                _ => warn!(value = %granularity, "Unknown TALLY_GRANULARITY value"),
            }
        }

        if let Some(currency) = lookup("TALLY_CURRENCY") {
            self.report.currency = currency.to_uppercase();
        }
    }

    /// Returns the default config file path.
    fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "tally", "tally")
            .map(|dirs| dirs.config_dir().join("tally.toml"))
    }

    // =========================================================================
    // Convenience Methods
    // =========================================================================

    /// Returns the engine policy.
    pub fn pricing_policy(&self) -> PricingPolicy {
        self.pricing
    }

    /// Builds an engine with the configured policy.
    pub fn engine(&self) -> PricingEngine {
        PricingEngine::new(self.pricing)
    }

    /// Branch performance options with the configured limits, granularity
    /// and currency. Filters start empty.
    pub fn performance_options(&self, as_of: DateTime<Utc>) -> PerformanceOptions {
        PerformanceOptions {
            top_clients: self.report.top_clients,
            top_subcategories: self.report.top_subcategories,
            granularity: self.report.granularity,
            currency: self.report.currency.clone(),
            ..PerformanceOptions::new(as_of)
        }
    }
}
