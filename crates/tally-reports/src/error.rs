//! # Report Error Types
//!
//! Error types for report aggregation and configuration.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Report Error Categories                            │
//! │                                                                         │
//! │  ┌─────────────────────────┐   ┌─────────────────────────────────────┐ │
//! │  │     Configuration       │   │           Aggregation               │ │
//! │  │                         │   │                                     │ │
//! │  │  InvalidConfig          │   │  Pricing { invoice_id, source }     │ │
//! │  │  ConfigLoadFailed       │   │    (empty invoice, bad line, ...)   │ │
//! │  │  ConfigSaveFailed       │   │  InvalidPeriod                      │ │
//! │  │                         │   │  Overflow                           │ │
//! │  └─────────────────────────┘   └─────────────────────────────────────┘ │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use tally_core::PricingError;
use thiserror::Error;

/// Result type alias for report operations.
pub type ReportResult<T> = Result<T, ReportError>;

/// Report error type.
///
/// ## Design Principles
/// - An invoice that cannot be priced fails the report; it is never
///   counted as zero
/// - Each aggregation error names the invoice it came from
#[derive(Debug, Error)]
pub enum ReportError {
    // =========================================================================
    // Aggregation Errors
    // =========================================================================
    /// The engine rejected one invoice of the report.
    #[error("Invoice {invoice_id}: {source}")]
    Pricing {
        invoice_id: String,
        #[source]
        source: PricingError,
    },

    /// The report period ends before it starts.
    #[error("Invalid report period: {0}")]
    InvalidPeriod(String),

    /// A report-wide figure does not fit the decimal range.
    #[error("Report figure too large to compute: {0}")]
    Overflow(String),

    // =========================================================================
    // Configuration Errors
    // =========================================================================
    /// Invalid configuration value.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Failed to read or parse the config file.
    #[error("Failed to load config: {0}")]
    ConfigLoadFailed(String),

    /// Failed to write the config file.
    #[error("Failed to save config: {0}")]
    ConfigSaveFailed(String),
}

impl ReportError {
    /// Wraps an engine error with the invoice it belongs to.
    pub fn pricing(invoice_id: impl Into<String>, source: PricingError) -> Self {
        ReportError::Pricing {
            invoice_id: invoice_id.into(),
            source,
        }
    }

    /// Shorthand for an overflow on a report-wide figure.
    pub fn overflow(field: &str) -> Self {
        ReportError::Overflow(field.to_string())
    }
}

// =============================================================================
// Conversions
// =============================================================================

impl From<std::io::Error> for ReportError {
    fn from(err: std::io::Error) -> Self {
        ReportError::ConfigLoadFailed(err.to_string())
    }
}

impl From<toml::de::Error> for ReportError {
    fn from(err: toml::de::Error) -> Self {
        ReportError::ConfigLoadFailed(err.to_string())
    }
}

impl From<toml::ser::Error> for ReportError {
    fn from(err: toml::ser::Error) -> Self {
        ReportError::ConfigSaveFailed(err.to_string())
    }
}
