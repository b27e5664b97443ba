//! # Error Types
//!
//! Domain-specific error types for tally-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  tally-core errors (this file)                                         │
//! │  ├── PricingError     - Engine failures (input, client state, empty)   │
//! │  └── ValidationError  - Field-level input validation failures          │
//! │                                                                         │
//! │  tally-reports errors (separate crate)                                 │
//! │  └── ReportError      - Aggregation + configuration failures           │
//! │                                                                         │
//! │  Flow: ValidationError → PricingError → ReportError → View layer       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include the offending field and value in error messages
//! 3. Errors are enum variants, never String
//! 4. A bad input is always an error, never a silent zero

use rust_decimal::Decimal;
use thiserror::Error;

// =============================================================================
// Pricing Error
// =============================================================================

/// Errors returned by the pricing engine.
///
/// All of them are deterministic: calling again with the same input fails
/// the same way, so callers should surface them instead of retrying.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PricingError {
    /// A numeric input is malformed or out of range.
    ///
    /// ## When This Occurs
    /// - Negative base price or unit price
    /// - Base price with sub-paisa precision (`10.005`)
    /// - GST rate or discount percentage outside `[0, 100]`
    /// - Quantity of zero
    #[error("Invalid input: {0}")]
    InvalidInput(#[from] ValidationError),

    /// The client record carries a discount it is not entitled to.
    ///
    /// Only raised when the engine runs with strict client validation.
    /// The lenient default ignores the stray percentage instead.
    ///
    /// ## User Workflow
    /// ```text
    /// Client: is_regular = false, discount_percentage = 15
    ///      │
    ///      ▼
    /// compute_line_pricing (strict policy)
    ///      │
    ///      ▼
    /// ClientState { client_id: "c-17", discount_percentage: 15 }
    ///      │
    ///      ▼
    /// UI shows: "Client c-17 is not regular but has a 15% discount"
    /// ```
    #[error("Client {client_id} is not regular but has a {discount_percentage}% discount")]
    ClientState {
        client_id: String,
        discount_percentage: Decimal,
    },

    /// Invoice totals were requested for an invoice with no line items.
    #[error("Invoice has no line items")]
    EmptyInvoice,
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These errors occur when a value handed to the engine doesn't meet
/// requirements. Each variant names the field that failed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}, got {value}")]
    OutOfRange {
        field: String,
        min: Decimal,
        max: Decimal,
        value: Decimal,
    },

    /// Value must not be negative.
    #[error("{field} must not be negative, got {value}")]
    Negative { field: String, value: Decimal },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Value carries more fractional digits than the currency allows.
    #[error("{field} must have at most {max_scale} decimal places, got {value}")]
    TooPrecise {
        field: String,
        max_scale: u32,
        value: Decimal,
    },

    /// Arithmetic on this value would overflow.
    #[error("{field} is too large to compute")]
    Overflow { field: String },

    /// Invalid format (e.g., whitespace inside an identifier).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

impl ValidationError {
    /// Shorthand for an overflow on `field`.
    pub fn overflow(field: &str) -> Self {
        ValidationError::Overflow {
            field: field.to_string(),
        }
    }
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with PricingError.
pub type PricingResult<T> = Result<T, PricingError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = PricingError::ClientState {
            client_id: "c-17".to_string(),
            discount_percentage: Decimal::from(15),
        };
        assert_eq!(
            err.to_string(),
            "Client c-17 is not regular but has a 15% discount"
        );
        assert_eq!(
            PricingError::EmptyInvoice.to_string(),
            "Invoice has no line items"
        );
    }

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::OutOfRange {
            field: "gst_rate".to_string(),
            min: Decimal::ZERO,
            max: Decimal::ONE_HUNDRED,
            value: Decimal::from(101),
        };
        assert_eq!(
            err.to_string(),
            "gst_rate must be between 0 and 100, got 101"
        );

        let err = ValidationError::Negative {
            field: "base_price".to_string(),
            value: Decimal::from(-5),
        };
        assert_eq!(err.to_string(), "base_price must not be negative, got -5");
    }

    #[test]
    fn test_validation_converts_to_pricing_error() {
        let validation_err = ValidationError::MustBePositive {
            field: "quantity".to_string(),
        };
        let pricing_err: PricingError = validation_err.into();
        assert!(matches!(pricing_err, PricingError::InvalidInput(_)));
    }
}
