//! # Validation Module
//!
//! Input validation for values entering the pricing engine.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: SPA forms (JavaScript)                                       │
//! │  ├── Basic format checks (empty, numeric)                              │
//! │  └── Immediate user feedback                                           │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Deserialization (serde)                                      │
//! │  ├── Type validation (decimal, unsigned quantity)                      │
//! │  └── THIS MODULE: range + precision rules                              │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: PricingEngine                                                │
//! │  └── Calls these validators before any arithmetic                      │
//! │                                                                         │
//! │  A value that fails here never reaches a total.                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use rust_decimal::Decimal;
//! use tally_core::validation::{validate_percentage, validate_quantity};
//!
//! assert!(validate_percentage("gst_rate", Decimal::from(18)).is_ok());
//! assert!(validate_quantity(0).is_err());
//! ```

use rust_decimal::Decimal;

use crate::error::ValidationError;
use crate::money::MINOR_UNIT_SCALE;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Longest accepted subcategory name.
pub const MAX_NAME_LEN: usize = 200;

/// Longest accepted entity identifier.
pub const MAX_IDENTIFIER_LEN: usize = 64;

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a catalog price.
///
/// ## Rules
/// - Must be non-negative (zero is a free service)
/// - At most two fractional digits (minor-unit precision)
///
/// ## Example
/// ```rust
/// use rust_decimal::Decimal;
/// use tally_core::validation::validate_price;
///
/// assert!(validate_price("base_price", Decimal::new(109950, 2)).is_ok()); // 1099.50
/// assert!(validate_price("base_price", Decimal::new(-5, 0)).is_err());
/// assert!(validate_price("base_price", Decimal::new(10005, 3)).is_err()); // 10.005
/// ```
pub fn validate_price(field: &str, value: Decimal) -> ValidationResult<()> {
    validate_non_negative(field, value)?;

    if value.normalize().scale() > MINOR_UNIT_SCALE {
        return Err(ValidationError::TooPrecise {
            field: field.to_string(),
            max_scale: MINOR_UNIT_SCALE,
            value,
        });
    }

    Ok(())
}

/// Validates a currency amount that may carry sub-paisa precision.
///
/// Line items drafted from a discounted price keep their exact value
/// (`333.335`) so that rounding happens once, at aggregation.
pub fn validate_non_negative(field: &str, value: Decimal) -> ValidationResult<()> {
    if value.is_sign_negative() && !value.is_zero() {
        return Err(ValidationError::Negative {
            field: field.to_string(),
            value,
        });
    }

    Ok(())
}

/// Validates a percentage (GST rate, discount percentage).
///
/// ## Rules
/// - Must be within `[0, 100]`, both ends inclusive
///
/// ## User Workflow
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │  Subcategory form: GST rate                                             │
/// │                                                                         │
/// │  User enters: 101                                                       │
/// │       │                                                                 │
/// │       ▼                                                                 │
/// │  validate_percentage("gst_rate", 101) ← THIS FUNCTION                  │
/// │       │                                                                 │
/// │       ├── < 0 or > 100? → Error: "gst_rate must be between 0 and 100"  │
/// │       │                                                                 │
/// │       └── OK → value is used as a rate                                 │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
pub fn validate_percentage(field: &str, value: Decimal) -> ValidationResult<()> {
    if value < Decimal::ZERO || value > Decimal::ONE_HUNDRED {
        return Err(ValidationError::OutOfRange {
            field: field.to_string(),
            min: Decimal::ZERO,
            max: Decimal::ONE_HUNDRED,
            value,
        });
    }

    Ok(())
}

/// Validates a line item quantity.
///
/// ## Rules
/// - Must be at least 1
pub fn validate_quantity(qty: u32) -> ValidationResult<()> {
    if qty == 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// String Validators
// =============================================================================

/// Validates a subcategory (service) name.
///
/// ## Rules
/// - Must not be empty
/// - Must be at most 200 characters
pub fn validate_name(field: &str, name: &str) -> ValidationResult<()> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    if name.chars().count() > MAX_NAME_LEN {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max: MAX_NAME_LEN,
        });
    }

    Ok(())
}

/// Validates an entity identifier (client, branch, invoice).
///
/// The backend hands out opaque ids (document ids, UUIDs), so only the
/// shape is checked.
///
/// ## Rules
/// - Must not be empty
/// - At most 64 characters
/// - Only letters, digits, hyphens and underscores
///
/// ## Example
/// ```rust
/// use tally_core::validation::validate_identifier;
///
/// assert!(validate_identifier("client_id", "64f1c2a9e4b0a1b2c3d4e5f6").is_ok());
/// assert!(validate_identifier("client_id", "").is_err());
/// assert!(validate_identifier("client_id", "has space").is_err());
/// ```
pub fn validate_identifier(field: &str, id: &str) -> ValidationResult<()> {
    if id.trim().is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    if id.len() > MAX_IDENTIFIER_LEN {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max: MAX_IDENTIFIER_LEN,
        });
    }

    if !id
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        return Err(ValidationError::InvalidFormat {
            field: field.to_string(),
            reason: "must contain only letters, numbers, hyphens, and underscores".to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
