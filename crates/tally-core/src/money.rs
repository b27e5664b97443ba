//! # Money Module
//!
//! Provides the `Money` type for rounded monetary results.
//!
//! ## Exact Inputs, Rounded Outputs
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE PER-STEP ROUNDING PROBLEM                                          │
//! │                                                                         │
//! │  Rounding every intermediate value with toFixed(2):                     │
//! │    3 × 333.335 → 3 × 333.34 = 1000.02  ❌ WRONG!                        │
//! │                                                                         │
//! │  OUR SOLUTION: exact Decimal math, round once                           │
//! │    3 × 333.335 = 1000.005 → 1000.01                                     │
//! │                                                                         │
//! │  Decimal   = intermediate arithmetic (never rounded)                   │
//! │  Money     = final answer in minor units (paise), rounded half-up      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use rust_decimal::Decimal;
//! use tally_core::money::Money;
//!
//! let price = Money::from_minor(106200); // 1062.00
//! assert_eq!(price.to_decimal(), Decimal::new(106200, 2));
//!
//! // Rounding happens exactly once, half-up
//! let rounded = Money::round_half_up(Decimal::new(1000005, 3)).unwrap();
//! assert_eq!(rounded.minor(), 100001); // 1000.01
//! ```

use std::fmt;
use std::iter::Sum;
use std::ops::{Add, Mul, Sub};

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

/// Number of fractional digits in the currency's minor unit.
pub const MINOR_UNIT_SCALE: u32 = 2;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in the smallest currency unit (paise for INR).
///
/// ## Design Decisions
/// - **i64 (signed)**: totals like `subtotal - discount + gst` may go negative
///   when a hand-entered discount exceeds the line price
/// - **Single field tuple struct**: Zero-cost abstraction over i64
/// - **Serialized as a decimal string** (`"1062.00"`) so the SPA never sees
///   a binary float
///
/// ## Where Money is Used
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │  Subcategory.base_price (Decimal) ──► LinePricing.total_price (Money)   │
/// │                                                                         │
/// │  InvoiceLineItem (Decimal) ──► InvoiceTally (Decimal) ──► InvoiceTotals │
/// │                                                           (Money)       │
/// │                                                                         │
/// │  Every number the engine hands back flows through this type            │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from minor units.
    ///
    /// ## Example
    /// ```rust
    /// use tally_core::money::Money;
    ///
    /// let price = Money::from_minor(1099); // Represents 10.99
    /// assert_eq!(price.minor(), 1099);
    /// ```
    #[inline]
    pub const fn from_minor(minor: i64) -> Self {
        Money(minor)
    }

    /// Rounds an exact decimal amount to the minor unit, half-up.
    ///
    /// Ties round away from zero, which is half-up for the non-negative
    /// amounts the engine produces. Returns `None` when the amount does not
    /// fit in an `i64` count of minor units.
    ///
    /// ## Example
    /// ```rust
    /// use rust_decimal::Decimal;
    /// use tally_core::money::Money;
    ///
    /// let m = Money::round_half_up(Decimal::new(12345, 3)).unwrap(); // 12.345
    /// assert_eq!(m.minor(), 1235); // 12.35
    /// ```
    pub fn round_half_up(amount: Decimal) -> Option<Money> {
        let rounded =
            amount.round_dp_with_strategy(MINOR_UNIT_SCALE, RoundingStrategy::MidpointAwayFromZero);
        rounded
            .checked_mul(Decimal::ONE_HUNDRED)?
            .to_i64()
            .map(Money)
    }

    /// Converts an amount that is already at minor-unit precision.
    ///
    /// Returns `None` for values with more than two fractional digits
    /// instead of silently rounding them.
    pub fn from_exact(amount: Decimal) -> Option<Money> {
        if amount.normalize().scale() > MINOR_UNIT_SCALE {
            return None;
        }
        amount
            .checked_mul(Decimal::ONE_HUNDRED)?
            .to_i64()
            .map(Money)
    }

    /// Returns the value in minor units.
    #[inline]
    pub const fn minor(&self) -> i64 {
        self.0
    }

    /// Returns the major unit portion (truncated toward zero).
    #[inline]
    pub const fn major(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the minor unit portion (always 0-99).
    #[inline]
    pub const fn minor_part(&self) -> i64 {
        (self.0 % 100).abs()
    }

    /// Returns the value as a decimal with exactly two fractional digits.
    ///
    /// ## Example
    /// ```rust
    /// use tally_core::money::Money;
    ///
    /// assert_eq!(Money::from_minor(50000).to_decimal().to_string(), "500.00");
    /// ```
    #[inline]
    pub fn to_decimal(&self) -> Decimal {
        Decimal::new(self.0, MINOR_UNIT_SCALE)
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    /// Checks if the value is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Returns the absolute value.
    #[inline]
    pub const fn abs(&self) -> Self {
        Money(self.0.abs())
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Plain `1234.50` rendering for logs and debugging.
///
/// ## Note
/// Currency symbols and digit grouping (`₹1,234.50`) belong to the
/// display layer, which knows the locale.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{}{}.{:02}", sign, self.major().abs(), self.minor_part())
    }
}

impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

impl Serialize for Money {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        Serialize::serialize(&self.to_decimal(), serializer)
    }
}

impl<'de> Deserialize<'de> for Money {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let amount = <Decimal as Deserialize>::deserialize(deserializer)?;
        Money::from_exact(amount).ok_or_else(|| {
            de::Error::custom(format!(
                "money amount {} must have at most {} decimal places",
                amount, MINOR_UNIT_SCALE
            ))
        })
    }
}

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0 + other.0)
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0 - other.0)
    }
}

/// Multiplication by a quantity.
impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i64) -> Self {
        Money(self.0 * qty)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), Add::add)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    #[test]
    fn test_from_minor() {
        let money = Money::from_minor(1099);
        assert_eq!(money.minor(), 1099);
        assert_eq!(money.major(), 10);
        assert_eq!(money.minor_part(), 99);
    }

    #[test]
    fn test_display() {
        assert_eq!(Money::from_minor(106200).to_string(), "1062.00");
        assert_eq!(Money::from_minor(5).to_string(), "0.05");
        assert_eq!(Money::from_minor(-550).to_string(), "-5.50");
        assert_eq!(Money::zero().to_string(), "0.00");
    }

    #[test]
    fn test_round_half_up() {
        assert_eq!(Money::round_half_up(dec("12.345")).unwrap().minor(), 1235);
        assert_eq!(Money::round_half_up(dec("12.344999")).unwrap().minor(), 1234);
        assert_eq!(Money::round_half_up(dec("0.005")).unwrap().minor(), 1);
        assert_eq!(Money::round_half_up(dec("0.004")).unwrap().minor(), 0);
        // Not bankers rounding: 0.125 goes up, not to the even 0.12
        assert_eq!(Money::round_half_up(dec("0.125")).unwrap().minor(), 13);
    }

    #[test]
    fn test_round_half_up_overflow() {
        assert!(Money::round_half_up(Decimal::MAX).is_none());
    }

    #[test]
    fn test_from_exact_rejects_sub_minor_precision() {
        assert_eq!(Money::from_exact(dec("10.50")).unwrap().minor(), 1050);
        assert_eq!(Money::from_exact(dec("10.5000")).unwrap().minor(), 1050);
        assert!(Money::from_exact(dec("10.005")).is_none());
    }

    #[test]
    fn test_to_decimal_keeps_two_places() {
        assert_eq!(Money::from_minor(50000).to_decimal().to_string(), "500.00");
        assert_eq!(Money::from_minor(7).to_decimal(), dec("0.07"));
    }

    #[test]
    fn test_arithmetic() {
        let a = Money::from_minor(1000);
        let b = Money::from_minor(500);

        assert_eq!((a + b).minor(), 1500);
        assert_eq!((a - b).minor(), 500);
        assert_eq!((a * 3).minor(), 3000);

        let total: Money = vec![a, b, b].into_iter().sum();
        assert_eq!(total.minor(), 2000);
    }

    #[test]
    fn test_serde_as_decimal_string() {
        let json = serde_json::to_string(&Money::from_minor(106200)).unwrap();
        assert_eq!(json, "\"1062.00\"");

        let back: Money = serde_json::from_str("\"1062.00\"").unwrap();
        assert_eq!(back.minor(), 106200);

        assert!(serde_json::from_str::<Money>("\"1.001\"").is_err());
    }

    #[test]
    fn test_zero_and_checks() {
        assert!(Money::zero().is_zero());
        assert!(!Money::from_minor(-1).is_zero());
        assert_eq!(Money::from_minor(-550).abs().minor(), 550);
    }
}
