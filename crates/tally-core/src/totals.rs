//! # Invoice Totals
//!
//! Exact running sums over invoice lines, and their rounded form.
//!
//! ## Why Two Types?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  InvoiceTally (Decimal, exact)      InvoiceTotals (Money, rounded)      │
//! │  ──────────────────────────────     ──────────────────────────────      │
//! │  subtotal      = Σ unit × qty  ──►  subtotal                            │
//! │  total_discount = Σ discount   ──►  total_discount                      │
//! │  total_gst     = Σ gst         ──►  total_gst                           │
//! │                                     grand_total = subtotal              │
//! │                                       - total_discount + total_gst      │
//! │                                                                         │
//! │  tally(A ++ B) == tally(A).merge(tally(B))      (always)                │
//! │  round(tally(A ++ B)) == round(merge(...))      (always)                │
//! │  round(A) + round(B)                            (NOT the same!)         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Aggregators that combine many partial results (report periods, branch
//! roll-ups) merge tallies and round once at the very end.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{PricingResult, ValidationError};
use crate::money::Money;
use crate::types::InvoiceLineItem;
use crate::validation::{validate_non_negative, validate_quantity};

// =============================================================================
// Invoice Tally
// =============================================================================

/// Unrounded invoice sums.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InvoiceTally {
    subtotal: Decimal,
    total_discount: Decimal,
    total_gst: Decimal,
    line_count: usize,
}

impl InvoiceTally {
    /// The tally of nothing. Identity element for [`merge`](Self::merge).
    pub const fn empty() -> Self {
        InvoiceTally {
            subtotal: Decimal::ZERO,
            total_discount: Decimal::ZERO,
            total_gst: Decimal::ZERO,
            line_count: 0,
        }
    }

    /// Tallies a single validated line.
    ///
    /// ## Rules
    /// - `quantity >= 1`
    /// - `unit_price`, `discount_amount`, `gst_amount` non-negative
    pub fn from_item(item: &InvoiceLineItem) -> PricingResult<Self> {
        validate_quantity(item.quantity)?;
        validate_non_negative("unit_price", item.unit_price)?;
        validate_non_negative("discount_amount", item.discount_amount)?;
        validate_non_negative("gst_amount", item.gst_amount)?;

        let subtotal = item
            .unit_price
            .checked_mul(Decimal::from(item.quantity))
            .ok_or_else(|| ValidationError::overflow("unit_price"))?;

        Ok(InvoiceTally {
            subtotal,
            total_discount: item.discount_amount,
            total_gst: item.gst_amount,
            line_count: 1,
        })
    }

    /// Tallies every line of a sequence (which may be empty).
    pub fn from_items<'a, I>(items: I) -> PricingResult<Self>
    where
        I: IntoIterator<Item = &'a InvoiceLineItem>,
    {
        items
            .into_iter()
            .try_fold(InvoiceTally::empty(), |acc, item| {
                acc.merge(InvoiceTally::from_item(item)?)
            })
    }

    /// Combines two tallies. Associative and commutative.
    pub fn merge(self, other: InvoiceTally) -> PricingResult<Self> {
        Ok(InvoiceTally {
            subtotal: checked_add(self.subtotal, other.subtotal, "subtotal")?,
            total_discount: checked_add(
                self.total_discount,
                other.total_discount,
                "total_discount",
            )?,
            total_gst: checked_add(self.total_gst, other.total_gst, "total_gst")?,
            line_count: self.line_count + other.line_count,
        })
    }

    #[inline]
    pub fn subtotal(&self) -> Decimal {
        self.subtotal
    }

    #[inline]
    pub fn total_discount(&self) -> Decimal {
        self.total_discount
    }

    #[inline]
    pub fn total_gst(&self) -> Decimal {
        self.total_gst
    }

    /// Number of line items tallied.
    #[inline]
    pub fn line_count(&self) -> usize {
        self.line_count
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.line_count == 0
    }

    /// `subtotal - total_discount + total_gst`, exact.
    pub fn grand_total(&self) -> PricingResult<Decimal> {
        self.subtotal
            .checked_sub(self.total_discount)
            .and_then(|net| net.checked_add(self.total_gst))
            .ok_or_else(|| ValidationError::overflow("grand_total").into())
    }

    /// Rounds the three sums half-up to two places, once each.
    ///
    /// The grand total is built from the rounded sums, so the printed
    /// `grand_total == subtotal - total_discount + total_gst` always holds.
    pub fn round(&self) -> PricingResult<InvoiceTotals> {
        let subtotal = round_money("subtotal", self.subtotal)?;
        let total_discount = round_money("total_discount", self.total_discount)?;
        let total_gst = round_money("total_gst", self.total_gst)?;

        let grand_total = subtotal
            .minor()
            .checked_sub(total_discount.minor())
            .and_then(|net| net.checked_add(total_gst.minor()))
            .map(Money::from_minor)
            .ok_or_else(|| ValidationError::overflow("grand_total"))?;

        Ok(InvoiceTotals {
            subtotal,
            total_discount,
            total_gst,
            grand_total,
        })
    }
}

// =============================================================================
// Invoice Totals
// =============================================================================

/// Rounded invoice aggregates, as printed on the invoice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct InvoiceTotals {
    #[ts(as = "String")]
    pub subtotal: Money,
    #[ts(as = "String")]
    pub total_discount: Money,
    #[ts(as = "String")]
    pub total_gst: Money,
    #[ts(as = "String")]
    pub grand_total: Money,
}

// =============================================================================
// Helpers
// =============================================================================

fn checked_add(a: Decimal, b: Decimal, field: &str) -> PricingResult<Decimal> {
    a.checked_add(b)
        .ok_or_else(|| ValidationError::overflow(field).into())
}

/// Rounds an exact amount to Money, naming `field` on overflow.
pub(crate) fn round_money(field: &str, amount: Decimal) -> PricingResult<Money> {
    Money::round_half_up(amount).ok_or_else(|| ValidationError::overflow(field).into())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PricingError;

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    fn item(unit: &str, qty: u32, discount: &str, gst: &str) -> InvoiceLineItem {
        InvoiceLineItem::new(dec(unit), qty, dec(discount), dec(gst))
    }

    #[test]
    fn test_tally_single_item() {
        let tally = InvoiceTally::from_item(&item("900", 2, "100", "162")).unwrap();
        assert_eq!(tally.subtotal(), dec("1800"));
        assert_eq!(tally.total_discount(), dec("100"));
        assert_eq!(tally.total_gst(), dec("162"));
        assert_eq!(tally.grand_total().unwrap(), dec("1862"));
        assert_eq!(tally.line_count(), 1);
    }

    #[test]
    fn test_empty_is_merge_identity() {
        let tally = InvoiceTally::from_item(&item("10.5", 3, "0", "1.89")).unwrap();
        assert_eq!(tally.merge(InvoiceTally::empty()).unwrap(), tally);
        assert_eq!(InvoiceTally::empty().merge(tally).unwrap(), tally);
        assert!(InvoiceTally::from_items(Vec::<InvoiceLineItem>::new().iter())
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_rounds_once() {
        // 3 × 333.335 = 1000.005 → 1000.01 (per-item rounding would give 1000.02)
        let tally = InvoiceTally::from_item(&item("333.335", 3, "0", "0")).unwrap();
        let totals = tally.round().unwrap();
        assert_eq!(totals.subtotal, Money::from_minor(100001));
        assert_eq!(totals.grand_total, Money::from_minor(100001));
    }

    #[test]
    fn test_grand_total_adds_up_from_printed_figures() {
        // 999 less 12.5% = 124.875 discount: the exact grand total 874.125
        // would round to 874.13, the printed figures give 874.12
        let tally = InvoiceTally::from_item(&item("999", 1, "124.875", "0")).unwrap();
        let totals = tally.round().unwrap();

        assert_eq!(totals.subtotal, Money::from_minor(99900));
        assert_eq!(totals.total_discount, Money::from_minor(12488));
        assert_eq!(totals.grand_total, Money::from_minor(87412));
        assert_eq!(
            totals.grand_total,
            totals.subtotal - totals.total_discount + totals.total_gst
        );
    }

    #[test]
    fn test_rejects_bad_lines() {
        assert!(matches!(
            InvoiceTally::from_item(&item("10", 0, "0", "0")),
            Err(PricingError::InvalidInput(ValidationError::MustBePositive { .. }))
        ));
        assert!(matches!(
            InvoiceTally::from_item(&item("-10", 1, "0", "0")),
            Err(PricingError::InvalidInput(ValidationError::Negative { .. }))
        ));
        assert!(InvoiceTally::from_item(&item("10", 1, "-1", "0")).is_err());
        assert!(InvoiceTally::from_item(&item("10", 1, "0", "-1")).is_err());
    }

    #[test]
    fn test_overflow_is_an_error() {
        let huge = InvoiceLineItem::new(Decimal::MAX, 2, Decimal::ZERO, Decimal::ZERO);
        assert!(matches!(
            InvoiceTally::from_item(&huge),
            Err(PricingError::InvalidInput(ValidationError::Overflow { .. }))
        ));
    }

    #[test]
    fn test_totals_json_shape() {
        let totals = InvoiceTally::from_item(&item("500", 1, "0", "0"))
            .unwrap()
            .round()
            .unwrap();
        let value = serde_json::to_value(totals).unwrap();
        assert_eq!(value["subtotal"], "500.00");
        assert_eq!(value["totalDiscount"], "0.00");
        assert_eq!(value["totalGst"], "0.00");
        assert_eq!(value["grandTotal"], "500.00");
    }
}
