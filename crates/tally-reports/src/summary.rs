//! # Period Summary
//!
//! Headline figures for the invoices issued in a period.
//!
//! ## Aggregation Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        summarize_period                                 │
//! │                                                                         │
//! │   invoices ──► InvoiceFilter::matches? ──► engine.tally(items)          │
//! │                                                   │                     │
//! │                                                   ▼                     │
//! │                              period tally = merge(invoice tallies)      │
//! │                                                   │                     │
//! │                                                   ▼                     │
//! │                      round once ──► totalAmount, averageInvoiceValue    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Exact tallies are merged across invoices, so the period total is the
//! rounded sum of exact invoice grand totals and never a sum of rounded ones.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tally_core::{Invoice, InvoiceTally, Money, PricingEngine};
use tracing::{debug, info};
use ts_rs::TS;

use crate::error::{ReportError, ReportResult};
use crate::filter::InvoiceFilter;

// =============================================================================
// Period Summary
// =============================================================================

/// Headline figures of an invoice report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct PeriodSummary {
    pub total_invoices: usize,
    #[ts(as = "String")]
    pub total_amount: Money,
    /// Number of line items across all invoices.
    pub total_items: usize,
    pub paid_invoices: usize,
    pub pending_invoices: usize,
    #[ts(as = "String")]
    pub average_invoice_value: Money,
}

/// Summarizes the invoices that pass `filter`.
///
/// ## Errors
/// - `Pricing` naming the first invoice that cannot be priced, including
///   invoices with no line items or a malformed identifier
/// - `Overflow` if the period total leaves the decimal range
pub fn summarize_period(
    engine: &PricingEngine,
    invoices: &[Invoice],
    filter: &InvoiceFilter,
) -> ReportResult<PeriodSummary> {
    let mut period = InvoiceTally::empty();
    let mut total_invoices = 0usize;
    let mut paid_invoices = 0usize;

    for invoice in invoices.iter().filter(|invoice| filter.matches(invoice)) {
        invoice
            .validate_refs()
            .map_err(|e| ReportError::pricing(&invoice.id, e.into()))?;
        let tally = engine
            .tally(&invoice.items)
            .map_err(|e| ReportError::pricing(&invoice.id, e))?;
        period = period
            .merge(tally)
            .map_err(|e| ReportError::pricing(&invoice.id, e))?;

        total_invoices += 1;
        if invoice.is_paid() {
            paid_invoices += 1;
        }
    }

    let total = period
        .grand_total()
        .map_err(|_| ReportError::overflow("total_amount"))?;
    let summary = PeriodSummary {
        total_invoices,
        total_amount: round_figure("total_amount", total)?,
        total_items: period.line_count(),
        paid_invoices,
        pending_invoices: total_invoices - paid_invoices,
        average_invoice_value: average("average_invoice_value", total, total_invoices)?,
    };

    debug!(skipped = invoices.len() - total_invoices, "Invoices filtered out");
    info!(
        invoices = summary.total_invoices,
        total = %summary.total_amount,
        "Period summary computed"
    );

    Ok(summary)
}

// =============================================================================
// Helpers
// =============================================================================

/// Rounds a report figure half-up to Money.
pub(crate) fn round_figure(field: &str, amount: Decimal) -> ReportResult<Money> {
    Money::round_half_up(amount).ok_or_else(|| ReportError::overflow(field))
}

/// `total / count` rounded once, zero when there is nothing to average.
pub(crate) fn average(field: &str, total: Decimal, count: usize) -> ReportResult<Money> {
    if count == 0 {
        return Ok(Money::zero());
    }
    let mean = total
        .checked_div(Decimal::from(count))
        .ok_or_else(|| ReportError::overflow(field))?;
    round_figure(field, mean)
}

/// Adds `amount` into `acc`, naming `field` on overflow.
pub(crate) fn accumulate(acc: &mut Decimal, amount: Decimal, field: &str) -> ReportResult<()> {
    *acc = acc
        .checked_add(amount)
        .ok_or_else(|| ReportError::overflow(field))?;
    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
