//! # Invoice Filters
//!
//! Selects the invoices a report covers.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  InvoiceFilter::default()          every invoice                        │
//! │    .in_period(DateRange)           issued_at in [start, end)            │
//! │    .for_branch("b-1")              branch_id == "b-1"                   │
//! │    .for_client("c-7")              client_id == "c-7"                   │
//! │    .with_status(Paid)              payment_status == Paid               │
//! │                                                                         │
//! │  All set conditions must hold.                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Utc};
use tally_core::{Invoice, PaymentStatus};

use crate::error::{ReportError, ReportResult};

// =============================================================================
// Date Range
// =============================================================================

/// A half-open period `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

impl DateRange {
    /// Creates a range. `start == end` is a valid, empty range.
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> ReportResult<Self> {
        if end < start {
            return Err(ReportError::InvalidPeriod(format!(
                "end {} is before start {}",
                end, start
            )));
        }
        Ok(DateRange { start, end })
    }

    #[inline]
    pub fn start(&self) -> DateTime<Utc> {
        self.start
    }

    #[inline]
    pub fn end(&self) -> DateTime<Utc> {
        self.end
    }

    /// Whether `at` falls inside the range.
    #[inline]
    pub fn contains(&self, at: DateTime<Utc>) -> bool {
        self.start <= at && at < self.end
    }
}

// =============================================================================
// Invoice Filter
// =============================================================================

/// Conditions an invoice must meet to enter a report.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InvoiceFilter {
    pub period: Option<DateRange>,
    pub branch_id: Option<String>,
    pub client_id: Option<String>,
    pub payment_status: Option<PaymentStatus>,
}

impl InvoiceFilter {
    pub fn in_period(mut self, period: DateRange) -> Self {
        self.period = Some(period);
        self
    }

    pub fn for_branch(mut self, branch_id: impl Into<String>) -> Self {
        self.branch_id = Some(branch_id.into());
        self
    }

    pub fn for_client(mut self, client_id: impl Into<String>) -> Self {
        self.client_id = Some(client_id.into());
        self
    }

    pub fn with_status(mut self, status: PaymentStatus) -> Self {
        self.payment_status = Some(status);
        self
    }

    /// Whether `invoice` meets every set condition.
    pub fn matches(&self, invoice: &Invoice) -> bool {
        self.period.map_or(true, |p| p.contains(invoice.issued_at))
            && self
                .branch_id
                .as_deref()
                .map_or(true, |id| id == invoice.branch_id)
            && self
                .client_id
                .as_deref()
                .map_or(true, |id| id == invoice.client_id)
            && self
                .payment_status
                .map_or(true, |status| status == invoice.payment_status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn day(d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, d, 10, 0, 0).unwrap()
    }

    fn invoice(branch: &str, client: &str, d: u32, status: PaymentStatus) -> Invoice {
        Invoice {
            id: "inv-1".to_string(),
            branch_id: branch.to_string(),
            client_id: client.to_string(),
            issued_at: day(d),
            payment_status: status,
            items: vec![],
        }
    }

    #[test]
    fn test_date_range() {
        let range = DateRange::new(day(1), day(10)).unwrap();
        assert!(range.contains(day(1)));
        assert!(range.contains(day(9)));
        assert!(!range.contains(day(10)));

        assert!(matches!(
            DateRange::new(day(10), day(1)),
            Err(ReportError::InvalidPeriod(_))
        ));
        assert!(!DateRange::new(day(3), day(3)).unwrap().contains(day(3)));
    }

    #[test]
    fn test_default_filter_matches_everything() {
        let filter = InvoiceFilter::default();
        assert!(filter.matches(&invoice("b-1", "c-1", 1, PaymentStatus::Paid)));
        assert!(filter.matches(&invoice("b-2", "c-9", 28, PaymentStatus::Pending)));
    }

    #[test]
    fn test_conditions_combine() {
        let filter = InvoiceFilter::default()
            .in_period(DateRange::new(day(1), day(15)).unwrap())
            .for_branch("b-1")
            .for_client("c-1")
            .with_status(PaymentStatus::Paid);

        assert!(filter.matches(&invoice("b-1", "c-1", 5, PaymentStatus::Paid)));
        assert!(!filter.matches(&invoice("b-2", "c-1", 5, PaymentStatus::Paid)));
        assert!(!filter.matches(&invoice("b-1", "c-2", 5, PaymentStatus::Paid)));
        assert!(!filter.matches(&invoice("b-1", "c-1", 5, PaymentStatus::Pending)));
        assert!(!filter.matches(&invoice("b-1", "c-1", 20, PaymentStatus::Paid)));
    }
}
