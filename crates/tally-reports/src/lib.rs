//! # tally-reports: Invoice Reports for Tally
//!
//! Aggregates persisted invoices into the figures the reporting screens
//! show, using `tally-core` for every amount.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        tally-reports                                    │
//! │                                                                         │
//! │  ┌───────────────┐                                                      │
//! │  │  TallyConfig  │──► PricingPolicy ──► PricingEngine                   │
//! │  │  (tally.toml) │──► ReportSettings ──► PerformanceOptions             │
//! │  └───────────────┘            │                                         │
//! │                               ▼                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │   summary::summarize_period      performance::branch_performance │   │
//! │  │   count, total, average          periods / branches / categories │   │
//! │  │            ▲                     subcategories / clients         │   │
//! │  │            └──── filter::InvoiceFilter ──────┘                   │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                               │                                         │
//! │                               ▼                                         │
//! │            camelCase JSON payloads (serde / ts-rs)                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example
//! ```rust
//! use chrono::{TimeZone, Utc};
//! use rust_decimal::Decimal;
//! use tally_core::{Invoice, InvoiceLineItem, Money, PaymentStatus};
//! use tally_reports::{summarize_period, InvoiceFilter, TallyConfig};
//!
//! let config = TallyConfig::default();
//! let invoice = Invoice {
//!     id: "inv-1".into(),
//!     branch_id: "b-1".into(),
//!     client_id: "c-1".into(),
//!     issued_at: Utc.with_ymd_and_hms(2024, 3, 1, 10, 0, 0).unwrap(),
//!     payment_status: PaymentStatus::Paid,
//!     items: vec![InvoiceLineItem::new(
//!         Decimal::from(1000),
//!         1,
//!         Decimal::from(100),
//!         Decimal::from(162),
//!     )],
//! };
//!
//! let summary = summarize_period(&config.engine(), &[invoice], &InvoiceFilter::default()).unwrap();
//! assert_eq!(summary.total_amount, Money::from_minor(106200));
//! ```

pub mod config;
pub mod error;
pub mod filter;
pub mod performance;
pub mod summary;

pub use config::{ReportSettings, TallyConfig};
pub use error::{ReportError, ReportResult};
pub use filter::{DateRange, InvoiceFilter};
pub use performance::{
    branch_performance, BranchPerformance, BranchRevenue, CategoryPerformance, ClientInsights,
    ClientSpend, ClientType, Granularity, PerformanceOptions, RevenuePeriod, SubcategoryRanking,
    TopSubcategory,
};
pub use summary::{summarize_period, PeriodSummary};
