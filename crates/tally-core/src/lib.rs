//! # tally-core: Pure Pricing Logic for Tally
//!
//! This crate is the **heart** of Tally. It holds the discount and GST
//! arithmetic of the billing system as pure functions with zero I/O.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Tally Architecture                              │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    Billing SPA (React)                          │   │
//! │  │  Invoice form ─ Client pricing ─ Branch comparison ─ Reports   │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ typed records (serde / ts-rs)          │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ tally-core (THIS CRATE) ★                       │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │  engine   │  │  totals   │  │ validation│  │   │
//! │  │   │  Client   │  │  Pricing  │  │  Invoice  │  │   rules   │  │   │
//! │  │   │ LineItem  │  │  Engine   │  │  Tally    │  │  checks   │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO LOGGING • NO AMBIENT STATE • PURE FUNCTIONS      │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                 tally-reports (Aggregation)                     │   │
//! │  │        Period summaries, branch performance, configuration      │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Input records (Subcategory, Client, InvoiceLineItem, Invoice)
//! - [`engine`] - `PricingEngine` and its per-item / per-branch results
//! - [`totals`] - Exact invoice tallies and rounded invoice totals
//! - [`money`] - Money type in minor units with half-up rounding
//! - [`error`] - Domain error types
//! - [`validation`] - Range and precision rules
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: same input, same output, safe from any thread
//! 2. **Exact Decimals In, Money Out**: arithmetic on `Decimal`, rounding once
//! 3. **Explicit Errors**: bad input is a typed error, never a silent zero
//! 4. **Explicit Parameters**: the client and catalog data are always passed in
//!
//! ## Example Usage
//!
//! ```rust
//! use rust_decimal::Decimal;
//! use tally_core::{Client, InvoiceLineItem, Money, PricingEngine};
//!
//! let engine = PricingEngine::default();
//!
//! let items = vec![
//!     InvoiceLineItem::new(Decimal::from(900), 2, Decimal::from(100), Decimal::from(162)),
//!     InvoiceLineItem::new(Decimal::from(500), 1, Decimal::ZERO, Decimal::ZERO),
//! ];
//!
//! let totals = engine.compute_invoice_totals(&items).unwrap();
//! assert_eq!(totals.grand_total, Money::from_minor(236200)); // 2362.00
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod engine;
pub mod error;
pub mod money;
pub mod totals;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use tally_core::Money` instead of
// `use tally_core::money::Money`

pub use engine::{sort_cheapest_first, BranchPricing, LinePricing, PricingEngine, PricingPolicy};
pub use error::{PricingError, PricingResult, ValidationError};
pub use money::Money;
pub use totals::{InvoiceTally, InvoiceTotals};
pub use types::*;
