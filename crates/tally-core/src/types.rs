//! # Domain Types
//!
//! Input records handed to the pricing engine by the billing SPA.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │  Subcategory    │   │     Client      │   │    Invoice      │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  name           │   │  id             │   │  id             │       │
//! │  │  base_price     │   │  is_regular     │   │  branch_id      │       │
//! │  │  gst_rate (%)   │   │  discount (%)   │   │  client_id      │       │
//! │  │  catalog disc.  │   │  branch_id      │   │  items ─────┐   │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────┼───┘       │
//! │                                                            ▼           │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │ BranchCatalog   │   │ PaymentStatus   │   │ InvoiceLineItem │       │
//! │  │ Entry           │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  branch_id      │   │  Paid           │   │  unit_price     │       │
//! │  │  base_price     │   │  Pending        │   │  quantity       │       │
//! │  │  gst_rate       │   └─────────────────┘   │  discount_amount│       │
//! │  └─────────────────┘                         │  gst_amount     │       │
//! │                                              └─────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Rates vs Amounts
//! - `gst_rate`, `discount_percentage`: percentages in `[0, 100]`
//! - `discount_amount`, `gst_amount`: currency, already computed
//!
//! The two are never interchangeable. A line item stores amounts, a catalog
//! entry stores rates.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::validation::{
    validate_identifier, validate_name, validate_percentage, validate_price, ValidationResult,
};

// =============================================================================
// Subcategory
// =============================================================================

/// A priceable service in a branch's catalog.
///
/// Invoices snapshot `base_price` and `gst_rate` when a line is drafted,
/// so editing a subcategory never changes an existing invoice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Subcategory {
    /// Display name shown on the invoice.
    pub name: String,

    /// Price before discount and tax, at minor-unit precision.
    #[ts(as = "String")]
    pub base_price: Decimal,

    /// GST percentage (18 = 18%).
    #[ts(as = "String")]
    pub gst_rate: Decimal,

    /// Catalog-level promotion percentage, separate from any client discount.
    #[serde(default)]
    #[ts(as = "Option<String>")]
    pub catalog_discount_rate: Option<Decimal>,
}

impl Subcategory {
    /// Creates a subcategory without a catalog discount.
    pub fn new(name: impl Into<String>, base_price: Decimal, gst_rate: Decimal) -> Self {
        Subcategory {
            name: name.into(),
            base_price,
            gst_rate,
            catalog_discount_rate: None,
        }
    }

    /// Checks name, price and rate constraints.
    pub fn validate(&self) -> ValidationResult<()> {
        validate_name("name", &self.name)?;
        validate_price("base_price", self.base_price)?;
        validate_percentage("gst_rate", self.gst_rate)?;
        if let Some(rate) = self.catalog_discount_rate {
            validate_percentage("catalog_discount_rate", rate)?;
        }
        Ok(())
    }

    /// Returns the price/rate pair the engine prices from.
    pub fn catalog_price(&self) -> CatalogPrice {
        CatalogPrice {
            base_price: self.base_price,
            gst_rate: self.gst_rate,
        }
    }
}

/// Base price and GST rate of one service in one branch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CatalogPrice {
    #[ts(as = "String")]
    pub base_price: Decimal,
    #[ts(as = "String")]
    pub gst_rate: Decimal,
}

/// The same service as listed by one branch, for cross-branch comparison.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct BranchCatalogEntry {
    pub branch_id: String,
    #[serde(flatten)]
    pub price: CatalogPrice,
}

impl BranchCatalogEntry {
    pub fn new(branch_id: impl Into<String>, base_price: Decimal, gst_rate: Decimal) -> Self {
        BranchCatalogEntry {
            branch_id: branch_id.into(),
            price: CatalogPrice {
                base_price,
                gst_rate,
            },
        }
    }
}

// =============================================================================
// Client
// =============================================================================

/// A billed client and its discount eligibility.
///
/// ## Invariant
/// `discount_percentage` only means something when `is_regular` is true.
/// The engine never discounts a non-regular client, whatever is stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Client {
    pub id: String,

    #[serde(default)]
    pub name: String,

    /// Regular clients receive a standing discount on every purchase.
    pub is_regular: bool,

    /// Standing discount percentage (10 = 10%).
    #[serde(default)]
    #[ts(as = "String")]
    pub discount_percentage: Decimal,

    /// The client's home branch, if assigned.
    #[serde(default)]
    pub branch_id: Option<String>,
}

impl Client {
    /// A regular client with a standing discount.
    pub fn regular(id: impl Into<String>, discount_percentage: Decimal) -> Self {
        Client {
            id: id.into(),
            name: String::new(),
            is_regular: true,
            discount_percentage,
            branch_id: None,
        }
    }

    /// A client without discount eligibility.
    pub fn walk_in(id: impl Into<String>) -> Self {
        Client {
            id: id.into(),
            name: String::new(),
            is_regular: false,
            discount_percentage: Decimal::ZERO,
            branch_id: None,
        }
    }

    /// Sets the client's home branch.
    pub fn with_branch(mut self, branch_id: impl Into<String>) -> Self {
        self.branch_id = Some(branch_id.into());
        self
    }

    /// Discount that actually applies: the stored percentage for regular
    /// clients, zero for everyone else.
    #[inline]
    pub fn effective_discount_percentage(&self) -> Decimal {
        if self.is_regular {
            self.discount_percentage
        } else {
            Decimal::ZERO
        }
    }

    /// True when a non-regular client carries a non-zero percentage.
    #[inline]
    pub fn has_stray_discount(&self) -> bool {
        !self.is_regular && !self.discount_percentage.is_zero()
    }
}

// =============================================================================
// Invoice Line Item
// =============================================================================

/// A line on an invoice.
///
/// Uses the snapshot pattern: amounts are frozen when the line is drafted
/// and never recomputed from the live catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct InvoiceLineItem {
    /// Price per unit (may carry sub-paisa precision).
    #[ts(as = "String")]
    pub unit_price: Decimal,

    /// Units sold, at least 1.
    pub quantity: u32,

    /// Discount for the whole line, in currency.
    #[serde(default)]
    #[ts(as = "String")]
    pub discount_amount: Decimal,

    /// GST for the whole line, in currency.
    #[serde(default)]
    #[ts(as = "String")]
    pub gst_amount: Decimal,

    /// Subcategory name at time of drafting (frozen).
    #[serde(default)]
    pub subcategory_name: Option<String>,

    /// Category name at time of drafting (frozen).
    #[serde(default)]
    pub category_name: Option<String>,
}

impl InvoiceLineItem {
    /// Creates a line item from its four monetary fields.
    pub fn new(
        unit_price: Decimal,
        quantity: u32,
        discount_amount: Decimal,
        gst_amount: Decimal,
    ) -> Self {
        InvoiceLineItem {
            unit_price,
            quantity,
            discount_amount,
            gst_amount,
            subcategory_name: None,
            category_name: None,
        }
    }

    /// Attaches the category label used by branch reports.
    pub fn with_category(mut self, category_name: impl Into<String>) -> Self {
        self.category_name = Some(category_name.into());
        self
    }

    /// Attaches the subcategory label used by branch reports.
    pub fn with_subcategory(mut self, subcategory_name: impl Into<String>) -> Self {
        self.subcategory_name = Some(subcategory_name.into());
        self
    }
}

// =============================================================================
// Payment Status
// =============================================================================

/// Whether an invoice has been paid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum PaymentStatus {
    Paid,
    #[default]
    Pending,
}

// =============================================================================
// Invoice
// =============================================================================

/// A persisted invoice as read back from the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Invoice {
    pub id: String,
    pub branch_id: String,
    pub client_id: String,
    #[ts(as = "String")]
    pub issued_at: DateTime<Utc>,
    #[serde(default)]
    pub payment_status: PaymentStatus,
    pub items: Vec<InvoiceLineItem>,
}

impl Invoice {
    /// Checks the identifiers the reports group by.
    pub fn validate_refs(&self) -> ValidationResult<()> {
        validate_identifier("invoice_id", &self.id)?;
        validate_identifier("branch_id", &self.branch_id)?;
        validate_identifier("client_id", &self.client_id)?;
        Ok(())
    }

    #[inline]
    pub fn is_paid(&self) -> bool {
        self.payment_status == PaymentStatus::Paid
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
