//! # Pricing Engine
//!
//! The single source of truth for discount and GST arithmetic.
//!
//! ## Pipeline
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    compute_line_pricing                                 │
//! │                                                                         │
//! │  base_price ──► discount = base × (d% / 100)   (regular clients only)  │
//! │                     │                                                   │
//! │                     ▼                                                   │
//! │               discounted = base - discount                              │
//! │                     │                                                   │
//! │                     ▼                                                   │
//! │               gst = discounted × (g% / 100)                             │
//! │                     │                                                   │
//! │                     ▼                                                   │
//! │               total = discounted + gst                                  │
//! │                     │                                                   │
//! │                     ▼                                                   │
//! │          round half-up to 2 places, ONCE per output                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every caller (invoice form, client pricing view, cross-branch comparison,
//! reports) goes through [`PricingEngine`]. Nobody re-derives the formula.
//!
//! ## Example
//! ```rust
//! use rust_decimal::Decimal;
//! use tally_core::{Client, Money, PricingEngine};
//!
//! let engine = PricingEngine::default();
//! let client = Client::regular("c-1", Decimal::from(10));
//!
//! let pricing = engine
//!     .compute_line_pricing(Decimal::from(1000), Decimal::from(18), &client)
//!     .unwrap();
//!
//! assert_eq!(pricing.discount_amount, Money::from_minor(10000));
//! assert_eq!(pricing.total_price, Money::from_minor(106200));
//! ```

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{PricingError, PricingResult, ValidationError};
use crate::money::Money;
use crate::totals::{round_money, InvoiceTally, InvoiceTotals};
use crate::types::{BranchCatalogEntry, Client, InvoiceLineItem, Subcategory};
use crate::validation::{validate_percentage, validate_price, validate_quantity};

// =============================================================================
// Policy
// =============================================================================

/// Knobs that change how strictly the engine treats its inputs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricingPolicy {
    /// Reject non-regular clients that carry a non-zero discount
    /// percentage instead of ignoring the stray value.
    #[serde(default)]
    pub strict_client_validation: bool,
}

// =============================================================================
// Results
// =============================================================================

/// Per-item breakdown for one catalog price and one client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct LinePricing {
    #[ts(as = "String")]
    pub base_price: Money,
    #[ts(as = "String")]
    pub discount_amount: Money,
    #[ts(as = "String")]
    pub discounted_price: Money,
    #[ts(as = "String")]
    pub gst_amount: Money,
    #[ts(as = "String")]
    pub total_price: Money,
    /// The GST percentage the breakdown was computed with.
    #[ts(as = "String")]
    pub gst_rate: Decimal,
}

/// One branch's price for a service, as seen by a specific client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct BranchPricing {
    pub branch_id: String,
    #[serde(flatten)]
    pub pricing: LinePricing,
    /// `discounted_price × (1 + gst_rate / 100)`.
    #[ts(as = "String")]
    pub total_with_gst: Money,
    /// What the client saves against the base price.
    #[ts(as = "String")]
    pub savings: Money,
    /// True for the client's home branch.
    pub is_client_branch: bool,
}

/// Sorts branch prices cheapest first (ties broken by branch id).
///
/// [`PricingEngine::compute_cross_branch_pricing`] keeps input order;
/// callers that want a ranking call this explicitly.
pub fn sort_cheapest_first(pricings: &mut [BranchPricing]) {
    pricings.sort_by(|a, b| {
        a.total_with_gst
            .cmp(&b.total_with_gst)
            .then_with(|| a.branch_id.cmp(&b.branch_id))
    });
}

/// Unrounded line values, kept internal so rounding happens in one place.
#[derive(Debug, Clone, Copy)]
struct ExactLine {
    base: Decimal,
    discount: Decimal,
    discounted: Decimal,
    gst: Decimal,
    total: Decimal,
}

// =============================================================================
// Engine
// =============================================================================

/// Pure pricing calculator.
///
/// Holds only its [`PricingPolicy`], is `Copy`, and can be shared across
/// threads or tasks freely.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PricingEngine {
    policy: PricingPolicy,
}

impl PricingEngine {
    pub const fn new(policy: PricingPolicy) -> Self {
        PricingEngine { policy }
    }

    /// An engine that rejects stray discounts on non-regular clients.
    pub const fn strict() -> Self {
        PricingEngine {
            policy: PricingPolicy {
                strict_client_validation: true,
            },
        }
    }

    #[inline]
    pub fn policy(&self) -> PricingPolicy {
        self.policy
    }

    // =========================================================================
    // Line Pricing
    // =========================================================================

    /// Prices one catalog item for one client.
    ///
    /// ## Errors
    /// - `InvalidInput` for a negative or sub-paisa `base_price`, or a
    ///   `gst_rate` / `discount_percentage` outside `[0, 100]`
    /// - `ClientState` for a non-regular client with a discount, strict
    ///   policy only
    pub fn compute_line_pricing(
        &self,
        base_price: Decimal,
        gst_rate: Decimal,
        client: &Client,
    ) -> PricingResult<LinePricing> {
        let exact = self.exact_line(base_price, gst_rate, client)?;
        round_line(&exact, gst_rate)
    }

    /// Prices a catalog subcategory for a client.
    ///
    /// The whole subcategory is validated first, so a bad name or catalog
    /// discount rate is reported even though neither enters the price.
    pub fn price_subcategory(
        &self,
        subcategory: &Subcategory,
        client: &Client,
    ) -> PricingResult<LinePricing> {
        subcategory.validate()?;
        let price = subcategory.catalog_price();
        self.compute_line_pricing(price.base_price, price.gst_rate, client)
    }

    /// The pre-tax price a client pays per unit ("your price").
    pub fn client_unit_price(&self, base_price: Decimal, client: &Client) -> PricingResult<Money> {
        let exact = self.exact_line(base_price, Decimal::ZERO, client)?;
        round_money("discounted_price", exact.discounted)
    }

    // =========================================================================
    // Invoice Totals
    // =========================================================================

    /// Aggregates invoice lines into rounded totals.
    ///
    /// ## Errors
    /// - `EmptyInvoice` for an empty slice
    /// - `InvalidInput` for a zero quantity or a negative amount
    pub fn compute_invoice_totals(&self, items: &[InvoiceLineItem]) -> PricingResult<InvoiceTotals> {
        self.tally(items)?.round()
    }

    /// Exact sums of a non-empty invoice, for callers that merge many
    /// invoices before rounding.
    pub fn tally(&self, items: &[InvoiceLineItem]) -> PricingResult<InvoiceTally> {
        if items.is_empty() {
            return Err(PricingError::EmptyInvoice);
        }
        InvoiceTally::from_items(items)
    }

    /// The printed "item total": `unit_price × quantity - discount + gst`.
    pub fn compute_line_amount(&self, item: &InvoiceLineItem) -> PricingResult<Money> {
        Ok(InvoiceTally::from_item(item)?.round()?.grand_total)
    }

    /// Builds the snapshot line for a new invoice.
    ///
    /// The line keeps the catalog `base_price` as its unit price and stores
    /// the client discount and GST for the whole quantity, each rounded to
    /// paise once, since a persisted line holds currency amounts.
    pub fn draft_line_item(
        &self,
        subcategory: &Subcategory,
        client: &Client,
        quantity: u32,
    ) -> PricingResult<InvoiceLineItem> {
        subcategory.validate()?;
        validate_quantity(quantity)?;

        let exact = self.exact_line(subcategory.base_price, subcategory.gst_rate, client)?;
        let qty = Decimal::from(quantity);

        let discount_amount = exact
            .discount
            .checked_mul(qty)
            .ok_or_else(|| PricingError::from(ValidationError::overflow("discount_amount")))
            .and_then(|amount| round_money("discount_amount", amount))?;
        let gst_amount = exact
            .gst
            .checked_mul(qty)
            .ok_or_else(|| PricingError::from(ValidationError::overflow("gst_amount")))
            .and_then(|amount| round_money("gst_amount", amount))?;

        Ok(InvoiceLineItem {
            unit_price: exact.base,
            quantity,
            discount_amount: discount_amount.to_decimal(),
            gst_amount: gst_amount.to_decimal(),
            subcategory_name: Some(subcategory.name.clone()),
            category_name: None,
        })
    }

    // =========================================================================
    // Cross-Branch Comparison
    // =========================================================================

    /// Prices the same service across branches for one client.
    ///
    /// Output order follows input order. The first invalid entry fails the
    /// whole comparison.
    pub fn compute_cross_branch_pricing<'a, I>(
        &self,
        entries: I,
        client: &Client,
    ) -> PricingResult<Vec<BranchPricing>>
    where
        I: IntoIterator<Item = &'a BranchCatalogEntry>,
    {
        entries
            .into_iter()
            .map(|entry| self.branch_pricing(entry, client))
            .collect()
    }

    fn branch_pricing(
        &self,
        entry: &BranchCatalogEntry,
        client: &Client,
    ) -> PricingResult<BranchPricing> {
        let gst_rate = entry.price.gst_rate;
        let exact = self.exact_line(entry.price.base_price, gst_rate, client)?;
        let pricing = round_line(&exact, gst_rate)?;

        let multiplier = Decimal::ONE
            .checked_add(percent_of(Decimal::ONE, gst_rate, "gst_rate")?)
            .ok_or_else(|| ValidationError::overflow("gst_rate"))?;
        let total_with_gst = exact
            .discounted
            .checked_mul(multiplier)
            .ok_or_else(|| ValidationError::overflow("total_with_gst"))?;

        Ok(BranchPricing {
            branch_id: entry.branch_id.clone(),
            total_with_gst: round_money("total_with_gst", total_with_gst)?,
            savings: pricing.base_price - pricing.discounted_price,
            is_client_branch: client.branch_id.as_deref() == Some(entry.branch_id.as_str()),
            pricing,
        })
    }

    // =========================================================================
    // Internals
    // =========================================================================

    /// Validates inputs and runs the pipeline without rounding.
    fn exact_line(
        &self,
        base_price: Decimal,
        gst_rate: Decimal,
        client: &Client,
    ) -> PricingResult<ExactLine> {
        validate_price("base_price", base_price)?;
        validate_percentage("gst_rate", gst_rate)?;
        let discount_pct = self.applicable_discount(client)?;

        let discount = percent_of(base_price, discount_pct, "discount_amount")?;
        let discounted = base_price
            .checked_sub(discount)
            .ok_or_else(|| ValidationError::overflow("discounted_price"))?;
        let gst = percent_of(discounted, gst_rate, "gst_amount")?;
        let total = discounted
            .checked_add(gst)
            .ok_or_else(|| ValidationError::overflow("total_price"))?;

        Ok(ExactLine {
            base: base_price,
            discount,
            discounted,
            gst,
            total,
        })
    }

    /// The discount percentage to apply, after policy checks.
    fn applicable_discount(&self, client: &Client) -> PricingResult<Decimal> {
        validate_percentage("discount_percentage", client.discount_percentage)?;

        if self.policy.strict_client_validation && client.has_stray_discount() {
            return Err(PricingError::ClientState {
                client_id: client.id.clone(),
                discount_percentage: client.discount_percentage,
            });
        }

        Ok(client.effective_discount_percentage())
    }
}

// =============================================================================
// Helpers
// =============================================================================

/// `amount × (pct / 100)`, exact.
fn percent_of(amount: Decimal, pct: Decimal, field: &str) -> PricingResult<Decimal> {
    amount
        .checked_mul(pct)
        .and_then(|scaled| scaled.checked_div(Decimal::ONE_HUNDRED))
        .ok_or_else(|| ValidationError::overflow(field).into())
}

fn round_line(exact: &ExactLine, gst_rate: Decimal) -> PricingResult<LinePricing> {
    Ok(LinePricing {
        base_price: round_money("base_price", exact.base)?,
        discount_amount: round_money("discount_amount", exact.discount)?,
        discounted_price: round_money("discounted_price", exact.discounted)?,
        gst_amount: round_money("gst_amount", exact.gst)?,
        total_price: round_money("total_price", exact.total)?,
        gst_rate,
    })
}

// =============================================================================
// Unit Tests
// =============================================================================
