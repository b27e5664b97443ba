//! # Branch Performance
//!
//! Revenue breakdown by period, branch, category, subcategory and client.
//!
//! ## Revenue Attribution
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Invoice ─┬─► issued_at  ──────────────► RevenuePeriod (day/week/month) │
//! │           ├─► branch_id  ──────────────► BranchRevenue                  │
//! │           ├─► client_id  ──────────────► ClientSpend ─► topClients      │
//! │           │                  └─ regular? ─► clientInsights              │
//! │           └─► items ─► line amount ─┬──► CategoryPerformance            │
//! │                (exact)              │      (total, 30d / 7d / 1d)       │
//! │                                     └──► SubcategoryRanking             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every figure is summed exactly and rounded once at the end. The trailing
//! windows end at [`PerformanceOptions::as_of`], inclusive.

use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use tally_core::{Client, Invoice, Money, PricingEngine, PricingError};
use tracing::{debug, info};
use ts_rs::TS;

use crate::error::{ReportError, ReportResult};
use crate::filter::InvoiceFilter;
use crate::summary::{accumulate, average, round_figure};

/// Category label for lines drafted without one.
pub const UNCATEGORIZED: &str = "Uncategorized";

const MONTHLY_WINDOW_DAYS: i64 = 30;
const WEEKLY_WINDOW_DAYS: i64 = 7;
const DAILY_WINDOW_DAYS: i64 = 1;

// =============================================================================
// Options
// =============================================================================

/// Length of the rows in the revenue summary.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export)]
pub enum Granularity {
    Daily,
    /// ISO weeks, starting Monday.
    Weekly,
    #[default]
    Monthly,
}

impl Granularity {
    /// First day of the period containing `date`.
    pub fn period_start(self, date: NaiveDate) -> NaiveDate {
        match self {
            Granularity::Daily => date,
            Granularity::Weekly => {
                date - Duration::days(i64::from(date.weekday().num_days_from_monday()))
            }
            Granularity::Monthly => date - Duration::days(i64::from(date.day0())),
        }
    }

    /// Display label of the period starting on `start`.
    pub fn label(self, start: NaiveDate) -> String {
        match self {
            Granularity::Daily => start.format("%Y-%m-%d").to_string(),
            Granularity::Weekly => {
                let week = start.iso_week();
                format!("{}-W{:02}", week.year(), week.week())
            }
            Granularity::Monthly => start.format("%Y-%m").to_string(),
        }
    }
}

/// Which clients' invoices the report covers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "kebab-case")]
#[ts(export)]
pub enum ClientType {
    #[default]
    All,
    Regular,
    NonRegular,
}

impl ClientType {
    #[inline]
    pub fn admits(self, is_regular: bool) -> bool {
        match self {
            ClientType::All => true,
            ClientType::Regular => is_regular,
            ClientType::NonRegular => !is_regular,
        }
    }
}

/// Inputs of [`branch_performance`] besides the records themselves.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PerformanceOptions {
    pub filter: InvoiceFilter,
    pub client_type: ClientType,
    /// End of the trailing revenue windows and the "current" period.
    pub as_of: DateTime<Utc>,
    pub granularity: Granularity,
    pub top_clients: usize,
    pub top_subcategories: usize,
    /// ISO 4217 code echoed on the payload for the display layer.
    pub currency: String,
}

impl PerformanceOptions {
    pub fn new(as_of: DateTime<Utc>) -> Self {
        PerformanceOptions {
            filter: InvoiceFilter::default(),
            client_type: ClientType::All,
            as_of,
            granularity: Granularity::Monthly,
            top_clients: 10,
            top_subcategories: 10,
            currency: "INR".to_string(),
        }
    }

    /// Whether `at` lies in the `days`-long window ending at `as_of`.
    fn within(&self, days: i64, at: DateTime<Utc>) -> bool {
        self.as_of - Duration::days(days) < at && at <= self.as_of
    }
}

// =============================================================================
// Report Types
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct RevenuePeriod {
    pub period: String,
    #[ts(as = "String")]
    pub starts_on: NaiveDate,
    #[ts(as = "String")]
    pub revenue: Money,
    pub invoice_count: usize,
    #[ts(as = "String")]
    pub average_value: Money,
    /// The period contains `as_of`.
    pub is_current: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct BranchRevenue {
    pub branch_id: String,
    #[ts(as = "String")]
    pub revenue: Money,
    pub invoice_count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct TopSubcategory {
    pub name: String,
    #[ts(as = "String")]
    pub revenue: Money,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CategoryPerformance {
    pub category: String,
    #[ts(as = "String")]
    pub revenue: Money,
    #[ts(as = "String")]
    pub monthly_revenue: Money,
    #[ts(as = "String")]
    pub weekly_revenue: Money,
    #[ts(as = "String")]
    pub daily_revenue: Money,
    /// Units sold across all lines of the category.
    pub quantity_sold: u64,
    /// Best-selling named subcategory, if any line carried a name.
    pub top_subcategory: Option<TopSubcategory>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct SubcategoryRanking {
    /// 1-based.
    pub rank: usize,
    pub name: String,
    pub category: String,
    #[ts(as = "String")]
    pub revenue: Money,
    pub sales_count: u64,
    /// Revenue per unit sold.
    #[ts(as = "String")]
    pub average_price: Money,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct ClientSpend {
    pub client_id: String,
    /// `None` when the client is not in the directory passed to the report.
    pub client_name: Option<String>,
    pub is_regular: bool,
    #[ts(as = "String")]
    pub total_spent: Money,
    pub invoice_count: usize,
    #[ts(as = "String")]
    pub average_purchase: Money,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct ClientInsights {
    pub total_clients: usize,
    pub regular_clients: usize,
    pub non_regular_clients: usize,
    /// Share of revenue from regular clients, in percent with two decimals.
    #[ts(as = "String")]
    pub regular_clients_revenue_percentage: Decimal,
}

/// The branch performance report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct BranchPerformance {
    pub currency: String,
    #[ts(as = "String")]
    pub total_revenue: Money,
    pub total_invoices: usize,
    #[ts(as = "String")]
    pub average_invoice_value: Money,
    pub revenue_summary: Vec<RevenuePeriod>,
    pub branches: Vec<BranchRevenue>,
    pub categories: Vec<CategoryPerformance>,
    pub top_subcategories: Vec<SubcategoryRanking>,
    pub top_clients: Vec<ClientSpend>,
    pub client_insights: ClientInsights,
}

// =============================================================================
// Accumulators
// =============================================================================

#[derive(Debug, Default)]
struct Bucket {
    revenue: Decimal,
    count: u64,
}

impl Bucket {
    fn add(&mut self, revenue: Decimal, count: u64, field: &str) -> ReportResult<()> {
        accumulate(&mut self.revenue, revenue, field)?;
        self.count += count;
        Ok(())
    }
}

#[derive(Debug, Default)]
struct CategoryBucket {
    total: Bucket,
    monthly: Decimal,
    weekly: Decimal,
    daily: Decimal,
    subcategories: BTreeMap<String, Decimal>,
}

impl CategoryBucket {
    /// Highest-revenue named subcategory; ties go to the first name.
    fn top_subcategory(&self) -> Option<(&String, Decimal)> {
        self.subcategories
            .iter()
            .filter(|(_, revenue)| !revenue.is_zero())
            .fold(None, |best: Option<(&String, Decimal)>, (name, &revenue)| match best {
                Some((_, top)) if top >= revenue => best,
                _ => Some((name, revenue)),
            })
    }
}

/// Revenue descending, then key ascending.
fn by_revenue<K: Ord>(a: (&K, Decimal), b: (&K, Decimal)) -> Ordering {
    b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0))
}

fn sorted<K: Ord>(buckets: &BTreeMap<K, Bucket>) -> Vec<(&K, &Bucket)> {
    let mut entries: Vec<_> = buckets.iter().collect();
    entries.sort_by(|a, b| by_revenue((a.0, a.1.revenue), (b.0, b.1.revenue)));
    entries
}

// =============================================================================
// Report
// =============================================================================

/// Builds the branch performance report over the invoices selected by
/// `options`.
///
/// `clients` is the client directory for the report scope: it supplies
/// names and the regular flag, and its members admitted by the client type
/// make up `totalClients`. Invoices of clients missing from it count as
/// non-regular.
///
/// ## Errors
/// - `Pricing` naming the first invoice that is empty, has an invalid
///   identifier or has an invalid line
/// - `Overflow` if a revenue sum leaves the decimal range
pub fn branch_performance(
    engine: &PricingEngine,
    invoices: &[Invoice],
    clients: &[Client],
    options: &PerformanceOptions,
) -> ReportResult<BranchPerformance> {
    info!(
        invoices = invoices.len(),
        clients = clients.len(),
        as_of = %options.as_of,
        "Building branch performance report"
    );

    let directory: HashMap<&str, &Client> = clients.iter().map(|c| (c.id.as_str(), c)).collect();
    let is_regular = |client_id: &str| directory.get(client_id).map_or(false, |c| c.is_regular);

    let mut total_revenue = Decimal::ZERO;
    let mut regular_revenue = Decimal::ZERO;
    let mut total_invoices = 0usize;
    let mut periods: BTreeMap<NaiveDate, Bucket> = BTreeMap::new();
    let mut branches: BTreeMap<String, Bucket> = BTreeMap::new();
    let mut categories: BTreeMap<String, CategoryBucket> = BTreeMap::new();
    let mut subcategories: BTreeMap<(String, String), Bucket> = BTreeMap::new();
    let mut spenders: BTreeMap<String, Bucket> = BTreeMap::new();

    for invoice in invoices.iter().filter(|invoice| options.filter.matches(invoice)) {
        let regular = is_regular(&invoice.client_id);
        if !options.client_type.admits(regular) {
            continue;
        }

        let priced = |e: PricingError| ReportError::pricing(&invoice.id, e);

        invoice.validate_refs().map_err(|e| priced(e.into()))?;
        let invoice_revenue = engine
            .tally(&invoice.items)
            .and_then(|tally| tally.grand_total())
            .map_err(priced)?;

        let at = invoice.issued_at;
        for item in &invoice.items {
            let line_revenue = engine
                .tally(std::slice::from_ref(item))
                .and_then(|tally| tally.grand_total())
                .map_err(priced)?;
            let quantity = u64::from(item.quantity);
            let category_name = item.category_name.as_deref().unwrap_or(UNCATEGORIZED);

            let category = categories.entry(category_name.to_string()).or_default();
            category.total.add(line_revenue, quantity, "category_revenue")?;
            if options.within(MONTHLY_WINDOW_DAYS, at) {
                accumulate(&mut category.monthly, line_revenue, "monthly_revenue")?;
            }
            if options.within(WEEKLY_WINDOW_DAYS, at) {
                accumulate(&mut category.weekly, line_revenue, "weekly_revenue")?;
            }
            if options.within(DAILY_WINDOW_DAYS, at) {
                accumulate(&mut category.daily, line_revenue, "daily_revenue")?;
            }

            if let Some(name) = item.subcategory_name.as_deref() {
                accumulate(
                    category.subcategories.entry(name.to_string()).or_default(),
                    line_revenue,
                    "subcategory_revenue",
                )?;
                subcategories
                    .entry((name.to_string(), category_name.to_string()))
                    .or_default()
                    .add(line_revenue, quantity, "subcategory_revenue")?;
            }
        }

        periods
            .entry(options.granularity.period_start(at.date_naive()))
            .or_default()
            .add(invoice_revenue, 1, "period_revenue")?;
        branches
            .entry(invoice.branch_id.clone())
            .or_default()
            .add(invoice_revenue, 1, "branch_revenue")?;
        spenders
            .entry(invoice.client_id.clone())
            .or_default()
            .add(invoice_revenue, 1, "client_spend")?;

        accumulate(&mut total_revenue, invoice_revenue, "total_revenue")?;
        if regular {
            accumulate(&mut regular_revenue, invoice_revenue, "regular_revenue")?;
        }
        total_invoices += 1;
    }

    let current_period = options
        .granularity
        .period_start(options.as_of.date_naive());
    let revenue_summary = periods
        .iter()
        .map(|(&starts_on, bucket)| -> ReportResult<RevenuePeriod> {
            let invoice_count = bucket.count as usize;
            Ok(RevenuePeriod {
                period: options.granularity.label(starts_on),
                starts_on,
                revenue: round_figure("period_revenue", bucket.revenue)?,
                invoice_count,
                average_value: average("period_average", bucket.revenue, invoice_count)?,
                is_current: starts_on == current_period,
            })
        })
        .collect::<ReportResult<Vec<_>>>()?;

    let branches = sorted(&branches)
        .into_iter()
        .map(|(branch_id, bucket)| -> ReportResult<BranchRevenue> {
            debug!(branch = %branch_id, revenue = %bucket.revenue, "Branch revenue");
            Ok(BranchRevenue {
                branch_id: branch_id.clone(),
                revenue: round_figure("branch_revenue", bucket.revenue)?,
                invoice_count: bucket.count as usize,
            })
        })
        .collect::<ReportResult<Vec<_>>>()?;

    let mut ranked_categories: Vec<_> = categories
        .iter()
        .filter(|(_, bucket)| !bucket.total.revenue.is_zero())
        .collect();
    ranked_categories
        .sort_by(|a, b| by_revenue((a.0, a.1.total.revenue), (b.0, b.1.total.revenue)));
    let categories = ranked_categories
        .into_iter()
        .map(|(category, bucket)| -> ReportResult<CategoryPerformance> {
            let top_subcategory = bucket
                .top_subcategory()
                .map(|(name, revenue)| -> ReportResult<TopSubcategory> {
                    Ok(TopSubcategory {
                        name: name.clone(),
                        revenue: round_figure("subcategory_revenue", revenue)?,
                    })
                })
                .transpose()?;
            Ok(CategoryPerformance {
                category: category.clone(),
                revenue: round_figure("category_revenue", bucket.total.revenue)?,
                monthly_revenue: round_figure("monthly_revenue", bucket.monthly)?,
                weekly_revenue: round_figure("weekly_revenue", bucket.weekly)?,
                daily_revenue: round_figure("daily_revenue", bucket.daily)?,
                quantity_sold: bucket.total.count,
                top_subcategory,
            })
        })
        .collect::<ReportResult<Vec<_>>>()?;

    let top_subcategories = sorted(&subcategories)
        .into_iter()
        .filter(|(_, bucket)| !bucket.revenue.is_zero())
        .take(options.top_subcategories)
        .enumerate()
        .map(|(index, ((name, category), bucket))| -> ReportResult<SubcategoryRanking> {
            Ok(SubcategoryRanking {
                rank: index + 1,
                name: name.clone(),
                category: category.clone(),
                revenue: round_figure("subcategory_revenue", bucket.revenue)?,
                sales_count: bucket.count,
                average_price: average(
                    "subcategory_average_price",
                    bucket.revenue,
                    bucket.count as usize,
                )?,
            })
        })
        .collect::<ReportResult<Vec<_>>>()?;

    let top_clients = sorted(&spenders)
        .into_iter()
        .take(options.top_clients)
        .map(|(client_id, bucket)| -> ReportResult<ClientSpend> {
            let known = directory.get(client_id.as_str());
            let invoice_count = bucket.count as usize;
            Ok(ClientSpend {
                client_id: client_id.clone(),
                client_name: known.map(|c| c.name.clone()),
                is_regular: known.map_or(false, |c| c.is_regular),
                total_spent: round_figure("client_spend", bucket.revenue)?,
                invoice_count,
                average_purchase: average("client_average", bucket.revenue, invoice_count)?,
            })
        })
        .collect::<ReportResult<Vec<_>>>()?;

    let admitted: Vec<&Client> = clients
        .iter()
        .filter(|c| options.client_type.admits(c.is_regular))
        .collect();
    let regular_clients = admitted.iter().filter(|c| c.is_regular).count();
    let client_insights = ClientInsights {
        total_clients: admitted.len(),
        regular_clients,
        non_regular_clients: admitted.len() - regular_clients,
        regular_clients_revenue_percentage: revenue_share(regular_revenue, total_revenue)?,
    };

    Ok(BranchPerformance {
        currency: options.currency.clone(),
        total_revenue: round_figure("total_revenue", total_revenue)?,
        total_invoices,
        average_invoice_value: average("average_invoice_value", total_revenue, total_invoices)?,
        revenue_summary,
        branches,
        categories,
        top_subcategories,
        top_clients,
        client_insights,
    })
}

/// `part / whole × 100`, two decimals half-up; zero when `whole` is zero.
fn revenue_share(part: Decimal, whole: Decimal) -> ReportResult<Decimal> {
    if whole.is_zero() {
        return Ok(Decimal::ZERO);
    }
    part.checked_mul(Decimal::ONE_HUNDRED)
        .and_then(|scaled| scaled.checked_div(whole))
        .map(|share| share.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero))
        .ok_or_else(|| ReportError::overflow("regular_clients_revenue_percentage"))
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use tally_core::{InvoiceLineItem, PaymentStatus};

    fn at(month: u32, day: u32, hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, month, day, hour, 0, 0).unwrap()
    }

    /// Sunday 31 March 2024, noon.
    fn options() -> PerformanceOptions {
        PerformanceOptions::new(at(3, 31, 12))
    }

    fn invoice(
        id: &str,
        branch: &str,
        client: &str,
        issued_at: DateTime<Utc>,
        items: Vec<InvoiceLineItem>,
    ) -> Invoice {
        Invoice {
            id: id.to_string(),
            branch_id: branch.to_string(),
            client_id: client.to_string(),
            issued_at,
            payment_status: PaymentStatus::Paid,
            items,
        }
    }

    fn item(unit: i64, qty: u32, category: Option<&str>) -> InvoiceLineItem {
        let line = InvoiceLineItem::new(Decimal::from(unit), qty, Decimal::ZERO, Decimal::ZERO);
        match category {
            Some(name) => line.with_category(name),
            None => line,
        }
    }

    fn service(unit: i64, qty: u32, category: &str, name: &str) -> InvoiceLineItem {
        item(unit, qty, Some(category)).with_subcategory(name)
    }

    fn clients() -> Vec<Client> {
        let mut regular = Client::regular("c-reg", Decimal::from(10));
        regular.name = "Asha".to_string();
        let mut walk_in = Client::walk_in("c-walk");
        walk_in.name = "Ravi".to_string();
        vec![regular, walk_in]
    }

    fn sample() -> Vec<Invoice> {
        vec![
            invoice(
                "inv-1",
                "b-north",
                "c-reg",
                at(3, 31, 9),
                vec![service(350, 2, "Hair", "Haircut"), item(100, 1, None)],
            ),
            invoice(
                "inv-2",
                "b-south",
                "c-walk",
                at(3, 28, 9),
                vec![service(200, 1, "Hair", "Coloring")],
            ),
            invoice(
                "inv-3",
                "b-south",
                "c-walk",
                at(2, 15, 9),
                vec![service(500, 1, "Spa", "Massage")],
            ),
        ]
    }

    fn build_report(invoices: &[Invoice], options: &PerformanceOptions) -> BranchPerformance {
        branch_performance(&PricingEngine::default(), invoices, &clients(), options).unwrap()
    }

    #[test]
    fn test_totals_and_average() {
        let report = build_report(&sample(), &options());

        assert_eq!(report.total_revenue, Money::from_minor(150000)); // 1500.00
        assert_eq!(report.total_invoices, 3);
        assert_eq!(report.average_invoice_value, Money::from_minor(50000));
        assert_eq!(report.currency, "INR");
    }

    #[test]
    fn test_branches_sorted_by_revenue() {
        let report = build_report(&sample(), &options());

        let ids: Vec<_> = report.branches.iter().map(|b| b.branch_id.as_str()).collect();
        assert_eq!(ids, vec!["b-north", "b-south"]);
        assert_eq!(report.branches[0].revenue, Money::from_minor(80000));
        assert_eq!(report.branches[1].revenue, Money::from_minor(70000));
        assert_eq!(report.branches[1].invoice_count, 2);
    }

    #[test]
    fn test_monthly_revenue_summary() {
        let report = build_report(&sample(), &options());

        let rows: Vec<_> = report
            .revenue_summary
            .iter()
            .map(|p| (p.period.as_str(), p.revenue, p.invoice_count, p.is_current))
            .collect();
        assert_eq!(
            rows,
            vec![
                ("2024-02", Money::from_minor(50000), 1, false),
                ("2024-03", Money::from_minor(100000), 2, true),
            ]
        );
        assert_eq!(report.revenue_summary[1].average_value, Money::from_minor(50000));
        assert_eq!(
            report.revenue_summary[1].starts_on,
            NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()
        );
    }

    #[test]
    fn test_weekly_and_daily_revenue_summary() {
        let mut weekly = options();
        weekly.granularity = Granularity::Weekly;
        let labels: Vec<_> = build_report(&sample(), &weekly)
            .revenue_summary
            .into_iter()
            .map(|p| (p.period, p.is_current))
            .collect();
        assert_eq!(
            labels,
            vec![("2024-W07".to_string(), false), ("2024-W13".to_string(), true)]
        );

        let mut daily = options();
        daily.granularity = Granularity::Daily;
        let labels: Vec<_> = build_report(&sample(), &daily)
            .revenue_summary
            .into_iter()
            .map(|p| p.period)
            .collect();
        assert_eq!(labels, vec!["2024-02-15", "2024-03-28", "2024-03-31"]);
    }

    #[test]
    fn test_period_start() {
        let sunday = NaiveDate::from_ymd_opt(2024, 3, 31).unwrap();
        assert_eq!(Granularity::Daily.period_start(sunday), sunday);
        assert_eq!(
            Granularity::Weekly.period_start(sunday),
            NaiveDate::from_ymd_opt(2024, 3, 25).unwrap()
        );
        assert_eq!(
            Granularity::Monthly.period_start(sunday),
            NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()
        );
    }

    #[test]
    fn test_category_performance() {
        let report = build_report(&sample(), &options());

        let totals: Vec<_> = report
            .categories
            .iter()
            .map(|c| (c.category.as_str(), c.revenue, c.quantity_sold))
            .collect();
        assert_eq!(
            totals,
            vec![
                ("Hair", Money::from_minor(90000), 3),
                ("Spa", Money::from_minor(50000), 1),
                (UNCATEGORIZED, Money::from_minor(10000), 1),
            ]
        );

        let hair = &report.categories[0];
        assert_eq!(hair.monthly_revenue, Money::from_minor(90000));
        assert_eq!(hair.weekly_revenue, Money::from_minor(90000));
        assert_eq!(hair.daily_revenue, Money::from_minor(70000));
        assert_eq!(
            hair.top_subcategory,
            Some(TopSubcategory {
                name: "Haircut".to_string(),
                revenue: Money::from_minor(70000),
            })
        );

        // Sold in February, outside every trailing window
        let spa = &report.categories[1];
        assert_eq!(spa.monthly_revenue, Money::zero());
        assert_eq!(spa.top_subcategory.as_ref().map(|t| t.name.as_str()), Some("Massage"));

        assert_eq!(report.categories[2].top_subcategory, None);
    }

    #[test]
    fn test_top_subcategories_ranked() {
        let report = build_report(&sample(), &options());

        let ranking: Vec<_> = report
            .top_subcategories
            .iter()
            .map(|s| (s.rank, s.name.as_str(), s.category.as_str(), s.sales_count))
            .collect();
        assert_eq!(
            ranking,
            vec![
                (1, "Haircut", "Hair", 2),
                (2, "Massage", "Spa", 1),
                (3, "Coloring", "Hair", 1),
            ]
        );
        assert_eq!(report.top_subcategories[0].average_price, Money::from_minor(35000));

        let mut short = options();
        short.top_subcategories = 2;
        assert_eq!(build_report(&sample(), &short).top_subcategories.len(), 2);
    }

    #[test]
    fn test_zero_revenue_categories_dropped() {
        let invoices = vec![invoice(
            "inv-1",
            "b-1",
            "c-reg",
            at(3, 30, 9),
            vec![service(0, 1, "Free", "Sample"), item(50, 1, Some("Paid"))],
        )];
        let report = build_report(&invoices, &options());

        assert_eq!(report.categories.len(), 1);
        assert_eq!(report.categories[0].category, "Paid");
        assert!(report.top_subcategories.is_empty());
    }

    #[test]
    fn test_equal_revenue_ties_sort_by_name() {
        let invoices = vec![
            invoice("inv-1", "b-zeta", "c-1", at(3, 1, 9), vec![item(100, 1, Some("B"))]),
            invoice("inv-2", "b-alpha", "c-2", at(3, 1, 9), vec![item(100, 1, Some("A"))]),
        ];
        let report =
            branch_performance(&PricingEngine::default(), &invoices, &[], &options()).unwrap();

        assert_eq!(report.branches[0].branch_id, "b-alpha");
        assert_eq!(report.categories[0].category, "A");
        assert_eq!(report.top_clients[0].client_id, "c-1");
    }

    #[test]
    fn test_top_clients_truncated() {
        let mut options = options();
        options.top_clients = 1;
        let report = build_report(&sample(), &options);

        assert_eq!(report.top_clients.len(), 1);
        let top = &report.top_clients[0];
        assert_eq!(top.client_id, "c-reg");
        assert_eq!(top.client_name.as_deref(), Some("Asha"));
        assert!(top.is_regular);
        assert_eq!(top.total_spent, Money::from_minor(80000));
        assert_eq!(top.average_purchase, Money::from_minor(80000));
    }

    #[test]
    fn test_client_insights() {
        let report = build_report(&sample(), &options());
        let insights = &report.client_insights;

        assert_eq!(insights.total_clients, 2);
        assert_eq!(insights.regular_clients, 1);
        assert_eq!(insights.non_regular_clients, 1);
        // 800 of 1500
        assert_eq!(insights.regular_clients_revenue_percentage, Decimal::new(5333, 2));
        assert_eq!(report.top_clients[1].average_purchase, Money::from_minor(35000));
    }

    #[test]
    fn test_client_type_filter() {
        let mut regular_only = options();
        regular_only.client_type = ClientType::Regular;
        let report = build_report(&sample(), &regular_only);

        assert_eq!(report.total_invoices, 1);
        assert_eq!(report.total_revenue, Money::from_minor(80000));
        assert_eq!(report.client_insights.total_clients, 1);
        assert_eq!(report.client_insights.non_regular_clients, 0);
        assert_eq!(
            report.client_insights.regular_clients_revenue_percentage,
            Decimal::new(10000, 2)
        );

        let mut walk_ins = options();
        walk_ins.client_type = ClientType::NonRegular;
        assert_eq!(build_report(&sample(), &walk_ins).total_revenue, Money::from_minor(70000));
    }

    #[test]
    fn test_invoice_filter_applies() {
        let mut south = options();
        south.filter = InvoiceFilter::default().for_branch("b-south");
        let report = build_report(&sample(), &south);

        assert_eq!(report.total_invoices, 2);
        assert_eq!(report.branches.len(), 1);
        assert_eq!(report.total_revenue, Money::from_minor(70000));
    }

    #[test]
    fn test_revenue_share_rounds_to_two_places() {
        assert_eq!(
            revenue_share(Decimal::ONE, Decimal::from(3)).unwrap(),
            Decimal::new(3333, 2)
        );
        assert_eq!(
            revenue_share(Decimal::from(2), Decimal::from(3)).unwrap(),
            Decimal::new(6667, 2)
        );
        assert_eq!(revenue_share(Decimal::ZERO, Decimal::ZERO).unwrap(), Decimal::ZERO);
    }

    #[test]
    fn test_empty_report() {
        let report =
            branch_performance(&PricingEngine::default(), &[], &[], &options()).unwrap();

        assert_eq!(report.total_revenue, Money::zero());
        assert_eq!(report.average_invoice_value, Money::zero());
        assert!(report.branches.is_empty());
        assert!(report.revenue_summary.is_empty());
        assert_eq!(report.client_insights.regular_clients_revenue_percentage, Decimal::ZERO);
    }

    #[test]
    fn test_line_revenue_includes_discount_and_gst() {
        let line = InvoiceLineItem::new(
            Decimal::from(1000),
            1,
            Decimal::from(100),
            Decimal::from(162),
        )
        .with_category("Hair");
        let invoices = vec![invoice("inv-1", "b-1", "c-reg", at(3, 30, 9), vec![line])];

        let report = build_report(&invoices, &options());
        assert_eq!(report.categories[0].revenue, Money::from_minor(106200));
        assert_eq!(report.total_revenue, Money::from_minor(106200));
    }

    #[test]
    fn test_bad_invoice_fails_report() {
        let engine = PricingEngine::default();

        let mut invoices = sample();
        invoices.push(invoice("inv-empty", "b-1", "c-reg", at(3, 1, 9), vec![]));
        let err = branch_performance(&engine, &invoices, &clients(), &options()).unwrap_err();
        assert!(matches!(
            err,
            ReportError::Pricing { ref invoice_id, source: PricingError::EmptyInvoice }
                if invoice_id == "inv-empty"
        ));

        let bad_ref = vec![invoice("inv 1", "b-1", "c-reg", at(3, 1, 9), vec![item(10, 1, None)])];
        let err = branch_performance(&engine, &bad_ref, &clients(), &options()).unwrap_err();
        assert!(matches!(err, ReportError::Pricing { source: PricingError::InvalidInput(_), .. }));
    }

    #[test]
    fn test_report_serializes_camel_case() {
        let report = build_report(&sample(), &options());
        let json = serde_json::to_value(&report).unwrap();

        assert_eq!(json["totalRevenue"], "1500.00");
        assert_eq!(json["currency"], "INR");
        assert_eq!(json["clientInsights"]["regularClientsRevenuePercentage"], "53.33");
        assert_eq!(json["topClients"][0]["clientName"], "Asha");
        assert_eq!(json["revenueSummary"][1]["startsOn"], "2024-03-01");
        assert_eq!(json["categories"][0]["topSubcategory"]["name"], "Haircut");
        assert_eq!(json["topSubcategories"][0]["salesCount"], 2);
    }
}
