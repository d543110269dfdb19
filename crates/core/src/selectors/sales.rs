//! Sales-derived views: KPIs, rankings, and rollups.

use std::collections::{BTreeMap, BTreeSet, HashSet};

use chrono::NaiveDate;
use serde::Serialize;

use crate::domain::catalog::Category;
use crate::domain::ids::ProductId;
use crate::domain::inventory::InventoryStatus;
use crate::domain::money::{ratio_or_zero, round2, round_to};
use crate::domain::sales::Sale;
use crate::selectors::resolve::{rollup_label, OrderedGroups, UNKNOWN_LABEL};
use crate::selectors::{descending, Selectors};

/// Days shown in a department's revenue trend.
pub const TREND_DAYS: usize = 14;

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct KpiSummary {
    /// Whole currency units.
    pub revenue: f64,
    pub items_sold: u64,
    pub transactions: usize,
    pub avg_basket: f64,
    /// Whole percent of inventory rows that are healthy, ignoring filters.
    pub stock_health: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TopProduct<'a> {
    pub product_id: &'a ProductId,
    pub name: &'a str,
    pub category: &'a str,
    pub quantity: u64,
    pub revenue: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CategorySales<'a> {
    pub category: &'a str,
    pub revenue: f64,
    pub quantity: u64,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StorePerformance<'a> {
    pub store_id: &'a str,
    pub name: &'a str,
    pub region: &'a str,
    pub city: &'a str,
    pub revenue: f64,
    pub transactions: usize,
}

/// Stores ranked by filtered revenue, strongest first.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct StoreLeaderboard<'a> {
    pub ranked: Vec<StorePerformance<'a>>,
}

impl<'a> StoreLeaderboard<'a> {
    pub fn top(&self, n: usize) -> &[StorePerformance<'a>] {
        &self.ranked[..n.min(self.ranked.len())]
    }

    /// The `n` weakest stores, weakest first.
    pub fn bottom(&self, n: usize) -> Vec<&StorePerformance<'a>> {
        self.ranked.iter().rev().take(n).collect()
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RegionalSales<'a> {
    pub region: &'a str,
    pub revenue: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct DailyRevenue {
    pub date: NaiveDate,
    pub revenue: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubCategorySales<'a> {
    pub sub_category: &'a str,
    pub revenue: f64,
    pub units: u64,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DepartmentSnapshot<'a> {
    pub category: Category,
    pub revenue: f64,
    pub units: u64,
    pub transactions: usize,
    pub average_item_value: f64,
    pub daily_revenue: Vec<DailyRevenue>,
    pub sub_categories: Vec<SubCategorySales<'a>>,
}

impl<'a> Selectors<'a> {
    /// With no dataset every field is zero. With a dataset but no matching
    /// sales, only stock health is non-zero.
    pub fn kpis(&self) -> KpiSummary {
        let Some(data) = self.data else {
            return KpiSummary::default();
        };

        let healthy = data
            .inventory
            .iter()
            .filter(|item| item.status == InventoryStatus::Healthy)
            .count();
        let stock_health =
            round_to(ratio_or_zero(healthy as f64, data.inventory.len() as f64) * 100.0, 0);

        let sales = self.filtered_sales();
        let revenue: f64 = sales.iter().map(|sale| sale.total).sum();
        let items_sold = sales.iter().map(|sale| u64::from(sale.quantity)).sum();
        let transactions = sales.iter().map(|sale| sale.id.as_str()).collect::<HashSet<_>>().len();

        KpiSummary {
            revenue: round_to(revenue, 0),
            items_sold,
            transactions,
            avg_basket: round2(ratio_or_zero(revenue, transactions as f64)),
            stock_health,
        }
    }

    /// Best-selling products by filtered revenue, at most `limit` of them.
    pub fn top_products(&self, limit: usize) -> Vec<TopProduct<'a>> {
        if self.data.is_none() {
            return Vec::new();
        }

        let mut groups = OrderedGroups::new();
        for sale in self.filtered_sales() {
            let entry = groups.entry(sale.product_id.as_str(), || (&sale.product_id, 0_u64, 0.0));
            entry.1 += u64::from(sale.quantity);
            entry.2 += sale.total;
        }

        let mut ranked = groups.into_values();
        ranked.sort_by(|left, right| descending(left.2, right.2));
        ranked
            .into_iter()
            .take(limit)
            .map(|(product_id, quantity, revenue)| {
                let product = self.lookup.product(product_id);
                TopProduct {
                    product_id,
                    name: rollup_label(product.map(|product| product.name.as_str())),
                    category: rollup_label(product.map(|product| product.category.as_str())),
                    quantity,
                    revenue: round2(revenue),
                }
            })
            .collect()
    }

    pub fn sales_by_category(&self) -> Vec<CategorySales<'a>> {
        let mut groups = OrderedGroups::new();
        for sale in self.filtered_sales() {
            let category = rollup_label(
                self.lookup.product(&sale.product_id).map(|product| product.category.as_str()),
            );
            let entry = groups
                .entry(category, || CategorySales { category, revenue: 0.0, quantity: 0 });
            entry.revenue += sale.total;
            entry.quantity += u64::from(sale.quantity);
        }
        finish_ranked(groups.into_values())
    }

    /// Every store the store filter admits, zero-sales stores included, plus
    /// any unresolved store ids found on filtered sales.
    ///
    /// Revenue is summed over [`Self::filtered_sales`], so the ranking moves
    /// with the active date range and category filter. It is not an all-time
    /// ranking over the whole sales history.
    pub fn store_leaderboard(&self) -> StoreLeaderboard<'a> {
        let Some(data) = self.data else {
            return StoreLeaderboard::default();
        };

        let mut groups = OrderedGroups::new();
        for store in data.stores.iter().filter(|store| self.filters.allows_store(&store.id)) {
            groups.entry(store.id.as_str(), || StorePerformance {
                store_id: store.id.as_str(),
                name: store.name.as_str(),
                region: store.region.as_str(),
                city: store.city.as_str(),
                revenue: 0.0,
                transactions: 0,
            });
        }
        for sale in self.filtered_sales() {
            let entry = groups.entry(sale.store_id.as_str(), || StorePerformance {
                store_id: sale.store_id.as_str(),
                name: UNKNOWN_LABEL,
                region: UNKNOWN_LABEL,
                city: UNKNOWN_LABEL,
                revenue: 0.0,
                transactions: 0,
            });
            entry.revenue += sale.total;
            entry.transactions += 1;
        }

        StoreLeaderboard { ranked: finish_ranked(groups.into_values()) }
    }

    /// Revenue per store region over [`Self::filtered_sales`], not over the
    /// whole sales history. Sales at unresolved stores roll up as "Unknown".
    pub fn regional_sales(&self) -> Vec<RegionalSales<'a>> {
        let mut groups = OrderedGroups::new();
        for sale in self.filtered_sales() {
            let region =
                rollup_label(self.lookup.store(&sale.store_id).map(|store| store.region.as_str()));
            groups.entry(region, || RegionalSales { region, revenue: 0.0 }).revenue += sale.total;
        }
        finish_ranked(groups.into_values())
    }

    /// One department's slice of the filtered sales: the active category
    /// filter is replaced by `category` alone.
    pub fn department_snapshot(&self, category: Category) -> DepartmentSnapshot<'a> {
        let sales = self.sales_within(&BTreeSet::from([category]));

        let revenue: f64 = sales.iter().map(|sale| sale.total).sum();
        let units: u64 = sales.iter().map(|sale| u64::from(sale.quantity)).sum();

        let mut daily = BTreeMap::new();
        for sale in &sales {
            *daily.entry(sale.transaction_date.date_naive()).or_insert(0.0) += sale.total;
        }
        let skip = daily.len().saturating_sub(TREND_DAYS);
        let daily_revenue = daily
            .into_iter()
            .skip(skip)
            .map(|(date, revenue)| DailyRevenue { date, revenue: round2(revenue) })
            .collect();

        DepartmentSnapshot {
            category,
            revenue: round2(revenue),
            units,
            transactions: sales.len(),
            average_item_value: round2(ratio_or_zero(revenue, units as f64)),
            daily_revenue,
            sub_categories: self.sub_category_breakdown(&sales),
        }
    }

    fn sub_category_breakdown(&self, sales: &[&'a Sale]) -> Vec<SubCategorySales<'a>> {
        let mut groups = OrderedGroups::new();
        for sale in sales {
            let sub_category = rollup_label(
                self.lookup.product(&sale.product_id).map(|product| product.sub_category.as_str()),
            );
            let entry = groups
                .entry(sub_category, || SubCategorySales { sub_category, revenue: 0.0, units: 0 });
            entry.revenue += sale.total;
            entry.units += u64::from(sale.quantity);
        }
        finish_ranked(groups.into_values())
    }
}

/// Rows ranked by revenue.
trait RevenueRow {
    fn revenue(&self) -> f64;
    fn revenue_mut(&mut self) -> &mut f64;
}

macro_rules! revenue_row {
    ($($row:ident),+) => {
        $(
            impl RevenueRow for $row<'_> {
                fn revenue(&self) -> f64 {
                    self.revenue
                }

                fn revenue_mut(&mut self) -> &mut f64 {
                    &mut self.revenue
                }
            }
        )+
    };
}

revenue_row!(CategorySales, StorePerformance, RegionalSales, SubCategorySales);

/// Sorts highest revenue first, stable on ties, then rounds revenue to cents.
fn finish_ranked<T: RevenueRow>(mut rows: Vec<T>) -> Vec<T> {
    rows.sort_by(|left, right| descending(left.revenue(), right.revenue()));
    for row in &mut rows {
        let value = row.revenue_mut();
        *value = round2(*value);
    }
    rows
}
