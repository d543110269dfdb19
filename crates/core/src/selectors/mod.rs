//! Read-only views over a dataset and a filter specification.
//!
//! [`Selectors`] borrows both and never mutates either, so calling any view
//! twice with the same inputs returns equal results. A missing dataset or an
//! empty result is a normal, zero-valued outcome rather than an error.

pub mod filters;
pub mod finance;
pub mod inventory;
pub mod people;
pub mod resolve;
pub mod sales;

use std::collections::BTreeSet;

use crate::domain::catalog::Category;
use crate::domain::dataset::Dataset;
use crate::domain::sales::Sale;

pub use filters::{DateRange, FilterSpec, FilterUpdate};
pub use finance::{CampaignPerformance, FinanceSummary};
pub use inventory::{InventoryOverview, InventoryRow, LowStockItem, ProductMix, StatusCounts};
pub use people::{CustomerSegment, DepartmentStaffing, StaffRow, WorkforceSummary};
pub use resolve::{
    Lookup, UnresolvedPolicy, CATEGORY_FILTER_POLICY, ROLLUP_POLICY, UNKNOWN_LABEL,
};
pub use sales::{
    CategorySales, DailyRevenue, DepartmentSnapshot, KpiSummary, RegionalSales, StoreLeaderboard,
    StorePerformance, SubCategorySales, TopProduct,
};

/// Selector context: an optional dataset, the active filters, and id indexes
/// built once for the lifetime of the context.
#[derive(Debug)]
pub struct Selectors<'a> {
    data: Option<&'a Dataset>,
    filters: &'a FilterSpec,
    lookup: Lookup<'a>,
}

impl<'a> Selectors<'a> {
    pub fn new(data: Option<&'a Dataset>, filters: &'a FilterSpec) -> Self {
        let lookup = data.map(Lookup::new).unwrap_or_default();
        Self { data, filters, lookup }
    }

    pub fn filters(&self) -> &FilterSpec {
        self.filters
    }

    pub fn dataset(&self) -> Option<&'a Dataset> {
        self.data
    }

    /// Sales inside the date range and store set, and, when categories are
    /// restricted, whose product resolves to one of them. Dataset order is
    /// preserved.
    pub fn filtered_sales(&self) -> Vec<&'a Sale> {
        self.sales_within(&self.filters.categories)
    }

    fn sales_within(&self, categories: &BTreeSet<Category>) -> Vec<&'a Sale> {
        let Some(data) = self.data else {
            return Vec::new();
        };
        data.sales
            .iter()
            .filter(|sale| self.filters.date_range.contains(sale.transaction_date))
            .filter(|sale| self.filters.allows_store(&sale.store_id))
            .filter(|sale| categories.is_empty() || self.in_categories(sale, categories))
            .collect()
    }

    fn in_categories(&self, sale: &Sale, categories: &BTreeSet<Category>) -> bool {
        match self.lookup.product(&sale.product_id) {
            Some(product) => categories.contains(&product.category),
            None => CATEGORY_FILTER_POLICY.keeps_unresolved(),
        }
    }
}

pub(crate) fn descending(left: f64, right: f64) -> std::cmp::Ordering {
    right.total_cmp(&left)
}
