//! Stock views. Inventory has no transaction date, so only the store filter
//! applies here.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::domain::catalog::Category;
use crate::domain::inventory::{InventoryItem, InventoryStatus};
use crate::selectors::resolve::rollup_label;
use crate::selectors::Selectors;

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LowStockItem<'a> {
    #[serde(flatten)]
    pub item: &'a InventoryItem,
    pub product_name: &'a str,
    pub store_name: &'a str,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryRow<'a> {
    #[serde(flatten)]
    pub item: &'a InventoryItem,
    pub product_name: &'a str,
    pub category: &'a str,
    pub store_name: &'a str,
    pub supplier_name: &'a str,
    pub supplier_location: &'a str,
    pub lead_time: u32,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct StatusCounts {
    pub healthy: usize,
    pub low: usize,
    pub critical: usize,
    pub overstock: usize,
}

impl StatusCounts {
    pub fn record(&mut self, status: InventoryStatus) {
        match status {
            InventoryStatus::Healthy => self.healthy += 1,
            InventoryStatus::Low => self.low += 1,
            InventoryStatus::Critical => self.critical += 1,
            InventoryStatus::Overstock => self.overstock += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.healthy + self.low + self.critical + self.overstock
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryOverview<'a> {
    pub rows: Vec<InventoryRow<'a>>,
    pub status_counts: StatusCounts,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct ProductMix {
    pub category: Category,
    pub products: usize,
}

impl<'a> Selectors<'a> {
    fn stocked_items(&self) -> impl Iterator<Item = &'a InventoryItem> + '_ {
        self.data
            .into_iter()
            .flat_map(|data| data.inventory.iter())
            .filter(|item| self.filters.allows_store(&item.store_id))
    }

    /// Low and critical rows, most depleted first.
    pub fn low_stock_items(&self) -> Vec<LowStockItem<'a>> {
        let mut rows: Vec<LowStockItem<'a>> = self
            .stocked_items()
            .filter(|item| item.status.needs_reorder())
            .map(|item| LowStockItem {
                item,
                product_name: rollup_label(
                    self.lookup.product(&item.product_id).map(|product| product.name.as_str()),
                ),
                store_name: rollup_label(
                    self.lookup.store(&item.store_id).map(|store| store.name.as_str()),
                ),
            })
            .collect();
        rows.sort_by_key(|row| row.item.quantity);
        rows
    }

    /// Every stocked row joined with its product, store, and supplier.
    pub fn inventory_overview(&self) -> InventoryOverview<'a> {
        let mut status_counts = StatusCounts::default();
        let rows = self
            .stocked_items()
            .map(|item| {
                status_counts.record(item.status);
                let product = self.lookup.product(&item.product_id);
                let supplier =
                    product.and_then(|product| self.lookup.supplier(&product.supplier_id));
                InventoryRow {
                    item,
                    product_name: rollup_label(product.map(|product| product.name.as_str())),
                    category: rollup_label(product.map(|product| product.category.as_str())),
                    store_name: rollup_label(
                        self.lookup.store(&item.store_id).map(|store| store.name.as_str()),
                    ),
                    supplier_name: rollup_label(supplier.map(|supplier| supplier.name.as_str())),
                    supplier_location: rollup_label(
                        supplier.map(|supplier| supplier.location.as_str()),
                    ),
                    lead_time: supplier.map_or(0, |supplier| supplier.lead_time_days),
                }
            })
            .collect();
        InventoryOverview { rows, status_counts }
    }

    /// Catalog size per category, in category order.
    pub fn product_mix(&self) -> Vec<ProductMix> {
        let mut counts = BTreeMap::new();
        for product in self.data.iter().flat_map(|data| data.products.iter()) {
            *counts.entry(product.category).or_insert(0) += 1;
        }
        counts.into_iter().map(|(category, products)| ProductMix { category, products }).collect()
    }
}
