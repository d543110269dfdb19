//! Operator alerts raised from derived views.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::ids::{ProductId, StoreId};
use crate::domain::inventory::InventoryStatus;
use crate::selectors::{LowStockItem, Selectors};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AlertKind {
    LowStock,
    SalesDip,
    HighReturns,
    System,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Alert {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: AlertKind,
    pub severity: Severity,
    pub title: String,
    pub message: String,
    #[serde(with = "crate::domain::timefmt::iso_millis")]
    pub timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub store_id: Option<StoreId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_id: Option<ProductId>,
    pub acknowledged: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assigned_to: Option<String>,
}

impl Alert {
    pub fn low_stock(index: usize, row: &LowStockItem<'_>, raised_at: DateTime<Utc>) -> Self {
        let critical = row.item.status == InventoryStatus::Critical;
        Self {
            id: format!("alert-{index}"),
            kind: AlertKind::LowStock,
            severity: if critical { Severity::Critical } else { Severity::High },
            title: format!("{} Stock Alert", if critical { "Critical" } else { "Low" }),
            message: format!(
                "{} at {} has only {} units remaining",
                row.product_name, row.store_name, row.item.quantity
            ),
            timestamp: raised_at,
            store_id: Some(row.item.store_id.clone()),
            product_id: Some(row.item.product_id.clone()),
            acknowledged: false,
            assigned_to: None,
        }
    }
}

impl Selectors<'_> {
    /// Alerts for the `limit` most depleted low-stock rows.
    pub fn low_stock_alerts(&self, limit: usize, raised_at: DateTime<Utc>) -> Vec<Alert> {
        self.low_stock_items()
            .iter()
            .take(limit)
            .enumerate()
            .map(|(index, row)| Alert::low_stock(index, row, raised_at))
            .collect()
    }
}
