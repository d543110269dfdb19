use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::ids::{InventoryId, ProductId, StoreId};
use crate::domain::schema::{Check, Schema};
use crate::errors::SchemaViolation;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InventoryStatus {
    Healthy,
    Low,
    Critical,
    Overstock,
}

/// Stock above this multiple of the reorder level counts as overstock.
pub const OVERSTOCK_FACTOR: u32 = 5;

impl InventoryStatus {
    pub fn classify(quantity: u32, reorder_level: u32) -> Self {
        if quantity == 0 {
            Self::Critical
        } else if quantity < reorder_level {
            Self::Low
        } else if quantity > reorder_level * OVERSTOCK_FACTOR {
            Self::Overstock
        } else {
            Self::Healthy
        }
    }

    pub fn needs_reorder(self) -> bool {
        matches!(self, Self::Low | Self::Critical)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Healthy => "healthy",
            Self::Low => "low",
            Self::Critical => "critical",
            Self::Overstock => "overstock",
        }
    }
}

impl fmt::Display for InventoryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Stock of one product at one store. Not every (store, product) pair exists.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryItem {
    pub id: InventoryId,
    pub store_id: StoreId,
    pub product_id: ProductId,
    pub quantity: u32,
    pub reorder_level: u32,
    pub last_restocked: NaiveDate,
    pub days_of_stock: u32,
    pub status: InventoryStatus,
}

impl Schema for InventoryItem {
    const ENTITY: &'static str = "inventory";

    fn record_id(&self) -> &str {
        self.id.as_str()
    }

    fn validate(&self) -> Result<(), SchemaViolation> {
        let check = Check::new(Self::ENTITY, self.id.as_str());
        check.id("id", self.id.is_well_formed())?;
        check.id("storeId", self.store_id.is_well_formed())?;
        check.id("productId", self.product_id.is_well_formed())?;
        check.in_range("quantity", self.quantity, 0, 500)?;
        check.in_range("reorderLevel", self.reorder_level, 20, 100)?;
        if self.quantity == 0 {
            check.ensure(self.days_of_stock == 0, "daysOfStock", || {
                "must be 0 when out of stock".into()
            })?;
        } else {
            check.in_range("daysOfStock", self.days_of_stock, 1, 60)?;
        }
        let expected = InventoryStatus::classify(self.quantity, self.reorder_level);
        check.ensure(self.status == expected, "status", || {
            format!("stored {} does not match recomputed {expected}", self.status)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::InventoryStatus;

    #[test]
    fn classification_boundaries() {
        assert_eq!(InventoryStatus::classify(0, 50), InventoryStatus::Critical);
        assert_eq!(InventoryStatus::classify(49, 50), InventoryStatus::Low);
        assert_eq!(InventoryStatus::classify(50, 50), InventoryStatus::Healthy);
        assert_eq!(InventoryStatus::classify(250, 50), InventoryStatus::Healthy);
        assert_eq!(InventoryStatus::classify(251, 50), InventoryStatus::Overstock);
    }

    #[test]
    fn only_low_and_critical_need_reorder() {
        assert!(InventoryStatus::Low.needs_reorder());
        assert!(InventoryStatus::Critical.needs_reorder());
        assert!(!InventoryStatus::Healthy.needs_reorder());
        assert!(!InventoryStatus::Overstock.needs_reorder());
    }
}
