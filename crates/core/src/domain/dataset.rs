//! The merged dataset artifact: eleven entity collections plus metadata.

use std::fs;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::catalog::{Product, Supplier};
use crate::domain::inventory::InventoryItem;
use crate::domain::operations::{Campaign, FinanceRecord, Footfall};
use crate::domain::people::{Customer, Employee};
use crate::domain::sales::{ProductReturn, Sale};
use crate::domain::store::Store;
use crate::errors::DatasetError;

/// Collection names in generation order, as they appear in the merged file.
pub const COLLECTIONS: [&str; 11] = [
    "suppliers",
    "stores",
    "products",
    "customers",
    "employees",
    "sales",
    "inventory",
    "returns",
    "footfall",
    "marketing",
    "finance",
];

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DatasetMetadata {
    #[serde(with = "crate::domain::timefmt::iso_millis")]
    pub generated: DateTime<Utc>,
    pub total_records: usize,
    pub version: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    pub suppliers: Vec<Supplier>,
    pub stores: Vec<Store>,
    pub products: Vec<Product>,
    pub customers: Vec<Customer>,
    pub employees: Vec<Employee>,
    pub sales: Vec<Sale>,
    pub inventory: Vec<InventoryItem>,
    pub returns: Vec<ProductReturn>,
    pub footfall: Vec<Footfall>,
    pub marketing: Vec<Campaign>,
    pub finance: Vec<FinanceRecord>,
    pub metadata: DatasetMetadata,
}

impl Dataset {
    /// An empty dataset stamped with `generated`; counts start at zero.
    pub fn empty(generated: DateTime<Utc>, version: impl Into<String>) -> Self {
        Self {
            suppliers: Vec::new(),
            stores: Vec::new(),
            products: Vec::new(),
            customers: Vec::new(),
            employees: Vec::new(),
            sales: Vec::new(),
            inventory: Vec::new(),
            returns: Vec::new(),
            footfall: Vec::new(),
            marketing: Vec::new(),
            finance: Vec::new(),
            metadata: DatasetMetadata { generated, total_records: 0, version: version.into() },
        }
    }

    pub fn collection_counts(&self) -> [(&'static str, usize); 11] {
        [
            (COLLECTIONS[0], self.suppliers.len()),
            (COLLECTIONS[1], self.stores.len()),
            (COLLECTIONS[2], self.products.len()),
            (COLLECTIONS[3], self.customers.len()),
            (COLLECTIONS[4], self.employees.len()),
            (COLLECTIONS[5], self.sales.len()),
            (COLLECTIONS[6], self.inventory.len()),
            (COLLECTIONS[7], self.returns.len()),
            (COLLECTIONS[8], self.footfall.len()),
            (COLLECTIONS[9], self.marketing.len()),
            (COLLECTIONS[10], self.finance.len()),
        ]
    }

    pub fn record_count(&self) -> usize {
        self.collection_counts().iter().map(|(_, count)| count).sum()
    }

    /// Recomputes `metadata.totalRecords` from the collections.
    pub fn seal(mut self) -> Self {
        self.metadata.total_records = self.record_count();
        self
    }

    pub fn from_json_str(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }

    pub fn load(path: &Path) -> Result<Self, DatasetError> {
        let raw = fs::read_to_string(path)
            .map_err(|source| DatasetError::Read { path: path.to_path_buf(), source })?;
        Self::from_json_str(&raw)
            .map_err(|source| DatasetError::Parse { path: path.to_path_buf(), source })
    }
}
