//! Hand-built datasets for selector and state tests.
//!
//! Records get plausible defaults for every field a test does not name.
//! Nothing here is schema-checked, so tests can build dangling references on
//! purpose.

use chrono::{DateTime, NaiveDate, Utc};

use crate::config::default_reference_time;
use crate::domain::catalog::{Category, DeliveryFrequency, Product, Supplier};
use crate::domain::dataset::Dataset;
use crate::domain::ids::{InventoryId, SupplierId};
use crate::domain::inventory::{InventoryItem, InventoryStatus};
use crate::domain::operations::{Campaign, FinanceRecord, MarketingChannel};
use crate::domain::people::{Customer, Employee, EmployeeRole, LoyaltyTier};
use crate::domain::sales::{PaymentMethod, Sale};
use crate::domain::store::{Region, Store, StoreStatus};
use crate::domain::timefmt::day_start;

#[derive(Clone, Debug)]
pub struct DatasetBuilder {
    dataset: Dataset,
}

impl Default for DatasetBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl DatasetBuilder {
    pub fn new() -> Self {
        Self { dataset: Dataset::empty(default_reference_time(), "fixture") }
    }

    pub fn supplier(mut self, id: &str, name: &str, categories: &[Category]) -> Self {
        self.dataset.suppliers.push(Supplier {
            id: id.into(),
            name: name.to_string(),
            location: "Portland".to_string(),
            country: "United States".to_string(),
            delivery_categories: categories.to_vec(),
            delivery_frequency: DeliveryFrequency::Weekly,
            lead_time_days: 5,
            min_order_value: 1_000,
            rating: 4.2,
            contact_person: "Ava Smith".to_string(),
            email: "ava.smith1@example.com".to_string(),
            phone: "(212) 555-0100".to_string(),
        });
        self
    }

    pub fn store(mut self, id: &str, name: &str, region: Region) -> Self {
        self.dataset.stores.push(Store {
            id: id.into(),
            name: name.to_string(),
            region,
            city: "Chicago".to_string(),
            address: "1 Main St".to_string(),
            sqft: 50_000,
            open_date: date(2020, 1, 1),
            manager: "Liam Jones".to_string(),
            status: StoreStatus::Active,
            lat: 41.8781,
            lng: -87.6298,
        });
        self
    }

    /// A product supplied by the first supplier, or `SUP0001` when none exist.
    pub fn product(mut self, id: &str, name: &str, category: Category, unit_price: f64) -> Self {
        let supplier_id = self
            .dataset
            .suppliers
            .first()
            .map(|supplier| supplier.id.clone())
            .unwrap_or_else(|| SupplierId::from_sequence(1));
        self.dataset.products.push(Product {
            id: id.into(),
            sku: "ABCDEF1234".to_string(),
            name: name.to_string(),
            category,
            sub_category: category
                .sub_categories()
                .first()
                .copied()
                .unwrap_or_default()
                .to_string(),
            brand: "Summit Foods".to_string(),
            unit_price,
            cost_price: unit_price / 2.0,
            supplier_id,
            weight: (category == Category::Electronics).then_some(1.5),
            perishable: category.is_perishable(),
        });
        self
    }

    pub fn product_in(mut self, id: &str, category: Category, sub_category: &str) -> Self {
        self = self.product(id, id, category, 10.0);
        if let Some(product) = self.dataset.products.last_mut() {
            product.sub_category = sub_category.to_string();
        }
        self
    }

    pub fn customer(mut self, id: &str, tier: LoyaltyTier, total_spend: f64) -> Self {
        let preferred_store = self.first_store_id();
        self.dataset.customers.push(Customer {
            id: id.into(),
            name: "Olivia Brown".to_string(),
            email: "olivia.brown7@example.com".to_string(),
            phone: "(312) 555-0101".to_string(),
            loyalty_tier: tier,
            join_date: date(2022, 6, 1),
            total_spend,
            visit_count: 10,
            last_visit: date(2024, 12, 20),
            region: Region::Central,
            preferred_store: preferred_store.as_str().into(),
        });
        self
    }

    pub fn employee(
        mut self,
        id: &str,
        store_id: &str,
        department: &str,
        salary: u32,
        performance: f64,
    ) -> Self {
        self.dataset.employees.push(Employee {
            id: id.into(),
            name: format!("Employee {id}"),
            role: EmployeeRole::Cashier,
            department: department.to_string(),
            store_id: store_id.into(),
            hire_date: date(2021, 3, 15),
            salary,
            performance,
            email: format!("{}@example.com", id.to_ascii_lowercase()),
        });
        self
    }

    /// An undiscounted sale whose unit price is `total / quantity`.
    pub fn sale(
        mut self,
        id: &str,
        store_id: &str,
        product_id: &str,
        at: DateTime<Utc>,
        quantity: u32,
        total: f64,
    ) -> Self {
        self.dataset.sales.push(Sale {
            id: id.into(),
            transaction_date: at,
            store_id: store_id.into(),
            product_id: product_id.into(),
            customer_id: None,
            quantity,
            unit_price: total / f64::from(quantity.max(1)),
            discount: 0.0,
            total,
            payment_method: PaymentMethod::Card,
            promotion_id: None,
        });
        self
    }

    /// Sale at noon UTC on `day`.
    pub fn sale_on(
        self,
        id: &str,
        store_id: &str,
        product_id: &str,
        day: NaiveDate,
        quantity: u32,
        total: f64,
    ) -> Self {
        let at = day_start(day) + chrono::Duration::hours(12);
        self.sale(id, store_id, product_id, at, quantity, total)
    }

    pub fn inventory(
        mut self,
        store_id: &str,
        product_id: &str,
        quantity: u32,
        reorder_level: u32,
    ) -> Self {
        let sequence = self.dataset.inventory.len() + 1;
        self.dataset.inventory.push(InventoryItem {
            id: InventoryId::from_sequence(sequence),
            store_id: store_id.into(),
            product_id: product_id.into(),
            quantity,
            reorder_level,
            last_restocked: date(2024, 12, 15),
            days_of_stock: if quantity == 0 { 0 } else { 10 },
            status: InventoryStatus::classify(quantity, reorder_level),
        });
        self
    }

    pub fn campaign(
        mut self,
        id: &str,
        start_date: NaiveDate,
        spend: f64,
        revenue: f64,
        (impressions, clicks, conversions): (u32, u32, u32),
    ) -> Self {
        self.dataset.marketing.push(Campaign {
            id: id.into(),
            campaign_name: format!("Campaign {id}"),
            channel: MarketingChannel::Email,
            start_date,
            end_date: start_date,
            spend,
            impressions,
            clicks,
            conversions,
            revenue,
        });
        self
    }

    pub fn finance(
        mut self,
        id: &str,
        date: NaiveDate,
        revenue: f64,
        cogs: f64,
        opex: f64,
    ) -> Self {
        let profit = FinanceRecord::profit_for(revenue, cogs, opex);
        self.dataset.finance.push(FinanceRecord {
            id: id.into(),
            date,
            revenue,
            cogs,
            operating_expenses: opex,
            profit,
            margin: FinanceRecord::margin_for(profit, revenue),
        });
        self
    }

    /// Seals `metadata.totalRecords` and returns the dataset.
    pub fn build(self) -> Dataset {
        self.dataset.seal()
    }

    fn first_store_id(&self) -> String {
        self.dataset
            .stores
            .first()
            .map(|store| store.id.as_str().to_string())
            .unwrap_or_else(|| "ST0001".to_string())
    }
}

/// Shorthand for fixture dates.
pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap_or_default()
}
