//! Deterministic synthetic dataset generation.
//!
//! Every collection is produced in dependency order from one seeded random
//! source. Each record is schema-checked before it is accepted; the first
//! violation aborts the run.

pub mod names;
pub mod output;
pub mod random;

use chrono::{DateTime, Utc};
use tracing::info;

use crate::config::{DatasetCounts, GeneratorConfig};
use crate::domain::catalog::{
    Category, DeliveryFrequency, Product, Supplier, MARKUP_MAX, MARKUP_MIN,
};
use crate::domain::dataset::Dataset;
use crate::domain::ids::{
    CampaignId, CustomerId, EmployeeId, FinanceId, FootfallId, InventoryId, ProductId, ReturnId,
    SaleId, StoreId, SupplierId,
};
use crate::domain::inventory::{InventoryItem, InventoryStatus};
use crate::domain::money::round2;
use crate::domain::operations::{
    converted, Campaign, FinanceRecord, Footfall, MarketingChannel, CLICK_CONVERSION,
    CLICK_THROUGH, COGS_SHARE, OPEX_SHARE, ORDER_VALUE, STORE_CLOSE_HOUR, STORE_OPEN_HOUR,
    VISIT_CONVERSION,
};
use crate::domain::people::{
    departments, Customer, Employee, EmployeeRole, LoyaltyTier, AVG_VISIT_SPEND_MAX,
    AVG_VISIT_SPEND_MIN,
};
use crate::domain::sales::{
    PaymentMethod, ProductReturn, ReturnCondition, Sale, DEEP_DISCOUNT, MODERATE_DISCOUNT,
    PROMOTION_RANGE, RETURN_REASONS,
};
use crate::domain::schema::Schema;
use crate::domain::store::{Region, Store, StoreStatus, CITIES, STORE_BRAND};
use crate::errors::GenerationError;

pub use output::{CollectionSink, DatasetWriter, NullSink};
pub use random::{SeededRng, WeightedTable};

/// Probability that a sale is attributed to a known customer.
pub const CUSTOMER_ATTRIBUTION: f64 = 0.6;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum DiscountBracket {
    None,
    Moderate,
    Deep,
}

/// Fixed categorical weights. Built once per generator so a bad table fails
/// before any record is drawn.
#[derive(Debug)]
struct Distributions {
    store_status: WeightedTable<StoreStatus>,
    loyalty_tier: WeightedTable<LoyaltyTier>,
    discount: WeightedTable<DiscountBracket>,
}

impl Distributions {
    fn new() -> Result<Self, GenerationError> {
        Ok(Self {
            store_status: WeightedTable::new(
                "store.status",
                &[
                    (0.9, StoreStatus::Active),
                    (0.07, StoreStatus::Maintenance),
                    (0.03, StoreStatus::Closed),
                ],
            )?,
            loyalty_tier: WeightedTable::new(
                "customer.loyaltyTier",
                &[
                    (0.5, LoyaltyTier::Bronze),
                    (0.3, LoyaltyTier::Silver),
                    (0.15, LoyaltyTier::Gold),
                    (0.05, LoyaltyTier::Platinum),
                ],
            )?,
            discount: WeightedTable::new(
                "sale.discount",
                &[
                    (0.7, DiscountBracket::None),
                    (0.2, DiscountBracket::Moderate),
                    (0.1, DiscountBracket::Deep),
                ],
            )?,
        })
    }
}

#[derive(Debug)]
pub struct DatasetGenerator {
    rng: SeededRng,
    counts: DatasetCounts,
    inventory_store_limit: usize,
    inventory_items: (usize, usize),
    version: String,
    distributions: Distributions,
}

impl DatasetGenerator {
    pub fn new(config: &GeneratorConfig) -> Result<Self, GenerationError> {
        if config.inventory_items_min > config.inventory_items_max {
            return Err(GenerationError::Precondition(format!(
                "inventory sample range {}..={} is inverted",
                config.inventory_items_min, config.inventory_items_max
            )));
        }
        Ok(Self {
            rng: SeededRng::new(config.seed, config.reference_time),
            counts: config.counts,
            inventory_store_limit: config.inventory_store_limit,
            inventory_items: (config.inventory_items_min, config.inventory_items_max),
            version: config.version.clone(),
            distributions: Distributions::new()?,
        })
    }

    pub fn reference_time(&self) -> DateTime<Utc> {
        self.rng.now()
    }

    /// Runs the full pipeline without writing anything.
    pub fn generate(&mut self) -> Result<Dataset, GenerationError> {
        self.generate_with_sink(&mut NullSink)
    }

    /// Runs the full pipeline, handing each collection to `sink` right after it
    /// is generated and the merged dataset at the end.
    pub fn generate_with_sink(
        &mut self,
        sink: &mut dyn CollectionSink,
    ) -> Result<Dataset, GenerationError> {
        let counts = self.counts;
        let mut dataset = Dataset::empty(self.rng.now(), self.version.clone());

        dataset.suppliers = self.generate_suppliers(counts.suppliers)?;
        finish_collection(sink, "suppliers", &dataset.suppliers)?;

        dataset.stores = self.generate_stores(counts.stores)?;
        finish_collection(sink, "stores", &dataset.stores)?;

        dataset.products = self.generate_products(counts.products, &dataset.suppliers)?;
        finish_collection(sink, "products", &dataset.products)?;

        dataset.customers = self.generate_customers(counts.customers, &dataset.stores)?;
        finish_collection(sink, "customers", &dataset.customers)?;

        dataset.employees = self.generate_employees(counts.employees, &dataset.stores)?;
        finish_collection(sink, "employees", &dataset.employees)?;

        dataset.sales = self.generate_sales(
            counts.sales,
            &dataset.stores,
            &dataset.products,
            &dataset.customers,
        )?;
        finish_collection(sink, "sales", &dataset.sales)?;

        let stocked = &dataset.stores[..dataset.stores.len().min(self.inventory_store_limit)];
        dataset.inventory = self.generate_inventory(stocked, &dataset.products)?;
        finish_collection(sink, "inventory", &dataset.inventory)?;

        dataset.returns = self.generate_returns(counts.returns, &dataset.sales)?;
        finish_collection(sink, "returns", &dataset.returns)?;

        dataset.footfall = self.generate_footfall(counts.footfall, &dataset.stores)?;
        finish_collection(sink, "footfall", &dataset.footfall)?;

        dataset.marketing = self.generate_marketing(counts.marketing)?;
        finish_collection(sink, "marketing", &dataset.marketing)?;

        dataset.finance = self.generate_finance(counts.finance)?;
        finish_collection(sink, "finance", &dataset.finance)?;

        let dataset = dataset.seal();
        output::emit_dataset(sink, &dataset)?;
        info!(
            event_name = "generator.dataset.sealed",
            total_records = dataset.metadata.total_records,
            version = %dataset.metadata.version,
            "generated dataset"
        );
        Ok(dataset)
    }

    pub fn generate_suppliers(&mut self, count: usize) -> Result<Vec<Supplier>, GenerationError> {
        let mut suppliers = Vec::with_capacity(count);
        for sequence in 1..=count {
            let amount = self.rng.int(1, 4) as usize;
            let delivery_categories =
                self.rng.sample(&Category::ALL, amount).into_iter().copied().collect();
            let contact_person = names::person_name(&mut self.rng);
            let supplier = Supplier {
                id: SupplierId::from_sequence(sequence),
                name: names::company(&mut self.rng),
                location: self.rng.word(names::SUPPLIER_CITIES).to_string(),
                country: self.rng.word(names::COUNTRIES).to_string(),
                delivery_categories,
                delivery_frequency: DeliveryFrequency::ALL
                    [self.rng.index(DeliveryFrequency::ALL.len())],
                lead_time_days: self.rng.int(1, 14),
                min_order_value: self.rng.int(500, 5000),
                rating: self.rng.decimal(3.5, 5.0, 1),
                email: names::email_for(&mut self.rng, &contact_person),
                contact_person,
                phone: names::phone(&mut self.rng),
            };
            suppliers.push(accept(supplier)?);
        }
        Ok(suppliers)
    }

    pub fn generate_stores(&mut self, count: usize) -> Result<Vec<Store>, GenerationError> {
        let mut stores = Vec::with_capacity(count);
        for sequence in 1..=count {
            let name = format!(
                "{STORE_BRAND} {} {}",
                self.rng.word(&CITIES),
                self.rng.word(names::STORE_FORMATS)
            );
            let store = Store {
                id: StoreId::from_sequence(sequence),
                name,
                region: Region::ALL[self.rng.index(Region::ALL.len())],
                city: self.rng.word(&CITIES).to_string(),
                address: names::street_address(&mut self.rng),
                sqft: self.rng.int(20_000, 150_000),
                open_date: self.rng.past(10).date_naive(),
                manager: names::person_name(&mut self.rng),
                status: self.rng.weighted(&self.distributions.store_status),
                lat: self.rng.decimal(-90.0, 90.0, 4),
                lng: self.rng.decimal(-180.0, 180.0, 4),
            };
            stores.push(accept(store)?);
        }
        Ok(stores)
    }

    /// Each product's supplier is drawn from the suppliers delivering its
    /// category, or from all suppliers when none does.
    pub fn generate_products(
        &mut self,
        count: usize,
        suppliers: &[Supplier],
    ) -> Result<Vec<Product>, GenerationError> {
        require_parent(count, "products", "suppliers", suppliers)?;

        let mut products = Vec::with_capacity(count);
        for sequence in 1..=count {
            let category = Category::ALL[self.rng.index(Category::ALL.len())];
            let cost_price = self.rng.decimal(1.0, 500.0, 2);
            let markup = self.rng.decimal(MARKUP_MIN, MARKUP_MAX, 2);

            let qualified: Vec<&Supplier> =
                suppliers.iter().filter(|supplier| supplier.delivers(category)).collect();
            let supplier_id = if qualified.is_empty() {
                self.rng.pick(suppliers).map(|supplier| supplier.id.clone())
            } else {
                self.rng.pick(&qualified).map(|supplier| supplier.id.clone())
            }
            .ok_or_else(|| missing_parent("products", "suppliers"))?;

            let product = Product {
                id: ProductId::from_sequence(sequence),
                sku: self.rng.alphanumeric(10),
                name: names::product_name(&mut self.rng),
                category,
                sub_category: self.rng.word(category.sub_categories()).to_string(),
                brand: names::company(&mut self.rng),
                unit_price: Product::unit_price_for(cost_price, markup),
                cost_price,
                supplier_id,
                weight: (category == Category::Electronics)
                    .then(|| self.rng.decimal(0.1, 10.0, 2)),
                perishable: category.is_perishable(),
            };
            products.push(accept(product)?);
        }
        Ok(products)
    }

    pub fn generate_customers(
        &mut self,
        count: usize,
        stores: &[Store],
    ) -> Result<Vec<Customer>, GenerationError> {
        require_parent(count, "customers", "stores", stores)?;

        let mut customers = Vec::with_capacity(count);
        for sequence in 1..=count {
            let join_date = self.rng.past(5).date_naive();
            let visit_count = self.rng.int(1, 200);
            let average_spend = self.rng.decimal(AVG_VISIT_SPEND_MIN, AVG_VISIT_SPEND_MAX, 2);
            let name = names::person_name(&mut self.rng);
            let customer = Customer {
                id: CustomerId::from_sequence(sequence),
                email: names::email_for(&mut self.rng, &name),
                name,
                phone: names::phone(&mut self.rng),
                loyalty_tier: self.rng.weighted(&self.distributions.loyalty_tier),
                join_date,
                total_spend: round2(f64::from(visit_count) * average_spend),
                visit_count,
                last_visit: self.rng.recent(30).date_naive(),
                region: Region::ALL[self.rng.index(Region::ALL.len())],
                preferred_store: self
                    .rng
                    .pick(stores)
                    .map(|store| store.id.clone())
                    .ok_or_else(|| missing_parent("customers", "stores"))?,
            };
            customers.push(accept(customer)?);
        }
        Ok(customers)
    }

    pub fn generate_employees(
        &mut self,
        count: usize,
        stores: &[Store],
    ) -> Result<Vec<Employee>, GenerationError> {
        require_parent(count, "employees", "stores", stores)?;

        let departments = departments();
        let mut employees = Vec::with_capacity(count);
        for sequence in 1..=count {
            let role = EmployeeRole::ALL[self.rng.index(EmployeeRole::ALL.len())];
            let (salary_min, salary_max) = role.salary_band();
            let name = names::person_name(&mut self.rng);
            let employee = Employee {
                id: EmployeeId::from_sequence(sequence),
                role,
                department: self.rng.word(&departments).to_string(),
                store_id: self
                    .rng
                    .pick(stores)
                    .map(|store| store.id.clone())
                    .ok_or_else(|| missing_parent("employees", "stores"))?,
                hire_date: self.rng.past(8).date_naive(),
                salary: self.rng.int(salary_min, salary_max),
                performance: self.rng.decimal(2.5, 5.0, 1),
                email: names::email_for(&mut self.rng, &name),
                name,
            };
            employees.push(accept(employee)?);
        }
        Ok(employees)
    }

    /// Sales copy the product's current unit price. About 60% carry a customer
    /// when any exist.
    pub fn generate_sales(
        &mut self,
        count: usize,
        stores: &[Store],
        products: &[Product],
        customers: &[Customer],
    ) -> Result<Vec<Sale>, GenerationError> {
        require_parent(count, "sales", "stores", stores)?;
        require_parent(count, "sales", "products", products)?;

        let mut sales = Vec::with_capacity(count);
        for sequence in 1..=count {
            let store = self.rng.pick(stores).ok_or_else(|| missing_parent("sales", "stores"))?;
            let product =
                self.rng.pick(products).ok_or_else(|| missing_parent("sales", "products"))?;
            let customer_id = if self.rng.chance(CUSTOMER_ATTRIBUTION) {
                self.rng.pick(customers).map(|customer| customer.id.clone())
            } else {
                None
            };
            let quantity = self.rng.int(1, 10);
            let discount = match self.rng.weighted(&self.distributions.discount) {
                DiscountBracket::None => 0.0,
                DiscountBracket::Moderate => {
                    self.rng.decimal(MODERATE_DISCOUNT.0, MODERATE_DISCOUNT.1, 2)
                }
                DiscountBracket::Deep => self.rng.decimal(DEEP_DISCOUNT.0, DEEP_DISCOUNT.1, 2),
            };
            let promotion_id = (discount > 0.0).then(|| {
                format!("PROMO{}", self.rng.int(PROMOTION_RANGE.0, PROMOTION_RANGE.1))
            });

            let sale = Sale {
                id: SaleId::from_sequence(sequence),
                transaction_date: self.rng.recent(90),
                store_id: store.id.clone(),
                product_id: product.id.clone(),
                customer_id,
                quantity,
                unit_price: product.unit_price,
                discount,
                total: Sale::line_total(product.unit_price, quantity, discount),
                payment_method: PaymentMethod::ALL[self.rng.index(PaymentMethod::ALL.len())],
                promotion_id,
            };
            sales.push(accept(sale)?);
        }
        Ok(sales)
    }

    /// Each store independently stocks a random subset of the catalog, so
    /// coverage is uneven and most (store, product) pairs have no row.
    pub fn generate_inventory(
        &mut self,
        stores: &[Store],
        products: &[Product],
    ) -> Result<Vec<InventoryItem>, GenerationError> {
        let (items_min, items_max) = self.inventory_items;
        if !stores.is_empty() && items_min > 0 && products.is_empty() {
            return Err(missing_parent("inventory", "products"));
        }

        let mut inventory = Vec::new();
        for store in stores {
            let wanted = self.rng.int(saturate(items_min), saturate(items_max)) as usize;
            let stocked = self.rng.sample(products, wanted.min(products.len()));
            for product in stocked {
                let quantity = self.rng.int(0, 500);
                let reorder_level = self.rng.int(20, 100);
                let days_of_stock = if quantity > 0 { self.rng.int(1, 60) } else { 0 };
                let item = InventoryItem {
                    id: InventoryId::from_sequence(inventory.len() + 1),
                    store_id: store.id.clone(),
                    product_id: product.id.clone(),
                    quantity,
                    reorder_level,
                    last_restocked: self.rng.recent(30).date_naive(),
                    days_of_stock,
                    status: InventoryStatus::classify(quantity, reorder_level),
                };
                inventory.push(accept(item)?);
            }
        }
        Ok(inventory)
    }

    pub fn generate_returns(
        &mut self,
        count: usize,
        sales: &[Sale],
    ) -> Result<Vec<ProductReturn>, GenerationError> {
        require_parent(count, "returns", "sales", sales)?;

        let mut returns = Vec::with_capacity(count);
        for sequence in 1..=count {
            let sale = self.rng.pick(sales).ok_or_else(|| missing_parent("returns", "sales"))?;
            let refund_share = self.rng.decimal(0.5, 1.0, 2);
            let entry = ProductReturn {
                id: ReturnId::from_sequence(sequence),
                sale_id: sale.id.clone(),
                return_date: self.rng.recent(30).date_naive(),
                reason: self.rng.word(&RETURN_REASONS).to_string(),
                refund_amount: round2(sale.total * refund_share),
                condition: ReturnCondition::ALL[self.rng.index(ReturnCondition::ALL.len())],
            };
            returns.push(accept(entry)?);
        }
        Ok(returns)
    }

    pub fn generate_footfall(
        &mut self,
        count: usize,
        stores: &[Store],
    ) -> Result<Vec<Footfall>, GenerationError> {
        require_parent(count, "footfall", "stores", stores)?;

        let mut footfall = Vec::with_capacity(count);
        for sequence in 1..=count {
            let store =
                self.rng.pick(stores).ok_or_else(|| missing_parent("footfall", "stores"))?;
            let visitors = self.rng.int(50, 800);
            let rate = self.rng.decimal(VISIT_CONVERSION.0, VISIT_CONVERSION.1, 2);
            let entry = Footfall {
                id: FootfallId::from_sequence(sequence),
                store_id: store.id.clone(),
                date: self.rng.recent(90).date_naive(),
                hour: self.rng.int(STORE_OPEN_HOUR, STORE_CLOSE_HOUR),
                visitors,
                conversions: converted(visitors, rate),
            };
            footfall.push(accept(entry)?);
        }
        Ok(footfall)
    }

    /// Campaigns start within the last 90 days and end within the last 30,
    /// never before they start.
    pub fn generate_marketing(&mut self, count: usize) -> Result<Vec<Campaign>, GenerationError> {
        let mut campaigns = Vec::with_capacity(count);
        for sequence in 1..=count {
            let spend = self.rng.decimal(5_000.0, 100_000.0, 2);
            let impressions = self.rng.int(10_000, 1_000_000);
            let click_through = self.rng.decimal(CLICK_THROUGH.0, CLICK_THROUGH.1, 3);
            let clicks = converted(impressions, click_through);
            let click_conversion = self.rng.decimal(CLICK_CONVERSION.0, CLICK_CONVERSION.1, 3);
            let conversions = converted(clicks, click_conversion);
            let order_value = self.rng.decimal(ORDER_VALUE.0, ORDER_VALUE.1, 2);
            let campaign_name = format!(
                "{} {} {}",
                self.rng.word(names::PRODUCT_ADJECTIVES),
                self.rng.word(names::PRODUCT_NOUNS),
                self.rng.word(names::CAMPAIGN_KINDS)
            );
            let channel = MarketingChannel::ALL[self.rng.index(MarketingChannel::ALL.len())];
            let start_date = self.rng.recent(90).date_naive();
            let end_date = self.rng.recent(30).date_naive().max(start_date);

            let campaign = Campaign {
                id: CampaignId::from_sequence(sequence),
                campaign_name,
                channel,
                start_date,
                end_date,
                spend,
                impressions,
                clicks,
                conversions,
                revenue: round2(f64::from(conversions) * order_value),
            };
            campaigns.push(accept(campaign)?);
        }
        Ok(campaigns)
    }

    pub fn generate_finance(
        &mut self,
        count: usize,
    ) -> Result<Vec<FinanceRecord>, GenerationError> {
        let mut finance = Vec::with_capacity(count);
        for sequence in 1..=count {
            let revenue = self.rng.decimal(100_000.0, 500_000.0, 2);
            let cogs_share = self.rng.decimal(COGS_SHARE.0, COGS_SHARE.1, 2);
            let opex_share = self.rng.decimal(OPEX_SHARE.0, OPEX_SHARE.1, 2);
            let date = self.rng.recent(100).date_naive();
            let record = FinanceRecord::from_shares(
                FinanceId::from_sequence(sequence),
                date,
                revenue,
                cogs_share,
                opex_share,
            );
            finance.push(accept(record)?);
        }
        Ok(finance)
    }
}

fn accept<T: Schema>(record: T) -> Result<T, GenerationError> {
    record.validate()?;
    Ok(record)
}

fn finish_collection<T: serde::Serialize>(
    sink: &mut dyn CollectionSink,
    name: &'static str,
    records: &[T],
) -> Result<(), GenerationError> {
    info!(
        event_name = "generator.collection.generated",
        collection = name,
        records = records.len(),
        "generated collection"
    );
    output::emit(sink, name, records)
}

fn require_parent<T>(
    count: usize,
    child: &str,
    parent: &str,
    parents: &[T],
) -> Result<(), GenerationError> {
    if count > 0 && parents.is_empty() {
        return Err(missing_parent(child, parent));
    }
    Ok(())
}

fn missing_parent(child: &str, parent: &str) -> GenerationError {
    GenerationError::Precondition(format!("{child} require at least one of {parent}"))
}

fn saturate(value: usize) -> u32 {
    u32::try_from(value).unwrap_or(u32::MAX)
}
