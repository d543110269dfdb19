pub mod catalog;
pub mod dataset;
pub mod ids;
pub mod integrity;
pub mod inventory;
pub mod money;
pub mod operations;
pub mod people;
pub mod sales;
pub mod schema;
pub mod store;
pub mod timefmt;

pub use catalog::{Category, DeliveryFrequency, Product, Supplier};
pub use dataset::{Dataset, DatasetMetadata, COLLECTIONS};
pub use ids::{
    CampaignId, CustomerId, EmployeeId, FinanceId, FootfallId, InventoryId, ProductId, ReturnId,
    SaleId, StoreId, SupplierId,
};
pub use integrity::{IntegrityCheck, IntegrityReport};
pub use inventory::{InventoryItem, InventoryStatus};
pub use operations::{Campaign, FinanceRecord, Footfall, MarketingChannel};
pub use people::{Customer, Employee, EmployeeRole, LoyaltyTier};
pub use sales::{PaymentMethod, ProductReturn, ReturnCondition, Sale};
pub use schema::Schema;
pub use store::{Region, Store, StoreStatus};
