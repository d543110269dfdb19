//! Customers and employees.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::catalog::Category;
use crate::domain::ids::{CustomerId, EmployeeId, StoreId};
use crate::domain::schema::{Check, Schema};
use crate::domain::store::Region;
use crate::errors::SchemaViolation;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoyaltyTier {
    Bronze,
    Silver,
    Gold,
    Platinum,
}

impl LoyaltyTier {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Bronze => "bronze",
            Self::Silver => "silver",
            Self::Gold => "gold",
            Self::Platinum => "platinum",
        }
    }
}

impl fmt::Display for LoyaltyTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    pub id: CustomerId,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub loyalty_tier: LoyaltyTier,
    pub join_date: NaiveDate,
    pub total_spend: f64,
    pub visit_count: u32,
    pub last_visit: NaiveDate,
    pub region: Region,
    pub preferred_store: StoreId,
}

pub const AVG_VISIT_SPEND_MIN: f64 = 20.0;
pub const AVG_VISIT_SPEND_MAX: f64 = 150.0;

impl Schema for Customer {
    const ENTITY: &'static str = "customer";

    fn record_id(&self) -> &str {
        self.id.as_str()
    }

    fn validate(&self) -> Result<(), SchemaViolation> {
        let check = Check::new(Self::ENTITY, self.id.as_str());
        check.id("id", self.id.is_well_formed())?;
        check.non_empty("name", &self.name)?;
        check.ensure(self.email.contains('@'), "email", || format!("`{}` has no @", self.email))?;
        check.in_range("visitCount", self.visit_count, 1, 200)?;
        let visits = f64::from(self.visit_count);
        // total spend is visits x per-visit average, rounded to cents
        check.in_range(
            "totalSpend",
            self.total_spend,
            visits * AVG_VISIT_SPEND_MIN - 0.005,
            visits * AVG_VISIT_SPEND_MAX + 0.005,
        )?;
        check.id("preferredStore", self.preferred_store.is_well_formed())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EmployeeRole {
    Manager,
    #[serde(rename = "Assistant Manager")]
    AssistantManager,
    Cashier,
    #[serde(rename = "Stock Clerk")]
    StockClerk,
    #[serde(rename = "Department Lead")]
    DepartmentLead,
    Security,
    Janitor,
}

impl EmployeeRole {
    pub const ALL: [EmployeeRole; 7] = [
        Self::Manager,
        Self::AssistantManager,
        Self::Cashier,
        Self::StockClerk,
        Self::DepartmentLead,
        Self::Security,
        Self::Janitor,
    ];

    pub fn base_salary(self) -> u32 {
        match self {
            Self::Manager => 80_000,
            Self::AssistantManager => 50_000,
            _ => 35_000,
        }
    }

    /// Inclusive salary band: 80% to 130% of the role's base.
    pub fn salary_band(self) -> (u32, u32) {
        let base = self.base_salary();
        (base / 10 * 8, base / 10 * 13)
    }
}

pub const SUPPORT_DEPARTMENTS: [&str; 3] = ["Administration", "Security", "Maintenance"];

pub fn departments() -> Vec<&'static str> {
    Category::ALL.into_iter().map(Category::as_str).chain(SUPPORT_DEPARTMENTS).collect()
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Employee {
    pub id: EmployeeId,
    pub name: String,
    pub role: EmployeeRole,
    pub department: String,
    pub store_id: StoreId,
    pub hire_date: NaiveDate,
    pub salary: u32,
    pub performance: f64,
    pub email: String,
}

impl Schema for Employee {
    const ENTITY: &'static str = "employee";

    fn record_id(&self) -> &str {
        self.id.as_str()
    }

    fn validate(&self) -> Result<(), SchemaViolation> {
        let check = Check::new(Self::ENTITY, self.id.as_str());
        check.id("id", self.id.is_well_formed())?;
        check.non_empty("name", &self.name)?;
        check.ensure(departments().contains(&self.department.as_str()), "department", || {
            format!("`{}` is not a known department", self.department)
        })?;
        check.id("storeId", self.store_id.is_well_formed())?;
        let (low, high) = self.role.salary_band();
        check.in_range("salary", self.salary, low, high)?;
        check.in_range("performance", self.performance, 2.5, 5.0)?;
        check.ensure(self.email.contains('@'), "email", || format!("`{}` has no @", self.email))
    }
}

#[cfg(test)]
mod tests {
    use super::{departments, EmployeeRole, LoyaltyTier};

    #[test]
    fn salary_band_follows_role_base() {
        assert_eq!(EmployeeRole::Manager.salary_band(), (64_000, 104_000));
        assert_eq!(EmployeeRole::AssistantManager.salary_band(), (40_000, 65_000));
        assert_eq!(EmployeeRole::Cashier.salary_band(), (28_000, 45_500));
    }

    #[test]
    fn departments_are_categories_plus_support_functions() {
        let departments = departments();
        assert_eq!(departments.len(), 11);
        assert!(departments.contains(&"Fresh Produce"));
        assert!(departments.contains(&"Maintenance"));
    }

    #[test]
    fn tiers_order_from_bronze_to_platinum() {
        assert!(LoyaltyTier::Bronze < LoyaltyTier::Silver);
        assert!(LoyaltyTier::Gold < LoyaltyTier::Platinum);
        assert_eq!(serde_json::to_string(&LoyaltyTier::Gold).unwrap(), "\"gold\"");
    }
}
