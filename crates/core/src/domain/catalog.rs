//! Product catalog: categories, suppliers, and products.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::ids::{ProductId, SupplierId};
use crate::domain::money::round2;
use crate::domain::schema::{Check, Schema};
use crate::errors::SchemaViolation;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Category {
    Grocery,
    #[serde(rename = "Fresh Produce")]
    FreshProduce,
    Electronics,
    Apparel,
    Pharmacy,
    Bakery,
    Dairy,
    Meat,
}

impl Category {
    pub const ALL: [Category; 8] = [
        Category::Grocery,
        Category::FreshProduce,
        Category::Electronics,
        Category::Apparel,
        Category::Pharmacy,
        Category::Bakery,
        Category::Dairy,
        Category::Meat,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Grocery => "Grocery",
            Self::FreshProduce => "Fresh Produce",
            Self::Electronics => "Electronics",
            Self::Apparel => "Apparel",
            Self::Pharmacy => "Pharmacy",
            Self::Bakery => "Bakery",
            Self::Dairy => "Dairy",
            Self::Meat => "Meat",
        }
    }

    pub fn sub_categories(self) -> &'static [&'static str] {
        match self {
            Self::Grocery => &["Dry Goods", "Canned Foods", "Condiments", "Snacks"],
            Self::FreshProduce => &["Fruits", "Vegetables", "Herbs", "Organic"],
            Self::Electronics => &["Mobile", "Computers", "Audio", "Appliances"],
            Self::Apparel => &["Mens", "Womens", "Kids", "Footwear"],
            Self::Pharmacy => &["OTC", "Prescriptions", "Vitamins", "First Aid"],
            Self::Bakery => &["Bread", "Cakes", "Pastries", "Cookies"],
            Self::Dairy => &["Milk", "Cheese", "Yogurt", "Butter"],
            Self::Meat => &["Beef", "Chicken", "Pork", "Seafood"],
        }
    }

    pub fn is_perishable(self) -> bool {
        matches!(self, Self::FreshProduce | Self::Bakery | Self::Dairy | Self::Meat)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let wanted = value.trim();
        Self::ALL
            .into_iter()
            .find(|category| category.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| {
                let known = Self::ALL.map(Category::as_str).join("|");
                format!("unknown category `{wanted}` (expected {known})")
            })
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DeliveryFrequency {
    Daily,
    Weekly,
    BiWeekly,
    Monthly,
}

impl DeliveryFrequency {
    pub const ALL: [DeliveryFrequency; 4] =
        [Self::Daily, Self::Weekly, Self::BiWeekly, Self::Monthly];
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Supplier {
    pub id: SupplierId,
    pub name: String,
    pub location: String,
    pub country: String,
    pub delivery_categories: Vec<Category>,
    pub delivery_frequency: DeliveryFrequency,
    pub lead_time_days: u32,
    pub min_order_value: u32,
    pub rating: f64,
    pub contact_person: String,
    pub email: String,
    pub phone: String,
}

impl Supplier {
    pub fn delivers(&self, category: Category) -> bool {
        self.delivery_categories.contains(&category)
    }
}

impl Schema for Supplier {
    const ENTITY: &'static str = "supplier";

    fn record_id(&self) -> &str {
        self.id.as_str()
    }

    fn validate(&self) -> Result<(), SchemaViolation> {
        let check = Check::new(Self::ENTITY, self.id.as_str());
        check.id("id", self.id.is_well_formed())?;
        check.non_empty("name", &self.name)?;
        check.non_empty("location", &self.location)?;
        check.non_empty("country", &self.country)?;
        check.in_range("deliveryCategories", self.delivery_categories.len(), 1, 4)?;
        let mut seen = Vec::with_capacity(self.delivery_categories.len());
        for category in &self.delivery_categories {
            check.ensure(!seen.contains(category), "deliveryCategories", || {
                format!("category `{category}` listed twice")
            })?;
            seen.push(*category);
        }
        check.in_range("leadTimeDays", self.lead_time_days, 1, 14)?;
        check.in_range("minOrderValue", self.min_order_value, 500, 5000)?;
        check.in_range("rating", self.rating, 3.5, 5.0)?;
        check.non_empty("contactPerson", &self.contact_person)?;
        check.ensure(self.email.contains('@'), "email", || format!("`{}` has no @", self.email))
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub sku: String,
    pub name: String,
    pub category: Category,
    pub sub_category: String,
    pub brand: String,
    pub unit_price: f64,
    pub cost_price: f64,
    pub supplier_id: SupplierId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
    pub perishable: bool,
}

pub const MARKUP_MIN: f64 = 1.2;
pub const MARKUP_MAX: f64 = 2.5;

impl Product {
    pub fn unit_price_for(cost_price: f64, markup: f64) -> f64 {
        round2(cost_price * markup)
    }
}

impl Schema for Product {
    const ENTITY: &'static str = "product";

    fn record_id(&self) -> &str {
        self.id.as_str()
    }

    fn validate(&self) -> Result<(), SchemaViolation> {
        let check = Check::new(Self::ENTITY, self.id.as_str());
        check.id("id", self.id.is_well_formed())?;
        check.ensure(
            self.sku.len() == 10
                && self.sku.chars().all(|ch| ch.is_ascii_uppercase() || ch.is_ascii_digit()),
            "sku",
            || format!("`{}` is not 10 uppercase alphanumerics", self.sku),
        )?;
        check.non_empty("name", &self.name)?;
        check.non_empty("brand", &self.brand)?;
        check.ensure(
            self.category.sub_categories().contains(&self.sub_category.as_str()),
            "subCategory",
            || format!("`{}` does not belong to {}", self.sub_category, self.category),
        )?;
        check.in_range("costPrice", self.cost_price, 1.0, 500.0)?;
        check.in_range(
            "unitPrice",
            self.unit_price,
            Self::unit_price_for(self.cost_price, MARKUP_MIN),
            Self::unit_price_for(self.cost_price, MARKUP_MAX),
        )?;
        check.id("supplierId", self.supplier_id.is_well_formed())?;
        check.ensure(self.perishable == self.category.is_perishable(), "perishable", || {
            format!("flag must be {} for {}", self.category.is_perishable(), self.category)
        })?;
        match (self.category, self.weight) {
            (Category::Electronics, Some(weight)) => check.in_range("weight", weight, 0.1, 10.0),
            (Category::Electronics, None) => {
                check.ensure(false, "weight", || "electronics must carry a weight".into())
            }
            (_, Some(_)) => {
                check.ensure(false, "weight", || "only electronics carry a weight".into())
            }
            (_, None) => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Category, Product};
    use crate::domain::ids::{ProductId, SupplierId};
    use crate::domain::schema::Schema;

    fn product() -> Product {
        Product {
            id: ProductId::from_sequence(1),
            sku: "AB12CD34EF".to_string(),
            name: "Rustic Steel Chair".to_string(),
            category: Category::Dairy,
            sub_category: "Cheese".to_string(),
            brand: "Atlas Dairy".to_string(),
            unit_price: 15.0,
            cost_price: 10.0,
            supplier_id: SupplierId::from_sequence(3),
            weight: None,
            perishable: true,
        }
    }

    #[test]
    fn category_names_round_trip_through_display_and_parse() {
        for category in Category::ALL {
            assert_eq!(category.to_string().parse::<Category>(), Ok(category));
        }
        assert_eq!("fresh produce".parse::<Category>(), Ok(Category::FreshProduce));
        assert!("Toys".parse::<Category>().is_err());
    }

    #[test]
    fn category_serializes_with_display_spelling() {
        let json = serde_json::to_string(&Category::FreshProduce).unwrap();
        assert_eq!(json, "\"Fresh Produce\"");
    }

    #[test]
    fn perishable_categories_match_fixed_list() {
        let perishable: Vec<_> =
            Category::ALL.into_iter().filter(|category| category.is_perishable()).collect();
        assert_eq!(
            perishable,
            vec![Category::FreshProduce, Category::Bakery, Category::Dairy, Category::Meat]
        );
    }

    #[test]
    fn valid_product_passes() {
        assert_eq!(product().validate(), Ok(()));
    }

    #[test]
    fn foreign_sub_category_is_rejected() {
        let mut product = product();
        product.sub_category = "Audio".to_string();
        let violation = product.validate().unwrap_err();
        assert_eq!(violation.field, "subCategory");
    }

    #[test]
    fn markup_outside_bounds_is_rejected() {
        let mut product = product();
        product.unit_price = 30.0;
        assert_eq!(product.validate().unwrap_err().field, "unitPrice");
    }

    #[test]
    fn perishable_flag_must_follow_category() {
        let mut product = product();
        product.perishable = false;
        assert_eq!(product.validate().unwrap_err().field, "perishable");
    }
}
