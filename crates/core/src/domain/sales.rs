//! Point-of-sale transactions and the returns raised against them.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::ids::{CustomerId, ProductId, ReturnId, SaleId, StoreId};
use crate::domain::money::round2;
use crate::domain::schema::{Check, Schema};
use crate::errors::SchemaViolation;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    Cash,
    Card,
    Mobile,
    Voucher,
}

impl PaymentMethod {
    pub const ALL: [PaymentMethod; 4] = [Self::Cash, Self::Card, Self::Mobile, Self::Voucher];
}

/// Discount brackets a sale can fall into: none, moderate, or deep.
pub const MODERATE_DISCOUNT: (f64, f64) = (0.05, 0.15);
pub const DEEP_DISCOUNT: (f64, f64) = (0.2, 0.4);
pub const PROMOTION_RANGE: (u32, u32) = (1, 20);

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sale {
    pub id: SaleId,
    #[serde(with = "crate::domain::timefmt::iso_millis")]
    pub transaction_date: DateTime<Utc>,
    pub store_id: StoreId,
    pub product_id: ProductId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_id: Option<CustomerId>,
    pub quantity: u32,
    pub unit_price: f64,
    pub discount: f64,
    pub total: f64,
    pub payment_method: PaymentMethod,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub promotion_id: Option<String>,
}

impl Sale {
    /// `unitPrice x quantity x (1 - discount)`, rounded to cents.
    pub fn line_total(unit_price: f64, quantity: u32, discount: f64) -> f64 {
        round2(unit_price * f64::from(quantity) * (1.0 - discount))
    }
}

fn discount_in_bracket(discount: f64) -> bool {
    let within = |(low, high): (f64, f64)| discount >= low && discount <= high;
    discount == 0.0 || within(MODERATE_DISCOUNT) || within(DEEP_DISCOUNT)
}

fn promotion_is_well_formed(promotion: &str) -> bool {
    promotion
        .strip_prefix("PROMO")
        .and_then(|number| number.parse::<u32>().ok())
        .is_some_and(|number| (PROMOTION_RANGE.0..=PROMOTION_RANGE.1).contains(&number))
}

impl Schema for Sale {
    const ENTITY: &'static str = "sale";

    fn record_id(&self) -> &str {
        self.id.as_str()
    }

    fn validate(&self) -> Result<(), SchemaViolation> {
        let check = Check::new(Self::ENTITY, self.id.as_str());
        check.id("id", self.id.is_well_formed())?;
        check.id("storeId", self.store_id.is_well_formed())?;
        check.id("productId", self.product_id.is_well_formed())?;
        if let Some(customer_id) = &self.customer_id {
            check.id("customerId", customer_id.is_well_formed())?;
        }
        check.in_range("quantity", self.quantity, 1, 10)?;
        check.ensure(self.unit_price > 0.0, "unitPrice", || "must be positive".into())?;
        check.ensure(discount_in_bracket(self.discount), "discount", || {
            format!("{} is not in a discount bracket", self.discount)
        })?;
        check.derived(
            "total",
            self.total,
            Self::line_total(self.unit_price, self.quantity, self.discount),
        )?;
        match &self.promotion_id {
            Some(promotion) => {
                check.ensure(self.discount > 0.0, "promotionId", || {
                    "present on an undiscounted sale".into()
                })?;
                check.ensure(promotion_is_well_formed(promotion), "promotionId", || {
                    format!("`{promotion}` is not PROMO1..PROMO20")
                })
            }
            None => check.ensure(self.discount == 0.0, "promotionId", || {
                "missing on a discounted sale".into()
            }),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReturnCondition {
    Defective,
    Unopened,
    Damaged,
    Expired,
}

impl ReturnCondition {
    pub const ALL: [ReturnCondition; 4] =
        [Self::Defective, Self::Unopened, Self::Damaged, Self::Expired];
}

pub const RETURN_REASONS: [&str; 5] =
    ["Defective", "Changed mind", "Wrong item", "Not as described", "Expired"];

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductReturn {
    pub id: ReturnId,
    pub sale_id: SaleId,
    pub return_date: NaiveDate,
    pub reason: String,
    pub refund_amount: f64,
    pub condition: ReturnCondition,
}

impl Schema for ProductReturn {
    const ENTITY: &'static str = "return";

    fn record_id(&self) -> &str {
        self.id.as_str()
    }

    fn validate(&self) -> Result<(), SchemaViolation> {
        let check = Check::new(Self::ENTITY, self.id.as_str());
        check.id("id", self.id.is_well_formed())?;
        check.id("saleId", self.sale_id.is_well_formed())?;
        check.ensure(RETURN_REASONS.contains(&self.reason.as_str()), "reason", || {
            format!("`{}` is not a known return reason", self.reason)
        })?;
        check.ensure(self.refund_amount >= 0.0, "refundAmount", || "must not be negative".into())
    }
}
