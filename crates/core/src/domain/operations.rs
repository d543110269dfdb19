//! Store traffic, marketing campaigns, and finance ledger rows.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::ids::{CampaignId, FinanceId, FootfallId, StoreId};
use crate::domain::money::round2;
use crate::domain::schema::{Check, Schema};
use crate::errors::SchemaViolation;

pub const STORE_OPEN_HOUR: u32 = 8;
pub const STORE_CLOSE_HOUR: u32 = 22;
pub const VISIT_CONVERSION: (f64, f64) = (0.15, 0.4);

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Footfall {
    pub id: FootfallId,
    pub store_id: StoreId,
    pub date: NaiveDate,
    pub hour: u32,
    pub visitors: u32,
    pub conversions: u32,
}

/// `floor(count x rate)`, the conversion rule shared by footfall and campaigns.
pub fn converted(count: u32, rate: f64) -> u32 {
    (f64::from(count) * rate).floor() as u32
}

impl Schema for Footfall {
    const ENTITY: &'static str = "footfall";

    fn record_id(&self) -> &str {
        self.id.as_str()
    }

    fn validate(&self) -> Result<(), SchemaViolation> {
        let check = Check::new(Self::ENTITY, self.id.as_str());
        check.id("id", self.id.is_well_formed())?;
        check.id("storeId", self.store_id.is_well_formed())?;
        check.in_range("hour", self.hour, STORE_OPEN_HOUR, STORE_CLOSE_HOUR)?;
        check.in_range("visitors", self.visitors, 50, 800)?;
        check.in_range(
            "conversions",
            self.conversions,
            converted(self.visitors, VISIT_CONVERSION.0),
            converted(self.visitors, VISIT_CONVERSION.1),
        )
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MarketingChannel {
    #[serde(rename = "Social Media")]
    SocialMedia,
    Email,
    #[serde(rename = "Display Ads")]
    DisplayAds,
    Search,
    #[serde(rename = "TV")]
    Tv,
    Radio,
    Print,
}

impl MarketingChannel {
    pub const ALL: [MarketingChannel; 7] = [
        Self::SocialMedia,
        Self::Email,
        Self::DisplayAds,
        Self::Search,
        Self::Tv,
        Self::Radio,
        Self::Print,
    ];
}

pub const CLICK_THROUGH: (f64, f64) = (0.01, 0.05);
pub const CLICK_CONVERSION: (f64, f64) = (0.02, 0.1);
pub const ORDER_VALUE: (f64, f64) = (50.0, 200.0);

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Campaign {
    pub id: CampaignId,
    pub campaign_name: String,
    pub channel: MarketingChannel,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub spend: f64,
    pub impressions: u32,
    pub clicks: u32,
    pub conversions: u32,
    pub revenue: f64,
}

impl Schema for Campaign {
    const ENTITY: &'static str = "marketing";

    fn record_id(&self) -> &str {
        self.id.as_str()
    }

    fn validate(&self) -> Result<(), SchemaViolation> {
        let check = Check::new(Self::ENTITY, self.id.as_str());
        check.id("id", self.id.is_well_formed())?;
        check.non_empty("campaignName", &self.campaign_name)?;
        check.ensure(self.end_date >= self.start_date, "endDate", || {
            format!("{} precedes start {}", self.end_date, self.start_date)
        })?;
        check.in_range("spend", self.spend, 5_000.0, 100_000.0)?;
        check.in_range("impressions", self.impressions, 10_000, 1_000_000)?;
        check.in_range(
            "clicks",
            self.clicks,
            converted(self.impressions, CLICK_THROUGH.0),
            converted(self.impressions, CLICK_THROUGH.1),
        )?;
        check.in_range(
            "conversions",
            self.conversions,
            converted(self.clicks, CLICK_CONVERSION.0),
            converted(self.clicks, CLICK_CONVERSION.1),
        )?;
        let conversions = f64::from(self.conversions);
        check.in_range(
            "revenue",
            self.revenue,
            round2(conversions * ORDER_VALUE.0),
            round2(conversions * ORDER_VALUE.1),
        )
    }
}

pub const COGS_SHARE: (f64, f64) = (0.5, 0.7);
pub const OPEX_SHARE: (f64, f64) = (0.15, 0.25);

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinanceRecord {
    pub id: FinanceId,
    pub date: NaiveDate,
    pub revenue: f64,
    pub cogs: f64,
    pub operating_expenses: f64,
    pub profit: f64,
    pub margin: f64,
}

impl FinanceRecord {
    /// Builds a ledger row from raw revenue and cost shares. Profit and margin
    /// are derived from the rounded stored amounts so they can be recomputed.
    pub fn from_shares(
        id: FinanceId,
        date: NaiveDate,
        revenue: f64,
        cogs_share: f64,
        opex_share: f64,
    ) -> Self {
        let cogs = round2(revenue * cogs_share);
        let operating_expenses = round2(revenue * opex_share);
        let revenue = round2(revenue);
        let profit = Self::profit_for(revenue, cogs, operating_expenses);
        Self {
            id,
            date,
            revenue,
            cogs,
            operating_expenses,
            profit,
            margin: Self::margin_for(profit, revenue),
        }
    }

    pub fn profit_for(revenue: f64, cogs: f64, operating_expenses: f64) -> f64 {
        round2(revenue - cogs - operating_expenses)
    }

    /// Profit as a percentage of revenue, 0 without revenue.
    pub fn margin_for(profit: f64, revenue: f64) -> f64 {
        if revenue > 0.0 {
            round2(profit / revenue * 100.0)
        } else {
            0.0
        }
    }
}

impl Schema for FinanceRecord {
    const ENTITY: &'static str = "finance";

    fn record_id(&self) -> &str {
        self.id.as_str()
    }

    fn validate(&self) -> Result<(), SchemaViolation> {
        let check = Check::new(Self::ENTITY, self.id.as_str());
        check.id("id", self.id.is_well_formed())?;
        check.in_range("revenue", self.revenue, 100_000.0, 500_000.0)?;
        check.derived(
            "profit",
            self.profit,
            Self::profit_for(self.revenue, self.cogs, self.operating_expenses),
        )?;
        check.derived("margin", self.margin, Self::margin_for(self.profit, self.revenue))
    }
}
