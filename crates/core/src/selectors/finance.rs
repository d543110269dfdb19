//! Marketing return on ad spend and the finance ledger summary.

use serde::Serialize;

use crate::domain::money::{ratio_or_zero, round2};
use crate::domain::operations::{Campaign, FinanceRecord};
use crate::selectors::{descending, Selectors};

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CampaignPerformance<'a> {
    #[serde(flatten)]
    pub campaign: &'a Campaign,
    pub roas: f64,
    pub ctr: f64,
    pub conversion_rate: f64,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct FinanceSummary<'a> {
    pub revenue: f64,
    pub cogs: f64,
    pub opex: f64,
    pub profit: f64,
    /// Percent; 0 without revenue.
    pub margin: f64,
    /// Newest first.
    pub records: Vec<&'a FinanceRecord>,
}

impl<'a> Selectors<'a> {
    /// Campaigns that started inside the date range, best ROAS first.
    pub fn marketing_roas(&self) -> Vec<CampaignPerformance<'a>> {
        let mut campaigns: Vec<CampaignPerformance<'a>> = self
            .data
            .iter()
            .flat_map(|data| data.marketing.iter())
            .filter(|campaign| self.filters.date_range.contains_day(campaign.start_date))
            .map(|campaign| CampaignPerformance {
                campaign,
                roas: ratio_or_zero(campaign.revenue, campaign.spend),
                ctr: ratio_or_zero(f64::from(campaign.clicks), f64::from(campaign.impressions)),
                conversion_rate: ratio_or_zero(
                    f64::from(campaign.conversions),
                    f64::from(campaign.clicks),
                ),
            })
            .collect();
        campaigns.sort_by(|left, right| descending(left.roas, right.roas));
        campaigns
    }

    /// Ledger totals inside the date range. Without a dataset this is the
    /// zero summary.
    pub fn finance_summary(&self) -> FinanceSummary<'a> {
        let mut records: Vec<&'a FinanceRecord> = self
            .data
            .iter()
            .flat_map(|data| data.finance.iter())
            .filter(|record| self.filters.date_range.contains_day(record.date))
            .collect();
        records.sort_by(|left, right| right.date.cmp(&left.date));

        let revenue: f64 = records.iter().map(|record| record.revenue).sum();
        let cogs: f64 = records.iter().map(|record| record.cogs).sum();
        let opex: f64 = records.iter().map(|record| record.operating_expenses).sum();
        let profit: f64 = records.iter().map(|record| record.profit).sum();

        FinanceSummary {
            revenue: round2(revenue),
            cogs: round2(cogs),
            opex: round2(opex),
            profit: round2(profit),
            margin: round2(ratio_or_zero(profit, revenue) * 100.0),
            records,
        }
    }
}
