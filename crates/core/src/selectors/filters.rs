//! The filter specification every selector reads.

use std::collections::BTreeSet;

use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::catalog::Category;
use crate::domain::ids::StoreId;
use crate::domain::store::Region;
use crate::domain::timefmt::day_start;

/// Inclusive instant range.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    #[serde(with = "crate::domain::timefmt::iso_millis")]
    pub start: DateTime<Utc>,
    #[serde(with = "crate::domain::timefmt::iso_millis")]
    pub end: DateTime<Utc>,
}

impl DateRange {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self { start, end }
    }

    /// From midnight of `start` through the last millisecond of `end`.
    pub fn from_days(start: NaiveDate, end: NaiveDate) -> Self {
        Self {
            start: day_start(start),
            end: day_start(end) + Duration::days(1) - Duration::milliseconds(1),
        }
    }

    pub fn contains(&self, at: DateTime<Utc>) -> bool {
        self.start <= at && at <= self.end
    }

    /// Calendar dates compare as their UTC midnight.
    pub fn contains_day(&self, date: NaiveDate) -> bool {
        self.contains(day_start(date))
    }
}

/// Empty sets mean "no restriction".
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterSpec {
    pub date_range: DateRange,
    #[serde(default)]
    pub store_ids: BTreeSet<StoreId>,
    #[serde(default)]
    pub categories: BTreeSet<Category>,
    /// Carried for consumers; the sales filter does not read it.
    #[serde(default)]
    pub regions: BTreeSet<Region>,
}

impl FilterSpec {
    pub fn new(date_range: DateRange) -> Self {
        Self {
            date_range,
            store_ids: BTreeSet::new(),
            categories: BTreeSet::new(),
            regions: BTreeSet::new(),
        }
    }

    /// The trailing `days`-day window ending at `now`, with no other restriction.
    pub fn trailing_days(now: DateTime<Utc>, days: u32) -> Self {
        Self::new(DateRange::new(now - Duration::days(i64::from(days)), now))
    }

    pub fn allows_store(&self, store_id: &StoreId) -> bool {
        self.store_ids.is_empty() || self.store_ids.contains(store_id)
    }

    pub fn restricts_categories(&self) -> bool {
        !self.categories.is_empty()
    }

    /// Partial merge: only the fields present in `update` change.
    pub fn merge(&mut self, update: FilterUpdate) {
        if let Some(date_range) = update.date_range {
            self.date_range = date_range;
        }
        if let Some(store_ids) = update.store_ids {
            self.store_ids = store_ids;
        }
        if let Some(categories) = update.categories {
            self.categories = categories;
        }
        if let Some(regions) = update.regions {
            self.regions = regions;
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_range: Option<DateRange>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub store_ids: Option<BTreeSet<StoreId>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub categories: Option<BTreeSet<Category>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub regions: Option<BTreeSet<Region>>,
}

impl FilterUpdate {
    pub fn date_range(range: DateRange) -> Self {
        Self { date_range: Some(range), ..Self::default() }
    }

    pub fn stores<I>(ids: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<StoreId>,
    {
        Self { store_ids: Some(ids.into_iter().map(Into::into).collect()), ..Self::default() }
    }

    pub fn categories<I: IntoIterator<Item = Category>>(categories: I) -> Self {
        Self { categories: Some(categories.into_iter().collect()), ..Self::default() }
    }

    pub fn regions<I: IntoIterator<Item = Region>>(regions: I) -> Self {
        Self { regions: Some(regions.into_iter().collect()), ..Self::default() }
    }
}
