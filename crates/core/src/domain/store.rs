use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::ids::StoreId;
use crate::domain::schema::{Check, Schema};
use crate::errors::SchemaViolation;

pub const CITIES: [&str; 10] = [
    "New York",
    "Los Angeles",
    "Chicago",
    "Houston",
    "Phoenix",
    "Philadelphia",
    "San Antonio",
    "San Diego",
    "Dallas",
    "San Jose",
];

pub const STORE_BRAND: &str = "HyperRetail";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Region {
    North,
    South,
    East,
    West,
    Central,
}

impl Region {
    pub const ALL: [Region; 5] =
        [Region::North, Region::South, Region::East, Region::West, Region::Central];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::North => "North",
            Self::South => "South",
            Self::East => "East",
            Self::West => "West",
            Self::Central => "Central",
        }
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Region {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let wanted = value.trim();
        Self::ALL
            .into_iter()
            .find(|region| region.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| {
                format!("unknown region `{wanted}` (expected North|South|East|West|Central)")
            })
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreStatus {
    Active,
    Maintenance,
    Closed,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Store {
    pub id: StoreId,
    pub name: String,
    pub region: Region,
    pub city: String,
    pub address: String,
    pub sqft: u32,
    pub open_date: NaiveDate,
    pub manager: String,
    pub status: StoreStatus,
    pub lat: f64,
    pub lng: f64,
}

impl Schema for Store {
    const ENTITY: &'static str = "store";

    fn record_id(&self) -> &str {
        self.id.as_str()
    }

    fn validate(&self) -> Result<(), SchemaViolation> {
        let check = Check::new(Self::ENTITY, self.id.as_str());
        check.id("id", self.id.is_well_formed())?;
        check.ensure(self.name.starts_with(STORE_BRAND), "name", || {
            format!("`{}` is missing the {STORE_BRAND} prefix", self.name)
        })?;
        check.ensure(CITIES.contains(&self.city.as_str()), "city", || {
            format!("`{}` is not a served city", self.city)
        })?;
        check.non_empty("address", &self.address)?;
        check.in_range("sqft", self.sqft, 20_000, 150_000)?;
        check.non_empty("manager", &self.manager)?;
        check.in_range("lat", self.lat, -90.0, 90.0)?;
        check.in_range("lng", self.lng, -180.0, 180.0)
    }
}
