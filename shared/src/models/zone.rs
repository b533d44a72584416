//! Zone Model

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Zone as listed by the desk marketplace
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ZoneRecord {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub is_map_available: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ZonesResponse {
    pub zones: Vec<ZoneRecord>,
}

/// Marketplace desks payload (`{"zoneId": ...}`)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ZoneDaysRequest {
    pub zone_id: String,
}

/// Bookable days of a zone, grouped by week
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ZoneDaysResponse {
    #[serde(default)]
    pub weeks: Vec<MarketplaceWeek>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarketplaceWeek {
    #[serde(default)]
    pub week: Vec<MarketplaceDay>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketplaceDay {
    pub day: NaiveDate,
    /// Desk already held by the caller on that day
    #[serde(default)]
    pub reserved_desk_or_null: Option<serde_json::Value>,
}

impl ZoneDaysResponse {
    /// Days on which the caller holds no desk yet, in listing order
    pub fn available_days(&self) -> Vec<NaiveDate> {
        self.weeks
            .iter()
            .flat_map(|w| w.week.iter())
            .filter(|d| d.reserved_desk_or_null.as_ref().is_none_or(|v| v.is_null()))
            .map(|d| d.day)
            .collect()
    }
}
