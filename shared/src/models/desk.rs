//! Desk Model

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Booking state of a desk on the requested day
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String")]
pub enum DeskState {
    Free,
    Reserved,
    Unknown,
}

impl DeskState {
    pub fn from_wire(s: &str) -> Self {
        match s {
            "Free" => Self::Free,
            "ReservedBy" => Self::Reserved,
            _ => Self::Unknown,
        }
    }

    /// Only free desks can be taken
    pub fn is_bookable(&self) -> bool {
        matches!(self, Self::Free)
    }
}

impl From<String> for DeskState {
    fn from(s: String) -> Self {
        Self::from_wire(&s)
    }
}

/// Desk placed on a zone map.
///
/// `x`, `y` and `radius` are fractions of the map image size.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeskRecord {
    pub id: String,
    #[serde(rename = "nameOrNull", default)]
    pub name: Option<String>,
    pub x: f64,
    pub y: f64,
    pub radius: f64,
    pub state: DeskState,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeskZoneMapRequest {
    pub date: NaiveDate,
    pub desk_zone_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeskZoneMapResponse {
    #[serde(default)]
    pub map_or_null: Option<DeskZoneMap>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeskZoneMap {
    #[serde(default)]
    pub desks: Vec<DeskRecord>,
}

impl DeskZoneMapResponse {
    pub fn into_desks(self) -> Vec<DeskRecord> {
        self.map_or_null.map(|m| m.desks).unwrap_or_default()
    }
}
