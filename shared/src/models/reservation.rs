//! Reservation Model

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Status of an entry in the caller's own desk view that holds a desk
pub const RESERVED_STATUS: &str = "Reserved";

/// Desk reservation with unresolved zone/desk ids
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReservationRecord {
    pub date: NaiveDate,
    pub desk_zone_id: String,
    pub desk_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColleagueReservationsRequest {
    pub colleague_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColleagueReservationsResponse {
    #[serde(default)]
    pub desk_reservations: Vec<ReservationRecord>,
}

/// `initialize-my-desk-view` payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MyDeskViewResponse {
    #[serde(default)]
    pub reservations: Vec<MyReservationRecord>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MyReservationRecord {
    pub status: String,
    #[serde(default)]
    pub date: Option<NaiveDate>,
    #[serde(default)]
    pub reserved_desk_or_null: Option<ReservedDesk>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReservedDesk {
    #[serde(default)]
    pub date: Option<NaiveDate>,
    pub desk_zone_id: String,
    pub desk_id: String,
}

impl MyReservationRecord {
    /// Flatten into a plain reservation.
    ///
    /// Returns `None` unless the entry is `Reserved` and names a desk and a day.
    /// Fields of the reserved desk win over the outer entry.
    pub fn into_reservation(self) -> Option<ReservationRecord> {
        if self.status != RESERVED_STATUS {
            return None;
        }
        let desk = self.reserved_desk_or_null?;
        Some(ReservationRecord {
            date: desk.date.or(self.date)?,
            desk_zone_id: desk.desk_zone_id,
            desk_id: desk.desk_id,
        })
    }
}
