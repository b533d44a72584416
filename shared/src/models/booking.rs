//! Booking Model

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Take a desk (or any desk in the zone when `deskIdOrNull` is null)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TakeDeskRequest {
    pub day_to_take: NaiveDate,
    pub zone_id: String,
    pub desk_id_or_null: Option<String>,
}

/// Give a held desk back for one day
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReleaseDeskRequest {
    pub days_to_share: NaiveDate,
}

/// Key of the booked desk in a take response
pub const RECEIVED_DESK_FIELD: &str = "receivedDeskOrNull";

/// Key of the informational message in a take response
pub const MESSAGE_FIELD: &str = "message";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_take_request_wire_names() {
        let req = TakeDeskRequest {
            day_to_take: NaiveDate::from_ymd_opt(2024, 5, 6).unwrap(),
            zone_id: "z1".into(),
            desk_id_or_null: Some("d1".into()),
        };
        assert_eq!(
            serde_json::to_value(req).unwrap(),
            serde_json::json!({"dayToTake": "2024-05-06", "zoneId": "z1", "deskIdOrNull": "d1"})
        );
    }

    #[test]
    fn test_release_request_wire_names() {
        let req = ReleaseDeskRequest {
            days_to_share: NaiveDate::from_ymd_opt(2024, 5, 6).unwrap(),
        };
        assert_eq!(
            serde_json::to_value(req).unwrap(),
            serde_json::json!({"daysToShare": "2024-05-06"})
        );
    }
}
