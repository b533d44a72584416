//! In-memory booking service for unit tests

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::NaiveDate;
use serde_json::{Value, json};
use shared::models::{
    DeskRecord, EmployeeContext, EmployeeRecord, MyReservationRecord, ReservationRecord, ZoneRecord,
};

use crate::error::ClientResult;
use crate::http::DeskApi;

pub(crate) fn day(s: &str) -> NaiveDate {
    shared::str_to_date(s).unwrap()
}

/// Two zones, three desks, two colleagues and the logged-in user.
#[derive(Default)]
pub(crate) struct FakeApi {
    zones: Vec<ZoneRecord>,
    desks: HashMap<String, Vec<DeskRecord>>,
    days: HashMap<String, Vec<NaiveDate>>,
    images: HashMap<String, Vec<u8>>,
    employees: Vec<EmployeeRecord>,
    reservations: HashMap<String, Vec<ReservationRecord>>,
    me: Option<EmployeeContext>,
    my_reservations: Vec<MyReservationRecord>,
    take_responses: Mutex<VecDeque<Value>>,
    taken: Mutex<Vec<(String, String, NaiveDate)>>,
    desk_map_days: Mutex<Vec<NaiveDate>>,
    calls: Mutex<HashMap<&'static str, usize>>,
}

fn from_json<T: serde::de::DeserializeOwned>(value: Value) -> T {
    serde_json::from_value(value).unwrap()
}

impl FakeApi {
    pub(crate) fn office() -> Self {
        Self {
            zones: from_json(json!([
                {"id": "z-1", "name": "Open Space", "isMapAvailable": true},
                {"id": "z-2", "name": "Quiet Room", "isMapAvailable": false},
            ])),
            desks: HashMap::from([
                (
                    "z-1".to_string(),
                    from_json(json!([
                        {"id": "d-7", "nameOrNull": "07", "x": 0.25, "y": 0.5, "radius": 0.02, "state": "Free"},
                        {"id": "d-8", "nameOrNull": "08", "x": 0.75, "y": 0.5, "radius": 0.02, "state": "ReservedBy"},
                        {"id": "d-x", "nameOrNull": null, "x": 0.5, "y": 0.9, "radius": 0.02, "state": "Broken"},
                    ])),
                ),
                ("z-2".to_string(), Vec::new()),
            ]),
            days: HashMap::from([(
                "z-1".to_string(),
                vec![day("2024-05-07"), day("2024-05-13"), day("2024-05-14")],
            )]),
            images: HashMap::from([("z-1".to_string(), vec![1, 2, 3])]),
            employees: from_json(json!([
                {"employeeId": "e-1", "fullName": "Ada Lovelace"},
                {"employeeId": "e-2", "fullName": "Alan Turing"},
            ])),
            reservations: HashMap::from([(
                "e-1".to_string(),
                from_json(json!([
                    {"date": "2024-05-07", "deskZoneId": "z-1", "deskId": "d-7"},
                ])),
            )]),
            me: Some(from_json(json!({"id": "e-3", "fullName": "Grace Hopper"}))),
            my_reservations: from_json(json!([
                {"status": "Reserved", "reservedDeskOrNull": {"date": "2024-05-14", "deskZoneId": "z-1", "deskId": "d-7"}},
                {"status": "Shared", "reservedDeskOrNull": {"date": "2024-05-15", "deskZoneId": "z-1", "deskId": "d-7"}},
                {"status": "Reserved", "date": "2024-05-16", "reservedDeskOrNull": null},
            ])),
            ..Self::default()
        }
    }

    /// Queue the body returned by the next take request
    pub(crate) fn push_take_response(&self, response: Value) {
        self.take_responses.lock().unwrap().push_back(response);
    }

    /// `(zone_id, desk_id, day)` of every take request, in order
    pub(crate) fn taken(&self) -> Vec<(String, String, NaiveDate)> {
        self.taken.lock().unwrap().clone()
    }

    pub(crate) fn desk_map_days(&self) -> Vec<NaiveDate> {
        self.desk_map_days.lock().unwrap().clone()
    }

    pub(crate) fn calls(&self, operation: &str) -> usize {
        self.calls.lock().unwrap().get(operation).copied().unwrap_or(0)
    }

    fn record(&self, operation: &'static str) {
        *self.calls.lock().unwrap().entry(operation).or_default() += 1;
    }
}

#[async_trait]
impl DeskApi for FakeApi {
    async fn get_zones(&self) -> ClientResult<Vec<ZoneRecord>> {
        self.record("get_zones");
        Ok(self.zones.clone())
    }

    async fn get_desk_zone_map(
        &self,
        zone_id: &str,
        day: NaiveDate,
    ) -> ClientResult<Vec<DeskRecord>> {
        self.record("get_desk_zone_map");
        self.desk_map_days.lock().unwrap().push(day);
        Ok(self.desks.get(zone_id).cloned().unwrap_or_default())
    }

    async fn get_available_days(&self, zone_id: &str) -> ClientResult<Vec<NaiveDate>> {
        self.record("get_available_days");
        Ok(self.days.get(zone_id).cloned().unwrap_or_default())
    }

    async fn get_employees(&self) -> ClientResult<Vec<EmployeeRecord>> {
        self.record("get_employees");
        Ok(self.employees.clone())
    }

    async fn get_employee_reservations(
        &self,
        employee_id: &str,
    ) -> ClientResult<Vec<ReservationRecord>> {
        self.record("get_employee_reservations");
        Ok(self.reservations.get(employee_id).cloned().unwrap_or_default())
    }

    async fn get_my_context(&self) -> ClientResult<EmployeeContext> {
        self.record("get_my_context");
        self.me.clone().ok_or(crate::error::ClientError::Unauthorized)
    }

    async fn get_my_reservations(&self) -> ClientResult<Vec<MyReservationRecord>> {
        self.record("get_my_reservations");
        Ok(self.my_reservations.clone())
    }

    async fn search_colleague(&self, query: &str) -> ClientResult<Vec<EmployeeRecord>> {
        self.record("search_colleague");
        let query = query.to_lowercase();
        Ok(self
            .employees
            .iter()
            .filter(|e| e.full_name.to_lowercase().contains(&query))
            .cloned()
            .collect())
    }

    async fn take_desk(&self, zone_id: &str, desk_id: &str, day: NaiveDate) -> ClientResult<Value> {
        self.record("take_desk");
        self.taken
            .lock()
            .unwrap()
            .push((zone_id.to_string(), desk_id.to_string(), day));
        Ok(self
            .take_responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| json!({"receivedDeskOrNull": {"id": desk_id}})))
    }

    async fn release_desk(&self, _day: NaiveDate) -> ClientResult<Value> {
        self.record("release_desk");
        Ok(json!({}))
    }

    async fn get_zone_image(&self, zone_id: &str) -> ClientResult<Option<Vec<u8>>> {
        self.record("get_zone_image");
        Ok(self.images.get(zone_id).cloned())
    }
}
