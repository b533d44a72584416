use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use shared::models::{MyReservationRecord, ReservationRecord};

use super::collection::{Collection, Entity, Source};
use super::desk::Desk;
use super::zone::{Zone, Zones};
use crate::error::ClientResult;
use crate::http::DeskApi;

pub type Reservations = Collection<ReservationSource>;

/// Desk held by an employee on one day
pub struct Reservation {
    pub day: NaiveDate,
    pub zone: Arc<Zone>,
    pub desk: Arc<Desk>,
}

impl Reservation {
    /// Resolve the zone and desk ids of a wire record through `zones`
    pub async fn resolve(record: ReservationRecord, zones: &Zones) -> ClientResult<Arc<Self>> {
        let zone = zones.find_by_pk(record.desk_zone_id.as_str()).await?;
        let desk = zone.desks.find_by_pk(record.desk_id.as_str()).await?;
        Ok(Arc::new(Self {
            day: record.date,
            zone,
            desk,
        }))
    }
}

impl Entity for Reservation {
    type Key = NaiveDate;

    fn key(&self) -> &NaiveDate {
        &self.day
    }

    fn name(&self) -> &str {
        &self.desk.name
    }
}

impl fmt::Debug for Reservation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Reservation")
            .field("day", &self.day)
            .field("zone", &self.zone.name)
            .field("desk", &self.desk.name)
            .finish()
    }
}

/// Whose reservations a collection lists
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReservationOwner {
    Colleague(String),
    /// The logged-in user; only entries still in "Reserved" status count
    Myself,
}

pub struct ReservationSource {
    owner: ReservationOwner,
    api: Arc<dyn DeskApi>,
    zones: Arc<Zones>,
}

impl ReservationSource {
    pub(crate) fn new(owner: ReservationOwner, api: Arc<dyn DeskApi>, zones: Arc<Zones>) -> Self {
        Self { owner, api, zones }
    }

    pub fn owner(&self) -> &ReservationOwner {
        &self.owner
    }
}

#[async_trait]
impl Source for ReservationSource {
    type Record = ReservationRecord;
    type Item = Reservation;

    const KIND: &'static str = "reservation";

    async fn fetch(&self) -> ClientResult<Vec<ReservationRecord>> {
        match &self.owner {
            ReservationOwner::Colleague(id) => self.api.get_employee_reservations(id).await,
            ReservationOwner::Myself => Ok(self
                .api
                .get_my_reservations()
                .await?
                .into_iter()
                .filter_map(MyReservationRecord::into_reservation)
                .collect()),
        }
    }

    async fn build(&self, record: ReservationRecord) -> ClientResult<Arc<Reservation>> {
        Reservation::resolve(record, &self.zones).await
    }
}

impl Collection<ReservationSource> {
    /// Reservation held on `day`, if any
    pub async fn on(&self, day: NaiveDate) -> ClientResult<Option<Arc<Reservation>>> {
        Ok(self.get(false).await?.into_iter().find(|r| r.day == day))
    }
}
