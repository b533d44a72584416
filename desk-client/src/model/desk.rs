use std::fmt;
use std::sync::{Arc, Weak};

use async_trait::async_trait;
use chrono::NaiveDate;
use shared::DeskState;
use shared::models::DeskRecord;

use super::collection::{Entity, Source};
use super::zone::Zone;
use crate::booking::BookingOutcome;
use crate::error::ClientResult;
use crate::http::DeskApi;

/// Single reservable seat.
///
/// `x`, `y` and `radius` are fractions of the zone map's size.
pub struct Desk {
    pub id: String,
    /// Wire name, numeric names are zero padded ("07")
    pub name: String,
    pub x: f64,
    pub y: f64,
    pub radius: f64,
    pub state: DeskState,
    zone_id: String,
    zone: Weak<Zone>,
    api: Arc<dyn DeskApi>,
}

impl Desk {
    /// Zone this desk belongs to, while the zone is still cached
    pub fn zone(&self) -> Option<Arc<Zone>> {
        self.zone.upgrade()
    }

    pub fn zone_id(&self) -> &str {
        &self.zone_id
    }

    pub fn is_free(&self) -> bool {
        self.state.is_bookable()
    }

    /// Ask for this desk on `day` and log how it went
    pub async fn take(&self, day: NaiveDate) -> ClientResult<BookingOutcome> {
        let response = self.api.take_desk(&self.zone_id, &self.id, day).await?;
        let outcome = BookingOutcome::from_response(&response);

        let zone_name = self
            .zone()
            .map(|zone| zone.name.clone())
            .unwrap_or_else(|| self.zone_id.clone());
        outcome.log(&self.name, &zone_name, day);
        Ok(outcome)
    }
}

impl Entity for Desk {
    type Key = str;

    fn key(&self) -> &str {
        &self.id
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Debug for Desk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Desk")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("zone_id", &self.zone_id)
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

/// Desks of one zone as shown on the map of a given day
pub struct DeskSource {
    zone: Weak<Zone>,
    zone_id: String,
    day: NaiveDate,
    api: Arc<dyn DeskApi>,
}

impl DeskSource {
    pub(crate) fn new(
        zone: Weak<Zone>,
        zone_id: String,
        day: NaiveDate,
        api: Arc<dyn DeskApi>,
    ) -> Self {
        Self {
            zone,
            zone_id,
            day,
            api,
        }
    }
}

#[async_trait]
impl Source for DeskSource {
    type Record = DeskRecord;
    type Item = Desk;

    const KIND: &'static str = "desk";

    async fn fetch(&self) -> ClientResult<Vec<DeskRecord>> {
        self.api.get_desk_zone_map(&self.zone_id, self.day).await
    }

    async fn build(&self, record: DeskRecord) -> ClientResult<Arc<Desk>> {
        Ok(Arc::new(Desk {
            id: record.id,
            name: record.name.unwrap_or_default(),
            x: record.x,
            y: record.y,
            radius: record.radius,
            state: record.state,
            zone_id: self.zone_id.clone(),
            zone: self.zone.clone(),
            api: self.api.clone(),
        }))
    }
}
