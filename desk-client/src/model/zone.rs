use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use shared::models::ZoneRecord;
use tokio::sync::Mutex;
use tracing::debug;

use super::collection::{Collection, Entity, Source};
use super::desk::DeskSource;
use crate::error::ClientResult;
use crate::http::DeskApi;

pub type Zones = Collection<ZoneSource>;
pub type Desks = Collection<DeskSource>;

/// Bookable area with its own desk map
pub struct Zone {
    pub id: String,
    pub name: String,
    pub is_map_available: bool,
    /// Desks as laid out on the map of the reference day
    pub desks: Desks,
    available_days: Mutex<Option<Vec<NaiveDate>>>,
    api: Arc<dyn DeskApi>,
}

impl Zone {
    pub(crate) fn new(record: ZoneRecord, api: Arc<dyn DeskApi>, day: NaiveDate) -> Arc<Self> {
        Arc::new_cyclic(|zone| Self {
            desks: Collection::new(DeskSource::new(
                zone.clone(),
                record.id.clone(),
                day,
                api.clone(),
            )),
            id: record.id,
            name: record.name,
            is_map_available: record.is_map_available,
            available_days: Mutex::new(None),
            api,
        })
    }

    /// Days on which a desk can still be taken in this zone
    pub async fn available_days(&self, force: bool) -> ClientResult<Vec<NaiveDate>> {
        let mut days = self.available_days.lock().await;
        if force || days.is_none() {
            let fetched = self.api.get_available_days(&self.id).await?;
            debug!(zone = %self.name, count = fetched.len(), "Available days fetched");
            *days = Some(fetched);
        }
        Ok(days.clone().unwrap_or_default())
    }

    /// Raw base map image; `None` when the zone has no map
    pub async fn map_image(&self) -> ClientResult<Option<Vec<u8>>> {
        if !self.is_map_available {
            return Ok(None);
        }
        self.api.get_zone_image(&self.id).await
    }
}

impl Entity for Zone {
    type Key = str;

    fn key(&self) -> &str {
        &self.id
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Debug for Zone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Zone")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("is_map_available", &self.is_map_available)
            .finish_non_exhaustive()
    }
}

/// All zones of the marketplace
pub struct ZoneSource {
    api: Arc<dyn DeskApi>,
    day: NaiveDate,
}

impl ZoneSource {
    pub fn new(api: Arc<dyn DeskApi>, day: NaiveDate) -> Self {
        Self { api, day }
    }
}

#[async_trait]
impl Source for ZoneSource {
    type Record = ZoneRecord;
    type Item = Zone;

    const KIND: &'static str = "zone";

    async fn fetch(&self) -> ClientResult<Vec<ZoneRecord>> {
        self.api.get_zones().await
    }

    async fn build(&self, record: ZoneRecord) -> ClientResult<Arc<Zone>> {
        Ok(Zone::new(record, self.api.clone(), self.day))
    }
}
