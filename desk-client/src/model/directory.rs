use std::sync::Arc;

use chrono::NaiveDate;
use tokio::sync::Mutex;
use tracing::debug;

use super::collection::Collection;
use super::employee::{Employee, EmployeeSource, Employees};
use super::zone::{ZoneSource, Zones};
use crate::error::ClientResult;
use crate::http::DeskApi;

/// Entry point to the booking service's data.
///
/// Zones, employees and the logged-in user are fetched on first use and kept
/// for the lifetime of the directory. Desk maps are read for `day`.
pub struct DeskDirectory {
    api: Arc<dyn DeskApi>,
    zones: Arc<Zones>,
    employees: Employees,
    myself: Mutex<Option<Arc<Employee>>>,
    day: NaiveDate,
}

impl DeskDirectory {
    pub fn new(api: Arc<dyn DeskApi>, day: NaiveDate) -> Self {
        let zones = Arc::new(Collection::new(ZoneSource::new(api.clone(), day)));
        let employees = Collection::new(EmployeeSource::new(api.clone(), zones.clone()));
        Self {
            api,
            zones,
            employees,
            myself: Mutex::new(None),
            day,
        }
    }

    pub fn zones(&self) -> &Zones {
        &self.zones
    }

    pub fn employees(&self) -> &Employees {
        &self.employees
    }

    /// Day the desk maps are read for
    pub fn day(&self) -> NaiveDate {
        self.day
    }

    /// The logged-in user
    pub async fn myself(&self) -> ClientResult<Arc<Employee>> {
        let mut myself = self.myself.lock().await;
        if let Some(me) = myself.as_ref() {
            return Ok(me.clone());
        }
        let context = self.api.get_my_context().await?;
        debug!(id = %context.id, "Employee context fetched");
        let me = Employee::myself(context, self.api.clone(), self.zones.clone());
        *myself = Some(me.clone());
        Ok(me)
    }

    /// Search colleagues by partial name, bypassing the cached list
    pub async fn search(&self, query: &str) -> ClientResult<Vec<Arc<Employee>>> {
        self.employees.source().search(query).await
    }
}
