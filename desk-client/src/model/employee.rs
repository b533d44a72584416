use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use shared::models::{EmployeeContext, EmployeeRecord};

use super::collection::{Collection, Entity, Source};
use super::reservation::{ReservationOwner, ReservationSource, Reservations};
use super::zone::Zones;
use crate::error::ClientResult;
use crate::http::DeskApi;

pub type Employees = Collection<EmployeeSource>;

pub struct Employee {
    pub id: String,
    pub name: String,
    pub reservations: Reservations,
}

impl Employee {
    pub(crate) fn colleague(
        record: EmployeeRecord,
        api: Arc<dyn DeskApi>,
        zones: Arc<Zones>,
    ) -> Arc<Self> {
        let owner = ReservationOwner::Colleague(record.employee_id.clone());
        Arc::new(Self {
            id: record.employee_id,
            name: record.full_name,
            reservations: Collection::new(ReservationSource::new(owner, api, zones)),
        })
    }

    pub(crate) fn myself(
        context: EmployeeContext,
        api: Arc<dyn DeskApi>,
        zones: Arc<Zones>,
    ) -> Arc<Self> {
        Arc::new(Self {
            id: context.id,
            name: context.full_name,
            reservations: Collection::new(ReservationSource::new(
                ReservationOwner::Myself,
                api,
                zones,
            )),
        })
    }

    pub fn is_myself(&self) -> bool {
        *self.reservations.source().owner() == ReservationOwner::Myself
    }
}

impl Entity for Employee {
    type Key = str;

    fn key(&self) -> &str {
        &self.id
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Debug for Employee {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Employee")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("myself", &self.is_myself())
            .finish_non_exhaustive()
    }
}

/// Everyone listed by the employee directory
pub struct EmployeeSource {
    api: Arc<dyn DeskApi>,
    zones: Arc<Zones>,
}

impl EmployeeSource {
    pub fn new(api: Arc<dyn DeskApi>, zones: Arc<Zones>) -> Self {
        Self { api, zones }
    }

    /// Look employees up by partial name on the server; not cached
    pub async fn search(&self, query: &str) -> ClientResult<Vec<Arc<Employee>>> {
        let found = self.api.search_colleague(query).await?;
        let mut employees = Vec::with_capacity(found.len());
        for record in found {
            employees.push(self.build(record).await?);
        }
        Ok(employees)
    }
}

#[async_trait]
impl Source for EmployeeSource {
    type Record = EmployeeRecord;
    type Item = Employee;

    const KIND: &'static str = "employee";

    async fn fetch(&self) -> ClientResult<Vec<EmployeeRecord>> {
        self.api.get_employees().await
    }

    async fn build(&self, record: EmployeeRecord) -> ClientResult<Arc<Employee>> {
        Ok(Employee::colleague(record, self.api.clone(), self.zones.clone()))
    }
}
