//! Lazily fetched views over the booking service.
//!
//! Every list (zones, a zone's desks, employees, an employee's reservations)
//! is a [`Collection`] over a [`Source`] that knows how to fetch raw records
//! and turn them into shared entities.

mod collection;
mod desk;
mod directory;
mod employee;
mod reservation;
mod zone;

pub use collection::{Collection, Entity, Source};
pub use desk::{Desk, DeskSource};
pub use directory::DeskDirectory;
pub use employee::{Employee, EmployeeSource, Employees};
pub use reservation::{Reservation, ReservationOwner, ReservationSource, Reservations};
pub use zone::{Desks, Zone, ZoneSource, Zones};
