//! Desk Client - booking service client
//!
//! Logs in through the identity provider, talks to the booking service's
//! REST API and exposes zones, desks, employees and reservations as lazily
//! fetched collections.

pub mod auth;
pub mod booking;
pub mod config;
pub mod credential;
pub mod error;
pub mod http;
pub mod model;

#[cfg(test)]
pub(crate) mod testing;

pub use auth::{AuthFlow, AuthTokens};
pub use booking::{BookingOutcome, BookingReport, DayOutcome, book};
pub use config::ClientConfig;
pub use credential::{Secret, SecretStorage};
pub use error::{ClientError, ClientResult};
pub use http::{DeskApi, DeskSession};
pub use model::{
    Collection, Desk, DeskDirectory, Employee, Entity, Reservation, Source, Zone, Zones,
};

// Re-export shared types for convenience
pub use shared::DeskState;
