//! Wire models of the booking service
//!
//! Field names are defined by the service and kept exactly as sent
//! (`camelCase`, `...OrNull` suffixes).

pub mod auth;
pub mod booking;
pub mod desk;
pub mod employee;
pub mod reservation;
pub mod zone;

// Re-exports
pub use auth::*;
pub use booking::*;
pub use desk::*;
pub use employee::*;
pub use reservation::*;
pub use zone::*;
