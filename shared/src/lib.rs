//! Shared types for the desk booking tools
//!
//! Wire-level request/response records of the booking service and the small
//! helpers (dates, weekdays, desk names) used on both sides of the client.

pub mod models;
pub mod util;

// Re-exports
pub use models::DeskState;
pub use serde::{Deserialize, Serialize};
pub use util::{ParseError, date_to_str, desk_wire_name, parse_weekday, str_to_date};
