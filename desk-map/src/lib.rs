//! # desk-map
//!
//! Renders who sits where on a given day onto the zones' floor plans.
//!
//! ## Scope
//!
//! This crate handles HOW to draw:
//! - Grouping zones that share a base map
//! - Desk markers: a ring on free desks, the occupant's name on taken ones
//!   (green for VIPs)
//! - Zone extent shading and zone titles
//! - The occupancy table layout
//!
//! Fetching zones, desks and reservations stays in the application.
//!
//! ## Example
//!
//! ```ignore
//! use desk_map::{DeskMarker, MapRenderer, ZoneMap};
//!
//! let zones = vec![ZoneMap { name: "Open Space".into(), image: png_bytes, desks }];
//! let renderer = MapRenderer::new(occupancy, vec!["Ada Lovelace".into()])?;
//! let written = renderer.render(&zones, Path::new("maps"))?;
//! ```

mod draw;
mod error;
mod render;
mod table;

// Re-exports
pub use error::{MapError, MapResult};
pub use render::{DeskMarker, MapGroup, MapRenderer, ZoneMap, group_maps};
pub use table::OccupancyTable;
