//! Subcommand implementations

pub mod book;
pub mod map;
pub mod release;
pub mod reservations;
pub mod search;
