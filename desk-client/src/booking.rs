//! Booking orchestrator
//!
//! Picks the available days of a zone that fall on the wanted weekdays and
//! asks for the same desk on each of them.

use chrono::{Datelike, NaiveDate, Weekday};
use serde_json::Value;
use shared::models::{MESSAGE_FIELD, RECEIVED_DESK_FIELD};
use shared::util::weekday_name;
use shared::{date_to_str, desk_wire_name, parse_weekday};
use tracing::{error, info};

use crate::error::ClientResult;
use crate::model::Zones;

/// Message the service sends back when the desk is, most likely, already ours
pub const GENERIC_ERROR_MESSAGE: &str = "An error has occurred.";

/// How a single take request went
#[derive(Debug, Clone, PartialEq)]
pub enum BookingOutcome {
    Booked,
    /// Informational message from the service
    Message(String),
    /// Somebody else got the desk first
    AlreadyTaken,
    /// Response matched no known shape; carries the raw body
    Unrecognized(Value),
}

impl BookingOutcome {
    pub fn from_response(response: &Value) -> Self {
        if let Some(message) = response
            .get(MESSAGE_FIELD)
            .and_then(Value::as_str)
            .filter(|m| !m.is_empty())
        {
            return Self::Message(message.to_string());
        }
        match response.get(RECEIVED_DESK_FIELD) {
            Some(Value::Null) => Self::AlreadyTaken,
            Some(_) => Self::Booked,
            None => Self::Unrecognized(response.clone()),
        }
    }

    pub fn is_booked(&self) -> bool {
        matches!(self, Self::Booked)
    }

    pub(crate) fn log(&self, desk: &str, zone: &str, day: NaiveDate) {
        let day = date_to_str(day);
        match self {
            Self::Booked => info!("Booked desk [{}] in zone [{}] for {}.", desk, zone, day),
            Self::Message(message) if message == GENERIC_ERROR_MESSAGE => {
                info!(%day, "Failed to book desk. It might have been mine already.")
            }
            Self::Message(message) => info!(%day, "{}", message),
            Self::AlreadyTaken => info!(%day, "Failed to book desk. It was already taken"),
            Self::Unrecognized(body) => {
                error!(%day, "Failed to book desk. Response: {}", body)
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DayOutcome {
    pub day: NaiveDate,
    pub outcome: BookingOutcome,
}

/// Everything one [`book`] run asked for
#[derive(Debug, Clone, Default)]
pub struct BookingReport {
    pub zone: String,
    pub desk: String,
    pub days: Vec<DayOutcome>,
}

impl BookingReport {
    pub fn booked(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.days
            .iter()
            .filter(|d| d.outcome.is_booked())
            .map(|d| d.day)
    }
}

/// Available days falling on one of `wanted`, or on today's weekday when
/// nothing is wanted
pub fn select_days(
    available: &[NaiveDate],
    wanted: &[Weekday],
    today: NaiveDate,
) -> Vec<NaiveDate> {
    available
        .iter()
        .copied()
        .filter(|day| {
            if wanted.is_empty() {
                day.weekday() == today.weekday()
            } else {
                wanted.contains(&day.weekday())
            }
        })
        .collect()
}

/// Book `desk_name` in `zone_name` on every matching available day.
///
/// Unknown weekday, zone or desk names fail before anything is booked. Lost
/// races and server messages are logged and do not stop the run.
pub async fn book(
    zones: &Zones,
    zone_name: &str,
    desk_name: &str,
    wanted_weekdays: &[String],
    today: NaiveDate,
) -> ClientResult<BookingReport> {
    let wanted = wanted_weekdays
        .iter()
        .map(|name| parse_weekday(name))
        .collect::<Result<Vec<_>, _>>()?;

    let zone = zones.require(zone_name).await?;
    let desk = zone.desks.require(&desk_wire_name(desk_name)).await?;

    let available = zone.available_days(false).await?;
    let days = select_days(&available, &wanted, today);
    if days.is_empty() {
        let names: Vec<&str> = if wanted.is_empty() {
            vec![weekday_name(today.weekday())]
        } else {
            wanted.iter().map(|d| weekday_name(*d)).collect()
        };
        info!(zone = %zone.name, desk = %desk.name, "No available day falls on {:?}", names);
    }

    let mut report = BookingReport {
        zone: zone.name.clone(),
        desk: desk.name.clone(),
        days: Vec::with_capacity(days.len()),
    };
    for day in days {
        let outcome = desk.take(day).await?;
        report.days.push(DayOutcome { day, outcome });
    }
    Ok(report)
}
