use chrono::{NaiveDate, Weekday};
use thiserror::Error;

/// Wire format of every day value
pub const DATE_FORMAT: &str = "%Y-%m-%d";

const WEEKDAYS: [(&str, Weekday); 7] = [
    ("monday", Weekday::Mon),
    ("tuesday", Weekday::Tue),
    ("wednesday", Weekday::Wed),
    ("thursday", Weekday::Thu),
    ("friday", Weekday::Fri),
    ("saturday", Weekday::Sat),
    ("sunday", Weekday::Sun),
];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("invalid date '{0}', expected YYYY-MM-DD")]
    Date(String),

    #[error("unknown weekday '{0}'")]
    Weekday(String),
}

/// Format a day as `YYYY-MM-DD`
pub fn date_to_str(day: NaiveDate) -> String {
    day.format(DATE_FORMAT).to_string()
}

/// Parse a `YYYY-MM-DD` day
pub fn str_to_date(s: &str) -> Result<NaiveDate, ParseError> {
    NaiveDate::parse_from_str(s, DATE_FORMAT).map_err(|_| ParseError::Date(s.to_string()))
}

/// Parse an English weekday name, ignoring case.
///
/// Only full names are accepted (`"monday"`, `"Friday"`, ...).
pub fn parse_weekday(name: &str) -> Result<Weekday, ParseError> {
    let lower = name.trim().to_lowercase();
    WEEKDAYS
        .iter()
        .find(|(n, _)| *n == lower)
        .map(|(_, w)| *w)
        .ok_or_else(|| ParseError::Weekday(name.to_string()))
}

/// Lower-case English name of a weekday
pub fn weekday_name(day: Weekday) -> &'static str {
    WEEKDAYS[day.num_days_from_monday() as usize].0
}

/// Desk name as the service spells it.
///
/// Numeric names are zero padded to two digits (`"7"` -> `"07"`), anything
/// else is passed through.
pub fn desk_wire_name(name: &str) -> String {
    let trimmed = name.trim();
    match trimmed.parse::<u32>() {
        Ok(n) => format!("{n:02}"),
        Err(_) => trimmed.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_date_round_trip() {
        for s in ["2024-01-01", "2024-02-29", "2025-12-31", "1999-07-04"] {
            let day = str_to_date(s).unwrap();
            assert_eq!(date_to_str(day), s);
        }
    }

    #[test]
    fn test_str_to_date_rejects_other_formats() {
        assert!(str_to_date("2024/01/01").is_err());
        assert!(str_to_date("2024-02-30").is_err());
        assert_eq!(
            str_to_date("tomorrow"),
            Err(ParseError::Date("tomorrow".to_string()))
        );
    }

    #[test]
    fn test_parse_weekday_case_insensitive() {
        assert_eq!(parse_weekday("monday").unwrap(), Weekday::Mon);
        assert_eq!(parse_weekday("FRIDAY").unwrap(), Weekday::Fri);
        assert_eq!(parse_weekday(" Sunday ").unwrap(), Weekday::Sun);
        assert_eq!(parse_weekday("Sunday").unwrap().num_days_from_monday(), 6);
        assert!(parse_weekday("mon").is_err());
        assert!(parse_weekday("someday").is_err());
    }

    #[test]
    fn test_weekday_name() {
        assert_eq!(weekday_name(Weekday::Mon), "monday");
        assert_eq!(weekday_name(Weekday::Sun), "sunday");
    }

    #[test]
    fn test_desk_wire_name() {
        assert_eq!(desk_wire_name("7"), "07");
        assert_eq!(desk_wire_name("07"), "07");
        assert_eq!(desk_wire_name("12"), "12");
        assert_eq!(desk_wire_name("105"), "105");
        assert_eq!(desk_wire_name("A3"), "A3");
    }
}
