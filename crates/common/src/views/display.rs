//! Display formatting for list rows

use chrono::{DateTime, NaiveDate, NaiveDateTime};

use crate::models::Coordinates;

pub const DATE_UNAVAILABLE: &str = "Date not available";
pub const NAME_UNAVAILABLE: &str = "Name not available";

const DATE_FORMAT: &str = "%d/%m/%Y";

/// Creation timestamp rendered as `dd/mm/yyyy`.
///
/// Accepts RFC 3339, naive ISO date-times and bare dates. Anything else
/// renders the placeholder.
pub fn format_created_at(raw: Option<&str>) -> String {
    let Some(raw) = raw.map(str::trim).filter(|r| !r.is_empty()) else {
        return DATE_UNAVAILABLE.to_string();
    };

    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return parsed.format(DATE_FORMAT).to_string();
    }
    if let Ok(parsed) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return parsed.format(DATE_FORMAT).to_string();
    }
    if let Ok(parsed) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return parsed.format(DATE_FORMAT).to_string();
    }

    DATE_UNAVAILABLE.to_string()
}

pub fn display_name(name: &str) -> String {
    if name.trim().is_empty() {
        NAME_UNAVAILABLE.to_string()
    } else {
        name.to_string()
    }
}

pub fn format_coordinates(point: Coordinates) -> String {
    format!("({:.2}, {:.2}, {:.2})", point.x, point.y, point.z)
}
