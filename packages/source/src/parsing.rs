//! Date and coordinate parsing for upstream records.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use saferoute_source_models::RawScalar;

/// Parses a Socrata floating timestamp (ISO 8601 with optional fractional
/// seconds and no zone). Also accepts RFC 3339 and bare dates.
#[must_use]
pub fn parse_socrata_date(s: &str) -> Option<NaiveDateTime> {
    if let Ok(naive) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(naive);
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S") {
        return Some(naive);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_local());
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

/// Formats an upstream timestamp as a US-style short date (`11/5/2024`).
///
/// Returns an empty string when the timestamp is empty or unparseable.
#[must_use]
pub fn format_display_date(raw: &str) -> String {
    parse_socrata_date(raw)
        .map(|dt| dt.format("%-m/%-d/%Y").to_string())
        .unwrap_or_default()
}

/// Returns `(latitude, longitude)` when both values are truthy and parse as
/// finite floats.
#[must_use]
pub fn parse_lat_lng(lat: Option<&RawScalar>, lng: Option<&RawScalar>) -> Option<(f64, f64)> {
    let lat = lat.filter(|v| v.is_truthy())?;
    let lng = lng.filter(|v| v.is_truthy())?;
    Some((lat.as_f64()?, lng.as_f64()?))
}
