//! Turns upstream records into map points and per-category counts.

use std::collections::BTreeMap;

use saferoute_source_models::{CrimeSummary, NormalizedPoint, RawIncident};

use crate::parsing::{format_display_date, parse_lat_lng};
use crate::type_mapping::map_crime_type;

/// Block shown when the upstream record has none.
pub const UNKNOWN_BLOCK: &str = "Unknown location";

/// Normalizes a single record.
///
/// Returns `None` when the record lacks usable coordinates.
#[must_use]
pub fn normalize_incident(record: RawIncident) -> Option<NormalizedPoint> {
    let (latitude, longitude) = parse_lat_lng(record.latitude.as_ref(), record.longitude.as_ref())?;

    let primary_type = record.primary_type.unwrap_or_default();
    let description = record.description.filter(|d| !d.is_empty());

    let category = map_crime_type(&primary_type, description.as_deref().unwrap_or(""));

    let raw_date = record.date.unwrap_or_default();
    let display_date = format_display_date(&raw_date);

    Some(NormalizedPoint {
        latitude,
        longitude,
        category,
        description: description.unwrap_or_else(|| primary_type.clone()),
        display_date,
        raw_date,
        raw_type: primary_type,
        severity: category.severity(),
        block: record
            .block
            .filter(|b| !b.is_empty())
            .unwrap_or_else(|| UNKNOWN_BLOCK.to_string()),
        arrest_made: record.arrest.as_ref().is_some_and(|a| a.is_true()),
    })
}

/// Normalizes every record and tallies the resulting categories.
///
/// Records without coordinates are dropped from `points` but still counted
/// in `total_records`.
#[must_use]
pub fn summarize(records: Vec<RawIncident>) -> CrimeSummary {
    let total_records = records.len();
    let mut stats: BTreeMap<_, u64> = BTreeMap::new();

    let points: Vec<NormalizedPoint> = records
        .into_iter()
        .filter(RawIncident::has_coordinates)
        .filter_map(normalize_incident)
        .inspect(|point| *stats.entry(point.category).or_default() += 1)
        .collect();

    CrimeSummary {
        mapped_records: points.len(),
        points,
        stats,
        total_records,
    }
}
