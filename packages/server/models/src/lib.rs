#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! API response types for the SafeRoute crime map server.
//!
//! These types are serialized to JSON for the map frontend. They are kept
//! separate from the normalized source types so the wire field names
//! (`lat`, `type`, `arrestMade`, ...) can evolve independently.

use std::collections::BTreeMap;

use saferoute_crime_models::CrimeCategory;
use saferoute_source_models::{CrimeSummary, NormalizedPoint};
use serde::{Deserialize, Serialize};

/// A crime point as returned by `GET /api/crime`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiCrimePoint {
    /// Latitude.
    pub lat: f64,
    /// Longitude.
    pub lng: f64,
    /// Normalized category.
    #[serde(rename = "type")]
    pub crime_type: CrimeCategory,
    /// Description shown in the popup.
    pub desc: String,
    /// Localized date (`M/D/YYYY`), or empty.
    pub date: String,
    /// Upstream timestamp.
    pub raw_date: String,
    /// Upstream primary type.
    pub raw_type: String,
    /// Display severity (3-10).
    pub severity: u8,
    /// Block-level address.
    pub block: String,
    /// Whether an arrest was made.
    pub arrest_made: bool,
}

impl From<NormalizedPoint> for ApiCrimePoint {
    fn from(point: NormalizedPoint) -> Self {
        Self {
            lat: point.latitude,
            lng: point.longitude,
            crime_type: point.category,
            desc: point.description,
            date: point.display_date,
            raw_date: point.raw_date,
            raw_type: point.raw_type,
            severity: point.severity,
            block: point.block,
            arrest_made: point.arrest_made,
        }
    }
}

/// Response body for `GET /api/crime`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiCrimeResponse {
    /// Mapped points.
    pub points: Vec<ApiCrimePoint>,
    /// Number of points per category.
    pub stats: BTreeMap<CrimeCategory, u64>,
    /// Number of records the upstream returned.
    pub total_records: usize,
    /// Number of records that became points.
    pub mapped_records: usize,
}

impl From<CrimeSummary> for ApiCrimeResponse {
    fn from(summary: CrimeSummary) -> Self {
        Self {
            points: summary.points.into_iter().map(ApiCrimePoint::from).collect(),
            stats: summary.stats,
            total_records: summary.total_records,
            mapped_records: summary.mapped_records,
        }
    }
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiHealth {
    /// Always `"ok"`.
    pub status: String,
    /// Current time (RFC 3339).
    pub timestamp: String,
    /// Service identifier.
    pub service: String,
}

/// Error envelope returned with HTTP 500.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    /// Stable, human-readable summary.
    pub error: String,
    /// Underlying cause. Not a stable contract.
    pub message: String,
}
