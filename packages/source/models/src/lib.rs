#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Upstream incident schema and the normalized point format.
//!
//! [`RawIncident`] is the only place that knows the field names of the
//! open-data API. Everything downstream works on [`NormalizedPoint`] and
//! [`CrimeSummary`].

use std::collections::BTreeMap;

use saferoute_crime_models::CrimeCategory;
use serde::de::IgnoredAny;
use serde::{Deserialize, Deserializer, Serialize};

/// A loosely-typed scalar from the upstream JSON.
///
/// Socrata serializes coordinates as strings and flags as booleans, but
/// older exports and other portals mix the two.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawScalar {
    /// JSON boolean
    Bool(bool),
    /// JSON number
    Number(f64),
    /// JSON string
    Text(String),
}

impl RawScalar {
    /// Whether the value would count as present in a boolean context:
    /// non-empty text, a non-zero number, or `true`.
    #[must_use]
    pub fn is_truthy(&self) -> bool {
        match self {
            Self::Bool(b) => *b,
            Self::Number(n) => *n != 0.0 && !n.is_nan(),
            Self::Text(s) => !s.is_empty(),
        }
    }

    /// Whether the value is the boolean `true` or the literal string
    /// `"true"`.
    #[must_use]
    pub fn is_true(&self) -> bool {
        match self {
            Self::Bool(b) => *b,
            Self::Text(s) => s == "true",
            Self::Number(_) => false,
        }
    }

    /// Coerces the value to a finite float. Returns `None` for booleans
    /// and for text that does not parse.
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        let value = match self {
            Self::Number(n) => *n,
            Self::Text(s) => s.trim().parse::<f64>().ok()?,
            Self::Bool(_) => return None,
        };
        value.is_finite().then_some(value)
    }
}

/// A field value that is either the expected shape or anything else.
#[derive(Deserialize)]
#[serde(untagged)]
enum Lenient<T> {
    Expected(T),
    Other(IgnoredAny),
}

impl<T> Lenient<T> {
    fn into_option(self) -> Option<T> {
        match self {
            Self::Expected(value) => Some(value),
            Self::Other(_) => None,
        }
    }
}

/// Reads a text field, treating null and non-string values as absent.
fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Lenient::<String>::deserialize(deserializer).map(Lenient::into_option)
}

/// Reads a scalar field, treating null, arrays and objects as absent.
fn lenient_scalar<'de, D>(deserializer: D) -> Result<Option<RawScalar>, D::Error>
where
    D: Deserializer<'de>,
{
    Lenient::<RawScalar>::deserialize(deserializer).map(Lenient::into_option)
}

/// Raw record shape from the crime incidents dataset.
///
/// Every field is optional; missing fields deserialize to `None` and
/// unknown fields are ignored. A field of the wrong JSON type is read as
/// missing, so one malformed record never fails the whole batch.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawIncident {
    #[serde(default, deserialize_with = "lenient_scalar")]
    pub latitude: Option<RawScalar>,
    #[serde(default, deserialize_with = "lenient_scalar")]
    pub longitude: Option<RawScalar>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub primary_type: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub description: Option<String>,
    /// Floating timestamp, e.g. `"2024-11-05T00:00:00.000"`.
    #[serde(default, deserialize_with = "lenient_text")]
    pub date: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub block: Option<String>,
    #[serde(default, deserialize_with = "lenient_scalar")]
    pub arrest: Option<RawScalar>,
}

impl RawIncident {
    /// Whether both coordinates are present and truthy.
    #[must_use]
    pub fn has_coordinates(&self) -> bool {
        self.latitude.as_ref().is_some_and(RawScalar::is_truthy)
            && self.longitude.as_ref().is_some_and(RawScalar::is_truthy)
    }
}

/// One classified incident, ready to be plotted.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedPoint {
    /// Latitude (WGS84).
    pub latitude: f64,
    /// Longitude (WGS84).
    pub longitude: f64,
    /// Normalized category.
    pub category: CrimeCategory,
    /// Free-text description, falling back to the raw primary type.
    pub description: String,
    /// Localized `M/D/YYYY` date, empty when the source date is missing.
    pub display_date: String,
    /// The upstream timestamp string, unmodified.
    pub raw_date: String,
    /// The upstream primary type, unmodified.
    pub raw_type: String,
    /// Display severity derived from the category.
    pub severity: u8,
    /// Block-level address (e.g. "100 S STATE ST").
    pub block: String,
    /// Whether an arrest was made.
    pub arrest_made: bool,
}

/// All points produced from one upstream fetch, with per-category counts.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CrimeSummary {
    /// Mapped points, in upstream order.
    pub points: Vec<NormalizedPoint>,
    /// Number of points per category. Only categories that occurred are
    /// present.
    pub stats: BTreeMap<CrimeCategory, u64>,
    /// Number of records the upstream returned.
    pub total_records: usize,
    /// Number of records that became points.
    pub mapped_records: usize,
}

impl CrimeSummary {
    /// Sum of all per-category counts.
    #[must_use]
    pub fn stats_total(&self) -> u64 {
        self.stats.values().sum()
    }
}
