#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Crime data source trait, classification, and normalization logic.
//!
//! An [`IncidentSource`] fetches raw records from an open-data portal.
//! [`load_summary`] runs one fetch through the classifier and returns the
//! points and per-category counts the map needs.

pub mod chicago;
pub mod normalize;
pub mod parsing;
pub mod type_mapping;

use async_trait::async_trait;
use saferoute_source_models::{CrimeSummary, RawIncident};

/// Errors that can occur while fetching from a data source.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// HTTP request failed (connection, TLS, invalid URL, body read).
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The request did not complete in time.
    #[error("timeout of {millis}ms exceeded")]
    Timeout {
        /// Configured timeout in milliseconds.
        millis: u128,
    },

    /// The upstream answered with a non-success status.
    #[error("Request failed with status code {status}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Response body, for logging.
        body: String,
    },

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A provider of raw crime incidents.
#[async_trait]
pub trait IncidentSource: Send + Sync {
    /// Returns a unique identifier for this source (e.g., `"chicago_pd"`).
    fn id(&self) -> &str;

    /// Returns the human-readable name of this source.
    fn name(&self) -> &str;

    /// Performs one bounded fetch of raw incidents.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError`] if the request fails, times out, returns a
    /// non-success status, or the body cannot be decoded.
    async fn fetch_incidents(&self) -> Result<Vec<RawIncident>, SourceError>;
}

/// Fetches once from `source` and normalizes the result.
///
/// # Errors
///
/// Propagates any [`SourceError`] from the fetch. No points are produced
/// on failure.
pub async fn load_summary(source: &dyn IncidentSource) -> Result<CrimeSummary, SourceError> {
    let records = source.fetch_incidents().await?;
    let summary = normalize::summarize(records);

    log::info!(
        "Mapped {} crime points from {} ({} raw records)",
        summary.mapped_records,
        source.name(),
        summary.total_records
    );
    let breakdown: Vec<String> = summary
        .stats
        .iter()
        .map(|(category, count)| {
            let name: &str = category.as_ref();
            format!("{name}={count}")
        })
        .collect();
    log::info!("Crime breakdown: {}", breakdown.join(", "));
    log::debug!(
        "Breakdown covers {} of {} points",
        summary.stats_total(),
        summary.points.len()
    );

    Ok(summary)
}
