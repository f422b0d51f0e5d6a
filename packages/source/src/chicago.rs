//! Chicago Police Department crime data source.
//!
//! Uses the City of Chicago's Socrata Open Data API.
//! Dataset: <https://data.cityofchicago.org/resource/ijzp-q8t2>

use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;
use saferoute_source_models::RawIncident;

use crate::{IncidentSource, SourceError};

/// Socrata API endpoint for Chicago crime data.
pub const CHICAGO_API_URL: &str = "https://data.cityofchicago.org/resource/ijzp-q8t2.json";

/// Header carrying the optional Socrata application token.
pub const APP_TOKEN_HEADER: &str = "X-App-Token";

/// Only incidents after this date are requested.
pub const DEFAULT_SINCE: NaiveDate = match NaiveDate::from_ymd_opt(2024, 11, 1) {
    Some(date) => date,
    None => panic!("invalid default cutoff date"),
};

/// Maximum number of rows in the single page fetched per request.
pub const DEFAULT_LIMIT: u32 = 2000;

/// Upper bound on the whole outbound request.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Chicago PD crime data source.
#[derive(Debug, Clone)]
pub struct ChicagoSource {
    client: reqwest::Client,
    api_url: String,
    app_token: Option<String>,
    since: NaiveDate,
    limit: u32,
    timeout: Duration,
}

impl ChicagoSource {
    /// Creates a source with the default query. `app_token` is attached as
    /// the `X-App-Token` header when present and non-empty.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::Http`] if the HTTP client cannot be built.
    pub fn new(app_token: Option<String>) -> Result<Self, SourceError> {
        Self::builder().app_token(app_token).build()
    }

    /// Returns a builder for overriding the query or endpoint.
    #[must_use]
    pub fn builder() -> ChicagoSourceBuilder {
        ChicagoSourceBuilder::default()
    }

    /// The `$where` clause sent upstream.
    #[must_use]
    pub fn where_clause(&self) -> String {
        format!(
            "date>'{}' AND latitude IS NOT NULL AND longitude IS NOT NULL",
            self.since.format("%Y-%m-%d")
        )
    }

    /// Query string parameters for the single page request.
    #[must_use]
    pub fn query_params(&self) -> Vec<(&'static str, String)> {
        vec![
            ("$limit", self.limit.to_string()),
            ("$where", self.where_clause()),
            ("$order", "date DESC".to_string()),
        ]
    }

    /// Builds the outbound request without sending it.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::Http`] if the URL or a header is invalid.
    pub fn build_request(&self) -> Result<reqwest::Request, SourceError> {
        let mut request = self
            .client
            .get(&self.api_url)
            .query(&self.query_params())
            .timeout(self.timeout);

        if let Some(token) = &self.app_token {
            request = request.header(APP_TOKEN_HEADER, token);
        }

        Ok(request.build()?)
    }

    fn classify_error(&self, e: reqwest::Error) -> SourceError {
        if e.is_timeout() {
            SourceError::Timeout {
                millis: self.timeout.as_millis(),
            }
        } else {
            SourceError::Http(e)
        }
    }
}

#[async_trait]
impl IncidentSource for ChicagoSource {
    fn id(&self) -> &'static str {
        "chicago_pd"
    }

    fn name(&self) -> &'static str {
        "Chicago Police Department"
    }

    async fn fetch_incidents(&self) -> Result<Vec<RawIncident>, SourceError> {
        let request = self.build_request()?;

        log::info!("Fetching crimes since: {}", self.since);
        log::info!("API URL: {}", request.url());

        let response = self
            .client
            .execute(request)
            .await
            .map_err(|e| self.classify_error(e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            log::error!("Response status: {status}");
            log::error!("Response data: {body}");
            return Err(SourceError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let text = response.text().await.map_err(|e| self.classify_error(e))?;
        let records: Vec<RawIncident> = serde_json::from_str(&text)?;

        log::info!("Raw API returned {} records", records.len());

        Ok(records)
    }
}

/// Builder for [`ChicagoSource`].
#[derive(Debug, Clone)]
pub struct ChicagoSourceBuilder {
    api_url: String,
    app_token: Option<String>,
    since: NaiveDate,
    limit: u32,
    timeout: Duration,
}

impl Default for ChicagoSourceBuilder {
    fn default() -> Self {
        Self {
            api_url: CHICAGO_API_URL.to_string(),
            app_token: None,
            since: DEFAULT_SINCE,
            limit: DEFAULT_LIMIT,
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl ChicagoSourceBuilder {
    #[must_use]
    pub fn api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = api_url.into();
        self
    }

    /// Empty tokens are treated as absent.
    #[must_use]
    pub fn app_token(mut self, app_token: Option<String>) -> Self {
        self.app_token = app_token.filter(|t| !t.is_empty());
        self
    }

    #[must_use]
    pub const fn since(mut self, since: NaiveDate) -> Self {
        self.since = since;
        self
    }

    #[must_use]
    pub const fn limit(mut self, limit: u32) -> Self {
        self.limit = limit;
        self
    }

    #[must_use]
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// # Errors
    ///
    /// Returns [`SourceError::Http`] if the HTTP client cannot be built.
    pub fn build(self) -> Result<ChicagoSource, SourceError> {
        let client = reqwest::Client::builder().timeout(self.timeout).build()?;

        Ok(ChicagoSource {
            client,
            api_url: self.api_url,
            app_token: self.app_token,
            since: self.since,
            limit: self.limit,
            timeout: self.timeout,
        })
    }
}
