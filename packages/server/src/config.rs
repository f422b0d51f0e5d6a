//! Start-up configuration read from the environment.

use std::num::ParseIntError;
use std::path::PathBuf;

/// Port used when `PORT` is unset.
pub const DEFAULT_PORT: u16 = 5000;

/// Interface bound when `BIND_ADDR` is unset.
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0";

/// Frontend bundle directory used when `STATIC_DIR` is unset.
pub const DEFAULT_STATIC_DIR: &str = "public";

/// Errors from reading [`ServerConfig`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// `PORT` was set but is not a valid port number.
    #[error("invalid PORT value {value:?}: {source}")]
    InvalidPort {
        /// The raw environment value.
        value: String,
        /// Parse failure.
        #[source]
        source: ParseIntError,
    },
}

/// Server settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Interface to bind (`BIND_ADDR`).
    pub bind_addr: String,
    /// Port to listen on (`PORT`).
    pub port: u16,
    /// Socrata application token (`SOCRATA_APP_TOKEN`). Empty is treated
    /// as absent.
    pub app_token: Option<String>,
    /// Directory holding the frontend bundle (`STATIC_DIR`).
    pub static_dir: PathBuf,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
            port: DEFAULT_PORT,
            app_token: None,
            static_dir: PathBuf::from(DEFAULT_STATIC_DIR),
        }
    }
}

impl ServerConfig {
    /// Reads the configuration from process environment variables.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidPort`] if `PORT` does not parse.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads the configuration through `lookup`, which returns the value of
    /// an environment variable by name.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidPort`] if `PORT` does not parse.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let port = match lookup("PORT").filter(|p| !p.is_empty()) {
            Some(value) => value
                .trim()
                .parse()
                .map_err(|source| ConfigError::InvalidPort { value, source })?,
            None => defaults.port,
        };

        Ok(Self {
            bind_addr: lookup("BIND_ADDR")
                .filter(|a| !a.is_empty())
                .unwrap_or(defaults.bind_addr),
            port,
            app_token: lookup("SOCRATA_APP_TOKEN").filter(|t| !t.is_empty()),
            static_dir: lookup("STATIC_DIR")
                .filter(|d| !d.is_empty())
                .map_or(defaults.static_dir, PathBuf::from),
        })
    }
}
