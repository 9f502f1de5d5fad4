//! Server configuration read from the environment.

use std::net::SocketAddr;
use std::path::PathBuf;

use listing_core::config::AggregationConfig;

use crate::error::AppError;

/// Default bind host.
pub const DEFAULT_HOST: &str = "0.0.0.0";

/// Default bind port.
pub const DEFAULT_PORT: u16 = 3000;

/// Default location of the key-value store file.
pub const DEFAULT_STORE_PATH: &str = "listing-store.json";

/// Settings for the API server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Bind host (`HOST`).
    pub host: String,
    /// Bind port (`PORT`).
    pub port: u16,
    /// Key-value store file (`LISTING_STORE_PATH`).
    pub store_path: PathBuf,
    /// Creation path (`CREATION_PATH`) and destinations (`DESTINATIONS`,
    /// comma-separated).
    pub aggregation: AggregationConfig,
}

impl AppConfig {
    /// Reads the configuration from process environment variables.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if a variable is present but invalid.
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads the configuration through `lookup`, falling back to defaults for
    /// missing variables.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if `PORT` is not a valid port,
    /// `CREATION_PATH` is blank, or `DESTINATIONS` names no destination.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        let host = lookup("HOST").unwrap_or_else(|| DEFAULT_HOST.to_owned());
        let port = match lookup("PORT") {
            Some(raw) => raw
                .parse()
                .map_err(|e| AppError::Config(format!("PORT must be a valid u16: {e}")))?,
            None => DEFAULT_PORT,
        };
        let store_path = lookup("LISTING_STORE_PATH")
            .map_or_else(|| PathBuf::from(DEFAULT_STORE_PATH), PathBuf::from);

        let mut aggregation = AggregationConfig::default();
        if let Some(path) = lookup("CREATION_PATH") {
            if path.trim().is_empty() {
                return Err(AppError::Config("CREATION_PATH must not be empty".into()));
            }
            aggregation.creation_path = path;
        }
        if let Some(raw) = lookup("DESTINATIONS") {
            let destinations: Vec<String> = raw
                .split(',')
                .map(str::trim)
                .filter(|d| !d.is_empty())
                .map(str::to_owned)
                .collect();
            if destinations.is_empty() {
                return Err(AppError::Config(
                    "DESTINATIONS must name at least one destination".into(),
                ));
            }
            aggregation.destinations = destinations;
        }

        Ok(Self {
            host,
            port,
            store_path,
            aggregation,
        })
    }

    /// The socket address to bind.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if `HOST:PORT` is not a socket address.
    pub fn socket_addr(&self) -> Result<SocketAddr, AppError> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e| AppError::Config(format!("invalid HOST:PORT combination: {e}")))
    }
}
