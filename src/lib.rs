//! Inspector Sightings Library
//!
//! A Rust library for aggregating crowd-sourced sightings of public-transit
//! ticket inspectors into the recent-sightings feed shown on rider maps.
//!
//! This library provides tools for:
//! - Loading the static station directory with id and name lookups
//! - Checking client cache freshness against the latest stored sighting
//! - Backfilling sparse live data with historically frequent stations
//! - Resolving station ids to names and coordinates
//! - Deduplicating and ranking sightings per station
//! - Accepting new rider reports and persisting them

pub mod config;
pub mod constants;

// Core application modules
pub mod app {
    pub mod models;
    pub mod services {
        pub mod recent_sightings;
        pub mod report_intake;
        pub mod sighting_store;
        pub mod station_directory;
    }
}

// HTTP surface
pub mod server;

// CLI modules
pub mod cli {
    pub mod args;
    pub mod commands;
}

// Re-export commonly used types
pub use app::models::{Coordinates, RawSighting, ResolvedSighting, Station};
pub use config::Config;

/// Result type alias for the sightings service
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for sighting aggregation and intake
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// A station or direction id could not be resolved through the directory
    #[error("Station not found: id = {station_id}")]
    StationNotFound { station_id: String },

    /// The sighting store timed out or could not be reached
    #[error("Sighting store unavailable: {message}")]
    StoreUnavailable {
        message: String,
        #[source]
        source: Option<sqlx::Error>,
    },

    /// The client's conditional request header is not a valid timestamp
    #[error("Malformed If-Modified-Since value '{value}'")]
    MalformedClientTimestamp {
        value: String,
        #[source]
        source: chrono::ParseError,
    },

    /// Configuration error
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// Static dataset could not be decoded
    #[error("Dataset format error in file '{path}': {message}")]
    DirectoryFormat {
        path: String,
        message: String,
        #[source]
        source: serde_json::Error,
    },

    /// I/O operation failed
    #[error("I/O error: {message}")]
    Io {
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// A submitted report carries nothing usable
    #[error("Invalid report: {message}")]
    InvalidReport { message: String },

    /// A submitted station or direction name matches no station
    #[error("Unknown station name: '{name}'")]
    UnknownStationName { name: String },
}

impl Error {
    /// Create a station not found error
    pub fn station_not_found(station_id: impl Into<String>) -> Self {
        Self::StationNotFound {
            station_id: station_id.into(),
        }
    }

    /// Create a store unavailable error from a database failure
    pub fn store_unavailable(message: impl Into<String>, source: sqlx::Error) -> Self {
        Self::StoreUnavailable {
            message: message.into(),
            source: Some(source),
        }
    }

    /// Create a store unavailable error for a query that ran out of time
    pub fn store_timeout(operation: &str, timeout: std::time::Duration) -> Self {
        Self::StoreUnavailable {
            message: format!("{} exceeded {}ms", operation, timeout.as_millis()),
            source: None,
        }
    }

    /// Create a malformed client timestamp error
    pub fn malformed_client_timestamp(value: impl Into<String>, source: chrono::ParseError) -> Self {
        Self::MalformedClientTimestamp {
            value: value.into(),
            source,
        }
    }

    /// Create a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Create a dataset format error
    pub fn directory_format(
        path: impl Into<String>,
        message: impl Into<String>,
        source: serde_json::Error,
    ) -> Self {
        Self::DirectoryFormat {
            path: path.into(),
            message: message.into(),
            source,
        }
    }

    /// Create an I/O error with context
    pub fn io(message: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            message: message.into(),
            source,
        }
    }

    /// Create an invalid report error
    pub fn invalid_report(message: impl Into<String>) -> Self {
        Self::InvalidReport {
            message: message.into(),
        }
    }

    /// Create an unknown station name error
    pub fn unknown_station_name(name: impl Into<String>) -> Self {
        Self::UnknownStationName { name: name.into() }
    }

    /// Whether the failure was caused by the request rather than the service
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::MalformedClientTimestamp { .. }
                | Self::InvalidReport { .. }
                | Self::UnknownStationName { .. }
        )
    }
}

impl From<std::io::Error> for Error {
    fn from(error: std::io::Error) -> Self {
        Self::Io {
            message: "I/O operation failed".to_string(),
            source: error,
        }
    }
}

impl From<sqlx::Error> for Error {
    fn from(error: sqlx::Error) -> Self {
        Self::StoreUnavailable {
            message: "Database operation failed".to_string(),
            source: Some(error),
        }
    }
}
