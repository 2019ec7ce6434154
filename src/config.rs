//! Configuration management and validation.
//!
//! Provides configuration structures for the sighting store connection,
//! the static station dataset, aggregation thresholds and the HTTP server.

use crate::constants::{
    DEFAULT_BIND_ADDRESS, DEFAULT_CONNECT_TIMEOUT, DEFAULT_DB_PORT, DEFAULT_LINES_PATH,
    DEFAULT_MAX_CONNECTION_LIFETIME, DEFAULT_MAX_CONNECTIONS, DEFAULT_MAX_IDLE_TIME,
    DEFAULT_MIN_CONNECTIONS, DEFAULT_QUERY_TIMEOUT, DEFAULT_STATIONS_PATH,
    HISTORIC_CANDIDATE_LIMIT, HISTORIC_TARGET_MINIMUM, LIVE_WINDOW_MINUTES,
};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use sqlx::postgres::PgConnectOptions;
use std::path::PathBuf;
use std::time::Duration;
use tracing::debug;

/// Connection settings for the PostgreSQL sighting store
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub user: String,

    #[serde(skip_serializing)]
    pub password: String,

    pub host: String,

    pub port: u16,

    /// Database name
    pub name: String,

    /// Upper bound on concurrently open connections
    pub max_connections: u32,

    pub min_connections: u32,

    pub max_lifetime: Duration,

    pub idle_timeout: Duration,

    /// Time allowed to acquire or open a connection
    pub connect_timeout: Duration,

    /// Time allowed for a single query before the store counts as unavailable
    pub query_timeout: Duration,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            user: "postgres".to_string(),
            password: String::new(),
            host: "localhost".to_string(),
            port: DEFAULT_DB_PORT,
            name: "postgres".to_string(),
            max_connections: DEFAULT_MAX_CONNECTIONS,
            min_connections: DEFAULT_MIN_CONNECTIONS,
            max_lifetime: DEFAULT_MAX_CONNECTION_LIFETIME,
            idle_timeout: DEFAULT_MAX_IDLE_TIME,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            query_timeout: DEFAULT_QUERY_TIMEOUT,
        }
    }
}

impl DatabaseConfig {
    /// Connection options for the pool
    ///
    /// Credentials are passed as separate fields, so any character in the
    /// user or password is sent as-is. An empty password is left unset.
    pub fn connect_options(&self) -> PgConnectOptions {
        let options = PgConnectOptions::new()
            .host(&self.host)
            .port(self.port)
            .username(&self.user)
            .database(&self.name);

        if self.password.is_empty() {
            options
        } else {
            options.password(&self.password)
        }
    }

    /// Connection URL with the password masked, for logging
    pub fn redacted_url(&self) -> String {
        format!(
            "postgres://{}:***@{}:{}/{}",
            self.user, self.host, self.port, self.name
        )
    }

    pub fn validate(&self) -> Result<()> {
        if self.host.trim().is_empty() {
            return Err(Error::configuration("Database host cannot be empty"));
        }
        if self.name.trim().is_empty() {
            return Err(Error::configuration("Database name cannot be empty"));
        }
        if self.max_connections == 0 {
            return Err(Error::configuration(
                "Database pool needs at least one connection",
            ));
        }
        if self.min_connections > self.max_connections {
            return Err(Error::configuration(format!(
                "Minimum connections ({}) exceed maximum connections ({})",
                self.min_connections, self.max_connections
            )));
        }
        if self.connect_timeout.is_zero() {
            return Err(Error::configuration("Connect timeout must be non-zero"));
        }
        if self.query_timeout.is_zero() {
            return Err(Error::configuration("Query timeout must be non-zero"));
        }
        Ok(())
    }
}

/// Location of the static station and line datasets
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DirectoryConfig {
    pub stations_path: PathBuf,

    /// Line catalogue; the directory loads without it when `None`
    pub lines_path: Option<PathBuf>,
}

impl Default for DirectoryConfig {
    fn default() -> Self {
        Self {
            stations_path: PathBuf::from(DEFAULT_STATIONS_PATH),
            lines_path: Some(PathBuf::from(DEFAULT_LINES_PATH)),
        }
    }
}

/// Thresholds for live data and historic backfill
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AggregationConfig {
    /// Minutes within which a sighting counts as live
    pub live_window_minutes: u32,

    /// Backfill stops once this many sightings are present
    pub historic_target: usize,

    /// Number of historic candidates requested from the store
    pub historic_limit: usize,
}

impl Default for AggregationConfig {
    fn default() -> Self {
        Self {
            live_window_minutes: LIVE_WINDOW_MINUTES,
            historic_target: HISTORIC_TARGET_MINIMUM,
            historic_limit: HISTORIC_CANDIDATE_LIMIT,
        }
    }
}

impl AggregationConfig {
    pub fn validate(&self) -> Result<()> {
        if self.live_window_minutes == 0 {
            return Err(Error::configuration("Live window must be at least one minute"));
        }
        if self.historic_limit < self.historic_target {
            return Err(Error::configuration(format!(
                "Historic candidate limit ({}) is below the backfill target ({})",
                self.historic_limit, self.historic_target
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub bind_address: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: DEFAULT_BIND_ADDRESS.to_string(),
        }
    }
}

/// Global configuration for the sightings service
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    pub database: DatabaseConfig,
    pub directory: DirectoryConfig,
    pub aggregation: AggregationConfig,
    pub server: ServerConfig,
}

impl Config {
    /// Validate every section, failing on the first problem found
    pub fn validate(&self) -> Result<()> {
        self.database.validate()?;
        self.aggregation.validate()?;

        if self.server.bind_address.trim().is_empty() {
            return Err(Error::configuration("Bind address cannot be empty"));
        }

        debug!(
            "Configuration valid: store {}, stations {}, live window {}min",
            self.database.redacted_url(),
            self.directory.stations_path.display(),
            self.aggregation.live_window_minutes
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn test_connect_options_keep_reserved_characters() {
        let config = DatabaseConfig {
            user: "freifahren".to_string(),
            password: "p@ss/w:rd?".to_string(),
            host: "db".to_string(),
            port: 6543,
            name: "sightings".to_string(),
            ..DatabaseConfig::default()
        };

        let options = config.connect_options();
        assert_eq!(options.get_host(), "db");
        assert_eq!(options.get_port(), 6543);
        assert_eq!(options.get_username(), "freifahren");
        assert_eq!(options.get_database(), Some("sightings"));
        assert!(!config.redacted_url().contains("p@ss"));
        assert_eq!(config.redacted_url(), "postgres://freifahren:***@db:6543/sightings");
    }

    #[test]
    fn test_zero_pool_size_rejected() {
        let mut config = Config::default();
        config.database.max_connections = 0;
        assert!(matches!(
            config.validate(),
            Err(Error::Configuration { .. })
        ));
    }

    #[test]
    fn test_zero_query_timeout_rejected() {
        let mut config = Config::default();
        config.database.query_timeout = Duration::ZERO;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_historic_limit_below_target_rejected() {
        let mut config = Config::default();
        config.aggregation.historic_target = 25;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_zero_live_window_rejected() {
        let mut config = Config::default();
        config.aggregation.live_window_minutes = 0;
        assert!(config.validate().is_err());
    }
}
