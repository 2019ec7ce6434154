//! Command-line argument definitions for the sightings service
//!
//! This module defines the complete CLI interface using clap derive API.
//! Database settings fall back to the `DB_*` environment variables used by
//! the deployment.

use crate::config::{AggregationConfig, DatabaseConfig, DirectoryConfig, ServerConfig};
use crate::constants::{
    DEFAULT_BIND_ADDRESS, DEFAULT_CONNECT_TIMEOUT, DEFAULT_DB_PORT, DEFAULT_LINES_PATH,
    DEFAULT_MAX_CONNECTIONS, DEFAULT_QUERY_TIMEOUT, DEFAULT_STATIONS_PATH,
    HISTORIC_CANDIDATE_LIMIT, HISTORIC_TARGET_MINIMUM, LIVE_WINDOW_MINUTES,
};
use crate::{Error, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use std::time::Duration;

/// CLI arguments for the inspector sightings service
#[derive(Debug, Clone, Parser)]
#[command(
    name = "inspector-sightings",
    version,
    about = "Serve crowd-sourced ticket inspector sightings for transit maps",
    long_about = "Aggregates rider reports of ticket inspectors into a feed of recent sightings, \
                  topping sparse live data up with stations that are historically busy at the \
                  same hour and weekday, and accepts new reports over HTTP."
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands
#[derive(Debug, Clone, Subcommand)]
pub enum Commands {
    /// Serve the HTTP API (main command)
    Serve(ServeArgs),
    /// Print the current recent-sightings feed as JSON
    Recent(RecentArgs),
    /// Load the station dataset and print a report
    Stations(StationsArgs),
}

/// Arguments for the serve command
#[derive(Debug, Clone, Parser)]
pub struct ServeArgs {
    /// Address the HTTP server binds to
    #[arg(
        short = 'b',
        long = "bind",
        value_name = "ADDR",
        default_value = DEFAULT_BIND_ADDRESS,
        help = "Address the HTTP server binds to"
    )]
    pub bind_address: String,

    /// Skip creating the sightings table at start-up
    #[arg(long = "skip-schema", help = "Do not create the sightings table if it is missing")]
    pub skip_schema: bool,

    #[command(flatten)]
    pub database: DatabaseArgs,

    #[command(flatten)]
    pub directory: DirectoryArgs,

    #[command(flatten)]
    pub aggregation: AggregationArgs,

    #[command(flatten)]
    pub logging: LoggingArgs,
}

/// Arguments for the recent command
#[derive(Debug, Clone, Parser)]
pub struct RecentArgs {
    /// Only print sightings written after this time (RFC 3339)
    #[arg(
        long = "since",
        value_name = "TIMESTAMP",
        help = "Report 'not modified' unless something was written after this time"
    )]
    pub since: Option<String>,

    #[command(flatten)]
    pub database: DatabaseArgs,

    #[command(flatten)]
    pub directory: DirectoryArgs,

    #[command(flatten)]
    pub aggregation: AggregationArgs,

    #[command(flatten)]
    pub logging: LoggingArgs,
}

/// Arguments for the stations command
#[derive(Debug, Clone, Parser)]
pub struct StationsArgs {
    /// Resolve a station name and show its details
    #[arg(
        long = "lookup",
        value_name = "NAME",
        help = "Resolve a station name and show its details"
    )]
    pub lookup: Option<String>,

    /// Include the full station listing
    #[arg(long = "detailed", help = "Include the full station listing in the report")]
    pub detailed: bool,

    /// Output format for the station report
    #[arg(
        long = "format",
        value_enum,
        default_value = "human",
        help = "Output format for station report"
    )]
    pub output_format: OutputFormat,

    #[command(flatten)]
    pub directory: DirectoryArgs,

    #[command(flatten)]
    pub logging: LoggingArgs,
}

/// PostgreSQL connection settings
#[derive(Debug, Clone, clap::Args)]
pub struct DatabaseArgs {
    #[arg(long = "db-user", env = "DB_USER", default_value = "postgres")]
    pub user: String,

    #[arg(long = "db-password", env = "DB_PASSWORD", default_value = "", hide_env_values = true)]
    pub password: String,

    #[arg(long = "db-host", env = "DB_HOST", default_value = "localhost")]
    pub host: String,

    #[arg(long = "db-port", env = "DB_PORT", default_value_t = DEFAULT_DB_PORT)]
    pub port: u16,

    #[arg(long = "db-name", env = "DB_NAME", default_value = "postgres")]
    pub name: String,

    /// Upper bound on open database connections
    #[arg(
        long = "max-connections",
        value_name = "COUNT",
        default_value_t = DEFAULT_MAX_CONNECTIONS,
        help = "Maximum number of open database connections"
    )]
    pub max_connections: u32,

    #[arg(
        long = "connect-timeout",
        value_name = "SECONDS",
        default_value_t = DEFAULT_CONNECT_TIMEOUT.as_secs(),
        help = "Seconds allowed to acquire a database connection"
    )]
    pub connect_timeout_secs: u64,

    #[arg(
        long = "query-timeout",
        value_name = "SECONDS",
        default_value_t = DEFAULT_QUERY_TIMEOUT.as_secs(),
        help = "Seconds allowed for a single store query"
    )]
    pub query_timeout_secs: u64,
}

/// Static dataset locations
#[derive(Debug, Clone, clap::Args)]
pub struct DirectoryArgs {
    #[arg(
        long = "stations",
        value_name = "FILE",
        default_value = DEFAULT_STATIONS_PATH,
        help = "Station dataset (JSON object keyed by station id)"
    )]
    pub stations_path: PathBuf,

    #[arg(
        long = "lines",
        value_name = "FILE",
        default_value = DEFAULT_LINES_PATH,
        help = "Line dataset (JSON object of line name to station ids)"
    )]
    pub lines_path: PathBuf,

    #[arg(long = "no-lines", help = "Load stations without a line catalogue")]
    pub no_lines: bool,
}

/// Live window and backfill thresholds
#[derive(Debug, Clone, clap::Args)]
pub struct AggregationArgs {
    #[arg(
        long = "live-window",
        value_name = "MINUTES",
        default_value_t = LIVE_WINDOW_MINUTES,
        help = "Minutes within which a sighting counts as live"
    )]
    pub live_window_minutes: u32,

    #[arg(
        long = "historic-target",
        value_name = "COUNT",
        default_value_t = HISTORIC_TARGET_MINIMUM,
        help = "Backfill with historic stations until this many sightings are present"
    )]
    pub historic_target: usize,

    #[arg(
        long = "historic-limit",
        value_name = "COUNT",
        default_value_t = HISTORIC_CANDIDATE_LIMIT,
        help = "Number of historic candidate stations to consider"
    )]
    pub historic_limit: usize,
}

/// Logging verbosity
#[derive(Debug, Clone, clap::Args)]
pub struct LoggingArgs {
    #[arg(
        short = 'v',
        long = "verbose",
        action = clap::ArgAction::Count,
        help = "Increase logging verbosity (-v: debug, -vv: trace)"
    )]
    pub verbose: u8,

    /// Only show errors. Overrides verbose settings.
    #[arg(
        short = 'q',
        long = "quiet",
        help = "Suppress output except errors",
        conflicts_with = "verbose"
    )]
    pub quiet: bool,
}

/// Output format options for reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable output
    Human,
    /// JSON format for scripting
    Json,
}

impl Args {
    /// Get the command if one was specified
    pub fn get_command(&self) -> Result<Commands> {
        self.command
            .clone()
            .ok_or_else(|| Error::configuration("No command given"))
    }
}

impl LoggingArgs {
    /// Get the log level string for tracing
    pub fn get_log_level(&self) -> &'static str {
        if self.quiet {
            "error"
        } else {
            match self.verbose {
                0 => "info",
                1 => "debug",
                _ => "trace",
            }
        }
    }
}

impl DatabaseArgs {
    pub fn to_config(&self) -> DatabaseConfig {
        DatabaseConfig {
            user: self.user.clone(),
            password: self.password.clone(),
            host: self.host.clone(),
            port: self.port,
            name: self.name.clone(),
            max_connections: self.max_connections,
            connect_timeout: Duration::from_secs(self.connect_timeout_secs),
            query_timeout: Duration::from_secs(self.query_timeout_secs),
            ..DatabaseConfig::default()
        }
    }
}

impl DirectoryArgs {
    pub fn to_config(&self) -> DirectoryConfig {
        DirectoryConfig {
            stations_path: self.stations_path.clone(),
            lines_path: (!self.no_lines).then(|| self.lines_path.clone()),
        }
    }
}

impl AggregationArgs {
    pub fn to_config(&self) -> AggregationConfig {
        AggregationConfig {
            live_window_minutes: self.live_window_minutes,
            historic_target: self.historic_target,
            historic_limit: self.historic_limit,
        }
    }
}

impl ServeArgs {
    pub fn server_config(&self) -> ServerConfig {
        ServerConfig {
            bind_address: self.bind_address.clone(),
        }
    }
}
