//! Application constants for the inspector sightings service
//!
//! This module contains the aggregation thresholds, store pool defaults
//! and file locations used throughout the service.

use std::time::Duration;

// =============================================================================
// Aggregation Thresholds
// =============================================================================

/// Span of time (minutes) within which a sighting counts as live
pub const LIVE_WINDOW_MINUTES: u32 = 180;

/// Minimum number of sightings a response should contain before historic
/// stand-ins stop being added
pub const HISTORIC_TARGET_MINIMUM: usize = 10;

/// Maximum number of historic candidate stations requested from the store
pub const HISTORIC_CANDIDATE_LIMIT: usize = 20;

// =============================================================================
// Report Intake
// =============================================================================

/// Longest line name the `line` column accepts
pub const MAX_LINE_LENGTH: usize = 3;

// =============================================================================
// Sighting Store Pool Defaults
// =============================================================================

/// Maximum number of concurrently open database connections
pub const DEFAULT_MAX_CONNECTIONS: u32 = 4;

/// Minimum number of idle connections kept open
pub const DEFAULT_MIN_CONNECTIONS: u32 = 0;

/// Connections are recycled after this long
pub const DEFAULT_MAX_CONNECTION_LIFETIME: Duration = Duration::from_secs(60 * 60);

/// Idle connections are closed after this long
pub const DEFAULT_MAX_IDLE_TIME: Duration = Duration::from_secs(30 * 60);

/// Time allowed for acquiring (and if needed, opening) a connection
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// Time allowed for a single store query
pub const DEFAULT_QUERY_TIMEOUT: Duration = Duration::from_secs(10);

/// Default PostgreSQL port
pub const DEFAULT_DB_PORT: u16 = 5432;

// =============================================================================
// Static Dataset Locations
// =============================================================================

/// Default location of the station dataset
pub const DEFAULT_STATIONS_PATH: &str = "data/stations.json";

/// Default location of the line dataset
pub const DEFAULT_LINES_PATH: &str = "data/lines.json";

// =============================================================================
// HTTP Surface
// =============================================================================

/// Default address the HTTP server binds to
pub const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0:8080";

/// Logging target used for the default env filter
pub const LOG_TARGET: &str = "inspector_sightings";
