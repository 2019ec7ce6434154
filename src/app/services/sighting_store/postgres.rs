//! PostgreSQL sighting store
//!
//! Sightings live in the `ticket_info` table. The pool is bounded by
//! `DatabaseConfig::max_connections`; connections are returned to it when a
//! query future completes, fails or is dropped by a timeout.

use super::{SightingStore, sanitize_column};
use crate::app::models::{NewSighting, RawSighting};
use crate::config::DatabaseConfig;
use crate::{Error, Result};
use chrono::{DateTime, Utc, Weekday};
use sqlx::postgres::{PgPool, PgPoolOptions};
use std::future::Future;
use std::time::Duration;
use tracing::{debug, error, info};

const CREATE_TABLE_SQL: &str = r#"
    CREATE TABLE IF NOT EXISTS ticket_info (
        id UUID DEFAULT gen_random_uuid() PRIMARY KEY,
        timestamp TIMESTAMPTZ NOT NULL DEFAULT NOW(),
        message TEXT,
        author BIGINT,
        line VARCHAR(3),
        station_name VARCHAR(255),
        station_id VARCHAR(10),
        direction_name VARCHAR(255),
        direction_id VARCHAR(10)
    )
"#;

const RECENT_SQL: &str = r#"
    SELECT timestamp, station_id, direction_id, line
    FROM ticket_info
    WHERE timestamp >= NOW() - make_interval(mins => $1)
      AND station_name IS NOT NULL
      AND station_id IS NOT NULL
    ORDER BY timestamp DESC
"#;

const HISTORIC_SQL: &str = r#"
    SELECT station_id
    FROM ticket_info
    WHERE EXTRACT(HOUR FROM timestamp AT TIME ZONE 'UTC')::int = $1
      AND EXTRACT(DOW FROM timestamp AT TIME ZONE 'UTC')::int = $2
      AND station_name IS NOT NULL
      AND station_id IS NOT NULL
    GROUP BY station_id
    ORDER BY COUNT(station_id) DESC
    LIMIT $3
"#;

const LATEST_SQL: &str = "SELECT MAX(timestamp) FROM ticket_info";

const INSERT_SQL: &str = r#"
    INSERT INTO ticket_info (timestamp, line, station_name, station_id, direction_name, direction_id)
    VALUES ($1, $2, $3, $4, $5, $6)
"#;

#[derive(Debug, sqlx::FromRow)]
pub(crate) struct SightingRow {
    pub(crate) timestamp: DateTime<Utc>,
    pub(crate) station_id: String,
    pub(crate) direction_id: Option<String>,
    pub(crate) line: Option<String>,
}

impl From<SightingRow> for RawSighting {
    fn from(row: SightingRow) -> Self {
        Self {
            timestamp: row.timestamp,
            station_id: sanitize_column(&row.station_id),
            line_id: row.line.as_deref().map(sanitize_column),
            direction_id: row.direction_id.as_deref().map(sanitize_column),
            is_historic: false,
        }
    }
}

/// Sighting store backed by a bounded PostgreSQL connection pool
#[derive(Debug, Clone)]
pub struct PgSightingStore {
    pool: PgPool,
    query_timeout: Duration,
}

impl PgSightingStore {
    /// Open the connection pool
    ///
    /// Fails with `Error::StoreUnavailable` if no connection can be
    /// established within the configured connect timeout.
    pub async fn connect(config: &DatabaseConfig) -> Result<Self> {
        config.validate()?;
        info!(
            "Connecting to sighting store at {} (max {} connections)",
            config.redacted_url(),
            config.max_connections
        );

        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .max_lifetime(config.max_lifetime)
            .idle_timeout(config.idle_timeout)
            .acquire_timeout(config.connect_timeout)
            .before_acquire(|_conn, _meta| {
                Box::pin(async move {
                    debug!("Acquiring a connection");
                    Ok(true)
                })
            })
            .after_release(|_conn, _meta| {
                Box::pin(async move {
                    debug!("Connection has been released");
                    Ok(true)
                })
            })
            .connect_with(config.connect_options())
            .await
            .map_err(|e| Error::store_unavailable("Failed to connect to sighting store", e))?;

        Ok(Self::from_pool(pool, config.query_timeout))
    }

    /// Wrap an existing pool
    pub fn from_pool(pool: PgPool, query_timeout: Duration) -> Self {
        Self {
            pool,
            query_timeout,
        }
    }

    /// Create the sightings table if it does not exist yet
    pub async fn ensure_schema(&self) -> Result<()> {
        self.timed("create table", sqlx::query(CREATE_TABLE_SQL).execute(&self.pool))
            .await?;
        info!("Table ticket_info created or already exists");
        Ok(())
    }

    /// Close the pool, waiting for borrowed connections to be returned
    pub async fn shutdown(&self) {
        self.pool.close().await;
        info!("Closed the connection pool");
    }

    pub fn is_closed(&self) -> bool {
        self.pool.is_closed()
    }

    /// Run a query under the configured timeout
    pub(crate) async fn timed<T, F>(&self, operation: &str, query: F) -> Result<T>
    where
        F: Future<Output = std::result::Result<T, sqlx::Error>>,
    {
        match tokio::time::timeout(self.query_timeout, query).await {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(e)) => {
                error!("Sighting store query '{}' failed: {}", operation, e);
                Err(Error::store_unavailable(format!("{} failed", operation), e))
            }
            Err(_) => {
                error!(
                    "Sighting store query '{}' timed out after {:?}",
                    operation, self.query_timeout
                );
                Err(Error::store_timeout(operation, self.query_timeout))
            }
        }
    }
}

impl SightingStore for PgSightingStore {
    async fn fetch_recent(&self, window_minutes: u32) -> Result<Vec<RawSighting>> {
        let minutes = i32::try_from(window_minutes).unwrap_or(i32::MAX);
        let rows: Vec<SightingRow> = self
            .timed(
                "fetch recent sightings",
                sqlx::query_as::<_, SightingRow>(RECENT_SQL).bind(minutes).fetch_all(&self.pool),
            )
            .await?;

        debug!(
            "Fetched {} sightings from the last {} minutes",
            rows.len(),
            window_minutes
        );
        Ok(rows.into_iter().map(RawSighting::from).collect())
    }

    async fn fetch_historic(&self, hour: u32, weekday: Weekday, limit: usize) -> Result<Vec<String>> {
        let hour = i32::try_from(hour).unwrap_or(i32::MAX);
        let day_of_week = i32::try_from(weekday.num_days_from_sunday()).unwrap_or(0);
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);

        let station_ids: Vec<String> = self
            .timed(
                "fetch historic stations",
                sqlx::query_scalar::<_, String>(HISTORIC_SQL)
                    .bind(hour)
                    .bind(day_of_week)
                    .bind(limit)
                    .fetch_all(&self.pool),
            )
            .await?;

        if station_ids.is_empty() {
            info!("No historic data found for hour {} on {}", hour, weekday);
        }
        Ok(station_ids.iter().map(|id| sanitize_column(id)).collect())
    }

    async fn latest_write_time(&self) -> Result<Option<DateTime<Utc>>> {
        self.timed(
            "fetch latest write time",
            sqlx::query_scalar::<_, Option<DateTime<Utc>>>(LATEST_SQL).fetch_one(&self.pool),
        )
        .await
    }

    async fn insert(&self, sighting: &NewSighting) -> Result<()> {
        self.timed(
            "insert sighting",
            sqlx::query(INSERT_SQL)
                .bind(sighting.timestamp)
                .bind(&sighting.line)
                .bind(&sighting.station_name)
                .bind(&sighting.station_id)
                .bind(&sighting.direction_name)
                .bind(&sighting.direction_id)
                .execute(&self.pool),
        )
        .await?;

        debug!(
            "Inserted sighting at {} for station {:?}",
            sighting.timestamp, sighting.station_id
        );
        Ok(())
    }
}
