//! Sighting store contract and implementations
//!
//! The aggregator only depends on the [`SightingStore`] trait. Two
//! implementations ship with the crate:
//!
//! - [`postgres::PgSightingStore`] - the production store backed by a bounded
//!   sqlx connection pool
//! - [`memory::MemorySightingStore`] - an in-process store for tests and
//!   local runs without a database
//!
//! Store queries are the only operations in a request that suspend. Each
//! implementation is responsible for bounding them in time and reporting
//! failures as `Error::StoreUnavailable`; nothing here retries.

use crate::Result;
use crate::app::models::{NewSighting, RawSighting};
use chrono::{DateTime, Utc, Weekday};
use std::future::Future;

pub mod memory;
pub mod postgres;

#[cfg(test)]
pub mod tests;

pub use memory::MemorySightingStore;
pub use postgres::PgSightingStore;

/// Persistence contract the aggregator and report intake depend on
pub trait SightingStore: Send + Sync {
    /// Sightings with a station newer than `now - window_minutes`
    fn fetch_recent(
        &self,
        window_minutes: u32,
    ) -> impl Future<Output = Result<Vec<RawSighting>>> + Send;

    /// Up to `limit` station ids most frequently reported at `hour` (0-23,
    /// UTC) on `weekday`, most frequent first
    fn fetch_historic(
        &self,
        hour: u32,
        weekday: Weekday,
        limit: usize,
    ) -> impl Future<Output = Result<Vec<String>>> + Send;

    /// Timestamp of the most recent stored sighting, `None` for an empty store
    fn latest_write_time(&self) -> impl Future<Output = Result<Option<DateTime<Utc>>>> + Send;

    /// Persist a new report
    fn insert(&self, sighting: &NewSighting) -> impl Future<Output = Result<()>> + Send;
}

/// Strip stray newline characters that some reporting clients leave in
/// id and line columns
pub fn sanitize_column(value: &str) -> String {
    value.chars().filter(|&c| c != '\n' && c != '\r').collect()
}
