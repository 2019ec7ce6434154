//! Conditional-request check against the store's latest write
//!
//! Clients send back the time they last fetched the feed. If nothing has been
//! written since, the whole aggregation is skipped and the client keeps its
//! cached copy.

use crate::app::services::sighting_store::SightingStore;
use crate::{Error, Result};
use chrono::{DateTime, Utc};
use tracing::debug;

/// Parse a client "last seen" header value
///
/// RFC 3339 is the documented format. RFC 2822 dates, which cover the
/// HTTP-date form browsers send in `If-Modified-Since`, are accepted as well.
///
/// # Errors
/// * Returns `Error::MalformedClientTimestamp` when neither format matches
pub fn parse_client_timestamp(value: &str) -> Result<DateTime<Utc>> {
    let trimmed = value.trim();

    match DateTime::parse_from_rfc3339(trimmed) {
        Ok(parsed) => Ok(parsed.with_timezone(&Utc)),
        Err(rfc3339_error) => DateTime::parse_from_rfc2822(trimmed)
            .map(|parsed| parsed.with_timezone(&Utc))
            .map_err(|_| Error::malformed_client_timestamp(value, rfc3339_error)),
    }
}

/// Whether the store holds nothing newer than `client_timestamp`
///
/// An absent value always means "recompute". A store without any rows has
/// nothing newer than any client timestamp.
pub fn is_unchanged(
    latest_write: Option<DateTime<Utc>>,
    client_timestamp: DateTime<Utc>,
) -> bool {
    match latest_write {
        Some(latest) => latest <= client_timestamp,
        None => true,
    }
}

/// Check the client's cached copy against the store
///
/// Returns `true` when the caller may answer "not modified" without doing
/// any further work.
pub async fn is_unchanged_since<S: SightingStore>(
    store: &S,
    client_timestamp: Option<&str>,
) -> Result<bool> {
    let Some(raw) = client_timestamp else {
        return Ok(false);
    };

    let client_time = parse_client_timestamp(raw)?;
    let latest_write = store.latest_write_time().await?;
    let unchanged = is_unchanged(latest_write, client_time);

    debug!(
        "Freshness check: client {} vs latest write {:?} -> unchanged = {}",
        client_time, latest_write, unchanged
    );
    Ok(unchanged)
}
