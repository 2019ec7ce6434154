//! Per-station deduplication and presentation order
//!
//! A batch is collapsed to one sighting per station id and ordered newest
//! first.

use crate::app::models::ResolvedSighting;
use std::cmp::Ordering;
use std::collections::HashMap;
use tracing::debug;

/// Keep the latest sighting per station and sort for presentation
///
/// Within a station the entry with the latest timestamp wins; for equal
/// timestamps the one that came first in `resolved` is kept. The result is
/// ordered by timestamp descending, then station name ascending.
pub fn dedupe_and_rank(resolved: &[ResolvedSighting]) -> Vec<ResolvedSighting> {
    let mut latest: HashMap<&str, usize> = HashMap::new();

    for (index, sighting) in resolved.iter().enumerate() {
        latest
            .entry(sighting.station.id.as_str())
            .and_modify(|kept| {
                if sighting.timestamp > resolved[*kept].timestamp {
                    *kept = index;
                }
            })
            .or_insert(index);
    }

    let mut ranked: Vec<ResolvedSighting> = latest
        .into_values()
        .map(|index| resolved[index].clone())
        .collect();
    ranked.sort_by(compare_for_presentation);

    debug!(
        "Deduplicated {} sightings to {} stations",
        resolved.len(),
        ranked.len()
    );
    ranked
}

/// Newest first, then station name ascending
///
/// Station id breaks the remaining ties so the order never depends on hash
/// iteration.
pub fn compare_for_presentation(a: &ResolvedSighting, b: &ResolvedSighting) -> Ordering {
    b.timestamp
        .cmp(&a.timestamp)
        .then_with(|| a.station.name.cmp(&b.station.name))
        .then_with(|| a.station.id.cmp(&b.station.id))
}
