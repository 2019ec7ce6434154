//! Station directory loading from the static datasets
//!
//! The station dataset is a JSON object keyed by station id:
//!
//! ```json
//! { "U-Ado": { "name": "Adenauerplatz", "coordinates": { "latitude": 52.49, "longitude": 13.30 } } }
//! ```
//!
//! The optional line dataset maps line names to station ids in route order:
//!
//! ```json
//! { "U7": ["U-Rud", "U-Ado", "U-Wil"] }
//! ```
//!
//! Object order in the file is kept, so name lookups resolve ambiguous names
//! to the first station in the file. A repeated station id or line name is a
//! configuration error.

use super::StationDirectory;
use super::metadata::LoadStats;
use crate::app::models::{Coordinates, Line, Station};
use crate::config::DirectoryConfig;
use crate::{Error, Result};
use serde::de::{Deserializer, MapAccess, Visitor};
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashSet;
use std::fmt;
use std::marker::PhantomData;
use std::path::Path;
use std::time::Instant;
use tracing::{debug, info, warn};

/// One entry of the station dataset
#[derive(Debug, Deserialize)]
struct StationRecord {
    name: String,
    coordinates: Coordinates,
}

/// Object entries in file order, duplicate keys included
///
/// `serde_json::Map` keeps only one value per key, which would hide a
/// repeated station id or line name from the duplicate checks.
struct OrderedEntries<T>(Vec<(String, T)>);

impl<'de, T: Deserialize<'de>> Deserialize<'de> for OrderedEntries<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        struct EntriesVisitor<T>(PhantomData<T>);

        impl<'de, T: Deserialize<'de>> Visitor<'de> for EntriesVisitor<T> {
            type Value = OrderedEntries<T>;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a JSON object")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> std::result::Result<Self::Value, A::Error> {
                let mut entries = Vec::with_capacity(map.size_hint().unwrap_or(0));
                while let Some(entry) = map.next_entry::<String, T>()? {
                    entries.push(entry);
                }
                Ok(OrderedEntries(entries))
            }
        }

        deserializer.deserialize_map(EntriesVisitor(PhantomData))
    }
}

impl StationDirectory {
    /// Load the station directory described by `config`
    ///
    /// # Errors
    /// * Returns `Error::Configuration` if the station dataset is missing or
    ///   contains an invalid station
    /// * Returns `Error::DirectoryFormat` for malformed JSON
    /// * Returns `Error::Io` for other file system failures
    pub async fn load(config: &DirectoryConfig) -> Result<(Self, LoadStats)> {
        info!(
            "Loading station directory from {}",
            config.stations_path.display()
        );

        let start_time = Instant::now();
        let mut stats = LoadStats::new();

        let content = read_dataset(&config.stations_path).await?;
        let stations = parse_stations(&content, &config.stations_path)?;
        stats.records_found = stations.len();

        let (mut directory, duplicates) = Self::from_stations(stations);
        if !duplicates.is_empty() {
            return Err(Error::configuration(format!(
                "Duplicate station ids in {}: {}",
                config.stations_path.display(),
                duplicates.join(", ")
            )));
        }
        stats.stations_loaded = directory.station_count();

        if let Some(lines_path) = &config.lines_path {
            let content = read_dataset(lines_path).await?;
            let lines = parse_lines(&content, lines_path)?;

            let mut seen = HashSet::new();
            let repeated: Vec<&str> = lines
                .iter()
                .filter(|line| !seen.insert(line.name.as_str()))
                .map(|line| line.name.as_str())
                .collect();
            if !repeated.is_empty() {
                return Err(Error::configuration(format!(
                    "Duplicate line names in {}: {}",
                    lines_path.display(),
                    repeated.join(", ")
                )));
            }

            for line in &lines {
                for station_id in &line.stations {
                    if !directory.contains_station(station_id) {
                        warn!(
                            "Line {} references unknown station id {}",
                            line.name, station_id
                        );
                        stats
                            .dangling_line_stations
                            .push(format!("{}:{}", line.name, station_id));
                    }
                }
            }

            stats.lines_loaded = lines.len();
            directory.lines = lines;
        } else {
            debug!("No line dataset configured, skipping line catalogue");
        }

        directory.source_path = Some(config.stations_path.clone());
        directory.load_time = Instant::now();
        stats.load_duration = start_time.elapsed();

        info!("{}", stats.summary());
        Ok((directory, stats))
    }
}

/// Read a dataset file, mapping a missing file to a configuration error
async fn read_dataset(path: &Path) -> Result<String> {
    match tokio::fs::read_to_string(path).await {
        Ok(content) => Ok(content),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(Error::configuration(
            format!("Dataset not found: {}", path.display()),
        )),
        Err(e) => Err(Error::io(
            format!("Failed to read dataset {}", path.display()),
            e,
        )),
    }
}

/// Parse the station dataset, keeping file order
pub(crate) fn parse_stations(content: &str, source: &Path) -> Result<Vec<Station>> {
    let OrderedEntries(records) = serde_json::from_str::<OrderedEntries<Value>>(content).map_err(|e| {
        Error::directory_format(
            source.display().to_string(),
            "expected an object of station records",
            e,
        )
    })?;

    let mut stations = Vec::with_capacity(records.len());
    for (id, value) in records {
        let record: StationRecord = serde_json::from_value(value).map_err(|e| {
            Error::directory_format(
                source.display().to_string(),
                format!("invalid record for station '{}'", id),
                e,
            )
        })?;
        stations.push(Station::new(id, record.name, record.coordinates)?);
    }

    Ok(stations)
}

/// Parse the line dataset, keeping file order
pub(crate) fn parse_lines(content: &str, source: &Path) -> Result<Vec<Line>> {
    let OrderedEntries(records) = serde_json::from_str::<OrderedEntries<Value>>(content).map_err(|e| {
        Error::directory_format(
            source.display().to_string(),
            "expected an object of line records",
            e,
        )
    })?;

    let mut lines = Vec::with_capacity(records.len());
    for (name, value) in records {
        let stations: Vec<String> = serde_json::from_value(value).map_err(|e| {
            Error::directory_format(
                source.display().to_string(),
                format!("invalid station list for line '{}'", name),
                e,
            )
        })?;
        lines.push(Line { name, stations });
    }

    Ok(lines)
}
