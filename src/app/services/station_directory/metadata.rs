//! Station directory metadata and statistics tracking
//!
//! This module defines the data structures for tracking how a directory
//! snapshot was loaded.

use std::path::PathBuf;
use std::time::Instant;

/// Statistics about the directory loading process
#[derive(Debug, Clone, Default)]
pub struct LoadStats {
    /// Number of station records found in the dataset
    pub records_found: usize,

    /// Number of stations loaded into the directory
    pub stations_loaded: usize,

    /// Number of lines loaded from the line catalogue
    pub lines_loaded: usize,

    /// Line entries that reference ids missing from the station dataset
    pub dangling_line_stations: Vec<String>,

    /// Time taken to load the directory
    pub load_duration: std::time::Duration,
}

impl LoadStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Calculate the loading rate in stations per second
    pub fn loading_rate(&self) -> f64 {
        if self.load_duration.is_zero() {
            0.0
        } else {
            self.stations_loaded as f64 / self.load_duration.as_secs_f64()
        }
    }

    /// Check if the line catalogue referenced unknown stations
    pub fn has_warnings(&self) -> bool {
        !self.dangling_line_stations.is_empty()
    }

    /// Get a summary string of the loading process
    pub fn summary(&self) -> String {
        format!(
            "Loaded {} of {} stations and {} lines in {:.2}s",
            self.stations_loaded,
            self.records_found,
            self.lines_loaded,
            self.load_duration.as_secs_f64()
        )
    }
}

/// Information about a loaded directory snapshot
#[derive(Debug, Clone)]
pub struct DirectoryMetadata {
    pub source_path: Option<PathBuf>,
    pub station_count: usize,
    pub line_count: usize,
    pub load_time: Instant,
}

impl DirectoryMetadata {
    /// Age of the snapshot
    pub fn age(&self) -> std::time::Duration {
        self.load_time.elapsed()
    }
}
