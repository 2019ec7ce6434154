//! Shared access to the current station directory snapshot
//!
//! Readers take an `Arc` of the current directory and keep using it for the
//! rest of their request. A reload builds a complete new directory first and
//! then swaps the pointer, so no reader ever sees a partially loaded dataset.

use super::StationDirectory;
use super::metadata::LoadStats;
use crate::config::DirectoryConfig;
use crate::{Error, Result};
use std::sync::{Arc, PoisonError, RwLock};
use tracing::info;

/// Cloneable handle to the process-wide station directory
#[derive(Debug, Clone)]
pub struct DirectoryHandle {
    current: Arc<RwLock<Arc<StationDirectory>>>,
    config: Option<DirectoryConfig>,
}

impl DirectoryHandle {
    /// Wrap an already built directory; `reload` is unavailable
    pub fn new(directory: StationDirectory) -> Self {
        Self {
            current: Arc::new(RwLock::new(Arc::new(directory))),
            config: None,
        }
    }

    /// Load the directory described by `config` and remember it for reloads
    pub async fn load(config: DirectoryConfig) -> Result<(Self, LoadStats)> {
        let (directory, stats) = StationDirectory::load(&config).await?;
        let handle = Self {
            current: Arc::new(RwLock::new(Arc::new(directory))),
            config: Some(config),
        };
        Ok((handle, stats))
    }

    /// Get the current snapshot
    pub fn snapshot(&self) -> Arc<StationDirectory> {
        let guard = self.current.read().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(&guard)
    }

    /// Swap in a new directory, returning the previous snapshot
    pub fn replace(&self, directory: StationDirectory) -> Arc<StationDirectory> {
        let next = Arc::new(directory);
        let mut guard = self.current.write().unwrap_or_else(PoisonError::into_inner);
        std::mem::replace(&mut *guard, next)
    }

    /// Reload the dataset from disk and swap it in
    ///
    /// On failure the current snapshot stays in place.
    pub async fn reload(&self) -> Result<LoadStats> {
        let config = self.config.as_ref().ok_or_else(|| {
            Error::configuration("Directory was not loaded from a dataset, cannot reload")
        })?;

        let (directory, stats) = StationDirectory::load(config).await?;
        let previous = self.replace(directory);
        info!(
            "Station directory reloaded: {} -> {} stations (previous snapshot {:.0}s old)",
            previous.station_count(),
            stats.stations_loaded,
            previous.metadata().age().as_secs_f64()
        );
        Ok(stats)
    }
}
