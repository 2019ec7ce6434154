//! Shared test utilities and fixtures for report intake tests

use crate::app::models::InspectorReport;
use crate::app::services::report_intake::ReportService;
use crate::app::services::sighting_store::MemorySightingStore;
use crate::app::services::station_directory::DirectoryHandle;
use crate::app::services::station_directory::tests::sample_directory;
use std::sync::Arc;

pub use crate::app::services::sighting_store::tests::reference_time;


/// A report service over an empty memory store and the sample directory
pub fn sample_service() -> (ReportService<MemorySightingStore>, Arc<MemorySightingStore>) {
    let store = Arc::new(MemorySightingStore::new());
    let service = ReportService::new(Arc::clone(&store), DirectoryHandle::new(sample_directory()));
    (service, store)
}

/// Build a report from optional fields
pub fn report(line: Option<&str>, station: Option<&str>, direction: Option<&str>) -> InspectorReport {
    InspectorReport {
        line: line.map(str::to_string),
        station: station.map(str::to_string),
        direction: direction.map(str::to_string),
    }
}
