//! Shared test utilities and fixtures for HTTP handler tests

use crate::app::models::{Line, NewSighting};
use crate::app::services::sighting_store::MemorySightingStore;
use crate::app::services::station_directory::DirectoryHandle;
use crate::app::services::station_directory::tests::sample_directory;
use crate::config::AggregationConfig;
use crate::server::AppState;
use axum::body::to_bytes;
use axum::response::Response;
use serde_json::Value;
use std::sync::Arc;

pub mod error_tests;

/// Application state over a memory store seeded with `rows`
pub fn sample_state(rows: Vec<NewSighting>) -> AppState<MemorySightingStore> {
    let directory = sample_directory().with_lines(vec![
        Line {
            name: "U8".to_string(),
            stations: vec!["U-Hptz".to_string(), "SU-A".to_string()],
        },
        Line {
            name: "S41".to_string(),
            stations: vec!["S-Ost".to_string()],
        },
    ]);

    AppState::new(
        Arc::new(MemorySightingStore::with_rows(rows)),
        DirectoryHandle::new(directory),
        AggregationConfig::default(),
    )
}

/// Read a response body as JSON
pub async fn json_body(response: Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}
