//! Route table and request handlers

use crate::Error;
use crate::app::models::{InspectorReport, Line, ReportReceipt, StationListEntry};
use crate::app::services::recent_sightings::{RecentSightings, RecentSightingsAggregator};
use crate::app::services::report_intake::ReportService;
use crate::app::services::sighting_store::SightingStore;
use crate::app::services::station_directory::DirectoryHandle;
use crate::config::AggregationConfig;
use crate::server::error::not_found;
use axum::extract::{Query, State};
use axum::http::{HeaderMap, HeaderValue, StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

/// Services shared by every request handler
#[derive(Debug)]
pub struct AppState<S> {
    pub recent: RecentSightingsAggregator<S>,
    pub reports: ReportService<S>,
    pub directory: DirectoryHandle,
}

impl<S> Clone for AppState<S> {
    fn clone(&self) -> Self {
        Self {
            recent: self.recent.clone(),
            reports: self.reports.clone(),
            directory: self.directory.clone(),
        }
    }
}

impl<S: SightingStore> AppState<S> {
    pub fn new(store: Arc<S>, directory: DirectoryHandle, aggregation: AggregationConfig) -> Self {
        Self {
            recent: RecentSightingsAggregator::new(Arc::clone(&store), directory.clone(), aggregation),
            reports: ReportService::new(store, directory.clone()),
            directory,
        }
    }
}

pub fn create_router<S: SightingStore + 'static>(state: AppState<S>) -> Router {
    Router::new()
        .route("/recent", get(recent_sightings::<S>))
        .route("/newInspector", post(new_inspector::<S>))
        .route("/id", get(station_id::<S>))
        .route("/station", get(station_name::<S>))
        .route("/stations", get(station_catalogue::<S>))
        .route("/health", get(health))
        .layer(CorsLayer::new().allow_origin(Any))
        .with_state(state)
}

#[derive(Debug, Deserialize)]
pub(crate) struct NameQuery {
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct IdQuery {
    pub id: String,
}

/// Body of `GET /stations`
#[derive(Debug, Serialize)]
pub(crate) struct StationCatalogue {
    pub stations: Vec<StationListEntry>,
    pub lines: Vec<Line>,
}

pub(crate) async fn recent_sightings<S: SightingStore + 'static>(
    State(state): State<AppState<S>>,
    headers: HeaderMap,
) -> Result<Response, Error> {
    let if_modified_since = headers
        .get(header::IF_MODIFIED_SINCE)
        .map(|value| String::from_utf8_lossy(value.as_bytes()).into_owned());

    match state.recent.recent_sightings(if_modified_since.as_deref()).await? {
        RecentSightings::NotModified => Ok(StatusCode::NOT_MODIFIED.into_response()),
        RecentSightings::Fresh {
            sightings,
            last_modified,
        } => {
            let mut response = Json(sightings).into_response();
            if let Some(latest) = last_modified {
                // Not an IMF-fixdate: whole seconds would drop writes made
                // later within the same second
                let stamp = latest.to_rfc3339_opts(SecondsFormat::AutoSi, true);
                if let Ok(value) = HeaderValue::from_str(&stamp) {
                    response.headers_mut().insert(header::LAST_MODIFIED, value);
                }
            }
            Ok(response)
        }
    }
}

pub(crate) async fn new_inspector<S: SightingStore + 'static>(
    State(state): State<AppState<S>>,
    Json(report): Json<InspectorReport>,
) -> Result<Json<ReportReceipt>, Error> {
    state.reports.submit(report, Utc::now()).await.map(Json)
}

pub(crate) async fn station_id<S: SightingStore + 'static>(
    State(state): State<AppState<S>>,
    Query(query): Query<NameQuery>,
) -> Response {
    let directory = state.directory.snapshot();
    match directory.resolve_by_name(&query.name) {
        Some(id) => Json(id).into_response(),
        None => not_found(format!("No station named '{}'", query.name)),
    }
}

pub(crate) async fn station_name<S: SightingStore + 'static>(
    State(state): State<AppState<S>>,
    Query(query): Query<IdQuery>,
) -> Response {
    let directory = state.directory.snapshot();
    match directory.station_name(&query.id) {
        Some(name) => Json(name).into_response(),
        None => not_found(format!("No station with id '{}'", query.id)),
    }
}

pub(crate) async fn station_catalogue<S: SightingStore + 'static>(
    State(state): State<AppState<S>>,
) -> Json<StationCatalogue> {
    let directory = state.directory.snapshot();
    Json(StationCatalogue {
        stations: directory.station_list(),
        lines: directory.lines(),
    })
}

pub(crate) async fn health() -> &'static str {
    "OK"
}
