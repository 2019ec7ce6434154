//! Tests for the error to status code mapping

use super::*;
use crate::Error;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use std::time::Duration;

#[test]
fn test_client_errors_map_to_bad_request() {
    assert_eq!(
        Error::invalid_report("empty").status_code(),
        StatusCode::BAD_REQUEST
    );
    assert_eq!(
        Error::unknown_station_name("Atlantis").status_code(),
        StatusCode::BAD_REQUEST
    );
}

#[test]
fn test_server_errors() {
    assert_eq!(
        Error::station_not_found("X").status_code(),
        StatusCode::INTERNAL_SERVER_ERROR
    );
    assert_eq!(
        Error::store_timeout("fetch_recent", Duration::from_secs(10)).status_code(),
        StatusCode::SERVICE_UNAVAILABLE
    );
}

#[tokio::test]
async fn test_error_body_carries_message() {
    let response = Error::station_not_found("X-Gone").into_response();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let body = json_body(response).await;
    assert!(body["error"].as_str().unwrap().contains("X-Gone"));
}
