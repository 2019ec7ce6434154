//! HTTP mapping for crate errors

use crate::Error;
use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use tracing::{error, warn};

impl Error {
    /// Status code a request failing with this error is answered with
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::MalformedClientTimestamp { .. }
            | Self::InvalidReport { .. }
            | Self::UnknownStationName { .. } => StatusCode::BAD_REQUEST,
            Self::StoreUnavailable { .. } => StatusCode::SERVICE_UNAVAILABLE,
            Self::StationNotFound { .. }
            | Self::Configuration { .. }
            | Self::DirectoryFormat { .. }
            | Self::Io { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            error!("Request failed: {}", self);
        } else {
            warn!("Rejected request: {}", self);
        }

        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

/// 404 with the same JSON error body as other failures
pub fn not_found(message: impl Into<String>) -> Response {
    let message = message.into();
    (StatusCode::NOT_FOUND, Json(json!({ "error": message }))).into_response()
}
