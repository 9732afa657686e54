use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::domains::catalog::SearchError;

/// JSON error body returned by every catalog endpoint.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<&'static str>,
    pub message: String,
}

#[derive(Debug)]
pub struct ApiError(pub SearchError);

impl From<SearchError> for ApiError {
    fn from(error: SearchError) -> Self {
        ApiError(error)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self.0 {
            SearchError::InvalidFilter { field, message } => (
                StatusCode::BAD_REQUEST,
                ErrorBody {
                    error: "InvalidFilter",
                    field: Some(field),
                    message,
                },
            ),
            SearchError::StorageUnavailable(error) => (
                StatusCode::SERVICE_UNAVAILABLE,
                ErrorBody {
                    error: "StorageUnavailable",
                    field: None,
                    message: error.to_string(),
                },
            ),
        };

        (status, Json(body)).into_response()
    }
}
