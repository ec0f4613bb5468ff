//! Custom error types for the API service
//!
//! Operation failures travel inside the envelope with HTTP 200. This type only
//! covers requests rejected before they reach the community service.

use axum::{
    Json,
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use common::ApiResponse;
use thiserror::Error;

/// Custom error type for the API service
#[derive(Error, Debug)]
pub enum ApiError {
    /// Bad request with message
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Request body missing, not JSON, or not the expected shape
    #[error("Invalid request body: {0}")]
    InvalidBody(#[from] JsonRejection),

    /// Query string could not be parsed
    #[error("Invalid query string: {0}")]
    InvalidQuery(#[from] QueryRejection),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::InvalidBody(rejection) => (rejection.status(), rejection.body_text()),
            ApiError::InvalidQuery(rejection) => (rejection.status(), rejection.body_text()),
        };

        tracing::debug!("Rejected request: {}", error_message);

        let body = Json(ApiResponse::<()>::err(error_message));

        (status, body).into_response()
    }
}
