//! API error handling.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use cepclima_core::constants::MSG_INVALID_ZIPCODE;
use cepclima_lookup::LookupError;

use crate::dto::ErrorResponse;

/// API error type.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    /// Body could not be decoded.
    pub fn bad_request() -> Self {
        Self::new(StatusCode::BAD_REQUEST, MSG_INVALID_ZIPCODE)
    }

    /// Status code of this error.
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Message sent to the caller.
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorResponse {
            message: self.message,
        };

        (self.status, Json(body)).into_response()
    }
}

/// The orchestrator has already logged the cause; only the caller-facing
/// status and message survive.
impl From<LookupError> for ApiError {
    fn from(err: LookupError) -> Self {
        let status =
            StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        ApiError::new(status, err.message())
    }
}
