//! HTTP mapping for [`crate::errors::Error`].
//!
//! Every failure is answered with a single-field JSON body,
//! `{"error": "<message>"}`. Forbidden is reported as 404 so that the
//! existence of other users' bookings and items is not revealed.

use crate::errors::Error;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

/// Body of every error response
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Human-readable message
    pub error: String,
}

/// Wrapper that lets handlers return core errors with `?`.
#[derive(Debug)]
pub struct ApiError(pub Error);

impl ApiError {
    /// Status code the wrapped error is reported with
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self.0 {
            Error::NotFound { .. } | Error::Forbidden { .. } => StatusCode::NOT_FOUND,
            Error::InvalidArgument { .. }
            | Error::InvalidInterval { .. }
            | Error::InvalidState { .. }
            | Error::UnsupportedState { .. } => StatusCode::BAD_REQUEST,
            Error::Conflict { .. } => StatusCode::CONFLICT,
            Error::Config { .. } | Error::Database(_) | Error::Io(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// `400` with the given message
    pub(crate) fn bad_request(message: impl Into<String>) -> Self {
        Self(Error::InvalidArgument {
            message: message.into(),
        })
    }
}

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!("Request failed: {}", self.0);
        } else {
            tracing::debug!(%status, "Request rejected: {}", self.0);
        }

        let body = ErrorResponse {
            error: self.0.to_string(),
        };
        (status, Json(body)).into_response()
    }
}
