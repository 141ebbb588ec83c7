//! Handler-boundary error union and its mapping to HTTP responses.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;

use crate::geocoding::ProviderError;
use crate::store::StoreError;

/// JSON body returned for any failed request.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Errors surfaced by the request handlers.
///
/// Every failure is converted to a `{"error": "<message>"}` body at the
/// handler boundary; nothing propagates past it.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Missing, unparseable, or out-of-range input. Client-correctable.
    #[error("{0}")]
    Validation(String),

    /// The provider returned zero results. Client-correctable.
    #[error("{0}")]
    NotFound(String),

    /// The geocoding provider call failed.
    #[error(transparent)]
    Provider(#[from] ProviderError),

    /// The record store failed.
    #[error("An error occurred: {0}")]
    Store(#[from] StoreError),

    /// Anything not classified above.
    #[error("An error occurred: {0}")]
    Unexpected(String),
}

impl ApiError {
    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::Validation(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        ApiError::NotFound(message.into())
    }

    /// HTTP status this error maps to.
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) | ApiError::NotFound(_) => StatusCode::BAD_REQUEST,
            ApiError::Provider(_) | ApiError::Store(_) | ApiError::Unexpected(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        if status.is_server_error() {
            tracing::error!(error = %self, "Request failed");
        } else {
            tracing::warn!(error = %self, "Request rejected");
        }

        (
            status,
            Json(ErrorResponse {
                error: self.to_string(),
            }),
        )
            .into_response()
    }
}
