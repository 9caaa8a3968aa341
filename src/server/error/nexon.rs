//! Nexon OpenAPI error types.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::{model::api::ErrorDto, server::error::InternalServerError};

/// Failure of a single Nexon OpenAPI call.
#[derive(Error, Debug)]
pub enum NexonError {
    /// The HTTP request itself failed (network, DNS, TLS, timeout, body decoding).
    #[error("Nexon API request failed: {0}")]
    Request(#[from] reqwest::Error),
    /// Nexon returned a non-2xx status code.
    #[error("Nexon API returned {status}: {body}")]
    Status {
        status: reqwest::StatusCode,
        /// Raw response body for debugging.
        body: String,
    },
}

impl NexonError {
    /// HTTP status attached to the failure, if the request got that far.
    pub fn status(&self) -> Option<reqwest::StatusCode> {
        match self {
            Self::Request(err) => err.status(),
            Self::Status { status, .. } => Some(*status),
        }
    }

    /// True when the API affirmatively reported the character as unknown.
    pub fn is_not_found(&self) -> bool {
        self.status() == Some(reqwest::StatusCode::NOT_FOUND)
    }
}

impl IntoResponse for NexonError {
    fn into_response(self) -> Response {
        if self.is_not_found() {
            tracing::debug!("{}", self);

            return (
                StatusCode::NOT_FOUND,
                Json(ErrorDto {
                    error: "Character not found".to_string(),
                }),
            )
                .into_response();
        }

        InternalServerError(self).into_response()
    }
}
