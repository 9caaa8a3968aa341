//! Error types for the maplerank server.
//!
//! Each external collaborator (Nexon OpenAPI, Google Sheets) and each server concern
//! (configuration, cron authentication) has its own `thiserror` enum. They are aggregated into
//! [`Error`], which converts into an axum response so handlers can propagate with `?`.

pub mod auth;
pub mod config;
pub mod nexon;
pub mod retry;
pub mod sheets;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::{
    model::api::ErrorDto,
    server::error::{auth::AuthError, config::ConfigError, nexon::NexonError, sheets::SheetsError},
};

/// Main error type for the maplerank server.
///
/// Per-character fetch failures never surface as this type; the batch processor converts them
/// into record statuses. What does reach it are structural failures: the spreadsheet being
/// unreachable, missing configuration, or a rejected cron token.
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration error (missing or invalid environment variables).
    #[error(transparent)]
    ConfigError(#[from] ConfigError),
    /// Cron bearer token missing or wrong.
    #[error(transparent)]
    AuthError(#[from] AuthError),
    /// Nexon OpenAPI request error.
    #[error(transparent)]
    NexonError(#[from] NexonError),
    /// Google Sheets request or token error.
    #[error(transparent)]
    SheetsError(#[from] SheetsError),
    /// Request parameter failed validation.
    #[error("Invalid request: {0}")]
    BadRequest(String),
    /// Cron scheduler error (job registration, scheduler startup).
    #[error(transparent)]
    SchedulerError(#[from] tokio_cron_scheduler::JobSchedulerError),
    /// Listener bind or serve failure.
    #[error(transparent)]
    IoError(#[from] std::io::Error),
}

/// Maps errors to HTTP responses.
///
/// # Returns
/// - 400 Bad Request - For rejected request parameters
/// - 401 Unauthorized - For a missing or wrong cron token
/// - 404 Not Found - For characters the Nexon API does not know
/// - 500 Internal Server Error - For all other errors (logged)
impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match self {
            Self::ConfigError(err) => err.into_response(),
            Self::AuthError(err) => err.into_response(),
            Self::NexonError(err) => err.into_response(),
            Self::BadRequest(message) => {
                tracing::debug!("Rejected request: {}", message);

                (StatusCode::BAD_REQUEST, Json(ErrorDto { error: message })).into_response()
            }
            err => InternalServerError(err).into_response(),
        }
    }
}

/// Wrapper type for converting any displayable error into a 500 Internal Server Error response.
///
/// Logs the error and returns a generic message so internal details stay out of responses.
pub struct InternalServerError<E>(pub E);

impl<E: std::fmt::Display> IntoResponse for InternalServerError<E> {
    fn into_response(self) -> Response {
        tracing::error!("{}", self.0);

        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorDto {
                error: "Internal server error".to_string(),
            }),
        )
            .into_response()
    }
}
