use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::model::api::ErrorDto;

#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Cron request is missing the Authorization header")]
    MissingCronToken,
    #[error("Cron request carried an invalid bearer token")]
    InvalidCronToken,
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        tracing::warn!("{}", self);

        (
            StatusCode::UNAUTHORIZED,
            Json(ErrorDto {
                error: "Unauthorized".to_string(),
            }),
        )
            .into_response()
    }
}
