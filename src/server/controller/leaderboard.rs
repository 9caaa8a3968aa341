use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use utoipa::IntoParams;

use crate::{
    model::{api::ErrorDto, leaderboard::LeaderboardDto},
    server::{
        controller::util::query::parse_lenient, error::Error, model::app::AppState,
        service::leaderboard::LeaderboardService,
    },
};

pub static LEADERBOARD_TAG: &str = "leaderboard";

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct LeaderboardParams {
    /// Ranked entries to skip (default 0)
    pub offset: Option<String>,
    /// Page size (default 100, at most 500)
    pub limit: Option<String>,
}

/// Get the combat power leaderboard
#[utoipa::path(
    get,
    path = "/api/leaderboard",
    tag = LEADERBOARD_TAG,
    params(LeaderboardParams),
    responses(
        (status = 200, description = "Leaderboard page", body = LeaderboardDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn get_leaderboard(
    State(state): State<AppState>,
    Query(params): Query<LeaderboardParams>,
) -> Result<impl IntoResponse, Error> {
    let offset = parse_lenient(params.offset.as_deref()).unwrap_or(0);
    let limit = parse_lenient(params.limit.as_deref());

    let leaderboard = LeaderboardService::new(state.store.as_ref())
        .get_leaderboard(offset, limit)
        .await?;

    Ok((StatusCode::OK, Json(leaderboard)))
}
