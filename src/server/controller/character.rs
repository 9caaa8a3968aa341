use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use utoipa::IntoParams;

use crate::{
    model::{api::ErrorDto, character::CharacterSearchDto},
    server::{error::Error, model::app::AppState, service::character::CharacterService},
};

pub static CHARACTER_TAG: &str = "character";

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct CharacterSearchParams {
    /// Exact character name
    pub name: Option<String>,
}

/// Look up a character by name
///
/// Newly seen characters are added to the refresh list so their combat power is tracked.
#[utoipa::path(
    get,
    path = "/api/character/search",
    tag = CHARACTER_TAG,
    params(CharacterSearchParams),
    responses(
        (status = 200, description = "Character resolved", body = CharacterSearchDto),
        (status = 400, description = "Missing character name", body = ErrorDto),
        (status = 404, description = "Character not found", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn search_character(
    State(state): State<AppState>,
    Query(params): Query<CharacterSearchParams>,
) -> Result<impl IntoResponse, Error> {
    let service = CharacterService::new(
        state.store.as_ref(),
        state.game_api.as_ref(),
        &state.ocid_cache,
    );

    let result = service
        .search(params.name.as_deref().unwrap_or_default())
        .await?;

    Ok((StatusCode::OK, Json(result)))
}
