//! HTTP routing and OpenAPI documentation configuration.
//!
//! All API endpoints are registered here with their OpenAPI specifications, and Swagger UI is
//! served at `/api/docs`.

use axum::Router;
use utoipa::OpenApi;
use utoipa_axum::{router::OpenApiRouter, routes};
use utoipa_swagger_ui::SwaggerUi;

use crate::server::{controller, model::app::AppState};

/// Builds the application's HTTP router with all API endpoints and Swagger UI documentation.
///
/// # Registered Endpoints
/// - `GET /api/cron/refresh-all` - Run one time-budgeted combat power refresh
/// - `GET /api/character/search` - Resolve a character name and register its OCID
/// - `GET /api/leaderboard` - Combat power leaderboard page
///
/// The OpenAPI document is available at `/api/docs/openapi.json`.
///
/// # Example
/// ```ignore
/// let app_state = AppState { store, game_api, ocid_cache, cron_secret };
/// let router = routes().with_state(app_state);
/// ```
pub fn routes() -> Router<AppState> {
    #[derive(OpenApi)]
    #[openapi(info(title = "maplerank", description = "maplerank API"), tags(
        (name = controller::cron::CRON_TAG, description = "Scheduled refresh routes"),
        (name = controller::character::CHARACTER_TAG, description = "Character lookup routes"),
        (name = controller::leaderboard::LEADERBOARD_TAG, description = "Leaderboard routes"),
    ))]
    struct ApiDoc;

    let (routes, api) = OpenApiRouter::with_openapi(ApiDoc::openapi())
        .routes(routes!(controller::cron::refresh_all))
        .routes(routes!(controller::character::search_character))
        .routes(routes!(controller::leaderboard::get_leaderboard))
        .split_for_parts();

    routes.merge(SwaggerUi::new("/api/docs").url("/api/docs/openapi.json", api))
}
