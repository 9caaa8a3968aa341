use axum::{
    extract::{Query, State},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    Json,
};
use chrono::Utc;
use serde::Deserialize;
use utoipa::IntoParams;

use crate::{
    model::{
        api::ErrorDto,
        cron::{RefreshAllDto, RefreshFailureDto, StoppedReasonDto},
    },
    server::{
        controller::util::{auth::verify_cron_token, query::parse_lenient},
        error::Error,
        model::app::AppState,
        service::combat_power::{RefreshOrchestrator, RefreshOutcome, StoppedReason},
    },
};

pub static CRON_TAG: &str = "cron";

/// Query parameters of the refresh endpoint, kept as raw strings so bad values fall back
#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct RefreshAllParams {
    /// Position in the identifier list to start from (default 0)
    pub offset: Option<String>,
    /// OCIDs per batch (default 50, at most 50)
    pub batch_size: Option<String>,
}

impl RefreshAllParams {
    pub fn offset(&self) -> usize {
        parse_lenient(self.offset.as_deref()).unwrap_or(0)
    }

    pub fn batch_size(&self) -> Option<usize> {
        parse_lenient(self.batch_size.as_deref())
    }
}

/// Refresh combat power for a slice of the identifier list
///
/// Processes batches from `offset` until the list ends or the 7 second budget runs out.
/// Callers resume from `nextOffset` while `hasMore` is true.
#[utoipa::path(
    get,
    path = "/api/cron/refresh-all",
    tag = CRON_TAG,
    params(RefreshAllParams),
    responses(
        (status = 200, description = "Refresh run completed or stopped on its time budget", body = RefreshAllDto),
        (status = 401, description = "Missing or invalid cron token", body = ErrorDto),
        (status = 500, description = "Refresh run aborted", body = RefreshFailureDto)
    ),
)]
pub async fn refresh_all(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(params): Query<RefreshAllParams>,
) -> Result<impl IntoResponse, Error> {
    verify_cron_token(&headers, &state.cron_secret)?;

    let orchestrator = RefreshOrchestrator::new(state.store.as_ref(), state.game_api.as_ref())
        .with_ocid_cache(&state.ocid_cache);

    match orchestrator
        .refresh_all(params.offset(), params.batch_size())
        .await
    {
        Ok(outcome) => Ok((StatusCode::OK, Json(refresh_all_dto(outcome))).into_response()),
        Err(e) => {
            tracing::error!("Combat power refresh failed: {}", e);

            Ok((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(RefreshFailureDto {
                    success: false,
                    error: e.to_string(),
                    timestamp: Utc::now(),
                }),
            )
                .into_response())
        }
    }
}

fn refresh_all_dto(outcome: RefreshOutcome) -> RefreshAllDto {
    RefreshAllDto {
        success: true,
        processed: outcome.processed,
        removed: outcome.removed,
        offset: outcome.offset,
        batch_size: outcome.batch_size,
        next_offset: outcome.next_offset,
        total_count: outcome.total_count,
        has_more: outcome.has_more,
        stats: outcome.stats.into(),
        stopped_reason: outcome.stopped_reason.map(|reason| match reason {
            StoppedReason::Timeout => StoppedReasonDto::Timeout,
        }),
        execution_time_ms: outcome.execution_time_ms,
        timestamp: Utc::now(),
    }
}
