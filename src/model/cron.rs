use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Per-status counters of a refresh run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RefreshStatsDto {
    pub success: usize,
    pub failed: usize,
    pub not_found: usize,
    pub skipped: usize,
}

/// Why a refresh run ended before reaching the end of its range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum StoppedReasonDto {
    /// The run's time budget was exhausted
    Timeout,
}

/// Successful response of the cron refresh endpoint
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RefreshAllDto {
    /// Always `true`
    pub success: bool,
    /// Number of OCIDs fetched (skipped fresh records excluded)
    pub processed: usize,
    /// Number of OCIDs purged after repeatedly not being found
    pub removed: usize,
    pub offset: usize,
    /// Effective batch size after clamping
    pub batch_size: usize,
    /// Offset to pass to the next invocation, present only when `hasMore`
    pub next_offset: Option<usize>,
    /// Length of the whole identifier list
    pub total_count: usize,
    pub has_more: bool,
    pub stats: RefreshStatsDto,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stopped_reason: Option<StoppedReasonDto>,
    pub execution_time_ms: u64,
    pub timestamp: DateTime<Utc>,
}

/// Failure response of the cron refresh endpoint
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RefreshFailureDto {
    /// Always `false`
    pub success: bool,
    /// Message of the error that aborted the run
    pub error: String,
    pub timestamp: DateTime<Utc>,
}
