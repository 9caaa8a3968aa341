//! Tunables of the combat-power refresh pipeline.

use std::time::Duration;

use crate::server::service::retry::RetryPolicy;

/// Wall-clock budget of one refresh run; leaves headroom under a 10 second execution ceiling.
pub const TIME_BUDGET: Duration = Duration::from_millis(7000);

/// Batch size used when the caller does not pass one, and the upper clamp.
pub const DEFAULT_BATCH_SIZE: usize = 50;
pub const MAX_BATCH_SIZE: usize = 50;

/// OCIDs fetched in parallel within one batch.
pub const MAX_CONCURRENT_FETCHES: usize = 10;

/// Consecutive not-found results after which an OCID is purged.
pub const REMOVAL_THRESHOLD: u32 = 3;

/// Successful records younger than this are not re-fetched.
pub const FRESHNESS_WINDOW_HOURS: i64 = 24;

/// 3 attempts in total, waiting 500ms then 1000ms.
pub const FETCH_RETRY_POLICY: RetryPolicy = RetryPolicy::new(3, Duration::from_millis(500), 2);

/// Clamps a requested batch size into `1..=MAX_BATCH_SIZE`, defaulting when absent.
pub fn effective_batch_size(requested: Option<usize>) -> usize {
    requested
        .unwrap_or(DEFAULT_BATCH_SIZE)
        .clamp(1, MAX_BATCH_SIZE)
}
