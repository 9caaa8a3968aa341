//! Freshness calculations for cached combat-power records.

use chrono::{DateTime, Duration, Utc};

use crate::server::model::combat_power::{CombatPowerRecord, RecordStatus};

/// Determines whether a record is recent enough to skip re-fetching.
///
/// Only `success` records are ever fresh: `not_found` and `error` records are retried on every
/// run so that the not-found counter keeps advancing and transient failures heal.
///
/// # Arguments
/// - `record` - Existing record from the snapshot
/// - `now` - Timestamp of the current run
/// - `window` - Maximum age of a fresh record (24 hours in production)
///
/// # Returns
/// `true` when `status == success` and `now - updated_at < window`. A timestamp in the future
/// counts as fresh.
pub fn is_fresh(record: &CombatPowerRecord, now: DateTime<Utc>, window: Duration) -> bool {
    record.status == RecordStatus::Success && now.signed_duration_since(record.updated_at) < window
}
