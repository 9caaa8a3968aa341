//! Fetches combat power for one batch of OCIDs.

use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};
use futures::stream::{FuturesUnordered, StreamExt};
use tokio::time::Instant;

use super::config::{FETCH_RETRY_POLICY, FRESHNESS_WINDOW_HOURS, MAX_CONCURRENT_FETCHES};
use crate::server::{
    model::combat_power::{BatchStats, CharacterInfoRecord, CombatPowerRecord, RecordStatus},
    nexon::GameApi,
    service::retry::{RetryContext, RetryPolicy},
    util::time::is_fresh,
};

/// Result of a stat fetch after retries, reduced to what the record needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    /// Combat power value as reported.
    Found(String),
    /// The character is unknown or its payload carries no combat power.
    NotFound,
    /// Transient failure that outlived every retry.
    Failed,
}

/// Output of [`BatchProcessor::process_batch`].
#[derive(Debug, Clone, Default)]
pub struct BatchResult {
    /// One record per non-skipped OCID, in input order.
    pub records: Vec<CombatPowerRecord>,
    /// Character metadata for every OCID whose basic-info fetch succeeded.
    pub character_info_records: Vec<CharacterInfoRecord>,
    pub stats: BatchStats,
    pub execution_time_ms: u64,
}

pub struct BatchProcessor<'a> {
    game_api: &'a dyn GameApi,
    retry: RetryContext,
    concurrency: usize,
    freshness_window: Duration,
}

impl<'a> BatchProcessor<'a> {
    pub fn new(game_api: &'a dyn GameApi) -> Self {
        Self {
            game_api,
            retry: RetryContext::new(FETCH_RETRY_POLICY),
            concurrency: MAX_CONCURRENT_FETCHES,
            freshness_window: Duration::hours(FRESHNESS_WINDOW_HOURS),
        }
    }

    pub fn with_retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.retry = RetryContext::new(policy);
        self
    }

    /// Number of OCIDs in flight at once; values below 1 are raised to 1.
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    /// Refreshes `ocids` against the game API.
    ///
    /// OCIDs whose record in `existing` is still fresh are skipped. The rest are fetched in
    /// groups of the configured concurrency, one group at a time, each OCID with its stat fetch
    /// retried and its basic info fetched alongside. Per-OCID failures end up in the record's
    /// status; this never fails as a whole.
    ///
    /// # Arguments
    /// - `ocids` - OCIDs of this batch
    /// - `existing` - Snapshot of the `CombatPower` table keyed by OCID
    pub async fn process_batch(
        &self,
        ocids: &[String],
        existing: &HashMap<String, CombatPowerRecord>,
    ) -> BatchResult {
        let start = Instant::now();
        let now = Utc::now();
        let mut result = BatchResult::default();

        let pending: Vec<&str> = ocids
            .iter()
            .map(String::as_str)
            .filter(|ocid| match existing.get(*ocid) {
                Some(record) if is_fresh(record, now, self.freshness_window) => {
                    tracing::debug!("Skipping fresh record for OCID {}", ocid);
                    result.stats.skipped += 1;
                    false
                }
                _ => true,
            })
            .collect();

        for chunk in pending.chunks(self.concurrency) {
            let mut futures = FuturesUnordered::new();

            for (position, &ocid) in chunk.iter().enumerate() {
                let previous = existing.get(ocid);
                futures.push(async move {
                    let fetched = self.process_ocid(ocid, previous).await;
                    (position, fetched)
                });
            }

            let mut fetched = Vec::with_capacity(chunk.len());
            while let Some(item) = futures.next().await {
                fetched.push(item);
            }
            fetched.sort_unstable_by_key(|(position, _)| *position);

            for (_, (record, character_info)) in fetched {
                result.stats.record(record.status);
                result.records.push(record);
                result.character_info_records.extend(character_info);
            }
        }

        result.execution_time_ms = start.elapsed().as_millis() as u64;

        tracing::debug!(
            success = result.stats.success,
            not_found = result.stats.not_found,
            failed = result.stats.failed,
            skipped = result.stats.skipped,
            "Processed batch of {} OCID(s) in {}ms",
            ocids.len(),
            result.execution_time_ms
        );

        result
    }

    async fn process_ocid(
        &self,
        ocid: &str,
        previous: Option<&CombatPowerRecord>,
    ) -> (CombatPowerRecord, Option<CharacterInfoRecord>) {
        let description = format!("combat power fetch for OCID {}", ocid);

        let (stat, basic) = tokio::join!(
            self.retry.execute_with_retry(&description, || {
                self.game_api.get_character_stats(ocid)
            }),
            self.game_api.get_character_basic_info(ocid),
        );

        let outcome = match stat {
            Ok(stat) => match stat.combat_power() {
                Some(combat_power) => FetchOutcome::Found(combat_power.to_string()),
                None => {
                    tracing::debug!("No combat power in stat payload for OCID {}", ocid);
                    FetchOutcome::NotFound
                }
            },
            Err(e) if e.is_not_found() => {
                tracing::debug!("OCID {} not found", ocid);
                FetchOutcome::NotFound
            }
            Err(e) => {
                tracing::error!("Failed to fetch combat power for OCID {}: {}", ocid, e);
                FetchOutcome::Failed
            }
        };

        let now = Utc::now();
        let character_info = match basic {
            Ok(basic) => Some(CharacterInfoRecord {
                ocid: ocid.to_string(),
                character_name: basic.character_name,
                character_level: basic.character_level,
                character_image: basic.character_image,
                world_name: basic.world_name,
                character_class: basic.character_class,
                cached_at: now,
            }),
            Err(e) => {
                tracing::debug!("Basic info unavailable for OCID {}: {}", ocid, e);
                None
            }
        };

        (build_record(ocid, outcome, previous, now), character_info)
    }
}

/// Builds the new record for an OCID from its fetch outcome and its previous record.
///
/// - `Found` resets `not_found_count` to 0
/// - `NotFound` stores combat power `"0"` and increments the previous count (starting from 0)
/// - `Failed` keeps the previous combat power and count, or `"0"` and 0 without a previous record
pub fn build_record(
    ocid: &str,
    outcome: FetchOutcome,
    previous: Option<&CombatPowerRecord>,
    now: DateTime<Utc>,
) -> CombatPowerRecord {
    let previous_count = previous.map_or(0, |record| record.not_found_count);

    let (combat_power, status, not_found_count) = match outcome {
        FetchOutcome::Found(combat_power) => (combat_power, RecordStatus::Success, 0),
        FetchOutcome::NotFound => (
            "0".to_string(),
            RecordStatus::NotFound,
            previous_count.saturating_add(1),
        ),
        FetchOutcome::Failed => (
            previous.map_or_else(|| "0".to_string(), |record| record.combat_power.clone()),
            RecordStatus::Error,
            previous_count,
        ),
    };

    CombatPowerRecord {
        ocid: ocid.to_string(),
        combat_power,
        updated_at: now,
        status,
        not_found_count,
    }
}
