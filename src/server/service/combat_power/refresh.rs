//! Time-budgeted refresh run across the identifier list.

use std::{
    collections::{HashMap, HashSet},
    time::Duration,
};

use serde::Serialize;
use tokio::time::Instant;

use super::{
    batch::BatchProcessor,
    config::{effective_batch_size, FETCH_RETRY_POLICY, REMOVAL_THRESHOLD, TIME_BUDGET},
};
use crate::server::{
    error::Error,
    model::combat_power::{BatchStats, CombatPowerRecord},
    nexon::GameApi,
    service::retry::RetryPolicy,
    sheets::{OcidCache, TableStore},
};

/// Why a run ended before covering its whole range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StoppedReason {
    Timeout,
}

/// Summary of a [`RefreshOrchestrator::refresh_all`] run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefreshOutcome {
    /// Records fetched and persisted, fresh skips excluded.
    pub processed: usize,
    /// OCIDs purged from every table.
    pub removed: usize,
    pub offset: usize,
    pub batch_size: usize,
    pub next_offset: Option<usize>,
    pub total_count: usize,
    pub has_more: bool,
    pub stats: BatchStats,
    pub stopped_reason: Option<StoppedReason>,
    pub execution_time_ms: u64,
}

/// Drives the batch processor across a slice of the identifier list.
///
/// The three tables are read once per run. Each batch is persisted as soon as it completes and
/// folded into the in-memory snapshot, so later batches see it and a timeout loses nothing
/// already written. Store failures abort the run; earlier batches stay committed.
pub struct RefreshOrchestrator<'a> {
    store: &'a dyn TableStore,
    game_api: &'a dyn GameApi,
    time_budget: Duration,
    retry_policy: RetryPolicy,
    ocid_cache: Option<&'a OcidCache>,
}

impl<'a> RefreshOrchestrator<'a> {
    pub fn new(store: &'a dyn TableStore, game_api: &'a dyn GameApi) -> Self {
        Self {
            store,
            game_api,
            time_budget: TIME_BUDGET,
            retry_policy: FETCH_RETRY_POLICY,
            ocid_cache: None,
        }
    }

    pub fn with_time_budget(mut self, time_budget: Duration) -> Self {
        self.time_budget = time_budget;
        self
    }

    pub fn with_retry_policy(mut self, retry_policy: RetryPolicy) -> Self {
        self.retry_policy = retry_policy;
        self
    }

    /// Known-OCID cache to invalidate whenever a run removes OCIDs.
    pub fn with_ocid_cache(mut self, ocid_cache: &'a OcidCache) -> Self {
        self.ocid_cache = Some(ocid_cache);
        self
    }

    /// Refreshes OCIDs from `offset` onwards until the list or the time budget runs out.
    ///
    /// # Arguments
    /// - `offset` - Position in the identifier list to start from
    /// - `batch_size` - OCIDs per batch; defaults to 50 and is clamped to `1..=50`
    ///
    /// # Returns
    /// - `Ok(RefreshOutcome)` - Counters plus the offset to resume from when `has_more`
    /// - `Err(Error::SheetsError)` - A bulk read, upsert or removal failed
    pub async fn refresh_all(
        &self,
        offset: usize,
        batch_size: Option<usize>,
    ) -> Result<RefreshOutcome, Error> {
        let start = Instant::now();
        let batch_size = effective_batch_size(batch_size);

        let (page, mut combat_power_table, mut character_info_table) = tokio::try_join!(
            self.store.get_all_ocids(offset, None),
            self.store.get_combat_power_table(),
            self.store.get_all_character_info_data(),
        )?;
        let mut existing = combat_power_table.record_map::<CombatPowerRecord>();

        tracing::info!(
            "Starting combat power refresh at offset {} ({} of {} OCIDs remaining, batch size {})",
            offset,
            page.ocids.len(),
            page.total_count,
            batch_size
        );

        if page.ocids.is_empty() {
            return Ok(RefreshOutcome {
                processed: 0,
                removed: 0,
                offset,
                batch_size,
                next_offset: None,
                total_count: page.total_count,
                has_more: false,
                stats: BatchStats::default(),
                stopped_reason: None,
                execution_time_ms: start.elapsed().as_millis() as u64,
            });
        }

        let processor = BatchProcessor::new(self.game_api).with_retry_policy(self.retry_policy);
        let mut stats = BatchStats::default();
        let mut records: Vec<CombatPowerRecord> = Vec::new();
        let mut stopped_reason = None;
        let mut relative_offset = 0;

        while relative_offset < page.ocids.len() {
            if start.elapsed() >= self.time_budget {
                tracing::warn!(
                    "Time budget of {:?} exhausted after {} OCID(s); stopping at offset {}",
                    self.time_budget,
                    relative_offset,
                    offset + relative_offset
                );
                stopped_reason = Some(StoppedReason::Timeout);
                break;
            }

            let end = (relative_offset + batch_size).min(page.ocids.len());
            let batch = processor
                .process_batch(&page.ocids[relative_offset..end], &existing)
                .await;

            stats.merge(&batch.stats);

            self.store
                .upsert_combat_power_records(&batch.records, Some(&combat_power_table))
                .await?;
            if !batch.character_info_records.is_empty() {
                self.store
                    .upsert_character_info_cache(
                        &batch.character_info_records,
                        Some(&character_info_table),
                    )
                    .await?;
            }

            combat_power_table.apply_upsert(&batch.records);
            character_info_table.apply_upsert(&batch.character_info_records);
            for record in &batch.records {
                existing.insert(record.ocid.clone(), record.clone());
            }

            records.extend(batch.records);
            relative_offset += batch_size;
        }

        let removal = removal_candidates(&records, &existing);
        if !removal.is_empty() {
            tracing::info!(
                "Removing {} OCID(s) not found {} times in a row",
                removal.len(),
                REMOVAL_THRESHOLD
            );
            self.store.remove_ocids(&removal).await?;
            if let Some(cache) = self.ocid_cache {
                cache.invalidate().await;
            }
        }

        let has_more = offset + relative_offset < page.total_count;
        let outcome = RefreshOutcome {
            processed: records.len(),
            removed: removal.len(),
            offset,
            batch_size,
            next_offset: has_more.then_some(offset + relative_offset),
            total_count: page.total_count,
            has_more,
            stats,
            stopped_reason,
            execution_time_ms: start.elapsed().as_millis() as u64,
        };

        tracing::info!(
            success = stats.success,
            not_found = stats.not_found,
            failed = stats.failed,
            skipped = stats.skipped,
            "Refreshed {} OCID(s), removed {}, in {}ms (next offset {:?})",
            outcome.processed,
            outcome.removed,
            outcome.execution_time_ms,
            outcome.next_offset
        );

        Ok(outcome)
    }
}

/// OCIDs touched in this run whose latest record reached the removal threshold, in first-seen
/// order without duplicates.
fn removal_candidates(
    records: &[CombatPowerRecord],
    latest: &HashMap<String, CombatPowerRecord>,
) -> Vec<String> {
    let mut seen = HashSet::new();

    records
        .iter()
        .map(|record| record.ocid.as_str())
        .filter(|ocid| seen.insert(*ocid))
        .filter(|ocid| {
            latest
                .get(*ocid)
                .is_some_and(|record| record.not_found_count >= REMOVAL_THRESHOLD)
        })
        .map(str::to_string)
        .collect()
}
