//! Scheduler for the periodic combat-power refresh.
//!
//! When a cron expression is configured the refresh pipeline runs in-process instead of (or as
//! well as) being triggered through `/api/cron/refresh-all`. Each run resumes from the
//! `nextOffset` of the previous one and the cursor wraps to 0 once a pass over the identifier
//! list completes.

use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
};

use tokio_cron_scheduler::{Job, JobScheduler};

use crate::server::{
    error::Error,
    model::app::AppState,
    service::combat_power::{RefreshOrchestrator, RefreshOutcome},
};

#[cfg(test)]
mod tests;

/// Job scheduler driving [`RefreshOrchestrator::refresh_all`] on a cron expression.
pub struct Scheduler {
    state: AppState,
    cursor: Arc<AtomicUsize>,
    sched: JobScheduler,
}

impl Scheduler {
    /// Creates a new instance of [`Scheduler`] starting at offset 0.
    ///
    /// # Returns
    /// - `Ok(Scheduler)` - Successfully created scheduler instance
    /// - `Err(Error)` - Failed to initialize the underlying job scheduler
    pub async fn new(state: AppState) -> Result<Self, Error> {
        let sched = JobScheduler::new().await?;

        Ok(Self {
            state,
            cursor: Arc::new(AtomicUsize::new(0)),
            sched,
        })
    }

    /// Registers the refresh job and starts the scheduler.
    ///
    /// # Arguments
    /// - `cron` - Cron expression with seconds, e.g. `"0 */10 * * * *"` for every 10 minutes
    ///
    /// # Returns
    /// - `Ok(())` - Job registered and scheduler started
    /// - `Err(Error)` - Invalid cron expression or scheduler error
    pub async fn start(self, cron: &str) -> Result<(), Error> {
        let state = self.state.clone();
        let cursor = Arc::clone(&self.cursor);

        self.sched
            .add(Job::new_async(cron, move |_, _| {
                let state = state.clone();
                let cursor = Arc::clone(&cursor);

                Box::pin(async move {
                    match run_refresh(&state, &cursor).await {
                        Ok(outcome) => tracing::info!(
                            "Scheduled combat power refresh processed {} OCID(s); next offset {}",
                            outcome.processed,
                            cursor.load(Ordering::SeqCst)
                        ),
                        Err(e) => tracing::error!("Scheduled combat power refresh failed: {:?}", e),
                    }
                })
            })?)
            .await?;

        self.sched.start().await?;

        tracing::info!("Combat power refresh scheduled with cron expression {}", cron);

        Ok(())
    }
}

/// Runs one refresh from the stored cursor and advances it.
///
/// A failed run leaves the cursor untouched so the next tick retries the same slice.
pub async fn run_refresh(
    state: &AppState,
    cursor: &AtomicUsize,
) -> Result<RefreshOutcome, Error> {
    let offset = cursor.load(Ordering::SeqCst);

    let outcome = RefreshOrchestrator::new(state.store.as_ref(), state.game_api.as_ref())
        .with_ocid_cache(&state.ocid_cache)
        .refresh_all(offset, None)
        .await?;

    cursor.store(next_cursor(&outcome), Ordering::SeqCst);

    Ok(outcome)
}

/// Offset the next scheduled run starts from: `next_offset` while the pass is incomplete, else 0.
pub fn next_cursor(outcome: &RefreshOutcome) -> usize {
    outcome.next_offset.unwrap_or(0)
}
