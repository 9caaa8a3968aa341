
use crate::server::model::combat_power::BatchStats;

use super::*;

fn outcome(next_offset: Option<usize>) -> RefreshOutcome {
    RefreshOutcome {
        processed: 0,
        removed: 0,
        offset: 0,
        batch_size: 50,
        next_offset,
        total_count: 200,
        has_more: next_offset.is_some(),
        stats: BatchStats::default(),
        stopped_reason: None,
        execution_time_ms: 0,
    }
}
