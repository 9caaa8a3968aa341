//! Tests for LeaderboardService::get_leaderboard.

use chrono::{Duration as ChronoDuration, Utc};
use maplerank::server::service::leaderboard::LeaderboardService;
use maplerank_test_utils::prelude::*;

/// Tests ranking stored records joined with cached character info.
///
/// Verifies that only successful records are ranked, ordered by numeric combat power, and that
/// entries without cached info carry no metadata.
///
/// Expected: two entries ranked 1 and 2, metadata only on the first
#[tokio::test]
async fn ranks_stored_records() -> Result<(), TestError> {
    let store = MemoryTableStore::new()
        .with_combat_power_records(&[
            factory::success_record("low", "900", ChronoDuration::hours(1)),
            factory::success_record("high", "10000", ChronoDuration::hours(1)),
            factory::not_found_record("gone", 1),
        ])
        .with_character_info(&[factory::character_info("high", "Aria", Utc::now())]);

    let leaderboard = LeaderboardService::new(&store)
        .get_leaderboard(0, None)
        .await?;

    assert_eq!(leaderboard.total_count, 2);
    assert_eq!(leaderboard.limit, 100);
    assert_eq!(leaderboard.entries[0].ocid, "high");
    assert_eq!(leaderboard.entries[0].rank, 1);
    assert_eq!(leaderboard.entries[0].character_name.as_deref(), Some("Aria"));
    assert_eq!(leaderboard.entries[1].ocid, "low");
    assert_eq!(leaderboard.entries[1].rank, 2);
    assert_eq!(leaderboard.entries[1].character_name, None);

    Ok(())
}

/// Tests that read failures propagate.
///
/// Expected: Err
#[tokio::test]
async fn fails_when_tables_cannot_be_read() -> Result<(), TestError> {
    let store = MemoryTableStore::new().with_failing_reads();

    let result = LeaderboardService::new(&store).get_leaderboard(0, None).await;

    assert!(result.is_err());

    Ok(())
}
