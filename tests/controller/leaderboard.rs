//! Tests for the GET /api/leaderboard endpoint.

use chrono::{Duration as ChronoDuration, Utc};

use super::*;

/// Expect a ranked page honoring offset and limit
#[tokio::test]
async fn returns_requested_page() -> Result<(), TestError> {
    let store = Arc::new(
        MemoryTableStore::new()
            .with_combat_power_records(&[
                factory::success_record("a", "300", ChronoDuration::hours(1)),
                factory::success_record("b", "200", ChronoDuration::hours(1)),
                factory::success_record("c", "100", ChronoDuration::hours(1)),
            ])
            .with_character_info(&[factory::character_info("b", "Bella", Utc::now())]),
    );

    let response = get(
        app(store, FakeGameApi::new()),
        "/api/leaderboard?offset=1&limit=1",
        None,
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await?;
    assert_eq!(body["totalCount"], 3);
    assert_eq!(body["limit"], 1);
    assert_eq!(body["entries"].as_array().map(Vec::len), Some(1));
    assert_eq!(body["entries"][0]["rank"], 2);
    assert_eq!(body["entries"][0]["ocid"], "b");
    assert_eq!(body["entries"][0]["combatPower"], "200");
    assert_eq!(body["entries"][0]["characterName"], "Bella");

    Ok(())
}

/// Expect 500 when the spreadsheet is unreachable
#[tokio::test]
async fn store_failure_is_500() -> Result<(), TestError> {
    let store = Arc::new(MemoryTableStore::new().with_failing_reads());

    let response = get(app(store, FakeGameApi::new()), "/api/leaderboard", None).await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    Ok(())
}
