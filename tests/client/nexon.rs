//! Tests for NexonClient against a mock OpenAPI.

use maplerank::server::nexon::GameApi;
use maplerank_test_utils::prelude::*;

/// Tests fetching and reading the combat power stat.
///
/// Verifies that the request carries the API key header and the OCID query parameter and that
/// the combat power entry is found among the other stats.
///
/// Expected: Ok with combat power "123456"
#[tokio::test]
async fn fetches_character_stats() -> Result<(), TestError> {
    let mut test = TestSetup::new().await;
    let stat = factory::stat_with_combat_power("123456");
    let mock = test.nexon().create_stat_endpoint("ocid-1", &stat, 1);
    test.mocks.push(mock);

    let result = test.nexon_client().get_character_stats("ocid-1").await?;

    assert_eq!(result.combat_power(), Some("123456"));
    test.assert_mocks();

    Ok(())
}

/// Tests mapping a non-2xx answer to a status error.
///
/// Expected: Err with status 404 recognized as not found
#[tokio::test]
async fn reports_not_found_status() -> Result<(), TestError> {
    let mut test = TestSetup::new().await;
    let mock = test.nexon().create_error_endpoint("/character/stat", 404, 1);
    test.mocks.push(mock);

    let result = test.nexon_client().get_character_stats("missing").await;

    let error = result.expect_err("404 should fail");
    assert!(error.is_not_found());
    test.assert_mocks();

    Ok(())
}

/// Tests that server errors are not confused with not found.
///
/// Expected: Err with status 500, not a not-found
#[tokio::test]
async fn reports_server_error_status() -> Result<(), TestError> {
    let mut test = TestSetup::new().await;
    let mock = test.nexon().create_error_endpoint("/character/stat", 500, 1);
    test.mocks.push(mock);

    let error = test
        .nexon_client()
        .get_character_stats("ocid-1")
        .await
        .expect_err("500 should fail");

    assert_eq!(error.status().map(|s| s.as_u16()), Some(500));
    assert!(!error.is_not_found());

    Ok(())
}

/// Expect basic info to deserialize from the basic endpoint
#[tokio::test]
async fn fetches_basic_info() -> Result<(), TestError> {
    let mut test = TestSetup::new().await;
    let basic = factory::character_basic("Aria");
    let mock = test.nexon().create_basic_endpoint("ocid-1", &basic, 1);
    test.mocks.push(mock);

    let result = test.nexon_client().get_character_basic_info("ocid-1").await?;

    assert_eq!(result, basic);
    test.assert_mocks();

    Ok(())
}

/// Expect a character name to resolve through the id endpoint
#[tokio::test]
async fn resolves_ocid() -> Result<(), TestError> {
    let mut test = TestSetup::new().await;
    let mock = test.nexon().create_ocid_endpoint("Aria", "ocid-aria", 1);
    test.mocks.push(mock);

    let ocid = test.nexon_client().get_ocid("Aria").await?;

    assert_eq!(ocid, "ocid-aria");
    test.assert_mocks();

    Ok(())
}
