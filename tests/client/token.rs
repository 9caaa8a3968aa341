//! Tests for service-account token exchange against a mock OAuth endpoint.

use maplerank::server::{
    error::sheets::SheetsError,
    sheets::{
        auth::{SheetsCredentials, TokenProvider},
        TableStore,
    },
};
use maplerank_test_utils::prelude::*;

fn provider(test: &TestSetup) -> TokenProvider {
    TokenProvider::new(SheetsCredentials::ServiceAccount(
        test.service_account_key(),
    ))
}

/// Tests that a minted token is cached.
///
/// Verifies that the first call exchanges a signed assertion for a token and that a second call
/// within the token's lifetime is served from the cache.
///
/// Expected: both calls return the minted token, the token endpoint is hit once
#[tokio::test]
async fn caches_minted_token() -> Result<(), TestError> {
    let mut test = TestSetup::new().await;
    let mock = test.token().create_token_endpoint("minted", 3600, 1);
    test.mocks.push(mock);

    let provider = provider(&test);
    let client = reqwest::Client::new();

    assert_eq!(provider.access_token(&client).await?, "minted");
    assert_eq!(provider.access_token(&client).await?, "minted");
    test.assert_mocks();

    Ok(())
}

/// Expect concurrent callers on a cold cache to share a single exchange
#[tokio::test]
async fn concurrent_callers_share_exchange() -> Result<(), TestError> {
    let mut test = TestSetup::new().await;
    let mock = test.token().create_token_endpoint("minted", 3600, 1);
    test.mocks.push(mock);

    let provider = provider(&test);
    let client = reqwest::Client::new();

    let (first, second) = tokio::join!(
        provider.access_token(&client),
        provider.access_token(&client)
    );

    assert_eq!(first?, "minted");
    assert_eq!(second?, "minted");
    test.assert_mocks();

    Ok(())
}

/// Tests a token that expires within the refresh margin.
///
/// Verifies that a token granted for less than the refresh margin is never reused.
///
/// Expected: the token endpoint is hit on every call
#[tokio::test]
async fn refreshes_token_near_expiry() -> Result<(), TestError> {
    let mut test = TestSetup::new().await;
    let mock = test.token().create_token_endpoint("short-lived", 30, 2);
    test.mocks.push(mock);

    let provider = provider(&test);
    let client = reqwest::Client::new();

    provider.access_token(&client).await?;
    provider.access_token(&client).await?;
    test.assert_mocks();

    Ok(())
}

/// Expect an out-of-range lifetime to be cached without overflowing
#[tokio::test]
async fn caches_token_with_huge_lifetime() -> Result<(), TestError> {
    let mut test = TestSetup::new().await;
    let mock = test.token().create_token_endpoint("forever", u64::MAX, 1);
    test.mocks.push(mock);

    let provider = provider(&test);
    let client = reqwest::Client::new();

    assert_eq!(provider.access_token(&client).await?, "forever");
    assert_eq!(provider.access_token(&client).await?, "forever");
    test.assert_mocks();

    Ok(())
}

/// Tests a rejected grant.
///
/// Verifies that a 401 from the token endpoint surfaces as a status error carrying the
/// response body, and that nothing is cached so the next call retries the exchange.
///
/// Expected: two `SheetsError::Status` errors with status 401, two token requests
#[tokio::test]
async fn rejected_grant_is_status_error() -> Result<(), TestError> {
    let mut test = TestSetup::new().await;
    let mock = test.token().create_token_error_endpoint(401, 2);
    test.mocks.push(mock);

    let provider = provider(&test);
    let client = reqwest::Client::new();

    for _ in 0..2 {
        match provider.access_token(&client).await {
            Err(SheetsError::Status { status, body }) => {
                assert_eq!(status.as_u16(), 401);
                assert!(body.contains("invalid_grant"));
            }
            other => panic!("expected a status error, got {:?}", other.map(|_| ())),
        }
    }
    test.assert_mocks();

    Ok(())
}

/// Tests a Sheets read authenticated with a service account.
///
/// Verifies that the client mints one token and reuses it across two reads.
///
/// Expected: one token request, two values requests
#[tokio::test]
async fn sheets_client_reuses_minted_token() -> Result<(), TestError> {
    let mut test = TestSetup::new().await;
    let token = test.token().create_token_endpoint("minted", 3600, 1);
    let values = test
        .sheets()
        .create_values_endpoint("CombatPower!A:E", &[], 2);
    test.mocks.extend([token, values]);

    let client = test.service_account_sheets_client();
    client.get_combat_power_table().await?;
    client.get_combat_power_table().await?;
    test.assert_mocks();

    Ok(())
}

/// Expect a rejected grant to fail the Sheets call before any values request
#[tokio::test]
async fn sheets_client_fails_on_rejected_grant() -> Result<(), TestError> {
    let mut test = TestSetup::new().await;
    let token = test.token().create_token_error_endpoint(401, 1);
    let values = test
        .sheets()
        .create_values_endpoint("CombatPower!A:E", &[], 0);
    test.mocks.extend([token, values]);

    let result = test.service_account_sheets_client().get_combat_power_table().await;

    assert!(matches!(result, Err(SheetsError::Status { .. })));
    test.assert_mocks();

    Ok(())
}
