//! Tests for the GET /api/character/search endpoint.

use super::*;

/// Expect the OCID to be returned and registered
#[tokio::test]
async fn returns_and_registers_ocid() -> Result<(), TestError> {
    let store = Arc::new(MemoryTableStore::new());
    let api = FakeGameApi::new().with_ocid("Aria", "ocid-aria");

    let response = get(
        app(store.clone(), api),
        "/api/character/search?name=Aria",
        None,
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await?;
    assert_eq!(body["ocid"], "ocid-aria");
    assert_eq!(body["registered"], true);
    assert_eq!(store.ocids(), vec!["ocid-aria"]);

    Ok(())
}

/// Expect 400 for a missing name
#[tokio::test]
async fn rejects_missing_name() -> Result<(), TestError> {
    let store = Arc::new(MemoryTableStore::new());

    let response = get(app(store, FakeGameApi::new()), "/api/character/search", None).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    Ok(())
}

/// Expect 404 for a name the game API does not know
#[tokio::test]
async fn unknown_character_is_404() -> Result<(), TestError> {
    let store = Arc::new(MemoryTableStore::new());

    let response = get(
        app(store, FakeGameApi::new()),
        "/api/character/search?name=Nobody",
        None,
    )
    .await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    Ok(())
}
