//! Tests for CharacterService::search.

use std::time::Duration;

use maplerank::server::{error::Error, service::character::CharacterService, sheets::OcidCache};
use maplerank_test_utils::prelude::*;

/// Tests registering a newly searched character.
///
/// Verifies that the resolved OCID is appended to the identifier list once, and that a
/// second search for the same name reports it as already registered.
///
/// Expected: registered true then false, the OCID listed once
#[tokio::test]
async fn registers_new_ocid_once() -> Result<(), TestError> {
    let store = MemoryTableStore::new().with_ocids(&["existing"]);
    let api = FakeGameApi::new().with_ocid("Aria", "ocid-aria");
    let cache = OcidCache::new(Duration::from_secs(300));
    let service = CharacterService::new(&store, &api, &cache);

    let first = service.search("Aria").await?;
    let second = service.search("  Aria  ").await?;

    assert_eq!(first.ocid, "ocid-aria");
    assert!(first.registered);
    assert!(!second.registered);
    assert_eq!(store.ocids(), vec!["existing", "ocid-aria"]);

    Ok(())
}

/// Tests that an OCID already on the sheet is not appended.
///
/// Expected: registered false, list unchanged
#[tokio::test]
async fn keeps_known_ocid() -> Result<(), TestError> {
    let store = MemoryTableStore::new().with_ocids(&["ocid-aria"]);
    let api = FakeGameApi::new().with_ocid("Aria", "ocid-aria");
    let cache = OcidCache::new(Duration::from_secs(300));

    let result = CharacterService::new(&store, &api, &cache)
        .search("Aria")
        .await?;

    assert!(!result.registered);
    assert_eq!(store.ocids(), vec!["ocid-aria"]);

    Ok(())
}

/// Tests rejecting a blank name before any upstream call.
///
/// Expected: Err(BadRequest), no store calls
#[tokio::test]
async fn rejects_blank_name() -> Result<(), TestError> {
    let store = MemoryTableStore::new();
    let api = FakeGameApi::new();
    let cache = OcidCache::new(Duration::from_secs(300));

    let result = CharacterService::new(&store, &api, &cache)
        .search("   ")
        .await;

    assert!(matches!(result, Err(Error::BadRequest(_))));
    assert!(store.calls().is_empty());

    Ok(())
}

/// Tests an unknown character name.
///
/// Expected: Err(NexonError) reporting not found, nothing registered
#[tokio::test]
async fn unknown_name_is_not_found() -> Result<(), TestError> {
    let store = MemoryTableStore::new();
    let api = FakeGameApi::new();
    let cache = OcidCache::new(Duration::from_secs(300));

    let result = CharacterService::new(&store, &api, &cache)
        .search("Nobody")
        .await;

    match result {
        Err(Error::NexonError(e)) => assert!(e.is_not_found()),
        other => panic!("expected a Nexon not-found error, got {:?}", other),
    }
    assert!(store.ocids().is_empty());

    Ok(())
}
