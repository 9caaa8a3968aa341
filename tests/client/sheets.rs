//! Tests for SheetsClient against a mock Sheets v4 API.

use std::time::Duration;

use chrono::{TimeZone, Utc};
use maplerank::server::{
    error::sheets::SheetsError,
    model::combat_power::{CombatPowerRecord, RecordStatus},
    sheets::{OcidCache, RemovalCounts, TableStore, UpsertCounts},
};
use maplerank_test_utils::prelude::*;
use mockito::Matcher;
use serde_json::json;

const HEADER: &[&str] = &["ocid", "combat_power", "updated_at", "status", "not_found_count"];
const UPDATED_AT: &str = "2025-01-01T00:00:00.000Z";

fn record(ocid: &str, combat_power: &str) -> CombatPowerRecord {
    CombatPowerRecord {
        ocid: ocid.to_string(),
        combat_power: combat_power.to_string(),
        updated_at: Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap(),
        status: RecordStatus::Success,
        not_found_count: 0,
    }
}

/// Tests reading the identifier list.
///
/// Verifies that the header row, blank cells and duplicates are dropped before the window is
/// applied, and that total_count covers the whole list.
///
/// Expected: ["b", "c"] with total_count 3
#[tokio::test]
async fn reads_ocid_window() -> Result<(), TestError> {
    let mut test = TestSetup::new().await;
    let mock = test.sheets().create_values_endpoint(
        "Sheet1!A:A",
        &[&["ocid"], &["a"], &[""], &["b"], &["a"], &["c"]],
        1,
    );
    test.mocks.push(mock);

    let page = test.sheets_client().get_all_ocids(1, Some(2)).await?;

    assert_eq!(page.ocids, vec!["b", "c"]);
    assert_eq!(page.total_count, 3);
    assert!(!page.has_more);
    test.assert_mocks();

    Ok(())
}

/// Tests reading a sheet that has no values yet.
///
/// Expected: Ok with an empty table
#[tokio::test]
async fn reads_empty_sheet() -> Result<(), TestError> {
    let mut test = TestSetup::new().await;
    let mock = test
        .sheets()
        .create_values_endpoint("CombatPower!A:E", &[], 1);
    test.mocks.push(mock);

    let table = test.sheets_client().get_combat_power_table().await?;

    assert!(table.is_empty());
    test.assert_mocks();

    Ok(())
}

/// Tests an upsert that both rewrites and appends rows.
///
/// Verifies that without a snapshot the table is read first, the known OCID is rewritten in
/// place through a single values batch update, and the new OCID is appended.
///
/// Expected: one read, one batch update of A2:E2, one append of the new row
#[tokio::test]
async fn upserts_existing_and_new_rows() -> Result<(), TestError> {
    let mut test = TestSetup::new().await;
    let read = test.sheets().create_values_endpoint(
        "CombatPower!A:E",
        &[HEADER, &["a", "1", UPDATED_AT, "success", "0"]],
        1,
    );
    let update = test.sheets().create_batch_update_endpoint(
        json!({
            "valueInputOption": "RAW",
            "data": [{
                "range": "CombatPower!A2:E2",
                "values": [["a", "500", UPDATED_AT, "success", "0"]],
            }],
        }),
        1,
    );
    let append = test.sheets().create_append_endpoint(
        "CombatPower!A:E",
        json!([["b", "700", UPDATED_AT, "success", "0"]]),
        1,
    );
    test.mocks.extend([read, update, append]);

    let counts = test
        .sheets_client()
        .upsert_combat_power_records(&[record("a", "500"), record("b", "700")], None)
        .await?;

    assert_eq!(counts.updated, 1);
    assert_eq!(counts.inserted, 1);
    test.assert_mocks();

    Ok(())
}

/// Tests the first write to an empty sheet.
///
/// Verifies that the header row is appended ahead of the records when the provided snapshot is
/// empty, and that no read is issued.
///
/// Expected: one append carrying the header and the record
#[tokio::test]
async fn writes_header_into_empty_sheet() -> Result<(), TestError> {
    let mut test = TestSetup::new().await;
    let read = test
        .sheets()
        .create_values_endpoint("CombatPower!A:E", &[], 0);
    let append = test.sheets().create_append_endpoint(
        "CombatPower!A:E",
        json!([HEADER, ["a", "10", UPDATED_AT, "success", "0"]]),
        1,
    );
    test.mocks.extend([read, append]);

    let counts = test
        .sheets_client()
        .upsert_combat_power_records(&[record("a", "10")], Some(&Default::default()))
        .await?;

    assert_eq!(counts.inserted, 1);
    test.assert_mocks();

    Ok(())
}

/// Tests removing OCIDs from every table.
///
/// Verifies that rows are deleted with one structural batch update per sheet, in descending
/// row order, and that a sheet missing from the spreadsheet is skipped.
///
/// Expected: two rows removed from Sheet1, one from CombatPower, none from CharacterInfo
#[tokio::test]
async fn removes_rows_from_each_sheet() -> Result<(), TestError> {
    let mut test = TestSetup::new().await;
    let metadata = test
        .sheets()
        .create_metadata_endpoint(&[("Sheet1", 0), ("CombatPower", 11)], 1);
    let sheet1 = test.sheets().create_values_endpoint(
        "Sheet1!A:A",
        &[&["ocid"], &["gone"], &["kept"], &["other"]],
        1,
    );
    let combat_power = test
        .sheets()
        .create_values_endpoint("CombatPower!A:A", &[&["ocid"], &["gone"]], 1);
    let delete_sheet1 = test.sheets().create_structural_update_endpoint(
        json!({
            "requests": [
                { "deleteDimension": { "range": {
                    "sheetId": 0, "dimension": "ROWS", "startIndex": 3, "endIndex": 4
                } } },
                { "deleteDimension": { "range": {
                    "sheetId": 0, "dimension": "ROWS", "startIndex": 1, "endIndex": 2
                } } },
            ]
        }),
        1,
    );
    let delete_combat_power = test.sheets().create_structural_update_endpoint(
        json!({
            "requests": [
                { "deleteDimension": { "range": {
                    "sheetId": 11, "dimension": "ROWS", "startIndex": 1, "endIndex": 2
                } } },
            ]
        }),
        1,
    );
    test.mocks.extend([
        metadata,
        sheet1,
        combat_power,
        delete_sheet1,
        delete_combat_power,
    ]);

    let counts = test
        .sheets_client()
        .remove_ocids(&["gone".to_string(), "other".to_string()])
        .await?;

    assert_eq!(counts.sheet1, 2);
    assert_eq!(counts.combat_power, 1);
    assert_eq!(counts.character_info, 0);
    test.assert_mocks();

    Ok(())
}

/// Tests writes with nothing to write.
///
/// Verifies that an upsert of no records without a snapshot and a removal of no OCIDs return
/// zero counts without reading metadata or values and without issuing any write.
///
/// Expected: zero counts, no request reaches the server
#[tokio::test]
async fn empty_inputs_make_no_requests() -> Result<(), TestError> {
    let mut test = TestSetup::new().await;
    let values = test
        .sheets()
        .create_values_endpoint("CombatPower!A:E", &[], 0);
    let batch_update = test.sheets().create_batch_update_endpoint(json!({}), 0);
    let append = test
        .sheets()
        .create_append_endpoint("CombatPower!A:E", json!([]), 0);
    let metadata = test
        .sheets()
        .create_metadata_endpoint(&[("Sheet1", 0), ("CombatPower", 11)], 0);
    let structural_update = test
        .sheets()
        .create_structural_update_endpoint(json!({}), 0);
    let any_get = test.server.mock("GET", Matcher::Any).expect(0).create();
    let any_post = test.server.mock("POST", Matcher::Any).expect(0).create();
    test.mocks.extend([
        values,
        batch_update,
        append,
        metadata,
        structural_update,
        any_get,
        any_post,
    ]);

    let client = test.sheets_client();
    let upserted = client.upsert_combat_power_records(&[], None).await?;
    let removed = client.remove_ocids(&[]).await?;

    assert_eq!(upserted, UpsertCounts::default());
    assert_eq!(removed, RemovalCounts::default());
    test.assert_mocks();

    Ok(())
}

/// Tests registering an OCID through the cache.
///
/// Verifies that the list is read once to fill the cache, the new OCID is appended, and a
/// repeated registration is answered from the cache.
///
/// Expected: true then false, one read and one append
#[tokio::test]
async fn appends_unknown_ocid_once() -> Result<(), TestError> {
    let mut test = TestSetup::new().await;
    let read = test
        .sheets()
        .create_values_endpoint("Sheet1!A:A", &[&["ocid"], &["a"]], 1);
    let append = test
        .sheets()
        .create_append_endpoint("Sheet1!A:A", json!([["b"]]), 1);
    test.mocks.extend([read, append]);

    let client = test.sheets_client();
    let cache = OcidCache::new(Duration::from_secs(300));

    assert!(client.add_ocid_if_absent("b", &cache).await?);
    assert!(!client.add_ocid_if_absent("b", &cache).await?);
    assert!(!client.add_ocid_if_absent("a", &cache).await?);
    test.assert_mocks();

    Ok(())
}

/// Tests mapping a failed read to a status error.
///
/// Expected: Err(SheetsError::Status) with 503
#[tokio::test]
async fn reports_read_failure() -> Result<(), TestError> {
    let mut test = TestSetup::new().await;
    let mock = test
        .sheets()
        .create_values_error_endpoint("CombatPower!A:E", 503, 1);
    test.mocks.push(mock);

    let result = test.sheets_client().get_combat_power_table().await;

    match result {
        Err(SheetsError::Status { status, .. }) => assert_eq!(status.as_u16(), 503),
        other => panic!("expected a status error, got {:?}", other),
    }
    test.assert_mocks();

    Ok(())
}
