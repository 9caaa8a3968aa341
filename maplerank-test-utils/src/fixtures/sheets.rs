//! Google Sheets v4 mock endpoint creation utilities.
//!
//! Paths are relative to the test spreadsheet, `/v4/spreadsheets/{TEST_SPREADSHEET_ID}`.

use mockito::{Matcher, Mock};
use serde_json::{json, Value};

use crate::{setup::TEST_SPREADSHEET_ID, TestSetup};

impl TestSetup {
    pub fn sheets<'a>(&'a mut self) -> SheetsFixtures<'a> {
        SheetsFixtures { setup: self }
    }
}

pub struct SheetsFixtures<'a> {
    pub setup: &'a mut TestSetup,
}

fn spreadsheet_path(suffix: &str) -> String {
    format!("/v4/spreadsheets/{}{}", TEST_SPREADSHEET_ID, suffix)
}

impl<'a> SheetsFixtures<'a> {
    /// Create a mock `GET .../values/{range}` endpoint returning `rows`.
    pub fn create_values_endpoint(
        &mut self,
        range: &str,
        rows: &[&[&str]],
        expected_requests: usize,
    ) -> Mock {
        let body = if rows.is_empty() {
            json!({ "range": range, "majorDimension": "ROWS" })
        } else {
            json!({ "range": range, "majorDimension": "ROWS", "values": rows })
        };

        self.setup
            .server
            .mock("GET", spreadsheet_path(&format!("/values/{}", range)).as_str())
            .match_header("authorization", Matcher::Regex("^Bearer .+".to_string()))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(body.to_string())
            .expect(expected_requests)
            .create()
    }

    /// Create a mock `POST .../values:batchUpdate` endpoint requiring `body` to be contained in
    /// the request.
    pub fn create_batch_update_endpoint(&mut self, body: Value, expected_requests: usize) -> Mock {
        self.setup
            .server
            .mock("POST", spreadsheet_path("/values:batchUpdate").as_str())
            .match_body(Matcher::PartialJson(body))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(json!({ "spreadsheetId": TEST_SPREADSHEET_ID }).to_string())
            .expect(expected_requests)
            .create()
    }

    /// Create a mock `POST .../values/{range}:append` endpoint requiring exactly `rows`.
    pub fn create_append_endpoint(
        &mut self,
        range: &str,
        rows: Value,
        expected_requests: usize,
    ) -> Mock {
        self.setup
            .server
            .mock(
                "POST",
                spreadsheet_path(&format!("/values/{}:append", range)).as_str(),
            )
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("valueInputOption".into(), "RAW".into()),
                Matcher::UrlEncoded("insertDataOption".into(), "INSERT_ROWS".into()),
            ]))
            .match_body(Matcher::Json(json!({ "values": rows })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(json!({ "spreadsheetId": TEST_SPREADSHEET_ID }).to_string())
            .expect(expected_requests)
            .create()
    }

    /// Create a mock metadata endpoint listing `(title, sheet_id)` pairs.
    pub fn create_metadata_endpoint(
        &mut self,
        sheets: &[(&str, i64)],
        expected_requests: usize,
    ) -> Mock {
        let sheets: Vec<Value> = sheets
            .iter()
            .map(|(title, sheet_id)| json!({ "properties": { "sheetId": sheet_id, "title": title } }))
            .collect();

        self.setup
            .server
            .mock("GET", spreadsheet_path("").as_str())
            .match_query(Matcher::Any)
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(json!({ "sheets": sheets }).to_string())
            .expect(expected_requests)
            .create()
    }

    /// Create a mock structural `POST ...:batchUpdate` endpoint requiring `body` to be contained
    /// in the request.
    pub fn create_structural_update_endpoint(
        &mut self,
        body: Value,
        expected_requests: usize,
    ) -> Mock {
        self.setup
            .server
            .mock("POST", spreadsheet_path(":batchUpdate").as_str())
            .match_body(Matcher::PartialJson(body))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(json!({ "spreadsheetId": TEST_SPREADSHEET_ID, "replies": [] }).to_string())
            .expect(expected_requests)
            .create()
    }

    /// Create a mock `GET .../values/{range}` endpoint failing with `status`.
    pub fn create_values_error_endpoint(
        &mut self,
        range: &str,
        status: usize,
        expected_requests: usize,
    ) -> Mock {
        self.setup
            .server
            .mock("GET", spreadsheet_path(&format!("/values/{}", range)).as_str())
            .with_status(status)
            .with_header("content-type", "application/json")
            .with_body(json!({ "error": { "code": status, "message": "failure" } }).to_string())
            .expect(expected_requests)
            .create()
    }
}
