//! Nexon OpenAPI mock endpoint creation utilities.
//!
//! Endpoints are registered on the shared mockito server and verify they were called the
//! expected number of times when [`TestSetup::assert_mocks`](crate::TestSetup::assert_mocks) runs.

use maplerank::server::nexon::{CharacterBasic, CharacterStat};
use mockito::{Matcher, Mock};

use crate::TestSetup;

impl TestSetup {
    pub fn nexon<'a>(&'a mut self) -> NexonFixtures<'a> {
        NexonFixtures { setup: self }
    }
}

pub struct NexonFixtures<'a> {
    pub setup: &'a mut TestSetup,
}

impl<'a> NexonFixtures<'a> {
    /// Create a mock `GET /character/stat?ocid={ocid}` endpoint returning `stat`.
    pub fn create_stat_endpoint(
        &mut self,
        ocid: &str,
        stat: &CharacterStat,
        expected_requests: usize,
    ) -> Mock {
        self.setup
            .server
            .mock("GET", "/character/stat")
            .match_query(Matcher::UrlEncoded("ocid".into(), ocid.into()))
            .match_header("x-nxopen-api-key", crate::setup::TEST_NEXON_API_KEY)
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(serde_json::to_string(stat).unwrap())
            .expect(expected_requests)
            .create()
    }

    /// Create a mock `GET /character/basic?ocid={ocid}` endpoint returning `basic`.
    pub fn create_basic_endpoint(
        &mut self,
        ocid: &str,
        basic: &CharacterBasic,
        expected_requests: usize,
    ) -> Mock {
        self.setup
            .server
            .mock("GET", "/character/basic")
            .match_query(Matcher::UrlEncoded("ocid".into(), ocid.into()))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(serde_json::to_string(basic).unwrap())
            .expect(expected_requests)
            .create()
    }

    /// Create a mock `GET /id?character_name={name}` endpoint returning `ocid`.
    pub fn create_ocid_endpoint(
        &mut self,
        character_name: &str,
        ocid: &str,
        expected_requests: usize,
    ) -> Mock {
        self.setup
            .server
            .mock("GET", "/id")
            .match_query(Matcher::UrlEncoded(
                "character_name".into(),
                character_name.into(),
            ))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(serde_json::json!({ "ocid": ocid }).to_string())
            .expect(expected_requests)
            .create()
    }

    /// Create a mock endpoint at `path` answering every query with `status`.
    pub fn create_error_endpoint(
        &mut self,
        path: &str,
        status: usize,
        expected_requests: usize,
    ) -> Mock {
        self.setup
            .server
            .mock("GET", path)
            .match_query(Matcher::Any)
            .with_status(status)
            .with_header("content-type", "application/json")
            .with_body(r#"{"error":{"name":"OPENAPI00004","message":"Please input valid parameter"}}"#)
            .expect(expected_requests)
            .create()
    }
}
