use maplerank::server::{
    nexon::NexonClient,
    sheets::{
        auth::{ServiceAccountKey, SheetsCredentials},
        SheetsClient,
    },
};
use mockito::{Mock, Server, ServerGuard};

use crate::fixtures::token::{TEST_CLIENT_EMAIL, TEST_PRIVATE_KEY};

pub const TEST_NEXON_API_KEY: &str = "test-nexon-key";
pub const TEST_SPREADSHEET_ID: &str = "test-sheet";
pub const TEST_ACCESS_TOKEN: &str = "test-access-token";

/// A mockito server shared by the Nexon and Sheets clients under test.
pub struct TestSetup {
    pub server: ServerGuard,
    pub mocks: Vec<Mock>,
}

impl TestSetup {
    pub async fn new() -> Self {
        Self {
            server: Server::new_async().await,
            mocks: Vec::new(),
        }
    }

    /// Nexon client pointed at the mock server.
    pub fn nexon_client(&self) -> NexonClient {
        NexonClient::with_client(reqwest::Client::new(), self.server.url(), TEST_NEXON_API_KEY)
    }

    /// Sheets client pointed at the mock server, authenticating with a static token.
    pub fn sheets_client(&self) -> SheetsClient {
        SheetsClient::with_client(
            reqwest::Client::new(),
            self.server.url(),
            TEST_SPREADSHEET_ID,
            SheetsCredentials::AccessToken(TEST_ACCESS_TOKEN.to_string()),
        )
    }

    /// Service-account key exchanging assertions at the mock server's `/token` endpoint.
    pub fn service_account_key(&self) -> ServiceAccountKey {
        ServiceAccountKey {
            client_email: TEST_CLIENT_EMAIL.to_string(),
            private_key: TEST_PRIVATE_KEY.to_string(),
            token_url: format!("{}/token", self.server.url()),
        }
    }

    /// Sheets client pointed at the mock server, authenticating with [`Self::service_account_key`].
    pub fn service_account_sheets_client(&self) -> SheetsClient {
        SheetsClient::with_client(
            reqwest::Client::new(),
            self.server.url(),
            TEST_SPREADSHEET_ID,
            SheetsCredentials::ServiceAccount(self.service_account_key()),
        )
    }

    /// Assert all registered mock endpoints were called as expected.
    ///
    /// # Panics
    /// Panics if any mock endpoint was not called the expected number of times
    pub fn assert_mocks(&self) {
        for mock in &self.mocks {
            mock.assert();
        }
    }
}
