//! Google OAuth token endpoint mocks for service-account credentials.
//!
//! The endpoint lives at `/token` on the shared mockito server, which is where
//! [`TestSetup::service_account_key`](crate::TestSetup::service_account_key) points.

use mockito::{Matcher, Mock};
use serde_json::json;

use crate::TestSetup;

/// Throwaway 2048-bit RSA key used only to sign test assertions.
pub const TEST_PRIVATE_KEY: &str = include_str!("./test_rsa_key.pem");

pub const TEST_CLIENT_EMAIL: &str = "maplerank-test@test-project.iam.gserviceaccount.com";

const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";

impl TestSetup {
    pub fn token<'a>(&'a mut self) -> TokenFixtures<'a> {
        TokenFixtures { setup: self }
    }
}

pub struct TokenFixtures<'a> {
    pub setup: &'a mut TestSetup,
}

impl<'a> TokenFixtures<'a> {
    /// Create a mock `POST /token` endpoint granting `access_token` for `expires_in` seconds.
    ///
    /// The request must be a JWT-bearer grant carrying a signed assertion.
    pub fn create_token_endpoint(
        &mut self,
        access_token: &str,
        expires_in: u64,
        expected_requests: usize,
    ) -> Mock {
        self.setup
            .server
            .mock("POST", "/token")
            .match_body(Matcher::AllOf(vec![
                Matcher::UrlEncoded("grant_type".into(), JWT_BEARER_GRANT.into()),
                Matcher::Regex("assertion=[^&]+".to_string()),
            ]))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                json!({
                    "access_token": access_token,
                    "expires_in": expires_in,
                    "token_type": "Bearer"
                })
                .to_string(),
            )
            .expect(expected_requests)
            .create()
    }

    /// Create a mock `POST /token` endpoint rejecting the grant with `status`.
    pub fn create_token_error_endpoint(&mut self, status: usize, expected_requests: usize) -> Mock {
        self.setup
            .server
            .mock("POST", "/token")
            .with_status(status)
            .with_header("content-type", "application/json")
            .with_body(
                json!({
                    "error": "invalid_grant",
                    "error_description": "Invalid JWT Signature."
                })
                .to_string(),
            )
            .expect(expected_requests)
            .create()
    }
}
