//! OAuth access tokens for the Sheets API.
//!
//! Production deployments authenticate as a Google service account: a JWT assertion signed with
//! the account's RSA key is exchanged for a short-lived access token, which is cached until
//! shortly before it expires. A static token can be supplied instead for local runs and tests.

use std::time::{Duration, Instant};

use chrono::Utc;
use jsonwebtoken::{Algorithm, EncodingKey, Header};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

use crate::server::error::sheets::SheetsError;

pub const DEFAULT_TOKEN_URL: &str = "https://oauth2.googleapis.com/token";

const SPREADSHEETS_SCOPE: &str = "https://www.googleapis.com/auth/spreadsheets";
const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";
const ASSERTION_LIFETIME_SECS: i64 = 3600;
/// Tokens this close to expiry are refreshed early.
const REFRESH_MARGIN: Duration = Duration::from_secs(60);

/// Service account identity used to mint access tokens.
#[derive(Clone)]
pub struct ServiceAccountKey {
    pub client_email: String,
    /// PEM-encoded RSA private key.
    pub private_key: String,
    pub token_url: String,
}

#[derive(Clone)]
pub enum SheetsCredentials {
    /// Pre-issued bearer token, used as is.
    AccessToken(String),
    ServiceAccount(ServiceAccountKey),
}

#[derive(Serialize)]
struct AssertionClaims<'a> {
    iss: &'a str,
    scope: &'a str,
    aud: &'a str,
    iat: i64,
    exp: i64,
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default = "default_expires_in")]
    expires_in: u64,
}

fn default_expires_in() -> u64 {
    ASSERTION_LIFETIME_SECS as u64
}

struct CachedToken {
    access_token: String,
    expires_at: Instant,
}

/// Hands out a valid access token, minting a new one when the cached token is near expiry.
pub struct TokenProvider {
    credentials: SheetsCredentials,
    cached: RwLock<Option<CachedToken>>,
}

impl TokenProvider {
    pub fn new(credentials: SheetsCredentials) -> Self {
        Self {
            credentials,
            cached: RwLock::new(None),
        }
    }

    pub async fn access_token(&self, client: &reqwest::Client) -> Result<String, SheetsError> {
        let key = match &self.credentials {
            SheetsCredentials::AccessToken(token) => return Ok(token.clone()),
            SheetsCredentials::ServiceAccount(key) => key,
        };

        {
            let cached = self.cached.read().await;
            if let Some(token) = cached.as_ref() {
                if token.expires_at > Instant::now() + REFRESH_MARGIN {
                    return Ok(token.access_token.clone());
                }
            }
        }

        let mut cached = self.cached.write().await;
        // Another request may have refreshed while we waited for the write lock
        if let Some(token) = cached.as_ref() {
            if token.expires_at > Instant::now() + REFRESH_MARGIN {
                return Ok(token.access_token.clone());
            }
        }

        tracing::debug!("Requesting Google access token for {}", key.client_email);

        let assertion = sign_assertion(key)?;
        let response = client
            .post(&key.token_url)
            .form(&[("grant_type", JWT_BEARER_GRANT), ("assertion", assertion.as_str())])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SheetsError::Status { status, body });
        }

        let token: TokenResponse = response.json().await?;
        let access_token = token.access_token.clone();

        *cached = Some(CachedToken {
            access_token: token.access_token,
            expires_at: expiry_from(Instant::now(), token.expires_in),
        });

        Ok(access_token)
    }
}

/// Expiry for a token granted `expires_in` seconds from `now`, capped at the assertion lifetime
/// when the reported value does not fit an `Instant`.
fn expiry_from(now: Instant, expires_in: u64) -> Instant {
    let fallback = Duration::from_secs(ASSERTION_LIFETIME_SECS as u64);

    now.checked_add(Duration::from_secs(expires_in))
        .or_else(|| now.checked_add(fallback))
        .unwrap_or(now)
}

/// Builds the RS256-signed JWT assertion exchanged for an access token.
pub fn sign_assertion(key: &ServiceAccountKey) -> Result<String, SheetsError> {
    let iat = Utc::now().timestamp();
    let claims = AssertionClaims {
        iss: &key.client_email,
        scope: SPREADSHEETS_SCOPE,
        aud: &key.token_url,
        iat,
        exp: iat + ASSERTION_LIFETIME_SECS,
    };

    let encoding_key = EncodingKey::from_rsa_pem(key.private_key.as_bytes())?;
    let token = jsonwebtoken::encode(&Header::new(Algorithm::RS256), &claims, &encoding_key)?;

    Ok(token)
}
