//! REST client for the Nexon MapleStory OpenAPI.

use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;

use super::{
    model::{CharacterBasic, CharacterId, CharacterStat},
    GameApi,
};
use crate::server::error::nexon::NexonError;

pub const DEFAULT_NEXON_API_URL: &str = "https://open.api.nexon.com/maplestory/v1";

const API_KEY_HEADER: &str = "x-nxopen-api-key";

/// Per-request timeout; an attempt that exceeds it is retried like any transient failure.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

/// HTTP client for the Nexon OpenAPI.
#[derive(Clone)]
pub struct NexonClient {
    client: reqwest::Client,
    api_url: String,
    api_key: String,
}

impl NexonClient {
    /// Create a client with its own connection pool.
    ///
    /// * `api_url` - Base URL without trailing slash, e.g. [`DEFAULT_NEXON_API_URL`].
    pub fn new(api_url: impl Into<String>, api_key: impl Into<String>) -> Result<Self, NexonError> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .user_agent(concat!("maplerank/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self::with_client(client, api_url, api_key))
    }

    /// Create a client reusing an existing [`reqwest::Client`].
    pub fn with_client(
        client: reqwest::Client,
        api_url: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Self {
        Self {
            client,
            api_url: api_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        }
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<T, NexonError> {
        let response = self
            .client
            .get(format!("{}{}", self.api_url, path))
            .header(API_KEY_HEADER, &self.api_key)
            .query(query)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(NexonError::Status { status, body });
        }

        Ok(response.json::<T>().await?)
    }
}

#[async_trait]
impl GameApi for NexonClient {
    async fn get_character_stats(&self, ocid: &str) -> Result<CharacterStat, NexonError> {
        self.get_json("/character/stat", &[("ocid", ocid)]).await
    }

    async fn get_character_basic_info(&self, ocid: &str) -> Result<CharacterBasic, NexonError> {
        self.get_json("/character/basic", &[("ocid", ocid)]).await
    }

    async fn get_ocid(&self, character_name: &str) -> Result<String, NexonError> {
        let id: CharacterId = self
            .get_json("/id", &[("character_name", character_name)])
            .await?;

        Ok(id.ocid)
    }
}
