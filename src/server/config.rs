use std::{env, net::SocketAddr, time::Duration};

use crate::server::{
    error::config::ConfigError,
    nexon::client::DEFAULT_NEXON_API_URL,
    sheets::{
        auth::{ServiceAccountKey, SheetsCredentials, DEFAULT_TOKEN_URL},
        cache::DEFAULT_OCID_CACHE_TTL,
        client::DEFAULT_SHEETS_API_URL,
    },
};

const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0:8080";

pub struct Config {
    pub cron_secret: String,
    pub nexon_api_key: String,
    pub nexon_api_url: String,
    pub spreadsheet_id: String,
    pub sheets_api_url: String,
    pub sheets_credentials: SheetsCredentials,
    /// Cron expression for the in-process refresh job; unset disables it.
    pub refresh_cron: Option<String>,
    pub bind_address: SocketAddr,
    pub ocid_cache_ttl: Duration,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| env::var(var).ok())
    }

    /// Builds the configuration from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |var: &str| {
            lookup(var)
                .filter(|value| !value.trim().is_empty())
                .ok_or_else(|| ConfigError::MissingEnvVar(var.to_string()))
        };
        let optional = |var: &str| lookup(var).filter(|value| !value.trim().is_empty());

        let bind_address = optional("BIND_ADDRESS")
            .unwrap_or_else(|| DEFAULT_BIND_ADDRESS.to_string())
            .parse::<SocketAddr>()
            .map_err(|e| ConfigError::InvalidEnvValue {
                var: "BIND_ADDRESS".to_string(),
                reason: e.to_string(),
            })?;

        let ocid_cache_ttl = match optional("OCID_CACHE_TTL_SECS") {
            Some(value) => Duration::from_secs(value.trim().parse::<u64>().map_err(|e| {
                ConfigError::InvalidEnvValue {
                    var: "OCID_CACHE_TTL_SECS".to_string(),
                    reason: e.to_string(),
                }
            })?),
            None => DEFAULT_OCID_CACHE_TTL,
        };

        let sheets_credentials = match (
            optional("GOOGLE_SERVICE_ACCOUNT_EMAIL"),
            optional("GOOGLE_PRIVATE_KEY"),
            optional("GOOGLE_SHEETS_ACCESS_TOKEN"),
        ) {
            (Some(client_email), Some(private_key), _) => {
                SheetsCredentials::ServiceAccount(ServiceAccountKey {
                    client_email,
                    // Keys pasted into env files keep their newlines escaped
                    private_key: private_key.replace("\\n", "\n"),
                    token_url: optional("GOOGLE_TOKEN_URL")
                        .unwrap_or_else(|| DEFAULT_TOKEN_URL.to_string()),
                })
            }
            (_, _, Some(token)) => SheetsCredentials::AccessToken(token),
            _ => return Err(ConfigError::MissingSheetsCredentials),
        };

        Ok(Self {
            cron_secret: required("CRON_SECRET")?,
            nexon_api_key: required("NEXON_API_KEY")?,
            nexon_api_url: optional("NEXON_API_URL")
                .unwrap_or_else(|| DEFAULT_NEXON_API_URL.to_string()),
            spreadsheet_id: required("GOOGLE_SHEETS_SPREADSHEET_ID")?,
            sheets_api_url: optional("GOOGLE_SHEETS_API_URL")
                .unwrap_or_else(|| DEFAULT_SHEETS_API_URL.to_string()),
            sheets_credentials,
            refresh_cron: optional("REFRESH_CRON"),
            bind_address,
            ocid_cache_ttl,
        })
    }
}
