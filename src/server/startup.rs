use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use crate::server::{
    config::Config,
    error::Error,
    model::app::AppState,
    nexon::NexonClient,
    sheets::{OcidCache, SheetsClient},
};

/// Install the global tracing subscriber, honouring `RUST_LOG` and defaulting to `info`
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt().with_env_filter(filter).init();
}

/// Build the Nexon OpenAPI client with the configured key
pub fn build_nexon_client(config: &Config) -> Result<NexonClient, Error> {
    let client = NexonClient::new(&config.nexon_api_url, &config.nexon_api_key)?;

    Ok(client)
}

/// Build the Google Sheets client for the configured spreadsheet
pub fn build_sheets_client(config: &Config) -> Result<SheetsClient, Error> {
    let client = SheetsClient::new(
        &config.sheets_api_url,
        &config.spreadsheet_id,
        config.sheets_credentials.clone(),
    )?;

    Ok(client)
}

/// Wire the production collaborators into the shared application state
pub fn build_app_state(config: &Config) -> Result<AppState, Error> {
    Ok(AppState {
        store: Arc::new(build_sheets_client(config)?),
        game_api: Arc::new(build_nexon_client(config)?),
        ocid_cache: Arc::new(OcidCache::new(config.ocid_cache_ttl)),
        cron_secret: Arc::from(config.cron_secret.as_str()),
    })
}
