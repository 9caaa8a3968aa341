use std::sync::Arc;

use crate::server::{nexon::GameApi, sheets::cache::OcidCache, sheets::TableStore};

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn TableStore>,
    pub game_api: Arc<dyn GameApi>,
    pub ocid_cache: Arc<OcidCache>,
    /// Bearer token expected on cron requests.
    pub cron_secret: Arc<str>,
}
