mod character;
mod leaderboard;

use std::{sync::Arc, time::Duration};

use axum::{
    body::{to_bytes, Body},
    http::{Request, Response, StatusCode},
    Router,
};
use maplerank::server::{model::app::AppState, router, sheets::OcidCache};
use maplerank_test_utils::prelude::*;
use serde_json::Value;
use tower::ServiceExt;

pub const CRON_SECRET: &str = "cron-secret";

/// Router over the in-memory store and the scripted game API.
fn app(store: Arc<MemoryTableStore>, game_api: FakeGameApi) -> Router {
    router::routes().with_state(AppState {
        store,
        game_api: Arc::new(game_api),
        ocid_cache: Arc::new(OcidCache::new(Duration::from_secs(300))),
        cron_secret: Arc::from(CRON_SECRET),
    })
}

async fn get(app: Router, uri: &str, bearer: Option<&str>) -> Response<Body> {
    let mut request = Request::builder().method("GET").uri(uri);
    if let Some(token) = bearer {
        request = request.header("authorization", format!("Bearer {}", token));
    }
    let request = request.body(Body::empty()).expect("valid request");

    app.oneshot(request).await.expect("infallible router")
}

async fn json_body(response: Response<Body>) -> Result<Value, TestError> {
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("readable body");

    Ok(serde_json::from_slice(&bytes)?)
}
