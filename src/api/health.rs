//! Liveness plus feed readiness.
//!
//! - GET /api/health - `ok` once breakdowns and lanterns have both loaded,
//!   `starting` before that

use crate::services::FeedStatus;
use crate::types::OperatorRights;
use crate::AppState;
use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub operator_rights: OperatorRights,
    pub feeds: FeedStatus,
    pub poll_interval_secs: u64,
    pub unread_count: usize,
}

async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let feeds = state.center.feed_status().await;

    Json(HealthResponse {
        status: if feeds.incidents_ready() { "ok" } else { "starting" },
        version: env!("CARGO_PKG_VERSION"),
        operator_rights: state.center.rights(),
        feeds,
        poll_interval_secs: state.config.poll_interval.as_secs(),
        unread_count: state.center.unread_count().await,
    })
}

pub fn router() -> Router<AppState> {
    Router::new().route("/api/health", get(health))
}
