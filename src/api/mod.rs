//! Webhook plumbing: the HTTP surface that feeds updates to the dispatcher.

mod update;

pub use self::update::Update;

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use tower_http::trace::TraceLayer;

use crate::bot::gateway::Gateway;
use crate::bot::Dispatcher;

pub struct AppState<G> {
    dispatcher: Arc<Dispatcher<G>>,
    webhook_token: String,
}

impl<G> Clone for AppState<G> {
    fn clone(&self) -> Self {
        Self {
            dispatcher: self.dispatcher.clone(),
            webhook_token: self.webhook_token.clone(),
        }
    }
}

pub fn create_router<G>(dispatcher: Arc<Dispatcher<G>>, webhook_token: impl Into<String>) -> Router
where
    G: Gateway + 'static,
{
    Router::new()
        .route("/", get(index))
        .route("/health", get(health))
        .route("/webhook/{token}", post(webhook::<G>))
        .layer(TraceLayer::new_for_http())
        .with_state(AppState {
            dispatcher,
            webhook_token: webhook_token.into(),
        })
}

async fn index() -> &'static str {
    "depot bot is running"
}

async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

/// The transport retries any non-2xx delivery, so a payload that fails to
/// parse is acknowledged and dropped; only a wrong token is refused.
async fn webhook<G: Gateway>(
    State(state): State<AppState<G>>,
    Path(token): Path<String>,
    body: Bytes,
) -> StatusCode {
    if token != state.webhook_token {
        return StatusCode::NOT_FOUND;
    }

    let update: Update = match serde_json::from_slice(&body) {
        Ok(update) => update,
        Err(e) => {
            tracing::warn!("discarding malformed update: {e}");
            return StatusCode::OK;
        }
    };

    if let Some(event) = update.into_event() {
        state.dispatcher.dispatch(event).await;
    }
    StatusCode::OK
}
