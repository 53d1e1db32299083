//! HTTP surface of the sender (Axum router + handlers).
//!
//! Deliberately thin: validation happens before anything touches the
//! pipeline, and every pipeline error maps to one JSON error response. The
//! router is built from injected trait objects so tests run it against the
//! in-memory transport.

use std::sync::Arc;

use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Extension, Json, Router};
use serde::Deserialize;
use serde_json::json;
use tracing::warn;

use courier_core::{InstanceIdentity, Payload, ServiceStats};
use courier_infra::SessionStore;
use courier_pipeline::{ActivityLog, Producer, SubmitError};

/// How many recent records the status view shows.
const RECENT_LIMIT: u32 = 20;

pub struct AppState {
    pub producer: Producer,
    pub log: Arc<dyn ActivityLog>,
    /// Absent in tests; the status view then reports zero sessions.
    pub sessions: Option<SessionStore>,
    pub identity: InstanceIdentity,
    pub stats: Arc<ServiceStats>,
}

/// Build the full sender router (public entrypoint used by `main.rs` and
/// the black-box tests).
pub fn build_app(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/status", get(status))
        .route("/messages", post(submit))
        .layer(Extension(state))
}

async fn health() -> StatusCode {
    StatusCode::OK
}

async fn status(Extension(state): Extension<Arc<AppState>>) -> axum::response::Response {
    let recent = match state.log.recent(RECENT_LIMIT).await {
        Ok(rows) => rows,
        Err(err) => {
            return json_error(StatusCode::INTERNAL_SERVER_ERROR, "store_error", err.to_string());
        }
    };

    let active_sessions = match &state.sessions {
        Some(store) => store.active_sessions().await.unwrap_or_else(|err| {
            warn!(%err, "failed to count active sessions");
            0
        }),
        None => 0,
    };

    Json(json!({
        "node": { "name": state.identity.name(), "color": state.identity.color() },
        "sent_count": state.stats.handled_count(),
        "last_sent_at": state.stats.last_handled_at().map(|t| t.to_rfc3339()),
        "active_sessions": active_sessions,
        "recent": recent,
    }))
    .into_response()
}

#[derive(Debug, Deserialize)]
struct SubmitRequest {
    message: String,
}

async fn submit(
    Extension(state): Extension<Arc<AppState>>,
    Json(body): Json<SubmitRequest>,
) -> axum::response::Response {
    // Reject empty submissions before any persistence or publish happens.
    let payload = match Payload::parse(&body.message) {
        Ok(payload) => payload,
        Err(err) => {
            warn!("submission did not contain a message");
            return json_error(StatusCode::UNPROCESSABLE_ENTITY, "empty_message", err.to_string());
        }
    };

    match state.producer.submit(&payload).await {
        Ok(id) => (StatusCode::CREATED, Json(json!({ "id": id }))).into_response(),
        Err(err @ SubmitError::Persistence(_)) => {
            json_error(StatusCode::INTERNAL_SERVER_ERROR, "store_error", err.to_string())
        }
        Err(err @ SubmitError::Publish(_)) => {
            json_error(StatusCode::BAD_GATEWAY, "publish_error", err.to_string())
        }
    }
}

fn json_error(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
) -> axum::response::Response {
    (
        status,
        Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}
