//! HTTP surface of the receiver (Axum router + handlers).
//!
//! Read-only: the receiver takes its work from the queue, not from HTTP.
//! The one substantive route is the recent-activity view.

use std::sync::Arc;

use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Extension, Json, Router};
use serde_json::json;
use tracing::warn;

use courier_core::{InstanceIdentity, ServiceStats};
use courier_infra::SessionStore;
use courier_pipeline::ActivityLog;

/// How many recent records the activity view shows.
const RECENT_LIMIT: u32 = 20;

pub struct AppState {
    pub log: Arc<dyn ActivityLog>,
    /// Absent in tests; the view then reports zero sessions.
    pub sessions: Option<SessionStore>,
    pub identity: InstanceIdentity,
    pub stats: Arc<ServiceStats>,
}

/// Build the full receiver router (public entrypoint used by `main.rs` and
/// the black-box tests).
pub fn build_app(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/received", get(received))
        .layer(Extension(state))
}

async fn health() -> StatusCode {
    StatusCode::OK
}

async fn received(Extension(state): Extension<Arc<AppState>>) -> axum::response::Response {
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
        "processed_count": state.stats.handled_count(),
        "last_processed_at": state.stats.last_handled_at().map(|t| t.to_rfc3339()),
        "active_sessions": active_sessions,
        "recent": recent,
    }))
    .into_response()
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
