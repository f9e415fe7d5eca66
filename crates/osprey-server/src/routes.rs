use crate::audit::Auditor;
use crate::error::AuditError;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use tower_http::cors::CorsLayer;

/// Body of `POST /api/audit`.
#[derive(Debug, Deserialize)]
pub struct AuditRequest {
    /// An absent url falls through to input validation as an empty
    /// string, taking the same 400 path as a malformed one.
    #[serde(default)]
    pub url: String,
}

pub fn router(auditor: Arc<Auditor>) -> Router {
    Router::new()
        .route("/api/audit", post(audit))
        .route("/healthz", get(|| async { "ok" }))
        .layer(CorsLayer::permissive())
        .with_state(auditor)
}

async fn audit(State(auditor): State<Arc<Auditor>>, Json(request): Json<AuditRequest>) -> Response {
    tracing::info!(url = %request.url, "Received audit request");

    match auditor.run_audit(&request.url).await {
        Ok(report) => (StatusCode::OK, Json(report)).into_response(),
        Err(e) => error_response(&e),
    }
}

/// The caller only ever sees the two fixed error bodies; which internal
/// stage failed is logged, not surfaced.
fn error_response(error: &AuditError) -> Response {
    match error {
        AuditError::InvalidInput => (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "A valid URL is required." })),
        )
            .into_response(),
        AuditError::BrowserLaunch(e) => {
            tracing::error!(error = %e, "Audit failed during browser launch");
            internal_error()
        }
        AuditError::ScanExecution(e) => {
            tracing::error!(error = %e, "Audit failed during scan execution");
            internal_error()
        }
    }
}

fn internal_error() -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({
            "error": "Failed to complete the audit. The URL may be invalid or the server is down."
        })),
    )
        .into_response()
}
