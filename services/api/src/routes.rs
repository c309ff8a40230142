use crate::infra::{cors_layer, security_headers, AppState};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Extension, Json, Router};
use serde_json::json;
use std::sync::Arc;
use underwriter::workflows::underwriting::{underwriting_router, AdvisoryModel, UnderwritingService};

/// Loan routes plus operational endpoints, wrapped in CORS and security headers.
pub(crate) fn build_app<M>(
    service: Arc<UnderwritingService<M>>,
    state: AppState,
    cors_origins: &[String],
) -> Router
where
    M: AdvisoryModel + 'static,
{
    let mut app = underwriting_router(service)
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
        .layer(Extension(state))
        .layer(cors_layer(cors_origins));

    for layer in security_headers() {
        app = app.layer(layer);
    }
    app
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "healthy", "message": "API is running" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}
