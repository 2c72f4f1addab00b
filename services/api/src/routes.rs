use crate::infra::{AppState, SiteServices};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Extension;
use axum::Json;
use serde_json::json;
use strategix::admin::{admin_auth_router, admin_router, AdminState, RefreshHandle};
use strategix::careers::applications::intake_router;
use strategix::careers::careers_router;
use strategix::contact::contact_router;
use strategix::insights::insights_router;

/// Public site, admin surface, and operational probes in one router.
pub(crate) fn with_site_routes(services: &SiteServices, refresh: RefreshHandle) -> axum::Router {
    let admin_state = AdminState {
        service: services.admin.clone(),
        refresh,
    };

    careers_router(services.careers.clone())
        .merge(intake_router(services.intake.clone()))
        .merge(insights_router(services.insights.clone()))
        .merge(contact_router(services.contact.clone()))
        .merge(admin_auth_router(services.authenticator.clone()))
        .merge(admin_router(admin_state, services.authenticator.clone()))
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
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
