use std::sync::Arc;

use axum::{
    extract::{Path, Query, Request, State},
    http::{header, HeaderMap, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Router,
};
use serde::Deserialize;
use serde_json::json;

use super::auth::{AdminAuthError, AdminAuthenticator, AdminCredentials};
use super::filters::{ApplicationFilters, ArticleFilters, JobFilters};
use super::refresh::{AdminTab, RefreshHandle};
use super::service::{AdminError, AdminService};
use crate::careers::applications::{ApplicationId, ApplicationStatus};
use crate::careers::domain::{JobDraft, JobId};
use crate::error::GENERIC_FAILURE_MESSAGE;
use crate::insights::domain::{ArticleDraft, ArticleId};
use crate::store::{ApplicationStore, ArticleStore, JobStore, StoreError};

pub const ADMIN_USERNAME_HEADER: &str = "x-admin-username";
pub const ADMIN_PASSWORD_HEADER: &str = "x-admin-password";

/// Shared state for the admin data routes.
pub struct AdminState<S> {
    pub service: Arc<AdminService<S>>,
    pub refresh: RefreshHandle,
}

impl<S> Clone for AdminState<S> {
    fn clone(&self) -> Self {
        Self {
            service: self.service.clone(),
            refresh: self.refresh.clone(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct StatusUpdate {
    pub status: ApplicationStatus,
}

#[derive(Debug, Default, Deserialize)]
pub struct RefreshQuery {
    #[serde(default)]
    pub tab: Option<AdminTab>,
}

/// Login check used by the admin UI before it stores the credential pair.
pub fn admin_auth_router(authenticator: Arc<AdminAuthenticator>) -> Router {
    Router::new()
        .route("/api/admin/auth", post(login_handler))
        .with_state(authenticator)
}

pub(crate) async fn login_handler(
    State(authenticator): State<Arc<AdminAuthenticator>>,
    axum::Json(credentials): axum::Json<AdminCredentials>,
) -> Response {
    match authenticator.verify(&credentials.username, &credentials.password) {
        Ok(()) => (StatusCode::OK, axum::Json(json!({ "success": true }))).into_response(),
        Err(error) => auth_failure(error),
    }
}

fn auth_failure(error: AdminAuthError) -> Response {
    let status = match error {
        AdminAuthError::NotConfigured => {
            tracing::error!("admin credentials are not configured");
            StatusCode::INTERNAL_SERVER_ERROR
        }
        AdminAuthError::InvalidCredentials => StatusCode::UNAUTHORIZED,
    };
    let payload = json!({ "success": false, "error": error.to_string() });
    (status, axum::Json(payload)).into_response()
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> &'a str {
    headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default()
}

pub(crate) async fn require_admin(
    State(authenticator): State<Arc<AdminAuthenticator>>,
    request: Request,
    next: Next,
) -> Response {
    let headers = request.headers();
    let verdict = authenticator.verify(
        header_str(headers, ADMIN_USERNAME_HEADER),
        header_str(headers, ADMIN_PASSWORD_HEADER),
    );
    match verdict {
        Ok(()) => next.run(request).await,
        Err(error) => auth_failure(error),
    }
}

/// Router builder for the admin dashboard API. Every route requires the admin header pair.
pub fn admin_router<S>(
    state: AdminState<S>,
    authenticator: Arc<AdminAuthenticator>,
) -> Router
where
    S: JobStore + ApplicationStore + ArticleStore + 'static,
{
    Router::new()
        .route("/api/v1/admin/dashboard", get(dashboard_handler::<S>))
        .route(
            "/api/v1/admin/jobs",
            get(list_jobs_handler::<S>).post(create_job_handler::<S>),
        )
        .route(
            "/api/v1/admin/jobs/:job_id",
            put(update_job_handler::<S>).delete(delete_job_handler::<S>),
        )
        .route(
            "/api/v1/admin/jobs/:job_id/toggle-active",
            post(toggle_job_handler::<S>),
        )
        .route(
            "/api/v1/admin/applications",
            get(list_applications_handler::<S>),
        )
        .route(
            "/api/v1/admin/applications/:application_id/status",
            put(application_status_handler::<S>),
        )
        .route(
            "/api/v1/admin/exports/applications.csv",
            get(export_applications_handler::<S>),
        )
        .route(
            "/api/v1/admin/articles",
            get(list_articles_handler::<S>).post(create_article_handler::<S>),
        )
        .route(
            "/api/v1/admin/articles/:article_id",
            put(update_article_handler::<S>).delete(delete_article_handler::<S>),
        )
        .route(
            "/api/v1/admin/articles/:article_id/toggle-published",
            post(toggle_published_handler::<S>),
        )
        .route(
            "/api/v1/admin/articles/:article_id/toggle-featured",
            post(toggle_featured_handler::<S>),
        )
        .route("/api/v1/admin/snapshot", get(snapshot_handler::<S>))
        .route("/api/v1/admin/refresh", post(refresh_handler::<S>))
        .route_layer(middleware::from_fn_with_state(authenticator, require_admin))
        .with_state(state)
}

pub(crate) fn admin_error_response(error: AdminError) -> Response {
    match error {
        AdminError::NotFound(_) => {
            let payload = json!({ "error": error.to_string() });
            (StatusCode::NOT_FOUND, axum::Json(payload)).into_response()
        }
        AdminError::Store(StoreError::Conflict(ref message)) => {
            let payload = json!({ "error": message });
            (StatusCode::CONFLICT, axum::Json(payload)).into_response()
        }
        AdminError::Store(_) | AdminError::Export(_) => {
            tracing::error!(error = %error, "admin request failed");
            let payload = json!({ "error": GENERIC_FAILURE_MESSAGE });
            (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
        }
    }
}

fn respond<T: serde::Serialize>(status: StatusCode, result: Result<T, AdminError>) -> Response {
    match result {
        Ok(body) => (status, axum::Json(body)).into_response(),
        Err(error) => admin_error_response(error),
    }
}

pub(crate) async fn dashboard_handler<S>(State(state): State<AdminState<S>>) -> Response
where
    S: JobStore + ApplicationStore + ArticleStore + 'static,
{
    respond(StatusCode::OK, state.service.dashboard())
}

pub(crate) async fn list_jobs_handler<S>(
    State(state): State<AdminState<S>>,
    Query(filters): Query<JobFilters>,
) -> Response
where
    S: JobStore + ApplicationStore + ArticleStore + 'static,
{
    respond(StatusCode::OK, state.service.list_jobs(filters))
}

pub(crate) async fn create_job_handler<S>(
    State(state): State<AdminState<S>>,
    axum::Json(draft): axum::Json<JobDraft>,
) -> Response
where
    S: JobStore + ApplicationStore + ArticleStore + 'static,
{
    respond(StatusCode::CREATED, state.service.create_job(draft))
}

pub(crate) async fn update_job_handler<S>(
    State(state): State<AdminState<S>>,
    Path(job_id): Path<String>,
    axum::Json(draft): axum::Json<JobDraft>,
) -> Response
where
    S: JobStore + ApplicationStore + ArticleStore + 'static,
{
    respond(StatusCode::OK, state.service.update_job(&JobId(job_id), draft))
}

pub(crate) async fn delete_job_handler<S>(
    State(state): State<AdminState<S>>,
    Path(job_id): Path<String>,
) -> Response
where
    S: JobStore + ApplicationStore + ArticleStore + 'static,
{
    match state.service.delete_job(&JobId(job_id)) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(error) => admin_error_response(error),
    }
}

pub(crate) async fn toggle_job_handler<S>(
    State(state): State<AdminState<S>>,
    Path(job_id): Path<String>,
) -> Response
where
    S: JobStore + ApplicationStore + ArticleStore + 'static,
{
    respond(StatusCode::OK, state.service.toggle_job_active(&JobId(job_id)))
}

pub(crate) async fn list_applications_handler<S>(
    State(state): State<AdminState<S>>,
    Query(filters): Query<ApplicationFilters>,
) -> Response
where
    S: JobStore + ApplicationStore + ArticleStore + 'static,
{
    respond(StatusCode::OK, state.service.list_applications(filters))
}

pub(crate) async fn application_status_handler<S>(
    State(state): State<AdminState<S>>,
    Path(application_id): Path<String>,
    axum::Json(update): axum::Json<StatusUpdate>,
) -> Response
where
    S: JobStore + ApplicationStore + ArticleStore + 'static,
{
    respond(
        StatusCode::OK,
        state
            .service
            .update_application_status(&ApplicationId(application_id), update.status),
    )
}

pub(crate) async fn export_applications_handler<S>(
    State(state): State<AdminState<S>>,
    Query(filters): Query<ApplicationFilters>,
) -> Response
where
    S: JobStore + ApplicationStore + ArticleStore + 'static,
{
    match state.service.export_applications_csv(filters) {
        Ok(csv) => (
            StatusCode::OK,
            [
                (header::CONTENT_TYPE, "text/csv; charset=utf-8"),
                (
                    header::CONTENT_DISPOSITION,
                    "attachment; filename=\"applications.csv\"",
                ),
            ],
            csv,
        )
            .into_response(),
        Err(error) => admin_error_response(error),
    }
}

pub(crate) async fn list_articles_handler<S>(
    State(state): State<AdminState<S>>,
    Query(filters): Query<ArticleFilters>,
) -> Response
where
    S: JobStore + ApplicationStore + ArticleStore + 'static,
{
    respond(StatusCode::OK, state.service.list_articles(filters))
}

pub(crate) async fn create_article_handler<S>(
    State(state): State<AdminState<S>>,
    axum::Json(draft): axum::Json<ArticleDraft>,
) -> Response
where
    S: JobStore + ApplicationStore + ArticleStore + 'static,
{
    respond(StatusCode::CREATED, state.service.create_article(draft))
}

pub(crate) async fn update_article_handler<S>(
    State(state): State<AdminState<S>>,
    Path(article_id): Path<String>,
    axum::Json(draft): axum::Json<ArticleDraft>,
) -> Response
where
    S: JobStore + ApplicationStore + ArticleStore + 'static,
{
    respond(
        StatusCode::OK,
        state.service.update_article(&ArticleId(article_id), draft),
    )
}

pub(crate) async fn delete_article_handler<S>(
    State(state): State<AdminState<S>>,
    Path(article_id): Path<String>,
) -> Response
where
    S: JobStore + ApplicationStore + ArticleStore + 'static,
{
    match state.service.delete_article(&ArticleId(article_id)) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(error) => admin_error_response(error),
    }
}

pub(crate) async fn toggle_published_handler<S>(
    State(state): State<AdminState<S>>,
    Path(article_id): Path<String>,
) -> Response
where
    S: JobStore + ApplicationStore + ArticleStore + 'static,
{
    respond(
        StatusCode::OK,
        state.service.toggle_article_published(&ArticleId(article_id)),
    )
}

pub(crate) async fn toggle_featured_handler<S>(
    State(state): State<AdminState<S>>,
    Path(article_id): Path<String>,
) -> Response
where
    S: JobStore + ApplicationStore + ArticleStore + 'static,
{
    respond(
        StatusCode::OK,
        state.service.toggle_article_featured(&ArticleId(article_id)),
    )
}

pub(crate) async fn snapshot_handler<S>(State(state): State<AdminState<S>>) -> Response
where
    S: JobStore + ApplicationStore + ArticleStore + 'static,
{
    (StatusCode::OK, axum::Json(state.refresh.snapshot())).into_response()
}

pub(crate) async fn refresh_handler<S>(
    State(state): State<AdminState<S>>,
    Query(query): Query<RefreshQuery>,
) -> Response
where
    S: JobStore + ApplicationStore + ArticleStore + 'static,
{
    let queued = match query.tab {
        Some(tab) => state.refresh.switch_tab(tab).await,
        None => state.refresh.refresh_now().await,
    };
    match queued {
        Ok(()) => (StatusCode::ACCEPTED, axum::Json(json!({ "queued": true }))).into_response(),
        Err(error) => {
            tracing::error!(error = %error, "admin refresh request dropped");
            let payload = json!({ "error": GENERIC_FAILURE_MESSAGE });
            (StatusCode::SERVICE_UNAVAILABLE, axum::Json(payload)).into_response()
        }
    }
}
