use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use serde::Deserialize;
use serde_json::json;

use super::catalog::CareersCatalog;
use super::domain::{JobId, LocationCountry};
use crate::error::GENERIC_FAILURE_MESSAGE;
use crate::store::JobStore;

#[derive(Debug, Default, Deserialize)]
pub struct JobListQuery {
    #[serde(default)]
    pub country: Option<String>,
}

/// Router builder exposing the public job board.
pub fn careers_router<S>(catalog: Arc<CareersCatalog<S>>) -> Router
where
    S: JobStore + 'static,
{
    Router::new()
        .route("/api/v1/careers/jobs", get(list_handler::<S>))
        .route("/api/v1/careers/jobs/:job_id", get(detail_handler::<S>))
        .with_state(catalog)
}

fn country_filter(raw: Option<&str>) -> Result<Option<LocationCountry>, String> {
    match raw.map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) if value.eq_ignore_ascii_case("all") => Ok(None),
        Some(value) => LocationCountry::parse(value)
            .map(Some)
            .ok_or_else(|| format!("unknown country '{value}'")),
    }
}

pub(crate) async fn list_handler<S>(
    State(catalog): State<Arc<CareersCatalog<S>>>,
    Query(query): Query<JobListQuery>,
) -> Response
where
    S: JobStore + 'static,
{
    let country = match country_filter(query.country.as_deref()) {
        Ok(country) => country,
        Err(message) => {
            let payload = json!({ "error": message });
            return (StatusCode::BAD_REQUEST, axum::Json(payload)).into_response();
        }
    };

    match catalog.active_jobs(country) {
        Ok(jobs) => (StatusCode::OK, axum::Json(jobs)).into_response(),
        Err(error) => {
            tracing::error!(error = %error, "job listing failed");
            let payload = json!({ "error": GENERIC_FAILURE_MESSAGE });
            (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
        }
    }
}

pub(crate) async fn detail_handler<S>(
    State(catalog): State<Arc<CareersCatalog<S>>>,
    Path(job_id): Path<String>,
) -> Response
where
    S: JobStore + 'static,
{
    match catalog.job(&JobId(job_id)) {
        Ok(Some(job)) => (StatusCode::OK, axum::Json(job)).into_response(),
        Ok(None) => {
            let payload = json!({ "error": "job not found" });
            (StatusCode::NOT_FOUND, axum::Json(payload)).into_response()
        }
        Err(error) => {
            tracing::error!(error = %error, "job lookup failed");
            let payload = json!({ "error": GENERIC_FAILURE_MESSAGE });
            (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::careers::domain::JobDraft;
    use crate::store::InMemoryStore;
    use axum::body::Body;
    use axum::http::Request;
    use tower::ServiceExt;

    fn router() -> Router {
        let store = Arc::new(InMemoryStore::new());
        store
            .insert_job_with_id(
                JobId("7".to_string()),
                JobDraft {
                    title: "Cloud Architect".to_string(),
                    department: "Cloud".to_string(),
                    location: "Austin, TX".to_string(),
                    location_country: LocationCountry::Usa,
                    employment_type: "Full-time".to_string(),
                    description: "Design platforms".to_string(),
                    full_description: None,
                    requirements: Vec::new(),
                    responsibilities: Vec::new(),
                    salary_range: None,
                    is_active: true,
                },
            )
            .expect("seeded");
        careers_router(Arc::new(CareersCatalog::new(store)))
    }

    #[test]
    fn country_filter_accepts_all_and_blank() {
        assert_eq!(country_filter(None), Ok(None));
        assert_eq!(country_filter(Some("All")), Ok(None));
        assert_eq!(country_filter(Some("usa")), Ok(Some(LocationCountry::Usa)));
        assert!(country_filter(Some("mars")).is_err());
    }

    #[tokio::test]
    async fn list_route_filters_by_country() {
        let response = router()
            .oneshot(
                Request::get("/api/v1/careers/jobs?country=india")
                    .body(Body::empty())
                    .expect("request builds"),
            )
            .await
            .expect("route executes");
        assert_eq!(response.status(), StatusCode::OK);
        let body = axum::body::to_bytes(response.into_body(), 16 * 1024)
            .await
            .expect("read body");
        let jobs: serde_json::Value = serde_json::from_slice(&body).expect("json payload");
        assert_eq!(jobs, json!([]));
    }

    #[tokio::test]
    async fn detail_route_returns_not_found_for_unknown_ids() {
        let response = router()
            .oneshot(
                Request::get("/api/v1/careers/jobs/99")
                    .body(Body::empty())
                    .expect("request builds"),
            )
            .await
            .expect("route executes");
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
