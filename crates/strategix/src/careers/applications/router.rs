use std::convert::Infallible;
use std::sync::Arc;

use axum::{
    async_trait,
    extract::{DefaultBodyLimit, FromRequestParts, Path, State},
    http::{request::Parts, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde_json::json;

use super::form::ApplicationForm;
use super::service::{IntakeError, IntakeService};
use crate::careers::domain::JobId;
use crate::store::{ApplicationStore, Identity, JobStore, ResumeStorage};

pub const IDENTITY_ID_HEADER: &str = "x-identity-id";
pub const IDENTITY_EMAIL_HEADER: &str = "x-identity-email";
pub const IDENTITY_NAME_HEADER: &str = "x-identity-name";

/// Resumes travel base64-encoded inside the JSON body.
const APPLICATION_BODY_LIMIT: usize = 16 * 1024 * 1024;

/// Signed-in applicant forwarded by the auth proxy in request headers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApplicantIdentity(pub Option<Identity>);

fn header_text(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}

impl ApplicantIdentity {
    pub fn from_headers(headers: &HeaderMap) -> Self {
        let identity = header_text(headers, IDENTITY_ID_HEADER).map(|id| Identity {
            id,
            email: header_text(headers, IDENTITY_EMAIL_HEADER),
            full_name: header_text(headers, IDENTITY_NAME_HEADER),
        });
        Self(identity)
    }
}

#[async_trait]
impl<St> FromRequestParts<St> for ApplicantIdentity
where
    St: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &St) -> Result<Self, Self::Rejection> {
        Ok(Self::from_headers(&parts.headers))
    }
}

/// Router builder exposing the intake workflow over HTTP.
pub fn intake_router<S, F>(service: Arc<IntakeService<S, F>>) -> Router
where
    S: JobStore + ApplicationStore + 'static,
    F: ResumeStorage + 'static,
{
    Router::new()
        .route(
            "/api/v1/careers/jobs/:job_id/intake",
            get(intake_handler::<S, F>),
        )
        .route(
            "/api/v1/careers/jobs/:job_id/intake/steps/:step/validate",
            post(validate_handler::<S, F>),
        )
        .route(
            "/api/v1/careers/jobs/:job_id/applications",
            post(submit_handler::<S, F>).layer(DefaultBodyLimit::max(APPLICATION_BODY_LIMIT)),
        )
        .with_state(service)
}

pub(crate) async fn intake_handler<S, F>(
    State(service): State<Arc<IntakeService<S, F>>>,
    Path(job_id): Path<String>,
    ApplicantIdentity(identity): ApplicantIdentity,
) -> Response
where
    S: JobStore + ApplicationStore + 'static,
    F: ResumeStorage + 'static,
{
    match service.open(&JobId(job_id), identity) {
        Ok(session) => (StatusCode::OK, axum::Json(session.view())).into_response(),
        Err(error) => intake_error_response(error),
    }
}

pub(crate) async fn validate_handler<S, F>(
    State(service): State<Arc<IntakeService<S, F>>>,
    Path((job_id, step)): Path<(String, usize)>,
    axum::Json(form): axum::Json<ApplicationForm>,
) -> Response
where
    S: JobStore + ApplicationStore + 'static,
    F: ResumeStorage + 'static,
{
    match service.validate_step(&JobId(job_id), step, &form) {
        Ok(validation) => (StatusCode::OK, axum::Json(validation)).into_response(),
        Err(error) => intake_error_response(error),
    }
}

pub(crate) async fn submit_handler<S, F>(
    State(service): State<Arc<IntakeService<S, F>>>,
    Path(job_id): Path<String>,
    ApplicantIdentity(identity): ApplicantIdentity,
    axum::Json(form): axum::Json<ApplicationForm>,
) -> Response
where
    S: JobStore + ApplicationStore + 'static,
    F: ResumeStorage + 'static,
{
    match service.submit_complete_form(&JobId(job_id), identity, form) {
        Ok(record) => (StatusCode::CREATED, axum::Json(record)).into_response(),
        Err(error) => intake_error_response(error),
    }
}

pub(crate) fn intake_error_response(error: IntakeError) -> Response {
    match error {
        IntakeError::JobNotFound | IntakeError::UnknownStep { .. } => {
            let payload = json!({ "error": error.to_string() });
            (StatusCode::NOT_FOUND, axum::Json(payload)).into_response()
        }
        IntakeError::SignInRequired => {
            let payload = json!({ "error": error.to_string() });
            (StatusCode::UNAUTHORIZED, axum::Json(payload)).into_response()
        }
        IntakeError::AlreadyApplied(ref existing) => {
            let payload = json!({
                "error": error.to_string(),
                "application": existing,
            });
            (StatusCode::CONFLICT, axum::Json(payload)).into_response()
        }
        IntakeError::Validation { step, ref errors } => {
            let payload = json!({
                "error": error.to_string(),
                "step": step,
                "errors": errors,
            });
            (StatusCode::UNPROCESSABLE_ENTITY, axum::Json(payload)).into_response()
        }
        IntakeError::NoNextStep
        | IntakeError::NoPreviousStep
        | IntakeError::NotAtReview
        | IntakeError::SubmissionInFlight
        | IntakeError::Closed => {
            let payload = json!({ "error": error.to_string() });
            (StatusCode::CONFLICT, axum::Json(payload)).into_response()
        }
        IntakeError::SubmissionFailed(ref source) => {
            tracing::error!(error = %source, "application submission failed");
            let payload = json!({ "error": error.to_string() });
            (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
        }
        IntakeError::Store(ref source) => {
            tracing::error!(error = %source, "intake store failure");
            let payload = json!({ "error": crate::error::GENERIC_FAILURE_MESSAGE });
            (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
        }
    }
}
