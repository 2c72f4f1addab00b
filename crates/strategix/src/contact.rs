//! Contact form intake. Submissions are validated, stamped, and handed to a notifier;
//! nothing reads them back.

use std::sync::{Arc, Mutex};

use axum::{
    extract::State, http::StatusCode, response::IntoResponse, response::Response, routing::post,
    Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::careers::applications::is_valid_email;

pub const CONTACT_SUCCESS_MESSAGE: &str =
    "Thank you for your message. We will get back to you soon!";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContactRequest {
    pub name: String,
    pub email: String,
    pub company: Option<String>,
    pub interest: Option<String>,
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContactStatus {
    New,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContactSubmission {
    pub name: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interest: Option<String>,
    pub message: String,
    pub status: ContactStatus,
    pub submitted_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ContactError {
    #[error("Name, email, and message are required")]
    MissingFields,
    #[error("Invalid email format")]
    InvalidEmail,
    #[error("contact delivery failed: {0}")]
    Delivery(String),
}

fn blank_to_none(value: Option<String>) -> Option<String> {
    value
        .map(|text| text.trim().to_string())
        .filter(|text| !text.is_empty())
}

impl ContactRequest {
    pub fn validate(self, submitted_at: DateTime<Utc>) -> Result<ContactSubmission, ContactError> {
        let name = self.name.trim();
        let email = self.email.trim();
        let message = self.message.trim();

        if name.is_empty() || email.is_empty() || message.is_empty() {
            return Err(ContactError::MissingFields);
        }
        if !is_valid_email(email) {
            return Err(ContactError::InvalidEmail);
        }

        Ok(ContactSubmission {
            name: name.to_string(),
            email: email.to_string(),
            company: blank_to_none(self.company),
            interest: blank_to_none(self.interest),
            message: message.to_string(),
            status: ContactStatus::New,
            submitted_at,
        })
    }
}

/// Outbound delivery of contact submissions (email, CRM, ...).
pub trait ContactNotifier: Send + Sync {
    fn notify(&self, submission: &ContactSubmission) -> Result<(), ContactError>;
}

/// Default notifier: records the submission in the service log.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNotifier;

impl ContactNotifier for TracingNotifier {
    fn notify(&self, submission: &ContactSubmission) -> Result<(), ContactError> {
        tracing::info!(
            interest = submission.interest.as_deref().unwrap_or("unspecified"),
            has_company = submission.company.is_some(),
            message_len = submission.message.len(),
            submitted_at = %submission.submitted_at,
            "contact form submission received"
        );
        Ok(())
    }
}

/// Notifier that keeps submissions in memory, for demos and tests.
#[derive(Debug, Default, Clone)]
pub struct MemoryNotifier {
    sent: Arc<Mutex<Vec<ContactSubmission>>>,
}

impl MemoryNotifier {
    pub fn sent(&self) -> Vec<ContactSubmission> {
        self.sent
            .lock()
            .map(|guard| guard.clone())
            .unwrap_or_default()
    }
}

impl ContactNotifier for MemoryNotifier {
    fn notify(&self, submission: &ContactSubmission) -> Result<(), ContactError> {
        self.sent
            .lock()
            .map_err(|_| ContactError::Delivery("notifier lock poisoned".to_string()))?
            .push(submission.clone());
        Ok(())
    }
}

pub fn contact_router<N>(notifier: Arc<N>) -> Router
where
    N: ContactNotifier + 'static,
{
    Router::new()
        .route("/api/contact", post(contact_handler::<N>))
        .with_state(notifier)
}

pub(crate) async fn contact_handler<N>(
    State(notifier): State<Arc<N>>,
    axum::Json(request): axum::Json<ContactRequest>,
) -> Response
where
    N: ContactNotifier + 'static,
{
    let submission = match request.validate(Utc::now()) {
        Ok(submission) => submission,
        Err(error) => {
            let payload = json!({ "error": error.to_string() });
            return (StatusCode::BAD_REQUEST, axum::Json(payload)).into_response();
        }
    };

    match notifier.notify(&submission) {
        Ok(()) => {
            let payload = json!({
                "success": true,
                "message": CONTACT_SUCCESS_MESSAGE,
            });
            (StatusCode::OK, axum::Json(payload)).into_response()
        }
        Err(error) => {
            tracing::error!(error = %error, "contact delivery failed");
            let payload = json!({ "error": "An error occurred while processing your request" });
            (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
        }
    }
}
