use std::sync::Arc;

use axum::response::Response;
use chrono::Utc;
use serde_json::Value;

use crate::careers::applications::domain::{
    Answer, ApplicationId, ApplicationRecord, ApplicationStatus, ExistingApplication,
    ExperienceBand, NewApplication, VisaStatus,
};
use crate::careers::applications::form::{ApplicationForm, ResumeAttachment};
use crate::careers::applications::service::IntakeService;
use crate::careers::domain::{Job, JobDraft, JobId, LocationCountry};
use crate::config::StorageConfig;
use crate::store::{
    ApplicationStore, Identity, InMemoryResumeStorage, InMemoryStore, JobStore, ResumeStorage,
    StoreError, StoredResume,
};

pub(super) const IMMIGRATION_MESSAGES: [&str; 12] = [
    "Work authorization status is required",
    "Sponsorship requirement is required",
    "Current visa status is required",
    "Please specify your visa status",
    "CPT requirement is required",
    "STEM degree status is required",
    "H-1B history is required",
    "J-1 history is required",
    "212(e) requirement status is required",
    "I-140 status is required",
    "Future sponsorship requirement is required",
    "You must certify that your immigration information is accurate",
];

pub(super) fn job_draft(title: &str, country: LocationCountry) -> JobDraft {
    JobDraft {
        title: title.to_string(),
        department: "AI Strategy".to_string(),
        location: match country {
            LocationCountry::Usa => "Austin, TX".to_string(),
            LocationCountry::India => "Hyderabad, Telangana".to_string(),
        },
        location_country: country,
        employment_type: "Full-time".to_string(),
        description: "Help clients adopt AI responsibly.".to_string(),
        full_description: None,
        requirements: vec!["5+ years consulting".to_string()],
        responsibilities: vec!["Lead discovery workshops".to_string()],
        salary_range: None,
        is_active: true,
    }
}

pub(super) fn job(id: &str, country: LocationCountry) -> Job {
    let draft = job_draft("AI Consultant", country);
    let now = Utc::now();
    Job {
        id: JobId(id.to_string()),
        title: draft.title,
        department: draft.department,
        location: draft.location,
        location_country: country,
        employment_type: draft.employment_type,
        description: draft.description,
        full_description: None,
        requirements: draft.requirements,
        responsibilities: draft.responsibilities,
        salary_range: None,
        is_active: true,
        created_at: now,
        updated_at: now,
    }
}

pub(super) fn identity() -> Identity {
    Identity::new("user-42")
        .with_email("asha@example.com")
        .with_full_name("Asha Rao")
}

pub(super) fn resume() -> ResumeAttachment {
    ResumeAttachment::new("asha-rao.pdf", b"%PDF-1.7 resume".to_vec())
}

pub(super) fn basic_info_form() -> ApplicationForm {
    ApplicationForm::default()
        .with_full_name("Asha Rao")
        .with_email("asha@example.com")
        .with_phone("+91 90000 12345")
        .with_years_experience(ExperienceBand::ThreeToFive)
        .with_resume(resume())
}

pub(super) fn with_h1b_immigration(form: ApplicationForm) -> ApplicationForm {
    form.with_work_authorization(Answer::Yes)
        .with_requires_sponsorship(Answer::Yes)
        .with_visa_status(VisaStatus::H1b)
        .with_h1b_history(Answer::Yes)
        .with_j1_history(Answer::No)
        .with_i140_filed(Answer::No)
        .with_future_sponsorship(Answer::Yes)
        .with_immigration_certified(true)
}

pub(super) fn complete_form(country: LocationCountry) -> ApplicationForm {
    let form = basic_info_form().with_eeo_acknowledged(true);
    match country {
        LocationCountry::Usa => with_h1b_immigration(form),
        LocationCountry::India => form,
    }
}

pub(super) type MemoryService = IntakeService<InMemoryStore, InMemoryResumeStorage>;

pub(super) fn build_service() -> (MemoryService, Arc<InMemoryStore>, Arc<InMemoryResumeStorage>) {
    let store = Arc::new(InMemoryStore::new());
    store
        .insert_job_with_id(
            JobId("42".to_string()),
            job_draft("Data Scientist", LocationCountry::India),
        )
        .expect("seed india job");
    store
        .insert_job_with_id(
            JobId("7".to_string()),
            job_draft("Cloud Architect", LocationCountry::Usa),
        )
        .expect("seed usa job");

    let files = Arc::new(InMemoryResumeStorage::new(StorageConfig::default()));
    let service = IntakeService::new(store.clone(), files.clone());
    (service, store, files)
}

/// Store whose writes always fail while reads serve a fixed job.
pub(super) struct UnavailableStore {
    pub(super) job: Job,
}

impl JobStore for UnavailableStore {
    fn job(&self, id: &JobId) -> Result<Option<Job>, StoreError> {
        Ok((id == &self.job.id).then(|| self.job.clone()))
    }

    fn jobs(&self) -> Result<Vec<Job>, StoreError> {
        Ok(vec![self.job.clone()])
    }

    fn create_job(&self, _draft: JobDraft) -> Result<Job, StoreError> {
        Err(StoreError::Unavailable("database offline".to_string()))
    }

    fn update_job(&self, _id: &JobId, _draft: JobDraft) -> Result<Job, StoreError> {
        Err(StoreError::Unavailable("database offline".to_string()))
    }

    fn set_job_active(&self, _id: &JobId, _active: bool) -> Result<Job, StoreError> {
        Err(StoreError::Unavailable("database offline".to_string()))
    }

    fn delete_job(&self, _id: &JobId) -> Result<(), StoreError> {
        Err(StoreError::Unavailable("database offline".to_string()))
    }
}

impl ApplicationStore for UnavailableStore {
    fn find_application(
        &self,
        _job_id: &JobId,
        _email: &str,
    ) -> Result<Option<ExistingApplication>, StoreError> {
        Ok(None)
    }

    fn create_application(
        &self,
        _application: NewApplication,
    ) -> Result<ApplicationRecord, StoreError> {
        Err(StoreError::Unavailable("database offline".to_string()))
    }

    fn applications(&self) -> Result<Vec<ApplicationRecord>, StoreError> {
        Err(StoreError::Unavailable("database offline".to_string()))
    }

    fn update_application_status(
        &self,
        _id: &ApplicationId,
        _status: ApplicationStatus,
    ) -> Result<ApplicationRecord, StoreError> {
        Err(StoreError::Unavailable("database offline".to_string()))
    }
}

pub(super) struct RejectingResumeStorage;

impl ResumeStorage for RejectingResumeStorage {
    fn upload_resume(
        &self,
        _resume: &ResumeAttachment,
        _owner_id: &str,
    ) -> Result<StoredResume, StoreError> {
        Err(StoreError::Unavailable("bucket unreachable".to_string()))
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
