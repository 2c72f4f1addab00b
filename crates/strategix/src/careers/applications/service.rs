use std::sync::Arc;

use serde::Serialize;

use super::domain::{ApplicationRecord, ExistingApplication};
use super::form::ApplicationForm;
use super::record::assemble;
use super::rules::validate_kind;
use super::session::IntakeSession;
use super::steps::{IntakeStep, StepPlan};
use crate::careers::domain::JobId;
use crate::store::{ApplicationStore, Identity, JobStore, ResumeStorage, StoreError};

/// Service composing job lookup, the duplicate guard, resume upload, and record creation.
pub struct IntakeService<S, F> {
    store: Arc<S>,
    files: Arc<F>,
}

/// Outcome of validating one step without holding a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StepValidation {
    pub step: usize,
    pub total_steps: usize,
    pub kind: IntakeStep,
    pub errors: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_step: Option<usize>,
}

impl<S, F> IntakeService<S, F>
where
    S: JobStore + ApplicationStore + 'static,
    F: ResumeStorage + 'static,
{
    pub fn new(store: Arc<S>, files: Arc<F>) -> Self {
        Self { store, files }
    }

    /// Load the job and run the pre-entry guards for `identity`.
    pub fn open(
        &self,
        job_id: &JobId,
        identity: Option<Identity>,
    ) -> Result<IntakeSession, IntakeError> {
        let job = self.store.job(job_id)?.ok_or(IntakeError::JobNotFound)?;
        let mut session = IntakeSession::new(job);
        self.identity_changed(&mut session, identity)?;
        Ok(session)
    }

    /// Re-run the duplicate-application lookup after a sign-in or sign-out.
    pub fn identity_changed(
        &self,
        session: &mut IntakeSession,
        identity: Option<Identity>,
    ) -> Result<(), IntakeError> {
        let existing = match identity.as_ref().and_then(Identity::lookup_email) {
            Some(email) => self.store.find_application(&session.job().id, email)?,
            None => None,
        };

        if let Some(existing) = &existing {
            tracing::info!(
                job_id = %session.job().id,
                application_id = %existing.id,
                "applicant already applied"
            );
        }

        session.apply_identity(identity, existing);
        Ok(())
    }

    /// Validate `step` of the job's plan against a detached form.
    pub fn validate_step(
        &self,
        job_id: &JobId,
        step: usize,
        form: &ApplicationForm,
    ) -> Result<StepValidation, IntakeError> {
        let job = self.store.job(job_id)?.ok_or(IntakeError::JobNotFound)?;
        let plan = StepPlan::for_country(job.location_country);
        let kind = plan.step_at(step).ok_or(IntakeError::UnknownStep { step })?;
        let errors = validate_kind(form, kind);
        let next_step = (errors.is_empty() && step < plan.review_step()).then_some(step + 1);

        Ok(StepValidation {
            step,
            total_steps: plan.total_steps(),
            kind,
            errors,
            next_step,
        })
    }

    /// Upload the resume, assemble the record, and persist it. Any failure returns the
    /// session to the review step with a single generic error.
    pub fn submit(&self, session: &mut IntakeSession) -> Result<ApplicationRecord, IntakeError> {
        let identity = session.begin_submission()?;

        match self.find_duplicate(session) {
            Ok(None) => {}
            Ok(Some(existing)) => {
                tracing::info!(
                    job_id = %session.job().id,
                    application_id = %existing.id,
                    "submitted email already applied"
                );
                session.reject_duplicate(existing.clone());
                return Err(IntakeError::AlreadyApplied(existing));
            }
            Err(error) => {
                tracing::warn!(
                    job_id = %session.job().id,
                    error = %error,
                    "duplicate lookup failed during submission"
                );
                session.fail_submission();
                return Err(IntakeError::SubmissionFailed(error));
            }
        }

        match self.persist(session, &identity) {
            Ok(record) => {
                tracing::info!(
                    job_id = %record.application.job_id,
                    application_id = %record.id,
                    country = session.job().location_country.label(),
                    "application submitted"
                );
                session.complete_submission(record.clone());
                Ok(record)
            }
            Err(error) => {
                tracing::warn!(
                    job_id = %session.job().id,
                    error = %error,
                    "application submission failed"
                );
                session.fail_submission();
                Err(IntakeError::SubmissionFailed(error))
            }
        }
    }

    /// The stored record carries the form's email, which the applicant may have edited
    /// after the identity lookup ran.
    fn find_duplicate(
        &self,
        session: &IntakeSession,
    ) -> Result<Option<ExistingApplication>, StoreError> {
        let email = session.form().email.trim();
        if email.is_empty() {
            return Ok(None);
        }
        self.store.find_application(&session.job().id, email)
    }

    fn persist(
        &self,
        session: &IntakeSession,
        identity: &Identity,
    ) -> Result<ApplicationRecord, StoreError> {
        let resume_url = match &session.form().resume {
            Some(resume) => Some(self.files.upload_resume(resume, &identity.id)?.signed_url),
            None => None,
        };

        let record = assemble(session.job(), identity, session.form(), resume_url);
        self.store.create_application(record)
    }

    /// Drive a whole form through every step and submit it.
    ///
    /// Used by the HTTP surface so every gate is enforced server side, not only in the
    /// browser.
    pub fn submit_complete_form(
        &self,
        job_id: &JobId,
        identity: Option<Identity>,
        form: ApplicationForm,
    ) -> Result<ApplicationRecord, IntakeError> {
        let mut session = self.open(job_id, identity)?;
        session.update_form(|_| form)?;
        while !session.at_review() {
            session.next()?;
        }
        self.submit(&mut session)
    }
}

/// Error raised by the intake workflow.
#[derive(Debug, thiserror::Error)]
pub enum IntakeError {
    #[error("job not found")]
    JobNotFound,
    #[error("sign in to apply for this position")]
    SignInRequired,
    #[error("you have already applied for this position")]
    AlreadyApplied(ExistingApplication),
    #[error("step {step} has {} validation error(s)", .errors.len())]
    Validation { step: usize, errors: Vec<String> },
    #[error("already on the review step")]
    NoNextStep,
    #[error("already on the first step")]
    NoPreviousStep,
    #[error("applications can only be submitted from the review step")]
    NotAtReview,
    #[error("a submission is already in progress")]
    SubmissionInFlight,
    #[error("this application has already been submitted")]
    Closed,
    #[error("step {step} does not exist for this position")]
    UnknownStep { step: usize },
    #[error("There was an error submitting your application. Please try again.")]
    SubmissionFailed(#[source] StoreError),
    #[error(transparent)]
    Store(#[from] StoreError),
}
