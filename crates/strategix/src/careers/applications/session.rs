use serde::Serialize;

use super::domain::{ApplicationId, ApplicationRecord, ExistingApplication};
use super::form::ApplicationForm;
use super::rules::validate_kind;
use super::service::IntakeError;
use super::steps::{IntakeStep, StepPlan};
use crate::careers::domain::{Job, JobSummary};
use crate::store::Identity;

/// Shown in place of store detail when persisting the application fails.
pub const SUBMISSION_FAILED_MESSAGE: &str =
    "There was an error submitting your application. Please try again.";

/// Where the applicant is in the intake flow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IntakePhase {
    SignInRequired,
    AlreadyApplied(ExistingApplication),
    Filling,
    Submitting,
    Submitted(ApplicationRecord),
}

/// One applicant's pass through the intake wizard for one job.
///
/// The step counter only moves one position at a time, and only forward after the
/// current step validates cleanly. Terminal phases (already applied, submitted) reject
/// further edits.
#[derive(Debug, Clone)]
pub struct IntakeSession {
    job: Job,
    plan: StepPlan,
    identity: Option<Identity>,
    form: ApplicationForm,
    current_step: usize,
    errors: Vec<String>,
    phase: IntakePhase,
}

impl IntakeSession {
    pub fn new(job: Job) -> Self {
        let plan = StepPlan::for_country(job.location_country);
        Self {
            job,
            plan,
            identity: None,
            form: ApplicationForm::default(),
            current_step: plan.first_step(),
            errors: Vec::new(),
            phase: IntakePhase::SignInRequired,
        }
    }

    pub fn job(&self) -> &Job {
        &self.job
    }

    pub fn plan(&self) -> StepPlan {
        self.plan
    }

    pub fn identity(&self) -> Option<&Identity> {
        self.identity.as_ref()
    }

    pub fn form(&self) -> &ApplicationForm {
        &self.form
    }

    pub fn current_step(&self) -> usize {
        self.current_step
    }

    pub fn current_kind(&self) -> IntakeStep {
        self.plan.step_at(self.current_step).unwrap_or(IntakeStep::BasicInfo)
    }

    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    pub fn phase(&self) -> &IntakePhase {
        &self.phase
    }

    pub fn at_review(&self) -> bool {
        self.current_step == self.plan.review_step()
    }

    /// Record the outcome of an identity change and the duplicate lookup that followed it.
    ///
    /// A signed-in identity pre-fills name and email when the provider supplies them;
    /// fields it does not carry keep whatever the applicant already typed.
    pub fn apply_identity(
        &mut self,
        identity: Option<Identity>,
        existing: Option<ExistingApplication>,
    ) {
        if matches!(
            self.phase,
            IntakePhase::Submitting | IntakePhase::Submitted(_)
        ) {
            return;
        }

        let Some(identity) = identity else {
            self.identity = None;
            self.phase = IntakePhase::SignInRequired;
            return;
        };

        if let Some(full_name) = identity.full_name.as_deref().filter(|name| !name.is_empty()) {
            self.form.full_name = full_name.to_string();
        }
        if let Some(email) = identity.lookup_email() {
            self.form.email = email.to_string();
        }
        self.identity = Some(identity);

        self.phase = match existing {
            Some(existing) => IntakePhase::AlreadyApplied(existing),
            None => IntakePhase::Filling,
        };
    }

    fn ensure_filling(&self) -> Result<(), IntakeError> {
        match &self.phase {
            IntakePhase::Filling => Ok(()),
            IntakePhase::SignInRequired => Err(IntakeError::SignInRequired),
            IntakePhase::AlreadyApplied(existing) => {
                Err(IntakeError::AlreadyApplied(existing.clone()))
            }
            IntakePhase::Submitting => Err(IntakeError::SubmissionInFlight),
            IntakePhase::Submitted(_) => Err(IntakeError::Closed),
        }
    }

    /// Replace the form with the result of `update`. The closure receives the current
    /// snapshot by value and returns the next one.
    pub fn update_form(
        &mut self,
        update: impl FnOnce(ApplicationForm) -> ApplicationForm,
    ) -> Result<(), IntakeError> {
        self.ensure_filling()?;
        let current = std::mem::take(&mut self.form);
        self.form = update(current);
        Ok(())
    }

    pub fn validate_current(&self) -> Vec<String> {
        validate_kind(&self.form, self.current_kind())
    }

    /// Advance one step. Blocked, with the full error list retained for display, when
    /// the current step does not validate.
    pub fn next(&mut self) -> Result<usize, IntakeError> {
        self.ensure_filling()?;
        if self.at_review() {
            return Err(IntakeError::NoNextStep);
        }

        let errors = self.validate_current();
        if !errors.is_empty() {
            self.errors = errors.clone();
            return Err(IntakeError::Validation {
                step: self.current_step,
                errors,
            });
        }

        self.errors.clear();
        self.current_step += 1;
        Ok(self.current_step)
    }

    pub fn back(&mut self) -> Result<usize, IntakeError> {
        self.ensure_filling()?;
        self.errors.clear();
        if self.current_step <= self.plan.first_step() {
            return Err(IntakeError::NoPreviousStep);
        }
        self.current_step -= 1;
        Ok(self.current_step)
    }

    /// Lock the session for submission and hand back the identity that owns the upload.
    pub(crate) fn begin_submission(&mut self) -> Result<Identity, IntakeError> {
        self.ensure_filling()?;
        if !self.at_review() {
            return Err(IntakeError::NotAtReview);
        }
        let identity = self.identity.clone().ok_or(IntakeError::SignInRequired)?;
        self.errors.clear();
        self.phase = IntakePhase::Submitting;
        Ok(identity)
    }

    pub(crate) fn complete_submission(&mut self, record: ApplicationRecord) {
        self.errors.clear();
        self.phase = IntakePhase::Submitted(record);
    }

    pub(crate) fn reject_duplicate(&mut self, existing: ExistingApplication) {
        self.errors.clear();
        self.phase = IntakePhase::AlreadyApplied(existing);
    }

    /// Return to the review step with a single generic message so the applicant can retry.
    pub(crate) fn fail_submission(&mut self) {
        self.errors = vec![SUBMISSION_FAILED_MESSAGE.to_string()];
        self.phase = IntakePhase::Filling;
    }

    pub fn view(&self) -> IntakeView {
        let job = self.job.summary();
        match &self.phase {
            IntakePhase::SignInRequired => IntakeView::SignInRequired { job },
            IntakePhase::AlreadyApplied(existing) => IntakeView::AlreadyApplied {
                job,
                application: existing.clone(),
            },
            IntakePhase::Filling => {
                let kind = self.current_kind();
                IntakeView::InProgress {
                    job,
                    step: self.current_step,
                    total_steps: self.plan.total_steps(),
                    kind,
                    title: kind.title(),
                    errors: self.errors.clone(),
                }
            }
            IntakePhase::Submitting => IntakeView::Submitting { job },
            IntakePhase::Submitted(record) => IntakeView::Submitted {
                job,
                application_id: record.id.clone(),
            },
        }
    }
}

/// Serializable snapshot of a session for the web client.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum IntakeView {
    SignInRequired {
        job: JobSummary,
    },
    AlreadyApplied {
        job: JobSummary,
        application: ExistingApplication,
    },
    InProgress {
        job: JobSummary,
        step: usize,
        total_steps: usize,
        kind: IntakeStep,
        title: &'static str,
        errors: Vec<String>,
    },
    Submitting {
        job: JobSummary,
    },
    Submitted {
        job: JobSummary,
        application_id: ApplicationId,
    },
}
