//! Job application intake: the step plan, per-step validation, the session state machine,
//! record assembly, and the HTTP surface.
//!
//! The wizard is one machine parameterized by the job's country. USA postings gain an
//! immigration step between basic info and self-identification; every other index
//! follows from that single branch in [`steps::StepPlan`].

pub mod domain;
pub mod form;
pub mod record;
pub(crate) mod rules;
pub mod router;
pub mod service;
pub mod session;
pub mod steps;

#[cfg(test)]
mod tests;

pub use domain::{
    Answer, ApplicationId, ApplicationRecord, ApplicationStatus, DisabilityStatus,
    ExistingApplication, ExperienceBand, Gender, ImmigrationDetails, NewApplication,
    NoticePeriod, RaceEthnicity, ReferralSource, SelfIdentification, VeteranStatus, VisaStatus,
};
pub use form::{ApplicationForm, ResumeAttachment};
pub use record::assemble;
pub use router::{intake_router, ApplicantIdentity};
pub use rules::{is_valid_email, validate_step};
pub use service::{IntakeError, IntakeService, StepValidation};
pub use session::{IntakePhase, IntakeSession, IntakeView, SUBMISSION_FAILED_MESSAGE};
pub use steps::{IntakeStep, StepPlan};
