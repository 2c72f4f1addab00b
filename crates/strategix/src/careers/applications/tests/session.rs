use chrono::Utc;

use super::common::*;
use crate::careers::applications::domain::{
    ApplicationId, ApplicationStatus, ExistingApplication, VisaStatus,
};
use crate::careers::applications::service::IntakeError;
use crate::careers::applications::session::{
    IntakePhase, IntakeSession, IntakeView, SUBMISSION_FAILED_MESSAGE,
};
use crate::careers::applications::steps::IntakeStep;
use crate::careers::domain::LocationCountry;
use crate::store::Identity;

fn filling_session(country: LocationCountry) -> IntakeSession {
    let mut session = IntakeSession::new(job("7", country));
    session.apply_identity(Some(identity()), None);
    session
}

#[test]
fn sessions_start_behind_sign_in() {
    let mut session = IntakeSession::new(job("42", LocationCountry::India));
    assert_eq!(session.phase(), &IntakePhase::SignInRequired);
    assert!(matches!(session.view(), IntakeView::SignInRequired { .. }));
    assert!(matches!(session.next(), Err(IntakeError::SignInRequired)));
    assert!(matches!(
        session.update_form(|form| form.with_phone("1")),
        Err(IntakeError::SignInRequired)
    ));
}

#[test]
fn sign_in_prefills_name_and_email() {
    let mut session = IntakeSession::new(job("42", LocationCountry::India));
    session.apply_identity(Some(identity()), None);

    assert_eq!(session.phase(), &IntakePhase::Filling);
    assert_eq!(session.form().full_name, "Asha Rao");
    assert_eq!(session.form().email, "asha@example.com");
}

#[test]
fn identity_without_name_keeps_typed_name() {
    let mut session = filling_session(LocationCountry::India);
    session
        .update_form(|form| form.with_full_name("Asha R."))
        .expect("filling");

    session.apply_identity(Some(Identity::new("user-43").with_email("asha.r@example.com")), None);

    assert_eq!(session.form().full_name, "Asha R.");
    assert_eq!(session.form().email, "asha.r@example.com");
}

#[test]
fn existing_application_short_circuits_to_terminal_view() {
    let existing = ExistingApplication {
        id: ApplicationId("app-1".to_string()),
        created_at: Utc::now(),
        status: ApplicationStatus::Reviewing,
    };
    let mut session = IntakeSession::new(job("42", LocationCountry::India));
    session.apply_identity(Some(identity()), Some(existing.clone()));

    assert_eq!(session.phase(), &IntakePhase::AlreadyApplied(existing.clone()));
    match session.view() {
        IntakeView::AlreadyApplied { application, .. } => assert_eq!(application, existing),
        other => panic!("expected already-applied view, got {other:?}"),
    }
    assert!(matches!(session.next(), Err(IntakeError::AlreadyApplied(_))));
}

#[test]
fn usa_h1b_without_history_stays_on_immigration_step() {
    let mut session = filling_session(LocationCountry::Usa);
    session
        .update_form(|_| basic_info_form())
        .expect("filling");
    assert_eq!(session.next().expect("basic info valid"), 2);
    assert_eq!(session.current_kind(), IntakeStep::Immigration);

    session
        .update_form(|form| {
            let mut form = with_h1b_immigration(form).with_visa_status(VisaStatus::H1b);
            form.has_h1b_history = None;
            form
        })
        .expect("filling");

    match session.next() {
        Err(IntakeError::Validation { step, errors }) => {
            assert_eq!(step, 2);
            assert!(errors.contains(&"H-1B history is required".to_string()));
        }
        other => panic!("expected validation failure, got {other:?}"),
    }
    assert_eq!(session.current_step(), 2);
    assert!(session
        .errors()
        .contains(&"H-1B history is required".to_string()));
}

#[test]
fn successful_advance_clears_displayed_errors() {
    let mut session = filling_session(LocationCountry::India);
    session
        .update_form(|form| form.with_full_name(""))
        .expect("filling");
    assert!(session.next().is_err());
    assert!(!session.errors().is_empty());

    session
        .update_form(|_| basic_info_form())
        .expect("filling");
    assert_eq!(session.next().expect("advances"), 2);
    assert!(session.errors().is_empty());
}

#[test]
fn back_moves_one_step_and_stops_at_first() {
    let mut session = filling_session(LocationCountry::India);
    assert!(matches!(session.back(), Err(IntakeError::NoPreviousStep)));

    session
        .update_form(|_| complete_form(LocationCountry::India))
        .expect("filling");
    session.next().expect("to eeo");
    session.next().expect("to review");
    assert!(session.at_review());
    assert!(matches!(session.next(), Err(IntakeError::NoNextStep)));

    assert_eq!(session.back().expect("back to eeo"), 2);
    assert_eq!(session.current_kind(), IntakeStep::SelfIdentification);
}

#[test]
fn submission_requires_review_step() {
    let mut session = filling_session(LocationCountry::India);
    assert!(matches!(
        session.begin_submission(),
        Err(IntakeError::NotAtReview)
    ));
}

#[test]
fn failed_submission_returns_to_review_with_generic_error() {
    let mut session = filling_session(LocationCountry::India);
    session
        .update_form(|_| complete_form(LocationCountry::India))
        .expect("filling");
    session.next().expect("to eeo");
    session.next().expect("to review");

    let owner = session.begin_submission().expect("at review");
    assert_eq!(owner.id, "user-42");
    assert_eq!(session.phase(), &IntakePhase::Submitting);
    assert!(matches!(
        session.begin_submission(),
        Err(IntakeError::SubmissionInFlight)
    ));

    session.fail_submission();
    assert_eq!(session.phase(), &IntakePhase::Filling);
    assert!(session.at_review());
    assert_eq!(session.errors(), [SUBMISSION_FAILED_MESSAGE.to_string()]);
}

#[test]
fn in_progress_view_reports_step_layout() {
    let session = filling_session(LocationCountry::Usa);
    let encoded = serde_json::to_value(session.view()).expect("serializes");
    assert_eq!(encoded["state"], "in_progress");
    assert_eq!(encoded["step"], 1);
    assert_eq!(encoded["total_steps"], 4);
    assert_eq!(encoded["kind"], "basic_info");
    assert_eq!(encoded["title"], "Basic Info");
    assert_eq!(encoded["job"]["location_country"], "usa");
}

#[test]
fn sign_out_hides_the_form_again() {
    let mut session = filling_session(LocationCountry::India);
    session.apply_identity(None, None);
    assert_eq!(session.phase(), &IntakePhase::SignInRequired);
    assert!(session.identity().is_none());
}
