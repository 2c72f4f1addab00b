use crate::infra::demo_job;
use clap::Args;
use std::sync::Arc;
use strategix::admin::AdminService;
use strategix::careers::applications::{
    Answer, ApplicationForm, ExperienceBand, IntakeError, IntakeService, IntakeSession,
    IntakeStep, NoticePeriod, ReferralSource, ResumeAttachment, VisaStatus,
};
use strategix::careers::LocationCountry;
use strategix::config::StorageConfig;
use strategix::error::AppError;
use strategix::store::{Identity, InMemoryResumeStorage, InMemoryStore, JobStore};

#[derive(Args, Debug)]
pub(crate) struct DemoArgs {
    /// Country of the demo posting; `usa` adds the immigration step.
    #[arg(long, value_parser = crate::infra::parse_country, default_value = "usa")]
    pub(crate) country: LocationCountry,
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs { country } = args;

    let store = Arc::new(InMemoryStore::new());
    let files = Arc::new(InMemoryResumeStorage::new(StorageConfig::default()));
    let intake = IntakeService::new(store.clone(), files.clone());
    let admin = AdminService::new(store.clone());

    let job = store.create_job(demo_job("Applied AI Consultant", country))?;
    println!("Job application demo ({})", country.label());
    println!("- Posting: {} | {} | {}", job.title, job.department, job.location);

    let mut session = match intake.open(&job.id, None) {
        Ok(session) => session,
        Err(err) => {
            println!("  Intake unavailable: {}", err);
            return Ok(());
        }
    };
    println!("- Signed out visitor sees: {:?}", session.phase());

    let applicant = Identity::new("demo-applicant")
        .with_email("priya.sharma@example.com")
        .with_full_name("Priya Sharma");
    if let Err(err) = intake.identity_changed(&mut session, Some(applicant)) {
        println!("  Duplicate lookup failed: {}", err);
        return Ok(());
    }
    println!(
        "- Signed in; name and email pre-filled as {} <{}>",
        session.form().full_name,
        session.form().email
    );

    let plan = session.plan();
    println!("\nSteps ({} total)", plan.total_steps());
    for (offset, step) in plan.steps().iter().enumerate() {
        println!("  {}. {}", offset + 1, step.title());
    }

    while !session.at_review() {
        let kind = session.current_kind();
        println!("\nStep {}: {}", session.current_step(), kind.title());

        match session.next() {
            Err(IntakeError::Validation { errors, .. }) => {
                println!("  Blocked with {} validation error(s):", errors.len());
                for error in &errors {
                    println!("    - {}", error);
                }
            }
            Err(err) => {
                println!("  Unexpected state: {}", err);
                return Ok(());
            }
            Ok(_) => continue,
        }

        if let Err(err) = session.update_form(|form| fill_step(kind, form)) {
            println!("  Form locked: {}", err);
            return Ok(());
        }
        if let Err(err) = session.next() {
            println!("  Still blocked: {}", err);
            return Ok(());
        }
        println!("  Completed; moving on");
    }

    println!("\nStep {}: {}", session.current_step(), IntakeStep::Review.title());
    let record = match intake.submit(&mut session) {
        Ok(record) => record,
        Err(err) => {
            println!("  Submission failed: {}", err);
            return Ok(());
        }
    };
    println!(
        "- Stored application {} -> status {}",
        record.id,
        record.status.label()
    );
    println!(
        "  Immigration block present: {}",
        record.application.immigration.is_some()
    );
    println!("  Resume objects in bucket: {}", files.object_names().join(", "));
    report_duplicate_guard(&intake, &job.id, &session);

    match admin.dashboard() {
        Ok(counters) => match serde_json::to_string_pretty(&counters) {
            Ok(json) => println!("\nAdmin dashboard counters:\n{}", json),
            Err(err) => println!("\nAdmin dashboard counters unavailable: {}", err),
        },
        Err(err) => println!("\nAdmin dashboard unavailable: {}", err),
    }

    Ok(())
}

fn report_duplicate_guard(
    intake: &IntakeService<InMemoryStore, InMemoryResumeStorage>,
    job_id: &strategix::careers::JobId,
    session: &IntakeSession,
) {
    let identity = session.identity().cloned();
    match intake.open(job_id, identity) {
        Ok(reopened) => println!("  Returning to the posting shows: {:?}", reopened.phase()),
        Err(err) => println!("  Duplicate check unavailable: {}", err),
    }
}

fn fill_step(kind: IntakeStep, form: ApplicationForm) -> ApplicationForm {
    match kind {
        IntakeStep::BasicInfo => form
            .with_phone("+1 512 555 0142")
            .with_years_experience(ExperienceBand::SixToTen)
            .with_linkedin_url("https://www.linkedin.com/in/priya-sharma-demo")
            .with_notice_period(NoticePeriod::TwoWeeks)
            .with_how_did_you_hear(ReferralSource::Linkedin)
            .with_resume(ResumeAttachment::new(
                "priya-sharma.pdf",
                b"%PDF-1.7 demo resume".to_vec(),
            )),
        IntakeStep::Immigration => form
            .with_work_authorization(Answer::Yes)
            .with_requires_sponsorship(Answer::No)
            .with_visa_status(VisaStatus::F1StemOpt)
            .with_requires_cpt(Answer::No)
            .with_stem_degree(Answer::Yes)
            .with_h1b_history(Answer::No)
            .with_j1_history(Answer::No)
            .with_i140_filed(Answer::No)
            .with_future_sponsorship(Answer::Yes)
            .with_immigration_certified(true),
        IntakeStep::SelfIdentification => form.with_eeo_acknowledged(true),
        IntakeStep::Review => form,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strategix::careers::applications::{validate_step, StepPlan};

    #[test]
    fn filled_steps_pass_validation() {
        let plan = StepPlan::for_country(LocationCountry::Usa);
        let mut form = ApplicationForm::default()
            .with_full_name("Priya Sharma")
            .with_email("priya.sharma@example.com");
        for (offset, kind) in plan.steps().iter().enumerate() {
            form = fill_step(*kind, form);
            let errors = validate_step(&form, LocationCountry::Usa, offset + 1);
            assert!(errors.is_empty(), "{kind:?} still failing: {errors:?}");
        }
    }

    #[test]
    fn demo_runs_for_both_countries() {
        for country in [LocationCountry::Usa, LocationCountry::India] {
            run_demo(DemoArgs { country }).expect("demo completes");
        }
    }
}
