use super::domain::{Answer, ImmigrationDetails, NewApplication, SelfIdentification};
use super::form::ApplicationForm;
use crate::careers::domain::Job;
use crate::store::Identity;

fn optional_text(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

fn answered_yes(answer: Option<Answer>) -> bool {
    answer.map(Answer::is_yes).unwrap_or(false)
}

fn immigration_details(form: &ApplicationForm) -> ImmigrationDetails {
    ImmigrationDetails {
        is_authorized_usa: answered_yes(form.is_authorized_usa),
        requires_sponsorship: answered_yes(form.requires_sponsorship),
        visa_status: form.visa_status,
        visa_status_other: optional_text(&form.visa_status_other),
        requires_cpt: answered_yes(form.requires_cpt),
        is_stem_degree: answered_yes(form.is_stem_degree),
        opt_expiration_date: form.opt_expiration_date,
        has_h1b_history: answered_yes(form.has_h1b_history),
        has_j1_history: answered_yes(form.has_j1_history),
        is_subject_to_212e: answered_yes(form.is_subject_to_212e),
        has_i140_filed: answered_yes(form.has_i140_filed),
        requires_future_sponsorship: answered_yes(form.requires_future_sponsorship),
        immigration_certified: form.immigration_certified,
    }
}

/// Build the row handed to the store from the finished form.
///
/// The immigration block is attached only for USA postings; for every other country the
/// record carries no immigration keys at all, not a block of `false` defaults.
pub fn assemble(
    job: &Job,
    identity: &Identity,
    form: &ApplicationForm,
    resume_url: Option<String>,
) -> NewApplication {
    let immigration = job
        .location_country
        .is_usa()
        .then(|| immigration_details(form));

    let race_ethnicity = if form.race_ethnicity.is_empty() {
        None
    } else {
        Some(form.race_ethnicity.clone())
    };

    NewApplication {
        job_id: job.id.clone(),
        user_id: Some(identity.id.clone()),
        full_name: form.full_name.trim().to_string(),
        email: form.email.trim().to_string(),
        phone: optional_text(&form.phone),
        current_location: optional_text(&form.current_location),
        linkedin_url: optional_text(&form.linkedin_url),
        portfolio_url: optional_text(&form.portfolio_url),
        github_url: optional_text(&form.github_url),
        resume_url,
        cover_letter: optional_text(&form.cover_letter),
        years_experience: form.years_experience.map(|band| band.years()),
        current_company: optional_text(&form.current_company),
        current_title: optional_text(&form.current_title),
        expected_salary: optional_text(&form.expected_salary),
        notice_period: form.notice_period,
        preferred_start_date: form.preferred_start_date,
        how_did_you_hear: form.how_did_you_hear,
        immigration,
        self_identification: SelfIdentification {
            gender: form.gender,
            gender_self_describe: optional_text(&form.gender_self_describe),
            race_ethnicity,
            has_disability: form.has_disability,
            is_veteran: form.is_veteran,
            eeo_acknowledged: form.eeo_acknowledged,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::careers::applications::domain::{ExperienceBand, VisaStatus};
    use crate::careers::domain::{JobId, LocationCountry};
    use chrono::Utc;

    fn job(country: LocationCountry) -> Job {
        let now = Utc::now();
        Job {
            id: JobId("7".to_string()),
            title: "Cloud Architect".to_string(),
            department: "Cloud".to_string(),
            location: "Dallas, TX".to_string(),
            location_country: country,
            employment_type: "Full-time".to_string(),
            description: "Design platforms".to_string(),
            full_description: None,
            requirements: Vec::new(),
            responsibilities: Vec::new(),
            salary_range: None,
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }

    fn form() -> ApplicationForm {
        ApplicationForm::default()
            .with_full_name(" Maya Iyer ")
            .with_email("maya@example.com")
            .with_phone("555-0100")
            .with_linkedin_url("  ")
            .with_years_experience(ExperienceBand::TenToFifteen)
            .with_work_authorization(Answer::Yes)
            .with_requires_sponsorship(Answer::No)
            .with_visa_status(VisaStatus::H1b)
            .with_h1b_history(Answer::Yes)
            .with_j1_history(Answer::No)
            .with_i140_filed(Answer::No)
            .with_future_sponsorship(Answer::Yes)
            .with_immigration_certified(true)
            .with_eeo_acknowledged(true)
    }

    #[test]
    fn usa_records_carry_boolean_immigration_block() {
        let identity = Identity::new("user-3");
        let record = assemble(&job(LocationCountry::Usa), &identity, &form(), None);

        let immigration = record.immigration.expect("usa jobs carry immigration");
        assert!(immigration.is_authorized_usa);
        assert!(!immigration.requires_sponsorship);
        assert!(immigration.has_h1b_history);
        assert!(!immigration.requires_cpt);
        assert!(immigration.requires_future_sponsorship);
        assert_eq!(immigration.visa_status, Some(VisaStatus::H1b));
    }

    #[test]
    fn india_records_omit_immigration_keys() {
        let identity = Identity::new("user-3");
        let record = assemble(&job(LocationCountry::India), &identity, &form(), None);
        assert!(record.immigration.is_none());

        let encoded = serde_json::to_value(&record).expect("serializes");
        let object = encoded.as_object().expect("record is an object");
        for key in [
            "is_authorized_usa",
            "requires_sponsorship",
            "visa_status",
            "has_h1b_history",
            "immigration_certified",
        ] {
            assert!(!object.contains_key(key), "unexpected key {key}");
        }
    }

    #[test]
    fn blank_strings_are_omitted_and_text_trimmed() {
        let identity = Identity::new("user-3");
        let record = assemble(
            &job(LocationCountry::India),
            &identity,
            &form(),
            Some("https://files/cv.pdf".to_string()),
        );

        assert_eq!(record.full_name, "Maya Iyer");
        assert_eq!(record.linkedin_url, None);
        assert_eq!(record.years_experience, Some(10));
        assert_eq!(record.user_id.as_deref(), Some("user-3"));
        assert_eq!(record.resume_url.as_deref(), Some("https://files/cv.pdf"));
        assert!(record.self_identification.race_ethnicity.is_none());
        assert!(record.self_identification.eeo_acknowledged);
    }
}
