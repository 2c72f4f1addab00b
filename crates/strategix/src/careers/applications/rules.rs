//! Per-step validation expressed as a rule table.
//!
//! Each step kind owns an ordered list of rules. A rule is a gate (does the rule apply to
//! the current answers) plus a check (is the requirement met). Failures are reported in
//! table order so applicants always see the full list, top to bottom.

use std::sync::OnceLock;

use regex::Regex;

use super::domain::{Answer, VisaStatus};
use super::form::ApplicationForm;
use super::steps::{IntakeStep, StepPlan};
use crate::careers::domain::LocationCountry;

/// Which answers must be present for a rule to be evaluated at all.
#[derive(Debug, Clone, Copy)]
pub(crate) enum Gate {
    Always,
    EmailEntered,
    VisaStatusIn(&'static [VisaStatus]),
    J1HistoryIs(Answer),
}

impl Gate {
    fn applies(self, form: &ApplicationForm) -> bool {
        match self {
            Gate::Always => true,
            Gate::EmailEntered => !form.email.is_empty(),
            Gate::VisaStatusIn(statuses) => form
                .visa_status
                .map(|status| statuses.contains(&status))
                .unwrap_or(false),
            Gate::J1HistoryIs(answer) => form.has_j1_history == Some(answer),
        }
    }
}

#[derive(Clone, Copy)]
pub(crate) struct Rule {
    pub(crate) gate: Gate,
    pub(crate) satisfied: fn(&ApplicationForm) -> bool,
    pub(crate) message: &'static str,
}

impl Rule {
    const fn new(
        gate: Gate,
        satisfied: fn(&ApplicationForm) -> bool,
        message: &'static str,
    ) -> Self {
        Self {
            gate,
            satisfied,
            message,
        }
    }

    fn violated_by(&self, form: &ApplicationForm) -> bool {
        self.gate.applies(form) && !(self.satisfied)(form)
    }
}

const OTHER_VISA: &[VisaStatus] = &[VisaStatus::Other];

const BASIC_INFO_RULES: &[Rule] = &[
    Rule::new(Gate::Always, |form| !form.full_name.trim().is_empty(), "Full name is required"),
    Rule::new(Gate::Always, |form| !form.email.trim().is_empty(), "Email address is required"),
    Rule::new(
        Gate::EmailEntered,
        |form| is_valid_email(&form.email),
        "Please enter a valid email address",
    ),
    Rule::new(Gate::Always, |form| !form.phone.trim().is_empty(), "Phone number is required"),
    Rule::new(
        Gate::Always,
        |form| form.resume.as_ref().is_some_and(|resume| !resume.bytes.is_empty()),
        "Please upload your resume/CV",
    ),
    Rule::new(
        Gate::Always,
        |form| form.years_experience.is_some(),
        "Years of experience is required",
    ),
];

const IMMIGRATION_RULES: &[Rule] = &[
    Rule::new(
        Gate::Always,
        |form| form.is_authorized_usa.is_some(),
        "Work authorization status is required",
    ),
    Rule::new(
        Gate::Always,
        |form| form.requires_sponsorship.is_some(),
        "Sponsorship requirement is required",
    ),
    Rule::new(
        Gate::Always,
        |form| form.visa_status.is_some(),
        "Current visa status is required",
    ),
    Rule::new(
        Gate::VisaStatusIn(OTHER_VISA),
        |form| !form.visa_status_other.trim().is_empty(),
        "Please specify your visa status",
    ),
    Rule::new(
        Gate::VisaStatusIn(&VisaStatus::STUDENT),
        |form| form.requires_cpt.is_some(),
        "CPT requirement is required",
    ),
    Rule::new(
        Gate::VisaStatusIn(&VisaStatus::STUDENT),
        |form| form.is_stem_degree.is_some(),
        "STEM degree status is required",
    ),
    Rule::new(
        Gate::Always,
        |form| form.has_h1b_history.is_some(),
        "H-1B history is required",
    ),
    Rule::new(
        Gate::Always,
        |form| form.has_j1_history.is_some(),
        "J-1 history is required",
    ),
    Rule::new(
        Gate::J1HistoryIs(Answer::Yes),
        |form| form.is_subject_to_212e.is_some(),
        "212(e) requirement status is required",
    ),
    Rule::new(
        Gate::Always,
        |form| form.has_i140_filed.is_some(),
        "I-140 status is required",
    ),
    Rule::new(
        Gate::Always,
        |form| form.requires_future_sponsorship.is_some(),
        "Future sponsorship requirement is required",
    ),
    Rule::new(
        Gate::Always,
        |form| form.immigration_certified,
        "You must certify that your immigration information is accurate",
    ),
];

const SELF_IDENTIFICATION_RULES: &[Rule] = &[Rule::new(
    Gate::Always,
    |form| form.eeo_acknowledged,
    "You must acknowledge the voluntary self-identification notice",
)];

/// Rules attached to a step kind. Review has none: it submits rather than advances.
pub(crate) fn rules_for(step: IntakeStep) -> &'static [Rule] {
    match step {
        IntakeStep::BasicInfo => BASIC_INFO_RULES,
        IntakeStep::Immigration => IMMIGRATION_RULES,
        IntakeStep::SelfIdentification => SELF_IDENTIFICATION_RULES,
        IntakeStep::Review => &[],
    }
}

/// Validate one step of the wizard for a job in `country`.
///
/// Returns every failed requirement in display order; an empty list means the applicant
/// may advance. Indices outside the plan validate as empty.
pub fn validate_step(
    form: &ApplicationForm,
    country: LocationCountry,
    step: usize,
) -> Vec<String> {
    let plan = StepPlan::for_country(country);
    match plan.step_at(step) {
        Some(kind) => validate_kind(form, kind),
        None => Vec::new(),
    }
}

pub(crate) fn validate_kind(form: &ApplicationForm, kind: IntakeStep) -> Vec<String> {
    rules_for(kind)
        .iter()
        .filter(|rule| rule.violated_by(form))
        .map(|rule| rule.message.to_string())
        .collect()
}

fn email_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern compiles")
    })
}

/// `local@domain.tld` shape check shared by intake and the contact form.
pub fn is_valid_email(candidate: &str) -> bool {
    email_pattern().is_match(candidate)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_shape_requires_domain_dot() {
        assert!(is_valid_email("ravi@nextzen.ai"));
        assert!(!is_valid_email("ravi@nextzen"));
        assert!(!is_valid_email("ravi nextzen@ai.com"));
        assert!(!is_valid_email("@nextzen.ai"));
    }

    #[test]
    fn review_step_has_no_rules() {
        assert!(rules_for(IntakeStep::Review).is_empty());
    }

    #[test]
    fn whitespace_email_reports_required_and_invalid() {
        let form = ApplicationForm::default().with_email("   ");
        let errors = validate_kind(&form, IntakeStep::BasicInfo);
        assert!(errors.contains(&"Email address is required".to_string()));
        assert!(errors.contains(&"Please enter a valid email address".to_string()));
    }

    #[test]
    fn empty_email_only_reports_required() {
        let errors = validate_kind(&ApplicationForm::default(), IntakeStep::BasicInfo);
        assert!(errors.contains(&"Email address is required".to_string()));
        assert!(!errors.contains(&"Please enter a valid email address".to_string()));
    }
}
