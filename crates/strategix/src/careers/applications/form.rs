use std::fmt;

use chrono::NaiveDate;
use serde::de::value::StringDeserializer;
use serde::de::IntoDeserializer;
use serde::{Deserialize, Deserializer, Serialize};

use super::domain::{
    Answer, DisabilityStatus, ExperienceBand, Gender, NoticePeriod, RaceEthnicity,
    ReferralSource, VeteranStatus, VisaStatus,
};

/// Resume file attached in the basic-info step. Travels as base64 on the wire.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResumeAttachment {
    pub file_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,
    #[serde(rename = "content_base64", with = "base64_bytes")]
    pub bytes: Vec<u8>,
}

impl ResumeAttachment {
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: None,
            bytes,
        }
    }

    /// Extension after the last dot, or the whole name when there is none.
    pub fn extension(&self) -> &str {
        self.file_name
            .rsplit('.')
            .next()
            .unwrap_or(self.file_name.as_str())
    }

    pub fn resolved_content_type(&self) -> mime::Mime {
        self.content_type
            .as_deref()
            .and_then(|raw| raw.parse::<mime::Mime>().ok())
            .unwrap_or_else(|| mime_guess::from_path(&self.file_name).first_or_octet_stream())
    }
}

impl fmt::Debug for ResumeAttachment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResumeAttachment")
            .field("file_name", &self.file_name)
            .field("content_type", &self.content_type)
            .field("len", &self.bytes.len())
            .finish()
    }
}

mod base64_bytes {
    use base64::engine::general_purpose::STANDARD;
    use base64::Engine;
    use serde::{Deserialize, Deserializer, Serializer};

    pub(super) fn serialize<S>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&STANDARD.encode(bytes))
    }

    pub(super) fn deserialize<'de, D>(deserializer: D) -> Result<Vec<u8>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        STANDARD
            .decode(raw.trim())
            .map_err(serde::de::Error::custom)
    }
}

/// An unselected select or radio group arrives as `""`; treat it as no answer so the
/// step rules report it.
fn empty_as_none<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => {
            let value: StringDeserializer<D::Error> = value.to_string().into_deserializer();
            T::deserialize(value).map(Some)
        }
    }
}

/// Everything the applicant has entered so far, across all steps.
///
/// The form is an owned value: setters consume it and hand back the updated copy, so
/// validation only ever sees a snapshot and cannot mutate what it inspects.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApplicationForm {
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub current_location: String,
    pub linkedin_url: String,
    pub portfolio_url: String,
    pub github_url: String,
    #[serde(deserialize_with = "empty_as_none")]
    pub years_experience: Option<ExperienceBand>,
    pub current_company: String,
    pub current_title: String,
    pub expected_salary: String,
    #[serde(deserialize_with = "empty_as_none")]
    pub notice_period: Option<NoticePeriod>,
    #[serde(deserialize_with = "empty_as_none")]
    pub preferred_start_date: Option<NaiveDate>,
    #[serde(deserialize_with = "empty_as_none")]
    pub how_did_you_hear: Option<ReferralSource>,
    pub cover_letter: String,
    pub resume: Option<ResumeAttachment>,

    #[serde(deserialize_with = "empty_as_none")]
    pub is_authorized_usa: Option<Answer>,
    #[serde(deserialize_with = "empty_as_none")]
    pub requires_sponsorship: Option<Answer>,
    #[serde(deserialize_with = "empty_as_none")]
    pub visa_status: Option<VisaStatus>,
    pub visa_status_other: String,
    #[serde(deserialize_with = "empty_as_none")]
    pub requires_cpt: Option<Answer>,
    #[serde(deserialize_with = "empty_as_none")]
    pub is_stem_degree: Option<Answer>,
    #[serde(deserialize_with = "empty_as_none")]
    pub opt_expiration_date: Option<NaiveDate>,
    #[serde(deserialize_with = "empty_as_none")]
    pub has_h1b_history: Option<Answer>,
    #[serde(deserialize_with = "empty_as_none")]
    pub has_j1_history: Option<Answer>,
    #[serde(deserialize_with = "empty_as_none")]
    pub is_subject_to_212e: Option<Answer>,
    #[serde(deserialize_with = "empty_as_none")]
    pub has_i140_filed: Option<Answer>,
    #[serde(deserialize_with = "empty_as_none")]
    pub requires_future_sponsorship: Option<Answer>,
    pub immigration_certified: bool,

    #[serde(deserialize_with = "empty_as_none")]
    pub gender: Option<Gender>,
    pub gender_self_describe: String,
    pub race_ethnicity: Vec<RaceEthnicity>,
    #[serde(deserialize_with = "empty_as_none")]
    pub has_disability: Option<DisabilityStatus>,
    #[serde(deserialize_with = "empty_as_none")]
    pub is_veteran: Option<VeteranStatus>,
    pub eeo_acknowledged: bool,
}

impl ApplicationForm {
    pub fn with_full_name(mut self, value: impl Into<String>) -> Self {
        self.full_name = value.into();
        self
    }

    pub fn with_email(mut self, value: impl Into<String>) -> Self {
        self.email = value.into();
        self
    }

    pub fn with_phone(mut self, value: impl Into<String>) -> Self {
        self.phone = value.into();
        self
    }

    pub fn with_current_location(mut self, value: impl Into<String>) -> Self {
        self.current_location = value.into();
        self
    }

    pub fn with_linkedin_url(mut self, value: impl Into<String>) -> Self {
        self.linkedin_url = value.into();
        self
    }

    pub fn with_portfolio_url(mut self, value: impl Into<String>) -> Self {
        self.portfolio_url = value.into();
        self
    }

    pub fn with_github_url(mut self, value: impl Into<String>) -> Self {
        self.github_url = value.into();
        self
    }

    pub fn with_years_experience(mut self, value: ExperienceBand) -> Self {
        self.years_experience = Some(value);
        self
    }

    pub fn with_current_company(mut self, value: impl Into<String>) -> Self {
        self.current_company = value.into();
        self
    }

    pub fn with_current_title(mut self, value: impl Into<String>) -> Self {
        self.current_title = value.into();
        self
    }

    pub fn with_expected_salary(mut self, value: impl Into<String>) -> Self {
        self.expected_salary = value.into();
        self
    }

    pub fn with_notice_period(mut self, value: NoticePeriod) -> Self {
        self.notice_period = Some(value);
        self
    }

    pub fn with_preferred_start_date(mut self, value: NaiveDate) -> Self {
        self.preferred_start_date = Some(value);
        self
    }

    pub fn with_how_did_you_hear(mut self, value: ReferralSource) -> Self {
        self.how_did_you_hear = Some(value);
        self
    }

    pub fn with_cover_letter(mut self, value: impl Into<String>) -> Self {
        self.cover_letter = value.into();
        self
    }

    pub fn with_resume(mut self, resume: ResumeAttachment) -> Self {
        self.resume = Some(resume);
        self
    }

    pub fn without_resume(mut self) -> Self {
        self.resume = None;
        self
    }

    pub fn with_work_authorization(mut self, value: Answer) -> Self {
        self.is_authorized_usa = Some(value);
        self
    }

    pub fn with_requires_sponsorship(mut self, value: Answer) -> Self {
        self.requires_sponsorship = Some(value);
        self
    }

    pub fn with_visa_status(mut self, value: VisaStatus) -> Self {
        self.visa_status = Some(value);
        self
    }

    pub fn with_visa_status_other(mut self, value: impl Into<String>) -> Self {
        self.visa_status_other = value.into();
        self
    }

    pub fn with_requires_cpt(mut self, value: Answer) -> Self {
        self.requires_cpt = Some(value);
        self
    }

    pub fn with_stem_degree(mut self, value: Answer) -> Self {
        self.is_stem_degree = Some(value);
        self
    }

    pub fn with_opt_expiration_date(mut self, value: NaiveDate) -> Self {
        self.opt_expiration_date = Some(value);
        self
    }

    pub fn with_h1b_history(mut self, value: Answer) -> Self {
        self.has_h1b_history = Some(value);
        self
    }

    pub fn with_j1_history(mut self, value: Answer) -> Self {
        self.has_j1_history = Some(value);
        self
    }

    pub fn with_subject_to_212e(mut self, value: Answer) -> Self {
        self.is_subject_to_212e = Some(value);
        self
    }

    pub fn with_i140_filed(mut self, value: Answer) -> Self {
        self.has_i140_filed = Some(value);
        self
    }

    pub fn with_future_sponsorship(mut self, value: Answer) -> Self {
        self.requires_future_sponsorship = Some(value);
        self
    }

    pub fn with_immigration_certified(mut self, value: bool) -> Self {
        self.immigration_certified = value;
        self
    }

    pub fn with_gender(mut self, value: Gender) -> Self {
        self.gender = Some(value);
        self
    }

    pub fn with_gender_self_describe(mut self, value: impl Into<String>) -> Self {
        self.gender_self_describe = value.into();
        self
    }

    /// Multi-select toggle: picking a selected entry again removes it.
    pub fn toggle_race_ethnicity(mut self, value: RaceEthnicity) -> Self {
        if let Some(position) = self.race_ethnicity.iter().position(|entry| *entry == value) {
            self.race_ethnicity.remove(position);
        } else {
            self.race_ethnicity.push(value);
        }
        self
    }

    pub fn with_disability(mut self, value: DisabilityStatus) -> Self {
        self.has_disability = Some(value);
        self
    }

    pub fn with_veteran_status(mut self, value: VeteranStatus) -> Self {
        self.is_veteran = Some(value);
        self
    }

    pub fn with_eeo_acknowledged(mut self, value: bool) -> Self {
        self.eeo_acknowledged = value;
        self
    }
}
