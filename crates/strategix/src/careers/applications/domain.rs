use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::careers::domain::JobId;

/// Identifier wrapper for submitted applications.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ApplicationId(pub String);

impl std::fmt::Display for ApplicationId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Review status. Only the admin surface moves an application between these.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApplicationStatus {
    Pending,
    Reviewing,
    Interviewed,
    Offered,
    Hired,
    Rejected,
}

impl ApplicationStatus {
    pub const ALL: [ApplicationStatus; 6] = [
        ApplicationStatus::Pending,
        ApplicationStatus::Reviewing,
        ApplicationStatus::Interviewed,
        ApplicationStatus::Offered,
        ApplicationStatus::Hired,
        ApplicationStatus::Rejected,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            ApplicationStatus::Pending => "pending",
            ApplicationStatus::Reviewing => "reviewing",
            ApplicationStatus::Interviewed => "interviewed",
            ApplicationStatus::Offered => "offered",
            ApplicationStatus::Hired => "hired",
            ApplicationStatus::Rejected => "rejected",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|status| status.label().eq_ignore_ascii_case(raw.trim()))
    }
}

/// Answer to a yes/no radio question. Absence (no selection) is modelled with `Option`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Answer {
    Yes,
    No,
}

impl Answer {
    pub const fn is_yes(self) -> bool {
        matches!(self, Answer::Yes)
    }
}

/// Experience bands offered by the intake form; the stored value is the band floor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExperienceBand {
    #[serde(rename = "0")]
    LessThanOne,
    #[serde(rename = "1")]
    OneToTwo,
    #[serde(rename = "3")]
    ThreeToFive,
    #[serde(rename = "6")]
    SixToTen,
    #[serde(rename = "10")]
    TenToFifteen,
    #[serde(rename = "15")]
    FifteenPlus,
}

impl ExperienceBand {
    pub const fn years(self) -> u8 {
        match self {
            ExperienceBand::LessThanOne => 0,
            ExperienceBand::OneToTwo => 1,
            ExperienceBand::ThreeToFive => 3,
            ExperienceBand::SixToTen => 6,
            ExperienceBand::TenToFifteen => 10,
            ExperienceBand::FifteenPlus => 15,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            ExperienceBand::LessThanOne => "Less than 1 year",
            ExperienceBand::OneToTwo => "1-2 years",
            ExperienceBand::ThreeToFive => "3-5 years",
            ExperienceBand::SixToTen => "6-10 years",
            ExperienceBand::TenToFifteen => "10-15 years",
            ExperienceBand::FifteenPlus => "15+ years",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NoticePeriod {
    #[serde(rename = "immediate")]
    Immediate,
    #[serde(rename = "1_week")]
    OneWeek,
    #[serde(rename = "2_weeks")]
    TwoWeeks,
    #[serde(rename = "1_month")]
    OneMonth,
    #[serde(rename = "2_months")]
    TwoMonths,
    #[serde(rename = "3_months")]
    ThreeMonths,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReferralSource {
    Linkedin,
    Indeed,
    Glassdoor,
    CompanyWebsite,
    Referral,
    JobFair,
    University,
    SocialMedia,
    Other,
}

/// Current U.S. immigration status as selected by the applicant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VisaStatus {
    #[serde(rename = "us_citizen")]
    UsCitizen,
    #[serde(rename = "permanent_resident")]
    PermanentResident,
    #[serde(rename = "f1_opt")]
    F1Opt,
    #[serde(rename = "f1_stem_opt")]
    F1StemOpt,
    #[serde(rename = "h1b")]
    H1b,
    #[serde(rename = "o1")]
    O1,
    #[serde(rename = "l1")]
    L1,
    #[serde(rename = "tn_e3")]
    TnE3,
    #[serde(rename = "other")]
    Other,
}

impl VisaStatus {
    pub const ALL: [VisaStatus; 9] = [
        VisaStatus::UsCitizen,
        VisaStatus::PermanentResident,
        VisaStatus::F1Opt,
        VisaStatus::F1StemOpt,
        VisaStatus::H1b,
        VisaStatus::O1,
        VisaStatus::L1,
        VisaStatus::TnE3,
        VisaStatus::Other,
    ];

    /// Student statuses that unlock the CPT and STEM-degree questions.
    pub const STUDENT: [VisaStatus; 2] = [VisaStatus::F1Opt, VisaStatus::F1StemOpt];

    pub const fn label(self) -> &'static str {
        match self {
            VisaStatus::UsCitizen => "U.S. Citizen",
            VisaStatus::PermanentResident => "Permanent Resident (Green Card)",
            VisaStatus::F1Opt => "F-1 (OPT)",
            VisaStatus::F1StemOpt => "F-1 (STEM OPT)",
            VisaStatus::H1b => "H-1B",
            VisaStatus::O1 => "O-1",
            VisaStatus::L1 => "L-1",
            VisaStatus::TnE3 => "TN / E-3",
            VisaStatus::Other => "Other",
        }
    }

    pub const fn code(self) -> &'static str {
        match self {
            VisaStatus::UsCitizen => "us_citizen",
            VisaStatus::PermanentResident => "permanent_resident",
            VisaStatus::F1Opt => "f1_opt",
            VisaStatus::F1StemOpt => "f1_stem_opt",
            VisaStatus::H1b => "h1b",
            VisaStatus::O1 => "o1",
            VisaStatus::L1 => "l1",
            VisaStatus::TnE3 => "tn_e3",
            VisaStatus::Other => "other",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Gender {
    Male,
    Female,
    NonBinary,
    SelfDescribe,
    PreferNotSay,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RaceEthnicity {
    HispanicLatino,
    White,
    Black,
    Asian,
    NativeHawaiian,
    AmericanIndian,
    TwoOrMore,
    PreferNotSay,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DisabilityStatus {
    Yes,
    No,
    PreferNotAnswer,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VeteranStatus {
    Yes,
    No,
    PreferNotSay,
}

/// USA-only immigration block. Present on a record only when the job is in the USA.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImmigrationDetails {
    pub is_authorized_usa: bool,
    pub requires_sponsorship: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visa_status: Option<VisaStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visa_status_other: Option<String>,
    pub requires_cpt: bool,
    pub is_stem_degree: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub opt_expiration_date: Option<NaiveDate>,
    pub has_h1b_history: bool,
    pub has_j1_history: bool,
    pub is_subject_to_212e: bool,
    pub has_i140_filed: bool,
    pub requires_future_sponsorship: bool,
    pub immigration_certified: bool,
}

/// Voluntary EEO self-identification. Only the acknowledgment is mandatory.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelfIdentification {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender: Option<Gender>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender_self_describe: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub race_ethnicity: Option<Vec<RaceEthnicity>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub has_disability: Option<DisabilityStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_veteran: Option<VeteranStatus>,
    #[serde(default)]
    pub eeo_acknowledged: bool,
}

/// Assembled application handed to the store's create operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewApplication {
    pub job_id: JobId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    pub full_name: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub linkedin_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub portfolio_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub github_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resume_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover_letter: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub years_experience: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_company: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expected_salary: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notice_period: Option<NoticePeriod>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preferred_start_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub how_did_you_hear: Option<ReferralSource>,
    #[serde(flatten)]
    pub immigration: Option<ImmigrationDetails>,
    #[serde(flatten)]
    pub self_identification: SelfIdentification,
}

/// Stored application row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicationRecord {
    pub id: ApplicationId,
    #[serde(flatten)]
    pub application: NewApplication,
    pub status: ApplicationStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ApplicationRecord {
    pub fn existing(&self) -> ExistingApplication {
        ExistingApplication {
            id: self.id.clone(),
            created_at: self.created_at,
            status: self.status,
        }
    }
}

/// What the duplicate-application guard reports back to the applicant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExistingApplication {
    pub id: ApplicationId,
    pub created_at: DateTime<Utc>,
    pub status: ApplicationStatus,
}
