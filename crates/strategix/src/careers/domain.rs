use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Identifier wrapper for job postings.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobId(pub String);

impl JobId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for JobId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Country discriminant of a posting. Decides the intake step count and which
/// validation gates apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LocationCountry {
    Usa,
    India,
}

impl LocationCountry {
    pub const fn label(self) -> &'static str {
        match self {
            LocationCountry::Usa => "usa",
            LocationCountry::India => "india",
        }
    }

    pub const fn is_usa(self) -> bool {
        matches!(self, LocationCountry::Usa)
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "usa" => Some(LocationCountry::Usa),
            "india" => Some(LocationCountry::India),
            _ => None,
        }
    }
}

/// Employment types offered by the admin job editor.
pub const EMPLOYMENT_TYPES: [&str; 5] = ["Full-time", "Part-time", "Contract", "Internship", "Remote"];

/// A published (or draft) job posting as stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Job {
    pub id: JobId,
    pub title: String,
    pub department: String,
    pub location: String,
    pub location_country: LocationCountry,
    #[serde(rename = "type")]
    pub employment_type: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_description: Option<String>,
    pub requirements: Vec<String>,
    pub responsibilities: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub salary_range: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Job {
    pub fn summary(&self) -> JobSummary {
        JobSummary {
            id: self.id.clone(),
            title: self.title.clone(),
            department: self.department.clone(),
            location: self.location.clone(),
            location_country: self.location_country,
        }
    }
}

/// The slice of a job joined onto application listings and intake views.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobSummary {
    pub id: JobId,
    pub title: String,
    pub department: String,
    pub location: String,
    pub location_country: LocationCountry,
}

/// Editable fields of a posting; the store owns id and timestamps.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobDraft {
    pub title: String,
    pub department: String,
    pub location: String,
    pub location_country: LocationCountry,
    #[serde(rename = "type", default = "default_employment_type")]
    pub employment_type: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_description: Option<String>,
    #[serde(default, deserialize_with = "lines_or_list")]
    pub requirements: Vec<String>,
    #[serde(default, deserialize_with = "lines_or_list")]
    pub responsibilities: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub salary_range: Option<String>,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

fn default_employment_type() -> String {
    EMPLOYMENT_TYPES[0].to_string()
}

fn default_active() -> bool {
    true
}

/// The editor submits list fields as one newline separated text area; API clients may
/// send a JSON array instead.
fn lines_or_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum LinesOrList {
        Text(String),
        List(Vec<String>),
    }

    Ok(match LinesOrList::deserialize(deserializer)? {
        LinesOrList::Text(text) => JobDraft::split_lines(&text),
        LinesOrList::List(items) => items,
    })
}

impl JobDraft {
    /// Split a newline separated editor field into trimmed, non-empty entries.
    pub fn split_lines(text: &str) -> Vec<String> {
        text.lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect()
    }

    /// Normalise list entries and blank optional text the way the editor submits them.
    pub fn normalized(mut self) -> Self {
        self.requirements = Self::split_lines(&self.requirements.join("\n"));
        self.responsibilities = Self::split_lines(&self.responsibilities.join("\n"));
        self.full_description = self
            .full_description
            .filter(|text| !text.trim().is_empty());
        self.salary_range = self.salary_range.filter(|text| !text.trim().is_empty());
        self
    }
}
