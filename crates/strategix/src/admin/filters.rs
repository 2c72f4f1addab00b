use serde::{Deserialize, Deserializer, Serialize};

use crate::careers::applications::ApplicationStatus;
use crate::careers::domain::LocationCountry;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CountryFilter {
    #[default]
    All,
    Usa,
    India,
}

impl CountryFilter {
    pub fn matches(self, country: LocationCountry) -> bool {
        match self {
            CountryFilter::All => true,
            CountryFilter::Usa => country == LocationCountry::Usa,
            CountryFilter::India => country == LocationCountry::India,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivityFilter {
    #[default]
    All,
    Active,
    Inactive,
}

impl ActivityFilter {
    pub fn matches(self, is_active: bool) -> bool {
        match self {
            ActivityFilter::All => true,
            ActivityFilter::Active => is_active,
            ActivityFilter::Inactive => !is_active,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PublicationFilter {
    #[default]
    All,
    Published,
    Draft,
}

impl PublicationFilter {
    pub fn matches(self, is_published: bool) -> bool {
        match self {
            PublicationFilter::All => true,
            PublicationFilter::Published => is_published,
            PublicationFilter::Draft => !is_published,
        }
    }
}

/// `all` (or absent) disables the filter; any other value must name a status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatusFilter(pub Option<ApplicationStatus>);

impl StatusFilter {
    pub fn matches(self, status: ApplicationStatus) -> bool {
        self.0.map_or(true, |wanted| wanted == status)
    }
}

impl<'de> Deserialize<'de> for StatusFilter {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("all") {
            return Ok(Self(None));
        }
        ApplicationStatus::parse(trimmed)
            .map(|status| Self(Some(status)))
            .ok_or_else(|| serde::de::Error::custom(format!("unknown status '{trimmed}'")))
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct JobFilters {
    pub country: CountryFilter,
    pub activity: ActivityFilter,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ApplicationFilters {
    pub country: CountryFilter,
    pub status: StatusFilter,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ArticleFilters {
    pub status: PublicationFilter,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn status_filter_accepts_all_and_labels() {
        let all: StatusFilter = serde_json::from_value(json!("all")).expect("parses");
        assert_eq!(all, StatusFilter(None));
        let hired: StatusFilter = serde_json::from_value(json!("hired")).expect("parses");
        assert!(hired.matches(ApplicationStatus::Hired));
        assert!(!hired.matches(ApplicationStatus::Pending));
        assert!(serde_json::from_value::<StatusFilter>(json!("archived")).is_err());
    }

    #[test]
    fn missing_filters_default_to_all() {
        let filters: ApplicationFilters = serde_json::from_value(json!({})).expect("parses");
        assert_eq!(filters.country, CountryFilter::All);
        assert_eq!(filters.status, StatusFilter(None));

        let jobs: JobFilters =
            serde_json::from_value(json!({"country": "usa", "activity": "inactive"}))
                .expect("parses");
        assert!(jobs.country.matches(LocationCountry::Usa));
        assert!(!jobs.country.matches(LocationCountry::India));
        assert!(jobs.activity.matches(false));
    }
}
