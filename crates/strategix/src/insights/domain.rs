use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ArticleId(pub String);

impl std::fmt::Display for ArticleId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Editorial categories offered by the article editor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ArticleCategory {
    #[serde(rename = "AI Strategy")]
    AiStrategy,
    #[serde(rename = "Cloud Infrastructure")]
    CloudInfrastructure,
    #[serde(rename = "Cybersecurity")]
    Cybersecurity,
    #[serde(rename = "Automation")]
    Automation,
    #[serde(rename = "Data & Analytics")]
    DataAnalytics,
    #[serde(rename = "Digital Transformation")]
    DigitalTransformation,
    #[serde(rename = "Industry Insights")]
    IndustryInsights,
}

impl ArticleCategory {
    pub const ALL: [ArticleCategory; 7] = [
        ArticleCategory::AiStrategy,
        ArticleCategory::CloudInfrastructure,
        ArticleCategory::Cybersecurity,
        ArticleCategory::Automation,
        ArticleCategory::DataAnalytics,
        ArticleCategory::DigitalTransformation,
        ArticleCategory::IndustryInsights,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            ArticleCategory::AiStrategy => "AI Strategy",
            ArticleCategory::CloudInfrastructure => "Cloud Infrastructure",
            ArticleCategory::Cybersecurity => "Cybersecurity",
            ArticleCategory::Automation => "Automation",
            ArticleCategory::DataAnalytics => "Data & Analytics",
            ArticleCategory::DigitalTransformation => "Digital Transformation",
            ArticleCategory::IndustryInsights => "Industry Insights",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|category| category.label().eq_ignore_ascii_case(raw.trim()))
    }
}

/// Icon identifiers understood by the site front end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ArticleIcon {
    #[serde(rename = "faBrain")]
    Brain,
    #[serde(rename = "faCloud")]
    Cloud,
    #[serde(rename = "faShieldHalved")]
    ShieldHalved,
    #[serde(rename = "faRobot")]
    Robot,
    #[serde(rename = "faDatabase")]
    Database,
    #[serde(rename = "faChartLine")]
    ChartLine,
    #[serde(rename = "faCode")]
    Code,
    #[serde(rename = "faLightbulb")]
    Lightbulb,
}

impl ArticleIcon {
    pub const ALL: [ArticleIcon; 8] = [
        ArticleIcon::Brain,
        ArticleIcon::Cloud,
        ArticleIcon::ShieldHalved,
        ArticleIcon::Robot,
        ArticleIcon::Database,
        ArticleIcon::ChartLine,
        ArticleIcon::Code,
        ArticleIcon::Lightbulb,
    ];

    pub const fn identifier(self) -> &'static str {
        match self {
            ArticleIcon::Brain => "faBrain",
            ArticleIcon::Cloud => "faCloud",
            ArticleIcon::ShieldHalved => "faShieldHalved",
            ArticleIcon::Robot => "faRobot",
            ArticleIcon::Database => "faDatabase",
            ArticleIcon::ChartLine => "faChartLine",
            ArticleIcon::Code => "faCode",
            ArticleIcon::Lightbulb => "faLightbulb",
        }
    }

    /// Map a stored identifier onto the icon set; unknown names fall back to the brain.
    pub fn resolve(identifier: &str) -> Self {
        Self::ALL
            .into_iter()
            .find(|icon| icon.identifier() == identifier)
            .unwrap_or(ArticleIcon::Brain)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Article {
    pub id: ArticleId,
    pub slug: String,
    pub title: String,
    pub excerpt: String,
    pub content: String,
    pub category: ArticleCategory,
    pub published_date: NaiveDate,
    pub read_time: String,
    pub icon: String,
    pub featured: bool,
    pub is_published: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Article {
    pub fn icon(&self) -> ArticleIcon {
        ArticleIcon::resolve(&self.icon)
    }
}

/// Editor payload. An empty slug is derived from the title on save.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArticleDraft {
    pub slug: String,
    pub title: String,
    pub excerpt: String,
    pub content: String,
    pub category: ArticleCategory,
    pub published_date: NaiveDate,
    pub read_time: String,
    pub icon: String,
    pub featured: bool,
    pub is_published: bool,
}

impl Default for ArticleDraft {
    fn default() -> Self {
        Self {
            slug: String::new(),
            title: String::new(),
            excerpt: String::new(),
            content: String::new(),
            category: ArticleCategory::AiStrategy,
            published_date: Utc::now().date_naive(),
            read_time: "5 min read".to_string(),
            icon: ArticleIcon::Brain.identifier().to_string(),
            featured: false,
            is_published: true,
        }
    }
}

impl ArticleDraft {
    pub fn resolved_slug(&self) -> String {
        let supplied = self.slug.trim();
        if supplied.is_empty() {
            slugify(&self.title)
        } else {
            supplied.to_string()
        }
    }

    pub fn with_resolved_slug(mut self) -> Self {
        self.slug = self.resolved_slug();
        self
    }
}

/// Lowercase the title, collapse every run of non `[a-z0-9]` characters into a single
/// dash, and trim dashes from both ends.
pub fn slugify(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    let mut pending_dash = false;

    for ch in title.to_lowercase().chars() {
        if ch.is_ascii_lowercase() || ch.is_ascii_digit() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(ch);
        } else {
            pending_dash = true;
        }
    }

    slug
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slugify_collapses_punctuation_runs() {
        assert_eq!(
            slugify("The Future of Enterprise AI: Trends to Watch in 2025"),
            "the-future-of-enterprise-ai-trends-to-watch-in-2025"
        );
        assert_eq!(slugify("  --Zero Trust!!  "), "zero-trust");
        assert_eq!(slugify("Café & Cloud"), "caf-cloud");
        assert_eq!(slugify("???"), "");
    }

    #[test]
    fn draft_defaults_match_editor() {
        let draft = ArticleDraft::default();
        assert_eq!(draft.category, ArticleCategory::AiStrategy);
        assert_eq!(draft.read_time, "5 min read");
        assert_eq!(draft.icon, "faBrain");
        assert!(draft.is_published);
        assert!(!draft.featured);
    }

    #[test]
    fn supplied_slug_wins_over_title() {
        let draft = ArticleDraft {
            slug: "custom-slug".to_string(),
            title: "Another Title".to_string(),
            ..ArticleDraft::default()
        };
        assert_eq!(draft.resolved_slug(), "custom-slug");

        let derived = ArticleDraft {
            title: "Zero Trust in Practice".to_string(),
            ..ArticleDraft::default()
        };
        assert_eq!(derived.with_resolved_slug().slug, "zero-trust-in-practice");
    }

    #[test]
    fn unknown_icons_resolve_to_brain() {
        assert_eq!(ArticleIcon::resolve("faCloud"), ArticleIcon::Cloud);
        assert_eq!(ArticleIcon::resolve("faUnicorn"), ArticleIcon::Brain);
    }

    #[test]
    fn categories_serialize_with_display_labels() {
        let encoded = serde_json::to_value(ArticleCategory::DataAnalytics).expect("serializes");
        assert_eq!(encoded, serde_json::json!("Data & Analytics"));
        assert_eq!(
            ArticleCategory::parse("cybersecurity"),
            Some(ArticleCategory::Cybersecurity)
        );
    }
}
