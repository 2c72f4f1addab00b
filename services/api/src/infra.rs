use chrono::NaiveDate;
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use strategix::admin::{AdminAuthenticator, AdminService};
use strategix::careers::applications::IntakeService;
use strategix::careers::{CareersCatalog, JobDraft, LocationCountry};
use strategix::config::AppConfig;
use strategix::contact::TracingNotifier;
use strategix::insights::{ArticleCategory, ArticleDraft, ArticleIcon, InsightsCatalog};
use strategix::store::{ArticleStore, InMemoryResumeStorage, InMemoryStore, JobStore, StoreError};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Every service the site exposes, sharing one in-memory store.
pub(crate) struct SiteServices {
    pub(crate) store: Arc<InMemoryStore>,
    pub(crate) careers: Arc<CareersCatalog<InMemoryStore>>,
    pub(crate) intake: Arc<IntakeService<InMemoryStore, InMemoryResumeStorage>>,
    pub(crate) insights: Arc<InsightsCatalog<InMemoryStore>>,
    pub(crate) admin: Arc<AdminService<InMemoryStore>>,
    pub(crate) authenticator: Arc<AdminAuthenticator>,
    pub(crate) contact: Arc<TracingNotifier>,
}

pub(crate) fn build_services(config: &AppConfig, store: Arc<InMemoryStore>) -> SiteServices {
    let files = Arc::new(InMemoryResumeStorage::new(config.storage.clone()));
    SiteServices {
        careers: Arc::new(CareersCatalog::new(store.clone())),
        intake: Arc::new(IntakeService::new(store.clone(), files)),
        insights: Arc::new(InsightsCatalog::new(store.clone())),
        admin: Arc::new(AdminService::new(store.clone())),
        authenticator: Arc::new(AdminAuthenticator::new(config.admin.clone())),
        contact: Arc::new(TracingNotifier),
        store,
    }
}

pub(crate) fn demo_job(title: &str, country: LocationCountry) -> JobDraft {
    let (department, location, salary) = match country {
        LocationCountry::Usa => ("AI Strategy", "Austin, TX (Hybrid)", "$145,000 - $175,000"),
        LocationCountry::India => ("Data Engineering", "Hyderabad, Telangana", "INR 28 - 36 LPA"),
    };

    JobDraft {
        title: title.to_string(),
        department: department.to_string(),
        location: location.to_string(),
        location_country: country,
        employment_type: "Full-time".to_string(),
        description: format!("Join the {department} practice as a {title}."),
        full_description: None,
        requirements: vec![
            "5+ years of client-facing delivery".to_string(),
            "Hands-on experience with cloud data platforms".to_string(),
        ],
        responsibilities: vec![
            "Run discovery workshops with client stakeholders".to_string(),
            "Turn roadmaps into shipped pilots".to_string(),
        ],
        salary_range: Some(salary.to_string()),
        is_active: true,
    }
}

/// Jobs and articles served in development so every page has content.
pub(crate) fn seed_demo_content(store: &InMemoryStore) -> Result<(), StoreError> {
    store.create_job(demo_job("Senior AI Consultant", LocationCountry::Usa))?;
    store.create_job(demo_job("Cloud Solutions Architect", LocationCountry::Usa))?;
    store.create_job(demo_job("Data Engineer", LocationCountry::India))?;

    let published_date = NaiveDate::from_ymd_opt(2025, 3, 4).unwrap_or_default();
    store.create_article(ArticleDraft {
        title: "Building an AI Strategy That Survives Contact With Production".to_string(),
        excerpt: "Why most AI pilots stall, and the four habits of teams that ship.".to_string(),
        content: [
            "## Start from the decision, not the model",
            "",
            "Every successful program we have run began with a **named business decision**.",
            "",
            "1. **Pick one workflow** and measure it before touching a model.",
            "2. **Own the data contract** with the team that produces it.",
            "",
            "- Budget for evaluation",
            "- Budget for change management",
        ]
        .join("\n"),
        featured: true,
        published_date,
        ..ArticleDraft::default()
    })?;
    store.create_article(ArticleDraft {
        title: "Cloud Cost Guardrails for Data Teams".to_string(),
        excerpt: "Practical FinOps controls that do not slow analysts down.".to_string(),
        content: "### Tag everything\n\nUntagged spend is **unowned** spend.".to_string(),
        category: ArticleCategory::CloudInfrastructure,
        icon: ArticleIcon::Cloud.identifier().to_string(),
        read_time: "7 min read".to_string(),
        published_date,
        ..ArticleDraft::default()
    })?;
    store.create_article(ArticleDraft {
        title: "Zero Trust Roadmap (Draft)".to_string(),
        category: ArticleCategory::Cybersecurity,
        icon: ArticleIcon::ShieldHalved.identifier().to_string(),
        is_published: false,
        ..ArticleDraft::default()
    })?;

    Ok(())
}

pub(crate) fn parse_country(raw: &str) -> Result<LocationCountry, String> {
    LocationCountry::parse(raw)
        .ok_or_else(|| format!("unknown country '{raw}' (expected usa or india)"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seed_creates_jobs_and_articles() {
        let store = InMemoryStore::new();
        seed_demo_content(&store).expect("seeded");
        assert_eq!(store.jobs().expect("jobs").len(), 3);
        let articles = store.articles().expect("articles");
        assert_eq!(articles.len(), 3);
        assert_eq!(
            articles.iter().filter(|article| article.is_published).count(),
            2
        );
    }

    #[test]
    fn country_parser_rejects_unknown_values() {
        assert_eq!(parse_country(" USA "), Ok(LocationCountry::Usa));
        assert!(parse_country("canada").is_err());
    }
}
