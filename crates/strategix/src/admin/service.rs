use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use serde::Serialize;

use super::filters::{ApplicationFilters, ArticleFilters, CountryFilter, JobFilters};
use crate::careers::applications::{ApplicationId, ApplicationRecord, ApplicationStatus};
use crate::careers::domain::{Job, JobDraft, JobId, JobSummary};
use crate::insights::domain::{Article, ArticleDraft, ArticleId};
use crate::store::{ApplicationStore, ArticleStore, JobStore, StoreError};

/// Application row joined with the posting it was filed against.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AdminApplicationView {
    #[serde(flatten)]
    pub record: ApplicationRecord,
    pub job: Option<JobSummary>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DashboardCounters {
    pub jobs_total: usize,
    pub jobs_active: usize,
    pub articles_total: usize,
    pub articles_published: usize,
    pub articles_featured: usize,
    pub applications_total: usize,
    pub applications_by_status: BTreeMap<&'static str, usize>,
}

#[derive(Debug, thiserror::Error)]
pub enum AdminError {
    #[error("{0} not found")]
    NotFound(&'static str),
    #[error("failed to export applications: {0}")]
    Export(String),
    #[error(transparent)]
    Store(StoreError),
}

impl AdminError {
    fn from_store(entity: &'static str) -> impl FnOnce(StoreError) -> AdminError {
        move |error| match error {
            StoreError::NotFound => AdminError::NotFound(entity),
            other => AdminError::Store(other),
        }
    }
}

impl From<StoreError> for AdminError {
    fn from(error: StoreError) -> Self {
        AdminError::Store(error)
    }
}

/// Admin CRUD over jobs, applications, and articles.
///
/// Listings fetch the full collection and filter in process; there is no pagination.
pub struct AdminService<S> {
    store: Arc<S>,
}

impl<S> AdminService<S>
where
    S: JobStore + ApplicationStore + ArticleStore + 'static,
{
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    pub fn list_jobs(&self, filters: JobFilters) -> Result<Vec<Job>, AdminError> {
        let mut jobs: Vec<Job> = self
            .store
            .jobs()?
            .into_iter()
            .filter(|job| filters.country.matches(job.location_country))
            .filter(|job| filters.activity.matches(job.is_active))
            .collect();
        jobs.sort_by(|left, right| right.created_at.cmp(&left.created_at));
        Ok(jobs)
    }

    pub fn create_job(&self, draft: JobDraft) -> Result<Job, AdminError> {
        let job = self.store.create_job(draft.normalized())?;
        tracing::info!(job_id = %job.id, country = job.location_country.label(), "job created");
        Ok(job)
    }

    pub fn update_job(&self, id: &JobId, draft: JobDraft) -> Result<Job, AdminError> {
        let job = self
            .store
            .update_job(id, draft.normalized())
            .map_err(AdminError::from_store("job"))?;
        tracing::info!(job_id = %job.id, "job updated");
        Ok(job)
    }

    pub fn delete_job(&self, id: &JobId) -> Result<(), AdminError> {
        self.store
            .delete_job(id)
            .map_err(AdminError::from_store("job"))?;
        tracing::info!(job_id = %id, "job deleted");
        Ok(())
    }

    pub fn toggle_job_active(&self, id: &JobId) -> Result<Job, AdminError> {
        let current = self.store.job(id)?.ok_or(AdminError::NotFound("job"))?;
        let job = self
            .store
            .set_job_active(id, !current.is_active)
            .map_err(AdminError::from_store("job"))?;
        tracing::info!(job_id = %id, is_active = job.is_active, "job activity toggled");
        Ok(job)
    }

    pub fn list_applications(
        &self,
        filters: ApplicationFilters,
    ) -> Result<Vec<AdminApplicationView>, AdminError> {
        let jobs: HashMap<JobId, JobSummary> = self
            .store
            .jobs()?
            .into_iter()
            .map(|job| (job.id.clone(), job.summary()))
            .collect();

        let mut views: Vec<AdminApplicationView> = self
            .store
            .applications()?
            .into_iter()
            .filter(|record| filters.status.matches(record.status))
            .map(|record| {
                let job = jobs.get(&record.application.job_id).cloned();
                AdminApplicationView { record, job }
            })
            .filter(|view| match &view.job {
                Some(job) => filters.country.matches(job.location_country),
                None => filters.country == CountryFilter::All,
            })
            .collect();
        views.sort_by(|left, right| right.record.created_at.cmp(&left.record.created_at));
        Ok(views)
    }

    pub fn update_application_status(
        &self,
        id: &ApplicationId,
        status: ApplicationStatus,
    ) -> Result<ApplicationRecord, AdminError> {
        let record = self
            .store
            .update_application_status(id, status)
            .map_err(AdminError::from_store("application"))?;
        tracing::info!(application_id = %id, status = status.label(), "application status updated");
        Ok(record)
    }

    /// Filtered application listing as CSV, newest first.
    pub fn export_applications_csv(
        &self,
        filters: ApplicationFilters,
    ) -> Result<String, AdminError> {
        let views = self.list_applications(filters)?;
        let mut writer = csv::Writer::from_writer(Vec::new());

        writer
            .write_record([
                "id",
                "submitted_at",
                "status",
                "full_name",
                "email",
                "phone",
                "job_title",
                "department",
                "location",
                "location_country",
                "years_experience",
                "visa_status",
                "resume_url",
            ])
            .map_err(|err| AdminError::Export(err.to_string()))?;

        for view in &views {
            let application = &view.record.application;
            let visa_status = application
                .immigration
                .as_ref()
                .and_then(|details| details.visa_status)
                .map(|status| status.code())
                .unwrap_or_default();
            let years = application
                .years_experience
                .map(|years| years.to_string())
                .unwrap_or_default();
            let created = view.record.created_at.to_rfc3339();

            writer
                .write_record([
                    view.record.id.0.as_str(),
                    created.as_str(),
                    view.record.status.label(),
                    application.full_name.as_str(),
                    application.email.as_str(),
                    application.phone.as_deref().unwrap_or_default(),
                    view.job.as_ref().map(|job| job.title.as_str()).unwrap_or_default(),
                    view.job
                        .as_ref()
                        .map(|job| job.department.as_str())
                        .unwrap_or_default(),
                    view.job
                        .as_ref()
                        .map(|job| job.location.as_str())
                        .unwrap_or_default(),
                    view.job
                        .as_ref()
                        .map(|job| job.location_country.label())
                        .unwrap_or_default(),
                    years.as_str(),
                    visa_status,
                    application.resume_url.as_deref().unwrap_or_default(),
                ])
                .map_err(|err| AdminError::Export(err.to_string()))?;
        }

        let bytes = writer
            .into_inner()
            .map_err(|err| AdminError::Export(err.to_string()))?;
        String::from_utf8(bytes).map_err(|err| AdminError::Export(err.to_string()))
    }

    pub fn list_articles(&self, filters: ArticleFilters) -> Result<Vec<Article>, AdminError> {
        let mut articles: Vec<Article> = self
            .store
            .articles()?
            .into_iter()
            .filter(|article| filters.status.matches(article.is_published))
            .collect();
        articles.sort_by(|left, right| right.created_at.cmp(&left.created_at));
        Ok(articles)
    }

    pub fn create_article(&self, draft: ArticleDraft) -> Result<Article, AdminError> {
        let article = self.store.create_article(draft)?;
        tracing::info!(article_id = %article.id, slug = %article.slug, "article created");
        Ok(article)
    }

    pub fn update_article(&self, id: &ArticleId, draft: ArticleDraft) -> Result<Article, AdminError> {
        let article = self
            .store
            .update_article(id, draft)
            .map_err(AdminError::from_store("article"))?;
        tracing::info!(article_id = %id, slug = %article.slug, "article updated");
        Ok(article)
    }

    pub fn delete_article(&self, id: &ArticleId) -> Result<(), AdminError> {
        self.store
            .delete_article(id)
            .map_err(AdminError::from_store("article"))?;
        tracing::info!(article_id = %id, "article deleted");
        Ok(())
    }

    fn article(&self, id: &ArticleId) -> Result<Article, AdminError> {
        self.store
            .articles()?
            .into_iter()
            .find(|article| &article.id == id)
            .ok_or(AdminError::NotFound("article"))
    }

    pub fn toggle_article_published(&self, id: &ArticleId) -> Result<Article, AdminError> {
        let current = self.article(id)?;
        let article = self
            .store
            .set_article_published(id, !current.is_published)
            .map_err(AdminError::from_store("article"))?;
        tracing::info!(article_id = %id, is_published = article.is_published, "article publication toggled");
        Ok(article)
    }

    pub fn toggle_article_featured(&self, id: &ArticleId) -> Result<Article, AdminError> {
        let current = self.article(id)?;
        let article = self
            .store
            .set_article_featured(id, !current.featured)
            .map_err(AdminError::from_store("article"))?;
        tracing::info!(article_id = %id, featured = article.featured, "article feature toggled");
        Ok(article)
    }

    pub fn dashboard(&self) -> Result<DashboardCounters, AdminError> {
        let jobs = self.store.jobs()?;
        let articles = self.store.articles()?;
        let applications = self.store.applications()?;

        let mut applications_by_status: BTreeMap<&'static str, usize> = ApplicationStatus::ALL
            .iter()
            .map(|status| (status.label(), 0))
            .collect();
        for record in &applications {
            *applications_by_status
                .entry(record.status.label())
                .or_default() += 1;
        }

        Ok(DashboardCounters {
            jobs_total: jobs.len(),
            jobs_active: jobs.iter().filter(|job| job.is_active).count(),
            articles_total: articles.len(),
            articles_published: articles.iter().filter(|article| article.is_published).count(),
            articles_featured: articles.iter().filter(|article| article.featured).count(),
            applications_total: applications.len(),
            applications_by_status,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::admin::filters::{ActivityFilter, PublicationFilter, StatusFilter};
    use crate::careers::applications::{NewApplication, SelfIdentification};
    use crate::careers::domain::LocationCountry;
    use crate::store::InMemoryStore;

    fn job_draft(title: &str, country: LocationCountry) -> JobDraft {
        JobDraft {
            title: title.to_string(),
            department: "Engineering".to_string(),
            location: "Chennai".to_string(),
            location_country: country,
            employment_type: "Contract".to_string(),
            description: "Deliver projects".to_string(),
            full_description: None,
            requirements: vec!["  Python  ".to_string(), String::new()],
            responsibilities: Vec::new(),
            salary_range: None,
            is_active: true,
        }
    }

    fn application(job_id: &JobId, name: &str) -> NewApplication {
        NewApplication {
            job_id: job_id.clone(),
            user_id: None,
            full_name: name.to_string(),
            email: format!("{}@example.com", name.to_lowercase()),
            phone: Some("555-0101".to_string()),
            current_location: None,
            linkedin_url: None,
            portfolio_url: None,
            github_url: None,
            resume_url: None,
            cover_letter: None,
            years_experience: Some(6),
            current_company: None,
            current_title: None,
            expected_salary: None,
            notice_period: None,
            preferred_start_date: None,
            how_did_you_hear: None,
            immigration: None,
            self_identification: SelfIdentification {
                eeo_acknowledged: true,
                ..SelfIdentification::default()
            },
        }
    }

    fn service() -> (AdminService<InMemoryStore>, Arc<InMemoryStore>) {
        let store = Arc::new(InMemoryStore::new());
        (AdminService::new(store.clone()), store)
    }

    #[test]
    fn job_lists_filter_by_country_and_activity() {
        let (service, _) = service();
        let usa = service
            .create_job(job_draft("Data Architect", LocationCountry::Usa))
            .expect("created");
        service
            .create_job(job_draft("ML Engineer", LocationCountry::India))
            .expect("created");
        service.toggle_job_active(&usa.id).expect("toggled");

        let inactive_usa = service
            .list_jobs(JobFilters {
                country: CountryFilter::Usa,
                activity: ActivityFilter::Inactive,
            })
            .expect("listed");
        assert_eq!(inactive_usa.len(), 1);
        assert_eq!(inactive_usa[0].requirements, vec!["Python"]);

        let active = service
            .list_jobs(JobFilters {
                country: CountryFilter::All,
                activity: ActivityFilter::Active,
            })
            .expect("listed");
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].title, "ML Engineer");
    }

    #[test]
    fn applications_are_joined_with_jobs_and_filtered() {
        let (service, store) = service();
        let usa = service
            .create_job(job_draft("Data Architect", LocationCountry::Usa))
            .expect("created");
        let india = service
            .create_job(job_draft("ML Engineer", LocationCountry::India))
            .expect("created");
        let hired = store
            .create_application(application(&usa.id, "Ana"))
            .expect("stored");
        store
            .create_application(application(&india.id, "Ravi"))
            .expect("stored");
        service
            .update_application_status(&hired.id, ApplicationStatus::Hired)
            .expect("status updated");

        let india_views = service
            .list_applications(ApplicationFilters {
                country: CountryFilter::India,
                status: StatusFilter(None),
            })
            .expect("listed");
        assert_eq!(india_views.len(), 1);
        assert_eq!(
            india_views[0].job.as_ref().map(|job| job.title.as_str()),
            Some("ML Engineer")
        );

        let hired_views = service
            .list_applications(ApplicationFilters {
                country: CountryFilter::All,
                status: StatusFilter(Some(ApplicationStatus::Hired)),
            })
            .expect("listed");
        assert_eq!(hired_views.len(), 1);
        assert_eq!(hired_views[0].record.application.full_name, "Ana");
    }

    #[test]
    fn csv_export_has_header_and_one_row_per_application() {
        let (service, store) = service();
        let job = service
            .create_job(job_draft("Data Architect", LocationCountry::Usa))
            .expect("created");
        store
            .create_application(application(&job.id, "Ana"))
            .expect("stored");

        let csv = service
            .export_applications_csv(ApplicationFilters::default())
            .expect("exported");
        let lines: Vec<_> = csv.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("id,submitted_at,status,full_name,email"));
        assert!(lines[1].contains(",pending,Ana,ana@example.com,555-0101,Data Architect,"));
    }

    #[test]
    fn article_toggles_flip_flags() {
        let (service, _) = service();
        let article = service
            .create_article(ArticleDraft {
                title: "Automation Playbook".to_string(),
                ..ArticleDraft::default()
            })
            .expect("created");

        let unpublished = service
            .toggle_article_published(&article.id)
            .expect("toggled");
        assert!(!unpublished.is_published);
        let featured = service.toggle_article_featured(&article.id).expect("toggled");
        assert!(featured.featured);

        let drafts = service
            .list_articles(ArticleFilters {
                status: PublicationFilter::Draft,
            })
            .expect("listed");
        assert_eq!(drafts.len(), 1);
    }

    #[test]
    fn dashboard_counts_every_collection() {
        let (service, store) = service();
        let job = service
            .create_job(job_draft("Data Architect", LocationCountry::Usa))
            .expect("created");
        service
            .create_job(job_draft("ML Engineer", LocationCountry::India))
            .expect("created");
        store
            .create_application(application(&job.id, "Ana"))
            .expect("stored");
        service
            .create_article(ArticleDraft {
                title: "Cloud FinOps".to_string(),
                featured: true,
                ..ArticleDraft::default()
            })
            .expect("created");

        let counters = service.dashboard().expect("counted");
        assert_eq!(counters.jobs_total, 2);
        assert_eq!(counters.jobs_active, 2);
        assert_eq!(counters.articles_featured, 1);
        assert_eq!(counters.applications_total, 1);
        assert_eq!(counters.applications_by_status["pending"], 1);
        assert_eq!(counters.applications_by_status["hired"], 0);
    }

    #[test]
    fn missing_rows_map_to_not_found() {
        let (service, _) = service();
        assert!(matches!(
            service.delete_job(&JobId("ghost".to_string())),
            Err(AdminError::NotFound("job"))
        ));
        assert!(matches!(
            service.toggle_article_featured(&ArticleId("ghost".to_string())),
            Err(AdminError::NotFound("article"))
        ));
    }
}
