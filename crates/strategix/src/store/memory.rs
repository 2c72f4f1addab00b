use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};

use chrono::Utc;
use tokio::sync::broadcast;
use uuid::Uuid;

use super::{
    ApplicationStore, ArticleStore, ChangeFeed, ChangeKind, JobStore, StoreError, Table,
    TableChange,
};
use crate::careers::applications::domain::{
    ApplicationId, ApplicationRecord, ApplicationStatus, ExistingApplication, NewApplication,
};
use crate::careers::domain::{Job, JobDraft, JobId};
use crate::insights::domain::{Article, ArticleDraft, ArticleId};

const CHANGE_FEED_CAPACITY: usize = 64;

#[derive(Debug, Default)]
struct Tables {
    jobs: BTreeMap<JobId, Job>,
    applications: Vec<ApplicationRecord>,
    articles: Vec<Article>,
}

/// Single-process store mirroring the hosted schema: cascading job deletes, unique article
/// slugs, and a change notification for every mutation.
#[derive(Debug, Clone)]
pub struct InMemoryStore {
    tables: Arc<Mutex<Tables>>,
    changes: broadcast::Sender<TableChange>,
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

fn new_id() -> String {
    Uuid::new_v4().to_string()
}

impl InMemoryStore {
    pub fn new() -> Self {
        let (changes, _) = broadcast::channel(CHANGE_FEED_CAPACITY);
        Self {
            tables: Arc::new(Mutex::new(Tables::default())),
            changes,
        }
    }

    fn tables(&self) -> Result<MutexGuard<'_, Tables>, StoreError> {
        self.tables
            .lock()
            .map_err(|_| StoreError::Unavailable("store lock poisoned".to_string()))
    }

    fn notify(&self, table: Table, kind: ChangeKind) {
        // No subscribers is the normal case outside the admin dashboard.
        let _ = self.changes.send(TableChange::new(table, kind));
    }

    /// Insert a job with a caller-chosen id. Used for seeding and fixtures.
    pub fn insert_job_with_id(&self, id: JobId, draft: JobDraft) -> Result<Job, StoreError> {
        let mut tables = self.tables()?;
        if tables.jobs.contains_key(&id) {
            return Err(StoreError::Conflict(format!("job {id} already exists")));
        }
        let now = Utc::now();
        let draft = draft.normalized();
        let job = Job {
            id: id.clone(),
            title: draft.title,
            department: draft.department,
            location: draft.location,
            location_country: draft.location_country,
            employment_type: draft.employment_type,
            description: draft.description,
            full_description: draft.full_description,
            requirements: draft.requirements,
            responsibilities: draft.responsibilities,
            salary_range: draft.salary_range,
            is_active: draft.is_active,
            created_at: now,
            updated_at: now,
        };
        tables.jobs.insert(id, job.clone());
        drop(tables);

        self.notify(Table::Jobs, ChangeKind::Insert);
        Ok(job)
    }
}

fn slug_taken(articles: &[Article], slug: &str, except: Option<&ArticleId>) -> bool {
    articles
        .iter()
        .any(|article| article.slug == slug && Some(&article.id) != except)
}

impl JobStore for InMemoryStore {
    fn job(&self, id: &JobId) -> Result<Option<Job>, StoreError> {
        Ok(self.tables()?.jobs.get(id).cloned())
    }

    fn jobs(&self) -> Result<Vec<Job>, StoreError> {
        Ok(self.tables()?.jobs.values().cloned().collect())
    }

    fn create_job(&self, draft: JobDraft) -> Result<Job, StoreError> {
        self.insert_job_with_id(JobId(new_id()), draft)
    }

    fn update_job(&self, id: &JobId, draft: JobDraft) -> Result<Job, StoreError> {
        let mut tables = self.tables()?;
        let job = tables.jobs.get_mut(id).ok_or(StoreError::NotFound)?;
        let draft = draft.normalized();

        job.title = draft.title;
        job.department = draft.department;
        job.location = draft.location;
        job.location_country = draft.location_country;
        job.employment_type = draft.employment_type;
        job.description = draft.description;
        job.full_description = draft.full_description;
        job.requirements = draft.requirements;
        job.responsibilities = draft.responsibilities;
        job.salary_range = draft.salary_range;
        job.is_active = draft.is_active;
        job.updated_at = Utc::now();

        let updated = job.clone();
        drop(tables);

        self.notify(Table::Jobs, ChangeKind::Update);
        Ok(updated)
    }

    fn set_job_active(&self, id: &JobId, active: bool) -> Result<Job, StoreError> {
        let mut tables = self.tables()?;
        let job = tables.jobs.get_mut(id).ok_or(StoreError::NotFound)?;
        job.is_active = active;
        job.updated_at = Utc::now();
        let updated = job.clone();
        drop(tables);

        self.notify(Table::Jobs, ChangeKind::Update);
        Ok(updated)
    }

    fn delete_job(&self, id: &JobId) -> Result<(), StoreError> {
        let mut tables = self.tables()?;
        tables.jobs.remove(id).ok_or(StoreError::NotFound)?;

        let before = tables.applications.len();
        tables
            .applications
            .retain(|record| &record.application.job_id != id);
        let cascaded = before - tables.applications.len();
        drop(tables);

        tracing::debug!(job_id = %id, cascaded, "job deleted");
        self.notify(Table::Jobs, ChangeKind::Delete);
        if cascaded > 0 {
            self.notify(Table::JobApplications, ChangeKind::Delete);
        }
        Ok(())
    }
}

impl ApplicationStore for InMemoryStore {
    fn find_application(
        &self,
        job_id: &JobId,
        email: &str,
    ) -> Result<Option<ExistingApplication>, StoreError> {
        let email = email.trim();
        let tables = self.tables()?;
        Ok(tables
            .applications
            .iter()
            .find(|record| {
                &record.application.job_id == job_id
                    && record.application.email.trim().eq_ignore_ascii_case(email)
            })
            .map(ApplicationRecord::existing))
    }

    fn create_application(
        &self,
        application: NewApplication,
    ) -> Result<ApplicationRecord, StoreError> {
        let mut tables = self.tables()?;
        if !tables.jobs.contains_key(&application.job_id) {
            return Err(StoreError::Conflict(format!(
                "job {} does not exist",
                application.job_id
            )));
        }

        let now = Utc::now();
        let record = ApplicationRecord {
            id: ApplicationId(new_id()),
            application,
            status: ApplicationStatus::Pending,
            created_at: now,
            updated_at: now,
        };
        tables.applications.push(record.clone());
        drop(tables);

        self.notify(Table::JobApplications, ChangeKind::Insert);
        Ok(record)
    }

    fn applications(&self) -> Result<Vec<ApplicationRecord>, StoreError> {
        Ok(self.tables()?.applications.clone())
    }

    fn update_application_status(
        &self,
        id: &ApplicationId,
        status: ApplicationStatus,
    ) -> Result<ApplicationRecord, StoreError> {
        let mut tables = self.tables()?;
        let record = tables
            .applications
            .iter_mut()
            .find(|record| &record.id == id)
            .ok_or(StoreError::NotFound)?;
        record.status = status;
        record.updated_at = Utc::now();
        let updated = record.clone();
        drop(tables);

        self.notify(Table::JobApplications, ChangeKind::Update);
        Ok(updated)
    }
}

impl ArticleStore for InMemoryStore {
    fn articles(&self) -> Result<Vec<Article>, StoreError> {
        Ok(self.tables()?.articles.clone())
    }

    fn article_by_slug(&self, slug: &str) -> Result<Option<Article>, StoreError> {
        Ok(self
            .tables()?
            .articles
            .iter()
            .find(|article| article.slug == slug)
            .cloned())
    }

    fn create_article(&self, draft: ArticleDraft) -> Result<Article, StoreError> {
        let draft = draft.with_resolved_slug();
        let mut tables = self.tables()?;
        if draft.slug.is_empty() || slug_taken(&tables.articles, &draft.slug, None) {
            return Err(StoreError::Conflict(format!(
                "article slug '{}' is unavailable",
                draft.slug
            )));
        }

        let now = Utc::now();
        let article = Article {
            id: ArticleId(new_id()),
            slug: draft.slug,
            title: draft.title,
            excerpt: draft.excerpt,
            content: draft.content,
            category: draft.category,
            published_date: draft.published_date,
            read_time: draft.read_time,
            icon: draft.icon,
            featured: draft.featured,
            is_published: draft.is_published,
            created_at: now,
            updated_at: now,
        };
        tables.articles.push(article.clone());
        drop(tables);

        self.notify(Table::Articles, ChangeKind::Insert);
        Ok(article)
    }

    fn update_article(&self, id: &ArticleId, draft: ArticleDraft) -> Result<Article, StoreError> {
        let draft = draft.with_resolved_slug();
        let mut tables = self.tables()?;
        if draft.slug.is_empty() || slug_taken(&tables.articles, &draft.slug, Some(id)) {
            return Err(StoreError::Conflict(format!(
                "article slug '{}' is unavailable",
                draft.slug
            )));
        }

        let article = tables
            .articles
            .iter_mut()
            .find(|article| &article.id == id)
            .ok_or(StoreError::NotFound)?;
        article.slug = draft.slug;
        article.title = draft.title;
        article.excerpt = draft.excerpt;
        article.content = draft.content;
        article.category = draft.category;
        article.published_date = draft.published_date;
        article.read_time = draft.read_time;
        article.icon = draft.icon;
        article.featured = draft.featured;
        article.is_published = draft.is_published;
        article.updated_at = Utc::now();
        let updated = article.clone();
        drop(tables);

        self.notify(Table::Articles, ChangeKind::Update);
        Ok(updated)
    }

    fn set_article_published(
        &self,
        id: &ArticleId,
        published: bool,
    ) -> Result<Article, StoreError> {
        self.modify_article(id, |article| article.is_published = published)
    }

    fn set_article_featured(&self, id: &ArticleId, featured: bool) -> Result<Article, StoreError> {
        self.modify_article(id, |article| article.featured = featured)
    }

    fn delete_article(&self, id: &ArticleId) -> Result<(), StoreError> {
        let mut tables = self.tables()?;
        let position = tables
            .articles
            .iter()
            .position(|article| &article.id == id)
            .ok_or(StoreError::NotFound)?;
        tables.articles.remove(position);
        drop(tables);

        self.notify(Table::Articles, ChangeKind::Delete);
        Ok(())
    }
}

impl InMemoryStore {
    fn modify_article(
        &self,
        id: &ArticleId,
        change: impl FnOnce(&mut Article),
    ) -> Result<Article, StoreError> {
        let mut tables = self.tables()?;
        let article = tables
            .articles
            .iter_mut()
            .find(|article| &article.id == id)
            .ok_or(StoreError::NotFound)?;
        change(article);
        article.updated_at = Utc::now();
        let updated = article.clone();
        drop(tables);

        self.notify(Table::Articles, ChangeKind::Update);
        Ok(updated)
    }
}

impl ChangeFeed for InMemoryStore {
    fn subscribe_changes(&self) -> broadcast::Receiver<TableChange> {
        self.changes.subscribe()
    }
}
