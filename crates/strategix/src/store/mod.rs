//! Store boundary shared by the public catalog, the intake workflow, and the admin surface.
//!
//! The hosted platform is modelled as a handful of narrow traits so each surface can be
//! exercised against in-memory doubles. [`InMemoryStore`] is the reference implementation
//! used by the API binary and the test suites.

pub mod identity;
pub mod memory;
pub mod storage;

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

use crate::careers::applications::domain::{
    ApplicationId, ApplicationRecord, ApplicationStatus, ExistingApplication, NewApplication,
};
use crate::careers::applications::form::ResumeAttachment;
use crate::careers::domain::{Job, JobDraft, JobId};
use crate::insights::domain::{Article, ArticleDraft, ArticleId};

pub use identity::{Identity, IdentityProvider, SessionIdentity};
pub use memory::InMemoryStore;
pub use storage::{InMemoryResumeStorage, StoredResume};

/// Error enumeration for store failures.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    #[error("record not found")]
    NotFound,
    #[error("record conflicts with an existing row: {0}")]
    Conflict(String),
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Tables that publish change notifications.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Table {
    Jobs,
    JobApplications,
    Articles,
}

impl Table {
    pub const ALL: [Table; 3] = [Table::Jobs, Table::JobApplications, Table::Articles];

    pub const fn name(self) -> &'static str {
        match self {
            Table::Jobs => "jobs",
            Table::JobApplications => "job_applications",
            Table::Articles => "articles",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeKind {
    Insert,
    Update,
    Delete,
}

/// One row-level change notification, keyed by table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableChange {
    pub table: Table,
    pub kind: ChangeKind,
}

impl TableChange {
    pub const fn new(table: Table, kind: ChangeKind) -> Self {
        Self { table, kind }
    }
}

pub trait JobStore: Send + Sync {
    fn job(&self, id: &JobId) -> Result<Option<Job>, StoreError>;
    fn jobs(&self) -> Result<Vec<Job>, StoreError>;
    fn create_job(&self, draft: JobDraft) -> Result<Job, StoreError>;
    fn update_job(&self, id: &JobId, draft: JobDraft) -> Result<Job, StoreError>;
    fn set_job_active(&self, id: &JobId, active: bool) -> Result<Job, StoreError>;
    /// Removes the job and every application filed against it.
    fn delete_job(&self, id: &JobId) -> Result<(), StoreError>;
}

pub trait ApplicationStore: Send + Sync {
    /// Duplicate-application lookup by (job, email). Emails compare case-insensitively.
    fn find_application(
        &self,
        job_id: &JobId,
        email: &str,
    ) -> Result<Option<ExistingApplication>, StoreError>;
    fn create_application(
        &self,
        application: NewApplication,
    ) -> Result<ApplicationRecord, StoreError>;
    fn applications(&self) -> Result<Vec<ApplicationRecord>, StoreError>;
    fn update_application_status(
        &self,
        id: &ApplicationId,
        status: ApplicationStatus,
    ) -> Result<ApplicationRecord, StoreError>;
}

pub trait ArticleStore: Send + Sync {
    fn articles(&self) -> Result<Vec<Article>, StoreError>;
    fn article_by_slug(&self, slug: &str) -> Result<Option<Article>, StoreError>;
    fn create_article(&self, draft: ArticleDraft) -> Result<Article, StoreError>;
    fn update_article(&self, id: &ArticleId, draft: ArticleDraft) -> Result<Article, StoreError>;
    fn set_article_published(&self, id: &ArticleId, published: bool)
        -> Result<Article, StoreError>;
    fn set_article_featured(&self, id: &ArticleId, featured: bool) -> Result<Article, StoreError>;
    fn delete_article(&self, id: &ArticleId) -> Result<(), StoreError>;
}

/// File storage for uploaded resumes.
pub trait ResumeStorage: Send + Sync {
    fn upload_resume(
        &self,
        resume: &ResumeAttachment,
        owner_id: &str,
    ) -> Result<StoredResume, StoreError>;
}

/// Row-level change notifications for the admin refresh loop.
pub trait ChangeFeed: Send + Sync {
    fn subscribe_changes(&self) -> broadcast::Receiver<TableChange>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_names_match_store_tables() {
        let names: Vec<_> = Table::ALL.iter().map(|table| table.name()).collect();
        assert_eq!(names, vec!["jobs", "job_applications", "articles"]);
    }

    #[test]
    fn table_change_serializes_snake_case() {
        let change = TableChange::new(Table::JobApplications, ChangeKind::Insert);
        let encoded = serde_json::to_value(change).expect("serializes");
        assert_eq!(
            encoded,
            serde_json::json!({"table": "job_applications", "kind": "insert"})
        );
    }
}
