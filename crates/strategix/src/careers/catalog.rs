use std::sync::Arc;

use super::domain::{Job, JobId, LocationCountry};
use crate::store::{JobStore, StoreError};

/// Public read side of the job board.
pub struct CareersCatalog<S> {
    store: Arc<S>,
}

impl<S> CareersCatalog<S>
where
    S: JobStore + 'static,
{
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Active postings, optionally limited to one country, ordered by title.
    pub fn active_jobs(&self, country: Option<LocationCountry>) -> Result<Vec<Job>, StoreError> {
        let mut jobs: Vec<Job> = self
            .store
            .jobs()?
            .into_iter()
            .filter(|job| job.is_active)
            .filter(|job| country.map_or(true, |country| job.location_country == country))
            .collect();
        jobs.sort_by(|left, right| left.title.cmp(&right.title));
        Ok(jobs)
    }

    /// Any posting by id. Inactive postings stay reachable so shared links keep working.
    pub fn job(&self, id: &JobId) -> Result<Option<Job>, StoreError> {
        self.store.job(id)
    }
}
