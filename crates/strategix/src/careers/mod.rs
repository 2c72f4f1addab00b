//! Job board: postings, the public catalog, and application intake.

pub mod applications;
pub mod catalog;
pub mod domain;
pub mod router;

pub use catalog::CareersCatalog;
pub use domain::{Job, JobDraft, JobId, JobSummary, LocationCountry, EMPLOYMENT_TYPES};
pub use router::careers_router;
