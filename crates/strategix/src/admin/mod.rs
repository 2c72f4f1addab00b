//! Admin management surface: credential check, CRUD over every collection, and the
//! dashboard refresh loop.

pub mod auth;
pub mod filters;
pub mod refresh;
pub mod router;
pub mod service;

pub use auth::{AdminAuthError, AdminAuthenticator, AdminCredentials};
pub use filters::{
    ActivityFilter, ApplicationFilters, ArticleFilters, CountryFilter, JobFilters,
    PublicationFilter, StatusFilter,
};
pub use refresh::{
    AdminSnapshot, AdminTab, CollectionSource, RefreshCoordinator, RefreshHandle,
    RefreshStopped, RefreshTrigger,
};
pub use router::{admin_auth_router, admin_router, AdminState};
pub use service::{AdminApplicationView, AdminError, AdminService, DashboardCounters};
