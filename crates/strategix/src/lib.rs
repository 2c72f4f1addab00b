//! Careers intake, insights catalog, contact intake, and admin management for the
//! Next Zen AI Strategix site.

pub mod admin;
pub mod careers;
pub mod config;
pub mod contact;
pub mod error;
pub mod insights;
pub mod store;
pub mod telemetry;

pub use error::AppError;
