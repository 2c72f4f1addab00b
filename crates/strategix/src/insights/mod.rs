//! Insights section: articles, body parsing, and the public catalog.

pub mod catalog;
pub mod content;
pub mod domain;
pub mod router;

pub use catalog::{ArticleDetail, InsightsCatalog, ALL_CATEGORIES};
pub use content::{parse_content, ContentBlock, Inline};
pub use domain::{slugify, Article, ArticleCategory, ArticleDraft, ArticleIcon, ArticleId};
pub use router::insights_router;
