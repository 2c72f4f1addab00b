use std::sync::Arc;

use serde::Serialize;

use super::content::{parse_content, ContentBlock};
use super::domain::{Article, ArticleIcon};
use crate::store::{ArticleStore, StoreError};

pub const ALL_CATEGORIES: &str = "All";
const RELATED_LIMIT: usize = 2;

/// Published article with its parsed body and neighbours in the same category.
#[derive(Debug, Clone, Serialize)]
pub struct ArticleDetail {
    #[serde(flatten)]
    pub article: Article,
    pub icon_resolved: ArticleIcon,
    pub blocks: Vec<ContentBlock>,
    pub related: Vec<Article>,
}

/// Public read side of the insights section. Drafts are never visible here.
pub struct InsightsCatalog<S> {
    store: Arc<S>,
}

impl<S> InsightsCatalog<S>
where
    S: ArticleStore + 'static,
{
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Published articles, newest first. `None` or `"All"` disables the category filter.
    pub fn published_articles(&self, category: Option<&str>) -> Result<Vec<Article>, StoreError> {
        let category = category
            .map(str::trim)
            .filter(|raw| !raw.is_empty() && !raw.eq_ignore_ascii_case(ALL_CATEGORIES));

        let mut articles: Vec<Article> = self
            .store
            .articles()?
            .into_iter()
            .filter(|article| article.is_published)
            .filter(|article| category.map_or(true, |raw| article.category.label() == raw))
            .collect();
        articles.sort_by(|left, right| right.published_date.cmp(&left.published_date));
        Ok(articles)
    }

    /// `"All"` followed by each category that has published articles, in listing order.
    pub fn categories(&self) -> Result<Vec<String>, StoreError> {
        let mut categories = vec![ALL_CATEGORIES.to_string()];
        for article in self.published_articles(None)? {
            let label = article.category.label();
            if !categories.iter().any(|seen| seen == label) {
                categories.push(label.to_string());
            }
        }
        Ok(categories)
    }

    pub fn article_by_slug(&self, slug: &str) -> Result<Option<Article>, StoreError> {
        Ok(self
            .store
            .article_by_slug(slug)?
            .filter(|article| article.is_published))
    }

    pub fn related(&self, article: &Article) -> Result<Vec<Article>, StoreError> {
        Ok(self
            .published_articles(Some(article.category.label()))?
            .into_iter()
            .filter(|candidate| candidate.slug != article.slug)
            .take(RELATED_LIMIT)
            .collect())
    }

    pub fn detail(&self, slug: &str) -> Result<Option<ArticleDetail>, StoreError> {
        let Some(article) = self.article_by_slug(slug)? else {
            return Ok(None);
        };
        let related = self.related(&article)?;
        Ok(Some(ArticleDetail {
            icon_resolved: article.icon(),
            blocks: parse_content(&article.content),
            related,
            article,
        }))
    }
}
