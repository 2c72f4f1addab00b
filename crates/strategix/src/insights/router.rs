use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use serde::Deserialize;
use serde_json::json;

use super::catalog::InsightsCatalog;
use crate::error::GENERIC_FAILURE_MESSAGE;
use crate::store::{ArticleStore, StoreError};

#[derive(Debug, Default, Deserialize)]
pub struct ArticleListQuery {
    #[serde(default)]
    pub category: Option<String>,
}

/// Router builder exposing published articles.
pub fn insights_router<S>(catalog: Arc<InsightsCatalog<S>>) -> Router
where
    S: ArticleStore + 'static,
{
    Router::new()
        .route("/api/v1/insights", get(list_handler::<S>))
        .route("/api/v1/insights/categories", get(categories_handler::<S>))
        .route("/api/v1/insights/:slug", get(detail_handler::<S>))
        .with_state(catalog)
}

fn store_failure(error: StoreError) -> Response {
    tracing::error!(error = %error, "insights read failed");
    let payload = json!({ "error": GENERIC_FAILURE_MESSAGE });
    (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
}

pub(crate) async fn list_handler<S>(
    State(catalog): State<Arc<InsightsCatalog<S>>>,
    Query(query): Query<ArticleListQuery>,
) -> Response
where
    S: ArticleStore + 'static,
{
    match catalog.published_articles(query.category.as_deref()) {
        Ok(articles) => (StatusCode::OK, axum::Json(json!({ "articles": articles }))).into_response(),
        Err(error) => store_failure(error),
    }
}

pub(crate) async fn categories_handler<S>(
    State(catalog): State<Arc<InsightsCatalog<S>>>,
) -> Response
where
    S: ArticleStore + 'static,
{
    match catalog.categories() {
        Ok(categories) => {
            (StatusCode::OK, axum::Json(json!({ "categories": categories }))).into_response()
        }
        Err(error) => store_failure(error),
    }
}

pub(crate) async fn detail_handler<S>(
    State(catalog): State<Arc<InsightsCatalog<S>>>,
    Path(slug): Path<String>,
) -> Response
where
    S: ArticleStore + 'static,
{
    match catalog.detail(&slug) {
        Ok(Some(detail)) => (StatusCode::OK, axum::Json(detail)).into_response(),
        Ok(None) => {
            let payload = json!({ "error": "article not found" });
            (StatusCode::NOT_FOUND, axum::Json(payload)).into_response()
        }
        Err(error) => store_failure(error),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::insights::domain::{ArticleCategory, ArticleDraft};
    use crate::store::InMemoryStore;
    use axum::body::Body;
    use axum::http::Request;
    use tower::ServiceExt;

    fn router() -> Router {
        let store = Arc::new(InMemoryStore::new());
        store
            .create_article(ArticleDraft {
                title: "Cloud Cost Control".to_string(),
                category: ArticleCategory::CloudInfrastructure,
                content: "Intro paragraph.".to_string(),
                ..ArticleDraft::default()
            })
            .expect("article created");
        store
            .create_article(ArticleDraft {
                title: "Hidden Draft".to_string(),
                is_published: false,
                ..ArticleDraft::default()
            })
            .expect("article created");
        insights_router(Arc::new(InsightsCatalog::new(store)))
    }

    async fn get_json(uri: &str) -> (StatusCode, serde_json::Value) {
        let response = router()
            .oneshot(Request::get(uri).body(Body::empty()).expect("request builds"))
            .await
            .expect("route executes");
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
            .await
            .expect("read body");
        (status, serde_json::from_slice(&body).expect("json payload"))
    }

    #[tokio::test]
    async fn categories_route_lists_published_categories() {
        let (status, body) = get_json("/api/v1/insights/categories").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["categories"], json!(["All", "Cloud Infrastructure"]));
    }

    #[tokio::test]
    async fn detail_route_parses_body_blocks() {
        let (status, body) = get_json("/api/v1/insights/cloud-cost-control").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["slug"], "cloud-cost-control");
        assert_eq!(body["blocks"][0]["type"], "paragraph");
    }

    #[tokio::test]
    async fn draft_slugs_are_not_found() {
        let (status, _) = get_json("/api/v1/insights/hidden-draft").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn list_route_filters_by_category() {
        let (_, body) = get_json("/api/v1/insights?category=Cybersecurity").await;
        assert_eq!(body["articles"], json!([]));
    }
}
