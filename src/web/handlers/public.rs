use actix_web::{get, web, Responder};
use chrono::Utc;
use uuid::Uuid;

use civicpress::db;
use civicpress::models::ArticleQuery;

use crate::web::api;
use crate::web::forms::PublicArticlesQuery;
use crate::web::state::AppState;

#[get("/api/articles")]
pub async fn public_articles(
    state: web::Data<AppState>,
    query: web::Query<PublicArticlesQuery>,
) -> impl Responder {
    let category = query
        .into_inner()
        .category
        .map(|c| c.trim().to_string())
        .filter(|c| !c.is_empty());

    match state
        .articles
        .list(&ArticleQuery::public(category), Utc::now())
        .await
    {
        Ok(articles) => api::ok(articles),
        Err(e) => api::article_error(&state, e),
    }
}

#[get("/api/articles/{id}")]
pub async fn public_article(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> impl Responder {
    match state.articles.get_visible(path.into_inner(), Utc::now()).await {
        Ok(article) => api::ok(article),
        Err(e) => api::article_error(&state, e),
    }
}

#[get("/api/categories")]
pub async fn public_categories(state: web::Data<AppState>) -> impl Responder {
    match db::list_categories(&state.db.pool, true).await {
        Ok(categories) => api::ok(categories),
        Err(e) => api::category_error(&state, e),
    }
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(public_articles)
        .service(public_article)
        .service(public_categories);
}
