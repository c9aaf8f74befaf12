use actix_web::{get, web, HttpRequest, HttpResponse, Responder};
use chrono::Utc;

use civicpress::models::ArticleQuery;

use crate::web::forms::ArticlesQuery;
use crate::web::helpers::{render, require_admin};
use crate::web::state::AppState;
use crate::web::templates::{AdminArticlesTemplate, ArticleRow};

#[get("/admin/articles")]
pub async fn admin_articles(
    state: web::Data<AppState>,
    req: HttpRequest,
    query: web::Query<ArticlesQuery>,
) -> impl Responder {
    let admin = match require_admin(&state, &req).await {
        Ok(admin) => admin,
        Err(resp) => return resp,
    };

    let query: ArticleQuery = query.into_inner().into();
    let now = Utc::now();

    let articles = match state.articles.list(&query, now).await {
        Ok(articles) => articles,
        Err(e) => {
            log::error!("Failed to list articles: {}", e);
            return HttpResponse::InternalServerError()
                .content_type("text/plain; charset=utf-8")
                .body("Failed to load articles");
        }
    };

    render(AdminArticlesTemplate {
        rows: articles
            .iter()
            .map(|a| ArticleRow::from_article(a, now))
            .collect(),
        query: query.search.unwrap_or_default(),
        admin_email: admin.email,
    })
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(admin_articles);
}
