use actix_web::http::StatusCode;
use actix_web::{delete, get, patch, post, web, HttpRequest, HttpResponse, Responder};
use chrono::Utc;
use uuid::Uuid;

use civicpress::log_err;
use civicpress::models::{
    ArticleDraft, ArticlePatch, ArticleQuery, ArticleRequest, PublishIntent,
};
use civicpress::services::{BulkOutcome, RequestOutcome};

use crate::web::api;
use crate::web::forms::{ArticlesQuery, BulkForm};
use crate::web::helpers::require_admin;
use crate::web::state::AppState;

#[get("/api/admin/articles")]
pub async fn list_articles(
    state: web::Data<AppState>,
    req: HttpRequest,
    query: web::Query<ArticlesQuery>,
) -> impl Responder {
    if let Err(resp) = require_admin(&state, &req).await {
        return resp;
    }

    let query: ArticleQuery = query.into_inner().into();
    match state.articles.list(&query, Utc::now()).await {
        Ok(articles) => api::ok(articles),
        Err(e) => api::article_error(&state, e),
    }
}

#[get("/api/admin/articles/{id}")]
pub async fn get_article(
    state: web::Data<AppState>,
    req: HttpRequest,
    path: web::Path<Uuid>,
) -> impl Responder {
    if let Err(resp) = require_admin(&state, &req).await {
        return resp;
    }

    match state.articles.get(path.into_inner()).await {
        Ok(article) => api::ok(article),
        Err(e) => api::article_error(&state, e),
    }
}

#[post("/api/admin/articles")]
pub async fn create_article(
    state: web::Data<AppState>,
    req: HttpRequest,
    body: web::Json<ArticleDraft>,
) -> impl Responder {
    if let Err(resp) = require_admin(&state, &req).await {
        return resp;
    }

    match state.articles.create(body.into_inner(), Utc::now()).await {
        Ok(article) => api::created(article),
        Err(e) => api::article_error(&state, e),
    }
}

#[patch("/api/admin/articles/{id}")]
pub async fn update_article(
    state: web::Data<AppState>,
    req: HttpRequest,
    path: web::Path<Uuid>,
    body: web::Json<ArticlePatch>,
) -> impl Responder {
    if let Err(resp) = require_admin(&state, &req).await {
        return resp;
    }

    let id = path.into_inner();
    match state.articles.update(id, body.into_inner(), Utc::now()).await {
        Ok(article) => api::ok(article),
        Err(e) => api::article_error(&state, e),
    }
}

#[delete("/api/admin/articles/{id}")]
pub async fn delete_article(
    state: web::Data<AppState>,
    req: HttpRequest,
    path: web::Path<Uuid>,
) -> impl Responder {
    if let Err(resp) = require_admin(&state, &req).await {
        return resp;
    }

    match state.articles.delete(path.into_inner()).await {
        Ok(article) => api::ok(article),
        Err(e) => api::article_error(&state, e),
    }
}

#[post("/api/admin/articles/{id}/transition")]
pub async fn transition_article(
    state: web::Data<AppState>,
    req: HttpRequest,
    path: web::Path<Uuid>,
    body: web::Json<PublishIntent>,
) -> impl Responder {
    if let Err(resp) = require_admin(&state, &req).await {
        return resp;
    }

    let id = path.into_inner();
    match state.articles.apply_intent(id, body.into_inner(), Utc::now()).await {
        Ok(article) => api::ok(article),
        Err(e) => api::article_error(&state, e),
    }
}

#[post("/api/admin/articles/bulk")]
pub async fn bulk_articles(
    state: web::Data<AppState>,
    req: HttpRequest,
    body: web::Json<BulkForm>,
) -> impl Responder {
    if let Err(resp) = require_admin(&state, &req).await {
        return resp;
    }

    let BulkForm { ids, action } = body.into_inner();
    match state.articles.bulk(&ids, action).await {
        Ok(outcome) => bulk_response(&state, outcome),
        Err(e) => api::article_error(&state, e),
    }
}

/// Single entry point taking the tagged request union.
#[post("/api/admin/requests")]
pub async fn dispatch_request(
    state: web::Data<AppState>,
    req: HttpRequest,
    body: web::Json<ArticleRequest>,
) -> impl Responder {
    if let Err(resp) = require_admin(&state, &req).await {
        return resp;
    }

    let request = body.into_inner();
    let op = request.op();

    match state.articles.dispatch(request, Utc::now()).await {
        Ok(RequestOutcome::Bulk(outcome)) => bulk_response(&state, outcome),
        Ok(RequestOutcome::Article(article)) if op == "create" => {
            api::created(RequestOutcome::Article(article))
        }
        Ok(outcome) => api::ok(outcome),
        Err(e) => api::article_error(&state, e),
    }
}

fn bulk_response(state: &AppState, outcome: BulkOutcome) -> HttpResponse {
    let Some(failure) = outcome.failed.clone() else {
        return api::ok(outcome);
    };

    if failure.store_failure {
        log_err!(
            state.db.pool,
            "Bulk article store failure",
            serde_json::json!({
                "id": failure.id,
                "applied": outcome.applied.len(),
                "error": failure.error,
            })
        );
    }

    let message = format!(
        "Stopped at article {} after {} change(s): {}",
        failure.id,
        outcome.applied.len(),
        failure.error
    );
    api::fail_with(StatusCode::INTERNAL_SERVER_ERROR, message, outcome)
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(list_articles)
        .service(bulk_articles)
        .service(get_article)
        .service(create_article)
        .service(update_article)
        .service(delete_article)
        .service(transition_article)
        .service(dispatch_request);
}
