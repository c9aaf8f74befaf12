use actix_web::{delete, get, patch, post, web, HttpRequest, Responder};
use uuid::Uuid;

use civicpress::db;
use civicpress::models::{CategoryCreate, CategoryUpdate};

use crate::web::api;
use crate::web::helpers::require_admin;
use crate::web::state::AppState;

#[get("/api/admin/categories")]
pub async fn list_categories(
    state: web::Data<AppState>,
    req: HttpRequest,
) -> impl Responder {
    if let Err(resp) = require_admin(&state, &req).await {
        return resp;
    }

    match db::list_categories(&state.db.pool, false).await {
        Ok(categories) => api::ok(categories),
        Err(e) => api::category_error(&state, e),
    }
}

#[get("/api/admin/categories/{id}")]
pub async fn get_category(
    state: web::Data<AppState>,
    req: HttpRequest,
    path: web::Path<Uuid>,
) -> impl Responder {
    if let Err(resp) = require_admin(&state, &req).await {
        return resp;
    }

    match db::get_category_by_id(&state.db.pool, path.into_inner()).await {
        Ok(category) => api::ok(category),
        Err(e) => api::category_error(&state, e),
    }
}

#[post("/api/admin/categories")]
pub async fn create_category(
    state: web::Data<AppState>,
    req: HttpRequest,
    body: web::Json<CategoryCreate>,
) -> impl Responder {
    if let Err(resp) = require_admin(&state, &req).await {
        return resp;
    }

    let mut data = body.into_inner();
    data.name = data.name.trim().to_string();
    data.slug = data.slug.trim().to_string();

    match db::create_category(&state.db.pool, &data).await {
        Ok(category) => {
            log::info!("Created category '{}'", category.name);
            api::created(category)
        }
        Err(e) => api::category_error(&state, e),
    }
}

#[patch("/api/admin/categories/{id}")]
pub async fn update_category(
    state: web::Data<AppState>,
    req: HttpRequest,
    path: web::Path<Uuid>,
    body: web::Json<CategoryUpdate>,
) -> impl Responder {
    if let Err(resp) = require_admin(&state, &req).await {
        return resp;
    }

    let mut data = body.into_inner();
    data.name = data.name.map(|n| n.trim().to_string());
    data.slug = data.slug.map(|s| s.trim().to_string());

    match db::update_category(&state.db.pool, path.into_inner(), &data).await {
        Ok(category) => api::ok(category),
        Err(e) => api::category_error(&state, e),
    }
}

#[delete("/api/admin/categories/{id}")]
pub async fn delete_category(
    state: web::Data<AppState>,
    req: HttpRequest,
    path: web::Path<Uuid>,
) -> impl Responder {
    if let Err(resp) = require_admin(&state, &req).await {
        return resp;
    }

    match db::delete_category(&state.db.pool, path.into_inner()).await {
        Ok(category) => {
            log::info!("Deleted category '{}'", category.name);
            api::ok(category)
        }
        Err(e) => api::category_error(&state, e),
    }
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(list_categories)
        .service(get_category)
        .service(create_category)
        .service(update_category)
        .service(delete_category);
}
