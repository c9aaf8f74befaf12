use actix_web::cookie::{Cookie, SameSite};
use actix_web::{HttpRequest, HttpResponse};
use askama::Template;
use chrono::Utc;
use uuid::Uuid;

use civicpress::common::AuthError;
use civicpress::db;
use civicpress::models::Admin;
use civicpress::services::SESSION_TTL;

use crate::web::api;
use crate::web::state::AppState;

pub const SESSION_COOKIE: &str = "cp_admin";

pub fn session_token(req: &HttpRequest) -> Option<Uuid> {
    req.cookie(SESSION_COOKIE)
        .map(|c| c.value().trim().to_string())
        .filter(|s| !s.is_empty())
        .and_then(|s| Uuid::parse_str(&s).ok())
}

/// Resolves the session cookie, or yields the 401 response to return.
pub async fn require_admin(
    state: &AppState,
    req: &HttpRequest,
) -> Result<Admin, HttpResponse> {
    let Some(token) = session_token(req) else {
        return Err(api::unauthorized());
    };

    match db::admin_for_session(&state.db.pool, token, Utc::now()).await {
        Ok(admin) => Ok(admin),
        Err(AuthError::Database(e)) => {
            log::error!("Database error while checking session: {}", e);
            Err(api::fail(
                actix_web::http::StatusCode::INTERNAL_SERVER_ERROR,
                "An internal error occurred. Please try again.",
            ))
        }
        Err(_) => Err(api::unauthorized()),
    }
}

pub fn session_cookie(token: Uuid, secure: bool) -> Cookie<'static> {
    Cookie::build(SESSION_COOKIE, token.to_string())
        .path("/")
        .http_only(true)
        .secure(secure)
        .same_site(SameSite::Lax)
        .max_age(actix_web::cookie::time::Duration::seconds(
            SESSION_TTL.num_seconds(),
        ))
        .finish()
}

pub fn expired_session_cookie(secure: bool) -> Cookie<'static> {
    let mut cookie = Cookie::build(SESSION_COOKIE, "")
        .path("/")
        .http_only(true)
        .secure(secure)
        .same_site(SameSite::Lax)
        .finish();
    cookie.make_removal();
    cookie
}

pub fn client_ip(req: &HttpRequest) -> String {
    req.connection_info()
        .realip_remote_addr()
        .unwrap_or("unknown")
        .to_string()
}

pub fn render<T: Template>(t: T) -> HttpResponse {
    match t.render() {
        Ok(body) => HttpResponse::Ok()
            .content_type("text/html; charset=utf-8")
            .body(body),
        Err(e) => HttpResponse::InternalServerError()
            .content_type("text/plain; charset=utf-8")
            .body(format!("Template error: {e}")),
    }
}
