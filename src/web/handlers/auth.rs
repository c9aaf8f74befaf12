use actix_web::http::header::{HeaderValue, RETRY_AFTER};
use actix_web::http::StatusCode;
use actix_web::{post, web, HttpRequest, HttpResponse, Responder};
use chrono::Utc;
use serde_json::json;

use civicpress::common::AuthError;
use civicpress::db;

use crate::web::api;
use crate::web::forms::LoginForm;
use crate::web::helpers::{client_ip, expired_session_cookie, session_cookie, session_token};
use crate::web::security::validate_email;
use crate::web::state::AppState;

#[post("/api/auth/login")]
pub async fn login(
    state: web::Data<AppState>,
    req: HttpRequest,
    body: web::Json<LoginForm>,
) -> impl Responder {
    let ip = client_ip(&req);
    if let Err(wait) = state.login_throttle.check(&format!("login:{}", ip)) {
        log::warn!("Login throttled for {}", ip);

        let mut resp = api::fail(
            StatusCode::TOO_MANY_REQUESTS,
            "Too many login attempts. Please try again later.",
        );
        if let Ok(value) = HeaderValue::from_str(&wait.as_secs().max(1).to_string()) {
            resp.headers_mut().insert(RETRY_AFTER, value);
        }
        return resp;
    }

    let email = body.email.trim().to_string();
    if !validate_email(&email) || body.password.is_empty() {
        return api::fail(
            StatusCode::BAD_REQUEST,
            "Email and password are required",
        );
    }

    match db::login(&state.db.pool, &email, &body.password, Utc::now()).await {
        Ok(session) => {
            log::info!("Admin {} signed in", session.admin_id);

            let mut resp = api::ok(json!({ "expiresAt": session.expires_at }));
            if let Err(e) = resp.add_cookie(&session_cookie(
                session.token,
                state.cookie_secure,
            )) {
                log::error!("Failed to set session cookie: {}", e);
                return api::fail(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An internal error occurred. Please try again.",
                );
            }
            resp
        }
        Err(AuthError::InvalidCredentials) => {
            api::fail(StatusCode::UNAUTHORIZED, "Invalid email or password")
        }
        Err(e) => {
            log::error!("Login failed: {}", e);
            api::fail(
                StatusCode::INTERNAL_SERVER_ERROR,
                "An internal error occurred. Please try again.",
            )
        }
    }
}

#[post("/api/auth/logout")]
pub async fn logout(
    state: web::Data<AppState>,
    req: HttpRequest,
) -> impl Responder {
    if let Some(token) = session_token(&req) {
        if let Err(e) = db::logout(&state.db.pool, token).await {
            log::error!("Failed to drop session: {}", e);
        }
    }

    HttpResponse::Ok()
        .cookie(expired_session_cookie(state.cookie_secure))
        .json(json!({ "success": true }))
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(login).service(logout);
}
