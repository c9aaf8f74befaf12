use actix_web::error::InternalError;
use actix_web::http::StatusCode;
use actix_web::web::{JsonConfig, PathConfig, QueryConfig};
use actix_web::HttpResponse;
use serde::Serialize;

use civicpress::common::{ArticleError, AuthError, CategoryError};

use civicpress::log_err;
use crate::web::state::AppState;

/// `{ success, data | error }`
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

pub fn ok<T: Serialize>(data: T) -> HttpResponse {
    respond(StatusCode::OK, data)
}

pub fn created<T: Serialize>(data: T) -> HttpResponse {
    respond(StatusCode::CREATED, data)
}

pub fn respond<T: Serialize>(status: StatusCode, data: T) -> HttpResponse {
    HttpResponse::build(status).json(ApiResponse {
        success: true,
        data: Some(data),
        error: None,
    })
}

pub fn fail(status: StatusCode, error: impl Into<String>) -> HttpResponse {
    HttpResponse::build(status).json(ApiResponse::<()> {
        success: false,
        data: None,
        error: Some(error.into()),
    })
}

/// A failed response that still carries a payload, e.g. a partial bulk run.
pub fn fail_with<T: Serialize>(
    status: StatusCode,
    error: impl Into<String>,
    data: T,
) -> HttpResponse {
    HttpResponse::build(status).json(ApiResponse {
        success: false,
        data: Some(data),
        error: Some(error.into()),
    })
}

/// Extractor failures answer in the envelope too.
pub fn json_config() -> JsonConfig {
    JsonConfig::default().error_handler(|err, _req| {
        let resp = fail(StatusCode::BAD_REQUEST, err.to_string());
        InternalError::from_response(err, resp).into()
    })
}

pub fn query_config() -> QueryConfig {
    QueryConfig::default().error_handler(|err, _req| {
        let resp = fail(StatusCode::BAD_REQUEST, err.to_string());
        InternalError::from_response(err, resp).into()
    })
}

/// A path segment that does not parse, such as a bad article id, is a 404.
pub fn path_config() -> PathConfig {
    PathConfig::default().error_handler(|err, _req| {
        let resp = fail(StatusCode::NOT_FOUND, err.to_string());
        InternalError::from_response(err, resp).into()
    })
}

pub fn unauthorized() -> HttpResponse {
    fail(StatusCode::UNAUTHORIZED, AuthError::Unauthorized.to_string())
}

pub fn article_error(state: &AppState, err: ArticleError) -> HttpResponse {
    match err {
        ArticleError::NotFound(_) => {
            fail(StatusCode::NOT_FOUND, err.to_string())
        }
        ArticleError::Validation(e) => {
            fail(StatusCode::UNPROCESSABLE_ENTITY, e.to_string())
        }
        ArticleError::InvalidRequest(_) => {
            fail(StatusCode::BAD_REQUEST, err.to_string())
        }
        ArticleError::Database(e) => {
            log_err!(state.db.pool, "Article store failure", e.to_string());
            fail(
                StatusCode::INTERNAL_SERVER_ERROR,
                "An error occurred while saving the article. Please try again.",
            )
        }
    }
}

pub fn category_error(state: &AppState, err: CategoryError) -> HttpResponse {
    match err {
        CategoryError::NotFound(_) => {
            fail(StatusCode::NOT_FOUND, err.to_string())
        }
        CategoryError::AlreadyExists(_) => {
            fail(StatusCode::CONFLICT, err.to_string())
        }
        CategoryError::Validation(e) => {
            fail(StatusCode::UNPROCESSABLE_ENTITY, e.to_string())
        }
        CategoryError::InvalidRequest(_) => {
            fail(StatusCode::BAD_REQUEST, err.to_string())
        }
        CategoryError::Database(e) => {
            log_err!(state.db.pool, "Category store failure", e.to_string());
            fail(
                StatusCode::INTERNAL_SERVER_ERROR,
                "An error occurred while saving the category. Please try again.",
            )
        }
    }
}
