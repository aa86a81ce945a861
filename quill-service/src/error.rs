/// Error types for quill-service
///
/// Handlers return `Result<HttpResponse>`; anything that escapes is turned
/// into a rendered HTML outcome here. Validation failures never reach this
/// type: forms re-render locally with field errors.
use actix_web::{error::ResponseError, http::header, http::StatusCode, HttpResponse};
use thiserror::Error;

use crate::render;

/// Result type for quill-service operations
pub type Result<T> = std::result::Result<T, AppError>;

#[derive(Debug, Error)]
pub enum AppError {
    /// Unresolvable slug, username or post id.
    #[error("not found: {0}")]
    NotFound(String),

    /// Anonymous request to an endpoint that requires a login. Recovered
    /// with a redirect carrying the original path.
    #[error("login required")]
    LoginRequired { next: String },

    #[error("bad request: {0}")]
    BadRequest(String),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("internal error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn login_redirect_target(next: &str) -> String {
        format!("/auth/login/?next={}", urlencoding::encode(next))
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::LoginRequired { .. } => StatusCode::FOUND,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Database(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        match self {
            AppError::NotFound(what) => HttpResponse::NotFound()
                .content_type("text/html; charset=utf-8")
                .body(render::not_found_page(what)),
            AppError::LoginRequired { next } => HttpResponse::Found()
                .insert_header((header::LOCATION, Self::login_redirect_target(next)))
                .finish(),
            AppError::BadRequest(msg) => HttpResponse::BadRequest()
                .content_type("text/html; charset=utf-8")
                .body(render::bad_request_page(msg)),
            AppError::Database(e) => {
                tracing::error!("database error: {}", e);
                server_error_response()
            }
            AppError::Internal(msg) => {
                tracing::error!("internal error: {}", msg);
                server_error_response()
            }
        }
    }
}

/// Generic 500 page. Never exposes internal detail to the client.
pub fn server_error_response() -> HttpResponse {
    HttpResponse::InternalServerError()
        .content_type("text/html; charset=utf-8")
        .body(render::server_error_page())
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::Internal(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn login_redirect_encodes_next() {
        let target = AppError::login_redirect_target("/new/");
        assert_eq!(target, "/auth/login/?next=%2Fnew%2F");
    }

    #[test]
    fn status_codes_match_outcomes() {
        assert_eq!(
            AppError::NotFound("post".into()).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::LoginRequired { next: "/new/".into() }.status_code(),
            StatusCode::FOUND
        );
        assert_eq!(
            AppError::Internal("boom".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn error_pages_hide_internal_detail() {
        let resp = AppError::Internal("connection string leaked".into()).error_response();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
