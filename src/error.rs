/*
 * Responsibility
 * - アプリ共通の AppError 定義 (status + message のペア)
 * - IntoResponse 実装 (HTTP status / JSON error body) — 終端ハンドラはここだけ
 * - RepoError / LookupError を統一的に変換
 */
use axum::{
    Json,
    http::{StatusCode, Uri},
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::repos::error::RepoError;
use crate::services::auth::lookup::LookupError;

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: ErrorBody,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: &'static str,
    pub message: String,
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{message}")]
    BadRequest { code: &'static str, message: String },

    #[error("{message}")]
    Unauthorized { message: String },

    #[error("You don't have access to this route")]
    Forbidden,

    #[error("{resource} not found")]
    NotFound { resource: &'static str },

    #[error("Can't find {path} on this server")]
    RouteNotFound { path: String },

    #[error("{message}")]
    Conflict { code: &'static str, message: String },

    #[error("Request took too long to complete")]
    RequestTimeout,

    #[error("Too many requests from this IP, please try again in an hour")]
    TooManyRequests,

    #[error("User lookup timed out")]
    LookupTimeout,

    #[error("internal server error")]
    Internal,
}

impl AppError {
    pub fn bad_request(code: &'static str, message: impl Into<String>) -> Self {
        Self::BadRequest {
            code,
            message: message.into(),
        }
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::Unauthorized {
            message: message.into(),
        }
    }

    pub fn not_found(resource: &'static str) -> Self {
        Self::NotFound { resource }
    }

    pub fn conflict(code: &'static str, message: impl Into<String>) -> Self {
        Self::Conflict {
            code,
            message: message.into(),
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::BadRequest { .. } => StatusCode::BAD_REQUEST,
            Self::Unauthorized { .. } => StatusCode::UNAUTHORIZED,
            Self::Forbidden => StatusCode::FORBIDDEN,
            Self::NotFound { .. } | Self::RouteNotFound { .. } => StatusCode::NOT_FOUND,
            Self::Conflict { .. } => StatusCode::CONFLICT,
            Self::RequestTimeout => StatusCode::REQUEST_TIMEOUT,
            Self::TooManyRequests => StatusCode::TOO_MANY_REQUESTS,
            Self::LookupTimeout => StatusCode::GATEWAY_TIMEOUT,
            Self::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Operational errors are expected, client-correctable conditions whose
    /// message may be returned verbatim. Everything else is masked.
    pub fn is_operational(&self) -> bool {
        !matches!(self, Self::Internal)
    }

    fn code(&self) -> &'static str {
        match self {
            Self::BadRequest { code, .. } | Self::Conflict { code, .. } => code,
            Self::Unauthorized { .. } => "UNAUTHORIZED",
            Self::Forbidden => "FORBIDDEN",
            Self::NotFound { .. } | Self::RouteNotFound { .. } => "NOT_FOUND",
            Self::RequestTimeout => "REQUEST_TIMEOUT",
            Self::TooManyRequests => "TOO_MANY_REQUESTS",
            Self::LookupTimeout => "LOOKUP_TIMEOUT",
            Self::Internal => "INTERNAL",
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if !self.is_operational() {
            // Details were logged where the fault was converted; the client
            // only ever sees the generic message.
            tracing::error!("unclassified fault reached the terminal handler");
        }

        let status = self.status_code();
        let body = ErrorResponse {
            error: ErrorBody {
                code: self.code(),
                message: self.to_string(),
            },
        };

        (status, Json(body)).into_response()
    }
}

impl From<RepoError> for AppError {
    fn from(e: RepoError) -> Self {
        match e {
            RepoError::Conflict => AppError::conflict("CONFLICT", "resource already exists"),
            RepoError::Db(ref inner) => {
                tracing::error!(error = %inner, "repository failure");
                AppError::Internal
            }
        }
    }
}

impl From<LookupError> for AppError {
    fn from(e: LookupError) -> Self {
        tracing::error!(error = %e, "user lookup failure");
        AppError::Internal
    }
}

/// Router fallback: anything that reaches the end of the route table without a
/// match becomes a classified 404 carrying the requested path.
pub async fn route_fallback(uri: Uri) -> AppError {
    AppError::RouteNotFound {
        path: uri.path().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes_match_taxonomy() {
        assert_eq!(
            AppError::unauthorized("x").status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(AppError::Forbidden.status_code(), StatusCode::FORBIDDEN);
        assert_eq!(
            AppError::RouteNotFound { path: "/x".into() }.status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::Internal.status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            AppError::LookupTimeout.status_code(),
            StatusCode::GATEWAY_TIMEOUT
        );
    }

    #[test]
    fn internal_is_not_operational_and_masks_its_message() {
        assert!(!AppError::Internal.is_operational());
        assert_eq!(AppError::Internal.to_string(), "internal server error");
    }

    #[test]
    fn route_not_found_message_carries_the_path() {
        let err = AppError::RouteNotFound {
            path: "/api/v1/nonexistent".into(),
        };
        assert!(err.is_operational());
        assert_eq!(
            err.to_string(),
            "Can't find /api/v1/nonexistent on this server"
        );
    }
}
