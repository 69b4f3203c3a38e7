//! Error responses.
//!
//! Every failure leaves the API as
//! `{ "success": false, "error": CODE, "message": text }` with a non-2xx
//! status. Database details are logged, never returned.

use axum::{
    Json,
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use tracing::error;

use partida_core::posting::PostingError;
use partida_db::AccountingError;
use partida_shared::AppError;

/// Errors returned by route handlers.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Request-level failure outside the posting domain.
    #[error(transparent)]
    App(#[from] AppError),

    /// Posting pipeline failure.
    #[error(transparent)]
    Accounting(#[from] AccountingError),
}

impl From<PostingError> for ApiError {
    fn from(err: PostingError) -> Self {
        Self::Accounting(err.into())
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::App(AppError::Validation(rejection.body_text()))
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        Self::App(AppError::Validation(rejection.body_text()))
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        Self::App(AppError::Validation(rejection.body_text()))
    }
}

impl ApiError {
    fn status(&self) -> StatusCode {
        let code = match self {
            Self::App(err) => err.status_code(),
            Self::Accounting(err) => err.http_status_code(),
        };
        StatusCode::from_u16(code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }

    fn code(&self) -> &'static str {
        match self {
            Self::App(err) => err.error_code(),
            Self::Accounting(err) => err.error_code(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();

        let message = if status.is_server_error() {
            error!(error = %self, "Request failed");
            "An internal error occurred".to_string()
        } else {
            self.to_string()
        };

        (
            status,
            Json(json!({
                "success": false,
                "error": self.code(),
                "message": message,
            })),
        )
            .into_response()
    }
}
