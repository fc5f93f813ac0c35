use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use serde_json::json;
use thiserror::Error;

use crate::{
    cache::{GENERIC_ERROR_MESSAGE, QueryError},
    http::HttpError,
};

#[derive(Debug, Error)]
pub enum AppError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("{0} not found")]
    NotFound(String),

    #[error("bad request: {0}")]
    BadRequest(String),

    #[error(transparent)]
    Query(#[from] QueryError),
}

impl AppError {
    fn message(&self) -> String {
        match self {
            AppError::Query(e) => e.user_message(),
            AppError::NotFound(_) | AppError::BadRequest(_) => self.to_string(),
            AppError::Config(_) => GENERIC_ERROR_MESSAGE.to_string(),
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Query(QueryError::Validation(_)) => StatusCode::UNPROCESSABLE_ENTITY,
            // Backend client errors carry a message meant for the user.
            AppError::Query(QueryError::Http(HttpError::Status { status, .. }))
                if (400..500).contains(status) =>
            {
                StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_GATEWAY)
            }
            AppError::Query(QueryError::Http(HttpError::Timeout)) => StatusCode::GATEWAY_TIMEOUT,
            AppError::Query(QueryError::Http(_) | QueryError::Unsuccessful { .. }) => {
                StatusCode::BAD_GATEWAY
            }
            AppError::Query(QueryError::TypeMismatch { .. } | QueryError::Aborted(_)) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        let body = match self {
            AppError::Query(QueryError::Validation(errors)) => json!({
                "message": self.message(),
                "errors": errors.errors,
            }),
            _ => json!({ "message": self.message() }),
        };
        HttpResponse::build(self.status_code()).json(body)
    }
}

impl From<AppError> for std::io::Error {
    fn from(err: AppError) -> Self {
        std::io::Error::other(err.to_string())
    }
}
