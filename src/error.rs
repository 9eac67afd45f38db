use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::config;
use crate::db::DatabaseError;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),
}

impl AppError {
    fn status_and_message(&self) -> (StatusCode, &'static str) {
        match self {
            AppError::Database(err) => match err {
                DatabaseError::NotFound => (StatusCode::NOT_FOUND, "Resource not found"),
                DatabaseError::Duplicate => (StatusCode::CONFLICT, "Resource conflict"),
                DatabaseError::InvalidInput(_) => {
                    (StatusCode::BAD_REQUEST, "Invalid input data")
                }
                _ => (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An internal server error occurred",
                ),
            },
            AppError::Forbidden(_) => (StatusCode::FORBIDDEN, "Access denied"),
            AppError::Validation(_) => (StatusCode::BAD_REQUEST, "Validation error"),
            AppError::NotFound(_) => (StatusCode::NOT_FOUND, "Resource not found"),
            AppError::Conflict(_) => (StatusCode::CONFLICT, "Resource conflict"),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = self.status_and_message();

        // Internal detail stays out of production responses.
        let include_details = config::try_get().map_or(true, |c| !c.is_production());
        let body = if include_details {
            Json(json!({
                "error": {
                    "message": error_message,
                    "details": self.to_string(),
                }
            }))
        } else {
            Json(json!({
                "error": {
                    "message": error_message,
                }
            }))
        };

        (status, body).into_response()
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        AppError::Validation(err.to_string())
    }
}

pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn database_duplicate_surfaces_as_conflict() {
        let err = AppError::Database(DatabaseError::Duplicate);
        let (status, _) = err.status_and_message();
        assert_eq!(status, StatusCode::CONFLICT);
    }

    #[test]
    fn database_not_found_surfaces_as_not_found() {
        let err = AppError::Database(DatabaseError::NotFound);
        let (status, _) = err.status_and_message();
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[test]
    fn unexpected_database_errors_stay_generic() {
        let err = AppError::Database(DatabaseError::Sqlx(sqlx::Error::PoolClosed));
        let (status, message) = err.status_and_message();
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(message, "An internal server error occurred");
    }
}
