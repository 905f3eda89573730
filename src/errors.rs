//! Error type shared by the HTTP handlers.
//!
//! Every variant maps to one status code and one machine-readable `code`
//! in the [`ErrorResponse`] body.

use crate::helpers::timestamp::TimestampError;
use crate::schemas::ErrorResponse;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use sea_orm::{DbErr, SqlErr};
use thiserror::Error;
use tracing::error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{entity} with ID {id} not found")]
    NotFound { entity: &'static str, id: i32 },

    #[error("{0}")]
    NotFoundBy(String),

    #[error("Invalid created_at: {0}")]
    InvalidTimestamp(#[from] TimestampError),

    #[error("{0}")]
    InvalidReference(String),

    #[error("{0}")]
    Conflict(String),

    #[error("Internal server error")]
    Database(#[from] DbErr),
}

impl ApiError {
    /// Map a failed write onto a client error when the database rejected it
    /// for a constraint reason. `what` names the record being written.
    pub fn from_write(err: DbErr, what: &str) -> Self {
        match err.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(detail)) => {
                ApiError::Conflict(format!("{} already exists ({})", what, detail))
            }
            Some(SqlErr::ForeignKeyConstraintViolation(_)) => ApiError::InvalidReference(format!(
                "{} references a record that does not exist",
                what
            )),
            _ => ApiError::Database(err),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::NotFound { .. } | ApiError::NotFoundBy(_) => StatusCode::NOT_FOUND,
            ApiError::InvalidTimestamp(_) | ApiError::InvalidReference(_) => StatusCode::BAD_REQUEST,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            ApiError::NotFound { .. } | ApiError::NotFoundBy(_) => "NOT_FOUND",
            ApiError::InvalidTimestamp(_) => "INVALID_CREATED_AT",
            ApiError::InvalidReference(_) => "INVALID_REFERENCE",
            ApiError::Conflict(_) => "ALREADY_EXISTS",
            ApiError::Database(_) => "DATABASE_ERROR",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let ApiError::Database(ref db_error) = self {
            error!("Database error: {}", db_error);
        }

        let body = ErrorResponse {
            error: self.to_string(),
            code: self.code().to_string(),
            success: false,
        };

        (self.status(), Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_and_code_mapping() {
        let not_found = ApiError::NotFound { entity: "Inventory", id: 7 };
        assert_eq!(not_found.status(), StatusCode::NOT_FOUND);
        assert_eq!(not_found.to_string(), "Inventory with ID 7 not found");

        let invalid = ApiError::from(TimestampError::Missing);
        assert_eq!(invalid.status(), StatusCode::BAD_REQUEST);
        assert_eq!(invalid.code(), "INVALID_CREATED_AT");

        let conflict = ApiError::Conflict("Tag 'x' already exists".to_string());
        assert_eq!(conflict.status(), StatusCode::CONFLICT);
    }

    #[test]
    fn test_unrelated_database_errors_stay_internal() {
        let err = ApiError::from_write(DbErr::Custom("boom".to_string()), "Inventory");
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        // Driver details are logged, never returned
        assert_eq!(err.to_string(), "Internal server error");
    }
}
