//! Error types for the library server

use std::collections::BTreeMap;

use axum::{
    extract::rejection::{JsonRejection, PathRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;
use uuid::Uuid;
use validator::ValidationErrors;

/// Main application error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error("Validation error: {0}")]
    Validation(#[from] ValidationErrors),

    #[error("{0}")]
    BadRequest(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn user_not_found(id: Uuid) -> Self {
        AppError::NotFound(format!("User with id={} not found", id))
    }

    pub fn book_not_found(id: Uuid) -> Self {
        AppError::NotFound(format!("Book with id={} not found", id))
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Validation(_) | AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Database(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Client-facing description. Field errors become a `{field: message}` object.
    fn details(&self) -> Value {
        match self {
            AppError::NotFound(msg) | AppError::Conflict(msg) | AppError::BadRequest(msg) => {
                Value::String(msg.clone())
            }
            AppError::Validation(errors) => {
                let fields: BTreeMap<String, String> = errors
                    .field_errors()
                    .into_iter()
                    .map(|(field, errs)| {
                        let message = errs
                            .first()
                            .map(|e| {
                                e.message
                                    .as_ref()
                                    .map(|m| m.to_string())
                                    .unwrap_or_else(|| e.code.to_string())
                            })
                            .unwrap_or_default();
                        (field.to_string(), message)
                    })
                    .collect();
                serde_json::to_value(fields).unwrap_or(Value::Null)
            }
            AppError::Database(e) => {
                tracing::error!("Database error: {:?}", e);
                Value::String("Database error".to_string())
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                Value::String("Internal server error".to_string())
            }
        }
    }
}

/// Error response body
#[derive(Debug, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    pub timestamp: DateTime<Utc>,
    /// Mirrors the HTTP status code
    pub error_code: u16,
    /// A message, or an object of field name to message for validation failures
    #[schema(value_type = Object)]
    pub details: Value,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = Json(ErrorResponse {
            timestamp: Utc::now(),
            error_code: status.as_u16(),
            details: self.details(),
        });

        (status, body).into_response()
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

/// Result type alias for application operations
pub type AppResult<T> = Result<T, AppError>;
