//! API error types and handling.
//!
//! Every error renders as the standard envelope `{status, message}` with
//! `status` mirroring the HTTP status code.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use gd_connectors::ConnectorError;
use gd_core::db::{DbError, InvalidSort};
use gd_core::{AuthError, PasswordError};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;
use tracing::{error, warn};

/// Message returned for every unexpected failure.
pub const INTERNAL_ERROR_MESSAGE: &str = "Erro interno do servidor";

/// Message returned when the legislative upstream fails.
pub const UPSTREAM_ERROR_MESSAGE: &str = "Erro ao consultar a API da Câmara dos Deputados";

/// API error type.
#[derive(Error, Debug)]
pub enum ApiError {
    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Bad request (invalid input).
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Missing or invalid credentials.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Authenticated but not allowed.
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Duplicate record or violated reference.
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Validation error with field-level details.
    #[error("Validation failed")]
    ValidationError(ValidationErrorDetails),

    /// Legislative upstream failure.
    #[error("Upstream error: {0}")]
    Upstream(String),

    /// Database error.
    #[error("Database error: {0}")]
    Database(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Details for field-level validation errors.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationErrorDetails {
    /// Overall validation error message.
    pub message: String,
    /// Field-specific errors.
    pub fields: HashMap<String, Vec<FieldError>>,
}

/// A single field validation error.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldError {
    /// Error code (e.g., "required", "length", "email").
    pub code: String,
    /// Human-readable error message.
    pub message: String,
}

impl ValidationErrorDetails {
    /// Creates a new validation error with a single field error.
    pub fn field(field: &str, code: &str, message: &str) -> Self {
        let mut fields = HashMap::new();
        fields.insert(
            field.to_string(),
            vec![FieldError {
                code: code.to_string(),
                message: message.to_string(),
            }],
        );
        Self {
            message: message.to_string(),
            fields,
        }
    }
}

/// Error body. Matches the success envelope minus `dados`.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub status: u16,
    pub message: String,
    /// Field errors, present on validation failures.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub erros: Option<HashMap<String, Vec<FieldError>>>,
}

/// Per-entity wording for database failures.
#[derive(Debug, Clone, Copy)]
pub struct EntityMessages {
    pub not_found: &'static str,
    pub duplicate: &'static str,
    pub foreign_key: &'static str,
    pub restricted: &'static str,
}

impl ApiError {
    /// Returns the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::ValidationError(_) => StatusCode::BAD_REQUEST,
            ApiError::Upstream(_) => StatusCode::BAD_GATEWAY,
            ApiError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Creates a validation error for a single field.
    pub fn validation_field(field: &str, code: &str, message: &str) -> Self {
        ApiError::ValidationError(ValidationErrorDetails::field(field, code, message))
    }

    /// Replaces the overall message of a validation error.
    pub fn with_message(self, message: &str) -> Self {
        match self {
            ApiError::ValidationError(mut details) => {
                details.message = message.to_string();
                ApiError::ValidationError(details)
            }
            other => other,
        }
    }

    /// Maps a database error using entity-specific wording.
    pub fn from_db(err: DbError, messages: &EntityMessages) -> Self {
        match err {
            DbError::Duplicate(_) => ApiError::Conflict(messages.duplicate.to_string()),
            DbError::ForeignKey(_) => ApiError::Conflict(messages.foreign_key.to_string()),
            DbError::Restricted(_) => ApiError::Conflict(messages.restricted.to_string()),
            DbError::NotFound { .. } => ApiError::NotFound(messages.not_found.to_string()),
            other => ApiError::from(other),
        }
    }

    fn client_message(&self) -> String {
        match self {
            ApiError::NotFound(m)
            | ApiError::BadRequest(m)
            | ApiError::Unauthorized(m)
            | ApiError::Forbidden(m)
            | ApiError::Conflict(m) => m.clone(),
            ApiError::ValidationError(details) => details.message.clone(),
            ApiError::Upstream(_) => UPSTREAM_ERROR_MESSAGE.to_string(),
            ApiError::Database(_) | ApiError::Internal(_) => INTERNAL_ERROR_MESSAGE.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        match &self {
            ApiError::Database(cause) | ApiError::Internal(cause) => {
                error!(error = %cause, "Request failed");
            }
            ApiError::Upstream(cause) => {
                warn!(error = %cause, "Legislative upstream request failed");
            }
            _ => {}
        }

        let erros = match &self {
            ApiError::ValidationError(details) => Some(details.fields.clone()),
            _ => None,
        };

        let body = ErrorResponse {
            status: status.as_u16(),
            message: self.client_message(),
            erros,
        };

        (status, Json(body)).into_response()
    }
}

impl From<DbError> for ApiError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { entity, id } => {
                ApiError::NotFound(format!("{} {} não encontrado", entity, id))
            }
            DbError::Duplicate(msg) | DbError::ForeignKey(msg) | DbError::Restricted(msg) => {
                ApiError::Conflict(msg)
            }
            DbError::NotNull(msg) => ApiError::BadRequest(msg),
            err => ApiError::Database(err.to_string()),
        }
    }
}

impl From<InvalidSort> for ApiError {
    fn from(err: InvalidSort) -> Self {
        match err {
            InvalidSort::Column(_) => {
                ApiError::BadRequest("Parametro 'ordenarPor' inválido".to_string())
            }
            InvalidSort::Order(_) => ApiError::BadRequest("Parametro 'ordem' inválido".to_string()),
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::Expired => ApiError::Unauthorized("Token expirado.".to_string()),
            AuthError::InvalidToken | AuthError::Token(_) => {
                ApiError::Unauthorized("Token inválido.".to_string())
            }
            err => ApiError::Internal(err.to_string()),
        }
    }
}

impl From<PasswordError> for ApiError {
    fn from(err: PasswordError) -> Self {
        ApiError::Internal(err.to_string())
    }
}

impl From<ConnectorError> for ApiError {
    fn from(err: ConnectorError) -> Self {
        match err {
            ConnectorError::NotFound(_) => {
                ApiError::NotFound("Proposição não encontrada.".to_string())
            }
            err => ApiError::Upstream(err.to_string()),
        }
    }
}

impl From<validator::ValidationErrors> for ApiError {
    fn from(err: validator::ValidationErrors) -> Self {
        let mut fields: HashMap<String, Vec<FieldError>> = HashMap::new();

        for (field_name, field_errors) in err.field_errors() {
            let errors: Vec<FieldError> = field_errors
                .iter()
                .map(|e| {
                    let code = e.code.to_string();
                    let message = e
                        .message
                        .clone()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| format!("Campo '{}' inválido", field_name));
                    FieldError { code, message }
                })
                .collect();
            fields.insert(field_name.to_string(), errors);
        }

        ApiError::ValidationError(ValidationErrorDetails {
            message: "Todos os campos obrigatórios devem ser preenchidos".to_string(),
            fields,
        })
    }
}
